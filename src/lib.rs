//! # Simple Blog
//!
//! A minimal static blog toolkit. Posts are Markdown/MDX files with TOML
//! frontmatter; every publication date is a zoned timestamp that is checked
//! when content is loaded and rendered relative to "now" when pages are built.
//!
//! # Pipeline
//!
//! ```text
//! content/blog/**/*.{md,mdx}
//!   → scan      load files, split frontmatter, validate schema   (build-time gate)
//!   → time      parse dates into zoned instants                  (render time)
//!       → render / output   relative dates ("3 days ago")
//!       → feed              absolute epoch-millisecond dates
//! ```
//!
//! The schema and the renderer share one parser, [`time::parse_time`], so a
//! date that passes validation always renders.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`time`] | Zoned timestamp parsing, validation, and the relative-time ladder |
//! | [`schema`] | Frontmatter splitting and field refinements (`pubDate`, `updatedDate`) |
//! | [`scan`] | Walks the blog directory and loads posts in parallel |
//! | [`feed`] | Feed items with epoch-millisecond dates, written as JSON |
//! | [`render`] | Maud HTML for post metadata and the index page |
//! | [`config`] | `config.toml` loading, merging over defaults, and validation |
//! | [`output`] | CLI output formatting |
//!
//! # Design Decisions
//!
//! ## An Explicit Clock
//!
//! Relative formatting takes "now" as a parameter instead of reading the
//! system clock itself. Production call sites sample [`jiff::Timestamp::now`]
//! once per command; tests pass fixed instants and assert exact strings.
//!
//! ## Zones Are Mandatory
//!
//! A date without an offset or zone is rejected at load time. `2024-03-01T10:00`
//! means a different instant for every reader, and the absolute fallback
//! (`at 2024-03-01 10:00`) is always shown in the author's zone.

pub mod config;
pub mod feed;
pub mod output;
pub mod render;
pub mod scan;
pub mod schema;
pub mod time;

#[cfg(test)]
pub(crate) mod test_helpers;
