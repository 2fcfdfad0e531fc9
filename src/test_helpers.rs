//! Shared test utilities for the simple-blog test suite.
//!
//! Provides post fixture writers and fixed-clock helpers so relative-time
//! output can be asserted exactly.
//!
//! ```ignore
//! use crate::test_helpers::*;
//!
//! let tmp = TempDir::new().unwrap();
//! write_post(tmp.path(), "blog/hello.md", "Hello", "2024-03-01T10:00:00Z", None);
//!
//! let t = instant("2024-03-01T10:00:00Z");
//! let now = ago(&t, SignedDuration::from_hours(3));
//! ```

use crate::time::{ZonedInstant, parse_time};
use jiff::{SignedDuration, Timestamp};
use std::fs;
use std::path::Path;

// =========================================================================
// Clock
// =========================================================================

/// Parse a timestamp that the test knows is valid. Panics otherwise.
pub fn instant(input: &str) -> ZonedInstant {
    parse_time(input).unwrap_or_else(|e| panic!("fixture timestamp {input:?}: {e}"))
}

/// The "now" at which `instant` is `elapsed` in the past.
pub fn ago(instant: &ZonedInstant, elapsed: SignedDuration) -> Timestamp {
    instant
        .timestamp()
        .checked_add(elapsed)
        .expect("fixture clock in range")
}

// =========================================================================
// Fixture setup
// =========================================================================

/// Render a post document with the standard fixture fields.
pub fn post_source(title: &str, pub_date: &str, updated: Option<&str>) -> String {
    let updated = updated
        .map(|u| format!("updatedDate = \"{u}\"\n"))
        .unwrap_or_default();
    format!(
        "+++\n\
         title = \"{title}\"\n\
         summary = \"About {title}.\"\n\
         pubDate = \"{pub_date}\"\n\
         {updated}\
         author = \"Tester\"\n\
         tags = [\"rust\"]\n\
         +++\n\
         \n\
         Body of {title}.\n"
    )
}

/// Write a post under `root` at `rel_path`, creating parent directories.
pub fn write_post(
    root: &Path,
    rel_path: &str,
    title: &str,
    pub_date: &str,
    updated: Option<&str>,
) {
    write_file(root, rel_path, &post_source(title, pub_date, updated));
}

/// Write arbitrary content under `root`, creating parent directories.
pub fn write_file(root: &Path, rel_path: &str, content: &str) {
    let path = root.join(rel_path);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, content).unwrap();
}
