//! CLI output formatting.
//!
//! Output is information-centric: each post is shown by positional index and
//! title, with its source file and dates as indented context lines.
//!
//! ## Check / List
//!
//! ```text
//! Posts
//! 001 Parsing dates
//!     Source: blog/parsing-dates.md
//!     Published: 3 days ago
//!     Updated: yesterday
//! 002 Draft (unlisted)
//!     Source: blog/draft.md
//!     Published: at 2024-01-01 09:30
//! ```
//!
//! ## Document errors
//!
//! ```text
//! blog/bad.md
//!     pubDate: "2024-13-01T00:00:00Z" is not a valid zoned datetime
//! ```
//!
//! Each command has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout or stderr.

use crate::feed::Feed;
use crate::scan::{Collection, DocumentError, DocumentErrorKind};
use crate::schema::{Post, SchemaError};
use crate::time::{self, TimeError, ZonedInstant};
use jiff::Timestamp;
use std::path::Path;

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

fn post_header(index: usize, post: &Post) -> String {
    if post.meta.is_unlisted() {
        format!("{} {} (unlisted)", format_index(index), post.meta.title)
    } else {
        format!("{} {}", format_index(index), post.meta.title)
    }
}

fn post_lines(index: usize, post: &Post, now: Timestamp) -> Result<Vec<String>, TimeError> {
    let mut lines = vec![post_header(index, post)];
    lines.push(format!("{}Source: {}", indent(1), post.source.display()));
    lines.push(format!(
        "{}Published: {}",
        indent(1),
        time::print_time(&post.pub_date()?, now)
    ));
    if let Some(updated) = post.updated_date()? {
        lines.push(format!(
            "{}Updated: {}",
            indent(1),
            time::print_time(&updated, now)
        ));
    }
    Ok(lines)
}

/// Inventory of every post, in source order.
pub fn format_list_output(
    collection: &Collection,
    now: Timestamp,
) -> Result<Vec<String>, TimeError> {
    let mut lines = vec!["Posts".to_string()];
    if collection.posts.is_empty() {
        lines.push(format!("{}(none)", indent(1)));
    }
    for (i, post) in collection.posts.iter().enumerate() {
        lines.extend(post_lines(i + 1, post, now)?);
    }
    Ok(lines)
}

pub fn print_list_output(collection: &Collection, now: Timestamp) -> Result<(), TimeError> {
    for line in format_list_output(collection, now)? {
        println!("{}", line);
    }
    Ok(())
}

/// Inventory and totals printed after a successful `check`.
pub fn format_check_output(
    collection: &Collection,
    source_root: &Path,
    now: Timestamp,
) -> Result<Vec<String>, TimeError> {
    let listed = collection.listed().count();
    let unlisted = collection.posts.len() - listed;
    let mut lines = format_list_output(collection, now)?;
    lines.push(format!("Checked {}", source_root.display()));
    lines.push(format!(
        "{}{} posts ({} listed, {} unlisted)",
        indent(1),
        collection.posts.len(),
        listed,
        unlisted
    ));
    Ok(lines)
}

pub fn print_check_output(
    collection: &Collection,
    source_root: &Path,
    now: Timestamp,
) -> Result<(), TimeError> {
    for line in format_check_output(collection, source_root, now)? {
        println!("{}", line);
    }
    Ok(())
}

/// One block per failing document: the file, then one line per problem.
pub fn format_document_errors(errors: &[DocumentError]) -> Vec<String> {
    let mut lines = Vec::new();
    for error in errors {
        lines.push(error.path.display().to_string());
        match &error.kind {
            DocumentErrorKind::Schema(SchemaError::Fields(issues)) => {
                for issue in issues {
                    lines.push(format!("{}{}", indent(1), issue));
                }
            }
            kind => lines.push(format!("{}{}", indent(1), kind)),
        }
    }
    lines
}

pub fn print_document_errors(errors: &[DocumentError]) {
    for line in format_document_errors(errors) {
        eprintln!("{}", line);
    }
}

pub fn format_feed_summary(feed: &Feed, path: &Path) -> Vec<String> {
    let mut lines = vec![format!(
        "Feed: {} items → {}",
        feed.items.len(),
        path.display()
    )];
    for (i, item) in feed.items.iter().enumerate() {
        lines.push(format!("{} {}", format_index(i + 1), item.title));
        lines.push(format!("{}Link: {}", indent(1), item.link));
    }
    lines
}

pub fn print_feed_summary(feed: &Feed, path: &Path) {
    for line in format_feed_summary(feed, path) {
        println!("{}", line);
    }
}

/// Details of a single parsed timestamp, for the `parse` command.
///
/// `relative` is the instant as [`time::print_time`] renders it.
pub fn format_parse_output(instant: &ZonedInstant, relative: &str) -> Vec<String> {
    vec![
        instant.to_string(),
        format!("{}Zone: {}", indent(1), instant.zone_name().unwrap_or("fixed offset")),
        format!("{}Offset: {}", indent(1), instant.offset()),
        format!("{}Epoch ms: {}", indent(1), instant.epoch_millis()),
        format!("{}Relative: {}", indent(1), relative),
    ]
}

pub fn print_parse_output(instant: &ZonedInstant) {
    for line in format_parse_output(instant, &time::print_time_now(instant)) {
        println!("{}", line);
    }
}
