//! Post frontmatter schema.
//!
//! Each post starts with a TOML block fenced by `+++` lines:
//!
//! ```text
//! +++
//! title = "Parsing dates"
//! summary = "What counts as a timestamp."
//! pubDate = "2024-03-01T10:00:00-05:00[America/New_York]"
//! author = "lbfalvy"
//! tags = ["rust", "time"]
//! +++
//!
//! Body markdown...
//! ```
//!
//! Field types are enforced by deserialization. `pubDate` and `updatedDate` are
//! additionally refined with [`is_valid_time`]: a document whose dates do not
//! parse is rejected here, before anything renders it. Unknown keys are ignored.

use crate::time::{self, TimeError, ZonedInstant, is_valid_time};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

const FENCE: &str = "+++";

#[derive(Error, Debug)]
pub enum SchemaError {
    #[error("missing `+++` frontmatter block")]
    MissingFrontmatter,
    #[error("unterminated `+++` frontmatter block")]
    UnterminatedFrontmatter,
    #[error("frontmatter: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("{}", format_issues(.0))]
    Fields(Vec<FieldIssue>),
}

/// A single field that failed a refinement.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldIssue {
    /// Frontmatter key, as written in the document (`pubDate`).
    pub field: &'static str,
    pub value: String,
}

impl fmt::Display for FieldIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {:?} is not a valid zoned datetime", self.field, self.value)
    }
}

fn format_issues(issues: &[FieldIssue]) -> String {
    issues
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Validated frontmatter. Dates stay as the author wrote them.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostMeta {
    pub title: String,
    pub summary: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    pub pub_date: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unlisted: Option<bool>,
    pub author: String,
    pub tags: Vec<String>,
}

impl PostMeta {
    /// Run the date refinements, collecting every failing field.
    pub fn refine(&self) -> Result<(), SchemaError> {
        let mut issues = Vec::new();
        if !is_valid_time(&self.pub_date) {
            issues.push(FieldIssue {
                field: "pubDate",
                value: self.pub_date.clone(),
            });
        }
        if let Some(updated) = &self.updated_date
            && !is_valid_time(updated)
        {
            issues.push(FieldIssue {
                field: "updatedDate",
                value: updated.clone(),
            });
        }
        if issues.is_empty() {
            Ok(())
        } else {
            Err(SchemaError::Fields(issues))
        }
    }

    pub fn is_unlisted(&self) -> bool {
        self.unlisted.unwrap_or(false)
    }
}

/// A blog post that passed schema validation.
#[derive(Debug, Clone)]
pub struct Post {
    /// Collection id: path under the blog directory, lowercased, no extension.
    pub id: String,
    /// Source file, relative to the content root.
    pub source: PathBuf,
    pub meta: PostMeta,
    pub body: String,
}

impl Post {
    pub fn pub_date(&self) -> Result<ZonedInstant, TimeError> {
        time::parse_time(&self.meta.pub_date)
    }

    pub fn updated_date(&self) -> Result<Option<ZonedInstant>, TimeError> {
        self.meta
            .updated_date
            .as_deref()
            .map(time::parse_time)
            .transpose()
    }
}

/// Split a document into its frontmatter source and body.
///
/// The opening fence must be the first line; the body starts after the
/// closing fence line.
pub fn split_frontmatter(content: &str) -> Result<(&str, &str), SchemaError> {
    let content = content.strip_prefix('\u{feff}').unwrap_or(content);
    let rest = match content.split_once('\n') {
        Some((first, rest)) if first.trim_end() == FENCE => rest,
        _ => return Err(SchemaError::MissingFrontmatter),
    };

    let mut offset = 0;
    for line in rest.split_inclusive('\n') {
        if line.trim_end() == FENCE {
            let frontmatter = &rest[..offset];
            let body = &rest[offset + line.len()..];
            return Ok((frontmatter, body));
        }
        offset += line.len();
    }
    Err(SchemaError::UnterminatedFrontmatter)
}

/// Parse and validate a whole document.
pub fn parse_document(content: &str) -> Result<(PostMeta, String), SchemaError> {
    let (frontmatter, body) = split_frontmatter(content)?;
    let meta: PostMeta = toml::from_str(frontmatter)?;
    meta.refine()?;
    Ok((meta, body.trim_start_matches(['\r', '\n']).to_string()))
}
