//! Content loading.
//!
//! Walks the blog directory, loads every `*.md` / `*.mdx` file and validates
//! its frontmatter, producing a [`Collection`].
//!
//! ## Directory Structure
//!
//! ```text
//! content/
//! ├── config.toml                 # Site configuration (optional)
//! └── blog/                       # `blog_dir` in config
//!     ├── hello-world.md          # id: hello-world
//!     ├── Parsing Dates.mdx       # id: parsing-dates
//!     └── 2024/
//!         └── recap.md            # id: 2024/recap
//! ```
//!
//! ## Validation
//!
//! Documents are validated in parallel. The scan does not stop at the first
//! bad file: every failing document is collected and reported together in
//! [`ScanError::InvalidContent`].

use crate::config::SiteConfig;
use crate::schema::{self, Post, SchemaError};
use rayon::prelude::*;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use walkdir::WalkDir;

const POST_EXTENSIONS: &[&str] = &["md", "mdx"];

#[derive(Error, Debug)]
pub enum ScanError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Walk error: {0}")]
    Walk(#[from] walkdir::Error),
    #[error("{} document(s) failed validation", .0.len())]
    InvalidContent(Vec<DocumentError>),
}

/// A document that could not be loaded, with the file it came from.
#[derive(Debug)]
pub struct DocumentError {
    /// Source file, relative to the content root.
    pub path: PathBuf,
    pub kind: DocumentErrorKind,
}

#[derive(Error, Debug)]
pub enum DocumentErrorKind {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Schema(#[from] SchemaError),
}

impl fmt::Display for DocumentError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.path.display(), self.kind)
    }
}

impl std::error::Error for DocumentError {}

/// All validated posts, sorted by source path.
#[derive(Debug, Default)]
pub struct Collection {
    pub posts: Vec<Post>,
}

impl Collection {
    pub fn listed(&self) -> impl Iterator<Item = &Post> {
        self.posts.iter().filter(|p| !p.meta.is_unlisted())
    }
}

pub fn scan(root: &Path, config: &SiteConfig) -> Result<Collection, ScanError> {
    let blog_dir = root.join(&config.blog_dir);
    if !blog_dir.is_dir() {
        return Ok(Collection::default());
    }

    let files = find_post_files(&blog_dir)?;

    let results: Vec<Result<Post, DocumentError>> = files
        .par_iter()
        .map(|path| load_post(root, &blog_dir, path))
        .collect();

    let mut posts = Vec::new();
    let mut errors = Vec::new();
    for result in results {
        match result {
            Ok(post) => posts.push(post),
            Err(e) => errors.push(e),
        }
    }

    if !errors.is_empty() {
        return Err(ScanError::InvalidContent(errors));
    }
    Ok(Collection { posts })
}

/// Every post file under `dir`, sorted.
fn find_post_files(dir: &Path) -> Result<Vec<PathBuf>, ScanError> {
    let mut files = Vec::new();
    for entry in WalkDir::new(dir).sort_by_file_name() {
        let entry = entry?;
        if entry.file_type().is_file() && is_post_file(entry.path()) {
            files.push(entry.into_path());
        }
    }
    Ok(files)
}

fn is_post_file(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| POST_EXTENSIONS.iter().any(|ext| e.eq_ignore_ascii_case(ext)))
        .unwrap_or(false)
}

fn load_post(root: &Path, blog_dir: &Path, path: &Path) -> Result<Post, DocumentError> {
    let source = path.strip_prefix(root).unwrap_or(path).to_path_buf();
    let parsed = fs::read_to_string(path)
        .map_err(DocumentErrorKind::from)
        .and_then(|content| schema::parse_document(&content).map_err(DocumentErrorKind::from));

    match parsed {
        Ok((meta, body)) => Ok(Post {
            id: post_id(path.strip_prefix(blog_dir).unwrap_or(path)),
            source,
            meta,
            body,
        }),
        Err(kind) => Err(DocumentError { path: source, kind }),
    }
}

/// Collection id for a path relative to the blog directory.
///
/// Each segment is slugged: lowercased, whitespace becomes `-`, and anything
/// other than letters, digits, `-` and `_` is dropped.
///
/// `2024/Parsing Dates.mdx` → `2024/parsing-dates`,
/// `Hello, World.md` → `hello-world`
pub fn post_id(rel_path: &Path) -> String {
    rel_path
        .with_extension("")
        .components()
        .map(|c| slug(&c.as_os_str().to_string_lossy()))
        .collect::<Vec<_>>()
        .join("/")
}

fn slug(segment: &str) -> String {
    segment
        .trim()
        .to_lowercase()
        .chars()
        .filter_map(|c| match c {
            c if c.is_whitespace() => Some('-'),
            c if c.is_alphanumeric() || c == '-' || c == '_' => Some(c),
            _ => None,
        })
        .collect()
}
