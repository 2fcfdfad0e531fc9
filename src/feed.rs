//! Feed item generation.
//!
//! Turns validated posts into structured feed items. Dates are absolute epoch
//! milliseconds taken from the parsed `pubDate`; the relative formatter is
//! never involved. The feed is written as JSON for a downstream RSS/Atom
//! serializer to consume.

use crate::config::SiteConfig;
use crate::schema::Post;
use crate::time::TimeError;
use serde::Serialize;
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum FeedError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Time error: {0}")]
    Time(#[from] TimeError),
}

#[derive(Debug, Serialize)]
pub struct Feed {
    pub title: String,
    pub description: String,
    pub site: String,
    pub items: Vec<FeedItem>,
}

#[derive(Debug, Serialize)]
pub struct FeedItem {
    pub title: String,
    pub author: String,
    pub categories: Vec<String>,
    pub description: String,
    /// Publication instant in milliseconds since the Unix epoch.
    pub pub_date: i64,
    /// Absolute link: `<site>/blog/<id>/`.
    pub link: String,
}

/// Build the feed for every post, unlisted ones included, newest first.
pub fn build_feed(config: &SiteConfig, posts: &[Post]) -> Result<Feed, TimeError> {
    let mut items = posts
        .iter()
        .map(|post| feed_item(config, post))
        .collect::<Result<Vec<_>, _>>()?;
    items.sort_by(|a, b| b.pub_date.cmp(&a.pub_date));

    Ok(Feed {
        title: config.title.clone(),
        description: config.description.clone(),
        site: config.site.clone(),
        items,
    })
}

fn feed_item(config: &SiteConfig, post: &Post) -> Result<FeedItem, TimeError> {
    Ok(FeedItem {
        title: post.meta.title.clone(),
        author: post.meta.author.clone(),
        categories: post.meta.tags.clone(),
        description: post.meta.summary.clone(),
        pub_date: post.pub_date()?.epoch_millis(),
        link: post_link(config, &post.id),
    })
}

pub fn post_link(config: &SiteConfig, id: &str) -> String {
    format!("{}/blog/{}/", config.site_root(), id)
}

/// Serialize `feed` to `path` as pretty JSON.
pub fn write_feed(feed: &Feed, path: &Path) -> Result<(), FeedError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_string_pretty(feed)?;
    fs::write(path, json)?;
    Ok(())
}

/// Build the feed and write it to `path`.
pub fn export_feed(config: &SiteConfig, posts: &[Post], path: &Path) -> Result<Feed, FeedError> {
    let feed = build_feed(config, posts)?;
    write_feed(&feed, path)?;
    Ok(feed)
}
