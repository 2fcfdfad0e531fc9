//! HTML rendering of post metadata.
//!
//! Relative dates are embedded as the text of `<time>` elements whose
//! `datetime` attribute carries the absolute RFC 3339 instant, so the page
//! stays meaningful after the relative text goes stale.
//!
//! ```text
//! <p class="post-meta">
//!     <time datetime="2024-03-01T10:00:00-05:00">3 days ago</time>
//!     by lbfalvy · updated <time ...>yesterday</time>
//! </p>
//! ```
//!
//! Uses [maud](https://maud.lambda.xyz/); all interpolation is auto-escaped.

use crate::config::SiteConfig;
use crate::schema::Post;
use crate::time::{TimeError, ZonedInstant, print_time};
use jiff::Timestamp;
use maud::{DOCTYPE, Markup, html};

const CSS: &str = r#"
body { max-width: 42rem; margin: 2rem auto; padding: 0 1rem; font-family: system-ui, sans-serif; }
.post-list { list-style: none; padding: 0; }
.post-list li { margin-bottom: 2rem; }
.post-meta, .tags { color: #666; font-size: 0.9rem; }
.tags span { margin-right: 0.5rem; }
"#;

/// Renders the base HTML document structure
fn base_document(title: &str, content: Markup) -> Markup {
    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="UTF-8";
                meta name="viewport" content="width=device-width, initial-scale=1.0";
                title { (title) }
                style { (CSS) }
            }
            body {
                (content)
            }
        }
    }
}

fn time_element(instant: &ZonedInstant, now: Timestamp) -> Markup {
    html! {
        time datetime=(instant.rfc3339()) { (print_time(instant, now)) }
    }
}

/// Publication line for a post: relative date, author, optional update.
pub fn post_meta(post: &Post, now: Timestamp) -> Result<Markup, TimeError> {
    let published = post.pub_date()?;
    let updated = post.updated_date()?;

    Ok(html! {
        p.post-meta {
            (time_element(&published, now))
            " by " (post.meta.author)
            @if let Some(updated) = &updated {
                " · updated " (time_element(updated, now))
            }
        }
        @if !post.meta.tags.is_empty() {
            p.tags {
                @for tag in &post.meta.tags {
                    span.tag { "#" (tag) }
                }
            }
        }
    })
}

/// Index page listing every listed post, newest first.
pub fn render_index(
    config: &SiteConfig,
    posts: &[Post],
    now: Timestamp,
) -> Result<Markup, TimeError> {
    let mut dated = posts
        .iter()
        .filter(|p| !p.meta.is_unlisted())
        .map(|p| p.pub_date().map(|d| (d.timestamp(), p)))
        .collect::<Result<Vec<_>, _>>()?;
    dated.sort_by(|a, b| b.0.cmp(&a.0));

    let mut entries = Vec::with_capacity(dated.len());
    for (_, post) in dated {
        let meta = post_meta(post, now)?;
        entries.push(html! {
            li {
                h2 { a href={ "/blog/" (post.id) "/" } { (post.meta.title) } }
                (meta)
                p.summary { (post.meta.summary) }
            }
        });
    }

    let content = html! {
        header {
            h1 { (config.title) }
            p { (config.description) }
        }
        main {
            ul.post-list {
                @for entry in &entries {
                    (entry)
                }
            }
        }
    };
    Ok(base_document(&config.title, content))
}
