use clap::{Parser, Subcommand};
use jiff::Timestamp;
use simple_blog::{config, feed, output, render, scan, time};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "simple-blog")]
#[command(about = "Static blog toolkit: validated post dates, relative timestamps, feeds")]
#[command(long_about = "\
Static blog toolkit: validated post dates, relative timestamps, feeds

Posts are Markdown/MDX files with TOML frontmatter:

  content/
  ├── config.toml                  # Site config (optional)
  └── blog/
      ├── hello-world.md           # id: hello-world
      └── 2024/recap.mdx           # id: 2024/recap

  +++
  title = \"Hello\"
  summary = \"First post.\"
  pubDate = \"2024-03-01T10:00:00-05:00[America/New_York]\"
  author = \"me\"
  tags = [\"intro\"]
  +++

Dates must carry an offset (Z, -05:00) or a bracketed time zone.

Run 'simple-blog gen-config' to generate a documented config.toml.")]
#[command(version)]
struct Cli {
    /// Content directory
    #[arg(long, default_value = "content", global = true)]
    source: PathBuf,

    /// Output directory
    #[arg(long, default_value = "dist", global = true)]
    output: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Validate all posts without writing anything
    Check,
    /// List posts with relative publication dates
    List,
    /// Write feed items (epoch-millisecond dates) to <output>/feed.json
    Feed,
    /// Render the post index to <output>/index.html
    Index,
    /// Print a stock config.toml with all options documented
    GenConfig,
    /// Parse a single timestamp and show how it is interpreted
    Parse {
        /// ISO-8601 datetime with offset or bracketed zone
        value: String,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command {
        Command::Check => {
            println!("==> Checking {}", cli.source.display());
            let (_, collection) = load(&cli.source)?;
            output::print_check_output(&collection, &cli.source, Timestamp::now())?;
            println!("==> Content is valid");
        }
        Command::List => {
            let (_, collection) = load(&cli.source)?;
            output::print_list_output(&collection, Timestamp::now())?;
        }
        Command::Feed => {
            let (site_config, collection) = load(&cli.source)?;
            let path = cli.output.join("feed.json");
            let feed = feed::export_feed(&site_config, &collection.posts, &path)?;
            output::print_feed_summary(&feed, &path);
        }
        Command::Index => {
            let (site_config, collection) = load(&cli.source)?;
            let markup = render::render_index(&site_config, &collection.posts, Timestamp::now())?;
            std::fs::create_dir_all(&cli.output)?;
            let path = cli.output.join("index.html");
            std::fs::write(&path, markup.into_string())?;
            println!("==> Index → {}", path.display());
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
        Command::Parse { value } => {
            let instant = time::parse_time(&value)?;
            output::print_parse_output(&instant);
        }
    }

    Ok(())
}

/// Load config and scan posts, printing every document error before failing.
fn load(
    source: &Path,
) -> Result<(config::SiteConfig, scan::Collection), Box<dyn std::error::Error>> {
    let site_config = config::load_config(source)?;
    match scan::scan(source, &site_config) {
        Ok(collection) => Ok((site_config, collection)),
        Err(scan::ScanError::InvalidContent(errors)) => {
            output::print_document_errors(&errors);
            Err(scan::ScanError::InvalidContent(errors).into())
        }
        Err(e) => Err(e.into()),
    }
}
