use std::time::Duration;

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};

use videodex_core::models::{CategoriesDocument, VideoRecord};
use videodex_core::{CatalogConfig, CatalogEngine, EventKind, LoadStage};

#[derive(Debug, Parser)]
#[command(name = "videodex", about = "Query a video catalog from the command line.")]
pub struct Cli {
    /// Base URL of the catalog data directory. Falls back to VIDEODEX_DATA_URL.
    #[arg(long, global = true)]
    pub data_url: Option<String>,
    /// Seconds to wait for the background video stage.
    #[arg(long, global = true, default_value_t = 15)]
    pub wait_secs: u64,
    /// Print lifecycle events as they arrive.
    #[arg(long, global = true, default_value_t = false)]
    pub events: bool,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Catalog totals and readiness flags.
    Stats,
    /// Print the category tree with per-node video counts.
    Tree,
    /// Full-text prefix search (AND across terms).
    Search {
        #[arg(allow_hyphen_values = true)]
        query: String,
        /// Constrain results to a `main|sub|subsub` category path.
        #[arg(long)]
        category: Option<String>,
    },
    /// List videos under a category path, in canonical order.
    Filter { path: String },
    /// Look up one video by id.
    Video { id: String },
}

pub fn run(cli: Cli) -> Result<()> {
    let config = match &cli.data_url {
        Some(url) => CatalogConfig::new(url.as_str())?,
        None => CatalogConfig::from_env()
            .context("pass --data-url or set VIDEODEX_DATA_URL")?,
    };
    let engine = CatalogEngine::new(config)?;

    if cli.events {
        subscribe_all(&engine);
    }

    engine.initialize().context("catalog initialization failed")?;
    if !engine.wait_until_videos_ready(Duration::from_secs(cli.wait_secs)) {
        let detail = engine
            .last_error(LoadStage::Videos)
            .map(|payload| payload.message)
            .unwrap_or_else(|| "timed out".to_string());
        bail!("video stage did not complete: {detail}");
    }

    match cli.command {
        Command::Stats => print_stats(&engine),
        Command::Tree => {
            let categories = engine.categories().context("categories missing")?;
            print_tree(&categories);
        }
        Command::Search { query, category } => {
            print_videos(&engine.search_videos(&query, category.as_deref()));
        }
        Command::Filter { path } => {
            print_videos(&engine.filter_by_category(Some(&path)));
        }
        Command::Video { id } => match engine.get_video(&id) {
            Some(video) => println!("{}", serde_json::to_string_pretty(&video)?),
            None => bail!("no video with id {id}"),
        },
    }
    Ok(())
}

fn subscribe_all(engine: &CatalogEngine) {
    for kind in [
        EventKind::LoadStart,
        EventKind::CategoriesReady,
        EventKind::VideosLoadStart,
        EventKind::VideosReady,
        EventKind::SearchIndexReady,
        EventKind::LoadError,
    ] {
        engine.on(kind, move |event| eprintln!("event: {}", event.kind().as_str()));
    }
}

fn print_stats(engine: &CatalogEngine) {
    println!("videos:        {}", engine.total_video_count());
    println!("videos loaded: {}", engine.is_videos_loaded());
    println!("search ready:  {}", engine.is_search_ready());
    if let Some(categories) = engine.categories() {
        println!("categories:    {}", categories.metadata.total_categories);
    }
}

fn print_tree(categories: &CategoriesDocument) {
    for (main_key, main) in &categories.hierarchy {
        println!("{} ({})", main.name.as_deref().unwrap_or(main_key), main.count);
        for (sub_key, sub) in &main.subcategories {
            println!("  {} ({})", sub.name.as_deref().unwrap_or(sub_key), sub.count);
            for (leaf_key, leaf) in &sub.subsubcategories {
                println!(
                    "    {} ({})",
                    leaf.name.as_deref().unwrap_or(leaf_key),
                    leaf.count
                );
            }
        }
    }
}

fn print_videos(videos: &[VideoRecord]) {
    if videos.is_empty() {
        println!("(no matches)");
        return;
    }
    for video in videos {
        println!("{}  {}", video.id, video.title);
    }
}
