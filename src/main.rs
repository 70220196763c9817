mod api;
mod app;
mod config;
mod error;
mod logger;
mod paginate;
mod picker;
mod storage;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use app::App;
use config::Config;

#[derive(Debug, Parser)]
#[command(name = "leetscrape", version, about)]
struct Cli {
    /// Config file (defaults to ./config.toml, then the user config dir)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Read the csrftoken cookie from a logged-in browser when none is configured
    #[arg(long, global = true)]
    browser_cookies: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Scrape a whole favorite list, e.g. `facebook-thirty-days`
    Favorites {
        slug: String,
        #[arg(long)]
        page_size: Option<usize>,
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Scrape the problem list
    Problems {
        #[arg(long, default_value_t = 0)]
        skip: usize,
        #[arg(long, default_value_t = 50)]
        limit: usize,
        /// Page through the whole list instead of a single batch
        #[arg(long)]
        all: bool,
        /// Also fetch details for the first N problems
        #[arg(long, default_value_t = 0)]
        details: usize,
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Fetch one problem's details
    Detail {
        slug: String,
        /// Print the problem statement as text
        #[arg(long)]
        print: bool,
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Suggest a few unsolved problems from a saved favorite list
    Pick {
        #[arg(long)]
        snapshot: Option<PathBuf>,
        #[arg(long)]
        solved: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    logger::init();

    let cli = Cli::parse();
    let mut config = Config::load(cli.config.as_deref())?;

    match cli.command {
        Command::Favorites {
            slug,
            page_size,
            out,
        } => {
            let app = App::connect(&mut config, cli.browser_cookies)?;
            app.favorites(&slug, page_size, out).await?;
        }
        Command::Problems {
            skip,
            limit,
            all,
            details,
            out,
        } => {
            let app = App::connect(&mut config, cli.browser_cookies)?;
            app.problems(skip, limit, all, details, out).await?;
        }
        Command::Detail { slug, print, out } => {
            let app = App::connect(&mut config, cli.browser_cookies)?;
            app.detail(&slug, print, out).await?;
        }
        Command::Pick { snapshot, solved } => {
            app::pick(&config.scraper, snapshot.as_deref(), solved.as_deref());
        }
    }

    Ok(())
}
