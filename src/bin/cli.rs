//! imgbot CLI
//!
//! Downloads images from one or more subreddits.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use imgbot::{
    models::{Config, SortMode},
    pipeline::{DownloadRequest, ImgBot},
};

/// imgbot - Subreddit Image Downloader
#[derive(Parser, Debug)]
#[command(name = "imgbot", version, about = "Download images from subreddits")]
struct Cli {
    /// Subreddit(s) to download from
    #[arg(required = true)]
    subreddits: Vec<String>,

    /// Path to the TOML configuration file
    #[arg(short, long, default_value = "imgbot.toml")]
    config: PathBuf,

    /// Path to the selector override file (default: from config)
    #[arg(long)]
    selectors: Option<PathBuf>,

    /// Sort order: hot, top, new, rising, controversial, tophour, topday,
    /// topweek, topmonth, topyear
    #[arg(short, long)]
    sort: Option<SortMode>,

    /// Number of posts per subreddit
    #[arg(short, long)]
    limit: Option<usize>,

    /// Download directory
    #[arg(short, long)]
    path: Option<PathBuf>,

    /// Skip album posts
    #[arg(long)]
    no_albums: bool,

    /// Skip gif posts
    #[arg(long)]
    no_gifs: bool,

    /// Include NSFW posts
    #[arg(long)]
    nsfw: bool,

    /// Reddit application client id
    #[arg(long, env = "REDDIT_CLIENT_ID", hide_env_values = true)]
    client_id: Option<String>,

    /// Reddit application client secret
    #[arg(long, env = "REDDIT_CLIENT_SECRET", hide_env_values = true)]
    client_secret: Option<String>,

    /// User-Agent sent to the Reddit API
    #[arg(long, env = "REDDIT_USER_AGENT")]
    user_agent: Option<String>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

/// Initialize logging based on verbosity flag.
fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp_secs()
        .init();
}

/// Apply command-line overrides on top of the file configuration.
fn apply_overrides(config: &mut Config, cli: &Cli) {
    if let Some(path) = &cli.selectors {
        config.selectors.path = path.clone();
    }
    if let Some(path) = &cli.path {
        config.download.path = path.clone();
    }
    if let Some(sort) = cli.sort {
        config.download.sort = sort;
    }
    if let Some(limit) = cli.limit {
        config.download.limit = limit;
    }
    if cli.no_albums {
        config.download.albums = false;
    }
    if cli.no_gifs {
        config.download.gifs = false;
    }
    if cli.nsfw {
        config.download.nsfw = true;
    }
    if let Some(id) = &cli.client_id {
        config.reddit.client_id = id.clone();
    }
    if let Some(secret) = &cli.client_secret {
        config.reddit.client_secret = secret.clone();
    }
    if let Some(agent) = &cli.user_agent {
        config.reddit.user_agent = agent.clone();
    }
}

/// Main entry point for the CLI application.
#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let mut config = if cli.config.is_file() {
        Config::load_or_default(&cli.config)
    } else {
        log::debug!("No config file at {}, using defaults", cli.config.display());
        Config::default()
    };
    apply_overrides(&mut config, &cli);

    if let Err(e) = config.validate() {
        log::error!("[-] {}", e);
        return ExitCode::FAILURE;
    }

    let request = DownloadRequest::from_config(&cli.subreddits, &config.download);
    let bot = ImgBot::with_config(config);

    let summary = bot.download(&request).await;
    log::info!(
        "Done: {} downloaded, {} skipped, {} failed",
        summary.downloaded,
        summary.skipped,
        summary.failed
    );

    ExitCode::SUCCESS
}
