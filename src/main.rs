use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use console::Emoji;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::Level;

use ghostcast::config::{DEFAULT_BASE_URL, DEFAULT_OUTPUT_DIR, DEFAULT_TAG};
use ghostcast::server::{self, AppState};
use ghostcast::{
    FeedConfig, ProgressEvent, ProgressReporter, ReqwestClient, SharedProgressReporter,
    TracingReporter, generate_feed, read_channel_config,
};

// Emoji with fallback for terminals without Unicode support
static MICROPHONE: Emoji<'_, '_> = Emoji("🎙️  ", "");
static SEARCH: Emoji<'_, '_> = Emoji("🔍 ", "[~] ");
static HEADPHONES: Emoji<'_, '_> = Emoji("🎧 ", "[i] ");
static SKIP: Emoji<'_, '_> = Emoji("⚠️  ", "[-] ");
static PARTY: Emoji<'_, '_> = Emoji("🎉 ", "[*] ");
static FOLDER: Emoji<'_, '_> = Emoji("📁 ", "");

/// Generate a podcast RSS feed from episodes published on a Ghost blog
#[derive(Parser, Debug)]
#[command(name = "ghostcast")]
#[command(about = "Generate a podcast RSS feed from episodes published on a Ghost blog")]
#[command(version)]
struct Args {
    /// Root URL of the Ghost site
    #[arg(long, env = "GHOST_API_URL", default_value = DEFAULT_BASE_URL, global = true)]
    base_url: String,

    /// Ghost content API key
    #[arg(long, env = "GHOST_CONTENT_KEY", hide_env_values = true, global = true)]
    content_key: Option<String>,

    /// Tag selecting podcast posts
    #[arg(long, default_value = DEFAULT_TAG, global = true)]
    tag: String,

    /// Directory receiving podcast.xml
    #[arg(short, long, default_value = DEFAULT_OUTPUT_DIR, global = true)]
    output_dir: PathBuf,

    /// JSON file overriding the channel metadata
    #[arg(long, global = true)]
    channel: Option<PathBuf>,

    /// Content API request timeout in seconds
    #[arg(long, default_value = "30", global = true)]
    timeout: u64,

    /// Quiet mode - only log warnings and errors
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Log request details
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Regenerate the feed once and exit
    Generate,

    /// Listen for POST requests that regenerate the feed
    Serve {
        /// Address to listen on
        #[arg(long, default_value = "127.0.0.1:3000")]
        bind: SocketAddr,
    },
}

/// Progress reporter using an indicatif spinner for terminal output
struct SpinnerReporter {
    spinner: ProgressBar,
}

impl SpinnerReporter {
    fn new() -> Self {
        let style = ProgressStyle::default_spinner()
            .template("{spinner:.green} {wide_msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner());

        let spinner = ProgressBar::new_spinner();
        spinner.set_style(style);
        spinner.enable_steady_tick(Duration::from_millis(100));

        Self { spinner }
    }
}

impl ProgressReporter for SpinnerReporter {
    fn report(&self, event: ProgressEvent) {
        match event {
            ProgressEvent::FetchingPosts { url } => {
                self.spinner
                    .set_message(format!("{SEARCH}Fetching posts: {}", url.cyan()));
            }

            ProgressEvent::PostsReceived { count } => {
                self.spinner.set_message(format!(
                    "{HEADPHONES}{} posts received, building feed",
                    count.to_string().cyan()
                ));
            }

            ProgressEvent::EpisodeSkipped { title, reason } => {
                self.spinner.println(format!(
                    "  {SKIP}Skipping {} - {}",
                    title.yellow(),
                    reason.dimmed()
                ));
            }

            ProgressEvent::FeedBuilt { episodes, bytes } => {
                self.spinner.set_message(format!(
                    "Writing feed: {} episodes, {} bytes",
                    episodes.to_string().cyan(),
                    bytes
                ));
            }

            ProgressEvent::FeedWritten { .. } => {
                self.spinner.finish_and_clear();
            }
        }
    }
}

impl Drop for SpinnerReporter {
    // A failed run never sees FeedWritten; keep the spinner off the error output
    fn drop(&mut self) {
        if !self.spinner.is_finished() {
            self.spinner.finish_and_clear();
        }
    }
}

fn init_logging(quiet: bool, verbose: bool) {
    let level = if verbose {
        Level::DEBUG
    } else if quiet {
        Level::WARN
    } else {
        Level::INFO
    };

    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .init();
}

async fn run_generate(client: ReqwestClient, config: FeedConfig, quiet: bool) -> Result<()> {
    if !quiet {
        println!(
            "\n{}{} {}\n",
            MICROPHONE,
            "ghostcast".bold().magenta(),
            "- Podcast Feed Generator".dimmed()
        );
    }

    let reporter: SharedProgressReporter = if quiet {
        TracingReporter::shared()
    } else {
        Arc::new(SpinnerReporter::new())
    };

    let report = generate_feed(&client, &config, reporter)
        .await
        .context("Failed to generate podcast feed")?;

    if !quiet {
        println!(
            "{PARTY}{} {} episodes, {} skipped",
            "Feed generated:".bold().green(),
            report.episodes.to_string().green().bold(),
            report.skipped.to_string().yellow()
        );
        println!(
            "\n{FOLDER}Output: {} ({})\n",
            report.path.display().to_string().cyan(),
            report.content_hash.dimmed()
        );
    }

    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    init_logging(args.quiet, args.verbose);

    let mut config =
        FeedConfig::new(&args.base_url, args.content_key).context("Invalid configuration")?;
    config.tag = args.tag;
    config.output_dir = args.output_dir;
    config.timeout = Duration::from_secs(args.timeout);

    if let Some(path) = &args.channel {
        config.channel = read_channel_config(path).context("Invalid channel metadata")?;
    }

    let client =
        ReqwestClient::with_timeout(config.timeout).context("Failed to create HTTP client")?;

    match args.command {
        Command::Generate => run_generate(client, config, args.quiet).await,
        Command::Serve { bind } => server::serve(bind, AppState::new(client, config))
            .await
            .context("Rebuild server stopped"),
    }
}
