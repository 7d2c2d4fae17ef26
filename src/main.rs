use clap::{Parser, Subcommand};

mod cli;
mod config;
mod core;
mod error;
mod services;
mod utils;

use cli::core::{AlbumsArgs, CircleArgs, SongsArgs};
use cli::management::ConfigArgs;
use cli::operations::{CrawlArgs, LyricsArgs, SongArgs};
use config::Config;
use error::{Result, TdbError};
use services::ServiceFactory;

#[derive(Parser)]
#[command(name = "touhoudb")]
#[command(about = "Walk TouhouDB circles, albums and songs, with lyrics from the Touhou Wiki")]
#[command(version)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Config file path (optional)
    #[arg(short, long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve a circle by name or ID
    Circle(CircleArgs),

    /// List a circle's albums with their songs
    Albums(AlbumsArgs),

    /// Fetch details (and lyrics) for every song on an album
    Songs(SongsArgs),

    /// Resolve a single song by name or ID
    Song(SongArgs),

    /// Look up raw wiki lyrics for a song title
    Lyrics(LyricsArgs),

    /// Walk a circle's albums, songs and lyrics
    Crawl(CrawlArgs),

    /// Show configuration
    Config(ConfigArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    utils::logging::init_logging(cli.verbose).map_err(TdbError::Internal)?;

    // Load configuration
    let config = Config::load(cli.config.as_deref())?;

    // Initialize services
    let services = ServiceFactory::new(config);

    let result = match cli.command {
        Commands::Circle(args) => cli::core::circle::execute(args, &services).await,
        Commands::Albums(args) => cli::core::albums::execute(args, &services).await,
        Commands::Songs(args) => cli::core::songs::execute(args, &services).await,
        Commands::Song(args) => cli::operations::song::execute(args, &services).await,
        Commands::Lyrics(args) => cli::operations::lyrics::execute(args, &services).await,
        Commands::Crawl(args) => cli::operations::crawl::execute(args, &services).await,
        Commands::Config(args) => cli::management::config::execute(args, &services.config()).await,
    };

    result.map_err(TdbError::Internal)
}
