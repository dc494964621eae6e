use clap::{ArgAction, Parser, Subcommand};
use commands::{clear, config, events, show, sync, watch_next, watchlist};
use watchnext_config::{Config, PathManager};

mod commands;
mod logging;
mod output;

#[derive(Parser)]
#[command(name = "watchnext")]
#[command(about = "Watch Next - Publish your catalog as home screen channels and keep the watch next row current")]
#[command(version)]
struct Cli {
    /// Enable verbose output (use multiple times for more verbosity: -v, -vv)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Output format
    #[arg(long, global = true, default_value = "human", value_enum)]
    output: output::OutputFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Publish the catalog as channels and reconcile them
    #[command(long_about = "Reconcile the provider's channels with the local catalog. Channels of removed categories are deleted, new categories are published, and existing channels gain, lose or refresh programs to match their category.")]
    Sync,
    /// Manage the watchlist
    Watchlist {
        #[command(subcommand)]
        cmd: WatchlistCommands,
    },
    /// Suggest a movie as the next one to watch
    WatchNext {
        /// Movie id
        movie: u64,
    },
    /// Record that playback of a movie paused
    #[command(long_about = "Put the movie in the watch next row as 'continue watching' and remember the playback position so it can be resumed.")]
    Continue {
        /// Movie id
        movie: u64,

        /// Playback position in milliseconds
        #[arg(long)]
        position: u64,
    },
    /// Record that a movie played to its end
    #[command(long_about = "Remove the movie from the watch next row and the watchlist. If the movie is part of a series, its successor is suggested as next.")]
    Finish {
        /// Movie id
        movie: u64,
    },
    /// Deliver a home screen notification
    Event {
        #[command(subcommand)]
        cmd: EventCommands,
    },
    /// Resolve a play-video link to a movie
    Open {
        /// Link such as watchnextcodelab://com.example.android.watchnextcodelab/playvideo/1
        uri: String,
    },
    /// Show the catalog, published channels and the watch next row
    Show,
    /// Clear published rows or local data
    #[command(long_about = "Delete everything published to the provider (--provider), the local catalog and id mappings (--store), or both (--all).")]
    Clear {
        /// Clear provider rows and local store
        #[arg(long, action = ArgAction::SetTrue)]
        all: bool,

        /// Delete every channel and watch next program
        #[arg(long, action = ArgAction::SetTrue)]
        provider: bool,

        /// Delete the local catalog, id mappings and playback positions
        #[arg(long, action = ArgAction::SetTrue)]
        store: bool,
    },
    /// Show or create the configuration file
    Config {
        #[command(subcommand)]
        cmd: ConfigCommands,
    },
}

#[derive(Subcommand)]
pub enum WatchlistCommands {
    /// Add a movie to the watchlist
    Add { movie: u64 },
    /// Remove a movie from the watchlist
    Remove { movie: u64 },
    /// List the movies in the watchlist
    Show,
}

#[derive(Subcommand)]
pub enum EventCommands {
    /// The user dismissed a watch next program
    BrowsableDisabled {
        /// Watch next program id
        watch_next_program: u64,
    },
    /// The user added a channel program to the watch next row
    AddedToWatchNext {
        /// Preview program id
        program: u64,
    },
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Show the effective configuration
    Show,
    /// Write a configuration file with default values
    Init {
        /// Overwrite an existing file
        #[arg(long, action = ArgAction::SetTrue)]
        force: bool,
    },
}

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();

    let path_manager = PathManager::default();
    let config = Config::load_or_default(&path_manager)
        .map_err(|e| color_eyre::eyre::eyre!("Failed to load configuration: {}", e))?;

    logging::init_logging(cli.verbose, cli.quiet, config.logging.as_ref())
        .map_err(|e| color_eyre::eyre::eyre!("{}", e))?;

    let output = output::Output::new(cli.output, cli.quiet);

    match cli.command {
        Commands::Sync => sync::run_sync(&config, &path_manager, &output).await,
        Commands::Watchlist { cmd } => watchlist::run_watchlist(cmd, &config, &path_manager, &output).await,
        Commands::WatchNext { movie } => watch_next::run_watch_next(movie, &config, &path_manager, &output).await,
        Commands::Continue { movie, position } => {
            watch_next::run_continue(movie, position, &config, &path_manager, &output).await
        }
        Commands::Finish { movie } => watch_next::run_finish(movie, &config, &path_manager, &output).await,
        Commands::Event { cmd } => events::run_event(cmd, &config, &path_manager, &output).await,
        Commands::Open { uri } => watch_next::run_open(&uri, &config, &path_manager, &output).await,
        Commands::Show => show::run_show(&config, &path_manager, &output).await,
        Commands::Clear { all, provider, store } => clear::run_clear(all, provider, store, &config, &path_manager, &output).await,
        Commands::Config { cmd } => config::run_config(cmd, &config, &path_manager, &output).await,
    }
}
