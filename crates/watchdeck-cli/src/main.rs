use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;

mod commands;
mod logging;
mod output;

#[derive(Parser)]
#[command(name = "watchdeck")]
#[command(about = "Watchdeck - keep track of the movies you want to watch")]
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
    /// Bulk-import movies from a CSV file or a pasted id list
    #[command(long_about = "Bulk-import movies into the collection. Pass a CSV file whose header \
names an id column (\"id\" or \"The Movie Database Id\", optionally \"watched\" and \"favourite\"), \
or --ids with a comma-separated list of TMDB ids. Press Ctrl-C to stop the run; movies resolved \
up to that point are kept.")]
    Import {
        /// CSV file (first line is the header row)
        file: Option<PathBuf>,

        /// Comma-separated TMDB ids, instead of a file
        #[arg(long, value_name = "LIST", conflicts_with = "file")]
        ids: Option<String>,
    },

    /// Search the catalog by title
    Search {
        /// Title to search for
        query: String,
    },

    /// Add a movie to the collection by TMDB id
    Add {
        /// TMDB id
        id: String,
    },

    /// Remove a movie from the collection
    Remove {
        /// TMDB id
        id: String,
    },

    /// Toggle the watched flag (adds the movie when it is not tracked yet)
    Watched {
        /// TMDB id
        id: String,
    },

    /// Toggle the favourite flag
    Favourite {
        /// TMDB id
        id: String,
    },

    /// Show the collection
    List {
        /// Only watched movies
        #[arg(long, action = ArgAction::SetTrue)]
        watched: bool,

        /// Only favourites
        #[arg(long, action = ArgAction::SetTrue)]
        favourites: bool,
    },

    /// Configure the TMDB API key
    Config {
        /// TMDB API key (prompts when omitted)
        #[arg(long)]
        api_key: Option<String>,
    },
}

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();

    logging::init_logging(cli.verbose, cli.quiet).map_err(|e| color_eyre::eyre::eyre!("{}", e))?;

    let output = output::Output::new(cli.output, cli.quiet);

    match cli.command {
        Commands::Import { file, ids } => commands::import::run_import(file, ids, &output).await,
        Commands::Search { query } => commands::search::run_search(&query, &output).await,
        Commands::Add { id } => commands::movie::run_add(&id, &output).await,
        Commands::Remove { id } => commands::movie::run_remove(&id, &output),
        Commands::Watched { id } => commands::movie::run_watched(&id, &output).await,
        Commands::Favourite { id } => commands::movie::run_favourite(&id, &output),
        Commands::List {
            watched,
            favourites,
        } => commands::list::run_list(watched, favourites, &output),
        Commands::Config { api_key } => commands::config::run_config(api_key, &output),
    }
}
