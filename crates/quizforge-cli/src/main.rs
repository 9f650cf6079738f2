//! quizforge CLI — author, store, and take multiple-choice quizzes.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "quizforge", version, about = "Build, store, and take quizzes")]
struct Cli {
    /// Config file path
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Quiz store file (overrides config and QUIZFORGE_STORE)
    #[arg(long, global = true)]
    store: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List stored quizzes
    List {
        /// Print the list as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show one quiz with its answer key
    Show {
        /// Quiz id
        #[arg(long)]
        id: String,
    },

    /// Check a draft file and report every problem
    Validate {
        /// Path to a .toml draft
        #[arg(long)]
        draft: PathBuf,
    },

    /// Commit a draft file as a new quiz
    Create {
        /// Path to a .toml draft
        #[arg(long)]
        draft: PathBuf,
    },

    /// Take a quiz
    Take {
        /// Quiz id
        #[arg(long)]
        id: String,

        /// Answers as option numbers, e.g. "2,1,4" (reads stdin if omitted)
        #[arg(long)]
        answers: Option<String>,
    },

    /// Create a starter config and example draft
    Init,
}

fn main() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("quizforge=info,quizforge_core=warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let store = cli.store;
    let config = cli.config;

    let result = match cli.command {
        Commands::List { json } => commands::list::execute(config, store, json),
        Commands::Show { id } => commands::show::execute(config, store, id),
        Commands::Validate { draft } => commands::validate::execute(draft),
        Commands::Create { draft } => commands::create::execute(config, store, draft),
        Commands::Take { id, answers } => commands::take::execute(config, store, id, answers),
        Commands::Init => commands::init::execute(),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
