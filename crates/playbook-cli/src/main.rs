mod cmd;
mod output;
mod root;

use clap::{Parser, Subcommand};
use cmd::{exercise::ExerciseSubcommand, respond::RespondSubcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "playbook",
    about = "Guided exercises, multi-modal responses, and completion tracking",
    version,
    propagate_version = true
)]
struct Cli {
    /// Project root (default: auto-detect from .playbook/ or .git/)
    #[arg(long, global = true, env = "PLAYBOOK_ROOT")]
    root: Option<PathBuf>,

    /// Output as JSON
    #[arg(long, global = true, short = 'j')]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize playbook storage in the current project
    Init,

    /// Author and inspect exercise templates
    Exercise {
        #[command(subcommand)]
        subcommand: ExerciseSubcommand,
    },

    /// Edit the response to an exercise
    Respond {
        #[command(subcommand)]
        subcommand: RespondSubcommand,
    },

    /// Show completion progress for one exercise, or all of them
    Progress {
        /// Exercise slug (omit to list every exercise)
        slug: Option<String>,

        /// Treat a modality as having a file queued for upload (repeatable).
        /// Queued content shows in the progress bar but never unlocks
        /// completion.
        #[arg(long, value_name = "MODALITY")]
        queued: Vec<String>,
    },

    /// Mark an exercise's response as completed
    Complete { slug: String },

    /// Reopen a completed response for editing
    Reopen { slug: String },
}

fn main() {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .with_target(false)
        .init();

    let root = root::resolve_root(cli.root.as_deref());

    let result = match cli.command {
        Commands::Init => cmd::init::run(&root),
        Commands::Exercise { subcommand } => cmd::exercise::run(&root, subcommand, cli.json),
        Commands::Respond { subcommand } => cmd::respond::run(&root, subcommand, cli.json),
        Commands::Progress { slug, queued } => {
            cmd::progress::run(&root, slug.as_deref(), &queued, cli.json)
        }
        Commands::Complete { slug } => cmd::progress::complete(&root, &slug, cli.json),
        Commands::Reopen { slug } => cmd::progress::reopen(&root, &slug, cli.json),
    };

    if let Err(e) = result {
        // Print the full error chain (anyhow's alternate Display)
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}
