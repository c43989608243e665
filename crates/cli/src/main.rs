use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Result;
use clap::{Parser, Subcommand};
use pocket_classroom_core::env_non_empty;
use pocket_classroom_service::{LibraryService, ProgressService};
use pocket_classroom_storage::{Storage, StoreBackend};
use tracing_subscriber::EnvFilter;

mod commands;

use commands::CapsuleArgs;

#[derive(Parser)]
#[command(name = "pocket-classroom", version)]
#[command(about = "Offline study capsules: notes, flashcards and quizzes", long_about = None)]
struct Cli {
    /// Database file (overrides POCKET_CLASSROOM_DB)
    #[arg(long, global = true)]
    db: Option<PathBuf>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List capsules with best score and known cards
    List {
        #[arg(long)]
        json: bool,
    },
    /// Print a capsule
    Show {
        id: String,
        #[arg(long)]
        json: bool,
    },
    /// Author a new capsule
    New {
        #[command(flatten)]
        capsule: CapsuleArgs,
    },
    /// Edit a capsule; omitted flags keep their stored values
    Edit {
        id: String,
        #[command(flatten)]
        capsule: CapsuleArgs,
    },
    /// Import an exported capsule file under a new id
    Import { file: PathBuf },
    /// Write a capsule to `<title>.json`
    Export {
        id: String,
        #[arg(short, long, default_value = ".")]
        out: PathBuf,
    },
    /// Delete a capsule together with its progress
    Delete { id: String },
    /// Show best score and known flashcards
    Progress { id: String },
    /// Mark a flashcard (1-based) as known
    Known { id: String, card: usize },
    /// Mark a flashcard (1-based) as not known
    Unknown { id: String, card: usize },
    /// Take a capsule's quiz, answering A-D on stdin
    Quiz {
        id: String,
        /// Skip the pause after each answer
        #[arg(long)]
        no_delay: bool,
    },
    /// Report drift between the index and stored capsules
    Check,
}

pub(crate) fn get_db_path(cli_override: Option<PathBuf>) -> PathBuf {
    cli_override
        .or_else(|| env_non_empty("POCKET_CLASSROOM_DB").map(PathBuf::from))
        .unwrap_or_else(|| {
            dirs::data_local_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join("pocket-classroom")
                .join("classroom.db")
        })
}

pub(crate) fn ensure_db_dir(db_path: &Path) -> Result<()> {
    if let Some(parent) = db_path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)?;
    }
    Ok(())
}

pub(crate) struct Services {
    pub library: LibraryService,
    pub progress: ProgressService,
}

fn open_services(db_path: &Path) -> Result<Services> {
    ensure_db_dir(db_path)?;
    let backend = StoreBackend::open_sqlite(db_path)?;
    tracing::debug!(path = %db_path.display(), backend = backend.kind(), "Opened store");
    let storage = Arc::new(Storage::new(backend));
    Ok(Services {
        library: LibraryService::new(Arc::clone(&storage)),
        progress: ProgressService::new(storage),
    })
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let services = open_services(&get_db_path(cli.db))?;

    match cli.command {
        Commands::List { json } => commands::library::run_list(&services, json),
        Commands::Show { id, json } => commands::library::run_show(&services, &id, json),
        Commands::New { capsule } => commands::library::run_new(&services, capsule),
        Commands::Edit { id, capsule } => commands::library::run_edit(&services, &id, capsule),
        Commands::Import { file } => commands::library::run_import(&services, &file),
        Commands::Export { id, out } => commands::library::run_export(&services, &id, &out),
        Commands::Delete { id } => commands::library::run_delete(&services, &id),
        Commands::Check => commands::library::run_check(&services),
        Commands::Progress { id } => commands::progress::run_progress(&services, &id),
        Commands::Known { id, card } => commands::progress::run_set_known(&services, &id, card, true),
        Commands::Unknown { id, card } => {
            commands::progress::run_set_known(&services, &id, card, false)
        },
        Commands::Quiz { id, no_delay } => {
            let stdin = std::io::stdin();
            let stdout = std::io::stdout();
            commands::quiz::run_quiz(&services, &id, no_delay, &mut stdin.lock(), &mut stdout.lock())
        },
    }
}
