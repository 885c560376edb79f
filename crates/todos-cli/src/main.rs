use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use todos_core::todo::Visibility;

mod commands;
mod render;
mod shell;
mod telemetry;

#[derive(Parser)]
#[command(name = "todos")]
#[command(about = "todos - a to-do list backed by a GraphQL service", long_about = None)]
struct Cli {
    /// Directory holding config.toml (defaults to the platform config dir)
    #[arg(long, global = true, value_name = "DIR")]
    config_dir: Option<PathBuf>,

    /// Log debug output to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List todos, newest first
    List {
        /// Keep todos whose title or body contains this text
        #[arg(short, long, default_value = "")]
        search: String,
        /// all, completed or incomplete
        #[arg(short, long, default_value = "all")]
        filter: Visibility,
    },
    /// Create a todo
    Add {
        #[arg(short, long)]
        title: String,
        #[arg(short, long)]
        body: String,
    },
    /// Change the title and/or body of a todo
    Edit {
        id: String,
        #[arg(short, long)]
        title: Option<String>,
        #[arg(short, long)]
        body: Option<String>,
    },
    /// Mark a todo completed
    Done { id: String },
    /// Mark a todo incomplete
    Undone { id: String },
    /// Delete a todo
    Delete { id: String },
    /// Delete several todos with one request
    DeleteMany {
        #[arg(required = true)]
        ids: Vec<String>,
    },
    /// Start the interactive shell
    Shell,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    telemetry::init(cli.verbose);

    let mut store = commands::open_store(cli.config_dir.as_deref()).await?;

    match cli.command {
        Commands::List { search, filter } => commands::todo::list(&mut store, search, filter),
        Commands::Add { title, body } => commands::todo::add(&mut store, title, body).await?,
        Commands::Edit { id, title, body } => {
            commands::todo::edit(&mut store, &id, title, body).await?
        }
        Commands::Done { id } => commands::todo::set_completed(&mut store, &id, true).await?,
        Commands::Undone { id } => commands::todo::set_completed(&mut store, &id, false).await?,
        Commands::Delete { id } => commands::todo::delete(&mut store, &id).await?,
        Commands::DeleteMany { ids } => commands::todo::delete_many(&mut store, &ids).await?,
        Commands::Shell => shell::run(store).await?,
    }

    Ok(())
}
