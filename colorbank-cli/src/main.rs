//! colorbank CLI - color CSV ingestion service
//!
//! - `serve`: run the HTTP API (`POST /write-objects/`, `GET /read-objects/`)
//! - `import`: ingest a local file with the same rules as an upload
//! - `list`: print one page of stored colors as JSON

use anyhow::Result;
use clap::{Parser, Subcommand};

mod commands;
mod tracing_setup;

#[derive(Parser, Debug)]
#[command(
    name = "colorbank",
    author,
    version,
    about = "Store colors from semicolon-delimited CSV files and page over them"
)]
struct Cli {
    /// Enable debug logging
    #[arg(long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the HTTP API server
    Serve(commands::serve::ServeArgs),
    /// Ingest a local color file into the store
    Import(commands::import::ImportArgs),
    /// Print a page of stored colors as JSON
    List(commands::list::ListArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    // A missing .env is normal; anything else is worth a warning once tracing is up.
    let dotenv = dotenvy::dotenv();

    let cli = Cli::parse();
    tracing_setup::init(&tracing_setup::TracingConfig { debug: cli.debug })?;

    if let Err(e) = dotenv {
        if !e.not_found() {
            tracing::warn!("failed to load .env: {}", e);
        }
    }

    match cli.command {
        Commands::Serve(args) => commands::run_serve(args).await?,
        Commands::Import(args) => commands::run_import(args).await?,
        Commands::List(args) => commands::run_list(args).await?,
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use colorbank_server::CommitMode;

    #[test]
    fn parses_store_overrides() {
        let cli = Cli::try_parse_from([
            "colorbank",
            "list",
            "--page",
            "-1",
            "--page-size",
            "10",
            "--commit-mode",
            "atomic",
        ])
        .unwrap();

        let Commands::List(args) = cli.command else {
            panic!("expected list command");
        };
        assert_eq!(args.page, -1);
        assert_eq!(args.store.page_size, Some(10));
        assert_eq!(args.store.commit_mode, Some(CommitMode::Atomic));
    }

    #[test]
    fn rejects_unknown_commit_mode() {
        let result = Cli::try_parse_from(["colorbank", "import", "x.csv", "--commit-mode", "maybe"]);
        assert!(result.is_err());
    }

    #[test]
    fn serve_defaults_to_port_5000() {
        let cli = Cli::try_parse_from(["colorbank", "serve"]).unwrap();
        let Commands::Serve(args) = cli.command else {
            panic!("expected serve command");
        };
        assert_eq!(args.bind.port(), 5000);
    }
}
