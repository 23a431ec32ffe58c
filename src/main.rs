//! difflame - visualise git line changes as a flame graph.
//!
//! Usage:
//!   difflame [serve] [-d DIR]        Serve live diffs of a repository
//!   difflame servefiles FILE...      Serve previously saved trees
//!   difflame save [-d DIR] [FILE]    Save a diff tree as JSON
//!   difflame --help                  Show help

use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};
use color_eyre::eyre::{Context, Result};
use tracing_subscriber::EnvFilter;

use difflame_core::{write_tree, write_tree_to, DEFAULT_FROM_REV, DEFAULT_TO_REV};
use difflame_git::{ChangeSource, DiffBackend, RevisionRange};
use difflame_server::{ServeMode, ServerConfig};

#[derive(Parser)]
#[command(
    name = "difflame",
    version,
    about = "Visualise differences using flame graphs",
    long_about = "difflame sizes every file and directory by the lines changed between two \
                  revisions and renders the result as a flame graph.\n\n\
                  Running `difflame` with no subcommand is the same as `difflame serve`.",
    args_conflicts_with_subcommands = true
)]
struct Cli {
    #[command(flatten)]
    serve: ServeArgs,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Serve diff information from a repository (default)
    Serve(ServeArgs),

    /// Serve diff information from saved files
    #[command(name = "servefiles")]
    ServeFiles(ServeFilesArgs),

    /// Save diff information to a file
    Save(SaveArgs),
}

#[derive(Args)]
struct ListenArgs {
    /// Address to listen on
    #[arg(short, long, default_value = "localhost")]
    address: String,

    /// Port to listen on
    #[arg(short, long, default_value = "1234")]
    port: u16,
}

#[derive(Args)]
struct ServeArgs {
    /// Directory to look for a repository in
    #[arg(short, long, default_value = ".", value_parser = parse_directory)]
    directory: PathBuf,

    /// How line counts are computed (libgit2 or git)
    #[arg(long, default_value_t = DiffBackend::Libgit2)]
    backend: DiffBackend,

    #[command(flatten)]
    listen: ListenArgs,
}

#[derive(Args)]
struct ServeFilesArgs {
    /// Saved JSON trees to serve
    #[arg(required = true, num_args = 1.., value_parser = parse_readable_file)]
    files: Vec<PathBuf>,

    #[command(flatten)]
    listen: ListenArgs,
}

#[derive(Args)]
struct SaveArgs {
    /// Directory to look for a repository in
    #[arg(short, long, default_value = ".", value_parser = parse_directory)]
    directory: PathBuf,

    /// Revision to start from
    #[arg(short, long, default_value = DEFAULT_FROM_REV)]
    from: String,

    /// Revision to end on
    #[arg(short, long, default_value = DEFAULT_TO_REV)]
    to: String,

    /// How line counts are computed (libgit2 or git)
    #[arg(long, default_value_t = DiffBackend::Libgit2)]
    backend: DiffBackend,

    /// File to save to (defaults to stdout, also `-`)
    file: Option<PathBuf>,
}

fn main() -> Result<()> {
    color_eyre::install()?;
    init_logging();

    let cli = Cli::parse();

    match cli.command.unwrap_or(Command::Serve(cli.serve)) {
        Command::Serve(args) => run_serve(args),
        Command::ServeFiles(args) => run_serve_files(args),
        Command::Save(args) => run_save(args),
    }
}

/// Log to stderr so `save` can write JSON to stdout.
fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Serve live diffs.
fn run_serve(args: ServeArgs) -> Result<()> {
    let mode = ServeMode::diffs_with(&args.directory, args.backend);
    run_server(mode, args.listen)
}

/// Serve saved trees.
fn run_serve_files(args: ServeFilesArgs) -> Result<()> {
    let mode = ServeMode::files(args.files).context("Cannot serve files")?;
    run_server(mode, args.listen)
}

fn run_server(mode: ServeMode, listen: ListenArgs) -> Result<()> {
    let config = ServerConfig::builder()
        .address(listen.address)
        .port(listen.port)
        .mode(mode)
        .build()
        .context("Invalid server configuration")?;

    let runtime = tokio::runtime::Runtime::new().context("Failed to start async runtime")?;
    runtime
        .block_on(difflame_server::serve(config))
        .context("Server failed")
}

/// Save a diff tree to a file or stdout.
fn run_save(args: SaveArgs) -> Result<()> {
    let range = RevisionRange::builder()
        .from(args.from)
        .to(args.to)
        .build()
        .context("Invalid revision range")?;

    let source = ChangeSource::new(&args.directory).with_backend(args.backend);
    let tree = source
        .changes(&range)
        .with_context(|| format!("Failed to diff {range} in {}", args.directory.display()))?;

    match args.file.as_deref() {
        Some(path) if path != Path::new("-") => {
            write_tree(&tree, path)
                .with_context(|| format!("Failed to save {}", path.display()))?;
            tracing::info!(path = %path.display(), lines = tree.value(), "saved diff tree");
        }
        _ => {
            write_tree_to(&tree, std::io::stdout().lock()).context("Failed to write stdout")?;
        }
    }

    Ok(())
}

/// Accept only existing directories.
fn parse_directory(value: &str) -> std::result::Result<PathBuf, String> {
    let path = PathBuf::from(value);
    if path.is_dir() {
        Ok(path)
    } else {
        Err("expected a valid directory".to_string())
    }
}

/// Accept only files that can be opened for reading.
fn parse_readable_file(value: &str) -> std::result::Result<PathBuf, String> {
    let path = PathBuf::from(value);
    std::fs::File::open(&path)
        .map(|_| path)
        .map_err(|e| format!("can't open '{value}': {e}"))
}
