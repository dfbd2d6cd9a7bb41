//! Main entry point for the rkyv CLI application.
//!
//! `create` and `info` are backed by the library; the remaining commands are
//! declared but not implemented yet.

use anyhow::{Context, Result, bail};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use rkyvfile::cli::{Command, CreateArgs, InfoArgs};
use rkyvfile::{Cli, create_archive, open_archive, read_inputs};

fn main() -> Result<()> {
    let cli = Cli::parse();

    // RUST_LOG takes precedence over -v/-q
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(cli.log_filter()));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Command::Create(args) => create(args),
        Command::Info(args) => info(args),
        Command::Update => not_implemented("update"),
        Command::Extract => not_implemented("extract"),
        Command::List => not_implemented("list"),
        Command::Scan => not_implemented("scan"),
    }
}

fn create(args: CreateArgs) -> Result<()> {
    let inputs = read_inputs(&args.files)?;
    let (archive, path) = create_archive(inputs, &args.dir, &args.tags, &args.search)
        .context("could not create .rkyv file")?;

    tracing::debug!(path = %path.display(), "archive written");
    println!("Created rkyv file: {}", archive.file_name());
    Ok(())
}

fn info(args: InfoArgs) -> Result<()> {
    let archive = open_archive(&args.file)?;

    let json = if args.pretty {
        serde_json::to_string_pretty(&archive)
    } else {
        serde_json::to_string(&archive)
    }
    .context("could not marshal json")?;

    println!("{}", json);
    Ok(())
}

fn not_implemented(command: &str) -> Result<()> {
    bail!("`{}` is not implemented yet", command)
}
