use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "rkyv")]
#[command(version)]
#[command(about = "Bundle files and their metadata into .rkyv archives", long_about = None)]
#[command(after_help = "Examples:\n  \
  rkyv create report.pdf photo.png -t work     create <uuid>.rkyv in the current directory\n  \
  rkyv info 0b6f...e1.rkyv --pretty            show the metadata of an archive")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short = 'v', long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Only log errors
    #[arg(short = 'q', long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Create .rkyv file
    Create(CreateArgs),
    /// Update .rkyv file
    Update,
    /// Extract files from .rkyv file
    Extract,
    /// Show details about .rkyv file
    Info(InfoArgs),
    /// List all indexed .rkyv files
    List,
    /// Scan directories for .rkyv files then index them
    Scan,
}

#[derive(Args, Debug)]
pub struct CreateArgs {
    /// Files to archive
    #[arg(value_name = "FILES")]
    pub files: Vec<PathBuf>,

    /// Directory to write the archive into
    #[arg(short = 'd', long, value_name = "DIR", default_value = ".")]
    pub dir: PathBuf,

    /// Tag to attach to the archive (repeatable)
    #[arg(short = 't', long = "tag", value_name = "TAG")]
    pub tags: Vec<String>,

    /// Search term to attach to the archive (repeatable)
    #[arg(short = 's', long = "search", value_name = "TERM")]
    pub search: Vec<String>,
}

#[derive(Args, Debug)]
pub struct InfoArgs {
    /// .rkyv file to inspect
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Indent the JSON output
    #[arg(long)]
    pub pretty: bool,
}

impl Cli {
    /// Default log filter implied by `-v`/`-q`
    pub fn log_filter(&self) -> &'static str {
        if self.quiet {
            return "error";
        }
        match self.verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_create() {
        let cli = Cli::parse_from([
            "rkyv", "create", "a.txt", "b.png", "-t", "x", "--tag", "y", "-s", "z", "-vv",
        ]);
        assert_eq!(cli.log_filter(), "debug");
        let Command::Create(args) = cli.command else {
            panic!("expected create");
        };
        assert_eq!(args.files, [PathBuf::from("a.txt"), PathBuf::from("b.png")]);
        assert_eq!(args.dir, PathBuf::from("."));
        assert_eq!(args.tags, ["x", "y"]);
        assert_eq!(args.search, ["z"]);
    }

    #[test]
    fn parses_info() {
        let cli = Cli::parse_from(["rkyv", "-q", "info", "x.rkyv", "--pretty"]);
        assert_eq!(cli.log_filter(), "error");
        assert!(matches!(cli.command, Command::Info(InfoArgs { pretty: true, .. })));
    }

    #[test]
    fn verify_command() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
