use std::path::PathBuf;

use clap::builder::NonEmptyStringValueParser;
use clap::{Parser, Subcommand};

/// mongit: database snapshots stored as git commits
#[derive(Parser, Debug)]
#[command(
    name = "mongit",
    version,
    about = "Snapshot and restore a MongoDB database with git commits.",
    long_about = None,
    arg_required_else_help = true
)]
pub struct Cli {
    /// Run mongodump/mongorestore inside this Docker container
    #[arg(
        long,
        global = true,
        value_name = "container",
        value_parser = NonEmptyStringValueParser::new()
    )]
    pub docker: Option<String>,

    /// Connection string passed to mongodump/mongorestore as --uri
    #[arg(
        long,
        global = true,
        value_name = "uri",
        value_parser = NonEmptyStringValueParser::new()
    )]
    pub uri: Option<String>,

    /// Project config file (defaults to ./.mongit.json when present)
    #[arg(long, global = true, value_name = "path")]
    pub config: Option<PathBuf>,

    /// Log every external command
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Take the "initial" snapshot
    Init,

    /// Create and switch to a git branch, then snapshot it as "<name>-initial"
    Branch {
        /// Branch name
        name: String,
    },

    /// Dump the database and commit it under a label
    Snapshot {
        /// Snapshot label
        label: String,
    },

    /// Check out a labeled snapshot and restore it into the database
    Use {
        /// Snapshot label
        label: String,
    },

    /// List labeled snapshots reachable from HEAD
    List,

    #[command(external_subcommand)]
    Other(Vec<String>),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "mongit",
            "snapshot",
            "day1",
            "--docker",
            "mongo",
            "--uri",
            "mongodb://x",
        ])
        .unwrap();
        assert_eq!(cli.docker.as_deref(), Some("mongo"));
        assert_eq!(cli.uri.as_deref(), Some("mongodb://x"));
        assert!(matches!(cli.command, Commands::Snapshot { ref label } if label == "day1"));
    }

    #[test]
    fn empty_container_or_uri_is_rejected() {
        assert!(Cli::try_parse_from(["mongit", "--docker", "", "init"]).is_err());
        assert!(Cli::try_parse_from(["mongit", "init", "--docker="]).is_err());
        assert!(Cli::try_parse_from(["mongit", "--uri", "", "init"]).is_err());
    }

    #[test]
    fn unknown_command_is_captured() {
        let cli = Cli::try_parse_from(["mongit", "rollback", "day1"]).unwrap();
        match cli.command {
            Commands::Other(args) => assert_eq!(args, vec!["rollback", "day1"]),
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn use_requires_label() {
        assert!(Cli::try_parse_from(["mongit", "use"]).is_err());
    }
}
