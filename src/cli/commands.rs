use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(name = "tl", about = concat!("timeline v", env!("CARGO_PKG_VERSION"), " - tagged records in a plain CSV file"), version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Output as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Data file (default: store.file from config, else timeline.csv)
    #[arg(short = 'f', long = "file", global = true)]
    pub file: Option<PathBuf>,

    /// Config file (default: ./timeline.toml, then the user config dir)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List records in file order
    List(ListArgs),
    /// Search key, value and tags (case-insensitive)
    Search(SearchArgs),
    /// Show one record
    Show(KeyArgs),
    /// Append a record
    Add(AddArgs),
    /// Change a record in place
    Update(UpdateArgs),
    /// Delete a record
    Delete(KeyArgs),
    /// Print a record in clipboard format
    Copy(KeyArgs),
    /// Report malformed rows, duplicate keys and blank keys
    Check,
    /// Rewrite the data file in canonical form
    Fmt,
    /// View or manage the recovery log
    Recovery(RecoveryCmd),
}

// ---------------------------------------------------------------------------
// Read command args
// ---------------------------------------------------------------------------

#[derive(Args)]
pub struct ListArgs {
    /// Only records matching this term
    #[arg(long)]
    pub search: Option<String>,
}

#[derive(Args)]
pub struct SearchArgs {
    /// Search term (substring, case-insensitive)
    pub term: String,
}

#[derive(Args)]
pub struct KeyArgs {
    /// Record key (exact, case-sensitive)
    pub key: String,
}

// ---------------------------------------------------------------------------
// Write command args
// ---------------------------------------------------------------------------

#[derive(Args)]
pub struct AddArgs {
    /// Record key (must be unique)
    pub key: String,
    /// Value text
    #[arg(long, default_value = "")]
    pub value: String,
    /// Tags text, e.g. "#Founding,#Law"
    #[arg(long, default_value = "")]
    pub tags: String,
}

#[derive(Args)]
pub struct UpdateArgs {
    /// Key of the record to change
    pub key: String,
    /// New key
    #[arg(long = "key", id = "new_key")]
    pub new_key: Option<String>,
    /// New value
    #[arg(long)]
    pub value: Option<String>,
    /// New tags
    #[arg(long)]
    pub tags: Option<String>,
}

// ---------------------------------------------------------------------------
// Recovery log
// ---------------------------------------------------------------------------

#[derive(Args)]
pub struct RecoveryCmd {
    #[command(subcommand)]
    pub action: Option<RecoveryAction>,
    /// Maximum number of entries to show (default: 10)
    #[arg(long)]
    pub limit: Option<usize>,
}

#[derive(Subcommand)]
pub enum RecoveryAction {
    /// Remove old entries
    Prune(RecoveryPruneArgs),
    /// Print the path to the recovery log
    Path,
}

#[derive(Args)]
pub struct RecoveryPruneArgs {
    /// Remove all entries (default: only those older than 30 days)
    #[arg(long)]
    pub all: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn update_accepts_new_key_flag() {
        let cli = Cli::try_parse_from(["tl", "update", "old", "--key", "new", "--value", "v"])
            .unwrap();
        match cli.command {
            Some(Commands::Update(args)) => {
                assert_eq!(args.key, "old");
                assert_eq!(args.new_key.as_deref(), Some("new"));
                assert_eq!(args.value.as_deref(), Some("v"));
                assert!(args.tags.is_none());
            }
            _ => panic!("expected update"),
        }
    }

    #[test]
    fn global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["tl", "list", "-f", "x.csv", "--json"]).unwrap();
        assert!(cli.json);
        assert_eq!(cli.file, Some(PathBuf::from("x.csv")));
    }
}
