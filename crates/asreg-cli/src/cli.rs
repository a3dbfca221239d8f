use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "asreg",
    about = "Asset registry: run contract verbs against a local ledger file",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Ledger state file. Overrides `state_path` from the config file.
    #[arg(long, global = true)]
    pub state: Option<PathBuf>,

    /// Config file. Defaults to `asreg.toml` when it exists.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Transaction timestamp in milliseconds since the epoch.
    /// Defaults to the current time.
    #[arg(long, global = true, allow_hyphen_values = true)]
    pub timestamp: Option<i64>,

    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[arg(long, global = true, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Clone, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand)]
pub enum Command {
    /// Store a seed and reset the item index
    Init(InitArgs),
    /// Run a state-changing verb and commit its writes
    Invoke(CallArgs),
    /// Run a read-only verb
    Query(CallArgs),
    /// List every indexed item
    Items,
    /// Check items against the index
    Audit,
}

#[derive(Args)]
pub struct InitArgs {
    #[arg(allow_hyphen_values = true)]
    pub seed: String,
}

#[derive(Args)]
pub struct CallArgs {
    /// Function name, e.g. `init_item`
    pub function: String,
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    pub args: Vec<String>,
}
