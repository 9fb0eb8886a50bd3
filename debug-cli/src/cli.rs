use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use crate::output::OutputFormat;
use crate::settings::Overrides;

/// Explain relationship-based authorization decisions
#[derive(Parser, Debug)]
#[command(name = "zanzibar-debug", version)]
#[command(about = "Reconstruct how a subject reaches a permission through an authorization model")]
pub struct Cli {
    /// Settings file (YAML, TOML or JSON)
    #[arg(short, long, env = "ZANZIBAR_DEBUG_CONFIG", global = true)]
    pub config: Option<PathBuf>,

    /// Authorization API base URL
    #[arg(long, global = true)]
    pub api_url: Option<String>,

    /// Store to query
    #[arg(long, global = true)]
    pub store_id: Option<String>,

    /// Last expansion level allowed to call the service
    #[arg(long, global = true)]
    pub max_depth: Option<u32>,

    /// Wall-clock budget for the whole expansion, in seconds
    #[arg(long, global = true)]
    pub deadline_secs: Option<u64>,

    /// Expand repeated usersets again instead of once per run
    #[arg(long, global = true)]
    pub no_dedupe: bool,

    /// Replay captured trees from a JSON fixture instead of calling the API
    #[arg(long, global = true)]
    pub fixture: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    pub json_logs: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Build the permission graph and the subject's path
    Explain {
        #[command(flatten)]
        query: QueryArgs,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Json)]
        format: OutputFormat,
    },
    /// Print the normalized edge sequence before path resolution
    Records {
        #[command(flatten)]
        query: QueryArgs,
    },
}

#[derive(Args, Debug, Clone)]
pub struct QueryArgs {
    /// Object holding the permission, e.g. document:1
    #[arg(long)]
    pub object: String,

    /// Relation to explain, e.g. viewer
    #[arg(long)]
    pub relation: String,

    /// Subject to trace, e.g. user:anne
    #[arg(long)]
    pub user: String,
}

impl Cli {
    pub fn overrides(&self) -> Overrides {
        Overrides {
            api_url: self.api_url.clone(),
            store_id: self.store_id.clone(),
            max_depth: self.max_depth,
            deadline_secs: self.deadline_secs,
            no_dedupe: self.no_dedupe,
        }
    }
}
