use clap::{ArgAction, Args, Parser, Subcommand};

#[derive(Parser)]
#[command(name = "ptree", about = concat!("ptree v", env!("CARGO_PKG_VERSION"), " - drag-and-drop page tree editor"), version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Editor config file (default: ./pagetree.toml if present)
    #[arg(short = 'c', long = "config", global = true)]
    pub config: Option<String>,

    /// Log to stderr; repeat for more detail (-d info, -dd debug, -ddd trace)
    #[arg(short = 'd', long = "debug", action = ArgAction::Count, global = true)]
    pub debug: u8,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Print a tree snapshot as an outline
    Show(ShowArgs),
    /// Validate a tree snapshot
    Check(CheckArgs),
    /// Replay a recorded drag gesture script against a tree snapshot
    Replay(ReplayArgs),
}

#[derive(Args)]
pub struct ShowArgs {
    /// Tree snapshot (JSON array of root nodes)
    pub tree: String,
    /// Show every node, ignoring collapsed folders
    #[arg(long)]
    pub all: bool,
    /// Extra folder ids to treat as expanded (repeatable)
    #[arg(long = "expand")]
    pub expand: Vec<String>,
}

#[derive(Args)]
pub struct CheckArgs {
    /// Tree snapshot (JSON array of root nodes)
    pub tree: String,
}

#[derive(Args)]
pub struct ReplayArgs {
    /// Tree snapshot (JSON array of root nodes)
    pub tree: String,
    /// Gesture script (JSON array of events)
    pub gestures: String,
    /// Write the resulting tree to this file
    #[arg(short = 'o', long = "output")]
    pub output: Option<String>,
    /// Show every node, ignoring collapsed folders
    #[arg(long)]
    pub all: bool,
}
