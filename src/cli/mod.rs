pub mod migrate;
pub mod org;
pub mod tools;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "record-hooks")]
#[command(version)]
#[command(about = "Random ids, unique slugs and sanitized fields for SQLite records", long_about = None)]
pub struct Cli {
    #[arg(short, long, default_value = "record-hooks.toml", env = "RECORD_HOOKS_CONFIG")]
    pub config: PathBuf,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Apply pending schema migrations
    Migrate,
    /// Manage organizations
    Org {
        #[command(subcommand)]
        command: OrgCommand,
    },
    /// Preview the slug a name would get
    Slugify {
        name: String,
        #[arg(long, default_value = "50")]
        max_length: usize,
    },
    /// Print fresh random ids
    NewId {
        #[arg(short = 'n', long, default_value = "1")]
        count: usize,
    },
}

#[derive(Subcommand)]
pub enum OrgCommand {
    Create {
        #[arg(long)]
        name: String,
        #[arg(long)]
        slug: Option<String>,
        #[arg(long)]
        description: Option<String>,
    },
    Update {
        /// Current slug of the organization
        slug: String,
        #[arg(long)]
        name: Option<String>,
        /// New slug; pass an empty string to derive one from the name
        #[arg(long)]
        new_slug: Option<String>,
        #[arg(long)]
        description: Option<String>,
    },
    Show {
        slug: String,
    },
    List {
        #[arg(long)]
        json: bool,
    },
}
