//! CLI command definitions

use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "tagtree")]
#[command(about = "Tag cloud, tag pages and related documents for plain-text sites", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Site root (default: $TAGTREE_ROOT, then the current directory)
    #[arg(short = 'C', long, global = true, value_name = "DIR")]
    pub root: Option<PathBuf>,

    /// More log output (-v info, -vv debug)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    /// Only log errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Write a default tagtree.toml
    Init {
        /// Directory to initialize (default: current directory)
        #[arg(default_value = ".")]
        path: PathBuf,
    },

    /// Write the tag cloud and tag pages
    Build {
        /// Write a page for every tag, not only those in the cloud
        #[arg(long)]
        all_tags: bool,

        /// Rewrite sources with cached tag and related HTML
        #[arg(long)]
        rewrite: bool,

        /// Skip related document ranking
        #[arg(long)]
        no_related: bool,
    },

    /// Print the tag cloud fragment
    Cloud,

    /// List tags with document counts
    Tags,

    /// Show the documents related to a file
    Related {
        /// Source file, relative to the site root
        file: PathBuf,
    },
}
