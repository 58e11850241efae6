//! CLI argument definitions

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::fmt;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "ahocorasick")]
#[command(about = "Multi-keyword search with Aho-Corasick automata")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// Serialization format of automaton files
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SerializationFormat {
    /// Compact binary (bincode)
    Bincode,
    /// Human-readable JSON
    Json,
}

impl fmt::Display for SerializationFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bincode => write!(f, "bincode"),
            Self::Json => write!(f, "json"),
        }
    }
}

/// Where a command gets its keyword tree from
#[derive(Args, Debug, Clone)]
pub struct TreeSource {
    /// Keyword file, one keyword per line
    #[arg(short, long, required_unless_present = "automaton", conflicts_with = "automaton")]
    pub keywords: Option<PathBuf>,

    /// Automaton file written by `build`
    #[arg(short, long)]
    pub automaton: Option<PathBuf>,

    /// Automaton serialization format (auto-detected if not specified)
    #[arg(short = 'f', long)]
    pub format: Option<SerializationFormat>,

    /// Ignore case (keyword files only)
    #[arg(short = 'i', long)]
    pub case_insensitive: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Build and finalize an automaton from a keyword file
    Build {
        /// Keyword file, one keyword per line
        keywords: PathBuf,

        /// Output automaton file
        #[arg(short, long)]
        output: PathBuf,

        /// Output format (from the extension if not specified)
        #[arg(short = 'f', long)]
        format: Option<SerializationFormat>,

        /// Gzip the output
        #[arg(short = 'z', long)]
        gzip: bool,

        /// Ignore case
        #[arg(short = 'i', long)]
        case_insensitive: bool,

        /// Walk failure links at search time instead of storing shortcuts
        #[arg(long)]
        no_shortcuts: bool,

        /// Store the trie without finalizing it
        #[arg(long)]
        unfinalized: bool,
    },

    /// Search a text for keyword occurrences
    Search {
        /// Text file to search ("-" or omitted reads stdin)
        text: Option<PathBuf>,

        #[command(flatten)]
        source: TreeSource,

        /// Report every occurrence instead of the first one
        #[arg(long)]
        all: bool,

        /// Print phase timings to stderr
        #[arg(short, long)]
        timings: bool,
    },

    /// Print the automaton as a Graphviz DOT graph
    Dot {
        #[command(flatten)]
        source: TreeSource,

        /// Include failure links
        #[arg(long)]
        failure_links: bool,

        /// Include shortcut transitions
        #[arg(long)]
        shortcuts: bool,

        /// Write to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Display automaton information
    Info {
        #[command(flatten)]
        source: TreeSource,
    },

    /// Time the build, search and serialization phases
    Bench {
        /// Keyword file, one keyword per line
        #[arg(short, long)]
        keywords: PathBuf,

        /// Text file to search
        #[arg(short, long)]
        text: PathBuf,

        /// Number of search iterations
        #[arg(short = 'n', long, default_value = "10")]
        iterations: usize,

        /// Ignore case
        #[arg(short = 'i', long)]
        case_insensitive: bool,
    },
}
