use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(name = "tagpick")]
#[command(bin_name = "tagpick")]
#[command(version)]
#[command(about = "Record-attached tag picker with a shared vocabulary store")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Comma-separated selection to seed the picker with.
    #[arg(long, default_value = "", global = true)]
    pub tags: String,

    /// Override the configured vocabulary source.
    #[arg(long, global = true)]
    pub source: Option<String>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    #[command(about = "Print the vocabulary for the configured source")]
    Vocab,
    #[command(about = "Append new tags to the vocabulary without opening the picker")]
    Add {
        /// Tags to append. Comma-separated values are split.
        #[arg(required = true)]
        new_tags: Vec<String>,
    },
}
