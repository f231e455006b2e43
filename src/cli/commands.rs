use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "cardwallet")]
#[command(version, about = "A password wallet of cards and notes kept in an XML file")]
#[command(propagate_version = true)]
pub struct Cli {
    /// Wallet file to operate on
    #[arg(long, short = 'f', global = true, default_value = "wallet.xml")]
    pub file: PathBuf,

    /// JSON file with codec settings (indent, max_nodes, allow_dtd)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Print debug logs to stderr
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create a new empty wallet file
    Init,

    /// Add a new record
    Add(AddCommand),

    /// List records sorted by name
    List {
        /// Only show favorites
        #[arg(long)]
        favorites: bool,

        /// Only show records of this class (card or note)
        #[arg(long)]
        class: Option<String>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show a single record
    Show {
        /// Record ID (full UUID or unique prefix)
        id: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Edit the fields of a card
    Field(FieldCommand),

    /// Toggle the favorite flag of a record
    Favorite {
        /// Record ID (full UUID or unique prefix)
        id: String,
    },

    /// Delete a record
    Delete {
        /// Record ID (full UUID or unique prefix)
        id: String,
    },

    /// Search names, types, notes and fields
    Search {
        /// Text to look for (case-insensitive)
        query: String,

        /// Only show records of this class (card or note)
        #[arg(long)]
        class: Option<String>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print every record as JSON
    Export,

    /// Append the records of another wallet file
    Import {
        /// Wallet XML file to read
        source: PathBuf,
    },
}

#[derive(Args, Debug)]
pub struct AddCommand {
    #[command(subcommand)]
    pub record: AddRecord,
}

#[derive(Subcommand, Debug)]
pub enum AddRecord {
    /// Add a credential card
    Card {
        /// Card name
        name: String,

        /// Card type tag
        #[arg(long = "type", default_value = "CARD")]
        record_type: String,

        /// Icon name
        #[arg(long, default_value = "")]
        picture: String,

        /// Fields in format "name:type:value" (can be specified multiple times)
        #[arg(long = "field")]
        fields: Vec<String>,

        /// Free-text note attached to the card
        #[arg(long)]
        note: Option<String>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Add a free-text note
    Note {
        /// Note name
        name: String,

        /// Note text
        #[arg(long, conflicts_with = "stdin")]
        text: Option<String>,

        /// Read text from stdin
        #[arg(long)]
        stdin: bool,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Args, Debug)]
pub struct FieldCommand {
    #[command(subcommand)]
    pub action: FieldAction,
}

#[derive(Subcommand, Debug)]
pub enum FieldAction {
    /// Append a field to a card
    Add {
        /// Card ID (full UUID or unique prefix)
        id: String,

        /// Field name
        name: String,

        /// Field type tag
        field_type: String,

        /// Field value
        value: String,
    },

    /// Remove every field with the given name from a card
    Remove {
        /// Card ID (full UUID or unique prefix)
        id: String,

        /// Field name
        name: String,
    },
}
