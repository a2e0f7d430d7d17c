use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "cardz", version)]
#[command(about = "Flashcard decks with delimited-text import and export", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Directory holding decks.json and config.json
    #[arg(long, global = true, env = "CARDZ_HOME")]
    pub data_dir: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List decks
    #[command(alias = "ls")]
    Decks,

    /// Create a deck
    AddDeck { name: String },

    /// Delete a deck and all its cards
    RmDeck {
        /// Deck number or name
        deck: String,
    },

    /// Rename a deck
    RenameDeck {
        /// Deck number or name
        deck: String,
        name: String,
    },

    /// List the cards of a deck
    #[command(alias = "cards")]
    List {
        /// Deck number or name
        deck: String,
    },

    /// Add a card to a deck
    Add {
        /// Deck number or name
        deck: String,
        question: String,
        answer: String,
    },

    /// Remove cards from a deck
    #[command(alias = "rm")]
    Remove {
        /// Deck number or name
        deck: String,

        /// Card numbers (e.g. 1 3 5)
        #[arg(required = true, num_args = 1..)]
        indexes: Vec<String>,
    },

    /// Shuffle the cards of a deck
    Shuffle {
        /// Deck number or name
        deck: String,
    },

    /// Import `question;answer` rows from a file into a deck
    Import {
        /// Deck number or name
        deck: String,
        file: PathBuf,
    },

    /// Export a deck as `question;answer` rows
    Export {
        /// Deck number or name
        deck: String,

        /// Output file (prints to stdout if omitted, unless --save is given)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Write to "<deck name><export-ext>" in the current directory
        #[arg(long, conflicts_with = "output")]
        save: bool,
    },

    /// Get or set configuration
    Config {
        /// Configuration key (autosave-window, export-ext, encodings)
        key: Option<String>,

        /// Value to set (if omitted, prints current value)
        value: Option<String>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_remove_with_many_indexes() {
        let cli = Cli::try_parse_from(["cardz", "rm", "Verbs", "1", "3"]).unwrap();
        match cli.command {
            Some(Commands::Remove { deck, indexes }) => {
                assert_eq!(deck, "Verbs");
                assert_eq!(indexes, vec!["1", "3"]);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn export_output_and_save_conflict() {
        assert!(Cli::try_parse_from(["cardz", "export", "1", "-o", "x.csv", "--save"]).is_err());
    }

    #[test]
    fn data_dir_is_global() {
        let cli = Cli::try_parse_from(["cardz", "decks", "--data-dir", "/tmp/cz"]).unwrap();
        assert_eq!(cli.data_dir, Some(PathBuf::from("/tmp/cz")));
    }
}
