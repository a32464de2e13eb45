use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use crate::recipe_filter::RecipeFilter;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Log debug output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Print a recipe's ingredients scaled to a serving count
    Scale {
        /// Path to the recipe JSON export
        #[arg(short, long)]
        recipes: PathBuf,
        /// Recipe id
        #[arg(long)]
        id: String,
        /// Target serving count (defaults to the recipe's own)
        #[arg(short, long)]
        servings: Option<u32>,
    },
    /// Suggest recipes using produce that is in season
    Seasonal {
        #[arg(short, long)]
        recipes: PathBuf,
        /// Month 1-12 (defaults to the current month)
        #[arg(short, long)]
        month: Option<u32>,
        /// Maximum number of suggestions
        #[arg(short, long)]
        limit: Option<usize>,
        /// Seed for the suggestion shuffle
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Search and filter recipes
    Search {
        #[arg(short, long)]
        recipes: PathBuf,
        #[command(flatten)]
        filter: FilterArgs,
    },
    /// Extract a recipe from a text file or web page with a language model
    Import {
        /// Path to a text file holding the recipe
        #[arg(short, long, conflicts_with = "url", required_unless_present = "url")]
        file: Option<PathBuf>,
        /// Page to fetch the recipe from
        #[arg(short, long)]
        url: Option<String>,
    },
    /// Suggest wine and non-alcoholic pairings for a recipe
    Pair {
        #[arg(short, long)]
        recipes: PathBuf,
        /// Recipe id
        #[arg(long)]
        id: String,
        /// Write the pairing back into the recipe file
        #[arg(long)]
        save: bool,
    },
}

#[derive(Args, Debug, Default)]
pub struct FilterArgs {
    /// Text searched in title, notes and source
    #[arg(short, long)]
    pub query: Option<String>,
    #[arg(long)]
    pub protein: Vec<String>,
    #[arg(long)]
    pub cuisine: Vec<String>,
    #[arg(long)]
    pub method: Vec<String>,
    #[arg(long)]
    pub meal_type: Vec<String>,
    #[arg(long)]
    pub effort: Vec<String>,
}

impl From<FilterArgs> for RecipeFilter {
    fn from(args: FilterArgs) -> Self {
        RecipeFilter {
            query: args.query,
            protein: args.protein,
            cuisine: args.cuisine,
            method: args.method,
            meal_type: args.meal_type,
            effort: args.effort,
        }
    }
}

pub fn parse_args() -> Cli {
    Cli::parse()
}
