use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "cropguard",
    version,
    about = "Crop disease treatment recommendations and dosage costs"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Path to config.yaml
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Override SQLite data directory
    #[arg(short, long, global = true)]
    pub data_dir: Option<PathBuf>,

    /// Increase log verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Build a treatment plan for a detected disease
    Recommend {
        /// Crop type (tomato, brinjal, capsicum, ...)
        #[arg(long)]
        crop: String,

        /// Disease name as reported by the classifier, e.g. Early_blight
        #[arg(long)]
        disease: String,

        /// healthy, mild, moderate or severe (low/medium/high also accepted)
        #[arg(long, default_value = "moderate")]
        severity: String,

        /// Farm size in hectares
        #[arg(long)]
        farm_size: f64,

        /// Free-text location, e.g. "Ludhiana, Punjab"
        #[arg(long)]
        location: Option<String>,

        /// Free-text weather description, e.g. "light rain"
        #[arg(long)]
        weather: Option<String>,

        /// Classifier confidence (0-1), stored with the plan
        #[arg(long)]
        confidence: Option<f64>,

        /// Append the plan to the local history
        #[arg(long)]
        save: bool,
    },
    /// Compare base-rate costs of substances, cheapest first
    Compare {
        #[arg(long)]
        farm_size: f64,

        /// Substance names
        #[arg(required = true)]
        substances: Vec<String>,
    },
    /// Estimate treatment costs for a whole season
    Seasonal {
        #[arg(long)]
        crop: String,

        #[arg(long)]
        farm_size: f64,

        #[arg(long)]
        location: Option<String>,
    },
    /// List crops with curated disease profiles
    Crops,
    /// List disease profiles for a crop
    Diseases { crop: String },
    /// Show a substance from the catalog
    Substance { name: String },
    /// Show recently saved plans
    History {
        #[arg(short, long, default_value_t = 10)]
        limit: usize,
    },
    /// Re-run interactive setup
    Init,
    /// Validate config and catalog
    Check,
}
