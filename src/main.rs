mod cli;

use clap::Parser;
use cli::{Cli, Commands};
use cropguard::config::Config;
use cropguard::db::Database;
use cropguard::error::{CropGuardError, Result};
use cropguard::logic::TreatmentEngine;
use cropguard::models::{DiseaseClassification, SeverityTier, TreatmentRequest};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

fn main() {
    // Load .env file if present
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    // Logs go to stderr so stdout stays machine-readable
    let default_level = match cli.verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter = if cli.verbose > 0 {
        EnvFilter::new(default_level)
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    if let Commands::Init = cli.command {
        Config::setup_interactive()?;
        return Ok(());
    }

    let config = Config::load(cli.config.as_ref())?;
    let engine = TreatmentEngine::from_config(&config)?;

    match cli.command {
        Commands::Recommend {
            crop,
            disease,
            severity,
            farm_size,
            location,
            weather,
            confidence,
            save,
        } => {
            let severity = SeverityTier::from_str(&severity).ok_or_else(|| {
                CropGuardError::Validation(format!(
                    "unknown severity '{}', expected healthy, mild, moderate or severe",
                    severity
                ))
            })?;

            let request = TreatmentRequest {
                crop_type: crop,
                disease_name: disease,
                severity,
                farm_size_hectares: farm_size,
                location,
                weather,
            };

            let plan = match confidence {
                Some(confidence) => engine.recommend_for(
                    &DiseaseClassification {
                        disease_name: request.disease_name.clone(),
                        severity,
                        confidence,
                    },
                    &request.crop_type,
                    request.farm_size_hectares,
                    request.location.as_deref(),
                    request.weather.as_deref(),
                )?,
                None => engine.recommend(&request)?,
            };

            if save {
                let db = Database::open(&Config::db_path(cli.data_dir.as_ref())?)?;
                let id = db.record_plan(&request, &plan)?;
                tracing::info!(id, "Saved plan to history");
            }

            print_json(&plan)
        }
        Commands::Compare {
            farm_size,
            substances,
        } => print_json(&engine.compare_substances(&substances, farm_size)?),
        Commands::Seasonal {
            crop,
            farm_size,
            location,
        } => print_json(&engine.seasonal_estimate(&crop, farm_size, location.as_deref())?),
        Commands::Crops => {
            for crop in engine.catalog().crops() {
                println!("{}", crop);
            }
            Ok(())
        }
        Commands::Diseases { crop } => {
            if !engine.catalog().has_crop(&crop) {
                return Err(CropGuardError::NotFound(format!("crop '{}'", crop)));
            }
            print_json(&engine.catalog().diseases(&crop))
        }
        Commands::Substance { name } => print_json(engine.catalog().require(&name)?),
        Commands::History { limit } => {
            let db = Database::open(&Config::db_path(cli.data_dir.as_ref())?)?;
            print_json(&db.recent_plans(limit)?)
        }
        Commands::Check => {
            let source = match &config.catalog_path {
                Some(path) => path.display().to_string(),
                None => "built-in".to_string(),
            };
            if Config::exists(cli.config.as_ref()) {
                println!("Config OK");
            } else {
                println!("No config file found, using built-in defaults");
            }
            println!(
                "Catalog ({}): {} substances, crops: {}",
                source,
                engine.catalog().substances().count(),
                engine.catalog().crops().join(", ")
            );
            println!("Fallback substance: {}", engine.config().fallback_substance);
            Ok(())
        }
        Commands::Init => Ok(()),
    }
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
