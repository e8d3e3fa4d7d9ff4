use crate::error::{CropGuardError, Result};
use crate::logic::adjusters::SeverityScale;
use crate::logic::pricing::RegionPricing;
use crate::logic::selector::SelectionPolicy;
use dialoguer::{Confirm, Input};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    pub engine: EngineConfig,
    pub regions: RegionPricing,
    /// YAML file replacing the built-in substances and disease profiles
    pub catalog_path: Option<PathBuf>,
}

/// Rates and policies used by the treatment engine.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Operating costs per application
    pub labor_rate: f64,
    pub fuel_rate: f64,
    pub equipment_rate: f64,
    /// Dosage multiplier attributed to traditional, unguided spraying
    pub overuse_baseline: f64,
    pub fallback_substance: String,
    pub fallback_applications: u32,
    #[serde(flatten)]
    pub selection: SelectionPolicy,
    pub severity: SeverityScale,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            labor_rate: 500.0,
            fuel_rate: 200.0,
            equipment_rate: 100.0,
            overuse_baseline: 1.5,
            fallback_substance: "Copper Hydroxide".into(),
            fallback_applications: 3,
            selection: SelectionPolicy::default(),
            severity: SeverityScale::default(),
        }
    }
}

impl EngineConfig {
    pub fn validate(&self) -> Result<()> {
        for (name, value) in [
            ("labor_rate", self.labor_rate),
            ("fuel_rate", self.fuel_rate),
            ("equipment_rate", self.equipment_rate),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(CropGuardError::Config(format!(
                    "{} must be a non-negative number, got {}",
                    name, value
                )));
            }
        }

        if !self.overuse_baseline.is_finite() || self.overuse_baseline < 1.0 {
            return Err(CropGuardError::Config(format!(
                "overuse_baseline must be at least 1.0, got {}",
                self.overuse_baseline
            )));
        }

        if self.fallback_substance.trim().is_empty() {
            return Err(CropGuardError::Config(
                "fallback_substance must not be empty".into(),
            ));
        }

        if self.fallback_applications == 0 {
            return Err(CropGuardError::Config(
                "fallback_applications must be at least 1".into(),
            ));
        }

        self.severity
            .validate()
            .map_err(|e| CropGuardError::Config(e.to_string()))
    }
}

impl Config {
    /// Loads config from the override path or the standard locations.
    ///
    /// Returns `Config::default()` when no file exists anywhere, so the
    /// engine runs on reference values out of the box.
    pub fn load(config_override: Option<&PathBuf>) -> Result<Self> {
        let config_path = match config_override {
            Some(p) => {
                if !p.exists() {
                    return Err(CropGuardError::Config(format!(
                        "Config file not found at {:?}",
                        p
                    )));
                }
                p.clone()
            }
            None => {
                let p = Self::find_config_path()?;
                if !p.exists() {
                    tracing::debug!("No config file found, using defaults");
                    return Ok(Self::default());
                }
                p
            }
        };

        let config_str = std::fs::read_to_string(&config_path)
            .map_err(|e| CropGuardError::Config(format!("Failed to read config: {}", e)))?;

        let config = Self::from_yaml_str(&config_str)?;
        tracing::info!(path = %config_path.display(), "Loaded configuration");
        Ok(config)
    }

    pub fn from_yaml_str(content: &str) -> Result<Self> {
        // Substitute environment variables
        let content = Self::substitute_env_vars(content)?;

        let config: Config = serde_yaml::from_str(&content)
            .map_err(|e| CropGuardError::Config(format!("Failed to parse config: {}", e)))?;

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        self.engine.validate()?;
        self.regions
            .validate()
            .map_err(|e| CropGuardError::Config(e.to_string()))
    }

    /// Search for config.yaml in standard locations.
    /// Returns the path of the first found config, or the XDG default path if none found.
    fn find_config_path() -> Result<PathBuf> {
        let local_config = PathBuf::from("config/config.yaml");
        if local_config.exists() {
            return Ok(local_config);
        }

        if let Some(config_dir) = dirs::config_dir() {
            let xdg_config = config_dir.join("cropguard").join("config.yaml");
            if xdg_config.exists() {
                return Ok(xdg_config);
            }
        }

        Self::default_config_path()
    }

    /// Returns true if a config file can be found in any standard location.
    pub fn exists(config_override: Option<&PathBuf>) -> bool {
        match config_override {
            Some(p) => p.exists(),
            None => Self::find_config_path()
                .map(|p| p.exists())
                .unwrap_or(false),
        }
    }

    /// Default path for writing new config files (~/.config/cropguard/config.yaml).
    pub fn default_config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| CropGuardError::Config("Cannot determine config directory".into()))?
            .join("cropguard");
        Ok(config_dir.join("config.yaml"))
    }

    /// Run interactive setup prompts and write config to disk.
    /// Returns the new Config and the path it was written to.
    pub fn setup_interactive() -> Result<(Self, PathBuf)> {
        let defaults = EngineConfig::default();

        println!();
        println!("Let's set up CropGuard!");
        println!();

        println!("Operating costs per application");
        let labor_rate: f64 = Input::new()
            .with_prompt("  Labor")
            .default(defaults.labor_rate)
            .interact_text()
            .map_err(|e| CropGuardError::Config(format!("Input error: {}", e)))?;

        let fuel_rate: f64 = Input::new()
            .with_prompt("  Fuel")
            .default(defaults.fuel_rate)
            .interact_text()
            .map_err(|e| CropGuardError::Config(format!("Input error: {}", e)))?;

        let equipment_rate: f64 = Input::new()
            .with_prompt("  Equipment")
            .default(defaults.equipment_rate)
            .interact_text()
            .map_err(|e| CropGuardError::Config(format!("Input error: {}", e)))?;

        println!();

        println!("Treatment policy");
        let overuse_baseline: f64 = Input::new()
            .with_prompt("  Traditional overuse multiplier")
            .default(defaults.overuse_baseline)
            .interact_text()
            .map_err(|e| CropGuardError::Config(format!("Input error: {}", e)))?;

        let fallback_substance: String = Input::new()
            .with_prompt("  Fallback substance")
            .default(defaults.fallback_substance.clone())
            .interact_text()
            .map_err(|e| CropGuardError::Config(format!("Input error: {}", e)))?;

        let prefer_gentle = Confirm::new()
            .with_prompt("  Prefer copper-based products for mild infections?")
            .default(true)
            .interact()
            .map_err(|e| CropGuardError::Config(format!("Input error: {}", e)))?;

        println!();

        // --- Custom catalog (optional) ---
        println!("Reference data (leave blank to use the built-in catalog)");
        let catalog_path: String = Input::new()
            .with_prompt("  Catalog YAML path")
            .default(String::new())
            .allow_empty(true)
            .interact_text()
            .map_err(|e| CropGuardError::Config(format!("Input error: {}", e)))?;

        println!();

        let selection = if prefer_gentle {
            defaults.selection.clone()
        } else {
            SelectionPolicy {
                gentle_marker: None,
                ..defaults.selection.clone()
            }
        };

        let config = Config {
            engine: EngineConfig {
                labor_rate,
                fuel_rate,
                equipment_rate,
                overuse_baseline,
                fallback_substance,
                selection,
                ..defaults
            },
            regions: RegionPricing::default(),
            catalog_path: if catalog_path.is_empty() {
                None
            } else {
                Some(PathBuf::from(catalog_path))
            },
        };
        config.validate()?;

        let config_path = Self::default_config_path()?;
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let yaml = serde_yaml::to_string(&config)
            .map_err(|e| CropGuardError::Config(format!("Failed to serialize config: {}", e)))?;

        let content = format!(
            "# CropGuard Configuration\n# Generated by `cropguard init`\n# Environment variable substitution (${{VAR}}) is supported.\n\n{}",
            yaml
        );
        std::fs::write(&config_path, content)?;

        println!("Configuration saved to {}", config_path.display());
        println!();

        Ok((config, config_path))
    }

    fn substitute_env_vars(content: &str) -> Result<String> {
        let mut result = content.to_string();

        let re = regex_lite::Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}")
            .map_err(|e| CropGuardError::Config(format!("Invalid substitution pattern: {}", e)))?;

        for cap in re.captures_iter(content) {
            let var_name = &cap[1];
            let placeholder = &cap[0];
            if let Ok(value) = std::env::var(var_name) {
                result = result.replace(placeholder, &value);
            }
        }

        Ok(result)
    }

    pub fn data_dir(data_dir_override: Option<&PathBuf>) -> Result<PathBuf> {
        // CLI override takes priority
        if let Some(dir) = data_dir_override {
            std::fs::create_dir_all(dir)?;
            return Ok(dir.clone());
        }

        if let Ok(dir) = std::env::var("CROPGUARD_DATA_DIR") {
            let p = PathBuf::from(dir);
            std::fs::create_dir_all(&p)?;
            return Ok(p);
        }

        let data_dir = dirs::data_dir()
            .ok_or_else(|| CropGuardError::Config("Cannot determine data directory".into()))?
            .join("cropguard");

        std::fs::create_dir_all(&data_dir)?;
        Ok(data_dir)
    }

    pub fn db_path(data_dir_override: Option<&PathBuf>) -> Result<PathBuf> {
        Ok(Self::data_dir(data_dir_override)?.join("cropguard.db"))
    }
}
