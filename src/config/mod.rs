use crate::core::{AppError, Result};
use crate::modules::commissions::models::{
    CalculationOptions, CascadeMode, GatingPolicy, LeafDistribution,
};
use std::env;
use std::path::PathBuf;
use tracing::info;

pub mod rules;

pub use rules::{ColumnNames, CommissionRules, NodeRule, PartnerRule};

/// Main application configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub app: AppConfig,
    pub calculation: CalculationOptions,
    /// External rule file; the embedded default is used when unset
    pub rules_path: Option<PathBuf>,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub env: String,
    pub log_level: String,
    pub log_format: String,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        // Load .env file if present
        dotenvy::dotenv().ok();

        let config = Config {
            app: AppConfig {
                env: env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()),
                log_level: env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
                log_format: env::var("LOG_FORMAT").unwrap_or_else(|_| "text".to_string()),
            },
            calculation: CalculationOptions {
                mode: parse_env::<CascadeMode>("COMMISSION_MODE", "cumulative")?,
                gating: parse_env::<GatingPolicy>("COMMISSION_GATING", "total_sign")?,
                leaf_distribution: parse_env::<LeafDistribution>(
                    "LEAF_DISTRIBUTION",
                    "independent",
                )?,
                precision: env::var("AMOUNT_PRECISION")
                    .unwrap_or_else(|_| "2".to_string())
                    .parse()
                    .map_err(|_| AppError::configuration("Invalid AMOUNT_PRECISION"))?,
            },
            rules_path: env::var("COMMISSION_RULES_PATH")
                .ok()
                .filter(|p| !p.trim().is_empty())
                .map(PathBuf::from),
        };

        Ok(config)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.calculation.precision > 10 {
            return Err(AppError::configuration(
                "AMOUNT_PRECISION must be at most 10",
            ));
        }

        if !matches!(self.app.log_format.as_str(), "text" | "json") {
            return Err(AppError::configuration(format!(
                "LOG_FORMAT must be text or json, got {}",
                self.app.log_format
            )));
        }

        Ok(())
    }

    /// Load the commission rules this configuration points at
    pub fn load_rules(&self) -> Result<CommissionRules> {
        match &self.rules_path {
            Some(path) => CommissionRules::from_path(path),
            None => {
                info!("Using built-in commission rules");
                CommissionRules::from_yaml_str(rules::DEFAULT_RULES_YAML)
            }
        }
    }
}

fn parse_env<T>(key: &str, default: &str) -> Result<T>
where
    T: std::str::FromStr<Err = String>,
{
    env::var(key)
        .unwrap_or_else(|_| default.to_string())
        .parse()
        .map_err(|e: String| AppError::configuration(format!("{}: {}", key, e)))
}
