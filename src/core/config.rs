use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config: {0}")]
    ReadError(#[from] std::io::Error),
    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),
    #[error("Invalid value for {var}: '{value}'")]
    EnvError { var: &'static str, value: String },
}

pub const ENV_CONFIG_PATH: &str = "COST_REPORT_CONFIG";
const ENV_SENDER: &str = "COST_REPORT_SENDER";
const ENV_RECIPIENTS: &str = "COST_REPORT_RECIPIENTS";
const ENV_REGION: &str = "COST_REPORT_REGION";
const ENV_LOOKBACK_DAYS: &str = "COST_REPORT_LOOKBACK_DAYS";
const ENV_SUBJECT: &str = "COST_REPORT_SUBJECT";

const MAX_LOOKBACK_DAYS: u32 = 365;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportSettings {
    #[serde(default = "default_lookback_days")]
    pub lookback_days: u32,
    #[serde(default = "default_currency_symbol")]
    pub currency_symbol: String,
    #[serde(default = "default_account_label")]
    pub account_label: String,
    #[serde(default = "default_caption")]
    pub caption: String,
    /// Region the Cost Explorer client talks to. The service is only served
    /// from us-east-1.
    #[serde(default = "default_billing_region")]
    pub billing_region: String,
}

fn default_lookback_days() -> u32 {
    7
}
fn default_currency_symbol() -> String {
    "$".to_string()
}
fn default_account_label() -> String {
    "PROD".to_string()
}
fn default_caption() -> String {
    "Cost of AWS PROD account for the past week was".to_string()
}
fn default_billing_region() -> String {
    "us-east-1".to_string()
}

impl Default for ReportSettings {
    fn default() -> Self {
        Self {
            lookback_days: default_lookback_days(),
            currency_symbol: default_currency_symbol(),
            account_label: default_account_label(),
            caption: default_caption(),
            billing_region: default_billing_region(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmailSettings {
    #[serde(default = "default_region")]
    pub region: String,
    #[serde(default = "default_sender")]
    pub sender: String,
    #[serde(default = "default_recipients")]
    pub recipients: Vec<String>,
    #[serde(default = "default_subject")]
    pub subject: String,
}

fn default_region() -> String {
    "us-west-2".to_string()
}
fn default_sender() -> String {
    "sender@test.com".to_string()
}
fn default_recipients() -> Vec<String> {
    vec![
        "example1@test.com".to_string(),
        "example2@test.com".to_string(),
    ]
}
fn default_subject() -> String {
    "AWS PROD account cost report".to_string()
}

impl Default for EmailSettings {
    fn default() -> Self {
        Self {
            region: default_region(),
            sender: default_sender(),
            recipients: default_recipients(),
            subject: default_subject(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub report: ReportSettings,
    #[serde(default)]
    pub email: EmailSettings,
}

impl AppConfig {
    /// Resolve the config file path: explicit override, then COST_REPORT_CONFIG,
    /// then XDG_CONFIG_HOME.
    pub fn config_path(explicit: Option<&Path>) -> PathBuf {
        if let Some(path) = explicit {
            return path.to_path_buf();
        }
        if let Ok(path) = std::env::var(ENV_CONFIG_PATH) {
            if !path.is_empty() {
                return PathBuf::from(path);
            }
        }
        let config_dir = std::env::var("XDG_CONFIG_HOME")
            .map(PathBuf::from)
            .unwrap_or_else(|_| {
                dirs::home_dir()
                    .unwrap_or_else(|| PathBuf::from("~"))
                    .join(".config")
            });
        config_dir.join("cost-report").join("config.toml")
    }

    /// Load the config file (defaults if absent), then apply environment overrides.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = Self::load_file(&Self::config_path(explicit))?;
        config.apply_overrides(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    fn load_file(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        let config: AppConfig = toml::from_str(&content)?;
        Ok(config)
    }

    /// Apply overrides from a variable lookup. Empty values are ignored.
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(sender) = get(ENV_SENDER) {
            self.email.sender = sender.trim().to_string();
        }
        if let Some(recipients) = get(ENV_RECIPIENTS) {
            self.email.recipients = recipients
                .split(',')
                .map(str::trim)
                .filter(|r| !r.is_empty())
                .map(String::from)
                .collect();
        }
        if let Some(region) = get(ENV_REGION) {
            self.email.region = region.trim().to_string();
        }
        if let Some(subject) = get(ENV_SUBJECT) {
            self.email.subject = subject;
        }
        if let Some(days) = get(ENV_LOOKBACK_DAYS) {
            self.report.lookback_days =
                days.trim().parse().map_err(|_| ConfigError::EnvError {
                    var: ENV_LOOKBACK_DAYS,
                    value: days.clone(),
                })?;
        }
        Ok(())
    }

    /// Serialize and write this config, refusing to clobber an existing file.
    pub fn save_new(&self, path: &Path) -> Result<(), std::io::Error> {
        if path.exists() {
            return Err(std::io::Error::new(
                std::io::ErrorKind::AlreadyExists,
                format!("{} already exists", path.display()),
            ));
        }
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
        std::fs::write(path, content)
    }

    /// Validate the config
    pub fn validate(&self) -> Vec<String> {
        let mut issues = Vec::new();
        if self.email.sender.trim().is_empty() {
            issues.push("email.sender is empty".to_string());
        } else if !looks_like_address(&self.email.sender) {
            issues.push(format!(
                "email.sender '{}' is not an email address",
                self.email.sender
            ));
        }
        if self.email.recipients.is_empty() {
            issues.push("email.recipients is empty".to_string());
        }
        for r in &self.email.recipients {
            if !looks_like_address(r) {
                issues.push(format!("email.recipients: '{}' is not an email address", r));
            }
        }
        if self.email.region.trim().is_empty() {
            issues.push("email.region is empty".to_string());
        }
        if self.report.billing_region.trim().is_empty() {
            issues.push("report.billing_region is empty".to_string());
        }
        if !(1..=MAX_LOOKBACK_DAYS).contains(&self.report.lookback_days) {
            issues.push(format!(
                "report.lookback_days: {} (must be between 1 and {})",
                self.report.lookback_days, MAX_LOOKBACK_DAYS
            ));
        }
        issues
    }
}

fn looks_like_address(addr: &str) -> bool {
    match addr.trim().split_once('@') {
        Some((local, domain)) => !local.is_empty() && !domain.is_empty(),
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn default_config_is_valid() {
        let config = AppConfig::default();
        let issues = config.validate();
        assert!(issues.is_empty(), "Default config should be valid, got: {:?}", issues);
    }

    #[test]
    fn default_window_is_one_week() {
        assert_eq!(ReportSettings::default().lookback_days, 7);
    }

    #[test]
    fn default_billing_region_is_us_east_1() {
        assert_eq!(ReportSettings::default().billing_region, "us-east-1");
    }

    #[test]
    fn parse_empty_toml_gives_defaults() {
        let config: AppConfig = toml::from_str("").unwrap();
        assert_eq!(config.email.region, "us-west-2");
        assert_eq!(config.email.recipients.len(), 2);
        assert_eq!(config.report.currency_symbol, "$");
    }

    #[test]
    fn parse_email_section() {
        let toml = r#"
[email]
sender = "billing@corp.example"
recipients = ["ops@corp.example"]
region = "eu-west-1"
"#;
        let config: AppConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.email.sender, "billing@corp.example");
        assert_eq!(config.email.recipients, vec!["ops@corp.example"]);
        assert_eq!(config.email.region, "eu-west-1");
        assert_eq!(config.email.subject, "AWS PROD account cost report");
    }

    #[test]
    fn parse_report_section() {
        let toml = r#"
[report]
lookback_days = 14
account_label = "STAGING"
"#;
        let config: AppConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.report.lookback_days, 14);
        assert_eq!(config.report.account_label, "STAGING");
        assert_eq!(config.report.currency_symbol, "$");
    }

    #[test]
    fn overrides_replace_file_values() {
        let mut config = AppConfig::default();
        config
            .apply_overrides(lookup(&[
                ("COST_REPORT_SENDER", "me@corp.example"),
                ("COST_REPORT_RECIPIENTS", "a@corp.example, b@corp.example,"),
                ("COST_REPORT_REGION", "eu-central-1"),
                ("COST_REPORT_LOOKBACK_DAYS", "30"),
                ("COST_REPORT_SUBJECT", "Weekly spend: staging"),
            ]))
            .unwrap();
        assert_eq!(config.email.sender, "me@corp.example");
        assert_eq!(
            config.email.recipients,
            vec!["a@corp.example", "b@corp.example"]
        );
        assert_eq!(config.email.region, "eu-central-1");
        assert_eq!(config.report.lookback_days, 30);
        assert_eq!(config.email.subject, "Weekly spend: staging");
    }

    #[test]
    fn empty_override_is_ignored() {
        let mut config = AppConfig::default();
        config
            .apply_overrides(lookup(&[("COST_REPORT_SENDER", "  ")]))
            .unwrap();
        assert_eq!(config.email.sender, "sender@test.com");
    }

    #[test]
    fn bad_lookback_override_is_an_error() {
        let mut config = AppConfig::default();
        let err = config
            .apply_overrides(lookup(&[("COST_REPORT_LOOKBACK_DAYS", "week")]))
            .unwrap_err();
        assert!(err.to_string().contains("COST_REPORT_LOOKBACK_DAYS"));
    }

    #[test]
    fn validate_catches_missing_recipients() {
        let mut config = AppConfig::default();
        config.email.recipients.clear();
        let issues = config.validate();
        assert!(issues.iter().any(|i| i.contains("recipients is empty")));
    }

    #[test]
    fn validate_catches_bad_addresses() {
        let mut config = AppConfig::default();
        config.email.sender = "nobody".to_string();
        config.email.recipients = vec!["@corp.example".to_string()];
        let issues = config.validate();
        assert_eq!(issues.len(), 2, "{:?}", issues);
    }

    #[test]
    fn validate_catches_lookback_out_of_range() {
        let mut config = AppConfig::default();
        config.report.lookback_days = 0;
        assert!(config.validate().iter().any(|i| i.contains("lookback_days")));
        config.report.lookback_days = 400;
        assert!(config.validate().iter().any(|i| i.contains("lookback_days")));
    }

    #[test]
    fn explicit_path_wins() {
        let path = AppConfig::config_path(Some(Path::new("/etc/cost-report.toml")));
        assert_eq!(path, PathBuf::from("/etc/cost-report.toml"));
    }

    #[test]
    fn missing_file_gives_defaults() {
        let config = AppConfig::load_file(Path::new("/nonexistent/cost-report/config.toml"))
            .unwrap();
        assert_eq!(config.email.subject, "AWS PROD account cost report");
    }
}
