use anyhow::{Context, Result};

/// Process-wide configuration, loaded once at startup and passed into the
/// service constructors. Never read from the environment anywhere else.
#[derive(Debug, Clone)]
pub struct Config {
    pub site_url: String,
    pub site_user: String,
    pub site_password: String,
    pub spreadsheet_id: String,
    pub sheets_token: String,
    /// Workout title that marks the first training day of a week.
    pub first_day: String,
    pub mail: Option<MailConfig>,
}

#[derive(Debug, Clone)]
pub struct MailConfig {
    pub endpoint: String,
    pub api_key: String,
    pub from: String,
    pub to: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            site_url: var("PUMP_SITE_URL")?,
            site_user: var("PUMP_SITE_USER")?,
            site_password: var("PUMP_SITE_PASSWORD")?,
            spreadsheet_id: var("PUMP_SPREADSHEET_ID")?,
            sheets_token: var("PUMP_SHEETS_TOKEN")?,
            first_day: var("PUMP_FIRST_DAY")?,
            mail: MailConfig::from_env()?,
        })
    }
}

impl MailConfig {
    /// Mail is optional: without PUMP_MAIL_ENDPOINT the notifier is disabled.
    fn from_env() -> Result<Option<Self>> {
        match std::env::var("PUMP_MAIL_ENDPOINT") {
            Err(_) => Ok(None),
            Ok(endpoint) => Ok(Some(Self {
                endpoint,
                api_key: var("PUMP_MAIL_API_KEY")?,
                from: var("PUMP_MAIL_FROM")?,
                to: var("PUMP_MAIL_TO")?,
            })),
        }
    }
}

fn var(name: &str) -> Result<String> {
    std::env::var(name).with_context(|| format!("{} environment variable must be set", name))
}
