use std::env;
use std::path::PathBuf;

const DEFAULT_SMTP_PORT: u16 = 587;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("missing required setting {0}")]
    Missing(&'static str),
    #[error("invalid value for {name}: {reason}")]
    Invalid { name: &'static str, reason: String },
}

#[derive(Debug, Clone)]
pub struct InfobloxConfig {
    pub host: String,
    pub user: String,
    pub pass: String,
}

#[derive(Debug, Clone)]
pub struct MailConfig {
    pub subject: String,
    pub from: String,
    pub to: Vec<String>,
    pub smtp_host: String,
    pub smtp_port: u16,
    pub smtp_user: String,
    pub smtp_pass: String,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub infoblox: InfobloxConfig,
    pub mail: MailConfig,
    pub dry_run: bool,
}

impl AppConfig {
    /// Reads the process environment. Call [`load_dotenv`] first so a local
    /// `.env` can fill in anything the environment does not set.
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |name: &'static str| -> Result<String, ConfigError> {
            lookup(name)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .ok_or(ConfigError::Missing(name))
        };

        let smtp_port = match lookup("SMTP_PORT").map(|v| v.trim().to_string()) {
            Some(raw) if !raw.is_empty() => raw.parse::<u16>().map_err(|e| ConfigError::Invalid {
                name: "SMTP_PORT",
                reason: format!("{raw:?}: {e}"),
            })?,
            _ => DEFAULT_SMTP_PORT,
        };

        let to = split_recipients(&required("TO_EMAILS")?);
        if to.is_empty() {
            return Err(ConfigError::Invalid {
                name: "TO_EMAILS",
                reason: "no recipients after splitting on ','".into(),
            });
        }

        Ok(Self {
            infoblox: InfobloxConfig {
                host: required("INFOBLOX_HOST")?,
                user: required("INFOBLOX_USER")?,
                pass: required("INFOBLOX_PASS")?,
            },
            mail: MailConfig {
                subject: required("SUBJECT_MAIL")?,
                from: required("FROM_EMAIL")?,
                to,
                smtp_host: required("SMTP_HOST")?,
                smtp_port,
                smtp_user: required("SMTP_USER")?,
                smtp_pass: required("SMTP_PASS")?,
            },
            dry_run: lookup("REPORT_DRY_RUN").map(|v| is_truthy(&v)).unwrap_or(false),
        })
    }
}

/// Where and how verbosely the run logs.
#[derive(Debug, Clone)]
pub struct LogSettings {
    pub dir: PathBuf,
    pub filter: String,
}

impl LogSettings {
    pub fn from_env() -> Self {
        Self {
            dir: env::var("LOG_DIR").map(PathBuf::from).unwrap_or_else(|_| PathBuf::from("logs")),
            filter: env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        }
    }
}

/// Loads `./.env` into the environment. Variables already set are left alone.
pub fn load_dotenv() -> Option<PathBuf> {
    let path = PathBuf::from(".").join(".env");
    dotenvy::from_path(&path).ok().map(|_| path)
}

pub fn split_recipients(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

fn is_truthy(raw: &str) -> bool {
    matches!(raw.trim().to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on")
}
