use std::env;
use std::fmt;
use std::path::PathBuf;

use crate::fetcher::DEFAULT_BASE_URL;
use crate::pipeline::MalformedRowPolicy;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid MALFORMED_ROW_POLICY: {0}")]
    Policy(String),
}

#[derive(Clone)]
pub struct Config {
    pub base_url: String,
    pub output_dir: PathBuf,
    pub http_timeout_secs: u64,
    pub malformed_row_policy: MalformedRowPolicy,
    pub smtp_host: String,
    pub smtp_port: u16,
    pub sender: Option<String>,
    pub password: Option<String>,
    pub recipient: Option<String>,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Config {
            base_url: env::var("MOEX_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string()),
            output_dir: env::var("REPORT_OUTPUT_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from(".")),
            http_timeout_secs: env::var("HTTP_TIMEOUT_SECS")
                .unwrap_or_else(|_| "30".to_string())
                .parse()
                .unwrap_or(30),
            malformed_row_policy: match env::var("MALFORMED_ROW_POLICY") {
                Ok(value) => value.parse().map_err(ConfigError::Policy)?,
                Err(_) => MalformedRowPolicy::default(),
            },
            smtp_host: env::var("SMTP_HOST").unwrap_or_else(|_| "smtp.mail.ru".to_string()),
            smtp_port: env::var("SMTP_PORT")
                .unwrap_or_else(|_| "465".to_string())
                .parse()
                .unwrap_or(465),
            sender: env::var("REPORT_SENDER").ok(),
            password: env::var("REPORT_PASSWORD").ok(),
            recipient: env::var("REPORT_RECIPIENT").ok(),
        })
    }
}

// Hand-written so the SMTP password never reaches the logs
impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("base_url", &self.base_url)
            .field("output_dir", &self.output_dir)
            .field("http_timeout_secs", &self.http_timeout_secs)
            .field("malformed_row_policy", &self.malformed_row_policy)
            .field("smtp_host", &self.smtp_host)
            .field("smtp_port", &self.smtp_port)
            .field("sender", &self.sender)
            .field("password", &self.password.as_ref().map(|_| "***"))
            .field("recipient", &self.recipient)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Config {
        Config {
            base_url: DEFAULT_BASE_URL.to_string(),
            output_dir: PathBuf::from("."),
            http_timeout_secs: 30,
            malformed_row_policy: MalformedRowPolicy::Skip,
            smtp_host: "smtp.mail.ru".to_string(),
            smtp_port: 465,
            sender: Some("reports@example.com".to_string()),
            password: Some("hunter2".to_string()),
            recipient: None,
        }
    }

    #[test]
    fn test_debug_redacts_password() {
        let printed = format!("{:?}", sample());
        assert!(!printed.contains("hunter2"));
        assert!(printed.contains("***"));
        assert!(printed.contains("reports@example.com"));
    }
}
