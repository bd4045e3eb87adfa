use crate::error::{ServiceError, ServiceResult};
use std::net::SocketAddr;

#[derive(Debug, Clone)]
pub struct ServiceConfig {
    pub host: String,
    pub port: u16,
    /// Round money to cents and ROI to four places in responses.
    pub round_output: bool,
}

impl ServiceConfig {
    pub fn from_env() -> ServiceResult<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> ServiceResult<Self> {
        let port = var_or(&lookup, "UNDERWRITE_PORT", "8000")
            .parse::<u16>()
            .map_err(|e| ServiceError::Config(format!("UNDERWRITE_PORT: {e}")))?;

        let round_output = var_or(&lookup, "UNDERWRITE_ROUND_OUTPUT", "true")
            .parse::<bool>()
            .map_err(|e| ServiceError::Config(format!("UNDERWRITE_ROUND_OUTPUT: {e}")))?;

        Ok(Self {
            host: var_or(&lookup, "UNDERWRITE_HOST", "0.0.0.0"),
            port,
            round_output,
        })
    }

    pub fn bind_addr(&self) -> ServiceResult<SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|e| ServiceError::Config(format!("UNDERWRITE_HOST: {e}")))
    }
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
            round_output: true,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub api_url: String,
    pub api_token: Option<String>,
}

impl ClientConfig {
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        Self {
            api_url: var_or(&lookup, "UNDERWRITE_API_URL", "http://localhost:8000"),
            api_token: lookup("UNDERWRITE_API_TOKEN").filter(|t| !t.is_empty()),
        }
    }
}

fn var_or(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: &str) -> String {
    lookup(key).unwrap_or_else(|| default.to_string())
}
