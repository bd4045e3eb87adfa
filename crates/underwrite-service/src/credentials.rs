use async_trait::async_trait;

use crate::error::{ServiceError, ServiceResult};

/// Supplies the bearer token the client attaches to requests.
///
/// Implementations may refresh tokens behind the scenes; the client asks
/// once per request and sends no `Authorization` header on `None`.
#[async_trait]
pub trait CredentialProvider: Send + Sync {
    async fn bearer_token(&self) -> ServiceResult<Option<String>>;
}

/// No credentials.
#[derive(Debug, Clone, Copy, Default)]
pub struct Anonymous;

#[async_trait]
impl CredentialProvider for Anonymous {
    async fn bearer_token(&self) -> ServiceResult<Option<String>> {
        Ok(None)
    }
}

/// A fixed token, e.g. from `UNDERWRITE_API_TOKEN`.
#[derive(Debug, Clone)]
pub struct StaticToken(String);

impl StaticToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }
}

#[async_trait]
impl CredentialProvider for StaticToken {
    async fn bearer_token(&self) -> ServiceResult<Option<String>> {
        if self.0.is_empty() || self.0.chars().any(|c| c.is_whitespace() || c.is_control()) {
            return Err(ServiceError::Credentials(
                "static token is empty or contains whitespace".into(),
            ));
        }
        Ok(Some(self.0.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_stock_providers() {
        assert_eq!(Anonymous.bearer_token().await.unwrap(), None);
        assert_eq!(
            StaticToken::new("secret").bearer_token().await.unwrap().as_deref(),
            Some("secret")
        );
    }

    #[tokio::test]
    async fn test_malformed_static_token_rejected() {
        for token in ["", "two words", "line\nbreak"] {
            assert!(matches!(
                StaticToken::new(token).bearer_token().await,
                Err(ServiceError::Credentials(_))
            ));
        }
    }
}
