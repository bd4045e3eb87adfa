use thiserror::Error;

#[derive(Debug, Error)]
pub enum UnderwriteError {
    #[error("Invalid input: {field}: {reason}")]
    InvalidInput { field: String, reason: String },

    #[error("Degenerate investment: down payment and rehab cost are both zero, so cash-on-cash return is undefined")]
    DegenerateInvestment,

    #[error("Arithmetic overflow in {context}")]
    Overflow { context: String },

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl UnderwriteError {
    /// Name of the offending input field, when the error is tied to one.
    pub fn field(&self) -> Option<&str> {
        match self {
            UnderwriteError::InvalidInput { field, .. } => Some(field),
            _ => None,
        }
    }

    /// Stable snake_case identifier used on the wire.
    pub fn kind(&self) -> &'static str {
        match self {
            UnderwriteError::InvalidInput { .. } => "invalid_input",
            UnderwriteError::DegenerateInvestment => "degenerate_investment",
            UnderwriteError::Overflow { .. } => "overflow",
            UnderwriteError::SerializationError(_) => "serialization_error",
        }
    }
}

impl From<serde_json::Error> for UnderwriteError {
    fn from(e: serde_json::Error) -> Self {
        UnderwriteError::SerializationError(e.to_string())
    }
}
