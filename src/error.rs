pub type OrogenResult<T> = Result<T, OrogenError>;

#[derive(thiserror::Error, Debug)]
pub enum OrogenError {
    #[error("invalid operation: {0}")]
    InvalidOperation(String),

    #[error("position out of range: row {row}, col {col}")]
    OutOfRange { row: usize, col: usize },

    #[error("missing argument: {0}")]
    MissingArgument(String),

    #[error("invalid dimension: {0}")]
    InvalidDimension(String),

    #[error("schema error: {0}")]
    Schema(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl OrogenError {
    pub fn invalid_operation(msg: impl Into<String>) -> Self {
        Self::InvalidOperation(msg.into())
    }

    pub fn missing_argument(msg: impl Into<String>) -> Self {
        Self::MissingArgument(msg.into())
    }

    pub fn invalid_dimension(msg: impl Into<String>) -> Self {
        Self::InvalidDimension(msg.into())
    }

    pub fn schema(msg: impl Into<String>) -> Self {
        Self::Schema(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_prefixes_are_stable() {
        assert!(
            OrogenError::invalid_operation("x")
                .to_string()
                .contains("invalid operation:")
        );
        assert!(
            OrogenError::OutOfRange { row: 3, col: 7 }
                .to_string()
                .contains("row 3, col 7")
        );
        assert!(
            OrogenError::missing_argument("x")
                .to_string()
                .contains("missing argument:")
        );
        assert!(
            OrogenError::invalid_dimension("x")
                .to_string()
                .contains("invalid dimension:")
        );
        assert!(OrogenError::schema("x").to_string().contains("schema error:"));
    }

    #[test]
    fn other_preserves_source() {
        let base = std::io::Error::other("boom");
        let err = OrogenError::Other(anyhow::Error::new(base));
        assert!(err.to_string().contains("boom"));
    }
}
