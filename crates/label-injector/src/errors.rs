use thiserror::Error;

pub type Result<T> = std::result::Result<T, AdmissionError>;

#[derive(Debug, Error)]
pub enum AdmissionError {
    #[error("expected application/json content-type, got {0:?}")]
    UnsupportedMediaType(String),

    #[error("cannot decode admission review: {0}")]
    Decode(String),

    #[error("cannot serialize admission review response: {0}")]
    Serialization(String),
}

impl AdmissionError {
    /// Errors caused by the caller, as opposed to defects of this service
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            AdmissionError::UnsupportedMediaType(_) | AdmissionError::Decode(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::*;

    #[rstest]
    #[case(AdmissionError::UnsupportedMediaType("text/plain".to_owned()), true)]
    #[case(AdmissionError::Decode("missing field `uid`".to_owned()), true)]
    #[case(AdmissionError::Serialization("key must be a string".to_owned()), false)]
    fn input_errors(#[case] error: AdmissionError, #[case] expected: bool) {
        assert_eq!(error.is_input_error(), expected);
    }
}
