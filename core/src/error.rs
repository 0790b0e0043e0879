use thiserror::Error;

/// An error returned from [crate::generate].
#[derive(Debug, Error)]
pub enum GenerateError {
    /// A declaration is missing its name, its return type, or a parameter type.
    #[error("malformed signature for function `{function}`: {reason}")]
    MalformedSignature { function: String, reason: String },
    /// Only returned when [crate::GenerateOptions::strict_names] is set.
    #[error("name collision on `{name}`: {reason}")]
    NameCollision { name: String, reason: String },
    /// The output sink rejected a write. Anything written before the failure is left in place.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl GenerateError {
    pub(crate) fn malformed<R: Into<String>>(function: &str, reason: R) -> GenerateError {
        GenerateError::MalformedSignature {
            function: function.to_owned(),
            reason: reason.into(),
        }
    }
}
