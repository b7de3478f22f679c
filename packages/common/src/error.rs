use thiserror::Error;

/// Errors raised while configuring a converter registry.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DispatchError {
    #[error("Converter '{0}' has no predicate; only the default converter may be unconditional")]
    MissingPredicate(String),
}

impl DispatchError {
    pub fn missing_predicate(name: impl Into<String>) -> Self {
        DispatchError::MissingPredicate(name.into())
    }
}
