#![forbid(unsafe_code)]

//! Registry and loader error types.

use thiserror::Error;

/// Resolution-state failures during registry substitution.
///
/// Both variants mean the registry no longer matches the namespace being
/// initialized. There is no safe recovery: continuing would corrupt attribute
/// resolution, so these always propagate.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InitError {
    #[error("namespace `{name}` is not registered")]
    Unregistered { name: String },

    #[error("registry entry for `{name}` is bound to a different variable table")]
    ForeignEntry { name: String },
}

/// Failures while loading a namespace through the [`Loader`](crate::Loader).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LoadError {
    #[error("a namespace named `{name}` is already loaded")]
    DuplicateName { name: String },

    #[error(transparent)]
    Init(#[from] InitError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn init_errors_convert_into_load_errors() {
        let err: LoadError = InitError::Unregistered {
            name: "sensors".into(),
        }
        .into();
        assert_eq!(err.to_string(), "namespace `sensors` is not registered");
    }
}
