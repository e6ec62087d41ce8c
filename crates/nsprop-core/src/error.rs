#![forbid(unsafe_code)]

//! Error types for declaration construction and attribute access.

use thiserror::Error;

/// Failure to construct a computed-attribute declaration.
///
/// Surfaced at declaration time, never deferred: a declaration with no
/// getter, setter, or deleter can never do anything useful.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DeclError {
    #[error("a property needs at least one of getter, setter, or deleter")]
    EmptySlots,
}

/// Failure while reading, writing, deleting, or calling an attribute.
///
/// These are surfaced to the caller exactly as a native attribute failure
/// would be; nothing is swallowed or retried.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AttrError {
    #[error("no attribute named `{attr}`")]
    NotFound { attr: String },

    #[error("attribute `{attr}` is not readable")]
    Unreadable { attr: String },

    #[error("attribute `{attr}` does not support assignment")]
    ReadOnly { attr: String },

    #[error("attribute `{attr}` does not support deletion")]
    NoDeleter { attr: String },

    #[error("attribute `{attr}` is not callable")]
    NotCallable { attr: String },

    /// An accessor or native function failed on its own terms.
    #[error("accessor for `{attr}` failed: {message}")]
    Failed { attr: String, message: String },
}

impl AttrError {
    /// Shorthand for a [`AttrError::Failed`] raised from inside user code.
    #[must_use]
    pub fn failed(attr: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Failed {
            attr: attr.into(),
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_messages_name_the_attribute() {
        let err = AttrError::ReadOnly {
            attr: "label".into(),
        };
        assert_eq!(
            err.to_string(),
            "attribute `label` does not support assignment"
        );

        let err = AttrError::failed("label", "sensor offline");
        assert_eq!(err.to_string(), "accessor for `label` failed: sensor offline");
    }

    #[test]
    fn decl_error_display() {
        assert_eq!(
            DeclError::EmptySlots.to_string(),
            "a property needs at least one of getter, setter, or deleter"
        );
    }
}
