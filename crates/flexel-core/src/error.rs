//! Error types for flexel-core.

use thiserror::Error;

/// Errors raised while setting or parsing style values.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StyleError {
    /// Property name not recognised by [`crate::Style::set_property`].
    #[error("Unknown style property: {0}")]
    UnknownProperty(String),

    /// Value not accepted by the property.
    #[error("Invalid value for {property}: {value:?}")]
    InvalidValue { property: String, value: String },

    /// Keyword not valid for the enum.
    #[error("Invalid {kind} keyword: {value:?}")]
    InvalidKeyword { kind: &'static str, value: String },

    /// Text that is neither `auto`, a number nor a percentage.
    #[error("Invalid length: {0:?}")]
    InvalidLength(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_style_error_messages() {
        let err = StyleError::UnknownProperty("colour".to_string());
        assert_eq!(err.to_string(), "Unknown style property: colour");

        let err = StyleError::InvalidValue {
            property: "border".to_string(),
            value: "10%".to_string(),
        };
        assert!(err.to_string().contains("border"));
        assert!(err.to_string().contains("10%"));

        let err = StyleError::InvalidLength("wide".to_string());
        assert_eq!(err.to_string(), "Invalid length: \"wide\"");
    }
}
