//! Strongly-typed identifier value objects.
//!
//! Identifiers are assigned by the storage layer; the core only compares and
//! hashes them, so they wrap the caller-supplied string.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::ValidationError;

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident, $field:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Creates an identifier, rejecting blank values.
            pub fn try_new(value: impl Into<String>) -> Result<Self, ValidationError> {
                let value = value.into();
                if value.trim().is_empty() {
                    return Err(ValidationError::empty_field($field));
                }
                Ok(Self(value))
            }

            /// Returns the identifier as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl FromStr for $name {
            type Err = ValidationError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::try_new(s)
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self(value.to_string())
            }
        }

        impl From<String> for $name {
            fn from(value: String) -> Self {
                Self(value)
            }
        }
    };
}

string_id!(
    /// Identifier of a node in the criteria hierarchy.
    CriterionId,
    "criterion_id"
);

string_id!(
    /// Identifier of an alternative being ranked.
    AlternativeId,
    "alternative_id"
);

string_id!(
    /// Identifier of an evaluator contributing pairwise judgments.
    EvaluatorId,
    "evaluator_id"
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn try_new_rejects_blank() {
        assert!(CriterionId::try_new("  ").is_err());
        assert!(AlternativeId::try_new("").is_err());
    }

    #[test]
    fn from_str_round_trips_display() {
        let id: EvaluatorId = "eval-7".parse().unwrap();
        assert_eq!(id.to_string(), "eval-7");
        assert_eq!(id.as_str(), "eval-7");
    }

    #[test]
    fn ids_serialize_transparently() {
        let id = CriterionId::from("cost");
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"cost\"");
    }

    #[test]
    fn ids_order_lexicographically() {
        let mut ids = vec![AlternativeId::from("b"), AlternativeId::from("a")];
        ids.sort();
        assert_eq!(ids[0].as_str(), "a");
    }
}
