//! Core data types for the tweak rewriter.
//!
//! Everything in this crate is pure: no file access, no runtime. The stateful
//! rewriter lives in `tweak-io` and builds on these pieces:
//!
//! - [`ParamSpec`]: one discovered numeric literal, as handed over by the
//!   discovery process (deserializable from its JSON output).
//! - [`LiteralStyle`]: the split of a literal's text into numeric prefix and
//!   unit suffix.
//! - [`ValueFormat`] / [`format_value`]: re-rendering an arbitrary value in the
//!   style of an existing literal.
//! - [`Bounds`]: validated inclusive range that every written value is clamped
//!   into.
pub mod format;
pub mod literal;
pub mod spec;

pub use format::{format_value, step_decimals, FormattedValue, ValueFormat};
pub use literal::LiteralStyle;
pub use spec::{parse_specs_json, validate_specs, Bounds, ParamSpec, SpecError};

mod ids {
    use serde::{Deserialize, Serialize};

    /// Opaque identifier of a tracked parameter, stable for the session.
    #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
    #[serde(transparent)]
    pub struct ParamId(String);

    impl ParamId {
        pub fn new(id: impl Into<String>) -> Self {
            Self(id.into())
        }

        pub fn as_str(&self) -> &str {
            &self.0
        }
    }

    impl std::fmt::Display for ParamId {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            f.write_str(&self.0)
        }
    }

    impl From<&str> for ParamId {
        fn from(value: &str) -> Self {
            Self(value.to_string())
        }
    }

    impl From<String> for ParamId {
        fn from(value: String) -> Self {
            Self(value)
        }
    }
}

pub use ids::ParamId;
