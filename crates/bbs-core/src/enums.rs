//! Closed enumerations used by step attributes.
//!
//! Each enum has:
//! - Custom Serialize (as its canonical upper-case string)
//! - Custom Deserialize (case-insensitive, unknown strings are rejected)
//! - `as_str()`, `ALL`, `Display` and `FromStr` impls

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Error returned when a string names no variant of a closed enum.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid {kind} '{input}' (expected one of: {expected})")]
pub struct ParseEnumError {
    /// Human-readable name of the enum.
    pub kind: &'static str,
    /// The rejected input.
    pub input: String,
    /// Comma-separated list of accepted spellings.
    pub expected: String,
}

// ---------------------------------------------------------------------------
// Macro: defines a closed enum with canonical string forms.
// ---------------------------------------------------------------------------
macro_rules! define_enum {
    (
        $(#[$meta:meta])*
        $name:ident, label = $label:expr,
        variants: [
            $( ($variant:ident, $str:expr) ),+ $(,)?
        ]
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub enum $name {
            $( $variant, )+
        }

        impl $name {
            /// Every variant, in declaration order.
            pub const ALL: &'static [$name] = &[ $( Self::$variant, )+ ];

            /// Returns the canonical string representation.
            pub fn as_str(&self) -> &'static str {
                match self {
                    $( Self::$variant => $str, )+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = ParseEnumError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let trimmed = s.trim();
                $(
                    if trimmed.eq_ignore_ascii_case($str) {
                        return Ok(Self::$variant);
                    }
                )+
                Err(ParseEnumError {
                    kind: $label,
                    input: s.to_owned(),
                    expected: [$( $str ),+].join(", "),
                })
            }
        }

        impl Serialize for $name {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(self.as_str())
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let s = String::deserialize(deserializer)?;
                s.parse().map_err(serde::de::Error::custom)
            }
        }
    };
}

// ===========================================================================
// Polarization
// ===========================================================================

define_enum! {
    /// A correlation product of two linear feeds.
    Polarization, label = "correlation type",
    variants: [
        (XX, "XX"),
        (XY, "XY"),
        (YX, "YX"),
        (YY, "YY"),
    ]
}

// ===========================================================================
// CorrelationSelection
// ===========================================================================

define_enum! {
    /// Which correlations of a baseline a step works on.
    CorrelationSelection, label = "correlation selection",
    variants: [
        (Auto, "AUTO"),
        (Cross, "CROSS"),
        (All, "ALL"),
    ]
}

// ===========================================================================
// OperationKind
// ===========================================================================

define_enum! {
    /// The operation a step performs. Each kind owns a fixed attribute
    /// schema, see [`crate::operation`].
    OperationKind, label = "operation",
    variants: [
        (Predict, "PREDICT"),
        (Subtract, "SUBTRACT"),
        (Correct, "CORRECT"),
        (Solve, "SOLVE"),
        (Shift, "SHIFT"),
        (Refit, "REFIT"),
        (Noise, "NOISE"),
    ]
}

impl OperationKind {
    /// Returns the title-case name used as a parameter prefix (`Solve`).
    pub fn prefix(&self) -> &'static str {
        match self {
            Self::Predict => "Predict",
            Self::Subtract => "Subtract",
            Self::Correct => "Correct",
            Self::Solve => "Solve",
            Self::Shift => "Shift",
            Self::Refit => "Refit",
            Self::Noise => "Noise",
        }
    }
}
