//! Closed status/category enumerations shared by every record kind.
//!
//! Each enum is declared through [`define_status_enum!`], which fixes the
//! display label (also the serde representation), the ordered list of
//! variants used for filter tabs and counts, and the initial value a fresh
//! draft starts with.

use std::fmt;
use std::hash::Hash;

use serde::Serialize;

/// Behaviour the list machinery needs from a status enumeration.
pub trait Status:
    Copy + Eq + Hash + fmt::Debug + fmt::Display + Serialize + Send + Sync + 'static
{
    /// Every variant, in filter-tab order.
    const ALL: &'static [Self];

    /// Value a new draft starts with.
    const INITIAL: Self;

    /// Display/storage label.
    fn label(self) -> &'static str;
}

macro_rules! define_status_enum {
    (
        $(#[$meta:meta])*
        $name:ident (initial = $initial:ident) {
            $( $(#[$vmeta:meta])* $variant:ident => $label:literal ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
        pub enum $name {
            $( $(#[$vmeta])* #[serde(rename = $label)] $variant ),+
        }

        impl $name {
            /// Return the display/storage representation.
            pub fn as_str(self) -> &'static str {
                match self {
                    $( Self::$variant => $label ),+
                }
            }

            /// Parse from a label, returning an error for unknown values.
            pub fn from_str(s: &str) -> Result<Self, $crate::error::CoreError> {
                match s {
                    $( $label => Ok(Self::$variant), )+
                    other => Err($crate::error::CoreError::Validation(format!(
                        "Unknown {}: '{other}'. Must be one of: {}",
                        stringify!($name),
                        [$($label),+].join(", ")
                    ))),
                }
            }
        }

        impl $crate::status::Status for $name {
            const ALL: &'static [Self] = &[$( Self::$variant ),+];
            const INITIAL: Self = Self::$initial;

            fn label(self) -> &'static str {
                self.as_str()
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

/// Capitalise the first letter of a lowercase label (`"paid"` -> `"Paid"`).
pub fn title_case(label: &str) -> String {
    let mut chars = label.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
