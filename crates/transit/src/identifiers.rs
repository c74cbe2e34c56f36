//! Type-safe identifiers for transit entities.
//!
//! Backed by `Arc<str>` so cloning an identifier never copies the string.

use std::fmt;
use std::sync::Arc;

macro_rules! identifier {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        pub struct $name(Arc<str>);

        impl $name {
            pub fn new(value: impl AsRef<str>) -> Self {
                Self(Arc::from(value.as_ref()))
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self::new(value)
            }
        }

        impl From<String> for $name {
            fn from(value: String) -> Self {
                Self::new(value)
            }
        }
    };
}

identifier! {
    /// Identifies a transit route ("Ruta-01", "10004", ...).
    RouteIdentifier
}

identifier! {
    /// Identifies a single stop along a route.
    StopIdentifier
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn equality_and_hashing() {
        let a = RouteIdentifier::new("Ruta-01");
        let b = RouteIdentifier::new("Ruta-01");
        assert_eq!(a, b);

        let mut map = HashMap::new();
        map.insert(a, 1);
        assert_eq!(map.get(&b), Some(&1));
    }

    #[test]
    fn display_and_conversions() {
        let id: StopIdentifier = "14020000".into();
        assert_eq!(id.to_string(), "14020000");
        assert_eq!(StopIdentifier::from(String::from("x")).as_str(), "x");
    }
}
