//! Interned identifiers for categories, nodes and lines.
//!
//! Every name the layout engine keys on (category names, node and subnode
//! labels, line ids) is an [`Id`]. Interning makes the id `Copy` and cheap to
//! hash, which matters because the sweep builds one map per category keyed by
//! line id.

use std::{
    fmt,
    sync::{Mutex, OnceLock},
};

use serde::{Deserialize, Deserializer, de};
use string_interner::{DefaultStringInterner, DefaultSymbol};

/// Global string interner for identifier storage.
///
/// # Thread Safety
///
/// This uses `Mutex` for thread-safe access to the string interner.
static INTERNER: OnceLock<Mutex<DefaultStringInterner>> = OnceLock::new();

fn with_interner<T>(f: impl FnOnce(&mut DefaultStringInterner) -> T) -> T {
    let mut interner = INTERNER
        .get_or_init(|| Mutex::new(DefaultStringInterner::new()))
        .lock()
        .expect("Failed to acquire interner lock");
    f(&mut interner)
}

/// Interned identifier.
///
/// # Examples
///
/// ```
/// use alluvia_core::identifier::Id;
///
/// let category = Id::new("Feedstock");
/// let line: Id = 7usize.into();
///
/// assert_eq!(category, "Feedstock");
/// assert_eq!(line, "7");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Id(DefaultSymbol);

impl Id {
    /// Creates an `Id` from &str.
    ///
    /// # Arguments
    ///
    /// * `name` - The string representation of the identifier
    pub fn new(name: &str) -> Self {
        Self(with_interner(|interner| interner.get_or_intern(name)))
    }

    /// Joins identifiers with `_`, the separator used in path segment names.
    ///
    /// # Examples
    ///
    /// ```
    /// use alluvia_core::identifier::Id;
    ///
    /// let name = Id::join(&[Id::new("A"), Id::new("a1"), Id::new("3")]);
    /// assert_eq!(name, "A_a1_3");
    /// ```
    pub fn join(parts: &[Id]) -> String {
        with_interner(|interner| {
            parts
                .iter()
                .map(|id| {
                    interner
                        .resolve(id.0)
                        .expect("Symbol should exist in interner")
                })
                .collect::<Vec<_>>()
                .join("_")
        })
    }
}

impl fmt::Display for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let value = with_interner(|interner| {
            interner
                .resolve(self.0)
                .expect("Symbol should exist in interner")
                .to_string()
        });
        write!(f, "{value}")
    }
}

impl std::str::FromStr for Id {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::new(s))
    }
}

impl From<&str> for Id {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<usize> for Id {
    /// Line ids are frequently sequential row numbers.
    fn from(idx: usize) -> Self {
        Self::new(&idx.to_string())
    }
}

impl PartialEq<str> for Id {
    /// Allows direct comparison with string slices: `id == "string"`
    fn eq(&self, other: &str) -> bool {
        with_interner(|interner| {
            interner
                .resolve(self.0)
                .expect("Symbol should exist in interner")
                == other
        })
    }
}

impl PartialEq<&str> for Id {
    fn eq(&self, other: &&str) -> bool {
        self == *other
    }
}

impl<'de> Deserialize<'de> for Id {
    /// Accepts strings and unsigned integers, so JSON line ids may be either.
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct IdVisitor;

        impl de::Visitor<'_> for IdVisitor {
            type Value = Id;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a string or an unsigned integer identifier")
            }

            fn visit_str<E: de::Error>(self, value: &str) -> Result<Id, E> {
                Ok(Id::new(value))
            }

            fn visit_u64<E: de::Error>(self, value: u64) -> Result<Id, E> {
                Ok(Id::new(&value.to_string()))
            }

            fn visit_i64<E: de::Error>(self, value: i64) -> Result<Id, E> {
                if value < 0 {
                    return Err(E::invalid_value(de::Unexpected::Signed(value), &self));
                }
                Ok(Id::new(&value.to_string()))
            }
        }

        deserializer.deserialize_any(IdVisitor)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    #[test]
    fn test_id_new_and_equality() {
        let id1 = Id::new("a1");
        let id2 = Id::new("a1");
        let id3 = Id::new("a2");

        assert_eq!(id1, id2);
        assert_ne!(id1, id3);
        assert!(id1 == "a1");
    }

    #[test]
    fn test_id_from_usize() {
        let id: Id = 42usize.into();
        assert_eq!(id, "42");
        assert_eq!(id, Id::new("42"));
    }

    #[test]
    fn test_id_display() {
        let id = Id::new("Biopolymer family");
        assert_eq!(id.to_string(), "Biopolymer family");
    }

    #[test]
    fn test_id_join() {
        let name = Id::join(&[Id::new("B"), Id::new("b1"), 5usize.into()]);
        assert_eq!(name, "B_b1_5");
        assert_eq!(Id::join(&[]), "");
    }

    #[test]
    fn test_id_as_map_key() {
        let mut map = HashMap::new();
        map.insert(Id::new("x"), 1);
        map.insert(Id::new("y"), 2);

        assert_eq!(map.get(&Id::new("x")), Some(&1));
        assert_eq!(map.get(&Id::new("z")), None);
    }

    #[test]
    fn test_id_deserialize_string_and_integer() {
        let ids: Vec<Id> = serde_json::from_str(r#"["left", 3]"#).unwrap();
        assert_eq!(ids, vec![Id::new("left"), Id::new("3")]);

        let negative: Result<Id, _> = serde_json::from_str("-1");
        assert!(negative.is_err());
    }
}
