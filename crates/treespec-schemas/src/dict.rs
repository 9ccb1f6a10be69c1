//! Closed constant dictionaries
//!
//! Enumerations with a fixed, compile-time set of named values implement
//! [`ConstDict`] to get lookup by identifier name or by value, with a clear
//! error when the needle matches nothing.
//!
//! Copyright (c) 2025 Specado Team
//! Licensed under the Apache-2.0 license

use std::fmt;
use thiserror::Error;

/// Lookup failure for a [`ConstDict`]
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("There is no constant that matches \"{needle}\" in {dictionary}")]
pub struct UnknownIdentifier {
    /// Name of the dictionary that was searched
    pub dictionary: &'static str,
    /// The name or value that was looked up
    pub needle: String,
}

/// A closed set of named constants
pub trait ConstDict: Sized + Copy + 'static {
    /// Value carried by each constant
    type Value: PartialEq + Copy + fmt::Display + 'static;

    /// Name used in lookup errors
    const DICTIONARY: &'static str;

    /// Every constant in declaration order
    fn entries() -> &'static [(&'static str, Self)];

    /// The value of this constant
    fn value(self) -> Self::Value;

    /// The identifier of this constant
    fn name(self) -> &'static str
    where
        Self: PartialEq,
    {
        Self::entries()
            .iter()
            .find(|(_, entry)| *entry == self)
            .map(|(name, _)| *name)
            .unwrap_or("")
    }

    /// Look a constant up by its identifier
    fn from_name(name: &str) -> Result<Self, UnknownIdentifier> {
        Self::entries()
            .iter()
            .find(|(entry_name, _)| *entry_name == name)
            .map(|(_, entry)| *entry)
            .ok_or_else(|| UnknownIdentifier {
                dictionary: Self::DICTIONARY,
                needle: name.to_string(),
            })
    }

    /// Look a constant up by its value
    fn from_value(value: Self::Value) -> Result<Self, UnknownIdentifier> {
        Self::entries()
            .iter()
            .find(|(_, entry)| entry.value() == value)
            .map(|(_, entry)| *entry)
            .ok_or_else(|| UnknownIdentifier {
                dictionary: Self::DICTIONARY,
                needle: value.to_string(),
            })
    }

    /// Look up by identifier first, then by the textual form of the value
    fn lookup(needle: &str) -> Result<Self, UnknownIdentifier> {
        Self::from_name(needle).or_else(|_| {
            Self::entries()
                .iter()
                .find(|(_, entry)| entry.value().to_string() == needle)
                .map(|(_, entry)| *entry)
                .ok_or_else(|| UnknownIdentifier {
                    dictionary: Self::DICTIONARY,
                    needle: needle.to_string(),
                })
        })
    }

    /// Whether `needle` names a constant or matches a value's textual form
    fn is_known(needle: &str) -> bool {
        Self::lookup(needle).is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum Color {
        Red,
        Green,
    }

    impl ConstDict for Color {
        type Value = u8;
        const DICTIONARY: &'static str = "Color";

        fn entries() -> &'static [(&'static str, Self)] {
            &[("RED", Color::Red), ("GREEN", Color::Green)]
        }

        fn value(self) -> u8 {
            match self {
                Color::Red => 1,
                Color::Green => 2,
            }
        }
    }

    #[test]
    fn test_lookup_by_name_and_value() {
        assert_eq!(Color::from_name("GREEN"), Ok(Color::Green));
        assert_eq!(Color::from_value(1), Ok(Color::Red));
        assert_eq!(Color::lookup("2"), Ok(Color::Green));
        assert_eq!(Color::Red.name(), "RED");
        assert!(Color::is_known("RED"));
        assert!(!Color::is_known("BLUE"));
    }

    #[test]
    fn test_unknown_identifier_message() {
        let err = Color::lookup("BLUE").unwrap_err();
        assert_eq!(err.to_string(), "There is no constant that matches \"BLUE\" in Color");
        assert_eq!(Color::from_value(9).unwrap_err().needle, "9");
    }
}
