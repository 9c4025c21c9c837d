//! Brazilian postal code (CEP) type.

use std::fmt;

use serde::{Serialize, Serializer};

/// Error returned when a postal code has no digits at all.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid CEP: {reason}")]
pub struct InvalidCep {
    reason: &'static str,
}

/// A normalized CEP: the digits of the input, with every other character
/// stripped.
///
/// This is the key used for geocoding and for the geocode cache, so
/// `"06622-000"` and `"06622000"` refer to the same entry.
///
/// # Examples
///
/// ```
/// use pas_server::domain::Cep;
///
/// let cep = Cep::parse("06622-000").unwrap();
/// assert_eq!(cep.as_str(), "06622000");
///
/// assert!(Cep::parse("").is_err());
/// assert!(Cep::parse("--").is_err());
/// ```
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Cep(String);

impl Cep {
    /// Parse a CEP, keeping only ASCII digits.
    ///
    /// Length is not checked: the geocoding provider decides whether a
    /// short or long code resolves.
    pub fn parse(s: &str) -> Result<Self, InvalidCep> {
        let digits: String = s.chars().filter(|c| c.is_ascii_digit()).collect();

        if digits.is_empty() {
            return Err(InvalidCep {
                reason: "must contain at least one digit",
            });
        }

        Ok(Cep(digits))
    }

    /// Returns the digits-only form.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Cep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Cep({})", self.0)
    }
}

impl fmt::Display for Cep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Serialize for Cep {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}
