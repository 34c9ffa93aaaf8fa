use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Stellar secret seeds start with `S`.
pub const SECRET_KEY_PREFIX: char = 'S';
pub const SECRET_KEY_LENGTH: usize = 56;

/// Local validation failures. The `Display` text is shown to the user as is.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum WalletError {
    #[error("Enter a secret key")]
    Empty,
    #[error("Secret key must start with '{}'", SECRET_KEY_PREFIX)]
    MissingPrefix,
    #[error("Secret key must be {expected} characters long (got {actual})")]
    WrongLength { expected: usize, actual: usize },
}

/// A secret key that passed the prefix and length checks.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SecretKey(String);

impl SecretKey {
    /// Input is checked verbatim; surrounding whitespace is not stripped.
    pub fn parse(input: &str) -> Result<Self, WalletError> {
        if input.trim().is_empty() {
            return Err(WalletError::Empty);
        }
        if !input.starts_with(SECRET_KEY_PREFIX) {
            return Err(WalletError::MissingPrefix);
        }
        let actual = input.chars().count();
        if actual != SECRET_KEY_LENGTH {
            return Err(WalletError::WrongLength {
                expected: SECRET_KEY_LENGTH,
                actual,
            });
        }
        Ok(Self(input.to_string()))
    }

    pub fn expose(&self) -> &str {
        &self.0
    }

    /// First and last four characters only.
    pub fn masked(&self) -> String {
        let head: String = self.0.chars().take(4).collect();
        let tail: String = self.0.chars().skip(SECRET_KEY_LENGTH - 4).collect();
        format!("{head}…{tail}")
    }
}

impl FromStr for SecretKey {
    type Err = WalletError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for SecretKey {
    type Error = WalletError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<SecretKey> for String {
    fn from(key: SecretKey) -> Self {
        key.0
    }
}

impl fmt::Debug for SecretKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SecretKey({})", self.masked())
    }
}

#[cfg(test)]
pub(crate) fn sample_secret() -> String {
    format!("S{}", "A".repeat(SECRET_KEY_LENGTH - 1))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_well_formed_secret() {
        let key = SecretKey::parse(&sample_secret()).unwrap();
        assert_eq!(key.expose(), sample_secret());
    }

    #[test]
    fn rejects_surrounding_whitespace() {
        assert_eq!(
            SecretKey::parse(&format!(" {}", sample_secret())),
            Err(WalletError::MissingPrefix)
        );
        assert_eq!(
            SecretKey::parse(&format!("{}\n", sample_secret())),
            Err(WalletError::WrongLength {
                expected: SECRET_KEY_LENGTH,
                actual: SECRET_KEY_LENGTH + 1,
            })
        );
        assert_eq!(SecretKey::parse(" \t"), Err(WalletError::Empty));
    }

    #[test]
    fn rejects_wrong_prefix() {
        let input = format!("G{}", "A".repeat(SECRET_KEY_LENGTH - 1));
        assert_eq!(SecretKey::parse(&input), Err(WalletError::MissingPrefix));
    }

    #[test]
    fn rejects_wrong_length() {
        assert_eq!(
            SecretKey::parse("SABC"),
            Err(WalletError::WrongLength {
                expected: 56,
                actual: 4
            })
        );
        let long = format!("{}A", sample_secret());
        assert!(matches!(
            SecretKey::parse(&long),
            Err(WalletError::WrongLength { actual: 57, .. })
        ));
    }

    #[test]
    fn rejects_blank_input() {
        assert_eq!(SecretKey::parse("   "), Err(WalletError::Empty));
    }

    #[test]
    fn debug_never_prints_full_secret() {
        let key: SecretKey = sample_secret().parse().unwrap();
        let rendered = format!("{key:?}");
        assert!(!rendered.contains(&sample_secret()));
        assert_eq!(key.masked(), "SAAA…AAAA");
    }

    #[test]
    fn deserialization_validates() {
        assert!(serde_json::from_str::<SecretKey>("\"nope\"").is_err());
        let json = format!("\"{}\"", sample_secret());
        assert!(serde_json::from_str::<SecretKey>(&json).is_ok());
    }
}
