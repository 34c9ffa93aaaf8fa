use log::info;
use scoutcore::wallet::{ImportError, SecretImporter, SecretKey};

/// In-memory wallet store behind `POST /wallet/import`. Keys never leave the
/// process and are only ever reported masked.
#[derive(Debug, Default)]
pub struct Keyring {
    keys: Vec<SecretKey>,
    capacity: Option<usize>,
}

impl Keyring {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            keys: Vec::new(),
            capacity: Some(capacity),
        }
    }

    pub fn masked(&self) -> Vec<String> {
        self.keys.iter().map(SecretKey::masked).collect()
    }
}

impl SecretImporter for Keyring {
    /// Refuses duplicates; errors once the keyring is full.
    fn import(&mut self, key: &SecretKey) -> Result<bool, ImportError> {
        if self.keys.contains(key) {
            return Ok(false);
        }
        if self.capacity.is_some_and(|cap| self.keys.len() >= cap) {
            return Err(ImportError("keyring is full".into()));
        }
        info!("wallet imported: {}", key.masked());
        self.keys.push(key.clone());
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(fill: char) -> SecretKey {
        SecretKey::parse(&format!("S{}", fill.to_string().repeat(55))).unwrap()
    }

    #[test]
    fn keyring_refuses_duplicates() {
        let mut keyring = Keyring::default();
        assert_eq!(keyring.import(&key('A')), Ok(true));
        assert_eq!(keyring.import(&key('A')), Ok(false));
        assert_eq!(keyring.masked(), vec!["SAAA…AAAA".to_string()]);
    }

    #[test]
    fn keyring_reports_full() {
        let mut keyring = Keyring::with_capacity(1);
        assert_eq!(keyring.import(&key('A')), Ok(true));
        assert!(keyring.import(&key('B')).is_err());
    }
}
