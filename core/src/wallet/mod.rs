pub mod import;
pub mod secret;

pub use import::{FormStatus, ImportError, SecretImporter, WalletImportForm};
pub use secret::{SecretKey, WalletError, SECRET_KEY_LENGTH, SECRET_KEY_PREFIX};
