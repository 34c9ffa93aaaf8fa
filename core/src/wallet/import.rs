use crate::wallet::secret::{SecretKey, WalletError};

/// Failure reported by the caller-supplied import function.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("{0}")]
pub struct ImportError(pub String);

/// Caller-supplied import function. `Ok(false)` means the wallet refused the
/// key without raising an error.
pub trait SecretImporter {
    fn import(&mut self, key: &SecretKey) -> Result<bool, ImportError>;
}

impl<F> SecretImporter for F
where
    F: FnMut(&SecretKey) -> Result<bool, ImportError>,
{
    fn import(&mut self, key: &SecretKey) -> Result<bool, ImportError> {
        self(key)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum FormStatus {
    #[default]
    Idle,
    /// Rejected locally; the importer was not called.
    Invalid(WalletError),
    Submitting,
    /// The importer ran and failed.
    Failed(String),
    Imported,
}

/// State behind the wallet-import modal.
#[derive(Debug, Clone, Default)]
pub struct WalletImportForm {
    open: bool,
    input: String,
    status: FormStatus,
}

impl WalletImportForm {
    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn status(&self) -> &FormStatus {
        &self.status
    }

    pub fn open(&mut self) {
        self.open = true;
        self.status = FormStatus::Idle;
    }

    pub fn close(&mut self) {
        self.open = false;
        self.input.clear();
        if self.status != FormStatus::Imported {
            self.status = FormStatus::Idle;
        }
    }

    pub fn set_input(&mut self, value: String) {
        self.input = value;
        if matches!(self.status, FormStatus::Invalid(_) | FormStatus::Failed(_)) {
            self.status = FormStatus::Idle;
        }
    }

    /// Message to render under the input, if any.
    pub fn message(&self) -> Option<String> {
        match &self.status {
            FormStatus::Idle => None,
            FormStatus::Invalid(err) => Some(err.to_string()),
            FormStatus::Submitting => Some("Importing…".to_string()),
            FormStatus::Failed(reason) => Some(format!("Import failed: {reason}")),
            FormStatus::Imported => Some("Wallet imported".to_string()),
        }
    }

    /// Validates the current input. Returns the key to hand to an importer, or
    /// `None` when validation failed or a submission is already in flight.
    pub fn begin_submit(&mut self) -> Option<SecretKey> {
        if self.status == FormStatus::Submitting {
            return None;
        }
        match SecretKey::parse(&self.input) {
            Ok(key) => {
                self.status = FormStatus::Submitting;
                Some(key)
            }
            Err(err) => {
                self.status = FormStatus::Invalid(err);
                None
            }
        }
    }

    /// Records the importer's answer. Success closes the form; any failure
    /// leaves it open for another attempt.
    pub fn finish(&mut self, outcome: Result<bool, ImportError>) {
        match outcome {
            Ok(true) => {
                self.status = FormStatus::Imported;
                self.close();
            }
            Ok(false) => {
                self.status = FormStatus::Failed("the wallet rejected this key".to_string());
            }
            Err(err) => self.status = FormStatus::Failed(err.0),
        }
    }

    pub fn submit<I: SecretImporter>(&mut self, importer: &mut I) -> &FormStatus {
        if let Some(key) = self.begin_submit() {
            let outcome = importer.import(&key);
            self.finish(outcome);
        }
        &self.status
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wallet::secret::sample_secret;

    fn form_with(input: &str) -> WalletImportForm {
        let mut form = WalletImportForm::default();
        form.open();
        form.set_input(input.to_string());
        form
    }

    #[test]
    fn invalid_input_never_reaches_importer() {
        let mut calls = 0;
        let mut importer = |_: &SecretKey| -> Result<bool, ImportError> {
            calls += 1;
            Ok(true)
        };

        let bad_prefix = format!("X{}", &sample_secret()[1..]);
        for input in ["", "GABC", "SABC", bad_prefix.as_str()] {
            let mut form = form_with(input);
            assert!(matches!(form.submit(&mut importer), FormStatus::Invalid(_)));
            assert!(form.is_open());
        }
        drop(importer);
        assert_eq!(calls, 0);
    }

    #[test]
    fn success_closes_and_clears() {
        let mut form = form_with(&sample_secret());
        let mut importer =
            |key: &SecretKey| -> Result<bool, ImportError> { Ok(key.expose().starts_with('S')) };
        assert_eq!(form.submit(&mut importer), &FormStatus::Imported);
        assert!(!form.is_open());
        assert!(form.input().is_empty());
        assert_eq!(form.message().as_deref(), Some("Wallet imported"));
    }

    #[test]
    fn refusal_and_error_are_distinct_from_validation() {
        let mut form = form_with(&sample_secret());
        let mut refuses = |_: &SecretKey| -> Result<bool, ImportError> { Ok(false) };
        assert!(matches!(form.submit(&mut refuses), FormStatus::Failed(_)));
        assert!(form.is_open());
        assert!(form.message().unwrap().starts_with("Import failed"));

        let mut errors =
            |_: &SecretKey| -> Result<bool, ImportError> { Err(ImportError("network down".into())) };
        form.submit(&mut errors);
        assert_eq!(form.message().as_deref(), Some("Import failed: network down"));
        assert_eq!(form.input(), sample_secret());
    }

    #[test]
    fn editing_clears_previous_error() {
        let mut form = form_with("bad");
        form.begin_submit();
        assert!(matches!(form.status(), FormStatus::Invalid(_)));
        form.set_input("bad2".into());
        assert_eq!(form.status(), &FormStatus::Idle);
    }

    #[test]
    fn split_submit_blocks_double_submission() {
        let mut form = form_with(&sample_secret());
        assert!(form.begin_submit().is_some());
        assert!(form.begin_submit().is_none());
        form.finish(Ok(true));
        assert!(!form.is_open());
    }
}
