// Session storage in the OS keyring: one entry per key under the
// `eventos` service, named `{profile}/{key}`.

use eventos_core::{DurableStorage, StorageError};

use crate::keyring_entry;

#[derive(Debug, Clone)]
pub struct KeyringStorage {
    profile: String,
}

impl KeyringStorage {
    pub fn new(profile: impl Into<String>) -> Self {
        Self {
            profile: profile.into(),
        }
    }

    fn entry(&self, key: &str) -> Result<keyring::Entry, StorageError> {
        keyring_entry(&self.profile, key).map_err(backend)
    }
}

fn backend(err: keyring::Error) -> StorageError {
    StorageError::Backend(err.to_string())
}

impl DurableStorage for KeyringStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        match self.entry(key)?.get_password() {
            Ok(value) => Ok(Some(value)),
            Err(keyring::Error::NoEntry) => Ok(None),
            Err(e) => Err(backend(e)),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.entry(key)?.set_password(value).map_err(backend)
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        match self.entry(key)?.delete_credential() {
            Ok(()) | Err(keyring::Error::NoEntry) => Ok(()),
            Err(e) => Err(backend(e)),
        }
    }
}
