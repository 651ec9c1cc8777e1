use taskflow_core::{AppError, StorageError};
use taskflow_services::StoreError;

use super::IntoAppError;

impl IntoAppError for StoreError {
    fn into_app_error(self) -> AppError {
        match self {
            StoreError::InvalidKey(key) => AppError::Storage(StorageError::InvalidKey(key)),
            e @ StoreError::Io { .. } => AppError::Storage(StorageError::Unavailable(e.to_string())),
            StoreError::Serialize(e) => AppError::Storage(StorageError::WriteFailed(e.to_string())),
        }
    }
}
