//! Conversions from service-crate errors into `AppError`.
//!
//! The service crates don't depend on `taskflow-core`, so the mapping lives
//! here as an extension trait.

mod storage;
mod weather;

use taskflow_core::AppError;

/// Convert a service error into the application error hierarchy.
pub trait IntoAppError {
    fn into_app_error(self) -> AppError;
}
