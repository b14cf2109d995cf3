//! Remote control surface: provisioning requests and their parsing.

pub mod provision;

pub use provision::{Flags, UpdateRequest};

#[derive(Debug, thiserror::Error)]
pub enum ControlError {
    #[error("malformed update: {0}")]
    Malformed(String),
    #[error("Store: {0}")]
    Store(#[from] crate::store::StoreError),
}

/// Result code returned to the remote caller: 1 on success, -1 on failure.
pub fn status_code<T>(result: &Result<T, ControlError>) -> i32 {
    match result {
        Ok(_) => 1,
        Err(_) => -1,
    }
}
