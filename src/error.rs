#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Store: {0}")]
    Store(#[from] crate::store::StoreError),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
