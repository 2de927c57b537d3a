use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Error {
    /// A tree was asked to hold zero elements per node.
    #[error("invalid configuration: node capacity must be at least 1")]
    ZeroCapacity,
}
