mod directory;
mod error;

/// Export the registry directory
pub use directory::SharedRegistries;
/// Export the error type
pub use error::Error;
