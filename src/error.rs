use thiserror::Error;

/// Failures raised by the default-name handling of a
/// [`SharedRegistries`](crate::SharedRegistries) directory.
///
/// Both variants signal a usage error by the caller; no operation retries
/// internally and no other operation of the directory can fail.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum Error {
    /// No default name has been configured since the directory was created
    /// or last cleared
    #[error("default registry name has not been set")]
    DefaultNotSet,
    /// A default name is already configured
    #[error("default metric registry name is already set")]
    DefaultAlreadySet,
}
