use thiserror::Error;

#[derive(Error, Debug)]
pub enum ManifestError {
    #[error("Manifest parse error: {0}")]
    Parse(String),

    #[error(transparent)]
    Source(#[from] platform_traits::PlatformError),
}

pub type Result<T> = std::result::Result<T, ManifestError>;
