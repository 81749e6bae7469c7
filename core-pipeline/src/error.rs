use thiserror::Error;

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error(transparent)]
    Platform(#[from] platform_traits::PlatformError),

    #[error(transparent)]
    State(#[from] core_state::StateError),

    #[error("Item \"{0}\" not found in manifest")]
    ItemNotFound(String),

    #[error("Cover image error: {0}")]
    Image(String),
}

pub type Result<T> = std::result::Result<T, PipelineError>;
