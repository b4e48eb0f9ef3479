use thiserror::Error;

/// Everything that can go wrong with the decorative scene.
///
/// None of these are fatal to the page: the worst outcome is the static
/// fallback background.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SceneError {
    #[error("no hardware-accelerated context available")]
    CapabilityUnavailable,
    #[error("scene construction failed: {0}")]
    Construction(String),
    #[error("rendering context lost")]
    ContextLost,
    #[error("GPU device lost permanently: {0}")]
    DeviceLost(String),
    #[error("frame failed: {0}")]
    Frame(String),
}

impl SceneError {
    pub fn construction(err: impl std::fmt::Display) -> Self {
        SceneError::Construction(err.to_string())
    }

    pub fn frame(err: impl std::fmt::Display) -> Self {
        SceneError::Frame(err.to_string())
    }

    /// Whether the error means the GPU resources can never be used again.
    pub fn is_permanent(&self) -> bool {
        matches!(self, SceneError::DeviceLost(_))
    }
}
