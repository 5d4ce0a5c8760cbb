/// Convenience result type used across catvatar.
pub type AvatarResult<T> = Result<T, AvatarError>;

/// Top-level error taxonomy for the IO-facing edges of the crate.
///
/// Customization and lifecycle paths never surface these: they degrade to
/// "keep the prior valid state". Errors only escape from file stores, config
/// loading and rendering helpers.
#[derive(thiserror::Error, Debug)]
pub enum AvatarError {
    /// Invalid user-provided value (part name, color text, accessory tag, config).
    #[error("validation error: {0}")]
    Validation(String),

    /// Persistent key-value store failures.
    #[error("store error: {0}")]
    Store(String),

    /// Rasterization or image output failures.
    #[error("render error: {0}")]
    Render(String),

    /// Errors when serializing or deserializing data structures.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl AvatarError {
    /// Build a [`AvatarError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`AvatarError::Store`] value.
    pub fn store(msg: impl Into<String>) -> Self {
        Self::Store(msg.into())
    }

    /// Build a [`AvatarError::Render`] value.
    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }

    /// Build a [`AvatarError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
