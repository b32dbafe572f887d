//! Error type shared by every coderain effect.

/// Errors raised while building or driving an effect.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EffectError {
    /// A required setting is missing, empty or out of range.
    #[error("invalid configuration: `{field}` {reason}")]
    Configuration {
        field: &'static str,
        reason: String,
    },

    /// The drawing surface or container the effect renders into is gone.
    #[error("render target missing: {0}")]
    RenderTargetMissing(String),

    /// A direction or effect variant that is not implemented.
    #[error("unsupported {kind} `{value}`")]
    UnsupportedVariant { kind: &'static str, value: String },

    /// The effect was destroyed and can no longer be started.
    #[error("effect has been destroyed")]
    Destroyed,
}

impl EffectError {
    /// Shorthand for a [`EffectError::Configuration`] error.
    pub fn config(field: &'static str, reason: impl Into<String>) -> Self {
        Self::Configuration {
            field,
            reason: reason.into(),
        }
    }
}

/// Convenience result alias for effect operations.
pub type Result<T> = std::result::Result<T, EffectError>;
