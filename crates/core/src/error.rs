use crate::BeatTime;

/// Result alias that carries the custom [`SequencerError`] type.
pub type Result<T> = std::result::Result<T, SequencerError>;

/// Common error type for the core crate.
///
/// Every variant aborts show generation; nothing is exported after an error.
#[derive(Debug, thiserror::Error)]
pub enum SequencerError {
    /// Free-form message for failures that do not warrant their own variant.
    #[error("{0}")]
    Message(String),
    /// A precondition on an instruction's arguments was violated.
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("unknown asset `{0}`")]
    UnknownAsset(String),
    #[error("unknown material `{0}`")]
    UnknownMaterial(String),
    #[error("unknown instance handle #{0}")]
    UnknownInstance(usize),
    #[error("instance #{instance} cannot be removed at beat {removal}: it is placed at beat {placed}")]
    RemovalBeforePlacement {
        instance: usize,
        placed: BeatTime,
        removal: BeatTime,
    },
    #[error("instance #{instance} already has a removal scheduled at beat {existing}")]
    AlreadyScheduled { instance: usize, existing: BeatTime },
    #[error("cannot stagger the removal of an empty teardown set")]
    EmptyTeardown,
    /// Wrapper around standard IO errors.
    #[error("{0}")]
    Io(#[from] std::io::Error),
    #[error("json: {0}")]
    Json(#[from] serde_json::Error),
}

impl SequencerError {
    /// Creates a new error that simply wraps the provided message.
    pub fn msg<T: Into<String>>(msg: T) -> Self {
        Self::Message(msg.into())
    }

    pub fn invalid<T: Into<String>>(msg: T) -> Self {
        Self::InvalidInput(msg.into())
    }
}

impl From<&str> for SequencerError {
    fn from(value: &str) -> Self {
        Self::msg(value)
    }
}

impl From<String> for SequencerError {
    fn from(value: String) -> Self {
        Self::Message(value)
    }
}

/// Rejects NaN and infinite beat values with a descriptive error.
pub(crate) fn ensure_finite(what: &str, value: f64) -> Result<()> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(SequencerError::invalid(format!(
            "{what} must be finite, got {value}"
        )))
    }
}
