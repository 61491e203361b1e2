use crate::bridge::BridgeError;
use latch_core::ecs::EntityId;
use std::path::PathBuf;
use thiserror::Error;

/// Errors produced by the scripting layer.
#[derive(Debug, Error)]
pub enum ScriptError {
    #[error("JavaScript engine error: {0}")]
    Js(#[from] rquickjs::Error),

    #[error("uncaught exception in {context}: {message}")]
    Exception { context: String, message: String },

    #[error("script class '{0}' is not registered")]
    UnknownClass(String),

    #[error("{0} already has a script attached")]
    AlreadyAttached(EntityId),

    #[error("{0} has no script attached")]
    NotAttached(EntityId),

    #[error("tick delta must be finite and non-negative, got {0}")]
    InvalidDelta(f32),

    #[error(transparent)]
    Bridge(#[from] BridgeError),

    #[error("failed to read script {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Free-form failure raised by a native behaviour.
    #[error("{0}")]
    Behaviour(String),
}
