use std::io;
use thiserror::Error;

/// Everything that can go wrong between the frontend, the Lua runtime and the
/// script it drives.
///
/// Lua errors are carried as rendered messages (including the traceback) so
/// that a `HostError` can itself be raised back into Lua.
#[derive(Debug, Error)]
pub enum HostError {
    #[error("could not initialise display surface: {0}")]
    Surface(String),

    #[error("could not create scripting runtime: {0}")]
    Runtime(String),

    #[error("could not register {name}: {reason}")]
    Registration { name: &'static str, reason: String },

    #[error("could not load script {path}: {reason}")]
    ScriptLoad { path: String, reason: String },

    #[error("script raised an error: {0}")]
    Script(String),

    #[error("key index {0} is outside the keypad (0-15)")]
    KeyOutOfRange(i64),

    #[error("{name} takes {expected} argument(s), got {got}")]
    Arity {
        name: &'static str,
        expected: usize,
        got: usize,
    },

    #[error("{name}: expected {expected}, got {got}")]
    ArgumentType {
        name: &'static str,
        expected: &'static str,
        got: String,
    },

    #[error("invalid keymap: {0}")]
    InvalidKeyMap(String),

    #[error("host cancelled by user")]
    Cancelled,

    #[error(transparent)]
    Io(#[from] io::Error),
}

impl HostError {
    /// classify an error coming back out of the script: the quit signal raised
    /// by `process-user-input` becomes `Cancelled`, anything else is a script
    /// failure
    pub fn from_script(err: mlua::Error) -> Self {
        if is_cancellation(&err) {
            HostError::Cancelled
        } else {
            HostError::Script(err.to_string())
        }
    }
}

/// walk the callback chain mlua builds as an error crosses the Lua boundary
pub fn is_cancellation(err: &mlua::Error) -> bool {
    match err {
        mlua::Error::CallbackError { cause, .. } => is_cancellation(cause),
        mlua::Error::WithContext { cause, .. } => is_cancellation(cause),
        mlua::Error::ExternalError(e) => {
            matches!(e.downcast_ref::<HostError>(), Some(HostError::Cancelled))
        }
        _ => false,
    }
}

impl From<HostError> for mlua::Error {
    fn from(e: HostError) -> Self {
        mlua::Error::external(e)
    }
}
