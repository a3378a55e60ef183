use std::io;
use thiserror::Error;

/// Errors a keypad source can report. Only `Quit` and the hard failures stop
/// the machine; `NoKey` is the ordinary "nothing pressed" answer.
#[derive(Debug, Error)]
pub enum KeypadError {
    #[error("no key pressed")]
    NoKey,

    #[error("quit requested")]
    Quit,

    #[error("null keypad not usable")]
    Unavailable,

    #[error(transparent)]
    Io(#[from] io::Error),
}

/// Everything that can stop the interpreter.
#[derive(Debug, Error)]
pub enum Error {
    #[error("unknown opcode: {opcode:#06X}")]
    UnknownOpcode { opcode: u16 },

    /// Not a failure: the keypad asked us to shut down.
    #[error("shutting down")]
    Quit,

    #[error("unable to get key from keypad")]
    Keypad(#[source] KeypadError),

    #[error("program is {size} bytes, only {available} bytes free from {offset:#05X}")]
    LoadOverflow {
        size: usize,
        available: usize,
        offset: u16,
    },

    #[error("unable to read program: {0}")]
    Load(#[source] io::Error),

    #[error("unable to render display: {0}")]
    Display(#[source] io::Error),

    #[error("unable to sound timer cue: {0}")]
    Sound(#[source] io::Error),

    #[error("stack overflow calling {addr:#05X}")]
    StackOverflow { addr: u16 },

    #[error("stack underflow returning from {pc:#05X}")]
    StackUnderflow { pc: u16 },
}

impl From<KeypadError> for Error {
    fn from(err: KeypadError) -> Self {
        match err {
            KeypadError::Quit => Error::Quit,
            other => Error::Keypad(other),
        }
    }
}
