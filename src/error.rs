//! Error types shared by the task codec, the task list and the chat layer.

use thiserror::Error;

/// Message carried by [`Error::InvalidDateFormat`] once every date pattern has been tried.
pub const DATE_FORMAT_HINT: &str =
    "Invalid date or time format. Please use formats like 'dd/MM/yyyy HHmm' or 'MMM dd yyyy'.";

#[derive(Debug, Error)]
pub enum Error {
    /// A persistence line could not be decoded. This also covers lines that are too
    /// short for the fixed offsets or that miss a field marker.
    #[error("Invalid task line: {0}")]
    InvalidFormat(String),

    #[error("{0}")]
    InvalidDateFormat(String),

    #[error("The description of a {0} cannot be empty.")]
    EmptyDescription(&'static str),

    /// The description contains text the persistence line uses as a field marker.
    #[error("A description can't contain '{0}'.")]
    ReservedMarker(&'static str),

    #[error("A description has to fit on a single line.")]
    ControlCharacter,

    #[error("A {command} needs a '{flag}' part.")]
    MissingArgument {
        command: &'static str,
        flag: &'static str,
    },

    #[error("There is no task number {0} in your list.")]
    InvalidIndex(String),

    #[error("I don't know what '{0}' means.")]
    UnknownCommand(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
