use std::{error, fmt};

use serde::{Deserialize, Serialize};

/// Maximum number of positional `params` a `Command` may carry.
pub const MAX_PARAMS: usize = 15;

/// Maximum number of `(key, value)` pairs a `Message` may carry.
pub const MAX_HEADERS: usize = 65535;

#[derive(Debug, Eq, PartialEq)]
pub enum CommandError {
    TooManyParams(usize),
    TooManyHeaders(usize),
}

impl fmt::Display for CommandError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            CommandError::TooManyParams(n) => {
                write!(f, "command carries {} params, max is {}", n, MAX_PARAMS)
            }
            CommandError::TooManyHeaders(n) => {
                write!(f, "message carries {} headers, max is {}", n, MAX_HEADERS)
            }
        }
    }
}

impl error::Error for CommandError {}

/// An ordered list of key/value header pairs, opaque byte strings on both sides.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct Message {
    headers: Vec<(Vec<u8>, Vec<u8>)>,
}

impl Message {
    pub fn new(headers: Vec<(Vec<u8>, Vec<u8>)>) -> Result<Self, CommandError> {
        if headers.len() > MAX_HEADERS {
            return Err(CommandError::TooManyHeaders(headers.len()));
        }
        Ok(Message { headers })
    }

    pub fn empty() -> Self {
        Message { headers: Vec::new() }
    }

    pub fn headers(&self) -> &[(Vec<u8>, Vec<u8>)] {
        &self.headers
    }
}

/// The application-level message this protocol carries, opaque to the
/// session and codec beyond the fields laid out here.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Command {
    kind: u8,
    params: Vec<Vec<u8>>,
    message: Message,
    body: Vec<u8>,
}

impl Command {
    pub fn new(
        kind: u8,
        params: Vec<Vec<u8>>,
        message: Message,
        body: Vec<u8>,
    ) -> Result<Self, CommandError> {
        if params.len() > MAX_PARAMS {
            return Err(CommandError::TooManyParams(params.len()));
        }
        Ok(Command { kind, params, message, body })
    }

    pub fn kind(&self) -> u8 {
        self.kind
    }

    pub fn params(&self) -> &[Vec<u8>] {
        &self.params
    }

    pub fn message(&self) -> &Message {
        &self.message
    }

    pub fn body(&self) -> &[u8] {
        &self.body
    }
}
