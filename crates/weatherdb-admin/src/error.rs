use std::fmt;

use mongodb::error::ErrorKind;

/// Engine error codes the bootstrap can run into.
pub mod codes {
    pub const UNAUTHORIZED: i32 = 13;
    pub const NAMESPACE_NOT_FOUND: i32 = 26;
    pub const NAMESPACE_EXISTS: i32 = 48;
    pub const INDEX_KEY_SPECS_CONFLICT: i32 = 86;
    pub const DOCUMENT_VALIDATION_FAILURE: i32 = 121;
    pub const DUPLICATE_KEY: i32 = 11000;
    pub const USER_ALREADY_EXISTS: i32 = 51003;
}

#[derive(Debug)]
pub enum AdminError {
    Driver(String),
    Command {
        code: i32,
        code_name: String,
        message: String,
    },
}

impl AdminError {
    pub fn command(code: i32, code_name: &str, message: impl Into<String>) -> Self {
        AdminError::Command {
            code,
            code_name: code_name.to_string(),
            message: message.into(),
        }
    }

    pub fn code(&self) -> Option<i32> {
        match self {
            AdminError::Command { code, .. } => Some(*code),
            AdminError::Driver(_) => None,
        }
    }
}

impl fmt::Display for AdminError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AdminError::Driver(msg) => write!(f, "driver error: {msg}"),
            AdminError::Command {
                code,
                code_name,
                message,
            } => write!(f, "command failed ({code_name}, code {code}): {message}"),
        }
    }
}

impl std::error::Error for AdminError {}

impl From<mongodb::error::Error> for AdminError {
    fn from(e: mongodb::error::Error) -> Self {
        match e.kind.as_ref() {
            ErrorKind::Command(c) => AdminError::Command {
                code: c.code,
                code_name: c.code_name.clone(),
                message: c.message.clone(),
            },
            _ => AdminError::Driver(e.to_string()),
        }
    }
}
