use thiserror::Error;

/// Code answered for a malformed print job.
pub const INVALID_ARGUMENTS: &str = "invalid_arguments";
/// Code answered for a malformed Bluetooth call.
pub const INVALID_ARGUMENT: &str = "invalid_argument";

#[derive(Debug, Error)]
pub enum BridgeError {
    #[error("{message}")]
    InvalidArguments {
        code: &'static str,
        message: &'static str,
    },

    #[error("{api} failed (Win32 error {code})")]
    Os { api: &'static str, code: u32 },

    #[error("{0} is not supported on this platform")]
    Unsupported(&'static str),

    #[error("printer accepted {written} of {expected} bytes")]
    ShortWrite { written: u32, expected: usize },
}

impl BridgeError {
    pub fn invalid_print_job() -> Self {
        Self::InvalidArguments {
            code: INVALID_ARGUMENTS,
            message: "Invalid arguments for printBytes",
        }
    }

    pub fn missing_address() -> Self {
        Self::InvalidArguments {
            code: INVALID_ARGUMENT,
            message: "MAC address is required",
        }
    }

    pub fn missing_text() -> Self {
        Self::InvalidArguments {
            code: INVALID_ARGUMENT,
            message: "Text is required",
        }
    }

    pub fn missing_bytes() -> Self {
        Self::InvalidArguments {
            code: INVALID_ARGUMENT,
            message: "Bytes list is required",
        }
    }
}

pub type Result<T> = std::result::Result<T, BridgeError>;
