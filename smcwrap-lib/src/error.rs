//! Error type shared by every SMC operation.

/// Raw `kern_return_t` / `IOReturn` code reported by the kernel.
pub type KernReturn = i32;

/// `kIOReturnNotPrivileged`
pub const IO_RETURN_NOT_PRIVILEGED: KernReturn = 0xe000_02c1_u32 as KernReturn;

/// Result type alias using [`SmcError`]
pub type Result<T> = std::result::Result<T, SmcError>;

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum SmcError {
    // ============================================================================
    // Connection Errors
    // ============================================================================
    #[error("IOServiceGetMatchingServices() failed: {}", describe_kern_return(.0))]
    MatchingServices(KernReturn),

    #[error("No SMC found")]
    NoSmcFound,

    #[error("IOServiceOpen() failed: {}", describe_kern_return(.0))]
    Open(KernReturn),

    #[error("SMC connection is closed")]
    Closed,

    // ============================================================================
    // Kernel Call Errors
    // ============================================================================
    #[error("IOConnectCallStructMethod() failed: {}", describe_kern_return(.0))]
    Call(KernReturn),

    #[error("Not privileged to perform this SMC operation, try running with sudo")]
    NotPrivileged,

    #[error("Key {0} not found")]
    KeyNotFound(String),

    #[error("SMC returned result {result} for key {key}")]
    SmcResult { key: String, result: u8 },

    // ============================================================================
    // Argument and Decode Errors
    // ============================================================================
    #[error("Invalid key {0:?}, expected four ASCII characters")]
    InvalidKey(String),

    #[error("Unknown data type {0:?}")]
    UnknownType(String),

    #[error("Data type {data_type:?} expects {expected} bytes, got {actual}")]
    SizeMismatch {
        data_type: String,
        expected: String,
        actual: u32,
    },

    #[error("Value of type {0:?} is not a number")]
    NotNumeric(String),

    #[error("Value {value} is out of range for data type {data_type:?}")]
    OutOfRange { data_type: String, value: String },

    #[error("Invalid hex value {0:?}, expected pairs of hex digits")]
    InvalidHex(String),
}

/// Numeric status of an operation, compatible with the codes reported by
/// the classic SMC tools. [`SmcError::status`] maps every error onto one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum SmcStatus {
    Success = 0,
    MatchingServicesFailed = 1,
    NoSmcFound = 2,
    ServiceOpenFailed = 3,
    CallStructMethodFailed = 4,
    DecodeFailed = 5,
    InvalidArgument = 6,
    Closed = 7,
}

impl SmcError {
    pub fn status(&self) -> SmcStatus {
        match self {
            SmcError::MatchingServices(_) => SmcStatus::MatchingServicesFailed,
            SmcError::NoSmcFound => SmcStatus::NoSmcFound,
            SmcError::Open(_) => SmcStatus::ServiceOpenFailed,
            SmcError::Closed => SmcStatus::Closed,
            SmcError::Call(_)
            | SmcError::NotPrivileged
            | SmcError::KeyNotFound(_)
            | SmcError::SmcResult { .. } => SmcStatus::CallStructMethodFailed,
            SmcError::UnknownType(_) | SmcError::SizeMismatch { .. } | SmcError::NotNumeric(_) => {
                SmcStatus::DecodeFailed
            }
            SmcError::InvalidKey(_) | SmcError::OutOfRange { .. } | SmcError::InvalidHex(_) => {
                SmcStatus::InvalidArgument
            }
        }
    }

    /// Whether the error concerns the value of one key rather than the
    /// connection, so an enumeration can skip the key and carry on.
    pub fn is_per_key(&self) -> bool {
        matches!(
            self.status(),
            SmcStatus::CallStructMethodFailed | SmcStatus::DecodeFailed
        ) && !matches!(self, SmcError::NotPrivileged)
    }
}

#[cfg(target_os = "macos")]
pub(crate) fn describe_kern_return(code: &KernReturn) -> String {
    format!("{:08x} ({})", code, crate::io::err_str(*code))
}

#[cfg(not(target_os = "macos"))]
pub(crate) fn describe_kern_return(code: &KernReturn) -> String {
    format!("{:08x}", code)
}
