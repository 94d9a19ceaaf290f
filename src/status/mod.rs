#[cfg(test)]
mod test;

use thiserror::Error;

use crate::ffi::bindings as b;

pub type Result<T> = std::result::Result<T, Error>;

/// Raw PDH status code.
///
/// Every native call yields exactly one of these; only a successful status
/// permits using the call's output.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Status(pub u32);

/// Closed outcome taxonomy for [`Status`].
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum StatusKind {
    Success,
    /// Buffer too small, required size now known.
    MoreData,
    InsufficientBuffer,
    NotFound,
    NoData,
    InvalidHandle,
    AccessDenied,
    Unknown,
}

impl Status {
    pub const OK: Self = Self(b::ERROR_SUCCESS);

    pub fn kind(self) -> StatusKind {
        match self.0 {
            b::ERROR_SUCCESS | b::PDH_CSTATUS_NEW_DATA => StatusKind::Success,
            b::PDH_MORE_DATA => StatusKind::MoreData,
            b::PDH_INSUFFICIENT_BUFFER => StatusKind::InsufficientBuffer,
            b::PDH_CSTATUS_NO_MACHINE
            | b::PDH_CSTATUS_NO_INSTANCE
            | b::PDH_CSTATUS_NO_OBJECT
            | b::PDH_CSTATUS_NO_COUNTER
            | b::PDH_INVALID_PATH
            | b::PDH_STRING_NOT_FOUND => StatusKind::NotFound,
            b::PDH_NO_DATA | b::PDH_NO_MORE_DATA => StatusKind::NoData,
            b::PDH_INVALID_HANDLE => StatusKind::InvalidHandle,
            b::PDH_ACCESS_DENIED => StatusKind::AccessDenied,
            _ => StatusKind::Unknown,
        }
    }

    pub fn is_success(self) -> bool {
        self.kind() == StatusKind::Success
    }

    /// `MoreData` / `InsufficientBuffer` are the only statuses that trigger
    /// a buffer-growth retry; everything else is terminal.
    pub fn needs_larger_buffer(self) -> bool {
        matches!(
            self.kind(),
            StatusKind::MoreData | StatusKind::InsufficientBuffer
        )
    }

    /// The single choke point for raising a status as an error.
    ///
    /// Returns normally only for a successful status. All call sites go
    /// through here so every failure carries the canonical code, name and
    /// message.
    pub fn check(self) -> Result<()> {
        if self.is_success() {
            return Ok(());
        }
        Err(self.into_error())
    }

    pub(crate) fn into_error(self) -> Error {
        match self.0 {
            // A rate counter read before two collections; expected and
            // recoverable, so it gets its own variant.
            b::PDH_CSTATUS_INVALID_DATA | b::PDH_INVALID_DATA => {
                Error::InsufficientHistory { code: self.0 }
            }
            code => {
                let (name, message) = describe(code);
                Error::Status {
                    code,
                    name,
                    message,
                }
            }
        }
    }
}

impl From<u32> for Status {
    fn from(code: u32) -> Self {
        Self(code)
    }
}

/// Errors surfaced by every fallible operation in this crate.
#[derive(Debug, Error)]
pub enum Error {
    /// A non-success status from the native provider.
    #[error("{name} (0x{code:08X}): {message}")]
    Status {
        code: u32,
        name: &'static str,
        message: &'static str,
    },

    /// A rate counter was read before two time-separated collections.
    #[error("0x{code:08X}: the counter has not collected enough samples to compute a value")]
    InsufficientHistory { code: u32 },

    /// An operation was issued on a closed session or a detached counter.
    #[error("the underlying native handle is no longer valid")]
    InvalidHandleUse,
}

impl Error {
    /// The original provider status code, if the error carries one.
    pub fn code(&self) -> Option<u32> {
        match self {
            Error::Status { code, .. } | Error::InsufficientHistory { code } => Some(*code),
            Error::InvalidHandleUse => None,
        }
    }

    pub fn is_insufficient_history(&self) -> bool {
        matches!(self, Error::InsufficientHistory { .. })
    }
}

// Canonical names and messages, from pdhmsg.h. Operators cross-reference
// these against the host documentation.
fn describe(code: u32) -> (&'static str, &'static str) {
    match code {
        b::PDH_CSTATUS_NO_MACHINE => (
            "PDH_CSTATUS_NO_MACHINE",
            "unable to connect to the specified computer, or the computer is offline",
        ),
        b::PDH_CSTATUS_NO_INSTANCE => (
            "PDH_CSTATUS_NO_INSTANCE",
            "the specified instance is not present",
        ),
        b::PDH_MORE_DATA => (
            "PDH_MORE_DATA",
            "there is more data to return than would fit in the supplied buffer",
        ),
        b::PDH_CSTATUS_ITEM_NOT_VALIDATED => (
            "PDH_CSTATUS_ITEM_NOT_VALIDATED",
            "the data item has been added to the query but has not been validated nor accessed",
        ),
        b::PDH_RETRY => (
            "PDH_RETRY",
            "the selected operation should be retried",
        ),
        b::PDH_NO_DATA => (
            "PDH_NO_DATA",
            "no data to return",
        ),
        b::PDH_CALC_NEGATIVE_DENOMINATOR => (
            "PDH_CALC_NEGATIVE_DENOMINATOR",
            "a counter with a negative denominator value was detected",
        ),
        b::PDH_CALC_NEGATIVE_TIMEBASE => (
            "PDH_CALC_NEGATIVE_TIMEBASE",
            "a counter with a negative timebase value was detected",
        ),
        b::PDH_CALC_NEGATIVE_VALUE => (
            "PDH_CALC_NEGATIVE_VALUE",
            "a counter with a negative value was detected",
        ),
        b::PDH_CSTATUS_NO_OBJECT => (
            "PDH_CSTATUS_NO_OBJECT",
            "the specified object is not found on the system",
        ),
        b::PDH_CSTATUS_NO_COUNTER => (
            "PDH_CSTATUS_NO_COUNTER",
            "the specified counter could not be found",
        ),
        b::PDH_MEMORY_ALLOCATION_FAILURE => (
            "PDH_MEMORY_ALLOCATION_FAILURE",
            "a PDH function could not allocate enough temporary memory to complete the operation",
        ),
        b::PDH_INVALID_HANDLE => (
            "PDH_INVALID_HANDLE",
            "the handle is not a valid PDH object",
        ),
        b::PDH_INVALID_ARGUMENT => (
            "PDH_INVALID_ARGUMENT",
            "a required argument is missing or incorrect",
        ),
        b::PDH_FUNCTION_NOT_FOUND => (
            "PDH_FUNCTION_NOT_FOUND",
            "unable to find the specified function",
        ),
        b::PDH_CSTATUS_NO_COUNTERNAME => (
            "PDH_CSTATUS_NO_COUNTERNAME",
            "no counter was specified",
        ),
        b::PDH_CSTATUS_BAD_COUNTERNAME => (
            "PDH_CSTATUS_BAD_COUNTERNAME",
            "unable to parse the counter path",
        ),
        b::PDH_INVALID_BUFFER => (
            "PDH_INVALID_BUFFER",
            "the buffer passed was invalid",
        ),
        b::PDH_INSUFFICIENT_BUFFER => (
            "PDH_INSUFFICIENT_BUFFER",
            "the buffer passed was too small",
        ),
        b::PDH_CANNOT_CONNECT_MACHINE => (
            "PDH_CANNOT_CONNECT_MACHINE",
            "unable to connect to the requested computer",
        ),
        b::PDH_INVALID_PATH => (
            "PDH_INVALID_PATH",
            "the specified counter path could not be interpreted",
        ),
        b::PDH_INVALID_INSTANCE => (
            "PDH_INVALID_INSTANCE",
            "the instance name could not be read from the specified counter path",
        ),
        b::PDH_NO_MORE_DATA => (
            "PDH_NO_MORE_DATA",
            "there is no more data available",
        ),
        b::PDH_DATA_SOURCE_IS_LOG_FILE => (
            "PDH_DATA_SOURCE_IS_LOG_FILE",
            "the current data source is a log file",
        ),
        b::PDH_DATA_SOURCE_IS_REAL_TIME => (
            "PDH_DATA_SOURCE_IS_REAL_TIME",
            "the current data source is the current activity",
        ),
        b::PDH_FILE_NOT_FOUND => (
            "PDH_FILE_NOT_FOUND",
            "the specified log file could not be opened",
        ),
        b::PDH_NOT_IMPLEMENTED => (
            "PDH_NOT_IMPLEMENTED",
            "the function referenced has not been implemented",
        ),
        b::PDH_STRING_NOT_FOUND => (
            "PDH_STRING_NOT_FOUND",
            "the requested string could not be found",
        ),
        b::PDH_ACCESS_DENIED => (
            "PDH_ACCESS_DENIED",
            "access to the requested object is denied",
        ),
        _ => ("PDH_STATUS", "unrecognized PDH status code"),
    }
}
