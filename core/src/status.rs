//! Firmware status words and print errors
//!
//! `Status` is the raw `EFI_STATUS` word handed back to the loader.
//! `PrintError` is what the formatting core actually returns; every
//! variant maps onto exactly one status so `efi_main` can hand it
//! upward unchanged.

use core::fmt;

/// Top bit of the native word marks an error status.
const ERROR_BIT: usize = 1 << (usize::BITS - 1);

/// Raw UEFI status word.
#[repr(transparent)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Status(pub usize);

impl Status {
    pub const SUCCESS: Status = Status(0);
    pub const LOAD_ERROR: Status = Status(ERROR_BIT | 1);
    pub const INVALID_PARAMETER: Status = Status(ERROR_BIT | 2);
    pub const UNSUPPORTED: Status = Status(ERROR_BIT | 3);
    pub const BAD_BUFFER_SIZE: Status = Status(ERROR_BIT | 4);
    pub const BUFFER_TOO_SMALL: Status = Status(ERROR_BIT | 5);
    pub const NOT_READY: Status = Status(ERROR_BIT | 6);
    pub const DEVICE_ERROR: Status = Status(ERROR_BIT | 7);
    pub const WRITE_PROTECTED: Status = Status(ERROR_BIT | 8);
    pub const OUT_OF_RESOURCES: Status = Status(ERROR_BIT | 9);
    pub const NOT_FOUND: Status = Status(ERROR_BIT | 14);
    pub const ACCESS_DENIED: Status = Status(ERROR_BIT | 15);
    pub const TIMEOUT: Status = Status(ERROR_BIT | 18);
    pub const NOT_STARTED: Status = Status(ERROR_BIT | 19);

    /// Equivalent of the `EFI_ERROR()` macro.
    #[inline]
    pub const fn is_error(self) -> bool {
        self.0 & ERROR_BIT != 0
    }

    #[inline]
    pub const fn is_success(self) -> bool {
        self.0 == 0
    }

    /// Convert a raw status into a `Result`, treating warnings as success.
    #[inline]
    pub fn to_result(self) -> Result<(), Status> {
        if self.is_error() {
            Err(self)
        } else {
            Ok(())
        }
    }

    /// Short name for known codes.
    pub const fn name(self) -> &'static str {
        match self {
            Self::SUCCESS => "SUCCESS",
            Self::LOAD_ERROR => "LOAD_ERROR",
            Self::INVALID_PARAMETER => "INVALID_PARAMETER",
            Self::UNSUPPORTED => "UNSUPPORTED",
            Self::BAD_BUFFER_SIZE => "BAD_BUFFER_SIZE",
            Self::BUFFER_TOO_SMALL => "BUFFER_TOO_SMALL",
            Self::NOT_READY => "NOT_READY",
            Self::DEVICE_ERROR => "DEVICE_ERROR",
            Self::WRITE_PROTECTED => "WRITE_PROTECTED",
            Self::OUT_OF_RESOURCES => "OUT_OF_RESOURCES",
            Self::NOT_FOUND => "NOT_FOUND",
            Self::ACCESS_DENIED => "ACCESS_DENIED",
            Self::TIMEOUT => "TIMEOUT",
            Self::NOT_STARTED => "NOT_STARTED",
            _ => "UNKNOWN",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({:#x})", self.name(), self.0)
    }
}

/// Errors produced while scanning, converting or emitting a print.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrintError {
    /// Pool allocator refused a request (status passed through)
    AllocationFailure(Status),
    /// Template, rendered value or composed output exceeds its fixed bound
    BufferTooSmall,
    /// Unsupported conversion/modifier/argument combination
    InvalidParameter,
    /// Unrecognised byte inside a directive (strict scanning only)
    MalformedFormat { offset: usize },
    /// Console or key device failure (status passed through)
    Device(Status),
}

impl PrintError {
    /// Get a human-readable description of the error
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::AllocationFailure(_) => "Pool allocation failed",
            Self::BufferTooSmall => "Output exceeds fixed buffer bound",
            Self::InvalidParameter => "Unsupported conversion, modifier or argument",
            Self::MalformedFormat { .. } => "Malformed format directive",
            Self::Device(_) => "Console device error",
        }
    }

    /// Firmware status handed back to the loader for this error.
    pub const fn status(&self) -> Status {
        match self {
            Self::AllocationFailure(status) | Self::Device(status) => *status,
            Self::BufferTooSmall => Status::BUFFER_TOO_SMALL,
            Self::InvalidParameter | Self::MalformedFormat { .. } => Status::INVALID_PARAMETER,
        }
    }
}

impl fmt::Display for PrintError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AllocationFailure(status) | Self::Device(status) => {
                write!(f, "{}: {}", self.as_str(), status)
            }
            Self::MalformedFormat { offset } => {
                write!(f, "{} at byte {}", self.as_str(), offset)
            }
            _ => f.write_str(self.as_str()),
        }
    }
}

impl From<PrintError> for Status {
    fn from(err: PrintError) -> Self {
        err.status()
    }
}

/// Result type for the formatting core.
pub type PrintResult<T> = Result<T, PrintError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_bit() {
        assert!(!Status::SUCCESS.is_error());
        assert!(Status::BUFFER_TOO_SMALL.is_error());
        assert!(Status::NOT_READY.is_error());
        assert_eq!(Status::BUFFER_TOO_SMALL.0 & 0xFF, 5);
    }

    #[test]
    fn test_to_result() {
        assert_eq!(Status::SUCCESS.to_result(), Ok(()));
        assert_eq!(
            Status::DEVICE_ERROR.to_result(),
            Err(Status::DEVICE_ERROR)
        );
        // Warnings have the top bit clear
        assert_eq!(Status(1).to_result(), Ok(()));
    }

    #[test]
    fn test_error_status_mapping() {
        assert_eq!(PrintError::BufferTooSmall.status(), Status::BUFFER_TOO_SMALL);
        assert_eq!(PrintError::InvalidParameter.status(), Status::INVALID_PARAMETER);
        assert_eq!(
            PrintError::MalformedFormat { offset: 3 }.status(),
            Status::INVALID_PARAMETER
        );
        assert_eq!(
            PrintError::AllocationFailure(Status::OUT_OF_RESOURCES).status(),
            Status::OUT_OF_RESOURCES
        );
        assert_eq!(
            Status::from(PrintError::Device(Status::DEVICE_ERROR)),
            Status::DEVICE_ERROR
        );
    }

    #[test]
    fn test_status_names() {
        assert_eq!(Status::NOT_READY.name(), "NOT_READY");
        assert_eq!(Status(ERROR_BIT | 0x7F).name(), "UNKNOWN");
    }
}
