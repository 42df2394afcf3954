use std::fmt::{Display, Error, Formatter};

// Error
//------------------------------------------------------------------------------

#[derive(Debug, PartialEq, Eq, Copy, Clone)]
pub enum ScanError {
    // Frame construction
    InvalidChannelCount(u32),
    BufferSizeMismatch,

    // Scanner construction
    ContextNotInitialized,
}

impl Display for ScanError {
    fn fmt(&self, f: &mut Formatter) -> Result<(), Error> {
        let msg = match *self {
            Self::InvalidChannelCount(_) => "channel count must be 1 or 3",
            Self::BufferSizeMismatch => "buffer length does not match width * height * channels",
            Self::ContextNotInitialized => "recognition context not initialized",
        };
        f.write_str(msg)
    }
}

impl std::error::Error for ScanError {}

pub type ScanResult<T> = Result<T, ScanError>;
