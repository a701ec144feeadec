/*!
Encoding conversion support.
*/
use thiserror::Error;

pub mod mb_x_wc;
pub mod utf16;

pub use self::mb_x_wc::{WcsToMbIter, narrow_units};
pub use self::utf16::Utf16ToUniIter;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Error)]
pub enum ConvError {
    #[error("invalid unit at offset {0}")]
    InvalidAt(usize),
    #[error("incomplete unit")]
    Incomplete,
    #[error("character at offset {0} has no representation in the target character set")]
    UnmappableAt(usize),
    #[error("narrow data written to a wide-character translation")]
    WidthMismatch,
}
