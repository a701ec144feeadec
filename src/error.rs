use std::io;
use thiserror::Error;
use crate::encoding::conv::ConvError;
use crate::method::{Method, Mode};

/**
Broad class of a failure, following how far a test got before it failed.
*/
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Rejected before any destination was touched.
    Configuration,
    /// The handle, descriptor, or file could not be acquired.
    Destination,
    /// The destination turned out not to support the mode once open.
    CapabilityMismatch,
    /// Fewer units were written than requested.
    ShortWrite,
    /// A character set conversion failed outright.
    Conversion,
    /// A locale could not be applied or bound.
    Locale,
    /// Any other failed I/O call.
    Io,
}

#[derive(Debug, Error)]
pub enum Error {
    #[error("no method selected")]
    NoMethod,
    #[error("no mode selected")]
    NoMode,
    #[error("{method} does not support '{mode}' mode: {reason}")]
    Unsupported { method: Method, mode: Mode, reason: &'static str },
    #[error("{method} cannot use '{mode}' mode on standard output, which is already open as {natural} text")]
    NotNaturalForStandardOutput { method: Method, mode: Mode, natural: Mode },
    #[error("construction of 'wide unicode' mode requires no explicit locale")]
    LocaleWithWideUnicode,
    #[error("couldn't get {what} for output: {source}")]
    Destination { what: &'static str, #[source] source: io::Error },
    #[error("{0}")]
    RequiresConsole(&'static str),
    #[error("unable to write entire output ({written} of {requested} units written)")]
    ShortWrite { requested: usize, written: usize },
    #[error("formatted output length {reported} does not match expected {expected}")]
    FormattedLength { expected: usize, reported: isize },
    #[error("character set conversion failed: {0}")]
    Conversion(#[from] ConvError),
    #[error("unable to apply C locale \"{0}\"")]
    LocaleApplication(String),
    #[error("unable to bind locale \"{name}\": {reason}")]
    LocaleBinding { name: String, reason: String },
    #[error("unable to set console output code page {code_page}: {source}")]
    CodePage { code_page: u32, #[source] source: io::Error },
    #[error("output stream has failed")]
    StreamFailed,
    #[error("API write failed: {0}")]
    Write(#[source] io::Error),
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match *self {
            Error::NoMethod
            | Error::NoMode
            | Error::Unsupported { .. }
            | Error::NotNaturalForStandardOutput { .. }
            | Error::LocaleWithWideUnicode => ErrorKind::Configuration,
            Error::Destination { .. } => ErrorKind::Destination,
            Error::RequiresConsole(_) => ErrorKind::CapabilityMismatch,
            Error::ShortWrite { .. } | Error::FormattedLength { .. } => ErrorKind::ShortWrite,
            Error::Conversion(_) => ErrorKind::Conversion,
            Error::LocaleApplication(_) | Error::LocaleBinding { .. } => ErrorKind::Locale,
            Error::CodePage { .. } | Error::StreamFailed | Error::Write(_) => ErrorKind::Io,
        }
    }

    pub(crate) fn destination(what: &'static str) -> impl FnOnce(io::Error) -> Error {
        move |source| Error::Destination { what, source }
    }
}

pub type Result<T> = ::std::result::Result<T, Error>;
