/*!
One adapter per API family.

An adapter takes the sample for a job's mode, acquires its destination, writes the sample the way its API would, and releases the destination again before returning, on every path.
*/
use crate::config::Destination;
use crate::encoding::{wide_to_le_bytes, Units};
use crate::error::{Error, Result};
use crate::matrix::Support;
use crate::method::{Family, Method, Mode, Width};
use crate::sink::{Destinations, Sink, WriteCall};
use crate::translate::OpenMode;

pub mod buffered;
pub mod native;
pub mod posix;
pub mod stream;

/**
A single validated write request.
*/
#[derive(Clone, Debug)]
pub struct Job<'a> {
    pub method: Method,
    pub mode: Mode,
    pub destination: &'a Destination,
    /// Locale to bind to the output stream.  Only the stream family looks at this.
    pub locale: Option<&'a str>,
    /// The matrix cell this job was validated against.
    pub support: Support,
}

impl<'a> Job<'a> {
    pub fn width(&self) -> Width {
        self.mode.width()
    }

    pub fn formatted(&self) -> bool {
        self.method.is_formatted()
    }
}

/**
What a successful write produced.
*/
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Report {
    /// Code units the destination accepted.
    pub units: usize,
    /// Soft failures: worth telling the operator about, but not failures.
    pub advisories: Vec<String>,
}

impl Report {
    pub fn written(units: usize) -> Report {
        Report {
            units,
            advisories: vec![],
        }
    }
}

pub trait Adapter {
    fn family(&self) -> Family;

    /**
    Writes the sample for `job`.

    Any destination acquired from `dests` is released before this returns.
    */
    fn write_sample(&self, job: &Job, dests: &mut dyn Destinations) -> Result<Report>;
}

/// The adapter for an API family.
pub fn for_family(family: Family) -> &'static dyn Adapter {
    match family {
        Family::Handle => &native::NativeHandleAdapter,
        Family::Descriptor => &posix::DescriptorAdapter,
        Family::Buffered => &buffered::BufferedAdapter,
        Family::Stream => &stream::StreamAdapter,
    }
}

fn check_written(requested: usize, written: usize) -> Result<()> {
    if written != requested {
        return Err(Error::ShortWrite { requested, written });
    }
    Ok(())
}

/**
Writes `data` through a descriptor or C stream opened in `open_mode`, with one call to `sink`.

On a console, the Unicode modes skip their byte translation and hand the wide characters to `WriteConsoleW`, as the C runtime does.  Everywhere else the translated bytes go out after `bom`, which a console never gets.

Returns how many units of `data` the destination accepted.
*/
fn write_translated(sink: &mut dyn Sink, open_mode: OpenMode, data: Units, bom: &[u8]) -> Result<usize> {
    if open_mode.is_unicode() && sink.is_interactive() {
        let text = open_mode.console_text(data)?;
        let accepted = sink.write(&wide_to_le_bytes(&text), WriteCall::ConsoleWide).map_err(Error::Write)?;
        return Ok(accepted_units(data.len(), text.len(), accepted));
    }

    let translated = open_mode.translate(data)?;
    let mut bytes = Vec::with_capacity(bom.len() + translated.len());
    bytes.extend_from_slice(bom);
    bytes.extend_from_slice(&translated);

    let accepted = sink.write(&bytes, WriteCall::Bytes).map_err(Error::Write)?;
    Ok(accepted_units(data.len(), translated.len(), accepted.saturating_sub(bom.len())))
}

/// How many of `len` source units got through, when `accepted` of the `offered` units they became did.
fn accepted_units(len: usize, offered: usize, accepted: usize) -> usize {
    if accepted >= offered {
        len
    } else {
        accepted * len / offered
    }
}
