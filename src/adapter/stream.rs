/*!
Stream I/O: narrow and wide output streams with a bound locale.

A stream keeps two things apart: whether it takes narrow or wide characters, and what conversion its locale applies on the way to the file beneath it.  Narrow streams never convert; binding a locale to one only changes how the bytes will be read later.  Wide streams narrow every character through their locale, unless they sit on a C stream that was opened in a Unicode mode, in which case the C stream does the converting.

A stream that hits trouble does not report it from the write call.  It records it in two flags instead: *fail*, which a conversion problem sets along with several other recoverable problems, and *bad*, which means the file beneath refused the data.
*/
use std::mem;
use log::{debug, info};
use crate::config::Destination;
use crate::encoding::conv::{narrow_units, ConvError, Utf16ToUniIter};
use crate::encoding::{Codec, Units};
use crate::error::{Error, Result};
use crate::locale::Locale;
use crate::method::{Family, Mode, Width};
use crate::sample;
use crate::sink::Destinations;
use crate::translate::OpenMode;
use crate::util::TrapErrExt;
use super::buffered::CFile;
use super::{Adapter, Job, Report};

/// Advisory given when a wide stream ends up in the failed state.
pub const CONVERSION_ADVISORY: &str =
    "stream is in 'failed' state; likely due to error in implicit character set conversion";

/**
How a wide stream converts characters for the file beneath it.
*/
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Codecvt {
    /// Narrow each character into a character set, as a locale's conversion does.
    Narrowing(Codec),
    /// Pass wide characters through; the file beneath converts them.
    Unconverted,
    /// An explicit UTF-16 little-endian conversion, bound in place of a locale's.
    Utf16Le,
}

enum Converted {
    Narrow(Vec<u8>),
    Wide(Vec<u16>),
}

impl Converted {
    fn units(&self) -> Units {
        match *self {
            Converted::Narrow(ref bytes) => Units::Narrow(bytes),
            Converted::Wide(ref units) => Units::Wide(units),
        }
    }
}

impl Codecvt {
    pub fn name(&self) -> String {
        match *self {
            Codecvt::Narrowing(codec) => codec.name(),
            Codecvt::Unconverted => "none".to_owned(),
            Codecvt::Utf16Le => "UTF-16LE".to_owned(),
        }
    }

    /// Converts as much of `units` as possible, returning the failure that stopped it, if any.
    fn out(&self, units: &[u16]) -> (Converted, Option<ConvError>) {
        match *self {
            Codecvt::Narrowing(codec) => {
                let (bytes, err) = narrow_units(codec, units);
                (Converted::Narrow(bytes), err)
            },
            Codecvt::Unconverted => (Converted::Wide(units.to_vec()), None),
            Codecvt::Utf16Le => {
                let mut trap = Ok(());
                let mut out = Vec::with_capacity(units.len());
                for c in Utf16ToUniIter::new(units.iter().cloned()).trap_err(&mut trap) {
                    let mut buf = [0; 2];
                    out.extend_from_slice(c.encode_utf16(&mut buf));
                }
                (Converted::Wide(out), trap.err())
            },
        }
    }
}

/// How many source units a conversion got through before `err` stopped it.
fn consumed(len: usize, err: Option<ConvError>) -> usize {
    match err {
        None => len,
        Some(ConvError::UnmappableAt(at)) | Some(ConvError::InvalidAt(at)) => at,
        Some(ConvError::Incomplete) | Some(ConvError::WidthMismatch) => 0,
    }
}

/**
An output stream over a C stream.
*/
pub struct OStream {
    file: CFile,
    width: Width,
    locale: Locale,
    codecvt: Codecvt,
    field_width: usize,
    written: usize,
    fail: bool,
    bad: bool,
}

impl OStream {
    fn new(file: CFile, width: Width, codecvt: Codecvt) -> OStream {
        OStream {
            file,
            width,
            locale: Locale::classic(),
            codecvt,
            field_width: 0,
            written: 0,
            fail: false,
            bad: false,
        }
    }

    /// A narrow-character stream.
    pub fn narrow(file: CFile) -> OStream {
        OStream::new(file, Width::Narrow, Codecvt::Unconverted)
    }

    /**
    A wide-character stream.

    Over a C stream opened in a Unicode mode, characters pass through for the C stream to convert.  Otherwise they are narrowed through the stream's locale, initially the classic one.
    */
    pub fn wide(file: CFile) -> OStream {
        let codecvt = if file.mode().is_unicode() {
            Codecvt::Unconverted
        } else {
            Codecvt::Narrowing(Locale::classic().codec())
        };
        OStream::new(file, Width::Wide, codecvt)
    }

    /// Binds `locale` to the stream, returning the previous one.
    pub fn imbue(&mut self, locale: Locale) -> Locale {
        if let Codecvt::Narrowing(_) = self.codecvt {
            if self.width == Width::Wide {
                self.codecvt = Codecvt::Narrowing(locale.codec());
            }
        }
        mem::replace(&mut self.locale, locale)
    }

    /// Replaces only the conversion, keeping the rest of the current locale.
    pub fn imbue_codecvt(&mut self, codecvt: Codecvt) {
        self.codecvt = codecvt;
    }

    pub fn getloc(&self) -> &Locale {
        &self.locale
    }

    pub fn codecvt(&self) -> Codecvt {
        self.codecvt
    }

    /// Minimum field width for the next insertion.
    pub fn set_width(&mut self, width: usize) {
        self.field_width = width;
    }

    /// Unformatted output of a block of characters.
    pub fn write(&mut self, data: Units) -> &mut Self {
        self.put(data);
        self
    }

    /// Formatted insertion of a string, right-aligned in the current field width.
    pub fn insert(&mut self, data: Units) -> &mut Self {
        let pad = mem::replace(&mut self.field_width, 0).saturating_sub(data.len());
        match data {
            Units::Narrow(units) => {
                let mut padded = vec![b' '; pad];
                padded.extend_from_slice(units);
                self.put(Units::Narrow(&padded));
            },
            Units::Wide(units) => {
                let mut padded = vec![0x0020; pad];
                padded.extend_from_slice(units);
                self.put(Units::Wide(&padded));
            },
        }
        self
    }

    fn put(&mut self, data: Units) {
        if self.fail() {
            return;
        }
        if data.width() != self.width {
            self.fail = true;
            return;
        }

        let (converted, err) = match data {
            Units::Narrow(bytes) => (Converted::Narrow(bytes.to_vec()), None),
            Units::Wide(units) => self.codecvt.out(units),
        };
        let consumed = consumed(data.len(), err);
        if let Some(err) = err {
            debug!("{} conversion stopped: {}", self.codecvt.name(), err);
            self.fail = true;
        }

        let out = converted.units();
        match self.file.write_block(out) {
            Ok(n) if n == out.len() => self.written += consumed,
            Ok(n) => {
                self.written += n * consumed / out.len();
                self.bad = true;
            },
            Err(err) => {
                debug!("stream output failed: {}", err);
                self.bad = true;
            },
        }
    }

    /// Whether the fail or bad flag is set.
    pub fn fail(&self) -> bool {
        self.fail || self.bad
    }

    pub fn bad(&self) -> bool {
        self.bad
    }

    /// Source units that reached the file.
    pub fn written(&self) -> usize {
        self.written
    }
}

#[derive(Copy, Clone, Debug, Default)]
pub struct StreamAdapter;

impl StreamAdapter {
    /**
    Constructs the stream a job writes through.

    Standard output is the already-open narrow or wide standard stream.  Files are opened by a narrow file stream, by a wide file stream for `WideText`, and for the two Unicode modes, by a wide stream constructed over a C stream opened in that mode.
    */
    fn open(&self, job: &Job, dests: &mut dyn Destinations) -> Result<OStream> {
        let open_mode = match (job.destination, job.mode) {
            (&Destination::StandardOutput, mode) => {
                let natural = Mode::natural(mode.width());
                if mode != natural {
                    return Err(Error::NotNaturalForStandardOutput { method: job.method, mode, natural });
                }
                OpenMode::Text
            },
            (_, Mode::Binary) => OpenMode::Binary,
            (_, Mode::NarrowText) | (_, Mode::WideText) => OpenMode::Text,
            (_, mode) => OpenMode::for_mode(mode).ok_or(Error::NoMode)?,
        };

        let file = CFile::open(dests, Family::Stream, job.destination, open_mode)?;
        Ok(match job.width() {
            Width::Narrow => OStream::narrow(file),
            Width::Wide => OStream::wide(file),
        })
    }
}

impl Adapter for StreamAdapter {
    fn family(&self) -> Family {
        Family::Stream
    }

    fn write_sample(&self, job: &Job, dests: &mut dyn Destinations) -> Result<Report> {
        if job.mode == Mode::WideUnicode && job.locale.is_some() {
            return Err(Error::LocaleWithWideUnicode);
        }
        let locale = match job.locale {
            Some(name) => Some(Locale::bind(name)?),
            None => None,
        };

        let mut stream = self.open(job, dests)?;

        if let Some(locale) = locale {
            stream.imbue(locale);
            let bound = stream.getloc().name();
            match (stream.width, stream.codecvt()) {
                (Width::Narrow, _) => debug!("narrow stream bound to locale \"{}\"", bound),
                (Width::Wide, Codecvt::Unconverted) => info!(
                    "locale \"{}\" is bound, but the file's own conversion applies", bound),
                (Width::Wide, codecvt) => debug!("wide stream narrows through {} for \"{}\"", codecvt.name(), bound),
            }
        }
        if job.mode == Mode::WideUnicode {
            stream.imbue_codecvt(Codecvt::Utf16Le);
        }

        let data = sample::get(job.width());
        if job.formatted() {
            stream.insert(data);
        } else {
            stream.write(data);
        }

        if stream.bad() {
            return Err(Error::ShortWrite { requested: data.len(), written: stream.written() });
        }
        if stream.fail() {
            if job.width() == Width::Narrow {
                return Err(Error::StreamFailed);
            }
            let mut report = Report::written(stream.written());
            report.advisories.push(CONVERSION_ADVISORY.to_owned());
            return Ok(report);
        }

        Ok(Report::written(stream.written()))
    }
}
