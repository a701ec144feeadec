/*!
Buffered C I/O: `fopen`, `fwrite`, `fprintf`/`fwprintf`.

A C stream picks its translation when it is opened, from the `fopen` mode string.  The Unicode variants (`ccs=...`) can only be requested that way; they cannot be added to a stream after the fact.  Standard output is the exception: it is already open, so its descriptor's mode is changed underneath it instead.
*/
use std::mem;
use log::{debug, info};
use crate::config::Destination;
use crate::encoding::conv::narrow_units;
use crate::encoding::Units;
use crate::error::{Error, Result};
use crate::locale;
use crate::method::Family;
use crate::sample;
use crate::sink::{Destinations, Sink};
use crate::translate::OpenMode;
use super::{check_written, write_translated, Adapter, Job, Report};

/**
An open C stream.

Writes are flushed straight through to the sink, so each call's outcome is known when it returns.
*/
pub struct CFile {
    sink: Box<dyn Sink>,
    mode: OpenMode,
    pending_bom: &'static [u8],
}

impl CFile {
    /**
    Opens `destination` with the `fopen` mode string for `mode`.

    Files created in a Unicode mode start with a byte order mark, written ahead of the first output.  Standard output never gets one.
    */
    pub fn open(
        dests: &mut dyn Destinations,
        family: Family,
        destination: &Destination,
        mode: OpenMode,
    ) -> Result<CFile> {
        let sink = dests.open(family, destination).map_err(Error::destination("file"))?;
        let pending_bom = match *destination {
            Destination::StandardOutput => &[][..],
            Destination::File(_) => mode.bom(),
        };
        debug!("fopen(\"{}\") for {:?}", mode.c_mode(), destination);
        Ok(CFile { sink, mode, pending_bom })
    }

    pub fn mode(&self) -> OpenMode {
        self.mode
    }

    /**
    Writes a block of units, as `fwrite` does.

    Returns how many whole units made it to the destination.  Data the stream's translation cannot accept is an error.
    */
    pub fn write_block(&mut self, data: Units) -> Result<usize> {
        let bom = mem::take(&mut self.pending_bom);
        write_translated(&mut *self.sink, self.mode, data, bom)
    }

    /**
    Writes `data` right-aligned in a field of at least `min_width` units, as `fprintf(file, "%*s", ...)` (or `fwprintf` for wide data) does.

    Returns the number of units formatted, or -1 if the output could not be written in full.
    */
    pub fn print_padded(&mut self, min_width: usize, data: Units) -> isize {
        let pad = min_width.saturating_sub(data.len());
        let total = pad + data.len();

        let result = match data {
            Units::Narrow(units) => {
                let mut padded = vec![b' '; pad];
                padded.extend_from_slice(units);
                self.write_block(Units::Narrow(&padded)).map(|n| n == padded.len())
            },
            Units::Wide(units) => {
                let mut padded = vec![0x0020; pad];
                padded.extend_from_slice(units);
                if self.mode.is_unicode() {
                    self.write_block(Units::Wide(&padded)).map(|n| n == padded.len())
                } else {
                    // A narrow stream gets wide formatted output narrowed through the C locale.
                    match narrow_units(locale::global_codec(), &padded) {
                        (narrowed, None) => self.write_block(Units::Narrow(&narrowed)).map(|n| n == narrowed.len()),
                        (_, Some(err)) => Err(err.into()),
                    }
                }
            },
        };

        match result {
            Ok(true) => total as isize,
            Ok(false) => {
                debug!("formatted output of {} units was cut short", total);
                -1
            },
            Err(err) => {
                debug!("formatted output failed: {}", err);
                -1
            },
        }
    }
}

#[derive(Copy, Clone, Debug, Default)]
pub struct BufferedAdapter;

impl Adapter for BufferedAdapter {
    fn family(&self) -> Family {
        Family::Buffered
    }

    fn write_sample(&self, job: &Job, dests: &mut dyn Destinations) -> Result<Report> {
        let open_mode = OpenMode::for_mode(job.mode).ok_or(Error::NoMode)?;
        let mut file = CFile::open(dests, Family::Buffered, job.destination, open_mode)?;
        if job.destination.is_standard_output() {
            info!("applied {} to standard output", open_mode.flag_name());
        }

        let data = sample::get(job.width());
        if job.formatted() {
            let reported = file.print_padded(sample::LEN, data);
            if reported != sample::LEN as isize {
                return Err(Error::FormattedLength { expected: sample::LEN, reported });
            }
        } else {
            let written = file.write_block(data)?;
            check_written(data.len(), written)?;
        }

        Ok(Report::written(data.len()))
    }
}

#[cfg(all(test, not(windows)))]
mod test {
    use super::*;
    use crate::sink::memory::MemoryDestinations;
    use crate::sink::WriteCall;

    #[test]
    fn test_bom_only_on_files() {
        let mut dests = MemoryDestinations::new();
        let mut file = CFile::open(&mut dests, Family::Buffered, &Destination::output_file(), OpenMode::U16Text).unwrap();
        assert_eq!(file.write_block(Units::Wide(&[0x0041])).unwrap(), 1);
        assert_eq!(file.write_block(Units::Wide(&[0x000A])).unwrap(), 1);
        drop(file);
        assert_eq!(dests.contents(), vec![0xFF, 0xFE, 0x41, 0x00, 0x0A, 0x00]);

        let mut dests = MemoryDestinations::new();
        let mut file = CFile::open(&mut dests, Family::Buffered, &Destination::StandardOutput, OpenMode::U8Text).unwrap();
        assert_eq!(file.write_block(Units::Wide(&[0x03B4])).unwrap(), 1);
        drop(file);
        assert_eq!(dests.contents(), vec![0xCE, 0xB4]);
    }

    #[test]
    fn test_console_gets_wide_text_without_bom() {
        let mut console = MemoryDestinations::new().console();
        let mut file = CFile::open(&mut console, Family::Buffered, &Destination::StandardOutput, OpenMode::U8Text).unwrap();
        assert_eq!(file.write_block(Units::Wide(&[0x0041, 0x03B4])).unwrap(), 2);
        assert_eq!(file.print_padded(3, Units::Wide(&[0x000A])), 3);
        drop(file);
        assert_eq!(console.calls(), vec![WriteCall::ConsoleWide, WriteCall::ConsoleWide]);
        assert_eq!(console.contents(), vec![0x41, 0x00, 0xB4, 0x03, 0x20, 0x00, 0x20, 0x00, 0x0A, 0x00]);

        let mut console = MemoryDestinations::new().console();
        let mut file = CFile::open(&mut console, Family::Buffered, &Destination::StandardOutput, OpenMode::Text).unwrap();
        assert_eq!(file.write_block(Units::Narrow(b"AB")).unwrap(), 2);
        drop(file);
        assert_eq!(console.calls(), vec![WriteCall::Bytes]);
    }

    #[test]
    fn test_print_padded() {
        let mut dests = MemoryDestinations::new();
        let mut file = CFile::open(&mut dests, Family::Buffered, &Destination::output_file(), OpenMode::Text).unwrap();
        assert_eq!(file.print_padded(4, Units::Narrow(b"ab")), 4);
        assert_eq!(file.print_padded(1, Units::Narrow(b"cd")), 2);
        // The unit tests never change the C locale from "C".
        assert_eq!(file.print_padded(2, Units::Wide(&[0x0041])), 2);
        assert_eq!(file.print_padded(2, Units::Wide(&[0x03B4])), -1);
        drop(file);
        assert_eq!(dests.contents(), b"  abcd A".to_vec());

        let mut dests = MemoryDestinations::new();
        let mut file = CFile::open(&mut dests, Family::Buffered, &Destination::output_file(), OpenMode::WText).unwrap();
        assert_eq!(file.print_padded(6, Units::Narrow(&sample::NARROW)), -1);
    }

    #[test]
    fn test_short_block() {
        let mut dests = MemoryDestinations::new().truncating(4);
        let mut file = CFile::open(&mut dests, Family::Buffered, &Destination::output_file(), OpenMode::U16Text).unwrap();
        // Two bytes of BOM, then one of the two units.
        assert_eq!(file.write_block(Units::Wide(&[0x0041, 0x000A])).unwrap(), 1);
    }
}
