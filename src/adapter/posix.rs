/*!
The descriptor API: `_open`, `_setmode`, `_write`.
*/
use log::{debug, info};
use crate::error::{Error, Result};
use crate::method::Family;
use crate::sample;
use crate::sink::Destinations;
use crate::translate::OpenMode;
use super::{check_written, write_translated, Adapter, Job, Report};

#[derive(Copy, Clone, Debug, Default)]
pub struct DescriptorAdapter;

impl Adapter for DescriptorAdapter {
    fn family(&self) -> Family {
        Family::Descriptor
    }

    fn write_sample(&self, job: &Job, dests: &mut dyn Destinations) -> Result<Report> {
        let open_mode = OpenMode::for_mode(job.mode).ok_or(Error::NoMode)?;

        let mut sink = dests.open(Family::Descriptor, job.destination)
            .map_err(Error::destination("descriptor"))?;

        if job.destination.is_standard_output() {
            // `_setmode` on an open descriptor; there is no going back for the rest of the process.
            info!("applied {} to standard output", open_mode.flag_name());
        } else {
            debug!("opened with {}", open_mode.flag_name());
        }

        // A single write call, as `_write` makes.  Whatever it did not take is lost.
        let data = sample::get(job.width());
        let written = write_translated(&mut *sink, open_mode, data, &[])?;
        check_written(data.len(), written)?;

        Ok(Report::written(written))
    }
}

#[cfg(all(test, not(windows)))]
mod test {
    use super::*;
    use crate::config::Destination;
    use crate::matrix::CompatibilityMatrix;
    use crate::method::{Method, Mode, Width};
    use crate::sink::memory::MemoryDestinations;
    use crate::sink::WriteCall;

    fn run_to(mode: Mode, destination: &Destination, dests: &mut MemoryDestinations) -> Result<Report> {
        let job = Job {
            method: Method::PosixDescriptor,
            mode,
            destination,
            locale: None,
            support: CompatibilityMatrix::new().is_supported(Method::PosixDescriptor, mode),
        };
        DescriptorAdapter.write_sample(&job, dests)
    }

    fn run(mode: Mode, dests: &mut MemoryDestinations) -> Result<Report> {
        run_to(mode, &Destination::output_file(), dests)
    }

    #[test]
    fn test_no_bom() {
        let mut dests = MemoryDestinations::new();
        run(Mode::NarrowUnicode, &mut dests).unwrap();
        assert_eq!(dests.contents(), b"A\xe2\x95\xac\xc3\xba\xce\xb4\xc3\xae\n".to_vec());
        assert_eq!(dests.calls(), vec![WriteCall::Bytes]);
    }

    #[test]
    fn test_partial_write() {
        let mut dests = MemoryDestinations::new().truncating(3);
        match run(Mode::Binary, &mut dests) {
            Err(Error::ShortWrite { requested: 6, written: 3 }) => (),
            other => panic!("unexpected {:?}", other),
        }
        assert_eq!(dests.open_count(), 0);
    }

    #[test]
    fn test_unicode_modes_write_wide_text_to_console() {
        let stdout = Destination::StandardOutput;
        let wide = sample::get(Width::Wide).to_bytes();

        for &mode in &[Mode::WideText, Mode::NarrowUnicode, Mode::WideUnicode] {
            let mut console = MemoryDestinations::new().console();
            let report = run_to(mode, &stdout, &mut console).unwrap();
            assert_eq!(report.units, sample::LEN);
            assert_eq!(console.calls(), vec![WriteCall::ConsoleWide], "{}", mode);
            assert_eq!(console.contents(), wide, "{}", mode);
        }

        for &mode in &[Mode::Binary, Mode::NarrowText] {
            let mut console = MemoryDestinations::new().console();
            run_to(mode, &stdout, &mut console).unwrap();
            assert_eq!(console.calls(), vec![WriteCall::Bytes], "{}", mode);
            assert_eq!(console.contents(), sample::NARROW.to_vec());
        }
    }

    #[test]
    fn test_partial_console_write() {
        let mut console = MemoryDestinations::new().console().truncating(4);
        match run_to(Mode::NarrowUnicode, &Destination::StandardOutput, &mut console) {
            Err(Error::ShortWrite { requested: 6, written: 2 }) => (),
            other => panic!("unexpected {:?}", other),
        }
    }
}
