/*!
The native handle API: `CreateFile`, `WriteFile`, `WriteConsoleA`, `WriteConsoleW`.

There is no translation layer here; what the sample holds is what the write call gets.  The console calls only work on console handles, and that is only known once the handle is open.
*/
use log::debug;
use crate::error::{Error, Result};
use crate::method::{Family, Method, Mode};
use crate::sample;
use crate::sink::{Destinations, WriteCall};
use super::{check_written, Adapter, Job, Report};

#[derive(Copy, Clone, Debug, Default)]
pub struct NativeHandleAdapter;

impl Adapter for NativeHandleAdapter {
    fn family(&self) -> Family {
        Family::Handle
    }

    fn write_sample(&self, job: &Job, dests: &mut dyn Destinations) -> Result<Report> {
        if job.mode.is_unicode() {
            return Err(Error::Unsupported {
                method: Method::NativeHandle,
                mode: job.mode,
                reason: "no specific 'unicode' modes in the native handle API",
            });
        }

        let mut sink = dests.open(Family::Handle, job.destination)
            .map_err(Error::destination("handle"))?;

        if job.support.console_only && !sink.is_interactive() {
            // The handle is released when `sink` drops.
            return Err(Error::RequiresConsole(
                "console APIs ('text' and 'wide') not supported against file (neither explicit or by redirection)"
            ));
        }

        let data = sample::get(job.width());
        let (call, name) = match job.mode {
            Mode::Binary => (WriteCall::Bytes, "WriteFile"),
            Mode::NarrowText => (WriteCall::ConsoleNarrow, "WriteConsoleA"),
            _ => (WriteCall::ConsoleWide, "WriteConsoleW"),
        };
        debug!("{} with {} units", name, data.len());

        let written = sink.write(&data.to_bytes(), call).map_err(Error::Write)?;
        check_written(data.len(), written)?;
        Ok(Report::written(written))
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::config::Destination;
    use crate::error::ErrorKind;
    use crate::matrix::CompatibilityMatrix;
    use crate::sink::memory::MemoryDestinations;

    fn job(mode: Mode, destination: &Destination) -> Job {
        Job {
            method: Method::NativeHandle,
            mode,
            destination,
            locale: None,
            support: CompatibilityMatrix::new().is_supported(Method::NativeHandle, mode),
        }
    }

    #[test]
    fn test_console_modes_need_console() {
        let stdout = Destination::StandardOutput;

        let mut file = MemoryDestinations::new();
        let err = NativeHandleAdapter.write_sample(&job(Mode::WideText, &stdout), &mut file).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::CapabilityMismatch);
        assert_eq!(file.open_count(), 0);
        assert!(file.contents().is_empty());

        let mut console = MemoryDestinations::new().console();
        let report = NativeHandleAdapter.write_sample(&job(Mode::WideText, &stdout), &mut console).unwrap();
        assert_eq!(report.units, sample::LEN);
        assert_eq!(console.contents(), sample::get(crate::method::Width::Wide).to_bytes());
    }

    #[test]
    fn test_each_mode_makes_its_own_call() {
        let stdout = Destination::StandardOutput;
        let calls = [
            (Mode::Binary, WriteCall::Bytes),
            (Mode::NarrowText, WriteCall::ConsoleNarrow),
            (Mode::WideText, WriteCall::ConsoleWide),
        ];
        for &(mode, call) in &calls {
            let mut console = MemoryDestinations::new().console();
            NativeHandleAdapter.write_sample(&job(mode, &stdout), &mut console).unwrap();
            assert_eq!(console.calls(), vec![call], "{}", mode);
        }
    }

    #[test]
    fn test_short_write() {
        let mut dests = MemoryDestinations::new().truncating(4);
        let err = NativeHandleAdapter
            .write_sample(&job(Mode::Binary, &Destination::output_file()), &mut dests)
            .unwrap_err();
        match err {
            Error::ShortWrite { requested: 6, written: 4 } => (),
            other => panic!("unexpected {:?}", other),
        }
        assert_eq!(dests.open_count(), 0);
    }
}
