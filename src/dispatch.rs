/*!
Runs one test configuration from start to finish.
*/
use log::{debug, info};
use crate::adapter::{self, Job, Report};
use crate::config::TestConfiguration;
use crate::console::{self, DEFAULT_CODE_PAGE};
use crate::error::{Error, Result};
use crate::locale;
use crate::matrix::CompatibilityMatrix;
use crate::method::Mode;
use crate::report::Outcome;
use crate::sink::Destinations;

/**
Validates configurations against the compatibility matrix and hands them to the matching adapter.
*/
#[derive(Copy, Clone, Debug)]
pub struct Dispatcher<'m> {
    matrix: &'m CompatibilityMatrix,
}

impl<'m> Dispatcher<'m> {
    pub fn new(matrix: &'m CompatibilityMatrix) -> Dispatcher<'m> {
        Dispatcher { matrix }
    }

    /**
    Runs `config` against `dests`.

    Every failure, wherever it happens, ends up in the returned outcome.  Code page and global locale changes made here last for the rest of the process.
    */
    pub fn run(&self, config: &TestConfiguration, dests: &mut dyn Destinations) -> Outcome {
        match self.try_run(config, dests) {
            Ok(report) => Outcome::success(report),
            Err(err) => Outcome::failure(&err),
        }
    }

    fn try_run(&self, config: &TestConfiguration, dests: &mut dyn Destinations) -> Result<Report> {
        let support = self.matrix.check(config.method, config.mode, &config.destination)?;
        let family = config.method.family().ok_or(Error::NoMethod)?;
        let caps = self.matrix.capabilities(config.method).ok_or(Error::NoMethod)?;

        log_code_pages("was not 437 but");

        if let Some(code_page) = config.code_page {
            if config.mode == Mode::NarrowUnicode {
                info!("'unicode' appears to override the code page setting");
            }
            console::set_output_code_page(code_page)
                .map_err(|source| Error::CodePage { code_page: code_page.0, source })?;
        }

        if let Some(ref name) = config.locale {
            if caps.uses_c_locale {
                locale::apply_global(name)?;
            }
        }

        let job = Job {
            method: config.method,
            mode: config.mode,
            destination: &config.destination,
            locale: config.locale.as_deref().filter(|_| caps.binds_stream_locale),
            support,
        };
        let adapter = adapter::for_family(family);
        debug!(
            "{} adapter writes the {} sample for '{}' ({:?})",
            adapter.family(),
            if support.requires_wide { "wide" } else { "narrow" },
            config.mode,
            config.mode.conversion(),
        );
        let report = adapter.write_sample(&job, dests)?;

        log_code_pages("is now");
        Ok(report)
    }
}

fn log_code_pages(state: &str) {
    let input = console::input_code_page();
    if input != DEFAULT_CODE_PAGE {
        info!("console code page {} {}", state, input);
    }
    let output = console::output_code_page();
    if output != DEFAULT_CODE_PAGE {
        info!("console output code page {} {}", state, output);
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::config::Destination;
    use crate::error::ErrorKind;
    use crate::method::Method;
    use crate::sink::memory::MemoryDestinations;

    #[test]
    fn test_rejection_writes_nothing() {
        let matrix = CompatibilityMatrix::new();
        let dispatcher = Dispatcher::new(&matrix);
        for &mode in &[Mode::NarrowUnicode, Mode::WideUnicode] {
            for destination in &[Destination::StandardOutput, Destination::output_file()] {
                let mut dests = MemoryDestinations::new().console();
                let config = TestConfiguration::new(Method::NativeHandle, mode, destination.clone());
                let outcome = dispatcher.run(&config, &mut dests);
                assert!(outcome.failed);
                assert_eq!(outcome.kind, Some(ErrorKind::Configuration));
                assert_eq!(dests.opened(), 0);
            }
        }
    }

    #[test]
    fn test_stream_locale_only_reaches_stream_family() {
        let matrix = CompatibilityMatrix::new();
        let dispatcher = Dispatcher::new(&matrix);

        // The descriptor family ignores locales entirely.
        let mut dests = MemoryDestinations::new();
        let config = TestConfiguration::new(Method::PosixDescriptor, Mode::WideUnicode, Destination::output_file())
            .with_locale("no such locale");
        assert!(!dispatcher.run(&config, &mut dests).failed);

        let mut dests = MemoryDestinations::new();
        let config = TestConfiguration::new(Method::StreamFormatted, Mode::WideUnicode, Destination::output_file())
            .with_locale("C");
        let outcome = dispatcher.run(&config, &mut dests);
        assert!(outcome.failed);
        assert_eq!(outcome.message, "construction of 'wide unicode' mode requires no explicit locale");
    }
}
