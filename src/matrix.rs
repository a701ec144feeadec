/*!
Which (method, mode) combinations are valid, and what each API family can do.

The tables are built once and borrowed by the dispatcher; nothing in here changes after construction.
*/
use crate::config::Destination;
use crate::error::{Error, Result};
use crate::method::{Family, Method, Mode};

/**
One cell of the compatibility matrix.
*/
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Support {
    pub supported: bool,
    pub requires_wide: bool,
    /**
    The combination is only valid against an interactive console.

    This is re-checked against the actual destination once it is open; the static table cannot know what standard output is connected to.
    */
    pub console_only: bool,
    reason: &'static str,
}

impl Support {
    const fn yes(mode: Mode) -> Support {
        Support {
            supported: true,
            requires_wide: matches!(mode, Mode::WideText | Mode::NarrowUnicode | Mode::WideUnicode),
            console_only: false,
            reason: "",
        }
    }

    const fn no(reason: &'static str) -> Support {
        Support {
            supported: false,
            requires_wide: false,
            console_only: false,
            reason,
        }
    }

    const fn console(mode: Mode) -> Support {
        let mut s = Support::yes(mode);
        s.console_only = true;
        s
    }

    /// Why the combination is unsupported; empty for supported cells.
    pub fn reason(&self) -> &'static str {
        self.reason
    }
}

/**
What an API family is able to do, beyond which modes it accepts.
*/
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Capabilities {
    /// Output passes through a translation mode chosen at open time.
    pub translation_modes: bool,
    /// The family can change the translation mode of an already-open standard output.
    pub retroactive_mode: bool,
    /// The family honors the global C locale.
    pub uses_c_locale: bool,
    /// The family binds a locale to the individual stream object.
    pub binds_stream_locale: bool,
}

impl Capabilities {
    const fn of(family: Family) -> Capabilities {
        match family {
            Family::Handle => Capabilities {
                translation_modes: false, retroactive_mode: false, uses_c_locale: false, binds_stream_locale: false,
            },
            Family::Descriptor => Capabilities {
                translation_modes: true, retroactive_mode: true, uses_c_locale: false, binds_stream_locale: false,
            },
            Family::Buffered => Capabilities {
                translation_modes: true, retroactive_mode: true, uses_c_locale: true, binds_stream_locale: false,
            },
            Family::Stream => Capabilities {
                translation_modes: true, retroactive_mode: false, uses_c_locale: false, binds_stream_locale: true,
            },
        }
    }
}

fn entry(method: Method, mode: Mode) -> Support {
    if method == Method::None {
        return Support::no("no method selected");
    }
    if mode == Mode::None {
        return Support::no("no mode selected");
    }

    match method {
        Method::None => Support::no("no method selected"),

        Method::NativeHandle => match mode {
            Mode::NarrowUnicode | Mode::WideUnicode => Support::no("no specific 'unicode' modes in the native handle API"),
            Mode::NarrowText | Mode::WideText => Support::console(mode),
            _ => Support::yes(mode),
        },

        Method::PosixDescriptor
        | Method::BufferedUnformatted
        | Method::BufferedFormatted
        | Method::StreamUnformatted
        | Method::StreamFormatted => Support::yes(mode),
    }
}

/**
The static compatibility table: a total function over every method and mode.
*/
#[derive(Clone, Debug)]
pub struct CompatibilityMatrix {
    entries: [[Support; Mode::COUNT]; Method::COUNT],
}

impl CompatibilityMatrix {
    pub fn new() -> CompatibilityMatrix {
        let mut entries = [[Support::no(""); Mode::COUNT]; Method::COUNT];
        for &method in Method::ALL {
            for &mode in Mode::ALL {
                entries[method as usize][mode as usize] = entry(method, mode);
            }
        }
        CompatibilityMatrix { entries }
    }

    pub fn is_supported(&self, method: Method, mode: Mode) -> Support {
        self.entries[method as usize][mode as usize]
    }

    pub fn capabilities(&self, method: Method) -> Option<Capabilities> {
        method.family().map(Capabilities::of)
    }

    /**
    Validates a combination against the static table and the kind of destination.

    Standard output is already open by the time any test runs.  A family that cannot retroactively change its translation mode can only use standard output in the one mode it is already in for each character width.
    */
    pub fn check(&self, method: Method, mode: Mode, destination: &Destination) -> Result<Support> {
        if method == Method::None {
            return Err(Error::NoMethod);
        }
        if mode == Mode::None {
            return Err(Error::NoMode);
        }

        let support = self.is_supported(method, mode);
        if !support.supported {
            return Err(Error::Unsupported { method, mode, reason: support.reason() });
        }

        let caps = self.capabilities(method).ok_or(Error::NoMethod)?;
        if destination.is_standard_output() && caps.translation_modes && !caps.retroactive_mode {
            let natural = Mode::natural(mode.width());
            if mode != natural {
                return Err(Error::NotNaturalForStandardOutput { method, mode, natural });
            }
        }

        Ok(support)
    }
}

impl Default for CompatibilityMatrix {
    fn default() -> Self {
        CompatibilityMatrix::new()
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_total_over_cross_product() {
        let matrix = CompatibilityMatrix::new();
        let supported = Method::ALL.iter()
            .flat_map(|&method| Mode::ALL.iter().map(move |&mode| (method, mode)))
            .filter(|&(method, mode)| matrix.is_supported(method, mode).supported)
            .count();
        // three native handle modes, every mode for the other five methods
        assert_eq!(supported, 3 + 5 * 5);
    }

    #[test]
    fn test_native_handle_rules() {
        let matrix = CompatibilityMatrix::new();
        assert!(!matrix.is_supported(Method::NativeHandle, Mode::NarrowUnicode).supported);
        assert!(!matrix.is_supported(Method::NativeHandle, Mode::WideUnicode).supported);
        assert!(matrix.is_supported(Method::NativeHandle, Mode::NarrowText).console_only);
        assert!(matrix.is_supported(Method::NativeHandle, Mode::WideText).console_only);
        assert!(!matrix.is_supported(Method::NativeHandle, Mode::Binary).console_only);
    }

    #[test]
    fn test_requires_wide() {
        let matrix = CompatibilityMatrix::new();
        for &mode in Mode::ALL.iter().filter(|m| **m != Mode::None) {
            assert_eq!(matrix.is_supported(Method::PosixDescriptor, mode).requires_wide, mode.is_wide());
        }
    }

    #[test]
    fn test_stream_standard_output_natural_modes() {
        let matrix = CompatibilityMatrix::new();
        let stdout = Destination::StandardOutput;
        let file = Destination::File(PathBuf::from("output"));

        assert!(matrix.check(Method::StreamFormatted, Mode::NarrowText, &stdout).is_ok());
        assert!(matrix.check(Method::StreamFormatted, Mode::WideText, &stdout).is_ok());
        assert!(matrix.check(Method::StreamFormatted, Mode::Binary, &stdout).is_err());
        assert!(matrix.check(Method::StreamUnformatted, Mode::WideUnicode, &stdout).is_err());
        assert!(matrix.check(Method::StreamUnformatted, Mode::WideUnicode, &file).is_ok());
        // Families that can reconfigure standard output are unaffected.
        assert!(matrix.check(Method::BufferedUnformatted, Mode::WideUnicode, &stdout).is_ok());
        assert!(matrix.check(Method::PosixDescriptor, Mode::Binary, &stdout).is_ok());
    }
}
