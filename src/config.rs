/*!
Test configuration and option tokens.
*/
use std::path::{Path, PathBuf};
use crate::encoding::CodePage;
use crate::method::{Method, Mode};

/// Name of the file written when output does not go to standard output.
pub const OUTPUT_FILE_NAME: &str = "output";

/**
Where a test writes.
*/
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Destination {
    /// The process's already-open standard output.
    StandardOutput,
    /// A file created (or truncated) for this test and closed before it returns.
    File(PathBuf),
}

impl Destination {
    /// The fixed output file in the working directory.
    pub fn output_file() -> Destination {
        Destination::File(PathBuf::from(OUTPUT_FILE_NAME))
    }

    pub fn is_standard_output(&self) -> bool {
        *self == Destination::StandardOutput
    }

    pub fn path(&self) -> Option<&Path> {
        match *self {
            Destination::StandardOutput => None,
            Destination::File(ref path) => Some(path),
        }
    }
}

/**
Everything one test run needs.  Built once, then only borrowed.
*/
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TestConfiguration {
    pub method: Method,
    pub mode: Mode,
    pub destination: Destination,
    pub code_page: Option<CodePage>,
    pub locale: Option<String>,
}

impl TestConfiguration {
    pub fn new(method: Method, mode: Mode, destination: Destination) -> TestConfiguration {
        TestConfiguration {
            method,
            mode,
            destination,
            code_page: None,
            locale: None,
        }
    }

    pub fn with_code_page(mut self, code_page: CodePage) -> Self {
        self.code_page = Some(code_page);
        self
    }

    pub fn with_locale<S: Into<String>>(mut self, locale: S) -> Self {
        self.locale = Some(locale.into());
        self
    }
}

/**
The optional tokens that follow the method and mode on the command line.
*/
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Options {
    pub code_page: Option<CodePage>,
    pub locale: Option<String>,
    pub to_file: bool,
    /// Problems with individual tokens; none of them stop the test.
    pub warnings: Vec<String>,
}

impl Options {
    /**
    Parses `cp####`, `l####`, and `file` tokens, in order.  Later tokens override earlier ones.
    */
    pub fn parse<S: AsRef<str>>(args: &[S]) -> Options {
        let mut options = Options::default();

        for arg in args.iter().map(AsRef::as_ref) {
            if let Some(number) = arg.strip_prefix("cp") {
                // A bad number still replaces any earlier code page.
                options.code_page = leading_number(number).map(CodePage);
                if options.code_page.is_none() {
                    options.warnings.push("option cp#### needs code page number".to_owned());
                }
            } else if let Some(locale) = arg.strip_prefix('l') {
                options.locale = Some(locale.to_owned());
            } else if arg == "file" {
                options.to_file = true;
            } else {
                options.warnings.push(format!("unexpected option: \"{}\"", arg));
            }
        }

        options
    }

    pub fn destination(&self) -> Destination {
        if self.to_file {
            Destination::output_file()
        } else {
            Destination::StandardOutput
        }
    }

    pub fn configure(&self, method: Method, mode: Mode) -> TestConfiguration {
        TestConfiguration {
            method,
            mode,
            destination: self.destination(),
            code_page: self.code_page,
            locale: self.locale.clone(),
        }
    }
}

/**
The number `s` starts with, read the way `strtoul` does: leading whitespace and a `+` are skipped, and anything after the digits is ignored.

Zero, no digits at all, and numbers too large for a code page are all `None`.
*/
fn leading_number(s: &str) -> Option<u32> {
    let s = s.trim_start();
    let s = s.strip_prefix('+').unwrap_or(s);
    let end = s.find(|c: char| !c.is_ascii_digit()).unwrap_or(s.len());
    s[..end].parse::<u32>().ok().filter(|&n| n != 0)
}
