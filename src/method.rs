/*!
Output API methods, text modes, and character widths.

Both enumerations carry their command-line token as part of their definition; the tokens are the only names the operator ever sees.
*/
use std::fmt;

macro_rules! named_enum {
    ($enum_doc:expr, $enum_name:ident { $($variant:ident = $name:expr, $doc:expr;)* }) => {
        #[doc = $enum_doc]
        #[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
        pub enum $enum_name {
            $(
                #[doc = $doc]
                $variant,
            )*
        }

        impl $enum_name {
            /// Every variant, in declaration order.
            pub const ALL: &'static [$enum_name] = &[$($enum_name::$variant,)*];

            /// Number of variants; used to size lookup tables.
            pub const COUNT: usize = [$($name,)*].len();

            /// The command-line token for this variant.
            pub fn name(self) -> &'static str {
                match self {
                    $($enum_name::$variant => $name,)*
                }
            }

            /**
            Parses a command-line token.

            Unknown tokens resolve to `None`, which every consumer rejects.
            */
            pub fn parse(arg: &str) -> Self {
                Self::ALL.iter()
                    .cloned()
                    .find(|v| !v.name().is_empty() && v.name() == arg)
                    .unwrap_or($enum_name::None)
            }

            /// Accepted tokens, for usage diagnostics.
            pub fn tokens() -> Vec<&'static str> {
                Self::ALL.iter().map(|v| v.name()).filter(|n| !n.is_empty()).collect()
            }
        }

        impl fmt::Display for $enum_name {
            fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
                match *self {
                    $enum_name::None => fmt.write_str("(none)"),
                    v => fmt.write_str(v.name()),
                }
            }
        }
    };
}

named_enum!("Text-generation API methods", Method {
    None = "", "No method selected";
    NativeHandle = "winapi", "OS console/file handle API (`WriteFile`, `WriteConsole`)";
    PosixDescriptor = "posix", "Low-level descriptor API (`_open`, `_write`)";
    BufferedUnformatted = "unformatted", "Buffered C I/O, block writes (`fwrite`)";
    BufferedFormatted = "formatted", "Buffered C I/O, formatted writes (`fprintf`/`fwprintf`)";
    StreamUnformatted = "unformatted++", "Stream I/O, block writes (`ostream::write`)";
    StreamFormatted = "formatted++", "Stream I/O, insertion (`operator<<`)";
});

named_enum!("Text API modes", Mode {
    None = "", "No mode selected";
    Binary = "binary", "Raw bytes";
    NarrowText = "text", "Narrow-character text, interpreted by the locale or console code page";
    WideText = "wide", "Wide-character text (UTF-16)";
    NarrowUnicode = "unicode", "Narrow-character 'Unicode mode': UTF-16 input converted to UTF-8";
    WideUnicode = "wideunicode", "Wide-character 'Unicode mode': UTF-16 input converted to UTF-16LE";
});

/**
Character width of the data handed to an output call.
*/
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Width {
    Narrow,
    Wide,
}

impl Width {
    /// Size in bytes of one code unit.
    pub fn unit_size(self) -> usize {
        match self {
            Width::Narrow => 1,
            Width::Wide => 2,
        }
    }
}

/**
The encoding semantics a mode asks for.
*/
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Conversion {
    None,
    Raw,
    LocaleText,
    Utf16,
    Utf8ViaConversion,
    Utf16ViaConversion,
}

impl Mode {
    /// Whether the mode requires a wide-character API call.
    pub fn width(self) -> Width {
        match self {
            Mode::WideText | Mode::NarrowUnicode | Mode::WideUnicode => Width::Wide,
            Mode::None | Mode::Binary | Mode::NarrowText => Width::Narrow,
        }
    }

    pub fn is_wide(self) -> bool {
        self.width() == Width::Wide
    }

    pub fn conversion(self) -> Conversion {
        match self {
            Mode::None => Conversion::None,
            Mode::Binary => Conversion::Raw,
            Mode::NarrowText => Conversion::LocaleText,
            Mode::WideText => Conversion::Utf16,
            Mode::NarrowUnicode => Conversion::Utf8ViaConversion,
            Mode::WideUnicode => Conversion::Utf16ViaConversion,
        }
    }

    /// The "natural" text mode for a character width.
    pub fn natural(width: Width) -> Mode {
        match width {
            Width::Narrow => Mode::NarrowText,
            Width::Wide => Mode::WideText,
        }
    }

    pub fn is_unicode(self) -> bool {
        self == Mode::NarrowUnicode || self == Mode::WideUnicode
    }
}

/**
The API family a method belongs to.  Each family owns one adapter and one way of acquiring destinations.
*/
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Family {
    Handle,
    Descriptor,
    Buffered,
    Stream,
}

impl fmt::Display for Family {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        fmt.write_str(match *self {
            Family::Handle => "native handle",
            Family::Descriptor => "descriptor",
            Family::Buffered => "buffered C I/O",
            Family::Stream => "stream I/O",
        })
    }
}

impl Method {
    pub fn family(self) -> Option<Family> {
        match self {
            Method::None => None,
            Method::NativeHandle => Some(Family::Handle),
            Method::PosixDescriptor => Some(Family::Descriptor),
            Method::BufferedUnformatted | Method::BufferedFormatted => Some(Family::Buffered),
            Method::StreamUnformatted | Method::StreamFormatted => Some(Family::Stream),
        }
    }

    pub fn is_formatted(self) -> bool {
        self == Method::BufferedFormatted || self == Method::StreamFormatted
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_parse_tokens() {
        assert_eq!(Method::parse("winapi"), Method::NativeHandle);
        assert_eq!(Method::parse("formatted++"), Method::StreamFormatted);
        assert_eq!(Method::parse("unformatted"), Method::BufferedUnformatted);
        assert_eq!(Method::parse("WINAPI"), Method::None);
        assert_eq!(Method::parse(""), Method::None);

        assert_eq!(Mode::parse("wideunicode"), Mode::WideUnicode);
        assert_eq!(Mode::parse("text"), Mode::NarrowText);
        assert_eq!(Mode::parse("utf8"), Mode::None);
    }

    #[test]
    fn test_widths() {
        let wide: Vec<_> = Mode::ALL.iter().cloned().filter(|m| m.is_wide()).collect();
        assert_eq!(wide, vec![Mode::WideText, Mode::NarrowUnicode, Mode::WideUnicode]);
        assert_eq!(Mode::COUNT, 6);
        assert_eq!(Method::COUNT, 7);
        assert_eq!(Method::tokens().len(), 6);
    }
}
