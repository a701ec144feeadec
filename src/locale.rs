/*!
Locales, both the global C locale and locale objects bound to a single stream.

The two are deliberately separate paths.  The global locale goes straight to the C runtime through `setlocale`; a stream locale is resolved here, from its name, into the character set its wide-to-narrow conversion uses, and never touches process state.
*/
use std::env;
use encoding_rs::Encoding;
use log::debug;
use crate::encoding::{Codec, CodePage};
use crate::error::{Error, Result};
use crate::ffi;

/**
A locale that can be bound to a stream.
*/
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Locale {
    name: String,
    codec: Codec,
}

impl Locale {
    /// The classic "C" locale every stream starts with.
    pub fn classic() -> Locale {
        Locale {
            name: "C".to_owned(),
            codec: Codec::Classic,
        }
    }

    /**
    Constructs a locale from its name.

    Accepted names are `C` and `POSIX`, the empty name (the user's default, taken from `LC_ALL`, `LC_CTYPE`, or `LANG`), and `[language[_REGION]].codeset[@modifier]`.  The codeset may be a code page number (`.437`, `.1252`), `utf8`/`UTF-8`, `ACP`/`OCP`, or any encoding label.  A name without a codeset uses UTF-8.
    */
    pub fn bind(name: &str) -> Result<Locale> {
        let codec = resolve(name)?;
        debug!("bound locale \"{}\" with {} conversion", name, codec.name());
        Ok(Locale {
            name: name.to_owned(),
            codec,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// The character set wide characters are narrowed into.
    pub fn codec(&self) -> Codec {
        self.codec
    }
}

fn resolve(name: &str) -> Result<Codec> {
    let fail = |reason: &str| Error::LocaleBinding { name: name.to_owned(), reason: reason.to_owned() };

    match name {
        "C" | "POSIX" => return Ok(Codec::Classic),
        "" => {
            let user = ["LC_ALL", "LC_CTYPE", "LANG"].iter()
                .filter_map(|var| env::var(var).ok())
                .find(|v| !v.is_empty());
            return match user {
                Some(user) => resolve(&user).map_err(|_| fail("user default locale is not usable")),
                None => Ok(Codec::Classic),
            };
        },
        _ => (),
    }

    let base = name.split('@').next().unwrap_or(name);
    let codeset = match base.split_once('.') {
        Some((_, codeset)) => codeset,
        None => {
            if base.chars().all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-') {
                return Ok(Codec::Utf8);
            }
            return Err(fail("malformed locale name"));
        },
    };

    if codeset.is_empty() {
        return Err(fail("missing codeset"));
    }

    if codeset.eq_ignore_ascii_case("utf8") || codeset.eq_ignore_ascii_case("utf-8") {
        return Ok(Codec::Utf8);
    }
    if codeset.eq_ignore_ascii_case("acp") {
        return CodePage::WINDOWS_1252.codec().ok_or_else(|| fail("no ANSI code page"));
    }
    if codeset.eq_ignore_ascii_case("ocp") {
        return CodePage::OEM_US.codec().ok_or_else(|| fail("no OEM code page"));
    }
    if let Ok(number) = codeset.parse::<u32>() {
        return CodePage(number).codec().ok_or_else(|| fail("unsupported code page"));
    }

    match Encoding::for_label(codeset.as_bytes()) {
        Some(enc) => Codec::for_encoding(enc).ok_or_else(|| fail("no conversion into this codeset")),
        None => Err(fail("unknown codeset")),
    }
}

/**
Applies `name` to the process-wide C locale.

This lasts for the rest of the process.
*/
pub fn apply_global(name: &str) -> Result<String> {
    let previous = ffi::global_locale();
    match ffi::set_global_locale(name) {
        Some(applied) => {
            debug!("C locale changed from {:?} to \"{}\"", previous, applied);
            Ok(applied)
        },
        None => Err(Error::LocaleApplication(name.to_owned())),
    }
}

/**
The character set of the global C locale's `LC_CTYPE` category, as used by wide formatted output into a narrow stream.

Falls back to the classic locale if the runtime reports something unrecognizable.
*/
pub fn global_codec() -> Codec {
    let name = match ffi::global_locale() {
        Some(name) => name,
        None => return Codec::Classic,
    };

    // Mixed locales are reported as `LC_CTYPE=...;LC_NUMERIC=...` or similar.
    let ctype = name.split(';')
        .find_map(|part| part.strip_prefix("LC_CTYPE="))
        .unwrap_or(&name);

    match resolve(ctype) {
        Ok(codec) => codec,
        Err(err) => {
            debug!("treating C locale as classic: {}", err);
            Codec::Classic
        },
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_bind_names() {
        assert_eq!(Locale::bind("C").map(|l| l.codec()).ok(), Some(Codec::Classic));
        assert_eq!(Locale::bind(".437").map(|l| l.codec()).ok(), Some(Codec::Oem(437)));
        assert_eq!(Locale::bind("en_US.UTF-8").map(|l| l.codec()).ok(), Some(Codec::Utf8));
        assert_eq!(Locale::bind("de_DE.utf8@euro").map(|l| l.codec()).ok(), Some(Codec::Utf8));
        assert_eq!(Locale::bind("English_United States.1252").map(|l| l.codec().name()).ok(),
            Some("windows-1252".to_owned()));
        assert_eq!(Locale::bind("ru_RU.KOI8-R").map(|l| l.codec().name()).ok(), Some("KOI8-R".to_owned()));
        assert_eq!(Locale::bind("en_US").map(|l| l.codec()).ok(), Some(Codec::Utf8));
        assert_eq!(Locale::bind(".utf-16le").map(|l| l.codec()).ok(), Some(Codec::Utf16Le));
        assert_eq!(Locale::bind(".1200").map(|l| l.codec()).ok(), Some(Codec::Utf16Le));
    }

    #[test]
    fn test_bind_failures() {
        for name in &[".", ".9", "xx.no-such-codeset", "a/b", ".utf-16be", ".replacement"] {
            match Locale::bind(name) {
                Err(Error::LocaleBinding { .. }) => (),
                other => panic!("{:?} bound unexpectedly: {:?}", name, other),
            }
        }
    }
}
