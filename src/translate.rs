/*!
Translation modes of descriptors and C streams.

A descriptor (`_open`) or C stream (`fopen`) is opened in one translation mode, which decides what happens to data between the write call and the bytes that land in the destination.
*/
use crate::encoding::conv::{ConvError, Utf16ToUniIter};
use crate::encoding::{wide_to_le_bytes, Units};
use crate::method::Mode;
use crate::util::{TrapErrExt, Utf8EncodeExt};

/**
Whether text modes expand LF to CR LF.

Only the Windows C runtime does this; everywhere else text and binary modes write the same bytes.
*/
pub const TRANSLATES_NEWLINES: bool = cfg!(windows);

const UTF8_BOM: &[u8] = &[0xEF, 0xBB, 0xBF];
const UTF16LE_BOM: &[u8] = &[0xFF, 0xFE];

/**
A translation mode, as selected by an `_open` flag or an `fopen` mode string.
*/
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum OpenMode {
    Binary,
    Text,
    WText,
    U8Text,
    U16Text,
}

impl OpenMode {
    pub fn for_mode(mode: Mode) -> Option<OpenMode> {
        Some(match mode {
            Mode::None => return None,
            Mode::Binary => OpenMode::Binary,
            Mode::NarrowText => OpenMode::Text,
            Mode::WideText => OpenMode::WText,
            Mode::NarrowUnicode => OpenMode::U8Text,
            Mode::WideUnicode => OpenMode::U16Text,
        })
    }

    /// The descriptor flag this mode corresponds to.
    pub fn flag_name(self) -> &'static str {
        match self {
            OpenMode::Binary => "_O_BINARY",
            OpenMode::Text => "_O_TEXT",
            OpenMode::WText => "_O_WTEXT",
            OpenMode::U8Text => "_O_U8TEXT",
            OpenMode::U16Text => "_O_U16TEXT",
        }
    }

    /// The `fopen` mode string this mode corresponds to.
    pub fn c_mode(self) -> &'static str {
        match self {
            OpenMode::Binary => "wb",
            OpenMode::Text => "w",
            OpenMode::WText => "w,ccs=unicode",
            OpenMode::U8Text => "w,ccs=utf-8",
            OpenMode::U16Text => "w,ccs=utf-16le",
        }
    }

    /// Unicode modes take wide data and apply a character set conversion of their own.
    pub fn is_unicode(self) -> bool {
        matches!(self, OpenMode::WText | OpenMode::U8Text | OpenMode::U16Text)
    }

    /// The byte order mark a C stream writes when it creates a file in this mode.
    pub fn bom(self) -> &'static [u8] {
        match self {
            OpenMode::Binary | OpenMode::Text => &[],
            OpenMode::U8Text => UTF8_BOM,
            OpenMode::WText | OpenMode::U16Text => UTF16LE_BOM,
        }
    }

    /**
    Translates written data into the bytes that reach the destination.

    Narrow modes pass the in-memory image of the data through, expanding newlines in text mode.  Unicode modes require wide data and fail on narrow data; `U8Text` additionally fails on malformed UTF-16.
    */
    pub fn translate(self, data: Units) -> Result<Vec<u8>, ConvError> {
        match self {
            OpenMode::Binary => Ok(data.to_bytes()),
            OpenMode::Text => Ok(expand_newlines(&data.to_bytes())),
            OpenMode::WText | OpenMode::U16Text => {
                let units = wide_units(data)?;
                Ok(wide_to_le_bytes(&expand_wide_newlines(units)))
            },
            OpenMode::U8Text => {
                let units = wide_units(data)?;
                let mut trap = Ok(());
                let bytes: Vec<u8> = Utf16ToUniIter::new(units.iter().cloned())
                    .trap_err(&mut trap)
                    .encode_utf8()
                    .collect();
                trap?;
                Ok(expand_newlines(&bytes))
            },
        }
    }

    /**
    The text a Unicode mode hands to a console instead of translated bytes.

    Whatever the file encoding would have been, a console gets the wide characters themselves, newlines expanded as in text mode.
    */
    pub fn console_text(self, data: Units) -> Result<Vec<u16>, ConvError> {
        if !self.is_unicode() {
            return Err(ConvError::WidthMismatch);
        }
        let units = wide_units(data)?;
        if self == OpenMode::U8Text {
            let mut trap = Ok(());
            Utf16ToUniIter::new(units.iter().cloned()).trap_err(&mut trap).for_each(drop);
            trap?;
        }
        Ok(expand_wide_newlines(units))
    }
}

fn wide_units(data: Units) -> Result<&[u16], ConvError> {
    match data {
        Units::Wide(units) => Ok(units),
        Units::Narrow(_) => Err(ConvError::WidthMismatch),
    }
}

fn expand_wide_newlines(units: &[u16]) -> Vec<u16> {
    if !TRANSLATES_NEWLINES {
        return units.to_vec();
    }
    let mut expanded = Vec::with_capacity(units.len() + 1);
    for &u in units {
        if u == 0x000A {
            expanded.push(0x000D);
        }
        expanded.push(u);
    }
    expanded
}

fn expand_newlines(bytes: &[u8]) -> Vec<u8> {
    if !TRANSLATES_NEWLINES {
        return bytes.to_vec();
    }
    let mut expanded = Vec::with_capacity(bytes.len() + 1);
    for &b in bytes {
        if b == b'\n' {
            expanded.push(b'\r');
        }
        expanded.push(b);
    }
    expanded
}

#[cfg(all(test, not(windows)))]
mod test {
    use super::*;
    use crate::sample;
    use crate::method::Width;

    #[test]
    fn test_narrow_modes_pass_bytes() {
        let narrow = sample::get(Width::Narrow);
        assert_eq!(OpenMode::Binary.translate(narrow), Ok(sample::NARROW.to_vec()));
        assert_eq!(OpenMode::Text.translate(narrow), Ok(sample::NARROW.to_vec()));
    }

    #[test]
    fn test_unicode_modes() {
        let wide = sample::get(Width::Wide);
        assert_eq!(OpenMode::U16Text.translate(wide), Ok(vec![
            0x41, 0x00, 0x6C, 0x25, 0xFA, 0x00, 0xB4, 0x03, 0xEE, 0x00, 0x0A, 0x00,
        ]));
        assert_eq!(OpenMode::U8Text.translate(wide), Ok(vec![
            0x41, 0xE2, 0x95, 0xAC, 0xC3, 0xBA, 0xCE, 0xB4, 0xC3, 0xAE, 0x0A,
        ]));
        assert_eq!(OpenMode::WText.translate(sample::get(Width::Narrow)), Err(ConvError::WidthMismatch));
        assert_eq!(OpenMode::U8Text.translate(Units::Wide(&[0x41, 0xDC00])), Err(ConvError::InvalidAt(1)));
    }
}
