/*!
Code units, code pages, and character set codecs.
*/
pub mod conv;

use std::fmt;
use encoding_rs::Encoding;
use oem_cp::code_table::{DECODING_TABLE_CP_MAP, ENCODING_TABLE_CP_MAP};
use crate::method::Width;

/**
A borrowed run of code units, either narrow (bytes) or wide (UTF-16 code units).
*/
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Units<'a> {
    Narrow(&'a [u8]),
    Wide(&'a [u16]),
}

impl<'a> Units<'a> {
    pub fn width(&self) -> Width {
        match *self {
            Units::Narrow(_) => Width::Narrow,
            Units::Wide(_) => Width::Wide,
        }
    }

    /// Length in code units.
    pub fn len(&self) -> usize {
        match *self {
            Units::Narrow(units) => units.len(),
            Units::Wide(units) => units.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /**
    The in-memory byte image of these units, as a raw write call would see it.

    Wide units are laid out little-endian, which is how a `wchar_t` buffer sits in memory on the platforms this tool targets.
    */
    pub fn to_bytes(&self) -> Vec<u8> {
        match *self {
            Units::Narrow(units) => units.to_vec(),
            Units::Wide(units) => wide_to_le_bytes(units),
        }
    }
}

pub fn wide_to_le_bytes(units: &[u16]) -> Vec<u8> {
    units.iter().flat_map(|u| u.to_le_bytes()).collect()
}

/// Reassembles little-endian UTF-16 code units.  A trailing odd byte is dropped.
pub fn le_bytes_to_wide(bytes: &[u8]) -> Vec<u16> {
    bytes.chunks_exact(2).map(|p| u16::from_le_bytes([p[0], p[1]])).collect()
}

/**
A Windows code page identifier.
*/
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CodePage(pub u32);

impl CodePage {
    /// OEM United States; the console default.
    pub const OEM_US: CodePage = CodePage(437);
    pub const WINDOWS_1252: CodePage = CodePage(1252);
    pub const UTF16LE: CodePage = CodePage(1200);
    pub const UTF8: CodePage = CodePage(65001);

    /**
    Resolves the codec for this code page, if one is available.
    */
    pub fn codec(self) -> Option<Codec> {
        if self == CodePage::UTF8 {
            return Some(Codec::Utf8);
        }
        if self == CodePage::UTF16LE {
            return Some(Codec::Utf16Le);
        }
        if let Ok(oem) = u16::try_from(self.0) {
            if ENCODING_TABLE_CP_MAP.get(&oem).is_some() && DECODING_TABLE_CP_MAP.get(&oem).is_some() {
                return Some(Codec::Oem(oem));
            }
        }
        web_label(self).and_then(|label| Encoding::for_label(label.as_bytes())).and_then(Codec::for_encoding)
    }
}

impl fmt::Display for CodePage {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        write!(fmt, "{}", self.0)
    }
}

fn web_label(cp: CodePage) -> Option<&'static str> {
    Some(match cp.0 {
        874 => "windows-874",
        932 => "shift_jis",
        936 => "gbk",
        949 => "euc-kr",
        950 => "big5",
        1250 => "windows-1250",
        1251 => "windows-1251",
        1252 => "windows-1252",
        1253 => "windows-1253",
        1254 => "windows-1254",
        1255 => "windows-1255",
        1256 => "windows-1256",
        1257 => "windows-1257",
        1258 => "windows-1258",
        10000 => "macintosh",
        10007 => "x-mac-cyrillic",
        20866 => "koi8-r",
        20932 => "euc-jp",
        21866 => "koi8-u",
        28592 => "iso-8859-2",
        28593 => "iso-8859-3",
        28594 => "iso-8859-4",
        28595 => "iso-8859-5",
        28596 => "iso-8859-6",
        28597 => "iso-8859-7",
        28598 => "iso-8859-8",
        28603 => "iso-8859-13",
        28605 => "iso-8859-15",
        54936 => "gb18030",
        _ => return None,
    })
}

/**
A narrow character set that wide characters can be converted into, and narrow bytes decoded from.
*/
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Codec {
    /// The classic "C" locale: code points up to U+00FF map to the byte of the same value.
    Classic,
    /// An OEM single-byte code page.
    Oem(u16),
    Utf8,
    Utf16Le,
    Web(&'static Encoding),
}

impl Codec {
    /**
    The codec that encodes into `enc`.

    UTF-8 and UTF-16LE get their own codecs.  Encodings `encoding_rs` can only decode (those whose output encoding is some other encoding) have none.
    */
    pub fn for_encoding(enc: &'static Encoding) -> Option<Codec> {
        if enc == encoding_rs::UTF_8 {
            return Some(Codec::Utf8);
        }
        if enc == encoding_rs::UTF_16LE {
            return Some(Codec::Utf16Le);
        }
        if enc.output_encoding() != enc {
            return None;
        }
        Some(Codec::Web(enc))
    }

    pub fn name(&self) -> String {
        match *self {
            Codec::Classic => "C".to_owned(),
            Codec::Oem(cp) => format!("cp{}", cp),
            Codec::Utf8 => "UTF-8".to_owned(),
            Codec::Utf16Le => "UTF-16LE".to_owned(),
            Codec::Web(enc) => enc.name().to_owned(),
        }
    }

    /**
    Appends the narrow encoding of `c` to `out`.

    Returns `false`, leaving `out` untouched, if `c` has no representation in this character set.
    */
    pub fn encode_char(&self, c: char, out: &mut Vec<u8>) -> bool {
        match *self {
            Codec::Classic => match u8::try_from(c as u32) {
                Ok(b) => { out.push(b); true },
                Err(_) => false,
            },
            Codec::Oem(cp) => {
                if (c as u32) < 0x80 {
                    out.push(c as u8);
                    return true;
                }
                match ENCODING_TABLE_CP_MAP.get(&cp).and_then(|table| oem_cp::encode_char_checked(c, table)) {
                    Some(b) => { out.push(b); true },
                    None => false,
                }
            },
            Codec::Utf8 => {
                let mut buf = [0; 4];
                out.extend_from_slice(c.encode_utf8(&mut buf).as_bytes());
                true
            },
            Codec::Utf16Le => {
                let mut buf = [0; 2];
                for unit in c.encode_utf16(&mut buf) {
                    out.extend_from_slice(&unit.to_le_bytes());
                }
                true
            },
            Codec::Web(enc) => {
                let mut buf = [0; 4];
                let (bytes, _, unmappable) = enc.encode(c.encode_utf8(&mut buf));
                if unmappable {
                    false
                } else {
                    out.extend_from_slice(&bytes);
                    true
                }
            },
        }
    }

    /**
    Decodes narrow bytes in this character set.  Undecodable bytes become U+FFFD.
    */
    pub fn decode_lossy(&self, bytes: &[u8]) -> String {
        match *self {
            Codec::Classic => bytes.iter().map(|&b| b as char).collect(),
            Codec::Oem(cp) => match DECODING_TABLE_CP_MAP.get(&cp) {
                Some(table) => table.decode_string_lossy(bytes),
                None => String::from_utf8_lossy(bytes).into_owned(),
            },
            Codec::Utf8 => String::from_utf8_lossy(bytes).into_owned(),
            Codec::Utf16Le => String::from_utf16_lossy(&le_bytes_to_wide(bytes)),
            Codec::Web(enc) => enc.decode_without_bom_handling(bytes).0.into_owned(),
        }
    }
}
