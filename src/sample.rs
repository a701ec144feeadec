/*!
The sample text every test writes.

Both samples spell the same six characters: `A╬úδî` and a line feed.  The narrow sample is encoded in code page 437; the wide sample holds the corresponding UTF-16 code units.  The values are spelled out exactly rather than derived, so that no conversion can sneak in before an output API sees them.
*/
use crate::encoding::Units;
use crate::method::Width;

/// The sample encoded in code page 437.
pub static NARROW: [u8; 6] = [0x41, 0xCE, 0xA3, 0xEB, 0x8C, 0x0A];

/// The sample as UTF-16 code units.
pub static WIDE: [u16; 6] = [
    0x0041, // LATIN CAPITAL LETTER A
    0x256C, // BOX DRAWINGS DOUBLE VERTICAL AND HORIZONTAL
    0x00FA, // LATIN SMALL LETTER U WITH ACUTE
    0x03B4, // GREEK SMALL LETTER DELTA
    0x00EE, // LATIN SMALL LETTER I WITH CIRCUMFLEX
    0x000A, // LINE FEED (LF)
];

/// Number of code units in either sample.
pub const LEN: usize = 6;

/**
Returns a read-only view of the sample for the given width.
*/
pub fn get(width: Width) -> Units<'static> {
    match width {
        Width::Narrow => Units::Narrow(&NARROW),
        Width::Wide => Units::Wide(&WIDE),
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::encoding::Codec;

    #[test]
    fn test_samples_spell_the_same_text() {
        let narrow = Codec::Oem(437).decode_lossy(&NARROW);
        let wide = String::from_utf16(&WIDE).expect("wide sample is valid UTF-16");
        assert_eq!(narrow, wide);
        assert_eq!(wide, "A\u{256C}\u{FA}\u{3B4}\u{EE}\n");
    }

    #[test]
    fn test_views() {
        assert_eq!(get(Width::Narrow).len(), LEN);
        assert_eq!(get(Width::Wide).len(), LEN);
        assert_eq!(get(Width::Wide).width(), Width::Wide);
        assert_eq!(NARROW[LEN - 1], b'\n');
        assert_eq!(WIDE[LEN - 1], 0x000A);
    }
}
