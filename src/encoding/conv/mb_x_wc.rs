use crate::encoding::Codec;
use crate::ffi::MB_LEN_MAX;
use crate::util::TrapErrExt;
use super::{ConvError, Utf16ToUniIter};

/**
Narrows Unicode characters into a code page, one character at a time.

Iteration stops at the first character the code page cannot represent; the error carries that character's offset.
*/
pub struct WcsToMbIter<It> {
    iter: Option<It>,
    codec: Codec,
    at: usize,
    buf: [u8; MB_LEN_MAX],
    buf_at: u8,
    buf_len: u8,
    scratch: Vec<u8>,
}

impl<It> WcsToMbIter<It> {
    pub fn new(iter: It, codec: Codec) -> Self {
        WcsToMbIter {
            iter: Some(iter),
            codec,
            at: 0,
            buf: [0; MB_LEN_MAX],
            buf_at: 0,
            buf_len: 0,
            scratch: Vec::with_capacity(MB_LEN_MAX),
        }
    }
}

impl<It> Iterator for WcsToMbIter<It> where It: Iterator<Item=char> {
    type Item = Result<u8, ConvError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.buf_at < self.buf_len {
            let b = self.buf[self.buf_at as usize];
            self.buf_at += 1;
            return Some(Ok(b));
        }

        // Refresh buffer
        self.buf_at = 0;
        self.buf_len = 0;

        let c = self.iter.as_mut().and_then(|iter| iter.next())?;

        self.scratch.clear();
        if !self.codec.encode_char(c, &mut self.scratch) {
            self.iter = None;
            return Some(Err(ConvError::UnmappableAt(self.at)));
        }

        let len = self.scratch.len();
        if len == 0 || len > MB_LEN_MAX {
            self.iter = None;
            return Some(Err(ConvError::InvalidAt(self.at)));
        }

        self.buf[..len].copy_from_slice(&self.scratch);
        self.at += 1;
        self.buf_at = 1;
        self.buf_len = len as u8;
        Some(Ok(self.buf[0]))
    }
}

/**
Converts wide code units to narrow bytes through `codec`.

Returns the bytes converted before the first failure, along with that failure, if any.  This mirrors a converting stream: whatever converted cleanly is still delivered.
*/
pub fn narrow_units(codec: Codec, units: &[u16]) -> (Vec<u8>, Option<ConvError>) {
    let mut decode_trap = Ok(());
    let mut encode_trap = Ok(());
    let bytes: Vec<u8> = {
        let chars = Utf16ToUniIter::new(units.iter().cloned()).trap_err(&mut decode_trap);
        WcsToMbIter::new(chars, codec).trap_err(&mut encode_trap).collect()
    };

    let err = encode_trap.err().or(decode_trap.err());
    (bytes, err)
}
