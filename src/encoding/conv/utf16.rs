use super::ConvError;

/**
Decodes UTF-16 code units into Unicode scalar values.

Stops after the first error; the offset it reports is in code units.
*/
pub struct Utf16ToUniIter<It> {
    at: usize,
    iter: Option<It>,
}

impl<It> Utf16ToUniIter<It> {
    pub fn new(iter: It) -> Utf16ToUniIter<It> {
        Utf16ToUniIter {
            at: 0,
            iter: Some(iter),
        }
    }
}

impl<It> Iterator for Utf16ToUniIter<It> where It: Iterator<Item=u16> {
    type Item = Result<char, ConvError>;

    fn next(&mut self) -> Option<Self::Item> {
        let cu0 = self.iter.as_mut().and_then(|iter| iter.next())?;

        let cp = match cu0 {
            0x0000..=0xd7ff | 0xe000..=0xffff => {
                self.at += 1;
                cu0 as u32
            },
            0xdc00..=0xdfff => {
                self.iter = None;
                return Some(Err(ConvError::InvalidAt(self.at)));
            },
            _ /* 0xd800..=0xdbff */ => {
                let cu1 = match self.iter.as_mut().and_then(|iter| iter.next()) {
                    Some(cu1) => cu1,
                    None => {
                        self.iter = None;
                        return Some(Err(ConvError::Incomplete));
                    }
                };

                if !(0xdc00..=0xdfff).contains(&cu1) {
                    self.iter = None;
                    return Some(Err(ConvError::InvalidAt(self.at)));
                }

                self.at += 2;

                let hi = (cu0 & 0x3ff) as u32;
                let lo = (cu1 & 0x3ff) as u32;
                0x10000 + ((hi << 10) | lo)
            },
        };

        match char::from_u32(cp) {
            Some(c) => Some(Ok(c)),
            None => {
                self.iter = None;
                Some(Err(ConvError::InvalidAt(self.at)))
            }
        }
    }
}
