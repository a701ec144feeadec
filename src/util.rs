pub trait Utf8EncodeExt: Sized + Iterator<Item=char> {
    fn encode_utf8(self) -> Utf8EncodeIter<Self> {
        Utf8EncodeIter::new(self)
    }
}

impl<It> Utf8EncodeExt for It where It: Iterator<Item=char> {}

pub struct Utf8EncodeIter<It> where It: Iterator<Item=char> {
    iter: It,
    buf: [u8; 4],
    off: u8,
    len: u8,
}

impl<It> Utf8EncodeIter<It> where It: Iterator<Item=char> {
    pub fn new(iter: It) -> Self {
        Utf8EncodeIter {
            iter,
            buf: [0; 4],
            off: 0,
            len: 0,
        }
    }
}

impl<It> Iterator for Utf8EncodeIter<It> where It: Iterator<Item=char> {
    type Item = u8;

    fn next(&mut self) -> Option<Self::Item> {
        if self.len - self.off == 0 {
            // Buffer is empty; encode next code point.
            let cp = self.iter.next()?;
            let enc_str = cp.encode_utf8(&mut self.buf[..]);
            self.off = 0;
            self.len = enc_str.len() as u8;
        }

        let cu = self.buf[self.off as usize];
        self.off += 1;
        Some(cu)
    }
}

/**
Unwraps an iterator of results, stopping at the first error and stashing it in `trap`.
*/
pub trait TrapErrExt: Sized + Iterator {
    type Trap;
    fn trap_err(self, trap: &mut Result<(), Self::Trap>) -> TrapErrIter<Self, Self::Trap>;
}

impl<It, T, E> TrapErrExt for It where It: Iterator<Item=Result<T, E>> {
    type Trap = E;

    fn trap_err(self, trap: &mut Result<(), Self::Trap>) -> TrapErrIter<Self, Self::Trap> {
        TrapErrIter {
            iter: Some(self),
            trap,
        }
    }
}

pub struct TrapErrIter<'a, It, Trap: 'a> {
    iter: Option<It>,
    trap: &'a mut Result<(), Trap>,
}

impl<'a, It, T, E> Iterator for TrapErrIter<'a, It, E>
where
    It: Iterator<Item=Result<T, E>>,
{
    type Item = T;

    fn next(&mut self) -> Option<Self::Item> {
        let trapped = {
            let iter = self.iter.as_mut()?;

            match iter.next() {
                Some(Ok(e)) => return Some(e),
                Some(Err(err)) => Err(err),
                None => Ok(()),
            }
        };

        self.iter = None;
        *self.trap = trapped;
        None
    }
}
