/*!
In-memory destinations.

Every sink opened from one `MemoryDestinations` writes into the same shared buffer, so a test can inspect what reached "the destination" after the adapter has dropped its sink.
*/
use std::cell::{Cell, RefCell};
use std::io;
use std::rc::Rc;
use crate::config::Destination;
use crate::method::Family;
use super::{Destinations, Sink, WriteCall};

#[derive(Debug, Default)]
struct Shared {
    contents: RefCell<Vec<u8>>,
    calls: RefCell<Vec<WriteCall>>,
    open: Cell<usize>,
    opened: Cell<usize>,
}

/**
A fake destination factory.

By default it behaves like a plain, non-interactive file.  The builder methods turn it into a console, a destination that only accepts a limited number of bytes, or one that cannot be opened at all.
*/
#[derive(Debug, Default)]
pub struct MemoryDestinations {
    shared: Rc<Shared>,
    interactive: bool,
    limit: Option<usize>,
    refuse: bool,
}

impl MemoryDestinations {
    pub fn new() -> MemoryDestinations {
        MemoryDestinations::default()
    }

    /// Sinks report themselves as interactive consoles.
    pub fn console(mut self) -> Self {
        self.interactive = true;
        self
    }

    /// Accepts at most `limit` bytes in total; anything past it is silently dropped.
    pub fn truncating(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Every open fails.
    pub fn refusing(mut self) -> Self {
        self.refuse = true;
        self
    }

    /// Everything written so far.
    pub fn contents(&self) -> Vec<u8> {
        self.shared.contents.borrow().clone()
    }

    /// The write call behind every write so far, in order.
    pub fn calls(&self) -> Vec<WriteCall> {
        self.shared.calls.borrow().clone()
    }

    /// Sinks currently open.
    pub fn open_count(&self) -> usize {
        self.shared.open.get()
    }

    /// Sinks opened over this factory's lifetime.
    pub fn opened(&self) -> usize {
        self.shared.opened.get()
    }
}

impl Destinations for MemoryDestinations {
    fn open(&mut self, _family: Family, destination: &Destination) -> io::Result<Box<dyn Sink>> {
        if self.refuse {
            return Err(io::Error::new(io::ErrorKind::PermissionDenied, "destination refused"));
        }

        if !destination.is_standard_output() {
            self.shared.contents.borrow_mut().clear();
            self.shared.calls.borrow_mut().clear();
        }
        self.shared.open.set(self.shared.open.get() + 1);
        self.shared.opened.set(self.shared.opened.get() + 1);

        Ok(Box::new(MemorySink {
            shared: self.shared.clone(),
            interactive: self.interactive,
            limit: self.limit,
        }))
    }
}

struct MemorySink {
    shared: Rc<Shared>,
    interactive: bool,
    limit: Option<usize>,
}

impl Sink for MemorySink {
    fn write(&mut self, data: &[u8], call: WriteCall) -> io::Result<usize> {
        self.shared.calls.borrow_mut().push(call);
        let mut contents = self.shared.contents.borrow_mut();
        let room = match self.limit {
            Some(limit) => limit.saturating_sub(contents.len()),
            None => data.len(),
        };
        let unit = call.unit_size();
        let accepted = data.len().min(room) / unit * unit;
        contents.extend_from_slice(&data[..accepted]);
        Ok(accepted / unit)
    }

    fn is_interactive(&self) -> bool {
        self.interactive
    }
}

impl Drop for MemorySink {
    fn drop(&mut self) {
        self.shared.open.set(self.shared.open.get() - 1);
    }
}
