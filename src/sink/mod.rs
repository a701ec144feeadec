/*!
Destinations that adapters write to.

Every adapter acquires its destination through `Destinations::open` and writes through the `Sink` it gets back.  Dropping a sink releases whatever it acquired; standard output is never released.

`OsDestinations` talks to the operating system.  `memory::MemoryDestinations` stands in for it in tests.
*/
use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use log::debug;
use crate::config::Destination;
use crate::method::Family;

pub mod memory;

/**
The write primitive a piece of output goes through.
*/
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum WriteCall {
    /// Bytes, exactly as given: `WriteFile`, `write`.
    Bytes,
    /// Narrow text for a console, in the console output code page: `WriteConsoleA`.
    ConsoleNarrow,
    /// UTF-16 text for a console, laid out little-endian: `WriteConsoleW`.
    ConsoleWide,
}

impl WriteCall {
    /// Size in bytes of the units this call counts in.
    pub fn unit_size(self) -> usize {
        match self {
            WriteCall::Bytes | WriteCall::ConsoleNarrow => 1,
            WriteCall::ConsoleWide => 2,
        }
    }
}

/**
A single open destination.
*/
pub trait Sink {
    /**
    Writes `data` with a single `call`.

    Returns the number of units (as counted by `call`) the destination accepted.  This may be fewer than were offered; a short count is not an error at this level.  Destinations that are not consoles take the bytes of a console call as they are.
    */
    fn write(&mut self, data: &[u8], call: WriteCall) -> io::Result<usize>;

    /// Whether the destination is an interactive console.
    fn is_interactive(&self) -> bool;
}

/**
Acquires sinks for a given API family.
*/
pub trait Destinations {
    fn open(&mut self, family: Family, destination: &Destination) -> io::Result<Box<dyn Sink>>;
}

/**
The real operating system.
*/
#[derive(Copy, Clone, Debug, Default)]
pub struct OsDestinations;

impl Destinations for OsDestinations {
    fn open(&mut self, family: Family, destination: &Destination) -> io::Result<Box<dyn Sink>> {
        debug!("opening {:?} for {} output", destination, family);
        match *destination {
            Destination::StandardOutput => open_standard_output(family),
            Destination::File(ref path) => match family {
                Family::Handle => imp::create_handle(path),
                Family::Descriptor => Ok(Box::new(FdSink::open(path)?)),
                Family::Buffered | Family::Stream => Ok(Box::new(FileSink::create(path)?)),
            },
        }
    }
}

fn open_standard_output(family: Family) -> io::Result<Box<dyn Sink>> {
    // Anything Rust itself buffered has to land before we write underneath it.
    io::stdout().flush()?;
    imp::standard_output(family)
}

fn units(bytes: usize, call: WriteCall) -> usize {
    bytes / call.unit_size()
}

/**
A descriptor opened with `open`, closed on drop.
*/
pub struct FdSink {
    fd: libc::c_int,
}

impl FdSink {
    pub fn open(path: &std::path::Path) -> io::Result<FdSink> {
        let fd = crate::ffi::open_truncate(path)?;
        Ok(FdSink { fd })
    }
}

impl Sink for FdSink {
    fn write(&mut self, data: &[u8], call: WriteCall) -> io::Result<usize> {
        crate::ffi::write(self.fd, data).map(|n| units(n, call))
    }

    fn is_interactive(&self) -> bool {
        false
    }
}

impl Drop for FdSink {
    fn drop(&mut self) {
        if let Err(err) = crate::ffi::close(self.fd) {
            debug!("closing descriptor {} failed: {}", self.fd, err);
        }
    }
}

/**
A plain file, used underneath the buffered and stream families.  Their translation happens before the data gets here.
*/
pub struct FileSink {
    file: File,
}

impl FileSink {
    pub fn create(path: &std::path::Path) -> io::Result<FileSink> {
        let file = OpenOptions::new().write(true).create(true).truncate(true).open(path)?;
        Ok(FileSink { file })
    }
}

impl Sink for FileSink {
    fn write(&mut self, data: &[u8], call: WriteCall) -> io::Result<usize> {
        write_until_refused(data, |rest| self.file.write(rest)).map(|n| units(n, call))
    }

    fn is_interactive(&self) -> bool {
        false
    }
}

/**
Keeps writing until everything is taken or the destination takes nothing more, the way a C stream flushes its buffer.
*/
fn write_until_refused<F>(data: &[u8], mut write: F) -> io::Result<usize>
where F: FnMut(&[u8]) -> io::Result<usize> {
    let mut written = 0;
    while written < data.len() {
        match write(&data[written..]) {
            Ok(0) => break,
            Ok(n) => written += n,
            Err(ref err) if err.kind() == io::ErrorKind::Interrupted => (),
            Err(err) if written > 0 => {
                debug!("write stopped after {} bytes: {}", written, err);
                break;
            },
            Err(err) => return Err(err),
        }
    }
    Ok(written)
}

#[cfg(not(windows))]
mod imp {
    use std::io::{self, IsTerminal, Write};
    use std::path::Path;
    use log::trace;
    use crate::console;
    use crate::encoding::le_bytes_to_wide;
    use crate::ffi;
    use crate::method::Family;
    use super::{units, write_until_refused, FileSink, Sink, WriteCall};

    /**
    Standard output, written with `write(2)` underneath any Rust buffering.

    The descriptor family gets exactly one `write` per call, as `_write` makes.  The C and stream layers keep going after a partial write, as `fwrite` does.
    */
    struct StdoutSink {
        single_call: bool,
    }

    impl Sink for StdoutSink {
        fn write(&mut self, data: &[u8], call: WriteCall) -> io::Result<usize> {
            let written = if self.single_call {
                ffi::write(ffi::STDOUT_FILENO, data)?
            } else {
                write_until_refused(data, |rest| ffi::write(ffi::STDOUT_FILENO, rest))?
            };
            Ok(units(written, call))
        }

        fn is_interactive(&self) -> bool {
            false
        }
    }

    /**
    A terminal standing in for a console.

    Bytes and narrow console text are interpreted through the console output code page, wide console text as UTF-16, and both are shown on the terminal as UTF-8.
    */
    struct ConsoleSink;

    impl Sink for ConsoleSink {
        fn write(&mut self, data: &[u8], call: WriteCall) -> io::Result<usize> {
            let text = match call {
                WriteCall::Bytes | WriteCall::ConsoleNarrow => {
                    let cp = console::output_code_page();
                    match cp.codec() {
                        Some(codec) => codec.decode_lossy(data),
                        None => String::from_utf8_lossy(data).into_owned(),
                    }
                },
                WriteCall::ConsoleWide => String::from_utf16_lossy(&le_bytes_to_wide(data)),
            };
            trace!("console renders {:?}", text);
            let mut stdout = io::stdout().lock();
            stdout.write_all(text.as_bytes())?;
            stdout.flush()?;
            Ok(units(data.len(), call))
        }

        fn is_interactive(&self) -> bool {
            true
        }
    }

    pub fn standard_output(family: Family) -> io::Result<Box<dyn Sink>> {
        if io::stdout().is_terminal() {
            return Ok(Box::new(ConsoleSink));
        }
        Ok(Box::new(StdoutSink { single_call: family == Family::Descriptor }))
    }

    pub fn create_handle(path: &Path) -> io::Result<Box<dyn Sink>> {
        Ok(Box::new(FileSink::create(path)?))
    }
}

#[cfg(windows)]
mod imp {
    use std::ffi::c_void;
    use std::io;
    use std::os::windows::ffi::OsStrExt;
    use std::path::Path;
    use std::ptr;
    use log::debug;
    use windows_sys::Win32::Foundation::{CloseHandle, GENERIC_WRITE, HANDLE, INVALID_HANDLE_VALUE};
    use windows_sys::Win32::Storage::FileSystem::{CreateFileW, WriteFile, CREATE_ALWAYS, FILE_ATTRIBUTE_NORMAL};
    use windows_sys::Win32::System::Console::{
        GetConsoleMode, GetStdHandle, WriteConsoleA, WriteConsoleW, STD_OUTPUT_HANDLE,
    };
    use crate::encoding::le_bytes_to_wide;
    use crate::method::Family;
    use super::{Sink, WriteCall};

    /**
    A native handle.  Every call is made as asked; a console call on anything but a console handle fails the way the API does.
    */
    struct HandleSink {
        handle: HANDLE,
        console: bool,
        owned: bool,
    }

    impl HandleSink {
        fn new(handle: HANDLE, owned: bool) -> HandleSink {
            let mut mode = 0;
            // SAFETY: `handle` is valid; `mode` is a valid out pointer.
            let console = unsafe { GetConsoleMode(handle, &mut mode) } != 0;
            HandleSink { handle, console, owned }
        }
    }

    impl Sink for HandleSink {
        fn write(&mut self, data: &[u8], call: WriteCall) -> io::Result<usize> {
            let mut written: u32 = 0;
            // SAFETY: buffers are valid for the lengths given; `written` is a valid out pointer.
            let ok = unsafe {
                match call {
                    WriteCall::Bytes => WriteFile(
                        self.handle, data.as_ptr(), data.len() as u32, &mut written, ptr::null_mut()),
                    WriteCall::ConsoleNarrow => WriteConsoleA(
                        self.handle, data.as_ptr() as _, data.len() as u32, &mut written, ptr::null()),
                    WriteCall::ConsoleWide => {
                        let wide = le_bytes_to_wide(data);
                        WriteConsoleW(self.handle, wide.as_ptr() as _, wide.len() as u32, &mut written, ptr::null())
                    },
                }
            };
            if ok == 0 {
                return Err(io::Error::last_os_error());
            }
            // Console calls count characters, `WriteFile` bytes; either way that is `call`'s unit.
            Ok(written as usize)
        }

        fn is_interactive(&self) -> bool {
            self.console
        }
    }

    impl Drop for HandleSink {
        fn drop(&mut self) {
            if self.owned {
                // SAFETY: the handle was created by us and is closed exactly once.
                if unsafe { CloseHandle(self.handle) } == 0 {
                    debug!("closing handle failed: {}", io::Error::last_os_error());
                }
            }
        }
    }

    pub fn standard_output(_family: Family) -> io::Result<Box<dyn Sink>> {
        // SAFETY: no preconditions.
        let handle = unsafe { GetStdHandle(STD_OUTPUT_HANDLE) };
        if handle == INVALID_HANDLE_VALUE || handle.is_null() {
            return Err(io::Error::last_os_error());
        }
        Ok(Box::new(HandleSink::new(handle, false)))
    }

    pub fn create_handle(path: &Path) -> io::Result<Box<dyn Sink>> {
        let name: Vec<u16> = path.as_os_str().encode_wide().chain(Some(0)).collect();
        // SAFETY: `name` is zero-terminated and outlives the call.
        let handle = unsafe {
            CreateFileW(
                name.as_ptr(),
                GENERIC_WRITE,
                0,
                ptr::null(),
                CREATE_ALWAYS,
                FILE_ATTRIBUTE_NORMAL,
                ptr::null_mut::<c_void>(),
            )
        };
        if handle == INVALID_HANDLE_VALUE {
            return Err(io::Error::last_os_error());
        }
        Ok(Box::new(HandleSink::new(handle, true)))
    }
}
