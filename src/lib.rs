/*!
This crate explores how output APIs render text.

A fixed six-character sample, held once as narrow (code page 437) bytes and once as wide (UTF-16) code units, is written through one of several API families in one of several text modes.  What lands in the destination shows what each combination actually does to the text on the way out.

# Quick Reference

The following tables list the methods and modes, by the tokens the command line accepts.

| Method | API family | Writes with |
| --- | --- | --- |
| `winapi` | Native handle | `WriteFile`, `WriteConsoleA`, `WriteConsoleW` |
| `posix` | Descriptor | `_open`, `_setmode`, `_write` |
| `unformatted` | Buffered C I/O | `fopen`, `fwrite` |
| `formatted` | Buffered C I/O | `fopen`, `fprintf`/`fwprintf` |
| `unformatted++` | Stream I/O | `ostream::write` |
| `formatted++` | Stream I/O | `operator<<` |

| Mode | Sample | Conversion |
| --- | --- | --- |
| `binary` | narrow | none |
| `text` | narrow | interpreted by locale or console code page |
| `wide` | wide | UTF-16 |
| `unicode` | wide | UTF-16 converted to UTF-8 |
| `wideunicode` | wide | UTF-16 converted to UTF-16LE |

Not every combination is valid; `CompatibilityMatrix` has the rules, and `Dispatcher` enforces them.
*/

pub mod adapter;
pub mod config;
pub mod console;
pub mod dispatch;
pub mod encoding;
pub mod error;
pub mod locale;
pub mod matrix;
pub mod method;
pub mod readback;
pub mod report;
pub mod sample;
pub mod sink;
pub mod translate;

mod ffi;
mod util;

pub use config::{Destination, Options, TestConfiguration};
pub use dispatch::Dispatcher;
pub use error::{Error, ErrorKind};
pub use matrix::CompatibilityMatrix;
pub use method::{Method, Mode, Width};
pub use report::Outcome;
