/*!
Reads a written file back and shows its bytes.
*/
use std::fmt::Write as FmtWrite;
use std::fs;
use std::io::{self, Write};
use std::path::Path;

/**
Renders every byte as two lowercase hex digits followed by a space, then a newline.
*/
pub fn hex_line(bytes: &[u8]) -> String {
    let mut line = String::with_capacity(bytes.len() * 3 + 1);
    for b in bytes {
        // Writing to a String cannot fail.
        let _ = write!(line, "{:02x} ", b);
    }
    line.push('\n');
    line
}

/**
Reopens `path` as raw bytes and writes its hex line to `out`.
*/
pub fn print_file<W: Write>(path: &Path, out: &mut W) -> io::Result<()> {
    let bytes = fs::read(path)?;
    out.write_all(hex_line(&bytes).as_bytes())?;
    out.flush()
}
