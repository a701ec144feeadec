#![cfg(target_os="windows")]
extern crate encexp;
extern crate tempfile;

macro_rules! here { () => { &format!(concat!(file!(), ":{:?}"), line!()) } }

use std::fs;
use encexp::sink::OsDestinations;
use encexp::{CompatibilityMatrix, Destination, Dispatcher, Method, Mode, TestConfiguration};

fn run(method: Method, mode: Mode) -> Vec<u8> {
    let dir = tempfile::tempdir().expect(here!());
    let path = dir.path().join("output");
    let matrix = CompatibilityMatrix::new();
    let config = TestConfiguration::new(method, mode, Destination::File(path.clone()));
    let outcome = Dispatcher::new(&matrix).run(&config, &mut OsDestinations);
    assert!(!outcome.failed, "{} {}: {}", method, mode, outcome.message);
    fs::read(&path).expect(here!())
}

#[test]
fn test_text_modes_expand_newlines() {
    assert_eq!(run(Method::PosixDescriptor, Mode::Binary), vec![0x41, 0xCE, 0xA3, 0xEB, 0x8C, 0x0A]);
    assert_eq!(run(Method::PosixDescriptor, Mode::NarrowText), vec![0x41, 0xCE, 0xA3, 0xEB, 0x8C, 0x0D, 0x0A]);
    assert_eq!(run(Method::BufferedUnformatted, Mode::WideUnicode), vec![
        0xFF, 0xFE, 0x41, 0x00, 0x6C, 0x25, 0xFA, 0x00, 0xB4, 0x03, 0xEE, 0x00, 0x0D, 0x00, 0x0A, 0x00,
    ]);
    assert_eq!(run(Method::BufferedFormatted, Mode::NarrowUnicode), vec![
        0xEF, 0xBB, 0xBF, 0x41, 0xE2, 0x95, 0xAC, 0xC3, 0xBA, 0xCE, 0xB4, 0xC3, 0xAE, 0x0D, 0x0A,
    ]);
}

#[test]
fn test_native_handle_binary_is_untranslated() {
    assert_eq!(run(Method::NativeHandle, Mode::Binary), vec![0x41, 0xCE, 0xA3, 0xEB, 0x8C, 0x0A]);
}
