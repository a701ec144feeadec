#![cfg(target_os="linux")]
extern crate encexp;
extern crate libc;

macro_rules! here { () => { &format!(concat!(file!(), ":{:?}"), line!()) } }

use encexp::adapter::buffered::CFile;
use encexp::encoding::{Codec, Units};
use encexp::method::Family;
use encexp::sink::memory::MemoryDestinations;
use encexp::translate::OpenMode;
use encexp::{locale, sample};
use encexp::{CompatibilityMatrix, Destination, Dispatcher, ErrorKind, Method, Mode, TestConfiguration};

const UTF8: &[u8] = "A\u{256C}\u{FA}\u{3B4}\u{EE}\n".as_bytes();

fn set_utf8() {
    unsafe {
        let r = libc::setlocale(libc::LC_ALL, b"C.UTF-8\0".as_ptr() as *const _);
        assert!(!r.is_null());
    }
}

#[test]
fn test_buffered_applies_global_locale() {
    let matrix = CompatibilityMatrix::new();
    let mut dests = MemoryDestinations::new();
    let config = TestConfiguration::new(Method::BufferedFormatted, Mode::NarrowText, Destination::output_file())
        .with_locale("C.UTF-8");

    let outcome = Dispatcher::new(&matrix).run(&config, &mut dests);
    assert!(!outcome.failed, "{}", outcome.message);
    assert_eq!(locale::global_codec(), Codec::Utf8);
    assert_eq!(dests.contents(), sample::NARROW.to_vec());
}

#[test]
fn test_invalid_global_locale_aborts() {
    let matrix = CompatibilityMatrix::new();
    let mut dests = MemoryDestinations::new();
    let config = TestConfiguration::new(Method::BufferedUnformatted, Mode::Binary, Destination::output_file())
        .with_locale("xx_XX.no-such-codeset");

    let outcome = Dispatcher::new(&matrix).run(&config, &mut dests);
    assert!(outcome.failed);
    assert_eq!(outcome.kind, Some(ErrorKind::Locale));
    assert_eq!(outcome.message, "unable to apply C locale \"xx_XX.no-such-codeset\"");
    assert_eq!(dests.opened(), 0);
}

#[test]
fn test_wide_formatted_output_narrows_through_c_locale() {
    set_utf8();

    let mut dests = MemoryDestinations::new();
    {
        let mut file = CFile::open(&mut dests, Family::Buffered, &Destination::output_file(), OpenMode::Text)
            .expect(here!());
        assert_eq!(file.print_padded(sample::LEN, sample::get(encexp::Width::Wide)), sample::LEN as isize);
        assert_eq!(file.print_padded(2, Units::Wide(&[0x0041])), 2);
    }
    let mut expected = UTF8.to_vec();
    expected.extend_from_slice(b" A");
    assert_eq!(dests.contents(), expected);
}

#[test]
fn test_stream_locale_stays_on_stream() {
    let matrix = CompatibilityMatrix::new();
    let mut dests = MemoryDestinations::new();
    let config = TestConfiguration::new(Method::StreamUnformatted, Mode::WideText, Destination::output_file())
        .with_locale("en_US.UTF-8");

    let outcome = Dispatcher::new(&matrix).run(&config, &mut dests);
    assert!(!outcome.failed, "{}", outcome.message);
    assert!(outcome.advisories.is_empty());
    assert_eq!(dests.contents(), UTF8.to_vec());

    // A locale name the C runtime has never heard of still binds to a stream.
    let mut dests = MemoryDestinations::new();
    let config = TestConfiguration::new(Method::StreamFormatted, Mode::NarrowText, Destination::output_file())
        .with_locale("xx_XX.437");
    assert!(!Dispatcher::new(&matrix).run(&config, &mut dests).failed);
    assert_eq!(dests.contents(), sample::NARROW.to_vec());
}
