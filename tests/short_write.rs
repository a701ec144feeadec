extern crate encexp;

use encexp::method::Family;
use encexp::sink::memory::MemoryDestinations;
use encexp::{CompatibilityMatrix, Destination, Dispatcher, ErrorKind, Method, Mode, TestConfiguration};

/// A configuration whose full output is longer than three bytes for every supported pair.
fn config(method: Method, mode: Mode) -> TestConfiguration {
    let config = TestConfiguration::new(method, mode, Destination::output_file());
    if method.family() == Some(Family::Stream) && mode == Mode::WideText {
        // Without a locale that covers the sample, the stream narrows only one byte.
        config.with_locale(".437")
    } else {
        config
    }
}

#[test]
fn test_truncated_destination_fails_every_adapter() {
    let matrix = CompatibilityMatrix::new();
    let dispatcher = Dispatcher::new(&matrix);
    let mut families = vec![];

    for &method in Method::ALL {
        for &mode in Mode::ALL {
            if !matrix.is_supported(method, mode).supported {
                continue;
            }

            let mut dests = MemoryDestinations::new().console().truncating(3);
            let outcome = dispatcher.run(&config(method, mode), &mut dests);

            assert!(outcome.failed, "{} {} succeeded against a truncating destination", method, mode);
            assert_eq!(outcome.kind, Some(ErrorKind::ShortWrite), "{} {}: {}", method, mode, outcome.message);
            assert_eq!(dests.opened(), 1);
            assert_eq!(dests.open_count(), 0, "{} {} left its destination open", method, mode);
            assert!(dests.contents().len() <= 3);

            if let Some(family) = method.family() {
                if !families.contains(&family) {
                    families.push(family);
                }
            }
        }
    }

    assert_eq!(families.len(), 4);
}

#[test]
fn test_untruncated_destination_succeeds() {
    let matrix = CompatibilityMatrix::new();
    let dispatcher = Dispatcher::new(&matrix);

    for &method in Method::ALL {
        for &mode in Mode::ALL {
            if !matrix.is_supported(method, mode).supported {
                continue;
            }
            let mut dests = MemoryDestinations::new().console().truncating(64);
            let outcome = dispatcher.run(&config(method, mode), &mut dests);
            assert!(!outcome.failed, "{} {}: {}", method, mode, outcome.message);
            assert_eq!(dests.open_count(), 0);
        }
    }
}
