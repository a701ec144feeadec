/*!
Console code pages.

On Windows these are the real console input and output code pages.  Elsewhere there is no console code page to speak of; the output code page is emulated as process-wide state, and is what the native handle API uses to render narrow output on a terminal.
*/
use std::io;
use crate::encoding::CodePage;

/// The code page a console starts in unless something changed it.
pub const DEFAULT_CODE_PAGE: CodePage = CodePage::OEM_US;

#[cfg(windows)]
mod imp {
    use std::io;
    use windows_sys::Win32::System::Console::{GetConsoleCP, GetConsoleOutputCP, SetConsoleOutputCP};
    use crate::encoding::CodePage;

    pub fn input_code_page() -> CodePage {
        // SAFETY: no arguments; returns 0 when there is no console.
        CodePage(unsafe { GetConsoleCP() })
    }

    pub fn output_code_page() -> CodePage {
        // SAFETY: as above.
        CodePage(unsafe { GetConsoleOutputCP() })
    }

    pub fn set_output_code_page(cp: CodePage) -> io::Result<()> {
        // SAFETY: any value is accepted; invalid ones fail.
        if unsafe { SetConsoleOutputCP(cp.0) } == 0 {
            return Err(io::Error::last_os_error());
        }
        Ok(())
    }
}

#[cfg(not(windows))]
mod imp {
    use std::io;
    use std::sync::atomic::{AtomicU32, Ordering};
    use crate::encoding::CodePage;
    use super::DEFAULT_CODE_PAGE;

    static OUTPUT_CODE_PAGE: AtomicU32 = AtomicU32::new(DEFAULT_CODE_PAGE.0);

    pub fn input_code_page() -> CodePage {
        DEFAULT_CODE_PAGE
    }

    pub fn output_code_page() -> CodePage {
        CodePage(OUTPUT_CODE_PAGE.load(Ordering::SeqCst))
    }

    pub fn set_output_code_page(cp: CodePage) -> io::Result<()> {
        if cp.codec().is_none() {
            return Err(io::Error::new(io::ErrorKind::InvalidInput, format!("code page {} is not available", cp)));
        }
        OUTPUT_CODE_PAGE.store(cp.0, Ordering::SeqCst);
        Ok(())
    }
}

/// The console input code page.
pub fn input_code_page() -> CodePage {
    imp::input_code_page()
}

/// The console output code page: how narrow console output is interpreted.
pub fn output_code_page() -> CodePage {
    imp::output_code_page()
}

/**
Changes the console output code page for the rest of the process.
*/
pub fn set_output_code_page(cp: CodePage) -> io::Result<()> {
    imp::set_output_code_page(cp)
}
