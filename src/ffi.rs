/*!
Thin wrappers over the C runtime calls this crate makes directly.
*/
use std::ffi::{CStr, CString};
use std::io;
use std::path::Path;
use std::ptr;
use libc::{c_char, c_int, c_void};

/*
Upper bound on the bytes a single character can narrow into.

Normally, you would get this from `limits.h`, except it's not even necessarily a compile-time constant.
*/
pub const MB_LEN_MAX: usize = 16;

pub const STDOUT_FILENO: c_int = 1;

// `_O_BINARY`; the descriptor layer does its own translation, so the runtime must not.
#[cfg(windows)]
const O_RAW: c_int = 0x8000;
#[cfg(not(windows))]
const O_RAW: c_int = 0;

#[cfg(windows)]
const CREATE_PERMISSIONS: libc::c_uint = 0x0100 | 0x0080; // _S_IREAD | _S_IWRITE
#[cfg(not(windows))]
const CREATE_PERMISSIONS: libc::c_uint = 0o644;

/**
Applies `name` to every category of the global C locale.

Returns the name the runtime reports for the new locale, or `None` if the runtime rejected it.
*/
pub fn set_global_locale(name: &str) -> Option<String> {
    let name = CString::new(name).ok()?;
    unsafe {
        let r = libc::setlocale(libc::LC_ALL, name.as_ptr());
        cstr_to_string(r)
    }
}

/// Queries the current global C locale without changing it.
pub fn global_locale() -> Option<String> {
    unsafe {
        let r = libc::setlocale(libc::LC_ALL, ptr::null());
        cstr_to_string(r)
    }
}

unsafe fn cstr_to_string(ptr: *const c_char) -> Option<String> {
    if ptr.is_null() {
        None
    } else {
        // SAFETY: the runtime returns a valid, zero-terminated string.
        Some(unsafe { CStr::from_ptr(ptr) }.to_string_lossy().into_owned())
    }
}

fn path_to_cstring(path: &Path) -> io::Result<CString> {
    #[cfg(unix)]
    let bytes = {
        use std::os::unix::ffi::OsStrExt;
        path.as_os_str().as_bytes().to_vec()
    };
    #[cfg(not(unix))]
    let bytes = path.to_str()
        .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "path is not valid Unicode"))?
        .as_bytes()
        .to_vec();

    CString::new(bytes).map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))
}

/**
Opens `path` write-only, creating or truncating it.
*/
pub fn open_truncate(path: &Path) -> io::Result<c_int> {
    let path = path_to_cstring(path)?;
    let fd = unsafe {
        libc::open(
            path.as_ptr(),
            libc::O_WRONLY | libc::O_CREAT | libc::O_TRUNC | O_RAW,
            CREATE_PERMISSIONS,
        )
    };
    if fd == -1 {
        return Err(io::Error::last_os_error());
    }
    Ok(fd)
}

/**
A single `write` call.  Returns how many bytes the descriptor accepted, which may be fewer than `data.len()`.
*/
pub fn write(fd: c_int, data: &[u8]) -> io::Result<usize> {
    let r = unsafe { libc::write(fd, data.as_ptr() as *const c_void, data.len() as _) };
    if r < 0 {
        return Err(io::Error::last_os_error());
    }
    Ok(r as usize)
}

pub fn close(fd: c_int) -> io::Result<()> {
    if unsafe { libc::close(fd) } == -1 {
        return Err(io::Error::last_os_error());
    }
    Ok(())
}
