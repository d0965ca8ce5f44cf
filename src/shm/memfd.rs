// Anonymous files that back shm pools

use std::fs::File;
use std::io;

#[cfg(target_os = "linux")]
pub(crate) fn create_anonymous_file() -> io::Result<File> {
    use std::os::fd::{FromRawFd, OwnedFd};

    loop {
        let fd = unsafe { libc::memfd_create(c"wlcursor".as_ptr(), libc::MFD_CLOEXEC) };
        if fd >= 0 {
            let fd = unsafe { OwnedFd::from_raw_fd(fd) };
            return Ok(File::from(fd));
        }
        let err = io::Error::last_os_error();
        match err.raw_os_error() {
            Some(libc::EINTR) => continue,
            // Kernels older than 3.17
            Some(libc::ENOSYS) => break,
            _ => return Err(err),
        }
    }

    tempfile::tempfile()
}

#[cfg(not(target_os = "linux"))]
pub(crate) fn create_anonymous_file() -> io::Result<File> {
    tempfile::tempfile()
}
