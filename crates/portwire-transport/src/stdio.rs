use std::fs::File;
use std::io::{Read, Write};
use std::mem::ManuallyDrop;

use crate::error::{Result, TransportError};

/// The host channel as seen from the worker: standard input for inbound
/// bytes, standard output for outbound bytes.
///
/// Both halves are the raw native handles inherited from the host process,
/// bypassing the buffered `std::io::Stdout` so every write reaches the pipe
/// as soon as the frame layer issues it. Dropping the stream leaves the
/// handles open; the process owns them.
pub struct StdioStream {
    input: ManuallyDrop<File>,
    output: ManuallyDrop<File>,
}

impl StdioStream {
    /// Take over the inherited standard input and output handles.
    ///
    /// Fails if either handle is closed or invalid. Only one `StdioStream`
    /// should exist per process.
    pub fn open() -> Result<Self> {
        let input = inherit_input()?;
        let output = inherit_output()?;
        tracing::debug!("standard handles attached");
        Ok(Self { input, output })
    }
}

impl Read for StdioStream {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        self.input.read(buf)
    }
}

impl Write for StdioStream {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.output.write(buf)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.output.flush()
    }
}

impl std::fmt::Debug for StdioStream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StdioStream")
            .field("platform", &std::env::consts::FAMILY)
            .finish()
    }
}

#[cfg(unix)]
fn inherit_input() -> Result<ManuallyDrop<File>> {
    inherit_fd(libc::STDIN_FILENO, "input")
}

#[cfg(unix)]
fn inherit_output() -> Result<ManuallyDrop<File>> {
    inherit_fd(libc::STDOUT_FILENO, "output")
}

#[cfg(unix)]
fn inherit_fd(fd: libc::c_int, name: &'static str) -> Result<ManuallyDrop<File>> {
    use std::os::fd::FromRawFd;

    // SAFETY: F_GETFD only queries descriptor flags and touches no memory.
    let rc = unsafe { libc::fcntl(fd, libc::F_GETFD) };
    if rc == -1 {
        return Err(TransportError::StdHandle {
            name,
            source: std::io::Error::last_os_error(),
        });
    }

    // SAFETY: `fd` was verified open above and stays open for the life of the
    // process. `ManuallyDrop` keeps the `File` from closing it.
    Ok(ManuallyDrop::new(unsafe { File::from_raw_fd(fd) }))
}

#[cfg(windows)]
fn inherit_input() -> Result<ManuallyDrop<File>> {
    inherit_handle(windows_sys::Win32::System::Console::STD_INPUT_HANDLE, "input")
}

#[cfg(windows)]
fn inherit_output() -> Result<ManuallyDrop<File>> {
    inherit_handle(windows_sys::Win32::System::Console::STD_OUTPUT_HANDLE, "output")
}

#[cfg(windows)]
fn inherit_handle(
    kind: windows_sys::Win32::System::Console::STD_HANDLE,
    name: &'static str,
) -> Result<ManuallyDrop<File>> {
    use std::os::windows::io::FromRawHandle;
    use windows_sys::Win32::Foundation::INVALID_HANDLE_VALUE;
    use windows_sys::Win32::System::Console::GetStdHandle;

    // SAFETY: GetStdHandle has no preconditions.
    let handle = unsafe { GetStdHandle(kind) };
    if handle == INVALID_HANDLE_VALUE {
        return Err(TransportError::StdHandle {
            name,
            source: std::io::Error::last_os_error(),
        });
    }
    if handle.is_null() {
        return Err(TransportError::StdHandle {
            name,
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "no handle attached"),
        });
    }

    // SAFETY: the handle is valid (checked above) and owned by the process for
    // its whole lifetime. `ManuallyDrop` keeps the `File` from closing it.
    Ok(ManuallyDrop::new(unsafe {
        File::from_raw_handle(handle as std::os::windows::io::RawHandle)
    }))
}
