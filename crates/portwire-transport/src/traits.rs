use std::io::{Read, Write};

/// A bidirectional, blocking byte pipe.
///
/// Reads block until at least one byte is available, the peer closes its end
/// (`Ok(0)`), or an I/O error occurs. Writes block until some progress is made.
/// The frame layer builds exact-count reads and writes on top of this.
pub trait DuplexStream: Read + Write {}

impl<T: Read + Write + ?Sized> DuplexStream for T {}

/// Joins an independent read half and write half into one [`DuplexStream`].
///
/// Standard input and output are two separate handles; tests use this with
/// a `Cursor` on the read side and a `Vec<u8>` on the write side.
#[derive(Debug)]
pub struct Duplex<R, W> {
    reader: R,
    writer: W,
}

impl<R, W> Duplex<R, W> {
    /// Create a duplex stream from a read half and a write half.
    pub fn new(reader: R, writer: W) -> Self {
        Self { reader, writer }
    }

    /// Borrow the read half.
    pub fn reader(&self) -> &R {
        &self.reader
    }

    /// Borrow the write half.
    pub fn writer(&self) -> &W {
        &self.writer
    }

    /// Consume the stream and return both halves.
    pub fn into_parts(self) -> (R, W) {
        (self.reader, self.writer)
    }
}

impl<R: Read, W> Read for Duplex<R, W> {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        self.reader.read(buf)
    }
}

impl<R, W: Write> Write for Duplex<R, W> {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.writer.write(buf)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.writer.flush()
    }
}
