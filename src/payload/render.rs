//! Rendering documents into fixed-size byte buffers.

use std::io::{self, Write};

use super::{JsonDocument, PayloadError};

/// Writer that discards output and counts bytes.
#[derive(Debug, Default)]
pub(crate) struct ByteCounter {
    count: usize,
}

impl ByteCounter {
    pub(crate) fn count(&self) -> usize {
        self.count
    }
}

impl Write for ByteCounter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.count += buf.len();
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl JsonDocument<'_> {
    /// Render the document into `buf` followed by a NUL terminator.
    ///
    /// Returns the length of the JSON text, excluding the terminator. The
    /// terminator keeps the buffer usable by consumers expecting C strings,
    /// so the usable capacity is `buf.len() - 1`.
    ///
    /// # Errors
    ///
    /// [`PayloadError::BufferTooSmall`] when the text and terminator do not
    /// fit. Nothing meaningful is left in `buf` in that case.
    pub fn render_into(&self, buf: &mut [u8]) -> Result<usize, PayloadError> {
        let len = self.measure()?;
        if len >= buf.len() {
            return Err(PayloadError::BufferTooSmall {
                required: len + 1,
                capacity: buf.len(),
            });
        }
        let mut cursor: &mut [u8] = &mut buf[..len];
        serde_json::to_writer(&mut cursor, self)?;
        buf[len] = 0;
        Ok(len)
    }
}
