// src/common/frame.rs

use arrayvec::ArrayVec;

/// Receive line buffer size, one byte of which is kept in reserve.
pub const RX_BUFFER_SIZE: usize = 512;

pub type Line = ArrayVec<u8, RX_BUFFER_SIZE>;

/// Outcome of feeding one received byte to a [`LineBuffer`].
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum FrameEvent {
    /// CR, NUL, or an LF on an empty line.
    Ignored,
    /// Byte appended.
    Stored,
    /// LF closed a non-empty line.
    Complete,
    /// The buffer is full; its contents form a line and the byte was dropped.
    Overflow,
}

/// Assembles LF-terminated lines from a raw byte stream.
#[derive(Debug, Default)]
pub struct LineBuffer {
    buf: Line,
}

impl LineBuffer {
    /// Usable capacity.
    pub const CAPACITY: usize = RX_BUFFER_SIZE - 1;

    pub fn new() -> Self {
        LineBuffer { buf: ArrayVec::new() }
    }

    pub fn push(&mut self, byte: u8) -> FrameEvent {
        match byte {
            b'\r' | 0 => FrameEvent::Ignored,
            b'\n' if self.buf.is_empty() => FrameEvent::Ignored,
            b'\n' => FrameEvent::Complete,
            _ if self.buf.len() >= Self::CAPACITY => FrameEvent::Overflow,
            _ => {
                self.buf.push(byte);
                FrameEvent::Stored
            }
        }
    }

    /// Hands out the assembled line and leaves the buffer empty.
    pub fn take(&mut self) -> Line {
        core::mem::take(&mut self.buf)
    }

    pub fn clear(&mut self) {
        self.buf.clear();
    }

    #[inline]
    pub fn as_slice(&self) -> &[u8] {
        &self.buf
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn feed(lb: &mut LineBuffer, bytes: &[u8]) -> FrameEvent {
        let mut last = FrameEvent::Ignored;
        for &b in bytes {
            last = lb.push(b);
        }
        last
    }

    #[test]
    fn test_cr_lf_line() {
        let mut lb = LineBuffer::new();
        assert_eq!(feed(&mut lb, b"OK\r\n"), FrameEvent::Complete);
        assert_eq!(lb.take().as_slice(), b"OK");
        assert!(lb.is_empty());
    }

    #[test]
    fn test_blank_lines_and_nul_ignored() {
        let mut lb = LineBuffer::new();
        assert_eq!(feed(&mut lb, b"\r\n\r\n"), FrameEvent::Ignored);
        assert_eq!(lb.push(0), FrameEvent::Ignored);
        assert!(lb.is_empty());
    }

    #[test]
    fn test_overflow_keeps_partial_line() {
        let mut lb = LineBuffer::new();
        for _ in 0..LineBuffer::CAPACITY {
            assert_eq!(lb.push(b'A'), FrameEvent::Stored);
        }
        assert_eq!(lb.push(b'B'), FrameEvent::Overflow);
        let line = lb.take();
        assert_eq!(line.len(), LineBuffer::CAPACITY);
        assert!(line.iter().all(|&b| b == b'A'));
        assert_eq!(lb.push(b'C'), FrameEvent::Stored);
        assert_eq!(lb.as_slice(), b"C");
    }
}
