use std::fmt;

/// A read past the end of the message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OutOfBounds {
    pub position: usize,
    pub wanted: usize,
    pub len: usize,
}

impl fmt::Display for OutOfBounds {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "need {} bytes at offset {} but message is {} bytes",
            self.wanted, self.position, self.len
        )
    }
}

/// Forward-only reader over a DNS message.
///
/// Every read checks the remaining length first and leaves the position
/// untouched when it fails.
#[derive(Debug, Clone)]
pub struct WireCursor<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> WireCursor<'a> {
    pub fn new(buf: &'a [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    pub fn position(&self) -> usize {
        self.pos
    }

    pub fn remaining(&self) -> usize {
        self.buf.len().saturating_sub(self.pos)
    }

    pub fn ensure(&self, wanted: usize) -> Result<(), OutOfBounds> {
        if self.remaining() < wanted {
            return Err(OutOfBounds {
                position: self.pos,
                wanted,
                len: self.buf.len(),
            });
        }
        Ok(())
    }

    pub fn skip(&mut self, count: usize) -> Result<(), OutOfBounds> {
        self.ensure(count)?;
        self.pos += count;
        Ok(())
    }

    pub fn read_u16(&mut self) -> Result<u16, OutOfBounds> {
        self.ensure(2)?;
        let value = u16::from_be_bytes([self.buf[self.pos], self.buf[self.pos + 1]]);
        self.pos += 2;
        Ok(value)
    }

    pub fn read_u32(&mut self) -> Result<u32, OutOfBounds> {
        self.ensure(4)?;
        let value = u32::from_be_bytes([
            self.buf[self.pos],
            self.buf[self.pos + 1],
            self.buf[self.pos + 2],
            self.buf[self.pos + 3],
        ]);
        self.pos += 4;
        Ok(value)
    }
}
