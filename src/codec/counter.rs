use std::io::Write;

/// Write adapter that tallies bytes passed through to the inner sink.
pub struct Counter<'a> {
    inner: &'a mut dyn Write,
    bytes: u64,
}

impl<'a> Counter<'a> {
    pub fn new(inner: &'a mut dyn Write) -> Self {
        Self { inner, bytes: 0 }
    }
    pub fn bytes(&self) -> u64 {
        self.bytes
    }
    /// Fails unless exactly `size` bytes went through.
    pub fn check(&self, what: &'static str, size: u64) -> crate::Result<()> {
        match self.bytes == size {
            true => Ok(()),
            false => Err(crate::Error::Size {
                what,
                size,
                wrote: self.bytes,
            }),
        }
    }
}

impl Write for Counter<'_> {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        let n = self.inner.write(buf)?;
        self.bytes += n as u64;
        Ok(n)
    }
    fn flush(&mut self) -> std::io::Result<()> {
        self.inner.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_and_checks() {
        let mut sink = Vec::new();
        let mut counter = Counter::new(&mut sink);
        counter.write_all(&[1, 2, 3]).unwrap();
        assert_eq!(counter.bytes(), 3);
        assert!(counter.check("bytes", 3).is_ok());
        assert!(counter.check("bytes", 4).is_err());
        assert_eq!(sink, vec![1, 2, 3]);
    }
}
