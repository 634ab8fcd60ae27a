use super::*;
use crate::Result;
use crate::codec::Prefix;
use byteorder::ReadBytesExt;
use std::io::Read;
use std::io::Seek;
use std::io::SeekFrom;
use std::sync::Arc;

/// Byte source for node decoding that also knows how to materialize a
/// length-delimited child slot.
pub(crate) trait Decoder: Read {
    /// Bytes consumed so far.
    fn position(&mut self) -> Result<u64>;
    /// Reads one length-delimited child slot. Nil or zero length is `None`.
    fn child(&mut self, parent: &Parent) -> Result<Option<Link>>;
}

/// Full decoding from memory: children are decoded eagerly from their
/// embedded bytes.
pub(crate) struct Embedded<'a> {
    bytes: &'a [u8],
    total: usize,
}

impl<'a> Embedded<'a> {
    pub fn new(bytes: &'a [u8]) -> Self {
        Self {
            bytes,
            total: bytes.len(),
        }
    }
    pub fn remaining(&self) -> u64 {
        self.bytes.len() as u64
    }
}

impl Read for Embedded<'_> {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        self.bytes.read(buf)
    }
}

impl Decoder for Embedded<'_> {
    fn position(&mut self) -> Result<u64> {
        Ok((self.total - self.bytes.len()) as u64)
    }
    fn child(&mut self, parent: &Parent) -> Result<Option<Link>> {
        let Some(length) = u64::length(self)? else {
            return Ok(None);
        };
        if length > self.remaining() {
            return Err(std::io::Error::from(std::io::ErrorKind::UnexpectedEof).into());
        }
        let (body, rest) = self.bytes.split_at(length as usize);
        self.bytes = rest;
        Node::decode(body, parent.clone()).map(Some)
    }
}

/// Streaming decoding from a seekable source: children become References
/// that record where their bytes live and are skipped over.
pub(crate) struct Lazy<'a> {
    stream: &'a mut dyn Stream,
    source: &'a Source,
}

impl<'a> Lazy<'a> {
    pub fn new(stream: &'a mut dyn Stream, source: &'a Source) -> Self {
        Self { stream, source }
    }
}

impl Read for Lazy<'_> {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        self.stream.read(buf)
    }
}

impl Decoder for Lazy<'_> {
    fn position(&mut self) -> Result<u64> {
        Ok(self.stream.stream_position()?)
    }
    fn child(&mut self, parent: &Parent) -> Result<Option<Link>> {
        let Some(length) = u64::length(self)? else {
            return Ok(None);
        };
        let offset = self.stream.stream_position()?;
        let kind = Kind::try_from(self.stream.read_u8()?)?;
        self.stream.seek(SeekFrom::Start(offset + length))?;
        log::trace!("reference to {} at {}+{}", kind, offset, length);
        Ok(Some(Arc::new(Node::Reference(Reference::new(
            parent.clone(),
            offset,
            length,
            self.source.clone(),
            kind,
        )))))
    }
}
