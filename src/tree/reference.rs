use super::*;
use crate::Error;
use crate::Result;
use std::io::Read;
use std::io::Seek;
use std::io::SeekFrom;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::PoisonError;

/// Seekable byte source a persisted tree is read from.
pub trait Stream: Read + Seek + Send {}
impl<T> Stream for T where T: Read + Seek + Send {}

/// Backing stream shared by every Reference into one persisted tree.
/// The lock serializes the seek-decode-restore sequence of expansions.
pub type Source = Arc<Mutex<dyn Stream>>;

/// Lazy stand-in for a persisted node: where its bytes live, and the
/// decoded node once somebody asked for it.
pub struct Reference {
    parent: Parent,
    offset: u64,
    length: u64,
    source: Source,
    kind: Kind,
    node: Mutex<Option<Link>>,
}

impl Reference {
    pub fn new(parent: Parent, offset: u64, length: u64, source: Source, kind: Kind) -> Self {
        Self {
            parent,
            offset,
            length,
            source,
            kind,
            node: Mutex::new(None),
        }
    }
    /// Kind of the referenced node, known without decoding it.
    pub fn kind(&self) -> Kind {
        self.kind
    }
    pub fn parent(&self) -> Option<Link> {
        self.parent.upgrade()
    }
    pub fn offset(&self) -> u64 {
        self.offset
    }
    pub fn length(&self) -> u64 {
        self.length
    }
    /// Size of the decoded node if present, else the stored length.
    pub fn size(&self) -> u64 {
        self.cached().map(|n| n.size()).unwrap_or(self.length)
    }
    pub fn cached(&self) -> Option<Link> {
        self.node.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }
    pub fn is_expanded(&self) -> bool {
        self.node.lock().unwrap_or_else(PoisonError::into_inner).is_some()
    }
    /// Drops the decoded node so the next `expand` reads it again.
    /// Returns whether anything was cached.
    pub fn clear(&self) -> bool {
        self.node
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
            .is_some()
    }
    /// References are only produced by streaming reads of their parent.
    pub fn decode(&self, _: &[u8]) -> Result<()> {
        Err(Error::Precondition("references cannot be decoded in place"))
    }

    /// Decodes the referenced node on first call and caches it. Concurrent
    /// first calls decode once and all observe the same node. On failure
    /// nothing is cached and a later call retries.
    pub fn expand(&self) -> Result<Link> {
        let mut cache = self.node.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(node) = cache.as_ref() {
            return Ok(node.clone());
        }
        let node = {
            let mut stream = self.source.lock().unwrap_or_else(PoisonError::into_inner);
            let stream: &mut dyn Stream = &mut *stream;
            let back = stream.stream_position()?;
            let node = self.load(stream);
            stream.seek(SeekFrom::Start(back))?;
            node?
        };
        check_kind(self.kind, node.kind())?;
        log::trace!("expanded {} at {}+{}", self.kind, self.offset, self.length);
        *cache = Some(node.clone());
        Ok(node)
    }

    fn load(&self, stream: &mut dyn Stream) -> Result<Link> {
        stream.seek(SeekFrom::Start(self.offset))?;
        let node = Node::read_from(&mut Lazy::new(&mut *stream, &self.source), self.parent.clone())?;
        let end = stream.stream_position()?;
        match end == self.offset + self.length {
            true => Ok(node),
            false => Err(Error::Size {
                what: "referenced node",
                size: self.length,
                wrote: end.saturating_sub(self.offset),
            }),
        }
    }
}

impl std::fmt::Debug for Reference {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Reference")
            .field("kind", &self.kind)
            .field("offset", &self.offset)
            .field("length", &self.length)
            .field("expanded", &self.is_expanded())
            .finish()
    }
}
