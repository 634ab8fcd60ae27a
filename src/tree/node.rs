use super::*;
use crate::Error;
use crate::Result;
use crate::codec::Counter;
use crate::codec::Prefix;
use crate::table::State;
use byteorder::ReadBytesExt;
use std::io::Write;
use std::sync::Arc;
use std::sync::Weak;

/// Owning handle to a node. Ownership flows from the root to the leaves.
pub type Link = Arc<Node>;
/// Non-owning back-reference to a node's parent.
pub type Parent = Weak<Node>;

/// How nested children are emitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Mode {
    /// Encode each child into its own buffer, then copy it in.
    Buffered,
    /// Write each child's advertised size, then the child, straight through.
    Streamed,
}

/// A node of the game tree. `Reference` is a runtime proxy for a persisted
/// node that has not been decoded yet and reports that node's kind.
#[derive(Debug)]
pub enum Node {
    Root(Root),
    Chance(Chance),
    Player(Player),
    Terminal(Terminal),
    Reference(Reference),
}

impl Node {
    pub fn kind(&self) -> Kind {
        match self {
            Self::Root(_) => Kind::Root,
            Self::Chance(_) => Kind::Chance,
            Self::Player(_) => Kind::Player,
            Self::Terminal(_) => Kind::Terminal,
            Self::Reference(reference) => reference.kind(),
        }
    }
    pub fn parent(&self) -> Option<Link> {
        match self {
            Self::Root(_) => None,
            Self::Chance(chance) => chance.parent(),
            Self::Player(player) => player.parent(),
            Self::Terminal(terminal) => terminal.parent(),
            Self::Reference(reference) => reference.parent(),
        }
    }
    /// Exact length of `encode()`, computed without encoding.
    pub fn size(&self) -> u64 {
        match self {
            Self::Root(root) => root.size(),
            Self::Chance(chance) => chance.size(),
            Self::Player(player) => player.size(),
            Self::Terminal(terminal) => terminal.size(),
            Self::Reference(reference) => reference.size(),
        }
    }
    /// Materialized children. References are not expanded.
    pub fn children(&self) -> Vec<Link> {
        match self {
            Self::Root(root) => root.next().into_iter().collect(),
            Self::Chance(chance) => chance.next().into_iter().collect(),
            Self::Player(player) => player.children(),
            Self::Terminal(_) => vec![],
            Self::Reference(reference) => reference.cached().into_iter().collect(),
        }
    }
    /// Game-state snapshot carried by the node, if any.
    pub fn state(&self) -> Option<&State> {
        match self {
            Self::Root(root) => root.state(),
            Self::Chance(chance) => chance.state(),
            Self::Player(player) => player.state(),
            Self::Terminal(_) => None,
            Self::Reference(_) => None,
        }
    }

    pub fn as_root(&self) -> Option<&Root> {
        match self {
            Self::Root(root) => Some(root),
            _ => None,
        }
    }
    pub fn as_chance(&self) -> Option<&Chance> {
        match self {
            Self::Chance(chance) => Some(chance),
            _ => None,
        }
    }
    pub fn as_player(&self) -> Option<&Player> {
        match self {
            Self::Player(player) => Some(player),
            _ => None,
        }
    }
    pub fn as_terminal(&self) -> Option<&Terminal> {
        match self {
            Self::Terminal(terminal) => Some(terminal),
            _ => None,
        }
    }
    pub fn as_reference(&self) -> Option<&Reference> {
        match self {
            Self::Reference(reference) => Some(reference),
            _ => None,
        }
    }
    /// The root this link points at, or a precondition failure.
    pub fn root(&self) -> Result<&Root> {
        self.as_root().ok_or(Error::Precondition("expected a root node"))
    }
    /// Sees through a Reference, decoding it if needed.
    pub fn resolve(self: &Arc<Self>) -> Result<Link> {
        match self.as_ref() {
            Self::Reference(reference) => reference.expand(),
            _ => Ok(self.clone()),
        }
    }

    /// Self-contained encoding with every child fully embedded.
    pub fn encode(&self) -> Result<Vec<u8>> {
        let mut bytes = Vec::with_capacity(self.size() as usize);
        self.emit(&mut bytes, Mode::Buffered)?;
        Ok(bytes)
    }
    /// Writes the same bytes as `encode` without buffering nested children.
    pub fn write(&self, w: &mut dyn Write) -> Result<()> {
        let size = self.size();
        let mut counter = Counter::new(w);
        self.emit(&mut counter, Mode::Streamed)?;
        counter.check("node", size)
    }
    /// `write` behind an 8-byte length prefix.
    pub fn write_delimited(&self, w: &mut dyn Write) -> Result<()> {
        u64::put(w, self.size())?;
        self.write(w)
    }
    /// Fully decodes a node and its whole subtree. Every byte must be used.
    pub fn decode(bytes: &[u8], parent: Parent) -> Result<Link> {
        let mut decoder = Embedded::new(bytes);
        let node = Self::read_from(&mut decoder, parent)?;
        match decoder.remaining() {
            0 => Ok(node),
            n => Err(Error::Trailing("node", n)),
        }
    }
    /// Reads an 8-byte length prefix and returns a lazy reference to the
    /// node behind it, leaving the stream just past that node.
    pub fn read_delimited(
        stream: &mut dyn Stream,
        source: &Source,
        parent: &Parent,
    ) -> Result<Option<Link>> {
        Lazy::new(stream, source).child(parent)
    }

    pub(crate) fn read_from<D: Decoder>(d: &mut D, parent: Parent) -> Result<Link> {
        match Kind::try_from(d.read_u8()?)? {
            Kind::Root => Root::read(d),
            Kind::Chance => Chance::read(d, parent),
            Kind::Player => Player::read(d, parent),
            Kind::Terminal => Terminal::read(d, parent),
        }
    }
    pub(crate) fn emit(&self, w: &mut dyn Write, mode: Mode) -> Result<()> {
        match self {
            Self::Root(root) => root.emit(w, mode),
            Self::Chance(chance) => chance.emit(w, mode),
            Self::Player(player) => player.emit(w, mode),
            Self::Terminal(terminal) => terminal.emit(w),
            Self::Reference(reference) => reference.expand()?.emit(w, mode),
        }
    }
}

/// Bytes taken by a length-delimited child slot.
pub(crate) fn child_size(child: Option<&Link>) -> u64 {
    u64::BYTES + child.map(|c| c.size()).unwrap_or(0)
}

/// Writes a length-delimited child slot, or the nil marker.
pub(crate) fn put_child(w: &mut dyn Write, child: Option<&Link>, mode: Mode) -> Result<()> {
    match (child, mode) {
        (None, _) => Ok(u64::put(w, u64::NIL)?),
        (Some(child), Mode::Buffered) => {
            let bytes = child.encode()?;
            u64::put(w, bytes.len() as u64)?;
            Ok(w.write_all(&bytes)?)
        }
        (Some(child), Mode::Streamed) => {
            let size = child.size();
            u64::put(w, size)?;
            let mut counter = Counter::new(w);
            child.emit(&mut counter, mode)?;
            counter.check("child node", size)
        }
    }
}

/// Checks a kind tag read back for a node that must be of `expected` kind.
pub(crate) fn check_kind(expected: Kind, found: Kind) -> Result<()> {
    match expected == found {
        true => Ok(()),
        false => Err(Error::KindMismatch { expected, found }),
    }
}
