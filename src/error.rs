use crate::tree::Kind;

/// Everything that can go wrong while building, persisting, or pruning a tree.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Stream failure, including truncated input (`UnexpectedEof`).
    #[error("i/o: {0}")]
    Io(#[from] std::io::Error),

    #[error("unknown node kind tag {0}")]
    UnknownKind(u8),

    #[error("expected {expected} node, found {found}")]
    KindMismatch { expected: Kind, found: Kind },

    #[error("{0} out of range")]
    Malformed(&'static str),

    #[error("required field {0} is nil")]
    Missing(&'static str),

    #[error("{0} has {1} unread bytes")]
    Trailing(&'static str, u64),

    #[error("{0} bytes collide with the nil marker")]
    NilMarker(u64),

    #[error("{what} reported {size} bytes but wrote {wrote}")]
    Size {
        what: &'static str,
        size: u64,
        wrote: u64,
    },

    #[error("invalid transition: {0}")]
    Transition(String),

    #[error("precondition violated: {0}")]
    Precondition(&'static str),

    #[error("node is its own ancestor")]
    Cycle,

    #[error("{} pruning workers failed, first: {}", .0.len(), .0.first().map(|e| e.to_string()).unwrap_or_default())]
    Workers(Vec<Error>),

    #[error("worker pool: {0}")]
    Pool(#[from] rayon::ThreadPoolBuildError),
}

pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// True when the input ended before a complete record was read.
    pub fn is_truncated(&self) -> bool {
        match self {
            Self::Io(e) => e.kind() == std::io::ErrorKind::UnexpectedEof,
            _ => false,
        }
    }
}
