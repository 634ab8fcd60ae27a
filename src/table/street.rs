use serde::Deserialize;
use serde::Serialize;

/// Betting round. `Idle` precedes the deal; `Done` follows the last round.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Street {
    #[default]
    Idle = 0,
    Pref = 1,
    Flop = 2,
    Turn = 3,
    Rive = 4,
    Done = 5,
}

impl Street {
    pub const fn all() -> &'static [Self] {
        &[Self::Pref, Self::Flop, Self::Turn, Self::Rive]
    }
    pub const fn next(&self) -> Self {
        match self {
            Self::Idle => Self::Pref,
            Self::Pref => Self::Flop,
            Self::Flop => Self::Turn,
            Self::Turn => Self::Rive,
            Self::Rive => Self::Done,
            Self::Done => Self::Done,
        }
    }
}

impl From<Street> for u8 {
    fn from(street: Street) -> Self {
        street as u8
    }
}

impl TryFrom<u8> for Street {
    type Error = crate::Error;
    fn try_from(byte: u8) -> Result<Self, Self::Error> {
        match byte {
            0 => Ok(Self::Idle),
            1 => Ok(Self::Pref),
            2 => Ok(Self::Flop),
            3 => Ok(Self::Turn),
            4 => Ok(Self::Rive),
            5 => Ok(Self::Done),
            _ => Err(crate::Error::Malformed("street")),
        }
    }
}

impl std::fmt::Display for Street {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Idle => write!(f, "idle"),
            Self::Pref => write!(f, "preflop"),
            Self::Flop => write!(f, "flop"),
            Self::Turn => write!(f, "turn"),
            Self::Rive => write!(f, "river"),
            Self::Done => write!(f, "finished"),
        }
    }
}
