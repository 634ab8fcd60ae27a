use crate::Chips;
use byteorder::LE;
use byteorder::ReadBytesExt;
use byteorder::WriteBytesExt;
use serde::Deserialize;
use serde::Serialize;
use std::io::Read;
use std::io::Write;

/// Concrete betting action recorded in a state.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    #[default]
    None = 0,
    Bet = 1,
    SmallBlind = 2,
    BigBlind = 3,
    Fold = 4,
    Check = 5,
    Call = 6,
    Raise = 7,
    AllIn = 8,
}

impl Action {
    /// Opens the betting (blinds count).
    pub const fn is_bet(&self) -> bool {
        matches!(self, Self::Bet | Self::SmallBlind | Self::BigBlind)
    }
    pub const fn is_blind(&self) -> bool {
        matches!(self, Self::SmallBlind | Self::BigBlind)
    }
    pub const fn is_raise(&self) -> bool {
        matches!(self, Self::Raise | Self::AllIn)
    }
}

impl TryFrom<u8> for Action {
    type Error = crate::Error;
    fn try_from(byte: u8) -> Result<Self, Self::Error> {
        match byte {
            0 => Ok(Self::None),
            1 => Ok(Self::Bet),
            2 => Ok(Self::SmallBlind),
            3 => Ok(Self::BigBlind),
            4 => Ok(Self::Fold),
            5 => Ok(Self::Check),
            6 => Ok(Self::Call),
            7 => Ok(Self::Raise),
            8 => Ok(Self::AllIn),
            _ => Err(crate::Error::Malformed("action")),
        }
    }
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::None => write!(f, "none"),
            Self::Bet => write!(f, "bet"),
            Self::SmallBlind => write!(f, "sb"),
            Self::BigBlind => write!(f, "bb"),
            Self::Fold => write!(f, "fold"),
            Self::Check => write!(f, "check"),
            Self::Call => write!(f, "call"),
            Self::Raise => write!(f, "raise"),
            Self::AllIn => write!(f, "allin"),
        }
    }
}

/// Abstract action at a decision point. Negative values are sentinels,
/// positive values are bet sizes as a multiple of the pot.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
pub struct Discrete(f32);

impl Discrete {
    pub const ALL_IN: Self = Self(-4.);
    pub const FOLD: Self = Self(-3.);
    pub const CALL: Self = Self(-2.);
    pub const CHECK: Self = Self(-1.);
    pub const NONE: Self = Self(0.);

    pub const fn bet(multiple: f32) -> Self {
        Self(multiple)
    }
    pub const fn value(&self) -> f32 {
        self.0
    }
    pub fn is_sized(&self) -> bool {
        self.0 > 0.
    }
    pub fn is_raise(&self) -> bool {
        self.is_sized() || *self == Self::ALL_IN
    }
    /// Ascending order for action tables.
    pub fn order(&self, other: &Self) -> std::cmp::Ordering {
        self.0.total_cmp(&other.0)
    }
    pub fn write(&self, w: &mut dyn Write) -> std::io::Result<()> {
        w.write_f32::<LE>(self.0)
    }
    pub fn read(r: &mut dyn Read) -> std::io::Result<Self> {
        r.read_f32::<LE>().map(Self)
    }
}

impl From<f32> for Discrete {
    fn from(value: f32) -> Self {
        Self(value)
    }
}

impl std::fmt::Display for Discrete {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.0 {
            -4.0 => write!(f, "All In"),
            -3.0 => write!(f, "Fold"),
            -2.0 => write!(f, "Call"),
            -1.0 => write!(f, "Check"),
            0.0 => write!(f, "None"),
            x => write!(f, "Raise {:.2} POT", x),
        }
    }
}

/// Biggest commitment made on the current street.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Commitment {
    pub amount: Chips,
    pub addition: Chips,
    pub action: Action,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sentinels_sort_before_sizes() {
        let mut actions = vec![
            Discrete::bet(0.5),
            Discrete::CALL,
            Discrete::ALL_IN,
            Discrete::FOLD,
        ];
        actions.sort_by(Discrete::order);
        assert_eq!(
            actions,
            vec![
                Discrete::ALL_IN,
                Discrete::FOLD,
                Discrete::CALL,
                Discrete::bet(0.5)
            ]
        );
    }

    #[test]
    fn raises() {
        assert!(Discrete::ALL_IN.is_raise());
        assert!(Discrete::bet(1.).is_raise());
        assert!(!Discrete::CALL.is_raise());
        assert!(Action::Raise.is_raise());
        assert!(Action::BigBlind.is_bet());
    }

    #[test]
    fn action_bytes() {
        assert_eq!(Action::try_from(7).unwrap(), Action::Raise);
        assert!(Action::try_from(9).is_err());
    }
}
