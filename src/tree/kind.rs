use serde::Deserialize;
use serde::Serialize;

/// Persisted node kind, written as the leading byte of every node.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Kind {
    Root = 0,
    Chance = 1,
    Terminal = 2,
    Player = 3,
}

impl From<Kind> for u8 {
    fn from(kind: Kind) -> Self {
        kind as u8
    }
}

impl TryFrom<u8> for Kind {
    type Error = crate::Error;
    fn try_from(byte: u8) -> Result<Self, Self::Error> {
        match byte {
            0 => Ok(Self::Root),
            1 => Ok(Self::Chance),
            2 => Ok(Self::Terminal),
            3 => Ok(Self::Player),
            x => Err(crate::Error::UnknownKind(x)),
        }
    }
}

impl std::fmt::Display for Kind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Root => write!(f, "root"),
            Self::Chance => write!(f, "chance"),
            Self::Terminal => write!(f, "terminal"),
            Self::Player => write!(f, "player"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tags_are_stable() {
        assert_eq!(u8::from(Kind::Root), 0);
        assert_eq!(u8::from(Kind::Chance), 1);
        assert_eq!(u8::from(Kind::Terminal), 2);
        assert_eq!(u8::from(Kind::Player), 3);
        assert!(matches!(Kind::try_from(4), Err(crate::Error::UnknownKind(4))));
    }

    #[test]
    fn json_names() {
        assert_eq!(serde_json::to_string(&Kind::Chance).unwrap(), "\"chance\"");
        let kind: Kind = serde_json::from_str("\"player\"").unwrap();
        assert_eq!(kind, Kind::Player);
    }
}
