use crate::Chips;
use crate::codec::Wire;
use byteorder::LE;
use byteorder::ReadBytesExt;
use byteorder::WriteBytesExt;
use serde::Deserialize;
use serde::Serialize;
use std::io::Read;
use std::io::Write;

#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    #[default]
    Unknown = 0,
    Folded = 1,
    Active = 2,
    AllIn = 3,
}

impl TryFrom<u8> for Status {
    type Error = crate::Error;
    fn try_from(byte: u8) -> Result<Self, Self::Error> {
        match byte {
            0 => Ok(Self::Unknown),
            1 => Ok(Self::Folded),
            2 => Ok(Self::Active),
            3 => Ok(Self::AllIn),
            _ => Err(crate::Error::Malformed("seat status")),
        }
    }
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unknown => write!(f, "unknown"),
            Self::Folded => write!(f, "folded"),
            Self::Active => write!(f, "active"),
            Self::AllIn => write!(f, "all-in"),
        }
    }
}

/// One seat's ledger entry: chips put in this hand and where the seat stands.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Seat {
    pub paid: Chips,
    pub status: Status,
}

impl Seat {
    pub fn new() -> Self {
        Self {
            paid: 0.,
            status: Status::Active,
        }
    }
    /// Still contesting the pot.
    pub fn is_live(&self) -> bool {
        self.status != Status::Folded
    }
    /// Still has decisions to make.
    pub fn is_waiting(&self) -> bool {
        self.status == Status::Active
    }
    pub fn is_shoved(&self) -> bool {
        self.status == Status::AllIn
    }
}

impl Default for Seat {
    fn default() -> Self {
        Self::new()
    }
}

impl From<(Chips, Status)> for Seat {
    fn from((paid, status): (Chips, Status)) -> Self {
        Self { paid, status }
    }
}

impl Wire for Seat {
    fn size(&self) -> u64 {
        5
    }
    fn write(&self, w: &mut dyn Write) -> crate::Result<()> {
        w.write_f32::<LE>(self.paid)?;
        w.write_u8(self.status as u8)?;
        Ok(())
    }
    fn read(r: &mut dyn Read) -> crate::Result<Self> {
        let paid = r.read_f32::<LE>()?;
        let status = Status::try_from(r.read_u8()?)?;
        Ok(Self { paid, status })
    }
}

/// Aggregate queries over every seat at the table.
pub trait Ledger {
    fn paid_sum(&self) -> Chips;
    fn paid_max(&self) -> Chips;
    fn count(&self, filter: fn(&Seat) -> bool) -> usize;
    fn indices(&self, filter: fn(&Seat) -> bool) -> Vec<u8>;
    /// First seat at or after `start`, wrapping around, that still has to act.
    fn waiting_from(&self, start: usize) -> Option<usize>;
}

impl Ledger for [Seat] {
    fn paid_sum(&self) -> Chips {
        self.iter().map(|s| s.paid).sum()
    }
    fn paid_max(&self) -> Chips {
        self.iter().map(|s| s.paid).fold(0., Chips::max)
    }
    fn count(&self, filter: fn(&Seat) -> bool) -> usize {
        self.iter().filter(|s| filter(s)).count()
    }
    fn indices(&self, filter: fn(&Seat) -> bool) -> Vec<u8> {
        self.iter()
            .enumerate()
            .filter(|(_, s)| filter(s))
            .map(|(i, _)| i as u8)
            .collect()
    }
    fn waiting_from(&self, start: usize) -> Option<usize> {
        (0..self.len())
            .map(|i| (start + i) % self.len())
            .find(|i| self[*i].is_waiting())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seat_round_trips() {
        let seat = Seat::from((12.5, Status::AllIn));
        let bytes = seat.encode().unwrap();
        assert_eq!(bytes.len() as u64, seat.size());
        assert_eq!(Seat::decode(&bytes).unwrap(), seat);
    }

    #[test]
    fn unknown_status_is_malformed() {
        let bytes = [0, 0, 0, 0, 9];
        assert!(Seat::decode(&bytes).is_err());
    }

    #[test]
    fn waiting_wraps_around() {
        let seats = [
            Seat::from((1., Status::Active)),
            Seat::from((2., Status::Folded)),
            Seat::from((3., Status::AllIn)),
        ];
        assert_eq!(seats.waiting_from(1), Some(0));
        assert_eq!(seats.paid_sum(), 6.);
        assert_eq!(seats.paid_max(), 3.);
        assert_eq!(seats.count(Seat::is_live), 2);
        assert_eq!(seats.indices(Seat::is_live), vec![0, 2]);
    }
}
