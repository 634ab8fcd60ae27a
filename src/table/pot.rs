use crate::Chips;
use crate::codec;
use crate::codec::Wire;
use byteorder::LE;
use byteorder::ReadBytesExt;
use byteorder::WriteBytesExt;
use serde::Deserialize;
use serde::Serialize;
use std::io::Read;
use std::io::Write;

/// Chips contested by a set of seats.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Pot {
    pub amount: Chips,
    pub seats: Vec<u8>,
}

impl From<(Chips, Vec<u8>)> for Pot {
    fn from((amount, seats): (Chips, Vec<u8>)) -> Self {
        Self { amount, seats }
    }
}

impl Wire for Pot {
    fn size(&self) -> u64 {
        4 + 1 + self.seats.len() as u64
    }
    fn write(&self, w: &mut dyn Write) -> crate::Result<()> {
        w.write_f32::<LE>(self.amount)?;
        w.write_u8(u8::try_from(self.seats.len()).map_err(|_| crate::Error::Malformed("pot seats"))?)?;
        w.write_all(&self.seats)?;
        Ok(())
    }
    fn read(r: &mut dyn Read) -> crate::Result<Self> {
        let amount = r.read_f32::<LE>()?;
        let mut seats = vec![0; r.read_u8()? as usize];
        r.read_exact(&mut seats)?;
        Ok(Self { amount, seats })
    }
}

/// Main pot first, then one side pot per all-in level.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Pots(Vec<Pot>);

impl Pots {
    pub fn total(&self) -> Chips {
        self.0.iter().map(|p| p.amount).sum()
    }
    pub fn iter(&self) -> impl Iterator<Item = &Pot> {
        self.0.iter()
    }
    pub fn len(&self) -> usize {
        self.0.len()
    }
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Vec<Pot>> for Pots {
    fn from(pots: Vec<Pot>) -> Self {
        Self(pots)
    }
}

impl std::ops::Index<usize> for Pots {
    type Output = Pot;
    fn index(&self, index: usize) -> &Self::Output {
        &self.0[index]
    }
}

impl Wire for Pots {
    fn size(&self) -> u64 {
        1 + self.0.iter().map(|p| codec::sized::<u8, _>(Some(p))).sum::<u64>()
    }
    fn write(&self, w: &mut dyn Write) -> crate::Result<()> {
        w.write_u8(u8::try_from(self.0.len()).map_err(|_| crate::Error::Malformed("pot count"))?)?;
        for pot in self.0.iter() {
            codec::put::<u8, _>(w, Some(pot))?;
        }
        Ok(())
    }
    fn read(r: &mut dyn Read) -> crate::Result<Self> {
        let n = r.read_u8()? as usize;
        let mut pots = Vec::with_capacity(n);
        for _ in 0..n {
            pots.push(codec::need::<u8, Pot>(r, "pot")?);
        }
        Ok(Self(pots))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pots_round_trip() {
        let pots = Pots::from(vec![
            Pot::from((100., vec![0, 1, 2])),
            Pot::from((50., vec![2])),
        ]);
        let bytes = pots.encode().unwrap();
        assert_eq!(bytes.len() as u64, pots.size());
        assert_eq!(pots.size(), 1 + (1 + 4 + 1 + 3) + (1 + 4 + 1 + 1));
        assert_eq!(Pots::decode(&bytes).unwrap(), pots);
        assert_eq!(pots.total(), 150.);
    }

    #[test]
    fn empty_pots_are_one_byte() {
        let pots = Pots::default();
        assert_eq!(pots.encode().unwrap(), vec![0]);
    }
}
