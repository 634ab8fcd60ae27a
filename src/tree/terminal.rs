use super::*;
use crate::Error;
use crate::Result;
use crate::codec;
use crate::codec::Wire;
use crate::table::Pots;
use crate::table::Seat;
use byteorder::ReadBytesExt;
use byteorder::WriteBytesExt;
use std::io::Write;
use std::sync::Arc;

/// Leaf of the tree: how the chips ended up and who could still win them.
#[derive(Debug)]
pub struct Terminal {
    parent: Parent,
    pots: Pots,
    seats: Vec<Seat>,
}

impl Terminal {
    pub fn new(parent: Parent, pots: Pots, seats: Vec<Seat>) -> Self {
        Self {
            parent,
            pots,
            seats,
        }
    }
    pub fn parent(&self) -> Option<Link> {
        self.parent.upgrade()
    }
    pub fn pots(&self) -> &Pots {
        &self.pots
    }
    pub fn seats(&self) -> &[Seat] {
        &self.seats
    }

    pub(crate) fn size(&self) -> u64 {
        1 + codec::sized::<u16, _>(Some(&self.pots))
            + 1
            + self.seats.iter().map(Wire::size).sum::<u64>()
    }
    pub(crate) fn emit(&self, w: &mut dyn Write) -> Result<()> {
        let count = u8::try_from(self.seats.len()).map_err(|_| Error::Malformed("terminal seats"))?;
        w.write_u8(u8::from(Kind::Terminal))?;
        codec::put::<u16, _>(w, Some(&self.pots))?;
        w.write_u8(count)?;
        for seat in self.seats.iter() {
            seat.write(w)?;
        }
        Ok(())
    }
    pub(crate) fn read<D: Decoder>(d: &mut D, parent: Parent) -> Result<Link> {
        let pots = codec::need::<u16, Pots>(d, "terminal pots")?;
        let seats = (0..d.read_u8()?)
            .map(|_| Seat::read(d))
            .collect::<Result<Vec<_>>>()?;
        Ok(Arc::new(Node::Terminal(Self::new(parent, pots, seats))))
    }
}
