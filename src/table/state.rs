use super::Action;
use super::Commitment;
use super::GameParams;
use super::Ledger;
use super::Seat;
use super::Street;
use crate::Chips;
use crate::codec::Wire;
use byteorder::LE;
use byteorder::ReadBytesExt;
use byteorder::WriteBytesExt;
use serde::Deserialize;
use serde::Serialize;
use std::io::Read;
use std::io::Write;

/// Everything needed to decide and apply the next move of a hand.
/// Per-street vectors reset whenever the street advances.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct State {
    pub seats: Vec<Seat>,
    pub street: Street,
    pub turn: u8,
    pub button: u8,
    /// Bets and raises made this street.
    pub bets: u8,
    /// Actions taken this street, blinds included.
    pub actions: u8,
    /// Chips the seat to act needs to call, capped by its stack.
    pub call: Chips,
    pub biggest: Commitment,
    /// Chips each seat committed this street.
    pub committed: Vec<Chips>,
    /// Actions each seat took this street.
    pub acted: Vec<u8>,
    /// Last action each seat took this street.
    pub last: Vec<Action>,
}

impl State {
    /// Fresh preflop state before blinds are posted.
    pub fn new(params: &GameParams) -> Self {
        let n = params.players as usize;
        Self {
            seats: vec![Seat::new(); n],
            street: Street::Pref,
            turn: params.button,
            button: params.button,
            bets: 0,
            actions: 0,
            call: 0.,
            biggest: Commitment::default(),
            committed: vec![0.; n],
            acted: vec![0; n],
            last: vec![Action::None; n],
        }
    }
    pub fn seat(&self) -> &Seat {
        &self.seats[self.turn as usize]
    }
    /// Chips the seat to act still has behind.
    pub fn stack(&self, params: &GameParams) -> Chips {
        self.behind(params, self.turn as usize)
    }
    pub fn behind(&self, params: &GameParams, seat: usize) -> Chips {
        params.stacks.get(seat).copied().unwrap_or(0.) - self.seats[seat].paid
    }
    pub fn pot(&self) -> Chips {
        self.seats.paid_sum()
    }
    /// Button, small blind, and big blind positions.
    pub fn positions(&self) -> (u8, u8, u8) {
        let n = self.seats.len().max(1) as u8;
        let button = self.button % n;
        let small = match n {
            2 => button,
            _ => (button + 1) % n,
        };
        let big = (small + 1) % n;
        (button, small, big)
    }
}

impl Wire for State {
    fn size(&self) -> u64 {
        let n = |len: usize| len as u64;
        let fixed = 1 + 1 + 1 + 1 + 1 + 4 + 4 + 4 + 1;
        let prefixes = 4;
        fixed
            + prefixes
            + 5 * n(self.seats.len())
            + 4 * n(self.committed.len())
            + n(self.acted.len())
            + n(self.last.len())
    }
    fn write(&self, w: &mut dyn Write) -> crate::Result<()> {
        let count = |n: usize| u8::try_from(n).map_err(|_| crate::Error::Malformed("state list"));
        w.write_u8(u8::from(self.street))?;
        w.write_u8(self.turn)?;
        w.write_u8(self.button)?;
        w.write_u8(self.bets)?;
        w.write_u8(self.actions)?;
        w.write_f32::<LE>(self.call)?;
        w.write_f32::<LE>(self.biggest.amount)?;
        w.write_f32::<LE>(self.biggest.addition)?;
        w.write_u8(self.biggest.action as u8)?;
        w.write_u8(count(self.seats.len())?)?;
        for seat in self.seats.iter() {
            seat.write(w)?;
        }
        w.write_u8(count(self.committed.len())?)?;
        for chips in self.committed.iter() {
            w.write_f32::<LE>(*chips)?;
        }
        w.write_u8(count(self.acted.len())?)?;
        w.write_all(&self.acted)?;
        w.write_u8(count(self.last.len())?)?;
        for action in self.last.iter() {
            w.write_u8(*action as u8)?;
        }
        Ok(())
    }
    fn read(r: &mut dyn Read) -> crate::Result<Self> {
        let street = Street::try_from(r.read_u8()?)?;
        let turn = r.read_u8()?;
        let button = r.read_u8()?;
        let bets = r.read_u8()?;
        let actions = r.read_u8()?;
        let call = r.read_f32::<LE>()?;
        let biggest = Commitment {
            amount: r.read_f32::<LE>()?,
            addition: r.read_f32::<LE>()?,
            action: Action::try_from(r.read_u8()?)?,
        };
        let seats = (0..r.read_u8()?)
            .map(|_| Seat::read(r))
            .collect::<crate::Result<Vec<_>>>()?;
        let mut committed = vec![0.; r.read_u8()? as usize];
        r.read_f32_into::<LE>(&mut committed)?;
        let mut acted = vec![0; r.read_u8()? as usize];
        r.read_exact(&mut acted)?;
        let last = (0..r.read_u8()?)
            .map(|_| Action::try_from(r.read_u8()?))
            .collect::<crate::Result<Vec<_>>>()?;
        let n = seats.len();
        if turn as usize >= n || button as usize >= n {
            return Err(crate::Error::Malformed("state seat index out of range"));
        }
        if committed.len() != n || acted.len() != n || last.len() != n {
            return Err(crate::Error::Malformed("state ledgers differ from seat count"));
        }
        Ok(Self {
            seats,
            street,
            turn,
            button,
            bets,
            actions,
            call,
            biggest,
            committed,
            acted,
            last,
        })
    }
}
