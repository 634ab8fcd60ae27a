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

/// Table configuration a tree is grown and persisted under.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameParams {
    pub players: u8,
    /// Cap on actions per betting round. Preflop allows two more for blinds.
    pub max_actions: u8,
    pub button: u8,
    pub small_blind: Chips,
    /// Pot-multiple bet sizes, indexed by how many bets the street has seen.
    /// The last list repeats for deeper raises.
    pub bet_sizes: Vec<Vec<f32>>,
    pub stacks: Vec<Chips>,
    /// Last street that is played out; reaching past it ends the hand.
    pub terminal: Street,
    /// Also offer the minimum legal raise as a sized action.
    pub min_bet: bool,
    /// Allow the first voluntary preflop action to just call.
    pub limp: bool,
}

impl GameParams {
    /// Heads-up defaults with `stack` chips behind for both seats.
    pub fn heads_up(stack: Chips) -> Self {
        Self {
            players: 2,
            max_actions: 6,
            button: 0,
            small_blind: 1.,
            bet_sizes: vec![],
            stacks: vec![stack; 2],
            terminal: Street::Rive,
            min_bet: false,
            limp: false,
        }
    }
    pub fn big_blind(&self) -> Chips {
        self.small_blind * crate::BLIND_RATIO
    }
    /// Chips `seat` can actually win or lose: its own stack capped by the
    /// second largest stack at the table.
    pub fn effective_stack(&self, seat: u8) -> Chips {
        match self.stacks.len() {
            0 => 0.,
            1 => self.stacks[0],
            n => {
                let mut sorted = self.stacks.clone();
                sorted.sort_by(f32::total_cmp);
                let own = self.stacks.get(seat as usize).copied().unwrap_or(0.);
                sorted[n - 2].min(own)
            }
        }
    }
    /// Fills unset knobs: no round cap means three actions per seat, no
    /// terminal street means play to the river.
    pub fn normalized(mut self) -> Self {
        if self.max_actions == 0 {
            self.max_actions = self.players.saturating_mul(3);
        }
        if self.terminal == Street::Idle {
            self.terminal = Street::Rive;
        }
        self
    }
}

impl Wire for GameParams {
    fn size(&self) -> u64 {
        let fixed = 1 + 1 + 1 + 1 + 1 + 4 + 1;
        let rounds = 1 + self
            .bet_sizes
            .iter()
            .map(|sizes| 1 + 4 * sizes.len() as u64)
            .sum::<u64>();
        let stacks = 1 + 4 * self.stacks.len() as u64;
        fixed + rounds + stacks
    }
    fn write(&self, w: &mut dyn Write) -> crate::Result<()> {
        let count = |n: usize| u8::try_from(n).map_err(|_| crate::Error::Malformed("params list"));
        w.write_u8(self.players)?;
        w.write_u8(self.max_actions)?;
        w.write_u8(self.button)?;
        w.write_u8(u8::from(self.terminal))?;
        w.write_u8(self.limp as u8)?;
        w.write_f32::<LE>(self.small_blind)?;
        w.write_u8(self.min_bet as u8)?;
        w.write_u8(count(self.bet_sizes.len())?)?;
        for sizes in self.bet_sizes.iter() {
            w.write_u8(count(sizes.len())?)?;
            for size in sizes.iter() {
                w.write_f32::<LE>(*size)?;
            }
        }
        w.write_u8(count(self.stacks.len())?)?;
        for stack in self.stacks.iter() {
            w.write_f32::<LE>(*stack)?;
        }
        Ok(())
    }
    fn read(r: &mut dyn Read) -> crate::Result<Self> {
        let players = r.read_u8()?;
        let max_actions = r.read_u8()?;
        let button = r.read_u8()?;
        let terminal = Street::try_from(r.read_u8()?)?;
        let limp = r.read_u8()? != 0;
        let small_blind = r.read_f32::<LE>()?;
        let min_bet = r.read_u8()? != 0;
        let mut bet_sizes = Vec::new();
        for _ in 0..r.read_u8()? {
            let mut sizes = vec![0.; r.read_u8()? as usize];
            r.read_f32_into::<LE>(&mut sizes)?;
            bet_sizes.push(sizes);
        }
        let mut stacks = vec![0.; r.read_u8()? as usize];
        r.read_f32_into::<LE>(&mut stacks)?;
        Ok(Self {
            players,
            max_actions,
            button,
            small_blind,
            bet_sizes,
            stacks,
            terminal,
            min_bet,
            limp,
        })
    }
}
