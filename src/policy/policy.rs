use crate::Probability;
use crate::Utility;
use crate::codec::Prefix;
use crate::codec::Wire;
use byteorder::LE;
use byteorder::ReadBytesExt;
use byteorder::WriteBytesExt;
use std::io::Read;
use std::io::Write;

/// Widest policy whose body still fits under a `u16` length prefix.
pub const MAX_POLICY_ACTIONS: usize = ((<u16 as Prefix>::NIL - 1 - 12) / 24) as usize;

/// Solver bookkeeping for one cluster at one decision point, with one
/// slot per action. The current strategy is derived from regrets and is
/// never persisted.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Policy {
    pub iteration: u64,
    pub regrets: Vec<Utility>,
    pub summed: Vec<Utility>,
    pub baseline: Vec<Utility>,
    strategy: Vec<Utility>,
}

impl Policy {
    pub fn new(n: usize) -> Self {
        let mut policy = Self {
            iteration: 0,
            regrets: vec![0.; n],
            summed: vec![0.; n],
            baseline: vec![0.; n],
            strategy: vec![0.; n],
        };
        policy.refresh();
        policy
    }
    pub fn len(&self) -> usize {
        self.regrets.len()
    }
    pub fn is_empty(&self) -> bool {
        self.regrets.is_empty()
    }
    /// Current strategy by regret matching.
    pub fn strategy(&self) -> &[Utility] {
        &self.strategy
    }
    /// Recomputes the current strategy after regrets changed.
    pub fn refresh(&mut self) {
        self.strategy = Self::normalize(self.regrets.iter().map(|r| r.max(0.)).collect());
    }
    /// Time-averaged strategy, uniform until anything has been accumulated.
    pub fn average(&self) -> Vec<Utility> {
        Self::normalize(self.summed.iter().map(|s| s.max(0.)).collect())
    }
    /// Average-strategy weight of action `i`.
    pub fn probability(&self, i: usize) -> Probability {
        self.average().get(i).copied().unwrap_or(0.) as Probability
    }
    fn normalize(weights: Vec<Utility>) -> Vec<Utility> {
        let n = weights.len();
        let sum = weights.iter().sum::<Utility>();
        match sum > 0. {
            true => weights.into_iter().map(|w| w / sum).collect(),
            false => vec![1. / n as Utility; n],
        }
    }
}

impl Wire for Policy {
    fn size(&self) -> u64 {
        8 + 4 + 24 * self.len() as u64
    }
    fn write(&self, w: &mut dyn Write) -> crate::Result<()> {
        let n = self.len();
        if self.summed.len() != n || self.baseline.len() != n {
            return Err(crate::Error::Precondition("policy vectors differ in length"));
        }
        let values = || {
            self.regrets
                .iter()
                .chain(self.summed.iter())
                .chain(self.baseline.iter())
        };
        if values().any(|x| !x.is_finite()) {
            return Err(crate::Error::Malformed("non-finite policy value"));
        }
        w.write_u64::<LE>(self.iteration)?;
        w.write_u32::<LE>(n as u32)?;
        for x in values() {
            w.write_f64::<LE>(*x)?;
        }
        Ok(())
    }
    fn read(r: &mut dyn Read) -> crate::Result<Self> {
        let iteration = r.read_u64::<LE>()?;
        let n = r.read_u32::<LE>()? as usize;
        if n > MAX_POLICY_ACTIONS {
            return Err(crate::Error::Malformed("policy action count"));
        }
        let mut regrets = vec![0.; n];
        let mut summed = vec![0.; n];
        let mut baseline = vec![0.; n];
        r.read_f64_into::<LE>(&mut regrets)?;
        r.read_f64_into::<LE>(&mut summed)?;
        r.read_f64_into::<LE>(&mut baseline)?;
        let mut policy = Self {
            iteration,
            regrets,
            summed,
            baseline,
            strategy: vec![],
        };
        policy.refresh();
        Ok(policy)
    }
}
