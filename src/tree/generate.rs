use super::*;
use crate::Chips;
use crate::Result;
use crate::table::GameParams;
use crate::table::Rules;
use crate::table::Street;
use serde::Deserialize;
use serde::Serialize;

/// Generator settings for a fully expanded tree with a one-chip small
/// blind and every seat starting `big_blind` deep.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FullTree {
    #[serde(rename = "bb")]
    pub big_blind: Chips,
    pub players: u8,
    pub betting: Vec<Vec<f32>>,
    pub max_actions: u8,
    pub terminal: Street,
    pub min_bet: bool,
    pub limp: bool,
}

impl FullTree {
    pub fn params(&self) -> GameParams {
        GameParams {
            players: self.players,
            max_actions: self.max_actions,
            button: 0,
            small_blind: 1.,
            bet_sizes: self.betting.clone(),
            stacks: vec![self.big_blind; self.players as usize],
            terminal: self.terminal,
            min_bet: self.min_bet,
            limp: self.limp,
        }
        .normalized()
    }
    /// Canonical file stem for the generated tree.
    pub fn name(&self) -> String {
        format!(
            "tree_p{}_b{}_ma{}_bb{:.0}_t{}",
            self.players,
            self.betting.len(),
            self.max_actions,
            self.big_blind,
            self.terminal
        )
    }
    /// Posts the blinds and expands everything below.
    pub fn build<R: Rules>(&self, rules: &R) -> Result<Link> {
        let tree = Root::grow(self.params(), rules)?;
        expand_full(&tree, rules)?;
        log::info!(
            "generated {} with {} nodes",
            self.name(),
            tree.root()?.nodes()
        );
        Ok(tree)
    }
}
