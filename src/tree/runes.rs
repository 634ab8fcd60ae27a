use super::*;
use crate::Chips;
use crate::Error;
use crate::Result;
use crate::table::Discrete;
use crate::table::Ledger;
use crate::table::State;
use std::sync::Arc;

/// One-letter label for a node or for the action that led to it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Rune {
    Unknown,
    Root,
    Chance,
    Player,
    Terminal,
    Fold,
    Call,
    Check,
    AllIn,
    /// Sized bet, labelled with the chips committed this street after it.
    Bet(Chips),
}

impl Rune {
    /// Label for `action` taken from `state`.
    pub fn action(action: Discrete, state: Option<&State>) -> Self {
        match action.value() {
            0.0 => Self::Unknown,
            -3.0 => Self::Fold,
            -2.0 => Self::Call,
            -1.0 => Self::Check,
            -4.0 => Self::AllIn,
            _ => Self::Bet(state.map(|s| Self::committed(s, action)).unwrap_or(0.)),
        }
    }
    fn committed(state: &State, bet: Discrete) -> Chips {
        let street = state.committed.get(state.turn as usize).copied().unwrap_or(0.);
        street + state.seats.paid_sum() * bet.value()
    }
}

impl From<Kind> for Rune {
    fn from(kind: Kind) -> Self {
        match kind {
            Kind::Root => Self::Root,
            Kind::Chance => Self::Chance,
            Kind::Player => Self::Player,
            Kind::Terminal => Self::Terminal,
        }
    }
}

impl std::fmt::Display for Rune {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unknown => write!(f, "u"),
            Self::Root => write!(f, "r"),
            Self::Chance => write!(f, "n"),
            Self::Player => write!(f, "p"),
            Self::Terminal => write!(f, "t"),
            Self::Fold => write!(f, "f"),
            Self::Call => write!(f, "c"),
            Self::Check => write!(f, "k"),
            Self::AllIn => write!(f, "a"),
            Self::Bet(chips) => write!(f, "b{:.2}", chips),
        }
    }
}

/// Root-to-node label sequence, printed `:`-separated.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Path(Vec<Rune>);

impl Path {
    pub fn runes(&self) -> &[Rune] {
        &self.0
    }
    pub fn len(&self) -> usize {
        self.0.len()
    }
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Vec<Rune>> for Path {
    fn from(runes: Vec<Rune>) -> Self {
        Self(runes)
    }
}

impl std::fmt::Display for Path {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (i, rune) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, ":")?;
            }
            write!(f, "{}", rune)?;
        }
        Ok(())
    }
}

/// Labels from the root down to `node`. The node labels itself; every
/// ancestor contributes either the action taken there, for decision
/// points, or its own kind.
pub fn path(node: &Link) -> Result<Path> {
    let mut runes = vec![Rune::from(node.kind())];
    let mut node = node.clone();
    while let Some(parent) = node.parent() {
        if Arc::ptr_eq(&node, &parent) {
            return Err(Error::Cycle);
        }
        match parent.as_player() {
            Some(player) => {
                if let Some(i) = player.index_of(&node) {
                    runes.push(Rune::action(player.actions()[i], player.state()));
                }
            }
            None => runes.push(Rune::from(parent.kind())),
        }
        node = parent;
    }
    runes.reverse();
    Ok(Path(runes))
}

/// Paths to every leaf below `node`.
pub fn leaf_paths(node: &Link) -> Result<Vec<Path>> {
    leaves(node)?.iter().map(path).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::Holdem;
    use crate::table::Status;
    use crate::tree::expand::tests::fixture;

    #[test]
    fn fixture_leaf_paths() {
        let tree = fixture();
        expand_full(&tree, &Holdem).unwrap();
        let mut paths = leaf_paths(&tree)
            .unwrap()
            .iter()
            .map(Path::to_string)
            .collect::<Vec<_>>();
        paths.sort();
        assert_eq!(
            paths,
            vec![
                "r:n:a:c:t",
                "r:n:a:f:t",
                "r:n:c:k:n:a:c:t",
                "r:n:c:k:n:a:f:t",
                "r:n:c:k:n:k:k:t",
                "r:n:f:t",
            ]
        );
    }

    #[test]
    fn leaf_ledgers_follow_paths() {
        let tree = fixture();
        expand_full(&tree, &Holdem).unwrap();
        for leaf in leaves(&tree).unwrap() {
            let seats = leaf.as_terminal().unwrap().seats().to_vec();
            let paid = seats.iter().map(|s| s.paid).collect::<Vec<_>>();
            let status = seats.iter().map(|s| s.status).collect::<Vec<_>>();
            match path(&leaf).unwrap().to_string().as_str() {
                "r:n:a:f:t" => {
                    assert_eq!(paid, vec![100., 2.]);
                    assert_eq!(status, vec![Status::AllIn, Status::Folded]);
                }
                "r:n:a:c:t" | "r:n:c:k:n:a:c:t" => {
                    assert_eq!(paid, vec![100., 100.]);
                    assert_eq!(status, vec![Status::AllIn, Status::AllIn]);
                }
                "r:n:f:t" => {
                    assert_eq!(paid, vec![1., 2.]);
                    assert_eq!(status, vec![Status::Folded, Status::Active]);
                }
                "r:n:c:k:n:k:k:t" => {
                    assert_eq!(paid, vec![2., 2.]);
                    assert_eq!(status, vec![Status::Active, Status::Active]);
                }
                "r:n:c:k:n:a:f:t" => {
                    assert_eq!(paid, vec![2., 100.]);
                    assert_eq!(status, vec![Status::Folded, Status::AllIn]);
                }
                other => panic!("unexpected leaf {}", other),
            }
            let total = leaf.as_terminal().unwrap().pots().total();
            assert_eq!(total, paid.iter().sum::<f32>());
        }
    }

    #[test]
    fn bets_are_labelled_with_chips() {
        let mut state = State::new(&crate::table::GameParams::heads_up(100.));
        state.seats[0].paid = 2.;
        state.seats[1].paid = 2.;
        state.committed = vec![2., 0.];
        state.turn = 0;
        assert_eq!(Rune::action(Discrete::bet(0.5), Some(&state)).to_string(), "b4.00");
        assert_eq!(Rune::action(Discrete::bet(0.5), None).to_string(), "b0.00");
        assert_eq!(Rune::action(Discrete::NONE, None).to_string(), "u");
        assert_eq!(Path::from(vec![Rune::Root, Rune::Check]).to_string(), "r:k");
    }
}
