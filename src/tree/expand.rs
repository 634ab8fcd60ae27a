use super::*;
use crate::Error;
use crate::Result;
use crate::table::Discrete;
use crate::table::Rules;
use crate::table::Transition;
use std::sync::Arc;

/// Grows the missing children of `node` by one level. `tree` must be the
/// root `node` hangs off; its counters track every node grown.
pub fn expand<R: Rules>(tree: &Link, node: &Link, rules: &R) -> Result<()> {
    let root = tree.root()?;
    match node.as_ref() {
        Node::Terminal(_) => Ok(()),
        Node::Reference(reference) => reference.expand().map(|_| ()),
        Node::Root(this) => {
            let state = this
                .state()
                .ok_or(Error::Precondition("root has no pending state"))?;
            let grew = this.slot().fill(|| {
                let voluntary = match state.street {
                    crate::table::Street::Pref => state.actions.saturating_sub(crate::BLIND_ACTIONS),
                    _ => state.actions,
                };
                let parent = Arc::downgrade(node);
                let next = match voluntary {
                    0 => Node::Chance(Chance::new(parent, Some(state.clone()))),
                    _ => Node::Player(Player::new(parent, state.turn, Some(state.clone()))),
                };
                Ok(Arc::new(next))
            })?;
            if grew {
                root.grew(1);
            }
            Ok(())
        }
        Node::Chance(this) => {
            let state = this
                .state()
                .ok_or(Error::Precondition("chance has no state"))?;
            let grew = this.slot().fill(|| {
                let player = Player::new(Arc::downgrade(node), state.turn, Some(state.clone()));
                Ok(Arc::new(Node::Player(player)))
            })?;
            if grew {
                root.grew(1);
            }
            Ok(())
        }
        Node::Player(this) => {
            let mut table = this.table_mut();
            let mut grown = 0;
            match table.as_mut() {
                None => {
                    let state = this
                        .state()
                        .ok_or(Error::Precondition("player has no state"))?;
                    let mut actions = Actions::default();
                    for action in rules.legal(root.params(), state) {
                        actions.push(action, Some(make_node(root, node, action, rules)?));
                        grown += 1;
                    }
                    *table = Some(actions);
                }
                Some(actions) => {
                    for i in 0..actions.len() {
                        if actions.node(i).is_none() {
                            let child = make_node(root, node, actions.actions()[i], rules)?;
                            actions.replace(i, child);
                            grown += 1;
                        }
                    }
                }
            }
            log::trace!("grew {} children for seat {}", grown, this.seat());
            root.grew(grown);
            Ok(())
        }
    }
}

/// Expands every node reachable from `tree`, References included, until
/// nothing is left to grow, then marks the root full.
pub fn expand_full<R: Rules>(tree: &Link, rules: &R) -> Result<()> {
    let root = tree.root()?;
    let mut stack = vec![tree.clone()];
    while let Some(node) = stack.pop() {
        expand(tree, &node, rules)?;
        match node.as_ref() {
            Node::Reference(reference) => stack.extend(reference.cached()),
            _ => stack.extend(node.children()),
        }
    }
    root.mark_full();
    log::debug!("expanded tree {} to {} nodes", root.id(), root.nodes());
    Ok(())
}

/// Child of `player` reached by taking `action` from its state.
pub fn make_node<R: Rules>(root: &Root, player: &Link, action: Discrete, rules: &R) -> Result<Link> {
    let params = root.params();
    let state = player
        .as_player()
        .ok_or(Error::Precondition("actions are taken at player nodes"))?
        .state()
        .ok_or(Error::Precondition("player has no state"))?;
    let parent = Arc::downgrade(player);
    let mut next = rules.apply(params, state, action)?;
    let node = match rules.classify(params, &next) {
        Transition::ShiftTurn => {
            rules.advance_turn(params, &mut next)?;
            Node::Player(Player::new(parent, next.turn, Some(next)))
        }
        Transition::ShiftStreet => {
            rules.advance_street(params, &mut next)?;
            Node::Chance(Chance::new(parent, Some(next)))
        }
        Transition::ShiftStreetUntilEnd | Transition::Finish => {
            let pots = rules.pots(&next.seats);
            Node::Terminal(Terminal::new(parent, pots, next.seats))
        }
    };
    Ok(Arc::new(node))
}

/// Adds `action` to an expanded decision point that has not started
/// learning yet, keeping actions ascending. Returns the action's index,
/// which is its existing index if it was already legal here.
pub fn add_action<R: Rules>(tree: &Link, player: &Link, action: Discrete, rules: &R) -> Result<usize> {
    let root = tree.root()?;
    let this = player
        .as_player()
        .ok_or(Error::Precondition("actions are added at player nodes"))?;
    let mut table = this.table_mut();
    let actions = table
        .as_mut()
        .ok_or(Error::Precondition("player actions not initialized"))?;
    if let Some(i) = actions.actions().iter().position(|a| *a == action) {
        return Ok(i);
    }
    if !actions.policies().is_empty() {
        return Err(Error::Precondition("policies are initialized already"));
    }
    let i = actions
        .actions()
        .iter()
        .filter(|a| a.order(&action).is_lt())
        .count();
    let child = make_node(root, player, action, rules)?;
    actions.insert(i, action, child);
    root.grew(1);
    Ok(i)
}
