use super::*;
use crate::Error;
use crate::Result;
use crate::table::Discrete;
use crate::table::Rules;
use rand::Rng;
use std::sync::Arc;

/// Depth-first walk from `node`. The callback sees each node with its
/// children and depth, and returns whether to descend. References are
/// expanded and their decoded node visited one level below them. Nothing
/// deeper than `depth` is visited when a limit is given.
pub fn visit<F>(node: &Link, depth: Option<usize>, f: &mut F) -> Result<()>
where
    F: FnMut(&Link, &[Link], usize) -> bool,
{
    walk(node, 0, depth, f)
}

fn walk<F>(node: &Link, at: usize, depth: Option<usize>, f: &mut F) -> Result<()>
where
    F: FnMut(&Link, &[Link], usize) -> bool,
{
    if depth.is_some_and(|d| at > d) {
        return Ok(());
    }
    let children = match node.as_ref() {
        Node::Reference(reference) => vec![reference.expand()?],
        _ => node.children(),
    };
    if f(node, &children, at) {
        for child in children.iter() {
            walk(child, at + 1, depth, f)?;
        }
    }
    Ok(())
}

/// Nodes without children below `node`.
pub fn leaves(node: &Link) -> Result<Vec<Link>> {
    let mut leaves = Vec::new();
    visit(node, None, &mut |n, children, _| {
        if children.is_empty() {
            leaves.push(n.clone());
        }
        true
    })?;
    Ok(leaves)
}

/// Nodes at or below `node`, References and their decoded nodes both counted.
pub fn count_nodes(node: &Link) -> Result<usize> {
    let mut count = 0;
    visit(node, None, &mut |_, _, _| {
        count += 1;
        true
    })?;
    Ok(count)
}

/// Policies stored at or below `node`.
pub fn count_states(node: &Link) -> Result<usize> {
    let mut count = 0;
    visit(node, None, &mut |n, _, _| {
        count += n.as_player().map(Player::states).unwrap_or(0);
        true
    })?;
    Ok(count)
}

/// First Player or Terminal at or below `node`, passing through roots,
/// chances, and references.
pub fn decision_point(node: &Link) -> Result<Link> {
    let mut node = node.clone();
    loop {
        let next = match node.as_ref() {
            Node::Root(root) => root.next(),
            Node::Chance(chance) => chance.next(),
            Node::Reference(reference) => Some(reference.expand()?),
            Node::Player(_) | Node::Terminal(_) => return Ok(node),
        };
        node = next.ok_or(Error::Precondition("no decision below this node"))?;
    }
}

/// One action taken on the way to a node.
#[derive(Debug, Clone)]
pub struct Step {
    pub action: Discrete,
    /// Position of `action` in the parent's table.
    pub index: usize,
    pub parent: Link,
    pub node: Link,
}

/// Actions from the root down to `node`, oldest first.
pub fn history(node: &Link) -> Result<Vec<Step>> {
    let mut steps = Vec::new();
    let mut node = node.clone();
    while let Some(parent) = node.parent() {
        if Arc::ptr_eq(&node, &parent) {
            return Err(Error::Cycle);
        }
        if let Some(player) = parent.as_player() {
            if let Some(index) = player.index_of(&node) {
                steps.push(Step {
                    action: player.actions()[index],
                    index,
                    parent: parent.clone(),
                    node: node.clone(),
                });
            }
        }
        node = parent;
    }
    steps.reverse();
    Ok(steps)
}

/// Plays uniformly random actions from `node` down to a Terminal,
/// growing the tree wherever it is missing.
pub fn sample<R, G>(tree: &Link, node: &Link, rules: &R, rng: &mut G) -> Result<Vec<Step>>
where
    R: Rules,
    G: Rng,
{
    let mut steps = Vec::new();
    let mut node = node.clone();
    loop {
        expand(tree, &node, rules)?;
        let next = match node.as_ref() {
            Node::Terminal(_) => return Ok(steps),
            Node::Root(root) => root.next(),
            Node::Chance(chance) => chance.next(),
            Node::Reference(reference) => reference.cached(),
            Node::Player(player) => match player.len() {
                0 => return Err(Error::Precondition("player has no actions")),
                n => {
                    let index = rng.random_range(0..n);
                    let child = player.node(index);
                    if let Some(child) = child.clone() {
                        steps.push(Step {
                            action: player.actions()[index],
                            index,
                            parent: node.clone(),
                            node: child,
                        });
                    }
                    child
                }
            },
        };
        node = next.ok_or(Error::Precondition("expansion left no child"))?;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::Holdem;
    use crate::tree::expand::tests::fixture;
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    #[test]
    fn depth_limit_stops_descent() {
        let tree = fixture();
        expand_full(&tree, &Holdem).unwrap();
        let mut deepest = 0;
        let mut count = 0;
        visit(&tree, Some(2), &mut |_, _, depth| {
            deepest = deepest.max(depth);
            count += 1;
            true
        })
        .unwrap();
        assert_eq!(deepest, 2);
        assert_eq!(count, 3);
    }

    #[test]
    fn declining_skips_children() {
        let tree = fixture();
        expand_full(&tree, &Holdem).unwrap();
        let mut seen = Vec::new();
        visit(&tree, None, &mut |n, _, _| {
            seen.push(n.kind());
            n.kind() != Kind::Chance
        })
        .unwrap();
        assert_eq!(seen, vec![Kind::Root, Kind::Chance]);
    }

    #[test]
    fn decision_point_skips_boundaries() {
        let tree = fixture();
        expand_full(&tree, &Holdem).unwrap();
        let point = decision_point(&tree).unwrap();
        assert_eq!(point.kind(), Kind::Player);
        assert_eq!(point.as_player().unwrap().seat(), 0);
        assert!(Arc::ptr_eq(&decision_point(&point).unwrap(), &point));
    }

    #[test]
    fn history_replays_actions() {
        let tree = fixture();
        expand_full(&tree, &Holdem).unwrap();
        let point = decision_point(&tree).unwrap();
        let shove = point.as_player().unwrap().child(Discrete::ALL_IN).unwrap();
        let call = shove.as_player().unwrap().child(Discrete::CALL).unwrap();
        let steps = history(&call).unwrap();
        let actions = steps.iter().map(|s| s.action).collect::<Vec<_>>();
        assert_eq!(actions, vec![Discrete::ALL_IN, Discrete::CALL]);
        assert!(Arc::ptr_eq(&steps[0].parent, &point));
        assert!(Arc::ptr_eq(&steps[1].node, &call));
        assert_eq!(steps[1].index, 1);
        assert!(history(&tree).unwrap().is_empty());
    }

    #[test]
    fn sampling_reaches_a_terminal() {
        let tree = fixture();
        let mut rng = SmallRng::seed_from_u64(7);
        for _ in 0..16 {
            let steps = sample(&tree, &tree, &Holdem, &mut rng).unwrap();
            let last = steps.last().unwrap();
            assert_eq!(last.node.kind(), Kind::Terminal);
            let replay = history(&last.node).unwrap();
            assert_eq!(replay.len(), steps.len());
            assert!(replay.iter().zip(steps.iter()).all(|(a, b)| a.action == b.action));
        }
        assert!(count_nodes(&tree).unwrap() <= 15);
    }

    #[test]
    fn states_are_counted() {
        let tree = fixture();
        expand_full(&tree, &Holdem).unwrap();
        let point = decision_point(&tree).unwrap();
        let player = point.as_player().unwrap();
        player.acquire(tree.root().unwrap(), 1).unwrap();
        player.acquire(tree.root().unwrap(), 2).unwrap();
        assert_eq!(count_states(&tree).unwrap(), 2);
        assert_eq!(tree.root().unwrap().states(), 2);
    }
}
