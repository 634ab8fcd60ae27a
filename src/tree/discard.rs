use super::*;
use crate::Error;
use crate::Result;
use rayon::prelude::*;

/// Removes every subtree whose reach falls below `eps` and returns how many
/// nodes went with them. Reach starts at 1 on the root and is multiplied,
/// at each decision point, by the largest average-strategy weight any
/// cluster gives the action taken. One walk over materialized nodes queues
/// decision points; `concurrency` workers (all cores when 0) cut their
/// low-reach children. Root counters shrink by the removed nodes and
/// policies. Unexpanded References are not read.
pub fn discard_below_epsilon(tree: &Link, eps: f64, concurrency: usize) -> Result<usize> {
    let root = tree.root()?;
    if eps <= 0. {
        return Ok(0);
    }
    let tasks = collect(tree, eps)?;
    let threads = match concurrency {
        0 => num_cpus::get(),
        n => n,
    };
    let pool = rayon::ThreadPoolBuilder::new().num_threads(threads).build()?;
    let results = pool.install(|| {
        tasks
            .par_iter()
            .map(|(node, reach)| prune(node, *reach, eps))
            .collect::<Vec<_>>()
    });
    let mut nodes = 0;
    let mut states = 0;
    let mut errors = Vec::new();
    for result in results {
        match result {
            Ok((n, s)) => {
                nodes += n;
                states += s;
            }
            Err(e) => errors.push(e),
        }
    }
    let shrink = |n: usize| u32::try_from(n).unwrap_or(u32::MAX);
    root.shrank(shrink(nodes), shrink(states));
    log::debug!(
        "discarded {} nodes and {} policies below reach {} across {} decision points",
        nodes,
        states,
        eps,
        tasks.len()
    );
    match errors.is_empty() {
        true => Ok(nodes),
        false => Err(Error::Workers(errors)),
    }
}

/// Decision points with their reach, skipping anything already below `eps`.
fn collect(tree: &Link, eps: f64) -> Result<Vec<(Link, f64)>> {
    let mut tasks = Vec::new();
    let mut stack = vec![(tree.clone(), 1f64)];
    while let Some((node, reach)) = stack.pop() {
        match node.as_ref() {
            Node::Player(player) => {
                let children = player
                    .table()
                    .as_ref()
                    .map(|t| t.nodes().to_vec())
                    .unwrap_or_default();
                for (i, child) in children.into_iter().enumerate() {
                    let weight = player.weight(i)? as f64;
                    if let Some(child) = child.filter(|_| reach * weight >= eps) {
                        stack.push((child, reach * weight));
                    }
                }
                tasks.push((node.clone(), reach));
            }
            _ => stack.extend(node.children().into_iter().map(|c| (c, reach))),
        }
    }
    Ok(tasks)
}

/// Cuts the children of one decision point whose reach is below `eps`.
fn prune(node: &Link, reach: f64, eps: f64) -> Result<(usize, usize)> {
    let player = node
        .as_player()
        .ok_or(Error::Precondition("only decision points are pruned"))?;
    let weights = (0..player.len())
        .map(|i| player.weight(i))
        .collect::<Result<Vec<_>>>()?;
    let mut table = player.table_mut();
    let Some(actions) = table.as_mut() else {
        return Ok((0, 0));
    };
    let mut nodes = 0;
    let mut states = 0;
    for (i, weight) in weights.into_iter().enumerate() {
        if reach * (weight as f64) < eps {
            if let Some(cut) = actions.cut(i) {
                let (n, s) = measure(&cut);
                nodes += n;
                states += s;
            }
        }
    }
    Ok((nodes, states))
}

/// Materialized nodes and stored policies in a subtree.
fn measure(node: &Link) -> (usize, usize) {
    let mut nodes = 0;
    let mut states = 0;
    let mut stack = vec![node.clone()];
    while let Some(node) = stack.pop() {
        match node.as_ref() {
            Node::Reference(reference) => match reference.cached() {
                Some(cached) => stack.push(cached),
                None => nodes += 1,
            },
            _ => {
                nodes += 1;
                states += node.as_player().map(Player::states).unwrap_or(0);
                stack.extend(node.children());
            }
        }
    }
    (nodes, states)
}

/// Drops the decoded node of every cached Reference deeper than `depth`
/// so it is read from storage again on demand. Depths count a Reference
/// and its decoded node as separate levels, as `visit` does. Nothing is
/// decoded by this walk. Returns how many References were cleared.
pub fn discard_reference_at_depth(tree: &Link, depth: Option<usize>) -> usize {
    let Some(depth) = depth else {
        return 0;
    };
    let mut cleared = 0;
    let mut stack = vec![(tree.clone(), 0usize)];
    while let Some((node, at)) = stack.pop() {
        match node.as_ref() {
            Node::Reference(reference) if at > depth => {
                if reference.clear() {
                    cleared += 1;
                }
            }
            Node::Reference(reference) => {
                stack.extend(reference.cached().map(|c| (c, at + 1)));
            }
            _ => stack.extend(node.children().into_iter().map(|c| (c, at + 1))),
        }
    }
    log::debug!("cleared {} references below depth {}", cleared, depth);
    cleared
}
