use super::*;
use std::collections::HashSet;
use std::fmt::Formatter;
use std::fmt::Result;

/// Box-drawing view of the tree below a node, down to an optional depth.
/// References are expanded as they are drawn; a node reached twice is
/// marked instead of drawn again.
pub struct Draw<'a> {
    node: &'a Link,
    depth: Option<usize>,
}

impl<'a> Draw<'a> {
    pub fn new(node: &'a Link, depth: Option<usize>) -> Self {
        Self { node, depth }
    }

    fn label(node: &Link) -> String {
        match node.as_ref() {
            Node::Root(root) => format!("ROOT   {} nodes {} states {}", root.id(), root.nodes(), root.states()),
            Node::Chance(chance) => match chance.state() {
                Some(state) => format!("CHANCE {}", state.street),
                None => String::from("CHANCE"),
            },
            Node::Player(player) => match player.state() {
                Some(state) => format!("P{}     {} pot {}", player.seat(), state.street, state.pot()),
                None => format!("P{}", player.seat()),
            },
            Node::Terminal(terminal) => format!("END    pot {}", terminal.pots().total()),
            Node::Reference(reference) => format!(
                "REF    {} @ {}+{}",
                reference.kind(),
                reference.offset(),
                reference.length()
            ),
        }
    }

    fn edges(node: &Link) -> std::result::Result<Vec<(String, Link)>, crate::Error> {
        Ok(match node.as_ref() {
            Node::Player(player) => player
                .actions()
                .into_iter()
                .enumerate()
                .filter_map(|(i, a)| player.node(i).map(|n| (a.to_string(), n)))
                .collect(),
            Node::Reference(reference) => vec![(String::from("="), reference.expand()?)],
            _ => node.children().into_iter().map(|n| (String::new(), n)).collect(),
        })
    }

    fn draw(&self, f: &mut Formatter, node: &Link, prefix: &str, at: usize, seen: &mut HashSet<*const Node>) -> Result {
        if self.depth.is_some_and(|d| at >= d) {
            return Ok(());
        }
        let edges = match Self::edges(node) {
            Ok(edges) => edges,
            Err(e) => return writeln!(f, "{}└──ERROR {}", prefix, e),
        };
        let n = edges.len();
        for (i, (edge, child)) in edges.into_iter().enumerate() {
            let last = i == n - 1;
            let stem = if last { "└" } else { "├" };
            let gaps = if last { "    " } else { "│   " };
            let head = Self::label(&child);
            if !seen.insert(std::sync::Arc::as_ptr(&child)) {
                writeln!(f, "{}{}──{} → CYCLE {}", prefix, stem, edge, head)?;
                continue;
            }
            writeln!(f, "{}{}──{} → {}", prefix, stem, edge, head)?;
            self.draw(f, &child, &format!("{}{}", prefix, gaps), at + 1, seen)?;
        }
        Ok(())
    }
}

impl std::fmt::Display for Draw<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        let mut seen = HashSet::from([std::sync::Arc::as_ptr(self.node)]);
        writeln!(f, "{}", Self::label(self.node))?;
        self.draw(f, self.node, "", 0, &mut seen)
    }
}
