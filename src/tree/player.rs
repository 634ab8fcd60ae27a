use super::*;
use crate::Cluster;
use crate::Error;
use crate::Probability;
use crate::Result;
use crate::codec;
use crate::codec::Counter;
use crate::codec::Prefix;
use crate::policy::Policy;
use crate::table::Discrete;
use crate::table::State;
use byteorder::ReadBytesExt;
use byteorder::WriteBytesExt;
use std::io::Write;
use std::sync::Arc;
use std::sync::PoisonError;
use std::sync::RwLock;
use std::sync::RwLockReadGuard;
use std::sync::RwLockWriteGuard;

/// Legal actions at a decision point, the node each one leads to, and
/// the policies learned here. `actions` and `nodes` are index-aligned.
#[derive(Debug, Default)]
pub struct Actions {
    actions: Vec<Discrete>,
    nodes: Vec<Option<Link>>,
    policies: Policies,
}

impl Actions {
    pub fn len(&self) -> usize {
        self.actions.len()
    }
    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }
    pub fn actions(&self) -> &[Discrete] {
        &self.actions
    }
    pub fn nodes(&self) -> &[Option<Link>] {
        &self.nodes
    }
    pub fn policies(&self) -> &Policies {
        &self.policies
    }
    pub fn node(&self, i: usize) -> Option<Link> {
        self.nodes.get(i).cloned().flatten()
    }
    pub(crate) fn push(&mut self, action: Discrete, node: Option<Link>) {
        self.actions.push(action);
        self.nodes.push(node);
    }
    pub(crate) fn replace(&mut self, i: usize, node: Link) {
        self.nodes[i] = Some(node);
    }
    pub(crate) fn insert(&mut self, i: usize, action: Discrete, node: Link) {
        self.actions.insert(i, action);
        self.nodes.insert(i, Some(node));
    }
    /// Drops the subtree behind action `i`, keeping the action itself.
    pub(crate) fn cut(&mut self, i: usize) -> Option<Link> {
        self.nodes.get_mut(i).and_then(Option::take)
    }

    fn size(&self) -> u64 {
        codec::sized::<u32, _>(Some(&self.policies))
            + 1
            + self
                .nodes
                .iter()
                .map(|n| 4 + child_size(n.as_ref()))
                .sum::<u64>()
    }
    fn emit(&self, w: &mut dyn Write, mode: Mode) -> Result<()> {
        let count = u8::try_from(self.actions.len()).map_err(|_| Error::Malformed("action count"))?;
        codec::put::<u32, _>(w, Some(&self.policies))?;
        w.write_u8(count)?;
        for (action, node) in self.actions.iter().zip(self.nodes.iter()) {
            action.write(w)?;
            put_child(w, node.as_ref(), mode)?;
        }
        Ok(())
    }
    fn read<D: Decoder>(d: &mut D, parent: &Parent) -> Result<Self> {
        let policies = codec::get::<u32, Policies>(d)?.unwrap_or_default();
        let n = d.read_u8()? as usize;
        let mut actions = Vec::with_capacity(n);
        let mut nodes = Vec::with_capacity(n);
        for _ in 0..n {
            actions.push(Discrete::read(d)?);
            nodes.push(d.child(parent)?);
        }
        Ok(Self {
            actions,
            nodes,
            policies,
        })
    }
}

/// Decision point for a single seat.
#[derive(Debug)]
pub struct Player {
    parent: Parent,
    seat: u8,
    state: Option<State>,
    actions: RwLock<Option<Actions>>,
}

impl Player {
    pub fn new(parent: Parent, seat: u8, state: Option<State>) -> Self {
        Self {
            parent,
            seat,
            state,
            actions: RwLock::new(None),
        }
    }
    pub fn parent(&self) -> Option<Link> {
        self.parent.upgrade()
    }
    pub fn seat(&self) -> u8 {
        self.seat
    }
    pub fn state(&self) -> Option<&State> {
        self.state.as_ref()
    }

    pub(crate) fn table(&self) -> RwLockReadGuard<'_, Option<Actions>> {
        self.actions.read().unwrap_or_else(PoisonError::into_inner)
    }
    pub(crate) fn table_mut(&self) -> RwLockWriteGuard<'_, Option<Actions>> {
        self.actions.write().unwrap_or_else(PoisonError::into_inner)
    }
    /// False until an action table has been attached.
    pub fn has_actions(&self) -> bool {
        self.table().is_some()
    }
    /// True when action `i` has no child yet.
    pub fn is_nil(&self, i: usize) -> bool {
        self.node(i).is_none()
    }
    pub fn len(&self) -> usize {
        self.table().as_ref().map(Actions::len).unwrap_or(0)
    }
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
    pub fn actions(&self) -> Vec<Discrete> {
        self.table()
            .as_ref()
            .map(|t| t.actions.clone())
            .unwrap_or_default()
    }
    pub fn node(&self, i: usize) -> Option<Link> {
        self.table().as_ref().and_then(|t| t.node(i))
    }
    /// Child reached by `action`, if that action is in the table.
    pub fn child(&self, action: Discrete) -> Option<Link> {
        let table = self.table();
        let table = table.as_ref()?;
        let i = table.actions.iter().position(|a| *a == action)?;
        table.node(i)
    }
    pub fn children(&self) -> Vec<Link> {
        self.table()
            .as_ref()
            .map(|t| t.nodes.iter().flatten().cloned().collect())
            .unwrap_or_default()
    }
    /// Index of the action leading to `node`. A Reference child matches
    /// the node it decoded to.
    pub fn index_of(&self, node: &Link) -> Option<usize> {
        let table = self.table();
        table.as_ref()?.nodes.iter().position(|n| match n {
            None => false,
            Some(n) if Arc::ptr_eq(n, node) => true,
            Some(n) => n
                .as_reference()
                .and_then(Reference::cached)
                .is_some_and(|c| Arc::ptr_eq(&c, node)),
        })
    }

    /// Locked policy for `cluster`, created over this node's actions if absent.
    /// Creation is counted on the tree's root.
    pub fn acquire(&self, root: &Root, cluster: Cluster) -> Result<(Locked, bool)> {
        let table = self.table();
        let table = table
            .as_ref()
            .ok_or(Error::Precondition("player has no action table"))?;
        let (policy, found) = table.policies.acquire(cluster, table.len());
        if !found {
            root.learned(1);
        }
        Ok((policy, found))
    }
    /// Runs `f` on the locked policy for `cluster`, creating it if absent.
    pub fn with<F, R>(&self, root: &Root, cluster: Cluster, f: F) -> Result<R>
    where
        F: FnOnce(&mut Policy) -> R,
    {
        let (mut policy, _) = self.acquire(root, cluster)?;
        Ok(f(&mut policy))
    }
    pub fn policy(&self, cluster: Cluster) -> Option<Shared> {
        self.table().as_ref().and_then(|t| t.policies.get(cluster))
    }
    /// Replaces the policy for `cluster`. Its width must match the table.
    pub fn store(&self, cluster: Cluster, policy: Policy) -> Result<()> {
        let table = self.table();
        let table = table
            .as_ref()
            .ok_or(Error::Precondition("player has no action table"))?;
        if policy.len() != table.len() {
            return Err(Error::Precondition("policy width differs from action count"));
        }
        table.policies.store(cluster, policy);
        Ok(())
    }
    /// Number of policies stored here.
    pub fn states(&self) -> usize {
        self.table().as_ref().map(|t| t.policies.len()).unwrap_or(0)
    }
    /// Reach multiplier for the branch behind action `i`.
    pub fn weight(&self, i: usize) -> Result<Probability> {
        match self.table().as_ref() {
            None => Ok(1.),
            Some(table) => table.policies.weight(i),
        }
    }
    /// Checks every stored policy is as wide as the action table.
    pub fn validate(&self) -> Result<()> {
        let table = self.table();
        let Some(table) = table.as_ref() else {
            return Ok(());
        };
        match table
            .policies
            .sorted()
            .iter()
            .all(|(_, p)| p.lock().len() == table.len())
        {
            true => Ok(()),
            false => Err(Error::Precondition("policy width differs from action count")),
        }
    }

    pub(crate) fn size(&self) -> u64 {
        1 + 1
            + codec::sized::<u16, _>(self.state.as_ref())
            + u64::BYTES
            + self.table().as_ref().map(Actions::size).unwrap_or(0)
    }
    pub(crate) fn emit(&self, w: &mut dyn Write, mode: Mode) -> Result<()> {
        w.write_u8(u8::from(Kind::Player))?;
        w.write_u8(self.seat)?;
        codec::put::<u16, _>(w, self.state.as_ref())?;
        match self.table().as_ref() {
            None => Ok(u64::put(w, u64::NIL)?),
            Some(table) => {
                let size = table.size();
                u64::put(w, size)?;
                let mut counter = Counter::new(w);
                table.emit(&mut counter, mode)?;
                counter.check("player actions", size)
            }
        }
    }
    pub(crate) fn read<D: Decoder>(d: &mut D, parent: Parent) -> Result<Link> {
        let seat = d.read_u8()?;
        let state = codec::get::<u16, State>(d)?;
        let player = Arc::new(Node::Player(Self::new(parent, seat, state)));
        if let Some(length) = u64::length(d)? {
            let start = d.position()?;
            let table = Actions::read(d, &Arc::downgrade(&player))?;
            let read = d.position()? - start;
            if read != length {
                return Err(Error::Size {
                    what: "player actions",
                    size: length,
                    wrote: read,
                });
            }
            if let Node::Player(this) = player.as_ref() {
                *this.table_mut() = Some(table);
            }
        }
        Ok(player)
    }
}
