use super::*;
use crate::Result;
use crate::codec;
use crate::table::GameParams;
use crate::table::Rules;
use crate::table::State;
use byteorder::LE;
use byteorder::ReadBytesExt;
use byteorder::WriteBytesExt;
use std::io::Write;
use std::sync::Arc;
use std::sync::atomic::AtomicBool;
use std::sync::atomic::AtomicU32;
use std::sync::atomic::AtomicU64;
use std::sync::atomic::Ordering;
use uuid::Uuid;

/// Entry point of a tree: the configuration it was grown under, the
/// pending state after the blinds, and running counters.
#[derive(Debug)]
pub struct Root {
    id: Uuid,
    states: AtomicU32,
    nodes: AtomicU32,
    iteration: AtomicU64,
    params: GameParams,
    state: Option<State>,
    next: Slot,
    full: AtomicBool,
}

impl Root {
    pub fn new(params: GameParams, state: Option<State>) -> Self {
        Self {
            id: Uuid::now_v7(),
            states: AtomicU32::new(0),
            nodes: AtomicU32::new(0),
            iteration: AtomicU64::new(0),
            params,
            state,
            next: Slot::default(),
            full: AtomicBool::new(false),
        }
    }
    /// Root with the blinds already posted.
    pub fn grow<R: Rules>(params: GameParams, rules: &R) -> Result<Link> {
        let state = rules.blinds(&params)?;
        Ok(Arc::new(Node::Root(Self::new(params, Some(state)))))
    }
    pub fn with_id(mut self, id: Uuid) -> Self {
        self.id = id;
        self
    }

    pub fn id(&self) -> Uuid {
        self.id
    }
    pub fn params(&self) -> &GameParams {
        &self.params
    }
    pub fn state(&self) -> Option<&State> {
        self.state.as_ref()
    }
    pub fn next(&self) -> Option<Link> {
        self.next.get()
    }
    pub(crate) fn slot(&self) -> &Slot {
        &self.next
    }
    /// Policies created across the tree.
    pub fn states(&self) -> u32 {
        self.states.load(Ordering::Relaxed)
    }
    /// Nodes grown across the tree.
    pub fn nodes(&self) -> u32 {
        self.nodes.load(Ordering::Relaxed)
    }
    pub fn iteration(&self) -> u64 {
        self.iteration.load(Ordering::Relaxed)
    }
    /// Bumps the solver iteration and returns the new value.
    pub fn advance(&self) -> u64 {
        self.iteration.fetch_add(1, Ordering::Relaxed) + 1
    }
    pub fn is_full(&self) -> bool {
        self.full.load(Ordering::Relaxed)
    }
    pub(crate) fn mark_full(&self) {
        self.full.store(true, Ordering::Relaxed);
    }
    pub(crate) fn grew(&self, nodes: u32) {
        self.nodes.fetch_add(nodes, Ordering::Relaxed);
    }
    pub(crate) fn learned(&self, states: u32) {
        self.states.fetch_add(states, Ordering::Relaxed);
    }
    /// Saturating decrement of both counters after a prune.
    pub(crate) fn shrank(&self, nodes: u32, states: u32) {
        let _ = self
            .nodes
            .fetch_update(Ordering::Relaxed, Ordering::Relaxed, |n| Some(n.saturating_sub(nodes)));
        let _ = self
            .states
            .fetch_update(Ordering::Relaxed, Ordering::Relaxed, |n| Some(n.saturating_sub(states)));
    }

    pub(crate) fn size(&self) -> u64 {
        1 + 16
            + 4
            + 4
            + 8
            + codec::sized::<u64, _>(Some(&self.params))
            + codec::sized::<u16, _>(self.state.as_ref())
            + child_size(self.next().as_ref())
    }
    pub(crate) fn emit(&self, w: &mut dyn Write, mode: Mode) -> Result<()> {
        w.write_u8(u8::from(Kind::Root))?;
        w.write_all(self.id.as_bytes())?;
        w.write_u32::<LE>(self.states())?;
        w.write_u32::<LE>(self.nodes())?;
        w.write_u64::<LE>(self.iteration())?;
        codec::put::<u64, _>(w, Some(&self.params))?;
        codec::put::<u16, _>(w, self.state.as_ref())?;
        put_child(w, self.next().as_ref(), mode)
    }
    pub(crate) fn read<D: Decoder>(d: &mut D) -> Result<Link> {
        let mut id = [0u8; 16];
        d.read_exact(&mut id)?;
        let states = d.read_u32::<LE>()?;
        let nodes = d.read_u32::<LE>()?;
        let iteration = d.read_u64::<LE>()?;
        let params = codec::need::<u64, GameParams>(d, "root params")?;
        let state = codec::get::<u16, State>(d)?;
        let root = Arc::new(Node::Root(Self {
            id: Uuid::from_bytes(id),
            states: AtomicU32::new(states),
            nodes: AtomicU32::new(nodes),
            iteration: AtomicU64::new(iteration),
            params,
            state,
            next: Slot::default(),
            full: AtomicBool::new(false),
        }));
        let next = d.child(&Arc::downgrade(&root))?;
        if let Node::Root(this) = root.as_ref() {
            this.next.set(next);
        }
        Ok(root)
    }
}
