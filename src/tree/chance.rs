use super::*;
use crate::Result;
use crate::codec;
use crate::table::State;
use std::io::Write;
use std::sync::Arc;

/// Boundary between betting rounds where the next street is dealt.
#[derive(Debug)]
pub struct Chance {
    parent: Parent,
    state: Option<State>,
    next: Slot,
}

impl Chance {
    pub fn new(parent: Parent, state: Option<State>) -> Self {
        Self {
            parent,
            state,
            next: Slot::default(),
        }
    }
    pub fn parent(&self) -> Option<Link> {
        self.parent.upgrade()
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

    pub(crate) fn size(&self) -> u64 {
        1 + codec::sized::<u16, _>(self.state.as_ref()) + child_size(self.next().as_ref())
    }
    pub(crate) fn emit(&self, w: &mut dyn Write, mode: Mode) -> Result<()> {
        w.write_all(&[u8::from(Kind::Chance)])?;
        codec::put::<u16, _>(w, self.state.as_ref())?;
        put_child(w, self.next().as_ref(), mode)
    }
    pub(crate) fn read<D: Decoder>(d: &mut D, parent: Parent) -> Result<Link> {
        let state = codec::get::<u16, State>(d)?;
        let chance = Arc::new(Node::Chance(Self::new(parent, state)));
        let next = d.child(&Arc::downgrade(&chance))?;
        if let Node::Chance(this) = chance.as_ref() {
            this.next.set(next);
        }
        Ok(chance)
    }
}
