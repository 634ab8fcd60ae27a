use super::Link;
use std::sync::PoisonError;
use std::sync::RwLock;

/// Single child link that goes from absent to present.
#[derive(Debug, Default)]
pub struct Slot(RwLock<Option<Link>>);

impl Slot {
    pub fn new(link: Option<Link>) -> Self {
        Self(RwLock::new(link))
    }
    pub fn get(&self) -> Option<Link> {
        self.0.read().unwrap_or_else(PoisonError::into_inner).clone()
    }
    pub fn is_none(&self) -> bool {
        self.0.read().unwrap_or_else(PoisonError::into_inner).is_none()
    }
    pub fn set(&self, link: Option<Link>) {
        *self.0.write().unwrap_or_else(PoisonError::into_inner) = link;
    }
    /// Installs the link built by `f` unless one is already present.
    /// Returns whether `f` ran.
    pub fn fill<F>(&self, f: F) -> crate::Result<bool>
    where
        F: FnOnce() -> crate::Result<Link>,
    {
        let mut slot = self.0.write().unwrap_or_else(PoisonError::into_inner);
        match slot.is_some() {
            true => Ok(false),
            false => {
                *slot = Some(f()?);
                Ok(true)
            }
        }
    }
}
