use crate::Cluster;
use crate::codec;
use crate::codec::Wire;
use crate::policy::Policy;
use byteorder::LE;
use byteorder::ReadBytesExt;
use byteorder::WriteBytesExt;
use std::collections::HashMap;
use parking_lot::Mutex;
use parking_lot::RawMutex;
use parking_lot::lock_api::ArcMutexGuard;
use std::io::Read;
use std::io::Write;
use std::sync::Arc;
use std::sync::PoisonError;
use std::sync::RwLock;

/// A policy shared between the store and whoever is updating it.
pub type Shared = Arc<Mutex<Policy>>;
/// A policy held locked by its caller until dropped.
pub type Locked = ArcMutexGuard<RawMutex, Policy>;

/// Concurrent cluster → policy map for one decision point. The map lock
/// covers lookup and insertion only; each policy has its own lock.
#[derive(Debug, Default)]
pub struct Policies(RwLock<HashMap<Cluster, Shared>>);

impl Policies {
    /// Locked policy for `cluster` and `true`, or a fresh policy over `n`
    /// actions and `false`. A fresh policy is locked before it becomes
    /// visible to anyone else.
    pub fn acquire(&self, cluster: Cluster, n: usize) -> (Locked, bool) {
        if let Some(policy) = self.get(cluster) {
            return (policy.lock_arc(), true);
        }
        let mut map = self.0.write().unwrap_or_else(PoisonError::into_inner);
        if let Some(policy) = map.get(&cluster).cloned() {
            drop(map);
            return (policy.lock_arc(), true);
        }
        let policy = Arc::new(Mutex::new(Policy::new(n)));
        let locked = policy.lock_arc();
        map.insert(cluster, policy);
        (locked, false)
    }
    /// Runs `f` on the locked policy for `cluster`, creating it if absent.
    /// Only the policy's own lock is held while `f` runs.
    pub fn with<F, R>(&self, cluster: Cluster, n: usize, f: F) -> (R, bool)
    where
        F: FnOnce(&mut Policy) -> R,
    {
        let (mut policy, found) = self.acquire(cluster, n);
        (f(&mut policy), found)
    }
    pub fn get(&self, cluster: Cluster) -> Option<Shared> {
        self.0
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&cluster)
            .cloned()
    }
    pub fn store(&self, cluster: Cluster, policy: Policy) {
        self.0
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(cluster, Arc::new(Mutex::new(policy)));
    }
    pub fn delete(&self, cluster: Cluster) -> Option<Shared> {
        self.0
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&cluster)
    }
    pub fn len(&self) -> usize {
        self.0.read().unwrap_or_else(PoisonError::into_inner).len()
    }
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
    /// Entries ascending by cluster, independent of insertion order.
    pub fn sorted(&self) -> Vec<(Cluster, Shared)> {
        let mut entries = self
            .0
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .map(|(c, p)| (*c, p.clone()))
            .collect::<Vec<_>>();
        entries.sort_by_key(|(c, _)| *c);
        entries
    }
    /// Largest average-strategy weight any cluster puts on action `i`,
    /// or 1 when nothing has been learned here yet.
    pub fn weight(&self, i: usize) -> crate::Result<crate::Probability> {
        let mut weight = None::<crate::Probability>;
        for (_, policy) in self.sorted() {
            let policy = policy.lock();
            if i >= policy.len() {
                return Err(crate::Error::Precondition("policy narrower than action table"));
            }
            let p = policy.probability(i);
            weight = Some(weight.map_or(p, |w| w.max(p)));
        }
        Ok(weight.unwrap_or(1.))
    }
}

impl Clone for Policies {
    fn clone(&self) -> Self {
        let map = self
            .sorted()
            .into_iter()
            .map(|(c, p)| {
                let policy = p.lock().clone();
                (c, Arc::new(Mutex::new(policy)))
            })
            .collect();
        Self(RwLock::new(map))
    }
}

impl PartialEq for Policies {
    fn eq(&self, other: &Self) -> bool {
        let a = self.sorted();
        let b = other.sorted();
        a.len() == b.len()
            && a.iter().zip(b.iter()).all(|((ca, pa), (cb, pb))| {
                ca == cb
                    && (Arc::ptr_eq(pa, pb)
                        || *pa.lock()
                            == *pb.lock())
            })
    }
}

impl Wire for Policies {
    fn size(&self) -> u64 {
        8 + self
            .sorted()
            .iter()
            .map(|(_, p)| {
                let policy = p.lock();
                4 + codec::sized::<u16, _>(Some(&*policy))
            })
            .sum::<u64>()
    }
    fn write(&self, w: &mut dyn Write) -> crate::Result<()> {
        let entries = self.sorted();
        w.write_u64::<LE>(entries.len() as u64)?;
        for (cluster, policy) in entries {
            let policy = policy.lock();
            w.write_u32::<LE>(cluster)?;
            codec::put::<u16, _>(w, Some(&*policy))?;
        }
        Ok(())
    }
    fn read(r: &mut dyn Read) -> crate::Result<Self> {
        let n = r.read_u64::<LE>()?;
        let mut map = HashMap::new();
        for _ in 0..n {
            let cluster = r.read_u32::<LE>()?;
            let policy = codec::need::<u16, Policy>(r, "policy")?;
            map.insert(cluster, Arc::new(Mutex::new(policy)));
        }
        Ok(Self(RwLock::new(map)))
    }
}
