//! # Binding registry - kind → tier → bindings, plus listener index.
//!
//! ## Architecture
//! ```text
//! by_kind:     TypeId ──► [Arc<Vec<Arc<Binding>>>; Priority::COUNT]
//!                              (one list per tier, registration order)
//! by_listener: ListenerId ──► Entry { owner, bindings }
//! ```
//!
//! ## Rules
//! - Readers clone the per-tier `Arc`s under a short read lock ([`Registry::snapshot`])
//!   and iterate **without** holding the lock.
//! - Writers copy-on-write a tier list (`Arc::make_mut`), so a snapshot held by an
//!   in-flight dispatch never changes under it.
//! - `install` replaces a previous registration of the same id in one critical section.
//! - `remove` of an unknown id is a no-op.
//! - An entry keeps its listener's `Arc` alive, so the address inside a [`ListenerId`]
//!   cannot be handed to another listener while the id is registered.
//! - Kinds whose tiers all became empty are pruned.

use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;

use crate::listeners::{Binding, ListenerId};
use crate::policies::Priority;

type Tier = Arc<Vec<Arc<Binding>>>;

/// Per-tier binding lists of one event kind, frozen at the time it was taken.
pub(crate) type TierSnapshot = [Tier; Priority::COUNT];

/// Type-erased handle on a registered listener (its `Arc`).
pub(crate) type Owner = Box<dyn Any + Send + Sync>;

struct Entry {
    _owner: Owner,
    bindings: Vec<Arc<Binding>>,
}

#[derive(Default)]
struct Inner {
    by_kind: HashMap<TypeId, TierSnapshot>,
    by_listener: HashMap<ListenerId, Entry>,
}

impl Inner {
    /// Removes every binding of `id`; returns the detached entry if it was registered.
    fn detach(&mut self, id: &ListenerId) -> Option<Entry> {
        let entry = self.by_listener.remove(id)?;

        for binding in &entry.bindings {
            let kind = binding.kind();
            let Some(tiers) = self.by_kind.get_mut(&kind) else {
                continue;
            };
            Arc::make_mut(&mut tiers[binding.priority().index()])
                .retain(|b| !Arc::ptr_eq(b, binding));

            if tiers.iter().all(|t| t.is_empty()) {
                self.by_kind.remove(&kind);
            }
        }
        Some(entry)
    }

    fn attach(&mut self, id: ListenerId, owner: Owner, bindings: Vec<Arc<Binding>>) {
        for binding in &bindings {
            let tiers = self.by_kind.entry(binding.kind()).or_default();
            Arc::make_mut(&mut tiers[binding.priority().index()]).push(Arc::clone(binding));
        }
        self.by_listener.insert(
            id,
            Entry {
                _owner: owner,
                bindings,
            },
        );
    }
}

/// Thread-safe registry of handler bindings.
#[derive(Default)]
pub(crate) struct Registry {
    inner: RwLock<Inner>,
}

impl Registry {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Installs `bindings` for `id`, held alive by `owner`, replacing any previous ones.
    ///
    /// Returns `true` if a previous registration was replaced.
    pub(crate) fn install(&self, id: ListenerId, owner: Owner, bindings: Vec<Arc<Binding>>) -> bool {
        let previous = {
            let mut inner = self.inner.write();
            let previous = inner.detach(&id);
            inner.attach(id, owner, bindings);
            previous
        };
        // dropped outside the lock: a listener's drop may call back into the bus
        previous.is_some()
    }

    /// Removes every binding of `id`. Returns `false` if it was not registered.
    pub(crate) fn remove(&self, id: &ListenerId) -> bool {
        let detached = self.inner.write().detach(id);
        detached.is_some()
    }

    /// Frozen per-tier lists for `kind`, or `None` if nothing listens to it.
    pub(crate) fn snapshot(&self, kind: TypeId) -> Option<TierSnapshot> {
        self.inner.read().by_kind.get(&kind).cloned()
    }

    pub(crate) fn contains(&self, id: &ListenerId) -> bool {
        self.inner.read().by_listener.contains_key(id)
    }

    pub(crate) fn listener_count(&self) -> usize {
        self.inner.read().by_listener.len()
    }

    /// Bindings for `kind` in delivery order.
    pub(crate) fn bindings(&self, kind: TypeId) -> Vec<Arc<Binding>> {
        self.snapshot(kind)
            .map(|tiers| tiers.iter().flat_map(|t| t.iter().cloned()).collect())
            .unwrap_or_default()
    }

    /// Sorted list of registered listener ids.
    pub(crate) fn listeners(&self) -> Vec<ListenerId> {
        let inner = self.inner.read();
        let mut ids: Vec<ListenerId> = inner.by_listener.keys().cloned().collect();
        ids.sort_unstable_by(|a, b| a.as_str().cmp(b.as_str()));
        ids
    }

    pub(crate) fn clear(&self) {
        let entries = {
            let mut inner = self.inner.write();
            inner.by_kind.clear();
            std::mem::take(&mut inner.by_listener)
        };
        drop(entries);
    }

    #[cfg(test)]
    fn kind_count(&self) -> usize {
        self.inner.read().by_kind.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::Event;
    use crate::listeners::Handlers;

    #[derive(Debug)]
    struct Ping;
    impl Event for Ping {}

    #[derive(Debug)]
    struct Pong;
    impl Event for Pong {}

    fn owner() -> Owner {
        Box::new(())
    }

    fn bindings(id: &ListenerId, decl: impl FnOnce(&mut Handlers)) -> Vec<Arc<Binding>> {
        let mut h = Handlers::new(id.clone(), id.as_str());
        decl(&mut h);
        h.finish().unwrap()
    }

    #[test]
    fn test_install_orders_by_tier_then_insertion() {
        let reg = Registry::new();
        let a = ListenerId::from_raw("a");
        let b = ListenerId::from_raw("b");

        reg.install(a.clone(), owner(),
            bindings(&a, |h| {
                h.on::<Ping>("a_late").priority(Priority::Late).invoke(|_| Ok(()));
                h.on::<Ping>("a_normal").invoke(|_| Ok(()));
            }),
        );
        reg.install(b.clone(), owner(),
            bindings(&b, |h| {
                h.on::<Ping>("b_early").priority(Priority::Early).invoke(|_| Ok(()));
                h.on::<Ping>("b_normal").invoke(|_| Ok(()));
            }),
        );

        let order: Vec<&str> = reg
            .bindings(TypeId::of::<Ping>())
            .iter()
            .map(|b| b.handler())
            .collect();
        assert_eq!(order, ["b_early", "a_normal", "b_normal", "a_late"]);
    }

    #[test]
    fn test_snapshot_survives_removal() {
        let reg = Registry::new();
        let a = ListenerId::from_raw("a");
        reg.install(a.clone(), owner(), bindings(&a, |h| h.on::<Ping>("p").invoke(|_| Ok(()))));

        let snap = reg.snapshot(TypeId::of::<Ping>()).unwrap();
        assert!(reg.remove(&a));

        assert_eq!(snap[Priority::Normal.index()].len(), 1);
        assert!(reg.snapshot(TypeId::of::<Ping>()).is_none());
    }

    #[test]
    fn test_remove_is_idempotent_and_prunes() {
        let reg = Registry::new();
        let a = ListenerId::from_raw("a");
        reg.install(a.clone(), owner(),
            bindings(&a, |h| {
                h.on::<Ping>("p").invoke(|_| Ok(()));
                h.on::<Pong>("q").invoke(|_| Ok(()));
            }),
        );
        assert_eq!(reg.kind_count(), 2);

        assert!(reg.remove(&a));
        assert!(!reg.remove(&a));
        assert!(!reg.remove(&ListenerId::from_raw("never")));
        assert_eq!(reg.kind_count(), 0);
        assert_eq!(reg.listener_count(), 0);
    }

    #[test]
    fn test_install_replaces_previous_bindings() {
        let reg = Registry::new();
        let a = ListenerId::from_raw("a");
        assert!(!reg.install(a.clone(), owner(), bindings(&a, |h| h.on::<Ping>("p").invoke(|_| Ok(())))));
        assert!(reg.install(a.clone(), owner(), bindings(&a, |h| h.on::<Pong>("q").invoke(|_| Ok(())))));

        assert!(reg.bindings(TypeId::of::<Ping>()).is_empty());
        assert_eq!(reg.bindings(TypeId::of::<Pong>()).len(), 1);
        assert_eq!(reg.listener_count(), 1);
        assert_eq!(reg.listeners(), vec![a]);
    }

    #[test]
    fn test_entry_holds_owner_until_removed() {
        let reg = Registry::new();
        let a = ListenerId::from_raw("a");
        let held = Arc::new(());
        reg.install(a.clone(), Box::new(Arc::clone(&held)), Vec::new());
        assert_eq!(Arc::strong_count(&held), 2);

        assert!(reg.remove(&a));
        assert_eq!(Arc::strong_count(&held), 1);
    }

    #[test]
    fn test_listener_without_bindings_is_tracked() {
        let reg = Registry::new();
        let a = ListenerId::from_raw("a");
        let held = Arc::new(());
        reg.install(a.clone(), Box::new(Arc::clone(&held)), Vec::new());
        assert!(reg.contains(&a));
        assert_eq!(reg.kind_count(), 0);

        reg.clear();
        assert!(!reg.contains(&a));
        assert_eq!(Arc::strong_count(&held), 1);
    }
}
