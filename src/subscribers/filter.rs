use std::any::TypeId;
use std::collections::HashSet;

use parking_lot::RwLock;

use crate::events::Event;

/// Set of event kinds an observer skips.
#[derive(Default)]
pub(crate) struct KindFilter {
    ignored: RwLock<HashSet<TypeId>>,
}

impl KindFilter {
    pub(crate) fn ignore<E: Event>(&self) {
        self.ignored.write().insert(TypeId::of::<E>());
    }

    pub(crate) fn accept<E: Event>(&self) {
        self.ignored.write().remove(&TypeId::of::<E>());
    }

    pub(crate) fn is_ignored<E: Event>(&self) -> bool {
        self.ignored.read().contains(&TypeId::of::<E>())
    }

    /// `true` if `event`'s kind is not ignored.
    pub(crate) fn admits(&self, event: &dyn Event) -> bool {
        !self.ignored.read().contains(&event.kind_id())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    struct Ping;
    impl Event for Ping {}

    #[derive(Debug)]
    struct Pong;
    impl Event for Pong {}

    #[test]
    fn test_ignore_then_accept() {
        let f = KindFilter::default();
        assert!(f.admits(&Ping));

        f.ignore::<Ping>();
        f.ignore::<Ping>();
        assert!(f.is_ignored::<Ping>());
        assert!(!f.admits(&Ping));
        assert!(f.admits(&Pong));

        f.accept::<Ping>();
        assert!(f.admits(&Ping));
    }
}
