// -- < Testing the generational allocator > -------------------------------
#[cfg(test)]
pub mod handle_allocator_test {
    use crate::core::utils::handle::{Allocator, Handle, IsHandle};

    #[test]
    fn test_allocation() {
        let mut alloc = Allocator::<&str>::new();
        let first: Handle = alloc.allocate("first");
        let second: Handle = alloc.allocate("second");

        assert!(alloc.is_live(first));
        assert!(alloc.is_live(second));
        assert_ne!(first, second);
        assert_eq!(alloc.get(first), Some(&"first"));
        assert_eq!(alloc.get(second), Some(&"second"));
        assert_eq!(alloc.len(), 2);
    }

    #[test]
    fn test_free() {
        let mut alloc = Allocator::<String>::new();
        let handle = alloc.allocate("program".to_owned());

        assert_eq!(alloc.free(handle), Some("program".to_owned()));
        assert!(!alloc.is_live(handle));
        assert!(alloc.get(handle).is_none());
        assert!(alloc.is_empty());

        // Freeing twice is harmless
        assert_eq!(alloc.free(handle), None);
    }

    #[test]
    fn test_reused_slot_gets_new_generation() {
        let mut alloc = Allocator::<u32>::new();
        let old = alloc.allocate(1);
        alloc.free(old);

        let new = alloc.allocate(2);
        assert_eq!(old.index(), new.index());
        assert_ne!(old.generation(), new.generation());

        // The stale handle must never see the new value
        assert!(!alloc.is_live(old));
        assert!(alloc.get(old).is_none());
        assert!(alloc.get_mut(old).is_none());
        assert_eq!(alloc.get(new), Some(&2));
    }

    #[test]
    fn test_live_handles() {
        let mut alloc = Allocator::<u32>::new();
        let a = alloc.allocate(10);
        let b = alloc.allocate(20);
        let c = alloc.allocate(30);
        alloc.free(b);

        assert_eq!(alloc.live_handles(), vec![a, c]);

        if let Some(value) = alloc.get_mut(c) {
            *value += 1;
        }
        assert_eq!(alloc.get(c), Some(&31));
    }
}
