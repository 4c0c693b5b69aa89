use core::fmt::Debug;

/// Stable handle for anything the world can hand out: creatures, food, carcasses.
///
/// Deterministic simulation requires:
/// - stable ordering (`Ord`), used to break distance ties and to order agent updates
/// - a stable numeric ID (`stable_id`) for seeding and logs
pub trait EntityId: Copy + Ord + Eq + Debug + 'static {
    fn stable_id(self) -> u64;
}

impl EntityId for u64 {
    fn stable_id(self) -> u64 {
        self
    }
}

impl EntityId for u32 {
    fn stable_id(self) -> u64 {
        self as u64
    }
}

impl EntityId for usize {
    fn stable_id(self) -> u64 {
        self as u64
    }
}
