use std::collections::BTreeMap;

/// Short-term "given up on this" memory.
///
/// Each key expires `forget_seconds` after it was inserted. Expired keys are
/// invisible immediately; they are physically removed by [`TargetMemory::purge_due`],
/// which only scans once the earliest deadline has passed.
#[derive(Debug, Clone, PartialEq)]
pub struct TargetMemory<K: Ord> {
    expiries: BTreeMap<K, f64>,
    next_deadline: Option<f64>,
    forget_seconds: f64,
}

impl<K: Ord> TargetMemory<K> {
    pub fn new(forget_seconds: f64) -> Self {
        Self {
            expiries: BTreeMap::new(),
            next_deadline: None,
            forget_seconds,
        }
    }

    pub fn forget_seconds(&self) -> f64 {
        self.forget_seconds
    }

    /// Blacklist `key` from `now`. Re-inserting pushes the expiry back.
    pub fn insert(&mut self, key: K, now: f64) {
        let expiry = now + self.forget_seconds;
        self.expiries.insert(key, expiry);
        self.next_deadline = Some(match self.next_deadline {
            Some(d) => d.min(expiry),
            None => expiry,
        });
    }

    pub fn contains(&self, key: &K, now: f64) -> bool {
        self.expiries.get(key).is_some_and(|expiry| *expiry > now)
    }

    pub fn next_deadline(&self) -> Option<f64> {
        self.next_deadline
    }

    /// Drop expired keys if the earliest deadline has passed. Returns how many were dropped.
    pub fn purge_due(&mut self, now: f64) -> usize {
        match self.next_deadline {
            Some(deadline) if deadline <= now => {}
            _ => return 0,
        }

        let before = self.expiries.len();
        self.expiries.retain(|_, expiry| *expiry > now);
        self.next_deadline = self.expiries.values().copied().reduce(f64::min);
        before - self.expiries.len()
    }

    pub fn len(&self) -> usize {
        self.expiries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.expiries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn purge_waits_for_the_earliest_deadline() {
        let mut m = TargetMemory::new(30.0);
        m.insert(1u64, 0.0);
        m.insert(2u64, 10.0);
        assert_eq!(m.purge_due(29.0), 0);
        assert_eq!(m.purge_due(30.0), 1);
        assert_eq!(m.next_deadline(), Some(40.0));
        assert!(m.contains(&2, 39.9));
        assert!(!m.contains(&2, 40.0));
    }
}
