use crate::BtStatus;

/// Why a leaf could not evaluate. Always resolved to [`BtStatus::Failure`] by the leaf.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LeafFault {
    /// A referenced entity or cached value no longer exists.
    #[error("stale reference: {0}")]
    Stale(&'static str),
}

pub type LeafResult = Result<BtStatus, LeafFault>;
