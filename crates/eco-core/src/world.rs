use crate::EntityId;

/// Read-only world access.
///
/// The core crate does not prescribe which queries a world must expose; the
/// navigation and agent crates define extension traits on top of this one.
pub trait WorldView {
    type Entity: EntityId;
}

/// Write access / effect sink.
pub trait WorldMut: WorldView {}
