//! Relation ordering
//!
//! Keeps many-to-many and one-to-many links in a user-controlled sequence.
//! [`RelationsOrderer`] applies connect/disconnect batches to a snapshot of a
//! relation bucket; [`sort_connect_instructions`] is the pre-sort it runs so
//! batches may reference rows they connect later.

mod orderer;
mod sort;

pub use orderer::RelationsOrderer;
pub use sort::sort_connect_instructions;
