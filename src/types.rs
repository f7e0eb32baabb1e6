//! Various types related to graph batching.

/// The node id type.
pub type NId = i64;

/// The graph id type.
pub type GId = i64;

/// The categorical label type.
pub type Label = i64;

/// The feature scalar type.
pub type Feat = f32;
