//! Deterministic binary persistence of a batch and its slice table.
//!
//! The underlying format of a batch file is:
//!
//! ```text
//! +--------------------------------------------+
//! |                   magic                    |
//! +--------------------------------------------+
//! |             header (8 x u64):              |
//! |  flags num_graphs num_nodes num_edges      |
//! |  x_cols edge_attr_cols y_len y_cols        |
//! +--------------------------------------------+
//! |       edge_index: num_edges x (i64, i64)   |
//! +--------------------------------------------+
//! |       y labels: y_len x i64                |  iff FLAG_Y_LABELS
//! +--------------------------------------------+
//! |       edge_index slice: (g + 1) x u64      |
//! |       x slice: (g + 1) x u64               |  iff FLAG_X
//! |       edge_attr slice: (g + 1) x u64       |  iff FLAG_EDGE_ATTR
//! |       y slice: (g + 1) x u64               |  iff y present
//! +--------------------------------------------+
//! |       x: num_nodes x x_cols x f32          |  iff FLAG_X
//! |       edge_attr: num_edges x cols x f32    |  iff FLAG_EDGE_ATTR
//! |       y attrs: y_len x y_cols x f32        |  iff FLAG_Y_ATTRIBUTES
//! +--------------------------------------------+
//! ```
//!
//! All integer sections precede the f32 sections, so every read is naturally
//! aligned. Identical inputs serialize to bit-identical files.

pub use create::mm_from_batch;
pub use load::{batch_from_mm, BatchInfo};

mod create;
mod load;
mod types;
