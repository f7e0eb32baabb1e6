use std::mem::size_of;

pub const MAGIC: u64 = u64::from_le_bytes(*b"TUBATCH1");

pub const FLAG_X: u64 = 1;
pub const FLAG_EDGE_ATTR: u64 = 1 << 1;
pub const FLAG_Y_LABELS: u64 = 1 << 2;
pub const FLAG_Y_ATTRIBUTES: u64 = 1 << 3;

/// The fixed-size header following the magic word.
///
/// `num_nodes` is the node count when node features are present and 0
/// otherwise; `y_cols` is meaningful only for attribute targets.
pub struct BatchHeader {
    pub flags: u64,
    pub num_graphs: u64,
    pub num_nodes: u64,
    pub num_edges: u64,
    pub x_cols: u64,
    pub edge_attr_cols: u64,
    pub y_len: u64,
    pub y_cols: u64,
}

impl BatchHeader {
    pub fn has(&self, flag: u64) -> bool {
        self.flags & flag != 0
    }

    pub fn has_y(&self) -> bool {
        self.has(FLAG_Y_LABELS) || self.has(FLAG_Y_ATTRIBUTES)
    }

    /// The exact file size implied by the header.
    pub fn file_size(&self) -> usize {
        let num_slices = 1
            + self.has(FLAG_X) as usize
            + self.has(FLAG_EDGE_ATTR) as usize
            + self.has_y() as usize;
        let labels_size = if self.has(FLAG_Y_LABELS) {
            self.y_len as usize * size_of::<i64>()
        } else {
            0
        };
        let y_attrs_size = if self.has(FLAG_Y_ATTRIBUTES) {
            (self.y_len * self.y_cols) as usize * size_of::<f32>()
        } else {
            0
        };
        size_of::<u64>()
            + size_of::<BatchHeader>()
            + self.num_edges as usize * size_of::<(i64, i64)>()
            + labels_size
            + num_slices * (self.num_graphs as usize + 1) * size_of::<u64>()
            + (self.num_nodes * self.x_cols) as usize * size_of::<f32>()
            + (self.num_edges * self.edge_attr_cols) as usize * size_of::<f32>()
            + y_attrs_size
    }
}
