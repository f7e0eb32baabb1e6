use super::types::{
    BatchHeader, FLAG_EDGE_ATTR, FLAG_X, FLAG_Y_ATTRIBUTES, FLAG_Y_LABELS, MAGIC,
};
use crate::{
    data::{FeatureMatrix, GraphBatch, GraphTargets, SliceTable},
    error::{Error, Result},
    memory_manager::MemoryManager,
    types::{Label, NId},
};
use derive_more::Display;
use std::mem::size_of;

fn read_header(mm: &MemoryManager) -> Result<&BatchHeader> {
    if mm.len() < size_of::<u64>() + size_of::<BatchHeader>() {
        return Err(Error::FormatViolation("batch file too short".to_string()));
    }
    if *mm.read_ref::<u64>(0) != MAGIC {
        return Err(Error::FormatViolation(
            "not a batch file (bad magic word)".to_string(),
        ));
    }
    let header = mm.read_ref::<BatchHeader>(size_of::<u64>());
    if mm.len() != header.file_size() {
        return Err(Error::FormatViolation(format!(
            "batch file is {} bytes, header implies {}",
            mm.len(),
            header.file_size()
        )));
    }
    Ok(header)
}

fn read_offsets(mm: &MemoryManager, pos: usize, count: usize) -> (Vec<usize>, usize) {
    let offsets = mm
        .read_slice::<u64>(pos, count)
        .iter()
        .map(|&offset| offset as usize)
        .collect();
    (offsets, pos + count * size_of::<u64>())
}

/// Deserializes a batch and its slice table written by
/// [`mm_from_batch`](super::mm_from_batch).
pub fn batch_from_mm(mm: &MemoryManager) -> Result<(GraphBatch, SliceTable)> {
    let header = read_header(mm)?;
    let num_offsets = header.num_graphs as usize + 1;
    let mut pos = size_of::<u64>() + size_of::<BatchHeader>();

    let num_edges = header.num_edges as usize;
    let edge_index = mm.read_slice::<(NId, NId)>(pos, num_edges).to_vec();
    pos += num_edges * size_of::<(NId, NId)>();
    let mut labels = None;
    if header.has(FLAG_Y_LABELS) {
        labels = Some(mm.read_slice::<Label>(pos, header.y_len as usize).to_vec());
        pos += header.y_len as usize * size_of::<Label>();
    }

    let (edge_slice, new_pos) = read_offsets(mm, pos, num_offsets);
    pos = new_pos;
    let mut x_slice = None;
    if header.has(FLAG_X) {
        let (offsets, new_pos) = read_offsets(mm, pos, num_offsets);
        x_slice = Some(offsets);
        pos = new_pos;
    }
    let mut edge_attr_slice = None;
    if header.has(FLAG_EDGE_ATTR) {
        let (offsets, new_pos) = read_offsets(mm, pos, num_offsets);
        edge_attr_slice = Some(offsets);
        pos = new_pos;
    }
    let mut y_slice = None;
    if header.has_y() {
        let (offsets, new_pos) = read_offsets(mm, pos, num_offsets);
        y_slice = Some(offsets);
        pos = new_pos;
    }

    let mut x = None;
    if header.has(FLAG_X) {
        let len = (header.num_nodes * header.x_cols) as usize;
        x = Some(FeatureMatrix::new(
            mm.read_slice::<f32>(pos, len).to_vec(),
            header.x_cols as usize,
        ));
        pos += len * size_of::<f32>();
    }
    let mut edge_attr = None;
    if header.has(FLAG_EDGE_ATTR) {
        let len = (header.num_edges * header.edge_attr_cols) as usize;
        edge_attr = Some(FeatureMatrix::new(
            mm.read_slice::<f32>(pos, len).to_vec(),
            header.edge_attr_cols as usize,
        ));
        pos += len * size_of::<f32>();
    }
    let y = if let Some(labels) = labels {
        Some(GraphTargets::Labels(labels))
    } else if header.has(FLAG_Y_ATTRIBUTES) {
        let len = (header.y_len * header.y_cols) as usize;
        Some(GraphTargets::Attributes(FeatureMatrix::new(
            mm.read_slice::<f32>(pos, len).to_vec(),
            header.y_cols as usize,
        )))
    } else {
        None
    };

    Ok((
        GraphBatch {
            x,
            edge_index,
            edge_attr,
            y,
        },
        SliceTable {
            edge_index: edge_slice,
            x: x_slice,
            edge_attr: edge_attr_slice,
            y: y_slice,
        },
    ))
}

/// Summary of a batch file.
#[derive(Debug, Display)]
#[display(
    fmt = "{} graphs, {} nodes, {} edges, x_cols: {}, edge_attr_cols: {}, y: {}",
    num_graphs,
    num_nodes,
    num_edges,
    x_cols,
    edge_attr_cols,
    y_kind
)]
pub struct BatchInfo {
    num_graphs: usize,
    num_nodes: usize,
    num_edges: usize,
    x_cols: usize,
    edge_attr_cols: usize,
    y_kind: &'static str,
}

impl BatchInfo {
    pub fn new(mm: &MemoryManager) -> Result<Self> {
        let header = read_header(mm)?;
        Ok(Self {
            num_graphs: header.num_graphs as usize,
            num_nodes: header.num_nodes as usize,
            num_edges: header.num_edges as usize,
            x_cols: header.x_cols as usize,
            edge_attr_cols: header.edge_attr_cols as usize,
            y_kind: if header.has(FLAG_Y_LABELS) {
                "labels"
            } else if header.has(FLAG_Y_ATTRIBUTES) {
                "attributes"
            } else {
                "none"
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::super::mm_from_batch;
    use super::*;

    fn fixture() -> (GraphBatch, SliceTable) {
        let batch = GraphBatch {
            x: Some(FeatureMatrix::new(vec![1.0, 0.0, 0.0, 1.0, 0.5, 0.5], 2)),
            edge_index: vec![(0, 1), (1, 0), (0, 0)],
            edge_attr: Some(FeatureMatrix::new(vec![0.1, 0.2, 0.3], 1)),
            y: Some(GraphTargets::Labels(vec![1, 0])),
        };
        let slices = SliceTable {
            edge_index: vec![0, 2, 3],
            x: Some(vec![0, 2, 3]),
            edge_attr: Some(vec![0, 2, 3]),
            y: Some(vec![0, 1, 2]),
        };
        (batch, slices)
    }

    #[test]
    fn test_round_trip() {
        let (batch, slices) = fixture();
        let mut mm = MemoryManager::new_mem(0);
        mm_from_batch(&mut mm, &batch, &slices);
        assert_eq!(batch_from_mm(&mm).unwrap(), (batch, slices));
    }

    #[test]
    fn test_round_trip_attribute_targets() {
        let batch = GraphBatch {
            x: None,
            edge_index: vec![(0, 1)],
            edge_attr: None,
            y: Some(GraphTargets::Attributes(FeatureMatrix::new(
                vec![0.5, 1.5],
                2,
            ))),
        };
        let slices = SliceTable {
            edge_index: vec![0, 1],
            x: None,
            edge_attr: None,
            y: Some(vec![0, 1]),
        };
        let mut mm = MemoryManager::new_mem(0);
        mm_from_batch(&mut mm, &batch, &slices);
        assert_eq!(batch_from_mm(&mm).unwrap(), (batch, slices));
    }

    #[test]
    fn test_batch_info() {
        let (batch, slices) = fixture();
        let mut mm = MemoryManager::new_mem(0);
        mm_from_batch(&mut mm, &batch, &slices);
        assert_eq!(
            BatchInfo::new(&mm).unwrap().to_string(),
            "2 graphs, 3 nodes, 3 edges, x_cols: 2, edge_attr_cols: 1, y: labels"
        );
    }

    #[test]
    fn test_bad_magic() {
        let mm = MemoryManager::new_mem(256);
        match batch_from_mm(&mm) {
            Err(Error::FormatViolation(why)) => assert!(why.contains("magic")),
            other => panic!("expected format violation, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn test_truncated_file() {
        let (batch, slices) = fixture();
        let mut mm = MemoryManager::new_mem(0);
        mm_from_batch(&mut mm, &batch, &slices);
        mm.resize(mm.len() - 8);
        match batch_from_mm(&mm) {
            Err(Error::FormatViolation(why)) => assert!(why.contains("bytes")),
            other => panic!("expected format violation, got {:?}", other.map(|_| ())),
        }
    }
}
