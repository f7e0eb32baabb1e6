use super::types::{
    BatchHeader, FLAG_EDGE_ATTR, FLAG_X, FLAG_Y_ATTRIBUTES, FLAG_Y_LABELS, MAGIC,
};
use crate::{
    data::{GraphBatch, GraphTargets, SliceTable},
    memory_manager::MemoryManager,
    types::NId,
};
use log::info;
use std::mem::size_of;

fn build_header(batch: &GraphBatch, slices: &SliceTable) -> BatchHeader {
    let mut flags = 0;
    if batch.x.is_some() {
        flags |= FLAG_X;
    }
    if batch.edge_attr.is_some() {
        flags |= FLAG_EDGE_ATTR;
    }
    let (y_len, y_cols) = match &batch.y {
        Some(GraphTargets::Labels(labels)) => {
            flags |= FLAG_Y_LABELS;
            (labels.len(), 0)
        }
        Some(GraphTargets::Attributes(attrs)) => {
            flags |= FLAG_Y_ATTRIBUTES;
            (attrs.num_rows(), attrs.num_cols())
        }
        None => (0, 0),
    };
    BatchHeader {
        flags,
        num_graphs: slices.num_graphs() as u64,
        num_nodes: batch.x.as_ref().map_or(0, |x| x.num_rows()) as u64,
        num_edges: batch.edge_index.len() as u64,
        x_cols: batch.x.as_ref().map_or(0, |x| x.num_cols()) as u64,
        edge_attr_cols: batch.edge_attr.as_ref().map_or(0, |attrs| attrs.num_cols()) as u64,
        y_len: y_len as u64,
        y_cols: y_cols as u64,
    }
}

fn write_offsets(mm: &mut MemoryManager, pos: usize, offsets: &[usize]) -> usize {
    let offsets: Vec<u64> = offsets.iter().map(|&offset| offset as u64).collect();
    mm.write_slice(pos, &offsets);
    pos + offsets.len() * size_of::<u64>()
}

/// Serializes the batch and its slice table into `mm`.
///
/// The encoding is deterministic: identical inputs produce bit-identical
/// buffers.
pub fn mm_from_batch(mm: &mut MemoryManager, batch: &GraphBatch, slices: &SliceTable) {
    let header = build_header(batch, slices);
    mm.resize(header.file_size());
    mm.write_slice(0, &[MAGIC]);
    mm.write_slice(size_of::<u64>(), std::slice::from_ref(&header));
    let mut pos = size_of::<u64>() + size_of::<BatchHeader>();

    mm.write_slice(pos, &batch.edge_index);
    pos += batch.edge_index.len() * size_of::<(NId, NId)>();
    if let Some(GraphTargets::Labels(labels)) = &batch.y {
        mm.write_slice(pos, labels);
        pos += labels.len() * size_of::<i64>();
    }

    pos = write_offsets(mm, pos, &slices.edge_index);
    if let Some(offsets) = &slices.x {
        pos = write_offsets(mm, pos, offsets);
    }
    if let Some(offsets) = &slices.edge_attr {
        pos = write_offsets(mm, pos, offsets);
    }
    if let Some(offsets) = &slices.y {
        pos = write_offsets(mm, pos, offsets);
    }

    if let Some(x) = &batch.x {
        mm.write_slice(pos, x.data());
        pos += x.data().len() * size_of::<f32>();
    }
    if let Some(edge_attr) = &batch.edge_attr {
        mm.write_slice(pos, edge_attr.data());
        pos += edge_attr.data().len() * size_of::<f32>();
    }
    if let Some(GraphTargets::Attributes(attrs)) = &batch.y {
        mm.write_slice(pos, attrs.data());
        pos += attrs.data().len() * size_of::<f32>();
    }

    mm.resize(pos);
    info!("wrote {} bytes", pos);
}
