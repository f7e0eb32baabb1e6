//! The graph batch and its slice table.

pub use matrix::FeatureMatrix;

use crate::types::{Label, NId};

mod display;
mod matrix;

/// One target per graph (or per node): class labels for classification
/// datasets, continuous attributes for regression datasets.
#[derive(Clone, Debug, PartialEq)]
pub enum GraphTargets {
    Labels(Vec<Label>),
    Attributes(FeatureMatrix),
}

impl GraphTargets {
    pub fn len(&self) -> usize {
        match self {
            GraphTargets::Labels(labels) => labels.len(),
            GraphTargets::Attributes(attrs) => attrs.num_rows(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn slice(&self, lo: usize, hi: usize) -> GraphTargets {
        match self {
            GraphTargets::Labels(labels) => GraphTargets::Labels(labels[lo..hi].to_vec()),
            GraphTargets::Attributes(attrs) => GraphTargets::Attributes(attrs.rows(lo..hi)),
        }
    }
}

/// All graphs of a dataset concatenated into flat arrays.
///
/// `edge_index` endpoints are graph-local once the batch has been sliced; the
/// owning [`SliceTable`] delimits each graph's sub-ranges.
#[derive(Clone, Debug, PartialEq)]
pub struct GraphBatch {
    pub x: Option<FeatureMatrix>,
    pub edge_index: Vec<(NId, NId)>,
    pub edge_attr: Option<FeatureMatrix>,
    pub y: Option<GraphTargets>,
}

impl GraphBatch {
    /// Extracts graph `g`.
    ///
    /// Panics if `g` is out of range.
    pub fn get(&self, slices: &SliceTable, g: usize) -> Data {
        assert!(g < slices.num_graphs());
        let (lo, hi) = (slices.edge_index[g], slices.edge_index[g + 1]);
        Data {
            x: self
                .x
                .as_ref()
                .map(|x| x.rows(slices.x.as_ref().unwrap()[g]..slices.x.as_ref().unwrap()[g + 1])),
            edge_index: self.edge_index[lo..hi].to_vec(),
            edge_attr: self.edge_attr.as_ref().map(|attrs| {
                let slice = slices.edge_attr.as_ref().unwrap();
                attrs.rows(slice[g]..slice[g + 1])
            }),
            y: self.y.as_ref().map(|y| {
                let slice = slices.y.as_ref().unwrap();
                y.slice(slice[g], slice[g + 1])
            }),
        }
    }
}

/// Boundary offsets delimiting each graph's entries within a [`GraphBatch`].
///
/// Every vector has length `num_graphs + 1`; `[g]..[g + 1]` is graph `g`.
/// The optional vectors are present exactly when the corresponding batch
/// field is.
#[derive(Clone, Debug, PartialEq)]
pub struct SliceTable {
    pub edge_index: Vec<usize>,
    pub x: Option<Vec<usize>>,
    pub edge_attr: Option<Vec<usize>>,
    pub y: Option<Vec<usize>>,
}

impl SliceTable {
    pub fn num_graphs(&self) -> usize {
        self.edge_index.len() - 1
    }
}

/// A single graph extracted from a batch.
#[derive(Clone, Debug, PartialEq)]
pub struct Data {
    pub x: Option<FeatureMatrix>,
    pub edge_index: Vec<(NId, NId)>,
    pub edge_attr: Option<FeatureMatrix>,
    pub y: Option<GraphTargets>,
}

impl Data {
    pub fn num_nodes(&self) -> usize {
        match &self.x {
            Some(x) => x.num_rows(),
            None => self
                .edge_index
                .iter()
                .map(|&(src, dst)| src.max(dst) + 1)
                .max()
                .unwrap_or(0) as usize,
        }
    }

    pub fn num_edges(&self) -> usize {
        self.edge_index.len()
    }
}
