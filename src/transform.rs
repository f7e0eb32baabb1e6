//! Transforms over extracted graphs.

use crate::{
    data::{Data, FeatureMatrix},
    types::{Feat, NId},
};

/// In-degree of every node, given the edge target column.
pub fn degree<I: IntoIterator<Item = NId>>(targets: I, num_nodes: usize) -> Vec<Feat> {
    let mut deg = vec![0.0; num_nodes];
    for target in targets {
        deg[target as usize] += 1.0;
    }
    deg
}

/// Stores the max-normalized in-degree of each edge's target node as the
/// edge attribute, optionally concatenated to an existing one.
pub struct TargetIndegree {
    pub cat: bool,
}

impl TargetIndegree {
    pub fn new(cat: bool) -> Self {
        Self { cat }
    }

    pub fn apply(&self, data: &mut Data) {
        let mut deg = degree(
            data.edge_index.iter().map(|&(_, dst)| dst),
            data.num_nodes(),
        );
        let max = deg.iter().cloned().fold(0.0, Feat::max);
        if max > 0.0 {
            for d in &mut deg {
                *d /= max;
            }
        }
        let col = FeatureMatrix::new(
            data.edge_index
                .iter()
                .map(|&(_, dst)| deg[dst as usize])
                .collect(),
            1,
        );
        data.edge_attr = match (data.edge_attr.take(), self.cat) {
            (Some(attrs), true) => Some(attrs.hcat(&col)),
            _ => Some(col),
        };
    }
}
