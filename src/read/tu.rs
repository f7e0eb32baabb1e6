//! The TU-format reader.
//!
//! A TU dataset is a family of plain-text files `<prefix>_<suffix>.txt`
//! describing a collection of graphs packed into one flat node/edge
//! numbering. `A` holds the adjacency list (1-indexed, one `src,dst` pair per
//! line); the remaining files are optional and attach per-node, per-edge, or
//! per-graph values, aligned to `A`'s original line order where they describe
//! edges. [`read_tu_files`] turns such a directory into a [`GraphBatch`] plus
//! the [`SliceTable`] that delimits each graph's entries.

use crate::{
    data::{FeatureMatrix, GraphBatch, GraphTargets, SliceTable},
    error::{Error, Result},
    read::txt::read_txt,
    types::{Feat, GId, Label, NId},
};
use itertools::Itertools;
use log::info;
use std::path::Path;

/// Which optional input files the dataset provides.
#[derive(Clone, Copy, Debug, Default)]
pub struct TuConfig {
    pub graph_indicator: bool,
    pub graph_labels: bool,
    pub graph_attributes: bool,
    pub node_attributes: bool,
    pub node_labels: bool,
    pub edge_attributes: bool,
    pub edge_labels: bool,
}

fn tu_filename(prefix: &str, name: &str) -> String {
    format!("{}_{}.txt", prefix, name)
}

/// The raw files `config` requires, the adjacency list first.
pub fn tu_filenames(prefix: &str, config: &TuConfig) -> Vec<String> {
    let mut names = vec!["A"];
    let flags = [
        ("graph_indicator", config.graph_indicator),
        ("graph_labels", config.graph_labels),
        ("graph_attributes", config.graph_attributes),
        ("node_attributes", config.node_attributes),
        ("node_labels", config.node_labels),
        ("edge_attributes", config.edge_attributes),
        ("edge_labels", config.edge_labels),
    ];
    names.extend(flags.iter().filter(|(_, set)| *set).map(|&(name, _)| name));
    names
        .into_iter()
        .map(|name| tu_filename(prefix, name))
        .collect()
}

/// Sorts `edges` lexicographically and removes duplicate pairs.
///
/// The second return value maps the kept edges, in sorted order, back to
/// their original positions (the first occurrence of each pair wins); it is
/// the permutation to apply to files aligned with the original edge order.
pub fn coalesce(edges: &[(NId, NId)]) -> (Vec<(NId, NId)>, Vec<usize>) {
    let perm: Vec<usize> = (0..edges.len())
        .sorted_by_key(|&i| (edges[i], i))
        .dedup_by(|&a, &b| edges[a] == edges[b])
        .collect();
    let sorted = perm.iter().map(|&i| edges[i]).collect();
    (sorted, perm)
}

/// One-hot encodes `labels`.
///
/// The width is the number of distinct observed values; columns are ordered
/// by ascending value.
pub fn one_hot(labels: &[Label]) -> FeatureMatrix {
    let values: Vec<Label> = labels.iter().copied().sorted().dedup().collect();
    let mut mat = FeatureMatrix::zeros(labels.len(), values.len());
    for (row, label) in labels.iter().enumerate() {
        mat.set(row, values.binary_search(label).unwrap(), 1.0);
    }
    mat
}

fn cat(a: Option<FeatureMatrix>, b: Option<FeatureMatrix>) -> Result<Option<FeatureMatrix>> {
    match (a, b) {
        (Some(a), Some(b)) => {
            if a.num_rows() != b.num_rows() {
                return Err(Error::FormatViolation(format!(
                    "cannot concatenate feature blocks with {} and {} rows",
                    a.num_rows(),
                    b.num_rows()
                )));
            }
            Ok(Some(a.hcat(&b)))
        }
        (a, None) => Ok(a),
        (None, b) => Ok(b),
    }
}

fn single_column<T: Copy>(file: &str, rows: &[Vec<T>]) -> Result<Vec<T>> {
    rows.iter()
        .map(|row| match row.as_slice() {
            &[value] => Ok(value),
            _ => Err(Error::FormatViolation(format!(
                "{}: expected one value per line, got {}",
                file,
                row.len()
            ))),
        })
        .collect()
}

fn pair_rows(file: &str, rows: &[Vec<NId>]) -> Result<Vec<(NId, NId)>> {
    rows.iter()
        .map(|row| match row.as_slice() {
            &[src, dst] => Ok((src, dst)),
            _ => Err(Error::FormatViolation(format!(
                "{}: expected two values per line, got {}",
                file,
                row.len()
            ))),
        })
        .collect()
}

fn matrix(file: &str, rows: Vec<Vec<Feat>>) -> Result<FeatureMatrix> {
    FeatureMatrix::try_from_rows(rows)
        .ok_or_else(|| Error::FormatViolation(format!("{}: rows have unequal lengths", file)))
}

/// Reads the TU dataset `<path>/<prefix>_*.txt` into a batch and its slice
/// table.
///
/// `node_labels` are one-hot encoded while `edge_labels` stay a raw 0-indexed
/// column; the asymmetry is part of the format as consumed downstream and is
/// kept as-is.
pub fn read_tu_files<P: AsRef<Path>>(
    path: P,
    prefix: &str,
    config: &TuConfig,
) -> Result<(GraphBatch, SliceTable)> {
    let path = path.as_ref();
    if config.graph_labels && config.graph_attributes {
        return Err(Error::FormatViolation(
            "graph_labels and graph_attributes are mutually exclusive".to_string(),
        ));
    }

    let file = tu_filename(prefix, "A");
    info!("reading {}...", file);
    let raw_edges: Vec<(NId, NId)> = pair_rows(&file, &read_txt(path.join(&file))?)?
        .into_iter()
        .map(|(src, dst)| (src - 1, dst - 1))
        .collect();
    let (edge_index, perm) = coalesce(&raw_edges);
    info!(
        "coalesced {} raw edges into {}",
        raw_edges.len(),
        edge_index.len()
    );

    let mut node_attrs = None;
    if config.node_attributes {
        let file = tu_filename(prefix, "node_attributes");
        info!("reading {}...", file);
        node_attrs = Some(matrix(&file, read_txt(path.join(&file))?)?);
    }
    let mut node_labels = None;
    if config.node_labels {
        let file = tu_filename(prefix, "node_labels");
        info!("reading {}...", file);
        let labels: Vec<Label> = single_column::<Label>(&file, &read_txt(path.join(&file))?)?
            .into_iter()
            .map(|label| label - 1)
            .collect();
        node_labels = Some(one_hot(&labels));
    }
    let x = cat(node_attrs, node_labels)?;

    let mut edge_attrs = None;
    if config.edge_attributes {
        let file = tu_filename(prefix, "edge_attributes");
        info!("reading {}...", file);
        let attrs = matrix(&file, read_txt(path.join(&file))?)?;
        if attrs.num_rows() != raw_edges.len() {
            return Err(Error::FormatViolation(format!(
                "{}: {} rows for {} edges",
                file,
                attrs.num_rows(),
                raw_edges.len()
            )));
        }
        edge_attrs = Some(attrs.select_rows(&perm));
    }
    let mut edge_labels = None;
    if config.edge_labels {
        let file = tu_filename(prefix, "edge_labels");
        info!("reading {}...", file);
        let labels = single_column::<Label>(&file, &read_txt(path.join(&file))?)?;
        if labels.len() != raw_edges.len() {
            return Err(Error::FormatViolation(format!(
                "{}: {} rows for {} edges",
                file,
                labels.len(),
                raw_edges.len()
            )));
        }
        // A raw 0-indexed column, not one-hot.
        edge_labels = Some(FeatureMatrix::new(
            perm.iter().map(|&i| (labels[i] - 1) as Feat).collect(),
            1,
        ));
    }
    let edge_attr = cat(edge_attrs, edge_labels)?;

    let mut y = None;
    if config.graph_attributes {
        let file = tu_filename(prefix, "graph_attributes");
        info!("reading {}...", file);
        y = Some(GraphTargets::Attributes(matrix(
            &file,
            read_txt(path.join(&file))?,
        )?));
    }
    if config.graph_labels {
        let file = tu_filename(prefix, "graph_labels");
        info!("reading {}...", file);
        y = Some(GraphTargets::Labels(
            single_column::<Label>(&file, &read_txt(path.join(&file))?)?
                .into_iter()
                .map(|label| label - 1)
                .collect(),
        ));
    }

    let graph_indicator: Vec<GId> = if config.graph_indicator {
        let file = tu_filename(prefix, "graph_indicator");
        info!("reading {}...", file);
        single_column::<GId>(&file, &read_txt(path.join(&file))?)?
            .into_iter()
            .map(|g| g - 1)
            .collect()
    } else {
        // No indicator file: a single graph holding every node.
        let num_nodes = match &x {
            Some(x) => x.num_rows(),
            None => edge_index
                .iter()
                .map(|&(src, dst)| src.max(dst) + 1)
                .max()
                .unwrap_or(0) as usize,
        };
        vec![0; num_nodes]
    };

    let batch = GraphBatch {
        x,
        edge_index,
        edge_attr,
        y,
    };
    compute_slices(batch, &graph_indicator)
}

fn cumsum(counts: &[usize]) -> Vec<usize> {
    let mut slice = Vec::with_capacity(counts.len() + 1);
    slice.push(0);
    let mut total = 0;
    for &count in counts {
        total += count;
        slice.push(total);
    }
    slice
}

/// Computes per-graph boundary offsets and renumbers `batch.edge_index` to
/// graph-local endpoints.
///
/// `batch.edge_index` must be sorted (see [`coalesce`]) and
/// `graph_indicator` must hold one non-decreasing, 0-indexed graph id per
/// node. An edge whose endpoints belong to two different graphs breaks the
/// format contract.
pub fn compute_slices(
    mut batch: GraphBatch,
    graph_indicator: &[GId],
) -> Result<(GraphBatch, SliceTable)> {
    let num_nodes = graph_indicator.len();
    if graph_indicator.first().map_or(false, |&g| g < 0)
        || graph_indicator.windows(2).any(|w| w[0] > w[1])
    {
        return Err(Error::FormatViolation(
            "graph_indicator must be non-decreasing and non-negative".to_string(),
        ));
    }
    if let Some(x) = &batch.x {
        if x.num_rows() != num_nodes {
            return Err(Error::FormatViolation(format!(
                "{} node feature rows for {} nodes",
                x.num_rows(),
                num_nodes
            )));
        }
    }
    if let Some(edge_attr) = &batch.edge_attr {
        if edge_attr.num_rows() != batch.edge_index.len() {
            return Err(Error::FormatViolation(format!(
                "{} edge feature rows for {} edges",
                edge_attr.num_rows(),
                batch.edge_index.len()
            )));
        }
    }
    let num_graphs = graph_indicator.last().map_or(0, |&g| g as usize + 1);

    info!("computing slices for {} graphs...", num_graphs);
    let mut node_counts = vec![0; num_graphs];
    for &g in graph_indicator {
        node_counts[g as usize] += 1;
    }
    let node_slice = cumsum(&node_counts);

    // An edge belongs to its source node's graph.
    let mut edge_counts = vec![0; num_graphs];
    let mut edge_graph = Vec::with_capacity(batch.edge_index.len());
    for &(src, dst) in &batch.edge_index {
        if src < 0 || dst < 0 || src as usize >= num_nodes || dst as usize >= num_nodes {
            return Err(Error::FormatViolation(format!(
                "edge ({}, {}) references a node outside 0..{}",
                src, dst, num_nodes
            )));
        }
        let (src_graph, dst_graph) = (graph_indicator[src as usize], graph_indicator[dst as usize]);
        if src_graph != dst_graph {
            return Err(Error::FormatViolation(format!(
                "edge ({}, {}) spans graphs {} and {}",
                src, dst, src_graph, dst_graph
            )));
        }
        edge_counts[src_graph as usize] += 1;
        edge_graph.push(src_graph);
    }
    if edge_graph.windows(2).any(|w| w[0] > w[1]) {
        return Err(Error::FormatViolation(
            "edges are not grouped by graph".to_string(),
        ));
    }
    let edge_slice = cumsum(&edge_counts);

    // Edge endpoints start at zero for every graph.
    for (edge, &g) in batch.edge_index.iter_mut().zip(&edge_graph) {
        let base = node_slice[g as usize] as NId;
        edge.0 -= base;
        edge.1 -= base;
    }

    let y_slice = match &batch.y {
        Some(y) if y.len() == num_nodes => Some(node_slice.clone()),
        Some(y) if y.len() == num_graphs => Some((0..=num_graphs).collect()),
        Some(y) => {
            return Err(Error::FormatViolation(format!(
                "{} graph targets for {} graphs ({} nodes)",
                y.len(),
                num_graphs,
                num_nodes
            )))
        }
        None => None,
    };
    let slices = SliceTable {
        edge_index: edge_slice.clone(),
        x: batch.x.as_ref().map(|_| node_slice),
        edge_attr: batch.edge_attr.as_ref().map(|_| edge_slice),
        y: y_slice,
    };
    Ok((batch, slices))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::PathBuf;

    fn write_dataset(files: &[(&str, &str)]) -> (tempfile::TempDir, PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        for (name, content) in files {
            fs::write(dir.path().join(format!("DS_{}.txt", name)), content).unwrap();
        }
        let path = dir.path().to_path_buf();
        (dir, path)
    }

    #[test]
    fn test_tu_filenames() {
        let config = TuConfig {
            graph_indicator: true,
            node_labels: true,
            ..TuConfig::default()
        };
        assert_eq!(
            tu_filenames("MUTAG", &config),
            vec![
                "MUTAG_A.txt",
                "MUTAG_graph_indicator.txt",
                "MUTAG_node_labels.txt"
            ]
        );
    }

    #[test]
    fn test_coalesce() {
        let (edges, perm) = coalesce(&[(1, 2), (0, 1), (1, 2), (1, 0)]);
        assert_eq!(edges, vec![(0, 1), (1, 0), (1, 2)]);
        assert_eq!(perm, vec![1, 3, 0]);
    }

    #[test]
    fn test_one_hot() {
        let mat = one_hot(&[0, 1, 2, 1]);
        assert_eq!(mat.num_cols(), 3);
        assert_eq!(mat.row(1), &[0.0, 1.0, 0.0]);
        assert_eq!(mat.row(3), &[0.0, 1.0, 0.0]);
    }

    #[test]
    fn test_one_hot_sparse_values() {
        let mat = one_hot(&[4, 0, 4]);
        assert_eq!(mat.num_cols(), 2);
        assert_eq!(mat.row(0), &[0.0, 1.0]);
        assert_eq!(mat.row(1), &[1.0, 0.0]);
    }

    #[test]
    fn test_single_graph() {
        let (_dir, path) = write_dataset(&[("A", "1,2\n2,1\n2,3\n3,2\n")]);
        let (batch, slices) = read_tu_files(&path, "DS", &TuConfig::default()).unwrap();
        assert_eq!(batch.edge_index, vec![(0, 1), (1, 0), (1, 2), (2, 1)]);
        assert_eq!(slices.edge_index, vec![0, 4]);
        assert_eq!(slices.x, None);
        assert_eq!(batch.x, None);
        assert_eq!(batch.y, None);
    }

    #[test]
    fn test_two_graphs_renumbered() {
        let (_dir, path) = write_dataset(&[
            ("A", "1,2\n3,4\n"),
            ("graph_indicator", "1\n1\n2\n2\n"),
        ]);
        let config = TuConfig {
            graph_indicator: true,
            ..TuConfig::default()
        };
        let (batch, slices) = read_tu_files(&path, "DS", &config).unwrap();
        assert_eq!(batch.edge_index, vec![(0, 1), (0, 1)]);
        assert_eq!(slices.edge_index, vec![0, 1, 2]);
    }

    #[test]
    fn test_duplicate_edges_keep_first_attribute_row() {
        let (_dir, path) = write_dataset(&[
            ("A", "2,1\n1,2\n1,2\n"),
            ("graph_indicator", "1\n1\n"),
            ("edge_attributes", "0.25\n0.5\n0.75\n"),
        ]);
        let config = TuConfig {
            graph_indicator: true,
            edge_attributes: true,
            ..TuConfig::default()
        };
        let (batch, slices) = read_tu_files(&path, "DS", &config).unwrap();
        assert_eq!(batch.edge_index, vec![(0, 1), (1, 0)]);
        // (0, 1) first appeared on line 2, (1, 0) on line 1.
        assert_eq!(
            batch.edge_attr,
            Some(FeatureMatrix::new(vec![0.5, 0.25], 1))
        );
        assert_eq!(slices.edge_attr, Some(vec![0, 2]));
    }

    #[test]
    fn test_edge_labels_stay_raw() {
        let (_dir, path) = write_dataset(&[("A", "1,2\n2,3\n"), ("edge_labels", "3\n1\n")]);
        let config = TuConfig {
            edge_labels: true,
            ..TuConfig::default()
        };
        let (batch, _) = read_tu_files(&path, "DS", &config).unwrap();
        assert_eq!(batch.edge_attr, Some(FeatureMatrix::new(vec![2.0, 0.0], 1)));
    }

    #[test]
    fn test_node_features_concatenated() {
        let (_dir, path) = write_dataset(&[
            ("A", "1,2\n2,1\n"),
            ("node_attributes", "0.5,1.5\n2.5,3.5\n"),
            ("node_labels", "2\n1\n"),
        ]);
        let config = TuConfig {
            node_attributes: true,
            node_labels: true,
            ..TuConfig::default()
        };
        let (batch, slices) = read_tu_files(&path, "DS", &config).unwrap();
        assert_eq!(
            batch.x,
            Some(FeatureMatrix::new(
                vec![0.5, 1.5, 0.0, 1.0, 2.5, 3.5, 1.0, 0.0],
                4
            ))
        );
        assert_eq!(slices.x, Some(vec![0, 2]));
    }

    #[test]
    fn test_graph_labels() {
        let (_dir, path) = write_dataset(&[
            ("A", "1,2\n3,4\n"),
            ("graph_indicator", "1\n1\n2\n2\n"),
            ("graph_labels", "2\n1\n"),
        ]);
        let config = TuConfig {
            graph_indicator: true,
            graph_labels: true,
            ..TuConfig::default()
        };
        let (batch, slices) = read_tu_files(&path, "DS", &config).unwrap();
        assert_eq!(batch.y, Some(GraphTargets::Labels(vec![1, 0])));
        assert_eq!(slices.y, Some(vec![0, 1, 2]));
    }

    #[test]
    fn test_per_node_targets_use_node_slice() {
        let batch = GraphBatch {
            x: None,
            edge_index: vec![(0, 1), (2, 3)],
            edge_attr: None,
            y: Some(GraphTargets::Labels(vec![0, 1, 0, 1])),
        };
        let (_, slices) = compute_slices(batch, &[0, 0, 1, 1]).unwrap();
        assert_eq!(slices.y, Some(vec![0, 2, 4]));
    }

    #[test]
    fn test_labels_and_attributes_conflict() {
        let (_dir, path) = write_dataset(&[("A", "1,2\n")]);
        let config = TuConfig {
            graph_labels: true,
            graph_attributes: true,
            ..TuConfig::default()
        };
        match read_tu_files(&path, "DS", &config) {
            Err(Error::FormatViolation(_)) => (),
            other => panic!("expected format violation, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn test_cross_graph_edge() {
        let (_dir, path) =
            write_dataset(&[("A", "1,2\n2,3\n"), ("graph_indicator", "1\n1\n2\n")]);
        let config = TuConfig {
            graph_indicator: true,
            ..TuConfig::default()
        };
        match read_tu_files(&path, "DS", &config) {
            Err(Error::FormatViolation(why)) => assert!(why.contains("spans")),
            other => panic!("expected format violation, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn test_missing_required_file() {
        let (_dir, path) = write_dataset(&[("A", "1,2\n")]);
        let config = TuConfig {
            graph_labels: true,
            ..TuConfig::default()
        };
        match read_tu_files(&path, "DS", &config) {
            Err(Error::MissingFile(file)) => {
                assert!(file.ends_with("DS_graph_labels.txt"))
            }
            other => panic!("expected missing file error, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn test_slice_sums_match_totals() {
        let (_dir, path) = write_dataset(&[
            ("A", "1,2\n2,1\n3,4\n4,3\n4,5\n"),
            ("graph_indicator", "1\n1\n2\n2\n2\n"),
            ("node_labels", "1\n2\n1\n2\n1\n"),
        ]);
        let config = TuConfig {
            graph_indicator: true,
            node_labels: true,
            ..TuConfig::default()
        };
        let (batch, slices) = read_tu_files(&path, "DS", &config).unwrap();
        let x_slice = slices.x.as_ref().unwrap();
        assert_eq!(*x_slice.last().unwrap(), batch.x.unwrap().num_rows());
        assert_eq!(*slices.edge_index.last().unwrap(), batch.edge_index.len());
        // Every endpoint is local to its graph.
        for g in 0..slices.num_graphs() {
            let num_nodes = (x_slice[g + 1] - x_slice[g]) as NId;
            for &(src, dst) in
                &batch.edge_index[slices.edge_index[g]..slices.edge_index[g + 1]]
            {
                assert!(src >= 0 && src < num_nodes);
                assert!(dst >= 0 && dst < num_nodes);
            }
        }
    }
}
