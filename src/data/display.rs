use super::{Data, FeatureMatrix, GraphTargets};
use itertools::Itertools;
use std::fmt;

fn fmt_matrix(f: &mut fmt::Formatter, name: &str, mat: &FeatureMatrix) -> fmt::Result {
    writeln!(f, "{}: {} x {}", name, mat.num_rows(), mat.num_cols())?;
    for i in 0..mat.num_rows() {
        writeln!(f, "  {}", mat.row(i).iter().join(" "))?;
    }
    Ok(())
}

impl fmt::Display for Data {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if let Some(x) = &self.x {
            fmt_matrix(f, "x", x)?;
        }
        writeln!(
            f,
            "edge_index: {}",
            self.edge_index
                .iter()
                .map(|(src, dst)| format!("({}, {})", src, dst))
                .join(" ")
        )?;
        if let Some(edge_attr) = &self.edge_attr {
            fmt_matrix(f, "edge_attr", edge_attr)?;
        }
        match &self.y {
            Some(GraphTargets::Labels(labels)) => writeln!(f, "y: {}", labels.iter().join(" "))?,
            Some(GraphTargets::Attributes(attrs)) => fmt_matrix(f, "y", attrs)?,
            None => (),
        }
        Ok(())
    }
}
