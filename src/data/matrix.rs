use crate::types::Feat;
use std::ops::Range;

/// A dense row-major feature matrix.
#[derive(Clone, Debug, PartialEq)]
pub struct FeatureMatrix {
    data: Vec<Feat>,
    num_cols: usize,
}

impl FeatureMatrix {
    /// `data.len()` must be a multiple of `num_cols`.
    pub fn new(data: Vec<Feat>, num_cols: usize) -> Self {
        assert!(num_cols != 0 || data.is_empty());
        assert!(num_cols == 0 || data.len() % num_cols == 0);
        Self { data, num_cols }
    }

    pub fn zeros(num_rows: usize, num_cols: usize) -> Self {
        Self {
            data: vec![0.0; num_rows * num_cols],
            num_cols,
        }
    }

    /// Builds a matrix from row vectors, or `None` if the rows are ragged.
    pub fn try_from_rows(rows: Vec<Vec<Feat>>) -> Option<Self> {
        let num_cols = rows.first().map_or(0, |row| row.len());
        if rows.iter().any(|row| row.len() != num_cols) {
            return None;
        }
        Some(Self {
            data: rows.into_iter().flatten().collect(),
            num_cols,
        })
    }

    pub fn num_rows(&self) -> usize {
        if self.num_cols == 0 {
            0
        } else {
            self.data.len() / self.num_cols
        }
    }

    pub fn num_cols(&self) -> usize {
        self.num_cols
    }

    pub fn data(&self) -> &[Feat] {
        &self.data
    }

    pub fn row(&self, i: usize) -> &[Feat] {
        &self.data[i * self.num_cols..(i + 1) * self.num_cols]
    }

    pub fn set(&mut self, row: usize, col: usize, value: Feat) {
        self.data[row * self.num_cols + col] = value;
    }

    /// The sub-matrix holding `rows`.
    pub fn rows(&self, rows: Range<usize>) -> FeatureMatrix {
        FeatureMatrix {
            data: self.data[rows.start * self.num_cols..rows.end * self.num_cols].to_vec(),
            num_cols: self.num_cols,
        }
    }

    /// Reorders rows to `perm`, which may also drop rows.
    pub fn select_rows(&self, perm: &[usize]) -> FeatureMatrix {
        FeatureMatrix {
            data: perm.iter().flat_map(|&i| self.row(i).iter().copied()).collect(),
            num_cols: self.num_cols,
        }
    }

    /// Concatenates `other` column-wise. Both matrices must have the same
    /// number of rows.
    pub fn hcat(&self, other: &FeatureMatrix) -> FeatureMatrix {
        assert_eq!(self.num_rows(), other.num_rows());
        let num_cols = self.num_cols + other.num_cols;
        let mut data = Vec::with_capacity(self.num_rows() * num_cols);
        for i in 0..self.num_rows() {
            data.extend_from_slice(self.row(i));
            data.extend_from_slice(other.row(i));
        }
        FeatureMatrix { data, num_cols }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_try_from_rows() {
        let mat = FeatureMatrix::try_from_rows(vec![vec![1.0, 2.0], vec![3.0, 4.0]]).unwrap();
        assert_eq!(mat.num_rows(), 2);
        assert_eq!(mat.num_cols(), 2);
        assert_eq!(mat.row(1), &[3.0, 4.0]);
        assert!(FeatureMatrix::try_from_rows(vec![vec![1.0], vec![2.0, 3.0]]).is_none());
    }

    #[test]
    fn test_rows() {
        let mat = FeatureMatrix::new(vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0], 2);
        assert_eq!(mat.rows(1..3), FeatureMatrix::new(vec![3.0, 4.0, 5.0, 6.0], 2));
    }

    #[test]
    fn test_select_rows() {
        let mat = FeatureMatrix::new(vec![1.0, 2.0, 3.0], 1);
        assert_eq!(
            mat.select_rows(&[2, 0]),
            FeatureMatrix::new(vec![3.0, 1.0], 1)
        );
    }

    #[test]
    fn test_hcat() {
        let a = FeatureMatrix::new(vec![1.0, 2.0], 1);
        let b = FeatureMatrix::new(vec![3.0, 4.0, 5.0, 6.0], 2);
        assert_eq!(
            a.hcat(&b),
            FeatureMatrix::new(vec![1.0, 3.0, 4.0, 2.0, 5.0, 6.0], 3)
        );
    }
}
