//! Pairwise Matrix - Validated reciprocal comparison matrix.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::foundation::{DomainError, ErrorCode, SaatyScale, Tolerance};

/// Broad category of a matrix defect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MatrixErrorKind {
    /// The matrix does not have n x n layout.
    Shape,
    /// The values break the unit-diagonal or reciprocal invariant.
    Reciprocal,
}

/// Structural defects found while validating a pairwise matrix.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MatrixError {
    #[error("Pairwise matrix has no rows")]
    Empty,

    #[error("Pairwise matrix is not square: row {row} has {len} entries, expected {expected}")]
    NotSquare {
        row: usize,
        len: usize,
        expected: usize,
    },

    #[error("Index ({row}, {col}) is outside a matrix of order {order}")]
    IndexOutOfBounds { row: usize, col: usize, order: usize },

    #[error("Upper triangle of order {order} needs {expected} values, got {actual}")]
    UpperTriangleLength {
        order: usize,
        expected: usize,
        actual: usize,
    },

    #[error("Entry ({row}, {col}) must be a positive finite number, got {value}")]
    NonPositive { row: usize, col: usize, value: f64 },

    #[error("Diagonal entry ({index}, {index}) must be 1, got {value}")]
    DiagonalNotUnit { index: usize, value: f64 },

    #[error("Entries ({row}, {col}) = {value} and ({col}, {row}) = {mirror} are not reciprocal")]
    NotReciprocal {
        row: usize,
        col: usize,
        value: f64,
        mirror: f64,
    },
}

impl MatrixError {
    /// Returns whether this is a shape or a reciprocal defect.
    pub fn kind(&self) -> MatrixErrorKind {
        match self {
            MatrixError::Empty
            | MatrixError::NotSquare { .. }
            | MatrixError::IndexOutOfBounds { .. }
            | MatrixError::UpperTriangleLength { .. } => MatrixErrorKind::Shape,
            MatrixError::NonPositive { .. }
            | MatrixError::DiagonalNotUnit { .. }
            | MatrixError::NotReciprocal { .. } => MatrixErrorKind::Reciprocal,
        }
    }

    pub fn code(&self) -> ErrorCode {
        match self.kind() {
            MatrixErrorKind::Shape => ErrorCode::MatrixShape,
            MatrixErrorKind::Reciprocal => ErrorCode::MatrixReciprocal,
        }
    }
}

impl From<MatrixError> for DomainError {
    fn from(err: MatrixError) -> Self {
        let domain = DomainError::new(err.code(), err.to_string());
        match err {
            MatrixError::NotReciprocal { row, col, .. }
            | MatrixError::NonPositive { row, col, .. }
            | MatrixError::IndexOutOfBounds { row, col, .. } => domain
                .with_detail("row", row.to_string())
                .with_detail("col", col.to_string()),
            MatrixError::DiagonalNotUnit { index, .. } => domain
                .with_detail("row", index.to_string())
                .with_detail("col", index.to_string()),
            MatrixError::NotSquare { row, .. } => domain.with_detail("row", row.to_string()),
            _ => domain,
        }
    }
}

/// Structural checks for raw judgment matrices.
pub struct MatrixValidator;

impl MatrixValidator {
    /// Validates a raw matrix.
    ///
    /// Checks, in order: square layout, positive finite entries, unit
    /// diagonal (absolute tolerance), then `a[j][i] ~ 1 / a[i][j]` for every
    /// off-diagonal pair (relative tolerance). The first defect found is
    /// returned and names the offending indices.
    pub fn validate(rows: &[Vec<f64>], tolerance: &Tolerance) -> Result<(), MatrixError> {
        let n = rows.len();
        if n == 0 {
            return Err(MatrixError::Empty);
        }

        for (row, values) in rows.iter().enumerate() {
            if values.len() != n {
                return Err(MatrixError::NotSquare {
                    row,
                    len: values.len(),
                    expected: n,
                });
            }
        }

        for (row, values) in rows.iter().enumerate() {
            for (col, &value) in values.iter().enumerate() {
                if !(value.is_finite() && value > 0.0) {
                    return Err(MatrixError::NonPositive { row, col, value });
                }
            }
        }

        for (index, values) in rows.iter().enumerate() {
            if !tolerance.approx_eq(values[index], 1.0) {
                return Err(MatrixError::DiagonalNotUnit {
                    index,
                    value: values[index],
                });
            }
        }

        for row in 0..n {
            for col in (row + 1)..n {
                let value = rows[row][col];
                let mirror = rows[col][row];
                if !tolerance.approx_eq_relative(mirror, 1.0 / value) {
                    return Err(MatrixError::NotReciprocal {
                        row,
                        col,
                        value,
                        mirror,
                    });
                }
            }
        }

        Ok(())
    }
}

/// An n x n positive reciprocal matrix of pairwise judgments.
///
/// Only constructible through validation, so every instance satisfies the
/// unit-diagonal and reciprocal invariants within tolerance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Vec<f64>>", into = "Vec<Vec<f64>>")]
pub struct PairwiseMatrix {
    order: usize,
    /// Row-major entries.
    values: Vec<f64>,
}

impl PairwiseMatrix {
    /// Validates raw rows with default tolerances.
    pub fn new(rows: Vec<Vec<f64>>) -> Result<Self, MatrixError> {
        Self::with_tolerance(rows, &Tolerance::default())
    }

    /// Validates raw rows with the given tolerances.
    pub fn with_tolerance(rows: Vec<Vec<f64>>, tolerance: &Tolerance) -> Result<Self, MatrixError> {
        MatrixValidator::validate(&rows, tolerance)?;
        Ok(Self::from_validated_rows(rows))
    }

    /// The matrix of order n where every item is judged equal.
    ///
    /// # Errors
    /// Returns [`MatrixError::Empty`] for order 0.
    pub fn identity(order: usize) -> Result<Self, MatrixError> {
        if order == 0 {
            return Err(MatrixError::Empty);
        }
        Ok(Self {
            order,
            values: vec![1.0; order * order],
        })
    }

    /// Builds a matrix from its strict upper triangle in row-major order
    /// (`a[0][1], a[0][2], ..., a[1][2], ...`), filling reciprocals.
    pub fn from_upper_triangle(order: usize, upper: &[f64]) -> Result<Self, MatrixError> {
        let expected = order * order.saturating_sub(1) / 2;
        if upper.len() != expected {
            return Err(MatrixError::UpperTriangleLength {
                order,
                expected,
                actual: upper.len(),
            });
        }

        let mut builder = PairwiseMatrixBuilder::new(order);
        let mut values = upper.iter();
        for row in 0..order {
            for col in (row + 1)..order {
                if let Some(&value) = values.next() {
                    builder = builder.judge(row, col, value);
                }
            }
        }
        builder.build()
    }

    /// Starts a builder for a matrix of the given order.
    pub fn builder(order: usize) -> PairwiseMatrixBuilder {
        PairwiseMatrixBuilder::new(order)
    }

    pub(crate) fn from_validated_rows(rows: Vec<Vec<f64>>) -> Self {
        let order = rows.len();
        Self {
            order,
            values: rows.into_iter().flatten().collect(),
        }
    }

    /// Returns the matrix order n.
    pub fn order(&self) -> usize {
        self.order
    }

    /// Returns the entry `a[row][col]`, or None if either index is out of range.
    pub fn get(&self, row: usize, col: usize) -> Option<f64> {
        if row >= self.order || col >= self.order {
            return None;
        }
        self.values.get(row * self.order + col).copied()
    }

    /// Returns one row of the matrix.
    pub fn row(&self, row: usize) -> &[f64] {
        &self.values[row * self.order..(row + 1) * self.order]
    }

    /// Iterates over rows.
    pub fn rows(&self) -> impl Iterator<Item = &[f64]> {
        self.values.chunks(self.order.max(1))
    }

    /// Computes `A * v`.
    pub fn multiply(&self, vector: &[f64]) -> Vec<f64> {
        self.rows()
            .map(|row| row.iter().zip(vector).map(|(a, v)| a * v).sum())
            .collect()
    }

    /// Copies the entries into nested rows.
    pub fn to_rows(&self) -> Vec<Vec<f64>> {
        self.rows().map(|row| row.to_vec()).collect()
    }
}

impl TryFrom<Vec<Vec<f64>>> for PairwiseMatrix {
    type Error = MatrixError;

    fn try_from(rows: Vec<Vec<f64>>) -> Result<Self, Self::Error> {
        Self::new(rows)
    }
}

impl From<PairwiseMatrix> for Vec<Vec<f64>> {
    fn from(matrix: PairwiseMatrix) -> Self {
        matrix.to_rows()
    }
}

/// Builder that records judgments above or below the diagonal and fills
/// the mirrored reciprocal automatically.
#[derive(Debug, Clone)]
pub struct PairwiseMatrixBuilder {
    order: usize,
    rows: Vec<Vec<f64>>,
    error: Option<MatrixError>,
    tolerance: Tolerance,
}

impl PairwiseMatrixBuilder {
    /// Creates a builder starting from the all-equal matrix.
    pub fn new(order: usize) -> Self {
        Self {
            order,
            rows: vec![vec![1.0; order]; order],
            error: None,
            tolerance: Tolerance::default(),
        }
    }

    /// Overrides the tolerances used when the matrix is built.
    pub fn tolerance(mut self, tolerance: Tolerance) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Records that item `row` is `value` times as important as item `col`.
    pub fn judge(mut self, row: usize, col: usize, value: f64) -> Self {
        if self.error.is_some() {
            return self;
        }
        if row >= self.order || col >= self.order {
            self.error = Some(MatrixError::IndexOutOfBounds {
                row,
                col,
                order: self.order,
            });
            return self;
        }
        if row == col {
            self.rows[row][col] = value;
            return self;
        }
        self.rows[row][col] = value;
        self.rows[col][row] = 1.0 / value;
        self
    }

    /// Records a judgment on the Saaty scale in favor of `row`.
    pub fn judge_scale(self, row: usize, col: usize, scale: SaatyScale) -> Self {
        self.judge(row, col, scale.value())
    }

    /// Validates and returns the matrix.
    pub fn build(self) -> Result<PairwiseMatrix, MatrixError> {
        if let Some(err) = self.error {
            return Err(err);
        }
        PairwiseMatrix::with_tolerance(self.rows, &self.tolerance)
    }
}
