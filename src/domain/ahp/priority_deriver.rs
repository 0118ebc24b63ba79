//! Priority Deriver - Turns a pairwise matrix into a normalized weight vector.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::PairwiseMatrix;
use crate::domain::foundation::{ValidationError, DEFAULT_ABSOLUTE_EPS, ZERO_EPS};

/// Iteration cap for the power method.
pub const MAX_POWER_ITERATIONS: usize = 1000;

/// Relative change below which the power method is considered converged.
pub const POWER_CONVERGENCE_EPS: f64 = 1e-9;

/// Algorithm used to derive priorities.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PriorityMethod {
    /// Principal right eigenvector via power iteration.
    #[default]
    #[serde(alias = "eigen")]
    Eigenvector,
    /// Normalized row geometric means.
    #[serde(alias = "geometricmean", alias = "geometric_mean")]
    GeometricMean,
}

/// Non-negative weights summing to 1, one per compared item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PriorityVector(Vec<f64>);

impl PriorityVector {
    /// Accepts externally supplied weights, rejecting negative entries or a
    /// sum that is not 1 within tolerance.
    pub fn from_weights(weights: Vec<f64>) -> Result<Self, ValidationError> {
        if weights.is_empty() {
            return Err(ValidationError::empty_field("weights"));
        }
        if let Some(&bad) = weights.iter().find(|w| !(w.is_finite() && **w >= 0.0)) {
            return Err(ValidationError::out_of_range("weight", 0.0, 1.0, bad));
        }
        let sum: f64 = weights.iter().sum();
        if (sum - 1.0).abs() > DEFAULT_ABSOLUTE_EPS {
            return Err(ValidationError::invalid_format(
                "weights",
                format!("weights must sum to 1, got {}", sum),
            ));
        }
        Ok(Self(weights))
    }

    /// Scales raw positive values so they sum to 1.
    fn normalized(raw: Vec<f64>) -> Option<Self> {
        let sum: f64 = raw.iter().sum();
        if !sum.is_finite() || sum <= ZERO_EPS {
            return None;
        }
        Some(Self(raw.into_iter().map(|v| v / sum).collect()))
    }

    /// Returns the weights as a slice.
    pub fn weights(&self) -> &[f64] {
        &self.0
    }

    /// Returns the weight at `index`.
    pub fn get(&self, index: usize) -> Option<f64> {
        self.0.get(index).copied()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Sum of all weights (1 within floating error).
    pub fn total(&self) -> f64 {
        self.0.iter().sum()
    }
}

/// Output of priority derivation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriorityResult {
    pub vector: PriorityVector,
    /// Principal eigenvalue (exact for the eigenvector method, estimated otherwise).
    pub lambda_max: f64,
    /// Method that actually produced the vector.
    pub method: PriorityMethod,
    /// True when the eigenvector method failed and the geometric mean was used.
    pub degraded: bool,
    /// Power iterations performed (0 for the geometric mean).
    pub iterations: usize,
}

/// Derives priority vectors from validated matrices.
pub struct PriorityDeriver;

impl PriorityDeriver {
    /// Derives priorities with the requested method.
    ///
    /// # Edge Cases
    /// - Order 1: weight `[1.0]`, lambda_max 1
    /// - Power iteration collapses or does not converge: falls back to the
    ///   geometric mean and flags the result as degraded
    pub fn derive(matrix: &PairwiseMatrix, method: PriorityMethod) -> PriorityResult {
        Self::derive_with_iteration_cap(matrix, method, MAX_POWER_ITERATIONS)
    }

    /// [`Self::derive`] with an explicit power iteration cap.
    pub(crate) fn derive_with_iteration_cap(
        matrix: &PairwiseMatrix,
        method: PriorityMethod,
        max_iterations: usize,
    ) -> PriorityResult {
        if matrix.order() == 1 {
            return PriorityResult {
                vector: PriorityVector(vec![1.0]),
                lambda_max: 1.0,
                method,
                degraded: false,
                iterations: 0,
            };
        }

        let result = match method {
            PriorityMethod::GeometricMean => Self::geometric_mean(matrix),
            PriorityMethod::Eigenvector => match Self::power_iteration(matrix, max_iterations) {
                Some(result) => result,
                None => {
                    warn!(
                        order = matrix.order(),
                        max_iterations,
                        "power iteration did not converge, falling back to geometric mean"
                    );
                    PriorityResult {
                        degraded: true,
                        ..Self::geometric_mean(matrix)
                    }
                }
            },
        };

        debug!(
            order = matrix.order(),
            method = ?result.method,
            lambda_max = result.lambda_max,
            iterations = result.iterations,
            "derived priority vector"
        );
        result
    }

    /// Principal eigenvector via repeated multiplication and renormalization.
    ///
    /// Returns None when the vector norm collapses, lambda_max is not
    /// positive, or the iteration cap is reached.
    fn power_iteration(matrix: &PairwiseMatrix, max_iterations: usize) -> Option<PriorityResult> {
        let n = matrix.order();
        let mut weights = vec![1.0 / n as f64; n];

        for iteration in 1..=max_iterations {
            let product = matrix.multiply(&weights);
            // weights sums to 1, so the product's sum is the Rayleigh-style
            // eigenvalue estimate.
            let lambda: f64 = product.iter().sum();
            if !lambda.is_finite() || lambda <= ZERO_EPS {
                return None;
            }

            let next: Vec<f64> = product.iter().map(|v| v / lambda).collect();
            let change: f64 = next
                .iter()
                .zip(&weights)
                .map(|(a, b)| (a - b).abs())
                .sum();
            weights = next;

            if change < POWER_CONVERGENCE_EPS {
                let vector = PriorityVector::normalized(weights)?;
                return Some(PriorityResult {
                    vector,
                    lambda_max: lambda,
                    method: PriorityMethod::Eigenvector,
                    degraded: false,
                    iterations: iteration,
                });
            }
        }

        None
    }

    /// Row geometric means, normalized; lambda_max estimated as the mean of
    /// `(A w)_i / w_i`.
    fn geometric_mean(matrix: &PairwiseMatrix) -> PriorityResult {
        let n = matrix.order();
        let raw: Vec<f64> = matrix
            .rows()
            .map(|row| (row.iter().map(|a| a.ln()).sum::<f64>() / n as f64).exp())
            .collect();

        // Entries of a validated matrix are positive and finite, so the raw
        // means are too; the uniform vector only guards the degenerate case.
        let vector = PriorityVector::normalized(raw)
            .unwrap_or_else(|| PriorityVector(vec![1.0 / n as f64; n]));
        let lambda_max = Self::estimate_lambda_max(matrix, &vector);

        PriorityResult {
            vector,
            lambda_max,
            method: PriorityMethod::GeometricMean,
            degraded: false,
            iterations: 0,
        }
    }

    /// Estimates lambda_max for an arbitrary weight vector.
    pub fn estimate_lambda_max(matrix: &PairwiseMatrix, vector: &PriorityVector) -> f64 {
        let n = matrix.order();
        if n == 0 {
            return 0.0;
        }
        let product = matrix.multiply(vector.weights());
        product
            .iter()
            .zip(vector.weights())
            .filter(|(_, &w)| w > ZERO_EPS)
            .map(|(aw, w)| aw / w)
            .sum::<f64>()
            / n as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn consistent_matrix() -> PairwiseMatrix {
        PairwiseMatrix::new(vec![
            vec![1.0, 2.0, 4.0],
            vec![0.5, 1.0, 2.0],
            vec![0.25, 0.5, 1.0],
        ])
        .unwrap()
    }

    fn assert_close(actual: f64, expected: f64, eps: f64) {
        assert!(
            (actual - expected).abs() < eps,
            "expected {} got {}",
            expected,
            actual
        );
    }

    #[test]
    fn eigenvector_recovers_transitive_weights() {
        let result = PriorityDeriver::derive(&consistent_matrix(), PriorityMethod::Eigenvector);
        let w = result.vector.weights();
        assert_close(w[0], 4.0 / 7.0, 1e-9);
        assert_close(w[1], 2.0 / 7.0, 1e-9);
        assert_close(w[2], 1.0 / 7.0, 1e-9);
        assert_close(result.lambda_max, 3.0, 1e-9);
        assert!(!result.degraded);
        assert_eq!(result.method, PriorityMethod::Eigenvector);
    }

    #[test]
    fn geometric_mean_recovers_transitive_weights() {
        let result = PriorityDeriver::derive(&consistent_matrix(), PriorityMethod::GeometricMean);
        let w = result.vector.weights();
        assert_close(w[0], 0.5714, 1e-4);
        assert_close(w[1], 0.2857, 1e-4);
        assert_close(w[2], 0.1429, 1e-4);
        assert_close(result.lambda_max, 3.0, 1e-9);
        assert_eq!(result.iterations, 0);
    }

    #[test]
    fn iteration_cap_falls_back_to_geometric_mean() {
        // The uniform start vector needs a second step to settle.
        let result = PriorityDeriver::derive_with_iteration_cap(
            &consistent_matrix(),
            PriorityMethod::Eigenvector,
            1,
        );
        assert!(result.degraded);
        assert_eq!(result.method, PriorityMethod::GeometricMean);
        assert_eq!(result.iterations, 0);
        assert_close(result.vector.total(), 1.0, 1e-9);
        assert_close(result.vector.weights()[0], 4.0 / 7.0, 1e-9);
    }

    #[test]
    fn order_one_is_trivial() {
        let matrix = PairwiseMatrix::new(vec![vec![1.0]]).unwrap();
        let result = PriorityDeriver::derive(&matrix, PriorityMethod::Eigenvector);
        assert_eq!(result.vector.weights(), &[1.0]);
        assert_eq!(result.lambda_max, 1.0);
    }

    #[test]
    fn inconsistent_matrix_has_lambda_above_order() {
        let matrix = PairwiseMatrix::new(vec![
            vec![1.0, 9.0, 1.0 / 9.0],
            vec![1.0 / 9.0, 1.0, 9.0],
            vec![9.0, 1.0 / 9.0, 1.0],
        ])
        .unwrap();
        let result = PriorityDeriver::derive(&matrix, PriorityMethod::Eigenvector);
        assert!(result.lambda_max > 3.0);
        assert_close(result.vector.total(), 1.0, 1e-9);
    }

    #[test]
    fn methods_agree_closely_on_mild_inconsistency() {
        let matrix = PairwiseMatrix::from_upper_triangle(4, &[3.0, 5.0, 7.0, 2.0, 4.0, 3.0]).unwrap();
        let eigen = PriorityDeriver::derive(&matrix, PriorityMethod::Eigenvector);
        let geo = PriorityDeriver::derive(&matrix, PriorityMethod::GeometricMean);
        for (a, b) in eigen.vector.weights().iter().zip(geo.vector.weights()) {
            assert_close(*a, *b, 0.02);
        }
    }

    #[test]
    fn from_weights_validates_sum() {
        assert!(PriorityVector::from_weights(vec![0.5, 0.5]).is_ok());
        assert!(PriorityVector::from_weights(vec![0.5, 0.6]).is_err());
        assert!(PriorityVector::from_weights(vec![1.2, -0.2]).is_err());
        assert!(PriorityVector::from_weights(vec![]).is_err());
    }

    #[test]
    fn method_serializes_camel_case() {
        let json = serde_json::to_string(&PriorityMethod::GeometricMean).unwrap();
        assert_eq!(json, "\"geometricMean\"");
    }

    fn reciprocal_matrix() -> impl Strategy<Value = PairwiseMatrix> {
        (2usize..8).prop_flat_map(|n| {
            let count = n * (n - 1) / 2;
            prop::collection::vec(
                prop_oneof![(1u8..=9).prop_map(f64::from), (1u8..=9).prop_map(|v| 1.0 / f64::from(v))],
                count,
            )
            .prop_map(move |upper| PairwiseMatrix::from_upper_triangle(n, &upper).unwrap())
        })
    }

    proptest! {
        #[test]
        fn priorities_sum_to_one(matrix in reciprocal_matrix()) {
            for method in [PriorityMethod::Eigenvector, PriorityMethod::GeometricMean] {
                let result = PriorityDeriver::derive(&matrix, method);
                prop_assert!((result.vector.total() - 1.0).abs() <= 1e-9);
                prop_assert!(result.vector.weights().iter().all(|w| *w > 0.0));
                prop_assert!(result.lambda_max >= matrix.order() as f64 - 1e-6);
            }
        }
    }
}
