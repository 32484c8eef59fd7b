//! Binary logistic regression
//!
//! L2-regularized, intercept unpenalized, fitted with Newton iterations on
//! the 3x3 system `[intercept, w_a, w_b]`.
//!
//! Objective: `C * sum(logloss) + 0.5 * |w|^2`, equivalently
//! `sum(logloss) + |w|^2 / (2C)`.

use nalgebra::{Matrix3, Vector3};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, instrument};

/// Classifier fitting error
#[derive(Debug, Error, PartialEq)]
pub enum TrainError {
    /// No rows to fit on
    #[error("cannot fit on an empty dataset")]
    EmptyDataset,

    /// Feature and label counts differ
    #[error("feature rows ({features}) and labels ({labels}) differ in length")]
    LengthMismatch { features: usize, labels: usize },

    /// Label outside {0, 1}
    #[error("label {label} at row {row} is not binary")]
    InvalidLabel { row: usize, label: u8 },

    /// Only one class present in the labels
    #[error("needs samples of at least 2 classes, got only class {class}")]
    SingleClass { class: u8 },

    /// Hessian not positive definite
    #[error("singular system at iteration {iteration}")]
    SingularSystem { iteration: usize },

    /// Step norm never dropped below tolerance
    #[error("did not converge within {max_iter} iterations")]
    NotConverged { max_iter: usize },
}

/// Logistic regression hyper-parameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LogisticRegression {
    /// Inverse regularization strength
    pub c: f64,
    /// Newton iteration cap
    pub max_iter: usize,
    /// Convergence tolerance on the step norm
    pub tol: f64,
    /// Recorded seed; the Newton solver itself is deterministic
    pub random_state: u64,
}

impl Default for LogisticRegression {
    fn default() -> Self {
        Self {
            c: 1.0,
            max_iter: 100,
            tol: 1e-8,
            random_state: 42,
        }
    }
}

/// Fitted model
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogisticModel {
    pub intercept: f64,
    pub coefficients: [f64; 2],
    /// Iterations used by the solver
    pub n_iter: usize,
    pub params: LogisticRegression,
}

impl LogisticRegression {
    /// Human readable model family
    pub const MODEL_TYPE: &'static str = "Logistic Regression";

    /// Fit on feature rows and binary labels
    #[instrument(name = "logistic_regression_fit", skip(self, x, y), fields(rows = x.len()))]
    pub fn fit(&self, x: &[[f64; 2]], y: &[u8]) -> Result<LogisticModel, TrainError> {
        if x.is_empty() {
            return Err(TrainError::EmptyDataset);
        }
        if x.len() != y.len() {
            return Err(TrainError::LengthMismatch {
                features: x.len(),
                labels: y.len(),
            });
        }
        if let Some((row, &label)) = y.iter().enumerate().find(|(_, l)| **l > 1) {
            return Err(TrainError::InvalidLabel { row, label });
        }
        let positives = y.iter().filter(|&&l| l == 1).count();
        if positives == 0 || positives == y.len() {
            return Err(TrainError::SingleClass { class: y[0] });
        }

        let penalty = 1.0 / self.c;
        let mut beta = Vector3::<f64>::zeros();

        for iteration in 1..=self.max_iter {
            let mut grad = Vector3::<f64>::zeros();
            let mut hess = Matrix3::<f64>::zeros();

            for (xi, &yi) in x.iter().zip(y) {
                let z = Vector3::new(1.0, xi[0], xi[1]);
                let p = sigmoid(beta.dot(&z));
                grad += z * (p - f64::from(yi));
                hess += (z * z.transpose()) * (p * (1.0 - p));
            }

            // intercept (index 0) is not regularized
            for i in 1..3 {
                grad[i] += penalty * beta[i];
                hess[(i, i)] += penalty;
            }

            let step = hess
                .cholesky()
                .ok_or(TrainError::SingularSystem { iteration })?
                .solve(&grad);
            beta -= step;

            if step.norm() < self.tol {
                debug!(iteration, "newton solver converged");
                return Ok(LogisticModel {
                    intercept: beta[0],
                    coefficients: [beta[1], beta[2]],
                    n_iter: iteration,
                    params: *self,
                });
            }
        }

        Err(TrainError::NotConverged {
            max_iter: self.max_iter,
        })
    }
}

impl LogisticModel {
    /// Raw decision value
    pub fn decision(&self, x: &[f64; 2]) -> f64 {
        self.intercept + self.coefficients[0] * x[0] + self.coefficients[1] * x[1]
    }

    /// Probability of class 1
    pub fn predict_proba(&self, x: &[f64; 2]) -> f64 {
        sigmoid(self.decision(x))
    }

    /// Predicted class
    pub fn predict(&self, x: &[f64; 2]) -> u8 {
        u8::from(self.decision(x) > 0.0)
    }

    /// Fraction of rows whose prediction equals the label
    pub fn accuracy(&self, x: &[[f64; 2]], y: &[u8]) -> f64 {
        if x.is_empty() {
            return 0.0;
        }
        let correct = x
            .iter()
            .zip(y)
            .filter(|(xi, yi)| self.predict(xi) == **yi)
            .count();
        correct as f64 / x.len() as f64
    }
}

fn sigmoid(z: f64) -> f64 {
    if z >= 0.0 {
        1.0 / (1.0 + (-z).exp())
    } else {
        let e = z.exp();
        e / (1.0 + e)
    }
}
