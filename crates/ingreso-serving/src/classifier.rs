//! Fitted binary classifiers.
//!
//! Classifiers are persisted as JSON tagged by `"type"` and evaluated natively.
//! Each one reduces a scaled row to a single decision value whose sign picks one of
//! the two stored class labels.

use crate::error::{ServingError, ServingResult};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A class label as stored by the training side: an integer code or a string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ClassLabel {
    /// Integer-coded class
    Int(i64),
    /// Named class
    Text(String),
}

impl fmt::Display for ClassLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClassLabel::Int(v) => write!(f, "{v}"),
            ClassLabel::Text(s) => f.write_str(s),
        }
    }
}

/// Inference interface shared by all classifier families.
pub trait Classifier: Send + Sync + fmt::Debug {
    /// Short family name for logs and health output.
    fn kind(&self) -> &'static str;

    /// Number of features the classifier was fitted on.
    fn n_features(&self) -> usize;

    /// The two labels, negative class first.
    fn classes(&self) -> &[ClassLabel; 2];

    /// Signed score for one scaled row.
    fn decision_function(&self, row: &[f64]) -> ServingResult<f64>;

    /// Predict the label for one scaled row.
    fn predict(&self, row: &[f64]) -> ServingResult<ClassLabel> {
        let decision = self.decision_function(row)?;
        if !decision.is_finite() {
            return Err(ServingError::prediction(format!(
                "{} produced a non-finite decision value",
                self.kind()
            )));
        }
        let [negative, positive] = self.classes();
        // Ties go to the positive class.
        Ok(if decision >= 0.0 {
            positive.clone()
        } else {
            negative.clone()
        })
    }
}

/// Classifier description as stored on disk.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClassifierSpec {
    /// Kernel support-vector classifier.
    Svc(SvcSpec),
    /// Linear decision function (logistic regression, linear SVM).
    Linear(LinearSpec),
}

/// Fitted support-vector classifier parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SvcSpec {
    /// Negative and positive labels
    pub classes: [ClassLabel; 2],
    /// Kernel function
    pub kernel: Kernel,
    /// One row per support vector
    pub support_vectors: Vec<Vec<f64>>,
    /// Signed weight of each support vector
    pub dual_coef: Vec<f64>,
    /// Bias added to the kernel sum
    pub intercept: f64,
    /// Kernel coefficient (unused by the linear kernel)
    #[serde(default)]
    pub gamma: f64,
    /// Independent term of the poly and sigmoid kernels
    #[serde(default)]
    pub coef0: f64,
    /// Degree of the poly kernel
    #[serde(default = "default_degree")]
    pub degree: u32,
}

/// Fitted linear model parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinearSpec {
    /// Negative and positive labels
    pub classes: [ClassLabel; 2],
    /// One weight per feature
    pub coef: Vec<f64>,
    /// Bias term
    pub intercept: f64,
}

/// Support-vector kernel function.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Kernel {
    /// `exp(-gamma * |u - v|^2)`
    #[default]
    Rbf,
    /// `u . v`
    Linear,
    /// `(gamma * u . v + coef0)^degree`
    Poly,
    /// `tanh(gamma * u . v + coef0)`
    Sigmoid,
}

fn default_degree() -> u32 {
    3
}

/// Validate a spec and turn it into an evaluable classifier.
pub fn build_classifier(spec: ClassifierSpec) -> Result<Box<dyn Classifier>, String> {
    match spec {
        ClassifierSpec::Svc(s) => Ok(Box::new(SvcModel::from_spec(s)?)),
        ClassifierSpec::Linear(s) => Ok(Box::new(LinearModel::from_spec(s)?)),
    }
}

fn check_len(component: &'static str, expected: usize, row: &[f64]) -> ServingResult<()> {
    if row.len() != expected {
        return Err(ServingError::dimension_mismatch(
            component,
            expected,
            row.len(),
        ));
    }
    Ok(())
}

fn dot(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}

fn squared_distance(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b).map(|(x, y)| (x - y) * (x - y)).sum()
}

#[derive(Debug)]
struct SvcModel {
    spec: SvcSpec,
    n_features: usize,
    degree: i32,
}

impl SvcModel {
    fn from_spec(spec: SvcSpec) -> Result<Self, String> {
        let n_features = spec
            .support_vectors
            .first()
            .map(Vec::len)
            .ok_or_else(|| "svc has no support vectors".to_string())?;
        if n_features == 0 {
            return Err("support vectors are empty".to_string());
        }
        if let Some(idx) = spec
            .support_vectors
            .iter()
            .position(|sv| sv.len() != n_features)
        {
            return Err(format!(
                "support_vectors[{idx}] has {} features, expected {n_features}",
                spec.support_vectors[idx].len()
            ));
        }
        if spec.dual_coef.len() != spec.support_vectors.len() {
            return Err(format!(
                "{} dual coefficients for {} support vectors",
                spec.dual_coef.len(),
                spec.support_vectors.len()
            ));
        }
        let params_finite = spec
            .support_vectors
            .iter()
            .flatten()
            .chain(&spec.dual_coef)
            .chain([&spec.intercept, &spec.gamma, &spec.coef0])
            .all(|v| v.is_finite());
        if !params_finite {
            return Err("svc parameters must be finite".to_string());
        }
        if spec.kernel != Kernel::Linear && spec.gamma <= 0.0 {
            return Err(format!("{:?} kernel needs a positive gamma", spec.kernel));
        }
        let degree = i32::try_from(spec.degree)
            .map_err(|_| format!("poly degree {} is too large", spec.degree))?;
        Ok(Self {
            spec,
            n_features,
            degree,
        })
    }

    fn kernel(&self, sv: &[f64], x: &[f64]) -> f64 {
        let s = &self.spec;
        match s.kernel {
            Kernel::Rbf => (-s.gamma * squared_distance(sv, x)).exp(),
            Kernel::Linear => dot(sv, x),
            Kernel::Poly => (s.gamma * dot(sv, x) + s.coef0).powi(self.degree),
            Kernel::Sigmoid => (s.gamma * dot(sv, x) + s.coef0).tanh(),
        }
    }
}

impl Classifier for SvcModel {
    fn kind(&self) -> &'static str {
        "svc"
    }

    fn n_features(&self) -> usize {
        self.n_features
    }

    fn classes(&self) -> &[ClassLabel; 2] {
        &self.spec.classes
    }

    fn decision_function(&self, row: &[f64]) -> ServingResult<f64> {
        check_len("model", self.n_features, row)?;
        let sum: f64 = self
            .spec
            .support_vectors
            .iter()
            .zip(&self.spec.dual_coef)
            .map(|(sv, alpha)| alpha * self.kernel(sv, row))
            .sum();
        Ok(sum + self.spec.intercept)
    }
}

#[derive(Debug)]
struct LinearModel {
    spec: LinearSpec,
}

impl LinearModel {
    fn from_spec(spec: LinearSpec) -> Result<Self, String> {
        if spec.coef.is_empty() {
            return Err("linear model has no coefficients".to_string());
        }
        if !spec.coef.iter().chain([&spec.intercept]).all(|v| v.is_finite()) {
            return Err("linear parameters must be finite".to_string());
        }
        Ok(Self { spec })
    }
}

impl Classifier for LinearModel {
    fn kind(&self) -> &'static str {
        "linear"
    }

    fn n_features(&self) -> usize {
        self.spec.coef.len()
    }

    fn classes(&self) -> &[ClassLabel; 2] {
        &self.spec.classes
    }

    fn decision_function(&self, row: &[f64]) -> ServingResult<f64> {
        check_len("model", self.spec.coef.len(), row)?;
        Ok(dot(&self.spec.coef, row) + self.spec.intercept)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labels() -> [ClassLabel; 2] {
        [
            ClassLabel::Text("<=50K".to_string()),
            ClassLabel::Text(">50K".to_string()),
        ]
    }

    fn rbf_spec() -> SvcSpec {
        SvcSpec {
            classes: labels(),
            kernel: Kernel::Rbf,
            support_vectors: vec![vec![0.0, 0.0], vec![2.0, 2.0]],
            dual_coef: vec![-1.0, 1.0],
            intercept: 0.0,
            gamma: 0.5,
            coef0: 0.0,
            degree: 3,
        }
    }

    #[test]
    fn test_rbf_picks_nearest_support_vector() {
        let model = build_classifier(ClassifierSpec::Svc(rbf_spec())).unwrap();
        assert_eq!(model.kind(), "svc");
        assert_eq!(model.n_features(), 2);
        assert_eq!(model.predict(&[0.1, -0.1]).unwrap(), labels()[0]);
        assert_eq!(model.predict(&[1.9, 2.2]).unwrap(), labels()[1]);
    }

    #[test]
    fn test_rbf_decision_value() {
        let model = build_classifier(ClassifierSpec::Svc(rbf_spec())).unwrap();
        // -exp(0) + exp(-0.5 * 8)
        let expected = -1.0 + (-4.0f64).exp();
        let d = model.decision_function(&[0.0, 0.0]).unwrap();
        assert!((d - expected).abs() < 1e-12);
    }

    #[test]
    fn test_tie_goes_to_positive_class() {
        let model = build_classifier(ClassifierSpec::Svc(rbf_spec())).unwrap();
        assert_eq!(model.predict(&[1.0, 1.0]).unwrap(), labels()[1]);
    }

    #[test]
    fn test_poly_and_sigmoid_kernels() {
        let mut spec = rbf_spec();
        spec.kernel = Kernel::Poly;
        spec.degree = 2;
        spec.coef0 = 1.0;
        let model = build_classifier(ClassifierSpec::Svc(spec.clone())).unwrap();
        // -(0.5*0 + 1)^2 + (0.5*4 + 1)^2 = -1 + 9
        let d = model.decision_function(&[1.0, 1.0]).unwrap();
        assert!((d - 8.0).abs() < 1e-12);

        spec.kernel = Kernel::Sigmoid;
        let model = build_classifier(ClassifierSpec::Svc(spec)).unwrap();
        let d = model.decision_function(&[1.0, 1.0]).unwrap();
        assert!((d - (3.0f64.tanh() - 1.0f64.tanh())).abs() < 1e-12);
    }

    #[test]
    fn test_linear_model() {
        let spec = LinearSpec {
            classes: [ClassLabel::Int(0), ClassLabel::Int(1)],
            coef: vec![1.0, -2.0],
            intercept: 0.5,
        };
        let model = build_classifier(ClassifierSpec::Linear(spec)).unwrap();
        assert_eq!(model.predict(&[1.0, 1.0]).unwrap(), ClassLabel::Int(0));
        assert_eq!(model.predict(&[3.0, 1.0]).unwrap(), ClassLabel::Int(1));
    }

    #[test]
    fn test_wrong_row_length() {
        let model = build_classifier(ClassifierSpec::Svc(rbf_spec())).unwrap();
        let err = model.predict(&[1.0, 2.0, 3.0]).unwrap_err();
        assert_eq!(err.to_string(), "model expects 2 features, got 3");
    }

    #[test]
    fn test_non_finite_decision() {
        let spec = LinearSpec {
            classes: labels(),
            coef: vec![1.0],
            intercept: 0.0,
        };
        let model = build_classifier(ClassifierSpec::Linear(spec)).unwrap();
        assert!(matches!(
            model.predict(&[f64::NAN]),
            Err(ServingError::PredictionError(_))
        ));
    }

    #[test]
    fn test_invalid_specs_rejected() {
        let mut ragged = rbf_spec();
        ragged.support_vectors[1].push(1.0);
        assert!(build_classifier(ClassifierSpec::Svc(ragged)).is_err());

        let mut short_coef = rbf_spec();
        short_coef.dual_coef.pop();
        assert!(build_classifier(ClassifierSpec::Svc(short_coef)).is_err());

        let mut no_gamma = rbf_spec();
        no_gamma.gamma = 0.0;
        assert!(build_classifier(ClassifierSpec::Svc(no_gamma)).is_err());
    }

    #[test]
    fn test_oversized_degree_rejected() {
        let mut spec = rbf_spec();
        spec.kernel = Kernel::Poly;
        spec.degree = u32::MAX;
        let err = build_classifier(ClassifierSpec::Svc(spec)).unwrap_err();
        assert_eq!(err, format!("poly degree {} is too large", u32::MAX));

        let mut spec = rbf_spec();
        spec.kernel = Kernel::Poly;
        spec.degree = i32::MAX as u32;
        assert!(build_classifier(ClassifierSpec::Svc(spec)).is_ok());
    }

    #[test]
    fn test_classifier_is_debug() {
        let model = build_classifier(ClassifierSpec::Svc(rbf_spec())).unwrap();
        assert!(format!("{model:?}").starts_with("SvcModel"));
    }

    #[test]
    fn test_label_serde_and_display() {
        let labels: Vec<ClassLabel> = serde_json::from_str(r#"[0, " >50K"]"#).unwrap();
        assert_eq!(labels[0], ClassLabel::Int(0));
        assert_eq!(labels[0].to_string(), "0");
        assert_eq!(labels[1].to_string(), " >50K");
    }
}
