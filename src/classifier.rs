//! Binary spam/ham classifiers consumed from frozen artifacts

use crate::error::{ArtifactError, Result};
use crate::vectorizer::FeatureVector;
use serde::{Deserialize, Serialize};
use std::fmt;

const KIND: &str = "classifier";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Label {
    Ham,
    Spam,
}

impl Label {
    pub fn as_str(&self) -> &'static str {
        match self {
            Label::Ham => "ham",
            Label::Spam => "spam",
        }
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Class label as stored in the artifact, e.g. `1` or `"spam"`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ClassLabel {
    Int(i64),
    Text(String),
}

impl ClassLabel {
    /// The positive class is `1` or `"spam"` in any case
    pub fn is_positive(&self) -> bool {
        match self {
            ClassLabel::Int(value) => *value == 1,
            ClassLabel::Text(value) => value.eq_ignore_ascii_case("spam"),
        }
    }
}

/// Probabilities for `[ham, spam]`, summing to 1
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ClassProbabilities {
    pub ham: f64,
    pub spam: f64,
}

impl ClassProbabilities {
    pub fn of(&self, label: Label) -> f64 {
        match label {
            Label::Ham => self.ham,
            Label::Spam => self.spam,
        }
    }
}

/// Maps a feature vector to a label and a distribution over both labels
pub trait BinaryClassifier {
    fn predict_probabilities(&self, features: &FeatureVector) -> ClassProbabilities;

    fn predict(&self, features: &FeatureVector) -> Label;

    /// Number of features the classifier was fitted on
    fn dimension(&self) -> usize;

    fn kind(&self) -> &'static str;
}

/// Platt scaling parameters, `p = 1 / (1 + exp(a * score + b))`
#[derive(Debug, Clone, Copy, Deserialize, Serialize)]
pub struct PlattCalibration {
    pub a: f64,
    pub b: f64,
}

impl PlattCalibration {
    pub fn probability(&self, score: f64) -> f64 {
        sigmoid(-(self.a * score + self.b))
    }
}

/// On-disk form of the classifier, tagged by `kind`
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ClassifierArtifact {
    MultinomialNb {
        classes: [ClassLabel; 2],
        class_log_prior: [f64; 2],
        feature_log_prob: [Vec<f64>; 2],
    },
    LogisticRegression {
        classes: [ClassLabel; 2],
        coef: Vec<f64>,
        intercept: f64,
    },
    LinearSvm {
        classes: [ClassLabel; 2],
        coef: Vec<f64>,
        intercept: f64,
        calibration: PlattCalibration,
    },
}

/// Classifier loaded from a [`ClassifierArtifact`]
#[derive(Debug, Clone)]
pub struct LoadedClassifier {
    // index of the spam column in the artifact's class order
    spam_column: usize,
    model: LinearModel,
}

#[derive(Debug, Clone)]
enum LinearModel {
    NaiveBayes {
        class_log_prior: [f64; 2],
        feature_log_prob: [Vec<f64>; 2],
    },
    Logistic {
        coef: Vec<f64>,
        intercept: f64,
    },
    Svm {
        coef: Vec<f64>,
        intercept: f64,
        calibration: PlattCalibration,
    },
}

impl LoadedClassifier {
    pub fn from_artifact(artifact: ClassifierArtifact) -> Result<Self> {
        let (classes, model) = match artifact {
            ClassifierArtifact::MultinomialNb {
                classes,
                class_log_prior,
                feature_log_prob,
            } => {
                check_finite("class_log_prior", &class_log_prior)?;
                if feature_log_prob[0].len() != feature_log_prob[1].len() {
                    return Err(invalid(format!(
                        "feature_log_prob rows differ in length ({} vs {})",
                        feature_log_prob[0].len(),
                        feature_log_prob[1].len()
                    )));
                }
                check_finite("feature_log_prob", &feature_log_prob[0])?;
                check_finite("feature_log_prob", &feature_log_prob[1])?;
                (
                    classes,
                    LinearModel::NaiveBayes {
                        class_log_prior,
                        feature_log_prob,
                    },
                )
            }
            ClassifierArtifact::LogisticRegression {
                classes,
                coef,
                intercept,
            } => {
                check_finite("coef", &coef)?;
                check_finite("intercept", &[intercept])?;
                (classes, LinearModel::Logistic { coef, intercept })
            }
            ClassifierArtifact::LinearSvm {
                classes,
                coef,
                intercept,
                calibration,
            } => {
                check_finite("coef", &coef)?;
                check_finite("intercept", &[intercept])?;
                check_finite("calibration", &[calibration.a, calibration.b])?;
                (
                    classes,
                    LinearModel::Svm {
                        coef,
                        intercept,
                        calibration,
                    },
                )
            }
        };

        let spam_column = match (classes[0].is_positive(), classes[1].is_positive()) {
            (false, true) => 1,
            (true, false) => 0,
            _ => {
                return Err(invalid(format!(
                    "classes {classes:?} must contain exactly one spam class (1 or \"spam\")"
                )))
            }
        };

        Ok(Self { spam_column, model })
    }

    /// Probability of the artifact's second class (`classes[1]`)
    fn second_column_probability(&self, features: &FeatureVector) -> f64 {
        match &self.model {
            LinearModel::NaiveBayes {
                class_log_prior,
                feature_log_prob,
            } => {
                let jll0 = class_log_prior[0] + features.dot(&feature_log_prob[0]);
                let jll1 = class_log_prior[1] + features.dot(&feature_log_prob[1]);
                // log-sum-exp keeps the softmax stable for long messages
                let max = jll0.max(jll1);
                let e0 = (jll0 - max).exp();
                let e1 = (jll1 - max).exp();
                e1 / (e0 + e1)
            }
            LinearModel::Logistic { coef, intercept } => sigmoid(features.dot(coef) + intercept),
            LinearModel::Svm {
                coef,
                intercept,
                calibration,
            } => calibration.probability(features.dot(coef) + intercept),
        }
    }
}

impl BinaryClassifier for LoadedClassifier {
    fn predict_probabilities(&self, features: &FeatureVector) -> ClassProbabilities {
        let second = self.second_column_probability(features).clamp(0.0, 1.0);
        let columns = [1.0 - second, second];
        ClassProbabilities {
            ham: columns[1 - self.spam_column],
            spam: columns[self.spam_column],
        }
    }

    fn predict(&self, features: &FeatureVector) -> Label {
        let second = self.second_column_probability(features);
        // argmax over the artifact's columns, ties go to the first column
        let column = usize::from(second > 1.0 - second);
        if column == self.spam_column {
            Label::Spam
        } else {
            Label::Ham
        }
    }

    fn dimension(&self) -> usize {
        match &self.model {
            LinearModel::NaiveBayes {
                feature_log_prob, ..
            } => feature_log_prob[0].len(),
            LinearModel::Logistic { coef, .. } | LinearModel::Svm { coef, .. } => coef.len(),
        }
    }

    fn kind(&self) -> &'static str {
        match self.model {
            LinearModel::NaiveBayes { .. } => "multinomial_nb",
            LinearModel::Logistic { .. } => "logistic_regression",
            LinearModel::Svm { .. } => "linear_svm",
        }
    }
}

pub fn sigmoid(z: f64) -> f64 {
    if z >= 0.0 {
        1.0 / (1.0 + (-z).exp())
    } else {
        let e = z.exp();
        e / (1.0 + e)
    }
}

fn check_finite(field: &str, values: &[f64]) -> Result<()> {
    match values.iter().position(|v| !v.is_finite()) {
        Some(pos) => Err(invalid(format!("{field}[{pos}] is not finite"))),
        None => Ok(()),
    }
}

fn invalid(details: String) -> ArtifactError {
    ArtifactError::Invalid {
        kind: KIND,
        details,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn features(values: &[f64]) -> FeatureVector {
        FeatureVector::new(values.len(), values.iter().copied().enumerate().collect())
    }

    fn logistic(coef: Vec<f64>, intercept: f64) -> LoadedClassifier {
        LoadedClassifier::from_artifact(ClassifierArtifact::LogisticRegression {
            classes: [ClassLabel::Int(0), ClassLabel::Int(1)],
            coef,
            intercept,
        })
        .unwrap()
    }

    #[test]
    fn test_logistic_regression_probabilities() {
        let clf = logistic(vec![2.0, -1.0], 0.0);
        let probs = clf.predict_probabilities(&features(&[1.0, 0.0]));
        assert!((probs.spam - sigmoid(2.0)).abs() < 1e-12);
        assert!((probs.ham + probs.spam - 1.0).abs() < 1e-12);
        assert_eq!(clf.predict(&features(&[1.0, 0.0])), Label::Spam);
        assert_eq!(clf.predict(&features(&[0.0, 1.0])), Label::Ham);
    }

    #[test]
    fn test_tie_goes_to_first_class() {
        let clf = logistic(vec![0.0], 0.0);
        assert_eq!(clf.predict(&features(&[1.0])), Label::Ham);

        let flipped = LoadedClassifier::from_artifact(ClassifierArtifact::LogisticRegression {
            classes: [ClassLabel::Text("spam".into()), ClassLabel::Text("ham".into())],
            coef: vec![0.0],
            intercept: 0.0,
        })
        .unwrap();
        assert_eq!(flipped.predict(&features(&[1.0])), Label::Spam);
    }

    #[test]
    fn test_string_classes_in_reverse_order() {
        let clf = LoadedClassifier::from_artifact(ClassifierArtifact::LogisticRegression {
            classes: [ClassLabel::Text("SPAM".into()), ClassLabel::Text("ham".into())],
            coef: vec![3.0],
            intercept: 0.0,
        })
        .unwrap();
        // positive score favours classes[1], which is ham here
        let probs = clf.predict_probabilities(&features(&[1.0]));
        assert!((probs.ham - sigmoid(3.0)).abs() < 1e-12);
        assert_eq!(clf.predict(&features(&[1.0])), Label::Ham);
    }

    #[test]
    fn test_naive_bayes_matches_manual_softmax() {
        let clf = LoadedClassifier::from_artifact(ClassifierArtifact::MultinomialNb {
            classes: [ClassLabel::Int(0), ClassLabel::Int(1)],
            class_log_prior: [0.6_f64.ln(), 0.4_f64.ln()],
            feature_log_prob: [vec![0.7_f64.ln(), 0.3_f64.ln()], vec![0.2_f64.ln(), 0.8_f64.ln()]],
        })
        .unwrap();
        let x = features(&[0.0, 1.0]);
        let ham = 0.6 * 0.3;
        let spam = 0.4 * 0.8;
        let probs = clf.predict_probabilities(&x);
        assert!((probs.spam - spam / (ham + spam)).abs() < 1e-12);
        assert_eq!(clf.predict(&x), Label::Spam);

        // an empty vector falls back to the priors
        let empty = clf.predict_probabilities(&FeatureVector::new(2, Vec::new()));
        assert!((empty.ham - 0.6).abs() < 1e-12);
        assert_eq!(clf.dimension(), 2);
        assert_eq!(clf.kind(), "multinomial_nb");
    }

    #[test]
    fn test_naive_bayes_survives_large_log_likelihoods() {
        let clf = LoadedClassifier::from_artifact(ClassifierArtifact::MultinomialNb {
            classes: [ClassLabel::Int(0), ClassLabel::Int(1)],
            class_log_prior: [-0.5, -0.9],
            feature_log_prob: [vec![-900.0], vec![-1000.0]],
        })
        .unwrap();
        let probs = clf.predict_probabilities(&features(&[3.0]));
        assert!(probs.ham.is_finite() && probs.spam.is_finite());
        assert!(probs.ham > 0.99);
    }

    #[test]
    fn test_linear_svm_uses_platt_calibration() {
        let calibration = PlattCalibration { a: -1.5, b: 0.2 };
        let clf = LoadedClassifier::from_artifact(ClassifierArtifact::LinearSvm {
            classes: [ClassLabel::Int(0), ClassLabel::Int(1)],
            coef: vec![1.0],
            intercept: -0.5,
            calibration,
        })
        .unwrap();
        let probs = clf.predict_probabilities(&features(&[2.0]));
        let expected = 1.0 / (1.0 + (-1.5_f64 * 1.5 + 0.2).exp());
        assert!((probs.spam - expected).abs() < 1e-12);
        assert_eq!(clf.kind(), "linear_svm");
    }

    #[test]
    fn test_rejects_ambiguous_classes() {
        let err = LoadedClassifier::from_artifact(ClassifierArtifact::LogisticRegression {
            classes: [ClassLabel::Int(1), ClassLabel::Text("spam".into())],
            coef: vec![1.0],
            intercept: 0.0,
        })
        .unwrap_err();
        assert!(err.to_string().contains("exactly one spam class"));
    }

    #[test]
    fn test_rejects_non_finite_weights() {
        let err = LoadedClassifier::from_artifact(ClassifierArtifact::LogisticRegression {
            classes: [ClassLabel::Int(0), ClassLabel::Int(1)],
            coef: vec![1.0, f64::INFINITY],
            intercept: 0.0,
        })
        .unwrap_err();
        assert!(err.to_string().contains("coef[1]"));
    }

    #[test]
    fn test_artifact_json_tagging() {
        let json = r#"{"kind": "logistic_regression", "classes": ["ham", "spam"], "coef": [0.5], "intercept": -0.1}"#;
        let artifact: ClassifierArtifact = serde_json::from_str(json).unwrap();
        let clf = LoadedClassifier::from_artifact(artifact).unwrap();
        assert_eq!(clf.kind(), "logistic_regression");

        let missing_calibration = r#"{"kind": "linear_svm", "classes": [0, 1], "coef": [0.5], "intercept": 0.0}"#;
        assert!(serde_json::from_str::<ClassifierArtifact>(missing_calibration).is_err());
    }
}
