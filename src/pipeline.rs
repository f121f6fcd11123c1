//! normalize → vectorize → classify

use crate::artifacts::ModelArtifacts;
use crate::classifier::{BinaryClassifier, ClassProbabilities, Label};
use crate::error::InputError;
use crate::normalizer::normalize;
use crate::vectorizer::TextVectorizer;
use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Prediction {
    pub label: Label,
    /// Probability of `label`, in `[0, 1]`
    pub confidence: f64,
    pub probabilities: ClassProbabilities,
    pub normalized_text: String,
}

impl Prediction {
    pub fn confidence_percent(&self) -> f64 {
        self.confidence * 100.0
    }

    pub fn is_spam(&self) -> bool {
        self.label == Label::Spam
    }
}

impl fmt::Display for Prediction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.label {
            Label::Spam => write!(
                f,
                "🚨 SPAM Message | Confidence: {:.2}%",
                self.confidence_percent()
            ),
            Label::Ham => write!(
                f,
                "✅ HAM Message | Confidence: {:.2}%",
                self.confidence_percent()
            ),
        }
    }
}

/// Rejects messages that are empty once surrounding whitespace is trimmed
pub fn validate_message(text: &str) -> Result<&str, InputError> {
    if text.trim().is_empty() {
        Err(InputError::EmptyMessage)
    } else {
        Ok(text)
    }
}

/// Classifies `text` with the loaded artifact pair
pub fn classify(text: &str, artifacts: &ModelArtifacts) -> Result<Prediction, InputError> {
    classify_with(text, &artifacts.vectorizer, &artifacts.classifier)
}

/// Classifies `text` with any vectorizer/classifier pair.
///
/// Empty input is rejected before normalization and never reaches either
/// collaborator.
pub fn classify_with<V, C>(text: &str, vectorizer: &V, classifier: &C) -> Result<Prediction, InputError>
where
    V: TextVectorizer + ?Sized,
    C: BinaryClassifier + ?Sized,
{
    let text = validate_message(text)?;

    let normalized_text = normalize(text);
    let features = vectorizer.transform(&normalized_text);
    let label = classifier.predict(&features);
    let probabilities = classifier.predict_probabilities(&features);
    let confidence = probabilities.of(label);

    log::debug!(
        "Classified message as {label} (ham={:.4}, spam={:.4})",
        probabilities.ham,
        probabilities.spam
    );

    Ok(Prediction {
        label,
        confidence,
        probabilities,
        normalized_text,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vectorizer::FeatureVector;
    use std::cell::{Cell, RefCell};

    /// One feature per token containing "win"
    #[derive(Default)]
    struct RecordingVectorizer {
        seen: RefCell<Vec<String>>,
    }

    impl TextVectorizer for RecordingVectorizer {
        fn transform(&self, text: &str) -> FeatureVector {
            self.seen.borrow_mut().push(text.to_string());
            let hits = text.split(' ').filter(|t| t.contains("win")).count();
            FeatureVector::new(1, vec![(0, hits as f64)])
        }

        fn dimension(&self) -> usize {
            1
        }
    }

    #[derive(Default)]
    struct CountingClassifier {
        calls: Cell<usize>,
    }

    impl BinaryClassifier for CountingClassifier {
        fn predict_probabilities(&self, features: &FeatureVector) -> ClassProbabilities {
            self.calls.set(self.calls.get() + 1);
            let spam = if features.get(0) > 0.0 { 0.9 } else { 0.25 };
            ClassProbabilities {
                ham: 1.0 - spam,
                spam,
            }
        }

        fn predict(&self, features: &FeatureVector) -> Label {
            if features.get(0) > 0.0 {
                Label::Spam
            } else {
                Label::Ham
            }
        }

        fn dimension(&self) -> usize {
            1
        }

        fn kind(&self) -> &'static str {
            "counting"
        }
    }

    #[test]
    fn test_empty_input_never_reaches_collaborators() {
        let vectorizer = RecordingVectorizer::default();
        let classifier = CountingClassifier::default();

        for text in ["", "   ", "\n\t  \r\n"] {
            let result = classify_with(text, &vectorizer, &classifier);
            assert_eq!(result, Err(InputError::EmptyMessage));
        }
        assert!(vectorizer.seen.borrow().is_empty());
        assert_eq!(classifier.calls.get(), 0);
    }

    #[test]
    fn test_punctuation_only_input_is_still_classified() {
        let vectorizer = RecordingVectorizer::default();
        let classifier = CountingClassifier::default();

        let prediction = classify_with("!!! 123", &vectorizer, &classifier).unwrap();
        assert_eq!(prediction.label, Label::Ham);
        assert_eq!(vectorizer.seen.borrow().as_slice(), &[String::new()]);
    }

    #[test]
    fn test_vectorizer_sees_normalized_text() {
        let vectorizer = RecordingVectorizer::default();
        let classifier = CountingClassifier::default();

        let prediction = classify_with("WIN!!! a FREE prize, txt 80082", &vectorizer, &classifier)
            .unwrap();
        assert_eq!(
            vectorizer.seen.borrow().as_slice(),
            &["win a free prize txt".to_string()]
        );
        assert!(prediction.is_spam());
        assert!((prediction.confidence - 0.9).abs() < 1e-12);
        assert_eq!(prediction.to_string(), "🚨 SPAM Message | Confidence: 90.00%");
    }

    #[test]
    fn test_ham_display_uses_ham_probability() {
        let vectorizer = RecordingVectorizer::default();
        let classifier = CountingClassifier::default();

        let prediction = classify_with("see you at lunch", &vectorizer, &classifier).unwrap();
        assert_eq!(prediction.label, Label::Ham);
        assert_eq!(prediction.to_string(), "✅ HAM Message | Confidence: 75.00%");
    }

    #[test]
    fn test_validate_message() {
        assert_eq!(validate_message(" hi "), Ok(" hi "));
        assert_eq!(validate_message("  "), Err(InputError::EmptyMessage));
    }
}
