//! Startup loading of the vectorizer/classifier pair

use crate::classifier::{BinaryClassifier, ClassifierArtifact, LoadedClassifier};
use crate::error::{ArtifactError, Result};
use crate::vectorizer::{TextVectorizer, TfidfArtifact, TfidfVectorizer};
use serde::de::DeserializeOwned;
use std::fs;
use std::path::Path;
use std::sync::Arc;

/// The frozen artifact pair, read-only after load
#[derive(Debug)]
pub struct ModelArtifacts {
    pub vectorizer: TfidfVectorizer,
    pub classifier: LoadedClassifier,
}

/// Process-wide handle shared by every inference call
pub type SharedArtifacts = Arc<ModelArtifacts>;

impl ModelArtifacts {
    /// Loads both artifacts and checks that they agree on the feature dimension.
    pub fn load(model_path: &Path, vectorizer_path: &Path) -> Result<Self> {
        let vectorizer_artifact: TfidfArtifact = read_json("vectorizer", vectorizer_path)?;
        let vectorizer = TfidfVectorizer::from_artifact(vectorizer_artifact)?;
        log::info!(
            "Loaded vectorizer from {} ({} terms)",
            vectorizer_path.display(),
            vectorizer.vocabulary_size()
        );

        let classifier_artifact: ClassifierArtifact = read_json("classifier", model_path)?;
        let classifier = LoadedClassifier::from_artifact(classifier_artifact)?;
        log::info!(
            "Loaded {} classifier from {}",
            classifier.kind(),
            model_path.display()
        );

        Self::new(vectorizer, classifier)
    }

    pub fn new(vectorizer: TfidfVectorizer, classifier: LoadedClassifier) -> Result<Self> {
        if vectorizer.dimension() != classifier.dimension() {
            return Err(ArtifactError::DimensionMismatch {
                vectorizer: vectorizer.dimension(),
                classifier: classifier.dimension(),
            });
        }
        Ok(Self {
            vectorizer,
            classifier,
        })
    }

    pub fn into_shared(self) -> SharedArtifacts {
        Arc::new(self)
    }
}

fn read_json<T: DeserializeOwned>(kind: &'static str, path: &Path) -> Result<T> {
    if !path.exists() {
        return Err(ArtifactError::Missing {
            kind,
            path: path.to_path_buf(),
        });
    }
    let content = fs::read_to_string(path).map_err(|source| ArtifactError::Io {
        kind,
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&content).map_err(|source| ArtifactError::Parse {
        kind,
        path: path.to_path_buf(),
        source,
    })
}
