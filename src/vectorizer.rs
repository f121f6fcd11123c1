//! TF-IDF feature extraction over a frozen vocabulary

use crate::error::{ArtifactError, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

const KIND: &str = "vectorizer";

pub const DEFAULT_TOKEN_PATTERN: &str = r"(?u)\b\w\w+\b";

/// Sparse, fixed-dimension feature vector.
///
/// Entries are sorted by index and never contain explicit zeros.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureVector {
    dimension: usize,
    entries: Vec<(usize, f64)>,
}

impl FeatureVector {
    pub fn new(dimension: usize, mut entries: Vec<(usize, f64)>) -> Self {
        entries.retain(|&(idx, value)| idx < dimension && value != 0.0);
        entries.sort_by_key(|&(idx, _)| idx);
        Self { dimension, entries }
    }

    pub fn dimension(&self) -> usize {
        self.dimension
    }

    pub fn entries(&self) -> &[(usize, f64)] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, idx: usize) -> f64 {
        self.entries
            .binary_search_by_key(&idx, |&(i, _)| i)
            .map_or(0.0, |pos| self.entries[pos].1)
    }

    /// Dot product against a dense weight row of the same dimension
    pub fn dot(&self, weights: &[f64]) -> f64 {
        self.entries
            .iter()
            .map(|&(idx, value)| weights.get(idx).copied().unwrap_or(0.0) * value)
            .sum()
    }
}

/// Maps a normalized message to a feature vector
pub trait TextVectorizer {
    fn transform(&self, text: &str) -> FeatureVector;

    fn dimension(&self) -> usize;
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Norm {
    #[default]
    L2,
    L1,
    None,
}

/// On-disk form of the TF-IDF vectorizer
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TfidfArtifact {
    pub vocabulary: BTreeMap<String, usize>,
    pub idf: Vec<f64>,
    #[serde(default = "default_token_pattern")]
    pub token_pattern: String,
    #[serde(default)]
    pub sublinear_tf: bool,
    #[serde(default)]
    pub norm: Norm,
}

fn default_token_pattern() -> String {
    DEFAULT_TOKEN_PATTERN.to_string()
}

/// TF-IDF vectorizer with a vocabulary learned offline.
///
/// Tokens outside the vocabulary are ignored.
#[derive(Debug, Clone)]
pub struct TfidfVectorizer {
    vocabulary: HashMap<String, usize>,
    idf: Vec<f64>,
    token_regex: Regex,
    sublinear_tf: bool,
    norm: Norm,
}

impl TfidfVectorizer {
    pub fn from_artifact(artifact: TfidfArtifact) -> Result<Self> {
        let size = artifact.vocabulary.len();
        if size == 0 {
            return Err(invalid("vocabulary is empty".to_string()));
        }
        if artifact.idf.len() != size {
            return Err(invalid(format!(
                "idf has {} weights for a vocabulary of {size} terms",
                artifact.idf.len()
            )));
        }
        if let Some(pos) = artifact.idf.iter().position(|w| !w.is_finite()) {
            return Err(invalid(format!("idf weight {pos} is not finite")));
        }

        let mut seen = vec![false; size];
        for (term, &idx) in &artifact.vocabulary {
            if idx >= size || seen[idx] {
                return Err(invalid(format!(
                    "term '{term}' has index {idx}, indices must be a permutation of 0..{size}"
                )));
            }
            seen[idx] = true;
        }

        let token_regex = Regex::new(&artifact.token_pattern)
            .map_err(|e| invalid(format!("bad token pattern: {e}")))?;

        Ok(Self {
            vocabulary: artifact.vocabulary.into_iter().collect(),
            idf: artifact.idf,
            token_regex,
            sublinear_tf: artifact.sublinear_tf,
            norm: artifact.norm,
        })
    }

    pub fn vocabulary_size(&self) -> usize {
        self.vocabulary.len()
    }

    pub fn contains(&self, term: &str) -> bool {
        self.vocabulary.contains_key(term)
    }

    fn term_counts(&self, text: &str) -> HashMap<usize, u32> {
        let mut counts = HashMap::new();
        for token in self.token_regex.find_iter(text) {
            if let Some(&idx) = self.vocabulary.get(token.as_str()) {
                *counts.entry(idx).or_insert(0) += 1;
            }
        }
        counts
    }
}

impl TextVectorizer for TfidfVectorizer {
    fn transform(&self, text: &str) -> FeatureVector {
        let counts = self.term_counts(text);

        let mut entries: Vec<(usize, f64)> = counts
            .into_iter()
            .map(|(idx, count)| {
                let tf = if self.sublinear_tf {
                    1.0 + f64::from(count).ln()
                } else {
                    f64::from(count)
                };
                (idx, tf * self.idf[idx])
            })
            .collect();

        let scale = match self.norm {
            Norm::L2 => entries.iter().map(|(_, v)| v * v).sum::<f64>().sqrt(),
            Norm::L1 => entries.iter().map(|(_, v)| v.abs()).sum::<f64>(),
            Norm::None => 1.0,
        };
        if scale > 0.0 {
            for (_, value) in &mut entries {
                *value /= scale;
            }
        }

        log::debug!(
            "Vectorized message into {} non-zero features of {}",
            entries.len(),
            self.idf.len()
        );

        FeatureVector::new(self.idf.len(), entries)
    }

    fn dimension(&self) -> usize {
        self.idf.len()
    }
}

fn invalid(details: String) -> ArtifactError {
    ArtifactError::Invalid {
        kind: KIND,
        details,
    }
}
