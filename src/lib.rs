pub mod artifacts;
pub mod assets;
pub mod classifier;
pub mod config;
pub mod error;
pub mod normalizer;
pub mod pipeline;
pub mod session;
pub mod vectorizer;
pub mod views;

pub use artifacts::{ModelArtifacts, SharedArtifacts};
pub use classifier::{BinaryClassifier, ClassProbabilities, Label};
pub use config::Config;
pub use error::{ArtifactError, InputError};
pub use normalizer::normalize;
pub use pipeline::{classify, Prediction};
pub use vectorizer::{FeatureVector, TextVectorizer};
