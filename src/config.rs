use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct Config {
    pub artifacts: ArtifactsConfig,
    #[serde(default)]
    pub assets: AssetsConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    /// Directory relative paths are resolved against; not written to disk
    #[serde(skip)]
    pub base_dir: PathBuf,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct ArtifactsConfig {
    pub model_path: PathBuf,
    pub vectorizer_path: PathBuf,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct AssetsConfig {
    pub ham_wordcloud: PathBuf,
    pub spam_wordcloud: PathBuf,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct LoggingConfig {
    pub level: String,
}

impl Default for ArtifactsConfig {
    fn default() -> Self {
        Self {
            model_path: PathBuf::from("model.json"),
            vectorizer_path: PathBuf::from("vectorizer.json"),
        }
    }
}

impl Default for AssetsConfig {
    fn default() -> Self {
        Self {
            ham_wordcloud: PathBuf::from("ham_wc.png"),
            spam_wordcloud: PathBuf::from("spam_wc.png"),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            artifacts: ArtifactsConfig::default(),
            assets: AssetsConfig::default(),
            logging: LoggingConfig::default(),
            base_dir: program_dir(),
        }
    }
}

impl Config {
    /// Loads a YAML config; relative paths in it resolve against its directory.
    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Config = serde_yaml::from_str(&content)?;
        config.base_dir = path
            .parent()
            .filter(|dir| !dir.as_os_str().is_empty())
            .map_or_else(|| PathBuf::from("."), Path::to_path_buf);
        Ok(config)
    }

    pub fn to_file(&self, path: &Path) -> anyhow::Result<()> {
        let content = serde_yaml::to_string(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.base_dir.join(path)
        }
    }

    pub fn model_path(&self) -> PathBuf {
        self.resolve(&self.artifacts.model_path)
    }

    pub fn vectorizer_path(&self) -> PathBuf {
        self.resolve(&self.artifacts.vectorizer_path)
    }

    pub fn ham_wordcloud_path(&self) -> PathBuf {
        self.resolve(&self.assets.ham_wordcloud)
    }

    pub fn spam_wordcloud_path(&self) -> PathBuf {
        self.resolve(&self.assets.spam_wordcloud)
    }

    /// Parses `logging.level`, falling back to `Info` for unknown names
    pub fn log_level(&self) -> log::LevelFilter {
        self.logging.level.parse().unwrap_or(log::LevelFilter::Info)
    }
}

/// Directory containing the running executable, or `.` if unknown
pub fn program_dir() -> PathBuf {
    std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(Path::to_path_buf))
        .unwrap_or_else(|| PathBuf::from("."))
}
