//! Configuration settings for pdfchat.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
#[derive(Default)]
pub struct Settings {
    pub general: GeneralSettings,
    pub openai: OpenAISettings,
    pub embedding: EmbeddingSettings,
    pub chunking: ChunkingSettings,
    pub vector_store: VectorStoreSettings,
    pub rag: RagSettings,
    pub summary: SummarySettings,
    pub search: SearchSettings,
    pub server: ServerSettings,
    pub prompts: PromptSettings,
}


/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralSettings {
    /// Directory for temporary upload files.
    pub temp_dir: String,
    /// Directory for rotating log files.
    pub log_dir: String,
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,
}

impl Default for GeneralSettings {
    fn default() -> Self {
        Self {
            temp_dir: "/tmp/pdfchat".to_string(),
            log_dir: "logs".to_string(),
            log_level: "info".to_string(),
        }
    }
}

/// Hosted API client settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OpenAISettings {
    /// Override for the API base URL (OpenAI-compatible servers).
    pub api_base: Option<String>,
    /// Request timeout in seconds.
    pub timeout_seconds: u64,
}

impl Default for OpenAISettings {
    fn default() -> Self {
        Self {
            api_base: None,
            timeout_seconds: 300,
        }
    }
}

/// Embedding generation settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EmbeddingSettings {
    /// Embedding model to use.
    pub model: String,
    /// Requested embedding dimensions. Only the text-embedding-3 models accept this.
    pub dimensions: Option<u32>,
    /// Number of texts sent per embedding request.
    pub batch_size: usize,
}

impl Default for EmbeddingSettings {
    fn default() -> Self {
        Self {
            model: "text-embedding-ada-002".to_string(),
            dimensions: None,
            batch_size: 1000,
        }
    }
}

/// Text splitting settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChunkingSettings {
    /// Maximum chunk size in characters.
    pub chunk_size: usize,
    /// Characters shared between consecutive chunks.
    pub chunk_overlap: usize,
    /// Separators tried in order, coarsest first.
    pub separators: Vec<String>,
}

impl Default for ChunkingSettings {
    fn default() -> Self {
        Self {
            chunk_size: 16000,
            chunk_overlap: 3200,
            separators: ["\n\n", "\n", ".", " ", ""]
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }
}

/// Vector store settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct VectorStoreSettings {
    /// Vector store provider (sqlite, memory).
    pub provider: String,
    /// Directory holding the persisted index. Wiped on every new upload.
    pub index_dir: String,
}

impl Default for VectorStoreSettings {
    fn default() -> Self {
        Self {
            provider: "sqlite".to_string(),
            index_dir: "chroma_db".to_string(),
        }
    }
}

/// Question answering settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RagSettings {
    /// LLM model for answer generation.
    pub model: String,
    pub temperature: f32,
    pub presence_penalty: f32,
    pub frequency_penalty: f32,
    /// Maximum tokens in a generated answer.
    pub max_tokens: u32,
    /// Number of chunks retrieved per question.
    pub top_k: usize,
}

impl Default for RagSettings {
    fn default() -> Self {
        Self {
            model: "gpt-4".to_string(),
            temperature: 0.0,
            presence_penalty: -1.0,
            frequency_penalty: -1.0,
            max_tokens: 4000,
            top_k: 100,
        }
    }
}

/// Document summary settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SummarySettings {
    /// LLM model for summaries.
    pub model: String,
    /// Maximum tokens in a generated summary.
    pub max_tokens: u32,
}

impl Default for SummarySettings {
    fn default() -> Self {
        Self {
            model: "gpt-4o".to_string(),
            max_tokens: 5000,
        }
    }
}

/// Web search settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchSettings {
    /// Search endpoint URL.
    pub endpoint: String,
    /// Environment variable holding the search API key.
    pub api_key_env: String,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            endpoint: "https://api.perplexity.ai/search".to_string(),
            api_key_env: "PERPLEXITY_API_KEY".to_string(),
        }
    }
}

/// Web UI server settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
    /// Maximum accepted upload size in bytes.
    pub max_upload_bytes: usize,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8501,
            max_upload_bytes: 200 * 1024 * 1024,
        }
    }
}

/// Prompt customization settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
#[derive(Default)]
pub struct PromptSettings {
    /// Directory for custom prompts (overrides defaults).
    pub custom_dir: Option<String>,
    /// Custom variables available in all prompts as {{variable_name}}.
    pub variables: std::collections::HashMap<String, String>,
}

impl Settings {
    /// Load settings from the default configuration file.
    pub fn load() -> crate::error::Result<Self> {
        Self::load_from(None)
    }

    /// Load settings from a specific path, or default location if None.
    pub fn load_from(path: Option<&PathBuf>) -> crate::error::Result<Self> {
        let config_path = match path {
            Some(p) => p.clone(),
            None => Self::default_config_path(),
        };

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let settings: Settings = toml::from_str(&content)?;
            Ok(settings)
        } else {
            Ok(Settings::default())
        }
    }

    /// Save settings to a specific path.
    pub fn save_to(&self, path: &PathBuf) -> crate::error::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)
            .map_err(|e| crate::error::PdfChatError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Get the default configuration file path.
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("pdfchat")
            .join("config.toml")
    }

    /// Expand shell variables in paths (e.g., ~).
    pub fn expand_path(path: &str) -> PathBuf {
        PathBuf::from(shellexpand::tilde(path).to_string())
    }

    /// Get the expanded temp directory path.
    pub fn temp_dir(&self) -> PathBuf {
        Self::expand_path(&self.general.temp_dir)
    }

    /// Get the expanded log directory path.
    pub fn log_dir(&self) -> PathBuf {
        Self::expand_path(&self.general.log_dir)
    }

    /// Get the expanded vector index directory path.
    pub fn index_dir(&self) -> PathBuf {
        Self::expand_path(&self.vector_store.index_dir)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_pipeline_constants() {
        let settings = Settings::default();
        assert_eq!(settings.chunking.chunk_size, 16000);
        assert_eq!(settings.chunking.chunk_overlap, 3200);
        assert_eq!(settings.chunking.separators, vec!["\n\n", "\n", ".", " ", ""]);
        assert_eq!(settings.rag.top_k, 100);
        assert_eq!(settings.rag.model, "gpt-4");
        assert_eq!(settings.summary.model, "gpt-4o");
        assert_eq!(settings.embedding.batch_size, 1000);
        assert!(settings.embedding.dimensions.is_none());
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let settings: Settings = toml::from_str(
            r#"
            [rag]
            model = "gpt-4o-mini"
            top_k = 20

            [server]
            port = 9000
            "#,
        )
        .unwrap();

        assert_eq!(settings.rag.model, "gpt-4o-mini");
        assert_eq!(settings.rag.top_k, 20);
        assert_eq!(settings.rag.max_tokens, 4000);
        assert_eq!(settings.server.port, 9000);
        assert_eq!(settings.server.host, "127.0.0.1");
        assert_eq!(settings.vector_store.index_dir, "chroma_db");
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut settings = Settings::default();
        settings.summary.max_tokens = 1234;
        settings.save_to(&path).unwrap();

        let loaded = Settings::load_from(Some(&path)).unwrap();
        assert_eq!(loaded.summary.max_tokens, 1234);
    }

    #[test]
    fn test_missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.toml");
        let loaded = Settings::load_from(Some(&path)).unwrap();
        assert_eq!(loaded.rag.top_k, 100);
    }
}
