// src/core/input.rs

use rust_i18n::t;
use std::path::PathBuf;
use thiserror::Error;
use tracing::{debug, warn};

use crate::core::models::{file_extension, AnalysisRequest, ServiceConfig};
use crate::core::notification::Severity;

/// Why a submission action did not produce a request.
#[derive(Debug, Error)]
pub enum InputError {
    #[error("no text to analyze")]
    BlankText,
    #[error("unsupported file type: {file_name}")]
    UnsupportedFile { file_name: String, allowed: String },
    #[error("{file_name} exceeds {max_mb} MB")]
    FileTooLarge { file_name: String, max_mb: u64 },
    #[error("cannot read {file_name}: {source}")]
    Unreadable {
        file_name: String,
        #[source]
        source: std::io::Error,
    },
}

impl InputError {
    /// Problems with what the user typed are warnings; a file that exists but
    /// cannot be read is an error.
    pub fn severity(&self) -> Severity {
        match self {
            InputError::Unreadable { .. } => Severity::Error,
            _ => Severity::Warning,
        }
    }

    pub fn user_message(&self) -> String {
        match self {
            InputError::BlankText => t!("notify.text_required").to_string(),
            InputError::UnsupportedFile { file_name, allowed } => {
                t!("notify.unsupported_file", name = file_name, allowed = allowed).to_string()
            }
            InputError::FileTooLarge { file_name, max_mb } => {
                t!("notify.file_too_large", name = file_name, max = max_mb).to_string()
            }
            InputError::Unreadable { file_name, source } => {
                t!("notify.file_unreadable", name = file_name, reason = source).to_string()
            }
        }
    }
}

/// Turns raw user input into at most one `AnalysisRequest` per submission.
#[derive(Debug, Clone)]
pub struct InputCollector {
    allowed_extensions: Vec<String>,
    max_file_bytes: u64,
}

impl Default for InputCollector {
    fn default() -> Self {
        Self::new(&ServiceConfig::default())
    }
}

impl InputCollector {
    pub fn new(config: &ServiceConfig) -> Self {
        let mut collector = Self { allowed_extensions: Vec::new(), max_file_bytes: 0 };
        collector.update_limits(config);
        collector
    }

    /// Adopts the limits published by the service.
    pub fn update_limits(&mut self, config: &ServiceConfig) {
        let allowed: Vec<String> = config
            .allowed_extensions
            .iter()
            .map(|ext| ext.trim().trim_start_matches('.').to_ascii_lowercase())
            .filter(|ext| !ext.is_empty())
            .collect();
        if allowed.is_empty() {
            warn!("Service advertised no file extensions, keeping the current list.");
        } else {
            self.allowed_extensions = allowed;
        }
        self.max_file_bytes = config.max_file_size_mb.saturating_mul(1024 * 1024);
        debug!(extensions = ?self.allowed_extensions, max_bytes = self.max_file_bytes, "Upload limits updated.");
    }

    pub fn allowed_extensions(&self) -> &[String] {
        &self.allowed_extensions
    }

    pub fn max_file_size_mb(&self) -> u64 {
        self.max_file_bytes / (1024 * 1024)
    }

    pub fn collect_text(&self, raw: &str) -> Result<AnalysisRequest, InputError> {
        let text = raw.trim();
        if text.is_empty() {
            return Err(InputError::BlankText);
        }
        Ok(AnalysisRequest::Text { text: text.to_string() })
    }

    /// Reads the file named in the prompt.
    ///
    /// An empty prompt means the user dismissed the file chooser: `Ok(None)`.
    pub async fn collect_file(&self, raw_path: &str) -> Result<Option<AnalysisRequest>, InputError> {
        match self.select_file(raw_path)? {
            Some(selection) => selection.read().await.map(Some),
            None => Ok(None),
        }
    }

    /// Checks the path typed in the prompt without touching the disk, so it can
    /// run on the UI loop. Reading is left to `FileSelection::read`.
    pub fn select_file(&self, raw_path: &str) -> Result<Option<FileSelection>, InputError> {
        let trimmed = raw_path.trim().trim_matches(|c| c == '"' || c == '\'');
        if trimmed.is_empty() {
            debug!("File selection cancelled.");
            return Ok(None);
        }

        let path = PathBuf::from(trimmed);
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| trimmed.to_string());

        let accepted = file_extension(&file_name)
            .is_some_and(|ext| self.allowed_extensions.iter().any(|allowed| *allowed == ext));
        if !accepted {
            return Err(InputError::UnsupportedFile { file_name, allowed: self.allowed_list() });
        }

        Ok(Some(FileSelection { path, file_name, max_file_bytes: self.max_file_bytes }))
    }

    /// Accepted extensions as shown to the user, e.g. `.txt, .pdf`.
    pub fn allowed_list(&self) -> String {
        self.allowed_extensions
            .iter()
            .map(|ext| format!(".{}", ext))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// A file whose name passed the extension check, waiting to be read.
#[derive(Debug, Clone)]
pub struct FileSelection {
    path: PathBuf,
    file_name: String,
    max_file_bytes: u64,
}

impl FileSelection {
    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    /// Enforces the size limit, then loads the whole file.
    pub async fn read(self) -> Result<AnalysisRequest, InputError> {
        let FileSelection { path, file_name, max_file_bytes } = self;
        let metadata = tokio::fs::metadata(&path)
            .await
            .map_err(|source| InputError::Unreadable { file_name: file_name.clone(), source })?;
        if metadata.len() > max_file_bytes {
            return Err(InputError::FileTooLarge {
                file_name,
                max_mb: max_file_bytes / (1024 * 1024),
            });
        }

        let bytes = tokio::fs::read(&path)
            .await
            .map_err(|source| InputError::Unreadable { file_name: file_name.clone(), source })?;
        debug!(file = %file_name, size = bytes.len(), "File collected.");
        Ok(AnalysisRequest::File { file_name, bytes })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn blank_text_is_rejected() {
        let collector = InputCollector::default();
        assert!(matches!(collector.collect_text("   \n\t "), Err(InputError::BlankText)));
        assert_eq!(InputError::BlankText.severity(), Severity::Warning);
    }

    #[test]
    fn text_is_trimmed() {
        let collector = InputCollector::default();
        let request = collector.collect_text("  Le soleil se levait sur Alger.  ").unwrap();
        assert_eq!(request, AnalysisRequest::Text { text: "Le soleil se levait sur Alger.".into() });
    }

    #[tokio::test]
    async fn empty_path_means_cancelled() {
        let collector = InputCollector::default();
        assert!(collector.collect_file("   ").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn reads_accepted_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("Chapitre.TXT");
        std::fs::File::create(&path).unwrap().write_all(b"nostalgie").unwrap();

        let collector = InputCollector::default();
        let request = collector
            .collect_file(&format!("\"{}\"", path.display()))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(
            request,
            AnalysisRequest::File { file_name: "Chapitre.TXT".into(), bytes: b"nostalgie".to_vec() }
        );
    }

    #[tokio::test]
    async fn rejects_unlisted_extension() {
        let collector = InputCollector::default();
        let err = collector.collect_file("/tmp/photo.png").await.unwrap_err();
        match err {
            InputError::UnsupportedFile { file_name, allowed } => {
                assert_eq!(file_name, "photo.png");
                assert_eq!(allowed, ".txt, .pdf");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.pdf");
        let err = InputCollector::default()
            .collect_file(path.to_str().unwrap())
            .await
            .unwrap_err();
        assert!(matches!(err, InputError::Unreadable { .. }));
        assert_eq!(err.severity(), Severity::Error);
    }

    #[tokio::test]
    async fn enforces_service_size_limit() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("long.txt");
        std::fs::write(&path, vec![b'a'; 2 * 1024 * 1024]).unwrap();

        let collector = InputCollector::new(&ServiceConfig {
            max_file_size_mb: 1,
            ..ServiceConfig::default()
        });
        let err = collector.collect_file(path.to_str().unwrap()).await.unwrap_err();
        assert!(matches!(err, InputError::FileTooLarge { max_mb: 1, .. }));
    }

    #[test]
    fn limits_follow_service_config() {
        let mut collector = InputCollector::default();
        collector.update_limits(&ServiceConfig {
            max_file_size_mb: 10,
            allowed_extensions: vec![".TXT".into()],
            api_available: true,
        });
        assert_eq!(collector.allowed_extensions(), ["txt"]);
        assert_eq!(collector.max_file_size_mb(), 10);

        collector.update_limits(&ServiceConfig {
            allowed_extensions: Vec::new(),
            ..ServiceConfig::default()
        });
        assert_eq!(collector.allowed_extensions(), ["txt"]);
    }

    #[test]
    fn allowed_list_follows_service_config() {
        let mut collector = InputCollector::default();
        assert_eq!(collector.allowed_list(), ".txt, .pdf");
        collector.update_limits(&ServiceConfig {
            allowed_extensions: vec!["md".into(), "txt".into()],
            ..ServiceConfig::default()
        });
        assert_eq!(collector.allowed_list(), ".md, .txt");
    }

    #[test]
    fn selection_does_not_touch_the_disk() {
        let selection = InputCollector::default()
            .select_file("/nowhere/roman.pdf")
            .unwrap()
            .unwrap();
        assert_eq!(selection.file_name(), "roman.pdf");
    }
}
