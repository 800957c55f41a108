// src/core/models.rs

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use strum::Display;

// --- Request Models ---

/// Kind of input a submission was built from.
///
/// The dispatcher uses it to pick the wire encoding, and the UI uses it to pick
/// the progress and completion texts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "lowercase")]
pub enum RequestKind {
    File,
    Text,
}

/// A single unit of work submitted to the analysis service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnalysisRequest {
    /// A file chosen by the user, sent as multipart form data under the `file` field.
    File { file_name: String, bytes: Vec<u8> },
    /// Free-form text, already trimmed and guaranteed non-blank.
    Text { text: String },
}

impl AnalysisRequest {
    pub fn kind(&self) -> RequestKind {
        match self {
            AnalysisRequest::File { .. } => RequestKind::File,
            AnalysisRequest::Text { .. } => RequestKind::Text,
        }
    }
}

/// JSON body of a text submission: `{ "text": "..." }`.
#[derive(Debug, Serialize)]
pub struct TextPayload<'a> {
    pub text: &'a str,
}

/// Returns the content type announced for an uploaded file.
pub fn mime_type_for(file_name: &str) -> &'static str {
    match file_extension(file_name).as_deref() {
        Some("pdf") => "application/pdf",
        Some("txt") => "text/plain",
        _ => "application/octet-stream",
    }
}

/// Lower-cased extension of a file name, without the dot.
pub fn file_extension(file_name: &str) -> Option<String> {
    let (stem, ext) = file_name.rsplit_once('.')?;
    if stem.is_empty() || ext.is_empty() {
        return None;
    }
    Some(ext.to_ascii_lowercase())
}

// --- Result Models ---

/// Structured emotion analysis returned by the service.
///
/// Every field is optional: the service builds this object from a language model
/// answer, so any of them may be missing and the renderer substitutes placeholders.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct AnalysisResult {
    #[serde(default)]
    pub dominant_emotion: Option<String>,
    #[serde(default)]
    pub emotional_tone: Option<String>,
    #[serde(default)]
    pub emotions: Option<Vec<EmotionEntry>>,
    #[serde(default)]
    pub cultural_notes: Option<String>,
    #[serde(default)]
    pub summary: Option<String>,
}

/// One detected emotion.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct EmotionEntry {
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default, deserialize_with = "lenient_number")]
    pub percentage: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub intensity: Option<f64>,
    #[serde(default)]
    pub context: Option<String>,
    #[serde(default)]
    pub passages: Option<Vec<String>>,
}

impl EmotionEntry {
    /// The figure shown next to the emotion: its percentage, or its intensity when
    /// the percentage is missing or zero. Zero when neither is present.
    pub fn display_value(&self) -> f64 {
        match self.percentage {
            Some(p) if p != 0.0 => p,
            _ => self.intensity.unwrap_or(0.0),
        }
    }
}

/// Accepts `75`, `75.5`, `"75"` or `"75%"`; anything else, non-finite values
/// included, becomes `None`.
fn lenient_number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    let number = match value {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().trim_end_matches('%').trim().parse::<f64>().ok(),
        _ => None,
    };
    Ok(number.filter(|v| v.is_finite()))
}

// --- Wire Responses ---

/// Body of `POST /api/analyze`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AnalyzeResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub analysis: Option<AnalysisResult>,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub text_length: Option<u64>,
    #[serde(default)]
    pub analyzed_at: Option<String>,
}

/// HTTP status plus decoded body of an analyze call.
#[derive(Debug, Clone)]
pub struct AnalyzeReply {
    pub status: u16,
    pub body: AnalyzeResponse,
}

impl AnalyzeReply {
    /// Success requires both a 2xx status and a truthy `success` flag.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status) && self.body.success
    }
}

/// Body of `GET /api/health`.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct HealthResponse {
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub api_configured: bool,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub timestamp: Option<String>,
}

/// Body of `GET /api/config`: the public upload limits of the service.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct ServiceConfig {
    #[serde(default = "default_max_file_size_mb")]
    pub max_file_size_mb: u64,
    #[serde(default = "default_allowed_extensions")]
    pub allowed_extensions: Vec<String>,
    #[serde(default)]
    pub api_available: bool,
}

fn default_max_file_size_mb() -> u64 {
    100
}

fn default_allowed_extensions() -> Vec<String> {
    vec!["txt".to_string(), "pdf".to_string()]
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            max_file_size_mb: default_max_file_size_mb(),
            allowed_extensions: default_allowed_extensions(),
            api_available: false,
        }
    }
}

// --- Report ---

/// A successful analysis together with the metadata the service attaches to it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AnalysisReport {
    pub result: AnalysisResult,
    pub text_length: Option<u64>,
    pub analyzed_at: Option<String>,
}
