// src/core/renderer.rs

//! Converts an `AnalysisResult` into a display structure.
//!
//! Rendering is pure and infallible: every optional field of the result either
//! shows its value or a localized placeholder. The same structure feeds the
//! terminal widgets and the plain-text export, so both always agree.

use rust_i18n::t;

use crate::core::models::{AnalysisResult, EmotionEntry};

/// Width, in characters, of the bars in the plain-text rendering.
pub const TEXT_BAR_WIDTH: usize = 20;

/// A labelled value that may be a placeholder.
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    pub label: String,
    pub value: String,
    pub is_placeholder: bool,
}

/// A section that is only rendered when the result carries it.
#[derive(Debug, Clone, PartialEq)]
pub struct NoteBlock {
    pub heading: String,
    pub body: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RenderedEmotion {
    pub label: String,
    /// Percentage shown next to the label, e.g. `"75%"`.
    pub value_text: String,
    /// Bar fill between 0.0 and 1.0.
    pub ratio: f64,
    pub context: Option<String>,
    pub passages: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum EmotionList {
    Entries(Vec<RenderedEmotion>),
    Placeholder(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct RenderedResult {
    pub title: String,
    pub dominant_heading: String,
    pub dominant: Field,
    pub tone: Field,
    pub emotions_heading: String,
    pub emotions: EmotionList,
    pub cultural_notes: Option<NoteBlock>,
    pub summary: Option<NoteBlock>,
    /// Label of the export action, always present.
    pub export_label: String,
}

/// Treats empty or whitespace-only strings the same as a missing field.
fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

fn field(label: String, value: &Option<String>, placeholder: String) -> Field {
    match present(value) {
        Some(v) => Field { label, value: v.to_string(), is_placeholder: false },
        None => Field { label, value: placeholder, is_placeholder: true },
    }
}

fn note(heading: String, body: &Option<String>) -> Option<NoteBlock> {
    present(body).map(|b| NoteBlock { heading, body: b.to_string() })
}

fn render_emotion(entry: &EmotionEntry) -> RenderedEmotion {
    let value = Some(entry.display_value()).filter(|v| v.is_finite()).unwrap_or(0.0);
    RenderedEmotion {
        label: entry.kind.trim().to_string(),
        value_text: format!("{}%", value),
        ratio: value.clamp(0.0, 100.0) / 100.0,
        context: present(&entry.context).map(str::to_string),
        passages: entry
            .passages
            .iter()
            .flatten()
            .map(|p| p.trim())
            .filter(|p| !p.is_empty())
            .map(str::to_string)
            .collect(),
    }
}

pub fn render(result: &AnalysisResult) -> RenderedResult {
    let emotions = match result.emotions.as_deref() {
        Some(entries) if !entries.is_empty() => {
            EmotionList::Entries(entries.iter().map(render_emotion).collect())
        }
        _ => EmotionList::Placeholder(t!("result.no_emotion").to_string()),
    };

    RenderedResult {
        title: t!("result.title").to_string(),
        dominant_heading: t!("result.dominant_emotion").to_string(),
        dominant: field(
            t!("result.dominant_emotion").to_string(),
            &result.dominant_emotion,
            t!("result.not_detected").to_string(),
        ),
        tone: field(
            t!("result.emotional_tone").to_string(),
            &result.emotional_tone,
            t!("result.mixed").to_string(),
        ),
        emotions_heading: t!("result.emotions").to_string(),
        emotions,
        cultural_notes: note(t!("result.cultural_notes").to_string(), &result.cultural_notes),
        summary: note(t!("result.summary").to_string(), &result.summary),
        export_label: t!("result.export").to_string(),
    }
}

/// `[#####...............]` style bar for the plain-text rendering.
pub fn text_bar(ratio: f64, width: usize) -> String {
    let filled = ((ratio.clamp(0.0, 1.0) * width as f64).round() as usize).min(width);
    format!("[{}{}]", "#".repeat(filled), ".".repeat(width - filled))
}

impl RenderedResult {
    /// The textual content of the rendered result, in display order.
    pub fn to_plain_text(&self) -> String {
        let mut lines: Vec<String> = Vec::new();
        lines.push(self.title.clone());
        lines.push(String::new());

        lines.push(self.dominant_heading.clone());
        lines.push(self.dominant.value.clone());
        lines.push(format!("{}: {}", self.tone.label, self.tone.value));
        lines.push(String::new());

        lines.push(self.emotions_heading.clone());
        match &self.emotions {
            EmotionList::Placeholder(text) => lines.push(text.clone()),
            EmotionList::Entries(entries) => {
                for emotion in entries {
                    lines.push(format!("{} {}", emotion.label, emotion.value_text));
                    lines.push(text_bar(emotion.ratio, TEXT_BAR_WIDTH));
                    if let Some(context) = &emotion.context {
                        lines.push(context.clone());
                    }
                    for passage in &emotion.passages {
                        lines.push(format!("« {} »", passage));
                    }
                }
            }
        }

        for block in [&self.cultural_notes, &self.summary].into_iter().flatten() {
            lines.push(String::new());
            lines.push(block.heading.clone());
            lines.push(block.body.clone());
        }

        lines.push(String::new());
        lines.push(self.export_label.clone());
        lines.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full_result() -> AnalysisResult {
        serde_json::from_str(
            r#"{
                "dominant_emotion": "nostalgie",
                "emotional_tone": "négatif",
                "emotions": [
                    {"type": "nostalgie", "percentage": 70, "intensity": 80, "context": "exil", "passages": ["la maison blanche", " "]},
                    {"type": "colère", "intensity": 130}
                ],
                "cultural_notes": "Mémoire de la guerre d'indépendance.",
                "summary": "Un texte mélancolique."
            }"#,
        )
        .unwrap()
    }

    #[test]
    fn empty_result_renders_placeholders() {
        let rendered = render(&AnalysisResult::default());
        assert!(rendered.dominant.is_placeholder);
        assert_eq!(rendered.dominant.value, t!("result.not_detected"));
        assert!(rendered.tone.is_placeholder);
        assert_eq!(rendered.tone.value, t!("result.mixed"));
        assert_eq!(rendered.emotions, EmotionList::Placeholder(t!("result.no_emotion").to_string()));
        assert!(rendered.cultural_notes.is_none());
        assert!(rendered.summary.is_none());
        assert_eq!(rendered.export_label, t!("result.export"));
    }

    #[test]
    fn empty_emotion_list_uses_placeholder() {
        let result = AnalysisResult { emotions: Some(Vec::new()), ..Default::default() };
        assert!(matches!(render(&result).emotions, EmotionList::Placeholder(_)));
    }

    #[test]
    fn present_fields_render_their_values() {
        let rendered = render(&full_result());
        assert_eq!(rendered.dominant.value, "nostalgie");
        assert!(!rendered.dominant.is_placeholder);
        assert_eq!(rendered.tone.value, "négatif");

        let EmotionList::Entries(entries) = &rendered.emotions else {
            panic!("expected entries");
        };
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].value_text, "70%");
        assert_eq!(entries[0].ratio, 0.7);
        assert_eq!(entries[0].context.as_deref(), Some("exil"));
        assert_eq!(entries[0].passages, vec!["la maison blanche"]);
        assert_eq!(entries[1].value_text, "130%");
        assert_eq!(entries[1].ratio, 1.0);

        assert_eq!(rendered.cultural_notes.unwrap().body, "Mémoire de la guerre d'indépendance.");
        assert_eq!(rendered.summary.unwrap().body, "Un texte mélancolique.");
    }

    #[test]
    fn blank_strings_count_as_missing() {
        let result = AnalysisResult {
            dominant_emotion: Some("  ".into()),
            summary: Some(String::new()),
            ..Default::default()
        };
        let rendered = render(&result);
        assert!(rendered.dominant.is_placeholder);
        assert!(rendered.summary.is_none());
    }

    #[test]
    fn plain_text_follows_rendered_content() {
        let text = render(&full_result()).to_plain_text();
        assert!(text.starts_with(&*t!("result.title")));
        assert!(text.contains("nostalgie 70%"));
        assert!(text.contains("[##############......]"));
        assert!(text.contains("« la maison blanche »"));
        assert!(text.contains("Un texte mélancolique."));
        assert!(text.ends_with(&*t!("result.export")));
    }

    #[test]
    fn non_finite_figures_render_as_zero() {
        let result = AnalysisResult {
            emotions: Some(vec![
                EmotionEntry { kind: "peur".into(), percentage: Some(f64::NAN), ..Default::default() },
                EmotionEntry { kind: "joie".into(), intensity: Some(f64::INFINITY), ..Default::default() },
            ]),
            ..Default::default()
        };
        let EmotionList::Entries(entries) = render(&result).emotions else {
            panic!("expected entries");
        };
        for entry in &entries {
            assert_eq!(entry.ratio, 0.0);
            assert_eq!(entry.value_text, "0%");
        }
    }

    #[test]
    fn text_bar_is_clamped() {
        assert_eq!(text_bar(0.0, 4), "[....]");
        assert_eq!(text_bar(0.5, 4), "[##..]");
        assert_eq!(text_bar(2.0, 4), "[####]");
    }
}
