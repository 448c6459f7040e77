//! Server-sent event names, payloads and timing defaults for a generation
//! run.
//!
//! Used by `api/src/engine/generator.rs` when pushing events into a
//! client's session stream.

use serde::Serialize;

use crate::generation::{GenerationRequest, GenerationResult};

// ---------------------------------------------------------------------------
// Event names
// ---------------------------------------------------------------------------

/// Acknowledgement sent once when a session opens.
pub const EVENT_CONNECT: &str = "CONNECT";

/// Preliminary description, sent before any progress.
pub const EVENT_THINKING: &str = "THINKING";

/// Integer progress update.
pub const EVENT_PROGRESS: &str = "PROGRESS";

/// Final image URL.
pub const EVENT_COMPLETE: &str = "COMPLETE";

// ---------------------------------------------------------------------------
// Messages
// ---------------------------------------------------------------------------

pub const CONNECT_ACK: &str = "连接已建立";
pub const COMPLETE_MESSAGE: &str = "图像生成完成";
const PRELIMINARY_PREFIX: &str = "您选择的风格是：";
const DESCRIPTION_PREFIX: &str = "正在根据您的要求生成图像：";

// ---------------------------------------------------------------------------
// Progress and timing
// ---------------------------------------------------------------------------

pub const PROGRESS_START: u8 = 10;
pub const PROGRESS_END: u8 = 90;
pub const PROGRESS_STEP: u8 = 10;

/// Pause between THINKING and the first PROGRESS.
pub const DEFAULT_THINKING_PAUSE_MS: u64 = 300;
/// Pause after each PROGRESS.
pub const DEFAULT_PROGRESS_INTERVAL_MS: u64 = 500;
/// Pause before COMPLETE.
pub const DEFAULT_FINAL_PAUSE_MS: u64 = 1000;

/// Progress values emitted by every run: 10, 20, ..., 90.
pub fn progress_steps() -> impl Iterator<Item = u8> {
    (PROGRESS_START..=PROGRESS_END).step_by(PROGRESS_STEP as usize)
}

// ---------------------------------------------------------------------------
// Payloads
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ThinkingPayload {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub preliminary_description: String,
    pub description: String,
    pub thinking: String,
}

impl ThinkingPayload {
    pub fn new(request: &GenerationRequest, result: &GenerationResult) -> Self {
        Self {
            kind: "description",
            preliminary_description: format!("{PRELIMINARY_PREFIX}{}", request.style_text()),
            description: format!("{DESCRIPTION_PREFIX}{}", request.prompt_text()),
            thinking: result.description.clone(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ProgressPayload {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub progress: u8,
}

impl ProgressPayload {
    pub fn new(progress: u8) -> Self {
        Self {
            kind: "progress",
            progress,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompletePayload {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub message: &'static str,
    pub image_url: String,
    /// Milliseconds since the Unix epoch.
    pub timestamp: i64,
}

impl CompletePayload {
    pub fn new(result: &GenerationResult, timestamp: i64) -> Self {
        Self {
            kind: "complete",
            message: COMPLETE_MESSAGE,
            image_url: result.image_url.clone(),
            timestamp,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generation::mock_generation;

    #[test]
    fn progress_steps_are_ten_through_ninety() {
        let steps: Vec<u8> = progress_steps().collect();
        assert_eq!(steps, vec![10, 20, 30, 40, 50, 60, 70, 80, 90]);
    }

    #[test]
    fn thinking_payload_restates_style_and_prompt() {
        let request = GenerationRequest {
            source_image_url: None,
            prompt: Some("明亮的客厅".into()),
            style: Some("北欧".into()),
        };
        let result = mock_generation(&request);
        let payload = ThinkingPayload::new(&request, &result);

        assert_eq!(payload.preliminary_description, "您选择的风格是：北欧");
        assert_eq!(payload.description, "正在根据您的要求生成图像：明亮的客厅");
        assert_eq!(payload.thinking, result.description);
    }

    #[test]
    fn payloads_serialize_with_wire_field_names() {
        let request = GenerationRequest::default();
        let result = mock_generation(&request);

        let thinking = serde_json::to_value(ThinkingPayload::new(&request, &result)).unwrap();
        assert_eq!(thinking["type"], "description");
        assert!(thinking["preliminaryDescription"].is_string());

        let progress = serde_json::to_value(ProgressPayload::new(40)).unwrap();
        assert_eq!(progress, serde_json::json!({ "type": "progress", "progress": 40 }));

        let complete = serde_json::to_value(CompletePayload::new(&result, 1_700_000_000_000)).unwrap();
        assert_eq!(complete["type"], "complete");
        assert_eq!(complete["message"], COMPLETE_MESSAGE);
        assert_eq!(complete["imageUrl"], result.image_url);
        assert_eq!(complete["timestamp"], 1_700_000_000_000_i64);
    }
}
