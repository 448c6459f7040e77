//! Mocked image generation: request/result types and the style mapping.
//!
//! No image is actually produced. The result is derived from the `style`
//! and `prompt` strings alone, so the same request always yields the same
//! image URL and description.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Request / result types
// ---------------------------------------------------------------------------

/// Body of `POST /image/{clientId}`. Every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationRequest {
    #[serde(default)]
    pub source_image_url: Option<String>,
    #[serde(default)]
    pub prompt: Option<String>,
    #[serde(default)]
    pub style: Option<String>,
}

impl GenerationRequest {
    /// The style text, or `""` when absent.
    pub fn style_text(&self) -> &str {
        self.style.as_deref().unwrap_or_default()
    }

    /// The prompt text, or `""` when absent.
    pub fn prompt_text(&self) -> &str {
        self.prompt.as_deref().unwrap_or_default()
    }
}

/// Lifecycle status carried by a [`GenerationResult`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GenerationStatus {
    Processing,
    Completed,
    Failed,
}

/// Outcome of a (mocked) generation run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationResult {
    pub image_url: String,
    pub description: String,
    pub status: GenerationStatus,
    /// Percentage in `0..=100`.
    pub progress: u8,
}

// ---------------------------------------------------------------------------
// Style profiles
// ---------------------------------------------------------------------------

/// Design style recognised from the free-form `style` field.
///
/// Variants are listed in match priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StyleProfile {
    ModernMinimalist,
    Nordic,
    Industrial,
    Pastoral,
    Default,
}

impl StyleProfile {
    /// Classify a style string by case-insensitive keyword match.
    ///
    /// The first matching profile wins, so `"现代北欧"` is modern.
    pub fn classify(style: &str) -> Self {
        let style = style.to_lowercase();
        if style.contains("现代") || style.contains("简约") {
            Self::ModernMinimalist
        } else if style.contains("北欧") {
            Self::Nordic
        } else if style.contains("工业") {
            Self::Industrial
        } else if style.contains("田园") {
            Self::Pastoral
        } else {
            Self::Default
        }
    }

    pub fn image_url(self) -> &'static str {
        match self {
            Self::ModernMinimalist => "https://images.unsplash.com/photo-1583847268964-b28dc8f51f92?q=80&w=1287&auto=format&fit=crop",
            Self::Nordic => "https://images.unsplash.com/photo-1595515426401-4bb0a8049d6d?q=80&w=1316&auto=format&fit=crop",
            Self::Industrial => "https://images.unsplash.com/photo-1604014056465-3e5fe687c711?q=80&w=1170&auto=format&fit=crop",
            Self::Pastoral => "https://images.unsplash.com/photo-1505691938895-1758d7feb511?q=80&w=1170&auto=format&fit=crop",
            Self::Default => "https://images.unsplash.com/photo-1524758631624-e2822e304c36?q=80&w=1170&auto=format&fit=crop",
        }
    }

    /// Canned opening paragraph for this style.
    pub fn summary(self) -> &'static str {
        match self {
            Self::ModernMinimalist => {
                "为您创建了一个现代简约风格的设计。简洁的线条和形状，中性的色调，强调留白和空间感。"
            }
            Self::Nordic => {
                "为您创建了一个北欧风格的设计。自然材质如木材和亚麻布，明亮的色调搭配柔和的色彩。"
            }
            Self::Industrial => {
                "为您创建了一个工业风格的设计。裸露的砖墙、管道和结构元素，金属与木材的结合。"
            }
            Self::Pastoral => "为您创建了一个田园风格的设计。柔和的色调、花卉图案和复古家具。",
            Self::Default => "创建了一个平衡而和谐的空间设计，融合了多种风格元素。",
        }
    }
}

/// Appended after every description.
pub const DESIGN_REASONING: &str = "\n\n设计思考过程：\n\
1. 分析原始图片的空间结构和基本元素\n\
2. 确定与您的需求相符的设计方向\n\
3. 调整色彩方案和材质搭配\n\
4. 优化家具布局和装饰元素\n\
5. 调整光影效果以增强整体氛围";

/// Paragraph echoing a non-empty prompt back to the user.
pub fn prompt_echo(prompt: &str) -> String {
    format!("\n\n根据您的提示「{prompt}」，我们特别调整了设计方案，满足您的个性化需求。")
}

// ---------------------------------------------------------------------------
// Mocked generation
// ---------------------------------------------------------------------------

/// Produce the mocked result for a request.
///
/// Pure and idempotent. Status is always `Completed` and progress 100.
pub fn mock_generation(request: &GenerationRequest) -> GenerationResult {
    let profile = StyleProfile::classify(request.style_text());

    let mut description = String::from(profile.summary());
    let prompt = request.prompt_text();
    if !prompt.is_empty() {
        description.push_str(&prompt_echo(prompt));
    }
    description.push_str(DESIGN_REASONING);

    GenerationResult {
        image_url: profile.image_url().to_string(),
        description,
        status: GenerationStatus::Completed,
        progress: 100,
    }
}
