use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GeminiHarmCategory {
    HarmCategoryHarassment,
    HarmCategoryHateSpeech,
    HarmCategorySexuallyExplicit,
    HarmCategoryDangerousContent,
}

impl GeminiHarmCategory {
    pub const ALL: [GeminiHarmCategory; 4] = [
        GeminiHarmCategory::HarmCategoryHarassment,
        GeminiHarmCategory::HarmCategoryHateSpeech,
        GeminiHarmCategory::HarmCategorySexuallyExplicit,
        GeminiHarmCategory::HarmCategoryDangerousContent,
    ];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GeminiHarmBlockThreshold {
    BlockNone,
    BlockOnlyHigh,
    BlockMediumAndAbove,
    BlockLowAndAbove,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeminiSafetySetting {
    pub category: GeminiHarmCategory,
    pub threshold: GeminiHarmBlockThreshold,
}

impl GeminiSafetySetting {
    /// Every category with filtering switched off.
    pub fn block_none() -> Vec<GeminiSafetySetting> {
        GeminiHarmCategory::ALL
            .into_iter()
            .map(|category| GeminiSafetySetting {
                category,
                threshold: GeminiHarmBlockThreshold::BlockNone,
            })
            .collect()
    }
}
