pub mod gemini_candidate;
pub mod gemini_content;
pub mod gemini_inline_data;
pub mod gemini_part;
pub mod gemini_request;
pub mod gemini_response;
pub mod gemini_safety_setting;
pub mod gemini_tool;

#[allow(unused_imports)]
pub use gemini_candidate::GeminiCandidate;
#[allow(unused_imports)]
pub use gemini_content::GeminiContent;
#[allow(unused_imports)]
pub use gemini_inline_data::GeminiInlineData;
#[allow(unused_imports)]
pub use gemini_part::GeminiPart;
#[allow(unused_imports)]
pub use gemini_request::GeminiRequest;
#[allow(unused_imports)]
pub use gemini_response::{GeminiResponse, GeminiUsage};
#[allow(unused_imports)]
pub use gemini_safety_setting::{GeminiHarmBlockThreshold, GeminiHarmCategory, GeminiSafetySetting};
#[allow(unused_imports)]
pub use gemini_tool::{GeminiTool, GeminiToolConfig};
