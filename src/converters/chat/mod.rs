pub mod chat_content;
pub mod chat_media;
pub mod chat_message;
pub mod chat_request;
pub mod chat_turn;

#[allow(unused_imports)]
pub use chat_content::{ChatContent, ChatContentItem};
#[allow(unused_imports)]
pub use chat_media::{ChatImageUrl, ChatInputAudio, InlineMedia};
#[allow(unused_imports)]
pub use chat_message::ChatMessage;
#[allow(unused_imports)]
pub use chat_request::ChatRequest;
#[allow(unused_imports)]
pub use chat_turn::ChatTurn;
