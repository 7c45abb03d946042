use crate::converters::chat::InlineMedia;

/// One normalized conversation message: role, flattened text and decoded media.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChatTurn {
    pub role: String,
    pub text: String,
    pub images: Vec<InlineMedia>,
    pub audio: Vec<InlineMedia>,
}

impl ChatTurn {
    #[cfg(test)]
    pub fn text(role: &str, text: &str) -> Self {
        ChatTurn {
            role: role.to_string(),
            text: text.to_string(),
            ..Default::default()
        }
    }

    pub fn is_assistant(&self) -> bool {
        self.role == "assistant"
    }

    /// Append recognizer output as its own paragraph.
    pub fn splice(&mut self, label: &str, value: &str) {
        let value = value.trim();
        if value.is_empty() {
            return;
        }
        if !self.text.is_empty() {
            self.text.push_str("\n\n");
        }
        self.text.push_str(&format!("[{}] {}", label, value));
    }
}
