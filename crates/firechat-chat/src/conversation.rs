use firechat_types::{ChatSettings, Message};

/// An ordered, append-only conversation plus its request settings.
///
/// State changes go through explicit mutation methods; ordering is
/// append-only except that the loading placeholder and rollback paths pop
/// from the tail.
#[derive(Debug, Default)]
pub struct Conversation {
    settings: ChatSettings,
    messages: Vec<Message>,
}

impl Conversation {
    pub fn new(settings: ChatSettings) -> Self {
        Self {
            settings,
            messages: Vec::new(),
        }
    }

    pub fn settings(&self) -> &ChatSettings {
        &self.settings
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn push(&mut self, message: Message) {
        self.messages.push(message);
    }

    pub fn pop(&mut self) -> Option<Message> {
        self.messages.pop()
    }

    /// Roll the conversation back to a previously observed length.
    pub fn truncate(&mut self, len: usize) {
        self.messages.truncate(len);
    }

    /// The universal recovery path: drop everything.
    pub fn clear(&mut self) {
        self.messages.clear();
    }

    /// The history sent to the model: everything except loading
    /// placeholders. Hidden messages are included.
    pub fn api_visible(&self) -> Vec<Message> {
        self.messages
            .iter()
            .filter(|message| !message.metadata.loading)
            .cloned()
            .collect()
    }

    /// The rendered transcript: everything not hidden and not loading.
    pub fn rendered(&self) -> impl Iterator<Item = &Message> {
        self.messages
            .iter()
            .filter(|message| !message.metadata.hide && !message.metadata.loading)
    }
}
