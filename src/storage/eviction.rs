use std::collections::VecDeque;

use teloxide::types::ChatId;

/// Decides which conversations to forget as the registry grows.
pub trait EvictionPolicy: Send + Sync {
    /// Called after `chat_id` was inserted; `len` is the registry size
    /// including it. Returns the chats to drop.
    fn on_insert(&mut self, chat_id: ChatId, len: usize) -> Vec<ChatId>;
}

/// Keeps every conversation for the lifetime of the process.
#[derive(Debug, Default, Clone, Copy)]
pub struct NeverEvict;

impl EvictionPolicy for NeverEvict {
    fn on_insert(&mut self, _chat_id: ChatId, _len: usize) -> Vec<ChatId> {
        Vec::new()
    }
}

/// Holds at most `capacity` conversations, dropping the oldest first.
#[derive(Debug)]
pub struct CapacityLimit {
    capacity: usize,
    order: VecDeque<ChatId>,
}

impl CapacityLimit {
    /// Keeps at most `capacity` conversations, never fewer than one.
    pub fn new(capacity: usize) -> Self {
        Self { capacity: capacity.max(1), order: VecDeque::new() }
    }
}

impl EvictionPolicy for CapacityLimit {
    fn on_insert(&mut self, chat_id: ChatId, len: usize) -> Vec<ChatId> {
        self.order.push_back(chat_id);

        let excess = len.saturating_sub(self.capacity);
        self.order.drain(..excess.min(self.order.len().saturating_sub(1))).collect()
    }
}
