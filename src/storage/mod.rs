mod eviction;

use std::collections::HashMap;

pub use eviction::{CapacityLimit, EvictionPolicy, NeverEvict};
use teloxide::types::ChatId;

/// Display name given to every conversation on first contact.
pub const DEFAULT_NAME: &str = "بازیکن";

/// Role assigned when a conversation joins a game.
pub const DEFAULT_ROLE: &str = "doctor";

/// Where a conversation is in its dialogue.
#[derive(Clone, Copy, Default, Debug, PartialEq, Eq)]
pub enum ConversationState {
    /// No dialogue in progress.
    #[default]
    Idle,
    /// The next text message is taken as the new name.
    AwaitingName,
    /// The conversation has joined a game.
    InGame,
}

/// Per-conversation record kept for the lifetime of the process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Profile {
    /// The owning chat.
    pub id: ChatId,
    /// The display name.
    pub name: String,
    /// In-game currency. Nothing awards it yet.
    pub coins: u64,
    /// Game score, which may go negative.
    pub score: i64,
    /// The dialogue state.
    pub state: ConversationState,
}

impl Profile {
    /// A fresh profile with the default name and empty balances.
    pub fn new(id: ChatId) -> Self {
        Self {
            id,
            name: DEFAULT_NAME.to_string(),
            coins: 0,
            score: 0,
            state: ConversationState::default(),
        }
    }
}

/// The game facet of a profile, present while the conversation is in a game.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Participant {
    /// The chat whose profile this belongs to.
    pub owner: ChatId,
    /// The game role label.
    pub role: String,
}

/// In-memory store of conversations keyed by chat.
///
/// Only [`ConversationRegistry::get_or_create`] creates profiles; every other
/// accessor returns `None` for a chat that has not been seen yet.
pub struct ConversationRegistry {
    profiles: HashMap<ChatId, Profile>,
    participants: HashMap<ChatId, Participant>,
    eviction: Box<dyn EvictionPolicy>,
}

impl Default for ConversationRegistry {
    fn default() -> Self {
        Self::new(Box::new(NeverEvict))
    }
}

impl ConversationRegistry {
    /// An empty registry that forgets conversations as `eviction` decides.
    pub fn new(eviction: Box<dyn EvictionPolicy>) -> Self {
        Self { profiles: HashMap::new(), participants: HashMap::new(), eviction }
    }

    /// The profile for `chat_id`, if one exists.
    pub fn get(&self, chat_id: ChatId) -> Option<&Profile> {
        self.profiles.get(&chat_id)
    }

    /// Mutable access to an existing profile.
    pub fn get_mut(&mut self, chat_id: ChatId) -> Option<&mut Profile> {
        self.profiles.get_mut(&chat_id)
    }

    /// Whether `chat_id` has a profile.
    pub fn contains(&self, chat_id: ChatId) -> bool {
        self.profiles.contains_key(&chat_id)
    }

    /// Returns the profile for `chat_id`, creating it with defaults on first
    /// contact. The flag is `true` when the profile was just created.
    pub fn get_or_create(&mut self, chat_id: ChatId) -> (&mut Profile, bool) {
        let created = !self.profiles.contains_key(&chat_id);

        if created {
            tracing::debug!("Creating profile for chat: {chat_id}");
            self.profiles.insert(chat_id, Profile::new(chat_id));

            for evicted in self.eviction.on_insert(chat_id, self.profiles.len()) {
                if evicted == chat_id {
                    continue;
                }
                tracing::debug!("Evicting conversation: {evicted}");
                self.profiles.remove(&evicted);
                self.participants.remove(&evicted);
            }
        }

        let profile = self
            .profiles
            .entry(chat_id)
            .or_insert_with(|| Profile::new(chat_id));
        (profile, created)
    }

    /// Stores the participant for its owner, replacing any previous one.
    pub fn set_participant(&mut self, participant: Participant) {
        self.participants.insert(participant.owner, participant);
    }

    /// The participant owned by `chat_id`, if any.
    pub fn participant(&self, chat_id: ChatId) -> Option<&Participant> {
        self.participants.get(&chat_id)
    }

    /// Drops the participant owned by `chat_id`.
    pub fn remove_participant(&mut self, chat_id: ChatId) -> Option<Participant> {
        self.participants.remove(&chat_id)
    }

    /// Number of known conversations.
    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    /// Whether no conversation has been seen.
    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }
}
