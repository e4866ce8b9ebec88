//! In-memory conversation store
//!
//! Keeps the most recent messages of every conversation for the lifetime of
//! the process. Nothing is persisted; a restart forgets all sessions.

use std::collections::{HashMap, VecDeque};
use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::message::Message;

/// Thread-safe store of bounded per-conversation histories
#[derive(Debug)]
pub struct ConversationMemory {
    max_messages: usize,
    store: Mutex<HashMap<String, VecDeque<Message>>>,
}

impl ConversationMemory {
    pub fn new(max_messages: usize) -> Self {
        Self {
            max_messages,
            store: Mutex::new(HashMap::new()),
        }
    }

    /// Copy of the stored history, empty for an unknown id
    pub fn get_history(&self, conversation_id: &str) -> Vec<Message> {
        self.lock()
            .get(conversation_id)
            .map(|history| history.iter().cloned().collect())
            .unwrap_or_default()
    }

    /// Replace the stored history, keeping only the newest `max_messages`
    pub fn set_history<I>(&self, conversation_id: &str, messages: I)
    where
        I: IntoIterator<Item = Message>,
    {
        let mut limited = VecDeque::with_capacity(self.max_messages);
        for message in messages {
            push_bounded(&mut limited, message, self.max_messages);
        }
        self.lock().insert(conversation_id.to_string(), limited);
    }

    /// Append messages, evicting the oldest ones past `max_messages`
    pub fn append_messages<I>(&self, conversation_id: &str, messages: I)
    where
        I: IntoIterator<Item = Message>,
    {
        let mut store = self.lock();
        let history = store
            .entry(conversation_id.to_string())
            .or_insert_with(|| VecDeque::with_capacity(self.max_messages));
        for message in messages {
            push_bounded(history, message, self.max_messages);
        }
    }

    /// Number of tracked conversations
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    // A panic while holding the lock cannot leave a deque half-written, so a
    // poisoned mutex is still safe to use.
    fn lock(&self) -> MutexGuard<'_, HashMap<String, VecDeque<Message>>> {
        self.store.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

fn push_bounded(history: &mut VecDeque<Message>, message: Message, max: usize) {
    if max == 0 {
        return;
    }
    while history.len() >= max {
        history.pop_front();
    }
    history.push_back(message);
}
