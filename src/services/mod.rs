pub mod chat;
pub mod journal;
pub mod signals;

pub use chat::{ChatAssistant, ChatError};
pub use journal::{AppendOnlyLog, JournalError, JsonFileJournal};
pub use signals::SignalEngine;
