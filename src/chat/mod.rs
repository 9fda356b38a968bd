//! Chat module - the scripted assistant behind the site's chat widget

mod live;
mod responder;
mod rules;
mod session;

pub use live::{ChatState, LiveChat, TypingDelay};
pub use responder::{MatchKind, Resolution, Responder};
pub use rules::{ResponseRule, RuleTable, RulesError, SpecialPhrase};
pub use session::{ChatMessage, ChatSession, Sender};
