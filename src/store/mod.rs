//! Agent, prompt and knowledge base state with chat history threading

pub mod catalog;
pub mod error;
pub mod ids;
pub mod latency;
pub mod models;
pub mod options;
pub mod reply;
pub mod store;

pub use error::{StoreError, StoreResult};
pub use latency::LatencyProfile;
pub use models::{
    Agent, AgentId, ChatHistory, ChatMessage, KnowledgeBase, KnowledgeBaseId, Model, NewAgent,
    NewPrompt, Prompt, PromptId, Role,
};
pub use options::{HistoryMode, StoreOptions, ValidationMode};
pub use reply::{CannedReplies, ReplyContext, ReplyProvider};
pub use store::Store;
