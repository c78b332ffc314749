//! Records held by the store

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub type AgentId = u64;
pub type PromptId = u64;
pub type KnowledgeBaseId = u64;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Agent {
    pub id: AgentId,
    pub name: String,
    pub model_id: String,
    pub prompt_id: PromptId,
    /// Serialized as `null` when absent
    pub knowledge_base_id: Option<KnowledgeBaseId>,
}

/// Fields supplied by the caller when creating an agent
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewAgent {
    pub name: String,
    pub model_id: String,
    pub prompt_id: PromptId,
    #[serde(default)]
    pub knowledge_base_id: Option<KnowledgeBaseId>,
}

impl NewAgent {
    pub(crate) fn into_agent(self, id: AgentId) -> Agent {
        Agent {
            id,
            name: self.name,
            model_id: self.model_id,
            prompt_id: self.prompt_id,
            knowledge_base_id: self.knowledge_base_id,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Prompt {
    pub id: PromptId,
    pub name: String,
    pub content: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewPrompt {
    pub name: String,
    pub content: String,
}

impl NewPrompt {
    pub(crate) fn into_prompt(self, id: PromptId) -> Prompt {
        Prompt {
            id,
            name: self.name,
            content: self.content,
        }
    }
}

/// Only the display name survives an upload; file contents are never kept.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KnowledgeBase {
    pub id: KnowledgeBaseId,
    pub name: String,
}

/// Entry in the static model catalog
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Model {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
    pub timestamp: DateTime<Utc>,
}

impl ChatMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self::now(Role::User, content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::now(Role::Assistant, content)
    }

    fn now(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
            timestamp: Utc::now(),
        }
    }
}

/// Transcript for one agent. Messages are append-only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatHistory {
    pub agent_id: AgentId,
    pub messages: Vec<ChatMessage>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absent_knowledge_base_serializes_as_null() {
        let agent = Agent {
            id: 7,
            name: "Bot1".to_string(),
            model_id: "m1".to_string(),
            prompt_id: 1,
            knowledge_base_id: None,
        };

        let json = serde_json::to_value(&agent).unwrap();
        assert!(json["knowledge_base_id"].is_null());
        assert_eq!(json["model_id"], "m1");
    }

    #[test]
    fn role_uses_lowercase_on_the_wire() {
        let msg = ChatMessage::user("hi");
        let json = serde_json::to_value(&msg).unwrap();
        assert_eq!(json["role"], "user");
        assert_eq!(Role::Assistant.as_str(), "assistant");
    }

    #[test]
    fn timestamps_accept_iso_strings() {
        let raw = r#"{"role":"assistant","content":"ok","timestamp":"2024-05-01T12:30:00.000Z"}"#;
        let msg: ChatMessage = serde_json::from_str(raw).unwrap();
        assert_eq!(msg.role, Role::Assistant);
        assert_eq!(msg.timestamp.to_rfc3339(), "2024-05-01T12:30:00+00:00");
    }
}
