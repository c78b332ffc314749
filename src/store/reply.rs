//! Assistant reply generation

use std::sync::Mutex;

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::models::{Agent, ChatMessage, Prompt};

const UNKNOWN_PROMPT: &str = "desconhecido";

/// What a reply provider gets to see for one message
#[derive(Debug, Clone)]
pub struct ReplyContext {
    /// `None` when the addressed agent does not exist
    pub agent: Option<Agent>,
    /// The agent's prompt, if both the agent and the prompt exist
    pub prompt: Option<Prompt>,
    pub message: String,
    /// History as it stood before this message
    pub history: Vec<ChatMessage>,
}

impl ReplyContext {
    pub fn prompt_name(&self) -> &str {
        self.prompt
            .as_ref()
            .map(|p| p.name.as_str())
            .unwrap_or(UNKNOWN_PROMPT)
    }
}

/// Backend that turns a user message into assistant text
#[async_trait]
pub trait ReplyProvider: Send + Sync {
    async fn reply(&self, ctx: &ReplyContext) -> Result<String>;
}

/// Picks one of a fixed set of replies uniformly at random.
pub struct CannedReplies {
    rng: Mutex<StdRng>,
}

impl CannedReplies {
    pub fn new() -> Self {
        Self {
            rng: Mutex::new(StdRng::from_entropy()),
        }
    }

    /// Reproducible selection sequence
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: Mutex::new(StdRng::seed_from_u64(seed)),
        }
    }

    /// Every reply this provider can produce for the given prompt name
    pub fn templates(prompt_name: &str) -> [String; 5] {
        [
            "Esta é uma resposta simulada do agente de IA.".to_string(),
            format!(
                "Baseando-me no prompt \"{}\", posso ajudá-lo com sua solicitação.",
                prompt_name
            ),
            "Compreendo sua pergunta. Em um ambiente real, eu processaria esta informação usando o modelo especificado.".to_string(),
            "Esta é uma demonstração da interface de chat. O backend real implementará a lógica de IA completa.".to_string(),
            "Excelente pergunta! Quando conectado ao modelo real, fornecerei respostas mais elaboradas.".to_string(),
        ]
    }
}

impl Default for CannedReplies {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ReplyProvider for CannedReplies {
    async fn reply(&self, ctx: &ReplyContext) -> Result<String> {
        let mut templates = Vec::from(Self::templates(ctx.prompt_name()));
        let index = {
            let mut rng = self
                .rng
                .lock()
                .map_err(|_| anyhow!("Reply generator lock poisoned"))?;
            rng.gen_range(0..templates.len())
        };

        tracing::debug!("Selected canned reply #{}", index);
        Ok(templates.swap_remove(index))
    }
}
