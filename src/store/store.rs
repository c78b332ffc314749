//! The state store: sole owner of the agent, prompt, knowledge base and chat
//! history collections, and the only writer to durable storage.

use std::path::Path;
use std::sync::Arc;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use super::catalog::{
    self, AGENTS_KEY, CHAT_HISTORIES_KEY, KNOWLEDGE_BASES_KEY, PROMPTS_KEY,
};
use super::error::{StoreError, StoreResult};
use super::ids::IdSequence;
use super::latency::pause;
use super::models::{
    Agent, AgentId, ChatHistory, ChatMessage, KnowledgeBase, Model, NewAgent, NewPrompt, Prompt,
    PromptId,
};
use super::options::{HistoryMode, StoreOptions};
use super::reply::{CannedReplies, ReplyContext, ReplyProvider};
use crate::db::KeyValueStore;

struct Collections {
    agents: Vec<Agent>,
    prompts: Vec<Prompt>,
    knowledge_bases: Vec<KnowledgeBase>,
    chat_histories: Vec<ChatHistory>,
    agent_ids: IdSequence,
    prompt_ids: IdSequence,
    knowledge_base_ids: IdSequence,
}

impl Collections {
    fn new(
        agents: Vec<Agent>,
        prompts: Vec<Prompt>,
        knowledge_bases: Vec<KnowledgeBase>,
        chat_histories: Vec<ChatHistory>,
    ) -> Self {
        Self {
            agent_ids: IdSequence::starting_after(agents.iter().map(|a| a.id)),
            prompt_ids: IdSequence::starting_after(prompts.iter().map(|p| p.id)),
            knowledge_base_ids: IdSequence::starting_after(knowledge_bases.iter().map(|k| k.id)),
            agents,
            prompts,
            knowledge_bases,
            chat_histories,
        }
    }

    fn agent(&self, id: AgentId) -> Option<&Agent> {
        self.agents.iter().find(|a| a.id == id)
    }

    fn prompt(&self, id: PromptId) -> Option<&Prompt> {
        self.prompts.iter().find(|p| p.id == id)
    }

    fn history(&self, agent_id: AgentId) -> Option<&ChatHistory> {
        self.chat_histories.iter().find(|h| h.agent_id == agent_id)
    }

    fn validate_agent(&self, data: &NewAgent) -> StoreResult<()> {
        if data.name.trim().is_empty() {
            return Err(StoreError::Validation("agent name is required".to_string()));
        }
        if !catalog::has_model(&data.model_id) {
            return Err(StoreError::not_found("Model", &data.model_id));
        }
        if self.prompt(data.prompt_id).is_none() {
            return Err(StoreError::not_found("Prompt", data.prompt_id));
        }
        if let Some(kb_id) = data.knowledge_base_id {
            if !self.knowledge_bases.iter().any(|k| k.id == kb_id) {
                return Err(StoreError::not_found("Knowledge base", kb_id));
            }
        }
        Ok(())
    }
}

fn validate_prompt(data: &NewPrompt) -> StoreResult<()> {
    if data.name.trim().is_empty() {
        return Err(StoreError::Validation("prompt name is required".to_string()));
    }
    if data.content.trim().is_empty() {
        return Err(StoreError::Validation("prompt content is required".to_string()));
    }
    Ok(())
}

async fn validate_upload(file: &Path, name: &str) -> StoreResult<()> {
    if name.trim().is_empty() {
        return Err(StoreError::Validation(
            "knowledge base name is required".to_string(),
        ));
    }
    let is_file = tokio::fs::metadata(file)
        .await
        .map(|meta| meta.is_file())
        .unwrap_or(false);
    if !is_file {
        return Err(StoreError::Validation(format!(
            "no file to upload at {}",
            file.display()
        )));
    }
    Ok(())
}

/// Explicitly constructed, cheaply cloneable handle to one set of collections.
///
/// Mutations are serialized by an internal lock: each one builds the new
/// collection, writes it in full under its key, and only then makes it
/// visible in memory.
#[derive(Clone)]
pub struct Store {
    state: Arc<Mutex<Collections>>,
    kv: Arc<dyn KeyValueStore>,
    replies: Arc<dyn ReplyProvider>,
    options: StoreOptions,
}

impl Store {
    /// Hydrate a store from durable storage, seeding the built-in prompts on
    /// first run.
    pub async fn open(kv: Arc<dyn KeyValueStore>, options: StoreOptions) -> StoreResult<Self> {
        let agents = read_collection::<Agent>(kv.as_ref(), AGENTS_KEY).await?;
        let prompts = read_collection::<Prompt>(kv.as_ref(), PROMPTS_KEY).await?;
        let knowledge_bases =
            read_collection::<KnowledgeBase>(kv.as_ref(), KNOWLEDGE_BASES_KEY).await?;
        let chat_histories =
            read_collection::<ChatHistory>(kv.as_ref(), CHAT_HISTORIES_KEY).await?;

        let prompts = match prompts {
            Some(prompts) => prompts,
            None => {
                let seeded = catalog::seed_prompts();
                write_collection(kv.as_ref(), PROMPTS_KEY, &seeded).await?;
                info!("Seeded {} built-in prompts", seeded.len());
                seeded
            }
        };

        let collections = Collections::new(
            agents.unwrap_or_default(),
            prompts,
            knowledge_bases.unwrap_or_default(),
            chat_histories.unwrap_or_default(),
        );

        info!(
            "Store hydrated: {} agents, {} prompts, {} knowledge bases, {} chat histories",
            collections.agents.len(),
            collections.prompts.len(),
            collections.knowledge_bases.len(),
            collections.chat_histories.len()
        );

        Ok(Self {
            state: Arc::new(Mutex::new(collections)),
            kv,
            replies: Arc::new(CannedReplies::new()),
            options,
        })
    }

    /// Swap the backend that writes assistant replies
    pub fn with_reply_provider(mut self, replies: Arc<dyn ReplyProvider>) -> Self {
        self.replies = replies;
        self
    }

    pub async fn load_agents(&self) -> Vec<Agent> {
        pause(self.options.latency.load_agents).await;
        self.state.lock().await.agents.clone()
    }

    pub async fn load_prompts(&self) -> Vec<Prompt> {
        pause(self.options.latency.load_prompts).await;
        self.state.lock().await.prompts.clone()
    }

    pub async fn load_knowledge_bases(&self) -> Vec<KnowledgeBase> {
        pause(self.options.latency.load_knowledge_bases).await;
        self.state.lock().await.knowledge_bases.clone()
    }

    pub async fn load_models(&self) -> Vec<Model> {
        pause(self.options.latency.load_models).await;
        self.models()
    }

    /// The model catalog without the simulated round trip
    pub fn models(&self) -> Vec<Model> {
        catalog::models()
    }

    pub async fn find_agent(&self, id: AgentId) -> Option<Agent> {
        self.state.lock().await.agent(id).cloned()
    }

    pub async fn find_prompt(&self, id: PromptId) -> Option<Prompt> {
        self.state.lock().await.prompt(id).cloned()
    }

    pub async fn chat_history(&self, agent_id: AgentId) -> Option<ChatHistory> {
        self.state.lock().await.history(agent_id).cloned()
    }

    pub async fn chat_histories(&self) -> Vec<ChatHistory> {
        self.state.lock().await.chat_histories.clone()
    }

    pub async fn create_agent(&self, data: NewAgent) -> StoreResult<Agent> {
        pause(self.options.latency.create_agent).await;

        let mut state = self.state.lock().await;
        if self.options.validation.is_strict() {
            if let Err(e) = state.validate_agent(&data) {
                warn!("Rejected agent {:?}: {}", data.name, e);
                return Err(e);
            }
        }

        let id = state.agent_ids.peek().ok_or(StoreError::IdsExhausted("Agent"))?;
        let agent = data.into_agent(id);
        let mut agents = state.agents.clone();
        agents.push(agent.clone());

        write_collection(self.kv.as_ref(), AGENTS_KEY, &agents).await?;
        state.agents = agents;
        state.agent_ids.advance();

        debug!("Created agent {} ({})", agent.id, agent.name);
        Ok(agent)
    }

    pub async fn create_prompt(&self, data: NewPrompt) -> StoreResult<Prompt> {
        pause(self.options.latency.create_prompt).await;

        if self.options.validation.is_strict() {
            if let Err(e) = validate_prompt(&data) {
                warn!("Rejected prompt {:?}: {}", data.name, e);
                return Err(e);
            }
        }

        let mut state = self.state.lock().await;
        let id = state.prompt_ids.peek().ok_or(StoreError::IdsExhausted("Prompt"))?;
        let prompt = data.into_prompt(id);
        let mut prompts = state.prompts.clone();
        prompts.push(prompt.clone());

        write_collection(self.kv.as_ref(), PROMPTS_KEY, &prompts).await?;
        state.prompts = prompts;
        state.prompt_ids.advance();

        debug!("Created prompt {} ({})", prompt.id, prompt.name);
        Ok(prompt)
    }

    /// Register a knowledge base under `name`. The file is never opened;
    /// only the name is kept.
    pub async fn upload_knowledge_base(
        &self,
        file: &Path,
        name: &str,
    ) -> StoreResult<KnowledgeBase> {
        pause(self.options.latency.upload_knowledge_base).await;

        if self.options.validation.is_strict() {
            if let Err(e) = validate_upload(file, name).await {
                warn!("Rejected knowledge base {:?}: {}", name, e);
                return Err(e);
            }
        }

        let mut state = self.state.lock().await;
        let id = state
            .knowledge_base_ids
            .peek()
            .ok_or(StoreError::IdsExhausted("Knowledge base"))?;
        let knowledge_base = KnowledgeBase {
            id,
            name: name.to_string(),
        };
        let mut knowledge_bases = state.knowledge_bases.clone();
        knowledge_bases.push(knowledge_base.clone());

        write_collection(self.kv.as_ref(), KNOWLEDGE_BASES_KEY, &knowledge_bases).await?;
        state.knowledge_bases = knowledge_bases;
        state.knowledge_base_ids.advance();

        debug!(
            "Created knowledge base {} ({}) from {:?}",
            knowledge_base.id,
            knowledge_base.name,
            file.file_name().unwrap_or_default()
        );
        Ok(knowledge_base)
    }

    /// Send `text` to an agent and return the assistant's reply.
    ///
    /// The user message and the reply are appended, in that order, to the
    /// agent's history, which is created on first use. What happens to
    /// `prior` depends on [`HistoryMode`].
    pub async fn send_message(
        &self,
        agent_id: AgentId,
        text: &str,
        prior: &[ChatMessage],
    ) -> StoreResult<ChatMessage> {
        pause(self.options.latency.send_message).await;

        let seed = match self.options.history {
            HistoryMode::CallerSupplied if !prior.is_empty() => Some(prior.to_vec()),
            HistoryMode::CallerSupplied => None,
            HistoryMode::Stored => {
                if !prior.is_empty() {
                    debug!(
                        "Ignoring {} caller-supplied messages for agent {}",
                        prior.len(),
                        agent_id
                    );
                }
                None
            }
        };

        let ctx = {
            let state = self.state.lock().await;
            let agent = state.agent(agent_id).cloned();

            if self.options.validation.is_strict() {
                if agent.is_none() {
                    warn!("Rejected message to unknown agent {}", agent_id);
                    return Err(StoreError::not_found("Agent", agent_id));
                }
                if text.trim().is_empty() {
                    return Err(StoreError::Validation("message is empty".to_string()));
                }
            }

            let prompt = agent
                .as_ref()
                .and_then(|a| state.prompt(a.prompt_id))
                .cloned();
            let history = match &seed {
                Some(messages) => messages.clone(),
                None => state
                    .history(agent_id)
                    .map(|h| h.messages.clone())
                    .unwrap_or_default(),
            };

            ReplyContext {
                agent,
                prompt,
                message: text.to_string(),
                history,
            }
        };

        let user_message = ChatMessage::user(text);
        let content = self
            .replies
            .reply(&ctx)
            .await
            .map_err(StoreError::Reply)?;
        let reply = ChatMessage::assistant(content);

        let mut state = self.state.lock().await;
        let mut histories = state.chat_histories.clone();
        match histories.iter_mut().find(|h| h.agent_id == agent_id) {
            Some(history) => {
                if let Some(messages) = seed {
                    history.messages = messages;
                }
                history.messages.push(user_message);
                history.messages.push(reply.clone());
            }
            None => {
                let mut messages = seed.unwrap_or_default();
                messages.push(user_message);
                messages.push(reply.clone());
                histories.push(ChatHistory { agent_id, messages });
            }
        }

        write_collection(self.kv.as_ref(), CHAT_HISTORIES_KEY, &histories).await?;
        state.chat_histories = histories;

        debug!("Agent {} replied ({} chars)", agent_id, reply.content.len());
        Ok(reply)
    }
}

async fn read_collection<T: DeserializeOwned>(
    kv: &dyn KeyValueStore,
    key: &str,
) -> StoreResult<Option<Vec<T>>> {
    let Some(raw) = kv.get(key).await? else {
        return Ok(None);
    };

    serde_json::from_str(&raw)
        .map(Some)
        .map_err(|source| StoreError::Corrupt {
            key: key.to_string(),
            source,
        })
}

async fn write_collection<T: Serialize>(
    kv: &dyn KeyValueStore,
    key: &str,
    items: &[T],
) -> StoreResult<()> {
    let json = serde_json::to_string(items)?;
    kv.set(key, &json).await?;
    Ok(())
}
