//! Static catalog, seed data and storage keys

use super::models::{Model, Prompt};

pub const AGENTS_KEY: &str = "orquestrador_agents";
pub const PROMPTS_KEY: &str = "orquestrador_prompts";
pub const KNOWLEDGE_BASES_KEY: &str = "orquestrador_knowledge_bases";
pub const CHAT_HISTORIES_KEY: &str = "orquestrador_chat_histories";

const MODELS: &[(&str, &str)] = &[
    ("google/gemma-3-12b-it:free", "Google Gemma 3 (Free)"),
    ("anthropic/claude-3-haiku", "Claude 3 Haiku"),
    ("openai/gpt-4-turbo", "GPT-4 Turbo"),
    ("meta/llama-3-70b", "Llama 3 70B"),
];

const SEED_PROMPTS: &[(u64, &str, &str)] = &[
    (
        1,
        "Assistente Geral",
        "Você é um assistente útil e informativo. Responda de forma clara e precisa.",
    ),
    (
        2,
        "Especialista em Código",
        "Você é um especialista em programação. Ajude com questões técnicas e code reviews.",
    ),
];

/// The read-only model catalog
pub fn models() -> Vec<Model> {
    MODELS
        .iter()
        .map(|(id, name)| Model {
            id: id.to_string(),
            name: name.to_string(),
        })
        .collect()
}

pub fn has_model(id: &str) -> bool {
    MODELS.iter().any(|(model_id, _)| *model_id == id)
}

/// Prompts written on first run, when nothing was persisted yet
pub fn seed_prompts() -> Vec<Prompt> {
    SEED_PROMPTS
        .iter()
        .map(|(id, name, content)| Prompt {
            id: *id,
            name: name.to_string(),
            content: content.to_string(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_ids_are_unique() {
        let models = models();
        assert_eq!(models.len(), 4);
        for (i, m) in models.iter().enumerate() {
            assert!(models[i + 1..].iter().all(|other| other.id != m.id));
        }
    }

    #[test]
    fn has_model_matches_catalog() {
        assert!(has_model("openai/gpt-4-turbo"));
        assert!(!has_model("m1"));
    }

    #[test]
    fn seed_prompts_start_at_one() {
        let prompts = seed_prompts();
        assert_eq!(prompts.len(), 2);
        assert_eq!(prompts[0].id, 1);
        assert_eq!(prompts[1].name, "Especialista em Código");
    }
}
