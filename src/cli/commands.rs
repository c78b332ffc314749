//! CLI commands

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

use crate::config::Config;
use crate::core::AppState;
use crate::store::{Agent, ChatMessage, LatencyProfile, NewAgent, NewPrompt};

#[derive(Parser)]
#[command(name = "orquestrador")]
#[command(about = "Configure agents and chat with them", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Database path (default: taken from the config file)
    #[arg(long, global = true)]
    database: Option<String>,

    /// Config file path (default: ~/.orquestrador/config.yml)
    #[arg(long, global = true)]
    config: Option<String>,

    /// Skip the simulated backend latency
    #[arg(long, global = true)]
    no_latency: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// List all agents
    Agents,

    /// Create a new agent
    CreateAgent {
        /// Agent name
        name: String,

        /// Model ID from the catalog
        #[arg(long)]
        model: String,

        /// Prompt ID
        #[arg(long)]
        prompt: u64,

        /// Knowledge base ID
        #[arg(long)]
        knowledge_base: Option<u64>,
    },

    /// List all prompts
    Prompts,

    /// Create a new prompt
    CreatePrompt {
        /// Prompt name
        name: String,

        /// Instruction text
        #[arg(long)]
        content: String,
    },

    /// List all knowledge bases
    KnowledgeBases,

    /// Register a knowledge base for a file
    UploadKnowledgeBase {
        /// File to upload (only its name is recorded)
        file: PathBuf,

        /// Display name
        #[arg(long)]
        name: String,
    },

    /// List the model catalog
    Models,

    /// Send a message to an agent
    Chat {
        /// Agent ID
        agent_id: u64,

        /// Message text
        message: String,
    },

    /// Show the chat history of an agent
    History {
        /// Agent ID
        agent_id: u64,
    },

    /// Check that the database is reachable
    Health,
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();

    let config = Config::load(cli.config.as_deref())?;

    // Create a multi-threaded runtime for CLI operations
    let rt = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;

    rt.block_on(async {
        let mut options = config.store.options();
        if cli.no_latency {
            options = options.with_latency(LatencyProfile::none());
        }

        let app = AppState::open(&config, cli.database.as_deref(), options).await?;
        execute(&app, cli.command).await
    })
}

async fn execute(app: &AppState, command: Commands) -> Result<()> {
    let store = &app.store;

    match command {
        Commands::Agents => {
            let agents = store.load_agents().await;

            if agents.is_empty() {
                println!("No agents found");
            } else {
                for agent in agents {
                    println!("{}", describe_agent(&agent));
                }
            }
            Ok(())
        }

        Commands::CreateAgent {
            name,
            model,
            prompt,
            knowledge_base,
        } => {
            let agent = store
                .create_agent(NewAgent {
                    name,
                    model_id: model,
                    prompt_id: prompt,
                    knowledge_base_id: knowledge_base,
                })
                .await?;

            println!("Created agent: {} ({})", agent.name, agent.id);
            Ok(())
        }

        Commands::Prompts => {
            let prompts = store.load_prompts().await;

            if prompts.is_empty() {
                println!("No prompts found");
            } else {
                for prompt in prompts {
                    println!("[{}] {} - {}", prompt.id, prompt.name, prompt.content);
                }
            }
            Ok(())
        }

        Commands::CreatePrompt { name, content } => {
            let prompt = store.create_prompt(NewPrompt { name, content }).await?;

            println!("Created prompt: {} ({})", prompt.name, prompt.id);
            Ok(())
        }

        Commands::KnowledgeBases => {
            let knowledge_bases = store.load_knowledge_bases().await;

            if knowledge_bases.is_empty() {
                println!("No knowledge bases found");
            } else {
                for kb in knowledge_bases {
                    println!("[{}] {}", kb.id, kb.name);
                }
            }
            Ok(())
        }

        Commands::UploadKnowledgeBase { file, name } => {
            let kb = store.upload_knowledge_base(&file, &name).await?;

            println!("Created knowledge base: {} ({})", kb.name, kb.id);
            Ok(())
        }

        Commands::Models => {
            for model in store.load_models().await {
                println!("{} - {}", model.id, model.name);
            }
            Ok(())
        }

        Commands::Chat { agent_id, message } => {
            let history = store
                .chat_history(agent_id)
                .await
                .map(|h| h.messages)
                .unwrap_or_default();

            let reply = store.send_message(agent_id, &message, &history).await?;

            println!("{}", format_message(&reply));
            Ok(())
        }

        Commands::History { agent_id } => {
            match store.chat_history(agent_id).await {
                Some(history) if !history.messages.is_empty() => {
                    for message in &history.messages {
                        println!("{}", format_message(message));
                    }
                }
                _ => println!("No messages for agent {}", agent_id),
            }
            Ok(())
        }

        Commands::Health => {
            if app.db.health_check().await? {
                println!("Database OK: {}", app.db.path());
                Ok(())
            } else {
                anyhow::bail!("Database unreachable: {}", app.db.path())
            }
        }
    }
}

fn describe_agent(agent: &Agent) -> String {
    format!(
        "[{}] {} - {} (prompt {}, knowledge base {})",
        agent.id,
        agent.name,
        agent.model_id,
        agent.prompt_id,
        agent
            .knowledge_base_id
            .map(|id| id.to_string())
            .unwrap_or_else(|| "-".to_string())
    )
}

fn format_message(message: &ChatMessage) -> String {
    format!(
        "{} {}: {}",
        message.timestamp.format("%Y-%m-%d %H:%M:%S"),
        message.role.as_str(),
        message.content
    )
}
