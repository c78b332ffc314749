//! Simulated backend latency

use std::time::Duration;

/// Delay applied before each store operation returns
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LatencyProfile {
    pub load_agents: Duration,
    pub load_prompts: Duration,
    pub load_knowledge_bases: Duration,
    pub load_models: Duration,
    pub create_agent: Duration,
    pub create_prompt: Duration,
    pub upload_knowledge_base: Duration,
    pub send_message: Duration,
}

impl LatencyProfile {
    /// Delays mimicking round trips to a remote backend
    pub fn simulated() -> Self {
        Self {
            load_agents: Duration::from_millis(300),
            load_prompts: Duration::from_millis(200),
            load_knowledge_bases: Duration::from_millis(200),
            load_models: Duration::from_millis(100),
            create_agent: Duration::from_millis(500),
            create_prompt: Duration::from_millis(300),
            upload_knowledge_base: Duration::from_millis(1000),
            send_message: Duration::from_millis(1500),
        }
    }

    pub fn none() -> Self {
        Self {
            load_agents: Duration::ZERO,
            load_prompts: Duration::ZERO,
            load_knowledge_bases: Duration::ZERO,
            load_models: Duration::ZERO,
            create_agent: Duration::ZERO,
            create_prompt: Duration::ZERO,
            upload_knowledge_base: Duration::ZERO,
            send_message: Duration::ZERO,
        }
    }

    pub fn from_flag(simulate: bool) -> Self {
        if simulate {
            Self::simulated()
        } else {
            Self::none()
        }
    }
}

impl Default for LatencyProfile {
    fn default() -> Self {
        Self::simulated()
    }
}

pub(crate) async fn pause(delay: Duration) {
    if !delay.is_zero() {
        tokio::time::sleep(delay).await;
    }
}
