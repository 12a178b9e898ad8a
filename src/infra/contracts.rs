use anyhow::Result;

use crate::{domain::reply::CommandReply, infra::config::AppConfig};

pub trait ConfigAdapter {
    fn load(&self) -> Result<AppConfig>;
}

/// Delivers a command reply back to the conversation it came from.
pub trait ReplySink: Send {
    fn deliver(&mut self, conversation_id: &str, reply: &CommandReply) -> Result<()>;
}
