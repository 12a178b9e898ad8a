use anyhow::Result;

use crate::{
    domain::reply::CommandReply,
    infra::{
        config::AppConfig,
        contracts::{ConfigAdapter, ReplySink},
    },
};

/// Hands out a fixed, in-memory config.
#[derive(Debug, Clone, Default)]
pub struct StubConfigAdapter {
    pub config: AppConfig,
}

impl ConfigAdapter for StubConfigAdapter {
    fn load(&self) -> Result<AppConfig> {
        Ok(self.config.clone())
    }
}

/// Keeps every delivered reply; optionally fails each delivery.
#[derive(Debug, Clone, Default)]
pub struct RecordingReplySink {
    pub delivered: Vec<(String, CommandReply)>,
    pub fail: bool,
}

impl ReplySink for RecordingReplySink {
    fn deliver(&mut self, conversation_id: &str, reply: &CommandReply) -> Result<()> {
        if self.fail {
            anyhow::bail!("reply sink rejected delivery");
        }

        self.delivered
            .push((conversation_id.to_owned(), reply.clone()));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recording_sink_keeps_delivery_order() {
        let mut sink = RecordingReplySink::default();

        sink.deliver("a", &CommandReply::text("one"))
            .expect("delivery should succeed");
        sink.deliver("b", &CommandReply::text("two"))
            .expect("delivery should succeed");

        let ids: Vec<&str> = sink.delivered.iter().map(|(id, _)| id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b"]);
    }
}
