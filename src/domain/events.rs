/// Commands the bot understands, already stripped of transport syntax.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BotCommand {
    Help,
    ListProducts,
    RecordOrder { product_text: String },
    Stats,
    Total,
    ClearAndExport,
}

impl BotCommand {
    pub fn as_label(&self) -> &'static str {
        match self {
            Self::Help => "help",
            Self::ListProducts => "list_products",
            Self::RecordOrder { .. } => "record_order",
            Self::Stats => "stats",
            Self::Total => "total",
            Self::ClearAndExport => "clear_and_export",
        }
    }
}

/// A command addressed to one conversation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandRequest {
    pub conversation_id: String,
    pub conversation_label: String,
    /// Whether the inbound message replied to another message.
    pub is_reply: bool,
    pub command: BotCommand,
}

impl CommandRequest {
    pub fn new(
        conversation_id: impl Into<String>,
        conversation_label: impl Into<String>,
        command: BotCommand,
    ) -> Self {
        Self {
            conversation_id: conversation_id.into(),
            conversation_label: conversation_label.into(),
            is_reply: false,
            command,
        }
    }

    pub fn replying(mut self) -> Self {
        self.is_reply = true;
        self
    }
}
