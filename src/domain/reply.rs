use super::export::ExportDocument;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandError {
    /// Input does not match any catalog entry.
    UnknownProduct,
    /// Order commands must reply to the order message.
    MissingReply,
    /// The store could not commit the mutation.
    StorageWriteFailed,
}

impl CommandError {
    pub fn code(self) -> &'static str {
        match self {
            Self::UnknownProduct => "ORDER_UNKNOWN_PRODUCT",
            Self::MissingReply => "ORDER_MISSING_REPLY",
            Self::StorageWriteFailed => "ORDER_STORAGE_WRITE_FAILED",
        }
    }

    pub fn user_message(self) -> &'static str {
        match self {
            Self::UnknownProduct => {
                "❌ Unknown product. Use /products to see valid names.\n\
                 Example: reply to a message, then send: /done GPT RENEW"
            }
            Self::MissingReply => {
                "❌ You must reply to the order message when using /done.\n\
                 Reply to the order/customer message, then send: /done <product>"
            }
            Self::StorageWriteFailed => {
                "⚠️ Could not save order counts right now. Nothing was changed, please retry."
            }
        }
    }
}

/// What the transport should deliver back to the conversation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandReply {
    Text(String),
    TextWithDocument {
        text: String,
        document: ExportDocument,
    },
    Error(CommandError),
}

impl CommandReply {
    pub fn text(value: impl Into<String>) -> Self {
        Self::Text(value.into())
    }

    /// Text shown in the chat, whatever the variant.
    pub fn display_text(&self) -> &str {
        match self {
            Self::Text(text) | Self::TextWithDocument { text, .. } => text,
            Self::Error(error) => error.user_message(),
        }
    }

    pub fn document(&self) -> Option<&ExportDocument> {
        match self {
            Self::TextWithDocument { document, .. } => Some(document),
            _ => None,
        }
    }
}
