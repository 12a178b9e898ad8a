//! Order counting commands: record, report and clear-with-export.
//!
//! Every call reloads state through the `CounterStore`; nothing is cached
//! between commands.

use crate::{
    domain::{
        catalog::Catalog,
        counts::OrderTally,
        events::{BotCommand, CommandRequest},
        export::ExportDocument,
        reply::{CommandError, CommandReply},
    },
    usecases::contracts::{Clock, CounterStore, CounterStoreError, SystemClock},
};

const NOTHING_RECORDED: &str = "No orders recorded yet in this chat.";
const NOTHING_TO_CLEAR: &str = "Nothing to clear: no orders recorded in this chat.";
const STATS_HEADER: &str = "📊 Order counts";
const TOTAL_HEADER: &str = "📦 Total orders in this group";

const HELP_TEXT: &str = "📦 Order Counter Bot\n\n\
• Use /done <product> to count an order (reply to the order message).\n\
• Use /stats to see counts per product.\n\
• Use /total to see total orders in this group.\n\
• Use /products to list valid product names.\n\
• Use /clear to export and reset this group's counts.\n\n\
Example: reply to a message, then send: /done GPT RENEW";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct OrderPolicy {
    /// Only count `/done` when it replies to the order message.
    pub require_reply: bool,
}

pub struct OrderCommandProcessor<S, C = SystemClock>
where
    S: CounterStore,
    C: Clock,
{
    catalog: Catalog,
    store: S,
    clock: C,
    policy: OrderPolicy,
}

impl<S> OrderCommandProcessor<S, SystemClock>
where
    S: CounterStore,
{
    pub fn new(catalog: Catalog, store: S) -> Self {
        Self::with_clock(catalog, store, SystemClock)
    }
}

impl<S, C> OrderCommandProcessor<S, C>
where
    S: CounterStore,
    C: Clock,
{
    pub fn with_clock(catalog: Catalog, store: S, clock: C) -> Self {
        Self {
            catalog,
            store,
            clock,
            policy: OrderPolicy::default(),
        }
    }

    pub fn with_policy(mut self, policy: OrderPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn handle(&self, request: &CommandRequest) -> CommandReply {
        let conversation_id = request.conversation_id.as_str();

        let reply = match &request.command {
            BotCommand::Help => self.help(),
            BotCommand::ListProducts => self.list_catalog(),
            BotCommand::RecordOrder { product_text } => {
                if self.policy.require_reply && !request.is_reply {
                    CommandReply::Error(CommandError::MissingReply)
                } else {
                    self.record_order(conversation_id, product_text)
                }
            }
            BotCommand::Stats => self.report_stats(conversation_id),
            BotCommand::Total => self.report_total(conversation_id),
            BotCommand::ClearAndExport => {
                self.clear_and_export(conversation_id, &request.conversation_label)
            }
        };

        if let CommandReply::Error(error) = &reply {
            tracing::info!(
                conversation_id,
                command = request.command.as_label(),
                code = error.code(),
                "command answered with guidance"
            );
        }

        reply
    }

    pub fn help(&self) -> CommandReply {
        CommandReply::text(HELP_TEXT)
    }

    pub fn list_catalog(&self) -> CommandReply {
        let mut lines = vec!["Valid products (use with /done):".to_owned(), String::new()];
        lines.extend(self.catalog.list().iter().map(|p| format!("• {p}")));

        CommandReply::Text(lines.join("\n"))
    }

    pub fn record_order(&self, conversation_id: &str, raw_product_text: &str) -> CommandReply {
        let Some(product) = self.catalog.resolve(raw_product_text) else {
            return CommandReply::Error(CommandError::UnknownProduct);
        };

        match self.store.increment(conversation_id, &product) {
            Ok(count) => {
                tracing::debug!(conversation_id, product = %product, count, "order recorded");
                CommandReply::Text(format!("✅ Order counted for {product} (total: {count})"))
            }
            Err(error) => CommandReply::Error(map_store_error(error)),
        }
    }

    pub fn report_stats(&self, conversation_id: &str) -> CommandReply {
        self.report(conversation_id, STATS_HEADER)
    }

    pub fn report_total(&self, conversation_id: &str) -> CommandReply {
        self.report(conversation_id, TOTAL_HEADER)
    }

    pub fn clear_and_export(&self, conversation_id: &str, conversation_label: &str) -> CommandReply {
        let snapshot = match self.store.snapshot_and_clear(conversation_id) {
            Ok(Some(snapshot)) => snapshot,
            Ok(None) => return CommandReply::text(NOTHING_TO_CLEAR),
            Err(error) => return CommandReply::Error(map_store_error(error)),
        };

        let tally = OrderTally::from_counts(&self.catalog, &snapshot);
        let document = ExportDocument::render(conversation_label, self.clock.now(), &tally);

        tracing::info!(
            conversation_id,
            total = tally.total,
            file_name = %document.file_name,
            "orders cleared and exported"
        );

        CommandReply::TextWithDocument {
            text: format!(
                "🧹 Cleared {} orders from this group. Export attached.",
                tally.total
            ),
            document,
        }
    }

    fn report(&self, conversation_id: &str, header: &str) -> CommandReply {
        let counts = self.store.stats_for(conversation_id);
        if counts.is_empty() {
            return CommandReply::text(NOTHING_RECORDED);
        }

        let tally = OrderTally::from_counts(&self.catalog, &counts);
        let mut lines = vec![header.to_owned(), String::new()];
        lines.extend(
            tally
                .lines
                .iter()
                .map(|(product, count)| format!("{product}: {count}")),
        );
        lines.push(String::new());
        lines.push(format!("Total: {}", tally.total));

        CommandReply::Text(lines.join("\n"))
    }
}

fn map_store_error(error: CounterStoreError) -> CommandError {
    match error {
        CounterStoreError::LockUnavailable | CounterStoreError::WriteFailed => {
            CommandError::StorageWriteFailed
        }
    }
}
