//! Concurrent dispatch of inbound console lines to the order processor.

use std::{
    io::BufRead,
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc, Mutex, PoisonError,
    },
};

use anyhow::{Context, Result};
use tokio::{sync::Semaphore, task::JoinSet};

use crate::{
    domain::{events::CommandRequest, reply::CommandReply},
    infra::{config::AppConfig, contracts::ReplySink},
    transport::{commands::parse_command, console::parse_line},
    usecases::{
        contracts::{Clock, CounterStore},
        orders::OrderCommandProcessor,
    },
};

const INBOUND_LINE_REJECTED: &str = "TRANSPORT_INBOUND_LINE_REJECTED";
const REPLY_DELIVERY_FAILED: &str = "TRANSPORT_REPLY_DELIVERY_FAILED";
const WORKER_PANICKED: &str = "TRANSPORT_WORKER_PANICKED";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ServeSummary {
    pub handled: usize,
    pub ignored: usize,
    pub rejected: usize,
    pub failed_deliveries: usize,
}

/// Reads inbound lines until EOF, running each command on the blocking pool.
///
/// At most `transport.max_in_flight` commands run at once. Replies are
/// delivered as commands finish, so with more than one in flight they may
/// arrive out of input order.
pub fn serve<S, C, R>(
    processor: Arc<OrderCommandProcessor<S, C>>,
    config: &AppConfig,
    input: impl BufRead,
    sink: Arc<Mutex<R>>,
) -> Result<ServeSummary>
where
    S: CounterStore + 'static,
    C: Clock + 'static,
    R: ReplySink + 'static,
{
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .thread_name("order-counter-worker")
        .build()
        .context("failed to start dispatch runtime")?;

    runtime.block_on(dispatch_lines(processor, config, input, sink))
}

async fn dispatch_lines<S, C, R>(
    processor: Arc<OrderCommandProcessor<S, C>>,
    config: &AppConfig,
    input: impl BufRead,
    sink: Arc<Mutex<R>>,
) -> Result<ServeSummary>
where
    S: CounterStore + 'static,
    C: Clock + 'static,
    R: ReplySink + 'static,
{
    let limiter = Arc::new(Semaphore::new(config.transport.in_flight_limit()));
    let failed_deliveries = Arc::new(AtomicUsize::new(0));
    let mut workers = JoinSet::new();
    let mut summary = ServeSummary::default();

    // Lines are read on the driver thread; commands run on the blocking pool.
    for (index, line) in input.lines().enumerate() {
        let line = line.context("failed to read inbound line")?;
        let line_number = index + 1;

        let message = match parse_line(&line) {
            Ok(Some(message)) => message,
            Ok(None) => continue,
            Err(error) => {
                tracing::warn!(
                    code = INBOUND_LINE_REJECTED,
                    line_number,
                    error = %error,
                    "skipping malformed inbound line"
                );
                summary.rejected += 1;
                continue;
            }
        };

        let Some(command) = parse_command(&message.text) else {
            tracing::debug!(line_number, "ignoring message without a known command");
            summary.ignored += 1;
            continue;
        };

        let request = message.into_request(command, config);
        let permit = Arc::clone(&limiter)
            .acquire_owned()
            .await
            .context("dispatch limiter closed")?;
        let processor = Arc::clone(&processor);
        let sink = Arc::clone(&sink);
        let failed_deliveries = Arc::clone(&failed_deliveries);

        workers.spawn_blocking(move || {
            let _permit = permit;
            let reply = processor.handle(&request);
            if !deliver(sink.as_ref(), &request, &reply) {
                failed_deliveries.fetch_add(1, Ordering::Relaxed);
            }
        });
        summary.handled += 1;

        while let Some(finished) = workers.try_join_next() {
            log_worker_outcome(finished);
        }
    }

    while let Some(finished) = workers.join_next().await {
        log_worker_outcome(finished);
    }

    summary.failed_deliveries = failed_deliveries.load(Ordering::Relaxed);
    Ok(summary)
}

/// Delivery failures are logged and never stop the loop; a committed
/// mutation stays committed.
fn deliver<R: ReplySink>(
    sink: &Mutex<R>,
    request: &CommandRequest,
    reply: &CommandReply,
) -> bool {
    let mut sink = sink.lock().unwrap_or_else(PoisonError::into_inner);

    match sink.deliver(&request.conversation_id, reply) {
        Ok(()) => true,
        Err(error) => {
            tracing::error!(
                code = REPLY_DELIVERY_FAILED,
                conversation_id = %request.conversation_id,
                command = request.command.as_label(),
                has_document = reply.document().is_some(),
                error = ?error,
                "reply delivery failed"
            );
            false
        }
    }
}

fn log_worker_outcome(outcome: Result<(), tokio::task::JoinError>) {
    if let Err(error) = outcome {
        tracing::error!(code = WORKER_PANICKED, error = %error, "command worker failed");
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use tempfile::TempDir;

    use super::*;
    use crate::{
        domain::catalog::Catalog,
        infra::{counter_store::JsonCounterStore, stubs::RecordingReplySink},
    };

    fn processor_in(dir: &TempDir) -> Arc<OrderCommandProcessor<Arc<JsonCounterStore>>> {
        let store = Arc::new(JsonCounterStore::new(dir.path().join("order_counts.json")));
        Arc::new(OrderCommandProcessor::new(Catalog::default(), store))
    }

    fn config_with_in_flight(max_in_flight: usize) -> AppConfig {
        let mut config = AppConfig::default();
        config.transport.max_in_flight = max_in_flight;
        config
    }

    fn texts(sink: &Mutex<RecordingReplySink>) -> Vec<String> {
        sink.lock()
            .expect("sink lock")
            .delivered
            .iter()
            .map(|(_, reply)| reply.display_text().to_owned())
            .collect()
    }

    #[test]
    fn single_worker_answers_in_input_order() {
        let dir = TempDir::new().expect("temp dir");
        let sink = Arc::new(Mutex::new(RecordingReplySink::default()));
        let input = Cursor::new(
            "# morning\n\
             1 /done gpt go\n\
             1 hello there\n\
             1 /done GPT GO\n\
             2 /stats\n\
             oops\n\
             1 /total\n",
        );

        let summary = serve(
            processor_in(&dir),
            &config_with_in_flight(1),
            input,
            Arc::clone(&sink),
        )
        .expect("serve should finish");

        assert_eq!(
            summary,
            ServeSummary {
                handled: 4,
                ignored: 1,
                rejected: 1,
                failed_deliveries: 0,
            }
        );
        let replies = texts(&sink);
        assert_eq!(replies[0], "✅ Order counted for GPT GO (total: 1)");
        assert_eq!(replies[1], "✅ Order counted for GPT GO (total: 2)");
        assert_eq!(replies[2], "No orders recorded yet in this chat.");
        assert!(replies[3].ends_with("Total: 2"));
    }

    #[test]
    fn concurrent_dispatch_keeps_every_increment() {
        let dir = TempDir::new().expect("temp dir");
        let sink = Arc::new(Mutex::new(RecordingReplySink::default()));
        let lines: String = (0..120)
            .map(|i| format!("{} /done Krea Pro\n", i % 3))
            .collect();

        let processor = processor_in(&dir);
        let summary = serve(
            Arc::clone(&processor),
            &config_with_in_flight(8),
            Cursor::new(lines),
            Arc::clone(&sink),
        )
        .expect("serve should finish");

        assert_eq!(summary.handled, 120);
        for chat in ["0", "1", "2"] {
            let reply = processor.report_total(chat);
            assert!(
                reply.display_text().ends_with("Total: 40"),
                "chat {chat}: {}",
                reply.display_text()
            );
        }

        let mut counts: Vec<String> = texts(&sink);
        counts.sort();
        counts.dedup();
        assert_eq!(counts.len(), 40, "each count value appears once per chat");
    }

    #[test]
    fn failed_delivery_still_commits_clear() {
        let dir = TempDir::new().expect("temp dir");
        let sink = Arc::new(Mutex::new(RecordingReplySink {
            fail: true,
            ..RecordingReplySink::default()
        }));
        let processor = processor_in(&dir);

        let summary = serve(
            Arc::clone(&processor),
            &config_with_in_flight(1),
            Cursor::new("5 /done Cur Ultra\n5 /clear\n"),
            sink,
        )
        .expect("serve should finish");

        assert_eq!(summary.failed_deliveries, 2);
        assert_eq!(
            processor.report_stats("5"),
            CommandReply::text("No orders recorded yet in this chat.")
        );
    }
}
