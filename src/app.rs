use std::{
    io::{self, BufReader},
    sync::{Arc, Mutex},
};

use anyhow::Result;

use crate::{
    cli::{Cli, Command},
    domain::{
        self,
        events::{BotCommand, CommandRequest},
        reply::CommandReply,
    },
    infra::{self, config::AppConfig, contracts::ReplySink},
    transport::{self, console::ConsoleReplySink, dispatch},
    usecases::{
        self,
        bootstrap::{self, AppProcessor},
        context::AppContext,
    },
};

const CONSOLE_CONVERSATION_ID: &str = "console";

pub fn run(cli: Cli) -> Result<()> {
    let (context, _logging) = bootstrap::bootstrap(cli.config.as_deref())?;

    tracing::debug!(
        domain = domain::module_name(),
        transport = transport::module_name(),
        usecases = usecases::module_name(),
        infra = infra::module_name(),
        "module boundaries loaded"
    );

    let processor = bootstrap::compose_processor(&context);

    match cli.command_or_default() {
        Command::Run => serve_stdin(&context, processor),
        command => match one_shot_request(command, &context.config) {
            Some(request) => run_once(&context, &processor, &request),
            None => Ok(()),
        },
    }
}

fn serve_stdin(context: &AppContext, processor: AppProcessor) -> Result<()> {
    tracing::info!(
        data_file = %context.storage.data_file.display(),
        max_in_flight = context.config.transport.max_in_flight,
        "reading commands from stdin"
    );

    let sink = Arc::new(Mutex::new(ConsoleReplySink::new(
        io::stdout(),
        context.storage.export_dir.clone(),
    )));
    let summary = dispatch::serve(
        Arc::new(processor),
        &context.config,
        BufReader::new(io::stdin()),
        sink,
    )?;

    tracing::info!(
        handled = summary.handled,
        ignored = summary.ignored,
        rejected = summary.rejected,
        failed_deliveries = summary.failed_deliveries,
        "inbound stream closed"
    );

    Ok(())
}

fn run_once(context: &AppContext, processor: &AppProcessor, request: &CommandRequest) -> Result<()> {
    let reply = processor.handle(request);

    let mut sink = ConsoleReplySink::new(io::stdout(), context.storage.export_dir.clone());
    sink.deliver(&request.conversation_id, &reply)?;

    if let CommandReply::Error(error) = reply {
        anyhow::bail!("{}: command was not applied", error.code());
    }

    Ok(())
}

fn one_shot_request(command: Command, config: &AppConfig) -> Option<CommandRequest> {
    let request = match command {
        Command::Run => return None,
        Command::Products => CommandRequest::new(
            CONSOLE_CONVERSATION_ID,
            CONSOLE_CONVERSATION_ID,
            BotCommand::ListProducts,
        ),
        Command::Done {
            chat,
            reply_to,
            product,
        } => {
            let request = CommandRequest::new(
                chat.chat.as_str(),
                config.conversation_label(&chat.chat),
                BotCommand::RecordOrder {
                    product_text: product.join(" "),
                },
            );
            match reply_to {
                Some(_) => request.replying(),
                None => request,
            }
        }
        Command::Stats { chat } => CommandRequest::new(
            chat.chat.as_str(),
            config.conversation_label(&chat.chat),
            BotCommand::Stats,
        ),
        Command::Total { chat } => CommandRequest::new(
            chat.chat.as_str(),
            config.conversation_label(&chat.chat),
            BotCommand::Total,
        ),
        Command::Clear { chat, label } => {
            let label = label.unwrap_or_else(|| config.conversation_label(&chat.chat));
            CommandRequest::new(chat.chat, label, BotCommand::ClearAndExport)
        }
    };

    Some(request)
}
