//! Line-oriented console transport.
//!
//! Inbound lines look like `<chat_id>[:<reply_to_message_id>] <text>`.
//! Replies go to a writer, exported documents to files under a directory.

use std::{
    fs::{self, OpenOptions},
    io::{self, ErrorKind, Write},
    path::{Path, PathBuf},
};

use anyhow::Result;
use thiserror::Error;

use crate::{
    domain::{
        events::{BotCommand, CommandRequest},
        export::ExportDocument,
        reply::CommandReply,
    },
    infra::{config::AppConfig, contracts::ReplySink, error::AppError},
};

const MAX_SAME_NAME_EXPORTS: u32 = 100;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InboundMessage {
    pub chat_id: String,
    pub reply_to: Option<i64>,
    pub text: String,
}

impl InboundMessage {
    pub fn into_request(self, command: BotCommand, config: &AppConfig) -> CommandRequest {
        let label = config.conversation_label(&self.chat_id);
        let request = CommandRequest::new(self.chat_id, label, command);

        if self.reply_to.is_some() {
            request.replying()
        } else {
            request
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LineParseError {
    #[error("line has no message text after the chat id")]
    MissingText,
    #[error("reply id {0:?} is not a message number")]
    InvalidReplyId(String),
    #[error("chat id is empty")]
    EmptyChatId,
}

/// Parses one inbound line. Blank lines and `#` comments yield `Ok(None)`.
pub fn parse_line(line: &str) -> Result<Option<InboundMessage>, LineParseError> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return Ok(None);
    }

    let (address, text) = line
        .split_once(char::is_whitespace)
        .ok_or(LineParseError::MissingText)?;
    let text = text.trim();
    if text.is_empty() {
        return Err(LineParseError::MissingText);
    }

    let (chat_id, reply_to) = match address.split_once(':') {
        Some((chat_id, reply)) => {
            let reply_to = reply
                .parse::<i64>()
                .map_err(|_| LineParseError::InvalidReplyId(reply.to_owned()))?;
            (chat_id, Some(reply_to))
        }
        None => (address, None),
    };

    if chat_id.is_empty() {
        return Err(LineParseError::EmptyChatId);
    }

    Ok(Some(InboundMessage {
        chat_id: chat_id.to_owned(),
        reply_to,
        text: text.to_owned(),
    }))
}

/// Writes replies as `[<chat_id>] <line>` and saves documents under
/// `<export_dir>/<chat_id>/`.
#[derive(Debug)]
pub struct ConsoleReplySink<W> {
    out: W,
    export_dir: PathBuf,
}

impl<W: Write + Send> ConsoleReplySink<W> {
    pub fn new(out: W, export_dir: impl Into<PathBuf>) -> Self {
        Self {
            out,
            export_dir: export_dir.into(),
        }
    }

    #[cfg(test)]
    pub fn into_inner(self) -> W {
        self.out
    }

    fn write_lines(&mut self, conversation_id: &str, text: &str) -> Result<(), AppError> {
        for line in text.lines() {
            writeln!(self.out, "[{conversation_id}] {line}").map_err(AppError::ReplyWrite)?;
        }
        self.out.flush().map_err(AppError::ReplyWrite)
    }
}

impl<W: Write + Send> ReplySink for ConsoleReplySink<W> {
    fn deliver(&mut self, conversation_id: &str, reply: &CommandReply) -> Result<()> {
        // The text goes out first so the confirmation reaches the chat even
        // when saving the document fails.
        self.write_lines(conversation_id, reply.display_text())?;

        if let Some(document) = reply.document() {
            let dir = self.export_dir.join(sanitize_dir_name(conversation_id));
            let path = save_document(&dir, document)?;
            self.write_lines(
                conversation_id,
                &format!("📎 {} -> {}", document.file_name, path.display()),
            )?;
        }

        Ok(())
    }
}

/// Writes the document without replacing an earlier export from the same minute.
fn save_document(dir: &Path, document: &ExportDocument) -> Result<PathBuf, AppError> {
    fs::create_dir_all(dir).map_err(|source| AppError::ExportWrite {
        path: dir.to_path_buf(),
        source,
    })?;

    let stem = document
        .file_name
        .strip_suffix(".txt")
        .unwrap_or(&document.file_name);

    for attempt in 0..MAX_SAME_NAME_EXPORTS {
        let file_name = match attempt {
            0 => document.file_name.clone(),
            n => format!("{stem}_{n}.txt"),
        };
        let path = dir.join(file_name);

        let mut file = match OpenOptions::new().write(true).create_new(true).open(&path) {
            Ok(file) => file,
            Err(source) if source.kind() == ErrorKind::AlreadyExists => continue,
            Err(source) => return Err(AppError::ExportWrite { path, source }),
        };

        file.write_all(document.as_bytes())
            .and_then(|()| file.sync_all())
            .map_err(|source| AppError::ExportWrite {
                path: path.clone(),
                source,
            })?;

        return Ok(path);
    }

    Err(AppError::ExportWrite {
        path: dir.join(&document.file_name),
        source: io::Error::new(
            ErrorKind::AlreadyExists,
            "too many exports with the same file name",
        ),
    })
}

fn sanitize_dir_name(conversation_id: &str) -> String {
    conversation_id
        .chars()
        .map(|ch| {
            if ch.is_ascii_alphanumeric() || ch == '-' || ch == '_' {
                ch
            } else {
                '_'
            }
        })
        .collect()
}
