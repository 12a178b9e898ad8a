use crate::domain::events::BotCommand;

/// Parses chat text such as `/done GPT GO` or `/stats@order_bot`.
///
/// Returns `None` for plain text and for commands the bot does not handle.
pub fn parse_command(text: &str) -> Option<BotCommand> {
    let text = text.trim_start();
    let body = text.strip_prefix('/')?;

    let (head, args) = match body.find(char::is_whitespace) {
        Some(index) => (&body[..index], body[index..].trim()),
        None => (body, ""),
    };
    let name = head.split_once('@').map_or(head, |(name, _bot)| name);

    let command = match name.to_ascii_lowercase().as_str() {
        "start" | "help" => BotCommand::Help,
        "products" => BotCommand::ListProducts,
        "done" => BotCommand::RecordOrder {
            product_text: args.split_whitespace().collect::<Vec<_>>().join(" "),
        },
        "stats" => BotCommand::Stats,
        "total" => BotCommand::Total,
        "clear" => BotCommand::ClearAndExport,
        _ => return None,
    };

    Some(command)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn done(product: &str) -> Option<BotCommand> {
        Some(BotCommand::RecordOrder {
            product_text: product.to_owned(),
        })
    }

    #[test]
    fn parses_simple_commands() {
        assert_eq!(parse_command("/start"), Some(BotCommand::Help));
        assert_eq!(parse_command("/help"), Some(BotCommand::Help));
        assert_eq!(parse_command("/products"), Some(BotCommand::ListProducts));
        assert_eq!(parse_command("/stats"), Some(BotCommand::Stats));
        assert_eq!(parse_command("/total"), Some(BotCommand::Total));
        assert_eq!(parse_command("/clear"), Some(BotCommand::ClearAndExport));
    }

    #[test]
    fn keeps_multi_word_product_and_collapses_inner_whitespace() {
        assert_eq!(parse_command("/done GPT RENEW"), done("GPT RENEW"));
        assert_eq!(parse_command("/done   Runway\t Unlimited  "), done("Runway Unlimited"));
    }

    #[test]
    fn done_without_arguments_yields_empty_product_text() {
        assert_eq!(parse_command("/done"), done(""));
    }

    #[test]
    fn ignores_bot_mention_suffix() {
        assert_eq!(parse_command("/stats@order_counter_bot"), Some(BotCommand::Stats));
        assert_eq!(parse_command("/done@order_counter_bot Cur Pro+"), done("Cur Pro+"));
    }

    #[test]
    fn ignores_plain_text_and_unknown_commands() {
        assert_eq!(parse_command("GPT GO"), None);
        assert_eq!(parse_command("/refund GPT GO"), None);
        assert_eq!(parse_command(""), None);
    }
}
