//! Plain-text snapshot produced when a conversation's orders are cleared.

use chrono::{DateTime, Utc};

use super::counts::OrderTally;

const RULE: &str = "----------------------------------------";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportDocument {
    pub file_name: String,
    pub content: String,
}

impl ExportDocument {
    pub fn render(label: &str, generated_at: DateTime<Utc>, tally: &OrderTally) -> Self {
        let mut lines = vec![
            "Orders cleared from this group".to_owned(),
            format!("Group: {label}"),
            format!("Date: {} UTC", generated_at.format("%Y-%m-%d %H:%M:%S")),
            String::new(),
            "Orders (by product):".to_owned(),
            RULE.to_owned(),
        ];

        for (product, count) in &tally.lines {
            lines.push(format!("  {product}: {count}"));
        }

        lines.push(RULE.to_owned());
        lines.push(format!("Total: {}", tally.total));

        let mut content = lines.join("\n");
        content.push('\n');

        Self {
            file_name: file_name_for(generated_at),
            content,
        }
    }

    pub fn as_bytes(&self) -> &[u8] {
        self.content.as_bytes()
    }
}

fn file_name_for(generated_at: DateTime<Utc>) -> String {
    format!(
        "orders_cleared_{}.txt",
        generated_at.format("%Y-%m-%d_%H%M")
    )
}
