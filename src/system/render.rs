// src/system/render.rs

//! Plain terminal rendering for the binary: every `OutputMessage` becomes a
//! few colored lines, and feedback states become status lines on stderr.

use crate::core::feedback::{FeedbackSetter, FeedbackStatus, VisualFeedbackState};
use crate::core::output::{MessageContent, MessageType, OutputMessage, OutputSink};
use colored::Colorize;
use std::sync::Arc;

const DIVIDER_WIDTH: usize = 40;
const PROGRESS_BAR_WIDTH: usize = 20;

/// A sink printing each message as it is emitted. Errors go to stderr.
pub fn terminal_sink() -> OutputSink {
    Arc::new(|message: &OutputMessage| {
        let rendered = render_message(message);
        if message.message_type == MessageType::Error {
            eprintln!("{}", rendered);
        } else {
            println!("{}", rendered);
        }
    })
}

/// A feedback setter printing one status line per visible state.
pub fn feedback_printer() -> FeedbackSetter {
    Arc::new(|state: Option<VisualFeedbackState>| {
        if let Some(state) = state {
            eprintln!("{}", render_feedback(&state));
        }
    })
}

pub fn render_message(message: &OutputMessage) -> String {
    let text = message.content.as_text().unwrap_or_default();

    match (&message.message_type, &message.content) {
        (MessageType::Success, _) => format!("✔ {}", text).green().to_string(),
        (MessageType::Error, _) => format!("✖ {}", text).red().to_string(),
        (MessageType::Warning, _) => format!("⚠ {}", text).yellow().to_string(),
        (MessageType::Info, _) => format!("ℹ {}", text).blue().to_string(),
        (MessageType::Header, _) => format!("\n{}", text.bold().underline()),
        (MessageType::Newline, _) => String::new(),
        (MessageType::Divider, _) => "─".repeat(DIVIDER_WIDTH).dimmed().to_string(),
        (_, MessageContent::Code { source, language }) => render_code(source, language.as_deref()),
        (_, MessageContent::List { items }) => items
            .iter()
            .map(|item| format!("  • {}", item))
            .collect::<Vec<_>>()
            .join("\n"),
        (_, MessageContent::KeyValue { pairs }) => render_key_values(pairs),
        (_, MessageContent::Table { headers, rows }) => render_table(headers, rows),
        (_, MessageContent::Json { value }) => {
            serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
        }
        (_, MessageContent::Step { number, total, text }) => {
            let position = match total {
                Some(total) => format!("[{}/{}]", number, total),
                None => format!("[{}]", number),
            };
            format!("{} {}", position.cyan().bold(), text)
        }
        _ => text.to_string(),
    }
}

fn render_code(source: &str, language: Option<&str>) -> String {
    let mut lines = Vec::new();
    if let Some(language) = language {
        lines.push(format!("  {}", language).dimmed().to_string());
    }
    lines.extend(source.lines().map(|line| format!("    {}", line)));
    lines.join("\n")
}

fn render_key_values(pairs: &[(String, String)]) -> String {
    let width = pairs.iter().map(|(k, _)| k.chars().count()).max().unwrap_or(0);
    pairs
        .iter()
        .map(|(key, value)| {
            let padded = format!("{:<width$}", key, width = width);
            format!("  {}  {}", padded.bold(), value)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn render_table(headers: &[String], rows: &[Vec<String>]) -> String {
    let columns = rows.iter().map(Vec::len).chain([headers.len()]).max().unwrap_or(0);
    let widths: Vec<usize> = (0..columns)
        .map(|col| {
            std::iter::once(headers)
                .chain(rows.iter().map(Vec::as_slice))
                .filter_map(|row| row.get(col))
                .map(|cell| cell.chars().count())
                .max()
                .unwrap_or(0)
        })
        .collect();

    let render_row = |row: &[String]| {
        widths
            .iter()
            .enumerate()
            .map(|(col, width)| {
                let cell = row.get(col).map(String::as_str).unwrap_or_default();
                format!("{:<width$}", cell, width = *width)
            })
            .collect::<Vec<_>>()
            .join("  ")
            .trim_end()
            .to_string()
    };

    let mut lines = Vec::new();
    if !headers.is_empty() {
        lines.push(render_row(headers).bold().to_string());
        lines.push("─".repeat(widths.iter().sum::<usize>() + 2 * widths.len().saturating_sub(1)));
    }
    lines.extend(rows.iter().map(|row| render_row(row.as_slice())));
    lines.join("\n")
}

pub fn render_feedback(state: &VisualFeedbackState) -> String {
    let (icon, message) = match state.status() {
        FeedbackStatus::Running => ("…".cyan(), state.message().normal()),
        FeedbackStatus::Success => ("✔".green(), state.message().green()),
        FeedbackStatus::Error => ("✖".red(), state.message().red()),
    };

    match state {
        VisualFeedbackState::Spinner { .. } => format!("{} {}", icon, message),
        VisualFeedbackState::Progress { value, total, .. } => {
            let ratio = if *total > 0.0 { (value / total).clamp(0.0, 1.0) } else { 0.0 };
            let filled = (0..PROGRESS_BAR_WIDTH)
                .filter(|i| (*i as f64) < ratio * PROGRESS_BAR_WIDTH as f64)
                .count();
            let bar = format!(
                "[{}{}]",
                "#".repeat(filled),
                "-".repeat(PROGRESS_BAR_WIDTH - filled)
            );
            format!("{} {} {:>3.0}% {}", icon, bar, ratio * 100.0, message)
        }
    }
}

// MARK: --- UNIT TESTS ---

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::SystemTime;

    fn message(message_type: MessageType, content: MessageContent) -> OutputMessage {
        OutputMessage {
            message_type,
            content,
            timestamp: SystemTime::now(),
            meta: None,
        }
    }

    #[test]
    fn test_render_text_kinds() {
        let text = |t: &str| MessageContent::Text { text: t.to_string() };
        assert!(render_message(&message(MessageType::Success, text("done"))).contains("✔ done"));
        assert!(render_message(&message(MessageType::Error, text("bad"))).contains("✖ bad"));
        assert_eq!(render_message(&message(MessageType::Log, text("plain"))), "plain");
        assert_eq!(render_message(&message(MessageType::Newline, MessageContent::Empty)), "");
    }

    #[test]
    fn test_render_structured_payloads() {
        let list = MessageContent::List { items: vec!["a".into(), "b".into()] };
        assert_eq!(render_message(&message(MessageType::List, list)), "  • a\n  • b");

        let table = MessageContent::Table {
            headers: vec![],
            rows: vec![
                vec!["name".into(), "size".into()],
                vec!["longer-name".into(), "1".into()],
            ],
        };
        assert_eq!(
            render_message(&message(MessageType::Table, table)),
            "name         size\nlonger-name  1"
        );

        let code = MessageContent::Code { source: "fn main() {}".into(), language: None };
        assert_eq!(render_message(&message(MessageType::Code, code)), "    fn main() {}");
    }

    #[test]
    fn test_render_progress_bar() {
        let state = VisualFeedbackState::Progress {
            value: 5.0,
            total: 10.0,
            message: "Copying".to_string(),
            status: FeedbackStatus::Running,
        };
        let line = render_feedback(&state);
        assert!(line.contains("[##########----------]"));
        assert!(line.contains(" 50%"));
        assert!(line.contains("Copying"));
    }
}
