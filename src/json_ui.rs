use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span, Text};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;
use serde_json::Value;

use crate::state::AppState;

const INDENT: &str = "  ";

fn key_style() -> Style {
    Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
}

fn punct_style() -> Style {
    Style::default().fg(Color::Gray)
}

fn scalar_span(value: &Value) -> Span<'static> {
    match value {
        Value::Null => Span::styled("null", Style::default().fg(Color::DarkGray).add_modifier(Modifier::ITALIC)),
        Value::Bool(b) => Span::styled(b.to_string(), Style::default().fg(Color::Magenta)),
        Value::Number(n) => Span::styled(n.to_string(), Style::default().fg(Color::Yellow)),
        // Value's Display quotes and escapes strings.
        Value::String(_) => Span::styled(value.to_string(), Style::default().fg(Color::Green)),
        Value::Array(_) | Value::Object(_) => Span::styled(value.to_string(), punct_style()),
    }
}

/// Pretty-prints `value` one line per scalar, nested containers indented.
pub fn json_lines(value: &Value) -> Vec<Line<'static>> {
    let mut lines = Vec::new();
    push_value(&mut lines, value, 0, Vec::new(), false);
    lines
}

fn push_value(
    lines: &mut Vec<Line<'static>>,
    value: &Value,
    depth: usize,
    mut prefix: Vec<Span<'static>>,
    trailing_comma: bool,
) {
    let indent = INDENT.repeat(depth);
    let comma = if trailing_comma { "," } else { "" };

    let (open, close, len) = match value {
        Value::Object(map) => ("{", "}", map.len()),
        Value::Array(items) => ("[", "]", items.len()),
        scalar => {
            prefix.insert(0, Span::raw(indent));
            prefix.push(scalar_span(scalar));
            prefix.push(Span::styled(comma.to_string(), punct_style()));
            lines.push(Line::from(prefix));
            return;
        }
    };

    prefix.insert(0, Span::raw(indent.clone()));
    if len == 0 {
        prefix.push(Span::styled(format!("{}{}{}", open, close, comma), punct_style()));
        lines.push(Line::from(prefix));
        return;
    }

    prefix.push(Span::styled(open, punct_style()));
    lines.push(Line::from(prefix));

    match value {
        Value::Object(map) => {
            for (i, (key, child)) in map.iter().enumerate() {
                let key_spans = vec![
                    Span::styled(Value::String(key.clone()).to_string(), key_style()),
                    Span::styled(": ", punct_style()),
                ];
                push_value(lines, child, depth + 1, key_spans, i + 1 < len);
            }
        }
        Value::Array(items) => {
            for (i, child) in items.iter().enumerate() {
                push_value(lines, child, depth + 1, Vec::new(), i + 1 < len);
            }
        }
        _ => {}
    }

    lines.push(Line::from(vec![
        Span::raw(indent),
        Span::styled(format!("{}{}", close, comma), punct_style()),
    ]));
}

pub fn render_state(f: &mut Frame, state: &AppState, title: &str, scroll: u16, area: Rect) {
    let para = Paragraph::new(Text::from(json_lines(state.info())))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(title.to_string())
                .title_style(Style::default().fg(Color::Blue).add_modifier(Modifier::BOLD)),
        )
        .scroll((scroll, 0));
    f.render_widget(para, area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn plain(lines: &[Line]) -> Vec<String> {
        lines
            .iter()
            .map(|l| l.spans.iter().map(|s| s.content.as_ref()).collect::<String>())
            .collect()
    }

    #[test]
    fn empty_object_is_one_line() {
        assert_eq!(plain(&json_lines(&json!({}))), vec!["{}"]);
    }

    #[test]
    fn nested_document_is_indented() {
        let lines = plain(&json_lines(&json!({"a": 1, "b": {"c": [true, null]}, "d": []})));
        assert_eq!(
            lines,
            vec![
                "{",
                "  \"a\": 1,",
                "  \"b\": {",
                "    \"c\": [",
                "      true,",
                "      null",
                "    ]",
                "  },",
                "  \"d\": []",
                "}",
            ]
        );
    }

    #[test]
    fn strings_are_quoted_and_escaped() {
        let lines = plain(&json_lines(&json!({"msg": "say \"hi\""})));
        assert_eq!(lines[1], "  \"msg\": \"say \\\"hi\\\"\"");
    }

    #[test]
    fn top_level_scalar_renders() {
        assert_eq!(plain(&json_lines(&json!(42))), vec!["42"]);
    }

    #[test]
    fn keys_are_styled() {
        let lines = json_lines(&json!({"k": "v"}));
        let key = &lines[1].spans[1];
        assert_eq!(key.content.as_ref(), "\"k\"");
        assert_eq!(key.style.fg, Some(Color::Cyan));
    }
}
