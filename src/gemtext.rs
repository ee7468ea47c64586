//! Gemtext parsing and HTML rendering.
//!
//! A gemtext document is line oriented; each line's first characters decide
//! its kind. The only multi-line construct is the preformatted block, which
//! is opened and closed by lines starting with three backticks.

use std::fmt;
use std::str::Utf8Error;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Line {
    Text(String),
    Link { url: String, label: Option<String> },
    Heading { level: u8, text: String },
    ListItem(String),
    Quote(String),
    Preformatted { alt: Option<String>, lines: Vec<String> },
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Document {
    pub lines: Vec<Line>,
}

#[derive(Debug)]
pub enum GemtextError {
    InvalidUtf8(Utf8Error),
}

impl fmt::Display for GemtextError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GemtextError::InvalidUtf8(e) => write!(f, "gemtext is not valid UTF-8: {}", e),
        }
    }
}

impl std::error::Error for GemtextError {}

/// Parses raw gemtext bytes.
pub fn parse(raw: &[u8]) -> Result<Document, GemtextError> {
    let text = std::str::from_utf8(raw).map_err(GemtextError::InvalidUtf8)?;
    Ok(parse_str(text))
}

pub fn parse_str(text: &str) -> Document {
    let mut lines = Vec::new();
    let mut pre: Option<(Option<String>, Vec<String>)> = None;

    for raw in text.lines() {
        if let Some(rest) = raw.strip_prefix("```") {
            match pre.take() {
                Some((alt, body)) => lines.push(Line::Preformatted { alt, lines: body }),
                None => pre = Some((non_empty(rest), Vec::new())),
            }
            continue;
        }

        if let Some((_, body)) = pre.as_mut() {
            body.push(raw.to_string());
            continue;
        }

        lines.push(parse_line(raw));
    }

    // An unterminated block runs to the end of the document.
    if let Some((alt, body)) = pre {
        lines.push(Line::Preformatted { alt, lines: body });
    }

    Document { lines }
}

fn parse_line(raw: &str) -> Line {
    if let Some(rest) = raw.strip_prefix("=>") {
        let rest = rest.trim_start();
        let (url, label) = match rest.split_once(char::is_whitespace) {
            Some((url, label)) => (url, non_empty(label)),
            None => (rest, None),
        };
        return Line::Link {
            url: url.to_string(),
            label,
        };
    }

    for (prefix, level) in [("###", 3), ("##", 2), ("#", 1)] {
        if let Some(rest) = raw.strip_prefix(prefix) {
            return Line::Heading {
                level,
                text: rest.trim().to_string(),
            };
        }
    }

    if let Some(rest) = raw.strip_prefix("* ") {
        return Line::ListItem(rest.trim().to_string());
    }
    if let Some(rest) = raw.strip_prefix('>') {
        return Line::Quote(rest.trim().to_string());
    }

    Line::Text(raw.to_string())
}

fn non_empty(s: &str) -> Option<String> {
    let s = s.trim();
    (!s.is_empty()).then(|| s.to_string())
}

impl Document {
    /// Text of the first level-1 heading.
    pub fn title(&self) -> Option<&str> {
        self.lines.iter().find_map(|line| match line {
            Line::Heading { level: 1, text } => Some(text.as_str()),
            _ => None,
        })
    }

    /// Renders the document as an HTML fragment.
    pub fn to_html(&self) -> String {
        let mut html = String::new();
        let mut in_list = false;

        for line in &self.lines {
            let is_item = matches!(line, Line::ListItem(_));
            if in_list && !is_item {
                html.push_str("</ul>\n");
            } else if !in_list && is_item {
                html.push_str("<ul>\n");
            }
            in_list = is_item;

            match line {
                Line::Text(text) if text.trim().is_empty() => {}
                Line::Text(text) => {
                    html.push_str(&format!("<p>{}</p>\n", escape(text)));
                }
                Line::Link { url, label } => {
                    let label = label.as_deref().unwrap_or(url);
                    html.push_str(&format!(
                        "<p><a href=\"{}\">{}</a></p>\n",
                        escape(url),
                        escape(label)
                    ));
                }
                Line::Heading { level, text } => {
                    html.push_str(&format!("<h{0}>{1}</h{0}>\n", level, escape(text)));
                }
                Line::ListItem(text) => {
                    html.push_str(&format!("<li>{}</li>\n", escape(text)));
                }
                Line::Quote(text) => {
                    html.push_str(&format!("<blockquote>{}</blockquote>\n", escape(text)));
                }
                Line::Preformatted { alt, lines } => {
                    match alt {
                        Some(alt) => html.push_str(&format!("<pre title=\"{}\">", escape(alt))),
                        None => html.push_str("<pre>"),
                    }
                    html.push_str(&escape(&lines.join("\n")));
                    html.push_str("</pre>\n");
                }
            }
        }

        if in_list {
            html.push_str("</ul>\n");
        }

        html
    }
}

/// Escapes text for use in HTML content and double-quoted attributes.
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
    out
}
