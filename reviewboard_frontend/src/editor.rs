//! Plain-text editor that produces the HTML a review is stored as.

use std::ops::Range;

use regex::Regex;

const HISTORY_LIMIT: usize = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Alignment {
    Left,
    Center,
    Right,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToolbarAction {
    Bold,
    Italic,
    Underline,
    Strike,
    Heading(u8),
    Align(Alignment),
    BulletList,
    OrderedList,
    Quote,
    CodeBlock,
    Link(String),
    Undo,
    Redo,
}

#[derive(Debug, Clone, Default)]
pub struct MarkupEditor {
    pub text: String,
    undo: Vec<String>,
    redo: Vec<String>,
}

impl MarkupEditor {
    /// Applies a toolbar action to the character range `selection`
    /// (an empty range is a cursor position).
    pub fn apply(&mut self, action: ToolbarAction, selection: Range<usize>) {
        match action {
            ToolbarAction::Undo => return self.undo(),
            ToolbarAction::Redo => return self.redo(),
            _ => {}
        }

        let (start, end) = self.byte_range(selection);
        let selected = self.text[start..end].to_string();
        let replacement = match action {
            ToolbarAction::Bold => wrap("strong", &selected),
            ToolbarAction::Italic => wrap("em", &selected),
            ToolbarAction::Underline => wrap("u", &selected),
            ToolbarAction::Strike => wrap("s", &selected),
            ToolbarAction::Heading(level) => wrap(&format!("h{}", level.clamp(1, 3)), &selected),
            ToolbarAction::Align(alignment) => {
                let align = match alignment {
                    Alignment::Left => "left",
                    Alignment::Center => "center",
                    Alignment::Right => "right",
                };
                format!("<p style=\"text-align: {align}\">{selected}</p>")
            }
            ToolbarAction::BulletList => list("ul", &selected),
            ToolbarAction::OrderedList => list("ol", &selected),
            ToolbarAction::Quote => format!("<blockquote><p>{selected}</p></blockquote>"),
            ToolbarAction::CodeBlock => format!("<pre><code>{selected}</code></pre>"),
            ToolbarAction::Link(url) => format!("<a href=\"{}\">{selected}</a>", url.trim()),
            ToolbarAction::Undo | ToolbarAction::Redo => return,
        };

        self.push_undo(self.text.clone());
        self.text.replace_range(start..end, &replacement);
    }

    /// Records the text as it was before a typed edit so it can be undone.
    pub fn record_edit(&mut self, previous: String) {
        if previous != self.text {
            self.push_undo(previous);
        }
    }

    fn push_undo(&mut self, previous: String) {
        if self.undo.last() != Some(&previous) {
            self.undo.push(previous);
            if self.undo.len() > HISTORY_LIMIT {
                self.undo.remove(0);
            }
        }
        self.redo.clear();
    }

    pub fn can_undo(&self) -> bool {
        !self.undo.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo.is_empty()
    }

    fn undo(&mut self) {
        if let Some(previous) = self.undo.pop() {
            self.redo.push(std::mem::replace(&mut self.text, previous));
        }
    }

    fn redo(&mut self) {
        if let Some(next) = self.redo.pop() {
            self.undo.push(std::mem::replace(&mut self.text, next));
        }
    }

    /// HTML for submission: blank-line separated blocks become paragraphs
    /// unless they already open with a block element.
    pub fn to_html(&self) -> String {
        self.text
            .split("\n\n")
            .map(str::trim)
            .filter(|block| !block.is_empty())
            .map(|block| {
                if starts_with_block_tag(block) {
                    block.to_string()
                } else {
                    format!("<p>{}</p>", block.replace('\n', "<br>"))
                }
            })
            .collect()
    }

    /// Visible character count of the produced HTML.
    pub fn plain_len(&self) -> usize {
        strip_tags(&self.to_html()).chars().count()
    }

    fn byte_range(&self, selection: Range<usize>) -> (usize, usize) {
        let to_byte = |char_idx: usize| {
            self.text
                .char_indices()
                .nth(char_idx)
                .map(|(i, _)| i)
                .unwrap_or(self.text.len())
        };
        let (a, b) = (to_byte(selection.start), to_byte(selection.end));
        (a.min(b), a.max(b))
    }
}

fn wrap(tag: &str, inner: &str) -> String {
    format!("<{tag}>{inner}</{tag}>")
}

fn list(tag: &str, selected: &str) -> String {
    let items: String = selected
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(|line| format!("<li>{line}</li>"))
        .collect();
    let items = if items.is_empty() {
        "<li></li>".to_string()
    } else {
        items
    };
    format!("<{tag}>{items}</{tag}>")
}

fn starts_with_block_tag(block: &str) -> bool {
    const BLOCKS: [&str; 8] = ["<p", "<h1", "<h2", "<h3", "<ul", "<ol", "<blockquote", "<pre"];
    BLOCKS.iter().any(|tag| block.starts_with(tag))
}

lazy_static::lazy_static! {
    static ref TAG_PATTERN: Regex = Regex::new(r"<[^>]*>").unwrap();
}

pub fn strip_tags(html: &str) -> String {
    TAG_PATTERN.replace_all(html, "").into_owned()
}

/// Renders stored review HTML as wrapped plain text for display.
pub fn html_to_text(html: &str, width: usize) -> String {
    html2text::from_read(html.as_bytes(), width.max(20))
}

/// First `max_chars` visible characters of `html`, with an ellipsis when cut.
pub fn excerpt(html: &str, max_chars: usize) -> String {
    let text = strip_tags(html);
    let text = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if text.chars().count() <= max_chars {
        text
    } else {
        let cut: String = text.chars().take(max_chars).collect();
        format!("{}…", cut.trim_end())
    }
}
