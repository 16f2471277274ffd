//! Tree-walking HTML to Markdown-like text conversion.
//!
//! The mapping is fixed and intentionally small:
//!
//! | markup            | output                      |
//! |-------------------|-----------------------------|
//! | `h1`..`h6`        | `#`-prefixed line           |
//! | `strong`, `b`     | `**text**`                  |
//! | `em`, `i`         | `*text*`                    |
//! | `a[href]`         | `[text](href)`              |
//! | `li`              | `- ` line, indented by depth |
//! | `br`              | newline                     |
//! | `pre`             | fenced code block           |
//! | block containers  | paragraph break             |
//! | anything else     | children only               |
//!
//! Runs of three or more newlines are collapsed to two and the result is
//! trimmed. Nested or exotic markup is not reconstructed faithfully.

use regex::Regex;
use std::sync::OnceLock;

use super::node::{DomNode, Element};

const BLOCK_TAGS: &[&str] = &[
    "address", "article", "aside", "blockquote", "dd", "details", "div", "dl", "dt",
    "figcaption", "figure", "footer", "form", "header", "main", "nav", "p", "section",
    "summary", "table", "tbody", "tfoot", "thead",
];

pub fn to_markdown(root: &DomNode) -> String {
    let mut converter = Converter::default();
    converter.node(root);
    finish(&converter.out)
}

#[derive(Default)]
struct Converter {
    out: String,
    list_depth: usize,
    marker_pending: bool,
    language_hint: Option<String>,
}

impl Converter {
    fn push(&mut self, s: &str) {
        if !s.is_empty() {
            self.out.push_str(s);
            self.marker_pending = false;
        }
    }

    fn trim_trailing_spaces(&mut self) {
        let len = self.out.trim_end_matches([' ', '\t']).len();
        self.out.truncate(len);
    }

    fn line_start(&mut self) {
        if self.marker_pending {
            return;
        }
        self.trim_trailing_spaces();
        if !self.out.is_empty() && !self.out.ends_with('\n') {
            self.out.push('\n');
        }
    }

    fn block_break(&mut self) {
        if self.marker_pending {
            return;
        }
        self.trim_trailing_spaces();
        if self.out.is_empty() {
            return;
        }
        while !self.out.ends_with("\n\n") {
            self.out.push('\n');
        }
    }

    fn node(&mut self, node: &DomNode) {
        match node {
            DomNode::Text(text) => self.text(text),
            DomNode::Element(element) => self.element(element),
        }
    }

    fn children(&mut self, element: &Element) {
        for child in &element.children {
            self.node(child);
        }
    }

    /// Renders `element`'s children into a detached buffer.
    fn render_inline(&mut self, element: &Element) -> String {
        let saved = std::mem::take(&mut self.out);
        let pending = self.marker_pending;
        self.children(element);
        self.marker_pending = pending;
        std::mem::replace(&mut self.out, saved)
    }

    fn text(&mut self, raw: &str) {
        let collapsed = collapse_whitespace(raw);
        if self.out.ends_with([' ', '\n']) {
            self.push(collapsed.trim_start());
        } else {
            self.push(&collapsed);
        }
    }

    fn element(&mut self, element: &Element) {
        let tag = element.tag.as_str();
        if let Some(level) = heading_level(tag) {
            self.heading(element, level);
            return;
        }
        match tag {
            "strong" | "b" => self.delimited(element, "**"),
            "em" | "i" => self.delimited(element, "*"),
            "a" => self.link(element),
            "ul" | "ol" => self.list(element),
            "li" => self.list_item(element),
            "br" => self.push("\n"),
            "pre" => self.code_block(element),
            "tr" => {
                self.line_start();
                self.children(element);
                self.line_start();
            }
            "td" | "th" => {
                self.children(element);
                self.push(" ");
            }
            _ if BLOCK_TAGS.contains(&tag) => {
                let outer_hint = self.language_hint.clone();
                if let Some(language) = language_class(element) {
                    self.language_hint = Some(language);
                }
                self.block_break();
                self.children(element);
                self.block_break();
                self.language_hint = outer_hint;
            }
            _ => self.children(element),
        }
    }

    fn heading(&mut self, element: &Element, level: usize) {
        let inner = self.render_inline(element);
        let title = inner.split_whitespace().collect::<Vec<_>>().join(" ");
        self.block_break();
        self.push(&"#".repeat(level));
        self.push(" ");
        self.push(&title);
        self.out.push_str("\n\n");
    }

    fn delimited(&mut self, element: &Element, delimiter: &str) {
        let inner = self.render_inline(element);
        self.wrap_inline(&inner, |trimmed| format!("{delimiter}{trimmed}{delimiter}"));
    }

    fn link(&mut self, element: &Element) {
        let Some(href) = element.attr("href").map(str::trim).filter(|h| !h.is_empty()) else {
            self.children(element);
            return;
        };
        let inner = self.render_inline(element);
        let label = inner.split_whitespace().collect::<Vec<_>>().join(" ");
        if label.is_empty() {
            return;
        }
        let padded = format!(
            "{}{label}{}",
            if inner.starts_with(char::is_whitespace) { " " } else { "" },
            if inner.ends_with(char::is_whitespace) { " " } else { "" },
        );
        self.wrap_inline(&padded, |trimmed| format!("[{trimmed}]({href})"));
    }

    /// Emits `render(inner.trim())`, keeping one space on either side when
    /// `inner` had surrounding whitespace.
    fn wrap_inline(&mut self, inner: &str, render: impl FnOnce(&str) -> String) {
        let trimmed = inner.trim();
        if trimmed.is_empty() {
            self.text(inner);
            return;
        }
        if inner.starts_with(char::is_whitespace) {
            self.text(" ");
        }
        self.push(&render(trimmed));
        if inner.ends_with(char::is_whitespace) {
            self.push(" ");
        }
    }

    fn list(&mut self, element: &Element) {
        self.line_start();
        self.list_depth += 1;
        self.children(element);
        self.list_depth -= 1;
        if self.list_depth == 0 {
            self.block_break();
        } else {
            self.line_start();
        }
    }

    fn list_item(&mut self, element: &Element) {
        self.line_start();
        let indent = "  ".repeat(self.list_depth.saturating_sub(1));
        self.push(&indent);
        self.push("- ");
        self.marker_pending = true;
        self.children(element);
        self.marker_pending = false;
        self.line_start();
    }

    fn code_block(&mut self, element: &Element) {
        let language = language_class(element)
            .or_else(|| {
                element
                    .children
                    .iter()
                    .filter_map(DomNode::as_element)
                    .find_map(language_class)
            })
            .or_else(|| self.language_hint.clone())
            .unwrap_or_default();
        let code = element.text_content();
        if self.marker_pending {
            // fence opens a list item: start it below the bullet
            self.marker_pending = false;
            self.line_start();
        } else {
            self.block_break();
        }

        let indent = "  ".repeat(self.list_depth);
        let mut fenced = format!("{indent}```{language}\n");
        for line in code.trim_matches('\n').split('\n') {
            if !line.is_empty() {
                fenced.push_str(&indent);
                fenced.push_str(line);
            }
            fenced.push('\n');
        }
        fenced.push_str(&indent);
        fenced.push_str("```");
        self.push(&fenced);

        if self.list_depth > 0 {
            self.line_start();
        } else {
            self.block_break();
        }
    }
}

fn heading_level(tag: &str) -> Option<usize> {
    tag.strip_prefix('h')
        .and_then(|n| n.parse::<usize>().ok())
        .filter(|n| (1..=6).contains(n))
}

fn language_class(element: &Element) -> Option<String> {
    element
        .classes()
        .find_map(|class| class.strip_prefix("language-"))
        .filter(|language| !language.is_empty())
        .map(str::to_string)
}

fn collapse_whitespace(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut in_space = false;
    for c in text.chars() {
        if c.is_whitespace() {
            if !in_space {
                out.push(' ');
            }
            in_space = true;
        } else {
            out.push(c);
            in_space = false;
        }
    }
    out
}

fn finish(raw: &str) -> String {
    static RE_BLANK_RUN: OnceLock<Regex> = OnceLock::new();
    let re_blank_run = RE_BLANK_RUN.get_or_init(|| Regex::new(r"\n{3,}").expect("valid blank run regex"));

    let mut in_fence = false;
    let mut lines = Vec::new();
    for line in raw.lines() {
        if line.trim_start().starts_with("```") {
            in_fence = !in_fence;
            lines.push(line.trim_end());
        } else if in_fence {
            lines.push(line);
        } else {
            lines.push(line.trim_end());
        }
    }
    let joined = lines.join("\n");
    re_blank_run.replace_all(&joined, "\n\n").trim().to_string()
}
