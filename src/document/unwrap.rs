//! Tag unwrapping: rewrite a fragment so that chosen tags disappear while their
//! content stays in place.
//!
//! Free-text fields (slogans, tags, news bodies) arrive as HTML with inline
//! formatting. Unwrapping replaces each eliminated element by its recursively
//! processed children; an eliminated `<br>` becomes a literal `"\n"` so line
//! structure survives. Everything else is re-serialised as-is.

use ego_tree::NodeRef;
use scraper::{ElementRef, Html, Node};

const LINE_BREAK: &str = "\n";

const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source", "track",
    "wbr",
];

const RAW_TEXT_ELEMENTS: &[&str] = &["script", "style"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Output {
    Markup,
    RawText,
    Text,
}

/// Fragment re-serialiser with tag elimination, subtree dropping and link rewriting.
#[derive(Debug, Clone, Default)]
pub struct Rewriter {
    unwrap: Vec<String>,
    drop: Vec<String>,
    link_base: Option<String>,
}

impl Rewriter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Tags replaced by their children.
    pub fn unwrap(mut self, tags: &[&str]) -> Self {
        self.unwrap.extend(tags.iter().map(|t| t.to_ascii_lowercase()));
        self
    }

    /// Tags removed together with their content.
    pub fn drop(mut self, tags: &[&str]) -> Self {
        self.drop.extend(tags.iter().map(|t| t.to_ascii_lowercase()));
        self
    }

    /// Rewrite site-relative `href`s (`/lodestone/...`) to `//{domain}/lodestone/...`.
    pub fn link_base(mut self, domain: &str) -> Self {
        self.link_base = Some(domain.to_string());
        self
    }

    pub fn rewrite_fragment(&self, html: &str) -> String {
        let fragment = Html::parse_fragment(html);
        self.rewrite_children(fragment.root_element())
    }

    /// Serialise the children of `element` (the element's own tag is not emitted).
    pub fn rewrite_children(&self, element: ElementRef<'_>) -> String {
        let mut out = String::new();
        for child in element.children() {
            self.render(child, Output::Markup, &mut out);
        }
        out
    }

    /// Serialise `element` itself, including its tag unless it is eliminated.
    pub fn rewrite_element(&self, element: ElementRef<'_>) -> String {
        let mut out = String::new();
        self.render(*element, Output::Markup, &mut out);
        out
    }

    /// Decoded text of the children of `element`. No markup is emitted: tags
    /// outside the unwrap set contribute only their text, and an unwrapped
    /// `<br>` still becomes a line break.
    pub fn rewrite_text(&self, element: ElementRef<'_>) -> String {
        let mut out = String::new();
        for child in element.children() {
            self.render(child, Output::Text, &mut out);
        }
        out
    }

    fn render(&self, node: NodeRef<'_, Node>, output: Output, out: &mut String) {
        match node.value() {
            // Source newlines are layout, not content; only <br> breaks a line.
            Node::Text(text) => match output {
                Output::Text => out.push_str(&text.replace('\n', " ")),
                Output::RawText => out.push_str(text),
                Output::Markup => escape_text(text, out),
            },
            Node::Comment(comment) => {
                if output != Output::Text {
                    out.push_str("<!--");
                    out.push_str(comment);
                    out.push_str("-->");
                }
            }
            Node::Element(el) => {
                let name = el.name();

                if self.drop.iter().any(|t| t == name) {
                    return;
                }

                if self.unwrap.iter().any(|t| t == name) {
                    if name == "br" {
                        out.push_str(LINE_BREAK);
                    }
                    for child in node.children() {
                        self.render(child, output, out);
                    }
                    return;
                }

                if output == Output::Text {
                    for child in node.children() {
                        self.render(child, output, out);
                    }
                    return;
                }

                out.push('<');
                out.push_str(name);
                let mut attrs: Vec<(&str, &str)> = el.attrs().collect();
                attrs.sort_by(|a, b| a.0.cmp(b.0));
                for (attr, value) in attrs {
                    out.push(' ');
                    out.push_str(attr);
                    out.push_str("=\"");
                    let value = self.rewrite_attr(attr, value);
                    escape_attr(&value, out);
                    out.push('"');
                }
                out.push('>');

                if VOID_ELEMENTS.contains(&name) {
                    return;
                }

                let child_output = if RAW_TEXT_ELEMENTS.contains(&name) {
                    Output::RawText
                } else {
                    output
                };
                for child in node.children() {
                    self.render(child, child_output, out);
                }
                out.push_str("</");
                out.push_str(name);
                out.push('>');
            }
            _ => {}
        }
    }

    fn rewrite_attr(&self, attr: &str, value: &str) -> String {
        match &self.link_base {
            Some(domain)
                if attr == "href" && value.starts_with('/') && !value.starts_with("//") =>
            {
                format!("//{}{}", domain, value)
            }
            _ => value.to_string(),
        }
    }
}

/// Replace every `tags` element in `html` by its processed children.
pub fn unwrap_tags(html: &str, tags: &[&str]) -> String {
    Rewriter::new().unwrap(tags).rewrite_fragment(html)
}

/// Readable text of `element`: every tag flattened, `<br>` kept as a line break,
/// whitespace collapsed within each line, blank edges trimmed.
pub fn plain_text(element: ElementRef<'_>) -> String {
    let raw = Rewriter::new()
        .unwrap(&["br"])
        .drop(RAW_TEXT_ELEMENTS)
        .rewrite_text(element);

    raw.split(LINE_BREAK)
        .map(super::normalize_ws)
        .collect::<Vec<_>>()
        .join(LINE_BREAK)
        .trim_matches('\n')
        .to_string()
}

fn escape_text(text: &str, out: &mut String) {
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '\u{a0}' => out.push_str("&nbsp;"),
            _ => out.push(ch),
        }
    }
}

fn escape_attr(value: &str, out: &mut String) {
    for ch in value.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '"' => out.push_str("&quot;"),
            '\u{a0}' => out.push_str("&nbsp;"),
            _ => out.push(ch),
        }
    }
}
