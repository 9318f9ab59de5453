// # Step Summary
//
// Builds the HTML fragment appended to the job summary. The markup matches
// what the GitHub Actions toolkit renders: `<h2>` headings, `<pre><code>`
// blocks and plain anchors, one element per line.

/// Buffered summary document
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Summary {
    buffer: String,
}

impl Summary {
    /// Create an empty summary
    pub fn new() -> Self {
        Self::default()
    }

    /// Append raw text, unescaped
    pub fn add_raw(mut self, text: &str) -> Self {
        self.buffer.push_str(text);
        self
    }

    /// Append a line break
    pub fn add_eol(self) -> Self {
        self.add_raw("\n")
    }

    /// Append a heading; `level` is clamped to 1..=6
    pub fn add_heading(self, text: &str, level: u8) -> Self {
        let level = level.clamp(1, 6);
        let element = format!("<h{level}>{}</h{level}>", escape_html(text));
        self.add_raw(&element).add_eol()
    }

    /// Append a preformatted code block
    pub fn add_code_block(self, code: &str) -> Self {
        let element = format!("<pre><code>{}</code></pre>", escape_html(code));
        self.add_raw(&element).add_eol()
    }

    /// Append a link
    pub fn add_link(self, text: &str, href: &str) -> Self {
        let element = format!(
            "<a href=\"{}\">{}</a>",
            escape_html(href),
            escape_html(text)
        );
        self.add_raw(&element).add_eol()
    }

    /// Whether nothing has been added
    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// The rendered document
    pub fn as_str(&self) -> &str {
        &self.buffer
    }
}

pub(crate) fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_elements_in_order() {
        let summary = Summary::new()
            .add_heading("CID", 2)
            .add_code_block("bafy123")
            .add_link("https://w3s.link/ipfs/bafy123", "https://w3s.link/ipfs/bafy123");

        assert_eq!(
            summary.as_str(),
            "<h2>CID</h2>\n\
             <pre><code>bafy123</code></pre>\n\
             <a href=\"https://w3s.link/ipfs/bafy123\">https://w3s.link/ipfs/bafy123</a>\n"
        );
    }

    #[test]
    fn escapes_markup() {
        let summary = Summary::new().add_code_block("<script>&\"'</script>");
        assert_eq!(
            summary.as_str(),
            "<pre><code>&lt;script&gt;&amp;&quot;&#39;&lt;/script&gt;</code></pre>\n"
        );
    }

    #[test]
    fn clamps_heading_level() {
        assert_eq!(Summary::new().add_heading("x", 0).as_str(), "<h1>x</h1>\n");
        assert_eq!(Summary::new().add_heading("x", 9).as_str(), "<h6>x</h6>\n");
    }
}
