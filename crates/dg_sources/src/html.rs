use std::sync::OnceLock;

use regex::Regex;
use scraper::Html;

fn excess_newlines() -> &'static Regex {
    static NEWLINES_RE: OnceLock<Regex> = OnceLock::new();
    NEWLINES_RE.get_or_init(|| Regex::new(r"\n{3,}").unwrap())
}

/// Convert an HTML document to plain text: script/style/head subtrees are
/// dropped, lines are trimmed, empty lines removed, and any remaining runs
/// of blank lines collapsed to at most one.
pub fn html_to_text(html: &str) -> String {
    let document = Html::parse_document(html);

    let mut chunks = Vec::new();
    for node in document.tree.nodes() {
        let Some(text) = node.value().as_text() else {
            continue;
        };
        let skipped = node.ancestors().any(|ancestor| {
            ancestor.value().as_element().map_or(false, |el| {
                matches!(el.name(), "script" | "style" | "head" | "meta")
            })
        });
        if !skipped {
            chunks.push(text.text.to_string());
        }
    }

    let joined = chunks.join("\n");
    let text = joined
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n");

    excess_newlines().replace_all(&text, "\n\n").into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strips_tags_and_scripts() {
        let html = r#"
            <html>
            <head><title>Test</title></head>
            <body>
                <h1>Hello World</h1>
                <p>This is a <strong>test</strong> paragraph.</p>
                <script>alert('bad');</script>
                <style>.x { color: red; }</style>
            </body>
            </html>
        "#;
        let text = html_to_text(html);

        assert!(text.contains("Hello World"));
        assert!(text.contains("test"));
        assert!(text.contains("paragraph"));
        assert!(!text.contains("alert"));
        assert!(!text.contains("color: red"));
        assert!(!text.contains("<"));
    }

    #[test]
    fn test_no_blank_lines_left() {
        let html = "<p>one</p>\n\n\n\n<p>two</p>";
        let text = html_to_text(html);
        assert!(!text.contains("\n\n\n"));
        assert!(text.contains("one"));
        assert!(text.contains("two"));
    }

    #[test]
    fn test_plain_text_passthrough() {
        assert_eq!(html_to_text("just words"), "just words");
    }
}
