use scraper::{Html, Node};

use crate::error::{Result, TextError};

/// Walk an HTML document's text nodes in source order and return the first
/// one that looks like the start of a JSON document or array.
///
/// The solver proxy wraps the raw upstream response in an HTML envelope;
/// the payload we actually want is embedded as plain text somewhere inside
/// it, not as a JS variable assignment or a `<script>` body we'd need a
/// JS-aware parser for.
pub fn extract_first_json_text(html: &str) -> Result<String> {
    let document = Html::parse_document(html);
    for node in document.tree.nodes() {
        if let Node::Text(text) = node.value() {
            let trimmed = text.trim();
            if trimmed.starts_with('{') || trimmed.starts_with('[') {
                return Ok(trimmed.to_string());
            }
        }
    }
    Err(TextError::NoJsonNode)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finds_json_object_text_node() {
        let html = r#"<html><body><pre>{"a":1}</pre></body></html>"#;
        assert_eq!(extract_first_json_text(html).unwrap(), r#"{"a":1}"#);
    }

    #[test]
    fn finds_json_array_text_node() {
        let html = r#"<html><body><div>  [1,2,3]  </div></body></html>"#;
        assert_eq!(extract_first_json_text(html).unwrap(), "[1,2,3]");
    }

    #[test]
    fn skips_plain_text_before_json() {
        let html = r#"<html><body><p>loading...</p><pre>{"ok":true}</pre></body></html>"#;
        assert_eq!(extract_first_json_text(html).unwrap(), r#"{"ok":true}"#);
    }

    #[test]
    fn errors_when_nothing_json_shaped() {
        let html = "<html><body><p>not found</p></body></html>";
        assert!(extract_first_json_text(html).is_err());
    }
}
