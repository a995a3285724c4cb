//! Virtual nodes to HTML text.

use super::vdom::{VElement, VNode};

/// Serialize a node tree to HTML.
pub fn to_html(node: &VNode) -> String {
    let mut out = String::new();
    write_node(node, &mut out);
    out
}

fn write_node(node: &VNode, out: &mut String) {
    match node {
        VNode::Element(element) => write_element(element, out),
        VNode::Text(text) => out.push_str(&escape_html(text)),
        VNode::Raw(raw) => out.push_str(raw),
        VNode::Fragment(children) => {
            for child in children {
                write_node(child, out);
            }
        }
    }
}

fn write_element(element: &VElement, out: &mut String) {
    out.push('<');
    out.push_str(&element.tag);

    if !element.class_names.is_empty() {
        out.push_str(" class=\"");
        out.push_str(&escape_html(&element.class_names.join(" ")));
        out.push('"');
    }

    for (name, value) in &element.attributes {
        out.push(' ');
        out.push_str(name);
        out.push_str("=\"");
        if is_url_attribute(name) {
            out.push_str(&escape_html(&safe_url(value)));
        } else {
            out.push_str(&escape_html(value));
        }
        out.push('"');
    }

    if !element.inline_styles.is_empty() {
        let style = element
            .inline_styles
            .iter()
            .map(|(k, v)| format!("{k}: {}", css_value(v)))
            .collect::<Vec<_>>()
            .join("; ");
        out.push_str(" style=\"");
        out.push_str(&escape_html(&style));
        out.push('"');
    }

    if is_self_closing(&element.tag) {
        out.push_str(" />");
        return;
    }

    out.push('>');
    for child in &element.children {
        write_node(child, out);
    }
    out.push_str("</");
    out.push_str(&element.tag);
    out.push('>');
}

pub fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

/// Escape text for use inside a double-quoted CSS string.
pub fn escape_css_string(s: &str) -> String {
    s.replace('\\', "\\\\")
        .replace('"', "\\\"")
        .replace('\'', "\\'")
        .replace('<', "\\3c ")
        .replace('\n', " ")
}

/// A CSS property value with declaration and block delimiters removed.
pub fn css_value(value: &str) -> String {
    value.chars().filter(|c| !matches!(c, ';' | '{' | '}')).collect()
}

/// Drop script URLs.
pub fn safe_url(url: &str) -> String {
    let lowered: String = url
        .chars()
        .filter(|c| !c.is_whitespace() && !c.is_control())
        .collect::<String>()
        .to_ascii_lowercase();
    if lowered.starts_with("javascript:") || lowered.starts_with("vbscript:") {
        "#".to_string()
    } else {
        url.to_string()
    }
}

fn is_url_attribute(name: &str) -> bool {
    matches!(name, "href" | "src" | "action")
}

fn is_self_closing(tag: &str) -> bool {
    matches!(
        tag,
        "img" | "input" | "br" | "hr" | "meta" | "link" | "source" | "wbr"
    )
}
