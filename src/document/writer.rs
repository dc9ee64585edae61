//! Markup generation for SVG documents

use roxmltree::{Node, NodeType};

use super::{element_attributes, Attributes};

/// Build SVG markup incrementally
pub struct SvgWriter {
    out: String,
    pretty_print: bool,
    depth: usize,
}

impl SvgWriter {
    /// Create a writer; with `pretty_print` every tag goes on its own indented line
    pub fn new(pretty_print: bool) -> Self {
        Self {
            out: String::new(),
            pretty_print,
            depth: 0,
        }
    }

    fn indent(&mut self) {
        if self.pretty_print {
            if !self.out.is_empty() {
                self.out.push('\n');
            }
            self.out.push_str(&"  ".repeat(self.depth));
        }
    }

    fn tag(&mut self, name: &str, attrs: &Attributes) {
        self.out.push('<');
        self.out.push_str(name);
        for (k, v) in attrs.iter() {
            self.out.push(' ');
            self.out.push_str(k);
            self.out.push_str("=\"");
            self.out.push_str(&escape_attribute(v));
            self.out.push('"');
        }
    }

    pub fn open(&mut self, name: &str, attrs: &Attributes) {
        self.indent();
        self.tag(name, attrs);
        self.out.push('>');
        self.depth += 1;
    }

    /// Write a self-closing element
    pub fn empty(&mut self, name: &str, attrs: &Attributes) {
        self.indent();
        self.tag(name, attrs);
        self.out.push_str("/>");
    }

    pub fn close(&mut self, name: &str) {
        self.depth = self.depth.saturating_sub(1);
        self.indent();
        self.out.push_str("</");
        self.out.push_str(name);
        self.out.push('>');
    }

    /// Write character data. Whitespace-only text is dropped when pretty-printing.
    pub fn text(&mut self, text: &str) {
        if self.pretty_print {
            if text.trim().is_empty() {
                return;
            }
            self.indent();
            self.out.push_str(&escape_text(text.trim()));
        } else {
            self.out.push_str(&escape_text(text));
        }
    }

    pub fn comment(&mut self, text: &str) {
        self.indent();
        self.out.push_str("<!--");
        self.out.push_str(text);
        self.out.push_str("-->");
    }

    /// Write a parsed element and its subtree, replacing its own attributes with `attrs`
    pub fn element_with(&mut self, node: Node, attrs: &Attributes) {
        let name = qualified_tag_name(node);
        let children: Vec<Node> = node
            .children()
            .filter(|c| matches!(c.node_type(), NodeType::Element | NodeType::Text | NodeType::Comment))
            .collect();

        if children.is_empty() {
            self.empty(&name, attrs);
            return;
        }

        self.open(&name, attrs);
        for child in children {
            self.node(child);
        }
        self.close(&name);
    }

    /// Write a parsed node and its subtree verbatim
    pub fn node(&mut self, node: Node) {
        match node.node_type() {
            NodeType::Element => {
                let attrs = element_attributes(node, true);
                self.element_with(node, &attrs);
            }
            NodeType::Text => self.text(node.text().unwrap_or("")),
            NodeType::Comment => self.comment(node.text().unwrap_or("")),
            NodeType::Root | NodeType::PI => {}
        }
    }

    pub fn finish(self) -> String {
        self.out
    }
}

fn qualified_tag_name(node: Node) -> String {
    let tag = node.tag_name();
    match tag.namespace().and_then(|uri| node.lookup_prefix(uri)) {
        Some(prefix) => format!("{}:{}", prefix, tag.name()),
        None => tag.name().to_string(),
    }
}

pub fn escape_attribute(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('"', "&quot;")
}

pub fn escape_text(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}
