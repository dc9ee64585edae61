//! Parsed SVG documents: root attributes, viewbox and grouped paths
//!
//! Only `<path>` elements are carried through. Each path is assigned to the
//! group of its nearest `<g>` ancestor; runs of paths outside any `<g>` form
//! implicit groups that serialize without a wrapper element.

pub mod writer;

use std::collections::HashMap;

use roxmltree::{Node, NodeId, ParsingOptions};
use tracing::{debug, warn};

use crate::path::{parse_path, Path};

pub use writer::SvgWriter;

/// Viewbox extent used when a document has no usable `viewBox`
pub const DEFAULT_VIEWBOX: (f64, f64) = (100.0, 100.0);

/// Insertion-ordered attribute map
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Attributes {
    entries: Vec<(String, String)>,
}

/// Attributes attached to a single `<path>`, excluding its `d` data
pub type PathAttributes = Attributes;

impl Attributes {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Replace an existing value in place, or append a new entry
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == name) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((name, value)),
        }
    }

    pub fn remove(&mut self, name: &str) -> Option<String> {
        let idx = self.entries.iter().position(|(k, _)| k == name)?;
        Some(self.entries.remove(idx).1)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Attributes {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut attrs = Attributes::new();
        for (k, v) in iter {
            attrs.set(k, v);
        }
        attrs
    }
}

/// A path together with its attributes
#[derive(Debug, Clone, PartialEq)]
pub struct PathElement {
    pub path: Path,
    pub attributes: PathAttributes,
}

/// Paths sharing a `<g>` ancestor, or a run of ungrouped paths
#[derive(Debug, Clone, PartialEq)]
pub struct PathGroup {
    /// `id` of the `<g>` element, if it had one
    pub id: Option<String>,
    /// Pass-through attributes of the `<g>` element, excluding `id`
    pub attributes: Attributes,
    /// True for paths without a `<g>` ancestor; serialized without a wrapper
    pub implicit: bool,
    pub paths: Vec<PathElement>,
}

impl PathGroup {
    fn implicit() -> Self {
        Self {
            id: None,
            attributes: Attributes::new(),
            implicit: true,
            paths: Vec::new(),
        }
    }
}

/// An SVG document reduced to its root attributes and grouped paths
#[derive(Debug, Clone, PartialEq)]
pub struct SvgDocument {
    /// Root attributes in source order, namespace declarations first
    pub root_attributes: Attributes,
    /// Viewbox (width, height)
    pub viewbox: (f64, f64),
    pub groups: Vec<PathGroup>,
    /// Number of paths dropped because their data failed to parse
    pub skipped: usize,
}

impl SvgDocument {
    /// Parse SVG markup.
    ///
    /// Returns `Ok(None)` when the markup has no `<svg>` element. Paths with
    /// malformed data are logged and left out.
    pub fn parse(markup: &str) -> Result<Option<SvgDocument>, roxmltree::Error> {
        let xml = parse_xml(markup)?;
        let Some(svg) = find_svg(&xml) else {
            return Ok(None);
        };

        let mut doc = SvgDocument {
            root_attributes: element_attributes(svg, true),
            viewbox: viewbox_of(svg),
            groups: Vec::new(),
            skipped: 0,
        };
        let mut explicit: HashMap<NodeId, usize> = HashMap::new();

        for (index, node) in svg
            .descendants()
            .filter(|n| n.has_tag_name("path"))
            .enumerate()
        {
            let data = node.attribute("d").unwrap_or("");
            if data.trim().is_empty() {
                debug!(index, "skipping path without data");
                continue;
            }

            let path = match parse_path(data) {
                Ok(path) => path,
                Err(e) => {
                    warn!(index, error = %e, "skipping path with malformed data");
                    doc.skipped += 1;
                    continue;
                }
            };

            let mut attributes = element_attributes(node, false);
            attributes.remove("d");
            let element = PathElement { path, attributes };

            match enclosing_group(node, svg) {
                Some(g) => {
                    let idx = *explicit.entry(g.id()).or_insert_with(|| {
                        let mut attributes = element_attributes(g, false);
                        let id = attributes.remove("id");
                        doc.groups.push(PathGroup {
                            id,
                            attributes,
                            implicit: false,
                            paths: Vec::new(),
                        });
                        doc.groups.len() - 1
                    });
                    doc.groups[idx].paths.push(element);
                }
                None => {
                    if !doc.groups.last().is_some_and(|g| g.implicit) {
                        doc.groups.push(PathGroup::implicit());
                    }
                    if let Some(group) = doc.groups.last_mut() {
                        group.paths.push(element);
                    }
                }
            }
        }

        Ok(Some(doc))
    }

    /// Iterate over all paths in output order
    pub fn paths(&self) -> impl Iterator<Item = &PathElement> {
        self.groups.iter().flat_map(|g| g.paths.iter())
    }

    pub fn paths_mut(&mut self) -> impl Iterator<Item = &mut PathElement> {
        self.groups.iter_mut().flat_map(|g| g.paths.iter_mut())
    }

    /// Serialize to compact SVG markup
    pub fn to_svg(&self) -> String {
        self.write(false)
    }

    /// Serialize with one element per line, indented by nesting depth
    pub fn to_svg_pretty(&self) -> String {
        self.write(true)
    }

    fn write(&self, pretty_print: bool) -> String {
        let mut w = SvgWriter::new(pretty_print);
        w.open("svg", &self.root_attributes);

        for group in &self.groups {
            if group.paths.is_empty() {
                continue;
            }
            if !group.implicit {
                let mut attrs = Attributes::new();
                if let Some(id) = &group.id {
                    attrs.set("id", id.as_str());
                }
                for (k, v) in group.attributes.iter() {
                    attrs.set(k, v);
                }
                w.open("g", &attrs);
            }

            for element in &group.paths {
                let mut attrs = Attributes::new();
                attrs.set("d", element.path.to_svg_d());
                for (k, v) in element.attributes.iter() {
                    attrs.set(k, v);
                }
                w.empty("path", &attrs);
            }

            if !group.implicit {
                w.close("g");
            }
        }

        w.close("svg");
        w.finish()
    }
}

/// Extract the viewbox (width, height) of SVG markup, defaulting to 100×100
pub fn viewbox_size(markup: &str) -> (f64, f64) {
    parse_xml(markup)
        .ok()
        .and_then(|xml| find_svg(&xml).map(viewbox_of))
        .unwrap_or(DEFAULT_VIEWBOX)
}

pub(crate) fn parse_xml(markup: &str) -> Result<roxmltree::Document<'_>, roxmltree::Error> {
    let options = ParsingOptions {
        allow_dtd: true,
        ..ParsingOptions::default()
    };
    roxmltree::Document::parse_with_options(markup, options)
}

pub(crate) fn find_svg<'a, 'input>(xml: &'a roxmltree::Document<'input>) -> Option<Node<'a, 'input>> {
    xml.descendants().find(|n| n.has_tag_name("svg"))
}

/// Look up an attribute by name ignoring ASCII case
pub(crate) fn attribute_ignore_case<'a>(node: Node<'a, '_>, name: &str) -> Option<&'a str> {
    node.attributes()
        .find(|a| a.name().eq_ignore_ascii_case(name))
        .map(|a| a.value())
}

fn viewbox_of(svg: Node) -> (f64, f64) {
    attribute_ignore_case(svg, "viewBox")
        .and_then(parse_viewbox)
        .unwrap_or(DEFAULT_VIEWBOX)
}

/// Parse "min-x min-y width height" into (width, height)
pub fn parse_viewbox(value: &str) -> Option<(f64, f64)> {
    let numbers = value
        .split(|c: char| c.is_whitespace() || c == ',')
        .filter(|s| !s.is_empty())
        .map(|s| s.parse::<f64>())
        .collect::<Result<Vec<_>, _>>()
        .ok()?;
    if numbers.len() >= 4 {
        Some((numbers[2], numbers[3]))
    } else {
        None
    }
}

fn enclosing_group<'a, 'input>(
    node: Node<'a, 'input>,
    svg: Node<'a, 'input>,
) -> Option<Node<'a, 'input>> {
    node.ancestors()
        .skip(1)
        .take_while(|a| *a != svg)
        .find(|a| a.has_tag_name("g"))
}

/// Collect an element's attributes with their prefixes restored.
///
/// With `declarations`, namespace declarations introduced by the element
/// come first.
pub(crate) fn element_attributes(node: Node, declarations: bool) -> Attributes {
    let mut attrs = Attributes::new();

    if declarations {
        let parent = node.parent_element();
        for ns in node.namespaces() {
            if ns.name() == Some("xml") {
                continue;
            }
            let inherited = parent.is_some_and(|p| {
                p.namespaces()
                    .any(|pns| pns.name() == ns.name() && pns.uri() == ns.uri())
            });
            if inherited {
                continue;
            }
            match ns.name() {
                Some(prefix) => attrs.set(format!("xmlns:{}", prefix), ns.uri()),
                None => attrs.set("xmlns", ns.uri()),
            }
        }
    }

    for attr in node.attributes() {
        let name = match attr.namespace().and_then(|uri| node.lookup_prefix(uri)) {
            Some(prefix) => format!("{}:{}", prefix, attr.name()),
            None => attr.name().to_string(),
        };
        attrs.set(name, attr.value());
    }

    attrs
}
