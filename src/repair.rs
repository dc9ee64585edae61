//! Validity checking and repair of generated SVG markup
//!
//! Model output is not guaranteed to be well-formed. [`repair`] tries the raw
//! markup, then a normalized form, then falls back to [`PLACEHOLDER_SVG`].

use std::sync::OnceLock;

use regex::Regex;
use tracing::{debug, warn};

use crate::document::{attribute_ignore_case, element_attributes, find_svg, parse_xml, SvgWriter};
use crate::error::{PathDataError, RepairError};
use crate::path::parse_path;

/// Minimal document returned when markup cannot be repaired
pub const PLACEHOLDER_SVG: &str = "<svg></svg>";

/// Namespace declarations dropped by [`normalize`]
const STRIPPED_NAMESPACES: [&str; 3] = ["xmlns:xlink", "xmlns:ev", "xmlns:xml"];

/// Side length used when a root element has no width or height
const DEFAULT_DIMENSION: &str = "100";

/// Check that markup is well-formed XML and every `<path>` has parseable data
pub fn is_valid(markup: &str) -> bool {
    match check(markup) {
        Ok(()) => true,
        Err(reason) => {
            debug!(%reason, "invalid SVG");
            false
        }
    }
}

fn check(markup: &str) -> Result<(), String> {
    let diagnostics = path_diagnostics(markup).map_err(|e| e.to_string())?;
    match diagnostics.first() {
        Some(d) => Err(d.error.to_string()),
        None => Ok(()),
    }
}

/// A `<path>` whose `d` attribute failed to parse
#[derive(Debug, Clone, PartialEq)]
pub struct PathDiagnostic {
    /// Position among the document's `<path>` elements
    pub index: usize,
    pub data: String,
    pub error: PathDataError,
}

impl PathDiagnostic {
    /// Render the error against the path data with ariadne
    pub fn report(&self) -> String {
        self.error.format(&self.data, &format!("path[{}]", self.index))
    }
}

/// Parse every `<path>` of well-formed markup and collect the failures
pub fn path_diagnostics(markup: &str) -> Result<Vec<PathDiagnostic>, RepairError> {
    let xml = parse_xml(markup)?;
    let diagnostics = xml
        .descendants()
        .filter(|n| n.has_tag_name("path"))
        .enumerate()
        .filter_map(|(index, node)| {
            let data = node.attribute("d").unwrap_or("");
            parse_path(data).err().map(|error| PathDiagnostic {
                index,
                data: data.to_string(),
                error,
            })
        })
        .collect();
    Ok(diagnostics)
}

/// Target dimensions for [`normalize`]
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NormalizeOptions {
    pub width: Option<f64>,
    pub height: Option<f64>,
}

impl NormalizeOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Force explicit pixel dimensions on the root element
    pub fn with_size(mut self, width: f64, height: f64) -> Self {
        self.width = Some(width);
        self.height = Some(height);
        self
    }
}

/// Normalize root attributes of SVG markup.
///
/// Drops `xmlns:xlink`, `xmlns:ev` and `xmlns:xml`; sets `width`/`height` in
/// pixels when both targets are given; adds a `viewBox` derived from the
/// root's width and height when none exists. Markup without an `<svg>`
/// element is returned as-is.
pub fn normalize(markup: &str, options: &NormalizeOptions) -> Result<String, RepairError> {
    let xml = parse_xml(markup)?;
    let Some(svg) = find_svg(&xml) else {
        return Ok(markup.to_string());
    };

    let mut attrs = element_attributes(svg, true);
    for name in STRIPPED_NAMESPACES {
        attrs.remove(name);
    }

    if let (Some(width), Some(height)) = (options.width, options.height) {
        attrs.set("width", format!("{}px", width));
        attrs.set("height", format!("{}px", height));
    }

    if attribute_ignore_case(svg, "viewBox").is_none() {
        let width = dimension(attrs.get("width"), "width")?;
        let height = dimension(attrs.get("height"), "height")?;
        attrs.set("viewBox", format!("0 0 {} {}", width, height));
    }

    let mut w = SvgWriter::new(false);
    w.element_with(svg, &attrs);
    Ok(w.finish())
}

fn dimension(value: Option<&str>, attribute: &str) -> Result<f64, RepairError> {
    let raw = value.unwrap_or(DEFAULT_DIMENSION);
    raw.trim()
        .trim_end_matches("px")
        .trim()
        .parse::<f64>()
        .map_err(|_| RepairError::InvalidDimension {
            attribute: attribute.to_string(),
            value: raw.to_string(),
        })
}

/// Which form of the markup survived repair
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RepairStage {
    Original,
    Normalized,
    Placeholder,
}

/// Result of [`repair`]
#[derive(Debug, Clone, PartialEq)]
pub struct Repair {
    pub svg: String,
    pub stage: RepairStage,
}

/// Return the first valid form among: raw markup, normalized markup, placeholder.
///
/// Normalization only rewrites root attributes, and validity depends only on
/// XML well-formedness and path data. Markup that fails the first check
/// therefore fails the second as well, so [`RepairStage::Normalized`] is not
/// produced in practice; callers see `Original` or `Placeholder`.
pub fn repair(markup: &str) -> Repair {
    if is_valid(markup) {
        return Repair {
            svg: markup.to_string(),
            stage: RepairStage::Original,
        };
    }

    match normalize(markup, &NormalizeOptions::default()) {
        Ok(normalized) if is_valid(&normalized) => {
            debug!("markup repaired by normalization");
            return Repair {
                svg: normalized,
                stage: RepairStage::Normalized,
            };
        }
        Ok(_) => {}
        Err(e) => debug!(error = %e, "normalization failed"),
    }

    warn!("markup could not be repaired, using placeholder");
    Repair {
        svg: PLACEHOLDER_SVG.to_string(),
        stage: RepairStage::Placeholder,
    }
}

/// Repair markup, discarding which stage succeeded
pub fn repair_or_placeholder(markup: &str) -> String {
    repair(markup).svg
}

fn tag_regexes() -> &'static (Regex, Regex) {
    static REGEXES: OnceLock<(Regex, Regex)> = OnceLock::new();
    REGEXES.get_or_init(|| {
        (
            Regex::new(r"<(\w+)").expect("opening tag pattern should compile"),
            Regex::new(r"<\w+[^>]*/>").expect("self-closing tag pattern should compile"),
        )
    })
}

/// Find tag names that are opened more often than they are closed.
///
/// A tag counts as closed by either a self-closing form or a matching
/// `</tag>`. Names are reported once, in order of first appearance.
pub fn find_unclosed_tags(markup: &str) -> Vec<String> {
    let (open_re, self_closing_re) = tag_regexes();

    let all_tags: Vec<&str> = open_re
        .captures_iter(markup)
        .filter_map(|c| c.get(1).map(|m| m.as_str()))
        .collect();
    let self_closing: Vec<&str> = self_closing_re
        .find_iter(markup)
        .filter_map(|m| open_re.captures(m.as_str()))
        .filter_map(|c| c.get(1).map(|m| m.as_str()))
        .collect();

    let mut unclosed: Vec<String> = Vec::new();
    for tag in &all_tags {
        if unclosed.iter().any(|t| t.as_str() == *tag) {
            continue;
        }
        let opened = all_tags.iter().filter(|t| *t == tag).count();
        let self_closed = self_closing.iter().filter(|t| *t == tag).count();
        let closed = markup.matches(&format!("</{}>", tag)).count();
        if opened > self_closed + closed {
            unclosed.push(tag.to_string());
        }
    }
    unclosed
}
