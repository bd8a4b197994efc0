//! Structural conformance checking for exchange documents.
//!
//! The validator is an optional, read-only collaborator: it never
//! mutates anything and sits off the import/export path. It can be run
//! before an import or after an export to gain confidence that a
//! document conforms to the interchange structure.
//!
//! The corpus offers no XSD engine, so this is a manual structural
//! check of the same constraints the schema enforces: root element and
//! namespace, the required sections, identifiers, recognized type
//! names, complete coordinates and color components.

use std::path::Path;

use roxmltree::Document;

use crate::error::ExchangeError;
use crate::types::ConceptKind;
use crate::xml::{self, ns};

/// A single validation finding.
#[derive(Clone, Debug)]
pub struct Diagnostic {
    pub message: String,
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

/// The outcome of a validation run.
#[derive(Clone, Debug, Default)]
pub struct ValidationReport {
    pub errors: Vec<Diagnostic>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    fn push(&mut self, message: impl Into<String>) {
        self.errors.push(Diagnostic {
            message: message.into(),
        });
    }
}

/// Validates exchange documents structurally.
#[derive(Clone, Copy, Debug, Default)]
pub struct Validator;

impl Validator {
    pub fn new() -> Self {
        Self
    }

    /// Validate a document on disk.
    pub fn validate_file(&self, path: &Path) -> Result<ValidationReport, ExchangeError> {
        let text = std::fs::read_to_string(path)?;
        Ok(self.validate_str(&text))
    }

    /// Validate a document string. Malformed XML is reported as a
    /// diagnostic, not an error: the validator always produces a
    /// report.
    pub fn validate_str(&self, text: &str) -> ValidationReport {
        let mut report = ValidationReport::default();

        let doc = match Document::parse(text) {
            Ok(doc) => doc,
            Err(e) => {
                report.push(format!("not well-formed: {e}"));
                return report;
            }
        };

        let root = doc.root_element();
        if root.tag_name().name() != xml::ELEMENT_MODEL {
            report.push(format!(
                "root element is '{}', expected '{}'",
                root.tag_name().name(),
                xml::ELEMENT_MODEL
            ));
        }
        if root.tag_name().namespace() != Some(ns::ARCHIMATE) {
            report.push(format!(
                "root namespace is '{}', expected '{}'",
                root.tag_name().namespace().unwrap_or(""),
                ns::ARCHIMATE
            ));
        }
        if root.attribute(xml::ATTRIBUTE_IDENTIFIER).is_none() {
            report.push("model has no identifier");
        }

        let has_elements = root
            .children()
            .any(|c| c.is_element() && c.tag_name().name() == xml::ELEMENT_ELEMENTS);
        if !has_elements {
            report.push("missing required 'elements' section");
        }

        self.check_concepts(&doc, &mut report);
        self.check_views(&doc, &mut report);
        self.check_properties(&doc, &mut report);

        report
    }

    fn check_concepts(&self, doc: &Document<'_>, report: &mut ValidationReport) {
        for entry in doc.descendants().filter(|n| {
            n.is_element()
                && matches!(
                    n.tag_name().name(),
                    xml::ELEMENT_ELEMENT | xml::ELEMENT_RELATIONSHIP
                )
        }) {
            let tag = entry.tag_name().name();
            // 'element' also appears inside property definitions in some
            // producers; only check entries of the two concept sections.
            let Some(parent) = entry.parent_element() else {
                continue;
            };
            let in_section = matches!(
                parent.tag_name().name(),
                xml::ELEMENT_ELEMENTS | xml::ELEMENT_RELATIONSHIPS
            );
            if !in_section {
                continue;
            }

            let id = entry.attribute(xml::ATTRIBUTE_IDENTIFIER).unwrap_or("?");
            if entry.attribute(xml::ATTRIBUTE_IDENTIFIER).is_none() {
                report.push(format!("{tag} without identifier"));
            }

            match entry.attribute((ns::XSI, xml::ATTRIBUTE_TYPE)) {
                None => report.push(format!("{tag} '{id}' has no xsi:type")),
                Some(type_name) => match ConceptKind::from_type_name(type_name) {
                    None => {
                        report.push(format!("{tag} '{id}' has unknown type '{type_name}'"));
                    }
                    Some((kind, _)) => {
                        if tag == xml::ELEMENT_RELATIONSHIP && !kind.is_relationship() {
                            report.push(format!(
                                "relationship '{id}' has element type '{type_name}'"
                            ));
                        }
                        if tag == xml::ELEMENT_ELEMENT && kind.is_relationship() {
                            report.push(format!(
                                "element '{id}' has relationship type '{type_name}'"
                            ));
                        }
                    }
                },
            }

            if tag == xml::ELEMENT_RELATIONSHIP {
                for attribute in [xml::ATTRIBUTE_SOURCE, xml::ATTRIBUTE_TARGET] {
                    if entry.attribute(attribute).is_none() {
                        report.push(format!("relationship '{id}' has no {attribute}"));
                    }
                }
            }
        }
    }

    fn check_views(&self, doc: &Document<'_>, report: &mut ValidationReport) {
        for node in doc
            .descendants()
            .filter(|n| n.is_element() && n.tag_name().name() == xml::ELEMENT_NODE)
        {
            let id = node.attribute(xml::ATTRIBUTE_IDENTIFIER).unwrap_or("?");
            for attribute in [
                xml::ATTRIBUTE_X,
                xml::ATTRIBUTE_Y,
                xml::ATTRIBUTE_WIDTH,
                xml::ATTRIBUTE_HEIGHT,
            ] {
                let ok = node
                    .attribute(attribute)
                    .is_some_and(|v| v.parse::<i32>().is_ok());
                if !ok {
                    report.push(format!("node '{id}' has missing or non-numeric {attribute}"));
                }
            }
        }

        for bendpoint in doc
            .descendants()
            .filter(|n| n.is_element() && n.tag_name().name() == xml::ELEMENT_BENDPOINT)
        {
            for attribute in [xml::ATTRIBUTE_X, xml::ATTRIBUTE_Y] {
                let ok = bendpoint
                    .attribute(attribute)
                    .is_some_and(|v| v.parse::<i32>().is_ok());
                if !ok {
                    report.push(format!("bendpoint has missing or non-numeric {attribute}"));
                }
            }
        }

        for connection in doc
            .descendants()
            .filter(|n| n.is_element() && n.tag_name().name() == xml::ELEMENT_CONNECTION)
        {
            let id = connection.attribute(xml::ATTRIBUTE_IDENTIFIER).unwrap_or("?");
            for attribute in [xml::ATTRIBUTE_SOURCE, xml::ATTRIBUTE_TARGET] {
                if connection.attribute(attribute).is_none() {
                    report.push(format!("connection '{id}' has no {attribute}"));
                }
            }
        }

        for color in doc.descendants().filter(|n| {
            n.is_element()
                && matches!(
                    n.tag_name().name(),
                    xml::ELEMENT_FILLCOLOR | xml::ELEMENT_LINECOLOR | xml::ELEMENT_FONTCOLOR
                )
        }) {
            for attribute in [xml::ATTRIBUTE_R, xml::ATTRIBUTE_G, xml::ATTRIBUTE_B] {
                let ok = color
                    .attribute(attribute)
                    .is_some_and(|v| v.parse::<u8>().is_ok());
                if !ok {
                    report.push(format!(
                        "{} has missing or invalid component {attribute}",
                        color.tag_name().name()
                    ));
                }
            }
        }
    }

    fn check_properties(&self, doc: &Document<'_>, report: &mut ValidationReport) {
        let mut defined = std::collections::HashSet::new();
        for definition in doc
            .descendants()
            .filter(|n| n.is_element() && n.tag_name().name() == xml::ELEMENT_PROPERTYDEFINITION)
        {
            match definition.attribute(xml::ATTRIBUTE_IDENTIFIER) {
                None => report.push("propertydefinition without identifier"),
                Some(id) => {
                    if !defined.insert(id.to_string()) {
                        report.push(format!("duplicate propertydefinition '{id}'"));
                    }
                }
            }
        }

        for property in doc
            .descendants()
            .filter(|n| n.is_element() && n.tag_name().name() == xml::ELEMENT_PROPERTY)
        {
            match property.attribute(xml::ATTRIBUTE_IDENTIFIERREF) {
                None => report.push("property without identifierref"),
                Some(idref) => {
                    if !defined.contains(idref) {
                        report.push(format!("property references undefined '{idref}'"));
                    }
                }
            }
        }
    }
}
