//! Model exporter: serializes a model graph to the exchange XML form.
//!
//! The document is written in one pass in the section order the schema
//! prescribes: root attributes and metadata, name/documentation, root
//! properties, elements grouped by layer, relationships, the optional
//! organization tree, property definitions, then views.
//!
//! Coordinates are converted from the model's parent-relative bounds to
//! absolute, non-negative values: the accumulated parent origin and the
//! per-view negative offset are threaded as explicit parameters through
//! the node and connection writers.
//!
//! The exporter does not validate its input. A malformed model yields a
//! malformed document; only stream errors are reported.

use std::io::{Cursor, Write};
use std::path::Path;

use indexmap::IndexMap;
use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};

use crate::catalog::PropertyCatalog;
use crate::error::ExchangeError;
use crate::geometry::{self, Bounds, Offset};
use crate::model::{Concept, Folder, Model, Property};
use crate::types::Layer;
use crate::view::{Connection, Font, Node, NodeKind, Rgb, Style, View};
use crate::xml::{self, ns};

/// Export configuration supplied by the calling context.
#[derive(Clone, Debug, Default)]
pub struct ExportOptions {
    /// Write the folder forest as an `organization` section.
    pub include_organization: bool,
    /// Copy the schema documents next to the output file.
    pub include_schema_files: bool,
    /// Dublin-Core metadata; only non-empty values are emitted.
    pub metadata: IndexMap<String, String>,
    /// Language tag written on text elements (`xml:lang`).
    pub language_code: Option<String>,
    /// Directory holding the schema documents to copy.
    pub schema_dir: Option<std::path::PathBuf>,
}

/// Serializes a [`Model`] to exchange-format XML.
#[derive(Clone, Debug, Default)]
pub struct ModelExporter {
    options: ExportOptions,
}

impl ModelExporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: ExportOptions) -> Self {
        Self { options }
    }

    /// Serialize the model to a byte stream.
    pub fn write(&self, model: &Model) -> Result<Vec<u8>, ExchangeError> {
        tracing::debug!(
            elements = model.element_count(),
            relationships = model.relationship_count(),
            views = model.views.len(),
            "exporting model"
        );

        let mut buffer = Cursor::new(Vec::new());
        let writer = Writer::new_with_indent(&mut buffer, b' ', 2);

        let mut session = ExportSession {
            model,
            options: &self.options,
            catalog: PropertyCatalog::build(model),
            w: writer,
        };
        session.write_document()?;

        let mut output = buffer.into_inner();
        output.push(b'\n');
        Ok(output)
    }

    /// Serialize the model to a string.
    pub fn write_string(&self, model: &Model) -> Result<String, ExchangeError> {
        let bytes = self.write(model)?;
        String::from_utf8(bytes).map_err(|e| ExchangeError::xml(e.to_string()))
    }

    /// Write the model to a file, copying the schema documents next to
    /// it when configured to do so.
    pub fn export_file(&self, model: &Model, path: &Path) -> Result<(), ExchangeError> {
        let bytes = self.write(model)?;
        std::fs::write(path, bytes)?;

        if self.options.include_schema_files {
            if let Some(schema_dir) = &self.options.schema_dir {
                let target_dir = path.parent().unwrap_or_else(|| Path::new("."));
                for name in [xml::ARCHIMATE_XSD, xml::DUBLINCORE_XSD] {
                    std::fs::copy(schema_dir.join(name), target_dir.join(name))?;
                }
            }
        }

        Ok(())
    }
}

// ============================================================================
// WRITE SESSION
// ============================================================================

/// State for one `write` call: the model, its property catalog and the
/// output writer. Discarded when the call returns.
struct ExportSession<'a, W: Write> {
    model: &'a Model,
    options: &'a ExportOptions,
    catalog: PropertyCatalog,
    w: Writer<W>,
}

impl<'a, W: Write> ExportSession<'a, W> {
    fn emit(&mut self, event: Event<'_>) -> Result<(), ExchangeError> {
        self.w
            .write_event(event)
            .map_err(|e| ExchangeError::xml(format!("write error: {e}")))
    }

    fn write_document(&mut self) -> Result<(), ExchangeError> {
        let model = self.model;

        self.emit(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;

        let mut root = BytesStart::new(xml::ELEMENT_MODEL);
        root.push_attribute(("xmlns", ns::ARCHIMATE));
        root.push_attribute(("xmlns:xsi", ns::XSI));
        if self.has_metadata() {
            root.push_attribute(("xmlns:dc", ns::DC));
        }

        // Schema location pairs: target namespace followed by document.
        let mut schema_location = format!("{} {}", ns::ARCHIMATE, xml::ARCHIMATE_XSD);
        if self.has_metadata() {
            schema_location.push_str(&format!(" {} {}", ns::DC, xml::DUBLINCORE_XSD));
        }
        root.push_attribute(("xsi:schemaLocation", schema_location.as_str()));

        let id = xml::xml_id(&model.id);
        root.push_attribute((xml::ATTRIBUTE_IDENTIFIER, id.as_str()));
        self.emit(Event::Start(root))?;

        self.write_metadata()?;
        self.write_text_element(xml::ELEMENT_NAME, model.name.as_deref())?;
        self.write_text_element(xml::ELEMENT_DOCUMENTATION, model.documentation.as_deref())?;
        self.write_properties(&model.properties)?;
        self.write_elements()?;
        self.write_relationships()?;
        if self.options.include_organization {
            self.write_organization()?;
        }
        self.write_property_definitions()?;
        self.write_views()?;

        self.emit(Event::End(BytesEnd::new(xml::ELEMENT_MODEL)))
    }

    // ── Metadata ────────────────────────────────────────────────────

    fn has_metadata(&self) -> bool {
        self.options.metadata.values().any(|v| !v.is_empty())
    }

    fn write_metadata(&mut self) -> Result<(), ExchangeError> {
        if !self.has_metadata() {
            return Ok(());
        }
        let options = self.options;

        self.emit(Event::Start(BytesStart::new(xml::ELEMENT_METADATA)))?;
        self.write_plain_text_element(xml::ELEMENT_SCHEMA, "Dublin Core")?;
        self.write_plain_text_element(xml::ELEMENT_SCHEMAVERSION, "1.1")?;

        for (key, value) in &options.metadata {
            if !key.is_empty() && !value.is_empty() {
                let tag = format!("dc:{key}");
                self.write_plain_text_element(&tag, value)?;
            }
        }

        self.emit(Event::End(BytesEnd::new(xml::ELEMENT_METADATA)))
    }

    // ── Text helpers ────────────────────────────────────────────────

    /// Write `<tag>text</tag>`, tagged with the language code when one
    /// is configured. Empty or absent text is skipped.
    fn write_text_element(&mut self, tag: &str, text: Option<&str>) -> Result<(), ExchangeError> {
        let Some(text) = text else { return Ok(()) };
        if text.is_empty() {
            return Ok(());
        }

        let mut start = BytesStart::new(tag);
        if let Some(lang) = &self.options.language_code {
            start.push_attribute(("xml:lang", lang.as_str()));
        }
        self.emit(Event::Start(start))?;
        self.emit(Event::Text(BytesText::new(text)))?;
        self.emit(Event::End(BytesEnd::new(tag)))
    }

    /// Write `<tag>text</tag>` without a language tag.
    fn write_plain_text_element(&mut self, tag: &str, text: &str) -> Result<(), ExchangeError> {
        self.emit(Event::Start(BytesStart::new(tag)))?;
        self.emit(Event::Text(BytesText::new(text)))?;
        self.emit(Event::End(BytesEnd::new(tag)))
    }

    // ── Properties ──────────────────────────────────────────────────

    /// Write a `properties` block by catalog reference. Properties
    /// whose key has no catalog entry are dropped; an empty block is
    /// skipped entirely.
    fn write_properties(&mut self, properties: &'a [Property]) -> Result<(), ExchangeError> {
        let writable: Vec<(String, &str)> = properties
            .iter()
            .filter_map(|p| {
                self.catalog
                    .get(&p.key)
                    .map(|id| (id.to_string(), p.value.as_str()))
            })
            .collect();
        if writable.is_empty() {
            return Ok(());
        }

        self.emit(Event::Start(BytesStart::new(xml::ELEMENT_PROPERTIES)))?;
        for (ref_id, value) in writable {
            let mut start = BytesStart::new(xml::ELEMENT_PROPERTY);
            start.push_attribute((xml::ATTRIBUTE_IDENTIFIERREF, ref_id.as_str()));
            self.emit(Event::Start(start))?;
            self.write_value_element(value)?;
            self.emit(Event::End(BytesEnd::new(xml::ELEMENT_PROPERTY)))?;
        }
        self.emit(Event::End(BytesEnd::new(xml::ELEMENT_PROPERTIES)))
    }

    /// Write a property `value` element. Unlike other text elements an
    /// empty value is still written, so the property survives the
    /// round trip.
    fn write_value_element(&mut self, value: &str) -> Result<(), ExchangeError> {
        let mut start = BytesStart::new(xml::ELEMENT_VALUE);
        if let Some(lang) = &self.options.language_code {
            start.push_attribute(("xml:lang", lang.as_str()));
        }
        self.emit(Event::Start(start))?;
        self.emit(Event::Text(BytesText::new(value)))?;
        self.emit(Event::End(BytesEnd::new(xml::ELEMENT_VALUE)))
    }

    fn write_property_definitions(&mut self) -> Result<(), ExchangeError> {
        if self.catalog.is_empty() {
            return Ok(());
        }

        self.emit(Event::Start(BytesStart::new(
            xml::ELEMENT_PROPERTYDEFINITIONS,
        )))?;
        let entries: Vec<(String, String)> = self
            .catalog
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        for (key, id) in entries {
            let mut start = BytesStart::new(xml::ELEMENT_PROPERTYDEFINITION);
            start.push_attribute((xml::ATTRIBUTE_IDENTIFIER, id.as_str()));
            start.push_attribute((xml::ATTRIBUTE_TYPE, "string"));
            self.emit(Event::Start(start))?;
            self.write_plain_text_element(xml::ELEMENT_NAME, &key)?;
            self.emit(Event::End(BytesEnd::new(xml::ELEMENT_PROPERTYDEFINITION)))?;
        }
        self.emit(Event::End(BytesEnd::new(xml::ELEMENT_PROPERTYDEFINITIONS)))
    }

    // ── Elements ────────────────────────────────────────────────────

    fn write_elements(&mut self) -> Result<(), ExchangeError> {
        let model = self.model;
        self.emit(Event::Start(BytesStart::new(xml::ELEMENT_ELEMENTS)))?;

        for layer in Layer::ALL {
            for concept in model
                .concepts
                .values()
                .filter(|c| !c.is_relationship() && c.kind.layer() == Some(layer))
            {
                self.write_concept(xml::ELEMENT_ELEMENT, concept)?;
            }
        }

        self.emit(Event::End(BytesEnd::new(xml::ELEMENT_ELEMENTS)))
    }

    fn write_relationships(&mut self) -> Result<(), ExchangeError> {
        let model = self.model;
        self.emit(Event::Start(BytesStart::new(xml::ELEMENT_RELATIONSHIPS)))?;
        for concept in model.relationships() {
            self.write_concept(xml::ELEMENT_RELATIONSHIP, concept)?;
        }
        self.emit(Event::End(BytesEnd::new(xml::ELEMENT_RELATIONSHIPS)))
    }

    /// Write one element or relationship entry.
    fn write_concept(&mut self, tag: &str, concept: &'a Concept) -> Result<(), ExchangeError> {
        let mut start = BytesStart::new(tag);
        let id = xml::xml_id(&concept.id);
        start.push_attribute((xml::ATTRIBUTE_IDENTIFIER, id.as_str()));

        if let Some(info) = &concept.relationship {
            let source = xml::xml_id(&info.source);
            let target = xml::xml_id(&info.target);
            start.push_attribute((xml::ATTRIBUTE_SOURCE, source.as_str()));
            start.push_attribute((xml::ATTRIBUTE_TARGET, target.as_str()));
        }

        start.push_attribute(("xsi:type", concept.type_name()));

        if let Some(info) = &concept.relationship {
            if let Some(access) = info.access {
                start.push_attribute((xml::ATTRIBUTE_ACCESS_TYPE, access.type_value()));
            }
            if let Some(strength) = &info.influence_strength {
                if !strength.is_empty() {
                    start.push_attribute((xml::ATTRIBUTE_MODIFIER, strength.as_str()));
                }
            }
        }

        let has_content = concept.name.as_deref().is_some_and(|n| !n.is_empty())
            || concept
                .documentation
                .as_deref()
                .is_some_and(|d| !d.is_empty())
            || concept
                .properties
                .iter()
                .any(|p| self.catalog.get(&p.key).is_some());
        if !has_content {
            return self.emit(Event::Empty(start));
        }

        self.emit(Event::Start(start))?;
        self.write_text_element(xml::ELEMENT_NAME, concept.name.as_deref())?;
        self.write_text_element(xml::ELEMENT_DOCUMENTATION, concept.documentation.as_deref())?;
        self.write_properties(&concept.properties)?;
        self.emit(Event::End(BytesEnd::new(tag)))
    }

    // ── Organization ────────────────────────────────────────────────

    fn write_organization(&mut self) -> Result<(), ExchangeError> {
        let model = self.model;
        self.emit(Event::Start(BytesStart::new(xml::ELEMENT_ORGANIZATION)))?;
        for folder in &model.folders {
            self.write_folder(folder)?;
        }
        self.emit(Event::End(BytesEnd::new(xml::ELEMENT_ORGANIZATION)))
    }

    fn write_folder(&mut self, folder: &'a Folder) -> Result<(), ExchangeError> {
        if folder.is_empty() {
            return Ok(());
        }

        self.emit(Event::Start(BytesStart::new(xml::ELEMENT_ITEM)))?;
        self.write_text_element(xml::ELEMENT_NAME, Some(folder.name.as_str()))?;
        self.write_text_element(xml::ELEMENT_DOCUMENTATION, folder.documentation.as_deref())?;

        for sub_folder in &folder.folders {
            self.write_folder(sub_folder)?;
        }
        for item in &folder.items {
            let mut start = BytesStart::new(xml::ELEMENT_ITEM);
            let ref_id = xml::xml_id(item);
            start.push_attribute((xml::ATTRIBUTE_IDENTIFIERREF, ref_id.as_str()));
            self.emit(Event::Empty(start))?;
        }

        self.emit(Event::End(BytesEnd::new(xml::ELEMENT_ITEM)))
    }

    // ── Views ───────────────────────────────────────────────────────

    fn write_views(&mut self) -> Result<(), ExchangeError> {
        let model = self.model;
        if model.views.is_empty() {
            return Ok(());
        }

        self.emit(Event::Start(BytesStart::new(xml::ELEMENT_VIEWS)))?;
        for view in &model.views {
            self.write_view(view)?;
        }
        self.emit(Event::End(BytesEnd::new(xml::ELEMENT_VIEWS)))
    }

    fn write_view(&mut self, view: &'a View) -> Result<(), ExchangeError> {
        // Calculated once per view and applied to every coordinate.
        let offset = geometry::negative_offset(view);

        let mut start = BytesStart::new(xml::ELEMENT_VIEW);
        let id = xml::xml_id(&view.id);
        start.push_attribute((xml::ATTRIBUTE_IDENTIFIER, id.as_str()));
        if let Some(viewpoint) = &view.viewpoint {
            if !viewpoint.is_empty() {
                start.push_attribute((xml::ATTRIBUTE_VIEWPOINT, viewpoint.as_str()));
            }
        }
        self.emit(Event::Start(start))?;

        self.write_text_element(xml::ELEMENT_NAME, view.name.as_deref())?;
        self.write_text_element(xml::ELEMENT_DOCUMENTATION, view.documentation.as_deref())?;
        self.write_properties(&view.properties)?;

        for node in &view.nodes {
            self.write_node(node, Offset::default(), offset)?;
        }
        for connection in &view.connections {
            if !is_nested_connection(view, connection) {
                self.write_connection(view, connection, offset)?;
            }
        }

        self.emit(Event::End(BytesEnd::new(xml::ELEMENT_VIEW)))
    }

    // ── Nodes ───────────────────────────────────────────────────────

    /// Write one node and its subtree. `origin` is the absolute origin
    /// of the parent container; `offset` the view's negative offset.
    fn write_node(
        &mut self,
        node: &'a Node,
        origin: Offset,
        offset: Offset,
    ) -> Result<(), ExchangeError> {
        let absolute = Bounds {
            x: origin.x + node.bounds.x,
            y: origin.y + node.bounds.y,
            ..node.bounds
        };

        let mut start = BytesStart::new(xml::ELEMENT_NODE);
        let id = xml::xml_id(&node.id);
        start.push_attribute((xml::ATTRIBUTE_IDENTIFIER, id.as_str()));
        match &node.kind {
            NodeKind::Concept { element, .. } => {
                let element_ref = xml::xml_id(element);
                start.push_attribute((xml::ATTRIBUTE_ELEMENTREF, element_ref.as_str()));
            }
            NodeKind::Group { .. } => {
                start.push_attribute(("xsi:type", xml::NODE_TYPE_CONTAINER));
            }
            NodeKind::ViewRef { .. } => {
                start.push_attribute(("xsi:type", xml::NODE_TYPE_LABEL));
            }
            NodeKind::Note { .. } => {}
        }

        let x = (absolute.x - offset.x).to_string();
        let y = (absolute.y - offset.y).to_string();
        start.push_attribute((xml::ATTRIBUTE_X, x.as_str()));
        start.push_attribute((xml::ATTRIBUTE_Y, y.as_str()));
        let w = absolute.width.to_string();
        let h = absolute.height.to_string();
        start.push_attribute((xml::ATTRIBUTE_WIDTH, w.as_str()));
        start.push_attribute((xml::ATTRIBUTE_HEIGHT, h.as_str()));

        self.emit(Event::Start(start))?;

        match &node.kind {
            NodeKind::Group {
                name,
                documentation,
                properties,
                ..
            } => {
                self.write_text_element(xml::ELEMENT_NAME, name.as_deref())?;
                self.write_text_element(xml::ELEMENT_DOCUMENTATION, documentation.as_deref())?;
                self.write_properties(properties)?;
            }
            NodeKind::Note { content } => {
                self.write_text_element(xml::ELEMENT_NAME, Some(content.as_str()))?;
            }
            NodeKind::ViewRef { view } => {
                let mut view_ref = BytesStart::new(xml::ELEMENT_VIEWREF);
                let ref_id = xml::xml_id(view);
                view_ref.push_attribute((xml::ATTRIBUTE_REF, ref_id.as_str()));
                self.emit(Event::Empty(view_ref))?;
            }
            NodeKind::Concept { .. } => {}
        }

        self.write_node_style(&node.style)?;

        let child_origin = Offset::new(absolute.x, absolute.y);
        for child in node.children() {
            self.write_node(child, child_origin, offset)?;
        }

        self.emit(Event::End(BytesEnd::new(xml::ELEMENT_NODE)))
    }

    // ── Connections ─────────────────────────────────────────────────

    fn write_connection(
        &mut self,
        view: &'a View,
        connection: &'a Connection,
        offset: Offset,
    ) -> Result<(), ExchangeError> {
        let mut start = BytesStart::new(xml::ELEMENT_CONNECTION);
        let id = xml::xml_id(&connection.id);
        start.push_attribute((xml::ATTRIBUTE_IDENTIFIER, id.as_str()));
        if let Some(relationship) = &connection.relationship {
            let relationship_ref = xml::xml_id(relationship);
            start.push_attribute((xml::ATTRIBUTE_RELATIONSHIPREF, relationship_ref.as_str()));
        }
        let source = xml::xml_id(&connection.source);
        let target = xml::xml_id(&connection.target);
        start.push_attribute((xml::ATTRIBUTE_SOURCE, source.as_str()));
        start.push_attribute((xml::ATTRIBUTE_TARGET, target.as_str()));
        self.emit(Event::Start(start))?;

        self.write_bendpoints(view, connection, offset)?;
        self.write_connection_style(&connection.style)?;

        self.emit(Event::End(BytesEnd::new(xml::ELEMENT_CONNECTION)))
    }

    /// Write the connection's bendpoints as absolute points.
    ///
    /// Each point is blended from the start and end offsets with a
    /// weight of `i / (count + 1)`, truncated to integers, matching the
    /// format's historical arithmetic. The import side recovers both
    /// offsets unweighted, so multi-bendpoint shapes do not round-trip
    /// exactly.
    fn write_bendpoints(
        &mut self,
        view: &View,
        connection: &Connection,
        offset: Offset,
    ) -> Result<(), ExchangeError> {
        if connection.bendpoints.is_empty() {
            return Ok(());
        }

        // Connection-to-connection endpoints have no center to measure
        // from; their bendpoints are not serialized.
        let (Some(source), Some(target)) = (
            geometry::absolute_bounds(view, &connection.source),
            geometry::absolute_bounds(view, &connection.target),
        ) else {
            return Ok(());
        };

        let count = connection.bendpoints.len() as f64 + 1.0;
        let (source_cx, source_cy) = source.center();
        let (target_cx, target_cy) = target.center();

        for (index, bendpoint) in connection.bendpoints.iter().enumerate() {
            let weight = (index as f64 + 1.0) / count;

            let start_x = f64::from(source_cx + bendpoint.start_x) * (1.0 - weight);
            let start_y = f64::from(source_cy + bendpoint.start_y) * (1.0 - weight);
            let end_x = f64::from(target_cx + bendpoint.end_x) * weight;
            let end_y = f64::from(target_cy + bendpoint.end_y) * weight;

            let x = ((start_x + end_x) as i32 - offset.x).to_string();
            let y = ((start_y + end_y) as i32 - offset.y).to_string();

            let mut start = BytesStart::new(xml::ELEMENT_BENDPOINT);
            start.push_attribute((xml::ATTRIBUTE_X, x.as_str()));
            start.push_attribute((xml::ATTRIBUTE_Y, y.as_str()));
            self.emit(Event::Empty(start))?;
        }

        Ok(())
    }

    // ── Styles ──────────────────────────────────────────────────────

    fn write_node_style(&mut self, style: &'a Style) -> Result<(), ExchangeError> {
        if style.is_default() {
            return Ok(());
        }

        self.emit(Event::Start(BytesStart::new(xml::ELEMENT_STYLE)))?;
        if let Some(fill) = style.fill_color {
            let alpha = (style.alpha != 255).then(|| alpha_to_percent(style.alpha));
            self.write_color(xml::ELEMENT_FILLCOLOR, fill, alpha)?;
        }
        if let Some(line) = style.line_color {
            self.write_color(xml::ELEMENT_LINECOLOR, line, None)?;
        }
        self.write_font(style.font.as_ref(), style.font_color)?;
        self.emit(Event::End(BytesEnd::new(xml::ELEMENT_STYLE)))
    }

    fn write_connection_style(&mut self, style: &'a Style) -> Result<(), ExchangeError> {
        if style.is_default() {
            return Ok(());
        }

        let mut start = BytesStart::new(xml::ELEMENT_STYLE);
        if style.line_width != 1 {
            let line_width = style.line_width.to_string();
            start.push_attribute((xml::ATTRIBUTE_LINEWIDTH, line_width.as_str()));
        }
        self.emit(Event::Start(start))?;
        if let Some(line) = style.line_color {
            self.write_color(xml::ELEMENT_LINECOLOR, line, None)?;
        }
        self.write_font(style.font.as_ref(), style.font_color)?;
        self.emit(Event::End(BytesEnd::new(xml::ELEMENT_STYLE)))
    }

    fn write_color(
        &mut self,
        tag: &str,
        color: Rgb,
        alpha_percent: Option<u8>,
    ) -> Result<(), ExchangeError> {
        let mut start = BytesStart::new(tag);
        let r = color.r.to_string();
        let g = color.g.to_string();
        let b = color.b.to_string();
        start.push_attribute((xml::ATTRIBUTE_R, r.as_str()));
        start.push_attribute((xml::ATTRIBUTE_G, g.as_str()));
        start.push_attribute((xml::ATTRIBUTE_B, b.as_str()));
        if let Some(alpha) = alpha_percent {
            let a = alpha.to_string();
            start.push_attribute((xml::ATTRIBUTE_A, a.as_str()));
        }
        self.emit(Event::Empty(start))
    }

    fn write_font(
        &mut self,
        font: Option<&Font>,
        font_color: Option<Rgb>,
    ) -> Result<(), ExchangeError> {
        if font.is_none() && font_color.is_none() {
            return Ok(());
        }

        let mut start = BytesStart::new(xml::ELEMENT_FONT);
        if let Some(font) = font {
            start.push_attribute((xml::ATTRIBUTE_FONTNAME, font.name.as_str()));
            let size = font.size.to_string();
            start.push_attribute((xml::ATTRIBUTE_FONTSIZE, size.as_str()));
            let style = match (font.bold, font.italic) {
                (true, true) => Some("bold|italic"),
                (true, false) => Some("bold"),
                (false, true) => Some("italic"),
                (false, false) => None,
            };
            if let Some(style) = style {
                start.push_attribute((xml::ATTRIBUTE_FONTSTYLE, style));
            }
        }

        match font_color {
            Some(color) => {
                self.emit(Event::Start(start))?;
                self.write_color(xml::ELEMENT_FONTCOLOR, color, None)?;
                self.emit(Event::End(BytesEnd::new(xml::ELEMENT_FONT)))
            }
            None => self.emit(Event::Empty(start)),
        }
    }
}

/// Fill opacity as the serialized 0–100 percentage.
fn alpha_to_percent(alpha: u8) -> u8 {
    ((f32::from(alpha) * 100.0) / 255.0).round() as u8
}

/// A relationship connection whose target concept-node is nested
/// directly inside its source concept-node is implied by the visual
/// nesting and never serialized; the importer reconstructs it.
fn is_nested_connection(view: &View, connection: &Connection) -> bool {
    if connection.relationship.is_none() {
        return false;
    }
    let Some(source) = view.find_node(&connection.source) else {
        return false;
    };
    if !source.is_concept() {
        return false;
    }
    source
        .children()
        .iter()
        .any(|child| child.id == connection.target && child.is_concept())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Concept, Model};
    use crate::types::ConceptKind;
    use crate::view::{Bendpoint, Node};

    fn simple_model() -> Model {
        let mut model = Model::new();
        model.id = crate::model::Id::new("id-model");
        model.name = Some("Test Model".into());
        model.add_concept(Concept::new("role", ConceptKind::BusinessRole).with_name("Role"));
        model.add_concept(
            Concept::new("process", ConceptKind::BusinessProcess).with_name("Process"),
        );
        model.add_concept(Concept::new_relationship(
            "assign",
            ConceptKind::AssignmentRelationship,
            "role",
            "process",
        ));
        model
    }

    #[test]
    fn test_write_simple_model() {
        let xml = ModelExporter::new().write_string(&simple_model()).unwrap();

        assert!(xml.contains("<model"));
        assert!(xml.contains(r#"xmlns="http://www.opengroup.org/xsd/archimate""#));
        assert!(xml.contains(r#"identifier="id-model""#));
        assert!(xml.contains(r#"xsi:type="BusinessRole""#));
        assert!(xml.contains(r#"xsi:type="AssignmentRelationship""#));
        assert!(xml.contains(r#"source="id-role""#));
        assert!(xml.contains(r#"target="id-process""#));
        // No metadata configured, so no dc namespace.
        assert!(!xml.contains("xmlns:dc"));
    }

    #[test]
    fn test_write_is_deterministic() {
        let model = simple_model();
        let exporter = ModelExporter::new();
        assert_eq!(
            exporter.write(&model).unwrap(),
            exporter.write(&model).unwrap()
        );
    }

    #[test]
    fn test_metadata_block_only_with_nonempty_values() {
        let model = simple_model();

        let mut options = ExportOptions::default();
        options.metadata.insert("title".into(), String::new());
        let xml = ModelExporter::with_options(options)
            .write_string(&model)
            .unwrap();
        assert!(!xml.contains("<metadata>"));

        let mut options = ExportOptions::default();
        options.metadata.insert("title".into(), "A title".into());
        let xml = ModelExporter::with_options(options)
            .write_string(&model)
            .unwrap();
        assert!(xml.contains("<metadata>"));
        assert!(xml.contains("<schema>Dublin Core</schema>"));
        assert!(xml.contains("<dc:title>A title</dc:title>"));
    }

    #[test]
    fn test_language_code_tags_text() {
        let model = simple_model();
        let options = ExportOptions {
            language_code: Some("en".into()),
            ..ExportOptions::default()
        };
        let xml = ModelExporter::with_options(options)
            .write_string(&model)
            .unwrap();
        assert!(xml.contains(r#"<name xml:lang="en">Test Model</name>"#));
    }

    #[test]
    fn test_junction_spelling_in_output() {
        let mut model = Model::new();
        model.add_concept(Concept::new_junction("j1", crate::types::JunctionKind::Or));
        let xml = ModelExporter::new().write_string(&model).unwrap();
        assert!(xml.contains(r#"xsi:type="OrJunction""#));
    }

    #[test]
    fn test_negative_offset_applied_to_view() {
        let mut model = simple_model();
        let mut view = View::new("v1");
        view.nodes
            .push(Node::concept("n1", "role", Bounds::new(-10, -300, 100, 100)));
        view.nodes.push(Node::concept(
            "n2",
            "process",
            Bounds::new(-100, -200, 100, 100),
        ));
        model.add_view(view);

        let xml = ModelExporter::new().write_string(&model).unwrap();
        // Offset (-100, -300): n1 lands at (90, 0), n2 at (0, 100).
        assert!(xml.contains(r#"x="90" y="0""#));
        assert!(xml.contains(r#"x="0" y="100""#));
        assert!(!xml.contains(r#"x="-"#));
    }

    #[test]
    fn test_nested_connection_not_serialized() {
        let mut model = simple_model();
        let mut parent = Node::concept("np", "role", Bounds::new(0, 0, 400, 300));
        parent.push_child(Node::concept("nc", "process", Bounds::new(10, 10, 100, 50)));
        let mut view = View::new("v1");
        view.nodes.push(parent);
        view.connections
            .push(Connection::relationship("c1", "assign", "np", "nc"));
        model.add_view(view);

        let xml = ModelExporter::new().write_string(&model).unwrap();
        assert!(!xml.contains("<connection"));
    }

    #[test]
    fn test_bendpoint_weighted_blend() {
        let mut model = simple_model();
        let mut view = View::new("v1");
        view.nodes
            .push(Node::concept("n1", "role", Bounds::new(768, 108, 120, 61)));
        view.nodes
            .push(Node::concept("n2", "process", Bounds::new(408, 108, 120, 61)));
        let mut connection = Connection::relationship("c1", "assign", "n1", "n2");
        connection.bendpoints.push(Bendpoint::new(120, -30, 480, -30));
        view.connections.push(connection);
        model.add_view(view);

        let xml = ModelExporter::new().write_string(&model).unwrap();
        // One bendpoint, weight 1/2. Source center (828, 138) + (120, -30)
        // halved, target center (468, 138) + (480, -30) halved: (948, 108).
        assert!(xml.contains(r#"<bendpoint x="948" y="108"/>"#));
    }

    #[test]
    fn test_organization_written_when_enabled() {
        let mut model = simple_model();
        model.folders.push(
            crate::model::Folder::new("Business")
                .with_item("role")
                .with_item("process"),
        );
        model.folders.push(crate::model::Folder::new("Empty"));

        let options = ExportOptions {
            include_organization: true,
            ..ExportOptions::default()
        };
        let xml = ModelExporter::with_options(options)
            .write_string(&model)
            .unwrap();
        assert!(xml.contains("<organization>"));
        assert!(xml.contains(r#"<item identifierref="id-role"/>"#));
        // Empty folders are skipped.
        assert!(!xml.contains("<name>Empty</name>"));
    }

    #[test]
    fn test_alpha_percent() {
        assert_eq!(alpha_to_percent(255), 100);
        assert_eq!(alpha_to_percent(128), 50);
        assert_eq!(alpha_to_percent(0), 0);
    }
}
