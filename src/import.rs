//! Model importer: reconstructs a model graph from exchange XML.
//!
//! Parsing is multi-pass over a read-only document tree. Cross
//! references (relationship endpoints, connection endpoints, view
//! references) are resolved through id tables populated in earlier
//! passes, never by chasing references mid-parse, so forward references
//! within one document always work.
//!
//! Every error is fatal: the importer aborts on the first problem and
//! returns no partial model. The one deliberate asymmetry: an element,
//! relationship or similar entry with an *absent* type attribute is
//! silently skipped, while a present-but-unrecognized type fails the
//! whole import.

use std::path::Path;

use roxmltree::Document;
use rustc_hash::{FxHashMap, FxHashSet};

use crate::error::ExchangeError;
use crate::geometry::{Bounds, Offset};
use crate::model::{AccessKind, Concept, Id, Model, Property};
use crate::types::ConceptKind;
use crate::view::{Bendpoint, Connection, Font, Node, NodeKind, Style, View};
use crate::xml::{self, ns};

type XmlNode<'a, 'i> = roxmltree::Node<'a, 'i>;

/// Import configuration supplied by the calling context.
#[derive(Clone, Debug, Default)]
pub struct ImportOptions {
    /// Language tag used to pick among language-tagged text variants;
    /// the first variant present is the fallback.
    pub locale: Option<String>,
}

/// Reconstructs a [`Model`] from exchange-format XML.
#[derive(Clone, Debug, Default)]
pub struct ModelImporter {
    options: ImportOptions,
}

impl ModelImporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: ImportOptions) -> Self {
        Self { options }
    }

    /// Parse a model from a byte stream.
    pub fn read(&self, input: &[u8]) -> Result<Model, ExchangeError> {
        let text = std::str::from_utf8(input)
            .map_err(|e| ExchangeError::xml(format!("invalid UTF-8: {e}")))?;
        self.read_str(text)
    }

    /// Parse a model from a string.
    pub fn read_str(&self, text: &str) -> Result<Model, ExchangeError> {
        let doc = Document::parse(text).map_err(|e| ExchangeError::xml(e.to_string()))?;

        let session = ImportSession {
            locale: self.options.locale.as_deref(),
            model: Model::new(),
            property_defs: FxHashMap::default(),
            nodes: FxHashMap::default(),
            pending_view_refs: Vec::new(),
        };
        let model = session.run(doc.root_element())?;

        tracing::debug!(
            elements = model.element_count(),
            relationships = model.relationship_count(),
            views = model.views.len(),
            "imported model"
        );
        Ok(model)
    }

    /// Read a model from a file.
    pub fn import_file(&self, path: &Path) -> Result<Model, ExchangeError> {
        let bytes = std::fs::read(path)?;
        self.read(&bytes)
    }
}

// ============================================================================
// IMPORT SESSION
// ============================================================================

/// Per-node bookkeeping shared between the node and connection passes.
#[derive(Clone, Copy, Debug)]
struct NodeInfo {
    /// Whether the node visualizes an element concept.
    is_concept: bool,
    /// Absolute bounds as declared in the document.
    absolute: Bounds,
}

/// State for one `read` call. The lookup tables live exactly as long as
/// the call; nothing is cached across imports.
struct ImportSession<'a> {
    locale: Option<&'a str>,
    model: Model,
    /// `propid-N` -> property key.
    property_defs: FxHashMap<String, String>,
    /// Model-wide node namespace: node id -> info.
    nodes: FxHashMap<Id, NodeInfo>,
    /// View-reference targets to verify once all views exist.
    pending_view_refs: Vec<Id>,
}

impl ImportSession<'_> {
    fn run(mut self, root: XmlNode<'_, '_>) -> Result<Model, ExchangeError> {
        self.parse_property_definitions(root);
        self.parse_root(root);

        let elements = child(root, xml::ELEMENT_ELEMENTS)
            .ok_or(ExchangeError::MissingRequiredSection(xml::ELEMENT_ELEMENTS))?;
        self.parse_elements(elements)?;

        if let Some(relationships) = child(root, xml::ELEMENT_RELATIONSHIPS) {
            self.parse_relationships(relationships)?;
        }

        if let Some(views) = child(root, xml::ELEMENT_VIEWS) {
            self.parse_views(views)?;
        }

        self.resolve_view_refs()?;
        self.synthesize_nested_connections();

        Ok(self.model)
    }

    // ── Property definitions ────────────────────────────────────────

    fn parse_property_definitions(&mut self, root: XmlNode<'_, '_>) {
        let Some(defs) = child(root, xml::ELEMENT_PROPERTYDEFINITIONS) else {
            return;
        };
        for def in children(defs, xml::ELEMENT_PROPERTYDEFINITION) {
            let identifier = def.attribute(xml::ATTRIBUTE_IDENTIFIER);
            let name = self.child_text(def, xml::ELEMENT_NAME, false);
            if let (Some(identifier), Some(name)) = (identifier, name) {
                self.property_defs.insert(identifier.to_string(), name);
            }
        }
    }

    // ── Root element ────────────────────────────────────────────────

    fn parse_root(&mut self, root: XmlNode<'_, '_>) {
        if let Some(id) = root.attribute(xml::ATTRIBUTE_IDENTIFIER) {
            self.model.id = Id::from(id);
        }
        self.model.name = self.child_text(root, xml::ELEMENT_NAME, true);
        self.model.documentation = self.child_text(root, xml::ELEMENT_DOCUMENTATION, false);
        self.model.properties = self.parse_properties(root);
    }

    // ── Elements ────────────────────────────────────────────────────

    fn parse_elements(&mut self, elements: XmlNode<'_, '_>) -> Result<(), ExchangeError> {
        for element in children(elements, xml::ELEMENT_ELEMENT) {
            // Absent type: skip. Unrecognized type: fail the import.
            let Some(type_name) = xsi_type(element) else {
                tracing::debug!("skipping element without type attribute");
                continue;
            };
            let Some((kind, junction)) = ConceptKind::from_type_name(type_name) else {
                return Err(ExchangeError::UnknownConceptType(type_name.to_string()));
            };
            if kind.is_relationship() {
                return Err(ExchangeError::UnknownConceptType(type_name.to_string()));
            }

            // Identifier first, so later passes can find the concept.
            let id = identifier(element);
            let mut concept = Concept::new(id, kind);
            concept.junction = junction;
            concept.name = self.child_text(element, xml::ELEMENT_NAME, true);
            concept.documentation = self.child_text(element, xml::ELEMENT_DOCUMENTATION, false);
            concept.properties = self.parse_properties(element);
            self.model.add_concept(concept);
        }
        Ok(())
    }

    // ── Relationships ───────────────────────────────────────────────

    fn parse_relationships(&mut self, relationships: XmlNode<'_, '_>) -> Result<(), ExchangeError> {
        // Pass 1: create every relationship and remember its endpoint
        // ids for after all concepts exist.
        let mut pending: Vec<(Id, Id)> = Vec::new();

        for relationship in children(relationships, xml::ELEMENT_RELATIONSHIP) {
            let Some(type_name) = xsi_type(relationship) else {
                tracing::debug!("skipping relationship without type attribute");
                continue;
            };
            let Some((kind, _)) = ConceptKind::from_type_name(type_name) else {
                return Err(ExchangeError::UnknownConceptType(type_name.to_string()));
            };
            if !kind.is_relationship() {
                return Err(ExchangeError::UnknownConceptType(type_name.to_string()));
            }

            let id = identifier(relationship);
            let source = Id::from(relationship.attribute(xml::ATTRIBUTE_SOURCE).unwrap_or(""));
            let target = Id::from(relationship.attribute(xml::ATTRIBUTE_TARGET).unwrap_or(""));

            let mut concept =
                Concept::new_relationship(id, kind, source.clone(), target.clone());
            concept.name = self.child_text(relationship, xml::ELEMENT_NAME, true);
            concept.documentation =
                self.child_text(relationship, xml::ELEMENT_DOCUMENTATION, false);
            concept.properties = self.parse_properties(relationship);

            if kind == ConceptKind::AccessRelationship {
                if let Some(value) = relationship.attribute(xml::ATTRIBUTE_ACCESS_TYPE) {
                    concept = concept.with_access(AccessKind::from_type_value(value));
                }
            }
            if kind == ConceptKind::InfluenceRelationship {
                if let Some(strength) = relationship.attribute(xml::ATTRIBUTE_MODIFIER) {
                    concept = concept.with_influence_strength(strength);
                }
            }

            self.model.add_concept(concept);
            pending.push((source, target));
        }

        // Pass 2: every endpoint must resolve to a parsed concept.
        for (source, target) in pending {
            if !self.model.concepts.contains_key(&source) {
                return Err(ExchangeError::dangling("relationship source", source.as_str()));
            }
            if !self.model.concepts.contains_key(&target) {
                return Err(ExchangeError::dangling("relationship target", target.as_str()));
            }
        }
        Ok(())
    }

    // ── Properties ──────────────────────────────────────────────────

    /// Resolve a `properties` block through the definitions table.
    /// References to undefined property ids are silently dropped.
    fn parse_properties(&self, parent: XmlNode<'_, '_>) -> Vec<Property> {
        let mut properties = Vec::new();
        let Some(block) = child(parent, xml::ELEMENT_PROPERTIES) else {
            return properties;
        };
        for property in children(block, xml::ELEMENT_PROPERTY) {
            let Some(idref) = property.attribute(xml::ATTRIBUTE_IDENTIFIERREF) else {
                continue;
            };
            let Some(key) = self.property_defs.get(idref) else {
                tracing::debug!(idref, "dropping property with undefined identifierref");
                continue;
            };
            let value = self
                .child_text(property, xml::ELEMENT_VALUE, true)
                .unwrap_or_default();
            properties.push(Property::new(key.clone(), value));
        }
        properties
    }

    // ── Views ───────────────────────────────────────────────────────

    fn parse_views(&mut self, views: XmlNode<'_, '_>) -> Result<(), ExchangeError> {
        for view_element in children(views, xml::ELEMENT_VIEW) {
            // Shell first: id registered before nodes and connections,
            // so view references can be queued against it.
            let mut view = View::new(identifier(view_element));
            view.viewpoint = view_element
                .attribute(xml::ATTRIBUTE_VIEWPOINT)
                .filter(|v| !v.is_empty())
                .map(str::to_string);
            view.name = self.child_text(view_element, xml::ELEMENT_NAME, true);
            view.documentation =
                self.child_text(view_element, xml::ELEMENT_DOCUMENTATION, false);
            view.properties = self.parse_properties(view_element);

            let mut nodes = Vec::new();
            self.parse_nodes(view_element, Offset::default(), &mut nodes)?;
            view.nodes = nodes;

            self.parse_connections(view_element, &mut view)?;

            self.model.views.push(view);
        }
        Ok(())
    }

    // ── Nodes ───────────────────────────────────────────────────────

    /// Parse the child nodes of a container. `origin` is the absolute
    /// origin of the parent; declared absolute bounds convert to
    /// parent-relative bounds as each node is attached.
    fn parse_nodes(
        &mut self,
        parent: XmlNode<'_, '_>,
        origin: Offset,
        out: &mut Vec<Node>,
    ) -> Result<(), ExchangeError> {
        for node_element in children(parent, xml::ELEMENT_NODE) {
            let absolute = node_bounds(node_element)?;
            let relative = Bounds {
                x: absolute.x - origin.x,
                y: absolute.y - origin.y,
                ..absolute
            };
            let id = identifier(node_element);
            let style = self.parse_node_style(node_element)?;

            let element_ref = node_element
                .attribute(xml::ATTRIBUTE_ELEMENTREF)
                .filter(|v| !v.is_empty());

            let kind = if let Some(element_ref) = element_ref {
                // A node with an element reference visualizes an
                // element concept, which must already exist.
                let element_id = Id::from(element_ref);
                match self.model.concepts.get(&element_id) {
                    Some(concept) if !concept.is_relationship() => {}
                    _ => return Err(ExchangeError::dangling("element", element_ref)),
                }
                NodeKind::Concept {
                    element: element_id,
                    children: Vec::new(),
                }
            } else {
                let type_attr = xsi_type(node_element);
                let is_group = type_attr == Some(xml::NODE_TYPE_CONTAINER);
                let is_label = type_attr == Some(xml::NODE_TYPE_LABEL);
                // Notes cannot contain children, so a node with child
                // nodes has to be a group.
                let has_children =
                    children(node_element, xml::ELEMENT_NODE).next().is_some();
                let view_ref = child(node_element, xml::ELEMENT_VIEWREF)
                    .and_then(|e| e.attribute(xml::ATTRIBUTE_REF))
                    .filter(|v| !v.is_empty());

                if is_group || has_children {
                    NodeKind::Group {
                        name: self.child_text(node_element, xml::ELEMENT_NAME, true),
                        documentation: self.child_text(
                            node_element,
                            xml::ELEMENT_DOCUMENTATION,
                            false,
                        ),
                        properties: self.parse_properties(node_element),
                        children: Vec::new(),
                    }
                } else if is_label && view_ref.is_some() {
                    // The referenced view may not exist yet; queue the
                    // link for the after-all-views pass.
                    let view_id = Id::from(view_ref.unwrap_or_default());
                    self.pending_view_refs.push(view_id.clone());
                    NodeKind::ViewRef { view: view_id }
                } else {
                    NodeKind::Note {
                        content: self
                            .child_text(node_element, xml::ELEMENT_NAME, false)
                            .unwrap_or_default(),
                    }
                }
            };

            let mut node = Node {
                id: id.clone(),
                bounds: relative,
                style,
                kind,
            };

            self.nodes.insert(
                id,
                NodeInfo {
                    is_concept: node.is_concept(),
                    absolute,
                },
            );

            if node.children_mut().is_some() {
                let mut child_nodes = Vec::new();
                self.parse_nodes(
                    node_element,
                    Offset::new(absolute.x, absolute.y),
                    &mut child_nodes,
                )?;
                if let Some(children) = node.children_mut() {
                    *children = child_nodes;
                }
            }

            out.push(node);
        }
        Ok(())
    }

    // ── Connections ─────────────────────────────────────────────────

    fn parse_connections(
        &mut self,
        view_element: XmlNode<'_, '_>,
        view: &mut View,
    ) -> Result<(), ExchangeError> {
        // Pass 1: create every connection shell so endpoints can refer
        // to connections declared later in the same view.
        let mut pending: Vec<(Connection, XmlNode<'_, '_>)> = Vec::new();
        let mut connection_ids: FxHashSet<Id> = FxHashSet::default();

        for connection_element in children(view_element, xml::ELEMENT_CONNECTION) {
            let id = identifier(connection_element);

            let relationship = match connection_element
                .attribute(xml::ATTRIBUTE_RELATIONSHIPREF)
                .filter(|v| !v.is_empty())
            {
                Some(reference) => {
                    let relationship_id = Id::from(reference);
                    match self.model.concepts.get(&relationship_id) {
                        Some(concept) if concept.is_relationship() => {}
                        _ => return Err(ExchangeError::dangling("relationship", reference)),
                    }
                    Some(relationship_id)
                }
                None => None,
            };

            let source = Id::from(
                connection_element
                    .attribute(xml::ATTRIBUTE_SOURCE)
                    .unwrap_or(""),
            );
            let target = Id::from(
                connection_element
                    .attribute(xml::ATTRIBUTE_TARGET)
                    .unwrap_or(""),
            );

            connection_ids.insert(id.clone());
            pending.push((
                Connection {
                    id,
                    relationship,
                    source,
                    target,
                    bendpoints: Vec::new(),
                    style: Style::default(),
                },
                connection_element,
            ));
        }

        // Pass 2: resolve endpoints against the model-wide node
        // namespace and this view's connections.
        for (mut connection, connection_element) in pending {
            let source_info = self.nodes.get(&connection.source).copied();
            let target_info = self.nodes.get(&connection.target).copied();
            let source_is_connection = connection_ids.contains(&connection.source);
            let target_is_connection = connection_ids.contains(&connection.target);

            if source_info.is_none() && !source_is_connection {
                return Err(ExchangeError::dangling(
                    "connection source",
                    connection.source.as_str(),
                ));
            }
            if target_info.is_none() && !target_is_connection {
                return Err(ExchangeError::dangling(
                    "connection target",
                    connection.target.as_str(),
                ));
            }

            if connection.relationship.is_some() {
                // A relationship connection requires concept-node
                // endpoints on both sides.
                if !source_info.is_some_and(|info| info.is_concept) {
                    return Err(ExchangeError::dangling(
                        "connection source node",
                        connection.source.as_str(),
                    ));
                }
                if !target_info.is_some_and(|info| info.is_concept) {
                    return Err(ExchangeError::dangling(
                        "connection target node",
                        connection.target.as_str(),
                    ));
                }
            } else if source_info.is_some_and(|info| info.is_concept)
                && target_info.is_some_and(|info| info.is_concept)
            {
                // Plain connections only connect notes, groups and
                // connections; between two concept nodes they are
                // dropped.
                tracing::debug!(
                    id = connection.id.as_str(),
                    "dropping plain connection between concept nodes"
                );
                continue;
            }

            // Bendpoints need both endpoint centers, so they only apply
            // to node-to-node connections.
            if let (Some(source_info), Some(target_info)) = (source_info, target_info) {
                let (source_cx, source_cy) = source_info.absolute.center();
                let (target_cx, target_cy) = target_info.absolute.center();
                for bendpoint in children(connection_element, xml::ELEMENT_BENDPOINT) {
                    let x = parse_coordinate(bendpoint, xml::ATTRIBUTE_X, "bendpoint")?;
                    let y = parse_coordinate(bendpoint, xml::ATTRIBUTE_Y, "bendpoint")?;
                    connection.bendpoints.push(Bendpoint::new(
                        x - source_cx,
                        y - source_cy,
                        x - target_cx,
                        y - target_cy,
                    ));
                }
            }

            connection.style = self.parse_connection_style(connection_element)?;
            view.connections.push(connection);
        }

        Ok(())
    }

    // ── View references ─────────────────────────────────────────────

    fn resolve_view_refs(&self) -> Result<(), ExchangeError> {
        for reference in &self.pending_view_refs {
            if self.model.view(reference).is_none() {
                return Err(ExchangeError::dangling("view", reference.as_str()));
            }
        }
        Ok(())
    }

    // ── Nested connections ──────────────────────────────────────────

    /// Reconstruct connections implied by visual nesting: for every
    /// parent/child concept-node pair whose elements are related in
    /// either direction and not already connected between that node
    /// pair, add a connection without bendpoints.
    fn synthesize_nested_connections(&mut self) {
        let relationships: Vec<(Id, Id, Id)> = self
            .model
            .relationships()
            .filter_map(|c| Some((c.id.clone(), c.source()?.clone(), c.target()?.clone())))
            .collect();
        if relationships.is_empty() {
            return;
        }

        for view in &mut self.model.views {
            let mut pairs = Vec::new();
            collect_nested_pairs(&view.nodes, &mut pairs);

            let mut synthesized: Vec<Connection> = Vec::new();
            for (parent_node, parent_element, child_node, child_element) in &pairs {
                for (relationship, source, target) in &relationships {
                    let (source_node, target_node) =
                        if source == parent_element && target == child_element {
                            (parent_node, child_node)
                        } else if source == child_element && target == parent_element {
                            (child_node, parent_node)
                        } else {
                            continue;
                        };

                    let exists = view
                        .connections
                        .iter()
                        .chain(synthesized.iter())
                        .any(|c| {
                            c.relationship.as_ref() == Some(relationship)
                                && &c.source == source_node
                                && &c.target == target_node
                        });
                    if !exists {
                        synthesized.push(Connection::relationship(
                            Id::generate(),
                            relationship.clone(),
                            source_node.clone(),
                            target_node.clone(),
                        ));
                    }
                }
            }

            if !synthesized.is_empty() {
                tracing::debug!(
                    view = view.id.as_str(),
                    count = synthesized.len(),
                    "synthesized nested connections"
                );
                view.connections.extend(synthesized);
            }
        }
    }

    // ── Styles ──────────────────────────────────────────────────────

    fn parse_node_style(&self, node_element: XmlNode<'_, '_>) -> Result<Style, ExchangeError> {
        let mut style = Style::default();
        let Some(style_element) = child(node_element, xml::ELEMENT_STYLE) else {
            return Ok(style);
        };

        if let Some(fill) = child(style_element, xml::ELEMENT_FILLCOLOR) {
            style.fill_color = Some(parse_color(fill)?);
            style.alpha = parse_alpha(fill);
        }
        if let Some(line) = child(style_element, xml::ELEMENT_LINECOLOR) {
            style.line_color = Some(parse_color(line)?);
        }
        self.parse_font(style_element, &mut style)?;
        Ok(style)
    }

    fn parse_connection_style(
        &self,
        connection_element: XmlNode<'_, '_>,
    ) -> Result<Style, ExchangeError> {
        let mut style = Style::default();
        let Some(style_element) = child(connection_element, xml::ELEMENT_STYLE) else {
            return Ok(style);
        };

        if let Some(line_width) = style_element.attribute(xml::ATTRIBUTE_LINEWIDTH) {
            if let Ok(width) = line_width.parse::<i32>() {
                style.line_width = width.clamp(1, 3) as u8;
            }
        }
        if let Some(line) = child(style_element, xml::ELEMENT_LINECOLOR) {
            style.line_color = Some(parse_color(line)?);
        }
        self.parse_font(style_element, &mut style)?;
        Ok(style)
    }

    fn parse_font(
        &self,
        style_element: XmlNode<'_, '_>,
        style: &mut Style,
    ) -> Result<(), ExchangeError> {
        let Some(font_element) = child(style_element, xml::ELEMENT_FONT) else {
            return Ok(());
        };

        let name = font_element.attribute(xml::ATTRIBUTE_FONTNAME);
        let size = font_element
            .attribute(xml::ATTRIBUTE_FONTSIZE)
            .and_then(|v| v.parse::<f64>().ok());
        let font_style = font_element
            .attribute(xml::ATTRIBUTE_FONTSTYLE)
            .unwrap_or("");

        if name.is_some() || size.is_some() || !font_style.is_empty() {
            style.font = Some(Font {
                name: name.unwrap_or("").to_string(),
                // Missing sizes fall back to the conventional 9pt.
                size: size.unwrap_or(9.0) as u32,
                bold: font_style.contains("bold"),
                italic: font_style.contains("italic"),
            });
        }

        if let Some(color) = child(font_element, xml::ELEMENT_FONTCOLOR) {
            style.font_color = Some(parse_color(color)?);
        }
        Ok(())
    }

    // ── Text ────────────────────────────────────────────────────────

    /// Text of a named child element, honoring the configured locale:
    /// a child whose `xml:lang` matches wins, otherwise the first child
    /// with that name. `normalize` collapses internal whitespace.
    fn child_text(
        &self,
        parent: XmlNode<'_, '_>,
        name: &'static str,
        normalize: bool,
    ) -> Option<String> {
        let extract = |element: XmlNode<'_, '_>| {
            let text = element.text().unwrap_or("");
            if normalize {
                text.split_whitespace().collect::<Vec<_>>().join(" ")
            } else {
                text.to_string()
            }
        };

        if let Some(locale) = self.locale {
            for element in children(parent, name) {
                if element.attribute((ns::XML, xml::ATTRIBUTE_LANG)) == Some(locale) {
                    return Some(extract(element));
                }
            }
        }
        child(parent, name).map(extract)
    }
}

// ============================================================================
// DOCUMENT HELPERS
// ============================================================================

/// First child element with the given local name.
fn child<'a, 'i>(parent: XmlNode<'a, 'i>, name: &str) -> Option<XmlNode<'a, 'i>> {
    parent
        .children()
        .find(|c| c.is_element() && c.tag_name().name() == name)
}

/// All child elements with the given local name.
fn children<'a, 'i>(
    parent: XmlNode<'a, 'i>,
    name: &'static str,
) -> impl Iterator<Item = XmlNode<'a, 'i>> {
    parent
        .children()
        .filter(move |c| c.is_element() && c.tag_name().name() == name)
}

/// The namespaced `xsi:type` attribute.
fn xsi_type<'a>(element: XmlNode<'a, '_>) -> Option<&'a str> {
    element.attribute((ns::XSI, xml::ATTRIBUTE_TYPE))
}

/// The `identifier` attribute, or a generated id when absent.
fn identifier(element: XmlNode<'_, '_>) -> Id {
    element
        .attribute(xml::ATTRIBUTE_IDENTIFIER)
        .filter(|v| !v.is_empty())
        .map(Id::from)
        .unwrap_or_else(Id::generate)
}

fn parse_coordinate(
    element: XmlNode<'_, '_>,
    attribute: &str,
    what: &'static str,
) -> Result<i32, ExchangeError> {
    element
        .attribute(attribute)
        .filter(|v| !v.is_empty())
        .and_then(|v| v.parse().ok())
        .ok_or(ExchangeError::MissingCoordinate(what))
}

/// Declared node bounds; x and y are absolute within the view.
fn node_bounds(element: XmlNode<'_, '_>) -> Result<Bounds, ExchangeError> {
    Ok(Bounds::new(
        parse_coordinate(element, xml::ATTRIBUTE_X, "node")?,
        parse_coordinate(element, xml::ATTRIBUTE_Y, "node")?,
        parse_coordinate(element, xml::ATTRIBUTE_WIDTH, "node")?,
        parse_coordinate(element, xml::ATTRIBUTE_HEIGHT, "node")?,
    ))
}

fn parse_color(element: XmlNode<'_, '_>) -> Result<crate::view::Rgb, ExchangeError> {
    let component = |attribute: &str| {
        element
            .attribute(attribute)
            .filter(|v| !v.is_empty())
            .and_then(|v| v.parse::<u8>().ok())
            .ok_or(ExchangeError::MissingColorComponent)
    };
    Ok(crate::view::Rgb::new(
        component(xml::ATTRIBUTE_R)?,
        component(xml::ATTRIBUTE_G)?,
        component(xml::ATTRIBUTE_B)?,
    ))
}

/// The `a` attribute is a 0–100 percentage; the model stores 0–255.
fn parse_alpha(element: XmlNode<'_, '_>) -> u8 {
    element
        .attribute(xml::ATTRIBUTE_A)
        .and_then(|v| v.parse::<f32>().ok())
        .map(|percent| ((percent * 255.0) / 100.0).round().clamp(0.0, 255.0) as u8)
        .unwrap_or(255)
}

/// Collect `(parent node id, parent element, child node id, child
/// element)` for every directly nested concept-node pair.
fn collect_nested_pairs(nodes: &[Node], pairs: &mut Vec<(Id, Id, Id, Id)>) {
    for node in nodes {
        if let NodeKind::Concept { element, children } = &node.kind {
            for child in children {
                if let NodeKind::Concept {
                    element: child_element,
                    ..
                } = &child.kind
                {
                    pairs.push((
                        node.id.clone(),
                        element.clone(),
                        child.id.clone(),
                        child_element.clone(),
                    ));
                }
            }
        }
        collect_nested_pairs(node.children(), pairs);
    }
}
