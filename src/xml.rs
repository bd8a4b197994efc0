//! Shared XML vocabulary for the Open Exchange format.
//!
//! Element and attribute names are those of the final exchange-format
//! dialect; the importer matches local names only, which keeps older
//! dialect namespaces readable.

use crate::model::Id;

/// Namespace URIs.
pub mod ns {
    /// Default (interchange-format) namespace.
    pub const ARCHIMATE: &str = "http://www.opengroup.org/xsd/archimate";
    /// XML Schema instance namespace (`xsi:type`).
    pub const XSI: &str = "http://www.w3.org/2001/XMLSchema-instance";
    /// Dublin Core metadata namespace.
    pub const DC: &str = "http://purl.org/dc/elements/1.1/";
    /// The `xml:` namespace (`xml:lang`).
    pub const XML: &str = "http://www.w3.org/XML/1998/namespace";
}

/// Schema documents referenced from `xsi:schemaLocation` and copied next
/// to the output file when schema inclusion is requested.
pub const ARCHIMATE_XSD: &str = "archimate_v2p1.xsd";
pub const DUBLINCORE_XSD: &str = "dc.xsd";

// Element names.
pub const ELEMENT_MODEL: &str = "model";
pub const ELEMENT_NAME: &str = "name";
pub const ELEMENT_DOCUMENTATION: &str = "documentation";
pub const ELEMENT_PROPERTIES: &str = "properties";
pub const ELEMENT_PROPERTY: &str = "property";
pub const ELEMENT_VALUE: &str = "value";
pub const ELEMENT_ELEMENTS: &str = "elements";
pub const ELEMENT_ELEMENT: &str = "element";
pub const ELEMENT_RELATIONSHIPS: &str = "relationships";
pub const ELEMENT_RELATIONSHIP: &str = "relationship";
pub const ELEMENT_PROPERTYDEFINITIONS: &str = "propertydefinitions";
pub const ELEMENT_PROPERTYDEFINITION: &str = "propertydefinition";
pub const ELEMENT_ORGANIZATION: &str = "organization";
pub const ELEMENT_ITEM: &str = "item";
pub const ELEMENT_METADATA: &str = "metadata";
pub const ELEMENT_SCHEMA: &str = "schema";
pub const ELEMENT_SCHEMAVERSION: &str = "schemaversion";
pub const ELEMENT_VIEWS: &str = "views";
pub const ELEMENT_VIEW: &str = "view";
pub const ELEMENT_NODE: &str = "node";
pub const ELEMENT_CONNECTION: &str = "connection";
pub const ELEMENT_BENDPOINT: &str = "bendpoint";
pub const ELEMENT_VIEWREF: &str = "viewref";
pub const ELEMENT_STYLE: &str = "style";
pub const ELEMENT_FILLCOLOR: &str = "fillColor";
pub const ELEMENT_LINECOLOR: &str = "lineColor";
pub const ELEMENT_FONT: &str = "font";
pub const ELEMENT_FONTCOLOR: &str = "fontColor";

// Attribute names.
pub const ATTRIBUTE_IDENTIFIER: &str = "identifier";
pub const ATTRIBUTE_IDENTIFIERREF: &str = "identifierref";
pub const ATTRIBUTE_TYPE: &str = "type";
pub const ATTRIBUTE_SOURCE: &str = "source";
pub const ATTRIBUTE_TARGET: &str = "target";
pub const ATTRIBUTE_ELEMENTREF: &str = "elementref";
pub const ATTRIBUTE_RELATIONSHIPREF: &str = "relationshipref";
pub const ATTRIBUTE_REF: &str = "ref";
pub const ATTRIBUTE_VIEWPOINT: &str = "viewpoint";
pub const ATTRIBUTE_ACCESS_TYPE: &str = "accessType";
pub const ATTRIBUTE_MODIFIER: &str = "modifier";
pub const ATTRIBUTE_LANG: &str = "lang";
pub const ATTRIBUTE_X: &str = "x";
pub const ATTRIBUTE_Y: &str = "y";
pub const ATTRIBUTE_WIDTH: &str = "w";
pub const ATTRIBUTE_HEIGHT: &str = "h";
pub const ATTRIBUTE_R: &str = "r";
pub const ATTRIBUTE_G: &str = "g";
pub const ATTRIBUTE_B: &str = "b";
pub const ATTRIBUTE_A: &str = "a";
pub const ATTRIBUTE_LINEWIDTH: &str = "lineWidth";
pub const ATTRIBUTE_FONTNAME: &str = "name";
pub const ATTRIBUTE_FONTSIZE: &str = "size";
pub const ATTRIBUTE_FONTSTYLE: &str = "style";

// `xsi:type` discriminators for non-concept nodes.
pub const NODE_TYPE_CONTAINER: &str = "container";
pub const NODE_TYPE_LABEL: &str = "label";

// `accessType` attribute values.
pub const ACCESS_TYPE_ACCESS: &str = "Access";
pub const ACCESS_TYPE_READ: &str = "Read";
pub const ACCESS_TYPE_WRITE: &str = "Write";
pub const ACCESS_TYPE_READ_WRITE: &str = "ReadWrite";

/// Serialized form of an identifier.
///
/// Exchange identifiers must be NCNames, so bare ids get an `id-`
/// prefix; ids that already carry one are written unchanged.
pub fn xml_id(id: &Id) -> String {
    if id.as_str().starts_with("id-") {
        id.as_str().to_string()
    } else {
        format!("id-{id}")
    }
}
