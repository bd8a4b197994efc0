//! # archimate-exchange
//!
//! An in-memory enterprise-architecture model graph and a codec for the
//! vendor-neutral Open Exchange XML format: elements, relationships,
//! diagram views, folders and properties, round-tripped through the
//! interchange document structure.
//!
//! ## Module Structure (dependency order)
//!
//! ```text
//! validate  → structural conformance checking (optional, read-only)
//!   ↓
//! import    → XML document → Model (multi-pass reference resolution)
//! export    → Model → XML document (catalog, layers, views)
//!   ↓
//! catalog   → property-key deduplication table (serialized form only)
//! geometry  → relative ↔ absolute bounds, negative-offset normalization
//!   ↓
//! view      → views, node trees, connections, bendpoints, styles
//! model     → Model, Concept, Folder, Property, Id
//! types     → ConceptKind and the exchange type-name mapper
//!   ↓
//! xml       → namespaces and vocabulary constants
//! error     → ExchangeError
//! ```
//!
//! ## Usage
//!
//! ```no_run
//! use archex::{ModelExporter, ModelImporter};
//!
//! let bytes = std::fs::read("model.xml")?;
//! let model = ModelImporter::new().read(&bytes)?;
//!
//! let exported = ModelExporter::new().write(&model)?;
//! std::fs::write("out.xml", exported)?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

/// Error type shared by every exchange operation.
pub mod error;

/// Namespaces and the element/attribute vocabulary.
pub mod xml;

/// Concept kinds and the type-name mapper.
pub mod types;

/// The model graph: concepts, folders, properties.
pub mod model;

/// Diagram views: nodes, connections, styles.
pub mod view;

/// Coordinate-space transforms.
pub mod geometry;

/// Property-key deduplication for the serialized form.
pub mod catalog;

/// Model → XML serialization.
pub mod export;

/// XML → Model reconstruction.
pub mod import;

/// Structural conformance checking.
pub mod validate;

pub use catalog::PropertyCatalog;
pub use error::ExchangeError;
pub use export::{ExportOptions, ModelExporter};
pub use geometry::{Bounds, Offset, absolute_bounds, negative_offset, relative_bounds};
pub use import::{ImportOptions, ModelImporter};
pub use model::{AccessKind, Concept, Folder, Id, Model, Property, RelationshipInfo};
pub use types::{ConceptKind, JunctionKind, Layer};
pub use validate::{Diagnostic, ValidationReport, Validator};
pub use view::{Bendpoint, Connection, Font, Node, NodeKind, Rgb, Style, View};
