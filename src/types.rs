//! Concept kinds and the exchange-format type mapper.
//!
//! The exchange format identifies every concept with a short type name
//! carried in an `xsi:type` attribute. The mapping is a closed table in
//! both directions; junctions are the one special case, where a single
//! kind has two serialized spellings distinguished by a sub-type flag.

// ============================================================================
// CONCEPT KINDS
// ============================================================================

/// The kind of a model concept.
///
/// Covers every element and relationship type of the exchange format.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ConceptKind {
    // Business layer
    BusinessActor,
    BusinessRole,
    BusinessCollaboration,
    BusinessInterface,
    BusinessFunction,
    BusinessProcess,
    BusinessEvent,
    BusinessInteraction,
    Product,
    Contract,
    BusinessService,
    Value,
    Meaning,
    Representation,
    BusinessObject,
    Location,

    // Application layer
    ApplicationComponent,
    ApplicationCollaboration,
    ApplicationInterface,
    ApplicationService,
    ApplicationFunction,
    ApplicationInteraction,
    DataObject,

    // Technology layer
    Artifact,
    CommunicationPath,
    Network,
    InfrastructureInterface,
    InfrastructureFunction,
    InfrastructureService,
    Node,
    SystemSoftware,
    Device,

    // Motivation extension
    Stakeholder,
    Driver,
    Assessment,
    Goal,
    Principle,
    Requirement,
    Constraint,

    // Implementation and migration extension
    WorkPackage,
    Deliverable,
    Plateau,
    Gap,

    // Connectors
    Junction,

    // Relationships
    AssignmentRelationship,
    AccessRelationship,
    AssociationRelationship,
    CompositionRelationship,
    AggregationRelationship,
    UsedByRelationship,
    TriggeringRelationship,
    FlowRelationship,
    RealisationRelationship,
    SpecialisationRelationship,
    InfluenceRelationship,
}

/// Junction sub-type. One `ConceptKind::Junction` in the data model,
/// two serialized spellings.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum JunctionKind {
    #[default]
    And,
    Or,
}

/// Semantic layer used to group elements in the serialized form.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Layer {
    Business,
    Application,
    Technology,
    Motivation,
    ImplementationMigration,
    Connectors,
}

impl Layer {
    /// All layers in the fixed export order.
    pub const ALL: [Layer; 6] = [
        Layer::Business,
        Layer::Application,
        Layer::Technology,
        Layer::Motivation,
        Layer::ImplementationMigration,
        Layer::Connectors,
    ];
}

impl ConceptKind {
    /// Returns true if this kind is a relationship.
    pub fn is_relationship(&self) -> bool {
        matches!(
            self,
            Self::AssignmentRelationship
                | Self::AccessRelationship
                | Self::AssociationRelationship
                | Self::CompositionRelationship
                | Self::AggregationRelationship
                | Self::UsedByRelationship
                | Self::TriggeringRelationship
                | Self::FlowRelationship
                | Self::RealisationRelationship
                | Self::SpecialisationRelationship
                | Self::InfluenceRelationship
        )
    }

    /// Returns true if this kind is an element (including junctions).
    pub fn is_element(&self) -> bool {
        !self.is_relationship()
    }

    /// The semantic layer of an element kind; `None` for relationships.
    pub fn layer(&self) -> Option<Layer> {
        let layer = match self {
            Self::BusinessActor
            | Self::BusinessRole
            | Self::BusinessCollaboration
            | Self::BusinessInterface
            | Self::BusinessFunction
            | Self::BusinessProcess
            | Self::BusinessEvent
            | Self::BusinessInteraction
            | Self::Product
            | Self::Contract
            | Self::BusinessService
            | Self::Value
            | Self::Meaning
            | Self::Representation
            | Self::BusinessObject
            | Self::Location => Layer::Business,
            Self::ApplicationComponent
            | Self::ApplicationCollaboration
            | Self::ApplicationInterface
            | Self::ApplicationService
            | Self::ApplicationFunction
            | Self::ApplicationInteraction
            | Self::DataObject => Layer::Application,
            Self::Artifact
            | Self::CommunicationPath
            | Self::Network
            | Self::InfrastructureInterface
            | Self::InfrastructureFunction
            | Self::InfrastructureService
            | Self::Node
            | Self::SystemSoftware
            | Self::Device => Layer::Technology,
            Self::Stakeholder
            | Self::Driver
            | Self::Assessment
            | Self::Goal
            | Self::Principle
            | Self::Requirement
            | Self::Constraint => Layer::Motivation,
            Self::WorkPackage | Self::Deliverable | Self::Plateau | Self::Gap => {
                Layer::ImplementationMigration
            }
            Self::Junction => Layer::Connectors,
            _ => return None,
        };
        Some(layer)
    }

    /// The serialized type name for this kind.
    ///
    /// Junctions map to the bare legacy spelling here; concept-level
    /// mapping goes through [`crate::model::Concept::type_name`], which
    /// consults the junction sub-type flag.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::BusinessActor => "BusinessActor",
            Self::BusinessRole => "BusinessRole",
            Self::BusinessCollaboration => "BusinessCollaboration",
            Self::BusinessInterface => "BusinessInterface",
            Self::BusinessFunction => "BusinessFunction",
            Self::BusinessProcess => "BusinessProcess",
            Self::BusinessEvent => "BusinessEvent",
            Self::BusinessInteraction => "BusinessInteraction",
            Self::Product => "Product",
            Self::Contract => "Contract",
            Self::BusinessService => "BusinessService",
            Self::Value => "Value",
            Self::Meaning => "Meaning",
            Self::Representation => "Representation",
            Self::BusinessObject => "BusinessObject",
            Self::Location => "Location",
            Self::ApplicationComponent => "ApplicationComponent",
            Self::ApplicationCollaboration => "ApplicationCollaboration",
            Self::ApplicationInterface => "ApplicationInterface",
            Self::ApplicationService => "ApplicationService",
            Self::ApplicationFunction => "ApplicationFunction",
            Self::ApplicationInteraction => "ApplicationInteraction",
            Self::DataObject => "DataObject",
            Self::Artifact => "Artifact",
            Self::CommunicationPath => "CommunicationPath",
            Self::Network => "Network",
            Self::InfrastructureInterface => "InfrastructureInterface",
            Self::InfrastructureFunction => "InfrastructureFunction",
            Self::InfrastructureService => "InfrastructureService",
            Self::Node => "Node",
            Self::SystemSoftware => "SystemSoftware",
            Self::Device => "Device",
            Self::Stakeholder => "Stakeholder",
            Self::Driver => "Driver",
            Self::Assessment => "Assessment",
            Self::Goal => "Goal",
            Self::Principle => "Principle",
            Self::Requirement => "Requirement",
            Self::Constraint => "Constraint",
            Self::WorkPackage => "WorkPackage",
            Self::Deliverable => "Deliverable",
            Self::Plateau => "Plateau",
            Self::Gap => "Gap",
            Self::Junction => "Junction",
            Self::AssignmentRelationship => "AssignmentRelationship",
            Self::AccessRelationship => "AccessRelationship",
            Self::AssociationRelationship => "AssociationRelationship",
            Self::CompositionRelationship => "CompositionRelationship",
            Self::AggregationRelationship => "AggregationRelationship",
            Self::UsedByRelationship => "UsedByRelationship",
            Self::TriggeringRelationship => "TriggeringRelationship",
            Self::FlowRelationship => "FlowRelationship",
            Self::RealisationRelationship => "RealisationRelationship",
            Self::SpecialisationRelationship => "SpecialisationRelationship",
            Self::InfluenceRelationship => "InfluenceRelationship",
        }
    }

    /// Parse a serialized type name.
    ///
    /// `AndJunction`/`OrJunction` map to [`ConceptKind::Junction`] with
    /// the sub-type flag set; the bare `Junction` spelling of older
    /// dialects is accepted and defaults to an AND junction. Returns
    /// `None` for unrecognized names; the caller decides whether that
    /// is an error (present-but-unknown) or a skip (absent attribute).
    pub fn from_type_name(name: &str) -> Option<(ConceptKind, Option<JunctionKind>)> {
        let kind = match name {
            "AndJunction" => return Some((Self::Junction, Some(JunctionKind::And))),
            "OrJunction" => return Some((Self::Junction, Some(JunctionKind::Or))),
            "Junction" => return Some((Self::Junction, Some(JunctionKind::And))),
            "BusinessActor" => Self::BusinessActor,
            "BusinessRole" => Self::BusinessRole,
            "BusinessCollaboration" => Self::BusinessCollaboration,
            "BusinessInterface" => Self::BusinessInterface,
            "BusinessFunction" => Self::BusinessFunction,
            "BusinessProcess" => Self::BusinessProcess,
            "BusinessEvent" => Self::BusinessEvent,
            "BusinessInteraction" => Self::BusinessInteraction,
            "Product" => Self::Product,
            "Contract" => Self::Contract,
            "BusinessService" => Self::BusinessService,
            "Value" => Self::Value,
            "Meaning" => Self::Meaning,
            "Representation" => Self::Representation,
            "BusinessObject" => Self::BusinessObject,
            "Location" => Self::Location,
            "ApplicationComponent" => Self::ApplicationComponent,
            "ApplicationCollaboration" => Self::ApplicationCollaboration,
            "ApplicationInterface" => Self::ApplicationInterface,
            "ApplicationService" => Self::ApplicationService,
            "ApplicationFunction" => Self::ApplicationFunction,
            "ApplicationInteraction" => Self::ApplicationInteraction,
            "DataObject" => Self::DataObject,
            "Artifact" => Self::Artifact,
            "CommunicationPath" => Self::CommunicationPath,
            "Network" => Self::Network,
            "InfrastructureInterface" => Self::InfrastructureInterface,
            "InfrastructureFunction" => Self::InfrastructureFunction,
            "InfrastructureService" => Self::InfrastructureService,
            "Node" => Self::Node,
            "SystemSoftware" => Self::SystemSoftware,
            "Device" => Self::Device,
            "Stakeholder" => Self::Stakeholder,
            "Driver" => Self::Driver,
            "Assessment" => Self::Assessment,
            "Goal" => Self::Goal,
            "Principle" => Self::Principle,
            "Requirement" => Self::Requirement,
            "Constraint" => Self::Constraint,
            "WorkPackage" => Self::WorkPackage,
            "Deliverable" => Self::Deliverable,
            "Plateau" => Self::Plateau,
            "Gap" => Self::Gap,
            "AssignmentRelationship" => Self::AssignmentRelationship,
            "AccessRelationship" => Self::AccessRelationship,
            "AssociationRelationship" => Self::AssociationRelationship,
            "CompositionRelationship" => Self::CompositionRelationship,
            "AggregationRelationship" => Self::AggregationRelationship,
            "UsedByRelationship" => Self::UsedByRelationship,
            "TriggeringRelationship" => Self::TriggeringRelationship,
            "FlowRelationship" => Self::FlowRelationship,
            "RealisationRelationship" => Self::RealisationRelationship,
            "SpecialisationRelationship" => Self::SpecialisationRelationship,
            "InfluenceRelationship" => Self::InfluenceRelationship,
            _ => return None,
        };
        Some((kind, None))
    }

    /// The serialized spelling for a junction with the given sub-type.
    pub fn junction_type_name(junction: JunctionKind) -> &'static str {
        match junction {
            JunctionKind::And => "AndJunction",
            JunctionKind::Or => "OrJunction",
        }
    }
}
