//! End-to-end export → import round trips over the exchange format.

use archex::{
    AccessKind, Bendpoint, Bounds, Concept, ConceptKind, Connection, ExchangeError,
    ExportOptions, Folder, Id, ImportOptions, JunctionKind, Model, ModelExporter, ModelImporter,
    Node, NodeKind, Property, Rgb, Style, Validator, View,
};
use rstest::rstest;

fn sample_model() -> Model {
    let mut model = Model::new();
    model.id = Id::new("id-sample");
    model.name = Some("Ordering".into());
    model.documentation = Some("A small ordering landscape.".into());
    model.properties.push(Property::new("owner", "EA team"));

    model.add_concept(
        Concept::new("actor", ConceptKind::BusinessActor)
            .with_name("Customer")
            .with_documentation("External customer.")
            .with_property("criticality", "high"),
    );
    model.add_concept(Concept::new("process", ConceptKind::BusinessProcess).with_name("Order"));
    model.add_concept(
        Concept::new("component", ConceptKind::ApplicationComponent).with_name("Shop"),
    );
    model.add_concept(Concept::new("data", ConceptKind::DataObject).with_name("Order Record"));
    model.add_concept(Concept::new_junction("junction", JunctionKind::Or));

    model.add_concept(
        Concept::new_relationship(
            "assignment",
            ConceptKind::AssignmentRelationship,
            "actor",
            "process",
        )
        .with_name("performs"),
    );
    model.add_concept(
        Concept::new_relationship("access", ConceptKind::AccessRelationship, "component", "data")
            .with_access(AccessKind::ReadWrite),
    );
    model.add_concept(
        Concept::new_relationship(
            "influence",
            ConceptKind::InfluenceRelationship,
            "actor",
            "component",
        )
        .with_influence_strength("++"),
    );

    model
}

fn round_trip(model: &Model) -> Model {
    let bytes = ModelExporter::new().write(model).expect("export failed");
    ModelImporter::new().read(&bytes).expect("import failed")
}

#[test]
fn round_trip_preserves_concepts() {
    let model = sample_model();
    let imported = round_trip(&model);

    assert_eq!(imported.element_count(), model.element_count());
    assert_eq!(imported.relationship_count(), model.relationship_count());
    assert_eq!(imported.name, model.name);
    assert_eq!(imported.documentation, model.documentation);
    assert_eq!(imported.properties, model.properties);

    let actor = imported.concept(&Id::new("id-actor")).unwrap();
    assert_eq!(actor.kind, ConceptKind::BusinessActor);
    assert_eq!(actor.name.as_deref(), Some("Customer"));
    assert_eq!(actor.documentation.as_deref(), Some("External customer."));
    assert_eq!(actor.properties[0].key, "criticality");
    assert_eq!(actor.properties[0].value, "high");

    // Relationship endpoints resolve to concepts of the original kinds.
    let assignment = imported.concept(&Id::new("id-assignment")).unwrap();
    let source = imported.concept(assignment.source().unwrap()).unwrap();
    let target = imported.concept(assignment.target().unwrap()).unwrap();
    assert_eq!(source.kind, ConceptKind::BusinessActor);
    assert_eq!(target.kind, ConceptKind::BusinessProcess);

    let access = imported.concept(&Id::new("id-access")).unwrap();
    assert_eq!(
        access.relationship.as_ref().unwrap().access,
        Some(AccessKind::ReadWrite)
    );
    let influence = imported.concept(&Id::new("id-influence")).unwrap();
    assert_eq!(
        influence
            .relationship
            .as_ref()
            .unwrap()
            .influence_strength
            .as_deref(),
        Some("++")
    );

    let junction = imported.concept(&Id::new("id-junction")).unwrap();
    assert_eq!(junction.kind, ConceptKind::Junction);
    assert_eq!(junction.junction, Some(JunctionKind::Or));
}

#[test]
fn round_trip_bounds_through_nesting() {
    let mut model = sample_model();

    let mut outer = Node::group("outer", Bounds::new(10, 15, 500, 500));
    let mut middle = Node::group("middle", Bounds::new(10, 15, 400, 400));
    middle.push_child(Node::concept("inner", "actor", Bounds::new(10, 15, 300, 300)));
    outer.push_child(middle);
    let mut view = View::new("view").with_name("Nesting");
    view.nodes.push(outer);
    model.add_view(view);

    let xml = ModelExporter::new().write_string(&model).unwrap();
    // Absolute coordinates accumulate at each level.
    assert!(xml.contains(r#"x="10" y="15" w="500" h="500""#));
    assert!(xml.contains(r#"x="20" y="30" w="400" h="400""#));
    assert!(xml.contains(r#"x="30" y="45" w="300" h="300""#));

    let imported = ModelImporter::new().read(xml.as_bytes()).unwrap();
    let view = &imported.views[0];
    for id in ["id-outer", "id-middle", "id-inner"] {
        let node = view.find_node(&Id::new(id)).unwrap();
        assert_eq!(
            (node.bounds.x, node.bounds.y),
            (10, 15),
            "relative bounds of {id}"
        );
    }
}

#[test]
fn negative_coordinates_are_normalized() {
    let mut model = sample_model();
    let mut view = View::new("view");
    view.nodes
        .push(Node::concept("n1", "actor", Bounds::new(-10, -300, 100, 100)));
    view.nodes
        .push(Node::concept("n2", "process", Bounds::new(-100, -200, 100, 100)));
    model.add_view(view);

    let xml = ModelExporter::new().write_string(&model).unwrap();
    let imported = ModelImporter::new().read(xml.as_bytes()).unwrap();

    let view = &imported.views[0];
    let n1 = view.find_node(&Id::new("id-n1")).unwrap();
    let n2 = view.find_node(&Id::new("id-n2")).unwrap();
    // The whole view shifts by (100, 300); no coordinate is negative.
    assert_eq!((n1.bounds.x, n1.bounds.y), (90, 0));
    assert_eq!((n2.bounds.x, n2.bounds.y), (0, 100));
}

#[test]
fn repeated_export_is_byte_identical() {
    let model = sample_model();
    let exporter = ModelExporter::new();
    let first = exporter.write(&model).unwrap();
    let second = exporter.write(&model).unwrap();
    assert_eq!(first, second);

    // And the same holds after a round trip of the unchanged model.
    let imported = ModelImporter::new().read(&first).unwrap();
    let third = exporter.write(&imported).unwrap();
    assert_eq!(first, third);
}

#[test]
fn dangling_reference_aborts_import() {
    let text = r#"<?xml version="1.0" encoding="UTF-8"?>
<model xmlns="http://www.opengroup.org/xsd/archimate"
       xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance"
       identifier="id-m">
  <elements>
    <element identifier="id-a" xsi:type="BusinessActor"/>
  </elements>
  <relationships>
    <relationship identifier="id-r" source="id-missing" target="id-a"
                  xsi:type="AssociationRelationship"/>
  </relationships>
</model>"#;
    let result = ModelImporter::new().read_str(text);
    assert!(matches!(
        result,
        Err(ExchangeError::DanglingReference { .. })
    ));
}

#[test]
fn absent_type_skips_but_unknown_type_fails() {
    let skipped = r#"<?xml version="1.0" encoding="UTF-8"?>
<model xmlns="http://www.opengroup.org/xsd/archimate"
       xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance"
       identifier="id-m">
  <elements>
    <element identifier="id-a" xsi:type="BusinessActor"/>
    <element identifier="id-b"/>
  </elements>
</model>"#;
    let model = ModelImporter::new().read_str(skipped).unwrap();
    assert_eq!(model.element_count(), 1);

    let failing = skipped.replace(r#"<element identifier="id-b"/>"#, r#"<element identifier="id-b" xsi:type="NotARealType"/>"#);
    assert!(matches!(
        ModelImporter::new().read_str(&failing),
        Err(ExchangeError::UnknownConceptType(_))
    ));
}

#[test]
fn nested_connection_is_skipped_then_synthesized() {
    let mut model = sample_model();

    let mut parent = Node::concept("parent", "actor", Bounds::new(0, 0, 400, 300));
    parent.push_child(Node::concept("child", "process", Bounds::new(20, 40, 120, 60)));
    let mut view = View::new("view");
    view.nodes.push(parent);
    view.connections
        .push(Connection::relationship("conn", "assignment", "parent", "child"));
    model.add_view(view);

    let xml = ModelExporter::new().write_string(&model).unwrap();
    // The visually nested relationship connection is never serialized.
    assert!(!xml.contains("<connection"));

    let imported = ModelImporter::new().read(xml.as_bytes()).unwrap();
    let view = &imported.views[0];
    assert_eq!(view.connections.len(), 1);
    let connection = &view.connections[0];
    assert_eq!(
        connection.relationship.as_ref().unwrap().as_str(),
        "id-assignment"
    );
    assert_eq!(connection.source.as_str(), "id-parent");
    assert_eq!(connection.target.as_str(), "id-child");
    assert!(connection.bendpoints.is_empty());
}

#[test]
fn single_bendpoint_round_trips() {
    let mut model = sample_model();
    let mut view = View::new("view");
    view.nodes
        .push(Node::concept("n1", "actor", Bounds::new(768, 108, 120, 61)));
    view.nodes
        .push(Node::concept("n2", "process", Bounds::new(408, 108, 120, 61)));
    let mut connection = Connection::relationship("conn", "assignment", "n1", "n2");
    // Offsets consistently derived from the absolute point (948, 108).
    connection.bendpoints.push(Bendpoint::new(120, -30, 480, -30));
    view.connections.push(connection);
    model.add_view(view);

    let imported = round_trip(&model);
    let connection = imported.views[0]
        .find_connection(&Id::new("id-conn"))
        .unwrap();
    assert_eq!(connection.bendpoints, vec![Bendpoint::new(120, -30, 480, -30)]);
}

#[test]
fn styles_round_trip() {
    let mut model = sample_model();
    let mut view = View::new("view");
    let mut node = Node::concept("n1", "actor", Bounds::new(0, 0, 120, 60));
    node.style = Style {
        fill_color: Some(Rgb::new(255, 255, 181)),
        line_color: Some(Rgb::new(92, 92, 92)),
        alpha: 128,
        line_width: 1,
        font: Some(archex::Font {
            name: "Segoe UI".into(),
            size: 9,
            bold: true,
            italic: false,
        }),
        font_color: Some(Rgb::new(0, 0, 0)),
    };
    view.nodes.push(node);
    view.nodes
        .push(Node::concept("n2", "process", Bounds::new(300, 0, 120, 60)));
    let mut connection = Connection::relationship("conn", "assignment", "n1", "n2");
    connection.style.line_width = 2;
    connection.style.line_color = Some(Rgb::new(255, 0, 0));
    view.connections.push(connection);
    model.add_view(view);

    let imported = round_trip(&model);
    let view = &imported.views[0];

    let node = view.find_node(&Id::new("id-n1")).unwrap();
    assert_eq!(node.style.fill_color, Some(Rgb::new(255, 255, 181)));
    assert_eq!(node.style.alpha, 128);
    assert_eq!(node.style.line_color, Some(Rgb::new(92, 92, 92)));
    let font = node.style.font.as_ref().unwrap();
    assert_eq!(font.name, "Segoe UI");
    assert_eq!(font.size, 9);
    assert!(font.bold && !font.italic);
    assert_eq!(node.style.font_color, Some(Rgb::new(0, 0, 0)));

    let connection = view.find_connection(&Id::new("id-conn")).unwrap();
    assert_eq!(connection.style.line_width, 2);
    assert_eq!(connection.style.line_color, Some(Rgb::new(255, 0, 0)));
}

#[test]
fn view_metadata_and_reference_round_trip() {
    let mut model = sample_model();

    let mut overview = View::new("overview").with_name("Overview");
    overview.viewpoint = Some("Layered".into());
    overview
        .properties
        .push(Property::new("review", "approved"));
    overview.nodes.push(Node::view_ref(
        "ref-node",
        "detail",
        Bounds::new(10, 10, 200, 40),
    ));
    model.add_view(overview);
    model.add_view(View::new("detail").with_name("Detail"));

    let imported = round_trip(&model);
    let overview = imported.view(&Id::new("id-overview")).unwrap();
    assert_eq!(overview.name.as_deref(), Some("Overview"));
    assert_eq!(overview.viewpoint.as_deref(), Some("Layered"));
    assert_eq!(overview.properties[0].key, "review");

    let node = overview.find_node(&Id::new("id-ref-node")).unwrap();
    assert!(
        matches!(&node.kind, NodeKind::ViewRef { view } if view.as_str() == "id-detail")
    );
}

#[test]
fn notes_and_groups_round_trip() {
    let mut model = sample_model();
    let mut view = View::new("view");
    let mut group = Node::group("group", Bounds::new(0, 0, 400, 300));
    if let NodeKind::Group {
        name,
        documentation,
        ..
    } = &mut group.kind
    {
        *name = Some("Zone".into());
        *documentation = Some("Deployment zone.".into());
    }
    view.nodes.push(group);
    view.nodes.push(Node::note(
        "note",
        "Remember to review this.",
        Bounds::new(500, 10, 185, 80),
    ));
    model.add_view(view);

    let imported = round_trip(&model);
    let view = &imported.views[0];

    let group = view.find_node(&Id::new("id-group")).unwrap();
    assert!(matches!(
        &group.kind,
        NodeKind::Group { name, .. } if name.as_deref() == Some("Zone")
    ));

    let note = view.find_node(&Id::new("id-note")).unwrap();
    assert!(matches!(
        &note.kind,
        NodeKind::Note { content } if content == "Remember to review this."
    ));
}

#[test]
fn language_tagged_export_honors_import_locale() {
    let model = sample_model();
    let options = ExportOptions {
        language_code: Some("en".into()),
        ..ExportOptions::default()
    };
    let bytes = ModelExporter::with_options(options).write(&model).unwrap();

    // Matching locale resolves the tagged variant.
    let importer = ModelImporter::with_options(ImportOptions {
        locale: Some("en".into()),
    });
    assert_eq!(
        importer.read(&bytes).unwrap().name.as_deref(),
        Some("Ordering")
    );

    // A non-matching locale falls back to the first variant present.
    let importer = ModelImporter::with_options(ImportOptions {
        locale: Some("de".into()),
    });
    assert_eq!(
        importer.read(&bytes).unwrap().name.as_deref(),
        Some("Ordering")
    );
}

#[rstest]
#[case(AccessKind::Unspecified)]
#[case(AccessKind::Read)]
#[case(AccessKind::Write)]
#[case(AccessKind::ReadWrite)]
fn access_kinds_round_trip(#[case] access: AccessKind) {
    let mut model = Model::new();
    model.add_concept(Concept::new("p", ConceptKind::ApplicationComponent));
    model.add_concept(Concept::new("d", ConceptKind::DataObject));
    model.add_concept(
        Concept::new_relationship("r", ConceptKind::AccessRelationship, "p", "d")
            .with_access(access),
    );

    let imported = round_trip(&model);
    let relationship = imported.concept(&Id::new("id-r")).unwrap();
    assert_eq!(relationship.relationship.as_ref().unwrap().access, Some(access));
}

#[test]
fn exported_file_passes_validation() {
    let mut model = sample_model();
    let mut view = View::new("view");
    view.nodes
        .push(Node::concept("n1", "actor", Bounds::new(0, 0, 120, 60)));
    model.add_view(view);

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("exported.xml");

    let options = ExportOptions {
        include_organization: true,
        metadata: [("title".to_string(), "Sample".to_string())]
            .into_iter()
            .collect(),
        ..ExportOptions::default()
    };
    model
        .folders
        .push(Folder::new("Business").with_item("actor"));
    ModelExporter::with_options(options)
        .export_file(&model, &path)
        .unwrap();

    let report = Validator::new().validate_file(&path).unwrap();
    assert!(report.is_valid(), "{:?}", report.errors);

    // And the file imports cleanly.
    let imported = ModelImporter::new().import_file(&path).unwrap();
    assert_eq!(imported.element_count(), model.element_count());
    // Organization is export-only; the importer leaves folders empty.
    assert!(imported.folders.is_empty());
}
