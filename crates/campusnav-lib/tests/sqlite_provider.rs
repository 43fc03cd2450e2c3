mod common;

use campusnav_lib::{
    find_route, Edge, EdgeKind, Error, GraphDocument, GraphProvider, Node, NodeKind,
    SqliteGraphProvider,
};
use rusqlite::Connection;
use tempfile::tempdir;

use common::{accessible_detour, small_campus, DETOUR_A, DETOUR_D, DETOUR_ELEVATOR};

fn provider_with(document: &GraphDocument) -> SqliteGraphProvider {
    let provider = SqliteGraphProvider::in_memory().expect("in-memory database");
    provider.import_document(document).expect("import succeeds");
    provider
}

#[test]
fn imported_graph_routes_like_in_memory_graph() {
    let graph = small_campus();
    let provider = provider_with(&graph.to_document());

    for accessible in [false, true] {
        let expected = find_route(&graph, 112, 201, accessible).unwrap().unwrap();
        let actual = find_route(&provider, 112, 201, accessible).unwrap().unwrap();
        assert_eq!(actual.node_ids(), expected.node_ids());
        assert_eq!(actual.total_duration_seconds, expected.total_duration_seconds);
        let instructions = |route: &campusnav_lib::RouteResult| {
            route
                .path
                .iter()
                .map(|step| step.instruction.clone())
                .collect::<Vec<_>>()
        };
        assert_eq!(instructions(&actual), instructions(&expected));
    }
}

#[test]
fn incident_edges_are_returned_for_both_endpoints() {
    let provider = provider_with(&small_campus().to_document());

    let from_lower = provider.neighbor_edges(102).unwrap();
    let ids: Vec<i64> = from_lower.iter().map(|edge| edge.id).collect();
    assert_eq!(ids, vec![2, 4]);

    let stairs = &from_lower[1];
    assert_eq!(stairs.kind, EdgeKind::Stairs);
    assert_eq!((stairs.from_node_id, stairs.to_node_id), (102, 110));
    assert_eq!(
        stairs.instruction.as_deref(),
        Some("Climb stairs from Ground Stairs to First Stairs")
    );
}

#[test]
fn accessible_lookup_filters_stairs_and_inaccessible_neighbors() {
    let provider = provider_with(&accessible_detour().to_document());

    let edges = provider.accessible_neighbor_edges(2).unwrap();
    let ids: Vec<i64> = edges.iter().map(|edge| edge.id).collect();
    assert_eq!(ids, vec![1, 3]);

    let route = find_route(&provider, DETOUR_A, DETOUR_D, true)
        .unwrap()
        .unwrap();
    assert!(route.node_ids().contains(&DETOUR_ELEVATOR));
}

#[test]
fn missing_nodes_are_not_found() {
    let provider = provider_with(&small_campus().to_document());
    assert!(provider.node(4242).unwrap().is_none());
    assert!(find_route(&provider, 4242, 100, false).unwrap().is_none());
}

#[test]
fn node_round_trips_through_storage() {
    let graph = small_campus();
    let provider = provider_with(&graph.to_document());

    let stored = provider.node(100).unwrap().expect("node exists");
    assert_eq!(Some(&stored), graph.get(100));
    assert_eq!(stored.scan_code.as_deref(), Some("QR-MAIN"));
}

#[test]
fn supplemented_lookups_match_in_memory_graph() {
    let graph = small_campus();
    let provider = provider_with(&graph.to_document());

    let by_code = provider.node_by_scan_code("QR-MAIN").unwrap();
    assert_eq!(by_code.map(|node| node.id), Some(100));
    assert!(provider.node_by_scan_code("QR-NOPE").unwrap().is_none());

    let upstairs: Vec<i64> = provider
        .nodes_by_location(Some(1), Some(2))
        .unwrap()
        .iter()
        .map(|node| node.id)
        .collect();
    assert_eq!(upstairs, vec![110, 111, 112]);

    let library: Vec<i64> = provider
        .nodes_by_location(Some(2), None)
        .unwrap()
        .iter()
        .map(|node| node.id)
        .collect();
    assert_eq!(library, vec![200, 201]);

    let transitions: Vec<i64> = provider
        .floor_transition_nodes(1)
        .unwrap()
        .iter()
        .map(|node| node.id)
        .collect();
    let expected: Vec<i64> = graph
        .floor_transition_nodes(1)
        .iter()
        .map(|node| node.id)
        .collect();
    assert_eq!(transitions, expected);
    assert_eq!(transitions, vec![102, 103, 110, 111]);
}

#[test]
fn node_names_resolve_with_suggestions() {
    let provider = provider_with(&small_campus().to_document());
    assert_eq!(provider.resolve_node_name("Library Desk").unwrap(), 201);

    let error = provider.resolve_node_name("Libary Desk").unwrap_err();
    match error {
        Error::UnknownNode { suggestions, .. } => {
            assert_eq!(suggestions.first().map(String::as_str), Some("Library Desk"));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn insertion_rejects_malformed_edges() {
    let provider = SqliteGraphProvider::in_memory().unwrap();
    provider.insert_node(&Node::new(1, NodeKind::Room)).unwrap();
    provider.insert_node(&Node::new(2, NodeKind::Room)).unwrap();

    let self_loop = provider.insert_edge(&Edge::new(1, 1, 1, EdgeKind::Walkway));
    assert!(matches!(self_loop, Err(Error::SelfLoopEdge { .. })));

    let negative = provider.insert_edge(&Edge::new(2, 1, 2, EdgeKind::Walkway).weighted(-3.0));
    assert!(matches!(negative, Err(Error::InvalidWeight { .. })));

    let dangling = provider.insert_edge(&Edge::new(3, 1, 9, EdgeKind::Walkway));
    assert!(matches!(dangling, Err(Error::DanglingEdge { node: 9, .. })));

    provider
        .insert_edge(&Edge::new(4, 1, 2, EdgeKind::Walkway))
        .expect("valid edge inserts");
    let stored = provider.neighbor_edges(2).unwrap();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].weight, None);
    assert_eq!(stored[0].effective_weight(), 1.0);
}

#[test]
fn invalid_documents_are_not_written() {
    let provider = SqliteGraphProvider::in_memory().unwrap();
    let document = GraphDocument {
        nodes: vec![Node::new(1, NodeKind::Room)],
        edges: vec![Edge::new(1, 1, 2, EdgeKind::Walkway)],
    };

    assert!(matches!(
        provider.import_document(&document),
        Err(Error::DanglingEdge { .. })
    ));
    assert!(provider.node(1).unwrap().is_none());
}

#[test]
fn storage_vocabulary_categories_are_accepted() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("campus.db");
    drop(SqliteGraphProvider::create(&path).unwrap());

    let conn = Connection::open(&path).unwrap();
    conn.execute_batch(
        "INSERT INTO nodes (id, name, type, is_accessible) VALUES (1, 'Food Court', 'FOOD_COURT', 1);
         INSERT INTO nodes (id, name, type, is_accessible, attributes)
             VALUES (2, 'Fire Exit', 'EMERGENCY_EXIT', 0, '{\"signage\": \"green\"}');
         INSERT INTO edges (id, from_node_id, to_node_id, weight, type, instructions)
             VALUES (1, 1, 2, 3.5, 'HALLWAY', 'Walk to Fire Exit');",
    )
    .unwrap();
    drop(conn);

    let provider = SqliteGraphProvider::open_read_only(&path).unwrap();
    let food = provider.node(1).unwrap().unwrap();
    assert_eq!(food.kind, NodeKind::ServicePoint);
    let exit = provider.node(2).unwrap().unwrap();
    assert_eq!(exit.kind, NodeKind::Entrance);
    assert!(!exit.accessible);
    assert_eq!(exit.attributes["signage"], serde_json::json!("green"));

    let edges = provider.neighbor_edges(2).unwrap();
    assert_eq!(edges[0].kind, EdgeKind::Walkway);

    let route = find_route(&provider, 2, 1, false).unwrap().unwrap();
    assert_eq!(route.path[1].instruction, "Walk to Food Court");
}

#[test]
fn unknown_categories_surface_as_errors() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("campus.db");
    let writer = SqliteGraphProvider::create(&path).unwrap();
    writer.insert_node(&Node::new(1, NodeKind::Room)).unwrap();
    drop(writer);

    let conn = Connection::open(&path).unwrap();
    conn.execute("UPDATE nodes SET type = 'helipad' WHERE id = 1", [])
        .unwrap();
    drop(conn);

    let reader = SqliteGraphProvider::open_read_only(&path).unwrap();
    assert!(matches!(
        reader.node(1),
        Err(Error::UnknownCategory { entity: "node", .. })
    ));
}

#[test]
fn opening_a_foreign_database_reports_missing_tables() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("other.db");
    Connection::open(&path)
        .unwrap()
        .execute_batch("CREATE TABLE unrelated (id INTEGER)")
        .unwrap();

    let error = SqliteGraphProvider::open_read_only(&path).unwrap_err();
    assert!(matches!(error, Error::MissingTable { table: "nodes" }));
}

#[test]
fn load_campus_graph_skips_orphaned_edges() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("campus.db");
    let provider = SqliteGraphProvider::create(&path).unwrap();
    provider
        .import_document(&small_campus().to_document())
        .unwrap();
    drop(provider);

    let conn = Connection::open(&path).unwrap();
    conn.execute(
        "INSERT INTO edges (id, from_node_id, to_node_id, weight, type) VALUES (99, 100, 999, 1, 'walkway')",
        [],
    )
    .unwrap();
    drop(conn);

    let provider = SqliteGraphProvider::open_read_only(&path).unwrap();
    let graph = provider.load_campus_graph().unwrap();
    assert_eq!(graph.node_count(), 9);
    assert_eq!(graph.edge_count(), 9);
    assert_eq!(graph.resolve_node_name("Lecture Hall").unwrap(), 112);
}

#[test]
fn null_accessibility_reads_the_same_in_both_providers() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("foreign.db");
    Connection::open(&path)
        .unwrap()
        .execute_batch(
            "CREATE TABLE nodes (id INTEGER PRIMARY KEY, name TEXT, type TEXT, floor_id INTEGER,
                 building_id INTEGER, x REAL, y REAL, is_accessible INTEGER,
                 qr_code_payload TEXT, attributes TEXT);
             CREATE TABLE edges (id INTEGER PRIMARY KEY, from_node_id INTEGER, to_node_id INTEGER,
                 weight REAL, type TEXT, instructions TEXT, attributes TEXT);
             INSERT INTO nodes (id, name, type, is_accessible) VALUES (1, 'Foyer', 'room', 1);
             INSERT INTO nodes (id, name, type, is_accessible) VALUES (2, 'Annex', 'room', NULL);
             INSERT INTO edges (id, from_node_id, to_node_id, weight, type)
                 VALUES (1, 1, 2, 4.0, 'walkway');",
        )
        .unwrap();

    let provider = SqliteGraphProvider::open_read_only(&path).unwrap();
    assert!(provider.node(2).unwrap().unwrap().accessible);
    assert_eq!(provider.accessible_neighbor_edges(1).unwrap().len(), 1);

    let graph = provider.load_campus_graph().unwrap();
    let from_sqlite = find_route(&provider, 1, 2, true).unwrap().unwrap();
    let from_memory = find_route(&graph, 1, 2, true).unwrap().unwrap();
    assert_eq!(from_sqlite.node_ids(), vec![1, 2]);
    assert_eq!(from_sqlite.node_ids(), from_memory.node_ids());
    assert!(from_sqlite.accessibility_compatible);
}
