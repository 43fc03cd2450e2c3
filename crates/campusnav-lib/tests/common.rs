#![allow(dead_code)]

use campusnav_lib::{CampusGraph, Edge, EdgeKind, Node, NodeKind};

/// A(0,0) - B(10,0) - C(20,0), joined by walkways of weight 10.
pub fn linear_chain() -> CampusGraph {
    CampusGraph::builder()
        .node(Node::new(1, NodeKind::Room).named("A").at(0.0, 0.0))
        .node(Node::new(2, NodeKind::Checkpoint).named("B").at(10.0, 0.0))
        .node(Node::new(3, NodeKind::Room).named("C").at(20.0, 0.0))
        .edge(Edge::new(1, 1, 2, EdgeKind::Walkway).weighted(10.0))
        .edge(Edge::new(2, 2, 3, EdgeKind::Walkway).weighted(10.0))
        .build()
        .expect("linear chain is valid")
}

pub const DETOUR_A: i64 = 1;
pub const DETOUR_B: i64 = 2;
pub const DETOUR_STAIRS: i64 = 3;
pub const DETOUR_ELEVATOR: i64 = 4;
pub const DETOUR_D: i64 = 5;

/// Two ways from B to D: an inaccessible staircase (cheaper) and an elevator.
pub fn accessible_detour() -> CampusGraph {
    CampusGraph::builder()
        .node(Node::new(DETOUR_A, NodeKind::Entrance).named("A"))
        .node(Node::new(DETOUR_B, NodeKind::Checkpoint).named("B"))
        .node(
            Node::new(DETOUR_STAIRS, NodeKind::Staircase)
                .named("S")
                .inaccessible(),
        )
        .node(Node::new(DETOUR_ELEVATOR, NodeKind::Elevator).named("V"))
        .node(Node::new(DETOUR_D, NodeKind::Room).named("D"))
        .edge(Edge::new(1, DETOUR_A, DETOUR_B, EdgeKind::Walkway).weighted(10.0))
        .edge(Edge::new(2, DETOUR_B, DETOUR_STAIRS, EdgeKind::Stairs).weighted(5.0))
        .edge(Edge::new(3, DETOUR_B, DETOUR_ELEVATOR, EdgeKind::Elevator).weighted(8.0))
        .edge(Edge::new(4, DETOUR_STAIRS, DETOUR_D, EdgeKind::Stairs).weighted(5.0))
        .edge(Edge::new(5, DETOUR_ELEVATOR, DETOUR_D, EdgeKind::Elevator).weighted(8.0))
        .build()
        .expect("detour graph is valid")
}

/// Two buildings joined by an outdoor path. Building 1 has two floors
/// connected by stairs and an elevator; edges carry stored instructions.
pub fn small_campus() -> CampusGraph {
    CampusGraph::builder()
        .nodes([
            Node::new(100, NodeKind::Entrance)
                .named("Main Entrance")
                .on_floor(1)
                .in_building(1)
                .at(0.0, 0.0)
                .with_scan_code("QR-MAIN"),
            Node::new(101, NodeKind::Checkpoint)
                .named("Ground Hall")
                .on_floor(1)
                .in_building(1)
                .at(10.0, 0.0),
            Node::new(102, NodeKind::Staircase)
                .named("Ground Stairs")
                .on_floor(1)
                .in_building(1)
                .at(12.0, 4.0),
            Node::new(103, NodeKind::Elevator)
                .named("Ground Elevator")
                .on_floor(1)
                .in_building(1)
                .at(12.0, -4.0),
            Node::new(110, NodeKind::Staircase)
                .named("First Stairs")
                .on_floor(2)
                .in_building(1)
                .at(12.0, 4.0),
            Node::new(111, NodeKind::Elevator)
                .named("First Elevator")
                .on_floor(2)
                .in_building(1)
                .at(12.0, -4.0),
            Node::new(112, NodeKind::Room)
                .named("Lecture Hall")
                .on_floor(2)
                .in_building(1)
                .at(20.0, 0.0),
            Node::new(200, NodeKind::Entrance)
                .named("Library Entrance")
                .on_floor(1)
                .in_building(2)
                .at(60.0, 0.0),
            Node::new(201, NodeKind::ServicePoint)
                .named("Library Desk")
                .on_floor(1)
                .in_building(2)
                .at(70.0, 0.0),
        ])
        .edges([
            Edge::new(1, 100, 101, EdgeKind::Door)
                .weighted(10.0)
                .with_instruction("Walk to Ground Hall from Main Entrance"),
            Edge::new(2, 101, 102, EdgeKind::Walkway).weighted(5.0),
            Edge::new(3, 101, 103, EdgeKind::Walkway).weighted(5.0),
            Edge::new(4, 102, 110, EdgeKind::Stairs)
                .weighted(6.0)
                .with_instruction("Climb stairs from Ground Stairs to First Stairs"),
            Edge::new(5, 103, 111, EdgeKind::Elevator)
                .weighted(6.0)
                .with_instruction("Take elevator from Ground Elevator to First Elevator"),
            Edge::new(6, 110, 112, EdgeKind::Walkway)
                .weighted(9.0)
                .with_instruction("Walk to Lecture Hall"),
            Edge::new(7, 111, 112, EdgeKind::Walkway)
                .weighted(9.0)
                .with_instruction("Walk to Lecture Hall"),
            Edge::new(8, 100, 200, EdgeKind::OutdoorPath)
                .weighted(60.0)
                .with_instruction("Walk from Main Entrance to Library Entrance"),
            Edge::new(9, 200, 201, EdgeKind::Door).weighted(10.0),
        ])
        .build()
        .expect("small campus is valid")
}
