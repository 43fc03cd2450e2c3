mod common;

use campusnav_lib::{find_route, Error, RouteRenderMode, RouteResult, RouteSummary};

use common::{linear_chain, small_campus};

#[test]
fn plain_text_summary_lists_every_step() {
    let route = find_route(&linear_chain(), 1, 3, false).unwrap().unwrap();
    let summary = RouteSummary::from_route(&route, false).unwrap();

    assert_eq!(
        summary.render(RouteRenderMode::PlainText),
        "Route: A -> C (2 hops, 20.0 units, ~14s)\n\
         Accessible: yes\n  \
         0: A (1) - Start here\n  \
         1: B (2) - Walk to B\n  \
         2: C (3) - Walk to C\n"
    );
}

#[test]
fn rich_summary_lists_floors() {
    let route = find_route(&small_campus(), 100, 112, true).unwrap().unwrap();
    let summary = RouteSummary::from_route(&route, true).unwrap();
    let rendered = summary.render(RouteRenderMode::RichText);

    assert!(rendered.starts_with("**Route** _Main Entrance → Lecture Hall_"));
    assert!(rendered.contains("Floors: 1, 2\n"));
    assert!(rendered.contains("Take elevator from Ground Elevator to First Elevator"));
}

#[test]
fn summary_serializes_for_json_output() {
    let route = find_route(&small_campus(), 112, 100, false).unwrap().unwrap();
    let summary = RouteSummary::from_route(&route, false).unwrap();
    let value = serde_json::to_value(&summary).unwrap();

    assert_eq!(value["hops"], 4);
    assert_eq!(value["accessibility_compatible"], false);
    assert_eq!(value["start"]["name"], "Lecture Hall");
    assert_eq!(value["steps"][2]["via"], "stairs");
    assert_eq!(value["floors"], serde_json::json!([1, 2]));

    let raw = serde_json::to_value(&route).unwrap();
    assert!(raw.get("stats").is_none());
    assert_eq!(raw["path"][0]["node"]["id"], 112);
}

#[test]
fn empty_routes_cannot_be_summarised() {
    let route = RouteResult {
        path: Vec::new(),
        total_distance: 0.0,
        total_duration_seconds: 0,
        floors_involved: Default::default(),
        buildings_involved: Default::default(),
        accessibility_compatible: true,
        stats: Default::default(),
    };
    assert!(matches!(
        RouteSummary::from_route(&route, false),
        Err(Error::EmptyRoute)
    ));
}
