use chrono::NaiveDate;
use gantt_analyzer::{DependencyGraphBuilder, TaskRecord, TaskTable};

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

fn task(id: &str, depends_on: &str) -> TaskRecord {
    let mut record = TaskRecord::new(id, "core", format!("task {id}"), d(2024, 2, 5), d(2024, 2, 9));
    record.external_owner = "Acme".into();
    record.days = 4;
    record.depends_on_raw = depends_on.into();
    record
}

fn build(records: &[TaskRecord]) -> gantt_analyzer::DependencyGraph {
    let table = TaskTable::from_records(records).unwrap();
    DependencyGraphBuilder::new(table.dataframe())
        .build("lime")
        .unwrap()
}

#[test]
fn edges_follow_the_dependency_lists() {
    // A <- B, A <- C
    let graph = build(&[task("A", ""), task("B", "A"), task("C", "A")]);
    assert_eq!(graph.node_count(), 3);
    assert_eq!(graph.edge_count(), 2);
    assert_eq!(graph.node("B").unwrap().depends_on, vec!["A"]);
    assert_eq!(graph.dependents_of("A").len(), 2);
}

#[test]
fn unknown_identifiers_are_dropped() {
    let graph = build(&[task("A", ""), task("B", "A;Z")]);
    assert_eq!(graph.node("B").unwrap().depends_on, vec!["A"]);
    assert_eq!(graph.edge_count(), 1);
}

#[test]
fn self_references_are_dropped() {
    let graph = build(&[task("A", "A"), task("B", "A")]);
    assert!(graph.node("A").unwrap().depends_on.is_empty());
    assert_eq!(graph.edge_count(), 1);
}

#[test]
fn resolved_lists_stay_within_the_build_pass() {
    let graph = build(&[
        task("A", ""),
        task("B", "A;X;Y"),
        task("C", "B;A"),
    ]);
    for node in graph.nodes() {
        for dep in &node.depends_on {
            assert!(
                graph.node(dep).is_some(),
                "node {} references unresolved id {dep}",
                node.id
            );
        }
    }
    assert_eq!(graph.node("C").unwrap().depends_on, vec!["B", "A"]);
}

#[test]
fn nodes_carry_chart_attributes() {
    let graph = build(&[task("A", "")]);
    let node = graph.node("A").unwrap();
    assert_eq!(node.full_name, "A - task A");
    assert_eq!(node.start, d(2024, 2, 5));
    assert_eq!(node.duration_days, 4);
    assert_eq!(node.color, "lime");
    assert_eq!(node.resource, "Acme");
}

#[test]
fn cycles_are_not_an_error() {
    let graph = build(&[task("A", "B"), task("B", "A")]);
    assert_eq!(graph.edge_count(), 2);
    assert_eq!(graph.node("A").unwrap().depends_on, vec!["B"]);
    assert_eq!(graph.node("B").unwrap().depends_on, vec!["A"]);
}
