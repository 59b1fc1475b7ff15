use super::*;

fn ids() -> (EntityId, EntityId, EntityId) {
    (EntityId(1), EntityId(2), EntityId(3))
}

#[test]
fn test_multiple_usages_between_same_pair() {
    let (a, b, _) = ids();
    let mut graph = DependencyGraph::new();

    assert!(graph.add_edge(a, b, EdgeUsage::Extends));
    assert!(graph.add_edge(a, b, EdgeUsage::Uses));

    assert!(graph.contains_edge(a, b));
    assert!(!graph.contains_edge(b, a));
    assert_eq!(graph.edges_of(a).len(), 2);
    assert_eq!(graph.edge_count(), 2);

    // Ambiguous pair: no single edge to return
    assert_eq!(graph.get_edge(a, b), None);
    let usages: Vec<EdgeUsage> = graph.get_edges(a, b).iter().map(|e| e.usage).collect();
    assert_eq!(usages, vec![EdgeUsage::Extends, EdgeUsage::Uses]);
}

#[test]
fn test_duplicate_edge_is_noop() {
    let (a, b, _) = ids();
    let mut graph = DependencyGraph::new();

    assert!(graph.add_edge(a, b, EdgeUsage::CallsMethod));
    assert!(!graph.add_edge(a, b, EdgeUsage::CallsMethod));
    assert_eq!(graph.edge_count(), 1);
    assert_eq!(
        graph.get_edge(a, b),
        Some(SourceCodeEdge {
            from: a,
            to: b,
            usage: EdgeUsage::CallsMethod
        })
    );
}

#[test]
fn test_no_link_edges_are_kept() {
    let (a, b, _) = ids();
    let mut graph = DependencyGraph::new();
    graph.add_edge(a, b, EdgeUsage::NoLink);

    assert!(graph.contains_edge(a, b));
    assert_eq!(graph.edges_with_usage(EdgeUsage::NoLink).len(), 1);
    assert_eq!(graph.incoming_edges_of(b)[0].usage, EdgeUsage::NoLink);
}

#[test]
fn test_incoming_and_outgoing() {
    let (a, b, c) = ids();
    let mut graph = DependencyGraph::new();
    graph.add_edge(a, b, EdgeUsage::Uses);
    graph.add_edge(c, b, EdgeUsage::Implements);
    graph.add_edge(b, c, EdgeUsage::CallsField);

    assert_eq!(graph.incoming_edges_of(b).len(), 2);
    assert_eq!(graph.outgoing_edges_of(b).len(), 1);
    assert_eq!(graph.edges_of(b).len(), 3);
    assert!(graph.incoming_edges_of(b).iter().all(|e| e.to == b));
    assert!(graph.outgoing_edges_of(b).iter().all(|e| e.from == b));
    assert!(graph.outgoing_edges_of(EntityId(99)).is_empty());
}

#[test]
fn test_self_loop_counted_once() {
    let (a, _, _) = ids();
    let mut graph = DependencyGraph::new();
    graph.add_edge(a, a, EdgeUsage::CallsMethod);

    assert_eq!(graph.edges_of(a).len(), 1);
}

#[test]
fn test_remove_vertex_drops_incident_edges() {
    let (a, b, c) = ids();
    let mut graph = DependencyGraph::new();
    graph.add_edge(a, b, EdgeUsage::Uses);
    graph.add_edge(b, c, EdgeUsage::Uses);
    graph.add_edge(a, c, EdgeUsage::Uses);

    assert!(graph.remove_vertex(b));
    assert!(!graph.remove_vertex(b));
    assert_eq!(graph.edge_count(), 1);
    assert!(!graph.contains_edge(a, b));
    assert!(graph.contains_edge(a, c));
    assert_eq!(graph.vertices(), vec![a, c]);
}

#[test]
fn test_find_cycles_by_usage() {
    let (a, b, c) = ids();
    let mut graph = DependencyGraph::new();
    graph.add_edge(a, b, EdgeUsage::Uses);
    graph.add_edge(b, c, EdgeUsage::Uses);
    graph.add_edge(c, a, EdgeUsage::Extends);

    assert_eq!(graph.find_cycles(&[]), vec![vec![a, b, c]]);
    assert!(graph.find_cycles(&[EdgeUsage::Uses]).is_empty());
    assert_eq!(
        graph.find_cycles(&[EdgeUsage::Uses, EdgeUsage::Extends]).len(),
        1
    );
}

#[test]
fn test_usage_display() {
    assert_eq!(EdgeUsage::CallsMethod.to_string(), "CALLS_METHOD");
    assert_eq!(EdgeUsage::NoLink.to_string(), "NO_LINK");
}
