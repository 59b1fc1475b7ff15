use super::*;
use crate::metrics::Metric;
use crate::model::SourceCodeKind;

fn sample() -> (SourceIndex, EntityId, EntityId, EntityId) {
    let mut index = SourceIndex::new(SourceCode::project("demo"));
    let root = index.root();
    let pkg = index.index(root, SourceCode::package("src")).unwrap();
    let file = index
        .index(pkg, SourceCode::file("src/main.c").with_measure(&Metric::LinesOfCode, 12.0))
        .unwrap();
    let func = index
        .index(file, SourceCode::method("src/main.c#main").with_measure(&Metric::Complexity, 3.0))
        .unwrap();
    (index, pkg, file, func)
}

#[test]
fn test_index_and_search_by_key() {
    let (index, pkg, file, _) = sample();

    assert_eq!(index.len(), 4);
    let found = index.search("src/main.c").unwrap();
    assert_eq!(found.id(), Some(file));
    assert_eq!(found.parent(), Some(pkg));
    assert!(index.search("missing").is_none());
}

#[test]
fn test_duplicate_key_rejected_and_index_unchanged() {
    let (mut index, pkg, _, _) = sample();

    let err = index.index(pkg, SourceCode::file("src/main.c")).unwrap_err();
    assert_eq!(err, EngineError::DuplicateKey("src/main.c".to_string()));
    assert_eq!(index.len(), 4);
    assert_eq!(index.get(pkg).unwrap().children().len(), 1);
}

#[test]
fn test_child_before_parent_rejected() {
    let (mut index, _, _, _) = sample();
    let ghost = EntityId(99);

    let err = index.index(ghost, SourceCode::file("orphan.c")).unwrap_err();
    assert!(matches!(err, EngineError::UnknownParent { .. }));
    assert!(index.search("orphan.c").is_none());
}

#[test]
fn test_children_keep_creation_order() {
    let mut index = SourceIndex::new(SourceCode::project("demo"));
    let root = index.root();
    for name in ["c", "a", "b"] {
        index.index(root, SourceCode::package(name)).unwrap();
    }

    let keys: Vec<&str> = index.children(root).map(|c| c.key()).collect();
    assert_eq!(keys, vec!["c", "a", "b"]);
}

#[test]
fn test_search_by_combines_queries_with_and() {
    let (mut index, pkg, _, _) = sample();
    index
        .index(pkg, SourceCode::file("src/util.c").with_measure(&Metric::LinesOfCode, 200.0))
        .unwrap();
    index.index(index.root(), SourceCode::file("README.c")).unwrap();

    let files = QueryByKind(SourceCodeKind::File);
    let under_src = QueryByAncestor(pkg);
    let big = QueryByMeasure::new(&Metric::LinesOfCode, Operator::GreaterThan, 100.0);

    assert_eq!(index.search_by(&[&files]).len(), 3);
    assert_eq!(index.search_by(&[&files, &under_src]).len(), 2);

    let hits = index.search_by(&[&files, &under_src, &big]);
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].key(), "src/util.c");
}

#[test]
fn test_search_by_prefix_and_closure() {
    let (index, _, _, _) = sample();

    let prefix = QueryByKeyPrefix::new("src/main.c");
    assert_eq!(index.search_by(&[&prefix]).len(), 2);

    let methods = |e: &SourceCode| e.is(&SourceCodeKind::Method);
    let hits = index.search_by(&[&prefix, &methods]);
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].key(), "src/main.c#main");
}

#[test]
fn test_remove_cascades_to_descendants() {
    let (mut index, pkg, file, func) = sample();

    let removed = index.remove(pkg).unwrap();
    let keys: Vec<&str> = removed.iter().map(|e| e.key()).collect();
    assert_eq!(keys, vec!["src", "src/main.c", "src/main.c#main"]);

    assert_eq!(index.len(), 1);
    assert!(!index.contains(file));
    assert!(!index.contains(func));
    assert!(index.search("src/main.c#main").is_none());
    assert!(!index.project().has_children());
}

#[test]
fn test_removed_key_can_be_indexed_again() {
    let (mut index, pkg, file, _) = sample();

    index.remove(file).unwrap();
    let again = index.index(pkg, SourceCode::file("src/main.c")).unwrap();
    assert_ne!(again, file);
    assert_eq!(index.search("src/main.c").unwrap().id(), Some(again));
}

#[test]
fn test_root_cannot_be_removed() {
    let (mut index, _, _, _) = sample();
    assert_eq!(index.remove(index.root()).unwrap_err(), EngineError::RootRemoval);
}

#[test]
fn test_traversal_orders() {
    let (index, pkg, file, func) = sample();
    let root = index.root();

    assert_eq!(index.subtree(root), vec![root, pkg, file, func]);
    assert_eq!(index.post_order(root), vec![func, file, pkg, root]);
    assert_eq!(index.ancestors(func), vec![file, pkg, root]);
    assert!(index.is_descendant_of(func, pkg));
    assert!(!index.is_descendant_of(pkg, func));
    assert!(!index.is_descendant_of(pkg, pkg));
}

#[test]
fn test_set_measure_on_unknown_entity_fails() {
    let (mut index, _, file, _) = sample();

    index.set_measure(file, &Metric::Statements, 9.0).unwrap();
    assert_eq!(index.get(file).unwrap().get_i64(&Metric::Statements), 9);

    let err = index.set_measure(EntityId(42), &Metric::Statements, 1.0).unwrap_err();
    assert_eq!(err, EngineError::UnknownEntity(EntityId(42)));
}

#[test]
fn test_flush_keeps_only_a_fresh_root() {
    let (mut index, _, _, _) = sample();
    index.flush();

    assert_eq!(index.len(), 1);
    assert_eq!(index.project().key(), "demo");
    assert!(index.search("src").is_none());
}
