//! Tests for ForestBuilder and load_forest

use catree::domain::{
    flatten, load_forest, validate_structure, Category, CategoryId, DomainError, ForestBuilder,
};
use catree::util::testing;
use rstest::rstest;

fn ids(forest: &[Category]) -> Vec<(CategoryId, usize)> {
    flatten(forest, None, None)
        .unwrap()
        .iter()
        .map(|n| (n.category.id, n.level))
        .collect()
}

fn records(json: &str) -> Vec<Category> {
    serde_json::from_str(json).expect("parse records")
}

#[test]
fn given_flat_listing_when_building_then_nested_by_parent_id() {
    // Arrange
    testing::init_test_setup();
    let listing = records(
        r#"[
            {"id": 3, "name": "For rent", "parentId": 2},
            {"id": 1, "name": "Real estate", "parentId": null},
            {"id": 2, "name": "Apartments", "parentId": 1},
            {"id": 4, "name": "Jobs"}
        ]"#,
    );

    // Act
    let forest = ForestBuilder::new()
        .keep_listing_order()
        .build(listing)
        .unwrap();

    // Assert
    assert_eq!(forest.len(), 2);
    assert_eq!(ids(&forest), vec![(1, 0), (2, 1), (3, 2), (4, 0)]);
    assert!(forest[1].children.is_fetched());
    assert!(!forest[1].has_children());
}

#[test]
fn given_sort_order_when_building_then_siblings_ordered() {
    // Arrange
    let listing = vec![
        Category::new(1, "root"),
        Category::new(12, "second").with_parent(1).with_sort_order(2),
        Category::new(11, "first").with_parent(1).with_sort_order(1),
        Category::new(2, "other root").with_sort_order(-1),
    ];

    // Act
    let sorted = ForestBuilder::new().build(listing.clone()).unwrap();
    let kept = ForestBuilder::new()
        .keep_listing_order()
        .build(listing)
        .unwrap();

    // Assert
    assert_eq!(ids(&sorted), vec![(2, 0), (1, 0), (11, 1), (12, 1)]);
    assert_eq!(ids(&kept), vec![(1, 0), (12, 1), (11, 1), (2, 0)]);
}

#[test]
fn given_wordpress_parent_zero_when_building_then_top_level() {
    // Arrange
    let listing = records(
        r#"[
            {"id": 7, "name": "Vehicles", "parent": 0},
            {"id": 8, "name": "Cars", "parent": 7}
        ]"#,
    );

    // Act
    let forest = ForestBuilder::new().build(listing).unwrap();

    // Assert
    assert_eq!(ids(&forest), vec![(7, 0), (8, 1)]);
    assert_eq!(forest[0].parent_id, None);
}

#[test]
fn given_unknown_parent_when_building_then_orphan_becomes_top_level() {
    testing::init_test_setup();
    let listing = vec![Category::new(1, "root"), Category::new(5, "orphan").with_parent(99)];

    let forest = ForestBuilder::new().keep_listing_order().build(listing).unwrap();

    assert_eq!(ids(&forest), vec![(1, 0), (5, 0)]);
    assert_eq!(forest[1].parent_id, None);
    assert_eq!(validate_structure(&forest), Ok(()));
}

#[test]
fn given_duplicate_id_when_building_then_rejected() {
    let listing = vec![Category::new(1, "a"), Category::new(1, "b")];

    assert_eq!(
        ForestBuilder::new().build(listing),
        Err(DomainError::DuplicateId(1))
    );
}

#[test]
fn given_parent_id_loop_when_building_then_cycle_detected() {
    // 1 -> 2 -> 3 -> 1, plus an unrelated root
    let listing = vec![
        Category::new(9, "root"),
        Category::new(1, "a").with_parent(3),
        Category::new(2, "b").with_parent(1),
        Category::new(3, "c").with_parent(2),
    ];

    assert_eq!(
        ForestBuilder::new().build(listing),
        Err(DomainError::CycleDetected(1))
    );
}

#[test]
fn given_deep_flat_listing_when_building_then_kept_but_flatten_bounded() {
    // Arrange: five levels, deeper than the model allows
    testing::init_test_setup();
    let listing = (1..=5)
        .map(|id| {
            let node = Category::new(id, format!("level {}", id - 1));
            if id > 1 {
                node.with_parent(id - 1)
            } else {
                node
            }
        })
        .collect();

    // Act
    let forest = ForestBuilder::new().build(listing).unwrap();

    // Assert
    assert_eq!(ids(&forest), vec![(1, 0), (2, 1), (3, 2)]);
    assert!(forest[0].children()[0].children()[0].has_children());
}

#[test]
fn given_empty_listing_when_building_then_empty_forest() {
    let forest = ForestBuilder::new().build(Vec::new()).unwrap();
    assert!(forest.is_empty());
}

// ============================================================
// load_forest
// ============================================================

#[test]
fn given_nested_listing_when_loading_then_taken_as_is() {
    // Arrange
    let listing = records(
        r#"[
            {"id": 1, "name": "Real estate", "children": [
                {"id": 2, "name": "Apartments", "parentId": 1, "children": []},
                {"id": 3, "name": "Land", "parentId": 1}
            ]},
            {"id": 4, "name": "Jobs", "children": null}
        ]"#,
    );

    // Act
    let forest = load_forest(&ForestBuilder::new(), listing.clone()).unwrap();

    // Assert
    assert_eq!(forest, listing);
    assert!(forest[0].children()[0].children.is_fetched());
    assert!(forest[0].children()[1].children.is_not_fetched());
    assert!(forest[1].children.is_not_fetched());
}

#[test]
fn given_nested_listing_with_wrong_parent_when_loading_then_mismatch() {
    let listing = records(
        r#"[
            {"id": 1, "name": "Real estate", "children": [
                {"id": 2, "name": "Apartments", "parentId": 5}
            ]}
        ]"#,
    );

    assert_eq!(
        load_forest(&ForestBuilder::new(), listing),
        Err(DomainError::ParentMismatch {
            child: 2,
            declared: 5,
            actual: 1
        })
    );
}

#[test]
fn given_flat_listing_when_loading_then_built() {
    let listing = vec![Category::new(2, "child").with_parent(1), Category::new(1, "root")];

    let forest = load_forest(&ForestBuilder::new(), listing).unwrap();

    assert_eq!(ids(&forest), vec![(1, 0), (2, 1)]);
}

#[test]
fn given_flat_listing_with_empty_children_arrays_when_loading_then_linked_by_parent_id() {
    // Arrange: WordPress-style records, every one carrying `children: []`
    let listing = records(
        r#"[
            {"id": 1, "name": "Real estate", "children": []},
            {"id": 2, "name": "Apartments", "parentId": 1, "children": []},
            {"id": 3, "name": "For rent", "parentId": 2, "children": []}
        ]"#,
    );

    // Act
    let forest = load_forest(&ForestBuilder::new(), listing).unwrap();

    // Assert
    assert_eq!(ids(&forest), vec![(1, 0), (2, 1), (3, 2)]);
}

#[test]
fn given_nested_listing_with_parented_top_level_record_when_loading_then_rejected() {
    let listing = records(
        r#"[
            {"id": 1, "name": "Real estate", "children": [
                {"id": 2, "name": "Apartments", "parentId": 1}
            ]},
            {"id": 3, "name": "For rent", "parentId": 2, "children": []}
        ]"#,
    );

    assert_eq!(
        load_forest(&ForestBuilder::new(), listing),
        Err(DomainError::DetachedTopLevel { id: 3, parent: 2 })
    );
}

// ============================================================
// Both listing shapes behave alike
// ============================================================

const DEEP_FLAT: &str = r#"[
    {"id": 1, "name": "level 0"},
    {"id": 2, "name": "level 1", "parentId": 1},
    {"id": 3, "name": "level 2", "parentId": 2},
    {"id": 4, "name": "level 3", "parentId": 3}
]"#;

const DEEP_NESTED: &str = r#"[
    {"id": 1, "name": "level 0", "children": [
        {"id": 2, "name": "level 1", "parentId": 1, "children": [
            {"id": 3, "name": "level 2", "parentId": 2, "children": [
                {"id": 4, "name": "level 3", "parentId": 3}
            ]}
        ]}
    ]}
]"#;

#[rstest]
#[case::flat(DEEP_FLAT)]
#[case::nested(DEEP_NESTED)]
fn given_four_level_listing_when_loading_then_kept_and_flatten_bounded(#[case] json: &str) {
    // Arrange
    testing::init_test_setup();
    let listing = records(json);

    // Act
    let forest = load_forest(&ForestBuilder::new(), listing).unwrap();

    // Assert
    assert_eq!(ids(&forest), vec![(1, 0), (2, 1), (3, 2)]);
    assert_eq!(
        validate_structure(&forest),
        Err(DomainError::DepthExceeded { id: 4, level: 3 })
    );
}

const SORT_FLAT: &str = r#"[
    {"id": 1, "name": "a", "sortOrder": 5},
    {"id": 12, "name": "a2", "parentId": 1, "sortOrder": 2},
    {"id": 11, "name": "a1", "parentId": 1, "sortOrder": 1},
    {"id": 2, "name": "b", "sortOrder": 1}
]"#;

const SORT_NESTED: &str = r#"[
    {"id": 1, "name": "a", "sortOrder": 5, "children": [
        {"id": 12, "name": "a2", "parentId": 1, "sortOrder": 2},
        {"id": 11, "name": "a1", "parentId": 1, "sortOrder": 1}
    ]},
    {"id": 2, "name": "b", "sortOrder": 1, "children": []}
]"#;

#[rstest]
#[case::flat(SORT_FLAT)]
#[case::nested(SORT_NESTED)]
fn given_sort_order_when_loading_either_shape_then_siblings_ordered(#[case] json: &str) {
    let forest = load_forest(&ForestBuilder::new(), records(json)).unwrap();

    assert_eq!(ids(&forest), vec![(2, 0), (1, 0), (11, 1), (12, 1)]);
}

#[test]
fn given_nested_listing_and_listing_order_when_loading_then_unsorted() {
    let listing = records(
        r#"[{"id": 1, "name": "a", "sortOrder": 5, "children": []},
            {"id": 2, "name": "b", "sortOrder": 1, "children": [
                {"id": 3, "name": "c", "parentId": 2}
            ]}]"#,
    );

    let forest = load_forest(&ForestBuilder::new().keep_listing_order(), listing).unwrap();

    assert_eq!(ids(&forest), vec![(1, 0), (2, 0), (3, 1)]);
}
