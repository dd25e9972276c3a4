//! Unit tests for folder tree integrity: move validation, breadcrumbs and
//! subtree queries.

use markshelf::managers::folder_tree::{
    breadcrumb_path, descendants_of, is_same_or_descendant, root_folders, subfolders_of,
    validate_move, ExpansionState,
};
use markshelf::types::bookmark::{Folder, ROOT_FOLDER_ID};
use markshelf::types::errors::OrganizerError;
use rstest::{fixture, rstest};

fn folder(id: &str, parent: Option<&str>) -> Folder {
    Folder {
        id: id.to_string(),
        name: id.to_uppercase(),
        icon: "folder".to_string(),
        color: None,
        parent_id: parent.map(str::to_string),
    }
}

/// all ─┬─ work ── clients ── acme
///      ├─ tech
///      └─ legacy (no parent)
#[fixture]
fn tree() -> Vec<Folder> {
    vec![
        folder(ROOT_FOLDER_ID, None),
        folder("work", Some(ROOT_FOLDER_ID)),
        folder("clients", Some("work")),
        folder("acme", Some("clients")),
        folder("tech", Some(ROOT_FOLDER_ID)),
        folder("legacy", None),
    ]
}

fn ids(folders: &[Folder]) -> Vec<&str> {
    folders.iter().map(|f| f.id.as_str()).collect()
}

#[rstest]
#[case("tech", "work")]
#[case("acme", "tech")]
#[case("acme", ROOT_FOLDER_ID)]
#[case("clients", "legacy")]
fn test_valid_moves(tree: Vec<Folder>, #[case] dragged: &str, #[case] target: &str) {
    assert_eq!(validate_move(&tree, dragged, target), Ok(()));
}

#[rstest]
#[case("work", "clients")]
#[case("work", "acme")]
#[case("clients", "acme")]
fn test_moves_into_own_subtree_are_cycles(tree: Vec<Folder>, #[case] dragged: &str, #[case] target: &str) {
    assert_eq!(
        validate_move(&tree, dragged, target),
        Err(OrganizerError::CycleDetected {
            dragged: dragged.to_string(),
            target: target.to_string(),
        })
    );
}

#[rstest]
fn test_move_onto_self_rejected(tree: Vec<Folder>) {
    assert_eq!(
        validate_move(&tree, "work", "work"),
        Err(OrganizerError::SameFolder("work".to_string()))
    );
}

#[rstest]
fn test_root_cannot_be_dragged(tree: Vec<Folder>) {
    assert_eq!(
        validate_move(&tree, ROOT_FOLDER_ID, "tech"),
        Err(OrganizerError::RootFolderImmutable)
    );
}

#[rstest]
fn test_unknown_folders_rejected(tree: Vec<Folder>) {
    assert_eq!(
        validate_move(&tree, "ghost", "tech"),
        Err(OrganizerError::NotFound("ghost".to_string()))
    );
    assert_eq!(
        validate_move(&tree, "tech", "ghost"),
        Err(OrganizerError::NotFound("ghost".to_string()))
    );
}

#[rstest]
fn test_descendant_check_walks_up(tree: Vec<Folder>) {
    assert!(is_same_or_descendant(&tree, "acme", "work"));
    assert!(is_same_or_descendant(&tree, "work", "work"));
    assert!(!is_same_or_descendant(&tree, "tech", "work"));
    assert!(!is_same_or_descendant(&tree, "work", "acme"));
}

#[test]
fn test_corrupted_parent_loop_terminates() {
    let looped = vec![folder("a", Some("b")), folder("b", Some("a")), folder("c", Some(ROOT_FOLDER_ID))];
    assert!(!is_same_or_descendant(&looped, "a", "c"));
    assert_eq!(validate_move(&looped, "c", "a"), Ok(()));
    assert_eq!(breadcrumb_path(&looped, "a").len(), 2);
}

#[rstest]
fn test_breadcrumbs_top_down_without_root(tree: Vec<Folder>) {
    assert_eq!(ids(&breadcrumb_path(&tree, "acme")), vec!["work", "clients", "acme"]);
    assert_eq!(ids(&breadcrumb_path(&tree, "tech")), vec!["tech"]);
    assert!(breadcrumb_path(&tree, ROOT_FOLDER_ID).is_empty());
    assert!(breadcrumb_path(&tree, "ghost").is_empty());
}

#[rstest]
fn test_root_folders_include_parentless(tree: Vec<Folder>) {
    assert_eq!(ids(&root_folders(&tree)), vec!["work", "tech", "legacy"]);
}

#[rstest]
fn test_subfolders_are_direct_children_only(tree: Vec<Folder>) {
    assert_eq!(ids(&subfolders_of(&tree, "work")), vec!["clients"]);
    assert!(subfolders_of(&tree, "acme").is_empty());
}

#[rstest]
fn test_descendants_cover_whole_subtree(tree: Vec<Folder>) {
    assert_eq!(ids(&descendants_of(&tree, "work")), vec!["clients", "acme"]);
}

#[rstest]
fn test_toggle_all_expands_parents_then_collapses(tree: Vec<Folder>) {
    let mut expansion = ExpansionState::new();
    expansion.toggle_all(&tree);
    let open: Vec<&str> = expansion.expanded_ids().collect();
    assert_eq!(open, vec!["clients", "work"]);

    expansion.toggle_all(&tree);
    assert!(expansion.is_empty());
}

#[rstest]
fn test_reveal_expands_parent_except_root(tree: Vec<Folder>) {
    let mut expansion = ExpansionState::new();
    expansion.reveal(&tree, "tech");
    assert!(expansion.is_empty());
    expansion.reveal(&tree, "acme");
    assert!(expansion.is_expanded("clients"));
    assert!(!expansion.is_expanded("work"));
}

#[test]
fn test_toggle_single_folder() {
    let mut expansion = ExpansionState::new();
    assert!(expansion.toggle("work"));
    assert!(!expansion.toggle("work"));
    assert_eq!(expansion.len(), 0);
}
