// Markshelf state managers
// The organizer owns the entity store and view state; the rest are pure helpers it drives.

pub mod entity_store;
pub mod folder_tree;
pub mod mutation;
pub mod organizer;
pub mod view_state;
