//! Page tree editing for a church website builder.
//!
//! A [`Tree`](model::Tree) of pages and folders is edited through a
//! [`DragController`](drag::DragController): drag gestures nest, un-nest and
//! reorder nodes, with nesting applied live and reordering committed on drop.
//! The structural edits themselves are pure functions in [`ops::tree_ops`].

pub mod cli;
pub mod drag;
pub mod io;
pub mod model;
pub mod ops;
