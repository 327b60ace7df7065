//! Statement templates for bulk actions: `${variable}` expansion against a table,
//! with identifiers quoted by a [`dialect::Dialect`].

pub mod dialect;
pub mod error;
pub mod renderer;
pub mod template;
