pub mod bulk;
pub mod chain;
pub mod commands;
pub mod connection;
pub mod error;
pub mod ordering;
pub mod registry;
pub mod sink;

#[cfg(test)]
pub(crate) mod test_support;
