pub mod operation;
pub mod statement;
