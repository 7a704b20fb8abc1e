mod clean;
mod options;
mod pdf_text;
mod pipeline;
mod questions;
mod run;
mod segment;
mod sql;
mod symbols;

pub use run::run;
pub use symbols::SymbolTable;
