pub mod extract;
pub mod symbols;
