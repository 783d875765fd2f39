pub mod cd;
pub mod registry;
