pub mod describe;
pub mod mutate;
pub mod query;
