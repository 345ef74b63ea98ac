pub mod aggregate;
pub mod coverage;
pub mod data;
pub mod favorite;
pub mod outcomes;
