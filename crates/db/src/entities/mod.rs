//! Database entities.

pub mod nomination;

pub use nomination::Entity as Nomination;
