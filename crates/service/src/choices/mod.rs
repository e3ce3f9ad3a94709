//! Rows from the relational store that feed form choices.
//!
//! Same split as the other service modules: domain types, a repository
//! trait, and a SeaORM implementation behind it.

pub mod domain;
pub mod repository;
pub mod repo;

pub use domain::{BuildServiceEntry, TokenEntry};
pub use repository::ChoiceSource;
