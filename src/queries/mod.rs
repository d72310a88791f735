//! Persistence-facing CRUD and search execution, one module per entity
//! (spec.md §6 "Entity CRUD with the validation rules of §4.2").

pub mod family;
pub mod genus;
pub mod geography;
pub mod search;
pub mod species;
