//! Domain entities (spec.md §3). Each module owns one entity (or a small
//! family of closely related ones) plus the validators named in
//! spec.md §4.2.

pub mod enums;
pub mod external;
pub mod family;
pub mod genus;
pub mod geography;
pub mod lookup;
pub mod note;
pub mod species;
pub mod synonym;
pub mod vernacular;
