//! Crystal structure data model.
//!
//! - [`types`] – Periodic table elements.
//! - [`lattice`] – Periodic cell with fractional/Cartesian conversion.
//! - [`site`] – Species, occupancies and fractional positions.
//! - [`structure`] – A lattice together with its sites.
//!
//! These types are what the [`crate::io`] readers reconstruct from JSON
//! exports and what the POSCAR writer serializes. The conversion pipeline in
//! [`crate::convert`] never looks inside them; it only hands them from one
//! side of the codec to the other.

pub mod lattice;
pub mod site;
pub mod structure;
pub mod types;
