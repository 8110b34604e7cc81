//! Batch conversion of JSON crystal-structure exports into POSCAR geometry
//! files and a scalar-label table for structure-property model training.
//!
//! # Features
//!
//! - **Two export layouts** — nested relaxation trajectories
//!   (`{group: [{steps: [{structure, energy}]}]}`) and flat materials
//!   records (`{entries: [{structure, data: {...}}]}`)
//! - **Structure reconstruction** — pymatgen `Structure.as_dict()` mappings
//!   rebuilt into a typed [`Structure`]
//! - **POSCAR I/O** — VASP 5 writer with pymatgen-compatible layout, plus a
//!   reader for checking what was written
//! - **Label extraction** — per-step energies or the minimum of the direct
//!   and indirect band gaps, written to a headerless `id_prop.csv`
//! - **Shared naming** — geometry and label passes derive filenames through
//!   one deterministic function, so label rows always match geometry files
//!
//! # Quick Start
//!
//! ```
//! use poscar_forge::io::{read_structure_dict, write_poscar};
//! use serde_json::json;
//!
//! let dict = json!({
//!     "lattice": {"matrix": [[0.0, 2.82, 2.82], [2.82, 0.0, 2.82], [2.82, 2.82, 0.0]]},
//!     "sites": [
//!         {"species": [{"element": "Na", "occu": 1}], "abc": [0.0, 0.0, 0.0]},
//!         {"species": [{"element": "Cl", "occu": 1}], "abc": [0.5, 0.5, 0.5]}
//!     ]
//! });
//!
//! let structure = read_structure_dict(&dict)?;
//! assert_eq!(structure.site_count(), 2);
//!
//! let mut poscar = Vec::new();
//! write_poscar(&mut poscar, &structure)?;
//! let text = String::from_utf8(poscar).unwrap();
//! assert!(text.lines().any(|line| line.trim() == "Na Cl"));
//! # Ok::<(), poscar_forge::io::Error>(())
//! ```
//!
//! Whole directories are converted with [`convert::convert_geometry`] and
//! [`convert::convert_labels`], or record by record with
//! [`convert::GeometryEmitter`] and [`convert::LabelEmitter`].
//!
//! # Module Organization
//!
//! - [`io`] — Structure readers and writers (pymatgen JSON, POSCAR)
//! - [`convert`] — Input discovery, traversals, naming, and the emitters

mod model;

pub mod convert;
pub mod io;

#[cfg(test)]
mod fixtures;

pub use model::lattice::{Lattice, LatticeError};
pub use model::site::{Site, Species};
pub use model::structure::Structure;
pub use model::types::{Element, ParseElementError};
