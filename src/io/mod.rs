//! Structure reconstruction and geometry-file serialization.
//!
//! The conversion pipeline treats a structure as an opaque value that can be
//! rebuilt from its JSON dictionary and written to disk. [`StructureCodec`] is
//! that seam; [`PoscarCodec`] implements it with the pymatgen dictionary
//! reader and the VASP 5 POSCAR writer found in this module.

use std::fmt;
use std::io::{BufRead, Write};
use std::path::Path;

use serde_json::Value;

use crate::model::structure::Structure;

pub mod error;

pub use error::Error;

mod pymatgen {
    pub mod reader;
}

mod poscar {
    pub mod reader;
    pub mod writer;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Pymatgen,
    Poscar,
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Format::Pymatgen => write!(f, "pymatgen"),
            Format::Poscar => write!(f, "POSCAR"),
        }
    }
}

/// Rebuilds a [`Structure`] from a pymatgen `Structure.as_dict()` value.
pub fn read_structure_dict(dict: &Value) -> Result<Structure, Error> {
    pymatgen::reader::read(dict)
}

pub fn read_poscar<R: BufRead>(reader: R) -> Result<Structure, Error> {
    poscar::reader::read(reader)
}

pub fn write_poscar<W: Write>(writer: W, structure: &Structure) -> Result<(), Error> {
    poscar::writer::write(writer, structure)
}

pub(crate) use pymatgen::reader::kind as json_kind;

/// The two operations the emitters need from a structure backend.
pub trait StructureCodec {
    fn reconstruct(&self, dict: &Value) -> Result<Structure, Error>;

    fn serialize(&self, structure: &Structure, path: &Path) -> Result<(), Error>;
}

/// pymatgen dictionaries in, POSCAR files out.
#[derive(Debug, Clone, Copy, Default)]
pub struct PoscarCodec;

impl StructureCodec for PoscarCodec {
    fn reconstruct(&self, dict: &Value) -> Result<Structure, Error> {
        read_structure_dict(dict)
    }

    fn serialize(&self, structure: &Structure, path: &Path) -> Result<(), Error> {
        let mut buf = Vec::new();
        write_poscar(&mut buf, structure)?;
        std::fs::write(path, buf)?;
        Ok(())
    }
}
