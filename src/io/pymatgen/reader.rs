use std::str::FromStr;

use serde_json::{Map, Value};

use crate::io::{Format, error::Error};
use crate::model::{
    lattice::Lattice,
    site::{Site, Species},
    structure::Structure,
    types::Element,
};

/// Rebuilds a [`Structure`] from a pymatgen `Structure.as_dict()` mapping.
///
/// Only the fields needed to place atoms are read: `lattice.matrix`, each
/// site's `species` and coordinates, the optional site `label`, and the
/// optional top-level `charge`. Fractional `abc` coordinates take priority;
/// Cartesian `xyz` is converted through the lattice when `abc` is absent.
pub fn read(dict: &Value) -> Result<Structure, Error> {
    let root = as_object(dict, "$")?;

    let lattice = read_lattice(root)?;

    let sites_value = root
        .get("sites")
        .ok_or_else(|| schema("sites", "missing site list"))?;
    let sites_array = sites_value
        .as_array()
        .ok_or_else(|| schema("sites", format!("expected a list, found {}", kind(sites_value))))?;
    if sites_array.is_empty() {
        return Err(schema("sites", "structure has no sites"));
    }

    let sites = sites_array
        .iter()
        .enumerate()
        .map(|(i, site)| read_site(site, i, &lattice))
        .collect::<Result<Vec<_>, _>>()?;

    let charge = match root.get("charge") {
        None | Some(Value::Null) => 0.0,
        Some(v) => v
            .as_f64()
            .ok_or_else(|| schema("charge", format!("expected a number, found {}", kind(v))))?,
    };

    Ok(Structure {
        lattice,
        sites,
        charge,
    })
}

fn read_lattice(root: &Map<String, Value>) -> Result<Lattice, Error> {
    let lattice = root
        .get("lattice")
        .ok_or_else(|| schema("lattice", "missing lattice"))?;
    let lattice = as_object(lattice, "lattice")?;
    let matrix = lattice
        .get("matrix")
        .ok_or_else(|| schema("lattice.matrix", "missing lattice matrix"))?;
    let rows = matrix
        .as_array()
        .filter(|rows| rows.len() == 3)
        .ok_or_else(|| schema("lattice.matrix", "expected three lattice vectors"))?;

    let mut m = [[0.0; 3]; 3];
    for (i, row) in rows.iter().enumerate() {
        m[i] = read_vec3(row, &format!("lattice.matrix[{i}]"))?;
    }

    Ok(Lattice::new(m)?)
}

fn read_site(value: &Value, index: usize, lattice: &Lattice) -> Result<Site, Error> {
    let path = format!("sites[{index}]");
    let site = as_object(value, &path)?;

    let species_value = site
        .get("species")
        .ok_or_else(|| schema(&path, "missing species"))?;
    let species_list = species_value
        .as_array()
        .filter(|list| !list.is_empty())
        .ok_or_else(|| schema(format!("{path}.species"), "expected a non-empty list"))?;

    let species = species_list
        .iter()
        .enumerate()
        .map(|(j, sp)| read_species(sp, &format!("{path}.species[{j}]")))
        .collect::<Result<Vec<_>, _>>()?;

    let frac_coords = match (site.get("abc"), site.get("xyz")) {
        (Some(abc), _) => read_vec3(abc, &format!("{path}.abc"))?,
        (None, Some(xyz)) => lattice.to_fractional(read_vec3(xyz, &format!("{path}.xyz"))?),
        (None, None) => return Err(schema(&path, "missing coordinates ('abc' or 'xyz')")),
    };

    let label = site
        .get("label")
        .and_then(Value::as_str)
        .map(str::to_string);

    Ok(Site {
        species,
        frac_coords,
        label,
    })
}

fn read_species(value: &Value, path: &str) -> Result<(Species, f64), Error> {
    let entry = as_object(value, path)?;

    let symbol = entry
        .get("element")
        .and_then(Value::as_str)
        .ok_or_else(|| schema(path, "missing element symbol"))?;
    let element = Element::from_str(symbol).map_err(|e| schema(path, e.to_string()))?;

    let occupancy = match entry.get("occu") {
        None => 1.0,
        Some(v) => v
            .as_f64()
            .filter(|o| o.is_finite() && *o > 0.0)
            .ok_or_else(|| schema(format!("{path}.occu"), "expected a positive number"))?,
    };

    let oxidation_state = match entry.get("oxidation_state") {
        None | Some(Value::Null) => None,
        Some(v) => Some(v.as_f64().ok_or_else(|| {
            schema(format!("{path}.oxidation_state"), "expected a number")
        })?),
    };

    Ok((
        Species {
            element,
            oxidation_state,
        },
        occupancy,
    ))
}

fn read_vec3(value: &Value, path: &str) -> Result<[f64; 3], Error> {
    let items = value
        .as_array()
        .filter(|items| items.len() == 3)
        .ok_or_else(|| schema(path, "expected three numbers"))?;

    let mut out = [0.0; 3];
    for (k, item) in items.iter().enumerate() {
        out[k] = item
            .as_f64()
            .ok_or_else(|| schema(path, format!("component {k} is {}, not a number", kind(item))))?;
    }
    Ok(out)
}

fn as_object<'a>(value: &'a Value, path: &str) -> Result<&'a Map<String, Value>, Error> {
    value
        .as_object()
        .ok_or_else(|| schema(path, format!("expected an object, found {}", kind(value))))
}

fn schema(path: impl Into<String>, details: impl Into<String>) -> Error {
    Error::schema(Format::Pymatgen, path, details)
}

pub(crate) fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a list",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::mos2_dict;
    use serde_json::json;

    #[test]
    fn reads_pymatgen_dict() {
        let structure = read(&mos2_dict()).expect("read structure");
        assert_eq!(structure.site_count(), 6);
        assert_eq!(structure.formula(), "Mo2 S4");
        assert_eq!(structure.sites[0].label.as_deref(), Some("Mo"));
        assert_eq!(structure.sites[2].frac_coords[2], 0.12445);
        assert!(structure.is_ordered());
    }

    #[test]
    fn falls_back_to_cartesian_coordinates() {
        let dict = json!({
            "lattice": {"matrix": [[2.0, 0.0, 0.0], [0.0, 4.0, 0.0], [0.0, 0.0, 8.0]]},
            "sites": [{"species": [{"element": "Si", "occu": 1.0}], "xyz": [1.0, 1.0, 1.0]}]
        });
        let structure = read(&dict).expect("read structure");
        assert_eq!(structure.sites[0].frac_coords, [0.5, 0.25, 0.125]);
    }

    #[test]
    fn parsed_coordinates_are_correctly_rounded() {
        let text = r#"{
            "lattice": {"matrix": [
                [3.8069366128071636, 0.0, 0.0],
                [-1.9034683064035818, 3.296902419658153, 0.0],
                [0.0, 0.0, 1.4829037328432975]
            ]},
            "sites": [{
                "species": [{"element": "Mo", "occu": 1}],
                "abc": [0.3333333333333333, 0.6666666666666667, 0.1801793343883842]
            }]
        }"#;
        let dict: Value = serde_json::from_str(text).unwrap();
        let structure = read(&dict).expect("read structure");
        let matrix = structure.lattice.matrix();
        assert_eq!(matrix[0][0], 3.8069366128071636);
        assert_eq!(matrix[1][1], 3.296902419658153);
        assert_eq!(matrix[2][2], 1.4829037328432975);
        assert_eq!(
            structure.sites[0].frac_coords,
            [0.3333333333333333, 0.6666666666666667, 0.1801793343883842]
        );
    }

    #[test]
    fn reads_oxidation_states_and_partial_occupancy() {
        let dict = json!({
            "lattice": {"matrix": [[3.0, 0.0, 0.0], [0.0, 3.0, 0.0], [0.0, 0.0, 3.0]]},
            "sites": [{
                "species": [
                    {"element": "Fe", "occu": 0.5, "oxidation_state": 2},
                    {"element": "Ni", "occu": 0.5, "oxidation_state": 2}
                ],
                "abc": [0.0, 0.0, 0.0]
            }]
        });
        let structure = read(&dict).expect("read structure");
        let site = &structure.sites[0];
        assert_eq!(site.species.len(), 2);
        assert_eq!(site.species[0].0.to_string(), "Fe2+");
        assert!(!structure.is_ordered());
    }

    #[test]
    fn rejects_missing_lattice() {
        let err = read(&json!({"sites": []})).unwrap_err();
        assert!(matches!(err, Error::Schema { ref path, .. } if path == "lattice"));
    }

    #[test]
    fn rejects_unknown_element_with_site_path() {
        let mut dict = mos2_dict();
        dict["sites"][3]["species"][0]["element"] = json!("Xx");
        let err = read(&dict).unwrap_err();
        match err {
            Error::Schema { path, details, .. } => {
                assert_eq!(path, "sites[3].species[0]");
                assert!(details.contains("'Xx'"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn rejects_singular_lattice() {
        let mut dict = mos2_dict();
        dict["lattice"]["matrix"][2] = json!([0.0, 0.0, 0.0]);
        assert!(matches!(read(&dict).unwrap_err(), Error::Lattice(_)));
    }

    #[test]
    fn rejects_structure_without_sites() {
        let mut dict = mos2_dict();
        dict["sites"] = json!([]);
        let err = read(&dict).unwrap_err();
        assert!(err.to_string().contains("no sites"));
    }

    #[test]
    fn rejects_non_numeric_coordinate() {
        let mut dict = mos2_dict();
        dict["sites"][0]["abc"][1] = json!("0.5");
        let err = read(&dict).unwrap_err();
        assert!(err.to_string().contains("sites[0].abc"));
    }
}
