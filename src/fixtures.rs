//! Shared JSON documents for unit tests.

use serde_json::{Value, json};

/// Monolayer MoS2 as exported by pymatgen's `Structure.as_dict()`.
pub fn mos2_dict() -> Value {
    json!({
        "@module": "pymatgen.core.structure",
        "@class": "Structure",
        "charge": 0,
        "lattice": {
            "matrix": [
                [1.5957990235943282, -2.764004284915705, 0.0],
                [1.5957990235946695, 2.7640042849149173, 0.0],
                [0.0, 0.0, 12.47890117404454]
            ],
            "pbc": [true, true, true]
        },
        "properties": {},
        "sites": [
            {"species": [{"element": "Mo", "occu": 1}], "abc": [0.6666666666666666, 0.3333333333333333, 0.25], "label": "Mo"},
            {"species": [{"element": "Mo", "occu": 1}], "abc": [0.3333333333333333, 0.6666666666666666, 0.75], "label": "Mo"},
            {"species": [{"element": "S", "occu": 1}], "abc": [0.3333333333333333, 0.6666666666666666, 0.12445], "label": "S"},
            {"species": [{"element": "S", "occu": 1}], "abc": [0.6666666666666666, 0.3333333333333333, 0.62445], "label": "S"},
            {"species": [{"element": "S", "occu": 1}], "abc": [0.3333333333333333, 0.6666666666666666, 0.37555], "label": "S"},
            {"species": [{"element": "S", "occu": 1}], "abc": [0.6666666666666666, 0.3333333333333333, 0.87555], "label": "S"}
        ]
    })
}

/// Rock-salt NaCl primitive cell.
pub fn nacl_dict() -> Value {
    json!({
        "lattice": {"matrix": [[0.0, 2.82, 2.82], [2.82, 0.0, 2.82], [2.82, 2.82, 0.0]]},
        "sites": [
            {"species": [{"element": "Na", "occu": 1}], "abc": [0.0, 0.0, 0.0]},
            {"species": [{"element": "Cl", "occu": 1}], "abc": [0.5, 0.5, 0.5]}
        ]
    })
}
