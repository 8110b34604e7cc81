use crate::io::{Format, error::Error};
use crate::model::structure::Structure;
use std::io::Write;

pub fn write<W: Write>(mut writer: W, structure: &Structure) -> Result<(), Error> {
    if !structure.is_ordered() {
        return Err(Error::DisorderedStructure(Format::Poscar));
    }

    let lattice = if structure.lattice.determinant() < 0.0 {
        structure.lattice.negated()
    } else {
        structure.lattice.clone()
    };

    let runs = structure.species_runs();

    writeln!(writer, "{}", structure.formula())?;
    writeln!(writer, "1.0")?;
    for vector in lattice.matrix() {
        writeln!(writer, "{}", format_row(vector))?;
    }
    writeln!(
        writer,
        "{}",
        runs.iter()
            .map(|(el, _)| el.symbol())
            .collect::<Vec<_>>()
            .join(" ")
    )?;
    writeln!(
        writer,
        "{}",
        runs.iter()
            .map(|(_, n)| n.to_string())
            .collect::<Vec<_>>()
            .join(" ")
    )?;
    writeln!(writer, "direct")?;

    for site in &structure.sites {
        let species = site
            .specie()
            .map(|s| s.to_string())
            .unwrap_or_default();
        writeln!(writer, "{} {}", format_row(&site.frac_coords), species)?;
    }

    Ok(())
}

fn format_row(values: &[f64; 3]) -> String {
    values
        .iter()
        .map(|v| format!("{:21.16}", v))
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{mos2_dict, nacl_dict};
    use crate::io::{pymatgen, poscar::reader};
    use std::io::Cursor;

    fn render(structure: &Structure) -> String {
        let mut buf = Vec::new();
        write(&mut buf, structure).expect("write poscar");
        String::from_utf8(buf).expect("utf8")
    }

    #[test]
    fn writes_vasp5_layout() {
        let structure = pymatgen::reader::read(&mos2_dict()).unwrap();
        let text = render(&structure);
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines.len(), 8 + 6);
        assert_eq!(lines[0], "Mo2 S4");
        assert_eq!(lines[1], "1.0");
        assert_eq!(
            lines[2],
            "   1.5957990235943282   -2.7640042849157052    0.0000000000000000"
        );
        assert_eq!(lines[5], "Mo S");
        assert_eq!(lines[6], "2 4");
        assert_eq!(lines[7], "direct");
        assert_eq!(
            lines[8],
            "   0.6666666666666666    0.3333333333333333    0.2500000000000000 Mo"
        );
        assert!(text.ends_with(" S\n"));
    }

    #[test]
    fn flips_left_handed_lattice() {
        let mut dict = nacl_dict();
        dict["lattice"]["matrix"] = serde_json::json!([[0.0, 2.82, 2.82], [2.82, 2.82, 0.0], [2.82, 0.0, 2.82]]);
        let structure = pymatgen::reader::read(&dict).unwrap();
        assert!(structure.lattice.determinant() < 0.0);

        let text = render(&structure);
        let row = text.lines().nth(2).unwrap();
        assert!(row.trim_start().starts_with("-0.0000000000000000"));
        assert!(row.contains("-2.8199999999999998"));
    }

    #[test]
    fn rejects_disordered_structure() {
        let mut dict = nacl_dict();
        dict["sites"][0]["species"] = serde_json::json!([
            {"element": "Na", "occu": 0.5},
            {"element": "K", "occu": 0.5}
        ]);
        let structure = pymatgen::reader::read(&dict).unwrap();
        let err = write(Vec::new(), &structure).unwrap_err();
        assert!(matches!(err, Error::DisorderedStructure(Format::Poscar)));
    }

    #[test]
    fn writes_and_reads_roundtrip() {
        let structure = pymatgen::reader::read(&mos2_dict()).unwrap();
        let text = render(&structure);
        let parsed = reader::read(Cursor::new(text)).expect("read poscar");

        assert_eq!(parsed.site_count(), structure.site_count());
        assert_eq!(parsed.species_runs(), structure.species_runs());
        for (a, b) in structure.sites.iter().zip(parsed.sites.iter()) {
            for k in 0..3 {
                assert!((a.frac_coords[k] - b.frac_coords[k]).abs() < 1e-12);
            }
        }
    }
}
