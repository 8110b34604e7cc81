use crate::io::{Format, error::Error};
use crate::model::{
    lattice::Lattice,
    site::{Site, Species},
    structure::Structure,
    types::Element,
};
use std::io::BufRead;
use std::str::FromStr;

/// Reads a VASP 5 POSCAR (with a species row) into a [`Structure`].
///
/// VASP 4 files, which carry no species names, are rejected since the
/// elements cannot be recovered from the file alone.
pub fn read<R: BufRead>(reader: R) -> Result<Structure, Error> {
    let mut lines = Lines::new(reader);

    lines.next_line("comment line")?;

    let (scale_ln, scale_line) = lines.next_line("scale factor")?;
    let scale = parse_f64(first_token(&scale_line), scale_ln, "scale factor")?;
    if scale == 0.0 {
        return Err(Error::parse(Format::Poscar, scale_ln, "scale factor must be non-zero"));
    }

    let mut matrix = [[0.0; 3]; 3];
    for row in matrix.iter_mut() {
        let (ln, line) = lines.next_line("lattice vector")?;
        *row = parse_vec3(&line, ln, "lattice vector")?;
    }

    let unscaled = Lattice::new(matrix)?;
    let factor = if scale > 0.0 {
        scale
    } else {
        (scale.abs() / unscaled.volume()).cbrt()
    };
    let lattice = Lattice::new(matrix.map(|row| row.map(|v| v * factor)))?;

    let (sym_ln, sym_line) = lines.next_line("species names")?;
    if first_token(&sym_line).parse::<usize>().is_ok() {
        return Err(Error::parse(
            Format::Poscar,
            sym_ln,
            "VASP 4 files without a species row are not supported",
        ));
    }
    let elements = sym_line
        .split_whitespace()
        .map(|tok| parse_symbol(tok, sym_ln))
        .collect::<Result<Vec<_>, _>>()?;

    let (count_ln, count_line) = lines.next_line("species counts")?;
    let counts = count_line
        .split_whitespace()
        .map(|tok| {
            tok.parse::<usize>()
                .map_err(|_| Error::parse(Format::Poscar, count_ln, "invalid species count"))
        })
        .collect::<Result<Vec<_>, _>>()?;
    if counts.len() != elements.len() {
        return Err(Error::parse(
            Format::Poscar,
            count_ln,
            format!(
                "{} species names but {} counts",
                elements.len(),
                counts.len()
            ),
        ));
    }

    let (mut mode_ln, mut mode_line) = lines.next_line("coordinate mode")?;
    if mode_line.trim_start().starts_with(['s', 'S']) {
        (mode_ln, mode_line) = lines.next_line("coordinate mode")?;
    }
    let cartesian = match mode_line.trim_start().chars().next() {
        Some('c' | 'C' | 'k' | 'K') => true,
        Some('d' | 'D') => false,
        _ => {
            return Err(Error::parse(
                Format::Poscar,
                mode_ln,
                "expected 'Direct' or 'Cartesian'",
            ));
        }
    };

    let total: usize = counts.iter().sum();
    let mut sites = Vec::with_capacity(total);
    for (element, count) in elements.iter().zip(&counts) {
        for _ in 0..*count {
            let (ln, line) = lines.next_line("atomic position")?;
            let coords = parse_vec3(&line, ln, "atomic position")?;
            let frac_coords = if cartesian {
                lattice.to_fractional(coords.map(|v| v * factor))
            } else {
                coords
            };
            sites.push(Site::new(Species::new(*element), frac_coords));
        }
    }

    Ok(Structure::new(lattice, sites))
}

struct Lines<R> {
    inner: std::io::Lines<R>,
    line_no: usize,
}

impl<R: BufRead> Lines<R> {
    fn new(reader: R) -> Self {
        Self {
            inner: reader.lines(),
            line_no: 0,
        }
    }

    fn next_line(&mut self, expected: &str) -> Result<(usize, String), Error> {
        self.line_no += 1;
        match self.inner.next() {
            Some(line) => Ok((self.line_no, line?)),
            None => Err(Error::parse(
                Format::Poscar,
                self.line_no,
                format!("file ended before {expected}"),
            )),
        }
    }
}

fn first_token(line: &str) -> &str {
    line.split_whitespace().next().unwrap_or("")
}

fn parse_f64(token: &str, line_no: usize, what: &str) -> Result<f64, Error> {
    token
        .parse::<f64>()
        .map_err(|_| Error::parse(Format::Poscar, line_no, format!("invalid {what}")))
}

fn parse_vec3(line: &str, line_no: usize, what: &str) -> Result<[f64; 3], Error> {
    let tokens: Vec<&str> = line.split_whitespace().take(3).collect();
    if tokens.len() < 3 {
        return Err(Error::parse(
            Format::Poscar,
            line_no,
            format!("{what} needs three components"),
        ));
    }
    Ok([
        parse_f64(tokens[0], line_no, what)?,
        parse_f64(tokens[1], line_no, what)?,
        parse_f64(tokens[2], line_no, what)?,
    ])
}

/// Accepts POTCAR-style decorations such as `Mo_pv` or `S/1a2b3c`.
fn parse_symbol(token: &str, line_no: usize) -> Result<Element, Error> {
    let bare = token.split(['_', '/']).next().unwrap_or(token);
    Element::from_str(bare).map_err(|e| Error::parse(Format::Poscar, line_no, e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    const MOS2_CARTESIAN: &str = "Mo2S4
1.0
1.5957990235943282 -2.764004284915705 0.0
1.5957990235946695 2.7640042849149173 0.0
0.0 0.0 12.47890117404454
Mo S
2 4
Cartesian
1.5958 -0.9213351759999822 3.119725
1.5958 0.9213351759999822 9.359175
1.5958 0.9213351759999822 1.553025569564048
1.5958 -0.9213351759999822 7.792475569561349
1.5958 0.9213351759999822 4.686424430434634
1.5958 -0.9213351759999822 10.92587443043865
";

    #[test]
    fn reads_cartesian_poscar() {
        let structure = read(Cursor::new(MOS2_CARTESIAN)).expect("read poscar");
        assert_eq!(structure.site_count(), 6);
        assert_eq!(structure.formula(), "Mo2 S4");
        let z = structure.sites[0].frac_coords[2];
        assert!((z - 0.25).abs() < 1e-6);
    }

    #[test]
    fn skips_selective_dynamics_line() {
        let text = "Si\n1.0\n5.43 0 0\n0 5.43 0\n0 0 5.43\nSi\n1\nSelective dynamics\nDirect\n0.0 0.0 0.0 T T T\n";
        let structure = read(Cursor::new(text)).expect("read poscar");
        assert_eq!(structure.site_count(), 1);
    }

    #[test]
    fn negative_scale_sets_volume() {
        let text = "Si\n-8.0\n1 0 0\n0 1 0\n0 0 1\nSi\n1\nDirect\n0 0 0\n";
        let structure = read(Cursor::new(text)).expect("read poscar");
        assert!((structure.lattice.volume() - 8.0).abs() < 1e-9);
    }

    #[test]
    fn strips_potcar_decorations() {
        let text = "x\n1.0\n3 0 0\n0 3 0\n0 0 3\nMo_pv S/abc123\n1 1\nDirect\n0 0 0\n0.5 0.5 0.5\n";
        let structure = read(Cursor::new(text)).expect("read poscar");
        assert_eq!(structure.species_runs(), vec![(Element::Mo, 1), (Element::S, 1)]);
    }

    #[test]
    fn rejects_vasp4_layout() {
        let text = "Si\n1.0\n5.43 0 0\n0 5.43 0\n0 0 5.43\n1\nDirect\n0 0 0\n";
        let err = read(Cursor::new(text)).unwrap_err();
        assert!(matches!(err, Error::Parse { line: 6, .. }));
    }

    #[test]
    fn rejects_truncated_positions() {
        let text = "Si\n1.0\n5.43 0 0\n0 5.43 0\n0 0 5.43\nSi\n2\nDirect\n0 0 0\n";
        let err = read(Cursor::new(text)).unwrap_err();
        assert!(err.to_string().contains("file ended before atomic position"));
    }
}
