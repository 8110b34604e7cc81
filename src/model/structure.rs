use super::lattice::Lattice;
use super::site::{Site, format_amount};
use super::types::Element;

/// A periodic crystal: one lattice plus the sites it contains.
#[derive(Debug, Clone, PartialEq)]
pub struct Structure {
    pub lattice: Lattice,
    pub sites: Vec<Site>,
    pub charge: f64,
}

impl Structure {
    pub fn new(lattice: Lattice, sites: Vec<Site>) -> Self {
        Self {
            lattice,
            sites,
            charge: 0.0,
        }
    }

    #[inline]
    pub fn site_count(&self) -> usize {
        self.sites.len()
    }

    pub fn is_ordered(&self) -> bool {
        self.sites.iter().all(Site::is_ordered)
    }

    /// Element amounts in order of first appearance, e.g. `Mo2 S4`.
    pub fn formula(&self) -> String {
        let mut amounts: Vec<(Element, f64)> = Vec::new();
        for (species, occu) in self.sites.iter().flat_map(|s| s.species.iter()) {
            match amounts.iter_mut().find(|(el, _)| *el == species.element) {
                Some((_, total)) => *total += occu,
                None => amounts.push((species.element, *occu)),
            }
        }

        amounts
            .iter()
            .map(|(el, amount)| format!("{}{}", el.symbol(), format_amount(*amount)))
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Consecutive runs of the same element, as listed in a POSCAR header.
    ///
    /// Sites are not reordered, so an element that appears in two separate
    /// blocks yields two runs.
    pub fn species_runs(&self) -> Vec<(Element, usize)> {
        let mut runs: Vec<(Element, usize)> = Vec::new();
        for element in self.sites.iter().filter_map(|s| s.specie()).map(|s| s.element) {
            match runs.last_mut() {
                Some((last, count)) if *last == element => *count += 1,
                _ => runs.push((element, 1)),
            }
        }
        runs
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::site::Species;

    fn mos2() -> Structure {
        let lattice =
            Lattice::new([[3.19, 0.0, 0.0], [-1.595, 2.7626, 0.0], [0.0, 0.0, 12.48]]).unwrap();
        let sites = vec![
            Site::new(Species::new(Element::Mo), [0.0, 0.0, 0.25]),
            Site::new(Species::new(Element::Mo), [0.0, 0.0, 0.75]),
            Site::new(Species::new(Element::S), [1.0 / 3.0, 2.0 / 3.0, 0.12]),
            Site::new(Species::new(Element::S), [1.0 / 3.0, 2.0 / 3.0, 0.38]),
            Site::new(Species::new(Element::S), [2.0 / 3.0, 1.0 / 3.0, 0.62]),
            Site::new(Species::new(Element::S), [2.0 / 3.0, 1.0 / 3.0, 0.88]),
        ];
        Structure::new(lattice, sites)
    }

    #[test]
    fn formula_follows_first_appearance() {
        assert_eq!(mos2().formula(), "Mo2 S4");
    }

    #[test]
    fn species_runs_group_consecutive_sites() {
        assert_eq!(mos2().species_runs(), vec![(Element::Mo, 2), (Element::S, 4)]);

        let mut interleaved = mos2();
        interleaved.sites.swap(1, 2);
        assert_eq!(
            interleaved.species_runs(),
            vec![(Element::Mo, 1), (Element::S, 1), (Element::Mo, 1), (Element::S, 3)]
        );
    }

    #[test]
    fn formula_sums_fractional_occupancies() {
        let mut structure = mos2();
        structure.sites[0].species = vec![
            (Species::new(Element::Mo), 0.5),
            (Species::new(Element::W), 0.5),
        ];
        assert_eq!(structure.formula(), "Mo1.5 W0.5 S4");
        assert!(!structure.is_ordered());
    }
}
