use std::fmt;

use super::types::Element;

/// Occupancies within this distance of 1 count as fully occupied.
const OCCUPANCY_EPS: f64 = 1e-8;

#[derive(Debug, Clone, PartialEq)]
pub struct Species {
    pub element: Element,
    pub oxidation_state: Option<f64>,
}

impl Species {
    pub fn new(element: Element) -> Self {
        Self {
            element,
            oxidation_state: None,
        }
    }

    pub fn with_oxidation_state(element: Element, oxidation_state: f64) -> Self {
        Self {
            element,
            oxidation_state: Some(oxidation_state),
        }
    }
}

impl fmt::Display for Species {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.element.symbol())?;
        if let Some(oxi) = self.oxidation_state {
            let sign = if oxi < 0.0 { '-' } else { '+' };
            write!(f, "{}{}", format_amount(oxi.abs()), sign)?;
        }
        Ok(())
    }
}

/// Formats a count or charge without a trailing `.0` for whole numbers.
pub(crate) fn format_amount(value: f64) -> String {
    if (value - value.round()).abs() < OCCUPANCY_EPS {
        format!("{}", value.round() as i64)
    } else {
        format!("{}", value)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Site {
    pub species: Vec<(Species, f64)>,
    pub frac_coords: [f64; 3],
    pub label: Option<String>,
}

impl Site {
    pub fn new(species: Species, frac_coords: [f64; 3]) -> Self {
        Self {
            species: vec![(species, 1.0)],
            frac_coords,
            label: None,
        }
    }

    /// A single species at full occupancy.
    pub fn is_ordered(&self) -> bool {
        matches!(self.species.as_slice(), [(_, occu)] if (occu - 1.0).abs() < OCCUPANCY_EPS)
    }

    /// The dominant species, i.e. the one with the largest occupancy.
    pub fn specie(&self) -> Option<&Species> {
        self.species
            .iter()
            .max_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(s, _)| s)
    }
}
