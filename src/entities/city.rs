// 🏙️ City Entity - immutable reference data for the domestic engine
//
// One record per city, loaded once and never mutated.
// Rates are fractions (0.093 = 9.3%), rents are monthly medians,
// cost_index is relative to the national baseline (100).

use crate::entities::household::BedroomType;
use crate::money::round_half_up;
use serde::{Deserialize, Serialize};

/// Studio rent as a share of 1BR rent when no studio median is recorded
pub const STUDIO_RENT_RATIO: f64 = 0.8;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct City {
    /// Stable slug, e.g. "san-francisco-ca"
    pub id: String,

    pub name: String,

    pub state: String,

    pub state_tax_rate: f64,

    #[serde(default)]
    pub local_tax_rate: f64,

    /// Carried for display, not used by the calculator
    #[serde(default)]
    pub sales_tax_rate: f64,

    #[serde(default)]
    pub median_rent_studio: Option<f64>,

    pub median_rent_1br: f64,
    pub median_rent_2br: f64,
    pub median_rent_3br: f64,
    pub median_rent_4br: f64,

    pub cost_index: f64,
}

impl City {
    /// Monthly rent for the requested bedroom type
    pub fn rent(&self, bedrooms: BedroomType) -> i64 {
        match bedrooms {
            BedroomType::Studio => match self.median_rent_studio {
                Some(rent) if rent > 0.0 => round_half_up(rent),
                _ => round_half_up(self.median_rent_1br * STUDIO_RENT_RATIO),
            },
            BedroomType::OneBedroom => round_half_up(self.median_rent_1br),
            BedroomType::TwoBedroom => round_half_up(self.median_rent_2br),
            BedroomType::ThreeBedroom => round_half_up(self.median_rent_3br),
            BedroomType::FourBedroom => round_half_up(self.median_rent_4br),
        }
    }

    /// Display label "Name, State"
    pub fn label(&self) -> String {
        if self.state.is_empty() {
            self.name.clone()
        } else {
            format!("{}, {}", self.name, self.state)
        }
    }

    /// Invariant violations for this record (empty when valid)
    pub fn invariant_violations(&self) -> Vec<String> {
        let mut violations = Vec::new();

        for (field, rate) in [
            ("state_tax_rate", self.state_tax_rate),
            ("local_tax_rate", self.local_tax_rate),
            ("sales_tax_rate", self.sales_tax_rate),
        ] {
            if !(0.0..=1.0).contains(&rate) {
                violations.push(format!("{} must be within [0, 1], got {}", field, rate));
            }
        }

        let rents = [
            ("median_rent_1br", self.median_rent_1br),
            ("median_rent_2br", self.median_rent_2br),
            ("median_rent_3br", self.median_rent_3br),
            ("median_rent_4br", self.median_rent_4br),
        ];
        for (field, rent) in rents {
            if rent <= 0.0 || !rent.is_finite() {
                violations.push(format!("{} must be positive, got {}", field, rent));
            }
        }

        if let Some(studio) = self.median_rent_studio {
            if studio < 0.0 || !studio.is_finite() {
                violations.push(format!("median_rent_studio must be positive, got {}", studio));
            }
        }

        if self.cost_index <= 0.0 || !self.cost_index.is_finite() {
            violations.push(format!("cost_index must be positive, got {}", self.cost_index));
        }

        violations
    }
}

#[cfg(test)]
pub(crate) fn sample_city(id: &str, state_tax_rate: f64, rent_1br: f64, cost_index: f64) -> City {
    City {
        id: id.to_string(),
        name: id.to_string(),
        state: "CA".to_string(),
        state_tax_rate,
        local_tax_rate: 0.0,
        sales_tax_rate: 0.0725,
        median_rent_studio: None,
        median_rent_1br: rent_1br,
        median_rent_2br: rent_1br * 1.3,
        median_rent_3br: rent_1br * 1.7,
        median_rent_4br: rent_1br * 2.1,
        cost_index,
    }
}
