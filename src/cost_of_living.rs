// 🛒 Cost-of-Living Calculator - non-rent monthly expenses for a city
//
//   base = NATIONAL_BASELINE_MONTHLY * cost_index / 100 * household multiplier
//   car  = CAR_MONTHLY (flat, not index-scaled)
//
// Household multiplier: each extra adult adds 65% of baseline,
// each child adds 40%.

use crate::entities::{City, HouseholdOptions};
use crate::money::round_half_up;
use serde::{Deserialize, Serialize};

/// National-average monthly groceries, utilities and misc (no rent, no car)
pub const NATIONAL_BASELINE_MONTHLY: f64 = 1_500.0;

/// Flat monthly cost of owning a car (payment, insurance, fuel, upkeep)
pub const CAR_MONTHLY: f64 = 700.0;

pub const EXTRA_ADULT_FACTOR: f64 = 0.65;
pub const CHILD_FACTOR: f64 = 0.4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CostOfLivingBreakdown {
    pub base: i64,
    pub car: i64,
    pub total: i64,
}

/// Household size multiplier applied to the base cost
pub fn household_multiplier(household: &HouseholdOptions) -> f64 {
    let extra_adults = (household.adult_count() - 1).max(0) as f64;
    let children = household.child_count() as f64;

    1.0 + extra_adults * EXTRA_ADULT_FACTOR + children * CHILD_FACTOR
}

/// Itemized monthly cost of living for a cost index and household
pub fn cost_of_living_breakdown(cost_index: f64, household: &HouseholdOptions) -> CostOfLivingBreakdown {
    let index = if cost_index.is_finite() && cost_index > 0.0 {
        cost_index
    } else {
        100.0
    };

    let base = round_half_up(NATIONAL_BASELINE_MONTHLY * (index / 100.0) * household_multiplier(household));
    let car = if household.has_car {
        round_half_up(CAR_MONTHLY)
    } else {
        0
    };

    CostOfLivingBreakdown {
        base,
        car,
        total: base.saturating_add(car),
    }
}

/// Monthly cost of living total (base + car)
pub fn monthly_cost_of_living(cost_index: f64, household: &HouseholdOptions) -> i64 {
    cost_of_living_breakdown(cost_index, household).total
}

/// Monthly rent + cost of living for a city
pub fn monthly_expenses(city: &City, household: &HouseholdOptions) -> i64 {
    city.rent(household.bedrooms)
        .saturating_add(monthly_cost_of_living(city.cost_index, household))
}
