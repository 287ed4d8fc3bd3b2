// 📊 City Comparator - surplus per city and ranking against the current city
//
// For each city:
//   taxes -> net income -> net / 12 -> minus (rent + cost of living) -> surplus
//
// Ranking: every non-current city sorted by difference_from_current,
// best first. The sort is stable, so ties keep dataset order.

use crate::cost_of_living;
use crate::entities::{City, HouseholdOptions};
use crate::money::round_half_up;
use crate::tax::calculate_taxes;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

// ============================================================================
// ERRORS
// ============================================================================

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ComparisonError {
    #[error("City not found: {0}")]
    CityNotFound(String),
}

// ============================================================================
// CITY RESULT
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CityResult {
    pub city: City,
    pub gross_income: i64,
    pub federal_tax: i64,
    pub state_tax: i64,
    pub local_tax: i64,
    pub fica_tax: i64,
    pub total_tax: i64,
    pub net_income: i64,
    pub monthly_rent: i64,
    /// Base living cost plus car
    pub monthly_cost_of_living: i64,
    pub monthly_expenses: i64,
    pub monthly_surplus: i64,
    pub annual_surplus: i64,
    /// Only set by compare_cities
    #[serde(skip_serializing_if = "Option::is_none")]
    pub difference_from_current: Option<i64>,
}

impl CityResult {
    pub fn summary(&self) -> String {
        format!(
            "{}: net ${}/yr, expenses ${}/mo, surplus ${}/mo",
            self.city.label(),
            self.net_income,
            self.monthly_expenses,
            self.monthly_surplus
        )
    }

    /// Difference from the current city, 0 outside a comparison
    pub fn difference(&self) -> i64 {
        self.difference_from_current.unwrap_or(0)
    }
}

/// Take-home pay and monthly surplus for one city
pub fn compute_city_result(salary: f64, city: &City, household: &HouseholdOptions) -> CityResult {
    let gross = if salary.is_finite() { salary.max(0.0) } else { 0.0 };

    let taxes = calculate_taxes(gross, city.state_tax_rate, city.local_tax_rate);
    let gross_income = round_half_up(gross);
    let net_income = gross_income.saturating_sub(taxes.total);

    let monthly_rent = city.rent(household.bedrooms);
    let monthly_cost_of_living = cost_of_living::monthly_cost_of_living(city.cost_index, household);
    let monthly_expenses = cost_of_living::monthly_expenses(city, household);

    let monthly_surplus = round_half_up(net_income as f64 / 12.0 - monthly_expenses as f64);

    debug!(
        city = %city.id,
        net_income,
        monthly_expenses,
        monthly_surplus,
        "computed city result"
    );

    CityResult {
        city: city.clone(),
        gross_income,
        federal_tax: taxes.federal,
        state_tax: taxes.state,
        local_tax: taxes.local,
        fica_tax: taxes.payroll,
        total_tax: taxes.total,
        net_income,
        monthly_rent,
        monthly_cost_of_living,
        monthly_expenses,
        monthly_surplus,
        annual_surplus: monthly_surplus.saturating_mul(12),
        difference_from_current: None,
    }
}

// ============================================================================
// COMPARISON
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CityComparison {
    pub current_city: CityResult,
    /// Every other city, best surplus difference first
    pub ranked_cities: Vec<CityResult>,
}

impl CityComparison {
    /// Cities where the household keeps more each month
    pub fn better_than_current(&self) -> impl Iterator<Item = &CityResult> {
        self.ranked_cities.iter().filter(|r| r.difference() > 0)
    }

    pub fn best(&self) -> Option<&CityResult> {
        self.ranked_cities.first()
    }
}

/// Rank every city in the dataset against the current one
pub fn compare_cities(
    salary: f64,
    current_city_id: &str,
    cities: &[City],
    household: &HouseholdOptions,
) -> Result<CityComparison, ComparisonError> {
    let current = cities
        .iter()
        .find(|c| c.id == current_city_id)
        .ok_or_else(|| ComparisonError::CityNotFound(current_city_id.to_string()))?;

    let current_result = compute_city_result(salary, current, household);

    let mut ranked_cities: Vec<CityResult> = cities
        .iter()
        .filter(|c| c.id != current_city_id)
        .map(|city| {
            let mut result = compute_city_result(salary, city, household);
            result.difference_from_current =
                Some(result.monthly_surplus.saturating_sub(current_result.monthly_surplus));
            result
        })
        .collect();

    // Stable: equal differences keep dataset order
    ranked_cities.sort_by(|a, b| b.difference().cmp(&a.difference()));

    info!(
        current = %current_result.city.id,
        compared = ranked_cities.len(),
        best = ranked_cities.first().map(|r| r.city.id.as_str()).unwrap_or("-"),
        "compared cities"
    );

    Ok(CityComparison {
        current_city: current_result,
        ranked_cities,
    })
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cost_of_living::monthly_cost_of_living;
    use crate::entities::city::sample_city;
    use crate::entities::BedroomType;
    use crate::tax::{federal_tax, payroll_tax, state_tax};

    fn dataset() -> Vec<City> {
        vec![
            sample_city("san-francisco", 0.093, 3_200.0, 180.0),
            sample_city("austin", 0.0, 1_500.0, 103.0),
            sample_city("new-york", 0.0685, 3_800.0, 187.0),
            sample_city("denver", 0.044, 1_750.0, 112.0),
            sample_city("seattle", 0.0, 2_300.0, 150.0),
            sample_city("austin-twin", 0.0, 1_500.0, 103.0),
        ]
    }

    #[test]
    fn test_example_scenario_150k_san_francisco() {
        let city = sample_city("san-francisco", 0.093, 3_200.0, 180.0);
        let household = HouseholdOptions::new(BedroomType::OneBedroom);

        let result = compute_city_result(150_000.0, &city, &household);

        assert_eq!(result.federal_tax, federal_tax(150_000.0));
        assert_eq!(result.federal_tax, 25_539);
        assert_eq!(result.state_tax, state_tax(150_000.0, 0.093));
        assert_eq!(result.state_tax, 13_020);
        assert_eq!(result.fica_tax, payroll_tax(150_000.0));
        assert_eq!(result.fica_tax, 11_475);
        assert_eq!(result.local_tax, 0);
        assert_eq!(result.net_income, 150_000 - 25_539 - 13_020 - 11_475);

        assert_eq!(result.monthly_rent, 3_200);
        assert_eq!(
            result.monthly_cost_of_living,
            monthly_cost_of_living(180.0, &household)
        );
        assert_eq!(result.monthly_expenses, 3_200 + 2_700);

        // 99,966 / 12 = 8,330.5; minus 5,900 = 2,430.5
        assert_eq!(result.monthly_surplus, 2_431);
        assert_eq!(result.annual_surplus, 2_431 * 12);
        assert_eq!(result.difference_from_current, None);
    }

    #[test]
    fn test_zero_salary() {
        let city = sample_city("austin", 0.0, 1_500.0, 100.0);
        let result = compute_city_result(0.0, &city, &HouseholdOptions::default());

        assert_eq!(result.total_tax, 0);
        assert_eq!(result.net_income, 0);
        assert_eq!(result.monthly_surplus, -3_000);
    }

    #[test]
    fn test_negative_salary_is_clamped() {
        let city = sample_city("austin", 0.0, 1_500.0, 100.0);
        let result = compute_city_result(-10_000.0, &city, &HouseholdOptions::default());

        assert_eq!(result.gross_income, 0);
        assert_eq!(result.total_tax, 0);
    }

    #[test]
    fn test_compare_excludes_current_city() {
        let cities = dataset();
        let comparison =
            compare_cities(120_000.0, "san-francisco", &cities, &HouseholdOptions::default())
                .unwrap();

        assert_eq!(comparison.current_city.city.id, "san-francisco");
        assert_eq!(comparison.ranked_cities.len(), cities.len() - 1);
        assert!(comparison
            .ranked_cities
            .iter()
            .all(|r| r.city.id != "san-francisco"));
        assert!(comparison
            .ranked_cities
            .iter()
            .all(|r| r.difference_from_current.is_some()));
    }

    #[test]
    fn test_ranking_is_descending() {
        let cities = dataset();
        let comparison =
            compare_cities(95_000.0, "denver", &cities, &HouseholdOptions::default()).unwrap();

        for pair in comparison.ranked_cities.windows(2) {
            assert!(pair[0].difference() >= pair[1].difference());
        }
    }

    #[test]
    fn test_difference_is_relative_to_current() {
        let cities = dataset();
        let comparison =
            compare_cities(95_000.0, "denver", &cities, &HouseholdOptions::default()).unwrap();

        for result in &comparison.ranked_cities {
            assert_eq!(
                result.difference(),
                result.monthly_surplus - comparison.current_city.monthly_surplus
            );
        }
    }

    #[test]
    fn test_ties_keep_dataset_order() {
        let cities = dataset();
        let comparison =
            compare_cities(80_000.0, "new-york", &cities, &HouseholdOptions::default()).unwrap();

        let austin = comparison
            .ranked_cities
            .iter()
            .position(|r| r.city.id == "austin")
            .unwrap();
        let twin = comparison
            .ranked_cities
            .iter()
            .position(|r| r.city.id == "austin-twin")
            .unwrap();

        assert_eq!(twin, austin + 1);
    }

    #[test]
    fn test_compare_is_idempotent() {
        let cities = dataset();
        let household = HouseholdOptions::new(BedroomType::TwoBedroom)
            .with_adults(2)
            .with_children(1)
            .with_car(true);

        let first = compare_cities(140_000.0, "seattle", &cities, &household).unwrap();
        let second = compare_cities(140_000.0, "seattle", &cities, &household).unwrap();

        assert_eq!(first, second);
    }

    #[test]
    fn test_unknown_city_is_an_error() {
        let cities = dataset();
        let err = compare_cities(100_000.0, "nonexistent-id", &cities, &HouseholdOptions::default())
            .unwrap_err();

        assert_eq!(err, ComparisonError::CityNotFound("nonexistent-id".to_string()));
        assert_eq!(err.to_string(), "City not found: nonexistent-id");
    }

    #[test]
    fn test_single_city_dataset_has_nothing_to_rank() {
        let cities = vec![sample_city("austin", 0.0, 1_500.0, 103.0)];
        let comparison =
            compare_cities(100_000.0, "austin", &cities, &HouseholdOptions::default()).unwrap();

        assert_eq!(comparison.current_city.city.id, "austin");
        assert!(comparison.ranked_cities.is_empty());
        assert!(comparison.best().is_none());
        assert_eq!(comparison.better_than_current().count(), 0);
    }

    #[test]
    fn test_huge_salary_does_not_overflow() {
        let city = sample_city("san-francisco", 0.093, 3_200.0, 180.0);
        let result = compute_city_result(1.0e20, &city, &HouseholdOptions::default());

        assert_eq!(result.gross_income, i64::MAX);
        assert_eq!(result.total_tax, i64::MAX);
        assert_eq!(result.net_income, 0);
        assert_eq!(result.annual_surplus, result.monthly_surplus * 12);
    }

    #[test]
    fn test_expenses_match_cost_of_living_module() {
        let city = sample_city("denver", 0.044, 1_750.0, 112.0);
        let household = HouseholdOptions::new(BedroomType::TwoBedroom).with_car(true);

        let result = compute_city_result(90_000.0, &city, &household);

        assert_eq!(
            result.monthly_expenses,
            crate::cost_of_living::monthly_expenses(&city, &household)
        );
    }

    #[test]
    fn test_cheaper_city_ranks_above_expensive_city() {
        let cities = dataset();
        let comparison =
            compare_cities(100_000.0, "san-francisco", &cities, &HouseholdOptions::default())
                .unwrap();

        let best = comparison.best().unwrap();
        assert_ne!(best.city.id, "new-york");
        assert!(comparison.better_than_current().count() > 0);
    }
}
