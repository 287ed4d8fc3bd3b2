// 🌐 Cross-Border Calculator - monthly budget for one researched location
//
// Same shape as the domestic engine, but every constant comes from the
// LocationData record and every figure stays in the location's currency.
//
//   tax      = progressive(brackets, annual income) + social_security_rate * income
//   expenses = housing + utilities + food + transportation
//            + healthcare + childcare + lifestyle
//   surplus  = net - expenses
//
// Records must pass the data quality engine first.

use crate::entities::household::deserialize_count;
use crate::entities::{BedroomType, Child, DiningFrequency, LifestyleLevel, LocationData};
use crate::money::round_half_up;
use crate::tax::progressive_tax;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Assumed monthly fuel for a household car
pub const CAR_FUEL_LITERS_PER_MONTH: f64 = 60.0;

// ============================================================================
// COMPARISON INPUT
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ComparisonInput {
    /// Location keys as typed by the caller
    pub origin: String,
    pub destination: String,

    /// Annual gross salary in the origin currency
    pub salary: f64,

    pub bedrooms: BedroomType,

    #[serde(deserialize_with = "deserialize_count")]
    pub adults: i64,

    pub children: Vec<Child>,

    pub has_car: bool,

    pub dining_out: DiningFrequency,

    pub lifestyle: LifestyleLevel,
}

impl Default for ComparisonInput {
    fn default() -> Self {
        ComparisonInput {
            origin: String::new(),
            destination: String::new(),
            salary: 0.0,
            bedrooms: BedroomType::OneBedroom,
            adults: 1,
            children: Vec::new(),
            has_car: false,
            dining_out: DiningFrequency::Sometimes,
            lifestyle: LifestyleLevel::Moderate,
        }
    }
}

impl ComparisonInput {
    pub fn new(origin: &str, destination: &str, salary: f64) -> Self {
        ComparisonInput {
            origin: origin.to_string(),
            destination: destination.to_string(),
            salary,
            ..Default::default()
        }
    }

    pub fn adult_count(&self) -> i64 {
        self.adults.max(1)
    }

    pub fn has_children(&self) -> bool {
        !self.children.is_empty()
    }

    /// Salary clamped to a non-negative finite value
    pub fn clamped_salary(&self) -> f64 {
        if self.salary.is_finite() {
            self.salary.max(0.0)
        } else {
            0.0
        }
    }
}

// ============================================================================
// MONTHLY BREAKDOWN
// ============================================================================

/// One side of a comparison, in that location's currency
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct MonthlyBreakdown {
    pub gross_income: i64,
    pub tax: i64,
    pub net_income: i64,
    pub housing: i64,
    pub utilities: i64,
    pub food: i64,
    pub transportation: i64,
    pub healthcare: i64,
    pub childcare: i64,
    pub lifestyle: i64,
    pub total_expenses: i64,
    pub surplus: i64,
}

impl MonthlyBreakdown {
    /// Expense lines in display order
    pub fn expense_lines(&self) -> [(&'static str, i64); 7] {
        [
            ("Housing", self.housing),
            ("Utilities", self.utilities),
            ("Food", self.food),
            ("Transportation", self.transportation),
            ("Healthcare", self.healthcare),
            ("Childcare", self.childcare),
            ("Lifestyle", self.lifestyle),
        ]
    }
}

// ============================================================================
// TAX
// ============================================================================

/// Annual income tax plus social security, unrounded
pub fn annual_tax(location: &LocationData, annual_income: f64) -> f64 {
    let income = if annual_income.is_finite() {
        annual_income.max(0.0)
    } else {
        0.0
    };
    progressive_tax(income, &location.taxes.brackets) + location.taxes.social_security_rate * income
}

/// Total tax divided by gross income (0 for zero income)
pub fn effective_tax_rate(location: &LocationData, annual_income: f64) -> f64 {
    if annual_income > 0.0 && annual_income.is_finite() {
        annual_tax(location, annual_income) / annual_income
    } else {
        0.0
    }
}

// ============================================================================
// EXPENSE CATEGORIES
// ============================================================================

pub fn housing_cost(location: &LocationData, input: &ComparisonInput) -> f64 {
    location.housing.rent(input.bedrooms)
}

pub fn utilities_cost(location: &LocationData) -> f64 {
    location.utilities.total
}

pub fn food_cost(location: &LocationData, input: &ComparisonInput) -> f64 {
    let tiers = input.lifestyle.tiers();
    let groceries = location.food.grocery(tiers.grocery) * input.adult_count() as f64;
    let dining = input.dining_out.meals_per_month() * location.food.restaurant_meal(tiers.restaurant);
    groceries + dining
}

pub fn transportation_cost(location: &LocationData, input: &ComparisonInput) -> f64 {
    let transport = &location.transportation;
    if input.has_car {
        transport.car_insurance_monthly
            + transport.car_payment_avg
            + transport.parking_monthly
            + transport.gas_per_liter * CAR_FUEL_LITERS_PER_MONTH
    } else {
        transport.transit_monthly_pass * input.adult_count() as f64
    }
}

/// Flat premium, not scaled by household size
pub fn healthcare_cost(location: &LocationData) -> f64 {
    location.healthcare.insurance_monthly
}

pub fn childcare_cost(location: &LocationData, input: &ComparisonInput) -> f64 {
    input
        .children
        .iter()
        .map(|child| location.childcare.monthly_cost(child.childcare_tier()))
        .sum()
}

pub fn lifestyle_cost(location: &LocationData, input: &ComparisonInput) -> f64 {
    location.lifestyle.base_monthly() * input.lifestyle.tiers().multiplier
}

// ============================================================================
// BREAKDOWN
// ============================================================================

/// Monthly budget for a location at an annual salary in its own currency
pub fn calculate_breakdown(
    location: &LocationData,
    annual_salary: f64,
    input: &ComparisonInput,
) -> MonthlyBreakdown {
    let salary = if annual_salary.is_finite() {
        annual_salary.max(0.0)
    } else {
        0.0
    };

    let gross_income = round_half_up(salary / 12.0);
    let tax = round_half_up(annual_tax(location, salary) / 12.0);
    let net_income = gross_income.saturating_sub(tax);

    let housing = round_half_up(housing_cost(location, input));
    let utilities = round_half_up(utilities_cost(location));
    let food = round_half_up(food_cost(location, input));
    let transportation = round_half_up(transportation_cost(location, input));
    let healthcare = round_half_up(healthcare_cost(location));
    let childcare = round_half_up(childcare_cost(location, input));
    let lifestyle = round_half_up(lifestyle_cost(location, input));

    let total_expenses = [housing, utilities, food, transportation, healthcare, childcare, lifestyle]
        .into_iter()
        .fold(0i64, i64::saturating_add);

    debug!(
        location = %location.location,
        gross_income,
        tax,
        total_expenses,
        "computed monthly breakdown"
    );

    MonthlyBreakdown {
        gross_income,
        tax,
        net_income,
        housing,
        utilities,
        food,
        transportation,
        healthcare,
        childcare,
        lifestyle,
        total_expenses,
        surplus: net_income.saturating_sub(total_expenses),
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data_quality::typical_us_city;
    use crate::tax::TaxBracket;

    #[test]
    fn test_moderate_single_adult_breakdown() {
        let location = typical_us_city();
        let input = ComparisonInput::new("a", "b", 120_000.0);

        let breakdown = calculate_breakdown(&location, 120_000.0, &input);

        assert_eq!(breakdown.gross_income, 10_000);
        // Brackets: 21,842.5 + social security 9,180 = 31,022.5 / 12
        assert_eq!(breakdown.tax, 2_585);
        assert_eq!(breakdown.net_income, 7_415);
        assert_eq!(breakdown.housing, 1_700);
        assert_eq!(breakdown.utilities, 340);
        // 500 groceries + 8 meals * 35
        assert_eq!(breakdown.food, 780);
        assert_eq!(breakdown.transportation, 90);
        assert_eq!(breakdown.healthcare, 450);
        assert_eq!(breakdown.childcare, 0);
        // 50 + 2 * 15 + 35 + 40
        assert_eq!(breakdown.lifestyle, 155);
        assert_eq!(breakdown.total_expenses, 3_515);
        assert_eq!(breakdown.surplus, 7_415 - 3_515);
    }

    #[test]
    fn test_expense_lines_sum_to_total() {
        let location = typical_us_city();
        let mut input = ComparisonInput::new("a", "b", 80_000.0);
        input.children = vec![Child::new(0.5), Child::new(4.0)];
        input.has_car = true;
        input.lifestyle = LifestyleLevel::Luxury;

        let breakdown = calculate_breakdown(&location, 80_000.0, &input);
        let sum: i64 = breakdown.expense_lines().iter().map(|(_, v)| v).sum();

        assert_eq!(sum, breakdown.total_expenses);
    }

    #[test]
    fn test_food_by_lifestyle() {
        let location = typical_us_city();
        let mut input = ComparisonInput::new("a", "b", 0.0);
        input.adults = 2;

        input.lifestyle = LifestyleLevel::Budget;
        input.dining_out = DiningFrequency::Rarely;
        assert_eq!(food_cost(&location, &input), 350.0 * 2.0 + 4.0 * 18.0);

        input.lifestyle = LifestyleLevel::Luxury;
        input.dining_out = DiningFrequency::Often;
        assert_eq!(food_cost(&location, &input), 500.0 * 2.0 + 16.0 * 90.0);
    }

    #[test]
    fn test_transportation_car_vs_transit() {
        let location = typical_us_city();
        let mut input = ComparisonInput::new("a", "b", 0.0);
        input.adults = 2;

        assert_eq!(transportation_cost(&location, &input), 180.0);

        input.has_car = true;
        let expected = 160.0 + 550.0 + 150.0 + 0.95 * 60.0;
        assert!((transportation_cost(&location, &input) - expected).abs() < 1e-9);
    }

    #[test]
    fn test_childcare_by_age() {
        let location = typical_us_city();
        let mut input = ComparisonInput::new("a", "b", 0.0);
        input.children = vec![
            Child::new(0.3),
            Child::new(2.0),
            Child::new(5.0),
            Child::new(9.0),
        ];

        assert_eq!(childcare_cost(&location, &input), 1_600.0 + 1_400.0 + 1_100.0);
    }

    #[test]
    fn test_lifestyle_multiplier() {
        let location = typical_us_city();
        let mut input = ComparisonInput::new("a", "b", 0.0);

        input.lifestyle = LifestyleLevel::Budget;
        assert!((lifestyle_cost(&location, &input) - 155.0 * 0.7).abs() < 1e-9);

        input.lifestyle = LifestyleLevel::Luxury;
        assert!((lifestyle_cost(&location, &input) - 155.0 * 1.8).abs() < 1e-9);
    }

    #[test]
    fn test_healthcare_not_scaled_by_household() {
        let location = typical_us_city();
        let mut input = ComparisonInput::new("a", "b", 50_000.0);
        input.adults = 4;
        input.children = vec![Child::new(1.0)];

        let breakdown = calculate_breakdown(&location, 50_000.0, &input);
        assert_eq!(breakdown.healthcare, 450);
    }

    #[test]
    fn test_tax_uses_location_brackets() {
        let mut location = typical_us_city();
        location.taxes.brackets = vec![
            TaxBracket::new(0.0, Some(20_000.0), 0.0),
            TaxBracket::new(20_000.0, None, 0.5),
        ];
        location.taxes.social_security_rate = 0.1;

        assert_eq!(annual_tax(&location, 60_000.0), 20_000.0 + 6_000.0);
        assert!((effective_tax_rate(&location, 60_000.0) - 26_000.0 / 60_000.0).abs() < 1e-12);
        assert_eq!(effective_tax_rate(&location, 0.0), 0.0);
    }

    #[test]
    fn test_zero_salary_breakdown() {
        let location = typical_us_city();
        let input = ComparisonInput::new("a", "b", 0.0);

        let breakdown = calculate_breakdown(&location, 0.0, &input);

        assert_eq!(breakdown.gross_income, 0);
        assert_eq!(breakdown.tax, 0);
        assert_eq!(breakdown.surplus, -breakdown.total_expenses);
    }

    #[test]
    fn test_input_deserializes_with_defaults() {
        let json = r#"{
            "origin": "Austin",
            "destination": "Lisbon",
            "salary": 90000,
            "adults": 2.9,
            "children": [{"age": 2}],
            "lifestyle": "comfortable"
        }"#;

        let input: ComparisonInput = serde_json::from_str(json).unwrap();

        assert_eq!(input.adults, 2);
        assert_eq!(input.children.len(), 1);
        assert_eq!(input.bedrooms, BedroomType::OneBedroom);
        assert_eq!(input.dining_out, DiningFrequency::Sometimes);
        assert_eq!(input.lifestyle, LifestyleLevel::Comfortable);
    }
}
