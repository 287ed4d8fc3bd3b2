// ✅ Data Quality Engine - validation and backfill for researched locations
//
// Researched location data is unreliable. A zero (or negative, or NaN)
// price is read as "missing", never "free", and the whole category is
// replaced with a representative default block before any calculation.
//
// Defaults describe a typical US city in USD and are converted into the
// location's currency with its (validated) exchange rate.
//
// The pass is idempotent: validating a validated record changes nothing
// and reports no issues.

use crate::entities::{
    BedroomType, ChildcareCosts, FoodCosts, HealthcareCosts, HousingCosts, IncomeBenchmarks,
    LifestyleCosts, LocationData, QualityIndices, TaxData, TransportationCosts, UtilityCosts,
};
use crate::tax::FEDERAL_BRACKETS;
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Rent for each size relative to 1BR, used to fill single missing sizes
const RENT_RATIOS: [(BedroomType, f64); 4] = [
    (BedroomType::Studio, 0.8),
    (BedroomType::TwoBedroom, 1.35),
    (BedroomType::ThreeBedroom, 1.75),
    (BedroomType::FourBedroom, 2.2),
];

pub const DEFAULT_SOCIAL_SECURITY_RATE: f64 = 0.0765;

// ============================================================================
// QUALITY ISSUES
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Severity {
    Critical, // Would break a calculation (division, empty table)
    Warning,  // Whole category replaced with defaults
    Info,     // Single field derived or repaired
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QualityIssue {
    pub severity: Severity,
    pub field: String,
    pub issue: String,
    pub recommendation: String,
}

impl QualityIssue {
    fn new(severity: Severity, field: &str, issue: &str, recommendation: &str) -> Self {
        QualityIssue {
            severity,
            field: field.to_string(),
            issue: issue.to_string(),
            recommendation: recommendation.to_string(),
        }
    }
}

// ============================================================================
// QUALITY REPORT
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QualityReport {
    pub location: String,
    pub issues: Vec<QualityIssue>,
    pub checked_rules: usize,
}

impl QualityReport {
    pub fn is_clean(&self) -> bool {
        self.issues.is_empty()
    }

    pub fn has_critical_issues(&self) -> bool {
        self.issues.iter().any(|i| i.severity == Severity::Critical)
    }

    /// Fields that were replaced or derived
    pub fn backfilled_fields(&self) -> Vec<&str> {
        self.issues.iter().map(|i| i.field.as_str()).collect()
    }

    /// Share of rules that passed without backfill
    pub fn quality_score(&self) -> f64 {
        if self.checked_rules == 0 {
            return 1.0;
        }
        let failed = self.issues.len().min(self.checked_rules);
        (self.checked_rules - failed) as f64 / self.checked_rules as f64
    }

    pub fn summary(&self) -> String {
        format!(
            "{}: quality {:.0}%, {} backfilled ({} critical)",
            self.location,
            self.quality_score() * 100.0,
            self.issues.len(),
            self.issues
                .iter()
                .filter(|i| i.severity == Severity::Critical)
                .count()
        )
    }
}

// ============================================================================
// LOCATION QUALITY ENGINE
// ============================================================================

pub struct LocationQualityEngine {
    /// Replacement blocks, in USD
    defaults: LocationData,
}

impl LocationQualityEngine {
    pub fn new() -> Self {
        LocationQualityEngine {
            defaults: typical_us_city(),
        }
    }

    /// Validate a record, backfilling every missing category
    pub fn validate(&self, mut data: LocationData) -> (LocationData, QualityReport) {
        let mut issues = Vec::new();

        // Rule 1: exchange rate must be usable as a divisor
        self.check_exchange_rate(&mut data, &mut issues);

        // Defaults follow the record's currency
        let defaults = self.defaults.scale_prices(data.exchange_rate_to_usd);

        // Rules 2-11: one per category
        self.check_housing(&mut data, &defaults, &mut issues);
        self.check_utilities(&mut data, &defaults, &mut issues);
        self.check_food(&mut data, &defaults, &mut issues);
        self.check_transportation(&mut data, &defaults, &mut issues);
        self.check_healthcare(&mut data, &defaults, &mut issues);
        self.check_childcare(&mut data, &defaults, &mut issues);
        self.check_lifestyle(&mut data, &defaults, &mut issues);
        self.check_taxes(&mut data, &defaults, &mut issues);
        self.check_income(&mut data, &defaults, &mut issues);
        self.check_quality(&mut data, &defaults, &mut issues);

        for issue in &issues {
            warn!(
                location = %data.location,
                field = %issue.field,
                "{}",
                issue.issue
            );
        }

        let report = QualityReport {
            location: data.location.clone(),
            issues,
            checked_rules: 11,
        };

        (data, report)
    }

    /// Validate several records
    pub fn validate_batch(&self, records: Vec<LocationData>) -> Vec<(LocationData, QualityReport)> {
        records.into_iter().map(|r| self.validate(r)).collect()
    }

    // ========================================================================
    // RULES
    // ========================================================================

    fn check_exchange_rate(&self, data: &mut LocationData, issues: &mut Vec<QualityIssue>) {
        if is_missing(data.exchange_rate_to_usd) {
            issues.push(QualityIssue::new(
                Severity::Critical,
                "exchange_rate_to_usd",
                &format!("Exchange rate is unusable: {}", data.exchange_rate_to_usd),
                "Assuming parity with USD (1.0)",
            ));
            data.exchange_rate_to_usd = 1.0;
        }
    }

    fn check_housing(&self, data: &mut LocationData, defaults: &LocationData, issues: &mut Vec<QualityIssue>) {
        if is_missing(data.housing.rent_1br) {
            issues.push(QualityIssue::new(
                Severity::Warning,
                "housing",
                "1BR rent is missing",
                "Replaced housing with typical US city defaults",
            ));
            data.housing = defaults.housing.clone();
            return;
        }

        let rent_1br = data.housing.rent_1br;
        for (bedrooms, ratio) in RENT_RATIOS {
            let rent = data.housing.rent_mut(bedrooms);
            if is_missing(*rent) {
                *rent = rent_1br * ratio;
                issues.push(QualityIssue::new(
                    Severity::Info,
                    &format!("housing.rent_{}", bedrooms.as_str()),
                    &format!("{} rent is missing", bedrooms.as_str()),
                    &format!("Derived as {:.0}% of 1BR rent", ratio * 100.0),
                ));
            }
        }
    }

    fn check_utilities(&self, data: &mut LocationData, defaults: &LocationData, issues: &mut Vec<QualityIssue>) {
        if !is_missing(data.utilities.total) {
            return;
        }

        let itemized = data.utilities.itemized_total();
        if !is_missing(itemized) {
            data.utilities.total = itemized;
            issues.push(QualityIssue::new(
                Severity::Info,
                "utilities.total",
                "Utilities total is missing",
                "Summed from itemized utilities",
            ));
        } else {
            data.utilities = defaults.utilities.clone();
            issues.push(QualityIssue::new(
                Severity::Warning,
                "utilities",
                "Utilities are missing",
                "Replaced utilities with typical US city defaults",
            ));
        }
    }

    fn check_food(&self, data: &mut LocationData, defaults: &LocationData, issues: &mut Vec<QualityIssue>) {
        let food = &data.food;
        let tiers = [
            food.grocery_basic_monthly,
            food.grocery_mid_monthly,
            food.restaurant_cheap_meal,
            food.restaurant_mid_meal,
            food.restaurant_high_end_meal,
        ];

        if tiers.iter().any(|v| is_missing(*v)) {
            data.food = defaults.food.clone();
            issues.push(QualityIssue::new(
                Severity::Warning,
                "food",
                "Grocery or restaurant price tier is missing",
                "Replaced food with typical US city defaults",
            ));
        }
    }

    fn check_transportation(&self, data: &mut LocationData, defaults: &LocationData, issues: &mut Vec<QualityIssue>) {
        let transport = &data.transportation;
        if is_missing(transport.transit_monthly_pass) || is_missing(transport.gas_per_liter) {
            data.transportation = defaults.transportation.clone();
            issues.push(QualityIssue::new(
                Severity::Warning,
                "transportation",
                "Transit pass or gas price is missing",
                "Replaced transportation with typical US city defaults",
            ));
        }
    }

    fn check_healthcare(&self, data: &mut LocationData, defaults: &LocationData, issues: &mut Vec<QualityIssue>) {
        if is_missing(data.healthcare.insurance_monthly) {
            data.healthcare = defaults.healthcare.clone();
            issues.push(QualityIssue::new(
                Severity::Warning,
                "healthcare",
                "Health insurance premium is missing",
                "Replaced healthcare with typical US city defaults",
            ));
        }
    }

    fn check_childcare(&self, data: &mut LocationData, defaults: &LocationData, issues: &mut Vec<QualityIssue>) {
        let childcare = &data.childcare;
        let tiers = [
            childcare.daycare_infant_monthly,
            childcare.daycare_toddler_monthly,
            childcare.preschool_monthly,
        ];

        if tiers.iter().any(|v| is_missing(*v)) {
            data.childcare = defaults.childcare.clone();
            issues.push(QualityIssue::new(
                Severity::Warning,
                "childcare",
                "Daycare or preschool cost is missing",
                "Replaced childcare with typical US city defaults",
            ));
        }
    }

    fn check_lifestyle(&self, data: &mut LocationData, defaults: &LocationData, issues: &mut Vec<QualityIssue>) {
        if is_missing(data.lifestyle.base_monthly()) {
            data.lifestyle = defaults.lifestyle.clone();
            issues.push(QualityIssue::new(
                Severity::Warning,
                "lifestyle",
                "Lifestyle costs are missing",
                "Replaced lifestyle with typical US city defaults",
            ));
        }
    }

    fn check_taxes(&self, data: &mut LocationData, defaults: &LocationData, issues: &mut Vec<QualityIssue>) {
        let taxes = &mut data.taxes;

        // Unusable bands are dropped before the table is judged
        let before = taxes.brackets.len();
        taxes
            .brackets
            .retain(|b| b.min.is_finite() && b.rate.is_finite() && b.rate >= 0.0);
        if taxes.brackets.len() != before {
            issues.push(QualityIssue::new(
                Severity::Info,
                "taxes.brackets",
                "Bracket with invalid threshold or rate",
                "Dropped invalid brackets",
            ));
        }

        if !is_sorted_by_min(&taxes.brackets) {
            taxes
                .brackets
                .sort_by(|a, b| a.min.partial_cmp(&b.min).unwrap_or(std::cmp::Ordering::Equal));
            issues.push(QualityIssue::new(
                Severity::Info,
                "taxes.brackets",
                "Brackets are out of order",
                "Sorted brackets by lower threshold",
            ));
        }

        let starts_at_zero = taxes.brackets.first().map(|b| b.min == 0.0).unwrap_or(false);
        if !starts_at_zero {
            taxes.brackets = defaults.taxes.brackets.clone();
            issues.push(QualityIssue::new(
                Severity::Critical,
                "taxes.brackets",
                "Tax bracket table is empty or does not start at 0",
                "Replaced brackets with typical US federal brackets",
            ));
        }

        // Each band must end where the next one starts
        let mut repaired_bounds = false;
        for i in 1..taxes.brackets.len() {
            let next_min = taxes.brackets[i].min;
            let band = &mut taxes.brackets[i - 1];
            if band.max != Some(next_min) {
                band.max = Some(next_min);
                repaired_bounds = true;
            }
        }
        if repaired_bounds {
            issues.push(QualityIssue::new(
                Severity::Info,
                "taxes.brackets",
                "Bracket upper bound does not meet the next lower threshold",
                "Set each upper bound to the next bracket's lower threshold",
            ));
        }

        if let Some(top) = taxes.brackets.last_mut() {
            if top.max.is_some() {
                top.max = None;
                issues.push(QualityIssue::new(
                    Severity::Info,
                    "taxes.brackets",
                    "Top bracket has an upper bound",
                    "Made top bracket unbounded",
                ));
            }
        }

        if is_missing(taxes.social_security_rate) {
            taxes.social_security_rate = DEFAULT_SOCIAL_SECURITY_RATE;
            issues.push(QualityIssue::new(
                Severity::Warning,
                "taxes.social_security_rate",
                "Social security rate is missing",
                "Using typical US payroll rate (7.65%)",
            ));
        }
    }

    fn check_income(&self, data: &mut LocationData, defaults: &LocationData, issues: &mut Vec<QualityIssue>) {
        if data.income.is_empty() {
            data.income = defaults.income.clone();
            issues.push(QualityIssue::new(
                Severity::Info,
                "income",
                "Wage benchmarks are missing",
                "Replaced income with typical US city defaults",
            ));
        }
    }

    fn check_quality(&self, data: &mut LocationData, defaults: &LocationData, issues: &mut Vec<QualityIssue>) {
        if data.quality.scores_are_empty() {
            data.quality = defaults.quality.clone();
            issues.push(QualityIssue::new(
                Severity::Info,
                "quality",
                "Quality-of-life scores are missing",
                "Replaced scores with neutral defaults (50)",
            ));
        }
    }
}

impl Default for LocationQualityEngine {
    fn default() -> Self {
        Self::new()
    }
}

/// Zero, negative, NaN and infinite values all count as missing
fn is_missing(value: f64) -> bool {
    !(value.is_finite() && value > 0.0)
}

fn is_sorted_by_min(brackets: &[crate::tax::TaxBracket]) -> bool {
    brackets.windows(2).all(|pair| pair[0].min <= pair[1].min)
}

// ============================================================================
// DEFAULTS (typical US city, USD)
// ============================================================================

pub fn typical_us_city() -> LocationData {
    LocationData {
        location: "Typical US City".to_string(),
        country: "United States".to_string(),
        currency: "USD".to_string(),
        currency_symbol: "$".to_string(),
        exchange_rate_to_usd: 1.0,
        housing: HousingCosts {
            rent_studio: 1_400.0,
            rent_1br: 1_700.0,
            rent_2br: 2_200.0,
            rent_3br: 2_800.0,
            rent_4br: 3_400.0,
            buy_price_per_sqm_center: 4_500.0,
            buy_price_per_sqm_outside: 2_800.0,
            property_tax_rate: 0.011,
            home_insurance_monthly: 120.0,
        },
        utilities: UtilityCosts {
            electricity: 120.0,
            heating_gas: 60.0,
            water: 45.0,
            internet: 65.0,
            mobile_phone: 50.0,
            total: 340.0,
        },
        food: FoodCosts {
            grocery_basic_monthly: 350.0,
            grocery_mid_monthly: 500.0,
            restaurant_cheap_meal: 18.0,
            restaurant_mid_meal: 35.0,
            restaurant_high_end_meal: 90.0,
            coffee: 5.5,
            beer: 7.0,
            snack: 3.0,
        },
        transportation: TransportationCosts {
            transit_monthly_pass: 90.0,
            taxi_start: 4.0,
            taxi_per_km: 1.6,
            rideshare_avg_trip: 22.0,
            gas_per_liter: 0.95,
            car_insurance_monthly: 160.0,
            car_payment_avg: 550.0,
            parking_monthly: 150.0,
        },
        healthcare: HealthcareCosts {
            insurance_monthly: 450.0,
            doctor_visit: 150.0,
            dentist_visit: 120.0,
            prescription_avg: 40.0,
        },
        childcare: ChildcareCosts {
            daycare_infant_monthly: 1_600.0,
            daycare_toddler_monthly: 1_400.0,
            preschool_monthly: 1_100.0,
            private_school_annual: 15_000.0,
            international_school_annual: 30_000.0,
            college_annual: 25_000.0,
            babysitter_hourly: 20.0,
        },
        lifestyle: LifestyleCosts {
            gym_monthly: 50.0,
            movie_ticket: 15.0,
            streaming_monthly: 20.0,
            haircut: 35.0,
            cosmetics_monthly: 40.0,
            clothing_monthly: 120.0,
        },
        taxes: TaxData {
            brackets: FEDERAL_BRACKETS.to_vec(),
            effective_rate_50k: 0.12,
            effective_rate_100k: 0.18,
            effective_rate_200k: 0.24,
            social_security_rate: DEFAULT_SOCIAL_SECURITY_RATE,
            sales_tax_rate: 0.07,
        },
        income: IncomeBenchmarks {
            average_salary: 65_000.0,
            median_salary: 59_000.0,
            minimum_wage_monthly: 1_260.0,
            tech_salary: 120_000.0,
            healthcare_salary: 80_000.0,
            education_salary: 58_000.0,
            finance_salary: 95_000.0,
        },
        quality: QualityIndices {
            safety: 50.0,
            healthcare: 50.0,
            pollution: 50.0,
            traffic: 50.0,
            climate: 50.0,
            cost_of_living: 50.0,
            quality_of_life: 50.0,
            climate_description: "Temperate".to_string(),
            avg_commute_minutes: 27.0,
        },
        researched_at: None,
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tax::TaxBracket;

    fn empty_location(name: &str) -> LocationData {
        LocationData {
            location: name.to_string(),
            country: "Nowhere".to_string(),
            currency: "XXX".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_complete_record_is_clean() {
        let engine = LocationQualityEngine::new();
        let (validated, report) = engine.validate(typical_us_city());

        println!("Report: {}", report.summary());

        assert!(report.is_clean());
        assert_eq!(report.quality_score(), 1.0);
        assert_eq!(validated, typical_us_city());
    }

    #[test]
    fn test_empty_record_is_fully_backfilled() {
        let engine = LocationQualityEngine::new();
        let (validated, report) = engine.validate(empty_location("Ghost Town"));

        assert!(report.has_critical_issues());
        assert_eq!(validated.exchange_rate_to_usd, 1.0);
        assert_eq!(validated.housing, typical_us_city().housing);
        assert_eq!(validated.utilities.total, 340.0);
        assert_eq!(validated.food, typical_us_city().food);
        assert!(!validated.taxes.brackets.is_empty());
        assert_eq!(validated.taxes.social_security_rate, DEFAULT_SOCIAL_SECURITY_RATE);
        assert_eq!(validated.quality.safety, 50.0);
        assert_eq!(validated.location, "Ghost Town");
    }

    #[test]
    fn test_validation_is_idempotent() {
        let engine = LocationQualityEngine::new();

        let mut partial = empty_location("Half Known");
        partial.exchange_rate_to_usd = 0.92;
        partial.housing.rent_1br = 1_000.0;
        partial.utilities.electricity = 80.0;
        partial.utilities.internet = 30.0;
        partial.taxes.brackets = vec![
            TaxBracket::new(20_000.0, Some(80_000.0), 0.3),
            TaxBracket::new(0.0, Some(20_000.0), 0.1),
        ];

        let (once, first_report) = engine.validate(partial);
        let (twice, second_report) = engine.validate(once.clone());

        assert!(!first_report.is_clean());
        assert!(second_report.is_clean());
        assert_eq!(once, twice);
    }

    #[test]
    fn test_defaults_follow_exchange_rate() {
        let engine = LocationQualityEngine::new();
        let mut record = empty_location("Yen Land");
        record.exchange_rate_to_usd = 150.0;

        let (validated, _) = engine.validate(record);

        assert_eq!(validated.healthcare.insurance_monthly, 450.0 * 150.0);
        assert_eq!(validated.taxes.brackets[0].max, Some(11_600.0 * 150.0));
    }

    #[test]
    fn test_zero_exchange_rate_forced_to_parity() {
        let engine = LocationQualityEngine::new();
        let mut record = typical_us_city();
        record.exchange_rate_to_usd = 0.0;

        let (validated, report) = engine.validate(record);

        assert_eq!(validated.exchange_rate_to_usd, 1.0);
        assert!(report.has_critical_issues());
        assert_eq!(report.backfilled_fields(), vec!["exchange_rate_to_usd"]);
    }

    #[test]
    fn test_missing_bedroom_sizes_derived_from_1br() {
        let engine = LocationQualityEngine::new();
        let mut record = typical_us_city();
        record.housing.rent_studio = 0.0;
        record.housing.rent_3br = 0.0;

        let (validated, report) = engine.validate(record);

        assert_eq!(validated.housing.rent_studio, 1_700.0 * 0.8);
        assert_eq!(validated.housing.rent_3br, 1_700.0 * 1.75);
        assert_eq!(validated.housing.rent_2br, 2_200.0);
        assert_eq!(report.issues.len(), 2);
        assert!(report.issues.iter().all(|i| i.severity == Severity::Info));
    }

    #[test]
    fn test_utilities_total_summed_from_items() {
        let engine = LocationQualityEngine::new();
        let mut record = typical_us_city();
        record.utilities.total = 0.0;

        let (validated, _) = engine.validate(record);

        assert_eq!(validated.utilities.total, 340.0);
    }

    #[test]
    fn test_single_zero_tier_replaces_food_block() {
        let engine = LocationQualityEngine::new();
        let mut record = typical_us_city().scale_prices(2.0);
        record.exchange_rate_to_usd = 2.0;
        record.food.restaurant_high_end_meal = 0.0;

        let (validated, report) = engine.validate(record);

        assert_eq!(validated.food, typical_us_city().food.scaled(2.0));
        assert!(report.issues.iter().any(|i| i.field == "food"));
    }

    #[test]
    fn test_top_bracket_made_unbounded() {
        let engine = LocationQualityEngine::new();
        let mut record = typical_us_city();
        record.taxes.brackets = vec![
            TaxBracket::new(0.0, Some(10_000.0), 0.1),
            TaxBracket::new(10_000.0, Some(50_000.0), 0.2),
        ];

        let (validated, report) = engine.validate(record);

        assert_eq!(validated.taxes.brackets.len(), 2);
        assert_eq!(validated.taxes.brackets[1].max, None);
        assert!(!report.has_critical_issues());
    }

    #[test]
    fn test_bracket_gaps_and_unbounded_middle_band_are_closed() {
        let engine = LocationQualityEngine::new();
        let mut record = typical_us_city();
        record.taxes.brackets = vec![
            TaxBracket::new(0.0, Some(10_000.0), 0.1),
            TaxBracket::new(12_000.0, None, 0.2),
            TaxBracket::new(50_000.0, Some(60_000.0), 0.3),
        ];

        let (validated, report) = engine.validate(record);

        assert_eq!(
            validated.taxes.brackets,
            vec![
                TaxBracket::new(0.0, Some(12_000.0), 0.1),
                TaxBracket::new(12_000.0, Some(50_000.0), 0.2),
                TaxBracket::new(50_000.0, None, 0.3),
            ]
        );
        assert!(report
            .issues
            .iter()
            .any(|i| i.severity == Severity::Info && i.issue.contains("does not meet the next")));
        assert!(!report.has_critical_issues());

        let (again, second) = engine.validate(validated.clone());
        assert_eq!(again, validated);
        assert!(second.is_clean());
    }

    #[test]
    fn test_overlapping_brackets_are_trimmed() {
        let engine = LocationQualityEngine::new();
        let mut record = typical_us_city();
        record.taxes.brackets = vec![
            TaxBracket::new(0.0, Some(20_000.0), 0.1),
            TaxBracket::new(10_000.0, None, 0.2),
        ];

        let (validated, report) = engine.validate(record);

        assert_eq!(validated.taxes.brackets[0].max, Some(10_000.0));
        assert_eq!(validated.taxes.brackets[1].max, None);
        assert_eq!(report.issues.len(), 1);
    }

    #[test]
    fn test_brackets_not_starting_at_zero_are_replaced() {
        let engine = LocationQualityEngine::new();
        let mut record = typical_us_city();
        record.taxes.brackets = vec![TaxBracket::new(5_000.0, None, 0.2)];

        let (validated, report) = engine.validate(record);

        assert_eq!(validated.taxes.brackets, FEDERAL_BRACKETS.to_vec());
        assert!(report.has_critical_issues());
    }

    #[test]
    fn test_batch_validation() {
        let engine = LocationQualityEngine::new();
        let results = engine.validate_batch(vec![typical_us_city(), empty_location("Empty")]);

        assert_eq!(results.len(), 2);
        assert!(results[0].1.is_clean());
        assert!(!results[1].1.is_clean());
    }
}
