// ✈️ Relocation Comparator - origin vs destination in a common currency
//
// Each side is computed in its own currency, then totals and surpluses are
// converted to USD for comparison. The destination salary is the origin
// salary expressed in destination currency (same USD value).
//
// salary_needed_to_match_lifestyle inverts the destination tax with a
// single effective rate taken at the computed salary. It is an
// approximation of a progressive system, not an exact inverse.
// salary_needed_exact solves the bracket table by bisection.

use crate::cross_border::{
    annual_tax, calculate_breakdown, childcare_cost, effective_tax_rate, ComparisonInput,
    MonthlyBreakdown,
};
use crate::data_quality::{LocationQualityEngine, QualityReport};
use crate::entities::LocationData;
use crate::money::{round_half_up, round_tenth};
use serde::{Deserialize, Serialize};
use tracing::info;

pub const COST_DIFFERENCE_THRESHOLD_PERCENT: f64 = 20.0;
pub const SURPLUS_IMPROVEMENT_FACTOR: f64 = 1.2;
pub const SAFETY_ADVANTAGE_POINTS: f64 = 10.0;
pub const CHILDCARE_SAVINGS_FACTOR: f64 = 0.7;

/// Effective rates at or above this are treated as this when inverting
const MAX_EFFECTIVE_RATE: f64 = 0.95;

// ============================================================================
// RESULT TYPES
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonSummary {
    /// Monthly expenses in USD
    pub total_monthly_cost_origin: i64,
    pub total_monthly_cost_destination: i64,

    /// (destination - origin) / origin * 100, one decimal
    pub cost_difference_percent: f64,

    /// Monthly surplus in USD
    pub monthly_surplus_origin: i64,
    pub monthly_surplus_destination: i64,

    pub surplus_difference_monthly: i64,
    pub surplus_difference_annual: i64,

    /// Destination currency, flat effective-rate inversion (approximate)
    pub salary_needed_to_match_lifestyle: i64,

    /// Destination currency, solved against the bracket table
    pub salary_needed_exact: i64,

    /// 100 = parity, above 100 the destination is cheaper
    pub purchasing_power_index: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComparisonResult {
    pub origin: LocationData,
    pub destination: LocationData,
    pub input: ComparisonInput,
    pub origin_breakdown: MonthlyBreakdown,
    pub destination_breakdown: MonthlyBreakdown,
    pub comparison: ComparisonSummary,
    pub recommendations: Vec<String>,
    pub origin_quality: QualityReport,
    pub destination_quality: QualityReport,
}

impl ComparisonResult {
    pub fn summary(&self) -> String {
        format!(
            "{} -> {}: costs {:+.1}%, surplus {:+} USD/mo, purchasing power {}",
            self.origin.label(),
            self.destination.label(),
            self.comparison.cost_difference_percent,
            self.comparison.surplus_difference_monthly,
            self.comparison.purchasing_power_index
        )
    }
}

// ============================================================================
// COMPARATOR
// ============================================================================

/// Compare two researched locations for one household
pub fn calculate_comparison(
    origin: LocationData,
    destination: LocationData,
    input: &ComparisonInput,
) -> ComparisonResult {
    let engine = LocationQualityEngine::new();
    let (origin, origin_quality) = engine.validate(origin);
    let (destination, destination_quality) = engine.validate(destination);

    let origin_salary = input.clamped_salary();
    let destination_salary = destination.from_usd(origin.to_usd(origin_salary));

    let origin_breakdown = calculate_breakdown(&origin, origin_salary, input);
    let destination_breakdown = calculate_breakdown(&destination, destination_salary, input);

    let origin_cost_usd = origin.to_usd(origin_breakdown.total_expenses as f64);
    let destination_cost_usd = destination.to_usd(destination_breakdown.total_expenses as f64);
    let origin_surplus_usd = origin.to_usd(origin_breakdown.surplus as f64);
    let destination_surplus_usd = destination.to_usd(destination_breakdown.surplus as f64);

    let total_monthly_cost_origin = round_half_up(origin_cost_usd);
    let total_monthly_cost_destination = round_half_up(destination_cost_usd);
    let monthly_surplus_origin = round_half_up(origin_surplus_usd);
    let monthly_surplus_destination = round_half_up(destination_surplus_usd);
    let surplus_difference_monthly =
        monthly_surplus_destination.saturating_sub(monthly_surplus_origin);

    let cost_difference_percent = if total_monthly_cost_origin != 0 {
        round_tenth(
            (total_monthly_cost_destination as f64 - total_monthly_cost_origin as f64)
                / total_monthly_cost_origin as f64
                * 100.0,
        )
    } else {
        0.0
    };

    let purchasing_power_index = if destination_cost_usd > 0.0 {
        round_half_up(origin_cost_usd / destination_cost_usd * 100.0)
    } else {
        100
    };

    // Net the destination needs to keep the origin's surplus
    let required_net_annual = (destination.from_usd(origin_surplus_usd)
        + destination_breakdown.total_expenses as f64)
        * 12.0;

    let effective_rate =
        effective_tax_rate(&destination, destination_salary).clamp(0.0, MAX_EFFECTIVE_RATE);
    let salary_needed_to_match_lifestyle = if required_net_annual > 0.0 {
        round_half_up(required_net_annual / (1.0 - effective_rate))
    } else {
        0
    };
    let salary_needed_exact = round_half_up(gross_for_net(&destination, required_net_annual));

    let comparison = ComparisonSummary {
        total_monthly_cost_origin,
        total_monthly_cost_destination,
        cost_difference_percent,
        monthly_surplus_origin,
        monthly_surplus_destination,
        surplus_difference_monthly,
        surplus_difference_annual: surplus_difference_monthly.saturating_mul(12),
        salary_needed_to_match_lifestyle,
        salary_needed_exact,
        purchasing_power_index,
    };

    let recommendations = generate_recommendations(&origin, &destination, input, &comparison);

    let result = ComparisonResult {
        origin,
        destination,
        input: input.clone(),
        origin_breakdown,
        destination_breakdown,
        comparison,
        recommendations,
        origin_quality,
        destination_quality,
    };

    info!("{}", result.summary());

    result
}

/// Annual gross whose after-tax income equals `target_net`, by bisection
///
/// Returns 0 for a non-positive target. If the marginal rate never lets net
/// reach the target, returns the search ceiling.
pub fn gross_for_net(location: &LocationData, target_net: f64) -> f64 {
    if !(target_net.is_finite() && target_net > 0.0) {
        return 0.0;
    }

    let net = |gross: f64| gross - annual_tax(location, gross);

    let mut low = 0.0;
    let mut high = target_net;
    for _ in 0..64 {
        if net(high) >= target_net {
            break;
        }
        low = high;
        high *= 2.0;
    }

    for _ in 0..100 {
        let mid = (low + high) / 2.0;
        if net(mid) < target_net {
            low = mid;
        } else {
            high = mid;
        }
        if high - low < 0.01 {
            break;
        }
    }

    high
}

// ============================================================================
// RECOMMENDATIONS
// ============================================================================

/// Threshold checks in priority order: cost, surplus, safety, childcare
pub fn generate_recommendations(
    origin: &LocationData,
    destination: &LocationData,
    input: &ComparisonInput,
    comparison: &ComparisonSummary,
) -> Vec<String> {
    let mut recommendations = Vec::new();

    // Rule 1: overall cost difference
    let percent = comparison.cost_difference_percent;
    if percent.abs() > COST_DIFFERENCE_THRESHOLD_PERCENT {
        if percent < 0.0 {
            recommendations.push(format!(
                "{} is {:.0}% cheaper than {} for your household",
                destination.location,
                percent.abs(),
                origin.location
            ));
        } else {
            recommendations.push(format!(
                "{} is {:.0}% more expensive than {}; budget for higher monthly costs",
                destination.location, percent, origin.location
            ));
        }
    }

    // Rule 2: surplus improvement
    // With a negative origin surplus the factor can pass while the delta is
    // not positive; both sides are then in deficit.
    let origin_surplus = comparison.monthly_surplus_origin as f64;
    let destination_surplus = comparison.monthly_surplus_destination as f64;
    if destination_surplus > SURPLUS_IMPROVEMENT_FACTOR * origin_surplus {
        if comparison.surplus_difference_monthly > 0 {
            recommendations.push(format!(
                "You could save about ${} more per month (${} per year) in {}",
                comparison.surplus_difference_monthly,
                comparison.surplus_difference_annual,
                destination.location
            ));
        } else {
            recommendations.push(format!(
                "Monthly surplus in {} would be ${} versus ${} in {} (a change of ${} per month); \
                 neither location covers expenses at this salary",
                destination.location,
                comparison.monthly_surplus_destination,
                comparison.monthly_surplus_origin,
                origin.location,
                comparison.surplus_difference_monthly
            ));
        }
    }

    // Rule 3: safety
    let safety_gain = destination.quality.safety - origin.quality.safety;
    if safety_gain > SAFETY_ADVANTAGE_POINTS {
        recommendations.push(format!(
            "{} scores {:.0} points higher on safety than {}",
            destination.location, safety_gain, origin.location
        ));
    }

    // Rule 4: childcare, only with children
    if input.has_children() {
        let origin_childcare = origin.to_usd(childcare_cost(origin, input));
        let destination_childcare = destination.to_usd(childcare_cost(destination, input));
        if origin_childcare > 0.0 && destination_childcare < CHILDCARE_SAVINGS_FACTOR * origin_childcare {
            let savings = (1.0 - destination_childcare / origin_childcare) * 100.0;
            recommendations.push(format!(
                "Childcare in {} costs about {:.0}% less than in {}",
                destination.location, savings, origin.location
            ));
        }
    }

    recommendations
}

// ============================================================================
// TESTS
// ============================================================================
