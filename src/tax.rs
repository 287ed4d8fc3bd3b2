// 🧾 Tax Calculator - annual income tax liabilities
//
// Domestic model (single filer, 2024 tax year):
//   federal  = progressive brackets on (income - standard deduction)
//   state    = flat rate on (income - flat deduction)
//   local    = flat rate on income
//   payroll  = capped social security + uncapped medicare + high-earner surtax
//
// The bracket walk is shared with the cross-border engine, where the
// bracket table comes from researched data instead of constants.

use crate::money::round_half_up;
use serde::{Deserialize, Serialize};

// ============================================================================
// TAX BRACKET
// ============================================================================

/// One band of a progressive tax table
///
/// `max = None` marks the unbounded top band.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TaxBracket {
    pub min: f64,
    #[serde(default)]
    pub max: Option<f64>,
    pub rate: f64,
}

impl TaxBracket {
    pub const fn new(min: f64, max: Option<f64>, rate: f64) -> Self {
        TaxBracket { min, max, rate }
    }

    /// Width of the band (infinite for the top band)
    pub fn width(&self) -> f64 {
        match self.max {
            Some(max) => (max - self.min).max(0.0),
            None => f64::INFINITY,
        }
    }
}

/// Walk a bracket table, taxing `min(remaining, width) * rate` per band
///
/// Returns the unrounded tax. Negative income is taxed as zero.
pub fn progressive_tax(taxable_income: f64, brackets: &[TaxBracket]) -> f64 {
    let mut remaining = if taxable_income.is_finite() {
        taxable_income.max(0.0)
    } else {
        0.0
    };
    let mut tax = 0.0;

    for bracket in brackets {
        if remaining <= 0.0 {
            break;
        }

        let portion = remaining.min(bracket.width());
        tax += portion * bracket.rate;
        remaining -= portion;
    }

    tax
}

// ============================================================================
// DOMESTIC CONSTANTS
// ============================================================================

pub const FEDERAL_STANDARD_DEDUCTION: f64 = 14_600.0;

pub const FEDERAL_BRACKETS: [TaxBracket; 7] = [
    TaxBracket::new(0.0, Some(11_600.0), 0.10),
    TaxBracket::new(11_600.0, Some(47_150.0), 0.12),
    TaxBracket::new(47_150.0, Some(100_525.0), 0.22),
    TaxBracket::new(100_525.0, Some(191_950.0), 0.24),
    TaxBracket::new(191_950.0, Some(243_725.0), 0.32),
    TaxBracket::new(243_725.0, Some(609_350.0), 0.35),
    TaxBracket::new(609_350.0, None, 0.37),
];

/// Flat state deduction (deliberately not bracketed per state)
pub const STATE_DEDUCTION: f64 = 10_000.0;

pub const SOCIAL_SECURITY_RATE: f64 = 0.062;
pub const SOCIAL_SECURITY_WAGE_BASE: f64 = 168_600.0;
pub const MEDICARE_RATE: f64 = 0.0145;
pub const ADDITIONAL_MEDICARE_RATE: f64 = 0.009;
pub const ADDITIONAL_MEDICARE_THRESHOLD: f64 = 200_000.0;

fn clamp_income(income: f64) -> f64 {
    if income.is_finite() {
        income.max(0.0)
    } else {
        0.0
    }
}

// ============================================================================
// DOMESTIC TAX FUNCTIONS
// ============================================================================

/// Federal income tax after the standard deduction
pub fn federal_tax(income: f64) -> i64 {
    let taxable = (clamp_income(income) - FEDERAL_STANDARD_DEDUCTION).max(0.0);
    round_half_up(progressive_tax(taxable, &FEDERAL_BRACKETS))
}

/// State income tax at a flat rate after the flat deduction
pub fn state_tax(income: f64, state_rate: f64) -> i64 {
    let taxable = (clamp_income(income) - STATE_DEDUCTION).max(0.0);
    round_half_up(taxable * state_rate)
}

/// Local income tax, flat rate on gross income
pub fn local_tax(income: f64, local_rate: f64) -> i64 {
    round_half_up(clamp_income(income) * local_rate)
}

/// Social security (capped) + medicare (uncapped) + additional medicare surtax
pub fn payroll_tax(income: f64) -> i64 {
    let income = clamp_income(income);

    let social_security = SOCIAL_SECURITY_RATE * income.min(SOCIAL_SECURITY_WAGE_BASE);
    let medicare = MEDICARE_RATE * income;
    let surtax = ADDITIONAL_MEDICARE_RATE * (income - ADDITIONAL_MEDICARE_THRESHOLD).max(0.0);

    round_half_up(social_security + medicare + surtax)
}

// ============================================================================
// TAX BREAKDOWN
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxBreakdown {
    pub federal: i64,
    pub state: i64,
    pub local: i64,
    pub payroll: i64,
    pub total: i64,
}

/// All four domestic taxes for one jurisdiction
pub fn calculate_taxes(income: f64, state_rate: f64, local_rate: f64) -> TaxBreakdown {
    let federal = federal_tax(income);
    let state = state_tax(income, state_rate);
    let local = local_tax(income, local_rate);
    let payroll = payroll_tax(income);

    TaxBreakdown {
        federal,
        state,
        local,
        payroll,
        total: federal
            .saturating_add(state)
            .saturating_add(local)
            .saturating_add(payroll),
    }
}

// ============================================================================
// TESTS
// ============================================================================
