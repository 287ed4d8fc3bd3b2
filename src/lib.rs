// Cost of Living - Core Library
// Exposes the calculation engines and data layers for the CLI and tests

pub mod money;
pub mod entities;       // City, household options, researched locations
pub mod tax;            // Domestic federal/state/local/payroll + bracket math
pub mod cost_of_living; // Domestic monthly cost of living
pub mod comparison;     // Domestic city ranking
pub mod data_quality;   // Location backfill + quality reports
pub mod cross_border;   // Monthly breakdown for a researched location
pub mod relocation;     // Origin vs destination comparison
pub mod dataset;        // City dataset loading
pub mod db;             // Location cache + research
pub mod config;

// Re-export commonly used types
pub use entities::{
    BedroomType, Child, ChildcareTier, City, DiningFrequency, HouseholdOptions, LifestyleLevel,
    LocationData,
};
pub use tax::{
    calculate_taxes, federal_tax, local_tax, payroll_tax, progressive_tax, state_tax, TaxBracket,
    TaxBreakdown,
};
pub use cost_of_living::{monthly_cost_of_living, monthly_expenses};
pub use comparison::{compare_cities, compute_city_result, CityComparison, CityResult, ComparisonError};
pub use data_quality::{typical_us_city, LocationQualityEngine, QualityIssue, QualityReport, Severity};
pub use cross_border::{calculate_breakdown, ComparisonInput, MonthlyBreakdown};
pub use relocation::{
    calculate_comparison, generate_recommendations, ComparisonResult, ComparisonSummary,
};
pub use dataset::{CityDataset, DatasetIssue};
pub use db::{
    fetch_location, normalize_location_key, CachedLocation, JsonFileResearcher,
    LocationResearcher, LocationStore, SqliteLocationCache,
};
pub use config::AppConfig;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
