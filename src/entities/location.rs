// 🌍 Location Entity - researched cost snapshot for one world location
//
// All prices are in the location's own currency.
// exchange_rate_to_usd is local units per 1 USD (EUR ~0.92, JPY ~150).
//
// Every field defaults to zero when absent from the researched payload.
// Zero means "missing", never "free": the data quality engine backfills
// zeros before any calculation runs.

use crate::entities::household::{BedroomType, ChildcareTier, GroceryTier, RestaurantTier};
use crate::tax::TaxBracket;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ============================================================================
// LOCATION DATA
// ============================================================================

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LocationData {
    // ========================================================================
    // IDENTITY
    // ========================================================================
    pub location: String,
    pub country: String,
    pub currency: String,
    pub currency_symbol: String,
    pub exchange_rate_to_usd: f64,

    // ========================================================================
    // CATEGORIES
    // ========================================================================
    pub housing: HousingCosts,
    pub utilities: UtilityCosts,
    pub food: FoodCosts,
    pub transportation: TransportationCosts,
    pub healthcare: HealthcareCosts,
    pub childcare: ChildcareCosts,
    pub lifestyle: LifestyleCosts,
    pub taxes: TaxData,
    pub income: IncomeBenchmarks,
    pub quality: QualityIndices,

    /// When the snapshot was researched (None for hand-built records)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub researched_at: Option<DateTime<Utc>>,
}

impl LocationData {
    /// Convert a local-currency amount to USD
    ///
    /// Callers pass validated records; a non-positive rate is treated as parity.
    pub fn to_usd(&self, local: f64) -> f64 {
        if self.exchange_rate_to_usd > 0.0 {
            local / self.exchange_rate_to_usd
        } else {
            local
        }
    }

    /// Convert a USD amount to the local currency
    pub fn from_usd(&self, usd: f64) -> f64 {
        if self.exchange_rate_to_usd > 0.0 {
            usd * self.exchange_rate_to_usd
        } else {
            usd
        }
    }

    /// "Lisbon, Portugal"
    pub fn label(&self) -> String {
        if self.country.is_empty() {
            self.location.clone()
        } else {
            format!("{}, {}", self.location, self.country)
        }
    }

    /// Copy with every price and bracket threshold multiplied by `factor`
    ///
    /// Rates, scores and identity are left untouched.
    pub fn scale_prices(&self, factor: f64) -> LocationData {
        LocationData {
            housing: self.housing.scaled(factor),
            utilities: self.utilities.scaled(factor),
            food: self.food.scaled(factor),
            transportation: self.transportation.scaled(factor),
            healthcare: self.healthcare.scaled(factor),
            childcare: self.childcare.scaled(factor),
            lifestyle: self.lifestyle.scaled(factor),
            taxes: self.taxes.scaled(factor),
            income: self.income.scaled(factor),
            ..self.clone()
        }
    }
}

// ============================================================================
// HOUSING
// ============================================================================

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct HousingCosts {
    pub rent_studio: f64,
    pub rent_1br: f64,
    pub rent_2br: f64,
    pub rent_3br: f64,
    pub rent_4br: f64,
    pub buy_price_per_sqm_center: f64,
    pub buy_price_per_sqm_outside: f64,
    pub property_tax_rate: f64,
    pub home_insurance_monthly: f64,
}

impl HousingCosts {
    pub fn rent(&self, bedrooms: BedroomType) -> f64 {
        match bedrooms {
            BedroomType::Studio => self.rent_studio,
            BedroomType::OneBedroom => self.rent_1br,
            BedroomType::TwoBedroom => self.rent_2br,
            BedroomType::ThreeBedroom => self.rent_3br,
            BedroomType::FourBedroom => self.rent_4br,
        }
    }

    pub fn rent_mut(&mut self, bedrooms: BedroomType) -> &mut f64 {
        match bedrooms {
            BedroomType::Studio => &mut self.rent_studio,
            BedroomType::OneBedroom => &mut self.rent_1br,
            BedroomType::TwoBedroom => &mut self.rent_2br,
            BedroomType::ThreeBedroom => &mut self.rent_3br,
            BedroomType::FourBedroom => &mut self.rent_4br,
        }
    }

    pub fn scaled(&self, factor: f64) -> Self {
        HousingCosts {
            rent_studio: self.rent_studio * factor,
            rent_1br: self.rent_1br * factor,
            rent_2br: self.rent_2br * factor,
            rent_3br: self.rent_3br * factor,
            rent_4br: self.rent_4br * factor,
            buy_price_per_sqm_center: self.buy_price_per_sqm_center * factor,
            buy_price_per_sqm_outside: self.buy_price_per_sqm_outside * factor,
            property_tax_rate: self.property_tax_rate,
            home_insurance_monthly: self.home_insurance_monthly * factor,
        }
    }
}

// ============================================================================
// UTILITIES
// ============================================================================

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct UtilityCosts {
    pub electricity: f64,
    pub heating_gas: f64,
    pub water: f64,
    pub internet: f64,
    pub mobile_phone: f64,
    /// Monthly total for a typical apartment
    pub total: f64,
}

impl UtilityCosts {
    pub fn itemized_total(&self) -> f64 {
        self.electricity + self.heating_gas + self.water + self.internet + self.mobile_phone
    }

    pub fn scaled(&self, factor: f64) -> Self {
        UtilityCosts {
            electricity: self.electricity * factor,
            heating_gas: self.heating_gas * factor,
            water: self.water * factor,
            internet: self.internet * factor,
            mobile_phone: self.mobile_phone * factor,
            total: self.total * factor,
        }
    }
}

// ============================================================================
// FOOD
// ============================================================================

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FoodCosts {
    /// Monthly groceries per adult, basic basket
    pub grocery_basic_monthly: f64,
    /// Monthly groceries per adult, mid-range basket
    pub grocery_mid_monthly: f64,
    pub restaurant_cheap_meal: f64,
    pub restaurant_mid_meal: f64,
    pub restaurant_high_end_meal: f64,
    pub coffee: f64,
    pub beer: f64,
    pub snack: f64,
}

impl FoodCosts {
    pub fn grocery(&self, tier: GroceryTier) -> f64 {
        match tier {
            GroceryTier::Basic => self.grocery_basic_monthly,
            GroceryTier::MidRange => self.grocery_mid_monthly,
        }
    }

    pub fn restaurant_meal(&self, tier: RestaurantTier) -> f64 {
        match tier {
            RestaurantTier::Cheap => self.restaurant_cheap_meal,
            RestaurantTier::MidRange => self.restaurant_mid_meal,
            RestaurantTier::HighEnd => self.restaurant_high_end_meal,
        }
    }

    pub fn scaled(&self, factor: f64) -> Self {
        FoodCosts {
            grocery_basic_monthly: self.grocery_basic_monthly * factor,
            grocery_mid_monthly: self.grocery_mid_monthly * factor,
            restaurant_cheap_meal: self.restaurant_cheap_meal * factor,
            restaurant_mid_meal: self.restaurant_mid_meal * factor,
            restaurant_high_end_meal: self.restaurant_high_end_meal * factor,
            coffee: self.coffee * factor,
            beer: self.beer * factor,
            snack: self.snack * factor,
        }
    }
}

// ============================================================================
// TRANSPORTATION
// ============================================================================

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TransportationCosts {
    pub transit_monthly_pass: f64,
    pub taxi_start: f64,
    pub taxi_per_km: f64,
    pub rideshare_avg_trip: f64,
    pub gas_per_liter: f64,
    pub car_insurance_monthly: f64,
    pub car_payment_avg: f64,
    pub parking_monthly: f64,
}

impl TransportationCosts {
    pub fn scaled(&self, factor: f64) -> Self {
        TransportationCosts {
            transit_monthly_pass: self.transit_monthly_pass * factor,
            taxi_start: self.taxi_start * factor,
            taxi_per_km: self.taxi_per_km * factor,
            rideshare_avg_trip: self.rideshare_avg_trip * factor,
            gas_per_liter: self.gas_per_liter * factor,
            car_insurance_monthly: self.car_insurance_monthly * factor,
            car_payment_avg: self.car_payment_avg * factor,
            parking_monthly: self.parking_monthly * factor,
        }
    }
}

// ============================================================================
// HEALTHCARE
// ============================================================================

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct HealthcareCosts {
    pub insurance_monthly: f64,
    pub doctor_visit: f64,
    pub dentist_visit: f64,
    pub prescription_avg: f64,
}

impl HealthcareCosts {
    pub fn scaled(&self, factor: f64) -> Self {
        HealthcareCosts {
            insurance_monthly: self.insurance_monthly * factor,
            doctor_visit: self.doctor_visit * factor,
            dentist_visit: self.dentist_visit * factor,
            prescription_avg: self.prescription_avg * factor,
        }
    }
}

// ============================================================================
// CHILDCARE
// ============================================================================

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ChildcareCosts {
    pub daycare_infant_monthly: f64,
    pub daycare_toddler_monthly: f64,
    pub preschool_monthly: f64,
    pub private_school_annual: f64,
    pub international_school_annual: f64,
    pub college_annual: f64,
    pub babysitter_hourly: f64,
}

impl ChildcareCosts {
    /// Monthly care cost for one child in the given tier
    pub fn monthly_cost(&self, tier: ChildcareTier) -> f64 {
        match tier {
            ChildcareTier::Infant => self.daycare_infant_monthly,
            ChildcareTier::Toddler => self.daycare_toddler_monthly,
            ChildcareTier::Preschool => self.preschool_monthly,
            ChildcareTier::SchoolAge => 0.0,
        }
    }

    pub fn scaled(&self, factor: f64) -> Self {
        ChildcareCosts {
            daycare_infant_monthly: self.daycare_infant_monthly * factor,
            daycare_toddler_monthly: self.daycare_toddler_monthly * factor,
            preschool_monthly: self.preschool_monthly * factor,
            private_school_annual: self.private_school_annual * factor,
            international_school_annual: self.international_school_annual * factor,
            college_annual: self.college_annual * factor,
            babysitter_hourly: self.babysitter_hourly * factor,
        }
    }
}

// ============================================================================
// LIFESTYLE
// ============================================================================

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LifestyleCosts {
    pub gym_monthly: f64,
    pub movie_ticket: f64,
    pub streaming_monthly: f64,
    pub haircut: f64,
    pub cosmetics_monthly: f64,
    pub clothing_monthly: f64,
}

impl LifestyleCosts {
    /// Gym + two movies + haircut + cosmetics, before the lifestyle multiplier
    pub fn base_monthly(&self) -> f64 {
        self.gym_monthly + 2.0 * self.movie_ticket + self.haircut + self.cosmetics_monthly
    }

    pub fn scaled(&self, factor: f64) -> Self {
        LifestyleCosts {
            gym_monthly: self.gym_monthly * factor,
            movie_ticket: self.movie_ticket * factor,
            streaming_monthly: self.streaming_monthly * factor,
            haircut: self.haircut * factor,
            cosmetics_monthly: self.cosmetics_monthly * factor,
            clothing_monthly: self.clothing_monthly * factor,
        }
    }
}

// ============================================================================
// TAXES
// ============================================================================

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TaxData {
    /// Progressive income tax bands on local-currency annual income
    pub brackets: Vec<TaxBracket>,
    pub effective_rate_50k: f64,
    pub effective_rate_100k: f64,
    pub effective_rate_200k: f64,
    /// Flat payroll/social-security-equivalent rate, uncapped
    pub social_security_rate: f64,
    pub sales_tax_rate: f64,
}

impl TaxData {
    /// Bracket thresholds move with the currency; rates do not
    pub fn scaled(&self, factor: f64) -> Self {
        TaxData {
            brackets: self
                .brackets
                .iter()
                .map(|b| TaxBracket {
                    min: b.min * factor,
                    max: b.max.map(|max| max * factor),
                    rate: b.rate,
                })
                .collect(),
            ..self.clone()
        }
    }
}

// ============================================================================
// INCOME
// ============================================================================

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct IncomeBenchmarks {
    pub average_salary: f64,
    pub median_salary: f64,
    pub minimum_wage_monthly: f64,
    pub tech_salary: f64,
    pub healthcare_salary: f64,
    pub education_salary: f64,
    pub finance_salary: f64,
}

impl IncomeBenchmarks {
    pub fn scaled(&self, factor: f64) -> Self {
        IncomeBenchmarks {
            average_salary: self.average_salary * factor,
            median_salary: self.median_salary * factor,
            minimum_wage_monthly: self.minimum_wage_monthly * factor,
            tech_salary: self.tech_salary * factor,
            healthcare_salary: self.healthcare_salary * factor,
            education_salary: self.education_salary * factor,
            finance_salary: self.finance_salary * factor,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.average_salary == 0.0
            && self.median_salary == 0.0
            && self.minimum_wage_monthly == 0.0
            && self.tech_salary == 0.0
            && self.healthcare_salary == 0.0
            && self.education_salary == 0.0
            && self.finance_salary == 0.0
    }
}

// ============================================================================
// QUALITY OF LIFE
// ============================================================================

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct QualityIndices {
    /// Scores on a 0-100 scale
    pub safety: f64,
    pub healthcare: f64,
    pub pollution: f64,
    pub traffic: f64,
    pub climate: f64,
    pub cost_of_living: f64,
    pub quality_of_life: f64,
    pub climate_description: String,
    pub avg_commute_minutes: f64,
}

impl QualityIndices {
    pub fn scores_are_empty(&self) -> bool {
        [
            self.safety,
            self.healthcare,
            self.pollution,
            self.traffic,
            self.climate,
            self.cost_of_living,
            self.quality_of_life,
        ]
        .iter()
        .all(|score| *score == 0.0)
    }
}
