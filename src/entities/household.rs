// 🏠 Household Entity - who lives here and how they live
//
// Transient inputs constructed per calculation call and never persisted.
// Counts arriving from JSON may be fractional or negative, so they are
// floored on the way in and clamped again at every use.

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

// ============================================================================
// BEDROOM TYPE
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum BedroomType {
    #[serde(rename = "studio")]
    Studio,

    #[default]
    #[serde(rename = "1br")]
    OneBedroom,

    #[serde(rename = "2br")]
    TwoBedroom,

    #[serde(rename = "3br")]
    ThreeBedroom,

    #[serde(rename = "4br")]
    FourBedroom,
}

impl BedroomType {
    pub const ALL: [BedroomType; 5] = [
        BedroomType::Studio,
        BedroomType::OneBedroom,
        BedroomType::TwoBedroom,
        BedroomType::ThreeBedroom,
        BedroomType::FourBedroom,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            BedroomType::Studio => "studio",
            BedroomType::OneBedroom => "1br",
            BedroomType::TwoBedroom => "2br",
            BedroomType::ThreeBedroom => "3br",
            BedroomType::FourBedroom => "4br",
        }
    }
}

impl fmt::Display for BedroomType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BedroomType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_lowercase();
        BedroomType::ALL
            .into_iter()
            .find(|b| b.as_str() == lower)
            .ok_or_else(|| format!("unknown bedroom type '{}' (expected studio, 1br, 2br, 3br or 4br)", s))
    }
}

// ============================================================================
// HOUSEHOLD OPTIONS (Domestic engine)
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HouseholdOptions {
    pub bedrooms: BedroomType,

    #[serde(deserialize_with = "deserialize_count")]
    pub adults: i64,

    #[serde(deserialize_with = "deserialize_count")]
    pub children: i64,

    pub has_car: bool,
}

impl Default for HouseholdOptions {
    fn default() -> Self {
        HouseholdOptions {
            bedrooms: BedroomType::OneBedroom,
            adults: 1,
            children: 0,
            has_car: false,
        }
    }
}

impl HouseholdOptions {
    pub fn new(bedrooms: BedroomType) -> Self {
        HouseholdOptions {
            bedrooms,
            ..Default::default()
        }
    }

    pub fn with_adults(mut self, adults: i64) -> Self {
        self.adults = adults;
        self
    }

    pub fn with_children(mut self, children: i64) -> Self {
        self.children = children;
        self
    }

    pub fn with_car(mut self, has_car: bool) -> Self {
        self.has_car = has_car;
        self
    }

    /// Adults clamped to at least one
    pub fn adult_count(&self) -> i64 {
        self.adults.max(1)
    }

    /// Children clamped to zero or more
    pub fn child_count(&self) -> i64 {
        self.children.max(0)
    }
}

/// Accept any JSON number and floor it to a whole count
pub(crate) fn deserialize_count<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = f64::deserialize(deserializer)?;
    if raw.is_finite() {
        Ok(raw.floor() as i64)
    } else {
        Ok(0)
    }
}

// ============================================================================
// CHILDREN (Cross-Border engine)
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChildcareTier {
    /// Under 1 year
    Infant,
    /// 1 to 3 years
    Toddler,
    /// 3 to 6 years
    Preschool,
    /// 6 and over, no childcare modeled
    SchoolAge,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Child {
    /// Age in years (fractions allowed, e.g. 0.5)
    pub age: f64,
}

impl Child {
    pub fn new(age: f64) -> Self {
        Child { age }
    }

    pub fn childcare_tier(&self) -> ChildcareTier {
        let age = if self.age.is_finite() { self.age.max(0.0) } else { 0.0 };
        if age < 1.0 {
            ChildcareTier::Infant
        } else if age < 3.0 {
            ChildcareTier::Toddler
        } else if age < 6.0 {
            ChildcareTier::Preschool
        } else {
            ChildcareTier::SchoolAge
        }
    }
}

// ============================================================================
// PREFERENCES
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DiningFrequency {
    Rarely,
    #[default]
    Sometimes,
    Often,
}

impl DiningFrequency {
    /// Restaurant meals per month
    pub fn meals_per_month(&self) -> f64 {
        match self {
            DiningFrequency::Rarely => 4.0,
            DiningFrequency::Sometimes => 8.0,
            DiningFrequency::Often => 16.0,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DiningFrequency::Rarely => "rarely",
            DiningFrequency::Sometimes => "sometimes",
            DiningFrequency::Often => "often",
        }
    }
}

impl FromStr for DiningFrequency {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "rarely" => Ok(DiningFrequency::Rarely),
            "sometimes" => Ok(DiningFrequency::Sometimes),
            "often" => Ok(DiningFrequency::Often),
            other => Err(format!(
                "unknown dining frequency '{}' (expected rarely, sometimes or often)",
                other
            )),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroceryTier {
    Basic,
    MidRange,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RestaurantTier {
    Cheap,
    MidRange,
    HighEnd,
}

/// Price tiers and spending multiplier selected by a lifestyle level
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LifestyleTiers {
    pub grocery: GroceryTier,
    pub restaurant: RestaurantTier,
    pub multiplier: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LifestyleLevel {
    Budget,
    #[default]
    Moderate,
    Comfortable,
    Luxury,
}

impl LifestyleLevel {
    pub fn tiers(&self) -> LifestyleTiers {
        match self {
            LifestyleLevel::Budget => LifestyleTiers {
                grocery: GroceryTier::Basic,
                restaurant: RestaurantTier::Cheap,
                multiplier: 0.7,
            },
            LifestyleLevel::Moderate => LifestyleTiers {
                grocery: GroceryTier::MidRange,
                restaurant: RestaurantTier::MidRange,
                multiplier: 1.0,
            },
            LifestyleLevel::Comfortable => LifestyleTiers {
                grocery: GroceryTier::MidRange,
                restaurant: RestaurantTier::MidRange,
                multiplier: 1.3,
            },
            LifestyleLevel::Luxury => LifestyleTiers {
                grocery: GroceryTier::MidRange,
                restaurant: RestaurantTier::HighEnd,
                multiplier: 1.8,
            },
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            LifestyleLevel::Budget => "budget",
            LifestyleLevel::Moderate => "moderate",
            LifestyleLevel::Comfortable => "comfortable",
            LifestyleLevel::Luxury => "luxury",
        }
    }
}

impl FromStr for LifestyleLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "budget" => Ok(LifestyleLevel::Budget),
            "moderate" => Ok(LifestyleLevel::Moderate),
            "comfortable" => Ok(LifestyleLevel::Comfortable),
            "luxury" => Ok(LifestyleLevel::Luxury),
            other => Err(format!(
                "unknown lifestyle '{}' (expected budget, moderate, comfortable or luxury)",
                other
            )),
        }
    }
}

// ============================================================================
// TESTS
// ============================================================================
