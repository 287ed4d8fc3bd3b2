// Entity Models
//
// - City: immutable domestic reference data
// - Household: per-call household composition and preferences
// - Location: researched cross-border cost snapshot

pub mod city;
pub mod household;
pub mod location;

pub use city::{City, STUDIO_RENT_RATIO};
pub use household::{
    BedroomType, Child, ChildcareTier, DiningFrequency, GroceryTier, HouseholdOptions,
    LifestyleLevel, LifestyleTiers, RestaurantTier,
};
pub use location::{
    ChildcareCosts, FoodCosts, HealthcareCosts, HousingCosts, IncomeBenchmarks, LifestyleCosts,
    LocationData, QualityIndices, TaxData, TransportationCosts, UtilityCosts,
};
