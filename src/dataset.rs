// 📂 City Dataset - load the domestic reference list once
//
// CSV headers match the City field names; median_rent_studio may be blank.
// JSON is a plain array of City records.

use crate::entities::City;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::io::Read;
use std::path::Path;
use tracing::{info, warn};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatasetIssue {
    pub city_id: String,
    pub message: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CityDataset {
    cities: Vec<City>,
}

impl CityDataset {
    pub fn new(cities: Vec<City>) -> Self {
        CityDataset { cities }
    }

    /// Load from a CSV file
    pub fn from_csv_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = fs::File::open(path.as_ref())
            .with_context(|| format!("Failed to open city CSV: {:?}", path.as_ref()))?;
        let dataset = Self::from_reader(file)
            .with_context(|| format!("Failed to load city CSV: {:?}", path.as_ref()))?;

        info!(cities = dataset.len(), path = ?path.as_ref(), "loaded city dataset");
        Ok(dataset)
    }

    /// Load CSV rows from any reader
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let mut rdr = csv::Reader::from_reader(reader);

        let mut cities = Vec::new();
        for (line, result) in rdr.deserialize().enumerate() {
            let city: City =
                result.with_context(|| format!("Failed to deserialize city on row {}", line + 1))?;
            cities.push(city);
        }

        Ok(CityDataset { cities })
    }

    /// Load from a JSON array
    pub fn from_json_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read city JSON: {:?}", path.as_ref()))?;
        let cities: Vec<City> =
            serde_json::from_str(&content).context("Failed to parse city JSON")?;

        info!(cities = cities.len(), path = ?path.as_ref(), "loaded city dataset");
        Ok(CityDataset { cities })
    }

    /// Pick the loader from the file extension (.json, otherwise CSV)
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let is_json = path
            .as_ref()
            .extension()
            .map(|ext| ext.eq_ignore_ascii_case("json"))
            .unwrap_or(false);

        if is_json {
            Self::from_json_path(path)
        } else {
            Self::from_csv_path(path)
        }
    }

    pub fn cities(&self) -> &[City] {
        &self.cities
    }

    pub fn iter(&self) -> impl Iterator<Item = &City> {
        self.cities.iter()
    }

    pub fn len(&self) -> usize {
        self.cities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cities.is_empty()
    }

    pub fn find(&self, id: &str) -> Option<&City> {
        self.cities.iter().find(|c| c.id == id)
    }

    /// Invariant violations and duplicate ids across the dataset
    pub fn validate(&self) -> Vec<DatasetIssue> {
        let mut issues = Vec::new();
        let mut seen = HashSet::new();

        for city in &self.cities {
            if !seen.insert(city.id.as_str()) {
                issues.push(DatasetIssue {
                    city_id: city.id.clone(),
                    message: "Duplicate city id".to_string(),
                });
            }

            for message in city.invariant_violations() {
                issues.push(DatasetIssue {
                    city_id: city.id.clone(),
                    message,
                });
            }
        }

        for issue in &issues {
            warn!(city = %issue.city_id, "{}", issue.message);
        }

        issues
    }
}
