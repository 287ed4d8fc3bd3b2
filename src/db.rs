// 🗄️ Location Cache - researched snapshots keyed by normalized name
//
// Snapshots are immutable once stored. A put with the same key replaces
// the previous snapshot (last write wins); identical payloads only refresh
// fetched_at.

use crate::entities::LocationData;
use anyhow::{Context, Result};
use chrono::{DateTime, Duration, Utc};
use rusqlite::{params, Connection, OptionalExtension};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use tracing::{debug, info};

/// Cached research is reused for a week
pub const DEFAULT_MAX_AGE_DAYS: i64 = 7;

/// Trim, lowercase and collapse internal whitespace
pub fn normalize_location_key(name: &str) -> String {
    name.split_whitespace()
        .map(|part| part.to_lowercase())
        .collect::<Vec<_>>()
        .join(" ")
}

/// SHA-256 of the serialized snapshot
pub fn compute_payload_hash(payload: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(payload.as_bytes());
    format!("{:x}", hasher.finalize())
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CachedLocation {
    pub key: String,
    pub data: LocationData,
    pub payload_hash: String,
    pub fetched_at: DateTime<Utc>,
}

impl CachedLocation {
    /// True while the snapshot is younger than max_age
    pub fn is_fresh(&self, now: DateTime<Utc>, max_age: Duration) -> bool {
        now.signed_duration_since(self.fetched_at) < max_age
    }
}

// ============================================================================
// STORE
// ============================================================================

pub trait LocationStore {
    fn get(&self, key: &str) -> Result<Option<CachedLocation>>;

    /// Store a snapshot; returns false when the payload was already stored
    fn put(&self, key: &str, data: &LocationData, fetched_at: DateTime<Utc>) -> Result<bool>;
}

pub struct SqliteLocationCache {
    conn: Connection,
}

impl SqliteLocationCache {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let conn = Connection::open(path.as_ref())
            .with_context(|| format!("Failed to open location cache: {:?}", path.as_ref()))?;
        Self::from_connection(conn)
    }

    pub fn in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().context("Failed to open in-memory cache")?;
        Self::from_connection(conn)
    }

    pub fn from_connection(conn: Connection) -> Result<Self> {
        setup_cache(&conn)?;
        Ok(SqliteLocationCache { conn })
    }

    pub fn count(&self) -> Result<i64> {
        let count: i64 =
            self.conn
                .query_row("SELECT COUNT(*) FROM location_cache", [], |row| row.get(0))?;
        Ok(count)
    }

    fn stored_hash(&self, key: &str) -> Result<Option<String>> {
        let hash = self
            .conn
            .query_row(
                "SELECT payload_hash FROM location_cache WHERE key = ?1",
                params![key],
                |row| row.get(0),
            )
            .optional()?;
        Ok(hash)
    }
}

pub fn setup_cache(conn: &Connection) -> Result<()> {
    // WAL keeps readers unblocked while a snapshot is written
    conn.pragma_update(None, "journal_mode", "WAL")?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS location_cache (
            key TEXT PRIMARY KEY,
            payload TEXT NOT NULL,
            payload_hash TEXT NOT NULL,
            fetched_at TEXT NOT NULL
        )",
        [],
    )?;

    Ok(())
}

impl LocationStore for SqliteLocationCache {
    fn get(&self, key: &str) -> Result<Option<CachedLocation>> {
        let row: Option<(String, String, String)> = self
            .conn
            .query_row(
                "SELECT payload, payload_hash, fetched_at FROM location_cache WHERE key = ?1",
                params![key],
                |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)),
            )
            .optional()?;

        let Some((payload, payload_hash, fetched_at)) = row else {
            return Ok(None);
        };

        let data: LocationData = serde_json::from_str(&payload)
            .with_context(|| format!("Corrupt cached payload for '{}'", key))?;
        let fetched_at = DateTime::parse_from_rfc3339(&fetched_at)
            .with_context(|| format!("Corrupt fetched_at for '{}'", key))?
            .with_timezone(&Utc);

        Ok(Some(CachedLocation {
            key: key.to_string(),
            data,
            payload_hash,
            fetched_at,
        }))
    }

    fn put(&self, key: &str, data: &LocationData, fetched_at: DateTime<Utc>) -> Result<bool> {
        let payload = serde_json::to_string(data)?;
        let hash = compute_payload_hash(&payload);

        if self.stored_hash(key)?.as_deref() == Some(hash.as_str()) {
            self.conn.execute(
                "UPDATE location_cache SET fetched_at = ?2 WHERE key = ?1",
                params![key, fetched_at.to_rfc3339()],
            )?;
            debug!(key, "identical snapshot, refreshed fetched_at");
            return Ok(false);
        }

        self.conn.execute(
            "INSERT INTO location_cache (key, payload, payload_hash, fetched_at)
             VALUES (?1, ?2, ?3, ?4)
             ON CONFLICT(key) DO UPDATE SET
                payload = excluded.payload,
                payload_hash = excluded.payload_hash,
                fetched_at = excluded.fetched_at",
            params![key, payload, hash, fetched_at.to_rfc3339()],
        )?;

        Ok(true)
    }
}

// ============================================================================
// RESEARCH
// ============================================================================

pub trait LocationResearcher {
    fn research(&self, name: &str) -> Result<LocationData>;
}

/// Serves records from a JSON object of name → LocationData
#[derive(Debug, Clone, Default)]
pub struct JsonFileResearcher {
    records: HashMap<String, LocationData>,
}

impl JsonFileResearcher {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read locations file: {:?}", path.as_ref()))?;
        let records: HashMap<String, LocationData> = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse locations file: {:?}", path.as_ref()))?;

        Ok(Self::from_map(records))
    }

    pub fn from_map(records: HashMap<String, LocationData>) -> Self {
        let records = records
            .into_iter()
            .map(|(name, mut data)| {
                if data.location.is_empty() {
                    data.location = name.trim().to_string();
                }
                (normalize_location_key(&name), data)
            })
            .collect();

        JsonFileResearcher { records }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl LocationResearcher for JsonFileResearcher {
    fn research(&self, name: &str) -> Result<LocationData> {
        self.records
            .get(&normalize_location_key(name))
            .cloned()
            .with_context(|| format!("No research data for location '{}'", name))
    }
}

/// Fresh cached snapshot, or research + store a new one
pub fn fetch_location(
    name: &str,
    store: &dyn LocationStore,
    researcher: &dyn LocationResearcher,
    max_age: Duration,
) -> Result<LocationData> {
    let key = normalize_location_key(name);
    let now = Utc::now();

    if let Some(cached) = store.get(&key)? {
        if cached.is_fresh(now, max_age) {
            info!(location = %key, fetched_at = %cached.fetched_at, "location cache hit");
            return Ok(cached.data);
        }
        info!(location = %key, fetched_at = %cached.fetched_at, "location cache stale");
    } else {
        info!(location = %key, "location cache miss");
    }

    let mut data = researcher
        .research(name)
        .with_context(|| format!("Research failed for '{}'", name))?;
    if data.researched_at.is_none() {
        data.researched_at = Some(now);
    }

    store.put(&key, &data, now)?;
    Ok(data)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data_quality::typical_us_city;
    use std::cell::Cell;

    struct CountingResearcher {
        calls: Cell<usize>,
    }

    impl CountingResearcher {
        fn new() -> Self {
            CountingResearcher { calls: Cell::new(0) }
        }
    }

    impl LocationResearcher for CountingResearcher {
        fn research(&self, name: &str) -> Result<LocationData> {
            self.calls.set(self.calls.get() + 1);
            Ok(LocationData {
                location: name.to_string(),
                ..typical_us_city()
            })
        }
    }

    fn week() -> Duration {
        Duration::days(DEFAULT_MAX_AGE_DAYS)
    }

    #[test]
    fn test_normalize_location_key() {
        assert_eq!(normalize_location_key("  Lisbon,   Portugal "), "lisbon, portugal");
        assert_eq!(normalize_location_key("NEW\tYORK"), "new york");
        assert_eq!(normalize_location_key(""), "");
    }

    #[test]
    fn test_put_and_get_roundtrip() {
        let cache = SqliteLocationCache::in_memory().unwrap();
        let data = LocationData {
            location: "Austin".to_string(),
            ..typical_us_city()
        };
        let now = Utc::now();

        assert!(cache.put("austin", &data, now).unwrap());

        let cached = cache.get("austin").unwrap().unwrap();
        assert_eq!(cached.data.location, "Austin");
        assert_eq!(cached.data.housing.rent_1br, data.housing.rent_1br);
        assert_eq!(cached.payload_hash.len(), 64);
        assert!(cache.get("boston").unwrap().is_none());
    }

    #[test]
    fn test_identical_payload_is_not_rewritten() {
        let cache = SqliteLocationCache::in_memory().unwrap();
        let data = typical_us_city();
        let first = Utc::now() - Duration::days(3);
        let second = Utc::now();

        assert!(cache.put("x", &data, first).unwrap());
        assert!(!cache.put("x", &data, second).unwrap());

        let cached = cache.get("x").unwrap().unwrap();
        assert_eq!(cached.fetched_at.timestamp(), second.timestamp());
        assert_eq!(cache.count().unwrap(), 1);
    }

    #[test]
    fn test_last_write_wins() {
        let cache = SqliteLocationCache::in_memory().unwrap();
        let now = Utc::now();

        cache.put("x", &typical_us_city(), now).unwrap();
        let changed = typical_us_city().scale_prices(2.0);
        assert!(cache.put("x", &changed, now).unwrap());

        let cached = cache.get("x").unwrap().unwrap();
        assert_eq!(cached.data.housing.rent_1br, changed.housing.rent_1br);
        assert_eq!(cache.count().unwrap(), 1);
    }

    #[test]
    fn test_freshness_window() {
        let now = Utc::now();
        let cached = CachedLocation {
            key: "x".to_string(),
            data: LocationData::default(),
            payload_hash: String::new(),
            fetched_at: now - Duration::days(6),
        };

        assert!(cached.is_fresh(now, week()));
        assert!(!cached.is_fresh(now + Duration::days(2), week()));
    }

    #[test]
    fn test_fetch_uses_cache_within_window() {
        let cache = SqliteLocationCache::in_memory().unwrap();
        let researcher = CountingResearcher::new();

        let first = fetch_location("Lisbon", &cache, &researcher, week()).unwrap();
        let second = fetch_location("  lisbon ", &cache, &researcher, week()).unwrap();

        assert_eq!(researcher.calls.get(), 1);
        assert_eq!(first.location, "Lisbon");
        assert_eq!(second.location, "Lisbon");
        assert!(second.researched_at.is_some());
    }

    #[test]
    fn test_fetch_researches_again_when_stale() {
        let cache = SqliteLocationCache::in_memory().unwrap();
        let researcher = CountingResearcher::new();

        fetch_location("Lisbon", &cache, &researcher, week()).unwrap();
        fetch_location("Lisbon", &cache, &researcher, Duration::zero()).unwrap();

        assert_eq!(researcher.calls.get(), 2);
    }

    #[test]
    fn test_json_researcher_normalizes_names() {
        let mut records = HashMap::new();
        records.insert("Mexico City".to_string(), typical_us_city());
        let researcher = JsonFileResearcher::from_map(records);

        let data = researcher.research("MEXICO  city").unwrap();
        assert_eq!(data.location, "Typical US City");
        assert!(researcher.research("Atlantis").is_err());
    }

    #[test]
    fn test_json_researcher_fills_missing_location_name() {
        let mut records = HashMap::new();
        records.insert("Porto".to_string(), LocationData::default());
        let researcher = JsonFileResearcher::from_map(records);

        assert_eq!(researcher.research("porto").unwrap().location, "Porto");
    }

    #[test]
    fn test_corrupt_payload_is_an_error() {
        let cache = SqliteLocationCache::in_memory().unwrap();
        cache
            .conn
            .execute(
                "INSERT INTO location_cache (key, payload, payload_hash, fetched_at)
                 VALUES ('bad', 'not json', '', '2024-01-01T00:00:00Z')",
                [],
            )
            .unwrap();

        assert!(cache.get("bad").is_err());
    }
}
