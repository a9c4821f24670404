//! Shared helper utilities for backend integration tests.
//!
//! Integration tests compile as separate crates under `backend/tests/`, so the
//! in-memory store and upstream stubs live here rather than being copied into
//! each test file. Not every test crate uses every helper.
#![allow(dead_code)]

use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Local, TimeDelta, TimeZone, Utc};
use mockable::Clock;
use weatherboard::domain::ports::{
    AttachOutcome, DetachOutcome, Geocoder, GeocoderError, UserLocationRepository,
    UserLocationRepositoryError, UserPersistenceError, UserRepository, WeatherProvider,
    WeatherProviderError, WeatherRecordRepository, WeatherRecordRepositoryError,
};
use weatherboard::domain::{
    CoordinateKey, FixedWindowPolicy, GeoPoint, LocationLabel, MainReadings, PayloadCoordinates,
    UserId, UserLocation, WeatherCondition, WeatherPayload, WeatherRecord, WeatherService,
    WeatherServiceConfig, WeatherServicePorts,
};
use weatherboard::outbound::cache::InMemoryCache;
use weatherboard::outbound::rate_limit::InMemoryRateLimiter;

pub mod cluster_skip;
pub mod embedded_postgres;

pub use cluster_skip::handle_cluster_setup_failure;
pub use embedded_postgres::provision_template_database;

/// Render a `postgres` error with its SQLSTATE, detail and hint.
///
/// The `Display` implementation collapses database errors to `db error`,
/// which is useless in CI logs.
pub fn format_postgres_error(error: &postgres::Error) -> String {
    let Some(db_error) = error.as_db_error() else {
        return error.to_string();
    };

    let mut summary = format!(
        "postgres error {:?}: {}",
        db_error.code(),
        db_error.message()
    );
    if let Some(detail) = db_error.detail() {
        summary.push_str("; detail: ");
        summary.push_str(detail);
    }
    if let Some(hint) = db_error.hint() {
        summary.push_str("; hint: ");
        summary.push_str(hint);
    }
    summary
}

/// Address the stub geocoder resolves to the `40.7,-74` key.
pub const OFFICE_ADDRESS: &str = "350 5th Ave, New York, NY";
/// Address the stub geocoder resolves to the `51.5074,-0.1278` key.
pub const LONDON_ADDRESS: &str = "10 Downing St, London";

pub fn user(id: &str) -> UserId {
    UserId::new(id).expect("valid user id")
}

pub fn label(raw: &str) -> LocationLabel {
    LocationLabel::new(raw).expect("valid label")
}

pub fn key(raw: &str) -> CoordinateKey {
    CoordinateKey::parse(raw).expect("valid coordinate key")
}

pub fn point(lat: f64, lon: f64) -> GeoPoint {
    GeoPoint::new(lat, lon).expect("valid point")
}

/// Clock whose time only moves when a test advances it.
pub struct MutableClock(Mutex<DateTime<Utc>>);

impl MutableClock {
    pub fn at_epoch_secs(secs: i64) -> Self {
        Self(Mutex::new(
            Utc.timestamp_opt(secs, 0).single().expect("valid epoch"),
        ))
    }

    pub fn advance(&self, delta: Duration) {
        let delta = TimeDelta::from_std(delta).expect("duration in range");
        *self.0.lock().expect("clock lock") += delta;
    }
}

impl Clock for MutableClock {
    fn local(&self) -> DateTime<Local> {
        self.utc().with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        *self.0.lock().expect("clock lock")
    }
}

/// A realistic provider payload centred on `point`.
pub fn payload_at(point: GeoPoint, name: &str) -> WeatherPayload {
    WeatherPayload {
        coord: Some(PayloadCoordinates {
            lat: point.latitude(),
            lon: point.longitude(),
        }),
        weather: vec![WeatherCondition {
            id: Some(800),
            main: Some("Clear".to_owned()),
            description: Some("clear sky".to_owned()),
            icon: Some("01d".to_owned()),
        }],
        main: Some(MainReadings {
            temp: Some(293.15),
            feels_like: Some(292.0),
            temp_min: Some(290.0),
            temp_max: Some(295.0),
            pressure: Some(1015.0),
            humidity: Some(40.0),
        }),
        wind: None,
        name: Some(name.to_owned()),
        dt: Some(1_700_000_000),
    }
}

/// A record as the scheduled refresh would have stored it.
pub fn curated_record(raw_key: &str, location: &str, updated_at: DateTime<Utc>) -> WeatherRecord {
    let key = key(raw_key);
    let (lat, lon) = raw_key.split_once(',').expect("lat,lon");
    let point = point(
        lat.parse().expect("latitude"),
        lon.parse().expect("longitude"),
    );
    WeatherRecord {
        coordinate_key: key,
        payload: payload_at(point, location),
        location: location.to_owned(),
        show_on_home_page: true,
        updated_at,
    }
}

#[derive(Default)]
struct StoreState {
    records: BTreeMap<CoordinateKey, WeatherRecord>,
    locations: Vec<UserLocation>,
    users: HashSet<UserId>,
}

/// In-memory stand-in for the PostgreSQL repositories.
///
/// Attach and detach follow the same rules as the Diesel adapters: records
/// are inserted only when absent, labels are upserted, and a detach removes
/// the record once nothing references it unless it is on the home page.
#[derive(Default)]
pub struct InMemoryStore {
    state: Mutex<StoreState>,
}

impl InMemoryStore {
    fn lock(&self) -> MutexGuard<'_, StoreState> {
        self.state.lock().expect("store lock")
    }

    pub fn seed_record(&self, record: WeatherRecord) {
        self.lock()
            .records
            .insert(record.coordinate_key.clone(), record);
    }

    pub fn record(&self, key: &CoordinateKey) -> Option<WeatherRecord> {
        self.lock().records.get(key).cloned()
    }

    pub fn record_count(&self) -> usize {
        self.lock().records.len()
    }

    pub fn locations_for(&self, user_id: &UserId) -> Vec<UserLocation> {
        self.lock()
            .locations
            .iter()
            .filter(|location| &location.user_id == user_id)
            .cloned()
            .collect()
    }

    pub fn has_user(&self, user_id: &UserId) -> bool {
        self.lock().users.contains(user_id)
    }
}

#[async_trait]
impl WeatherRecordRepository for InMemoryStore {
    async fn list_home_page(
        &self,
        limit: usize,
    ) -> Result<Vec<WeatherRecord>, WeatherRecordRepositoryError> {
        let mut visible: Vec<WeatherRecord> = self
            .lock()
            .records
            .values()
            .filter(|record| record.show_on_home_page)
            .cloned()
            .collect();
        visible.sort_by(|a, b| {
            a.location
                .cmp(&b.location)
                .then_with(|| a.coordinate_key.cmp(&b.coordinate_key))
        });
        visible.truncate(limit);
        Ok(visible)
    }

    async fn find_by_keys(
        &self,
        keys: &[CoordinateKey],
    ) -> Result<Vec<WeatherRecord>, WeatherRecordRepositoryError> {
        let state = self.lock();
        Ok(keys
            .iter()
            .filter_map(|key| state.records.get(key).cloned())
            .collect())
    }
}

#[async_trait]
impl UserLocationRepository for InMemoryStore {
    async fn list_for_user(
        &self,
        user_id: &UserId,
        limit: usize,
    ) -> Result<Vec<UserLocation>, UserLocationRepositoryError> {
        let mut owned = self.locations_for(user_id);
        owned.sort_by(|a, b| {
            a.location
                .cmp(&b.location)
                .then_with(|| a.coordinate_key.cmp(&b.coordinate_key))
        });
        owned.truncate(limit);
        Ok(owned)
    }

    async fn find_by_label(
        &self,
        label: &LocationLabel,
    ) -> Result<Vec<UserLocation>, UserLocationRepositoryError> {
        Ok(self
            .lock()
            .locations
            .iter()
            .filter(|location| &location.location == label)
            .cloned()
            .collect())
    }

    async fn attach(
        &self,
        record: &WeatherRecord,
        location: &UserLocation,
    ) -> Result<AttachOutcome, UserLocationRepositoryError> {
        let mut state = self.lock();
        let record_created = !state.records.contains_key(&record.coordinate_key);
        if record_created {
            state
                .records
                .insert(record.coordinate_key.clone(), record.clone());
        }
        let existing = state.locations.iter_mut().find(|held| {
            held.user_id == location.user_id && held.coordinate_key == location.coordinate_key
        });
        let association_created = match existing {
            Some(held) => {
                held.location = location.location.clone();
                false
            }
            None => {
                state.locations.push(location.clone());
                true
            }
        };
        Ok(AttachOutcome {
            record_created,
            association_created,
        })
    }

    async fn detach(
        &self,
        user_id: &UserId,
        key: &CoordinateKey,
    ) -> Result<DetachOutcome, UserLocationRepositoryError> {
        let mut state = self.lock();
        let before = state.locations.len();
        state
            .locations
            .retain(|held| !(&held.user_id == user_id && &held.coordinate_key == key));
        if state.locations.len() == before {
            return Ok(DetachOutcome::NotFound);
        }

        let referenced = state
            .locations
            .iter()
            .any(|held| &held.coordinate_key == key);
        let curated = state
            .records
            .get(key)
            .is_some_and(|record| record.show_on_home_page);
        let record_deleted = !referenced && !curated && state.records.remove(key).is_some();
        Ok(DetachOutcome::Detached { record_deleted })
    }
}

#[async_trait]
impl UserRepository for InMemoryStore {
    async fn ensure_exists(&self, id: &UserId) -> Result<bool, UserPersistenceError> {
        Ok(self.lock().users.insert(id.clone()))
    }
}

/// Geocoder answering from a fixed address book.
pub struct StubGeocoder {
    known: HashMap<String, GeoPoint>,
    calls: AtomicUsize,
}

impl StubGeocoder {
    pub fn with_defaults() -> Self {
        let known = HashMap::from([
            (OFFICE_ADDRESS.to_owned(), point(40.70001, -74.00002)),
            (LONDON_ADDRESS.to_owned(), point(51.5074, -0.1278)),
        ]);
        Self {
            known,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Geocoder for StubGeocoder {
    async fn geocode(&self, address: &str) -> Result<Option<GeoPoint>, GeocoderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.known.get(address).copied())
    }
}

/// Weather provider echoing the requested point back in its payload.
#[derive(Default)]
pub struct StubProvider {
    calls: AtomicUsize,
}

impl StubProvider {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl WeatherProvider for StubProvider {
    async fn current_weather(
        &self,
        point: GeoPoint,
    ) -> Result<WeatherPayload, WeatherProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(payload_at(point, "Stub City"))
    }
}

/// A [`WeatherService`] wired to in-memory adapters, with handles on each.
pub struct Harness {
    pub service: WeatherService,
    pub store: Arc<InMemoryStore>,
    pub geocoder: Arc<StubGeocoder>,
    pub provider: Arc<StubProvider>,
    pub clock: Arc<MutableClock>,
}

/// Knobs for [`Harness::build`].
#[derive(Debug, Clone, Copy)]
pub struct HarnessOptions {
    pub requests_per_minute: u32,
    pub lookups_per_hour: u32,
    pub config: WeatherServiceConfig,
}

impl Default for HarnessOptions {
    fn default() -> Self {
        Self {
            requests_per_minute: 1_000,
            lookups_per_hour: 1_000,
            config: WeatherServiceConfig::default(),
        }
    }
}

impl Harness {
    pub fn new() -> Self {
        Self::build(HarnessOptions::default())
    }

    pub fn build(options: HarnessOptions) -> Self {
        let store = Arc::new(InMemoryStore::default());
        let geocoder = Arc::new(StubGeocoder::with_defaults());
        let provider = Arc::new(StubProvider::default());
        let clock = Arc::new(MutableClock::at_epoch_secs(1_700_000_000));

        let request_policy =
            FixedWindowPolicy::new(options.requests_per_minute, Duration::from_secs(60))
                .expect("valid request policy");
        let lookup_policy =
            FixedWindowPolicy::new(options.lookups_per_hour, Duration::from_secs(3_600))
                .expect("valid lookup policy");

        let ports = WeatherServicePorts {
            records: store.clone(),
            locations: store.clone(),
            users: store.clone(),
            cache: Arc::new(InMemoryCache::new(clock.clone())),
            request_limiter: Arc::new(InMemoryRateLimiter::new(request_policy, clock.clone())),
            lookup_limiter: Arc::new(InMemoryRateLimiter::new(lookup_policy, clock.clone())),
            geocoder: geocoder.clone(),
            provider: provider.clone(),
            clock: clock.clone(),
        };
        let service = WeatherService::new(ports, options.config).expect("valid service config");

        Self {
            service,
            store,
            geocoder,
            provider,
            clock,
        }
    }
}
