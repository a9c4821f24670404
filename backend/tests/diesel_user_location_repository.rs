//! Integration tests for `DieselUserLocationRepository` against embedded PostgreSQL.
//!
//! Attach and detach are the only writes users can trigger, and both must keep
//! the `weather_records` table consistent with the associations pointing at
//! it. Row counts are read back through a plain `postgres` client so the
//! assertions do not depend on the adapter under test.

use chrono::Utc;
use pg_embedded_setup_unpriv::TemporaryDatabase;
use rstest::{fixture, rstest};
use tokio::runtime::Runtime;
use weatherboard::domain::ports::{
    AttachOutcome, DetachOutcome, UserLocationRepository, UserRepository,
};
use weatherboard::domain::{UserId, UserLocation, WeatherRecord};
use weatherboard::outbound::persistence::{
    DbPool, DieselUserLocationRepository, DieselUserRepository, PoolConfig,
};

#[path = "support/pg_embed.rs"]
mod pg_embed;

mod support;

use pg_embed::shared_cluster;
use support::embedded_postgres::{association_rows, seed_curated_record, weather_record_rows};
use support::{
    handle_cluster_setup_failure, key, label, payload_at, point, provision_template_database,
    user,
};

const OFFICE_KEY: &str = "40.7,-74";

struct TestContext {
    runtime: Runtime,
    locations: DieselUserLocationRepository,
    users: DieselUserRepository,
    database_url: String,
    _database: TemporaryDatabase,
}

impl TestContext {
    /// Provisions the user row, then attaches `raw_key` under `location`.
    fn attach(&self, user_id: &str, raw_key: &str, location: &str) -> AttachOutcome {
        let user_id = user(user_id);
        let record = private_record(raw_key, location);
        let association = UserLocation {
            user_id: user_id.clone(),
            coordinate_key: key(raw_key),
            location: label(location),
            show_on_home_page: false,
        };
        self.runtime.block_on(async {
            self.users
                .ensure_exists(&user_id)
                .await
                .expect("user provisioned");
            self.locations
                .attach(&record, &association)
                .await
                .expect("attach succeeds")
        })
    }

    fn detach(&self, user_id: &str, raw_key: &str) -> DetachOutcome {
        self.runtime
            .block_on(self.locations.detach(&user(user_id), &key(raw_key)))
            .expect("detach succeeds")
    }

    fn labels_for(&self, user_id: &UserId, limit: usize) -> Vec<String> {
        self.runtime
            .block_on(self.locations.list_for_user(user_id, limit))
            .expect("list succeeds")
            .into_iter()
            .map(|held| held.location.as_str().to_owned())
            .collect()
    }

    fn record_rows(&self, raw_key: &str) -> i64 {
        weather_record_rows(&self.database_url, raw_key).expect("count records")
    }

    fn association_rows(&self, raw_key: &str) -> i64 {
        association_rows(&self.database_url, raw_key).expect("count associations")
    }
}

fn private_record(raw_key: &str, location: &str) -> WeatherRecord {
    let (lat, lon) = raw_key.split_once(',').expect("lat,lon");
    let point = point(
        lat.parse().expect("latitude"),
        lon.parse().expect("longitude"),
    );
    WeatherRecord {
        coordinate_key: key(raw_key),
        payload: payload_at(point, location),
        location: location.to_owned(),
        show_on_home_page: false,
        updated_at: Utc::now(),
    }
}

fn setup_context() -> Result<TestContext, String> {
    let runtime = Runtime::new().map_err(|err| err.to_string())?;
    let cluster = shared_cluster()?;
    let temp_db = provision_template_database(cluster).map_err(|err| err.to_string())?;
    let database_url = temp_db.url().to_string();

    let config = PoolConfig::new(&database_url)
        .with_max_size(2)
        .with_min_idle(Some(1));
    let pool = runtime
        .block_on(async { DbPool::new(config).await })
        .map_err(|err| err.to_string())?;

    Ok(TestContext {
        runtime,
        locations: DieselUserLocationRepository::new(pool.clone()),
        users: DieselUserRepository::new(pool),
        database_url,
        _database: temp_db,
    })
}

#[fixture]
fn repo_context() -> Option<TestContext> {
    match setup_context() {
        Ok(ctx) => Some(ctx),
        Err(reason) => handle_cluster_setup_failure(reason),
    }
}

#[rstest]
fn attach_inserts_record_and_association(repo_context: Option<TestContext>) {
    let Some(ctx) = repo_context else {
        eprintln!("SKIP-TEST-CLUSTER: attach_inserts_record_and_association skipped");
        return;
    };

    let outcome = ctx.attach("alice", OFFICE_KEY, "Office");

    assert_eq!(
        outcome,
        AttachOutcome {
            record_created: true,
            association_created: true,
        }
    );
    assert_eq!(ctx.record_rows(OFFICE_KEY), 1);
    assert_eq!(ctx.association_rows(OFFICE_KEY), 1);
    assert_eq!(ctx.labels_for(&user("alice"), 10), ["Office"]);
}

#[rstest]
fn re_attaching_relabels_without_touching_the_record(repo_context: Option<TestContext>) {
    let Some(ctx) = repo_context else {
        eprintln!("SKIP-TEST-CLUSTER: re_attaching_relabels_without_touching_the_record skipped");
        return;
    };

    ctx.attach("alice", OFFICE_KEY, "Office");
    let outcome = ctx.attach("alice", OFFICE_KEY, "Work");

    assert_eq!(
        outcome,
        AttachOutcome {
            record_created: false,
            association_created: false,
        }
    );
    assert_eq!(ctx.association_rows(OFFICE_KEY), 1);
    assert_eq!(ctx.labels_for(&user("alice"), 10), ["Work"]);
}

#[rstest]
fn detaching_a_shared_key_keeps_the_record(repo_context: Option<TestContext>) {
    let Some(ctx) = repo_context else {
        eprintln!("SKIP-TEST-CLUSTER: detaching_a_shared_key_keeps_the_record skipped");
        return;
    };

    ctx.attach("alice", OFFICE_KEY, "Office");
    let second = ctx.attach("bob", OFFICE_KEY, "Bob's office");
    assert!(!second.record_created);
    assert!(second.association_created);

    let outcome = ctx.detach("alice", OFFICE_KEY);

    assert_eq!(
        outcome,
        DetachOutcome::Detached {
            record_deleted: false
        }
    );
    assert_eq!(ctx.record_rows(OFFICE_KEY), 1);
    assert_eq!(ctx.association_rows(OFFICE_KEY), 1);
    assert_eq!(ctx.labels_for(&user("bob"), 10), ["Bob's office"]);
}

#[rstest]
fn detaching_the_last_reference_deletes_the_record(repo_context: Option<TestContext>) {
    let Some(ctx) = repo_context else {
        eprintln!("SKIP-TEST-CLUSTER: detaching_the_last_reference_deletes_the_record skipped");
        return;
    };

    ctx.attach("alice", OFFICE_KEY, "Office");
    let outcome = ctx.detach("alice", OFFICE_KEY);

    assert_eq!(
        outcome,
        DetachOutcome::Detached {
            record_deleted: true
        }
    );
    assert_eq!(ctx.record_rows(OFFICE_KEY), 0);
    assert_eq!(ctx.association_rows(OFFICE_KEY), 0);
    assert_eq!(ctx.detach("alice", OFFICE_KEY), DetachOutcome::NotFound);
}

#[rstest]
fn detaching_keeps_home_page_records(repo_context: Option<TestContext>) {
    let Some(ctx) = repo_context else {
        eprintln!("SKIP-TEST-CLUSTER: detaching_keeps_home_page_records skipped");
        return;
    };

    seed_curated_record(&ctx.database_url, OFFICE_KEY, "New York").expect("seed record");
    let attached = ctx.attach("alice", OFFICE_KEY, "Office");
    assert!(!attached.record_created);

    let outcome = ctx.detach("alice", OFFICE_KEY);

    assert_eq!(
        outcome,
        DetachOutcome::Detached {
            record_deleted: false
        }
    );
    assert_eq!(ctx.record_rows(OFFICE_KEY), 1);
    assert_eq!(ctx.association_rows(OFFICE_KEY), 0);
}

#[rstest]
fn detaching_an_unknown_key_is_not_found(repo_context: Option<TestContext>) {
    let Some(ctx) = repo_context else {
        eprintln!("SKIP-TEST-CLUSTER: detaching_an_unknown_key_is_not_found skipped");
        return;
    };

    ctx.attach("bob", OFFICE_KEY, "Office");

    assert_eq!(ctx.detach("alice", OFFICE_KEY), DetachOutcome::NotFound);
    assert_eq!(ctx.record_rows(OFFICE_KEY), 1);
    assert_eq!(ctx.association_rows(OFFICE_KEY), 1);
}

#[rstest]
fn listing_is_per_user_ordered_by_label_and_capped(repo_context: Option<TestContext>) {
    let Some(ctx) = repo_context else {
        eprintln!("SKIP-TEST-CLUSTER: listing_is_per_user_ordered_by_label_and_capped skipped");
        return;
    };

    ctx.attach("alice", "47.3769,8.5417", "Zurich");
    ctx.attach("alice", "52.3676,4.9041", "Amsterdam");
    ctx.attach("alice", "40.4168,-3.7038", "Madrid");
    ctx.attach("bob", "48.8566,2.3522", "Bordeaux");

    assert_eq!(ctx.labels_for(&user("alice"), 2), ["Amsterdam", "Madrid"]);
    assert_eq!(
        ctx.labels_for(&user("alice"), 10),
        ["Amsterdam", "Madrid", "Zurich"]
    );
    assert!(ctx.labels_for(&user("carol"), 10).is_empty());
}

#[rstest]
fn labels_are_found_across_users(repo_context: Option<TestContext>) {
    let Some(ctx) = repo_context else {
        eprintln!("SKIP-TEST-CLUSTER: labels_are_found_across_users skipped");
        return;
    };

    ctx.attach("alice", OFFICE_KEY, "Office");
    ctx.attach("bob", "51.5074,-0.1278", "Office");
    ctx.attach("bob", "48.8566,2.3522", "Paris");

    let mut owners: Vec<String> = ctx
        .runtime
        .block_on(ctx.locations.find_by_label(&label("Office")))
        .expect("lookup succeeds")
        .into_iter()
        .map(|held| held.user_id.as_str().to_owned())
        .collect();
    owners.sort();
    assert_eq!(owners, ["alice", "bob"]);
}
