use std::sync::{Mutex, MutexGuard};

use rand::Rng;

use wtp_monitor::*;
use wtp_monitor::config::DbConfig;

lazy_static! {
    static ref MIGRATION_SETUP: Mutex<()> = Mutex::new(());
    static ref FIXTURE_LOCK: Mutex<()> = Mutex::new(());
}

/// Connects to `TEST_DATABASE_URL` and creates the tables.
/// The database is expected to carry the monitoring triggers and procedures.
/// Tests using it are `#[ignore]`d, run them with `cargo test -- --ignored`.
pub fn init_db() -> Database {
    dotenv::dotenv().ok();
    let database_url = std::env::var("TEST_DATABASE_URL")
        .expect("TEST_DATABASE_URL must be set");

    let db = Database::connect(DbConfig::new(database_url)).expect("Cannot connect to the test database");

    {
        let _guard = MIGRATION_SETUP.lock().unwrap_or_else(|x| x.into_inner());
        db.setup_migrations().unwrap();
    }

    db
}

/// Serializes the tests that work on the shared verification fixture ids.
pub fn lock_fixture() -> MutexGuard<'static, ()> {
    FIXTURE_LOCK.lock().unwrap_or_else(|x| x.into_inner())
}

/// External id unlikely to collide with real data or with other tests.
pub fn random_external_id() -> i32 {
    rand::thread_rng().gen_range(1_000_000, 2_000_000_000)
}
