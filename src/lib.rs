#[macro_use]
extern crate diesel;
extern crate dotenv;
#[macro_use]
extern crate serde_derive;

#[macro_use]
extern crate diesel_migrations;

use diesel::PgConnection;
use diesel::r2d2::ConnectionManager;
use log::info;
use r2d2::PooledConnection;

use crate::config::DbConfig;
use crate::errors::StoreResult;

pub mod catalog;
pub mod config;
pub mod errors;
pub mod events;
pub mod models;
pub mod procedures;
pub mod relations;
pub mod schema;
pub mod verification;

embed_migrations!();

pub type DbConnection = PooledConnection<ConnectionManager<PgConnection>>;

/// Handle on the monitoring database, built from an explicit [`DbConfig`].
#[derive(Clone)]
pub struct Database {
    pub pool: models::Pool,
    config: DbConfig,
}

impl Database {
    /// Builds the pool without opening a connection; connection problems surface
    /// on the first [`Database::get_connection`].
    pub fn connect(config: DbConfig) -> StoreResult<Self> {
        let manager = ConnectionManager::<PgConnection>::new(config.database_url.clone());
        let pool = r2d2::Pool::builder()
            .max_size(config.max_pool_size.max(1))
            .connection_timeout(config.connect_timeout)
            .build_unchecked(manager);

        Ok(Database { pool, config })
    }

    pub fn config(&self) -> &DbConfig {
        &self.config
    }

    pub fn get_connection(&self) -> StoreResult<DbConnection> {
        Ok(self.pool.get()?)
    }

    /// Creates every declared table that does not exist yet.
    pub fn setup_migrations(&self) -> StoreResult<()> {
        let conn = self.get_connection()?;
        embedded_migrations::run(&conn)?;
        info!("Monitoring tables synchronized with the database");
        Ok(())
    }
}
