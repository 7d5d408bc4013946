use std::str::FromStr;
use std::time::Duration;

use bigdecimal::BigDecimal;

use crate::models::ExternalId;

const DEFAULT_HOST: &str = "localhost";
const DEFAULT_PORT: u16 = 5432;
const DEFAULT_USER: &str = "postgres";
const DEFAULT_PASSWORD: &str = "root";
const DEFAULT_DATABASE: &str = "postgres";

const DEFAULT_POOL_SIZE: u32 = 4;
const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;

/// Connection parameters used when no full `DATABASE_URL` is provided.
#[derive(Debug, Clone, PartialEq)]
pub struct ConnectionParams {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    pub database: String,
}

impl Default for ConnectionParams {
    fn default() -> Self {
        ConnectionParams {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            user: DEFAULT_USER.to_string(),
            password: DEFAULT_PASSWORD.to_string(),
            database: DEFAULT_DATABASE.to_string(),
        }
    }
}

impl ConnectionParams {
    pub fn to_url(&self) -> String {
        format!(
            "postgresql://{}:{}@{}:{}/{}",
            self.user, self.password, self.host, self.port, self.database
        )
    }
}

#[derive(Debug, Clone)]
pub struct DbConfig {
    pub database_url: String,
    pub max_pool_size: u32,
    pub connect_timeout: Duration,
}

impl DbConfig {
    pub fn new(database_url: String) -> Self {
        DbConfig {
            database_url,
            max_pool_size: DEFAULT_POOL_SIZE,
            connect_timeout: Duration::from_secs(DEFAULT_CONNECT_TIMEOUT_SECS),
        }
    }

    pub fn from_params(params: &ConnectionParams) -> Self {
        Self::new(params.to_url())
    }

    /// Reads the configuration from the environment (and `.env` if present).
    pub fn from_env() -> Self {
        dotenv::dotenv().ok();
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Self
        where F: Fn(&str) -> Option<String>
    {
        let database_url = lookup("DATABASE_URL")
            .filter(|x| !x.is_empty())
            .unwrap_or_else(|| {
                let defaults = ConnectionParams::default();
                ConnectionParams {
                    host: lookup("DB_HOST").unwrap_or(defaults.host),
                    port: parse_or(lookup("DB_PORT"), defaults.port),
                    user: lookup("DB_USER").unwrap_or(defaults.user),
                    password: lookup("DB_PASSWORD").unwrap_or(defaults.password),
                    database: lookup("DB_NAME").unwrap_or(defaults.database),
                }.to_url()
            });

        DbConfig {
            database_url,
            max_pool_size: parse_or(lookup("DB_POOL_SIZE"), DEFAULT_POOL_SIZE).max(1),
            connect_timeout: Duration::from_secs(
                parse_or(lookup("DB_CONNECT_TIMEOUT_SECS"), DEFAULT_CONNECT_TIMEOUT_SECS)
            ),
        }
    }
}

impl Default for DbConfig {
    fn default() -> Self {
        Self::from_params(&ConnectionParams::default())
    }
}

fn parse_or<T: FromStr>(value: Option<String>, default: T) -> T {
    value.and_then(|x| x.trim().parse().ok()).unwrap_or(default)
}

/// Identifiers and values the verification run works with.
#[derive(Debug, Clone)]
pub struct VerificationFixture {
    pub unit_id: ExternalId,
    pub product_id: ExternalId,
    pub schedule_id: ExternalId,
    pub negative_quantities: Vec<BigDecimal>,
    pub flow: String,
}

impl Default for VerificationFixture {
    fn default() -> Self {
        let negative_quantities = ["-50", "-1", "-0.01"].iter()
            .filter_map(|x| BigDecimal::from_str(x).ok())
            .collect();

        VerificationFixture {
            unit_id: 101,
            product_id: 901,
            schedule_id: 99,
            negative_quantities,
            flow: "100".to_string(),
        }
    }
}

impl VerificationFixture {
    /// The unit id as stored in the text column of the monitoring table.
    pub fn unit_id_text(&self) -> String {
        self.unit_id.to_string()
    }
}
