//! MySQL connection handling

pub mod insert;
pub mod schema;

use log::{error, info};
use sqlx::ConnectOptions;
use sqlx::MySqlConnection;
use sqlx::mysql::MySqlConnectOptions;

use crate::config::DatabaseConfig;

/// Open the single connection used for the whole run. Connection failures are
/// reported here and surface as `None`; the caller stops without retrying.
pub async fn connect(config: &DatabaseConfig) -> Option<MySqlConnection> {
    // host accepts an optional ":port" suffix, defaulting to 3306
    let (host, port) = match config.host.split_once(':') {
        Some((host, port)) => (host, port.parse().unwrap_or(3306)),
        None => (config.host.as_str(), 3306),
    };

    let options = MySqlConnectOptions::new()
        .host(host)
        .port(port)
        .username(&config.user)
        .password(&config.password)
        .database(&config.database);

    match options.connect().await {
        Ok(conn) => {
            info!(
                "Connected to MySQL database {} on {}",
                config.database, config.host
            );
            Some(conn)
        }
        Err(e) => {
            error!("Error connecting to MySQL database: {e}");
            eprintln!("Error connecting to MySQL database: {e}");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_connect_unreachable_host_returns_none() {
        let config = DatabaseConfig {
            // Port 1 on loopback: nothing listens there, refusal is immediate
            host: "127.0.0.1:1".to_string(),
            database: "db".to_string(),
            user: "u".to_string(),
            password: "p".to_string(),
            table: "t".to_string(),
        };
        assert!(connect(&config).await.is_none());
    }
}
