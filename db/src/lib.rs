use sqlx::{
    PgPool,
    postgres::{PgConnectOptions, PgPoolOptions, PgSslMode},
};
use std::{str::FromStr, sync::Arc, time::Duration};

pub mod repository;
pub mod subscription;

pub mod models {
    pub mod subscription;
}

pub mod dtos {
    pub mod subscription;
}

/// Connects to the subscriptions database, creating it first when the server does not
/// have it yet, and applies pending migrations.
pub async fn setup(
    database_url: &str,
    require_ssl: bool,
) -> Result<Arc<PgPool>, Box<dyn std::error::Error>> {
    let (db_name, maintenance_url) = split_database_url(database_url)?;

    let maintenance = PgPool::connect_with(connect_options(&maintenance_url, require_ssl)?).await?;
    let exists: bool =
        sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM pg_database WHERE datname = $1)")
            .bind(&db_name)
            .fetch_one(&maintenance)
            .await?;

    if !exists {
        log::info!("Creating database {}", db_name);
        sqlx::query(&format!("CREATE DATABASE \"{}\"", db_name.replace('"', "\"\"")))
            .execute(&maintenance)
            .await?;
    }
    maintenance.close().await;

    let pool = PgPoolOptions::new()
        .max_connections(10)
        .acquire_timeout(Duration::from_secs(5))
        .connect_with(connect_options(database_url, require_ssl)?)
        .await?;

    sqlx::migrate!("./migrations").run(&pool).await?;
    log::info!("Database {} is ready", db_name);

    Ok(Arc::new(pool))
}

fn connect_options(url: &str, require_ssl: bool) -> Result<PgConnectOptions, sqlx::Error> {
    let options = PgConnectOptions::from_str(url)?;
    Ok(if require_ssl {
        options.ssl_mode(PgSslMode::Require)
    } else {
        options
    })
}

/// Returns the database name and the same URL pointed at the `postgres` maintenance database.
fn split_database_url(database_url: &str) -> Result<(String, String), url::ParseError> {
    let mut url = url::Url::parse(database_url)?;
    let db_name = url.path().trim_start_matches('/').to_string();
    url.set_path("/postgres");
    Ok((db_name, url.to_string()))
}
