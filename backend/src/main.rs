//! Backend entry-point: parses configuration, wires adapters, and runs the
//! HTTP server.

use std::net::SocketAddr;
use std::sync::Arc;

use clap::Parser;
use tracing::warn;
use tracing_subscriber::{EnvFilter, fmt};

use backend::domain::ports::InMemoryIdentityProvider;
use backend::outbound::persistence::{DbPool, PoolConfig};
use backend::server::{ServerConfig, create_server};

/// Ownership-scoped todo service.
#[derive(Debug, Parser)]
#[command(name = "backend", version, about)]
struct Cli {
    /// Socket address to listen on.
    #[arg(long, default_value = "0.0.0.0:8080")]
    bind: SocketAddr,

    /// PostgreSQL connection URL; omit to use in-memory storage.
    #[arg(long, env = "DATABASE_URL")]
    database_url: Option<String>,

    /// Extra users as `name:password` pairs, replacing the built-in fixtures.
    #[arg(long = "user", value_name = "NAME:PASSWORD")]
    users: Vec<String>,
}

fn build_identity(entries: &[String]) -> std::io::Result<Option<InMemoryIdentityProvider>> {
    if entries.is_empty() {
        return Ok(None);
    }
    let mut identity = InMemoryIdentityProvider::new();
    for entry in entries {
        let Some((name, password)) = entry.split_once(':') else {
            return Err(std::io::Error::other(format!(
                "invalid --user value (expected NAME:PASSWORD): {entry}"
            )));
        };
        if name.trim().is_empty() || password.is_empty() {
            return Err(std::io::Error::other(format!(
                "invalid --user value (empty name or password): {entry}"
            )));
        }
        identity = identity.with_user(name.trim(), password);
    }
    Ok(Some(identity))
}

/// Application bootstrap.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let cli = Cli::parse();

    let mut config = ServerConfig::new(cli.bind);
    if let Some(url) = cli.database_url {
        let pool = DbPool::new(PoolConfig::new(url))
            .await
            .map_err(|e| std::io::Error::other(format!("database pool: {e}")))?;
        config = config.with_db_pool(pool);
    }
    if let Some(identity) = build_identity(&cli.users)? {
        config = config.with_identity(Arc::new(identity));
    }

    create_server(config)?.await
}
