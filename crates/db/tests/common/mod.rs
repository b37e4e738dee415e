//! Shared setup for database integration tests.
//!
//! Each test starts a throwaway PostgreSQL container and runs the migrations.
//! Docker is required, so the tests are ignored by default:
//! `cargo test -p kaizen-db -- --ignored`

use kaizen_db::migration::{Migrator, MigratorTrait};
use sea_orm::DatabaseConnection;
use testcontainers::ContainerAsync;
use testcontainers::runners::AsyncRunner;
use testcontainers_modules::postgres::Postgres;

pub struct TestDb {
    pub db: DatabaseConnection,
    _container: ContainerAsync<Postgres>,
}

pub async fn setup() -> TestDb {
    let container = Postgres::default()
        .start()
        .await
        .expect("failed to start postgres container");
    let host = container.get_host().await.expect("container host");
    let port = container
        .get_host_port_ipv4(5432)
        .await
        .expect("container port");
    let url = format!("postgres://postgres:postgres@{host}:{port}/postgres");

    let db = kaizen_db::connect(&url)
        .await
        .expect("failed to connect to database");
    Migrator::up(&db, None).await.expect("migrations failed");

    TestDb {
        db,
        _container: container,
    }
}
