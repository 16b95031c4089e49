//! Connection setup and schema bootstrap

use std::time::Duration;

use sea_orm::{
    ConnectOptions, ConnectionTrait, Database, DatabaseConnection, DbErr, EntityTrait, Schema,
};

use crate::entity::{categories, orders, pets, tags, users};

/// Open the shared connection pool. The handle is safe for concurrent use and
/// lives for the whole process.
pub async fn connect(url: &str, timeout: Duration) -> Result<DatabaseConnection, DbErr> {
    let mut options = ConnectOptions::new(url.to_string());
    options
        .connect_timeout(timeout)
        .acquire_timeout(timeout)
        .sqlx_logging(false);

    let db = Database::connect(options).await?;
    db.ping().await?;
    Ok(db)
}

/// Create every collection table (and its indexes) that does not exist yet
pub async fn ensure_schema(db: &DatabaseConnection) -> Result<(), DbErr> {
    create_collection(db, users::Entity).await?;
    create_collection(db, pets::Entity).await?;
    create_collection(db, orders::Entity).await?;
    create_collection(db, categories::Entity).await?;
    create_collection(db, tags::Entity).await?;
    Ok(())
}

async fn create_collection<E>(db: &DatabaseConnection, entity: E) -> Result<(), DbErr>
where
    E: EntityTrait,
{
    let backend = db.get_database_backend();
    let schema = Schema::new(backend);

    let mut table = schema.create_table_from_entity(entity);
    table.if_not_exists();
    db.execute(backend.build(&table)).await?;

    for mut index in schema.create_index_from_entity(entity) {
        index.if_not_exists();
        db.execute(backend.build(&index)).await?;
    }

    tracing::debug!(table = %entity.table_name(), "Collection ready");
    Ok(())
}
