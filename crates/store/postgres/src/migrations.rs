use sqlx::PgPool;
use tracing::debug;

/// Run the items table migration, creating the table and indexes if they do
/// not already exist.
pub async fn run_migrations(pool: &PgPool, prefix: &str) -> Result<(), sqlx::Error> {
    let table = format!("{prefix}items");

    let create_table = format!(
        "
        CREATE TABLE IF NOT EXISTS {table} (
            id            TEXT PRIMARY KEY,
            type          TEXT NOT NULL CHECK (type IN ('lost', 'found')),
            name          VARCHAR(100) NOT NULL,
            description   VARCHAR(1000) NOT NULL,
            location      VARCHAR(200) NOT NULL,
            latitude      DOUBLE PRECISION CHECK (latitude BETWEEN -90 AND 90),
            longitude     DOUBLE PRECISION CHECK (longitude BETWEEN -180 AND 180),
            date_reported TIMESTAMPTZ NOT NULL DEFAULT NOW(),
            image_url     TEXT,
            contact_info  VARCHAR(200) NOT NULL
        )
        "
    );

    sqlx::query(&create_table).execute(pool).await?;

    let indexes = [
        format!(
            "CREATE INDEX IF NOT EXISTS idx_{prefix}items_date ON {table} (date_reported DESC, id DESC)"
        ),
        format!(
            "CREATE INDEX IF NOT EXISTS idx_{prefix}items_type ON {table} (type, date_reported DESC)"
        ),
    ];

    for idx in &indexes {
        sqlx::query(idx).execute(pool).await?;
    }

    debug!(table = %table, "item migrations applied");
    Ok(())
}
