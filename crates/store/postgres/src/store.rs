use async_trait::async_trait;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use tracing::debug;

use lostfound_core::{Item, ItemPage, ItemPatch, ItemQuery, NewItem, Pagination};
use lostfound_store::error::StoreError;
use lostfound_store::store::ItemStore;

use crate::config::PostgresItemConfig;
use crate::migrations;

const COLUMNS: &str =
    "id, type, name, description, location, latitude, longitude, date_reported, image_url, contact_info";

/// Postgres-backed item store using `sqlx`.
pub struct PostgresItemStore {
    pool: PgPool,
    table: String,
}

impl PostgresItemStore {
    /// Create a new store, connecting to Postgres and running migrations.
    pub async fn new(config: &PostgresItemConfig) -> Result<Self, StoreError> {
        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .connect(&config.url)
            .await
            .map_err(|e| StoreError::Connection(e.to_string()))?;

        Self::from_pool(pool, &config.prefix).await
    }

    /// Create from an existing pool (useful for testing).
    pub async fn from_pool(pool: PgPool, prefix: &str) -> Result<Self, StoreError> {
        migrations::run_migrations(&pool, prefix)
            .await
            .map_err(|e| StoreError::Storage(e.to_string()))?;

        Ok(Self {
            pool,
            table: format!("{prefix}items"),
        })
    }
}

#[async_trait]
impl ItemStore for PostgresItemStore {
    async fn list(&self, query: &ItemQuery) -> Result<ItemPage, StoreError> {
        let (where_clause, binds, bind_idx) = build_where_clause(query);

        // Count query.
        let count_sql = format!("SELECT COUNT(*) AS cnt FROM {} {where_clause}", self.table);
        let mut count_q = sqlx::query_scalar::<_, i64>(&count_sql);
        for b in &binds {
            count_q = count_q.bind(b);
        }
        let total = count_q
            .fetch_one(&self.pool)
            .await
            .map_err(|e| StoreError::Storage(e.to_string()))?;

        // Data query.
        let limit_idx = bind_idx;
        let offset_idx = bind_idx + 1;
        let data_sql = format!(
            "SELECT {COLUMNS} FROM {} {where_clause} ORDER BY date_reported DESC, id DESC LIMIT ${limit_idx} OFFSET ${offset_idx}",
            self.table
        );
        let mut data_q = sqlx::query_as::<_, ItemRow>(&data_sql);
        for b in &binds {
            data_q = data_q.bind(b);
        }
        data_q = data_q.bind(i64::from(query.limit));
        data_q = data_q.bind(i64::try_from(query.offset()).unwrap_or(i64::MAX));

        let rows: Vec<ItemRow> = data_q
            .fetch_all(&self.pool)
            .await
            .map_err(|e| StoreError::Storage(e.to_string()))?;

        let items = rows
            .into_iter()
            .map(Item::try_from)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(ItemPage {
            items,
            pagination: Pagination {
                page: query.page,
                limit: query.limit,
                total: u64::try_from(total).unwrap_or_default(),
            },
        })
    }

    async fn get(&self, id: &str) -> Result<Option<Item>, StoreError> {
        let sql = format!("SELECT {COLUMNS} FROM {} WHERE id = $1", self.table);

        let row = sqlx::query_as::<_, ItemRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| StoreError::Storage(e.to_string()))?;

        row.map(Item::try_from).transpose()
    }

    async fn create(&self, item: NewItem) -> Result<Item, StoreError> {
        let sql = format!(
            r"
            INSERT INTO {} (
                id, type, name, description, location,
                latitude, longitude, date_reported, image_url, contact_info
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING {COLUMNS}
            ",
            self.table
        );

        let row = sqlx::query_as::<_, ItemRow>(&sql)
            .bind(uuid::Uuid::new_v4().to_string())
            .bind(item.item_type.as_str())
            .bind(&item.name)
            .bind(&item.description)
            .bind(&item.location)
            .bind(item.latitude)
            .bind(item.longitude)
            .bind(item.date_reported)
            .bind(&item.image_url)
            .bind(&item.contact_info)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| StoreError::Storage(e.to_string()))?;

        debug!(id = %row.id, "item inserted");
        Item::try_from(row)
    }

    async fn update(&self, id: &str, patch: &ItemPatch) -> Result<Option<Item>, StoreError> {
        let (set_clause, values, bind_idx) = build_set_clause(patch);
        if set_clause.is_empty() {
            return self.get(id).await;
        }

        let sql = format!(
            "UPDATE {} SET {set_clause} WHERE id = ${bind_idx} RETURNING {COLUMNS}",
            self.table
        );
        let mut q = sqlx::query_as::<_, ItemRow>(&sql);
        for value in values {
            q = match value {
                SetValue::Text(s) => q.bind(s),
                SetValue::Float(f) => q.bind(f),
            };
        }
        let row = q
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| StoreError::Storage(e.to_string()))?;

        row.map(Item::try_from).transpose()
    }

    async fn delete(&self, id: &str) -> Result<bool, StoreError> {
        let sql = format!("DELETE FROM {} WHERE id = $1", self.table);

        let result = sqlx::query(&sql)
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| StoreError::Storage(e.to_string()))?;

        Ok(result.rows_affected() > 0)
    }
}

/// Escape `LIKE` wildcards so user input matches literally.
fn escape_like(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('%');
    for c in value.chars() {
        if matches!(c, '\\' | '%' | '_') {
            out.push('\\');
        }
        out.push(c);
    }
    out.push('%');
    out
}

/// Build the WHERE clause and bind values for a listing.
///
/// Returns the clause, the text binds in order, and the next free bind index.
fn build_where_clause(query: &ItemQuery) -> (String, Vec<String>, u32) {
    let mut conditions = Vec::new();
    let mut bind_idx = 1u32;
    let mut binds: Vec<String> = Vec::new();

    if let Some(item_type) = query.item_type {
        conditions.push(format!("type = ${bind_idx}"));
        binds.push(item_type.as_str().to_owned());
        bind_idx += 1;
    }

    if let Some(ref location) = query.location {
        conditions.push(format!("location ILIKE ${bind_idx} ESCAPE '\\'"));
        binds.push(escape_like(location));
        bind_idx += 1;
    }

    if let Some(ref search) = query.search {
        conditions.push(format!(
            "(name ILIKE ${bind_idx} ESCAPE '\\' OR description ILIKE ${bind_idx} ESCAPE '\\')"
        ));
        binds.push(escape_like(search));
        bind_idx += 1;
    }

    let where_clause = if conditions.is_empty() {
        String::new()
    } else {
        format!("WHERE {}", conditions.join(" AND "))
    };

    (where_clause, binds, bind_idx)
}

#[derive(Debug, PartialEq)]
enum SetValue {
    Text(String),
    Float(f64),
}

/// Build the SET clause for the fields present in `patch`.
fn build_set_clause(patch: &ItemPatch) -> (String, Vec<SetValue>, u32) {
    let mut assignments = Vec::new();
    let mut values = Vec::new();
    let mut bind_idx = 1u32;

    let texts: [(&str, Option<String>); 6] = [
        ("type", patch.item_type.map(|t| t.as_str().to_owned())),
        ("name", patch.name.clone()),
        ("description", patch.description.clone()),
        ("location", patch.location.clone()),
        ("image_url", patch.image_url.clone()),
        ("contact_info", patch.contact_info.clone()),
    ];
    for (col, value) in texts {
        if let Some(v) = value {
            assignments.push(format!("{col} = ${bind_idx}"));
            values.push(SetValue::Text(v));
            bind_idx += 1;
        }
    }

    for (col, value) in [("latitude", patch.latitude), ("longitude", patch.longitude)] {
        if let Some(v) = value {
            assignments.push(format!("{col} = ${bind_idx}"));
            values.push(SetValue::Float(v));
            bind_idx += 1;
        }
    }

    (assignments.join(", "), values, bind_idx)
}

/// Internal row type for mapping database rows to `Item`.
#[derive(sqlx::FromRow)]
struct ItemRow {
    id: String,
    #[sqlx(rename = "type")]
    item_type: String,
    name: String,
    description: String,
    location: String,
    latitude: Option<f64>,
    longitude: Option<f64>,
    date_reported: chrono::DateTime<chrono::Utc>,
    image_url: Option<String>,
    contact_info: String,
}

impl TryFrom<ItemRow> for Item {
    type Error = StoreError;

    fn try_from(row: ItemRow) -> Result<Self, Self::Error> {
        let item_type = row
            .item_type
            .parse()
            .map_err(StoreError::Serialization)?;

        Ok(Self {
            id: row.id,
            item_type,
            name: row.name,
            description: row.description,
            location: row.location,
            latitude: row.latitude,
            longitude: row.longitude,
            date_reported: row.date_reported,
            image_url: row.image_url,
            contact_info: row.contact_info,
        })
    }
}
