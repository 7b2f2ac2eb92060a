// metrology-core/src/infrastructure/adapters/duckdb.rs

use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use duckdb::{Config, Connection, params, params_from_iter};
use std::sync::{Arc, Mutex, MutexGuard};

use crate::domain::catalog::{Category, Product};
use crate::domain::error::DomainError;
use crate::domain::violation::Violation;
use crate::error::MetrologyError;
use crate::infrastructure::error::{DatabaseError, InfrastructureError};
use crate::ports::store::{ProductFilter, ProductRepository, ViolationFilter, ViolationRepository};

// Timestamps are stored as fixed-width RFC3339 text so that string order is
// chronological order.
const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS categories (
    id VARCHAR PRIMARY KEY,
    name VARCHAR NOT NULL,
    description VARCHAR,
    compliance_rules VARCHAR NOT NULL,
    created_at VARCHAR NOT NULL
);
CREATE TABLE IF NOT EXISTS products (
    id VARCHAR PRIMARY KEY,
    platform_id VARCHAR NOT NULL,
    category_id VARCHAR,
    external_id VARCHAR,
    name VARCHAR NOT NULL,
    description VARCHAR,
    price DOUBLE,
    weight VARCHAR,
    dimensions VARCHAR,
    raw_data VARCHAR NOT NULL,
    url VARCHAR,
    scraped_at VARCHAR NOT NULL,
    updated_at VARCHAR NOT NULL
);
CREATE TABLE IF NOT EXISTS violations (
    id VARCHAR PRIMARY KEY,
    product_id VARCHAR NOT NULL,
    rule_type VARCHAR NOT NULL,
    severity VARCHAR NOT NULL,
    description VARCHAR NOT NULL,
    details VARCHAR,
    status VARCHAR NOT NULL,
    assigned_to VARCHAR,
    created_at VARCHAR NOT NULL,
    resolved_at VARCHAR,
    notes VARCHAR
);
"#;

const PRODUCT_COLUMNS: &str = "id, platform_id, category_id, external_id, name, description, \
     price, weight, dimensions, raw_data, url, scraped_at, updated_at";

const VIOLATION_COLUMNS: &str = "id, product_id, rule_type, severity, description, details, \
     status, assigned_to, created_at, resolved_at, notes";

/// DuckDB-backed store. One connection shared behind a mutex.
pub struct DuckDbStore {
    conn: Arc<Mutex<Connection>>,
}

impl DuckDbStore {
    /// Opens (or creates) the database and makes sure the tables exist.
    pub fn new(db_path: &str) -> Result<Self, InfrastructureError> {
        let config = Config::default();

        let conn = if db_path == ":memory:" {
            Connection::open_in_memory_with_flags(config)?
        } else {
            Connection::open_with_flags(db_path, config)?
        };
        conn.execute_batch(SCHEMA)?;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    pub fn open_in_memory() -> Result<Self, InfrastructureError> {
        Self::new(":memory:")
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>, MetrologyError> {
        self.conn
            .lock()
            .map_err(|_| InfrastructureError::Database(DatabaseError::Poisoned).into())
    }
}

fn db(err: duckdb::Error) -> MetrologyError {
    MetrologyError::Infrastructure(InfrastructureError::from(err))
}

fn json(err: serde_json::Error) -> MetrologyError {
    MetrologyError::Infrastructure(InfrastructureError::JsonError(err))
}

fn stamp(at: &DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn parse_stamp(raw: &str) -> Result<DateTime<Utc>, MetrologyError> {
    DateTime::parse_from_rfc3339(raw)
        .map(|at| at.with_timezone(&Utc))
        .map_err(|e| InfrastructureError::Decode(format!("timestamp '{}': {}", raw, e)).into())
}

fn parse_enum<T: std::str::FromStr<Err = String>>(raw: &str) -> Result<T, MetrologyError> {
    raw.parse::<T>()
        .map_err(|e| InfrastructureError::Decode(e).into())
}

// Rows are pulled out as plain columns first; decoding JSON and enums happens
// outside the duckdb row callback so failures surface as our own errors.
struct ProductRow {
    id: String,
    platform_id: String,
    category_id: Option<String>,
    external_id: Option<String>,
    name: String,
    description: Option<String>,
    price: Option<f64>,
    weight: Option<String>,
    dimensions: Option<String>,
    raw_data: String,
    url: Option<String>,
    scraped_at: String,
    updated_at: String,
}

impl ProductRow {
    fn read(row: &duckdb::Row<'_>) -> duckdb::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            platform_id: row.get(1)?,
            category_id: row.get(2)?,
            external_id: row.get(3)?,
            name: row.get(4)?,
            description: row.get(5)?,
            price: row.get(6)?,
            weight: row.get(7)?,
            dimensions: row.get(8)?,
            raw_data: row.get(9)?,
            url: row.get(10)?,
            scraped_at: row.get(11)?,
            updated_at: row.get(12)?,
        })
    }

    fn decode(self) -> Result<Product, MetrologyError> {
        Ok(Product {
            id: self.id,
            platform_id: self.platform_id,
            category_id: self.category_id,
            external_id: self.external_id,
            name: self.name,
            description: self.description,
            price: self.price,
            weight: self.weight,
            dimensions: self.dimensions,
            raw_data: serde_json::from_str(&self.raw_data).map_err(json)?,
            url: self.url,
            scraped_at: parse_stamp(&self.scraped_at)?,
            updated_at: parse_stamp(&self.updated_at)?,
        })
    }
}

struct CategoryRow {
    id: String,
    name: String,
    description: Option<String>,
    compliance_rules: String,
    created_at: String,
}

impl CategoryRow {
    fn read(row: &duckdb::Row<'_>) -> duckdb::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            name: row.get(1)?,
            description: row.get(2)?,
            compliance_rules: row.get(3)?,
            created_at: row.get(4)?,
        })
    }

    fn decode(self) -> Result<Category, MetrologyError> {
        Ok(Category {
            id: self.id,
            name: self.name,
            description: self.description,
            compliance_rules: serde_json::from_str(&self.compliance_rules).map_err(json)?,
            created_at: parse_stamp(&self.created_at)?,
        })
    }
}

struct ViolationRow {
    id: String,
    product_id: String,
    rule_type: String,
    severity: String,
    description: String,
    details: Option<String>,
    status: String,
    assigned_to: Option<String>,
    created_at: String,
    resolved_at: Option<String>,
    notes: Option<String>,
}

impl ViolationRow {
    fn read(row: &duckdb::Row<'_>) -> duckdb::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            product_id: row.get(1)?,
            rule_type: row.get(2)?,
            severity: row.get(3)?,
            description: row.get(4)?,
            details: row.get(5)?,
            status: row.get(6)?,
            assigned_to: row.get(7)?,
            created_at: row.get(8)?,
            resolved_at: row.get(9)?,
            notes: row.get(10)?,
        })
    }

    fn decode(self) -> Result<Violation, MetrologyError> {
        Ok(Violation {
            id: self.id,
            product_id: self.product_id,
            rule_type: self.rule_type,
            severity: parse_enum(&self.severity)?,
            description: self.description,
            details: self
                .details
                .as_deref()
                .map(serde_json::from_str::<serde_json::Value>)
                .transpose()
                .map_err(json)?,
            status: parse_enum(&self.status)?,
            assigned_to: self.assigned_to,
            created_at: parse_stamp(&self.created_at)?,
            resolved_at: self.resolved_at.as_deref().map(parse_stamp).transpose()?,
            notes: self.notes,
        })
    }
}

fn query_violations(
    conn: &Connection,
    sql: &str,
    values: &[String],
) -> Result<Vec<Violation>, MetrologyError> {
    let mut stmt = conn.prepare(sql).map_err(db)?;
    let rows = stmt
        .query_map(params_from_iter(values.iter()), ViolationRow::read)
        .map_err(db)?;

    let mut violations = Vec::new();
    for row in rows {
        violations.push(row.map_err(db)?.decode()?);
    }
    Ok(violations)
}

#[async_trait]
impl ProductRepository for DuckDbStore {
    async fn get_product_by_id(
        &self,
        id: &str,
    ) -> Result<Option<(Product, Option<Category>)>, MetrologyError> {
        let conn = self.lock()?;

        let mut stmt = conn
            .prepare(&format!("SELECT {} FROM products WHERE id = ?", PRODUCT_COLUMNS))
            .map_err(db)?;
        let row = stmt
            .query_map(params![id], ProductRow::read)
            .map_err(db)?
            .next()
            .transpose()
            .map_err(db)?;
        let Some(row) = row else {
            return Ok(None);
        };
        let product = row.decode()?;

        let category = match product.category_id.as_deref() {
            Some(category_id) => {
                let mut stmt = conn
                    .prepare(
                        "SELECT id, name, description, compliance_rules, created_at \
                         FROM categories WHERE id = ?",
                    )
                    .map_err(db)?;
                let row = stmt
                    .query_map(params![category_id], CategoryRow::read)
                    .map_err(db)?
                    .next()
                    .transpose()
                    .map_err(db)?;
                row.map(CategoryRow::decode).transpose()?
            }
            None => None,
        };

        Ok(Some((product, category)))
    }

    async fn list_product_ids(&self, filter: &ProductFilter) -> Result<Vec<String>, MetrologyError> {
        let (clause, values) = match filter {
            ProductFilter::All => ("", vec![]),
            ProductFilter::Platform(platform_id) => {
                ("WHERE platform_id = ?", vec![platform_id.clone()])
            }
            ProductFilter::UpdatedBefore(cutoff) => ("WHERE updated_at < ?", vec![stamp(cutoff)]),
        };

        let conn = self.lock()?;
        let mut stmt = conn
            .prepare(&format!("SELECT id FROM products {} ORDER BY id", clause))
            .map_err(db)?;
        let rows = stmt
            .query_map(params_from_iter(values.iter()), |row| row.get::<_, String>(0))
            .map_err(db)?;

        let mut ids = Vec::new();
        for row in rows {
            ids.push(row.map_err(db)?);
        }
        Ok(ids)
    }

    async fn upsert_product(&self, product: &Product) -> Result<(), MetrologyError> {
        let raw_data = serde_json::to_string(&product.raw_data).map_err(json)?;
        let conn = self.lock()?;
        conn.execute(
            &format!(
                "INSERT OR REPLACE INTO products ({}) \
                 VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
                PRODUCT_COLUMNS
            ),
            params![
                product.id,
                product.platform_id,
                product.category_id,
                product.external_id,
                product.name,
                product.description,
                product.price,
                product.weight,
                product.dimensions,
                raw_data,
                product.url,
                stamp(&product.scraped_at),
                stamp(&product.updated_at),
            ],
        )
        .map_err(db)?;
        Ok(())
    }

    async fn upsert_category(&self, category: &Category) -> Result<(), MetrologyError> {
        let rules = serde_json::to_string(&category.compliance_rules).map_err(json)?;
        let conn = self.lock()?;
        conn.execute(
            "INSERT OR REPLACE INTO categories (id, name, description, compliance_rules, created_at) \
             VALUES (?, ?, ?, ?, ?)",
            params![
                category.id,
                category.name,
                category.description,
                rules,
                stamp(&category.created_at),
            ],
        )
        .map_err(db)?;
        Ok(())
    }

    async fn list_categories(&self) -> Result<Vec<Category>, MetrologyError> {
        let conn = self.lock()?;
        let mut stmt = conn
            .prepare(
                "SELECT id, name, description, compliance_rules, created_at \
                 FROM categories ORDER BY id",
            )
            .map_err(db)?;
        let rows = stmt.query_map([], CategoryRow::read).map_err(db)?;

        let mut categories = Vec::new();
        for row in rows {
            categories.push(row.map_err(db)?.decode()?);
        }
        Ok(categories)
    }
}

#[async_trait]
impl ViolationRepository for DuckDbStore {
    async fn insert_violation(&self, record: Violation) -> Result<Violation, MetrologyError> {
        let details = record
            .details
            .as_ref()
            .map(serde_json::to_string)
            .transpose()
            .map_err(json)?;

        let conn = self.lock()?;
        conn.execute(
            &format!(
                "INSERT INTO violations ({}) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
                VIOLATION_COLUMNS
            ),
            params![
                record.id,
                record.product_id,
                record.rule_type,
                record.severity.as_str(),
                record.description,
                details,
                record.status.as_str(),
                record.assigned_to,
                stamp(&record.created_at),
                record.resolved_at.as_ref().map(stamp),
                record.notes,
            ],
        )
        .map_err(db)?;
        Ok(record)
    }

    async fn list_violations_by_product(
        &self,
        product_id: &str,
    ) -> Result<Vec<Violation>, MetrologyError> {
        let conn = self.lock()?;
        query_violations(
            &conn,
            &format!(
                "SELECT {} FROM violations WHERE product_id = ? ORDER BY created_at DESC, id",
                VIOLATION_COLUMNS
            ),
            &[product_id.to_string()],
        )
    }

    async fn get_violation(&self, id: &str) -> Result<Option<Violation>, MetrologyError> {
        let conn = self.lock()?;
        let found = query_violations(
            &conn,
            &format!("SELECT {} FROM violations WHERE id = ?", VIOLATION_COLUMNS),
            &[id.to_string()],
        )?;
        Ok(found.into_iter().next())
    }

    async fn update_violation(&self, violation: &Violation) -> Result<(), MetrologyError> {
        let conn = self.lock()?;
        let changed = conn
            .execute(
                "UPDATE violations SET status = ?, assigned_to = ?, resolved_at = ?, notes = ? \
                 WHERE id = ?",
                params![
                    violation.status.as_str(),
                    violation.assigned_to,
                    violation.resolved_at.as_ref().map(stamp),
                    violation.notes,
                    violation.id,
                ],
            )
            .map_err(db)?;

        if changed == 0 {
            return Err(DomainError::ViolationNotFound(violation.id.clone()).into());
        }
        Ok(())
    }

    async fn list_violations(
        &self,
        filter: &ViolationFilter,
    ) -> Result<Vec<Violation>, MetrologyError> {
        let mut clauses = Vec::new();
        let mut values = Vec::new();

        if let Some(product_id) = &filter.product_id {
            clauses.push("product_id = ?");
            values.push(product_id.clone());
        }
        if let Some(status) = filter.status {
            clauses.push("status = ?");
            values.push(status.as_str().to_string());
        }
        if let Some(severity) = filter.severity {
            clauses.push("severity = ?");
            values.push(severity.as_str().to_string());
        }
        if let Some(user) = &filter.assigned_to {
            clauses.push("assigned_to = ?");
            values.push(user.clone());
        }

        let where_clause = if clauses.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", clauses.join(" AND "))
        };

        let conn = self.lock()?;
        query_violations(
            &conn,
            &format!(
                "SELECT {} FROM violations {} ORDER BY created_at DESC, id",
                VIOLATION_COLUMNS, where_clause
            ),
            &values,
        )
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::domain::catalog::RawValue;
    use crate::domain::compliance::{Severity, ViolationDescriptor};
    use crate::domain::violation::ViolationStatus;
    use anyhow::Result;
    use chrono::Duration;
    use serde_json::json;

    fn store() -> DuckDbStore {
        DuckDbStore::open_in_memory().unwrap()
    }

    #[tokio::test]
    async fn test_product_round_trip_with_category() -> Result<()> {
        let store = store();
        let category = Category::new("c-food", "Food & Beverages").requiring("weight_declaration");
        store.upsert_category(&category).await?;

        let mut product = Product::new("p-1", "amz", "Peanut butter");
        product.category_id = Some("c-food".into());
        product.price = Some(249.0);
        product.weight = Some("340 g".into());
        product
            .raw_data
            .insert("country_of_origin".into(), RawValue::from("India"));
        store.upsert_product(&product).await?;

        let (loaded, loaded_category) = store.get_product_by_id("p-1").await?.unwrap();
        assert_eq!(loaded.price, Some(249.0));
        assert_eq!(loaded.raw_text("country_of_origin").as_deref(), Some("India"));
        assert!(loaded_category.unwrap().requires("weight_declaration"));

        assert!(store.get_product_by_id("missing").await?.is_none());
        Ok(())
    }

    #[tokio::test]
    async fn test_upsert_replaces_and_filters_select_ids() -> Result<()> {
        let store = store();
        let mut old = Product::new("p-b", "flip", "Old listing");
        old.updated_at = Utc::now() - Duration::days(10);
        store.upsert_product(&old).await?;
        store.upsert_product(&Product::new("p-a", "amz", "Fresh")).await?;

        let mut renamed = old.clone();
        renamed.name = "Renamed".into();
        store.upsert_product(&renamed).await?;

        assert_eq!(store.list_product_ids(&ProductFilter::All).await?, vec!["p-a", "p-b"]);
        assert_eq!(
            store.list_product_ids(&ProductFilter::Platform("flip".into())).await?,
            vec!["p-b"]
        );
        let cutoff = Utc::now() - Duration::days(7);
        assert_eq!(
            store.list_product_ids(&ProductFilter::UpdatedBefore(cutoff)).await?,
            vec!["p-b"]
        );

        let (loaded, _) = store.get_product_by_id("p-b").await?.unwrap();
        assert_eq!(loaded.name, "Renamed");
        Ok(())
    }

    #[tokio::test]
    async fn test_violation_lifecycle_is_persisted() -> Result<()> {
        let store = store();
        let now = Utc::now();
        let finding = ViolationDescriptor::new("expiry_date", "Missing expiry date", Severity::Critical)
            .with_details(json!({ "category": "Cosmetics" }));

        let older = store
            .insert_violation(Violation::open("p-1", finding.clone(), now - Duration::hours(1)))
            .await?;
        let newer = store
            .insert_violation(Violation::open("p-1", finding, now))
            .await?;

        let listed = store.list_violations_by_product("p-1").await?;
        assert_eq!(listed.iter().map(|v| v.id.as_str()).collect::<Vec<_>>(), vec![
            newer.id.as_str(),
            older.id.as_str()
        ]);
        assert_eq!(listed[0].details, Some(json!({ "category": "Cosmetics" })));

        let mut resolved = older.clone();
        resolved.resolve(Some("Label updated".into()), now)?;
        store.update_violation(&resolved).await?;

        let loaded = store.get_violation(&older.id).await?.unwrap();
        assert_eq!(loaded.status, ViolationStatus::Resolved);
        assert_eq!(loaded.notes.as_deref(), Some("Label updated"));
        assert!(loaded.resolved_at.is_some());

        let open_only = store
            .list_violations(&ViolationFilter {
                status: Some(ViolationStatus::Open),
                severity: Some(Severity::Critical),
                ..Default::default()
            })
            .await?;
        assert_eq!(open_only.len(), 1);
        assert_eq!(open_only[0].id, newer.id);
        Ok(())
    }

    #[tokio::test]
    async fn test_same_timestamp_violations_list_by_id() -> Result<()> {
        let store = store();
        let now = Utc::now();
        for rule in ["ingredients_list", "expiry_date", "price_display"] {
            let finding = ViolationDescriptor::new(rule, rule, Severity::High);
            store
                .insert_violation(Violation::open("p-1", finding, now))
                .await?;
        }

        let listed = store.list_violations_by_product("p-1").await?;
        let ids: Vec<&str> = listed.iter().map(|v| v.id.as_str()).collect();
        let mut sorted = ids.clone();
        sorted.sort();
        assert_eq!(ids, sorted);

        let filtered = store.list_violations(&ViolationFilter::default()).await?;
        assert_eq!(filtered, listed);
        Ok(())
    }

    #[tokio::test]
    async fn test_update_of_unknown_violation_is_not_found() {
        let store = store();
        let finding = ViolationDescriptor::new("warranty", "Missing warranty", Severity::Low);
        let ghost = Violation::open("p-1", finding, Utc::now());

        let err = store.update_violation(&ghost).await.unwrap_err();
        assert!(err.is_not_found());
    }
}
