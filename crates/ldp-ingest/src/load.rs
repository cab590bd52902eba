//! PostgreSQL loader
//!
//! Upserts accepted records into per-source staging tables and appends
//! rejected records to a shared rejects table. Table and column names come
//! from configuration, so they are validated as plain identifiers before
//! ever reaching a SQL string; values are always bound as parameters.

use crate::config::SourceConfig;
use crate::error::Result;
use ldp_core::{FieldType, FieldValue, Record, Rejected, Schema};
use sqlx::postgres::{PgPool, PgPoolOptions};
use std::time::Duration;
use tracing::{debug, info};

/// Maximum connections in the pool; the pipeline is sequential, so this
/// stays small.
pub const DEFAULT_MAX_CONNECTIONS: u32 = 5;

/// Connection acquire timeout in seconds
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;

/// Shared table receiving rejected records from every source
pub const REJECTS_TABLE: &str = "stg_rejects";

const INSERT_REJECT_SQL: &str =
    "INSERT INTO stg_rejects (source_name, raw_payload, reason) VALUES ($1, $2, $3)";

/// Database loader for the pipeline
pub struct Loader {
    pool: PgPool,
}

impl Loader {
    /// Connect a pool to the given PostgreSQL URL
    pub async fn connect(db_url: &str) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(DEFAULT_MAX_CONNECTIONS)
            .acquire_timeout(Duration::from_secs(DEFAULT_CONNECT_TIMEOUT_SECS))
            .connect(db_url)
            .await?;

        Ok(Self { pool })
    }

    /// Drop and recreate the staging tables for every configured source,
    /// plus the shared rejects table.
    pub async fn init_db(&self, sources: &[SourceConfig]) -> Result<()> {
        let mut statements = vec![
            format!("DROP TABLE IF EXISTS {} CASCADE", REJECTS_TABLE),
            format!(
                "CREATE TABLE {} (\n    \
                 id          BIGSERIAL PRIMARY KEY,\n    \
                 source_name TEXT NOT NULL,\n    \
                 raw_payload JSONB NOT NULL,\n    \
                 reason      TEXT NOT NULL,\n    \
                 rejected_at TIMESTAMPTZ NOT NULL DEFAULT NOW()\n)",
                REJECTS_TABLE
            ),
        ];
        for source in sources {
            statements.push(format!("DROP TABLE IF EXISTS {} CASCADE", source.target_table));
            statements.push(build_create_table_sql(
                &source.target_table,
                &source.schema,
                &source.primary_key,
            ));
        }

        for statement in &statements {
            sqlx::query(statement).execute(&self.pool).await?;
        }

        info!(tables = sources.len() + 1, "staging tables initialized");
        Ok(())
    }

    /// Upsert accepted records by primary key.
    ///
    /// All rows for one batch go through a single transaction; returns the
    /// number of rows written.
    pub async fn upsert(
        &self,
        table: &str,
        schema: &Schema,
        primary_key: &str,
        records: &[Record],
    ) -> Result<u64> {
        if records.is_empty() {
            return Ok(0);
        }

        let sql = build_upsert_sql(table, schema, primary_key);
        debug!(table, rows = records.len(), "upserting batch");

        let mut tx = self.pool.begin().await?;
        let mut written = 0u64;
        for record in records {
            let mut query = sqlx::query(&sql);
            for (column, field_type) in schema {
                query = bind_field(query, *field_type, record.get(column));
            }
            query.execute(&mut *tx).await?;
            written += 1;
        }
        tx.commit().await?;

        Ok(written)
    }

    /// Append rejected records to the rejects table, payload as JSONB plus
    /// a readable reason string.
    pub async fn insert_rejects(&self, source_name: &str, rejects: &[Rejected]) -> Result<u64> {
        if rejects.is_empty() {
            return Ok(0);
        }

        let mut tx = self.pool.begin().await?;
        for reject in rejects {
            let payload = serde_json::to_value(&reject.record)?;
            sqlx::query(INSERT_REJECT_SQL)
                .bind(source_name)
                .bind(payload)
                .bind(reject_reason(reject))
                .execute(&mut *tx)
                .await?;
        }
        tx.commit().await?;

        Ok(rejects.len() as u64)
    }
}

type PgQuery<'q> = sqlx::query::Query<'q, sqlx::Postgres, sqlx::postgres::PgArguments>;

/// Bind one field as a typed parameter; missing or mismatched values bind
/// as a typed NULL.
fn bind_field<'q>(
    query: PgQuery<'q>,
    field_type: FieldType,
    value: Option<&FieldValue>,
) -> PgQuery<'q> {
    match field_type {
        FieldType::String => query.bind(match value {
            Some(FieldValue::Str(s)) => Some(s.clone()),
            Some(v) if !v.is_null() => Some(v.to_string()),
            _ => None,
        }),
        FieldType::Integer => query.bind(match value {
            Some(FieldValue::Int(i)) => Some(*i),
            _ => None,
        }),
        FieldType::Float => query.bind(value.and_then(FieldValue::as_f64)),
        FieldType::Boolean => query.bind(match value {
            Some(FieldValue::Bool(b)) => Some(*b),
            _ => None,
        }),
    }
}

/// True for names safe to interpolate into DDL/DML: lowercase letters,
/// digits, underscores, not starting with a digit.
pub fn is_valid_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_lowercase() || c == '_' => {},
        _ => return false,
    }
    chars.all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_')
}

/// Map a declared field type to its PostgreSQL column type
fn pg_type(field_type: FieldType) -> &'static str {
    match field_type {
        FieldType::String => "TEXT",
        FieldType::Integer => "BIGINT",
        FieldType::Float => "DOUBLE PRECISION",
        FieldType::Boolean => "BOOLEAN",
    }
}

/// Build the CREATE TABLE statement for a source's staging table
fn build_create_table_sql(table: &str, schema: &Schema, primary_key: &str) -> String {
    let mut columns: Vec<String> = schema
        .iter()
        .map(|(column, field_type)| {
            let mut ddl = format!("{} {}", column, pg_type(*field_type));
            if column == primary_key {
                ddl.push_str(" PRIMARY KEY");
            }
            ddl
        })
        .collect();
    columns.push("_loaded_at TIMESTAMPTZ NOT NULL DEFAULT NOW()".to_string());

    format!("CREATE TABLE {} (\n    {}\n)", table, columns.join(",\n    "))
}

/// Build the INSERT ... ON CONFLICT upsert statement for a source
fn build_upsert_sql(table: &str, schema: &Schema, primary_key: &str) -> String {
    let columns: Vec<&str> = schema.keys().map(String::as_str).collect();
    let placeholders: Vec<String> = (1..=columns.len()).map(|i| format!("${}", i)).collect();
    let updates: Vec<String> = columns
        .iter()
        .filter(|column| **column != primary_key)
        .map(|column| format!("{} = EXCLUDED.{}", column, column))
        .collect();

    let conflict_action = if updates.is_empty() {
        "DO NOTHING".to_string()
    } else {
        format!("DO UPDATE SET {}", updates.join(", "))
    };

    format!(
        "INSERT INTO {} ({}) VALUES ({}) ON CONFLICT ({}) {}",
        table,
        columns.join(", "),
        placeholders.join(", "),
        primary_key,
        conflict_action
    )
}

/// One reason string per reject row, joining every violation
fn reject_reason(reject: &Rejected) -> String {
    reject
        .violations
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}
