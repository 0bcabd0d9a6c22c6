//! Shared helpers for database-backed integration tests.

#![allow(dead_code)]

use tokio::sync::OnceCell;

/// Returns the test database URL from the `TEST_DATABASE_URL` environment variable.
/// Panics if the variable is not set.
pub fn test_db_url() -> String {
    std::env::var("TEST_DATABASE_URL").expect("TEST_DATABASE_URL must be set for integration tests")
}

/// Returns true if the test database URL is configured.
pub fn has_test_db() -> bool {
    std::env::var("TEST_DATABASE_URL").is_ok()
}

static SCHEMA_INIT: OnceCell<()> = OnceCell::const_new();

/// Ensure the test database schema is set up (runs migrations once per test binary).
pub async fn ensure_schema() {
    SCHEMA_INIT
        .get_or_init(|| async {
            let pool = sqlx::PgPool::connect(&test_db_url()).await.unwrap();
            run_migrations(&pool).await;
        })
        .await;
}

/// Connect to the test database with a clean set of tables.
pub async fn setup_test_db() -> timeclock::db::Database {
    ensure_schema().await;
    let db = timeclock::db::Database::connect(&test_db_url())
        .await
        .expect("Failed to connect to test database");
    truncate_all_tables(db.pool()).await;
    db
}

pub async fn truncate_all_tables(pool: &sqlx::PgPool) {
    sqlx::raw_sql("TRUNCATE TABLE materials, time_logs, employees, jobs CASCADE")
        .execute(pool)
        .await
        .unwrap();
}

/// Insert a job and return its id as text. `age_minutes` backdates `created_at`.
pub async fn insert_job(pool: &sqlx::PgPool, name: &str, status: &str, age_minutes: i32) -> String {
    sqlx::query_scalar::<_, String>(
        "INSERT INTO jobs (job_name, status, created_at)
         VALUES ($1, $2, NOW() - make_interval(mins => $3))
         RETURNING id::text",
    )
    .bind(name)
    .bind(status)
    .bind(age_minutes)
    .fetch_one(pool)
    .await
    .unwrap()
}

pub async fn insert_employee(pool: &sqlx::PgPool, pin: &str, active: bool) -> String {
    sqlx::query_scalar::<_, String>(
        "INSERT INTO employees (pin, active) VALUES ($1, $2) RETURNING id::text",
    )
    .bind(pin)
    .bind(active)
    .fetch_one(pool)
    .await
    .unwrap()
}

pub async fn count(pool: &sqlx::PgPool, table: &str) -> i64 {
    sqlx::query_scalar::<_, i64>(&format!("SELECT COUNT(*) FROM {table}"))
        .fetch_one(pool)
        .await
        .unwrap()
}

async fn run_migrations(pool: &sqlx::PgPool) {
    let migration_files = ["supabase/migrations/001_timeclock.sql"];

    for file in &migration_files {
        let path = std::path::Path::new(file);
        if !path.exists() {
            panic!("Migration file not found: {}", file);
        }
        let sql = std::fs::read_to_string(path).unwrap();
        let cleaned = clean_migration_sql(&sql);
        if !cleaned.trim().is_empty() {
            sqlx::raw_sql(&cleaned).execute(pool).await.unwrap_or_else(|e| {
                panic!("Migration {} failed: {}", file, e);
            });
        }
    }
}

/// Remove Supabase-specific SQL (RLS, policies).
fn clean_migration_sql(sql: &str) -> String {
    sql.lines()
        .filter(|line| {
            let t = line.trim();
            !t.contains("ENABLE ROW LEVEL SECURITY") && !t.starts_with("CREATE POLICY")
        })
        .collect::<Vec<_>>()
        .join("\n")
}
