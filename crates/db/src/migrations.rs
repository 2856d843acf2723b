use sqlx::migrate::{MigrateError, Migrator};

use crate::DbPool;

pub static MIGRATOR: Migrator = sqlx::migrate!("../../migrations");

pub async fn run_pending(pool: &DbPool) -> Result<(), MigrateError> {
    MIGRATOR.run(pool).await
}

#[cfg(test)]
mod tests {
    use sqlx::Row;

    use super::run_pending;
    use crate::{connect_with_settings, migrations::MIGRATOR};

    const MANAGED_SCHEMA_OBJECTS: &[&str] =
        &["recommendation", "idx_recommendation_created_at", "idx_recommendation_owner"];

    #[tokio::test]
    async fn migrations_create_recommendation_table() {
        let pool = connect_with_settings("sqlite::memory:", 1, 30).await.expect("connect");
        run_pending(&pool).await.expect("run migrations");

        let columns: Vec<String> =
            sqlx::query("SELECT name FROM pragma_table_info('recommendation')")
                .fetch_all(&pool)
                .await
                .expect("table info")
                .into_iter()
                .map(|row| row.get::<String, _>("name"))
                .collect();

        for expected in [
            "id",
            "owner",
            "requester_name",
            "activity_field",
            "service_model_score",
            "recommended_provider",
            "provider_details",
            "offering_json",
            "fell_back",
            "created_at",
        ] {
            assert!(columns.iter().any(|column| column == expected), "missing column {expected}");
        }
    }

    #[tokio::test]
    async fn score_outside_range_is_rejected_by_schema() {
        let pool = connect_with_settings("sqlite::memory:", 1, 30).await.expect("connect");
        run_pending(&pool).await.expect("run migrations");

        let outcome = sqlx::query(
            "INSERT INTO recommendation (id, requester_name, activity_field, storage_needs,
                                         requires_encryption, cpu_speed, price_per_hour,
                                         service_model_score, recommended_provider,
                                         provider_details, offering_json, fell_back, created_at)
             VALUES ('rec-1', 'Acme', 'IT', 10, 1, 2.0, 0.1, 6, 'AWS', '{}', '{}', 0,
                     '2026-01-01T00:00:00.000000Z')",
        )
        .execute(&pool)
        .await;

        assert!(outcome.is_err(), "check constraint should reject score 6");
    }

    #[tokio::test]
    async fn migrations_up_down_up_preserves_schema_signature() {
        let pool = connect_with_settings("sqlite::memory:", 1, 30).await.expect("connect");
        run_pending(&pool).await.expect("run migrations");

        let initial_signature = managed_schema_signature(&pool).await;
        assert_eq!(
            initial_signature.len(),
            MANAGED_SCHEMA_OBJECTS.len(),
            "initial migration pass should create all managed schema objects",
        );

        MIGRATOR.undo(&pool, 0).await.expect("undo migrations");

        let after_down_signature = managed_schema_signature(&pool).await;
        assert!(
            after_down_signature.is_empty(),
            "managed schema objects should be removed after full undo",
        );

        run_pending(&pool).await.expect("re-run migrations");

        let after_second_up_signature = managed_schema_signature(&pool).await;
        assert_eq!(
            after_second_up_signature, initial_signature,
            "up/down/up should preserve migration-managed schema signature",
        );
    }

    async fn managed_schema_signature(pool: &sqlx::SqlitePool) -> Vec<(String, String, String)> {
        let mut signature: Vec<(String, String, String)> = sqlx::query(
            "SELECT type, name, IFNULL(sql, '') AS sql
             FROM sqlite_master
             WHERE type IN ('table', 'index')",
        )
        .fetch_all(pool)
        .await
        .expect("load schema objects")
        .into_iter()
        .filter_map(|row| {
            let name = row.get::<String, _>("name");
            if MANAGED_SCHEMA_OBJECTS.contains(&name.as_str()) {
                Some((row.get::<String, _>("type"), name, row.get::<String, _>("sql")))
            } else {
                None
            }
        })
        .collect();
        signature.sort();
        signature
    }
}
