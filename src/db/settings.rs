use async_trait::async_trait;
use sqlx::Row;

use super::Database;
use crate::errors::StoreError;
use crate::services::profile_store::SettingsStore;

impl Database {
    pub async fn get_setting(&self, key: &str) -> Result<Option<String>, StoreError> {
        let row = sqlx::query("SELECT value FROM settings WHERE key = ?")
            .bind(key)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(|row| row.get("value")))
    }

    /// Writes the whole value for `key` in one statement.
    pub async fn put_setting(&self, key: &str, value: &str) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            INSERT INTO settings (key, value, updated_at)
            VALUES (?, ?, strftime('%Y-%m-%dT%H:%M:%fZ', 'now'))
            ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(key)
        .bind(value)
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}

#[async_trait]
impl SettingsStore for Database {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        self.get_setting(key).await
    }

    async fn put(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.put_setting(key, value).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_missing_key_reads_as_none() {
        let db = Database::in_memory().await.unwrap();
        assert_eq!(db.get_setting("webdavSettings").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_put_overwrites_existing_value() {
        let db = Database::in_memory().await.unwrap();

        db.put_setting("debugLogEnabled", "true").await.unwrap();
        db.put_setting("debugLogEnabled", "false").await.unwrap();

        assert_eq!(
            db.get_setting("debugLogEnabled").await.unwrap().as_deref(),
            Some("false")
        );

        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM settings")
            .fetch_one(db.get_pool())
            .await
            .unwrap();
        assert_eq!(count, 1);
    }
}
