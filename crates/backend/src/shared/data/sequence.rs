use sea_orm::{ConnectionTrait, DatabaseBackend, Statement};

/// Counter behind order codes (ORD-NNNNNN)
pub const ORDER_SEQUENCE: &str = "a002_order";
/// Counter behind complaint tickets (CMP-NNNNNN)
pub const COMPLAINT_SEQUENCE: &str = "a003_complaint";

/// Allocate the next value of a named counter, starting at 1.
///
/// A single upsert, so two callers never receive the same value. When `conn` is a
/// transaction the allocation rolls back with it.
pub async fn next_value<C: ConnectionTrait>(conn: &C, name: &str) -> anyhow::Result<i64> {
    let row = conn
        .query_one(Statement::from_sql_and_values(
            DatabaseBackend::Sqlite,
            r#"
            INSERT INTO sys_sequences (name, value) VALUES (?, 1)
            ON CONFLICT(name) DO UPDATE SET value = value + 1
            RETURNING value;
            "#,
            [name.into()],
        ))
        .await?
        .ok_or_else(|| anyhow::anyhow!("sequence {} returned no row", name))?;
    let value: i64 = row.try_get("", "value")?;
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::data::db::test_support::test_db;
    use sea_orm::TransactionTrait;

    #[tokio::test]
    async fn test_counters_are_independent_and_monotonic() {
        let (_dir, conn) = test_db().await;
        assert_eq!(next_value(&conn, ORDER_SEQUENCE).await.unwrap(), 1);
        assert_eq!(next_value(&conn, ORDER_SEQUENCE).await.unwrap(), 2);
        assert_eq!(next_value(&conn, COMPLAINT_SEQUENCE).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_rolled_back_allocation_is_reused() {
        let (_dir, conn) = test_db().await;
        next_value(&conn, ORDER_SEQUENCE).await.unwrap();

        let txn = conn.begin().await.unwrap();
        assert_eq!(next_value(&txn, ORDER_SEQUENCE).await.unwrap(), 2);
        txn.rollback().await.unwrap();

        assert_eq!(next_value(&conn, ORDER_SEQUENCE).await.unwrap(), 2);
    }
}
