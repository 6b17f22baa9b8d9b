//! Opaque bearer sessions. Only a SHA-256 digest of each token is stored.

use anyhow::Result;
use base64::{engine::general_purpose, Engine as _};
use chrono::Utc;
use rand::RngCore;
use sea_orm::{ConnectionTrait, DatabaseBackend, Statement};
use sha2::{Digest, Sha256};

const TOKEN_BYTES: usize = 32;

pub fn generate_token() -> String {
    let mut bytes = [0u8; TOKEN_BYTES];
    rand::rngs::OsRng.fill_bytes(&mut bytes);
    general_purpose::URL_SAFE_NO_PAD.encode(bytes)
}

pub fn hash_token(token: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Open a session for the account and return the plain token
pub async fn create<C: ConnectionTrait>(conn: &C, account_id: &str) -> Result<String> {
    let token = generate_token();
    conn.execute(Statement::from_sql_and_values(
        DatabaseBackend::Sqlite,
        "INSERT INTO sys_sessions (token_hash, account_id, created_at) VALUES (?, ?, ?)",
        [
            hash_token(&token).into(),
            account_id.to_string().into(),
            Utc::now().to_rfc3339().into(),
        ],
    ))
    .await?;
    Ok(token)
}

/// Account behind a live (not revoked) token
pub async fn resolve<C: ConnectionTrait>(conn: &C, token: &str) -> Result<Option<String>> {
    let row = conn
        .query_one(Statement::from_sql_and_values(
            DatabaseBackend::Sqlite,
            "SELECT account_id FROM sys_sessions WHERE token_hash = ? AND revoked_at IS NULL",
            [hash_token(token).into()],
        ))
        .await?;
    match row {
        Some(row) => Ok(Some(row.try_get("", "account_id")?)),
        None => Ok(None),
    }
}

/// Returns whether a live session was revoked
pub async fn revoke<C: ConnectionTrait>(conn: &C, token: &str) -> Result<bool> {
    let result = conn
        .execute(Statement::from_sql_and_values(
            DatabaseBackend::Sqlite,
            "UPDATE sys_sessions SET revoked_at = ? WHERE token_hash = ? AND revoked_at IS NULL",
            [Utc::now().to_rfc3339().into(), hash_token(token).into()],
        ))
        .await?;
    Ok(result.rows_affected() > 0)
}

pub async fn revoke_all_for_account<C: ConnectionTrait>(conn: &C, account_id: &str) -> Result<u64> {
    let result = conn
        .execute(Statement::from_sql_and_values(
            DatabaseBackend::Sqlite,
            "UPDATE sys_sessions SET revoked_at = ? WHERE account_id = ? AND revoked_at IS NULL",
            [Utc::now().to_rfc3339().into(), account_id.to_string().into()],
        ))
        .await?;
    Ok(result.rows_affected())
}
