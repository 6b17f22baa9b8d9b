use sea_orm::{ConnectionTrait, Database, DatabaseBackend, DatabaseConnection, Statement};

/// Tables in creation order, each with its DDL
const TABLES: &[(&str, &str)] = &[
    (
        "a001_menu_item",
        r#"
        CREATE TABLE a001_menu_item (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL,
            description TEXT NOT NULL DEFAULT '',
            price REAL NOT NULL,
            category TEXT NOT NULL,
            image TEXT,
            availability TEXT NOT NULL DEFAULT 'Available',
            is_deleted INTEGER NOT NULL DEFAULT 0,
            created_at TEXT,
            updated_at TEXT,
            version INTEGER NOT NULL DEFAULT 0
        );
        "#,
    ),
    (
        "a002_order",
        r#"
        CREATE TABLE a002_order (
            id TEXT PRIMARY KEY NOT NULL,
            code TEXT NOT NULL UNIQUE,
            number INTEGER NOT NULL UNIQUE,
            customer_id TEXT NOT NULL,
            customer_email TEXT NOT NULL,
            customer_name TEXT NOT NULL DEFAULT '',
            lines_json TEXT NOT NULL,
            subtotal REAL NOT NULL,
            discount REAL NOT NULL DEFAULT 0,
            promo_code TEXT,
            delivery_fee REAL NOT NULL,
            total REAL NOT NULL,
            delivery_address TEXT NOT NULL,
            contact_number TEXT NOT NULL,
            special_instructions TEXT,
            payment_method TEXT NOT NULL,
            status TEXT NOT NULL,
            timeline_json TEXT NOT NULL,
            is_deleted INTEGER NOT NULL DEFAULT 0,
            created_at TEXT,
            updated_at TEXT,
            version INTEGER NOT NULL DEFAULT 0
        );
        "#,
    ),
    (
        "a003_complaint",
        r#"
        CREATE TABLE a003_complaint (
            id TEXT PRIMARY KEY NOT NULL,
            code TEXT NOT NULL UNIQUE,
            customer_id TEXT NOT NULL,
            customer_email TEXT NOT NULL,
            order_id TEXT,
            order_code TEXT,
            issue TEXT,
            description TEXT NOT NULL,
            image_ref TEXT,
            status TEXT NOT NULL,
            is_deleted INTEGER NOT NULL DEFAULT 0,
            created_at TEXT,
            updated_at TEXT,
            version INTEGER NOT NULL DEFAULT 0
        );
        "#,
    ),
    (
        "a004_promotion",
        r#"
        CREATE TABLE a004_promotion (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            code TEXT NOT NULL UNIQUE,
            description TEXT NOT NULL DEFAULT '',
            kind TEXT NOT NULL,
            value REAL NOT NULL,
            usage_limit TEXT NOT NULL,
            usage_max INTEGER,
            status TEXT NOT NULL,
            times_used INTEGER NOT NULL DEFAULT 0,
            is_deleted INTEGER NOT NULL DEFAULT 0,
            created_at TEXT,
            updated_at TEXT,
            version INTEGER NOT NULL DEFAULT 0
        );
        "#,
    ),
    (
        "sys_accounts",
        r#"
        CREATE TABLE sys_accounts (
            id TEXT PRIMARY KEY NOT NULL,
            email TEXT NOT NULL UNIQUE,
            password_hash TEXT NOT NULL,
            name TEXT NOT NULL,
            role TEXT NOT NULL,
            contact_number TEXT,
            address TEXT,
            is_deleted INTEGER NOT NULL DEFAULT 0,
            created_at TEXT NOT NULL,
            updated_at TEXT NOT NULL,
            last_login_at TEXT
        );
        "#,
    ),
    (
        "sys_sessions",
        r#"
        CREATE TABLE sys_sessions (
            token_hash TEXT PRIMARY KEY NOT NULL,
            account_id TEXT NOT NULL,
            created_at TEXT NOT NULL,
            revoked_at TEXT
        );
        "#,
    ),
    (
        "sys_sequences",
        r#"
        CREATE TABLE sys_sequences (
            name TEXT PRIMARY KEY NOT NULL,
            value INTEGER NOT NULL
        );
        "#,
    ),
    (
        "sys_account_state",
        r#"
        CREATE TABLE sys_account_state (
            account_id TEXT NOT NULL,
            kind TEXT NOT NULL,
            payload_json TEXT NOT NULL,
            updated_at TEXT NOT NULL,
            PRIMARY KEY (account_id, kind)
        );
        "#,
    ),
    (
        "system_log",
        r#"
        CREATE TABLE system_log (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            timestamp TEXT NOT NULL,
            source TEXT NOT NULL,
            category TEXT NOT NULL,
            message TEXT NOT NULL
        );
        "#,
    ),
];

/// Open (creating if needed) the SQLite file and make sure every table exists
pub async fn initialize_database(db_file: &str) -> anyhow::Result<DatabaseConnection> {
    if let Some(parent) = std::path::Path::new(db_file).parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    let absolute_path = if std::path::Path::new(db_file).is_absolute() {
        std::path::PathBuf::from(db_file)
    } else {
        std::env::current_dir()?.join(db_file)
    };
    // Normalize path separators and ensure proper URL form on Windows
    let normalized = absolute_path.to_string_lossy().replace('\\', "/");
    let needs_leading_slash = !normalized.starts_with('/') && normalized.contains(':');
    let prefix = if needs_leading_slash { "/" } else { "" };
    let db_url = format!("sqlite://{}{}?mode=rwc", prefix, normalized);

    tracing::info!("Connecting to database: {}", absolute_path.display());
    let conn = Database::connect(&db_url).await?;
    ensure_schema(&conn).await?;
    Ok(conn)
}

async fn table_exists<C: ConnectionTrait>(conn: &C, table: &str) -> anyhow::Result<bool> {
    let rows = conn
        .query_all(Statement::from_sql_and_values(
            DatabaseBackend::Sqlite,
            "SELECT name FROM sqlite_master WHERE type='table' AND name = ?;",
            [table.into()],
        ))
        .await?;
    Ok(!rows.is_empty())
}

/// Create every missing table; existing tables are left as they are
pub async fn ensure_schema<C: ConnectionTrait>(conn: &C) -> anyhow::Result<()> {
    for (table, ddl) in TABLES {
        if table_exists(conn, table).await? {
            continue;
        }
        tracing::info!("Creating {} table", table);
        conn.execute(Statement::from_string(
            DatabaseBackend::Sqlite,
            ddl.to_string(),
        ))
        .await?;
    }
    Ok(())
}

/// Drop every table and recreate the schema from scratch
pub async fn reset_schema<C: ConnectionTrait>(conn: &C) -> anyhow::Result<()> {
    for (table, _) in TABLES.iter().rev() {
        tracing::warn!("Dropping {} table", table);
        conn.execute(Statement::from_string(
            DatabaseBackend::Sqlite,
            format!("DROP TABLE IF EXISTS {};", table),
        ))
        .await?;
    }
    ensure_schema(conn).await
}
