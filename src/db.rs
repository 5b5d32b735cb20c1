use std::str::FromStr;

use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};

pub async fn connect_sqlite(database_url: &str, max_connections: u32) -> anyhow::Result<SqlitePool> {
    let options = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(max_connections)
        .connect_with(options)
        .await?;

    Ok(pool)
}

/// Creates the four tables if they are missing. Safe to run on every start;
/// there is no schema versioning.
pub async fn init_schema(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    let statements = [
        r#"
        CREATE TABLE IF NOT EXISTS profissionais (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            nome TEXT
        )
        "#,
        r#"
        CREATE TABLE IF NOT EXISTS estoque (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            produto TEXT,
            quantidade INTEGER,
            unidade TEXT
        )
        "#,
        r#"
        CREATE TABLE IF NOT EXISTS agendamentos (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            cliente TEXT,
            profissional_id INTEGER,
            procedimento TEXT,
            data_hora TEXT,
            valor REAL,
            forma_pagamento TEXT,
            produto_usado_id INTEGER,
            qtd_usada INTEGER,
            status TEXT DEFAULT 'Agendado'
        )
        "#,
        r#"
        CREATE TABLE IF NOT EXISTS anamnese (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            cliente_nome TEXT,
            texto TEXT,
            data_registro DATETIME DEFAULT CURRENT_TIMESTAMP
        )
        "#,
    ];

    for sql in statements {
        sqlx::query(sql).execute(pool).await?;
    }

    tracing::info!("database schema ready");
    Ok(())
}

/// Single-connection in-memory pool. Each SQLite `:memory:` connection is its
/// own database, so the pool must never open a second one.
#[cfg(test)]
pub async fn connect_in_memory() -> SqlitePool {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .min_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect("sqlite::memory:")
        .await
        .expect("in-memory sqlite");
    init_schema(&pool).await.expect("schema");
    pool
}
