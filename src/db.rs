// Copyright (c) 2025 Fundwallet Contributors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::{Context, Result};
use directories::ProjectDirs;
use once_cell::sync::Lazy;
use rusqlite::Connection;
use std::fs;
use std::path::PathBuf;

static APP: Lazy<(&str, &str, &str)> = Lazy::new(|| ("org.fundwallet", "Fundwallet", "fundwallet"));

pub fn db_path() -> Result<PathBuf> {
    let proj = ProjectDirs::from(APP.0, APP.1, APP.2)
        .context("Could not determine platform-specific data dir")?;
    let data_dir = proj.data_dir();
    fs::create_dir_all(data_dir).context("Failed to create data dir")?;
    Ok(data_dir.join("fundwallet.sqlite"))
}

pub fn open_or_init() -> Result<Connection> {
    let path = db_path()?;
    let mut conn =
        Connection::open(&path).with_context(|| format!("Open DB at {}", path.display()))?;
    init_schema(&mut conn)?;
    Ok(conn)
}

/// Creates all tables if absent. `units_remaining` is deliberately not a
/// column anywhere: it is always computed as
/// `total_units_available - units_sold`.
pub fn init_schema(conn: &mut Connection) -> Result<()> {
    conn.execute_batch(
        r#"
    PRAGMA foreign_keys = ON;

    CREATE TABLE IF NOT EXISTS users(
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL,
        email TEXT NOT NULL UNIQUE,
        role TEXT NOT NULL DEFAULT 'user' CHECK(role IN ('admin','user')),
        kyc_status TEXT NOT NULL DEFAULT 'pending'
            CHECK(kyc_status IN ('pending','verified','rejected')),
        balance TEXT NOT NULL DEFAULT '0',
        created_at TEXT NOT NULL DEFAULT (datetime('now'))
    );

    CREATE TABLE IF NOT EXISTS products(
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL,
        category TEXT NOT NULL,
        min_investment TEXT NOT NULL,
        max_investment TEXT NOT NULL,
        expected_return TEXT NOT NULL, -- percent per annum
        tenure INTEGER NOT NULL,       -- months
        risk_level TEXT NOT NULL CHECK(risk_level IN ('low','medium','high')),
        is_active INTEGER NOT NULL DEFAULT 1,
        total_units_available INTEGER NOT NULL,
        units_sold INTEGER NOT NULL DEFAULT 0,
        issuer TEXT NOT NULL,
        rating TEXT NOT NULL DEFAULT 'Not Rated',
        launch_date TEXT NOT NULL DEFAULT (date('now'))
    );

    CREATE TABLE IF NOT EXISTS investments(
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        user_id INTEGER NOT NULL,
        product_id INTEGER NOT NULL,
        amount TEXT NOT NULL,
        units INTEGER NOT NULL,
        price_per_unit TEXT NOT NULL,
        status TEXT NOT NULL DEFAULT 'confirmed'
            CHECK(status IN ('pending','confirmed','matured','redeemed','cancelled')),
        investment_date TEXT NOT NULL DEFAULT (datetime('now')),
        maturity_date TEXT NOT NULL,
        expected_return TEXT NOT NULL, -- percent copied from product at purchase
        current_value TEXT NOT NULL,
        returns TEXT NOT NULL DEFAULT '0',
        transaction_id TEXT,
        FOREIGN KEY(user_id) REFERENCES users(id),
        FOREIGN KEY(product_id) REFERENCES products(id)
    );
    CREATE INDEX IF NOT EXISTS idx_investments_user ON investments(user_id, investment_date);

    CREATE TABLE IF NOT EXISTS transactions(
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        user_id INTEGER NOT NULL,
        investment_id INTEGER,
        type TEXT NOT NULL CHECK(type IN (
            'investment','redemption','deposit','withdrawal',
            'dividend','interest','fee','refund')),
        amount TEXT NOT NULL,
        status TEXT NOT NULL DEFAULT 'pending'
            CHECK(status IN ('pending','processing','completed','failed','cancelled')),
        description TEXT NOT NULL,
        payment_method TEXT,
        balance_before TEXT NOT NULL,
        balance_after TEXT NOT NULL,
        transaction_id TEXT NOT NULL UNIQUE,
        created_at TEXT NOT NULL DEFAULT (datetime('now')),
        processed_at TEXT,
        FOREIGN KEY(user_id) REFERENCES users(id),
        FOREIGN KEY(investment_id) REFERENCES investments(id)
    );
    CREATE INDEX IF NOT EXISTS idx_transactions_user ON transactions(user_id, created_at);
    "#,
    )?;
    Ok(())
}
