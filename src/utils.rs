// Copyright (c) 2025 Fundwallet Contributors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::errors::LedgerError;
use anyhow::{Context, Result};
use chrono::{Months, NaiveDate, Utc};
use comfy_table::{presets::UTF8_FULL, Cell, Table};
use rand::Rng;
use rusqlite::{params, Connection, OptionalExtension};
use rust_decimal::Decimal;

pub fn parse_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .with_context(|| format!("Invalid date '{}', expected YYYY-MM-DD", s))
}

pub fn parse_decimal(s: &str) -> Result<Decimal> {
    s.parse::<Decimal>()
        .with_context(|| format!("Invalid decimal '{}'", s))
}

/// Parse a TEXT decimal column, naming the field in the error.
pub fn decimal_field(s: &str, what: &str) -> Result<Decimal> {
    Decimal::from_str_exact(s).with_context(|| format!("Invalid stored {} '{}'", what, s))
}

pub fn fmt_money(d: &Decimal) -> String {
    format!("₹{}", d.round_dp(2))
}

pub fn pretty_table(headers: &[&str], rows: Vec<Vec<String>>) -> Table {
    let mut t = Table::new();
    t.load_preset(UTF8_FULL);
    t.set_header(headers.iter().map(|h| Cell::new(*h)));
    for r in rows {
        t.add_row(r.into_iter().map(Cell::new));
    }
    t
}

pub fn maybe_print_json<T: serde::Serialize>(
    json_flag: bool,
    jsonl_flag: bool,
    v: &T,
) -> Result<bool> {
    if json_flag {
        println!("{}", serde_json::to_string_pretty(v)?);
        return Ok(true);
    }
    if jsonl_flag {
        let val = serde_json::to_value(v)?;
        if let Some(arr) = val.as_array() {
            for item in arr {
                println!("{}", serde_json::to_string(item)?);
            }
        } else {
            println!("{}", serde_json::to_string(&val)?);
        }
        return Ok(true);
    }
    Ok(false)
}

const BASE36: &[u8] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// Ledger entry id: `TXN<millis><6-char uppercase base36>`. The format is a
/// boundary contract; the UNIQUE column on transactions catches the residual
/// collision risk.
pub fn new_transaction_id() -> String {
    let mut rng = rand::rng();
    let suffix: String = (0..6)
        .map(|_| BASE36[rng.random_range(0..BASE36.len())] as char)
        .collect();
    format!("TXN{}{}", Utc::now().timestamp_millis(), suffix)
}

/// Maturity is fixed once at purchase: investment date plus the product
/// tenure in months (day clamped to month end when needed).
pub fn maturity_from(date: NaiveDate, tenure_months: u32) -> Result<NaiveDate> {
    date.checked_add_months(Months::new(tenure_months))
        .with_context(|| format!("Maturity overflow for tenure {} months", tenure_months))
}

pub fn id_for_user(conn: &Connection, email: &str) -> Result<i64> {
    let mut stmt = conn.prepare("SELECT id FROM users WHERE email=?1")?;
    let id: i64 = stmt
        .query_row(params![email], |r| r.get(0))
        .with_context(|| format!("User '{}' not found", email))?;
    Ok(id)
}

pub fn user_balance(conn: &Connection, user_id: i64) -> Result<Decimal> {
    let s: Option<String> = conn
        .query_row(
            "SELECT balance FROM users WHERE id=?1",
            params![user_id],
            |r| r.get(0),
        )
        .optional()?;
    let Some(s) = s else {
        return Err(LedgerError::NotFound(format!("User {} not found", user_id)).into());
    };
    decimal_field(&s, "balance")
}
