// Copyright (c) 2025 Fundwallet Contributors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Ledger consistency audit. The write paths keep these invariants inside
//! one SQLite transaction each; doctor re-checks them after the fact so a
//! damaged or hand-edited store is at least visible.

use crate::models::TransactionType;
use crate::utils::{decimal_field, pretty_table};
use anyhow::Result;
use rusqlite::Connection;
use rust_decimal::Decimal;
use std::str::FromStr;

pub fn handle(conn: &Connection) -> Result<()> {
    let rows = audit(conn)?;
    if rows.is_empty() {
        println!("doctor: no issues found");
    } else {
        println!("{}", pretty_table(&["Issue", "Detail"], rows));
    }
    Ok(())
}

pub fn audit(conn: &Connection) -> Result<Vec<Vec<String>>> {
    let mut rows = Vec::new();

    // 1) balance_after must be balance_before +/- amount per type.
    let mut stmt = conn.prepare(
        "SELECT transaction_id, type, amount, balance_before, balance_after FROM transactions",
    )?;
    let mut cur = stmt.query([])?;
    while let Some(r) = cur.next()? {
        let txn_id: String = r.get(0)?;
        let type_raw: String = r.get(1)?;
        let amount = decimal_field(&r.get::<_, String>(2)?, "amount")?;
        let before = decimal_field(&r.get::<_, String>(3)?, "balance_before")?;
        let after = decimal_field(&r.get::<_, String>(4)?, "balance_after")?;
        let Ok(t) = TransactionType::from_str(&type_raw) else {
            rows.push(vec!["unknown_txn_type".into(), format!("{} {}", txn_id, type_raw)]);
            continue;
        };
        let expected = if t.is_credit() {
            before + amount
        } else {
            before - amount
        };
        if expected != after {
            rows.push(vec![
                "ledger_mismatch".into(),
                format!("{}: {} {} -> {}, expected {}", txn_id, type_raw, before, after, expected),
            ]);
        }
    }

    // 2) Oversold or negative inventory.
    let mut stmt2 = conn.prepare(
        "SELECT id, name, total_units_available, units_sold FROM products
         WHERE units_sold > total_units_available OR units_sold < 0",
    )?;
    let mut cur2 = stmt2.query([])?;
    while let Some(r) = cur2.next()? {
        let id: i64 = r.get(0)?;
        let name: String = r.get(1)?;
        let total: i64 = r.get(2)?;
        let sold: i64 = r.get(3)?;
        rows.push(vec![
            "inventory_out_of_range".into(),
            format!("product {} '{}': {} sold of {}", id, name, sold, total),
        ]);
    }

    // 3) investment/redemption entries must reference an investment.
    let mut stmt3 = conn.prepare(
        "SELECT transaction_id, type FROM transactions
         WHERE type IN ('investment','redemption') AND investment_id IS NULL",
    )?;
    let mut cur3 = stmt3.query([])?;
    while let Some(r) = cur3.next()? {
        let txn_id: String = r.get(0)?;
        let type_raw: String = r.get(1)?;
        rows.push(vec![
            "missing_investment_ref".into(),
            format!("{} ({})", txn_id, type_raw),
        ]);
    }

    // 4) Investments pointing at products that no longer exist.
    let mut stmt4 = conn.prepare(
        "SELECT i.id, i.product_id FROM investments i
         LEFT JOIN products p ON i.product_id = p.id WHERE p.id IS NULL",
    )?;
    let mut cur4 = stmt4.query([])?;
    while let Some(r) = cur4.next()? {
        let id: i64 = r.get(0)?;
        let product_id: i64 = r.get(1)?;
        rows.push(vec![
            "dangling_product_ref".into(),
            format!("investment {} -> product {}", id, product_id),
        ]);
    }

    // 5) Negative wallet balances.
    let mut stmt5 = conn.prepare("SELECT email, balance FROM users")?;
    let mut cur5 = stmt5.query([])?;
    while let Some(r) = cur5.next()? {
        let email: String = r.get(0)?;
        let balance = decimal_field(&r.get::<_, String>(1)?, "balance")?;
        if balance < Decimal::ZERO {
            rows.push(vec![
                "negative_balance".into(),
                format!("{}: {}", email, balance),
            ]);
        }
    }

    Ok(rows)
}
