// Copyright (c) 2025 Fundwallet Contributors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Read-only views over the append-only transaction ledger.

use crate::errors::LedgerError;
use crate::utils::{decimal_field, id_for_user, maybe_print_json, pretty_table};
use anyhow::Result;
use rusqlite::{params, Connection, OptionalExtension};
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::BTreeMap;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("list", sub)) => list(conn, sub)?,
        Some(("show", sub)) => show(conn, sub)?,
        Some(("summary", sub)) => summary(conn, sub)?,
        _ => {}
    }
    Ok(())
}

#[derive(Serialize)]
pub struct TransactionRow {
    pub transaction_id: String,
    pub r#type: String,
    pub amount: String,
    pub status: String,
    pub description: String,
    pub payment_method: String,
    pub balance_before: String,
    pub balance_after: String,
    pub created_at: String,
}

pub fn query_rows(
    conn: &Connection,
    user_id: i64,
    r#type: Option<&str>,
    status: Option<&str>,
    limit: Option<usize>,
) -> Result<Vec<TransactionRow>> {
    let mut sql = String::from(
        "SELECT transaction_id, type, amount, status, description, payment_method,
                balance_before, balance_after, created_at
         FROM transactions WHERE user_id=?",
    );
    let mut params_vec: Vec<String> = vec![user_id.to_string()];
    if let Some(t) = r#type {
        sql.push_str(" AND type=?");
        params_vec.push(t.to_string());
    }
    if let Some(s) = status {
        sql.push_str(" AND status=?");
        params_vec.push(s.to_string());
    }
    sql.push_str(" ORDER BY created_at DESC, id DESC");
    if let Some(l) = limit {
        sql.push_str(" LIMIT ?");
        params_vec.push(l.to_string());
    }

    let mut stmt = conn.prepare(&sql)?;
    let params: Vec<&dyn rusqlite::ToSql> = params_vec
        .iter()
        .map(|s| s as &dyn rusqlite::ToSql)
        .collect();
    let mut rows = stmt.query(rusqlite::params_from_iter(params))?;

    let mut data = Vec::new();
    while let Some(r) = rows.next()? {
        let method: Option<String> = r.get(5)?;
        data.push(TransactionRow {
            transaction_id: r.get(0)?,
            r#type: r.get(1)?,
            amount: r.get(2)?,
            status: r.get(3)?,
            description: r.get(4)?,
            payment_method: method.unwrap_or_default(),
            balance_before: r.get(6)?,
            balance_after: r.get(7)?,
            created_at: r.get(8)?,
        });
    }
    Ok(data)
}

fn list(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let email = sub.get_one::<String>("user").unwrap();
    let r#type = sub.get_one::<String>("type").map(|s| s.as_str());
    let status = sub.get_one::<String>("status").map(|s| s.as_str());
    let limit = sub.get_one::<usize>("limit").copied();
    let user_id = id_for_user(conn, email)?;
    let data = query_rows(conn, user_id, r#type, status, limit)?;
    if !maybe_print_json(json_flag, jsonl_flag, &data)? {
        let rows: Vec<Vec<String>> = data
            .iter()
            .map(|t| {
                vec![
                    t.created_at.clone(),
                    t.transaction_id.clone(),
                    t.r#type.clone(),
                    t.amount.clone(),
                    t.balance_before.clone(),
                    t.balance_after.clone(),
                    t.status.clone(),
                    t.description.clone(),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(
                &[
                    "Date", "Txn Id", "Type", "Amount", "Before", "After", "Status",
                    "Description",
                ],
                rows,
            )
        );
    }
    Ok(())
}

fn show(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let txn_id = sub.get_one::<String>("id").unwrap().trim();
    let row: Option<(String, String, String, String, Option<String>, String, String, String, Option<String>)> =
        conn.query_row(
            "SELECT type, amount, status, description, payment_method,
                    balance_before, balance_after, created_at, processed_at
             FROM transactions WHERE transaction_id=?1",
            params![txn_id],
            |r| {
                Ok((
                    r.get(0)?,
                    r.get(1)?,
                    r.get(2)?,
                    r.get(3)?,
                    r.get(4)?,
                    r.get(5)?,
                    r.get(6)?,
                    r.get(7)?,
                    r.get(8)?,
                ))
            },
        )
        .optional()?;
    let Some((t, amount, status, desc, method, before, after, created, processed)) = row else {
        return Err(LedgerError::NotFound("Transaction not found".into()).into());
    };
    let rows = vec![
        vec!["Txn Id".into(), txn_id.to_string()],
        vec!["Type".into(), t],
        vec!["Amount".into(), amount],
        vec!["Status".into(), status],
        vec!["Description".into(), desc],
        vec!["Method".into(), method.unwrap_or_default()],
        vec!["Balance Before".into(), before],
        vec!["Balance After".into(), after],
        vec!["Created".into(), created],
        vec!["Processed".into(), processed.unwrap_or_default()],
    ];
    println!("{}", pretty_table(&["Field", "Value"], rows));
    Ok(())
}

#[derive(Debug, Serialize)]
pub struct TypeSummary {
    pub r#type: String,
    pub count: i64,
    pub total_amount: Decimal,
}

/// Per-type count and total over completed transactions only.
pub fn summary_by_type(conn: &Connection, user_id: i64) -> Result<Vec<TypeSummary>> {
    let mut stmt = conn.prepare(
        "SELECT type, amount FROM transactions WHERE user_id=?1 AND status='completed'",
    )?;
    let mut rows = stmt.query(params![user_id])?;
    let mut agg: BTreeMap<String, (i64, Decimal)> = BTreeMap::new();
    while let Some(r) = rows.next()? {
        let t: String = r.get(0)?;
        let amount_raw: String = r.get(1)?;
        let amount = decimal_field(&amount_raw, "amount")?;
        let entry = agg.entry(t).or_insert((0, Decimal::ZERO));
        entry.0 += 1;
        entry.1 += amount;
    }
    Ok(agg
        .into_iter()
        .map(|(t, (count, total_amount))| TypeSummary {
            r#type: t,
            count,
            total_amount,
        })
        .collect())
}

fn summary(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let email = sub.get_one::<String>("user").unwrap();
    let user_id = id_for_user(conn, email)?;
    let data = summary_by_type(conn, user_id)?;
    if !maybe_print_json(json_flag, jsonl_flag, &data)? {
        let rows: Vec<Vec<String>> = data
            .iter()
            .map(|s| {
                vec![
                    s.r#type.clone(),
                    s.count.to_string(),
                    format!("{:.2}", s.total_amount),
                ]
            })
            .collect();
        println!("{}", pretty_table(&["Type", "Count", "Total"], rows));
    }
    Ok(())
}
