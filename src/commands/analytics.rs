// Copyright (c) 2025 Fundwallet Contributors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! On-demand, read-only rollups over investments and the transaction
//! ledger. Amounts are accumulated as decimals in Rust rather than SUMmed
//! over TEXT columns, so totals stay exact. Empty data yields zeroed or
//! empty aggregates, never an error.

use crate::utils::{decimal_field, id_for_user, maybe_print_json, pretty_table};
use anyhow::{Context, Result};
use chrono::{Months, Utc};
use rusqlite::{params, Connection};
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::BTreeMap;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("portfolio", sub)) => portfolio(conn, sub)?,
        Some(("by-status", sub)) => by_status(conn, sub)?,
        Some(("categories", sub)) => categories(conn, sub)?,
        Some(("trend", sub)) => trend(conn, sub)?,
        Some(("tx-types", sub)) => tx_types(conn, sub)?,
        _ => {}
    }
    Ok(())
}

#[derive(Debug, Default, Serialize)]
pub struct PortfolioStats {
    pub total_invested: Decimal,
    pub total_current_value: Decimal,
    pub total_returns: Decimal,
    pub total_investments: i64,
}

/// Active-portfolio totals over confirmed and matured holdings.
pub fn portfolio_stats(conn: &Connection, user_id: i64) -> Result<PortfolioStats> {
    let mut stmt = conn.prepare(
        "SELECT amount, current_value, returns FROM investments
         WHERE user_id=?1 AND status IN ('confirmed','matured')",
    )?;
    let mut rows = stmt.query(params![user_id])?;
    let mut stats = PortfolioStats::default();
    while let Some(r) = rows.next()? {
        let amount: String = r.get(0)?;
        let value: String = r.get(1)?;
        let returns: String = r.get(2)?;
        stats.total_invested += decimal_field(&amount, "amount")?;
        stats.total_current_value += decimal_field(&value, "current_value")?;
        stats.total_returns += decimal_field(&returns, "returns")?;
        stats.total_investments += 1;
    }
    Ok(stats)
}

#[derive(Debug, Serialize)]
pub struct StatusBucket {
    pub status: String,
    pub count: i64,
    pub total_amount: Decimal,
    pub total_current_value: Decimal,
}

pub fn status_breakdown(conn: &Connection, user_id: i64) -> Result<Vec<StatusBucket>> {
    let mut stmt = conn.prepare(
        "SELECT status, amount, current_value FROM investments WHERE user_id=?1",
    )?;
    let mut rows = stmt.query(params![user_id])?;
    let mut agg: BTreeMap<String, (i64, Decimal, Decimal)> = BTreeMap::new();
    while let Some(r) = rows.next()? {
        let status: String = r.get(0)?;
        let amount: String = r.get(1)?;
        let value: String = r.get(2)?;
        let entry = agg
            .entry(status)
            .or_insert((0, Decimal::ZERO, Decimal::ZERO));
        entry.0 += 1;
        entry.1 += decimal_field(&amount, "amount")?;
        entry.2 += decimal_field(&value, "current_value")?;
    }
    Ok(agg
        .into_iter()
        .map(|(status, (count, total_amount, total_current_value))| StatusBucket {
            status,
            count,
            total_amount,
            total_current_value,
        })
        .collect())
}

#[derive(Debug, Serialize)]
pub struct CategoryBucket {
    pub category: String,
    pub count: i64,
    pub total_invested: Decimal,
    pub total_current_value: Decimal,
}

/// Joins investments to products and groups the active portfolio by
/// product category.
pub fn category_breakdown(conn: &Connection, user_id: i64) -> Result<Vec<CategoryBucket>> {
    let mut stmt = conn.prepare(
        "SELECT p.category, i.amount, i.current_value
         FROM investments i JOIN products p ON i.product_id = p.id
         WHERE i.user_id=?1 AND i.status IN ('confirmed','matured')",
    )?;
    let mut rows = stmt.query(params![user_id])?;
    let mut agg: BTreeMap<String, (i64, Decimal, Decimal)> = BTreeMap::new();
    while let Some(r) = rows.next()? {
        let category: String = r.get(0)?;
        let amount: String = r.get(1)?;
        let value: String = r.get(2)?;
        let entry = agg
            .entry(category)
            .or_insert((0, Decimal::ZERO, Decimal::ZERO));
        entry.0 += 1;
        entry.1 += decimal_field(&amount, "amount")?;
        entry.2 += decimal_field(&value, "current_value")?;
    }
    Ok(agg
        .into_iter()
        .map(|(category, (count, total_invested, total_current_value))| CategoryBucket {
            category,
            count,
            total_invested,
            total_current_value,
        })
        .collect())
}

#[derive(Debug, Serialize)]
pub struct TrendPoint {
    pub year: i32,
    pub month: u32,
    pub count: i64,
    pub total_invested: Decimal,
}

/// Investment totals per (year, month) over the trailing 12 months,
/// ascending.
pub fn monthly_trend(conn: &Connection, user_id: i64) -> Result<Vec<TrendPoint>> {
    let cutoff = Utc::now()
        .date_naive()
        .checked_sub_months(Months::new(12))
        .context("Trend window underflow")?;
    let mut stmt = conn.prepare(
        "SELECT substr(investment_date,1,7), amount FROM investments
         WHERE user_id=?1 AND investment_date >= ?2",
    )?;
    let mut rows = stmt.query(params![user_id, cutoff.to_string()])?;
    let mut agg: BTreeMap<(i32, u32), (i64, Decimal)> = BTreeMap::new();
    while let Some(r) = rows.next()? {
        let ym: String = r.get(0)?;
        let amount: String = r.get(1)?;
        let (y, m) = ym
            .split_once('-')
            .with_context(|| format!("Invalid investment month '{}'", ym))?;
        let year: i32 = y.parse().with_context(|| format!("Invalid year '{}'", y))?;
        let month: u32 = m.parse().with_context(|| format!("Invalid month '{}'", m))?;
        let entry = agg.entry((year, month)).or_insert((0, Decimal::ZERO));
        entry.0 += 1;
        entry.1 += decimal_field(&amount, "amount")?;
    }
    Ok(agg
        .into_iter()
        .map(|((year, month), (count, total_invested))| TrendPoint {
            year,
            month,
            count,
            total_invested,
        })
        .collect())
}

#[derive(Debug, Serialize)]
pub struct TxTypeBucket {
    pub r#type: String,
    pub count: i64,
    pub total_amount: Decimal,
    pub avg_amount: Decimal,
}

/// Completed ledger entries grouped by type, with an average per entry.
pub fn tx_type_breakdown(conn: &Connection, user_id: i64) -> Result<Vec<TxTypeBucket>> {
    let mut stmt = conn.prepare(
        "SELECT type, amount FROM transactions WHERE user_id=?1 AND status='completed'",
    )?;
    let mut rows = stmt.query(params![user_id])?;
    let mut agg: BTreeMap<String, (i64, Decimal)> = BTreeMap::new();
    while let Some(r) = rows.next()? {
        let t: String = r.get(0)?;
        let amount: String = r.get(1)?;
        let entry = agg.entry(t).or_insert((0, Decimal::ZERO));
        entry.0 += 1;
        entry.1 += decimal_field(&amount, "amount")?;
    }
    Ok(agg
        .into_iter()
        .map(|(t, (count, total_amount))| TxTypeBucket {
            r#type: t,
            count,
            total_amount,
            avg_amount: total_amount / Decimal::from(count),
        })
        .collect())
}

fn portfolio(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let email = sub.get_one::<String>("user").unwrap();
    let user_id = id_for_user(conn, email)?;
    let stats = portfolio_stats(conn, user_id)?;
    if !maybe_print_json(json_flag, jsonl_flag, &stats)? {
        let rows = vec![
            vec!["Invested".into(), format!("{:.2}", stats.total_invested)],
            vec![
                "Current Value".into(),
                format!("{:.2}", stats.total_current_value),
            ],
            vec!["Returns".into(), format!("{:.2}", stats.total_returns)],
            vec!["Holdings".into(), stats.total_investments.to_string()],
        ];
        println!("{}", pretty_table(&["Metric", "Value"], rows));
    }
    Ok(())
}

fn by_status(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let email = sub.get_one::<String>("user").unwrap();
    let user_id = id_for_user(conn, email)?;
    let data = status_breakdown(conn, user_id)?;
    if !maybe_print_json(json_flag, jsonl_flag, &data)? {
        let rows: Vec<Vec<String>> = data
            .iter()
            .map(|b| {
                vec![
                    b.status.clone(),
                    b.count.to_string(),
                    format!("{:.2}", b.total_amount),
                    format!("{:.2}", b.total_current_value),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(&["Status", "Count", "Amount", "Value"], rows)
        );
    }
    Ok(())
}

fn categories(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let email = sub.get_one::<String>("user").unwrap();
    let user_id = id_for_user(conn, email)?;
    let data = category_breakdown(conn, user_id)?;
    if !maybe_print_json(json_flag, jsonl_flag, &data)? {
        let rows: Vec<Vec<String>> = data
            .iter()
            .map(|b| {
                vec![
                    b.category.clone(),
                    b.count.to_string(),
                    format!("{:.2}", b.total_invested),
                    format!("{:.2}", b.total_current_value),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(&["Category", "Count", "Invested", "Value"], rows)
        );
    }
    Ok(())
}

fn trend(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let email = sub.get_one::<String>("user").unwrap();
    let user_id = id_for_user(conn, email)?;
    let data = monthly_trend(conn, user_id)?;
    if !maybe_print_json(json_flag, jsonl_flag, &data)? {
        let rows: Vec<Vec<String>> = data
            .iter()
            .map(|p| {
                vec![
                    format!("{}-{:02}", p.year, p.month),
                    p.count.to_string(),
                    format!("{:.2}", p.total_invested),
                ]
            })
            .collect();
        println!("{}", pretty_table(&["Month", "Count", "Invested"], rows));
    }
    Ok(())
}

fn tx_types(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let email = sub.get_one::<String>("user").unwrap();
    let user_id = id_for_user(conn, email)?;
    let data = tx_type_breakdown(conn, user_id)?;
    if !maybe_print_json(json_flag, jsonl_flag, &data)? {
        let rows: Vec<Vec<String>> = data
            .iter()
            .map(|b| {
                vec![
                    b.r#type.clone(),
                    b.count.to_string(),
                    format!("{:.2}", b.total_amount),
                    format!("{:.2}", b.avg_amount),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(&["Type", "Count", "Total", "Average"], rows)
        );
    }
    Ok(())
}
