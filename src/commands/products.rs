// Copyright (c) 2025 Fundwallet Contributors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Product catalog and unit inventory. `units_remaining`/`is_available` are
//! computed on every read; `units_sold` is only ever moved by the purchase
//! and redemption paths. Over-subscription is checked there, not here.

use crate::errors::LedgerError;
use crate::models::{ProductCategory, RiskLevel};
use crate::utils::{decimal_field, maybe_print_json, parse_decimal, pretty_table};
use anyhow::Result;
use rusqlite::{params, Connection, OptionalExtension};
use serde::Serialize;
use std::str::FromStr;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => add(conn, sub)?,
        Some(("list", sub)) => list(conn, sub)?,
        Some(("show", sub)) => show(conn, sub)?,
        Some(("update", sub)) => update(conn, sub)?,
        Some(("deactivate", sub)) => deactivate(conn, sub)?,
        _ => {}
    }
    Ok(())
}

fn add(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let name = sub.get_one::<String>("name").unwrap().trim().to_string();
    let category = ProductCategory::from_str(sub.get_one::<String>("category").unwrap())?;
    let min_investment = parse_decimal(sub.get_one::<String>("min").unwrap().trim())?;
    let max_investment = parse_decimal(sub.get_one::<String>("max").unwrap().trim())?;
    let expected_return = parse_decimal(sub.get_one::<String>("return").unwrap().trim())?;
    let tenure: i64 = *sub.get_one::<i64>("tenure").unwrap();
    let risk = RiskLevel::from_str(sub.get_one::<String>("risk").unwrap())?;
    let total_units: i64 = *sub.get_one::<i64>("units").unwrap();
    let issuer = sub.get_one::<String>("issuer").unwrap().trim().to_string();
    let rating = sub
        .get_one::<String>("rating")
        .map(|s| s.trim().to_string())
        .unwrap_or_else(|| "Not Rated".to_string());

    if max_investment < min_investment {
        return Err(LedgerError::Validation(
            "Maximum investment cannot be below minimum investment".into(),
        )
        .into());
    }
    if tenure < 1 {
        return Err(LedgerError::Validation("Tenure must be at least 1 month".into()).into());
    }
    if total_units < 1 {
        return Err(LedgerError::Validation("Must have at least 1 unit available".into()).into());
    }

    conn.execute(
        "INSERT INTO products(name, category, min_investment, max_investment, expected_return,
                              tenure, risk_level, total_units_available, issuer, rating)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
        params![
            name,
            category.as_str(),
            min_investment.to_string(),
            max_investment.to_string(),
            expected_return.to_string(),
            tenure,
            risk.as_str(),
            total_units,
            issuer,
            rating,
        ],
    )?;
    println!(
        "Added product '{}' ({}, {}% p.a., {} months, {} units)",
        name, category, expected_return, tenure, total_units
    );
    Ok(())
}

#[derive(Serialize)]
pub struct ProductRow {
    pub id: i64,
    pub name: String,
    pub category: String,
    pub min_investment: String,
    pub max_investment: String,
    pub expected_return: String,
    pub tenure: i64,
    pub risk_level: String,
    pub units_remaining: i64,
    pub is_available: bool,
}

pub fn query_rows(
    conn: &Connection,
    category: Option<&str>,
    risk: Option<&str>,
    active_only: bool,
    limit: Option<usize>,
) -> Result<Vec<ProductRow>> {
    let mut sql = String::from(
        "SELECT id, name, category, min_investment, max_investment, expected_return, tenure,
                risk_level, is_active, total_units_available - units_sold
         FROM products WHERE 1=1",
    );
    let mut params_vec: Vec<String> = Vec::new();
    if let Some(c) = category {
        sql.push_str(" AND category=?");
        params_vec.push(c.to_string());
    }
    if let Some(r) = risk {
        sql.push_str(" AND risk_level=?");
        params_vec.push(r.to_string());
    }
    if active_only {
        sql.push_str(" AND is_active=1");
    }
    // expected_return is a TEXT column; cast so 12 outranks 7.
    sql.push_str(" ORDER BY CAST(expected_return AS REAL) DESC, id");
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
        let is_active: bool = r.get(8)?;
        let units_remaining: i64 = r.get(9)?;
        data.push(ProductRow {
            id: r.get(0)?,
            name: r.get(1)?,
            category: r.get(2)?,
            min_investment: r.get(3)?,
            max_investment: r.get(4)?,
            expected_return: r.get(5)?,
            tenure: r.get(6)?,
            risk_level: r.get(7)?,
            units_remaining,
            is_available: is_active && units_remaining > 0,
        });
    }
    Ok(data)
}

fn list(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let category = sub.get_one::<String>("category").map(|s| s.as_str());
    let risk = sub.get_one::<String>("risk").map(|s| s.as_str());
    let active_only = sub.get_flag("active");
    let limit = sub.get_one::<usize>("limit").copied();
    let data = query_rows(conn, category, risk, active_only, limit)?;
    if !maybe_print_json(json_flag, jsonl_flag, &data)? {
        let rows: Vec<Vec<String>> = data
            .iter()
            .map(|p| {
                vec![
                    p.id.to_string(),
                    p.name.clone(),
                    p.category.clone(),
                    p.min_investment.clone(),
                    p.max_investment.clone(),
                    format!("{}%", p.expected_return),
                    p.tenure.to_string(),
                    p.risk_level.clone(),
                    p.units_remaining.to_string(),
                    if p.is_available { "yes" } else { "no" }.into(),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(
                &[
                    "Id", "Name", "Category", "Min", "Max", "Return", "Months", "Risk",
                    "Units Left", "Available",
                ],
                rows,
            )
        );
    }
    Ok(())
}

fn show(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let id: i64 = *sub.get_one::<i64>("id").unwrap();
    let row: Option<(String, String, String, String, String, i64, String, bool, i64, i64, String, String)> =
        conn.query_row(
            "SELECT name, category, min_investment, max_investment, expected_return, tenure,
                    risk_level, is_active, total_units_available, units_sold, issuer, rating
             FROM products WHERE id=?1",
            params![id],
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
                    r.get(9)?,
                    r.get(10)?,
                    r.get(11)?,
                ))
            },
        )
        .optional()?;
    let Some((name, cat, min, max, er, tenure, risk, active, total, sold, issuer, rating)) = row
    else {
        return Err(LedgerError::NotFound("Product not found".into()).into());
    };
    let remaining = total - sold;
    let rows = vec![
        vec!["Name".into(), name],
        vec!["Category".into(), cat],
        vec!["Min Investment".into(), min],
        vec!["Max Investment".into(), max],
        vec!["Expected Return".into(), format!("{}% p.a.", er)],
        vec!["Tenure".into(), format!("{} months", tenure)],
        vec!["Risk".into(), risk],
        vec!["Issuer".into(), issuer],
        vec!["Rating".into(), rating],
        vec!["Units Sold".into(), sold.to_string()],
        vec!["Units Remaining".into(), remaining.to_string()],
        vec![
            "Available".into(),
            if active && remaining > 0 { "yes" } else { "no" }.into(),
        ],
    ];
    println!("{}", pretty_table(&["Field", "Value"], rows));
    Ok(())
}

fn update(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let id: i64 = *sub.get_one::<i64>("id").unwrap();
    let stored: Option<(String, String)> = conn
        .query_row(
            "SELECT min_investment, max_investment FROM products WHERE id=?1",
            params![id],
            |r| Ok((r.get(0)?, r.get(1)?)),
        )
        .optional()?;
    let Some((stored_min, stored_max)) = stored else {
        return Err(LedgerError::NotFound("Product not found".into()).into());
    };
    // Updating one bound must keep it consistent with the stored other one.
    let mut new_min = decimal_field(&stored_min, "min_investment")?;
    let mut new_max = decimal_field(&stored_max, "max_investment")?;

    let mut sets: Vec<String> = Vec::new();
    let mut params_vec: Vec<String> = Vec::new();
    if let Some(min) = sub.get_one::<String>("min") {
        new_min = parse_decimal(min.trim())?;
        sets.push("min_investment=?".into());
        params_vec.push(new_min.to_string());
    }
    if let Some(max) = sub.get_one::<String>("max") {
        new_max = parse_decimal(max.trim())?;
        sets.push("max_investment=?".into());
        params_vec.push(new_max.to_string());
    }
    if new_max < new_min {
        return Err(LedgerError::Validation(
            "Maximum investment cannot be below minimum investment".into(),
        )
        .into());
    }
    if let Some(er) = sub.get_one::<String>("return") {
        sets.push("expected_return=?".into());
        params_vec.push(parse_decimal(er.trim())?.to_string());
    }
    if let Some(rating) = sub.get_one::<String>("rating") {
        sets.push("rating=?".into());
        params_vec.push(rating.trim().to_string());
    }
    if sets.is_empty() {
        return Err(LedgerError::Validation("Nothing to update".into()).into());
    }
    let sql = format!("UPDATE products SET {} WHERE id=?", sets.join(", "));
    params_vec.push(id.to_string());
    let params: Vec<&dyn rusqlite::ToSql> = params_vec
        .iter()
        .map(|s| s as &dyn rusqlite::ToSql)
        .collect();
    let changed = conn.execute(&sql, rusqlite::params_from_iter(params))?;
    if changed == 0 {
        return Err(LedgerError::NotFound("Product not found".into()).into());
    }
    println!("Updated product {}", id);
    Ok(())
}

/// Soft delete. Products are never hard-deleted; existing investments keep
/// pointing at them.
fn deactivate(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let id: i64 = *sub.get_one::<i64>("id").unwrap();
    let changed = conn.execute("UPDATE products SET is_active=0 WHERE id=?1", params![id])?;
    if changed == 0 {
        return Err(LedgerError::NotFound("Product not found".into()).into());
    }
    println!("Deactivated product {}", id);
    Ok(())
}
