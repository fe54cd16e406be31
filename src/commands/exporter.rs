// Copyright (c) 2025 Fundwallet Contributors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use anyhow::Result;
use rusqlite::Connection;
use serde_json::json;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("transactions", sub)) => export_transactions(conn, sub),
        Some(("investments", sub)) => export_investments(conn, sub),
        _ => Ok(()),
    }
}

fn export_transactions(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let fmt = sub.get_one::<String>("format").unwrap().to_lowercase();
    let out = sub.get_one::<String>("out").unwrap();

    let mut stmt = conn.prepare(
        "SELECT t.created_at, u.email, t.transaction_id, t.type, t.amount, t.status,
                t.balance_before, t.balance_after, t.description
         FROM transactions t
         JOIN users u ON t.user_id = u.id
         ORDER BY t.created_at, t.id",
    )?;
    let rows = stmt.query_map([], |r| {
        Ok((
            r.get::<_, String>(0)?,
            r.get::<_, String>(1)?,
            r.get::<_, String>(2)?,
            r.get::<_, String>(3)?,
            r.get::<_, String>(4)?,
            r.get::<_, String>(5)?,
            r.get::<_, String>(6)?,
            r.get::<_, String>(7)?,
            r.get::<_, String>(8)?,
        ))
    })?;

    match fmt.as_str() {
        "csv" => {
            let mut wtr = csv::Writer::from_path(out)?;
            wtr.write_record([
                "date",
                "user",
                "transaction_id",
                "type",
                "amount",
                "status",
                "balance_before",
                "balance_after",
                "description",
            ])?;
            for row in rows {
                let (d, u, id, t, amt, st, before, after, desc) = row?;
                wtr.write_record([d, u, id, t, amt, st, before, after, desc])?;
            }
            wtr.flush()?;
        }
        "json" => {
            let mut items = Vec::new();
            for row in rows {
                let (d, u, id, t, amt, st, before, after, desc) = row?;
                items.push(json!({
                    "date": d, "user": u, "transaction_id": id, "type": t, "amount": amt,
                    "status": st, "balance_before": before, "balance_after": after,
                    "description": desc
                }));
            }
            std::fs::write(out, serde_json::to_string_pretty(&items)?)?;
        }
        _ => {
            eprintln!("Unknown format: {} (use csv|json)", fmt);
        }
    }
    println!("Exported transactions to {}", out);
    Ok(())
}

fn export_investments(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let fmt = sub.get_one::<String>("format").unwrap().to_lowercase();
    let out = sub.get_one::<String>("out").unwrap();

    let mut stmt = conn.prepare(
        "SELECT i.investment_date, u.email, p.name, p.category, i.amount, i.units,
                i.price_per_unit, i.status, i.maturity_date, i.current_value, i.returns
         FROM investments i
         JOIN users u ON i.user_id = u.id
         JOIN products p ON i.product_id = p.id
         ORDER BY i.investment_date, i.id",
    )?;
    let rows = stmt.query_map([], |r| {
        Ok((
            r.get::<_, String>(0)?,
            r.get::<_, String>(1)?,
            r.get::<_, String>(2)?,
            r.get::<_, String>(3)?,
            r.get::<_, String>(4)?,
            r.get::<_, i64>(5)?,
            r.get::<_, String>(6)?,
            r.get::<_, String>(7)?,
            r.get::<_, String>(8)?,
            r.get::<_, String>(9)?,
            r.get::<_, String>(10)?,
        ))
    })?;

    match fmt.as_str() {
        "csv" => {
            let mut wtr = csv::Writer::from_path(out)?;
            wtr.write_record([
                "date",
                "user",
                "product",
                "category",
                "amount",
                "units",
                "price_per_unit",
                "status",
                "maturity_date",
                "current_value",
                "returns",
            ])?;
            for row in rows {
                let (d, u, p, c, amt, units, ppu, st, mat, val, ret) = row?;
                wtr.write_record([d, u, p, c, amt, units.to_string(), ppu, st, mat, val, ret])?;
            }
            wtr.flush()?;
        }
        "json" => {
            let mut items = Vec::new();
            for row in rows {
                let (d, u, p, c, amt, units, ppu, st, mat, val, ret) = row?;
                items.push(json!({
                    "date": d, "user": u, "product": p, "category": c, "amount": amt,
                    "units": units, "price_per_unit": ppu, "status": st,
                    "maturity_date": mat, "current_value": val, "returns": ret
                }));
            }
            std::fs::write(out, serde_json::to_string_pretty(&items)?)?;
        }
        _ => {
            eprintln!("Unknown format: {} (use csv|json)", fmt);
        }
    }
    println!("Exported investments to {}", out);
    Ok(())
}
