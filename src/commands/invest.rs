// Copyright (c) 2025 Fundwallet Contributors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Investment lifecycle: purchase of fund units, partial/full redemption,
//! and the explicit revaluation step that is the only writer of
//! `current_value`/`returns` after purchase.

use crate::commands::wallet::{append_entry, LedgerEntry};
use crate::errors::LedgerError;
use crate::models::{InvestmentStatus, PaymentMethod, TransactionType};
use crate::utils::{
    decimal_field, fmt_money, id_for_user, maturity_from, maybe_print_json, parse_decimal,
    pretty_table, user_balance,
};
use anyhow::Result;
use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension};
use rust_decimal::Decimal;
use serde::Serialize;
use std::str::FromStr;

pub fn handle(conn: &mut Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("buy", sub)) => buy_cmd(conn, sub)?,
        Some(("redeem", sub)) => redeem_cmd(conn, sub)?,
        Some(("list", sub)) => list_cmd(conn, sub)?,
        Some(("show", sub)) => show_cmd(conn, sub)?,
        Some(("revalue", sub)) => revalue_cmd(conn, sub)?,
        Some(("set-status", sub)) => set_status_cmd(conn, sub)?,
        _ => {}
    }
    Ok(())
}

#[derive(Debug, Serialize)]
pub struct PurchaseOutcome {
    pub investment_id: i64,
    pub transaction_id: String,
    pub amount: Decimal,
    pub units: i64,
    pub price_per_unit: Decimal,
    pub status: InvestmentStatus,
    pub expected_return: Decimal,
    pub expected_return_amount: Decimal,
    pub maturity_date: chrono::NaiveDate,
    pub new_balance: Decimal,
    pub product_name: String,
    pub product_category: String,
    pub user_name: String,
}

/// Buys `units` of a product for `amount`. Inventory increment, balance
/// debit, investment row, and ledger append commit together.
pub fn purchase(
    conn: &mut Connection,
    user_id: i64,
    product_id: i64,
    amount: Decimal,
    units: i64,
    method: PaymentMethod,
) -> Result<PurchaseOutcome> {
    if units <= 0 {
        return Err(LedgerError::Validation("Units must be a positive integer".into()).into());
    }
    if amount <= Decimal::ZERO {
        return Err(LedgerError::Validation("Amount must be greater than 0".into()).into());
    }

    let tx = conn.transaction()?;

    let product: Option<(String, String, String, String, String, i64, bool, i64, i64)> = tx
        .query_row(
            "SELECT name, category, min_investment, max_investment, expected_return,
                    tenure, is_active, total_units_available, units_sold
             FROM products WHERE id=?1",
            params![product_id],
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

    let Some((
        product_name,
        product_category,
        min_raw,
        max_raw,
        er_raw,
        tenure,
        is_active,
        total_units,
        units_sold,
    )) = product
    else {
        return Err(LedgerError::NotFound("Product not found or inactive".into()).into());
    };
    if !is_active {
        return Err(LedgerError::NotFound("Product not found or inactive".into()).into());
    }

    let units_remaining = total_units - units_sold;
    if units_remaining < units {
        return Err(LedgerError::InsufficientFunds(format!(
            "Only {} units available",
            units_remaining
        ))
        .into());
    }

    let min_investment = decimal_field(&min_raw, "min_investment")?;
    let max_investment = decimal_field(&max_raw, "max_investment")?;
    if amount < min_investment || amount > max_investment {
        return Err(LedgerError::Validation(format!(
            "Investment amount must be between {} and {}",
            fmt_money(&min_investment),
            fmt_money(&max_investment)
        ))
        .into());
    }

    let balance_before = user_balance(&tx, user_id)?;
    if balance_before < amount {
        return Err(LedgerError::InsufficientFunds("Insufficient balance".into()).into());
    }

    let expected_return = decimal_field(&er_raw, "expected_return")?;
    let price_per_unit = amount / Decimal::from(units);
    // amount * rate% * months/12
    let expected_return_amount =
        amount * expected_return * Decimal::from(tenure) / Decimal::from(1200);
    let maturity_date = maturity_from(Utc::now().date_naive(), tenure as u32)?;

    tx.execute(
        "INSERT INTO investments(user_id, product_id, amount, units, price_per_unit, status,
                                 maturity_date, expected_return, current_value)
         VALUES (?1, ?2, ?3, ?4, ?5, 'confirmed', ?6, ?7, ?3)",
        params![
            user_id,
            product_id,
            amount.to_string(),
            units,
            price_per_unit.to_string(),
            maturity_date.to_string(),
            expected_return.to_string(),
        ],
    )?;
    let investment_id = tx.last_insert_rowid();

    tx.execute(
        "UPDATE products SET units_sold = units_sold + ?1 WHERE id=?2",
        params![units, product_id],
    )?;

    let balance_after = balance_before - amount;
    tx.execute(
        "UPDATE users SET balance=?1 WHERE id=?2",
        params![balance_after.to_string(), user_id],
    )?;

    let transaction_id = append_entry(
        &tx,
        &LedgerEntry {
            user_id,
            investment_id: Some(investment_id),
            r#type: TransactionType::Investment,
            amount,
            description: format!("Investment in {}", product_name),
            payment_method: Some(method),
            balance_before,
            balance_after,
        },
    )?;
    tx.execute(
        "UPDATE investments SET transaction_id=?1 WHERE id=?2",
        params![transaction_id, investment_id],
    )?;

    let user_name: String = tx.query_row(
        "SELECT name FROM users WHERE id=?1",
        params![user_id],
        |r| r.get(0),
    )?;

    tx.commit()?;

    Ok(PurchaseOutcome {
        investment_id,
        transaction_id,
        amount,
        units,
        price_per_unit,
        status: InvestmentStatus::Confirmed,
        expected_return,
        expected_return_amount,
        maturity_date,
        new_balance: balance_after,
        product_name,
        product_category,
        user_name,
    })
}

#[derive(Debug, Serialize)]
pub struct RedemptionOutcome {
    pub transaction_id: String,
    pub redemption_amount: Decimal,
    pub new_balance: Decimal,
    pub remaining_units: i64,
}

/// Converts held units back into wallet balance. `units_to_redeem` below the
/// held count is a partial redemption that scales the position down by the
/// remaining-units ratio; anything else redeems in full and closes it.
pub fn redeem(
    conn: &mut Connection,
    investment_id: i64,
    requester_user_id: i64,
    units_to_redeem: Option<i64>,
) -> Result<RedemptionOutcome> {
    if let Some(u) = units_to_redeem {
        if u <= 0 {
            return Err(
                LedgerError::Validation("Units to redeem must be a positive integer".into()).into(),
            );
        }
    }

    let tx = conn.transaction()?;

    let row: Option<(i64, i64, i64, String, String, String, String)> = tx
        .query_row(
            "SELECT i.user_id, i.product_id, i.units, i.amount, i.current_value, i.status, p.name
             FROM investments i JOIN products p ON i.product_id = p.id
             WHERE i.id=?1",
            params![investment_id],
            |r| {
                Ok((
                    r.get(0)?,
                    r.get(1)?,
                    r.get(2)?,
                    r.get(3)?,
                    r.get(4)?,
                    r.get(5)?,
                    r.get(6)?,
                ))
            },
        )
        .optional()?;

    let Some((owner_id, product_id, units, amount_raw, value_raw, status_raw, product_name)) = row
    else {
        return Err(LedgerError::NotFound("Investment not found".into()).into());
    };

    if owner_id != requester_user_id {
        return Err(
            LedgerError::Unauthorized("Not authorized to redeem this investment".into()).into(),
        );
    }

    let status = InvestmentStatus::from_str(&status_raw)?;
    if status.is_closed() {
        return Err(
            LedgerError::InvalidState("Investment already redeemed or cancelled".into()).into(),
        );
    }

    let amount = decimal_field(&amount_raw, "amount")?;
    let current_value = decimal_field(&value_raw, "current_value")?;

    let (redemption_amount, redeemed_units, remaining_units) = match units_to_redeem {
        Some(u) if u < units => {
            let price_per_unit = current_value / Decimal::from(units);
            let redemption_amount = Decimal::from(u) * price_per_unit;
            let remaining = units - u;
            let ratio = Decimal::from(remaining) / Decimal::from(units);
            tx.execute(
                "UPDATE investments SET units=?1, amount=?2, current_value=?3 WHERE id=?4",
                params![
                    remaining,
                    (amount * ratio).to_string(),
                    (current_value * ratio).to_string(),
                    investment_id,
                ],
            )?;
            (redemption_amount, u, remaining)
        }
        _ => {
            tx.execute(
                "UPDATE investments SET status='redeemed' WHERE id=?1",
                params![investment_id],
            )?;
            (current_value, units, 0)
        }
    };

    let balance_before = user_balance(&tx, requester_user_id)?;
    let balance_after = balance_before + redemption_amount;
    tx.execute(
        "UPDATE users SET balance=?1 WHERE id=?2",
        params![balance_after.to_string(), requester_user_id],
    )?;

    // Redeemed units go back to the product's available pool.
    tx.execute(
        "UPDATE products SET units_sold = units_sold - ?1 WHERE id=?2",
        params![redeemed_units, product_id],
    )?;

    let transaction_id = append_entry(
        &tx,
        &LedgerEntry {
            user_id: requester_user_id,
            investment_id: Some(investment_id),
            r#type: TransactionType::Redemption,
            amount: redemption_amount,
            description: format!("Redemption of {} units in {}", redeemed_units, product_name),
            payment_method: Some(PaymentMethod::Wallet),
            balance_before,
            balance_after,
        },
    )?;

    tx.commit()?;

    Ok(RedemptionOutcome {
        transaction_id,
        redemption_amount,
        new_balance: balance_after,
        remaining_units,
    })
}

/// External valuation step: sets `current_value` and recomputes `returns`.
/// Nothing else ever touches those two columns after purchase.
pub fn revalue(conn: &Connection, investment_id: i64, current_value: Decimal) -> Result<()> {
    if current_value < Decimal::ZERO {
        return Err(LedgerError::Validation("Current value cannot be negative".into()).into());
    }
    let amount_raw: Option<String> = conn
        .query_row(
            "SELECT amount FROM investments WHERE id=?1",
            params![investment_id],
            |r| r.get(0),
        )
        .optional()?;
    let Some(amount_raw) = amount_raw else {
        return Err(LedgerError::NotFound("Investment not found".into()).into());
    };
    let amount = decimal_field(&amount_raw, "amount")?;
    let returns = current_value - amount;
    conn.execute(
        "UPDATE investments SET current_value=?1, returns=?2 WHERE id=?3",
        params![current_value.to_string(), returns.to_string(), investment_id],
    )?;
    Ok(())
}

/// Only the externally driven states are settable here; purchase and
/// redemption own the rest of the lifecycle.
pub fn set_status(conn: &Connection, investment_id: i64, status: InvestmentStatus) -> Result<()> {
    if !matches!(status, InvestmentStatus::Matured | InvestmentStatus::Cancelled) {
        return Err(LedgerError::Validation(format!(
            "Status '{}' is not externally settable",
            status
        ))
        .into());
    }
    let changed = conn.execute(
        "UPDATE investments SET status=?1 WHERE id=?2",
        params![status.as_str(), investment_id],
    )?;
    if changed == 0 {
        return Err(LedgerError::NotFound("Investment not found".into()).into());
    }
    Ok(())
}

#[derive(Debug, Serialize)]
pub struct InvestmentRow {
    pub id: i64,
    pub product: String,
    pub category: String,
    pub amount: String,
    pub units: i64,
    pub price_per_unit: String,
    pub status: String,
    pub investment_date: String,
    pub maturity_date: String,
    pub current_value: String,
    pub returns: String,
}

pub fn query_rows(
    conn: &Connection,
    user_id: i64,
    status: Option<&str>,
    limit: Option<usize>,
) -> Result<Vec<InvestmentRow>> {
    let mut sql = String::from(
        "SELECT i.id, p.name, p.category, i.amount, i.units, i.price_per_unit, i.status,
                i.investment_date, i.maturity_date, i.current_value, i.returns
         FROM investments i JOIN products p ON i.product_id = p.id
         WHERE i.user_id=?1",
    );
    let mut params_vec: Vec<String> = vec![user_id.to_string()];
    if let Some(s) = status {
        sql.push_str(" AND i.status=?2");
        params_vec.push(s.to_string());
    }
    sql.push_str(" ORDER BY i.investment_date DESC, i.id DESC");
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
        data.push(InvestmentRow {
            id: r.get(0)?,
            product: r.get(1)?,
            category: r.get(2)?,
            amount: r.get(3)?,
            units: r.get(4)?,
            price_per_unit: r.get(5)?,
            status: r.get(6)?,
            investment_date: r.get(7)?,
            maturity_date: r.get(8)?,
            current_value: r.get(9)?,
            returns: r.get(10)?,
        });
    }
    Ok(data)
}

fn buy_cmd(conn: &mut Connection, sub: &clap::ArgMatches) -> Result<()> {
    let email = sub.get_one::<String>("user").unwrap();
    let product_id: i64 = *sub.get_one::<i64>("product").unwrap();
    let amount = parse_decimal(sub.get_one::<String>("amount").unwrap().trim())?;
    let units: i64 = *sub.get_one::<i64>("units").unwrap();
    let method = PaymentMethod::from_str(
        sub.get_one::<String>("method")
            .map(|s| s.as_str())
            .unwrap_or("wallet"),
    )?;
    let user_id = id_for_user(conn, email)?;
    let outcome = purchase(conn, user_id, product_id, amount, units, method)?;
    println!(
        "Invested {} in '{}': {} units @ {} ({}). Matures {}. Balance: {}",
        fmt_money(&outcome.amount),
        outcome.product_name,
        outcome.units,
        fmt_money(&outcome.price_per_unit),
        outcome.transaction_id,
        outcome.maturity_date,
        fmt_money(&outcome.new_balance)
    );
    Ok(())
}

fn redeem_cmd(conn: &mut Connection, sub: &clap::ArgMatches) -> Result<()> {
    let email = sub.get_one::<String>("user").unwrap();
    let investment_id: i64 = *sub.get_one::<i64>("id").unwrap();
    let units_to_redeem = sub.get_one::<i64>("units").copied();
    let user_id = id_for_user(conn, email)?;
    let outcome = redeem(conn, investment_id, user_id, units_to_redeem)?;
    println!(
        "Redeemed {} ({}). Remaining units: {}. Balance: {}",
        fmt_money(&outcome.redemption_amount),
        outcome.transaction_id,
        outcome.remaining_units,
        fmt_money(&outcome.new_balance)
    );
    Ok(())
}

fn list_cmd(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let json_flag = sub.get_flag("json");
    let jsonl_flag = sub.get_flag("jsonl");
    let email = sub.get_one::<String>("user").unwrap();
    let status = sub.get_one::<String>("status").map(|s| s.as_str());
    let limit = sub.get_one::<usize>("limit").copied();
    let user_id = id_for_user(conn, email)?;
    let data = query_rows(conn, user_id, status, limit)?;
    if !maybe_print_json(json_flag, jsonl_flag, &data)? {
        let rows: Vec<Vec<String>> = data
            .iter()
            .map(|r| {
                vec![
                    r.id.to_string(),
                    r.product.clone(),
                    r.category.clone(),
                    r.amount.clone(),
                    r.units.to_string(),
                    r.status.clone(),
                    r.maturity_date.clone(),
                    r.current_value.clone(),
                    r.returns.clone(),
                ]
            })
            .collect();
        println!(
            "{}",
            pretty_table(
                &[
                    "Id", "Product", "Category", "Amount", "Units", "Status", "Matures", "Value",
                    "Returns",
                ],
                rows,
            )
        );
    }
    Ok(())
}

fn show_cmd(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let investment_id: i64 = *sub.get_one::<i64>("id").unwrap();
    let row: Option<(i64, String, String, i64, String, String, String, String, String, String)> =
        conn.query_row(
            "SELECT i.id, p.name, i.amount, i.units, i.price_per_unit, i.status,
                    i.investment_date, i.maturity_date, i.current_value, i.returns
             FROM investments i JOIN products p ON i.product_id = p.id
             WHERE i.id=?1",
            params![investment_id],
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
                ))
            },
        )
        .optional()?;
    let Some((id, product, amount, units, ppu, status, inv_date, mat_date, value, returns)) = row
    else {
        return Err(LedgerError::NotFound("Investment not found".into()).into());
    };
    let rows = vec![
        vec!["Id".into(), id.to_string()],
        vec!["Product".into(), product],
        vec!["Amount".into(), amount],
        vec!["Units".into(), units.to_string()],
        vec!["Price/Unit".into(), ppu],
        vec!["Status".into(), status],
        vec!["Invested".into(), inv_date],
        vec!["Matures".into(), mat_date],
        vec!["Current Value".into(), value],
        vec!["Returns".into(), returns],
    ];
    println!("{}", pretty_table(&["Field", "Value"], rows));
    Ok(())
}

fn revalue_cmd(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let investment_id: i64 = *sub.get_one::<i64>("id").unwrap();
    let value = parse_decimal(sub.get_one::<String>("value").unwrap().trim())?;
    revalue(conn, investment_id, value)?;
    println!("Investment {} revalued to {}", investment_id, fmt_money(&value));
    Ok(())
}

fn set_status_cmd(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let investment_id: i64 = *sub.get_one::<i64>("id").unwrap();
    let status = InvestmentStatus::from_str(sub.get_one::<String>("status").unwrap())?;
    set_status(conn, investment_id, status)?;
    println!("Investment {} marked {}", investment_id, status);
    Ok(())
}
