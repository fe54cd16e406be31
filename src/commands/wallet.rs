// Copyright (c) 2025 Fundwallet Contributors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Wallet ledger core: every money-moving operation debits or credits the
//! user balance and appends a matching row to the transactions table, inside
//! one SQLite transaction so the pair lands or rolls back together.

use crate::errors::LedgerError;
use crate::models::{PaymentMethod, TransactionType};
use crate::utils::{fmt_money, id_for_user, new_transaction_id, parse_decimal, user_balance};
use anyhow::Result;
use rusqlite::{params, Connection};
use rust_decimal::Decimal;
use serde::Serialize;
use std::str::FromStr;

pub fn handle(conn: &mut Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("deposit", sub)) => deposit_cmd(conn, sub)?,
        Some(("withdraw", sub)) => withdraw_cmd(conn, sub)?,
        Some(("balance", sub)) => balance_cmd(conn, sub)?,
        _ => {}
    }
    Ok(())
}

/// One row for the append-only transactions table.
pub struct LedgerEntry {
    pub user_id: i64,
    pub investment_id: Option<i64>,
    pub r#type: TransactionType,
    pub amount: Decimal,
    pub description: String,
    pub payment_method: Option<PaymentMethod>,
    pub balance_before: Decimal,
    pub balance_after: Decimal,
}

/// Appends a completed ledger entry and returns its generated id. Callers
/// hold the enclosing SQLite transaction; this only inserts.
pub fn append_entry(conn: &Connection, entry: &LedgerEntry) -> Result<String> {
    let transaction_id = new_transaction_id();
    conn.execute(
        "INSERT INTO transactions(user_id, investment_id, type, amount, status, description,
                                  payment_method, balance_before, balance_after, transaction_id,
                                  processed_at)
         VALUES (?1, ?2, ?3, ?4, 'completed', ?5, ?6, ?7, ?8, ?9, datetime('now'))",
        params![
            entry.user_id,
            entry.investment_id,
            entry.r#type.as_str(),
            entry.amount.to_string(),
            entry.description,
            entry.payment_method.map(|p| p.as_str()),
            entry.balance_before.to_string(),
            entry.balance_after.to_string(),
            transaction_id,
        ],
    )?;
    Ok(transaction_id)
}

#[derive(Debug, Serialize)]
pub struct WalletReceipt {
    pub transaction_id: String,
    pub balance_before: Decimal,
    pub balance_after: Decimal,
}

pub fn deposit(
    conn: &mut Connection,
    user_id: i64,
    amount: Decimal,
    method: PaymentMethod,
) -> Result<WalletReceipt> {
    if amount < Decimal::from(100) || amount > Decimal::from(100_000) {
        return Err(LedgerError::Validation(
            "Amount must be between ₹100 and ₹1,00,000".into(),
        )
        .into());
    }

    let tx = conn.transaction()?;
    let balance_before = user_balance(&tx, user_id)?;
    let balance_after = balance_before + amount;
    tx.execute(
        "UPDATE users SET balance=?1 WHERE id=?2",
        params![balance_after.to_string(), user_id],
    )?;
    let transaction_id = append_entry(
        &tx,
        &LedgerEntry {
            user_id,
            investment_id: None,
            r#type: TransactionType::Deposit,
            amount,
            description: format!("Money added to wallet via {}", method),
            payment_method: Some(method),
            balance_before,
            balance_after,
        },
    )?;
    tx.commit()?;

    Ok(WalletReceipt {
        transaction_id,
        balance_before,
        balance_after,
    })
}

pub fn withdraw(
    conn: &mut Connection,
    user_id: i64,
    amount: Decimal,
    method: PaymentMethod,
) -> Result<WalletReceipt> {
    if amount < Decimal::from(100) {
        return Err(LedgerError::Validation("Minimum withdrawal amount is ₹100".into()).into());
    }

    let tx = conn.transaction()?;
    let balance_before = user_balance(&tx, user_id)?;
    if balance_before < amount {
        return Err(LedgerError::InsufficientFunds("Insufficient balance".into()).into());
    }
    let balance_after = balance_before - amount;
    tx.execute(
        "UPDATE users SET balance=?1 WHERE id=?2",
        params![balance_after.to_string(), user_id],
    )?;
    let transaction_id = append_entry(
        &tx,
        &LedgerEntry {
            user_id,
            investment_id: None,
            r#type: TransactionType::Withdrawal,
            amount,
            description: format!("Money withdrawn from wallet via {}", method),
            payment_method: Some(method),
            balance_before,
            balance_after,
        },
    )?;
    tx.commit()?;

    Ok(WalletReceipt {
        transaction_id,
        balance_before,
        balance_after,
    })
}

fn deposit_cmd(conn: &mut Connection, sub: &clap::ArgMatches) -> Result<()> {
    let email = sub.get_one::<String>("user").unwrap();
    let amount = parse_decimal(sub.get_one::<String>("amount").unwrap().trim())?;
    let method = PaymentMethod::from_str(
        sub.get_one::<String>("method")
            .map(|s| s.as_str())
            .unwrap_or("upi"),
    )?;
    let user_id = id_for_user(conn, email)?;
    let receipt = deposit(conn, user_id, amount, method)?;
    println!(
        "Deposited {} ({}). New balance: {}",
        fmt_money(&amount),
        receipt.transaction_id,
        fmt_money(&receipt.balance_after)
    );
    Ok(())
}

fn withdraw_cmd(conn: &mut Connection, sub: &clap::ArgMatches) -> Result<()> {
    let email = sub.get_one::<String>("user").unwrap();
    let amount = parse_decimal(sub.get_one::<String>("amount").unwrap().trim())?;
    let method = PaymentMethod::from_str(
        sub.get_one::<String>("method")
            .map(|s| s.as_str())
            .unwrap_or("bank_transfer"),
    )?;
    let user_id = id_for_user(conn, email)?;
    let receipt = withdraw(conn, user_id, amount, method)?;
    println!(
        "Withdrew {} ({}). New balance: {}",
        fmt_money(&amount),
        receipt.transaction_id,
        fmt_money(&receipt.balance_after)
    );
    Ok(())
}

fn balance_cmd(conn: &Connection, sub: &clap::ArgMatches) -> Result<()> {
    let email = sub.get_one::<String>("user").unwrap();
    let user_id = id_for_user(conn, email)?;
    let balance = user_balance(conn, user_id)?;
    println!("{}", fmt_money(&balance));
    Ok(())
}
