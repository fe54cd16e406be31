// Copyright (c) 2025 Fundwallet Contributors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::errors::LedgerError;
use crate::utils::{parse_decimal, pretty_table};
use anyhow::Result;
use rusqlite::{params, Connection};
use rust_decimal::Decimal;

pub fn handle(conn: &Connection, m: &clap::ArgMatches) -> Result<()> {
    match m.subcommand() {
        Some(("add", sub)) => {
            let name = sub.get_one::<String>("name").unwrap().trim().to_string();
            let email = sub
                .get_one::<String>("email")
                .unwrap()
                .trim()
                .to_lowercase();
            let role = sub
                .get_one::<String>("role")
                .map(|s| s.as_str())
                .unwrap_or("user");
            if role != "user" && role != "admin" {
                return Err(
                    LedgerError::Validation(format!("Unknown role '{}'", role)).into(),
                );
            }
            let balance = match sub.get_one::<String>("balance") {
                Some(raw) => parse_decimal(raw.trim())?,
                None => Decimal::ZERO,
            };
            if balance < Decimal::ZERO {
                return Err(
                    LedgerError::Validation("Opening balance cannot be negative".into()).into(),
                );
            }
            conn.execute(
                "INSERT INTO users(name, email, role, balance) VALUES (?1, ?2, ?3, ?4)",
                params![name, email, role, balance.to_string()],
            )?;
            println!("Added user '{}' <{}> ({})", name, email, role);
        }
        Some(("list", _)) => {
            let mut stmt = conn.prepare(
                "SELECT name, email, role, kyc_status, balance, created_at
                 FROM users ORDER BY name",
            )?;
            let rows = stmt.query_map([], |r| {
                Ok((
                    r.get::<_, String>(0)?,
                    r.get::<_, String>(1)?,
                    r.get::<_, String>(2)?,
                    r.get::<_, String>(3)?,
                    r.get::<_, String>(4)?,
                    r.get::<_, String>(5)?,
                ))
            })?;
            let mut data = Vec::new();
            for row in rows {
                let (n, e, role, kyc, bal, created) = row?;
                data.push(vec![n, e, role, kyc, bal, created]);
            }
            println!(
                "{}",
                pretty_table(
                    &["Name", "Email", "Role", "KYC", "Balance", "Created"],
                    data
                )
            );
        }
        Some(("set-kyc", sub)) => {
            let email = sub.get_one::<String>("email").unwrap().trim().to_lowercase();
            let status = sub.get_one::<String>("status").unwrap();
            if !matches!(status.as_str(), "pending" | "verified" | "rejected") {
                return Err(
                    LedgerError::Validation(format!("Unknown KYC status '{}'", status)).into(),
                );
            }
            let changed = conn.execute(
                "UPDATE users SET kyc_status=?1 WHERE email=?2",
                params![status, email],
            )?;
            if changed == 0 {
                return Err(LedgerError::NotFound(format!("User '{}' not found", email)).into());
            }
            println!("KYC status for {} set to {}", email, status);
        }
        _ => {}
    }
    Ok(())
}
