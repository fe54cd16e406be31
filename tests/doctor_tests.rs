// Copyright (c) 2025 Fundwallet Contributors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use fundwallet::commands::{doctor, invest, wallet};
use fundwallet::models::PaymentMethod;
use rusqlite::Connection;
use rust_decimal::Decimal;

fn setup() -> Connection {
    let mut conn = Connection::open_in_memory().unwrap();
    fundwallet::db::init_schema(&mut conn).unwrap();
    conn.execute(
        "INSERT INTO users(name, email, balance) VALUES('Asha','asha@example.com','50000')",
        [],
    )
    .unwrap();
    conn.execute(
        "INSERT INTO products(name, category, min_investment, max_investment, expected_return,
                              tenure, risk_level, total_units_available, issuer)
         VALUES('Blue Fund','mutual_fund','1000','100000','12',12,'medium',50,'Blue AMC')",
        [],
    )
    .unwrap();
    conn
}

fn issues_of(rows: &[Vec<String>], label: &str) -> usize {
    rows.iter().filter(|r| r[0] == label).count()
}

#[test]
fn healthy_store_passes_the_audit() {
    let mut conn = setup();
    wallet::deposit(&mut conn, 1, Decimal::from(10_000), PaymentMethod::Upi).unwrap();
    invest::purchase(&mut conn, 1, 1, Decimal::from(5_000), 5, PaymentMethod::Wallet).unwrap();
    invest::redeem(&mut conn, 1, 1, Some(2)).unwrap();

    assert!(doctor::audit(&conn).unwrap().is_empty());
}

#[test]
fn ledger_mismatch_is_reported() {
    let mut conn = setup();
    wallet::deposit(&mut conn, 1, Decimal::from(10_000), PaymentMethod::Upi).unwrap();
    conn.execute("UPDATE transactions SET balance_after='61000'", [])
        .unwrap();

    let rows = doctor::audit(&conn).unwrap();
    assert_eq!(issues_of(&rows, "ledger_mismatch"), 1);
}

#[test]
fn oversold_inventory_is_reported() {
    let conn = setup();
    conn.execute("UPDATE products SET units_sold=60 WHERE id=1", [])
        .unwrap();

    let rows = doctor::audit(&conn).unwrap();
    assert_eq!(issues_of(&rows, "inventory_out_of_range"), 1);
}

#[test]
fn investment_entry_without_reference_is_reported() {
    let conn = setup();
    conn.execute(
        "INSERT INTO transactions(user_id, type, amount, status, description,
                                  balance_before, balance_after, transaction_id)
         VALUES(1,'investment','5000','completed','x','50000','45000','TXN1X')",
        [],
    )
    .unwrap();

    let rows = doctor::audit(&conn).unwrap();
    assert_eq!(issues_of(&rows, "missing_investment_ref"), 1);
}

#[test]
fn dangling_product_reference_is_reported() {
    let conn = setup();
    // The write paths never produce this; plant it behind the FK check's back.
    conn.pragma_update(None, "foreign_keys", false).unwrap();
    conn.execute(
        "INSERT INTO investments(user_id, product_id, amount, units, price_per_unit, status,
                                 maturity_date, expected_return, current_value)
         VALUES(1, 99, '5000', 5, '1000', 'confirmed', '2026-12-01', '12', '5000')",
        [],
    )
    .unwrap();

    let rows = doctor::audit(&conn).unwrap();
    assert_eq!(issues_of(&rows, "dangling_product_ref"), 1);
}

#[test]
fn negative_balance_is_reported() {
    let conn = setup();
    conn.execute("UPDATE users SET balance='-250' WHERE id=1", [])
        .unwrap();

    let rows = doctor::audit(&conn).unwrap();
    assert_eq!(issues_of(&rows, "negative_balance"), 1);
}
