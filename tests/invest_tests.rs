// Copyright (c) 2025 Fundwallet Contributors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use fundwallet::commands::invest;
use fundwallet::errors::LedgerError;
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
         VALUES('Blue Fund','mutual_fund','1000','100000','12',12,'medium',10,'Blue AMC')",
        [],
    )
    .unwrap();
    conn
}

fn balance(conn: &Connection) -> Decimal {
    let s: String = conn
        .query_row("SELECT balance FROM users WHERE id=1", [], |r| r.get(0))
        .unwrap();
    s.parse().unwrap()
}

fn units_sold(conn: &Connection) -> i64 {
    conn.query_row("SELECT units_sold FROM products WHERE id=1", [], |r| {
        r.get(0)
    })
    .unwrap()
}

#[test]
fn purchase_debits_wallet_and_sells_units() {
    let mut conn = setup();
    let outcome =
        invest::purchase(&mut conn, 1, 1, Decimal::from(5_000), 5, PaymentMethod::Wallet).unwrap();

    assert_eq!(outcome.price_per_unit, Decimal::from(1_000));
    assert_eq!(outcome.new_balance, Decimal::from(45_000));
    // 5000 * 12% * 12 months / 12 = 600
    assert_eq!(outcome.expected_return_amount, Decimal::from(600));
    assert_eq!(balance(&conn), Decimal::from(45_000));
    assert_eq!(units_sold(&conn), 5);

    let (status, value, before, after): (String, String, String, String) = conn
        .query_row(
            "SELECT i.status, i.current_value, t.balance_before, t.balance_after
             FROM investments i JOIN transactions t ON t.investment_id = i.id
             WHERE i.id=?1 AND t.type='investment'",
            [outcome.investment_id],
            |r| Ok((r.get(0)?, r.get(1)?, r.get(2)?, r.get(3)?)),
        )
        .unwrap();
    assert_eq!(status, "confirmed");
    assert_eq!(value, "5000");
    assert_eq!(before, "50000");
    assert_eq!(after, "45000");

    let txn_count: i64 = conn
        .query_row(
            "SELECT COUNT(*) FROM transactions WHERE type='investment'",
            [],
            |r| r.get(0),
        )
        .unwrap();
    assert_eq!(txn_count, 1);
}

#[test]
fn purchase_at_minimum_succeeds_one_paisa_below_fails() {
    let mut conn = setup();
    invest::purchase(&mut conn, 1, 1, Decimal::from(1_000), 1, PaymentMethod::Wallet).unwrap();

    let err = invest::purchase(
        &mut conn,
        1,
        1,
        "999.99".parse().unwrap(),
        1,
        PaymentMethod::Wallet,
    )
    .unwrap_err();
    assert!(matches!(
        err.downcast_ref::<LedgerError>(),
        Some(LedgerError::Validation(_))
    ));
    // Only the first purchase left any trace.
    assert_eq!(units_sold(&conn), 1);
    assert_eq!(balance(&conn), Decimal::from(49_000));
}

#[test]
fn purchase_honors_unit_inventory_boundary() {
    let mut conn = setup();
    // Exactly the remaining inventory is fine.
    invest::purchase(&mut conn, 1, 1, Decimal::from(10_000), 10, PaymentMethod::Wallet).unwrap();
    assert_eq!(units_sold(&conn), 10);

    // One more than remaining is an inventory shortfall.
    let err = invest::purchase(&mut conn, 1, 1, Decimal::from(1_000), 1, PaymentMethod::Wallet)
        .unwrap_err();
    assert!(matches!(
        err.downcast_ref::<LedgerError>(),
        Some(LedgerError::InsufficientFunds(_))
    ));
    assert_eq!(units_sold(&conn), 10);
}

#[test]
fn purchase_of_inactive_product_is_not_found() {
    let mut conn = setup();
    conn.execute("UPDATE products SET is_active=0 WHERE id=1", [])
        .unwrap();
    let err = invest::purchase(&mut conn, 1, 1, Decimal::from(5_000), 5, PaymentMethod::Wallet)
        .unwrap_err();
    assert!(matches!(
        err.downcast_ref::<LedgerError>(),
        Some(LedgerError::NotFound(_))
    ));
}

#[test]
fn purchase_of_missing_product_is_not_found() {
    let mut conn = setup();
    let err = invest::purchase(&mut conn, 1, 99, Decimal::from(5_000), 5, PaymentMethod::Wallet)
        .unwrap_err();
    assert!(matches!(
        err.downcast_ref::<LedgerError>(),
        Some(LedgerError::NotFound(_))
    ));
}

#[test]
fn purchase_beyond_balance_is_rejected() {
    let mut conn = setup();
    conn.execute("UPDATE users SET balance='2000' WHERE id=1", [])
        .unwrap();
    let err = invest::purchase(&mut conn, 1, 1, Decimal::from(5_000), 5, PaymentMethod::Wallet)
        .unwrap_err();
    assert!(matches!(
        err.downcast_ref::<LedgerError>(),
        Some(LedgerError::InsufficientFunds(_))
    ));
    assert_eq!(balance(&conn), Decimal::from(2_000));
    assert_eq!(units_sold(&conn), 0);
}

#[test]
fn replayed_purchase_is_not_deduplicated() {
    // There is no idempotency key: the same request twice buys twice.
    let mut conn = setup();
    invest::purchase(&mut conn, 1, 1, Decimal::from(5_000), 5, PaymentMethod::Wallet).unwrap();
    invest::purchase(&mut conn, 1, 1, Decimal::from(5_000), 5, PaymentMethod::Wallet).unwrap();

    let investments: i64 = conn
        .query_row("SELECT COUNT(*) FROM investments", [], |r| r.get(0))
        .unwrap();
    assert_eq!(investments, 2);
    assert_eq!(units_sold(&conn), 10);
    assert_eq!(balance(&conn), Decimal::from(40_000));
}

#[test]
fn maturity_is_investment_date_plus_tenure() {
    let mut conn = setup();
    let outcome =
        invest::purchase(&mut conn, 1, 1, Decimal::from(5_000), 5, PaymentMethod::Wallet).unwrap();
    let today = chrono::Utc::now().date_naive();
    let expected = today.checked_add_months(chrono::Months::new(12)).unwrap();
    assert_eq!(outcome.maturity_date, expected);
}

#[test]
fn revalue_sets_value_and_returns() {
    let mut conn = setup();
    let outcome =
        invest::purchase(&mut conn, 1, 1, Decimal::from(5_000), 5, PaymentMethod::Wallet).unwrap();
    invest::revalue(&conn, outcome.investment_id, Decimal::from(5_500)).unwrap();

    let (value, returns): (String, String) = conn
        .query_row(
            "SELECT current_value, returns FROM investments WHERE id=?1",
            [outcome.investment_id],
            |r| Ok((r.get(0)?, r.get(1)?)),
        )
        .unwrap();
    assert_eq!(value, "5500");
    assert_eq!(returns, "500");
}

#[test]
fn set_status_only_accepts_external_states() {
    let mut conn = setup();
    let outcome =
        invest::purchase(&mut conn, 1, 1, Decimal::from(5_000), 5, PaymentMethod::Wallet).unwrap();

    let err = invest::set_status(
        &conn,
        outcome.investment_id,
        fundwallet::models::InvestmentStatus::Redeemed,
    )
    .unwrap_err();
    assert!(matches!(
        err.downcast_ref::<LedgerError>(),
        Some(LedgerError::Validation(_))
    ));

    invest::set_status(
        &conn,
        outcome.investment_id,
        fundwallet::models::InvestmentStatus::Matured,
    )
    .unwrap();
    let status: String = conn
        .query_row(
            "SELECT status FROM investments WHERE id=?1",
            [outcome.investment_id],
            |r| r.get(0),
        )
        .unwrap();
    assert_eq!(status, "matured");
}
