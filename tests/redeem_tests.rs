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
        "INSERT INTO users(name, email, balance) VALUES('Ravi','ravi@example.com','1000')",
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

fn balance(conn: &Connection, user_id: i64) -> Decimal {
    let s: String = conn
        .query_row("SELECT balance FROM users WHERE id=?1", [user_id], |r| {
            r.get(0)
        })
        .unwrap();
    s.parse().unwrap()
}

fn units_sold(conn: &Connection) -> i64 {
    conn.query_row("SELECT units_sold FROM products WHERE id=1", [], |r| {
        r.get(0)
    })
    .unwrap()
}

/// Seed an investment the way a purchase would, with a chosen current value.
fn seed_investment(conn: &Connection, units: i64, amount: &str, current_value: &str) -> i64 {
    conn.execute(
        "INSERT INTO investments(user_id, product_id, amount, units, price_per_unit, status,
                                 maturity_date, expected_return, current_value)
         VALUES (1, 1, ?1, ?2, ?3, 'confirmed', '2026-12-01', '12', ?4)",
        rusqlite::params![
            amount,
            units,
            (amount.parse::<Decimal>().unwrap() / Decimal::from(units)).to_string(),
            current_value,
        ],
    )
    .unwrap();
    conn.execute(
        "UPDATE products SET units_sold = units_sold + ?1 WHERE id=1",
        [units],
    )
    .unwrap();
    conn.last_insert_rowid()
}

#[test]
fn full_redemption_closes_position_and_credits_wallet() {
    let mut conn = setup();
    let outcome =
        invest::purchase(&mut conn, 1, 1, Decimal::from(5_000), 5, PaymentMethod::Wallet).unwrap();
    assert_eq!(balance(&conn, 1), Decimal::from(45_000));

    let redemption = invest::redeem(&mut conn, outcome.investment_id, 1, None).unwrap();
    assert_eq!(redemption.redemption_amount, Decimal::from(5_000));
    assert_eq!(redemption.new_balance, Decimal::from(50_000));
    assert_eq!(redemption.remaining_units, 0);
    assert_eq!(units_sold(&conn), 0);

    let status: String = conn
        .query_row(
            "SELECT status FROM investments WHERE id=?1",
            [outcome.investment_id],
            |r| r.get(0),
        )
        .unwrap();
    assert_eq!(status, "redeemed");

    let (t, before, after): (String, String, String) = conn
        .query_row(
            "SELECT type, balance_before, balance_after FROM transactions
             WHERE transaction_id=?1",
            [&redemption.transaction_id],
            |r| Ok((r.get(0)?, r.get(1)?, r.get(2)?)),
        )
        .unwrap();
    assert_eq!(t, "redemption");
    assert_eq!(before, "45000");
    assert_eq!(after, "50000");
}

#[test]
fn partial_redemption_scales_position_down() {
    let mut conn = setup();
    let id = seed_investment(&conn, 10, "10000", "11000");

    let redemption = invest::redeem(&mut conn, id, 1, Some(4)).unwrap();
    // 4 units at 11000/10 = 1100 each
    assert_eq!(redemption.redemption_amount, Decimal::from(4_400));
    assert_eq!(redemption.remaining_units, 6);
    assert_eq!(redemption.new_balance, Decimal::from(54_400));

    let (units, amount, value, status): (i64, String, String, String) = conn
        .query_row(
            "SELECT units, amount, current_value, status FROM investments WHERE id=?1",
            [id],
            |r| Ok((r.get(0)?, r.get(1)?, r.get(2)?, r.get(3)?)),
        )
        .unwrap();
    assert_eq!(units, 6);
    assert_eq!(amount.parse::<Decimal>().unwrap(), Decimal::from(6_000));
    assert_eq!(value.parse::<Decimal>().unwrap(), Decimal::from(6_600));
    assert_eq!(status, "confirmed");
    assert_eq!(units_sold(&conn), 6);
}

#[test]
fn redeeming_all_held_units_is_a_full_redemption() {
    let mut conn = setup();
    let id = seed_investment(&conn, 10, "10000", "11000");

    let redemption = invest::redeem(&mut conn, id, 1, Some(10)).unwrap();
    assert_eq!(redemption.redemption_amount, Decimal::from(11_000));
    assert_eq!(redemption.remaining_units, 0);

    let status: String = conn
        .query_row("SELECT status FROM investments WHERE id=?1", [id], |r| {
            r.get(0)
        })
        .unwrap();
    assert_eq!(status, "redeemed");
}

#[test]
fn redeem_requires_ownership() {
    let mut conn = setup();
    let id = seed_investment(&conn, 10, "10000", "11000");

    let err = invest::redeem(&mut conn, id, 2, None).unwrap_err();
    assert!(matches!(
        err.downcast_ref::<LedgerError>(),
        Some(LedgerError::Unauthorized(_))
    ));
    assert_eq!(balance(&conn, 2), Decimal::from(1_000));
}

#[test]
fn redeeming_a_closed_investment_fails() {
    let mut conn = setup();
    let id = seed_investment(&conn, 10, "10000", "11000");
    invest::redeem(&mut conn, id, 1, None).unwrap();

    let err = invest::redeem(&mut conn, id, 1, None).unwrap_err();
    assert!(matches!(
        err.downcast_ref::<LedgerError>(),
        Some(LedgerError::InvalidState(_))
    ));
}

#[test]
fn redeeming_missing_investment_is_not_found() {
    let mut conn = setup();
    let err = invest::redeem(&mut conn, 42, 1, None).unwrap_err();
    assert!(matches!(
        err.downcast_ref::<LedgerError>(),
        Some(LedgerError::NotFound(_))
    ));
}

#[test]
fn zero_units_to_redeem_is_rejected() {
    let mut conn = setup();
    let id = seed_investment(&conn, 10, "10000", "11000");
    let err = invest::redeem(&mut conn, id, 1, Some(0)).unwrap_err();
    assert!(matches!(
        err.downcast_ref::<LedgerError>(),
        Some(LedgerError::Validation(_))
    ));
}
