// Copyright (c) 2025 Fundwallet Contributors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use fundwallet::cli;
use fundwallet::commands::products;
use fundwallet::errors::LedgerError;
use rusqlite::Connection;

fn setup() -> Connection {
    let mut conn = Connection::open_in_memory().unwrap();
    fundwallet::db::init_schema(&mut conn).unwrap();
    conn
}

fn add_product(conn: &Connection, name: &str, category: &str, ret: &str, risk: &str) {
    conn.execute(
        "INSERT INTO products(name, category, min_investment, max_investment, expected_return,
                              tenure, risk_level, total_units_available, issuer)
         VALUES(?1, ?2, '1000', '50000', ?3, 12, ?4, 100, 'Issuer')",
        rusqlite::params![name, category, ret, risk],
    )
    .unwrap();
}

fn run_product(conn: &Connection, args: &[&str]) -> anyhow::Result<()> {
    let mut full = vec!["fundwallet", "product"];
    full.extend_from_slice(args);
    let m = cli::build_cli().get_matches_from(full);
    let (_, sub) = m.subcommand().unwrap();
    products::handle(conn, sub)
}

#[test]
fn list_orders_by_return_numerically() {
    let conn = setup();
    add_product(&conn, "Seven", "bonds", "7", "low");
    add_product(&conn, "Twelve", "mutual_fund", "12", "medium");
    add_product(&conn, "Nine Half", "equity", "9.5", "high");

    let rows = products::query_rows(&conn, None, None, false, None).unwrap();
    let returns: Vec<&str> = rows.iter().map(|p| p.expected_return.as_str()).collect();
    assert_eq!(returns, vec!["12", "9.5", "7"]);
    assert_eq!(rows[0].name, "Twelve");
}

#[test]
fn list_filters_and_limit() {
    let conn = setup();
    add_product(&conn, "A", "bonds", "7", "low");
    add_product(&conn, "B", "bonds", "8", "medium");
    add_product(&conn, "C", "equity", "11", "high");
    conn.execute("UPDATE products SET is_active=0 WHERE name='B'", [])
        .unwrap();

    let bonds = products::query_rows(&conn, Some("bonds"), None, false, None).unwrap();
    assert_eq!(bonds.len(), 2);

    let active_bonds = products::query_rows(&conn, Some("bonds"), None, true, None).unwrap();
    assert_eq!(active_bonds.len(), 1);
    assert_eq!(active_bonds[0].name, "A");

    let top = products::query_rows(&conn, None, None, false, Some(1)).unwrap();
    assert_eq!(top.len(), 1);
    assert_eq!(top[0].name, "C");
}

#[test]
fn update_rejects_inverted_bounds() {
    let conn = setup();
    add_product(&conn, "Fund", "mutual_fund", "10", "medium");

    // min above the stored max of 50000
    let err = run_product(&conn, &["update", "--id", "1", "--min", "60000"]).unwrap_err();
    assert!(matches!(
        err.downcast_ref::<LedgerError>(),
        Some(LedgerError::Validation(_))
    ));

    // max below the stored min of 1000
    let err = run_product(&conn, &["update", "--id", "1", "--max", "500"]).unwrap_err();
    assert!(matches!(
        err.downcast_ref::<LedgerError>(),
        Some(LedgerError::Validation(_))
    ));

    // Neither failure wrote anything.
    let (min, max): (String, String) = conn
        .query_row(
            "SELECT min_investment, max_investment FROM products WHERE id=1",
            [],
            |r| Ok((r.get(0)?, r.get(1)?)),
        )
        .unwrap();
    assert_eq!(min, "1000");
    assert_eq!(max, "50000");
}

#[test]
fn update_accepts_consistent_bounds() {
    let conn = setup();
    add_product(&conn, "Fund", "mutual_fund", "10", "medium");

    run_product(&conn, &["update", "--id", "1", "--min", "2000", "--max", "80000"]).unwrap();
    let (min, max): (String, String) = conn
        .query_row(
            "SELECT min_investment, max_investment FROM products WHERE id=1",
            [],
            |r| Ok((r.get(0)?, r.get(1)?)),
        )
        .unwrap();
    assert_eq!(min, "2000");
    assert_eq!(max, "80000");
}

#[test]
fn update_of_missing_product_is_not_found() {
    let conn = setup();
    let err = run_product(&conn, &["update", "--id", "9", "--min", "2000"]).unwrap_err();
    assert!(matches!(
        err.downcast_ref::<LedgerError>(),
        Some(LedgerError::NotFound(_))
    ));
}
