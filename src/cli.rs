// Copyright (c) 2025 Fundwallet Contributors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use clap::{value_parser, Arg, ArgAction, Command};

fn json_flags(cmd: Command) -> Command {
    cmd.arg(
        Arg::new("json")
            .long("json")
            .action(ArgAction::SetTrue)
            .help("Print as pretty JSON"),
    )
    .arg(
        Arg::new("jsonl")
            .long("jsonl")
            .action(ArgAction::SetTrue)
            .help("Print as JSON lines"),
    )
}

fn user_arg() -> Arg {
    Arg::new("user")
        .long("user")
        .required(true)
        .help("User email")
}

pub fn build_cli() -> Command {
    Command::new("fundwallet")
        .about("Demo investment-platform wallet, fund-unit ledger, and reporting CLI")
        .version(clap::crate_version!())
        .subcommand(Command::new("init").about("Initialize the database"))
        .subcommand(
            Command::new("user")
                .about("Manage users")
                .subcommand(
                    Command::new("add")
                        .about("Add a user")
                        .arg(Arg::new("name").long("name").required(true))
                        .arg(Arg::new("email").long("email").required(true))
                        .arg(Arg::new("role").long("role").help("user|admin"))
                        .arg(Arg::new("balance").long("balance").help("Opening balance")),
                )
                .subcommand(Command::new("list").about("List users"))
                .subcommand(
                    Command::new("set-kyc")
                        .about("Set KYC status")
                        .arg(Arg::new("email").long("email").required(true))
                        .arg(
                            Arg::new("status")
                                .long("status")
                                .required(true)
                                .help("pending|verified|rejected"),
                        ),
                ),
        )
        .subcommand(
            Command::new("product")
                .about("Manage investment products")
                .subcommand(
                    Command::new("add")
                        .about("Add a product (admin)")
                        .arg(Arg::new("name").long("name").required(true))
                        .arg(
                            Arg::new("category")
                                .long("category")
                                .required(true)
                                .help("mutual_fund|fixed_deposit|bonds|equity|real_estate|gold|cryptocurrency"),
                        )
                        .arg(Arg::new("min").long("min").required(true))
                        .arg(Arg::new("max").long("max").required(true))
                        .arg(
                            Arg::new("return")
                                .long("return")
                                .required(true)
                                .help("Expected return, % per annum"),
                        )
                        .arg(
                            Arg::new("tenure")
                                .long("tenure")
                                .required(true)
                                .value_parser(value_parser!(i64))
                                .help("Tenure in months"),
                        )
                        .arg(
                            Arg::new("risk")
                                .long("risk")
                                .required(true)
                                .help("low|medium|high"),
                        )
                        .arg(
                            Arg::new("units")
                                .long("units")
                                .required(true)
                                .value_parser(value_parser!(i64))
                                .help("Total units available"),
                        )
                        .arg(Arg::new("issuer").long("issuer").required(true))
                        .arg(Arg::new("rating").long("rating")),
                )
                .subcommand(json_flags(
                    Command::new("list")
                        .about("List products")
                        .arg(Arg::new("category").long("category"))
                        .arg(Arg::new("risk").long("risk"))
                        .arg(
                            Arg::new("active")
                                .long("active")
                                .action(ArgAction::SetTrue)
                                .help("Only active products"),
                        )
                        .arg(
                            Arg::new("limit")
                                .long("limit")
                                .value_parser(value_parser!(usize)),
                        ),
                ))
                .subcommand(
                    Command::new("show").about("Show a product").arg(
                        Arg::new("id")
                            .long("id")
                            .required(true)
                            .value_parser(value_parser!(i64)),
                    ),
                )
                .subcommand(
                    Command::new("update")
                        .about("Update product terms (admin)")
                        .arg(
                            Arg::new("id")
                                .long("id")
                                .required(true)
                                .value_parser(value_parser!(i64)),
                        )
                        .arg(Arg::new("min").long("min"))
                        .arg(Arg::new("max").long("max"))
                        .arg(Arg::new("return").long("return"))
                        .arg(Arg::new("rating").long("rating")),
                )
                .subcommand(
                    Command::new("deactivate")
                        .about("Soft-delete a product (admin)")
                        .arg(
                            Arg::new("id")
                                .long("id")
                                .required(true)
                                .value_parser(value_parser!(i64)),
                        ),
                ),
        )
        .subcommand(
            Command::new("wallet")
                .about("Wallet deposits and withdrawals")
                .subcommand(
                    Command::new("deposit")
                        .about("Add money to the wallet")
                        .arg(user_arg())
                        .arg(Arg::new("amount").long("amount").required(true))
                        .arg(
                            Arg::new("method")
                                .long("method")
                                .help("wallet|bank_transfer|upi|card"),
                        ),
                )
                .subcommand(
                    Command::new("withdraw")
                        .about("Withdraw money from the wallet")
                        .arg(user_arg())
                        .arg(Arg::new("amount").long("amount").required(true))
                        .arg(
                            Arg::new("method")
                                .long("method")
                                .help("wallet|bank_transfer|upi|card"),
                        ),
                )
                .subcommand(
                    Command::new("balance")
                        .about("Show the wallet balance")
                        .arg(user_arg()),
                ),
        )
        .subcommand(
            Command::new("invest")
                .about("Buy, redeem, and inspect investments")
                .subcommand(
                    Command::new("buy")
                        .about("Buy units of a product")
                        .arg(user_arg())
                        .arg(
                            Arg::new("product")
                                .long("product")
                                .required(true)
                                .value_parser(value_parser!(i64)),
                        )
                        .arg(Arg::new("amount").long("amount").required(true))
                        .arg(
                            Arg::new("units")
                                .long("units")
                                .required(true)
                                .value_parser(value_parser!(i64)),
                        )
                        .arg(
                            Arg::new("method")
                                .long("method")
                                .help("wallet|bank_transfer|upi|card"),
                        ),
                )
                .subcommand(
                    Command::new("redeem")
                        .about("Redeem an investment, fully or partially")
                        .arg(user_arg())
                        .arg(
                            Arg::new("id")
                                .long("id")
                                .required(true)
                                .value_parser(value_parser!(i64)),
                        )
                        .arg(
                            Arg::new("units")
                                .long("units")
                                .value_parser(value_parser!(i64))
                                .help("Units to redeem; omit for full redemption"),
                        ),
                )
                .subcommand(json_flags(
                    Command::new("list")
                        .about("List a user's investments")
                        .arg(user_arg())
                        .arg(Arg::new("status").long("status"))
                        .arg(
                            Arg::new("limit")
                                .long("limit")
                                .value_parser(value_parser!(usize)),
                        ),
                ))
                .subcommand(
                    Command::new("show").about("Show an investment").arg(
                        Arg::new("id")
                            .long("id")
                            .required(true)
                            .value_parser(value_parser!(i64)),
                    ),
                )
                .subcommand(
                    Command::new("revalue")
                        .about("Set current value from an external valuation (admin)")
                        .arg(
                            Arg::new("id")
                                .long("id")
                                .required(true)
                                .value_parser(value_parser!(i64)),
                        )
                        .arg(Arg::new("value").long("value").required(true)),
                )
                .subcommand(
                    Command::new("set-status")
                        .about("Mark an investment matured or cancelled (admin)")
                        .arg(
                            Arg::new("id")
                                .long("id")
                                .required(true)
                                .value_parser(value_parser!(i64)),
                        )
                        .arg(
                            Arg::new("status")
                                .long("status")
                                .required(true)
                                .help("matured|cancelled"),
                        ),
                ),
        )
        .subcommand(
            Command::new("tx")
                .about("Transaction ledger history")
                .subcommand(json_flags(
                    Command::new("list")
                        .about("List a user's transactions")
                        .arg(user_arg())
                        .arg(Arg::new("type").long("type"))
                        .arg(Arg::new("status").long("status"))
                        .arg(
                            Arg::new("limit")
                                .long("limit")
                                .value_parser(value_parser!(usize)),
                        ),
                ))
                .subcommand(
                    Command::new("show")
                        .about("Show one ledger entry")
                        .arg(Arg::new("id").long("id").required(true).help("Transaction id (TXN...)")),
                )
                .subcommand(json_flags(
                    Command::new("summary")
                        .about("Per-type totals over completed transactions")
                        .arg(user_arg()),
                )),
        )
        .subcommand(
            Command::new("analytics")
                .about("Portfolio and ledger rollups")
                .subcommand(json_flags(
                    Command::new("portfolio")
                        .about("Active portfolio totals")
                        .arg(user_arg()),
                ))
                .subcommand(json_flags(
                    Command::new("by-status")
                        .about("Investments grouped by status")
                        .arg(user_arg()),
                ))
                .subcommand(json_flags(
                    Command::new("categories")
                        .about("Active portfolio grouped by product category")
                        .arg(user_arg()),
                ))
                .subcommand(json_flags(
                    Command::new("trend")
                        .about("Monthly investment trend, trailing 12 months")
                        .arg(user_arg()),
                ))
                .subcommand(json_flags(
                    Command::new("tx-types")
                        .about("Completed transactions grouped by type")
                        .arg(user_arg()),
                )),
        )
        .subcommand(
            Command::new("export")
                .about("Export data")
                .subcommand(
                    Command::new("transactions")
                        .about("Export the transaction ledger")
                        .arg(
                            Arg::new("format")
                                .long("format")
                                .default_value("csv")
                                .help("csv|json"),
                        )
                        .arg(Arg::new("out").long("out").required(true)),
                )
                .subcommand(
                    Command::new("investments")
                        .about("Export investments")
                        .arg(
                            Arg::new("format")
                                .long("format")
                                .default_value("csv")
                                .help("csv|json"),
                        )
                        .arg(Arg::new("out").long("out").required(true)),
                ),
        )
        .subcommand(Command::new("doctor").about("Audit ledger consistency"))
}
