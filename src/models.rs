// Copyright (c) 2025 Fundwallet Contributors.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

use crate::errors::LedgerError;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub role: String,
    pub kyc_status: String,
    pub balance: Decimal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProductCategory {
    MutualFund,
    FixedDeposit,
    Bonds,
    Equity,
    RealEstate,
    Gold,
    Cryptocurrency,
}

impl ProductCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::MutualFund => "mutual_fund",
            Self::FixedDeposit => "fixed_deposit",
            Self::Bonds => "bonds",
            Self::Equity => "equity",
            Self::RealEstate => "real_estate",
            Self::Gold => "gold",
            Self::Cryptocurrency => "cryptocurrency",
        }
    }
}

impl FromStr for ProductCategory {
    type Err = LedgerError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "mutual_fund" => Ok(Self::MutualFund),
            "fixed_deposit" => Ok(Self::FixedDeposit),
            "bonds" => Ok(Self::Bonds),
            "equity" => Ok(Self::Equity),
            "real_estate" => Ok(Self::RealEstate),
            "gold" => Ok(Self::Gold),
            "cryptocurrency" => Ok(Self::Cryptocurrency),
            other => Err(LedgerError::Validation(format!(
                "Unknown product category '{}'",
                other
            ))),
        }
    }
}

impl fmt::Display for ProductCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl RiskLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
        }
    }
}

impl FromStr for RiskLevel {
    type Err = LedgerError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "low" => Ok(Self::Low),
            "medium" => Ok(Self::Medium),
            "high" => Ok(Self::High),
            other => Err(LedgerError::Validation(format!(
                "Unknown risk level '{}'",
                other
            ))),
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    pub id: i64,
    pub name: String,
    pub category: ProductCategory,
    pub min_investment: Decimal,
    pub max_investment: Decimal,
    pub expected_return: Decimal,
    pub tenure: u32,
    pub risk_level: RiskLevel,
    pub is_active: bool,
    pub total_units_available: i64,
    pub units_sold: i64,
    pub issuer: String,
    pub rating: String,
}

impl Product {
    /// Pure projection; never stored.
    pub fn units_remaining(&self) -> i64 {
        self.total_units_available - self.units_sold
    }

    pub fn is_available(&self) -> bool {
        self.is_active && self.units_remaining() > 0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InvestmentStatus {
    Pending,
    Confirmed,
    Matured,
    Redeemed,
    Cancelled,
}

impl InvestmentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Confirmed => "confirmed",
            Self::Matured => "matured",
            Self::Redeemed => "redeemed",
            Self::Cancelled => "cancelled",
        }
    }

    /// Closed positions can no longer be redeemed.
    pub fn is_closed(&self) -> bool {
        matches!(self, Self::Redeemed | Self::Cancelled)
    }
}

impl FromStr for InvestmentStatus {
    type Err = LedgerError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "confirmed" => Ok(Self::Confirmed),
            "matured" => Ok(Self::Matured),
            "redeemed" => Ok(Self::Redeemed),
            "cancelled" => Ok(Self::Cancelled),
            other => Err(LedgerError::Validation(format!(
                "Unknown investment status '{}'",
                other
            ))),
        }
    }
}

impl fmt::Display for InvestmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Investment {
    pub id: i64,
    pub user_id: i64,
    pub product_id: i64,
    pub amount: Decimal,
    pub units: i64,
    pub price_per_unit: Decimal,
    pub status: InvestmentStatus,
    pub investment_date: String,
    pub maturity_date: NaiveDate,
    pub expected_return: Decimal,
    pub current_value: Decimal,
    pub returns: Decimal,
    pub transaction_id: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionType {
    Investment,
    Redemption,
    Deposit,
    Withdrawal,
    Dividend,
    Interest,
    Fee,
    Refund,
}

impl TransactionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Investment => "investment",
            Self::Redemption => "redemption",
            Self::Deposit => "deposit",
            Self::Withdrawal => "withdrawal",
            Self::Dividend => "dividend",
            Self::Interest => "interest",
            Self::Fee => "fee",
            Self::Refund => "refund",
        }
    }

    /// Positive impact on the wallet balance.
    pub fn is_credit(&self) -> bool {
        matches!(
            self,
            Self::Deposit | Self::Dividend | Self::Interest | Self::Refund | Self::Redemption
        )
    }

    /// Negative impact on the wallet balance.
    pub fn is_debit(&self) -> bool {
        matches!(self, Self::Investment | Self::Withdrawal | Self::Fee)
    }
}

impl FromStr for TransactionType {
    type Err = LedgerError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "investment" => Ok(Self::Investment),
            "redemption" => Ok(Self::Redemption),
            "deposit" => Ok(Self::Deposit),
            "withdrawal" => Ok(Self::Withdrawal),
            "dividend" => Ok(Self::Dividend),
            "interest" => Ok(Self::Interest),
            "fee" => Ok(Self::Fee),
            "refund" => Ok(Self::Refund),
            other => Err(LedgerError::Validation(format!(
                "Unknown transaction type '{}'",
                other
            ))),
        }
    }
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    Wallet,
    BankTransfer,
    Upi,
    Card,
}

impl PaymentMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Wallet => "wallet",
            Self::BankTransfer => "bank_transfer",
            Self::Upi => "upi",
            Self::Card => "card",
        }
    }
}

impl FromStr for PaymentMethod {
    type Err = LedgerError;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "wallet" => Ok(Self::Wallet),
            "bank_transfer" => Ok(Self::BankTransfer),
            "upi" => Ok(Self::Upi),
            "card" => Ok(Self::Card),
            other => Err(LedgerError::Validation(format!(
                "Unknown payment method '{}'",
                other
            ))),
        }
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transaction {
    pub id: i64,
    pub user_id: i64,
    pub investment_id: Option<i64>,
    pub r#type: TransactionType,
    pub amount: Decimal,
    pub status: String,
    pub description: String,
    pub payment_method: Option<PaymentMethod>,
    pub balance_before: Decimal,
    pub balance_after: Decimal,
    pub transaction_id: String,
}
