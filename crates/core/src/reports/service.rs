//! Report generation service.
//!
//! Reports are recomputed from posted journal lines and never read the cached
//! account balances.

use std::collections::HashMap;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use uuid::Uuid;

use daftar_shared::types::money::{to_money, within_tolerance};

use super::types::{
    AccountBalanceRow, BalanceSheetReport, BalanceSheetRow, BalanceSheetSection, PostedLine,
    ReportAccount, TrialBalanceGroup, TrialBalanceOptions, TrialBalanceReport, TrialBalanceTotals,
    TypeSubtotal,
};
use crate::fiscal::FiscalYear;
use crate::ledger::balance::balance_delta;
use crate::ledger::types::AccountType;

/// English label of the computed retained earnings row.
pub const RETAINED_EARNINGS_EN: &str = "Retained Earnings (Current)";
/// Arabic label of the computed retained earnings row.
pub const RETAINED_EARNINGS_AR: &str = "الأرباح المحتجزة (الحالية)";

/// Service for generating financial reports.
pub struct ReportService;

impl ReportService {
    /// Generates a trial balance for a fiscal year.
    ///
    /// `lines` must already be restricted to posted entries in the fiscal
    /// year dated on or before `as_of`.
    #[must_use]
    pub fn trial_balance(
        fiscal_year: &FiscalYear,
        as_of: NaiveDate,
        accounts: &[ReportAccount],
        lines: &[PostedLine],
        options: TrialBalanceOptions,
    ) -> TrialBalanceReport {
        let sums = Self::sum_by_account(lines);

        let mut rows: Vec<AccountBalanceRow> = accounts
            .iter()
            .filter(|a| !a.is_header)
            .map(|account| {
                let (debit, credit) = sums.get(&account.id).copied().unwrap_or_default();
                AccountBalanceRow {
                    account_id: account.id,
                    code: account.code.clone(),
                    name_en: account.name_en.clone(),
                    name_ar: account.name_ar.clone(),
                    account_type: account.account_type,
                    total_debit: to_money(debit),
                    total_credit: to_money(credit),
                    balance: to_money(balance_delta(account.account_type, debit, credit)),
                }
            })
            .filter(|row| {
                options.include_zero
                    || !(row.total_debit.is_zero()
                        && row.total_credit.is_zero()
                        && row.balance.is_zero())
            })
            .collect();
        rows.sort_by(|a, b| a.code.cmp(&b.code));

        let subtotals: Vec<TypeSubtotal> = AccountType::ALL
            .iter()
            .map(|t| Self::subtotal(*t, &rows))
            .collect();

        let groups = options.group_by_type.then(|| {
            AccountType::ALL
                .iter()
                .zip(&subtotals)
                .map(|(account_type, subtotal)| TrialBalanceGroup {
                    account_type: *account_type,
                    rows: rows
                        .iter()
                        .filter(|r| r.account_type == *account_type)
                        .cloned()
                        .collect(),
                    subtotal: *subtotal,
                })
                .collect()
        });

        let total_debit: Decimal = rows.iter().map(|r| r.total_debit).sum();
        let total_credit: Decimal = rows.iter().map(|r| r.total_credit).sum();

        TrialBalanceReport {
            fiscal_year_id: fiscal_year.id.into_inner(),
            fiscal_year_name: fiscal_year.name.clone(),
            as_of,
            rows,
            groups,
            subtotals,
            totals: TrialBalanceTotals {
                total_debit,
                total_credit,
                difference: total_debit - total_credit,
                is_balanced: within_tolerance(total_debit, total_credit),
            },
        }
    }

    /// Generates a balance sheet.
    ///
    /// `lines` must already be restricted to posted entries dated on or
    /// before `as_of`, across all fiscal years. Revenue and expense accounts
    /// are folded into a computed retained earnings row in equity.
    #[must_use]
    pub fn balance_sheet(
        as_of: NaiveDate,
        accounts: &[ReportAccount],
        lines: &[PostedLine],
    ) -> BalanceSheetReport {
        let sums = Self::sum_by_account(lines);

        let mut sorted: Vec<&ReportAccount> = accounts.iter().filter(|a| !a.is_header).collect();
        sorted.sort_by(|a, b| a.code.cmp(&b.code));

        let mut assets = BalanceSheetSection::default();
        let mut liabilities = BalanceSheetSection::default();
        let mut equity = BalanceSheetSection::default();
        let mut retained_earnings = Decimal::ZERO;

        for account in sorted {
            let Some((debit, credit)) = sums.get(&account.id).copied() else {
                continue;
            };
            let balance = balance_delta(account.account_type, debit, credit);
            let section = match account.account_type {
                AccountType::Asset => &mut assets,
                AccountType::Liability => &mut liabilities,
                AccountType::Equity => &mut equity,
                AccountType::Revenue => {
                    retained_earnings += balance;
                    continue;
                }
                AccountType::Expense => {
                    retained_earnings -= balance;
                    continue;
                }
            };
            if balance.is_zero() {
                continue;
            }
            Self::add_to_section(
                section,
                BalanceSheetRow {
                    account_id: Some(account.id),
                    code: Some(account.code.clone()),
                    name_en: account.name_en.clone(),
                    name_ar: account.name_ar.clone(),
                    balance: to_money(balance),
                    is_synthetic: false,
                },
            );
        }

        let retained_earnings = to_money(retained_earnings);
        if !retained_earnings.is_zero() {
            Self::add_to_section(
                &mut equity,
                BalanceSheetRow {
                    account_id: None,
                    code: None,
                    name_en: RETAINED_EARNINGS_EN.to_string(),
                    name_ar: RETAINED_EARNINGS_AR.to_string(),
                    balance: retained_earnings,
                    is_synthetic: true,
                },
            );
        }

        let total_assets = assets.total;
        let total_liabilities = liabilities.total;
        let total_equity = equity.total;
        let liabilities_and_equity = total_liabilities + total_equity;

        BalanceSheetReport {
            as_of,
            assets,
            liabilities,
            equity,
            retained_earnings,
            total_assets,
            total_liabilities,
            total_equity,
            liabilities_and_equity,
            is_balanced: within_tolerance(total_assets, liabilities_and_equity),
        }
    }

    fn sum_by_account(lines: &[PostedLine]) -> HashMap<Uuid, (Decimal, Decimal)> {
        let mut sums: HashMap<Uuid, (Decimal, Decimal)> = HashMap::new();
        for line in lines {
            let entry = sums.entry(line.account_id).or_default();
            entry.0 += line.debit;
            entry.1 += line.credit;
        }
        sums
    }

    fn subtotal(account_type: AccountType, rows: &[AccountBalanceRow]) -> TypeSubtotal {
        rows.iter().filter(|r| r.account_type == account_type).fold(
            TypeSubtotal {
                account_type,
                total_debit: Decimal::ZERO,
                total_credit: Decimal::ZERO,
                balance: Decimal::ZERO,
            },
            |mut acc, row| {
                acc.total_debit += row.total_debit;
                acc.total_credit += row.total_credit;
                acc.balance += row.balance;
                acc
            },
        )
    }

    fn add_to_section(section: &mut BalanceSheetSection, row: BalanceSheetRow) {
        section.total += row.balance;
        section.rows.push(row);
    }
}
