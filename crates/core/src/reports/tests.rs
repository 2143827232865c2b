//! Tests for the reports module.

use chrono::NaiveDate;
use proptest::prelude::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use uuid::Uuid;

use daftar_shared::types::{FiscalYearId, TenantId};

use super::service::ReportService;
use super::types::{PostedLine, ReportAccount, TrialBalanceOptions};
use crate::fiscal::FiscalYear;
use crate::ledger::types::AccountType;

fn as_of() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 6, 30).unwrap()
}

fn fy2026() -> FiscalYear {
    FiscalYear {
        id: FiscalYearId::new(),
        tenant_id: TenantId::new(),
        name: "FY2026".to_string(),
        start_date: NaiveDate::from_ymd_opt(2026, 1, 1).unwrap(),
        end_date: NaiveDate::from_ymd_opt(2026, 12, 31).unwrap(),
    }
}

fn account(code: &str, account_type: AccountType) -> ReportAccount {
    ReportAccount {
        id: Uuid::new_v4(),
        code: code.to_string(),
        name_en: format!("Account {code}"),
        name_ar: format!("حساب {code}"),
        account_type,
        is_header: false,
    }
}

fn dr(account: &ReportAccount, amount: Decimal) -> PostedLine {
    PostedLine {
        account_id: account.id,
        debit: amount,
        credit: Decimal::ZERO,
    }
}

fn cr(account: &ReportAccount, amount: Decimal) -> PostedLine {
    PostedLine {
        account_id: account.id,
        debit: Decimal::ZERO,
        credit: amount,
    }
}

struct Chart {
    cash: ReportAccount,
    payables: ReportAccount,
    capital: ReportAccount,
    sales: ReportAccount,
    rent: ReportAccount,
    idle: ReportAccount,
    header: ReportAccount,
}

impl Chart {
    fn new() -> Self {
        let mut header = account("1", AccountType::Asset);
        header.is_header = true;
        Self {
            cash: account("1101", AccountType::Asset),
            payables: account("2101", AccountType::Liability),
            capital: account("3101", AccountType::Equity),
            sales: account("4101", AccountType::Revenue),
            rent: account("5202", AccountType::Expense),
            idle: account("1104", AccountType::Asset),
            header,
        }
    }

    fn accounts(&self) -> Vec<ReportAccount> {
        vec![
            self.sales.clone(),
            self.cash.clone(),
            self.header.clone(),
            self.capital.clone(),
            self.rent.clone(),
            self.payables.clone(),
            self.idle.clone(),
        ]
    }

    /// Capital injection 10,000; cash sale 500; rent 1,200 on credit.
    fn lines(&self) -> Vec<PostedLine> {
        vec![
            dr(&self.cash, dec!(10000.00)),
            cr(&self.capital, dec!(10000.00)),
            dr(&self.cash, dec!(500.00)),
            cr(&self.sales, dec!(500.00)),
            dr(&self.rent, dec!(1200.00)),
            cr(&self.payables, dec!(1200.00)),
        ]
    }
}

#[test]
fn test_trial_balance_rows_and_totals() {
    let chart = Chart::new();
    let report = ReportService::trial_balance(
        &fy2026(),
        as_of(),
        &chart.accounts(),
        &chart.lines(),
        TrialBalanceOptions::default(),
    );

    let codes: Vec<_> = report.rows.iter().map(|r| r.code.as_str()).collect();
    assert_eq!(codes, ["1101", "2101", "3101", "4101", "5202"]);

    let cash = &report.rows[0];
    assert_eq!(cash.total_debit, dec!(10500.00));
    assert_eq!(cash.balance, dec!(10500.00));
    let payables = &report.rows[1];
    assert_eq!(payables.balance, dec!(1200.00));

    assert_eq!(report.totals.total_debit, dec!(11700.00));
    assert_eq!(report.totals.total_credit, dec!(11700.00));
    assert_eq!(report.totals.difference, Decimal::ZERO);
    assert!(report.totals.is_balanced);
    assert!(report.groups.is_none());
    assert_eq!(report.fiscal_year_name, "FY2026");
}

#[test]
fn test_trial_balance_include_zero_keeps_idle_leaf_but_not_header() {
    let chart = Chart::new();
    let options = TrialBalanceOptions {
        include_zero: true,
        group_by_type: false,
    };
    let report =
        ReportService::trial_balance(&fy2026(), as_of(), &chart.accounts(), &chart.lines(), options);

    assert_eq!(report.rows.len(), 6);
    assert!(report.rows.iter().any(|r| r.code == "1104" && r.balance.is_zero()));
    assert!(report.rows.iter().all(|r| r.code != "1"));
}

#[test]
fn test_trial_balance_keeps_account_with_offsetting_activity() {
    let chart = Chart::new();
    let lines = vec![
        dr(&chart.cash, dec!(100.00)),
        cr(&chart.sales, dec!(100.00)),
        dr(&chart.sales, dec!(100.00)),
        cr(&chart.cash, dec!(100.00)),
    ];
    let report = ReportService::trial_balance(
        &fy2026(),
        as_of(),
        &chart.accounts(),
        &lines,
        TrialBalanceOptions::default(),
    );
    assert_eq!(report.rows.len(), 2);
    assert!(report.rows.iter().all(|r| r.balance.is_zero()));
}

#[test]
fn test_trial_balance_grouping_and_subtotals() {
    let chart = Chart::new();
    let options = TrialBalanceOptions {
        include_zero: false,
        group_by_type: true,
    };
    let report =
        ReportService::trial_balance(&fy2026(), as_of(), &chart.accounts(), &chart.lines(), options);

    let groups = report.groups.as_ref().unwrap();
    assert_eq!(groups.len(), 5);
    assert_eq!(groups[0].account_type, AccountType::Asset);
    assert_eq!(groups[0].rows.len(), 1);
    assert_eq!(groups[0].subtotal.balance, dec!(10500.00));
    assert_eq!(report.subtotals[3].account_type, AccountType::Revenue);
    assert_eq!(report.subtotals[3].balance, dec!(500.00));
    assert_eq!(report.subtotals[4].balance, dec!(1200.00));
}

#[test]
fn test_balance_sheet_injects_retained_earnings() {
    let chart = Chart::new();
    let report = ReportService::balance_sheet(as_of(), &chart.accounts(), &chart.lines());

    assert_eq!(report.total_assets, dec!(10500.00));
    assert_eq!(report.total_liabilities, dec!(1200.00));
    // 500 revenue - 1,200 rent
    assert_eq!(report.retained_earnings, dec!(-700.00));
    assert_eq!(report.total_equity, dec!(9300.00));
    assert!(report.is_balanced);

    let synthetic = report.equity.rows.last().unwrap();
    assert!(synthetic.is_synthetic);
    assert_eq!(synthetic.account_id, None);
    assert_eq!(synthetic.balance, dec!(-700.00));
}

#[test]
fn test_balance_sheet_skips_zero_balances_and_headers() {
    let chart = Chart::new();
    let lines = vec![
        dr(&chart.cash, dec!(250.00)),
        cr(&chart.capital, dec!(250.00)),
        dr(&chart.idle, dec!(40.00)),
        cr(&chart.idle, dec!(40.00)),
    ];
    let report = ReportService::balance_sheet(as_of(), &chart.accounts(), &lines);

    assert_eq!(report.assets.rows.len(), 1);
    assert_eq!(report.equity.rows.len(), 1);
    assert!(report.equity.rows.iter().all(|r| !r.is_synthetic));
    assert_eq!(report.retained_earnings, Decimal::ZERO);
    assert!(report.is_balanced);
}

#[test]
fn test_empty_ledger_is_balanced() {
    let chart = Chart::new();
    let tb = ReportService::trial_balance(
        &fy2026(),
        as_of(),
        &chart.accounts(),
        &[],
        TrialBalanceOptions::default(),
    );
    assert!(tb.rows.is_empty());
    assert!(tb.totals.is_balanced);

    let bs = ReportService::balance_sheet(as_of(), &chart.accounts(), &[]);
    assert!(bs.is_balanced);
    assert_eq!(bs.total_assets, Decimal::ZERO);
}

/// Strategy to generate positive decimal amounts (0.01 to 10,000.00).
fn arb_amount() -> impl Strategy<Value = Decimal> {
    (1i64..1_000_000i64).prop_map(|cents| Decimal::new(cents, 2))
}

/// Random balanced entries over a five-account chart: (debit idx, credit idx, amount).
fn arb_entries() -> impl Strategy<Value = Vec<(usize, usize, Decimal)>> {
    prop::collection::vec((0usize..5, 0usize..5, arb_amount()), 0..30)
}

fn post(chart: &[ReportAccount], entries: &[(usize, usize, Decimal)]) -> Vec<PostedLine> {
    entries
        .iter()
        .flat_map(|(d, c, amount)| [dr(&chart[*d], *amount), cr(&chart[*c], *amount)])
        .collect()
}

fn five_accounts() -> Vec<ReportAccount> {
    vec![
        account("1101", AccountType::Asset),
        account("2101", AccountType::Liability),
        account("3101", AccountType::Equity),
        account("4101", AccountType::Revenue),
        account("5201", AccountType::Expense),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Balanced entries always produce a balanced trial balance.
    #[test]
    fn prop_trial_balance_debits_equal_credits(entries in arb_entries()) {
        let chart = five_accounts();
        let lines = post(&chart, &entries);
        let options = TrialBalanceOptions { include_zero: true, group_by_type: true };

        let report = ReportService::trial_balance(&fy2026(), as_of(), &chart, &lines, options);

        prop_assert!(report.totals.is_balanced);
        prop_assert_eq!(report.totals.total_debit, report.totals.total_credit);
        let subtotal_debit: Decimal = report.subtotals.iter().map(|s| s.total_debit).sum();
        prop_assert_eq!(subtotal_debit, report.totals.total_debit);
    }

    /// Assets = Liabilities + Equity once retained earnings is injected.
    #[test]
    fn prop_balance_sheet_equation(entries in arb_entries()) {
        let chart = five_accounts();
        let lines = post(&chart, &entries);

        let report = ReportService::balance_sheet(as_of(), &chart, &lines);

        prop_assert!(report.is_balanced);
        prop_assert_eq!(report.total_assets, report.liabilities_and_equity);
    }
}
