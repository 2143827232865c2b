//! Account balance sign convention.
//!
//! This is the single place that decides how a debit or credit moves an
//! account's balance. Posting, reversal and both reports go through it.
//!
//! - Asset/Expense: delta = debit - credit (debit-normal)
//! - Liability/Equity/Revenue: delta = credit - debit (credit-normal)

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use uuid::Uuid;

use super::types::{AccountDelta, AccountType, NormalBalance};

/// Signed change to an account's balance for a debit/credit pair.
#[must_use]
pub fn balance_delta(account_type: AccountType, debit: Decimal, credit: Decimal) -> Decimal {
    match account_type.normal_balance() {
        NormalBalance::Debit => debit - credit,
        NormalBalance::Credit => credit - debit,
    }
}

/// Groups per-line deltas by account.
///
/// Output is sorted by account ID so that row locks taken while applying the
/// deltas are always acquired in the same order. Accounts whose net delta is
/// zero are dropped.
pub fn aggregate_deltas<I>(lines: I) -> Vec<AccountDelta>
where
    I: IntoIterator<Item = (Uuid, AccountType, Decimal, Decimal)>,
{
    let mut by_account: BTreeMap<Uuid, Decimal> = BTreeMap::new();
    for (account_id, account_type, debit, credit) in lines {
        *by_account.entry(account_id).or_insert(Decimal::ZERO) +=
            balance_delta(account_type, debit, credit);
    }

    by_account
        .into_iter()
        .filter(|(_, delta)| !delta.is_zero())
        .map(|(account_id, delta)| AccountDelta { account_id, delta })
        .collect()
}
