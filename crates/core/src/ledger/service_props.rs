//! Property-based tests for `LedgerService`.
//!
//! - Posting then reversing nets every account to zero.
//! - Posting plans never change the accounting equation.

use std::collections::HashMap;

use proptest::prelude::*;
use rust_decimal::Decimal;
use uuid::Uuid;

use super::error::LedgerError;
use super::service::{LedgerService, ReversibleEntry};
use super::types::{AccountType, EntryStatus, JournalLineInput, LineAccount, NormalBalance};

/// Strategy to generate positive decimal amounts (0.01 to 10,000.00).
fn positive_amount() -> impl Strategy<Value = Decimal> {
    (1i64..1_000_000i64).prop_map(|cents| Decimal::new(cents, 2))
}

fn account_type_strategy() -> impl Strategy<Value = AccountType> {
    prop::sample::select(AccountType::ALL.to_vec())
}

/// A balanced entry over a small chart: each pair is (debit type, credit type, amount).
fn entry_strategy() -> impl Strategy<Value = Vec<(AccountType, AccountType, Decimal)>> {
    prop::collection::vec(
        (account_type_strategy(), account_type_strategy(), positive_amount()),
        1..6,
    )
}

fn build(
    pairs: &[(AccountType, AccountType, Decimal)],
) -> (HashMap<Uuid, LineAccount>, Vec<JournalLineInput>) {
    let mut accounts = HashMap::new();
    let mut lines = Vec::new();
    for (dr_type, cr_type, amount) in pairs {
        for (account_type, is_debit) in [(*dr_type, true), (*cr_type, false)] {
            let id = Uuid::new_v4();
            accounts.insert(
                id,
                LineAccount {
                    id,
                    account_type,
                    is_header: false,
                    is_active: true,
                },
            );
            lines.push(if is_debit {
                JournalLineInput::debit(id, *amount)
            } else {
                JournalLineInput::credit(id, *amount)
            });
        }
    }
    (accounts, lines)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    #[test]
    fn prop_post_then_reverse_nets_to_zero(pairs in entry_strategy()) {
        let (accounts, lines) = build(&pairs);
        let lookup = |id: Uuid| accounts.get(&id).copied().ok_or(LedgerError::AccountNotFound(id));

        let posting = LedgerService::plan_posting(EntryStatus::Draft, &lines, lookup).unwrap();
        let entry = ReversibleEntry {
            id: Uuid::new_v4(),
            entry_number: "JE-000001".to_string(),
            description: None,
            status: EntryStatus::Posted,
            reversed_by: None,
            total_debit: posting.totals.total_debit,
            total_credit: posting.totals.total_credit,
        };
        let reversal = LedgerService::plan_reversal(&entry, &lines, lookup).unwrap();

        let mut net: HashMap<Uuid, Decimal> = HashMap::new();
        for d in posting.deltas.iter().chain(&reversal.deltas) {
            *net.entry(d.account_id).or_default() += d.delta;
        }
        prop_assert!(net.values().all(Decimal::is_zero));
        prop_assert_eq!(reversal.total_debit, posting.totals.total_credit);
    }

    #[test]
    fn prop_posting_preserves_accounting_equation(pairs in entry_strategy()) {
        let (accounts, lines) = build(&pairs);
        let lookup = |id: Uuid| accounts.get(&id).copied().ok_or(LedgerError::AccountNotFound(id));

        let plan = LedgerService::plan_posting(EntryStatus::Draft, &lines, lookup).unwrap();

        let mut debit_side = Decimal::ZERO;
        let mut credit_side = Decimal::ZERO;
        for d in &plan.deltas {
            match accounts[&d.account_id].account_type.normal_balance() {
                NormalBalance::Debit => debit_side += d.delta,
                NormalBalance::Credit => credit_side += d.delta,
            }
        }
        prop_assert_eq!(debit_side, credit_side);
    }

    #[test]
    fn prop_any_inactive_account_blocks_posting(
        pairs in entry_strategy(),
        pick in any::<prop::sample::Index>(),
    ) {
        let (mut accounts, lines) = build(&pairs);
        let victim = lines[pick.index(lines.len())].account_id;
        if let Some(account) = accounts.get_mut(&victim) {
            account.is_active = false;
        }
        let lookup = |id: Uuid| accounts.get(&id).copied().ok_or(LedgerError::AccountNotFound(id));

        let blocked = matches!(
            LedgerService::plan_posting(EntryStatus::Draft, &lines, lookup),
            Err(LedgerError::AccountInactive(id)) if id == victim
        );
        prop_assert!(blocked);
    }
}
