//! Ledger service for journal entry validation and posting plans.
//!
//! This module decides *what* a post or reversal must change. The
//! persistence layer loads the entry and its accounts, asks the service for a
//! plan, then applies the plan inside a single transaction.

use rust_decimal::Decimal;
use uuid::Uuid;

use super::balance::aggregate_deltas;
use super::error::LedgerError;
use super::reversal::{reversal_description, reverse_lines};
use super::types::{AccountDelta, EntryStatus, JournalLineInput, JournalTotals, LineAccount};
use super::validation::{
    ensure_postable, ensure_reversible, validate_line_account, validate_lines,
};

/// Balance changes required to post a draft.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostingPlan {
    /// Entry totals (balanced).
    pub totals: JournalTotals,
    /// Per-account balance increments, sorted by account ID.
    pub deltas: Vec<AccountDelta>,
}

/// The posted entry being reversed.
#[derive(Debug, Clone)]
pub struct ReversibleEntry {
    /// Entry ID.
    pub id: Uuid,
    /// Entry number, quoted in the reversal's description.
    pub entry_number: String,
    /// Original description.
    pub description: Option<String>,
    /// Current status.
    pub status: EntryStatus,
    /// Set once the entry has been reversed.
    pub reversed_by: Option<Uuid>,
    /// Stored total debit.
    pub total_debit: Decimal,
    /// Stored total credit.
    pub total_credit: Decimal,
}

/// Everything needed to write a reversing entry.
#[derive(Debug, Clone)]
pub struct ReversalPlan {
    /// Description for the new entry.
    pub description: String,
    /// Mirrored lines, in original order.
    pub lines: Vec<JournalLineInput>,
    /// The original's total credit.
    pub total_debit: Decimal,
    /// The original's total debit.
    pub total_credit: Decimal,
    /// Per-account balance increments, sorted by account ID.
    pub deltas: Vec<AccountDelta>,
}

/// Ledger service for journal entry validation and planning.
///
/// Pure business logic; accounts are supplied through a lookup function that
/// must report accounts outside the tenant as `AccountNotFound`.
pub struct LedgerService;

impl LedgerService {
    /// Validates lines for a new draft.
    ///
    /// Drafts may reference inactive accounts; that is only checked on post.
    ///
    /// # Errors
    ///
    /// Returns `LedgerError` for malformed lines, unknown or header accounts.
    pub fn validate_draft<A>(
        lines: &[JournalLineInput],
        account_lookup: A,
    ) -> Result<JournalTotals, LedgerError>
    where
        A: Fn(Uuid) -> Result<LineAccount, LedgerError>,
    {
        let totals = validate_lines(lines)?;
        for line in lines {
            let account = account_lookup(line.account_id)?;
            validate_line_account(&account, false)?;
        }
        Ok(totals)
    }

    /// Plans the posting of a draft.
    ///
    /// Checks run in this order: status, line shape, then every referenced
    /// account (leaf and active). Nothing is planned unless every check passes.
    ///
    /// # Errors
    ///
    /// Returns `NotDraft`, a line validation error, `AccountNotFound`,
    /// `HeaderAccount` or `AccountInactive`.
    pub fn plan_posting<A>(
        status: EntryStatus,
        lines: &[JournalLineInput],
        account_lookup: A,
    ) -> Result<PostingPlan, LedgerError>
    where
        A: Fn(Uuid) -> Result<LineAccount, LedgerError>,
    {
        ensure_postable(status)?;
        let totals = validate_lines(lines)?;

        let mut typed = Vec::with_capacity(lines.len());
        for line in lines {
            let account = account_lookup(line.account_id)?;
            validate_line_account(&account, true)?;
            typed.push((line.account_id, account.account_type, line.debit, line.credit));
        }

        Ok(PostingPlan {
            totals,
            deltas: aggregate_deltas(typed),
        })
    }

    /// Plans the reversal of a posted entry.
    ///
    /// Accounts are only needed for their type here; a reversal is allowed
    /// even if an account was deactivated after the original was posted.
    ///
    /// # Errors
    ///
    /// Returns `NotPosted`, `AlreadyReversed` or `AccountNotFound`.
    pub fn plan_reversal<A>(
        entry: &ReversibleEntry,
        lines: &[JournalLineInput],
        account_lookup: A,
    ) -> Result<ReversalPlan, LedgerError>
    where
        A: Fn(Uuid) -> Result<LineAccount, LedgerError>,
    {
        ensure_reversible(entry.id, entry.status, entry.reversed_by)?;

        let mirrored = reverse_lines(lines);
        let mut typed = Vec::with_capacity(mirrored.len());
        for line in &mirrored {
            let account = account_lookup(line.account_id)?;
            typed.push((line.account_id, account.account_type, line.debit, line.credit));
        }

        Ok(ReversalPlan {
            description: reversal_description(&entry.entry_number, entry.description.as_deref()),
            lines: mirrored,
            total_debit: entry.total_credit,
            total_credit: entry.total_debit,
            deltas: aggregate_deltas(typed),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::types::AccountType;
    use rust_decimal_macros::dec;
    use std::collections::HashMap;

    struct Chart {
        accounts: HashMap<Uuid, LineAccount>,
    }

    impl Chart {
        fn new() -> Self {
            Self {
                accounts: HashMap::new(),
            }
        }

        fn add(&mut self, account_type: AccountType, is_header: bool, is_active: bool) -> Uuid {
            let id = Uuid::new_v4();
            self.accounts.insert(
                id,
                LineAccount {
                    id,
                    account_type,
                    is_header,
                    is_active,
                },
            );
            id
        }

        fn lookup(&self) -> impl Fn(Uuid) -> Result<LineAccount, LedgerError> + '_ {
            |id| {
                self.accounts
                    .get(&id)
                    .copied()
                    .ok_or(LedgerError::AccountNotFound(id))
            }
        }
    }

    fn sale(cash: Uuid, revenue: Uuid) -> Vec<JournalLineInput> {
        vec![
            JournalLineInput::debit(cash, dec!(500.00)),
            JournalLineInput::credit(revenue, dec!(500.00)),
        ]
    }

    #[test]
    fn test_plan_posting_applies_sign_convention() {
        let mut chart = Chart::new();
        let cash = chart.add(AccountType::Asset, false, true);
        let revenue = chart.add(AccountType::Revenue, false, true);

        let plan = LedgerService::plan_posting(EntryStatus::Draft, &sale(cash, revenue), chart.lookup())
            .unwrap();

        assert_eq!(plan.totals.total_debit, dec!(500.00));
        let deltas: HashMap<_, _> = plan.deltas.iter().map(|d| (d.account_id, d.delta)).collect();
        assert_eq!(deltas[&cash], dec!(500.00));
        assert_eq!(deltas[&revenue], dec!(500.00));
    }

    #[test]
    fn test_plan_posting_rejects_posted_before_anything_else() {
        let chart = Chart::new();
        let lines = sale(Uuid::new_v4(), Uuid::new_v4());
        assert!(matches!(
            LedgerService::plan_posting(EntryStatus::Posted, &lines, chart.lookup()),
            Err(LedgerError::NotDraft)
        ));
    }

    #[test]
    fn test_plan_posting_rejects_inactive_account() {
        let mut chart = Chart::new();
        let cash = chart.add(AccountType::Asset, false, true);
        let revenue = chart.add(AccountType::Revenue, false, false);

        let result = LedgerService::plan_posting(EntryStatus::Draft, &sale(cash, revenue), chart.lookup());
        assert!(matches!(result, Err(LedgerError::AccountInactive(id)) if id == revenue));
    }

    #[test]
    fn test_plan_posting_rejects_unknown_account() {
        let mut chart = Chart::new();
        let cash = chart.add(AccountType::Asset, false, true);
        let stranger = Uuid::new_v4();

        let result = LedgerService::plan_posting(EntryStatus::Draft, &sale(cash, stranger), chart.lookup());
        assert!(matches!(result, Err(LedgerError::AccountNotFound(id)) if id == stranger));
    }

    #[test]
    fn test_validate_draft_allows_inactive_but_not_header() {
        let mut chart = Chart::new();
        let cash = chart.add(AccountType::Asset, false, false);
        let revenue = chart.add(AccountType::Revenue, false, true);
        assert!(LedgerService::validate_draft(&sale(cash, revenue), chart.lookup()).is_ok());

        let header = chart.add(AccountType::Revenue, true, true);
        assert!(matches!(
            LedgerService::validate_draft(&sale(cash, header), chart.lookup()),
            Err(LedgerError::HeaderAccount(_))
        ));
    }

    #[test]
    fn test_plan_reversal_swaps_totals_and_negates_deltas() {
        let mut chart = Chart::new();
        let cash = chart.add(AccountType::Asset, false, true);
        let revenue = chart.add(AccountType::Revenue, false, true);
        let lines = sale(cash, revenue);

        let posting = LedgerService::plan_posting(EntryStatus::Draft, &lines, chart.lookup()).unwrap();
        let entry = ReversibleEntry {
            id: Uuid::new_v4(),
            entry_number: "JE-000001".to_string(),
            description: Some("Cash sale".to_string()),
            status: EntryStatus::Posted,
            reversed_by: None,
            total_debit: dec!(500.00),
            total_credit: dec!(500.00),
        };
        let reversal = LedgerService::plan_reversal(&entry, &lines, chart.lookup()).unwrap();

        assert_eq!(reversal.description, "Reversal of JE-000001: Cash sale");
        assert_eq!(reversal.lines[0].credit, dec!(500.00));
        for (post, rev) in posting.deltas.iter().zip(&reversal.deltas) {
            assert_eq!(post.account_id, rev.account_id);
            assert_eq!(post.delta, -rev.delta);
        }
    }

    #[test]
    fn test_plan_reversal_rejects_already_reversed() {
        let chart = Chart::new();
        let entry = ReversibleEntry {
            id: Uuid::new_v4(),
            entry_number: "JE-000001".to_string(),
            description: None,
            status: EntryStatus::Posted,
            reversed_by: Some(Uuid::new_v4()),
            total_debit: dec!(1.00),
            total_credit: dec!(1.00),
        };
        assert!(matches!(
            LedgerService::plan_reversal(&entry, &[], chart.lookup()),
            Err(LedgerError::AlreadyReversed(_))
        ));
    }
}
