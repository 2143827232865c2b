//! Chart of accounts tree assembly.

use std::collections::{HashMap, HashSet};

use serde::Serialize;
use uuid::Uuid;

use super::ChartAccount;

/// An account with its children, ordered by code.
#[derive(Debug, Clone, Serialize)]
pub struct AccountTreeNode {
    /// The account itself.
    #[serde(flatten)]
    pub account: ChartAccount,
    /// Direct children.
    pub children: Vec<AccountTreeNode>,
}

/// Assembles a flat account list into a forest.
///
/// Accounts without a parent, or whose parent is not in the list, become
/// roots. Siblings are ordered by code at every level.
///
/// `create_account` only attaches to existing headers, so parent links never
/// form a cycle. Should stored data contain one anyway, it is cut at its
/// lowest code, which becomes a root; no account is ever dropped.
#[must_use]
pub fn build_tree(mut accounts: Vec<ChartAccount>) -> Vec<AccountTreeNode> {
    accounts.sort_by(|a, b| a.code.cmp(&b.code));

    let known: HashSet<Uuid> = accounts.iter().map(|a| a.id).collect();
    let mut children_of: HashMap<Uuid, Vec<ChartAccount>> = HashMap::new();
    let mut roots = Vec::new();

    for account in accounts {
        match account.parent_id {
            Some(parent) if known.contains(&parent) && parent != account.id => {
                children_of.entry(parent).or_default().push(account);
            }
            _ => roots.push(account),
        }
    }

    let mut forest: Vec<AccountTreeNode> = roots
        .into_iter()
        .map(|account| attach(account, &mut children_of))
        .collect();

    // Anything left hangs off a parent cycle.
    while let Some(account) = take_lowest_stranded(&mut children_of) {
        forest.push(attach(account, &mut children_of));
    }
    forest.sort_by(|a, b| a.account.code.cmp(&b.account.code));
    forest
}

fn take_lowest_stranded(children_of: &mut HashMap<Uuid, Vec<ChartAccount>>) -> Option<ChartAccount> {
    let (parent, idx) = children_of
        .iter()
        .flat_map(|(parent, kids)| {
            kids.iter()
                .enumerate()
                .map(move |(idx, kid)| (*parent, idx, kid.code.as_str()))
        })
        .min_by(|a, b| a.2.cmp(b.2))
        .map(|(parent, idx, _)| (parent, idx))?;

    let siblings = children_of.get_mut(&parent)?;
    let account = siblings.remove(idx);
    if siblings.is_empty() {
        children_of.remove(&parent);
    }
    Some(account)
}

fn attach(account: ChartAccount, children_of: &mut HashMap<Uuid, Vec<ChartAccount>>) -> AccountTreeNode {
    let children = children_of
        .remove(&account.id)
        .unwrap_or_default()
        .into_iter()
        .map(|child| attach(child, children_of))
        .collect();
    AccountTreeNode { account, children }
}
