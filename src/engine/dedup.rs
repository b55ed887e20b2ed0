use std::collections::HashSet;

use crate::models::Transaction;

/// Width of the duplicate window applied between two event times.
pub const DEFAULT_WINDOW_MS: i64 = 60_000;

/// How far back the pre-submit guard looks, relative to server time.
pub const PRESUBMIT_LOOKBACK_MS: i64 = 120_000;

/// How candidates are matched into a duplicate group during a scan.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum GroupingStrategy {
    /// Every candidate is compared against the group's founding transaction
    /// only. A chain A-B-C where only A-B and B-C are within the window
    /// therefore splits: B joins A's group, C stays out. Not a transitive
    /// closure, but deterministic, and the behavior existing data was cleaned
    /// under.
    #[default]
    Anchored,
    /// Matches chain through every accepted member, producing a true
    /// transitive closure. Groups can span more than one window width.
    TransitiveClosure,
}

/// Two or more transactions judged to record the same real-world event.
///
/// Ephemeral: groups are computed fresh on every scan and never persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct DuplicateGroup {
    members: Vec<Transaction>,
}

impl DuplicateGroup {
    pub(crate) fn new(members: Vec<Transaction>) -> Self {
        debug_assert!(members.len() > 1, "a duplicate group has at least two members");
        Self { members }
    }

    pub fn members(&self) -> &[Transaction] {
        &self.members
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// The member to keep: earliest by event date. Ties keep the member that
    /// sorted first, so the choice is stable across runs.
    pub fn canonical(&self) -> &Transaction {
        self.members
            .iter()
            .reduce(|keep, candidate| if candidate.date < keep.date { candidate } else { keep })
            .expect("a duplicate group has at least two members")
    }

    /// Every member except the canonical one.
    pub fn removable(&self) -> impl Iterator<Item = &Transaction> {
        let keep = self.canonical().id.clone();
        self.members.iter().filter(move |member| member.id != keep)
    }
}

/// Returns true iff `a` and `b` record the same gas type, quantity, and
/// payment method, and their event times fall within `window_ms` of each
/// other.
///
/// String fields are compared exactly, with no case folding or whitespace
/// normalization, matching how the persisted data was written.
pub fn is_duplicate_pair(a: &Transaction, b: &Transaction, window_ms: i64) -> bool {
    a.gas_type == b.gas_type
        && a.kgs == b.kgs
        && a.payment_method == b.payment_method
        && a.millis_from(b) <= window_ms
}

/// Partitions `transactions` into duplicate groups.
///
/// Transactions are visited in stable date-ascending order; each unvisited
/// transaction founds a group and claims every later unvisited match. The
/// quadratic scan is fine at retail volumes (a few thousand records at most).
pub fn find_duplicate_groups(
    transactions: &[Transaction],
    window_ms: i64,
    strategy: GroupingStrategy,
) -> Vec<DuplicateGroup> {
    let mut sorted: Vec<&Transaction> = transactions.iter().collect();
    sorted.sort_by_key(|transaction| transaction.date);

    let mut visited: HashSet<&str> = HashSet::with_capacity(sorted.len());
    let mut groups = Vec::new();

    for anchor in &sorted {
        if !visited.insert(anchor.id.as_str()) {
            continue;
        }

        let mut members = vec![(*anchor).clone()];

        match strategy {
            GroupingStrategy::Anchored => {
                for candidate in &sorted {
                    if visited.contains(candidate.id.as_str()) {
                        continue;
                    }
                    if is_duplicate_pair(anchor, candidate, window_ms) {
                        visited.insert(candidate.id.as_str());
                        members.push((*candidate).clone());
                    }
                }
            }
            GroupingStrategy::TransitiveClosure => {
                let mut cursor = 0;
                while cursor < members.len() {
                    let probe = members[cursor].clone();
                    for candidate in &sorted {
                        if visited.contains(candidate.id.as_str()) {
                            continue;
                        }
                        if is_duplicate_pair(&probe, candidate, window_ms) {
                            visited.insert(candidate.id.as_str());
                            members.push((*candidate).clone());
                        }
                    }
                    cursor += 1;
                }
            }
        }

        if members.len() > 1 {
            groups.push(DuplicateGroup::new(members));
        }
    }

    groups
}

/// Non-destructive deduplication: returns the input with every non-canonical
/// group member removed.
///
/// Survivors keep the caller's original ordering, not the internal
/// date-ascending sort. Idempotent as long as no new transaction is inserted
/// between calls: once the losers are gone, no remaining pair can match.
pub fn filter_duplicates(
    transactions: &[Transaction],
    window_ms: i64,
    strategy: GroupingStrategy,
) -> Vec<Transaction> {
    let groups = find_duplicate_groups(transactions, window_ms, strategy);

    let removable: HashSet<String> = groups
        .iter()
        .flat_map(|group| group.removable().map(|loser| loser.id.clone()))
        .collect();

    transactions
        .iter()
        .filter(|transaction| !removable.contains(&transaction.id))
        .cloned()
        .collect()
}
