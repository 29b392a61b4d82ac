//! Property tests for balance reconciliation.
//!
//! Models an account as `initial_balance` plus a history of live entries and
//! checks that applying reconciliation deltas keeps the stored balance equal
//! to the balance recomputed from history, across arbitrary create/update/
//! delete sequences.

use proptest::prelude::*;
use rust_decimal::Decimal;

use super::reconcile::ReconciliationService;
use super::types::{EntryKind, EntrySnapshot};
use ledgerline_shared::types::AccountId;

/// A minimal in-memory account: stored balance plus live entry history.
struct ModelAccount {
    id: AccountId,
    initial_balance: Decimal,
    stored_balance: Decimal,
    live_entries: Vec<EntrySnapshot>,
}

impl ModelAccount {
    fn new(initial_balance: Decimal) -> Self {
        Self {
            id: AccountId::new(),
            initial_balance,
            stored_balance: initial_balance,
            live_entries: Vec::new(),
        }
    }

    fn apply(&mut self, delta: Decimal) {
        self.stored_balance += delta;
    }

    /// The balance derived from history: initial + signed sum of live entries.
    fn derived_balance(&self) -> Decimal {
        self.initial_balance
            + self
                .live_entries
                .iter()
                .map(EntrySnapshot::signed_effect)
                .sum::<Decimal>()
    }
}

fn amount_strategy() -> impl Strategy<Value = Decimal> {
    // Positive amounts with two decimal places, like real money input.
    (1i64..10_000_000i64).prop_map(|n| Decimal::new(n, 2))
}

fn kind_strategy() -> impl Strategy<Value = EntryKind> {
    prop_oneof![Just(EntryKind::Debit), Just(EntryKind::Credit)]
}

/// One step of a randomized mutation sequence.
#[derive(Debug, Clone)]
enum Op {
    Create { kind: EntryKind, amount: Decimal },
    Update { index: usize, kind: EntryKind, amount: Decimal },
    Delete { index: usize },
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        (kind_strategy(), amount_strategy()).prop_map(|(kind, amount)| Op::Create { kind, amount }),
        (any::<usize>(), kind_strategy(), amount_strategy())
            .prop_map(|(index, kind, amount)| Op::Update { index, kind, amount }),
        any::<usize>().prop_map(|index| Op::Delete { index }),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// After any sequence of create/update/delete operations, the stored
    /// balance equals initial + signed sum of live entries.
    #[test]
    fn prop_stored_balance_matches_history(
        initial in (-1_000_000i64..1_000_000i64).prop_map(|n| Decimal::new(n, 2)),
        ops in prop::collection::vec(op_strategy(), 1..40),
    ) {
        let mut account = ModelAccount::new(initial);

        for op in ops {
            match op {
                Op::Create { kind, amount } => {
                    let entry = EntrySnapshot { account_id: account.id, kind, amount };
                    let delta = ReconciliationService::creation_delta(&entry);
                    account.apply(delta.delta);
                    account.live_entries.push(entry);
                }
                Op::Update { index, kind, amount } => {
                    if account.live_entries.is_empty() {
                        continue;
                    }
                    let index = index % account.live_entries.len();
                    let old = account.live_entries[index];
                    let new = EntrySnapshot { account_id: account.id, kind, amount };
                    let plan = ReconciliationService::update_plan(&old, &new);
                    for delta in &plan.deltas {
                        prop_assert_eq!(delta.account_id, account.id);
                        account.apply(delta.delta);
                    }
                    account.live_entries[index] = new;
                }
                Op::Delete { index } => {
                    if account.live_entries.is_empty() {
                        continue;
                    }
                    let index = index % account.live_entries.len();
                    let entry = account.live_entries.remove(index);
                    let delta = ReconciliationService::deletion_delta(&entry);
                    account.apply(delta.delta);
                }
            }

            prop_assert_eq!(
                account.stored_balance,
                account.derived_balance(),
                "stored balance must track the live entry history"
            );
        }
    }

    /// Updating an entry's amount from A to B (same kind, same account)
    /// changes the balance by exactly the signed difference.
    #[test]
    fn prop_update_shifts_balance_by_difference(
        kind in kind_strategy(),
        a in amount_strategy(),
        b in amount_strategy(),
    ) {
        let account_id = AccountId::new();
        let old = EntrySnapshot { account_id, kind, amount: a };
        let new = EntrySnapshot { account_id, kind, amount: b };

        let plan = ReconciliationService::update_plan(&old, &new);
        prop_assert_eq!(plan.deltas.len(), 1);
        prop_assert_eq!(plan.net_effect(), kind.signed_effect(b) - kind.signed_effect(a));
    }

    /// Delete exactly reverses the original effect, regardless of kind.
    #[test]
    fn prop_delete_reverses_create(
        kind in kind_strategy(),
        amount in amount_strategy(),
    ) {
        let entry = EntrySnapshot { account_id: AccountId::new(), kind, amount };
        let create = ReconciliationService::creation_delta(&entry);
        let delete = ReconciliationService::deletion_delta(&entry);
        prop_assert_eq!(create.delta + delete.delta, Decimal::ZERO);
    }

    /// Moving an entry between accounts conserves total money: the amount
    /// removed from the old account equals the old effect, and the amount
    /// added to the new account equals the new effect.
    #[test]
    fn prop_cross_account_update_conserves_effects(
        kind in kind_strategy(),
        a in amount_strategy(),
        b in amount_strategy(),
    ) {
        let old_account = AccountId::new();
        let new_account = AccountId::new();
        let old = EntrySnapshot { account_id: old_account, kind, amount: a };
        let new = EntrySnapshot { account_id: new_account, kind, amount: b };

        let plan = ReconciliationService::update_plan(&old, &new);
        prop_assert_eq!(plan.deltas.len(), 2);

        let old_delta = plan.deltas.iter().find(|d| d.account_id == old_account).unwrap();
        let new_delta = plan.deltas.iter().find(|d| d.account_id == new_account).unwrap();
        prop_assert_eq!(old_delta.delta, -kind.signed_effect(a));
        prop_assert_eq!(new_delta.delta, kind.signed_effect(b));
    }
}
