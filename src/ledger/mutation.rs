//! Changes to existing transactions, restricted to the transaction's owner.

use serde::Serialize;

use crate::{
    Error,
    models::{Transaction, TransactionForm, TransactionID, UserID},
    stores::TransactionStore,
};

/// A change a user asks to make to one of their transactions.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Mutation {
    /// Replace every editable field, with the date given as "DD-MM-YYYY".
    Edit(TransactionForm),
    /// Remove the transaction.
    Delete,
}

/// The result of a successful [Mutation].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum MutationOutcome {
    /// The transaction as it is stored after the edit.
    Edited(Transaction),
    /// The ID of the transaction that was removed.
    Deleted {
        /// The ID of the removed transaction.
        id: TransactionID,
    },
}

/// Apply `mutation` to the transaction `transaction_id` on behalf of
/// `requesting_user_id`.
///
/// Ownership is checked before the edit fields are parsed, so a user cannot
/// learn anything about another user's transaction from validation errors.
/// A failed mutation leaves the transaction unchanged.
///
/// # Errors
/// This function will return a:
/// - [Error::NotFound] if `transaction_id` does not refer to a transaction,
/// - [Error::Unauthorized] if the transaction belongs to someone else,
/// - [Error::ValidationError] if an edit has a field that fails to parse,
/// - or an error from the store.
pub fn apply_mutation<T>(
    transaction_store: &mut T,
    transaction_id: TransactionID,
    requesting_user_id: UserID,
    mutation: Mutation,
) -> Result<MutationOutcome, Error>
where
    T: TransactionStore,
{
    let transaction = transaction_store.get(transaction_id)?;

    if transaction.user_id != requesting_user_id {
        tracing::warn!(
            "user {requesting_user_id} tried to modify transaction {transaction_id} owned by user {}",
            transaction.user_id
        );
        return Err(Error::Unauthorized);
    }

    match mutation {
        Mutation::Edit(form) => {
            let fields = form.parse_edit()?;
            let edited = transaction_store.update(transaction_id, &fields)?;
            tracing::info!("user {requesting_user_id} edited transaction {transaction_id}");

            Ok(MutationOutcome::Edited(edited))
        }
        Mutation::Delete => {
            transaction_store.delete(transaction_id)?;
            tracing::info!("user {requesting_user_id} deleted transaction {transaction_id}");

            Ok(MutationOutcome::Deleted { id: transaction_id })
        }
    }
}

#[cfg(test)]
mod tests {
    use time::macros::date;

    use crate::{
        Error,
        ledger::{Mutation, MutationOutcome, test_utils::LedgerFixture},
        models::{TransactionForm, TransactionType, UserID},
    };

    fn edit_form(date: &str) -> TransactionForm {
        TransactionForm {
            title: "Weekly shop".to_owned(),
            amount: "82.40".to_owned(),
            transaction_type: "Expense".to_owned(),
            category: " Groceries ".to_owned(),
            date: date.to_owned(),
        }
    }

    #[test]
    fn owner_can_edit_transaction() {
        let mut fixture = LedgerFixture::new();
        let alice = fixture.user("alice");
        let original = fixture.add(
            alice,
            TransactionType::Income,
            10.0,
            date!(2024 - 01 - 01),
            "Misc",
        );

        let got = fixture
            .ledger
            .apply_mutation(original.id, alice, Mutation::Edit(edit_form("15-02-2024")))
            .unwrap();

        let MutationOutcome::Edited(edited) = got else {
            panic!("want an edited outcome, got {got:?}");
        };
        assert_eq!(edited.id, original.id);
        assert_eq!(edited.user_id, alice);
        assert_eq!(edited.title, "Weekly shop");
        assert_eq!(edited.amount, 82.4);
        assert_eq!(edited.transaction_type, TransactionType::Expense);
        assert_eq!(edited.category, "Groceries");
        assert_eq!(edited.date, date!(2024 - 02 - 15));
        assert_eq!(fixture.get(original.id), Ok(edited));
    }

    #[test]
    fn non_owner_cannot_edit_transaction() {
        let mut fixture = LedgerFixture::new();
        let alice = fixture.user("alice");
        let bob = fixture.user("bob");
        let original = fixture.add(
            alice,
            TransactionType::Income,
            10.0,
            date!(2024 - 01 - 01),
            "Misc",
        );

        let got = fixture
            .ledger
            .apply_mutation(original.id, bob, Mutation::Edit(edit_form("15-02-2024")));

        assert_eq!(got, Err(Error::Unauthorized));
        assert_eq!(fixture.get(original.id), Ok(original));
    }

    #[test]
    fn non_owner_cannot_delete_transaction() {
        let mut fixture = LedgerFixture::new();
        let alice = fixture.user("alice");
        let bob = fixture.user("bob");
        let original = fixture.add(
            alice,
            TransactionType::Expense,
            3.5,
            date!(2024 - 01 - 01),
            "Coffee",
        );

        let got = fixture.ledger.apply_mutation(original.id, bob, Mutation::Delete);

        assert_eq!(got, Err(Error::Unauthorized));
        assert_eq!(fixture.get(original.id), Ok(original));
    }

    #[test]
    fn ownership_is_checked_before_fields() {
        let mut fixture = LedgerFixture::new();
        let alice = fixture.user("alice");
        let bob = fixture.user("bob");
        let original = fixture.add(
            alice,
            TransactionType::Expense,
            3.5,
            date!(2024 - 01 - 01),
            "Coffee",
        );

        let got = fixture
            .ledger
            .apply_mutation(original.id, bob, Mutation::Edit(edit_form("not a date")));

        assert_eq!(got, Err(Error::Unauthorized));
    }

    #[test]
    fn edit_with_bad_date_changes_nothing() {
        let mut fixture = LedgerFixture::new();
        let alice = fixture.user("alice");
        let original = fixture.add(
            alice,
            TransactionType::Expense,
            3.5,
            date!(2024 - 01 - 01),
            "Coffee",
        );

        for bad_date in ["2024-02-15", "31-02-2024", ""] {
            let got = fixture
                .ledger
                .apply_mutation(original.id, alice, Mutation::Edit(edit_form(bad_date)));

            assert!(
                matches!(got, Err(Error::ValidationError { field: "date", .. })),
                "want date {bad_date:?} to be rejected, got {got:?}"
            );
        }
        assert_eq!(fixture.get(original.id), Ok(original));
    }

    #[test]
    fn edit_with_bad_amount_changes_nothing() {
        let mut fixture = LedgerFixture::new();
        let alice = fixture.user("alice");
        let original = fixture.add(
            alice,
            TransactionType::Expense,
            3.5,
            date!(2024 - 01 - 01),
            "Coffee",
        );
        let form = TransactionForm {
            amount: "-4".to_owned(),
            ..edit_form("01-01-2024")
        };

        let got = fixture
            .ledger
            .apply_mutation(original.id, alice, Mutation::Edit(form));

        assert!(matches!(
            got,
            Err(Error::ValidationError {
                field: "amount",
                ..
            })
        ));
        assert_eq!(fixture.get(original.id), Ok(original));
    }

    #[test]
    fn owner_can_delete_transaction() {
        let mut fixture = LedgerFixture::new();
        let alice = fixture.user("alice");
        let original = fixture.add(
            alice,
            TransactionType::Expense,
            3.5,
            date!(2024 - 01 - 01),
            "Coffee",
        );

        let got = fixture
            .ledger
            .apply_mutation(original.id, alice, Mutation::Delete);

        assert_eq!(got, Ok(MutationOutcome::Deleted { id: original.id }));
        assert_eq!(fixture.get(original.id), Err(Error::NotFound));
    }

    #[test]
    fn mutating_missing_transaction_fails() {
        let mut fixture = LedgerFixture::new();
        let alice = fixture.user("alice");

        assert_eq!(
            fixture.ledger.apply_mutation(1337, alice, Mutation::Delete),
            Err(Error::NotFound)
        );
        assert_eq!(
            fixture
                .ledger
                .apply_mutation(1337, alice, Mutation::Edit(edit_form("01-01-2024"))),
            Err(Error::NotFound)
        );
    }

    #[test]
    fn deleted_transaction_cannot_be_deleted_again() {
        let mut fixture = LedgerFixture::new();
        let alice = fixture.user("alice");
        let original = fixture.add(
            alice,
            TransactionType::Expense,
            3.5,
            date!(2024 - 01 - 01),
            "Coffee",
        );

        fixture
            .ledger
            .apply_mutation(original.id, alice, Mutation::Delete)
            .unwrap();
        let got = fixture
            .ledger
            .apply_mutation(original.id, alice, Mutation::Delete);

        assert_eq!(got, Err(Error::NotFound));
    }

    #[test]
    fn mutations_serialize_with_action_tag() {
        assert_eq!(
            serde_json::to_value(Mutation::Delete).unwrap(),
            serde_json::json!({ "action": "delete" })
        );

        let edit = serde_json::to_value(Mutation::Edit(edit_form("15-02-2024"))).unwrap();
        assert_eq!(edit["action"], "edit");
        assert_eq!(edit["date"], "15-02-2024");
    }

    #[test]
    fn unknown_requesting_user_is_unauthorized() {
        let mut fixture = LedgerFixture::new();
        let alice = fixture.user("alice");
        let original = fixture.add(
            alice,
            TransactionType::Expense,
            3.5,
            date!(2024 - 01 - 01),
            "Coffee",
        );

        let got = fixture
            .ledger
            .apply_mutation(original.id, UserID::new(999), Mutation::Delete);

        assert_eq!(got, Err(Error::Unauthorized));
    }
}
