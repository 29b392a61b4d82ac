//! Typed IDs for type-safe entity references.
//!
//! Using typed IDs prevents accidentally passing a `QuoteId` where an
//! `InvoiceId` is expected. The company ID doubles as the tenant partition
//! key baked into every repository query.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Macro to generate typed ID wrappers.
macro_rules! typed_id {
    ($name:ident, $doc:expr) => {
        #[doc = $doc]
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub Uuid);

        impl $name {
            /// Creates a new random ID using UUID v7 (time-ordered).
            #[must_use]
            pub fn new() -> Self {
                Self(Uuid::now_v7())
            }

            /// Creates an ID from an existing UUID.
            #[must_use]
            pub const fn from_uuid(uuid: Uuid) -> Self {
                Self(uuid)
            }

            /// Returns the inner UUID.
            #[must_use]
            pub const fn into_inner(self) -> Uuid {
                self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl std::str::FromStr for $name {
            type Err = uuid::Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Ok(Self(Uuid::parse_str(s)?))
            }
        }
    };
}

typed_id!(CompanyId, "Unique identifier for a company (tenant).");
typed_id!(ApiTokenId, "Unique identifier for an API token.");
typed_id!(ClientId, "Unique identifier for a client.");
typed_id!(AccountId, "Unique identifier for a ledger account.");
typed_id!(TransactionId, "Unique identifier for a transaction.");
typed_id!(InvoiceId, "Unique identifier for an invoice.");
typed_id!(InvoiceItemId, "Unique identifier for an invoice line item.");
typed_id!(ExpenseId, "Unique identifier for an expense.");
typed_id!(IncomeId, "Unique identifier for an income record.");
typed_id!(QuoteId, "Unique identifier for a quote.");
typed_id!(QuoteItemId, "Unique identifier for a quote line item.");
typed_id!(CategoryId, "Unique identifier for a category.");

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_ids_are_distinct_types() {
        let company = CompanyId::new();
        let quote = QuoteId::new();
        assert_ne!(company.into_inner(), quote.into_inner());
    }

    #[test]
    fn test_roundtrip_through_string() {
        let id = InvoiceId::new();
        let parsed = InvoiceId::from_str(&id.to_string()).unwrap();
        assert_eq!(id, parsed);
    }

    #[test]
    fn test_from_uuid_preserves_value() {
        let raw = Uuid::new_v4();
        assert_eq!(AccountId::from_uuid(raw).into_inner(), raw);
    }

    #[test]
    fn test_new_ids_are_unique() {
        let a = TransactionId::new();
        let b = TransactionId::new();
        assert_ne!(a, b);
    }
}
