use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::models::TransactionId;

/// A single recorded sale or restock event, as persisted by the store.
///
/// Field names on the wire are fixed by the existing persisted data and must
/// not change (hence the serde renames). The shape is deliberately flat: the
/// trailing optional fields are passthrough metadata that the reconciliation
/// logic never inspects but must carry through unchanged when re-emitting
/// filtered lists. Use [`Transaction::kind`] for a typed view of what the
/// record actually represents.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// Opaque store-assigned identifier, unique and immutable.
    pub id: TransactionId,
    /// Event time chosen by the creator, not the write time. All duplicate
    /// windowing uses this field; clocks may drift relative to server time.
    pub date: DateTime<Utc>,
    /// Gas category, compared by exact string equality.
    #[serde(rename = "gasType")]
    pub gas_type: String,
    /// Quantity in kilograms, compared by exact decimal equality.
    pub kgs: Decimal,
    /// Payment category, compared by exact string equality.
    #[serde(rename = "paymentMethod")]
    pub payment_method: String,
    /// Monetary total. Carried through, never inspected.
    pub total: Decimal,
    pub currency: String,
    #[serde(rename = "customerName", default)]
    pub customer_name: Option<String>,
    #[serde(rename = "phoneNumber", default)]
    pub phone_number: Option<String>,
    #[serde(rename = "dueDate", default)]
    pub due_date: Option<String>,
    #[serde(default)]
    pub paid: Option<bool>,
    #[serde(rename = "paidDate", default)]
    pub paid_date: Option<String>,
    #[serde(rename = "cardDetails", default)]
    pub card_details: Option<String>,
    #[serde(rename = "isRestock", default)]
    pub is_restock: Option<bool>,
    #[serde(default)]
    pub reason: Option<String>,
}

/// Typed classification of a [`Transaction`], derived on demand.
///
/// The persisted record stays flat so that unknown payment methods and odd
/// field combinations survive a round trip unchanged; this view is how
/// reports and callers reason about what a record is.
#[derive(Debug, Clone, PartialEq)]
pub enum TransactionKind<'a> {
    Sale(Payment<'a>),
    Restock { reason: Option<&'a str> },
}

#[derive(Debug, Clone, PartialEq)]
pub enum Payment<'a> {
    Cash,
    Credit {
        customer_name: Option<&'a str>,
        due_date: Option<&'a str>,
        paid: bool,
    },
    Card {
        card_details: Option<&'a str>,
    },
    /// A payment method string this code does not recognize. Preserved as-is;
    /// the duplicate logic only ever compares the raw string anyway.
    Other(&'a str),
}

impl Transaction {
    /// Classifies the record as a restock or a sale (refined by payment method).
    pub fn kind(&self) -> TransactionKind<'_> {
        if self.is_restock.unwrap_or(false) {
            return TransactionKind::Restock {
                reason: self.reason.as_deref(),
            };
        }

        let payment = match self.payment_method.as_str() {
            "Cash" => Payment::Cash,
            "Credit" => Payment::Credit {
                customer_name: self.customer_name.as_deref(),
                due_date: self.due_date.as_deref(),
                paid: self.paid.unwrap_or(false),
            },
            "Card" => Payment::Card {
                card_details: self.card_details.as_deref(),
            },
            other => Payment::Other(other),
        };

        TransactionKind::Sale(payment)
    }

    /// Short label for reports and logs.
    pub fn kind_label(&self) -> &'static str {
        match self.kind() {
            TransactionKind::Restock { .. } => "restock",
            TransactionKind::Sale(Payment::Cash) => "sale-cash",
            TransactionKind::Sale(Payment::Credit { .. }) => "sale-credit",
            TransactionKind::Sale(Payment::Card { .. }) => "sale-card",
            TransactionKind::Sale(Payment::Other(_)) => "sale-other",
        }
    }

    /// Absolute distance between two event times, in milliseconds.
    pub fn millis_from(&self, other: &Transaction) -> i64 {
        (self.date - other.date).num_milliseconds().abs()
    }
}
