use super::{Payment, Transaction, TransactionKind};

use std::str::FromStr;

use anyhow::Result;
use chrono::{TimeZone, Utc};
use rust_decimal::Decimal;

fn cash_sale(id: &str) -> Transaction {
    Transaction {
        id: id.to_string(),
        date: Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap(),
        gas_type: "LPG".to_string(),
        kgs: Decimal::from_str("12.5").unwrap(),
        payment_method: "Cash".to_string(),
        total: Decimal::from_str("3200").unwrap(),
        currency: "PKR".to_string(),
        customer_name: None,
        phone_number: None,
        due_date: None,
        paid: None,
        paid_date: None,
        card_details: None,
        is_restock: None,
        reason: None,
    }
}

#[test]
fn test_csv_header_uses_the_persisted_field_names() -> Result<()> {
    let mut writer = csv::Writer::from_writer(vec![]);
    writer.serialize(cash_sale("tx-1"))?;

    let bytes = writer.into_inner()?;
    let output = String::from_utf8(bytes)?;
    let header = output.lines().next().unwrap_or_default();

    assert_eq!(
        header,
        "id,date,gasType,kgs,paymentMethod,total,currency,customerName,phoneNumber,dueDate,paid,paidDate,cardDetails,isRestock,reason"
    );

    Ok(())
}

#[test]
fn test_csv_round_trip_preserves_every_passthrough_field() -> Result<()> {
    let mut credit = cash_sale("tx-2");
    credit.payment_method = "Credit".to_string();
    credit.customer_name = Some("Ali Khan".to_string());
    credit.phone_number = Some("0300-1234567".to_string());
    credit.due_date = Some("2024-03-15".to_string());
    credit.paid = Some(false);
    credit.paid_date = None;
    credit.card_details = None;

    let mut writer = csv::Writer::from_writer(vec![]);
    writer.serialize(credit.clone())?;

    let bytes = writer.into_inner()?;
    let mut reader = csv::Reader::from_reader(bytes.as_slice());
    let parsed: Transaction = reader.deserialize().next().unwrap()?;

    assert_eq!(parsed, credit);

    Ok(())
}

#[test]
fn test_kind_classifies_cash_sales() {
    let sale = cash_sale("tx-3");

    assert_eq!(sale.kind(), TransactionKind::Sale(Payment::Cash));
    assert_eq!(sale.kind_label(), "sale-cash");
}

#[test]
fn test_kind_classifies_credit_sales_with_their_terms() {
    let mut sale = cash_sale("tx-4");
    sale.payment_method = "Credit".to_string();
    sale.customer_name = Some("Ali Khan".to_string());
    sale.due_date = Some("2024-03-15".to_string());
    sale.paid = Some(true);

    match sale.kind() {
        TransactionKind::Sale(Payment::Credit { customer_name, due_date, paid }) => {
            assert_eq!(customer_name, Some("Ali Khan"));
            assert_eq!(due_date, Some("2024-03-15"));
            assert!(paid);
        }
        other => panic!("expected a credit sale, got {other:?}"),
    }
}

#[test]
fn test_kind_classifies_restocks_over_payment_method() {
    let mut restock = cash_sale("tx-5");
    restock.is_restock = Some(true);
    restock.reason = Some("weekly refill".to_string());

    assert_eq!(
        restock.kind(),
        TransactionKind::Restock { reason: Some("weekly refill") }
    );
    assert_eq!(restock.kind_label(), "restock");
}

#[test]
fn test_kind_preserves_unrecognized_payment_methods() {
    let mut sale = cash_sale("tx-6");
    sale.payment_method = "easypaisa".to_string();

    assert_eq!(sale.kind(), TransactionKind::Sale(Payment::Other("easypaisa")));
    assert_eq!(sale.kind_label(), "sale-other");
}

#[test]
fn test_millis_from_is_symmetric() {
    let a = cash_sale("a");
    let mut b = cash_sale("b");
    b.date = a.date + chrono::Duration::milliseconds(1_500);

    assert_eq!(a.millis_from(&b), 1_500);
    assert_eq!(b.millis_from(&a), 1_500);
}
