mod common;

use assert_matches::assert_matches;
use chrono::NaiveDate;
use rrc_ops_api::{
    entities::{
        ledger_transaction::Entity as LedgerTransaction, user, ActivityAction, TransactionType,
    },
    errors::ServiceError,
};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use sea_orm::{EntityTrait, PaginatorTrait};

fn oct(day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 10, day).unwrap()
}

async fn seed(
    services: &rrc_ops_api::AppServices,
) -> (user::Model, user::Model, i64, i64) {
    let db = services.db.as_ref();
    let admin = common::create_admin(db, "Asha", "asha@rrc.com").await;
    let manager = common::create_manager(db, "Meena", "meena@rrc.com").await;
    let plant = common::create_plant(db, "Plant A", "Pune").await;
    let sheet = services
        .sheets
        .get_or_create_sheet(plant.id, 2025, 10)
        .await
        .unwrap();
    (admin, manager, plant.id, sheet.id)
}

#[tokio::test]
async fn add_transaction_appends_and_audits() {
    let services = common::setup("ledger_add").await;
    let db = services.db.as_ref();
    let (_admin, manager, plant_id, sheet_id) = seed(&services).await;

    let tx = services
        .ledger
        .add_transaction(
            sheet_id,
            oct(15),
            "sale",
            "Plastic Granules",
            dec!(10),
            dec!(100),
            &manager,
            Some("demo".to_string()),
        )
        .await
        .expect("append should succeed on an open sheet");

    assert_eq!(tx.tx_type, "sale");
    assert_eq!(tx.quantity, dec!(10));
    assert_eq!(tx.created_by, manager.id);

    assert_eq!(common::count_logs(db, "add_tx").await, 1);
    let logs = services.workflow.recent_logs(10).await.unwrap();
    let entry = logs
        .iter()
        .find(|l| l.action() == Some(ActivityAction::AddTransaction))
        .unwrap();
    assert_eq!(entry.payload["plant"], plant_id);
    assert_eq!(entry.payload["type"], "sale");
}

#[tokio::test]
async fn add_transaction_rejects_locked_sheet() {
    let services = common::setup("ledger_locked").await;
    let db = services.db.as_ref();
    let (admin, manager, _plant_id, sheet_id) = seed(&services).await;

    services.sheets.lock(sheet_id, &admin).await.unwrap();

    let err = services
        .ledger
        .add_transaction(
            sheet_id,
            oct(15),
            "sale",
            "Plastic Granules",
            dec!(10),
            dec!(100),
            &manager,
            None,
        )
        .await
        .unwrap_err();

    assert_matches!(err, ServiceError::SheetLocked(id) if id == sheet_id);
    assert_eq!(LedgerTransaction::find().count(db).await.unwrap(), 0);
    assert_eq!(common::count_logs(db, "add_tx").await, 0);
}

#[tokio::test]
async fn add_transaction_validates_inputs() {
    let services = common::setup("ledger_validation").await;
    let db = services.db.as_ref();
    let (_admin, manager, _plant_id, sheet_id) = seed(&services).await;

    let err = services
        .ledger
        .add_transaction(
            sheet_id,
            oct(15),
            "donation",
            "Plastic Granules",
            dec!(10),
            dec!(100),
            &manager,
            None,
        )
        .await
        .unwrap_err();
    assert_matches!(err, ServiceError::InvalidType(_));

    let err = services
        .ledger
        .add_transaction(
            sheet_id,
            oct(15),
            "sale",
            "Plastic Granules",
            dec!(-1),
            dec!(100),
            &manager,
            None,
        )
        .await
        .unwrap_err();
    assert_matches!(err, ServiceError::InvalidAmount(_));

    let err = services
        .ledger
        .add_transaction(
            sheet_id,
            oct(15),
            "sale",
            "Plastic Granules",
            dec!(1),
            dec!(-100),
            &manager,
            None,
        )
        .await
        .unwrap_err();
    assert_matches!(err, ServiceError::InvalidAmount(_));

    assert_eq!(LedgerTransaction::find().count(db).await.unwrap(), 0);
}

#[tokio::test]
async fn aggregate_matches_manual_sums() {
    let services = common::setup("ledger_aggregate").await;
    let (_admin, manager, plant_id, sheet_id) = seed(&services).await;

    let rows: [(&str, Decimal, Decimal); 4] = [
        ("sale", dec!(10), dec!(100)),
        ("sale", dec!(2.5), dec!(30)),
        ("purchase", dec!(40), dec!(400)),
        ("adjustment", dec!(1), dec!(0)),
    ];
    for (tx_type, qty, value) in rows {
        services
            .ledger
            .add_transaction(sheet_id, oct(15), tx_type, "Granules", qty, value, &manager, None)
            .await
            .unwrap();
    }

    let totals = services.ledger.aggregate(plant_id, 2025, 10).await.unwrap();

    assert_eq!(totals[&TransactionType::Sale].quantity, dec!(12.5));
    assert_eq!(totals[&TransactionType::Sale].value, dec!(130));
    assert_eq!(totals[&TransactionType::Purchase].quantity, dec!(40));
    assert_eq!(totals[&TransactionType::Purchase].value, dec!(400));
    assert_eq!(totals[&TransactionType::Adjustment].quantity, dec!(1));
}

#[tokio::test]
async fn aggregate_of_missing_sheet_is_empty() {
    let services = common::setup("ledger_aggregate_empty").await;
    let db = services.db.as_ref();
    let plant = common::create_plant(db, "Plant B", "Nagpur").await;

    let totals = services.ledger.aggregate(plant.id, 2025, 10).await.unwrap();
    assert!(totals.is_empty());
}

#[tokio::test]
async fn progress_clamps_and_handles_zero_target() {
    let services = common::setup("ledger_progress").await;
    let (_admin, manager, plant_id, sheet_id) = seed(&services).await;

    assert_eq!(
        services
            .ledger
            .progress(plant_id, 2025, 10, dec!(200))
            .await
            .unwrap(),
        0
    );

    services
        .ledger
        .add_transaction(sheet_id, oct(10), "sale", "Granules", dec!(50), dec!(500), &manager, None)
        .await
        .unwrap();
    assert_eq!(
        services
            .ledger
            .progress(plant_id, 2025, 10, dec!(200))
            .await
            .unwrap(),
        25
    );

    // Progress never decreases as sales accumulate
    services
        .ledger
        .add_transaction(sheet_id, oct(11), "sale", "Granules", dec!(400), dec!(800), &manager, None)
        .await
        .unwrap();
    assert_eq!(
        services
            .ledger
            .progress(plant_id, 2025, 10, dec!(200))
            .await
            .unwrap(),
        100
    );

    // target = 0 must not divide
    assert_eq!(
        services
            .ledger
            .progress(plant_id, 2025, 10, dec!(0))
            .await
            .unwrap(),
        0
    );
}

#[tokio::test]
async fn history_orders_by_date_then_creation_sequence() {
    let services = common::setup("ledger_history").await;
    let (_admin, manager, plant_id, sheet_id) = seed(&services).await;

    // Second sheet in another month; history spans all sheets of the plant
    let nov_sheet = services
        .sheets
        .get_or_create_sheet(plant_id, 2025, 11)
        .await
        .unwrap();

    let first = services
        .ledger
        .add_transaction(sheet_id, oct(20), "sale", "Granules", dec!(1), dec!(1), &manager, None)
        .await
        .unwrap();
    let second = services
        .ledger
        .add_transaction(sheet_id, oct(20), "purchase", "Granules", dec!(2), dec!(2), &manager, None)
        .await
        .unwrap();
    let earlier = services
        .ledger
        .add_transaction(sheet_id, oct(5), "sale", "Granules", dec!(3), dec!(3), &manager, None)
        .await
        .unwrap();
    let november = services
        .ledger
        .add_transaction(
            nov_sheet.id,
            NaiveDate::from_ymd_opt(2025, 11, 1).unwrap(),
            "sale",
            "Granules",
            dec!(4),
            dec!(4),
            &manager,
            None,
        )
        .await
        .unwrap();

    let history = services.ledger.history(plant_id).await.unwrap();
    let ids: Vec<i64> = history.iter().map(|t| t.id).collect();

    // Date desc; equal dates newest-created first
    assert_eq!(ids, vec![november.id, second.id, first.id, earlier.id]);
}

#[tokio::test]
async fn history_of_plant_without_sheets_is_empty() {
    let services = common::setup("ledger_history_empty").await;
    let db = services.db.as_ref();
    let plant = common::create_plant(db, "Plant C", "Indore").await;

    let history = services.ledger.history(plant.id).await.unwrap();
    assert!(history.is_empty());
}

#[tokio::test]
async fn export_csv_matches_history() {
    let services = common::setup("ledger_csv").await;
    let (_admin, manager, plant_id, sheet_id) = seed(&services).await;

    services
        .ledger
        .add_transaction(
            sheet_id,
            oct(15),
            "sale",
            "Plastic Granules",
            dec!(10),
            dec!(100),
            &manager,
            Some("bulk order".to_string()),
        )
        .await
        .unwrap();
    services
        .ledger
        .add_transaction(sheet_id, oct(16), "purchase", "Resin", dec!(5), dec!(55.5), &manager, None)
        .await
        .unwrap();

    let csv = services.ledger.export_csv(plant_id).await.unwrap();
    let lines: Vec<&str> = csv.lines().collect();

    assert_eq!(lines[0], "date,type,item,quantity,value,created_by,notes");
    assert_eq!(lines.len(), 3);
    assert_eq!(
        lines[1],
        format!("2025-10-16,purchase,Resin,5,55.5,{},", manager.id)
    );
    assert_eq!(
        lines[2],
        format!(
            "2025-10-15,sale,Plastic Granules,10,100,{},bulk order",
            manager.id
        )
    );
}
