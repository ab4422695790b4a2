use crate::{
    db::DbPool,
    entities::{
        activity_log::ActivityAction,
        ledger_transaction::{self, Entity as LedgerTransaction, TransactionType},
        monthly_sheet::{self, Entity as MonthlySheet},
        user,
    },
    errors::ServiceError,
    services::audit,
};
use chrono::NaiveDate;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use sea_orm::{QueryOrder, Set, TransactionTrait, *};
use serde::Serialize;
use serde_json::json;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::info;

/// Per-type aggregate over one sheet's transactions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TypeTotals {
    pub quantity: Decimal,
    pub value: Decimal,
}

/// Validates and appends ledger transactions and computes aggregates.
#[derive(Clone)]
pub struct LedgerService {
    db_pool: Arc<DbPool>,
}

impl LedgerService {
    pub fn new(db_pool: Arc<DbPool>) -> Self {
        Self { db_pool }
    }

    /// Appends a transaction to an unlocked sheet and writes the `add_tx`
    /// audit entry in the same database transaction.
    #[allow(clippy::too_many_arguments)]
    pub async fn add_transaction(
        &self,
        sheet_id: i64,
        date: NaiveDate,
        tx_type: &str,
        item: &str,
        quantity: Decimal,
        value: Decimal,
        actor: &user::Model,
        notes: Option<String>,
    ) -> Result<ledger_transaction::Model, ServiceError> {
        let tx_type = TransactionType::from_str(tx_type)
            .ok_or_else(|| ServiceError::InvalidType(tx_type.to_string()))?;

        if quantity < Decimal::ZERO {
            return Err(ServiceError::InvalidAmount(format!(
                "quantity must be non-negative, got {}",
                quantity
            )));
        }
        if value < Decimal::ZERO {
            return Err(ServiceError::InvalidAmount(format!(
                "value must be non-negative, got {}",
                value
            )));
        }

        let db = self.db_pool.as_ref();
        let actor_id = actor.id;
        let item = item.to_string();

        let created = db
            .transaction::<_, ledger_transaction::Model, ServiceError>(move |txn| {
                Box::pin(async move {
                    let sheet = MonthlySheet::find_by_id(sheet_id)
                        .one(txn)
                        .await
                        .map_err(ServiceError::db_error)?
                        .ok_or_else(|| {
                            ServiceError::NotFound(format!("Monthly sheet {} not found", sheet_id))
                        })?;

                    if sheet.locked {
                        return Err(ServiceError::SheetLocked(sheet_id));
                    }

                    let transaction = ledger_transaction::ActiveModel {
                        sheet_id: Set(sheet_id),
                        date: Set(date),
                        tx_type: Set(tx_type.as_str().to_string()),
                        item: Set(item),
                        quantity: Set(quantity),
                        value: Set(value),
                        created_by: Set(actor_id),
                        notes: Set(notes),
                        ..Default::default()
                    };

                    let created = transaction
                        .insert(txn)
                        .await
                        .map_err(ServiceError::db_error)?;

                    audit::record_activity(
                        txn,
                        actor_id,
                        ActivityAction::AddTransaction,
                        json!({
                            "plant": sheet.plant_id,
                            "type": tx_type.as_str(),
                            "qty": quantity,
                        }),
                    )
                    .await?;

                    Ok(created)
                })
            })
            .await
            .map_err(|e| match e {
                TransactionError::Connection(db_err) => ServiceError::db_error(db_err),
                TransactionError::Transaction(service_err) => service_err,
            })?;

        info!(
            tx_id = created.id,
            sheet_id,
            tx_type = tx_type.as_str(),
            %quantity,
            "Appended ledger transaction"
        );

        Ok(created)
    }

    /// Groups the period's transactions by type and sums quantity and value.
    ///
    /// Pure read over the ledger, folded explicitly so the result always
    /// equals the arithmetic sum over the transaction set. A plant without a
    /// sheet for the period yields an empty map.
    pub async fn aggregate(
        &self,
        plant_id: i64,
        year: i32,
        month: i32,
    ) -> Result<HashMap<TransactionType, TypeTotals>, ServiceError> {
        let db = self.db_pool.as_ref();

        let Some(sheet) = MonthlySheet::find()
            .filter(monthly_sheet::Column::PlantId.eq(plant_id))
            .filter(monthly_sheet::Column::Year.eq(year))
            .filter(monthly_sheet::Column::Month.eq(month))
            .one(db)
            .await
            .map_err(ServiceError::db_error)?
        else {
            return Ok(HashMap::new());
        };

        let transactions = LedgerTransaction::find()
            .filter(ledger_transaction::Column::SheetId.eq(sheet.id))
            .all(db)
            .await
            .map_err(ServiceError::db_error)?;

        Ok(fold_totals(&transactions))
    }

    /// Percent of `target` covered by the period's sold quantity, floored
    /// and clamped to [0, 100]. A target of zero yields 0.
    pub async fn progress(
        &self,
        plant_id: i64,
        year: i32,
        month: i32,
        target: Decimal,
    ) -> Result<u8, ServiceError> {
        let totals = self.aggregate(plant_id, year, month).await?;
        let sold = totals
            .get(&TransactionType::Sale)
            .map(|t| t.quantity)
            .unwrap_or(Decimal::ZERO);

        Ok(percent_of_target(sold, target))
    }

    /// All transactions across all sheets of the plant, newest date first.
    /// Equal dates are ordered by creation sequence (id), newest first.
    pub async fn history(
        &self,
        plant_id: i64,
    ) -> Result<Vec<ledger_transaction::Model>, ServiceError> {
        let db = self.db_pool.as_ref();

        let sheet_ids: Vec<i64> = MonthlySheet::find()
            .filter(monthly_sheet::Column::PlantId.eq(plant_id))
            .all(db)
            .await
            .map_err(ServiceError::db_error)?
            .into_iter()
            .map(|s| s.id)
            .collect();

        if sheet_ids.is_empty() {
            return Ok(Vec::new());
        }

        LedgerTransaction::find()
            .filter(ledger_transaction::Column::SheetId.is_in(sheet_ids))
            .order_by_desc(ledger_transaction::Column::Date)
            .order_by_desc(ledger_transaction::Column::Id)
            .all(db)
            .await
            .map_err(ServiceError::db_error)
    }

    /// Exports the plant's transaction history as CSV with the header
    /// `date,type,item,quantity,value,created_by,notes`.
    pub async fn export_csv(&self, plant_id: i64) -> Result<String, ServiceError> {
        let transactions = self.history(plant_id).await?;
        render_csv(&transactions)
    }
}

/// Explicit fold of ledger rows into per-type sums.
pub fn fold_totals(
    transactions: &[ledger_transaction::Model],
) -> HashMap<TransactionType, TypeTotals> {
    let mut totals: HashMap<TransactionType, TypeTotals> = HashMap::new();
    for tx in transactions {
        if let Some(tx_type) = tx.tx_type() {
            let entry = totals.entry(tx_type).or_default();
            entry.quantity += tx.quantity;
            entry.value += tx.value;
        }
    }
    totals
}

/// floor(min(100, sold / target * 100)) for target > 0, else 0.
pub fn percent_of_target(sold: Decimal, target: Decimal) -> u8 {
    if target <= Decimal::ZERO {
        return 0;
    }

    let percent = (sold / target * Decimal::ONE_HUNDRED).floor();
    if percent >= Decimal::ONE_HUNDRED {
        100
    } else if percent <= Decimal::ZERO {
        0
    } else {
        percent.to_u8().unwrap_or(100)
    }
}

fn render_csv(transactions: &[ledger_transaction::Model]) -> Result<String, ServiceError> {
    let mut writer = csv::Writer::from_writer(Vec::new());

    writer
        .write_record([
            "date",
            "type",
            "item",
            "quantity",
            "value",
            "created_by",
            "notes",
        ])
        .map_err(|e| ServiceError::db_error(format!("CSV write failed: {}", e)))?;

    for tx in transactions {
        writer
            .write_record([
                tx.date.to_string(),
                tx.tx_type.clone(),
                tx.item.clone(),
                tx.quantity.to_string(),
                tx.value.to_string(),
                tx.created_by.to_string(),
                tx.notes.clone().unwrap_or_default(),
            ])
            .map_err(|e| ServiceError::db_error(format!("CSV write failed: {}", e)))?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| ServiceError::db_error(format!("CSV flush failed: {}", e)))?;

    String::from_utf8(bytes).map_err(|e| ServiceError::db_error(format!("CSV not UTF-8: {}", e)))
}
