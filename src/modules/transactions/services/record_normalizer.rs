use tracing::{debug, info, warn};

use crate::config::ColumnNames;
use crate::core::amount::{cell_text, is_blank, parse_amount};
use crate::core::{AppError, Result};
use crate::modules::transactions::models::{AmountIssue, RawTable, TransactionRecord};

/// Records extracted from one batch, with the amount cells that had to be nulled
#[derive(Debug, Clone, Default)]
pub struct NormalizedBatch {
    pub records: Vec<TransactionRecord>,
    pub amount_issues: Vec<AmountIssue>,
}

/// Converts raw table rows into typed transaction records
pub struct RecordNormalizer {
    columns: ColumnNames,
    unknown_location_label: String,
}

struct ColumnLayout {
    location: usize,
    amount: usize,
    agent_code: Option<usize>,
    bonus: Option<usize>,
}

impl RecordNormalizer {
    pub fn new(columns: ColumnNames, unknown_location_label: impl Into<String>) -> Self {
        Self {
            columns,
            unknown_location_label: unknown_location_label.into(),
        }
    }

    /// Normalize every non-blank row of the table
    ///
    /// # Errors
    /// `MissingRequiredColumn` when the location or amount header is absent,
    /// `EmptyInput` when no non-blank data row remains.
    pub fn normalize(&self, table: &RawTable) -> Result<NormalizedBatch> {
        let layout = self.locate_columns(table)?;
        let mut batch = NormalizedBatch::default();

        for row in table.rows.iter().filter(|row| !row.iter().all(is_blank)) {
            let row_index = batch.records.len() + 1;
            let amount_cell = RawTable::cell(row, layout.amount);
            let amount = parse_amount(amount_cell);

            if amount.is_none() {
                if let Some(raw) = cell_text(amount_cell) {
                    warn!("Row {}: amount {:?} is not numeric, treating as null", row_index, raw);
                    batch.amount_issues.push(AmountIssue { row_index, raw });
                }
            }

            let location = cell_text(RawTable::cell(row, layout.location))
                .unwrap_or_else(|| self.unknown_location_label.clone());
            let agent_code = layout
                .agent_code
                .and_then(|col| cell_text(RawTable::cell(row, col)));
            let bonus = layout
                .bonus
                .and_then(|col| parse_amount(RawTable::cell(row, col)));

            batch.records.push(
                TransactionRecord::new(location, agent_code, amount, row_index).with_bonus(bonus),
            );
        }

        if batch.records.is_empty() {
            warn!("Input table has no usable transaction rows");
            return Err(AppError::EmptyInput);
        }

        info!(
            "Normalized {} transaction rows ({} unreadable amounts)",
            batch.records.len(),
            batch.amount_issues.len()
        );

        Ok(batch)
    }

    fn locate_columns(&self, table: &RawTable) -> Result<ColumnLayout> {
        let location = table
            .column_index(&self.columns.location)
            .ok_or_else(|| AppError::missing_column(&self.columns.location))?;
        let amount = table
            .column_index(&self.columns.amount)
            .ok_or_else(|| AppError::missing_column(&self.columns.amount))?;
        let agent_code = table.column_index(&self.columns.agent_code);
        let bonus = table.column_index(&self.columns.bonus);

        debug!(
            location,
            amount,
            ?agent_code,
            ?bonus,
            "Resolved column layout"
        );

        Ok(ColumnLayout {
            location,
            amount,
            agent_code,
            bonus,
        })
    }
}

impl Default for RecordNormalizer {
    fn default() -> Self {
        Self::new(ColumnNames::default(), "未知地点")
    }
}
