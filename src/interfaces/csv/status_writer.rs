use crate::domain::money::Money;
use crate::domain::reconcile::ObligationState;
use crate::error::Result;
use serde::Serialize;
use std::io::Write;

/// One row of the obligation summary printed by the CLI.
#[derive(Debug, Serialize)]
pub struct StatusRow {
    pub student_id: String,
    pub total_paid: Money,
    pub active_plan: &'static str,
    pub complete: bool,
}

impl StatusRow {
    pub fn new(student_id: String, state: &ObligationState) -> Self {
        Self {
            student_id,
            total_paid: state.total_paid,
            active_plan: state.active_plan.map_or("none", |plan| plan.label()),
            complete: state.is_complete,
        }
    }
}

/// Writes obligation summaries as CSV.
pub struct StatusWriter<W: Write> {
    writer: csv::Writer<W>,
}

impl<W: Write> StatusWriter<W> {
    pub fn new(sink: W) -> Self {
        Self {
            writer: csv::Writer::from_writer(sink),
        }
    }

    pub fn write_rows(&mut self, rows: Vec<StatusRow>) -> Result<()> {
        for row in rows {
            self.writer.serialize(row)?;
        }
        self.writer.flush()?;
        Ok(())
    }
}
