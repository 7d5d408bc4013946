//! End-to-end check of the behaviour the database implements on its own:
//! the timestamp trigger, the non-negative quantity trigger, the wash log
//! trigger and the two lookup procedures.
//!
//! Every phase runs in its own transaction, so a failing phase is rolled back
//! and does not leave the next one working on half-written data. The rows the
//! run creates are removed at the end whatever happened in between.

use std::str::FromStr;

use bigdecimal::BigDecimal;
use derive_more::Display;
use diesel::{PgConnection, prelude::*};
use log::{error, info, warn};

use crate::Database;
use crate::catalog::{merge_product, merge_schedule, merge_unit};
use crate::config::VerificationFixture;
use crate::errors::{StoreError, StoreResult};
use crate::events::{self, delete_decanter_washes_for_unit, delete_filter_washes_for_unit, delete_monitoring_for_unit};
use crate::models::*;
use crate::procedures;

#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Phase {
    Connect,
    Prerequisites,
    NegativeReceipt,
    NegativeInventory,
    FilterWash,
    DecanterWash,
    MonitoringTimestamp,
    MonitoringProcedure,
    InventoryProcedure,
    Cleanup,
}

/// Ok carries a short description of what was observed, Err the reason of the failure.
pub type PhaseOutcome = Result<String, String>;

#[derive(Debug, Clone, Serialize)]
pub struct PhaseResult {
    pub phase: Phase,
    pub passed: bool,
    pub message: String,
}

#[derive(Debug, Default, Serialize)]
pub struct VerificationReport {
    pub results: Vec<PhaseResult>,
}

impl VerificationReport {
    pub fn record(&mut self, phase: Phase, outcome: PhaseOutcome) {
        let (passed, message) = match outcome {
            Ok(message) => {
                info!("✅ {}: {}", phase, message);
                (true, message)
            },
            Err(message) => {
                error!("❌ {}: {}", phase, message);
                (false, message)
            },
        };
        self.results.push(PhaseResult { phase, passed, message });
    }

    pub fn result(&self, phase: Phase) -> Option<&PhaseResult> {
        self.results.iter().find(|x| x.phase == phase)
    }

    pub fn failures(&self) -> impl Iterator<Item = &PhaseResult> {
        self.results.iter().filter(|x| !x.passed)
    }

    pub fn passed(&self) -> bool {
        !self.results.is_empty() && self.results.iter().all(|x| x.passed)
    }
}

/// Removes the rows a run creates, also when the run is cut short by a panic.
pub struct CleanupGuard<'a> {
    conn: &'a PgConnection,
    unit_id: ExternalId,
    done: bool,
}

impl<'a> CleanupGuard<'a> {
    pub fn new(conn: &'a PgConnection, unit_id: ExternalId) -> Self {
        CleanupGuard { conn, unit_id, done: false }
    }

    pub fn finish(mut self) -> StoreResult<usize> {
        self.done = true;
        cleanup(self.conn, self.unit_id)
    }
}

impl<'a> Drop for CleanupGuard<'a> {
    fn drop(&mut self) {
        if self.done {
            return;
        }
        if let Err(err) = cleanup(self.conn, self.unit_id) {
            warn!("Failed to clean up test data: {}", err);
        }
    }
}

fn cleanup(conn: &PgConnection, unit_id: ExternalId) -> StoreResult<usize> {
    conn.transaction::<_, StoreError, _>(|| {
        let mut count = delete_monitoring_for_unit(conn, &unit_id.to_string())?;
        count += delete_filter_washes_for_unit(conn, unit_id)?;
        count += delete_decanter_washes_for_unit(conn, unit_id)?;
        Ok(count)
    })
}

/// Runs every phase with a single connection taken from `db`.
pub fn run(db: &Database, fixture: &VerificationFixture) -> VerificationReport {
    let mut report = VerificationReport::default();

    let conn = match db.get_connection() {
        Ok(conn) => conn,
        Err(err) => {
            report.record(Phase::Connect, Err(format!("cannot connect to the database: {}", err)));
            return report;
        },
    };
    report.record(Phase::Connect, Ok("connection established".to_string()));

    run_phases(&conn, fixture, &mut report);
    report
}

pub fn run_phases(conn: &PgConnection, fixture: &VerificationFixture, report: &mut VerificationReport) {
    let prerequisites = ensure_prerequisites(conn, fixture)
        .map_err(|err| err.to_string());
    let aborted = prerequisites.is_err();
    report.record(Phase::Prerequisites, prerequisites);
    if aborted {
        return;
    }

    let guard = CleanupGuard::new(conn, fixture.unit_id);

    report.record(Phase::NegativeReceipt, check_negative_receipts(conn, fixture));
    report.record(Phase::NegativeInventory, check_negative_inventories(conn, fixture));
    report.record(Phase::FilterWash, check_filter_wash(conn, fixture));
    report.record(Phase::DecanterWash, check_decanter_wash(conn, fixture));
    report.record(Phase::MonitoringTimestamp, check_monitoring_timestamp(conn, fixture));
    report.record(Phase::MonitoringProcedure, check_monitoring_procedure(conn, fixture));
    report.record(Phase::InventoryProcedure, check_inventory_procedure(conn, fixture));

    let cleaned = guard.finish()
        .map(|count| format!("{} test rows removed", count))
        .map_err(|err| format!("failed to clean up test data: {}", err));
    report.record(Phase::Cleanup, cleaned);
}

/// Merges the unit, product and schedule the other phases reference.
pub fn ensure_prerequisites(conn: &PgConnection, fixture: &VerificationFixture) -> StoreResult<String> {
    conn.transaction::<_, StoreError, _>(|| {
        merge_unit(conn, &NewOperationalUnit::new(fixture.unit_id).described("Unidade Teste"))?;
        merge_product(conn, &NewChemicalProduct::new(fixture.product_id).described("Produto Teste"))?;
        merge_schedule(conn, &NewCollectionSchedule::new(fixture.schedule_id, "Horario Teste"))?;
        Ok(format!(
            "unit {}, product {} and schedule {} available",
            fixture.unit_id, fixture.product_id, fixture.schedule_id
        ))
    })
}

enum Attempt {
    Accepted,
    Failed(StoreError),
}

impl From<diesel::result::Error> for Attempt {
    fn from(error: diesel::result::Error) -> Self {
        Attempt::Failed(error.into())
    }
}

/// Tries the insert and always rolls it back, reporting whether the database took it.
fn attempt_rolled_back<F>(conn: &PgConnection, insert: F) -> Attempt
    where F: FnOnce() -> StoreResult<()>
{
    let res = conn.transaction::<(), Attempt, _>(|| {
        insert().map_err(Attempt::Failed)?;
        Err(Attempt::Accepted)
    });
    match res {
        Err(x) => x,
        Ok(()) => Attempt::Accepted,
    }
}

fn expect_rejections<F>(conn: &PgConnection, quantities: &[BigDecimal], what: &str, insert: F) -> PhaseOutcome
    where F: Fn(&BigDecimal) -> StoreResult<()>
{
    if quantities.is_empty() {
        return Err("no negative quantities configured".to_string());
    }

    for quantity in quantities {
        match attempt_rolled_back(conn, || insert(quantity)) {
            Attempt::Accepted => {
                return Err(format!("{} with quantity {} was accepted", what, quantity));
            },
            Attempt::Failed(StoreError::Rejected(message)) => {
                info!("{} with quantity {} rejected: {}", what, quantity, message);
            },
            Attempt::Failed(err) => {
                return Err(format!("{} with quantity {} failed for another reason: {}", what, quantity, err));
            },
        }
    }

    Ok(format!("{} negative quantities rejected", quantities.len()))
}

pub fn check_negative_receipts(conn: &PgConnection, fixture: &VerificationFixture) -> PhaseOutcome {
    expect_rejections(conn, &fixture.negative_quantities, "receipt", |quantity| {
        let receipt = NewStockReceipt::new(
            fixture.unit_id, fixture.schedule_id, fixture.product_id,
            quantity.clone(), "123", "ABC",
        );
        events::insert_receipt(conn, &receipt).map(|_| ())
    })
}

pub fn check_negative_inventories(conn: &PgConnection, fixture: &VerificationFixture) -> PhaseOutcome {
    expect_rejections(conn, &fixture.negative_quantities, "inventory", |quantity| {
        let inventory = NewStockInventory::new(
            fixture.unit_id, fixture.schedule_id, fixture.product_id, quantity.clone(),
        );
        events::insert_inventory(conn, &inventory).map(|_| ())
    })
}

fn sample_wash() -> StoreResult<WashDetails> {
    let volume = BigDecimal::from_str("150.0")
        .map_err(|x| StoreError::Internal(x.to_string()))?;
    Ok(WashDetails {
        data: "2025-11-03".to_string(),
        hora: "09:00".to_string(),
        tempo_lavagem: "10 min".to_string(),
        volume_utilizado: volume,
    })
}

pub fn check_filter_wash(conn: &PgConnection, fixture: &VerificationFixture) -> PhaseOutcome {
    let res = conn.transaction::<_, StoreError, _>(|| {
        let wash = NewFilterWash::new(fixture.unit_id, fixture.schedule_id, 5, sample_wash()?);
        let stored = events::insert_filter_wash(conn, &wash)?;
        events::find_filter_wash(conn, stored.id)?
            .ok_or_else(|| StoreError::NotFound("Filter wash".to_string()))
    });

    match res {
        Ok(wash) => {
            info!("Wash log notice for filter {} is emitted by the database", wash.numero_filtro);
            Ok(format!("filter wash {} stored", wash.id))
        },
        Err(err) => Err(format!("cannot insert the filter wash: {}", err)),
    }
}

pub fn check_decanter_wash(conn: &PgConnection, fixture: &VerificationFixture) -> PhaseOutcome {
    let res = conn.transaction::<_, StoreError, _>(|| {
        let mut wash = NewDecanterWash::new(fixture.unit_id, fixture.schedule_id, 2, sample_wash()?);
        wash.tipo = Some("Descarga".to_string());
        let stored = events::insert_decanter_wash(conn, &wash)?;
        events::find_decanter_wash(conn, stored.id)?
            .ok_or_else(|| StoreError::NotFound("Decanter wash".to_string()))
    });

    res.map(|wash| format!("decanter wash {} stored", wash.id))
        .map_err(|err| format!("cannot insert the decanter wash: {}", err))
}

pub fn check_monitoring_timestamp(conn: &PgConnection, fixture: &VerificationFixture) -> PhaseOutcome {
    let res = conn.transaction::<_, StoreError, _>(|| {
        let mut event = NewMonitoringEvent::for_unit(fixture.unit_id_text(), fixture.schedule_id);
        event.vazao = Some(fixture.flow.clone());
        event.cor = Some("0.5".to_string());
        events::insert_monitoring(conn, &event)
    });

    match res {
        Ok(MonitoringEvent { created_at: Some(created_at), .. }) => {
            Ok(format!("created_at set by the database to {}", created_at))
        },
        Ok(_) => Err("created_at was not filled in by the database".to_string()),
        Err(err) => Err(format!("cannot insert the monitoring row: {}", err)),
    }
}

pub fn check_monitoring_procedure(conn: &PgConnection, fixture: &VerificationFixture) -> PhaseOutcome {
    let rows = procedures::monitorings_by_unit(conn, fixture.unit_id)
        .map_err(|err| format!("{} failed: {}", procedures::MONITORINGS_BY_UNIT, err))?;

    match rows.first() {
        Some(row) if row.vazao.as_ref() == Some(&fixture.flow) => {
            Ok(format!("found {} monitoring row(s)", rows.len()))
        },
        Some(row) => Err(format!("expected vazao {:?}, found {:?}", fixture.flow, row.vazao)),
        None => Err(format!("no monitoring row returned for unit {}", fixture.unit_id)),
    }
}

pub fn check_inventory_procedure(conn: &PgConnection, fixture: &VerificationFixture) -> PhaseOutcome {
    procedures::inventory_by_product_unit(conn, fixture.product_id, fixture.unit_id)
        .map(|rows| format!("returned {} inventory row(s)", rows.len()))
        .map_err(|err| format!("{} failed: {}", procedures::INVENTORY_BY_PRODUCT_UNIT, err))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_report_does_not_pass() {
        assert!(!VerificationReport::default().passed());
    }

    #[test]
    fn report_collects_failures() {
        let mut report = VerificationReport::default();
        report.record(Phase::Connect, Ok("connection established".to_string()));
        report.record(Phase::NegativeReceipt, Err("receipt with quantity -50 was accepted".to_string()));
        report.record(Phase::Cleanup, Ok("2 test rows removed".to_string()));

        assert!(!report.passed());
        let failures: Vec<Phase> = report.failures().map(|x| x.phase).collect();
        assert_eq!(failures, vec![Phase::NegativeReceipt]);
        assert!(report.result(Phase::Connect).unwrap().passed);
        assert!(report.result(Phase::FilterWash).is_none());
    }

    #[test]
    fn report_passes_when_every_phase_passes() {
        let mut report = VerificationReport::default();
        report.record(Phase::Connect, Ok("ok".to_string()));
        report.record(Phase::Prerequisites, Ok("ok".to_string()));
        assert!(report.passed());
    }

    #[test]
    fn report_serializes_phase_names() {
        let mut report = VerificationReport::default();
        report.record(Phase::MonitoringTimestamp, Err("created_at was not filled in by the database".to_string()));
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["results"][0]["phase"], "MonitoringTimestamp");
        assert_eq!(json["results"][0]["passed"], false);
    }

    #[test]
    fn phase_display() {
        assert_eq!(Phase::NegativeInventory.to_string(), "NegativeInventory");
    }

    #[test]
    fn sample_wash_matches_reference_values() {
        let wash = sample_wash().unwrap();
        assert_eq!(wash.data, "2025-11-03");
        assert_eq!(wash.volume_utilizado, BigDecimal::from_str("150").unwrap());
    }
}
