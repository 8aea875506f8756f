//! Migration runner
//!
//! Applies pending migrations one at a time, in plan order, recording each
//! in the ledger. The first failure halts the run.

use super::ledger::{ensure_ledger, last_applied, record_applied};
use super::options::MigrateOptions;
use crate::conn::{Executable, Transactional, TxHandle};
use crate::errors::{migration_failed, Result};
use seqmig_core::plan::{build_plan, MigrationDefinition, MigrationSource, ResumePoint};
use seqmig_core::{log_op_end, log_op_error, log_op_start};
use seqmig_core_types::RunId;
use serde::Serialize;
use std::time::Instant;

/// Outcome of a successful run
#[derive(Debug, Clone, Serialize)]
pub struct MigrationReport {
    pub run_id: RunId,
    /// Number of migrations in the plan
    pub plan_len: usize,
    /// Last migration found in the ledger when the run started
    pub resumed_after: Option<String>,
    /// Migrations applied by this run, in order
    pub applied: Vec<String>,
    pub duration_ms: u64,
}

impl MigrationReport {
    /// True when the run found nothing to apply
    pub fn is_noop(&self) -> bool {
        self.applied.is_empty()
    }
}

/// Bring the database up to date with every migration in `source`.
///
/// Re-running against an up-to-date database applies nothing.
pub fn migrate<C, S>(conn: &mut C, source: &S) -> Result<MigrationReport>
where
    C: Transactional,
    S: MigrationSource + ?Sized,
{
    migrate_with(conn, source, &MigrateOptions::default())
}

/// [`migrate`] with cancellation and deadline control
pub fn migrate_with<C, S>(
    conn: &mut C,
    source: &S,
    options: &MigrateOptions,
) -> Result<MigrationReport>
where
    C: Transactional,
    S: MigrationSource + ?Sized,
{
    let run_id = RunId::new();
    let span = tracing::info_span!("migrate", run_id = %run_id);
    let _entered = span.enter();

    let start = Instant::now();
    log_op_start!("migrate");

    match run(conn, source, options) {
        Ok(outcome) => {
            let duration_ms = start.elapsed().as_millis() as u64;
            log_op_end!(
                "migrate",
                duration_ms = duration_ms,
                plan_len = outcome.plan_len,
                applied_len = outcome.applied.len()
            );
            Ok(MigrationReport {
                run_id,
                plan_len: outcome.plan_len,
                resumed_after: outcome.resumed_after,
                applied: outcome.applied,
                duration_ms,
            })
        }
        Err(err) => {
            log_op_error!(
                "migrate",
                err.clone(),
                duration_ms = start.elapsed().as_millis() as u64
            );
            Err(err)
        }
    }
}

struct RunOutcome {
    plan_len: usize,
    resumed_after: Option<String>,
    applied: Vec<String>,
}

fn run<C, S>(conn: &mut C, source: &S, options: &MigrateOptions) -> Result<RunOutcome>
where
    C: Transactional,
    S: MigrationSource + ?Sized,
{
    let plan = build_plan(source).map_err(|e| e.context("migrate", "building migration plan"))?;

    ensure_ledger(&*conn).map_err(|e| e.context("migrate", "creating table"))?;

    let last = last_applied(&*conn)
        .map_err(|e| e.context("migrate", "querying for last migration applied"))?;

    let resume = plan.resume_point(last.as_deref());
    if let (Some(name), ResumePoint::Start) = (&last, resume) {
        tracing::warn!(
            op = "migrate",
            migration = %name,
            "last applied migration is not in the plan, resuming from the first migration"
        );
    }

    let pending = plan.pending(resume);
    tracing::debug!(
        op = "migrate",
        plan_len = plan.len(),
        pending_len = pending.len(),
        "resolved resume point"
    );

    let mut applied = Vec::with_capacity(pending.len());
    for definition in pending {
        options.check(&definition.name)?;

        apply_migration(conn, definition).map_err(|e| {
            e.context(
                "migrate",
                format!("applying migration {}", definition.name),
            )
        })?;

        applied.push(definition.name.clone());
    }

    Ok(RunOutcome {
        plan_len: plan.len(),
        resumed_after: last,
        applied,
    })
}

/// Apply one migration and record it in the ledger.
///
/// Transactional migrations run their content and the ledger insert in a
/// single transaction; any failure rolls both back. Direct migrations run
/// on the connection and are recorded by a separate statement afterwards,
/// so a failure between the two leaves the migration applied but
/// unrecorded, and the next run attempts it again.
pub fn apply_migration<C: Transactional>(
    conn: &mut C,
    definition: &MigrationDefinition,
) -> Result<()> {
    let start = Instant::now();
    log_op_start!(
        "apply_migration",
        migration = %definition.name,
        transactional = definition.run_inside_transaction
    );

    let result = if definition.run_inside_transaction {
        apply_in_transaction(conn, definition)
    } else {
        apply_direct(&*conn, definition)
    };

    match result {
        Ok(()) => {
            log_op_end!(
                "apply_migration",
                duration_ms = start.elapsed().as_millis() as u64,
                migration = %definition.name
            );
            Ok(())
        }
        Err(err) => {
            log_op_error!(
                "apply_migration",
                err.clone(),
                duration_ms = start.elapsed().as_millis() as u64,
                migration = %definition.name
            );
            Err(err)
        }
    }
}

fn apply_in_transaction<C: Transactional>(
    conn: &mut C,
    definition: &MigrationDefinition,
) -> Result<()> {
    let tx = conn
        .begin()
        .map_err(|e| migration_failed(&definition.name, "beginning transaction", e))?;

    let outcome = tx
        .execute_script(&definition.content)
        .map_err(|e| migration_failed(&definition.name, "executing migration", e))
        .and_then(|()| {
            record_applied(&tx, &definition.name)
                .map_err(|e| migration_failed(&definition.name, "recording migration", e))
        });

    if let Err(err) = outcome {
        if let Err(rollback_err) = tx.rollback() {
            tracing::warn!(
                op = "apply_migration",
                migration = %definition.name,
                error = %rollback_err,
                "rollback failed"
            );
        }
        return Err(err);
    }

    tx.commit()
        .map_err(|e| migration_failed(&definition.name, "committing migration", e))
}

fn apply_direct<E: Executable>(conn: &E, definition: &MigrationDefinition) -> Result<()> {
    conn.execute_script(&definition.content)
        .map_err(|e| migration_failed(&definition.name, "executing migration", e))?;

    record_applied(conn, &definition.name).map_err(|e| {
        tracing::warn!(
            op = "apply_migration",
            migration = %definition.name,
            "migration applied but not recorded, it will be attempted again on the next run"
        );
        migration_failed(&definition.name, "recording migration", e)
    })
}
