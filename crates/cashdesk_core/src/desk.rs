//! Cash desk session facade.
//!
//! # Responsibility
//! - Own the storage session lifecycle (`initialize` / `dispose`).
//! - Run every write use-case as one SQLite transaction.
//! - Emit one metadata-only log event per operation.
//!
//! # Invariants
//! - Operations fail with `NotInitialized` unless a session is open.
//! - A failed operation rolls back; no partial state is committed.
//! - Log events never carry names or amounts.

use crate::config::{CashDeskConfig, StorageLocation};
use crate::db::{open_db, open_db_in_memory};
use crate::error::{CashDeskError, CashDeskResult};
use crate::model::deposit::Deposit;
use crate::model::member::{Member, MemberNumber};
use crate::model::membership::{Membership, MembershipId};
use crate::model::statistics::DepositStatistic;
use crate::repo::deposit_repo::SqliteDepositRepository;
use crate::repo::member_repo::SqliteMemberRepository;
use crate::repo::membership_repo::SqliteMembershipRepository;
use crate::repo::RepoError;
use crate::service::deposit_recorder::DepositRecorder;
use crate::service::member_registry::MemberRegistry;
use crate::service::membership_ledger::MembershipLedger;
use crate::service::statistics_aggregator::StatisticsAggregator;
use chrono::NaiveDate;
use log::{debug, error, info, warn};
use rusqlite::{Connection, Transaction, TransactionBehavior};
use rust_decimal::Decimal;
use std::time::Instant;

/// Single logical cash desk session over one storage connection.
pub struct CashDesk {
    config: CashDeskConfig,
    conn: Option<Connection>,
}

impl Default for CashDesk {
    fn default() -> Self {
        Self::new(CashDeskConfig::default())
    }
}

impl CashDesk {
    /// Creates an uninitialized desk; call `initialize` before use.
    pub fn new(config: CashDeskConfig) -> Self {
        Self { config, conn: None }
    }

    /// Opens the storage session described by the config.
    ///
    /// # Errors
    /// - `AlreadyInitialized` when a session is already open.
    /// - `Repo` when the database cannot be opened or migrated.
    pub fn initialize(&mut self) -> CashDeskResult<()> {
        if self.conn.is_some() {
            warn!("event=desk_init module=desk status=error error_code=already_initialized");
            return Err(CashDeskError::AlreadyInitialized);
        }

        let opened = match &self.config.storage {
            StorageLocation::InMemory => open_db_in_memory(),
            StorageLocation::File(path) => open_db(path),
        };
        let conn = opened.map_err(RepoError::from)?;
        self.conn = Some(conn);
        info!(
            "event=desk_init module=desk status=ok storage={}",
            storage_label(&self.config.storage)
        );
        Ok(())
    }

    /// Releases the storage session. No-op when nothing is open.
    pub fn dispose(&mut self) {
        let Some(conn) = self.conn.take() else {
            return;
        };
        match conn.close() {
            Ok(()) => info!("event=desk_dispose module=desk status=ok"),
            Err((_, err)) => {
                warn!("event=desk_dispose module=desk status=error error_code=close_failed error={err}")
            }
        }
    }

    pub fn is_initialized(&self) -> bool {
        self.conn.is_some()
    }

    /// Registers a member; see `MemberRegistry::add_member`.
    pub fn add_member(
        &self,
        first_name: &str,
        last_name: &str,
        birthday: NaiveDate,
    ) -> CashDeskResult<MemberNumber> {
        self.write("member_add", |conn| {
            MemberRegistry::new(SqliteMemberRepository::try_new(conn)?).add_member(
                first_name, last_name, birthday,
            )
        })
    }

    /// Deletes a member with all memberships and deposits.
    pub fn delete_member(&self, member_number: MemberNumber) -> CashDeskResult<()> {
        self.write("member_delete", |conn| {
            MemberRegistry::new(SqliteMemberRepository::try_new(conn)?).delete_member(member_number)
        })
    }

    pub fn get_member(&self, member_number: MemberNumber) -> CashDeskResult<Option<Member>> {
        self.read("member_get", |conn| {
            MemberRegistry::new(SqliteMemberRepository::try_new(conn)?).get_member(member_number)
        })
    }

    pub fn list_members(&self) -> CashDeskResult<Vec<Member>> {
        self.read("member_list", |conn| {
            MemberRegistry::new(SqliteMemberRepository::try_new(conn)?).list_members()
        })
    }

    /// Opens a membership beginning now.
    pub fn join_member(&self, member_number: MemberNumber) -> CashDeskResult<Membership> {
        self.write("membership_join", |conn| {
            ledger(conn)?.join_member(member_number)
        })
    }

    /// Closes the member's active membership now.
    pub fn cancel_membership(&self, member_number: MemberNumber) -> CashDeskResult<Membership> {
        self.write("membership_cancel", |conn| {
            ledger(conn)?.cancel_membership(member_number)
        })
    }

    pub fn list_memberships(&self, member_number: MemberNumber) -> CashDeskResult<Vec<Membership>> {
        self.read("membership_list", |conn| {
            ledger(conn)?.list_memberships(member_number)
        })
    }

    /// Records a deposit against the member's active membership.
    pub fn deposit(&self, member_number: MemberNumber, amount: Decimal) -> CashDeskResult<Deposit> {
        self.write("deposit_add", |conn| {
            recorder(conn)?.deposit(member_number, amount)
        })
    }

    pub fn list_deposits(&self, membership_id: MembershipId) -> CashDeskResult<Vec<Deposit>> {
        self.read("deposit_list", |conn| {
            recorder(conn)?.list_deposits(membership_id)
        })
    }

    /// Point-in-time deposit totals per member and membership begin year.
    pub fn get_statistics(&self) -> CashDeskResult<Vec<DepositStatistic>> {
        self.read("statistics_get", |conn| {
            StatisticsAggregator::new(SqliteDepositRepository::try_new(conn)?).get_statistics()
        })
    }

    fn connection(&self) -> CashDeskResult<&Connection> {
        self.conn.as_ref().ok_or(CashDeskError::NotInitialized)
    }

    fn write<T>(
        &self,
        event: &'static str,
        op: impl FnOnce(&Connection) -> CashDeskResult<T>,
    ) -> CashDeskResult<T> {
        let started_at = Instant::now();
        let result = self
            .connection()
            .and_then(|conn| run_in_transaction(conn, op));
        log_outcome(event, started_at, &result);
        result
    }

    fn read<T>(
        &self,
        event: &'static str,
        op: impl FnOnce(&Connection) -> CashDeskResult<T>,
    ) -> CashDeskResult<T> {
        let started_at = Instant::now();
        let result = self.connection().and_then(op);
        log_outcome(event, started_at, &result);
        result
    }
}

type SqliteLedger<'conn> =
    MembershipLedger<SqliteMemberRepository<'conn>, SqliteMembershipRepository<'conn>>;

type SqliteRecorder<'conn> = DepositRecorder<
    SqliteMemberRepository<'conn>,
    SqliteMembershipRepository<'conn>,
    SqliteDepositRepository<'conn>,
>;

fn ledger(conn: &Connection) -> CashDeskResult<SqliteLedger<'_>> {
    Ok(MembershipLedger::new(
        SqliteMemberRepository::try_new(conn)?,
        SqliteMembershipRepository::try_new(conn)?,
    ))
}

fn recorder(conn: &Connection) -> CashDeskResult<SqliteRecorder<'_>> {
    Ok(DepositRecorder::new(
        SqliteMemberRepository::try_new(conn)?,
        SqliteMembershipRepository::try_new(conn)?,
        SqliteDepositRepository::try_new(conn)?,
    ))
}

fn run_in_transaction<T>(
    conn: &Connection,
    op: impl FnOnce(&Connection) -> CashDeskResult<T>,
) -> CashDeskResult<T> {
    // Dropping the transaction without commit rolls back.
    let tx = Transaction::new_unchecked(conn, TransactionBehavior::Immediate)?;
    let value = op(&*tx)?;
    tx.commit()?;
    Ok(value)
}

fn log_outcome<T>(event: &'static str, started_at: Instant, result: &CashDeskResult<T>) {
    let duration_ms = started_at.elapsed().as_millis();
    match result {
        Ok(_) => debug!("event={event} module=desk status=ok duration_ms={duration_ms}"),
        Err(CashDeskError::Repo(err)) => error!(
            "event={event} module=desk status=error duration_ms={duration_ms} error_code=storage error={err}"
        ),
        Err(err) => warn!(
            "event={event} module=desk status=rejected duration_ms={duration_ms} error_code={}",
            err.code()
        ),
    }
}

fn storage_label(storage: &StorageLocation) -> &'static str {
    match storage {
        StorageLocation::InMemory => "memory",
        StorageLocation::File(_) => "file",
    }
}
