//! Core domain logic for the club cash desk.
//! This crate is the single source of truth for membership and deposit
//! invariants.

pub mod config;
pub mod db;
pub mod desk;
pub mod error;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use config::{CashDeskConfig, StorageLocation};
pub use desk::CashDesk;
pub use error::{CashDeskError, CashDeskResult};
pub use logging::{default_log_level, flush_logging, init_logging, logging_status};
pub use model::deposit::{Deposit, DepositId, NewDeposit};
pub use model::member::{Member, MemberNumber, NewMember};
pub use model::membership::{Membership, MembershipId, NewMembership};
pub use model::statistics::DepositStatistic;
pub use model::ModelValidationError;
pub use repo::deposit_repo::{DepositRepository, DepositWithOwners, SqliteDepositRepository};
pub use repo::member_repo::{MemberRepository, SqliteMemberRepository};
pub use repo::membership_repo::{MembershipRepository, SqliteMembershipRepository};
pub use repo::{RepoError, RepoResult};
pub use service::deposit_recorder::DepositRecorder;
pub use service::member_registry::MemberRegistry;
pub use service::membership_ledger::MembershipLedger;
pub use service::statistics_aggregator::StatisticsAggregator;

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
