//! Deposit repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Append deposits to a membership.
//! - Load deposits joined with their owning membership and member for
//!   reporting.
//!
//! # Invariants
//! - Deposits are insert-only; they disappear only through cascade.
//! - Amounts are stored as decimal text and validated on read-back.

use super::member_repo::parse_member_row;
use super::membership_repo::parse_membership_row;
use super::{amount_to_db, ensure_connection_ready, parse_amount, RepoResult};
use crate::model::deposit::{Deposit, NewDeposit};
use crate::model::member::Member;
use crate::model::membership::{Membership, MembershipId};
use rusqlite::{params, Connection, Row};

const DEPOSIT_COLUMNS: &[&str] = &["deposit_id", "membership_id", "amount"];

/// Deposit read model carrying its owners.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DepositWithOwners {
    pub deposit: Deposit,
    pub membership: Membership,
    pub member: Member,
}

/// Repository interface for deposits.
pub trait DepositRepository {
    fn create_deposit(&self, deposit: &NewDeposit) -> RepoResult<Deposit>;
    /// Lists deposits of one membership in insertion order.
    fn list_deposits(&self, membership_id: MembershipId) -> RepoResult<Vec<Deposit>>;
    /// Loads every deposit with its membership and that membership's member.
    fn list_deposits_with_owners(&self) -> RepoResult<Vec<DepositWithOwners>>;
}

/// SQLite-backed deposit repository.
pub struct SqliteDepositRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteDepositRepository<'conn> {
    /// Constructs a repository from a migrated connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn, "deposits", DEPOSIT_COLUMNS)?;
        Ok(Self { conn })
    }
}

impl DepositRepository for SqliteDepositRepository<'_> {
    fn create_deposit(&self, deposit: &NewDeposit) -> RepoResult<Deposit> {
        deposit.validate()?;

        self.conn.execute(
            "INSERT INTO deposits (membership_id, amount) VALUES (?1, ?2);",
            params![deposit.membership_id, amount_to_db(deposit.amount)],
        )?;

        Ok(Deposit {
            deposit_id: self.conn.last_insert_rowid(),
            membership_id: deposit.membership_id,
            amount: deposit.amount,
        })
    }

    fn list_deposits(&self, membership_id: MembershipId) -> RepoResult<Vec<Deposit>> {
        let mut stmt = self.conn.prepare(
            "SELECT deposit_id, membership_id, amount
             FROM deposits
             WHERE membership_id = ?1
             ORDER BY deposit_id ASC;",
        )?;
        let mut rows = stmt.query([membership_id])?;
        let mut deposits = Vec::new();
        while let Some(row) = rows.next()? {
            deposits.push(parse_deposit_row(row)?);
        }
        Ok(deposits)
    }

    fn list_deposits_with_owners(&self) -> RepoResult<Vec<DepositWithOwners>> {
        // Aliases keep per-table column names so the row parsers apply.
        let mut stmt = self.conn.prepare(
            "SELECT
                d.deposit_id AS deposit_id,
                d.membership_id AS membership_id,
                d.amount AS amount,
                ms.begin_at AS begin_at,
                ms.end_at AS end_at,
                m.member_number AS member_number,
                m.first_name AS first_name,
                m.last_name AS last_name,
                m.birthday AS birthday
             FROM deposits d
             JOIN memberships ms ON ms.membership_id = d.membership_id
             JOIN members m ON m.member_number = ms.member_number
             ORDER BY m.member_number ASC, ms.begin_at ASC, d.deposit_id ASC;",
        )?;
        let mut rows = stmt.query([])?;
        let mut items = Vec::new();
        while let Some(row) = rows.next()? {
            let deposit = parse_deposit_row(row)?;
            let member = parse_member_row(row)?;
            let membership = parse_membership_row(row)?;
            items.push(DepositWithOwners {
                deposit,
                membership,
                member,
            });
        }
        Ok(items)
    }
}

fn parse_deposit_row(row: &Row<'_>) -> RepoResult<Deposit> {
    let amount_text: String = row.get("amount")?;
    let deposit = Deposit {
        deposit_id: row.get("deposit_id")?,
        membership_id: row.get("membership_id")?,
        amount: parse_amount(&amount_text, "deposits.amount")?,
    };
    deposit.validate()?;
    Ok(deposit)
}
