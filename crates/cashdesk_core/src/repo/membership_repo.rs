//! Membership repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Persist membership intervals for a member.
//! - Answer "open membership" and "active at time" predicates.
//!
//! # Invariants
//! - An open membership is stored with `end_at IS NULL`.
//! - A partial unique index allows one open row per member; a second open
//!   insert surfaces as `RepoError::UniqueViolation`.
//! - A membership is active strictly before its `end_at`.
//! - `close_membership` only touches rows with `end_at IS NULL`; a closed
//!   membership is never rewritten.

use super::{ensure_connection_ready, parse_timestamp, timestamp_to_db, RepoError, RepoResult};
use crate::model::member::MemberNumber;
use crate::model::membership::{Membership, MembershipId, NewMembership};
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension, Row};

const MEMBERSHIP_SELECT_SQL: &str = "SELECT
    membership_id,
    member_number,
    begin_at,
    end_at
FROM memberships";

const MEMBERSHIP_COLUMNS: &[&str] = &["membership_id", "member_number", "begin_at", "end_at"];

/// Repository interface for membership intervals.
pub trait MembershipRepository {
    fn create_membership(&self, membership: &NewMembership) -> RepoResult<Membership>;
    fn get_membership(&self, membership_id: MembershipId) -> RepoResult<Option<Membership>>;
    /// Whether the member has a membership with no end.
    fn has_open_membership(&self, member_number: MemberNumber) -> RepoResult<bool>;
    /// Finds the member's membership whose end is unset or later than `at`.
    fn find_active_membership(
        &self,
        member_number: MemberNumber,
        at: DateTime<Utc>,
    ) -> RepoResult<Option<Membership>>;
    /// Lists a member's memberships ordered by begin time.
    fn list_memberships(&self, member_number: MemberNumber) -> RepoResult<Vec<Membership>>;
    /// Sets `end` on an open membership that began no later than `end`.
    fn close_membership(&self, membership_id: MembershipId, end: DateTime<Utc>)
        -> RepoResult<()>;
}

/// SQLite-backed membership repository.
pub struct SqliteMembershipRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteMembershipRepository<'conn> {
    /// Constructs a repository from a migrated connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn, "memberships", MEMBERSHIP_COLUMNS)?;
        Ok(Self { conn })
    }
}

impl MembershipRepository for SqliteMembershipRepository<'_> {
    fn create_membership(&self, membership: &NewMembership) -> RepoResult<Membership> {
        self.conn.execute(
            "INSERT INTO memberships (member_number, begin_at, end_at)
             VALUES (?1, ?2, NULL);",
            params![membership.member_number, timestamp_to_db(membership.begin)],
        )?;

        Ok(Membership {
            membership_id: self.conn.last_insert_rowid(),
            member_number: membership.member_number,
            begin: membership.begin,
            end: None,
        })
    }

    fn get_membership(&self, membership_id: MembershipId) -> RepoResult<Option<Membership>> {
        self.conn
            .query_row(
                &format!("{MEMBERSHIP_SELECT_SQL} WHERE membership_id = ?1;"),
                [membership_id],
                |row| Ok(parse_membership_row(row)),
            )
            .optional()?
            .transpose()
    }

    fn has_open_membership(&self, member_number: MemberNumber) -> RepoResult<bool> {
        let exists: i64 = self.conn.query_row(
            "SELECT EXISTS(
                SELECT 1
                FROM memberships
                WHERE member_number = ?1
                  AND end_at IS NULL
            );",
            [member_number],
            |row| row.get(0),
        )?;
        Ok(exists == 1)
    }

    fn find_active_membership(
        &self,
        member_number: MemberNumber,
        at: DateTime<Utc>,
    ) -> RepoResult<Option<Membership>> {
        self.conn
            .query_row(
                &format!(
                    "{MEMBERSHIP_SELECT_SQL}
                     WHERE member_number = ?1
                       AND (end_at IS NULL OR end_at > ?2)
                     ORDER BY end_at IS NULL DESC, begin_at DESC, membership_id DESC
                     LIMIT 1;"
                ),
                params![member_number, timestamp_to_db(at)],
                |row| Ok(parse_membership_row(row)),
            )
            .optional()?
            .transpose()
    }

    fn list_memberships(&self, member_number: MemberNumber) -> RepoResult<Vec<Membership>> {
        let mut stmt = self.conn.prepare(&format!(
            "{MEMBERSHIP_SELECT_SQL}
             WHERE member_number = ?1
             ORDER BY begin_at ASC, membership_id ASC;"
        ))?;
        let mut rows = stmt.query([member_number])?;
        let mut memberships = Vec::new();
        while let Some(row) = rows.next()? {
            memberships.push(parse_membership_row(row)?);
        }
        Ok(memberships)
    }

    fn close_membership(
        &self,
        membership_id: MembershipId,
        end: DateTime<Utc>,
    ) -> RepoResult<()> {
        let end_millis = timestamp_to_db(end);
        let changed = self.conn.execute(
            "UPDATE memberships
             SET end_at = ?2
             WHERE membership_id = ?1
               AND end_at IS NULL
               AND begin_at <= ?2;",
            params![membership_id, end_millis],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound {
                entity: "active membership",
                id: membership_id,
            });
        }

        Ok(())
    }
}

/// Parses a membership from a row selected with the `memberships` column names.
pub(crate) fn parse_membership_row(row: &Row<'_>) -> RepoResult<Membership> {
    let begin_millis: i64 = row.get("begin_at")?;
    let end = match row.get::<_, Option<i64>>("end_at")? {
        Some(millis) => Some(parse_timestamp(millis, "memberships.end_at")?),
        None => None,
    };

    let membership = Membership {
        membership_id: row.get("membership_id")?,
        member_number: row.get("member_number")?,
        begin: parse_timestamp(begin_millis, "memberships.begin_at")?,
        end,
    };
    membership.validate()?;
    Ok(membership)
}
