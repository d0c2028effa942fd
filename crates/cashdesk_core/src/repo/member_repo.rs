//! Member repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Create, look up and delete member rows.
//! - Answer the last-name uniqueness predicate.
//!
//! # Invariants
//! - Deleting a member relies on `ON DELETE CASCADE` to drop its
//!   memberships and, transitively, their deposits.
//! - `members.last_name` carries a unique index; duplicates surface as
//!   `RepoError::UniqueViolation`.

use super::{date_to_db, ensure_connection_ready, parse_date, RepoError, RepoResult};
use crate::model::member::{Member, MemberNumber, NewMember};
use rusqlite::{params, Connection, OptionalExtension, Row};

const MEMBER_SELECT_SQL: &str = "SELECT
    member_number,
    first_name,
    last_name,
    birthday
FROM members";

const MEMBER_COLUMNS: &[&str] = &["member_number", "first_name", "last_name", "birthday"];

/// Repository interface for member records.
pub trait MemberRepository {
    fn create_member(&self, member: &NewMember) -> RepoResult<Member>;
    fn get_member(&self, member_number: MemberNumber) -> RepoResult<Option<Member>>;
    /// Finds any member, active or not, carrying `last_name`.
    fn find_by_last_name(&self, last_name: &str) -> RepoResult<Option<Member>>;
    /// Lists all members ordered by member number.
    fn list_members(&self) -> RepoResult<Vec<Member>>;
    /// Deletes a member together with its memberships and deposits.
    fn delete_member(&self, member_number: MemberNumber) -> RepoResult<()>;
}

/// SQLite-backed member repository.
pub struct SqliteMemberRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteMemberRepository<'conn> {
    /// Constructs a repository from a migrated connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn, "members", MEMBER_COLUMNS)?;
        Ok(Self { conn })
    }
}

impl MemberRepository for SqliteMemberRepository<'_> {
    fn create_member(&self, member: &NewMember) -> RepoResult<Member> {
        member.validate()?;

        self.conn.execute(
            "INSERT INTO members (first_name, last_name, birthday)
             VALUES (?1, ?2, ?3);",
            params![
                member.first_name.as_str(),
                member.last_name.as_str(),
                date_to_db(member.birthday),
            ],
        )?;

        Ok(Member {
            member_number: self.conn.last_insert_rowid(),
            first_name: member.first_name.clone(),
            last_name: member.last_name.clone(),
            birthday: member.birthday,
        })
    }

    fn get_member(&self, member_number: MemberNumber) -> RepoResult<Option<Member>> {
        self.conn
            .query_row(
                &format!("{MEMBER_SELECT_SQL} WHERE member_number = ?1;"),
                [member_number],
                |row| Ok(parse_member_row(row)),
            )
            .optional()?
            .transpose()
    }

    fn find_by_last_name(&self, last_name: &str) -> RepoResult<Option<Member>> {
        self.conn
            .query_row(
                &format!("{MEMBER_SELECT_SQL} WHERE last_name = ?1 LIMIT 1;"),
                [last_name],
                |row| Ok(parse_member_row(row)),
            )
            .optional()?
            .transpose()
    }

    fn list_members(&self) -> RepoResult<Vec<Member>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{MEMBER_SELECT_SQL} ORDER BY member_number ASC;"))?;
        let mut rows = stmt.query([])?;
        let mut members = Vec::new();
        while let Some(row) = rows.next()? {
            members.push(parse_member_row(row)?);
        }
        Ok(members)
    }

    fn delete_member(&self, member_number: MemberNumber) -> RepoResult<()> {
        let changed = self.conn.execute(
            "DELETE FROM members WHERE member_number = ?1;",
            [member_number],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound {
                entity: "member",
                id: member_number,
            });
        }

        Ok(())
    }
}

/// Parses a member from a row selected with the `members` column names.
pub(crate) fn parse_member_row(row: &Row<'_>) -> RepoResult<Member> {
    let birthday_text: String = row.get("birthday")?;
    let member = Member {
        member_number: row.get("member_number")?,
        first_name: row.get("first_name")?,
        last_name: row.get("last_name")?,
        birthday: parse_date(&birthday_text, "members.birthday")?,
    };
    member.validate()?;
    Ok(member)
}
