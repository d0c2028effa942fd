use cashdesk_core::db::open_db_in_memory;
use cashdesk_core::{
    DepositRepository, MemberRepository, MembershipRepository, NewDeposit, NewMember,
    NewMembership, RepoError, SqliteDepositRepository, SqliteMemberRepository,
    SqliteMembershipRepository,
};
use chrono::{Duration, NaiveDate, TimeZone, Utc};
use rusqlite::Connection;
use rust_decimal::Decimal;

fn birthday() -> NaiveDate {
    NaiveDate::from_ymd_opt(1990, 1, 1).unwrap()
}

fn insert_member(conn: &Connection, last_name: &str) -> i64 {
    SqliteMemberRepository::try_new(conn)
        .unwrap()
        .create_member(&NewMember::new("Ann", last_name, birthday()))
        .unwrap()
        .member_number
}

#[test]
fn create_get_and_list_members() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteMemberRepository::try_new(&conn).unwrap();

    let lee = repo
        .create_member(&NewMember::new("Ann", "Lee", birthday()))
        .unwrap();
    let kim = repo
        .create_member(&NewMember::new("Bo", "Kim", birthday()))
        .unwrap();
    assert_ne!(lee.member_number, kim.member_number);

    let loaded = repo.get_member(lee.member_number).unwrap().unwrap();
    assert_eq!(loaded, lee);
    assert_eq!(repo.find_by_last_name("Kim").unwrap(), Some(kim.clone()));
    assert!(repo.find_by_last_name("Park").unwrap().is_none());

    let all = repo.list_members().unwrap();
    assert_eq!(all, vec![lee, kim]);
}

#[test]
fn duplicate_last_name_hits_unique_index() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteMemberRepository::try_new(&conn).unwrap();

    repo.create_member(&NewMember::new("Ann", "Lee", birthday()))
        .unwrap();
    let err = repo
        .create_member(&NewMember::new("Bo", "Lee", birthday()))
        .unwrap_err();
    assert!(matches!(err, RepoError::UniqueViolation(_)));
}

#[test]
fn blank_names_are_rejected_before_sql() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteMemberRepository::try_new(&conn).unwrap();

    let err = repo
        .create_member(&NewMember::new("Ann", "  ", birthday()))
        .unwrap_err();
    assert!(matches!(err, RepoError::Validation(_)));
    assert!(repo.list_members().unwrap().is_empty());
}

#[test]
fn delete_missing_member_is_not_found() {
    let conn = open_db_in_memory().unwrap();
    let repo = SqliteMemberRepository::try_new(&conn).unwrap();

    let err = repo.delete_member(99).unwrap_err();
    assert!(matches!(
        err,
        RepoError::NotFound {
            entity: "member",
            id: 99
        }
    ));
}

#[test]
fn partial_index_allows_one_open_membership_per_member() {
    let conn = open_db_in_memory().unwrap();
    let member_number = insert_member(&conn, "Lee");
    let repo = SqliteMembershipRepository::try_new(&conn).unwrap();
    let begin = Utc.with_ymd_and_hms(2024, 1, 10, 9, 0, 0).unwrap();

    let first = repo
        .create_membership(&NewMembership::open(member_number, begin))
        .unwrap();
    assert!(repo.has_open_membership(member_number).unwrap());

    let err = repo
        .create_membership(&NewMembership::open(member_number, begin))
        .unwrap_err();
    assert!(matches!(err, RepoError::UniqueViolation(_)));

    repo.close_membership(first.membership_id, begin + Duration::days(1))
        .unwrap();
    assert!(!repo.has_open_membership(member_number).unwrap());
    repo.create_membership(&NewMembership::open(member_number, begin + Duration::days(2)))
        .unwrap();
}

#[test]
fn close_membership_never_rewrites_an_ended_membership() {
    let conn = open_db_in_memory().unwrap();
    let member_number = insert_member(&conn, "Lee");
    let repo = SqliteMembershipRepository::try_new(&conn).unwrap();
    let begin = Utc.with_ymd_and_hms(2024, 1, 10, 9, 0, 0).unwrap();
    let end = begin + Duration::days(5);

    let membership = repo
        .create_membership(&NewMembership::open(member_number, begin))
        .unwrap();
    repo.close_membership(membership.membership_id, end).unwrap();

    let err = repo
        .close_membership(membership.membership_id, end + Duration::days(1))
        .unwrap_err();
    assert!(matches!(err, RepoError::NotFound { .. }));

    let stored = repo.get_membership(membership.membership_id).unwrap().unwrap();
    assert_eq!(stored.end, Some(end));
}

#[test]
fn find_active_membership_honours_future_end() {
    let conn = open_db_in_memory().unwrap();
    let member_number = insert_member(&conn, "Lee");
    let repo = SqliteMembershipRepository::try_new(&conn).unwrap();
    let begin = Utc.with_ymd_and_hms(2024, 1, 10, 9, 0, 0).unwrap();
    let end = begin + Duration::days(30);

    let membership = repo
        .create_membership(&NewMembership::open(member_number, begin))
        .unwrap();
    repo.close_membership(membership.membership_id, end).unwrap();

    let before_end = repo
        .find_active_membership(member_number, begin + Duration::days(10))
        .unwrap();
    assert_eq!(
        before_end.map(|m| m.membership_id),
        Some(membership.membership_id)
    );
    assert!(repo
        .find_active_membership(member_number, end + Duration::days(1))
        .unwrap()
        .is_none());
}

#[test]
fn membership_is_not_active_at_its_end_and_cannot_be_closed_again() {
    let conn = open_db_in_memory().unwrap();
    let member_number = insert_member(&conn, "Lee");
    let repo = SqliteMembershipRepository::try_new(&conn).unwrap();
    let begin = Utc.with_ymd_and_hms(2024, 1, 10, 9, 0, 0).unwrap();
    let end = begin + Duration::milliseconds(1);

    let membership = repo
        .create_membership(&NewMembership::open(member_number, begin))
        .unwrap();
    repo.close_membership(membership.membership_id, end).unwrap();

    assert!(repo
        .find_active_membership(member_number, end)
        .unwrap()
        .is_none());
    let err = repo
        .close_membership(membership.membership_id, end)
        .unwrap_err();
    assert!(matches!(err, RepoError::NotFound { .. }));
}

#[test]
fn list_memberships_orders_by_begin() {
    let conn = open_db_in_memory().unwrap();
    let member_number = insert_member(&conn, "Lee");
    let repo = SqliteMembershipRepository::try_new(&conn).unwrap();
    let early = Utc.with_ymd_and_hms(2022, 6, 1, 0, 0, 0).unwrap();
    let late = Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap();

    let second = repo
        .create_membership(&NewMembership::open(member_number, late))
        .unwrap();
    repo.close_membership(second.membership_id, late + Duration::days(1))
        .unwrap();
    let first = repo
        .create_membership(&NewMembership::open(member_number, early))
        .unwrap();

    let ids: Vec<_> = repo
        .list_memberships(member_number)
        .unwrap()
        .into_iter()
        .map(|m| m.membership_id)
        .collect();
    assert_eq!(ids, vec![first.membership_id, second.membership_id]);
}

#[test]
fn deleting_member_cascades_to_memberships_and_deposits() {
    let conn = open_db_in_memory().unwrap();
    let member_number = insert_member(&conn, "Lee");
    let memberships = SqliteMembershipRepository::try_new(&conn).unwrap();
    let deposits = SqliteDepositRepository::try_new(&conn).unwrap();
    let membership = memberships
        .create_membership(&NewMembership::open(member_number, Utc::now()))
        .unwrap();
    deposits
        .create_deposit(&NewDeposit {
            membership_id: membership.membership_id,
            amount: Decimal::new(5000, 2),
        })
        .unwrap();

    SqliteMemberRepository::try_new(&conn)
        .unwrap()
        .delete_member(member_number)
        .unwrap();

    assert!(memberships
        .get_membership(membership.membership_id)
        .unwrap()
        .is_none());
    assert!(deposits
        .list_deposits(membership.membership_id)
        .unwrap()
        .is_empty());
    assert!(deposits.list_deposits_with_owners().unwrap().is_empty());
}

#[test]
fn deposits_round_trip_exact_decimal_amounts() {
    let conn = open_db_in_memory().unwrap();
    let member_number = insert_member(&conn, "Lee");
    let membership = SqliteMembershipRepository::try_new(&conn)
        .unwrap()
        .create_membership(&NewMembership::open(member_number, Utc::now()))
        .unwrap();
    let repo = SqliteDepositRepository::try_new(&conn).unwrap();

    for cents in [10, 20, 0] {
        repo.create_deposit(&NewDeposit {
            membership_id: membership.membership_id,
            amount: Decimal::new(cents, 2),
        })
        .unwrap();
    }

    let amounts: Vec<_> = repo
        .list_deposits(membership.membership_id)
        .unwrap()
        .into_iter()
        .map(|d| d.amount)
        .collect();
    assert_eq!(
        amounts,
        vec![Decimal::new(10, 2), Decimal::new(20, 2), Decimal::ZERO]
    );

    let owners = repo.list_deposits_with_owners().unwrap();
    assert_eq!(owners.len(), 3);
    assert_eq!(owners[0].member.last_name, "Lee");
    assert_eq!(owners[0].membership, membership);
}

#[test]
fn negative_deposit_is_rejected_by_repository() {
    let conn = open_db_in_memory().unwrap();
    let member_number = insert_member(&conn, "Lee");
    let membership = SqliteMembershipRepository::try_new(&conn)
        .unwrap()
        .create_membership(&NewMembership::open(member_number, Utc::now()))
        .unwrap();

    let err = SqliteDepositRepository::try_new(&conn)
        .unwrap()
        .create_deposit(&NewDeposit {
            membership_id: membership.membership_id,
            amount: Decimal::new(-1, 0),
        })
        .unwrap_err();
    assert!(matches!(err, RepoError::Validation(_)));
}

#[test]
fn corrupt_amount_is_reported_not_masked() {
    let conn = open_db_in_memory().unwrap();
    let member_number = insert_member(&conn, "Lee");
    let membership = SqliteMembershipRepository::try_new(&conn)
        .unwrap()
        .create_membership(&NewMembership::open(member_number, Utc::now()))
        .unwrap();
    conn.execute(
        "INSERT INTO deposits (membership_id, amount) VALUES (?1, 'abc');",
        [membership.membership_id],
    )
    .unwrap();

    let err = SqliteDepositRepository::try_new(&conn)
        .unwrap()
        .list_deposits(membership.membership_id)
        .unwrap_err();
    assert!(matches!(err, RepoError::InvalidData(_)));
}
