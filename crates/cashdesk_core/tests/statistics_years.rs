use cashdesk_core::db::open_db_in_memory;
use cashdesk_core::{
    CashDeskError, DepositRecorder, MemberRegistry, MembershipLedger, SqliteDepositRepository,
    SqliteMemberRepository, SqliteMembershipRepository, StatisticsAggregator,
};
use chrono::{Duration, NaiveDate, TimeZone, Utc};
use rusqlite::Connection;
use rust_decimal::Decimal;

fn registry(conn: &Connection) -> MemberRegistry<SqliteMemberRepository<'_>> {
    MemberRegistry::new(SqliteMemberRepository::try_new(conn).unwrap())
}

fn ledger(
    conn: &Connection,
) -> MembershipLedger<SqliteMemberRepository<'_>, SqliteMembershipRepository<'_>> {
    MembershipLedger::new(
        SqliteMemberRepository::try_new(conn).unwrap(),
        SqliteMembershipRepository::try_new(conn).unwrap(),
    )
}

fn recorder(
    conn: &Connection,
) -> DepositRecorder<
    SqliteMemberRepository<'_>,
    SqliteMembershipRepository<'_>,
    SqliteDepositRepository<'_>,
> {
    DepositRecorder::new(
        SqliteMemberRepository::try_new(conn).unwrap(),
        SqliteMembershipRepository::try_new(conn).unwrap(),
        SqliteDepositRepository::try_new(conn).unwrap(),
    )
}

fn aggregator(conn: &Connection) -> StatisticsAggregator<SqliteDepositRepository<'_>> {
    StatisticsAggregator::new(SqliteDepositRepository::try_new(conn).unwrap())
}

#[test]
fn deposits_are_bucketed_by_membership_begin_year() {
    let conn = open_db_in_memory().unwrap();
    let ann = registry(&conn)
        .add_member("Ann", "Lee", NaiveDate::from_ymd_opt(1990, 1, 1).unwrap())
        .unwrap();
    let ledger = ledger(&conn);
    let recorder = recorder(&conn);

    // Joined late 2022; the January 2023 deposit still counts for 2022.
    let joined_2022 = Utc.with_ymd_and_hms(2022, 12, 20, 12, 0, 0).unwrap();
    ledger.join_member_at(ann, joined_2022).unwrap();
    recorder
        .deposit_at(ann, Decimal::from(40), joined_2022 + Duration::days(1))
        .unwrap();
    recorder
        .deposit_at(ann, Decimal::from(60), joined_2022 + Duration::days(20))
        .unwrap();
    ledger
        .cancel_membership_at(ann, joined_2022 + Duration::days(30))
        .unwrap();

    let joined_2024 = Utc.with_ymd_and_hms(2024, 2, 1, 8, 0, 0).unwrap();
    ledger.join_member_at(ann, joined_2024).unwrap();
    recorder
        .deposit_at(ann, Decimal::new(1550, 2), joined_2024 + Duration::hours(1))
        .unwrap();

    let by_year: Vec<_> = aggregator(&conn)
        .get_statistics()
        .unwrap()
        .into_iter()
        .map(|s| (s.year, s.total_amount))
        .collect();
    assert_eq!(
        by_year,
        vec![
            (2022, Decimal::from(100)),
            (2024, Decimal::new(1550, 2)),
        ]
    );
}

#[test]
fn deposit_after_end_is_rejected_but_before_end_is_accepted() {
    let conn = open_db_in_memory().unwrap();
    let ann = registry(&conn)
        .add_member("Ann", "Lee", NaiveDate::from_ymd_opt(1990, 1, 1).unwrap())
        .unwrap();
    let ledger = ledger(&conn);
    let recorder = recorder(&conn);

    let begin = Utc.with_ymd_and_hms(2023, 3, 1, 0, 0, 0).unwrap();
    let end = begin + Duration::days(90);
    let membership = ledger.join_member_at(ann, begin).unwrap();
    let closed = ledger.cancel_membership_at(ann, end).unwrap();
    assert_eq!(closed.membership_id, membership.membership_id);
    assert_eq!(closed.end, Some(end));

    recorder
        .deposit_at(ann, Decimal::from(5), end - Duration::days(1))
        .unwrap();
    let err = recorder
        .deposit_at(ann, Decimal::from(5), end + Duration::seconds(1))
        .unwrap_err();
    assert!(matches!(err, CashDeskError::NoActiveMembership(_)));
}

#[test]
fn cancel_before_begin_finds_no_active_membership() {
    let conn = open_db_in_memory().unwrap();
    let ann = registry(&conn)
        .add_member("Ann", "Lee", NaiveDate::from_ymd_opt(1990, 1, 1).unwrap())
        .unwrap();
    let ledger = ledger(&conn);

    let begin = Utc.with_ymd_and_hms(2023, 3, 1, 0, 0, 0).unwrap();
    ledger.join_member_at(ann, begin).unwrap();

    let err = ledger
        .cancel_membership_at(ann, begin - Duration::days(1))
        .unwrap_err();
    assert!(matches!(err, CashDeskError::NoActiveMembership(_)));
    assert!(ledger.list_memberships(ann).unwrap()[0].is_open());
}

#[test]
fn deposit_at_the_cancel_instant_is_rejected() {
    let conn = open_db_in_memory().unwrap();
    let ann = registry(&conn)
        .add_member("Ann", "Lee", NaiveDate::from_ymd_opt(1990, 1, 1).unwrap())
        .unwrap();
    let ledger = ledger(&conn);
    let recorder = recorder(&conn);

    let begin = Utc.with_ymd_and_hms(2023, 3, 1, 0, 0, 0).unwrap();
    let end = begin + Duration::milliseconds(250);
    let membership = ledger.join_member_at(ann, begin).unwrap();
    ledger.cancel_membership_at(ann, end).unwrap();

    let err = recorder
        .deposit_at(ann, Decimal::from(10), end)
        .unwrap_err();
    assert!(matches!(err, CashDeskError::NoActiveMembership(n) if n == ann));
    assert!(recorder
        .list_deposits(membership.membership_id)
        .unwrap()
        .is_empty());
}

#[test]
fn second_cancel_at_the_same_instant_leaves_the_end_untouched() {
    let conn = open_db_in_memory().unwrap();
    let ann = registry(&conn)
        .add_member("Ann", "Lee", NaiveDate::from_ymd_opt(1990, 1, 1).unwrap())
        .unwrap();
    let ledger = ledger(&conn);

    let begin = Utc.with_ymd_and_hms(2023, 3, 1, 0, 0, 0).unwrap();
    let end = begin + Duration::days(10);
    ledger.join_member_at(ann, begin).unwrap();
    ledger.cancel_membership_at(ann, end).unwrap();

    for at in [end, end - Duration::days(1)] {
        let err = ledger.cancel_membership_at(ann, at).unwrap_err();
        assert!(matches!(err, CashDeskError::NoActiveMembership(n) if n == ann));
    }
    let history = ledger.list_memberships(ann).unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].end, Some(end));
}

#[test]
fn rejoin_at_the_cancel_instant_takes_the_deposit() {
    let conn = open_db_in_memory().unwrap();
    let ann = registry(&conn)
        .add_member("Ann", "Lee", NaiveDate::from_ymd_opt(1990, 1, 1).unwrap())
        .unwrap();
    let ledger = ledger(&conn);
    let recorder = recorder(&conn);

    let begin = Utc.with_ymd_and_hms(2023, 3, 1, 0, 0, 0).unwrap();
    let end = begin + Duration::days(10);
    let first = ledger.join_member_at(ann, begin).unwrap();
    ledger.cancel_membership_at(ann, end).unwrap();
    let second = ledger.join_member_at(ann, end).unwrap();

    let deposit = recorder.deposit_at(ann, Decimal::from(20), end).unwrap();
    assert_eq!(deposit.membership_id, second.membership_id);
    assert!(recorder
        .list_deposits(first.membership_id)
        .unwrap()
        .is_empty());
}
