//! Yearly deposit statistics.
//!
//! # Invariants
//! - Deposits are bucketed by the begin year of their owning membership,
//!   not by when the deposit was recorded.
//! - Output is ordered by `(member_number, year)`; repeated calls without
//!   writes in between return equal results.

use crate::error::CashDeskResult;
use crate::model::member::MemberNumber;
use crate::model::statistics::DepositStatistic;
use crate::repo::deposit_repo::DepositRepository;
use rust_decimal::Decimal;
use std::collections::BTreeMap;

/// Read-only aggregation over all stored deposits.
pub struct StatisticsAggregator<D: DepositRepository> {
    deposits: D,
}

impl<D: DepositRepository> StatisticsAggregator<D> {
    pub fn new(deposits: D) -> Self {
        Self { deposits }
    }

    /// Sums deposits per member and membership begin year.
    ///
    /// Returns an empty list when no deposits exist.
    pub fn get_statistics(&self) -> CashDeskResult<Vec<DepositStatistic>> {
        let mut groups: BTreeMap<(MemberNumber, i32), DepositStatistic> = BTreeMap::new();

        for item in self.deposits.list_deposits_with_owners()? {
            let year = item.membership.begin_year();
            let statistic = groups
                .entry((item.member.member_number, year))
                .or_insert_with(|| DepositStatistic {
                    member: item.member.clone(),
                    year,
                    total_amount: Decimal::ZERO,
                });
            statistic.total_amount += item.deposit.amount;
        }

        Ok(groups.into_values().collect())
    }
}
