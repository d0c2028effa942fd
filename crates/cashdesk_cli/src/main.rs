//! CLI smoke entry point.
//!
//! # Responsibility
//! - Verify `cashdesk_core` linkage by running one in-memory desk session.
//! - Write the session's log events under the system temp directory.
//! - Keep output deterministic apart from the current year.

use cashdesk_core::{
    core_version, default_log_level, flush_logging, init_logging, CashDesk, CashDeskConfig,
    CashDeskResult,
};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::path::PathBuf;
use std::process::ExitCode;

fn main() -> ExitCode {
    println!("cashdesk_core version={}", core_version());

    let log_dir = smoke_log_dir();
    match log_dir
        .to_str()
        .ok_or_else(|| format!("log_dir `{}` is not valid UTF-8", log_dir.display()))
        .and_then(|dir| init_logging(default_log_level(), dir))
    {
        Ok(()) => println!("log_dir={}", log_dir.display()),
        Err(err) => eprintln!("logging disabled: {err}"),
    }

    let outcome = run_smoke_session();
    flush_logging();
    match outcome {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("cashdesk smoke session failed: error_code={} error={err}", err.code());
            ExitCode::FAILURE
        }
    }
}

fn smoke_log_dir() -> PathBuf {
    std::env::temp_dir().join("cashdesk-cli").join("logs")
}

fn run_smoke_session() -> CashDeskResult<()> {
    let mut desk = CashDesk::new(CashDeskConfig::in_memory());
    desk.initialize()?;

    let birthday = NaiveDate::from_ymd_opt(1990, 1, 1).unwrap_or_default();
    let member_number = desk.add_member("Ann", "Lee", birthday)?;
    desk.join_member(member_number)?;
    desk.deposit(member_number, Decimal::from(50))?;
    desk.deposit(member_number, Decimal::from(75))?;

    for statistic in desk.get_statistics()? {
        println!(
            "member={} year={} total_amount={}",
            statistic.member.member_number, statistic.year, statistic.total_amount
        );
    }

    desk.dispose();
    Ok(())
}
