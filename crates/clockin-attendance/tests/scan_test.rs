//! Integration tests for the scan state machine using in-memory
//! SurrealDB.

use chrono::{Duration, NaiveDate, NaiveDateTime};
use clockin_attendance::roster::{EmployeeInput, EmployeeService};
use clockin_attendance::scan::{AttendanceService, COOLDOWN_SECONDS, ScanAction};
use clockin_core::error::ClockinError;
use clockin_core::identity;
use clockin_core::models::time_entry::EntryStatus;
use clockin_core::repository::TimeEntryRepository;
use clockin_db::repository::{SurrealEmployeeRepository, SurrealTimeEntryRepository};
use surrealdb::Surreal;
use surrealdb::engine::local::Mem;
use uuid::Uuid;

type Db = surrealdb::engine::local::Db;

struct Fixture {
    roster: EmployeeService<SurrealEmployeeRepository<Db>, SurrealTimeEntryRepository<Db>>,
    attendance: AttendanceService<SurrealEmployeeRepository<Db>, SurrealTimeEntryRepository<Db>>,
    entry_repo: SurrealTimeEntryRepository<Db>,
}

async fn setup() -> Fixture {
    let db = Surreal::new::<Mem>(()).await.unwrap();
    db.use_ns("test").use_db("test").await.unwrap();
    clockin_db::run_migrations(&db).await.unwrap();

    Fixture {
        roster: EmployeeService::new(
            SurrealEmployeeRepository::new(db.clone()),
            SurrealTimeEntryRepository::new(db.clone()),
        ),
        attendance: AttendanceService::new(
            SurrealEmployeeRepository::new(db.clone()),
            SurrealTimeEntryRepository::new(db.clone()),
        ),
        entry_repo: SurrealTimeEntryRepository::new(db.clone()),
    }
}

fn employee_input(number: &str) -> EmployeeInput {
    EmployeeInput {
        name: "Jan".into(),
        surname: "Kowalski".into(),
        position: "Technician".into(),
        number: number.into(),
    }
}

fn t0() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2025, 3, 14)
        .unwrap()
        .and_hms_opt(8, 0, 0)
        .unwrap()
}

#[tokio::test]
async fn minted_token_decodes_to_company_and_number() {
    let fx = setup().await;
    let company_id = Uuid::new_v4();

    let employee = fx
        .roster
        .create(company_id, employee_input("E1"))
        .await
        .unwrap();

    let decoded = identity::decode(&employee.identity_token).unwrap();
    assert_eq!(decoded.company_id, company_id);
    assert_eq!(decoded.employee_number, "E1");
}

#[tokio::test]
async fn scan_toggles_with_cooldown() {
    let fx = setup().await;
    let company_id = Uuid::new_v4();
    let employee = fx
        .roster
        .create(company_id, employee_input("E1"))
        .await
        .unwrap();
    let token = employee.identity_token.clone();

    // First scan opens the day.
    let check_in = fx
        .attendance
        .scan_at(company_id, &token, t0())
        .await
        .unwrap();
    assert_eq!(check_in.action, ScanAction::CheckIn);
    assert_eq!(check_in.employee, "Jan Kowalski");
    assert_eq!(check_in.cooldown_seconds, COOLDOWN_SECONDS);
    assert_eq!(check_in.entry.status, EntryStatus::Working);

    // A second scan one second later hits the cooldown.
    let again = fx
        .attendance
        .scan_at(company_id, &token, t0() + Duration::seconds(1))
        .await;
    assert!(matches!(
        again,
        Err(ClockinError::RateLimited {
            retry_after_seconds: 4
        })
    ));

    // Past the cooldown the scan closes the day.
    let check_out = fx
        .attendance
        .scan_at(company_id, &token, t0() + Duration::seconds(6))
        .await
        .unwrap();
    assert_eq!(check_out.action, ScanAction::CheckOut);
    assert_eq!(check_out.entry.status, EntryStatus::Completed);
    assert_eq!(check_out.entry.check_in, Some(t0()));
    assert_eq!(check_out.entry.check_out, Some(t0() + Duration::seconds(6)));
    // Six seconds of work round down to zero hours.
    assert_eq!(check_out.entry.hours_worked(), Some(0.0));
}

#[tokio::test]
async fn cooldown_reports_whole_remaining_seconds() {
    let fx = setup().await;
    let company_id = Uuid::new_v4();
    let employee = fx
        .roster
        .create(company_id, employee_input("E1"))
        .await
        .unwrap();
    let token = employee.identity_token.clone();

    fx.attendance
        .scan_at(company_id, &token, t0())
        .await
        .unwrap();

    // 4.5s elapsed: floor(4.5) = 4, so one whole second remains.
    let result = fx
        .attendance
        .scan_at(company_id, &token, t0() + Duration::milliseconds(4_500))
        .await;
    assert!(matches!(
        result,
        Err(ClockinError::RateLimited {
            retry_after_seconds: 1
        })
    ));

    // At exactly five seconds the cooldown has elapsed.
    let accepted = fx
        .attendance
        .scan_at(company_id, &token, t0() + Duration::seconds(5))
        .await
        .unwrap();
    assert_eq!(accepted.action, ScanAction::CheckOut);
}

#[tokio::test]
async fn completed_cycle_cooldown_also_blocks() {
    let fx = setup().await;
    let company_id = Uuid::new_v4();
    let employee = fx
        .roster
        .create(company_id, employee_input("E1"))
        .await
        .unwrap();
    let token = employee.identity_token.clone();

    fx.attendance
        .scan_at(company_id, &token, t0())
        .await
        .unwrap();
    fx.attendance
        .scan_at(company_id, &token, t0() + Duration::seconds(10))
        .await
        .unwrap();

    // The day is Completed, but its last scan still arms the cooldown.
    let result = fx
        .attendance
        .scan_at(company_id, &token, t0() + Duration::seconds(12))
        .await;
    assert!(matches!(
        result,
        Err(ClockinError::RateLimited {
            retry_after_seconds: 3
        })
    ));
}

#[tokio::test]
async fn a_day_accumulates_multiple_cycles() {
    let fx = setup().await;
    let company_id = Uuid::new_v4();
    let employee = fx
        .roster
        .create(company_id, employee_input("E1"))
        .await
        .unwrap();
    let token = employee.identity_token.clone();

    for offset in [0, 10, 20, 30] {
        fx.attendance
            .scan_at(company_id, &token, t0() + Duration::seconds(offset))
            .await
            .unwrap();
    }

    let entries = fx
        .entry_repo
        .list_for_day(employee.id, t0().date())
        .await
        .unwrap();
    assert_eq!(entries.len(), 2);
    assert!(
        entries
            .iter()
            .all(|e| e.status == EntryStatus::Completed)
    );
}

#[tokio::test]
async fn yesterdays_open_entry_does_not_leak_into_today() {
    let fx = setup().await;
    let company_id = Uuid::new_v4();
    let employee = fx
        .roster
        .create(company_id, employee_input("E1"))
        .await
        .unwrap();
    let token = employee.identity_token.clone();

    // A forgotten check-in from the previous day.
    let yesterday = t0().date().pred_opt().unwrap();
    fx.entry_repo
        .open_entry(employee.id, yesterday, yesterday.and_hms_opt(22, 0, 0).unwrap())
        .await
        .unwrap();

    // Today's scan opens a fresh entry rather than closing yesterday's.
    let outcome = fx
        .attendance
        .scan_at(company_id, &token, t0())
        .await
        .unwrap();
    assert_eq!(outcome.action, ScanAction::CheckIn);
    assert_eq!(outcome.entry.date, t0().date());
}

#[tokio::test]
async fn foreign_company_token_is_forbidden() {
    let fx = setup().await;
    let company_a = Uuid::new_v4();
    let company_b = Uuid::new_v4();

    // The employee exists — in the other company.
    let employee = fx
        .roster
        .create(company_b, employee_input("E9"))
        .await
        .unwrap();

    let result = fx
        .attendance
        .scan_at(company_a, &employee.identity_token, t0())
        .await;
    assert!(matches!(
        result,
        Err(ClockinError::AuthorizationDenied { .. })
    ));

    // A token naming a company that does not exist at all is rejected
    // the same way, before any employee lookup.
    let phantom = identity::encode(Uuid::new_v4(), "E9");
    let result = fx.attendance.scan_at(company_a, &phantom, t0()).await;
    assert!(matches!(
        result,
        Err(ClockinError::AuthorizationDenied { .. })
    ));
}

#[tokio::test]
async fn malformed_payload_is_a_validation_error() {
    let fx = setup().await;
    let company_id = Uuid::new_v4();

    for payload in ["garbage", "EMP_only-two_fields", ""] {
        let result = fx.attendance.scan_at(company_id, payload, t0()).await;
        assert!(matches!(result, Err(ClockinError::Validation { .. })));
    }
}

#[tokio::test]
async fn unknown_employee_number_is_not_found() {
    let fx = setup().await;
    let company_id = Uuid::new_v4();

    let token = identity::encode(company_id, "E404");
    let result = fx.attendance.scan_at(company_id, &token, t0()).await;
    assert!(matches!(result, Err(ClockinError::NotFound { .. })));
}
