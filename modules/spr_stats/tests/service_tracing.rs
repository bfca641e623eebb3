//! Service-layer operations run inside their tracing spans and return the expected data.

mod common;

use std::sync::Arc;

use chrono::{Duration, Utc};
use tracing_test::traced_test;

use common::MemorySource;
use spr_stats::domain::error::DomainError;
use spr_stats::domain::service::Service;
use spr_stats::model::{Release, Resolution, Territory};

fn service() -> (Arc<MemorySource>, Service) {
    let source = Arc::new(MemorySource::seeded());
    (source.clone(), Service::new(source))
}

#[traced_test]
#[tokio::test]
async fn list_users_drops_system_accounts() {
    let (_, service) = service();
    let users = service.list_users().await.unwrap();
    let logins: Vec<&str> = users.iter().map(|u| u.login.as_str()).collect();
    assert_eq!(logins, vec!["ann", "bob"]);
}

#[traced_test]
#[tokio::test]
async fn per_user_counts() {
    let (_, service) = service();
    assert_eq!(service.count_open("ann").await.unwrap(), 2);
    assert_eq!(service.count_reviewed("ann").await.unwrap(), 1);
    assert_eq!(service.count_open("bob").await.unwrap(), 1);

    let open = service.open_sprs("ann").await.unwrap();
    let ids: Vec<String> = open.iter().map(|s| s.identifier()).collect();
    assert_eq!(ids, vec!["CW-1", "SED-3"]);

    let reviewed = service.reviewed_sprs("ann").await.unwrap();
    assert_eq!(reviewed[0].identifier(), "AH-2");
}

#[traced_test]
#[tokio::test]
async fn ownership_and_summary() {
    let (_, service) = service();
    let share = service.ownership("ann").await.unwrap();
    assert_eq!((share.total, share.owned_by_user, share.percentage), (4, 3, 75));

    let summary = service.user_summary("bob").await.unwrap();
    assert_eq!(summary.open, 1);
    assert_eq!(summary.reviewed, 0);
    assert_eq!(summary.share.percentage, 25);
}

#[traced_test]
#[tokio::test]
async fn unknown_login_is_not_found() {
    let (_, service) = service();
    let err = service.count_open("zed").await.unwrap_err();
    assert!(matches!(err, DomainError::UserNotFound { ref login } if login == "zed"));

    let err = service.count_open("").await.unwrap_err();
    assert!(matches!(err, DomainError::UserNotFound { .. }));
}

#[traced_test]
#[tokio::test]
async fn roster_wide_views() {
    let (_, service) = service();
    let counts = service.open_counts().await.unwrap();
    let pairs: Vec<(&str, usize)> = counts.iter().map(|t| (t.login.as_str(), t.open)).collect();
    assert_eq!(pairs, vec![("ann", 2), ("bob", 1)]);

    let breakdown = service.ownership_breakdown().await.unwrap();
    let pcts: Vec<u32> = breakdown.iter().map(|s| s.share.percentage).collect();
    assert_eq!(pcts, vec![75, 25]);
}

#[traced_test]
#[tokio::test]
async fn open_and_reviewed_records_across_owners() {
    let (source, service) = service();
    source.push_spr(common::spr(5, Territory::Unified, "", Resolution::New));

    let open: Vec<String> = service
        .all_open_sprs()
        .await
        .unwrap()
        .iter()
        .map(|s| s.identifier())
        .collect();
    assert_eq!(open, vec!["CW-1", "SED-3", "NED-4", "UN-5"]);

    let reviewed = service.all_reviewed_sprs().await.unwrap();
    assert_eq!(reviewed.len(), 1);
    assert_eq!(reviewed[0].identifier(), "AH-2");
}

#[traced_test]
#[tokio::test]
async fn ownership_chart_rows() {
    let (_, service) = service();
    let rows = service.ownership_chart().await.unwrap();
    let cells: Vec<(&str, usize, usize, u32)> = rows
        .iter()
        .map(|r| (r.login.as_str(), r.open, r.reviewed, r.share.percentage))
        .collect();
    assert_eq!(cells, vec![("ann", 2, 1, 75), ("bob", 1, 0, 25)]);
}

#[traced_test]
#[tokio::test]
async fn release_views_and_validation() {
    let (_, service) = service();
    let current = service.current_releases().await.unwrap();
    assert_eq!(current.len(), 1);
    assert_eq!(current[0].id, 1);

    let future = service.future_releases().await.unwrap();
    assert_eq!(future.len(), 1);
    assert_eq!(future[0].id, 2);

    let mut second = Release::new(Territory::Sed, Utc::now() - Duration::days(1));
    second.id = 3;
    second.current = true;
    let err = service.validate_release(&second).await.unwrap_err();
    assert!(matches!(err, DomainError::ProductionReleaseExists { .. }));

    let mut ahead = Release::new(Territory::Ned, Utc::now() + Duration::days(3));
    ahead.current = true;
    let err = service.validate_release(&ahead).await.unwrap_err();
    assert!(matches!(err, DomainError::ProductionIsFuture { .. }));

    let mut fine = Release::new(Territory::Ned, Utc::now() - Duration::days(3));
    fine.current = true;
    assert!(service.validate_release(&fine).await.is_ok());
}

#[traced_test]
#[tokio::test]
async fn source_failure_maps_to_source_error() {
    let (source, service) = service();
    source.set_failing(true);
    let err = service.open_counts().await.unwrap_err();
    match err {
        DomainError::Source { message } => assert!(message.contains("tracker offline")),
        other => panic!("expected Source error, got {other:?}"),
    }
}
