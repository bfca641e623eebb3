use chrono::{TimeZone, Utc};

use spr_stats::contract::{error::SprStatsError, model::*};
use spr_stats::domain::error::DomainError;
use spr_stats::domain::{filter, identifier, roster, stats};

#[test]
fn test_contract_errors_from_domain() {
    let err: SprStatsError = DomainError::user_not_found("zed").into();
    assert_eq!(err, SprStatsError::not_found("zed"));

    let err: SprStatsError = DomainError::production_release_exists(Territory::Pscc).into();
    match err {
        SprStatsError::Conflict { message } => assert!(message.contains("PSCC")),
        other => panic!("Expected Conflict error, got {other:?}"),
    }

    let date = Utc.with_ymd_and_hms(2030, 1, 1, 0, 0, 0).unwrap();
    let err: SprStatsError = DomainError::production_is_future(date).into();
    assert!(matches!(err, SprStatsError::Validation { .. }));

    let err: SprStatsError = DomainError::source("disk on fire").into();
    assert_eq!(err, SprStatsError::Unavailable);
    // source details stay internal
    assert!(!err.to_string().contains("disk"));
}

#[test]
fn test_end_to_end_pure_pipeline() {
    let users = vec![
        User::new(1, "sys").with_first_name("System"),
        User::new(2, "ann").with_first_name("Ann"),
    ];
    let records: Vec<Spr> = serde_json::from_str(
        r#"[
            { "territory": "CETC WEST", "number": 42, "resolution": "NEW", "user": { "login": "ann" } },
            { "territory": "CHICAGO", "number": 7, "resolution": "REVIEWED", "user": { "login": "ann" } },
            { "territory": "UNIFIED", "number": 1, "resolution": "NEW" }
        ]"#,
    )
    .unwrap();

    let roster = roster::sanitize(&users);
    assert_eq!(roster.len(), 1);
    let ann = &roster[0];

    let open_ids: Vec<String> = filter::open_records_of(ann, &records)
        .into_iter()
        .map(Spr::identifier)
        .collect();
    assert_eq!(open_ids, vec!["CW-42"]);
    assert_eq!(identifier::format_identifier(&records[1].territory, 7), "UN-7");
    assert_eq!(records[2].identifier(), "UN-1");

    let share = stats::percentage_owned(ann, &records);
    assert_eq!(share.percentage, 67);
    assert_eq!(stats::count_reviewed(ann, &records), 1);
}

#[test]
fn test_unassigned_records_count_towards_total_only() {
    let ann = User::new(1, "ann");
    let records = vec![
        Spr::new(Territory::Sed, 1).with_resolution(Resolution::New),
        Spr::new(Territory::Sed, 2)
            .owned_by(ann.clone())
            .with_resolution(Resolution::New),
    ];
    assert_eq!(stats::count_open(&ann, &records), 1);
    assert_eq!(filter::open_records(&records).len(), 2);
    assert_eq!(stats::percentage_owned(&ann, &records).percentage, 50);
}

#[test]
fn test_model_serializes_camel_case() {
    let share = OwnershipShare {
        total: 10,
        owned_by_user: 3,
        percentage: 30,
    };
    let v = serde_json::to_value(UserShare {
        login: "ann".into(),
        share,
    })
    .unwrap();
    assert_eq!(
        v,
        serde_json::json!({ "login": "ann", "total": 10, "ownedByUser": 3, "percentage": 30 })
    );
}
