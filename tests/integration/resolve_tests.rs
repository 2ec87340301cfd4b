//! End-to-end resolution over both client generations.

use rds_finder::testing::{InMemoryRds, InstanceFixture};
use rds_finder::{ApiGeneration, CallContext, ErrorKind, RESOURCE_ID_FILTER, ResolverConfig};
use test_case::test_case;

use crate::common::{self, RESOURCE_ID};

#[test_case(ApiGeneration::V1 ; "v1")]
#[test_case(ApiGeneration::V2 ; "v2")]
#[tokio::test]
async fn test_resource_id_found_in_one_query(generation: ApiGeneration) {
    common::init_tracing();
    let rds = common::fleet();

    let found = common::resolve(
        generation,
        &rds,
        ResolverConfig::default(),
        &CallContext::background(),
        RESOURCE_ID,
    )
    .await
    .unwrap();

    assert_eq!(found.identifier.as_deref(), Some("analytics"));
    let requests = rds.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].generation, generation);
    assert_eq!(
        requests[0].query.filter_values(RESOURCE_ID_FILTER),
        Some(&[RESOURCE_ID.to_string()][..])
    );
}

#[test_case(ApiGeneration::V1 ; "v1")]
#[test_case(ApiGeneration::V2 ; "v2")]
#[tokio::test]
async fn test_resource_id_shaped_identifier_falls_back_to_name(generation: ApiGeneration) {
    common::init_tracing();
    let rds = InMemoryRds::new();
    rds.insert(InstanceFixture::new(RESOURCE_ID, "db-SOMETHINGELSE000000000001"));

    let found = common::resolve(
        generation,
        &rds,
        ResolverConfig::default(),
        &CallContext::background(),
        RESOURCE_ID,
    )
    .await
    .unwrap();

    assert_eq!(found.identifier.as_deref(), Some(RESOURCE_ID));
    let requests = rds.requests();
    assert_eq!(requests.len(), 2);
    assert!(!requests[0].query.is_by_identifier());
    assert_eq!(
        requests[1].query.db_instance_identifier.as_deref(),
        Some(RESOURCE_ID)
    );
}

#[test_case(ApiGeneration::V1 ; "v1")]
#[test_case(ApiGeneration::V2 ; "v2")]
#[tokio::test]
async fn test_name_resolves_without_resource_id_query(generation: ApiGeneration) {
    let rds = common::fleet();

    let found = common::resolve(
        generation,
        &rds,
        ResolverConfig::default(),
        &CallContext::background(),
        "mydb-prod",
    )
    .await
    .unwrap();

    assert_eq!(found.resource_id.as_deref(), Some("db-PRODPRODPRODPRODPRODPROD01"));
    let requests = rds.requests();
    assert_eq!(requests.len(), 1);
    assert!(requests[0].query.is_by_identifier());
    assert!(requests[0].query.filters.is_empty());
}

#[test_case(ApiGeneration::V1 ; "v1")]
#[test_case(ApiGeneration::V2 ; "v2")]
#[tokio::test]
async fn test_duplicate_resource_id_is_multiple_results(generation: ApiGeneration) {
    let rds = InMemoryRds::new();
    rds.insert_all([
        InstanceFixture::new("first", "db-XYZ"),
        InstanceFixture::new("second", "db-XYZ"),
    ]);

    let err = common::resolve(
        generation,
        &rds,
        ResolverConfig::default(),
        &CallContext::background(),
        "db-XYZ",
    )
    .await
    .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::MultipleResults);
    assert_eq!(err.match_count(), Some(2));
    let ids = err.matched_ids();
    assert_eq!(ids, ["first (db-XYZ)", "second (db-XYZ)"]);
    assert_ne!(ids[0], ids[1]);
    assert!(err.to_string().contains("2 DB instances"));
    assert_eq!(rds.request_count(), 1);
}

#[test_case(ApiGeneration::V1 ; "v1")]
#[test_case(ApiGeneration::V2 ; "v2")]
#[tokio::test]
async fn test_unknown_name_is_not_found(generation: ApiGeneration) {
    let rds = common::fleet();

    let err = common::resolve(
        generation,
        &rds,
        ResolverConfig::default(),
        &CallContext::background(),
        "does-not-exist",
    )
    .await
    .unwrap_err();

    assert!(err.is_not_found());
    assert!(
        err.fault_code()
            .is_some_and(|code| code.starts_with("DBInstanceNotFound"))
    );
    assert_eq!(rds.request_count(), 1);
}

#[test_case(ApiGeneration::V1 ; "v1")]
#[test_case(ApiGeneration::V2 ; "v2")]
#[tokio::test]
async fn test_unknown_resource_id_exhausts_both_namespaces(generation: ApiGeneration) {
    let rds = common::fleet();

    let err = common::resolve(
        generation,
        &rds,
        ResolverConfig::default(),
        &CallContext::background(),
        "db-NOSUCHINSTANCE",
    )
    .await
    .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::NotFound);
    assert!(err.last_request().unwrap().is_by_identifier());
    assert_eq!(rds.request_count(), 2);
}

#[test_case(ApiGeneration::V1 ; "v1")]
#[test_case(ApiGeneration::V2 ; "v2")]
#[tokio::test]
async fn test_fallback_disabled_stops_after_resource_id(generation: ApiGeneration) {
    let rds = InMemoryRds::new();
    rds.insert(InstanceFixture::new(RESOURCE_ID, "db-SOMETHINGELSE000000000001"));

    let err = common::resolve(
        generation,
        &rds,
        ResolverConfig::new().with_name_fallback(false),
        &CallContext::background(),
        RESOURCE_ID,
    )
    .await
    .unwrap_err();

    assert!(err.is_not_found());
    assert_eq!(rds.request_count(), 1);
}

#[test_case(ApiGeneration::V1, "Throttling", ErrorKind::RateLimited ; "v1 throttled")]
#[test_case(ApiGeneration::V2, "Throttling", ErrorKind::RateLimited ; "v2 throttled")]
#[test_case(ApiGeneration::V1, "AccessDenied", ErrorKind::Forbidden ; "v1 denied")]
#[test_case(ApiGeneration::V2, "AccessDenied", ErrorKind::Forbidden ; "v2 denied")]
#[test_case(ApiGeneration::V1, "InternalFailure", ErrorKind::Internal ; "v1 internal")]
#[tokio::test]
async fn test_transport_faults_propagate_without_fallback(
    generation: ApiGeneration,
    code: &str,
    expected: ErrorKind,
) {
    let rds = common::fleet();
    rds.fail_next(code, "injected");

    let err = common::resolve(
        generation,
        &rds,
        ResolverConfig::default(),
        &CallContext::background(),
        "db-NOSUCHINSTANCE",
    )
    .await
    .unwrap_err();

    assert_eq!(err.kind(), expected);
    assert!(err.is_transport());
    assert_eq!(err.fault_code(), Some(code));
    assert_eq!(rds.request_count(), 1);
}

#[test_case(ApiGeneration::V1 ; "v1")]
#[test_case(ApiGeneration::V2 ; "v2")]
#[tokio::test]
async fn test_not_found_fault_on_resource_id_query_falls_back(generation: ApiGeneration) {
    let rds = InMemoryRds::new();
    rds.insert(InstanceFixture::new(RESOURCE_ID, "db-SOMETHINGELSE000000000001"));
    rds.fail_next("DBInstanceNotFound", "injected");

    let found = common::resolve(
        generation,
        &rds,
        ResolverConfig::default(),
        &CallContext::background(),
        RESOURCE_ID,
    )
    .await
    .unwrap();

    assert_eq!(found.identifier.as_deref(), Some(RESOURCE_ID));
    assert_eq!(rds.request_count(), 2);
}

#[test_case(ApiGeneration::V1 ; "v1")]
#[test_case(ApiGeneration::V2 ; "v2")]
#[tokio::test]
async fn test_status_predicate_disambiguates(generation: ApiGeneration) {
    let rds = InMemoryRds::new();
    rds.insert_all([
        InstanceFixture::new("old", "db-XYZ").with_status("deleting"),
        InstanceFixture::new("new", "db-XYZ"),
    ]);

    let found = common::resolve_with_status(generation, &rds, "db-XYZ", "available")
        .await
        .unwrap();

    assert_eq!(found.identifier.as_deref(), Some("new"));
    assert_eq!(found.status.as_deref(), Some("available"));
}

#[test_case(ApiGeneration::V1 ; "v1")]
#[test_case(ApiGeneration::V2 ; "v2")]
#[tokio::test]
async fn test_name_and_resource_id_agree(generation: ApiGeneration) -> anyhow::Result<()> {
    let rds = common::fleet();
    let ctx = CallContext::background();

    let by_name =
        common::resolve(generation, &rds, ResolverConfig::default(), &ctx, "analytics").await?;
    let by_id =
        common::resolve(generation, &rds, ResolverConfig::default(), &ctx, RESOURCE_ID).await?;

    assert_eq!(by_name, by_id);
    Ok(())
}

#[test]
fn test_invalid_config_rejected_before_any_request() {
    let rds = common::fleet();
    let err = rds_finder::Resolver::v2(rds.clone(), ResolverConfig::new().with_max_records(500))
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Configuration);
    assert_eq!(rds.request_count(), 0);
}
