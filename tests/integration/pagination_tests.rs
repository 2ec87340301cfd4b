//! Multi-page draining, page-size hints and deadlines.

use std::time::Duration;

use proptest::prelude::*;
use rds_finder::testing::InMemoryRds;
use rds_finder::transport::{v1, v2};
use rds_finder::{
    CallContext, DescribeQuery, ErrorKind, Filter, InstanceRecord, Resolver, ResolverConfig,
    predicate,
};

use crate::common;

fn postgres_query() -> DescribeQuery {
    DescribeQuery {
        filters: vec![Filter::new("engine", "postgres")],
        db_instance_identifier: None,
    }
}

async fn drain_v1(rds: &InMemoryRds, query: &DescribeQuery) -> Vec<String> {
    let resolver = Resolver::v1(rds.clone(), ResolverConfig::default()).unwrap();
    resolver
        .find_instances(
            &CallContext::background(),
            query,
            &predicate::accept_all::<v1::DbInstance>(),
        )
        .await
        .unwrap()
        .iter()
        .map(InstanceRecord::display_id)
        .collect()
}

async fn drain_v2(rds: &InMemoryRds, query: &DescribeQuery) -> Vec<String> {
    let resolver = Resolver::v2(rds.clone(), ResolverConfig::default()).unwrap();
    resolver
        .find_instances(
            &CallContext::background(),
            query,
            &predicate::accept_all::<v2::DbInstance>(),
        )
        .await
        .unwrap()
        .iter()
        .map(InstanceRecord::display_id)
        .collect()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    #[test]
    fn prop_page_boundaries_do_not_change_results(count in 0usize..40, page_size in 1usize..12) {
        let rt = tokio::runtime::Builder::new_current_thread().enable_all().build().unwrap();
        rt.block_on(async {
            let unpaged = InMemoryRds::new();
            unpaged.insert_all(common::numbered(count));
            let paged = InMemoryRds::new().with_page_size(page_size);
            paged.insert_all(common::numbered(count));

            let query = postgres_query();
            let expected = drain_v1(&unpaged, &query).await;
            prop_assert_eq!(expected.len(), count);
            prop_assert_eq!(&drain_v1(&paged, &query).await, &expected);
            prop_assert_eq!(&drain_v2(&paged, &query).await, &expected);

            let pages = count.div_ceil(page_size).max(1);
            prop_assert_eq!(paged.request_count(), pages * 2);
            Ok(())
        })?;
    }
}

#[tokio::test]
async fn test_predicate_applies_across_pages() {
    let rds = InMemoryRds::new().with_page_size(3);
    rds.insert_all(
        common::numbered(10)
            .into_iter()
            .enumerate()
            .map(|(n, i)| if n % 2 == 0 { i } else { i.with_status("stopped") }),
    );
    let resolver = Resolver::v2(rds.clone(), ResolverConfig::default()).unwrap();

    let running = resolver
        .find_instances(
            &CallContext::background(),
            &postgres_query(),
            &predicate::status_is::<v2::DbInstance>("available"),
        )
        .await
        .unwrap();

    assert_eq!(running.len(), 5);
    assert_eq!(rds.request_count(), 4);
}

#[tokio::test]
async fn test_max_records_is_sent_on_every_page() {
    let rds = InMemoryRds::new();
    rds.insert_all(common::numbered(45));
    let resolver = Resolver::v1(rds.clone(), ResolverConfig::new().with_max_records(20)).unwrap();

    let all = resolver
        .find_instances(
            &CallContext::background(),
            &postgres_query(),
            &predicate::accept_all::<v1::DbInstance>(),
        )
        .await
        .unwrap();

    assert_eq!(all.len(), 45);
    let requests = rds.requests();
    assert_eq!(requests.len(), 3);
    assert!(requests.iter().all(|r| r.max_records == Some(20)));
    assert_eq!(requests[0].marker, None);
    assert_eq!(requests[1].marker.as_deref(), Some("20"));
    assert_eq!(requests[2].marker.as_deref(), Some("40"));
}

#[tokio::test]
async fn test_resolution_spanning_pages_sees_duplicates() {
    let rds = InMemoryRds::new().with_page_size(1);
    rds.insert_all(common::numbered(3));
    rds.insert(rds_finder::testing::InstanceFixture::new("twin", "db-NUMBERED000001"));

    let err = Resolver::v2(rds.clone(), ResolverConfig::default())
        .unwrap()
        .resolve_by_id(&CallContext::background(), "db-NUMBERED000001")
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::MultipleResults);
    assert_eq!(err.match_count(), Some(2));
    assert_eq!(rds.request_count(), 2);
}

#[tokio::test(start_paused = true)]
async fn test_deadline_interrupts_pagination() {
    let rds = InMemoryRds::new()
        .with_page_size(1)
        .with_latency(Duration::from_secs(1));
    rds.insert_all(common::numbered(5));
    let resolver = Resolver::v1(
        rds.clone(),
        ResolverConfig::new().with_timeout(Duration::from_millis(2500)),
    )
    .unwrap();

    let err = resolver
        .find_instances(
            &CallContext::background(),
            &postgres_query(),
            &predicate::accept_all::<v1::DbInstance>(),
        )
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Timeout);
    assert!(err.is_transport());
    assert_eq!(rds.request_count(), 3);
}

#[tokio::test(start_paused = true)]
async fn test_caller_deadline_wins_when_earlier() {
    let rds = InMemoryRds::new().with_latency(Duration::from_secs(5));
    rds.insert_all(common::numbered(1));
    let resolver = Resolver::v2(
        rds.clone(),
        ResolverConfig::new().with_timeout(Duration::from_secs(60)),
    )
    .unwrap();
    let ctx = CallContext::background().with_timeout(Duration::from_secs(1));

    let err = resolver.resolve_by_id(&ctx, "inst-0").await.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Timeout);
    assert_eq!(rds.request_count(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_slow_but_in_time_succeeds() {
    let rds = InMemoryRds::new()
        .with_page_size(2)
        .with_latency(Duration::from_millis(300));
    rds.insert_all(common::numbered(4));
    let resolver = Resolver::v2(
        rds.clone(),
        ResolverConfig::new().with_timeout(Duration::from_secs(1)),
    )
    .unwrap();

    let found = resolver
        .resolve_by_id(&CallContext::background(), "inst-3")
        .await
        .unwrap();

    assert_eq!(found.dbi_resource_id.as_deref(), Some("db-NUMBERED000003"));
}
