//! Cancellation through [`CancelHandle`].

use std::time::Duration;

use rds_finder::testing::InMemoryRds;
use rds_finder::{ApiGeneration, CallContext, CancelHandle, ErrorKind, ResolverConfig};
use test_case::test_case;

use crate::common::{self, RESOURCE_ID};

#[test_case(ApiGeneration::V1 ; "v1")]
#[test_case(ApiGeneration::V2 ; "v2")]
#[tokio::test]
async fn test_cancelled_before_start_sends_nothing(generation: ApiGeneration) {
    let rds = common::fleet();
    let handle = CancelHandle::new();
    handle.cancel();
    let ctx = CallContext::background().with_cancellation(&handle);

    let err = common::resolve(generation, &rds, ResolverConfig::default(), &ctx, RESOURCE_ID)
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Cancelled);
    assert_eq!(rds.request_count(), 0);
}

#[test_case(ApiGeneration::V1 ; "v1")]
#[test_case(ApiGeneration::V2 ; "v2")]
#[tokio::test(start_paused = true)]
async fn test_cancel_during_fallback(generation: ApiGeneration) {
    let rds = InMemoryRds::new().with_latency(Duration::from_secs(1));
    rds.insert_all(common::numbered(2));
    let handle = CancelHandle::new();
    let ctx = CallContext::background().with_cancellation(&handle);

    let canceller = tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(1500)).await;
        handle.cancel();
    });

    let err = common::resolve(generation, &rds, ResolverConfig::default(), &ctx, RESOURCE_ID)
        .await
        .unwrap_err();
    canceller.await.unwrap();

    assert_eq!(err.kind(), ErrorKind::Cancelled);
    assert_eq!(rds.request_count(), 2);
}

#[tokio::test]
async fn test_dropped_handle_does_not_cancel() {
    let rds = common::fleet();
    let ctx = {
        let handle = CancelHandle::new();
        CallContext::background().with_cancellation(&handle)
    };

    let found = common::resolve(
        ApiGeneration::V2,
        &rds,
        ResolverConfig::default(),
        &ctx,
        "mydb-prod",
    )
    .await
    .unwrap();

    assert_eq!(found.identifier.as_deref(), Some("mydb-prod"));
}
