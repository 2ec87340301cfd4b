//! Resolving an ambiguous identifier to exactly one DB instance.
//!
//! A [`Resolver`] wraps one [`InstanceLister`] and runs the same algorithm
//! for either client generation:
//!
//! 1. classify the identifier by shape;
//! 2. query the namespace the shape suggests, drain every page, and require
//!    exactly one match;
//! 3. if a resource-ID-shaped identifier was not found, query it once more
//!    as a DB instance identifier.
//!
//! Name-shaped identifiers are never retried as resource IDs: resource IDs
//! are generated by the platform and are not typed in by users.

mod assertion;

pub use assertion::assert_single;

use crate::config::ResolverConfig;
use crate::transport::v1::{DescribeDbInstancesPages, PagesLister};
use crate::transport::v2::{DescribeDbInstancesApi, PaginatorLister};
use crate::transport::InstanceLister;
use crate::types::{classify, predicate, CallContext, DescribeQuery, DynPredicate};
use crate::Error;

/// Resolves DB instances through one client generation.
///
/// Holds no mutable state; share it freely between tasks.
///
/// ## Example
///
/// ```rust
/// use rds_finder::{CallContext, Resolver, ResolverConfig};
/// use rds_finder::testing::{InMemoryRds, InstanceFixture};
///
/// # tokio_test::block_on(async {
/// let rds = InMemoryRds::new();
/// rds.insert(InstanceFixture::new("mydb-prod", "db-BE6UI2KLPQP3OVDYD74ZEV6NUM"));
///
/// let resolver = Resolver::v2(rds, ResolverConfig::default()).unwrap();
/// let ctx = CallContext::background();
///
/// let by_name = resolver.resolve_by_id(&ctx, "mydb-prod").await.unwrap();
/// let by_id = resolver
///     .resolve_by_id(&ctx, "db-BE6UI2KLPQP3OVDYD74ZEV6NUM")
///     .await
///     .unwrap();
/// assert_eq!(by_name, by_id);
/// # });
/// ```
#[derive(Debug, Clone)]
pub struct Resolver<L> {
    lister: L,
    config: ResolverConfig,
}

impl<C: DescribeDbInstancesPages> Resolver<PagesLister<C>> {
    /// Creates a resolver over a v1 client.
    pub fn v1(client: C, config: ResolverConfig) -> Result<Self, Error> {
        let mut lister = PagesLister::new(client);
        if let Some(max_records) = config.max_records {
            lister = lister.with_max_records(max_records);
        }
        Self::with_config(lister, config)
    }
}

impl<C: DescribeDbInstancesApi> Resolver<PaginatorLister<C>> {
    /// Creates a resolver over a v2 client.
    pub fn v2(client: C, config: ResolverConfig) -> Result<Self, Error> {
        let mut lister = PaginatorLister::new(client);
        if let Some(max_records) = config.max_records {
            lister = lister.with_max_records(max_records);
        }
        Self::with_config(lister, config)
    }
}

impl<L: InstanceLister> Resolver<L> {
    /// Creates a resolver with the default configuration.
    pub fn new(lister: L) -> Self {
        Self {
            lister,
            config: ResolverConfig::default(),
        }
    }

    /// Creates a resolver after validating `config`.
    ///
    /// `config.max_records` is not pushed into an already-built lister; use
    /// [`Resolver::v1`] or [`Resolver::v2`] for that.
    pub fn with_config(lister: L, config: ResolverConfig) -> Result<Self, Error> {
        config.validate()?;
        Ok(Self { lister, config })
    }

    /// Returns the underlying lister.
    pub fn lister(&self) -> &L {
        &self.lister
    }

    /// Returns the configuration.
    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }

    /// Lists every DB instance matching `query` that passes `predicate`.
    pub async fn find_instances(
        &self,
        ctx: &CallContext,
        query: &DescribeQuery,
        predicate: &DynPredicate<L::Record>,
    ) -> Result<Vec<L::Record>, Error> {
        let ctx = self.call_context(ctx);
        self.lister.list(&ctx, query, predicate).await
    }

    /// Lists DB instances matching `query` and requires exactly one.
    pub async fn find_instance(
        &self,
        ctx: &CallContext,
        query: &DescribeQuery,
        predicate: &DynPredicate<L::Record>,
    ) -> Result<L::Record, Error> {
        let ctx = self.call_context(ctx);
        self.find_one(&ctx, query, predicate).await
    }

    /// Resolves `id`, which may be a resource ID or an identifier.
    ///
    /// Fails with [`ErrorKind::NotFound`](crate::ErrorKind::NotFound) when
    /// no namespace yields a match,
    /// [`ErrorKind::MultipleResults`](crate::ErrorKind::MultipleResults)
    /// when the matching namespace yields several, and any transport error
    /// unchanged.
    pub async fn resolve(
        &self,
        ctx: &CallContext,
        id: &str,
        predicate: &DynPredicate<L::Record>,
    ) -> Result<L::Record, Error> {
        let ctx = self.call_context(ctx);
        let classification = classify(id);
        let query = DescribeQuery::for_identifier(id, classification);

        tracing::debug!(
            identifier = id,
            %classification,
            generation = %self.lister.generation(),
            "resolving DB instance"
        );

        match self.find_one(&ctx, &query, predicate).await {
            Err(err)
                if err.is_not_found()
                    && classification.is_resource_id()
                    && self.config.name_fallback =>
            {
                tracing::debug!(
                    identifier = id,
                    "no DB instance with this resource ID, retrying as identifier"
                );
                let fallback = DescribeQuery::by_identifier(id);
                self.find_one(&ctx, &fallback, predicate).await
            }
            result => result,
        }
    }

    /// Resolves `id` accepting every record.
    pub async fn resolve_by_id(&self, ctx: &CallContext, id: &str) -> Result<L::Record, Error> {
        self.resolve(ctx, id, &predicate::accept_all::<L::Record>())
            .await
    }

    async fn find_one(
        &self,
        ctx: &CallContext,
        query: &DescribeQuery,
        predicate: &DynPredicate<L::Record>,
    ) -> Result<L::Record, Error> {
        let results = self.lister.list(ctx, query, predicate).await?;
        tracing::debug!(query = %query, matches = results.len(), "describe drained");
        assert_single(results, query)
    }

    fn call_context(&self, ctx: &CallContext) -> CallContext {
        match self.config.timeout {
            Some(timeout) => ctx.clone().with_timeout(timeout),
            None => ctx.clone(),
        }
    }
}
