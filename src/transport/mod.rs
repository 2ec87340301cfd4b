//! Listers for the two describe-API client generations.
//!
//! This module adapts host-supplied API clients to the [`InstanceLister`]
//! capability the resolver is written against:
//!
//! - [`v1::PagesLister`] - page callbacks with a last-page flag, string fault codes
//! - [`v2::PaginatorLister`] - marker pagination, typed faults
//!
//! The host implements [`v1::DescribeDbInstancesPages`] or
//! [`v2::DescribeDbInstancesApi`] around its SDK client; everything above
//! that (pagination, predicate filtering, fault translation) lives here.
//!
//! ## Choosing a Lister
//!
//! ```rust
//! use rds_finder::ApiGeneration;
//! use rds_finder::transport::{v1, v2};
//! use rds_finder::testing::InMemoryRds;
//!
//! let rds = InMemoryRds::new();
//! let legacy = v1::PagesLister::new(rds.clone());
//! let current = v2::PaginatorLister::new(rds);
//! # use rds_finder::InstanceLister;
//! assert_eq!(legacy.generation(), ApiGeneration::V1);
//! assert_eq!(current.generation(), ApiGeneration::V2);
//! ```

pub(crate) mod traits;
pub mod v1;
pub mod v2;

pub use traits::{ApiGeneration, InstanceLister};
