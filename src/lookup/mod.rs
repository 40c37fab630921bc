//! Asset lookup pipeline.
//!
//! A [`Query`](coverhound_common::Query) flows through:
//!
//! 1. [`candidates`]: expand the title into ordered lookup keys
//! 2. [`ResultCache`]: short-circuit previously resolved queries
//! 3. [`ProviderChain`]: try each [`AssetProvider`] in priority order
//! 4. [`Resolver`]: record the outcome and fall back to a placeholder

pub mod cache;
pub mod candidates;
pub mod chain;
pub mod provider;
pub mod providers;
pub mod resolver;

pub use cache::{CacheEntry, ResultCache};
pub use candidates::CandidateRules;
pub use chain::ProviderChain;
pub use provider::{AssetProvider, LookupRequest, ProviderResult};
pub use resolver::{Resolution, ResolutionSource, Resolver};
