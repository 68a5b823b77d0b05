use std::io;
use std::sync::{Mutex, PoisonError};

use tracing::debug;

use super::{DnsLookup, LookupFailure, QueryType};

/// Hands each concurrent lookup its own resolver.
///
/// The trust-dns sync `Resolver` runs every query on one locked runtime, so
/// sharing a single instance between the check threads would serialize them.
/// Resolvers are built on demand by `factory` and kept for reuse.
pub struct LookupPool<R, F> {
    factory: F,
    idle: Mutex<Vec<R>>,
}

impl<R, F> LookupPool<R, F>
where
    F: Fn() -> io::Result<R>,
{
    /// Builds one resolver up front so configuration errors surface here
    /// rather than as failed lookups.
    pub fn new(factory: F) -> io::Result<Self> {
        let first = factory()?;
        Ok(Self {
            factory,
            idle: Mutex::new(vec![first]),
        })
    }

    pub fn idle_count(&self) -> usize {
        self.idle
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    fn checkout(&self) -> io::Result<R> {
        let reused = self
            .idle
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .pop();
        match reused {
            Some(resolver) => Ok(resolver),
            None => {
                debug!("all resolvers busy, building another");
                (self.factory)()
            }
        }
    }

    fn checkin(&self, resolver: R) {
        self.idle
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(resolver);
    }
}

impl<R, F> DnsLookup for LookupPool<R, F>
where
    R: DnsLookup,
    F: Fn() -> io::Result<R>,
{
    fn resolve(&self, name: &str, query: QueryType) -> Result<Vec<String>, LookupFailure> {
        let resolver = self
            .checkout()
            .map_err(|err| LookupFailure::resolver(name, query, err.to_string()))?;
        let answer = resolver.resolve(name, query);
        self.checkin(resolver);
        answer
    }
}

impl<R, F> std::fmt::Debug for LookupPool<R, F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LookupPool").finish_non_exhaustive()
    }
}
