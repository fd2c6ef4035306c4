use std::{fmt::Debug, marker::PhantomData};

use call_governor::middleware::{Execution, Exclusion, GovernorMiddleware};
use tracing::{Level, event, span};

/// Middleware that emits `TRACE` level events whenever a caller of a governor is admitted or turned away.
pub struct TracingMiddleware<K, I: GovernorMiddleware<K>> {
    _phantom: PhantomData<(K, I)>,
}

impl<K, I: GovernorMiddleware<K>> core::fmt::Debug for TracingMiddleware<K, I> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TracingMiddleware").finish()
    }
}

impl<K: Debug, I: GovernorMiddleware<K>> GovernorMiddleware<K> for TracingMiddleware<K, I>
where
    I::Outcome: Debug,
{
    type Outcome = I::Outcome;

    fn admitted(key: &K, execution: Execution) -> Self::Outcome {
        let span = span!(Level::TRACE, "admitted", ?key, ?execution);
        let _enter = span.enter();
        let result = I::admitted(key, execution);
        event!(Level::TRACE, ?result);
        result
    }

    fn excluded(key: &K, exclusion: Exclusion) -> Self::Outcome {
        let span = span!(Level::TRACE, "excluded", ?key, ?exclusion);
        let _enter = span.enter();
        let result = I::excluded(key, exclusion);
        event!(Level::TRACE, ?result);
        result
    }
}
