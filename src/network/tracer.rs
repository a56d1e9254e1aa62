use std::fmt;

use tracing::{debug, error, info, trace, warn, Level};

/// Something that happened while searching for routes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchEvent<'a> {
    Started { start: &'a str, end: &'a str },
    /// The search arrived at `vertex`.
    Visit { vertex: &'a str },
    /// The branch ending in `vertex` is abandoned.
    Pruned { vertex: &'a str },
    /// The search continues from `vertex` through its `partner`.
    Expand {
        vertex: &'a str,
        partner: &'a str,
        candidates: usize,
    },
    Candidate { vertex: &'a str },
    Solution { hops: &'a [&'a str] },
    Finished { solutions: usize },
}

impl fmt::Display for SearchEvent<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SearchEvent::Started { start, end } => write!(f, "searching routes {start} -> {end}"),
            SearchEvent::Visit { vertex } => write!(f, "visit {vertex}"),
            SearchEvent::Pruned { vertex } => write!(f, "prune {vertex}"),
            SearchEvent::Expand {
                vertex,
                partner,
                candidates,
            } => write!(
                f,
                "{candidates} vertices connected to the partner {partner} of {vertex}"
            ),
            SearchEvent::Candidate { vertex } => write!(f, "try {vertex}"),
            SearchEvent::Solution { hops } => write!(f, "found solution: {}", hops.join(", ")),
            SearchEvent::Finished { solutions } => write!(f, "found {solutions} routes"),
        }
    }
}

/// Receives the events of a route search.
///
/// Closures taking a [`Level`] and a [`SearchEvent`] are tracers as well.
pub trait PathTracer {
    fn event(&mut self, level: Level, event: &SearchEvent<'_>);
}

impl<F> PathTracer for F
where
    F: FnMut(Level, &SearchEvent<'_>),
{
    fn event(&mut self, level: Level, event: &SearchEvent<'_>) {
        self(level, event)
    }
}

/// Forwards search events to [`tracing`], up to a maximum verbosity.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct TracingTracer {
    max_level: Level,
}

impl Default for TracingTracer {
    fn default() -> Self {
        TracingTracer {
            max_level: Level::TRACE,
        }
    }
}

impl TracingTracer {
    pub fn with_max_level(max_level: Level) -> Self {
        TracingTracer { max_level }
    }

    pub fn max_level(&self) -> Level {
        self.max_level
    }

    pub fn enabled(&self, level: Level) -> bool {
        level <= self.max_level
    }
}

impl PathTracer for TracingTracer {
    fn event(&mut self, level: Level, event: &SearchEvent<'_>) {
        if !self.enabled(level) {
            return;
        }

        match level {
            Level::ERROR => error!("{event}"),
            Level::WARN => warn!("{event}"),
            Level::INFO => info!("{event}"),
            Level::DEBUG => debug!("{event}"),
            _ => trace!("{event}"),
        }
    }
}

/// Drops every event.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub struct NoopTracer;

impl PathTracer for NoopTracer {
    fn event(&mut self, _level: Level, _event: &SearchEvent<'_>) {}
}
