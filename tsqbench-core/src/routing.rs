//! Host Routing
//!
//! Maps an unbounded hostname keyspace onto a bounded worker pool. The
//! first record for a host either spawns a fresh worker (below the cap) or
//! binds the host to an existing worker by round-robin; either way the
//! binding is permanent for the rest of the run.
//!
//! The router is pure bookkeeping: it decides, the dispatcher acts. That
//! keeps the assignment policy testable without any channels in sight.

use fxhash::FxHashMap;
use serde::Serialize;
use std::fmt;

/// Identifies a worker by spawn order, starting at 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct WorkerId(pub usize);

impl fmt::Display for WorkerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Routing decision for one record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    /// Host already bound; deliver to its worker.
    Bound(WorkerId),
    /// New host below the cap; spawn this worker, then deliver.
    Spawn(WorkerId),
    /// New host at the cap; bound to an existing worker by round-robin.
    Overflow(WorkerId),
}

impl Route {
    /// The worker this record goes to, whatever the decision was.
    pub fn worker(self) -> WorkerId {
        match self {
            Route::Bound(id) | Route::Spawn(id) | Route::Overflow(id) => id,
        }
    }
}

/// Host-to-worker assignment table with lazy spawn and round-robin
/// overflow.
///
/// Owned and mutated exclusively by the dispatcher; workers never see it.
#[derive(Debug)]
pub struct HostRouter {
    /// Worker cap; 0 means one worker per distinct host.
    max_workers: usize,
    /// Permanent host bindings.
    table: FxHashMap<String, WorkerId>,
    /// Workers handed out so far, in spawn order.
    spawned: usize,
    /// Round-robin cursor. Advances per binding creation, not per record.
    cursor: usize,
}

impl HostRouter {
    /// Create a router with the given worker cap (`0` = unbounded).
    pub fn new(max_workers: usize) -> Self {
        Self {
            max_workers,
            table: FxHashMap::default(),
            spawned: 0,
            cursor: 0,
        }
    }

    /// Decide where the next record for `host` goes.
    pub fn route(&mut self, host: &str) -> Route {
        if let Some(&id) = self.table.get(host) {
            return Route::Bound(id);
        }

        if self.max_workers == 0 || self.spawned < self.max_workers {
            let id = WorkerId(self.spawned);
            self.spawned += 1;
            self.table.insert(host.to_owned(), id);
            Route::Spawn(id)
        } else {
            let id = WorkerId(self.cursor);
            self.cursor = (self.cursor + 1) % self.spawned;
            self.table.insert(host.to_owned(), id);
            Route::Overflow(id)
        }
    }

    /// Number of workers spawned so far.
    pub fn workers_spawned(&self) -> usize {
        self.spawned
    }

    /// Number of distinct hosts bound so far.
    pub fn hosts_bound(&self) -> usize {
        self.table.len()
    }

    /// Current binding for `host`, if any.
    pub fn binding(&self, host: &str) -> Option<WorkerId> {
        self.table.get(host).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unbounded_spawns_one_worker_per_host() {
        let mut router = HostRouter::new(0);

        assert_eq!(router.route("h1"), Route::Spawn(WorkerId(0)));
        assert_eq!(router.route("h2"), Route::Spawn(WorkerId(1)));
        assert_eq!(router.route("h3"), Route::Spawn(WorkerId(2)));
        assert_eq!(router.workers_spawned(), 3);
        assert_eq!(router.hosts_bound(), 3);
    }

    #[test]
    fn repeat_host_reuses_binding() {
        let mut router = HostRouter::new(0);

        assert_eq!(router.route("h1"), Route::Spawn(WorkerId(0)));
        assert_eq!(router.route("h1"), Route::Bound(WorkerId(0)));
        assert_eq!(router.route("h1"), Route::Bound(WorkerId(0)));
        assert_eq!(router.workers_spawned(), 1);
    }

    #[test]
    fn cap_of_one_serves_every_host() {
        let mut router = HostRouter::new(1);

        assert_eq!(router.route("h1"), Route::Spawn(WorkerId(0)));
        assert_eq!(router.route("h2"), Route::Overflow(WorkerId(0)));
        assert_eq!(router.route("h3"), Route::Overflow(WorkerId(0)));
        assert_eq!(router.route("h2"), Route::Bound(WorkerId(0)));
        assert_eq!(router.workers_spawned(), 1);
    }

    #[test]
    fn overflow_assigns_round_robin_from_index_zero() {
        let mut router = HostRouter::new(2);

        // h1 and h2 spawn; h3 overflows onto worker 0, advancing the cursor.
        assert_eq!(router.route("h1"), Route::Spawn(WorkerId(0)));
        assert_eq!(router.route("h2"), Route::Spawn(WorkerId(1)));
        assert_eq!(router.route("h3"), Route::Overflow(WorkerId(0)));

        // Records for already-bound hosts route by the stored mapping.
        assert_eq!(router.route("h3"), Route::Bound(WorkerId(0)));
        assert_eq!(router.route("h1"), Route::Bound(WorkerId(0)));
        assert_eq!(router.route("h2"), Route::Bound(WorkerId(1)));
        assert_eq!(router.workers_spawned(), 2);
    }

    #[test]
    fn cursor_advances_per_binding_not_per_record() {
        let mut router = HostRouter::new(2);
        router.route("h1");
        router.route("h2");

        // Re-routing h3 between overflows must not move the cursor.
        assert_eq!(router.route("h3"), Route::Overflow(WorkerId(0)));
        assert_eq!(router.route("h3"), Route::Bound(WorkerId(0)));
        assert_eq!(router.route("h4"), Route::Overflow(WorkerId(1)));
        assert_eq!(router.route("h5"), Route::Overflow(WorkerId(0)));
    }

    #[test]
    fn overflow_wraps_around_the_roster() {
        let mut router = HostRouter::new(3);
        for host in ["a", "b", "c"] {
            router.route(host);
        }

        assert_eq!(router.route("d"), Route::Overflow(WorkerId(0)));
        assert_eq!(router.route("e"), Route::Overflow(WorkerId(1)));
        assert_eq!(router.route("f"), Route::Overflow(WorkerId(2)));
        assert_eq!(router.route("g"), Route::Overflow(WorkerId(0)));
        assert_eq!(router.workers_spawned(), 3);
    }

    #[test]
    fn same_input_yields_same_bindings() {
        let hosts = ["h1", "h4", "h2", "h4", "h3", "h5", "h1", "h6"];

        let run = |cap: usize| {
            let mut router = HostRouter::new(cap);
            hosts.iter().map(|h| router.route(h)).collect::<Vec<_>>()
        };

        assert_eq!(run(2), run(2));
        assert_eq!(run(0), run(0));

        // Every record lands on a worker inside the cap.
        assert!(run(2).iter().all(|route| route.worker().0 < 2));
    }
}
