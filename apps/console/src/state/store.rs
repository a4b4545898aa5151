//! # Entity Store
//!
//! One generic store for a record type: the canonical collection, the
//! loading fragment, search / filter / selection state and memoized views,
//! behind a short-lived mutex.
//!
//! ## Thread Safety
//! The state sits in `Arc<Mutex<T>>`. Every method takes the lock, does its
//! synchronous work and releases it. The lock is never held across an
//! `.await`: `load()` and `create()` take it once to start the request and
//! once more to apply the result.
//!
//! ## Request Sequencing
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │              One Token per Operation Kind, Latest Wins                  │
//! │                                                                         │
//! │  t0    load()    → load token 1, loading = true                         │
//! │  t200  create()  → create token 1                                       │
//! │  t700  create completes  → Applied, record appended, still loading      │
//! │  t1000 load completes    → Applied, collection replaced, the record     │
//! │                            created while it was in flight is kept       │
//! │                                                                         │
//! │  A second load() supersedes the first load only; a second create()     │
//! │  supersedes the first create only. A superseded completion never       │
//! │  writes the collection, the loading flag or the error. Loading clears   │
//! │  when no operation of either kind is left in flight.                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Change Notification
//! Every effective change bumps a revision on a `tokio::sync::watch`
//! channel. The shell subscribes and re-renders when it moves. Setting a
//! search or filter equal to the current one is not a change.

use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Instant;

use tokio::sync::watch;
use tracing::{debug, error, info, warn};

use backoffice_core::filter::{self, Filter};
use backoffice_core::reactive::{Memo, Versioned};
use backoffice_core::{CoreError, CoreResult, EntityCollection, Facet, LoadingState, Record};
use backoffice_data::{DataResult, RecordService};

// =============================================================================
// Outcome
// =============================================================================

/// How a `load()` or `create()` ended, from the store's point of view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The result was written to the store.
    Applied,

    /// The service failed. The message is now the store's error.
    Failed(String),

    /// A newer request started before this one finished; the result was
    /// discarded.
    Superseded,
}

impl Outcome {
    pub fn is_applied(&self) -> bool {
        matches!(self, Outcome::Applied)
    }
}

// =============================================================================
// Store State
// =============================================================================

/// Per-facet record count, in canonical facet order.
pub type Breakdown<F> = Arc<[(F, usize)]>;

struct Views<R: Record> {
    entities: Memo<u64, Arc<[R]>>,
    active: Memo<u64, Arc<[R]>>,
    breakdown: Memo<u64, Breakdown<R::Facet>>,
    filtered: Memo<(u64, u64, u64), Arc<[R]>>,
    selected: Memo<(u64, u64), Option<R>>,
}

impl<R: Record> Default for Views<R> {
    fn default() -> Self {
        Views {
            entities: Memo::new(),
            active: Memo::new(),
            breakdown: Memo::new(),
            filtered: Memo::new(),
            selected: Memo::new(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Op {
    Load,
    Create,
}

impl Op {
    fn name(self) -> &'static str {
        match self {
            Op::Load => "load",
            Op::Create => "create",
        }
    }
}

/// Latest token issued for one operation kind, and whether it is pending.
#[derive(Debug, Default, Clone, Copy)]
struct Slot {
    seq: u64,
    in_flight: bool,
}

#[derive(Debug, Default)]
struct Requests {
    load: Slot,
    create: Slot,
}

impl Requests {
    fn slot(&mut self, op: Op) -> &mut Slot {
        match op {
            Op::Load => &mut self.load,
            Op::Create => &mut self.create,
        }
    }

    fn any_in_flight(&self) -> bool {
        self.load.in_flight || self.create.in_flight
    }
}

struct StoreState<R: Record> {
    items: Versioned<EntityCollection<R>>,
    query: Versioned<String>,
    filter: Versioned<Filter<R::Facet>>,
    selected: Versioned<Option<String>>,
    loading: LoadingState,
    requests: Requests,
    /// Records created while the current load is in flight. Its snapshot
    /// predates them, so they survive the replace.
    created_during_load: Vec<R>,
    views: Views<R>,
}

impl<R: Record> StoreState<R> {
    fn new() -> Self {
        StoreState {
            items: Versioned::new(EntityCollection::new()),
            query: Versioned::new(String::new()),
            filter: Versioned::new(Filter::All),
            selected: Versioned::new(None),
            loading: LoadingState::new(),
            requests: Requests::default(),
            created_during_load: Vec::new(),
            views: Views::default(),
        }
    }

    fn clear_selection_if(&mut self, gone: impl Fn(&str) -> bool) {
        let stale = matches!(self.selected.get(), Some(id) if gone(id.as_str()));
        if stale {
            self.selected.set(None);
        }
    }
}

struct Shared<R: Record> {
    state: Mutex<StoreState<R>>,
    service: Arc<dyn RecordService<R>>,
    revision: watch::Sender<u64>,
}

impl<R: Record> Drop for Shared<R> {
    fn drop(&mut self) {
        info!(kind = R::KIND, "Store destroyed");
    }
}

// =============================================================================
// EntityStore
// =============================================================================

/// Reactive store for one record type.
///
/// Cloning is cheap and every clone sees the same state.
///
/// ## Usage
/// ```rust,ignore
/// let store = EntityStore::new(Arc::new(MockUserService::new(Latency::none())));
/// store.load().await;
/// store.set_search("connor");
/// let rows = store.filtered();      // Arc<[User]>
/// ```
pub struct EntityStore<R: Record> {
    shared: Arc<Shared<R>>,
}

impl<R: Record> Clone for EntityStore<R> {
    fn clone(&self) -> Self {
        EntityStore {
            shared: Arc::clone(&self.shared),
        }
    }
}

impl<R: Record> std::fmt::Debug for EntityStore<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EntityStore")
            .field("kind", &R::KIND)
            .field("revision", &self.revision())
            .finish()
    }
}

impl<R: Record> EntityStore<R> {
    /// Creates an empty store: no records, no selection, no filter,
    /// not loading.
    pub fn new(service: Arc<dyn RecordService<R>>) -> Self {
        let (revision, _) = watch::channel(0);
        info!(kind = R::KIND, "Store created");
        EntityStore {
            shared: Arc::new(Shared {
                state: Mutex::new(StoreState::new()),
                service,
                revision,
            }),
        }
    }

    fn lock(&self) -> MutexGuard<'_, StoreState<R>> {
        self.shared
            .state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn with_state<T>(&self, f: impl FnOnce(&StoreState<R>) -> T) -> T {
        let state = self.lock();
        f(&state)
    }

    fn with_state_mut<T>(&self, f: impl FnOnce(&mut StoreState<R>) -> T) -> T {
        let mut state = self.lock();
        f(&mut state)
    }

    fn notify(&self) {
        self.shared.revision.send_modify(|rev| *rev += 1);
    }

    // =========================================================================
    // Change Notification
    // =========================================================================

    /// Receives the store revision. Dropping the receiver unsubscribes.
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.shared.revision.subscribe()
    }

    /// Current revision. Moves on every effective state change.
    pub fn revision(&self) -> u64 {
        *self.shared.revision.borrow()
    }

    /// Resolves once no request is in flight.
    pub async fn settled(&self) {
        let mut rx = self.subscribe();
        while self.loading() {
            if rx.changed().await.is_err() {
                return;
            }
        }
    }

    // =========================================================================
    // Derived Views
    // =========================================================================

    /// Every record, in collection order.
    pub fn entities(&self) -> Arc<[R]> {
        self.with_state_mut(|s| {
            let items = s.items.get();
            s.views
                .entities
                .get_or_compute(s.items.version(), || items.iter().cloned().collect())
        })
    }

    pub fn count(&self) -> usize {
        self.with_state(|s| s.items.get().len())
    }

    /// Active records, in collection order.
    pub fn active(&self) -> Arc<[R]> {
        self.with_state_mut(|s| {
            let items = s.items.get();
            s.views.active.get_or_compute(s.items.version(), || {
                items.iter().filter(|r| r.is_active()).cloned().collect()
            })
        })
    }

    pub fn active_count(&self) -> usize {
        self.active().len()
    }

    /// Record count for every facet value, zeros included.
    pub fn breakdown(&self) -> Breakdown<R::Facet> {
        self.with_state_mut(|s| {
            let items = s.items.get();
            s.views.breakdown.get_or_compute(s.items.version(), || {
                R::Facet::ALL
                    .iter()
                    .map(|facet| (*facet, items.iter().filter(|r| r.facet() == *facet).count()))
                    .collect()
            })
        })
    }

    /// Records with this facet value.
    pub fn facet_count(&self, facet: R::Facet) -> usize {
        self.breakdown()
            .iter()
            .find(|(f, _)| *f == facet)
            .map_or(0, |(_, n)| *n)
    }

    /// Facet filter, then text search over the record's search fields.
    pub fn filtered(&self) -> Arc<[R]> {
        self.with_state_mut(|s| {
            let key = (s.items.version(), s.query.version(), s.filter.version());
            let (items, query, facet) = (s.items.get(), s.query.get(), s.filter.get());
            s.views
                .filtered
                .get_or_compute(key, || filter::apply(items.iter(), facet, query).into())
        })
    }

    /// The selected record, if the selection points at one.
    pub fn selected(&self) -> Option<R> {
        self.with_state_mut(|s| {
            let key = (s.items.version(), s.selected.version());
            let (items, selected) = (s.items.get(), s.selected.get());
            s.views.selected.get_or_compute(key, || {
                selected.as_deref().and_then(|id| items.get(id).cloned())
            })
        })
    }

    /// Runs `f` over the collection and its version, under the lock.
    ///
    /// For views that live outside the store but are keyed on the same
    /// collection version.
    pub fn with_items<T>(&self, f: impl FnOnce(u64, &EntityCollection<R>) -> T) -> T {
        self.with_state(|s| f(s.items.version(), s.items.get()))
    }

    pub fn selected_id(&self) -> Option<String> {
        self.with_state(|s| s.selected.get().clone())
    }

    pub fn search(&self) -> String {
        self.with_state(|s| s.query.get().clone())
    }

    pub fn filter(&self) -> Filter<R::Facet> {
        self.with_state(|s| *s.filter.get())
    }

    pub fn loading(&self) -> bool {
        self.with_state(|s| s.loading.loading())
    }

    pub fn error(&self) -> Option<String> {
        self.with_state(|s| s.loading.error().map(str::to_string))
    }

    pub fn is_ready(&self) -> bool {
        self.with_state(|s| s.loading.is_ready())
    }

    /// Snapshot of the loading fragment.
    pub fn loading_state(&self) -> LoadingState {
        self.with_state(|s| s.loading.clone())
    }

    // =========================================================================
    // Synchronous Mutations
    // =========================================================================

    /// Toggles the selection: selecting the selected id clears it, any other
    /// id replaces it. Returns the new selection.
    pub fn select(&self, id: &str) -> Option<String> {
        let selection = self.with_state_mut(|s| {
            let next = match s.selected.get() {
                Some(current) if current == id => None,
                _ => Some(id.to_string()),
            };
            s.selected.set(next.clone());
            next
        });
        debug!(kind = R::KIND, selected = ?selection, "Selection changed");
        self.notify();
        selection
    }

    /// Sets the free-text search. Returns false if it was already set.
    pub fn set_search(&self, query: impl Into<String>) -> bool {
        let changed = self.with_state_mut(|s| s.query.set(query.into()));
        if changed {
            self.notify();
        }
        changed
    }

    /// Sets the facet filter. Returns false if it was already set.
    pub fn set_filter(&self, filter: Filter<R::Facet>) -> bool {
        let changed = self.with_state_mut(|s| s.filter.set(filter));
        if changed {
            debug!(kind = R::KIND, %filter, "Filter changed");
            self.notify();
        }
        changed
    }

    /// Flips a record's active flag in place.
    pub fn toggle_active(&self, id: &str) -> CoreResult<R> {
        let result = self.with_state_mut(|s| {
            if !s.items.get().contains(id) {
                return Err(CoreError::not_found(R::KIND, id));
            }
            s.items.modify(|items| {
                items
                    .update(id, |r| r.set_active(!r.is_active()))
                    .map(|r| r.clone())
            })
        });
        match &result {
            Ok(record) => {
                debug!(kind = R::KIND, id = %id, active = record.is_active(), "Toggled");
                self.notify();
            }
            Err(_) => warn!(kind = R::KIND, id = %id, "Toggle on unknown record"),
        }
        result
    }

    /// Removes a record locally. The service is not called.
    ///
    /// Clears the selection if it pointed at the removed record.
    pub fn remove(&self, id: &str) -> CoreResult<R> {
        let removed = self.with_state_mut(|s| {
            if !s.items.get().contains(id) {
                return None;
            }
            let removed = s.items.modify(|items| items.remove(id));
            s.clear_selection_if(|selected| selected == id);
            removed
        });
        match removed {
            Some(record) => {
                debug!(kind = R::KIND, id = %id, "Removed");
                self.notify();
                Ok(record)
            }
            None => {
                warn!(kind = R::KIND, id = %id, "Remove on unknown record");
                Err(CoreError::not_found(R::KIND, id))
            }
        }
    }

    // =========================================================================
    // Async Operations
    // =========================================================================

    /// Starts a request: takes a fresh token for its kind and marks loading.
    fn begin_request(&self, op: Op) -> u64 {
        let token = self.with_state_mut(|s| {
            let slot = s.requests.slot(op);
            slot.seq += 1;
            slot.in_flight = true;
            let token = slot.seq;
            if op == Op::Load {
                s.created_during_load.clear();
            }
            s.loading.mark_loading();
            token
        });
        debug!(kind = R::KIND, op = op.name(), token, "Request started");
        self.notify();
        token
    }

    /// Applies a completion if its token is still the latest of its kind.
    ///
    /// Loading stays set while a request of the other kind is pending.
    fn finish_request<T>(
        &self,
        op: Op,
        token: u64,
        result: DataResult<T>,
        apply: impl FnOnce(&mut StoreState<R>, T),
    ) -> Outcome {
        let outcome = self.with_state_mut(|s| {
            let slot = s.requests.slot(op);
            if slot.seq != token {
                return Outcome::Superseded;
            }
            slot.in_flight = false;
            let other_pending = s.requests.any_in_flight();
            if op == Op::Load && result.is_err() {
                s.created_during_load.clear();
            }
            match result {
                Ok(value) => {
                    apply(s, value);
                    if !other_pending {
                        s.loading.mark_loaded();
                    }
                    Outcome::Applied
                }
                Err(err) => {
                    let message = err.to_string();
                    if other_pending {
                        s.loading.set_error(message.clone());
                    } else {
                        s.loading.mark_error(message.clone());
                    }
                    Outcome::Failed(message)
                }
            }
        });
        match &outcome {
            Outcome::Superseded => {
                debug!(kind = R::KIND, op = op.name(), token, "Discarding superseded completion");
            }
            Outcome::Failed(message) => {
                error!(kind = R::KIND, op = op.name(), error = %message, "Request failed");
                self.notify();
            }
            Outcome::Applied => self.notify(),
        }
        outcome
    }

    /// Loads every record from the service, replacing the collection.
    ///
    /// Loading is marked before this returns, so the request is visibly in
    /// flight even if the future is spawned rather than awaited. Records
    /// created while the load was pending are kept after the replace.
    pub fn load(&self) -> impl Future<Output = Outcome> + Send + 'static {
        let token = self.begin_request(Op::Load);
        let store = self.clone();
        async move {
            let started = Instant::now();
            let result = store.shared.service.get_all().await;
            store.finish_request(Op::Load, token, result, |s, records| {
                let kept = std::mem::take(&mut s.created_during_load);
                s.items.modify(|items| {
                    items.set_all(records);
                    for record in kept {
                        if !items.contains(record.id()) {
                            items.add(record);
                        }
                    }
                });
                let items = s.items.get();
                let count = items.len();
                let stale = match s.selected.get() {
                    Some(id) => !items.contains(id),
                    None => false,
                };
                if stale {
                    s.selected.set(None);
                }
                info!(
                    kind = R::KIND,
                    count,
                    elapsed_ms = started.elapsed().as_millis() as u64,
                    "Load complete"
                );
            })
        }
    }

    /// Creates a record through the service and appends it.
    pub fn create(&self, draft: R::Draft) -> impl Future<Output = Outcome> + Send + 'static {
        let token = self.begin_request(Op::Create);
        let store = self.clone();
        async move {
            let result = store.shared.service.create(draft).await;
            store.finish_request(Op::Create, token, result, |s, record| {
                info!(kind = R::KIND, id = %record.id(), "Created");
                if s.requests.load.in_flight {
                    s.created_during_load.push(record.clone());
                }
                s.items.modify(|items| items.add(record));
            })
        }
    }

    /// Spawns the first load on the current runtime.
    pub(crate) fn spawn_initial_load(&self) {
        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                info!(kind = R::KIND, "Store initialized, loading");
                handle.spawn(self.load());
            }
            Err(_) => warn!(kind = R::KIND, "No async runtime; initial load skipped"),
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use backoffice_core::{LoadStatus, NewUser, Role, User};
    use backoffice_data::{DataError, Latency, MockUserService};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    fn user(id: &str, name: &str, role: Role, active: bool) -> User {
        let mut user = User::new(id, name, format!("{}@example.com", id), role);
        user.active = active;
        user
    }

    /// Service whose get_all fails and whose calls take a fixed time.
    struct FailingService;

    #[async_trait]
    impl RecordService<User> for FailingService {
        async fn get_all(&self) -> DataResult<Vec<User>> {
            Err(DataError::Unavailable("connection refused".to_string()))
        }
        async fn get_by_id(&self, id: &str) -> DataResult<User> {
            Err(DataError::not_found("User", id))
        }
        async fn create(&self, _draft: NewUser) -> DataResult<User> {
            Err(DataError::Unavailable("read only".to_string()))
        }
        async fn delete(&self, _id: &str) -> DataResult<()> {
            Ok(())
        }
    }

    /// Serves `get_all` a set number of times, then fails it.
    struct FlakyService {
        good_loads: AtomicUsize,
        inner: MockUserService,
    }

    impl FlakyService {
        fn serving(records: Vec<User>, good_loads: usize) -> Self {
            FlakyService {
                good_loads: AtomicUsize::new(good_loads),
                inner: MockUserService::with_records(records, Latency::none()),
            }
        }
    }

    #[async_trait]
    impl RecordService<User> for FlakyService {
        async fn get_all(&self) -> DataResult<Vec<User>> {
            let served = self
                .good_loads
                .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1));
            match served {
                Ok(_) => self.inner.get_all().await,
                Err(_) => Err(DataError::Unavailable("connection refused".to_string())),
            }
        }
        async fn get_by_id(&self, id: &str) -> DataResult<User> {
            self.inner.get_by_id(id).await
        }
        async fn create(&self, draft: NewUser) -> DataResult<User> {
            self.inner.create(draft).await
        }
        async fn delete(&self, id: &str) -> DataResult<()> {
            self.inner.delete(id).await
        }
    }

    fn store_with(records: Vec<User>) -> EntityStore<User> {
        let service = MockUserService::with_records(records, Latency::none());
        EntityStore::new(Arc::new(service))
    }

    async fn loaded(records: Vec<User>) -> EntityStore<User> {
        let store = store_with(records);
        assert_eq!(store.load().await, Outcome::Applied);
        store
    }

    fn draft(name: &str) -> NewUser {
        NewUser {
            name: name.to_string(),
            email: "new@example.com".to_string(),
            role: Role::Viewer,
            active: true,
        }
    }

    #[test]
    fn test_initial_state() {
        let store = store_with(vec![]);
        assert_eq!(store.count(), 0);
        assert!(store.selected_id().is_none());
        assert_eq!(store.filter(), Filter::All);
        assert_eq!(store.search(), "");
        assert!(!store.loading());
        assert!(store.error().is_none());
    }

    #[tokio::test]
    async fn test_select_toggles_and_replaces() {
        let store = loaded(vec![user("a", "Ann", Role::User, true), user("b", "Bea", Role::User, true)]).await;
        assert_eq!(store.select("a"), Some("a".to_string()));
        assert_eq!(store.select("b"), Some("b".to_string()));
        assert_eq!(store.selected().map(|u| u.name), Some("Bea".to_string()));
        assert_eq!(store.select("b"), None);
        assert!(store.selected().is_none());
    }

    #[tokio::test]
    async fn test_remove_clears_only_matching_selection() {
        let store = loaded(vec![user("a", "Ann", Role::User, true), user("b", "Bea", Role::User, true)]).await;
        store.select("a");
        store.remove("b").unwrap();
        assert_eq!(store.selected_id(), Some("a".to_string()));
        store.remove("a").unwrap();
        assert!(store.selected_id().is_none());
        assert_eq!(store.count(), 0);
    }

    #[tokio::test]
    async fn test_missing_id_is_not_found_and_no_change() {
        let store = loaded(vec![user("a", "Ann", Role::User, true)]).await;
        let before = store.revision();
        let entities = store.entities();

        assert_eq!(store.toggle_active("zz"), Err(CoreError::not_found("User", "zz")));
        assert_eq!(store.remove("zz"), Err(CoreError::not_found("User", "zz")));

        assert_eq!(store.revision(), before);
        assert!(Arc::ptr_eq(&entities, &store.entities()));
    }

    #[tokio::test]
    async fn test_toggle_scenario() {
        let store = loaded(vec![user("a", "A", Role::User, true), user("b", "B", Role::User, false)]).await;
        assert_eq!(store.active_count(), 1);

        store.toggle_active("a").unwrap();
        assert_eq!(store.active_count(), 0);

        store.toggle_active("b").unwrap();
        assert_eq!(store.active_count(), 1);
        assert_eq!(store.active()[0].id, "b");
        // Toggling never reorders.
        let ids: Vec<_> = store.entities().iter().map(|u| u.id.clone()).collect();
        assert_eq!(ids, vec!["a", "b"]);
    }

    #[tokio::test]
    async fn test_filtered_is_conjunctive_and_current() {
        let store = loaded(vec![
            user("a", "Sarah Admin", Role::Admin, true),
            user("b", "Sarah User", Role::User, true),
            user("c", "Bob Admin", Role::Admin, true),
        ])
        .await;
        store.set_filter(Filter::Only(Role::Admin));
        store.set_search("  SARAH ");
        let ids: Vec<_> = store.filtered().iter().map(|u| u.id.clone()).collect();
        assert_eq!(ids, vec!["a"]);

        store.remove("a").unwrap();
        assert!(store.filtered().is_empty());
    }

    #[tokio::test]
    async fn test_breakdown_includes_zero_counts() {
        let store = loaded(vec![user("a", "Ann", Role::Admin, true)]).await;
        let breakdown = store.breakdown();
        assert_eq!(
            breakdown.as_ref(),
            &[(Role::Admin, 1), (Role::User, 0), (Role::Viewer, 0)]
        );
        assert_eq!(store.facet_count(Role::Viewer), 0);
    }

    #[tokio::test]
    async fn test_memoized_views_reuse_arc_until_input_changes() {
        let store = loaded(vec![user("a", "Ann", Role::Admin, true), user("b", "Bea", Role::User, true)]).await;

        let filtered = store.filtered();
        let entities = store.entities();
        assert!(Arc::ptr_eq(&filtered, &store.filtered()));
        assert!(Arc::ptr_eq(&entities, &store.entities()));

        // Equal search: no version bump, same Arc, no notification.
        let rev = store.revision();
        assert!(!store.set_search(""));
        assert_eq!(store.revision(), rev);
        assert!(Arc::ptr_eq(&filtered, &store.filtered()));

        // Selection is not an input of filtered.
        store.select("a");
        assert!(Arc::ptr_eq(&filtered, &store.filtered()));

        assert!(store.set_search("ann"));
        let narrowed = store.filtered();
        assert!(!Arc::ptr_eq(&filtered, &narrowed));
        assert_eq!(narrowed.len(), 1);
        // Entities did not depend on the query.
        assert!(Arc::ptr_eq(&entities, &store.entities()));

        store.toggle_active("b").unwrap();
        assert!(!Arc::ptr_eq(&entities, &store.entities()));
    }

    #[tokio::test]
    async fn test_failed_load_keeps_collection() {
        let store = EntityStore::new(Arc::new(FailingService));
        let outcome = store.load().await;
        assert_eq!(
            outcome,
            Outcome::Failed("Service unavailable: connection refused".to_string())
        );
        assert!(!store.loading());
        assert_eq!(
            store.error().as_deref(),
            Some("Service unavailable: connection refused")
        );
        assert_eq!(store.count(), 0);
        assert!(!store.is_ready());
    }

    #[tokio::test]
    async fn test_failed_create_leaves_collection_untouched() {
        let store = EntityStore::new(Arc::new(FailingService));
        let outcome = store.create(draft("Zed")).await;
        assert!(matches!(outcome, Outcome::Failed(_)));
        assert_eq!(store.count(), 0);
    }

    #[tokio::test]
    async fn test_create_appends_one_record() {
        let store = loaded(vec![user("a", "Ann", Role::User, true)]).await;
        let before = store.entities();

        assert_eq!(store.create(draft("Zed")).await, Outcome::Applied);

        let after = store.entities();
        assert_eq!(after.len(), before.len() + 1);
        assert_eq!(after[..before.len()], before[..]);
        let created = &after[before.len()];
        assert_eq!(created.name, "Zed");
        assert_eq!(created.role, Role::Viewer);
        assert!(!before.iter().any(|u| u.id == created.id));
        assert!(store.is_ready());
    }

    #[tokio::test]
    async fn test_load_clears_selection_of_vanished_record() {
        let store = loaded(vec![user("a", "Ann", Role::User, true)]).await;
        store.create(draft("Zed")).await;
        let created_id = store.entities()[1].id.clone();
        store.select(&created_id);

        // The mock only knows its seed list, so the created record vanishes.
        store.load().await;
        assert_eq!(store.count(), 1);
        assert!(store.selected_id().is_none());
    }

    #[tokio::test]
    async fn test_failed_reload_keeps_loaded_records() {
        let records = vec![
            user("a", "Ann", Role::Admin, true),
            user("b", "Bea", Role::User, false),
            user("c", "Cid", Role::Viewer, true),
        ];
        let store = EntityStore::new(Arc::new(FlakyService::serving(records, 1)));
        assert_eq!(store.load().await, Outcome::Applied);
        store.select("b");
        let before = store.entities();

        let outcome = store.load().await;
        assert_eq!(
            outcome,
            Outcome::Failed("Service unavailable: connection refused".to_string())
        );

        let after = store.entities();
        assert_eq!(after[..], before[..]);
        let ids: Vec<_> = after.iter().map(|u| u.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b", "c"]);
        assert!(!store.loading());
        assert_eq!(
            store.error().as_deref(),
            Some("Service unavailable: connection refused")
        );
        assert_eq!(store.selected_id().as_deref(), Some("b"));
        assert_eq!(store.loading_state().status(), LoadStatus::Failed);
    }

    #[tokio::test(start_paused = true)]
    async fn test_newer_load_supersedes_older_load() {
        let service = MockUserService::with_records(
            vec![user("a", "Ann", Role::User, true)],
            Latency::default(),
        );
        let store = EntityStore::new(Arc::new(service));

        // Each load takes 1000ms; the second starts 400ms after the first.
        let first = tokio::spawn(store.load());
        tokio::time::sleep(Duration::from_millis(400)).await;
        let second = tokio::spawn(store.load());

        assert_eq!(first.await.unwrap(), Outcome::Superseded);
        assert_eq!(store.count(), 0);
        assert!(store.loading());
        let rev = store.revision();

        assert_eq!(second.await.unwrap(), Outcome::Applied);
        assert_eq!(store.count(), 1);
        assert!(!store.loading());
        assert!(store.revision() > rev);
    }

    #[tokio::test(start_paused = true)]
    async fn test_newer_create_supersedes_older_create() {
        let service = MockUserService::with_records(
            vec![user("a", "Ann", Role::User, true)],
            Latency::default(),
        );
        let store = EntityStore::new(Arc::new(service));
        assert_eq!(store.load().await, Outcome::Applied);

        let first = tokio::spawn(store.create(draft("Bea")));
        tokio::time::sleep(Duration::from_millis(100)).await;
        let second = tokio::spawn(store.create(draft("Cid")));

        assert_eq!(first.await.unwrap(), Outcome::Superseded);
        assert_eq!(store.count(), 1);
        assert!(store.loading());

        assert_eq!(second.await.unwrap(), Outcome::Applied);
        let names: Vec<_> = store.entities().iter().map(|u| u.name.clone()).collect();
        assert_eq!(names, vec!["Ann", "Cid"]);
        assert!(store.is_ready());
    }

    #[tokio::test(start_paused = true)]
    async fn test_create_during_load_survives_the_load() {
        let service = MockUserService::with_records(
            vec![user("a", "Ann", Role::User, true)],
            Latency::default(),
        );
        let store = EntityStore::new(Arc::new(service));

        // load: 0..1000ms, create: 200..700ms.
        let load = tokio::spawn(store.load());
        tokio::time::sleep(Duration::from_millis(200)).await;
        let create = tokio::spawn(store.create(draft("Zed")));

        assert_eq!(create.await.unwrap(), Outcome::Applied);
        assert_eq!(store.count(), 1);
        assert!(store.loading());

        assert_eq!(load.await.unwrap(), Outcome::Applied);
        let names: Vec<_> = store.entities().iter().map(|u| u.name.clone()).collect();
        assert_eq!(names, vec!["Ann", "Zed"]);
        assert!(!store.loading());
        assert!(store.is_ready());
    }

    #[tokio::test]
    async fn test_selected_follows_record_changes() {
        let store = loaded(vec![user("a", "Ann", Role::User, true), user("b", "Bea", Role::User, true)]).await;
        assert!(store.selected().is_none());

        store.select("a");
        assert!(store.selected().unwrap().active);
        assert_eq!(store.selected(), store.selected());

        store.toggle_active("a").unwrap();
        assert!(!store.selected().unwrap().active);

        // Changes to other records leave the selection as it was.
        store.toggle_active("b").unwrap();
        assert_eq!(store.selected().map(|u| u.id), Some("a".to_string()));

        store.remove("a").unwrap();
        assert!(store.selected().is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_loading_visible_while_in_flight() {
        let service = MockUserService::with_records(vec![], Latency::uniform(Duration::from_millis(200)));
        let store = EntityStore::new(Arc::new(service));
        let mut rx = store.subscribe();

        let pending = tokio::spawn(store.load());
        assert!(store.loading());
        assert!(rx.has_changed().unwrap());

        store.settled().await;
        assert!(!store.loading());
        assert_eq!(pending.await.unwrap(), Outcome::Applied);
    }
}
