//! Instrumented fakes for the sync engine seams.

#![allow(dead_code)]

use async_trait::async_trait;
use chrono::{DateTime, Duration as ChronoDuration, TimeZone, Utc};
use fake::faker::internet::en::SafeEmail;
use fake::faker::name::en::{FirstName, LastName};
use fake::Fake;
use listsync::adapters::traits::{DestinationClient, SourceClient, WatermarkStore};
use listsync::adapters::state::MemoryWatermarkStore;
use listsync::core::state::StateManager;
use listsync::core::sync::{SyncEngine, SyncOptions};
use listsync::domain::ids::CollectionId;
use listsync::domain::{
    Collection, CollectionStats, Contact, DestinationError, Member, MembersPage, MergeFields,
    Result, SourceError, SyncError,
};
use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Timestamp all generated members were last changed at
pub fn seeded_at() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap()
}

pub fn list_id(id: &str) -> CollectionId {
    CollectionId::new(id).unwrap()
}

/// Generate `count` members with realistic names and emails
pub fn generate_members(count: usize) -> Vec<Member> {
    (0..count)
        .map(|i| {
            let first: String = FirstName().fake();
            let last: String = LastName().fake();
            Member {
                id: format!("member-{i}"),
                email_address: SafeEmail().fake(),
                full_name: format!("{first} {last}"),
                status: "subscribed".to_string(),
                merge_fields: MergeFields {
                    first_name: first,
                    last_name: last,
                },
            }
        })
        .collect()
}

/// A fetch request as seen by the fake source
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchCall {
    pub list_id: String,
    pub offset: usize,
    pub count: usize,
    pub since: Option<String>,
}

/// Requests currently running against either fake, and the highest count seen
#[derive(Default)]
pub struct InFlight {
    now: AtomicUsize,
    max: AtomicUsize,
}

impl InFlight {
    fn enter(&self) {
        let now = self.now.fetch_add(1, Ordering::SeqCst) + 1;
        self.max.fetch_max(now, Ordering::SeqCst);
    }

    fn exit(&self) {
        self.now.fetch_sub(1, Ordering::SeqCst);
    }

    pub fn max(&self) -> usize {
        self.max.load(Ordering::SeqCst)
    }
}

/// Source fake serving one list from memory
///
/// Honors the changed-since filter, counts calls and tracks concurrent
/// requests in an [`InFlight`] it can share with a [`FakeDestination`].
#[derive(Default)]
pub struct FakeSource {
    members: Mutex<Vec<(DateTime<Utc>, Member)>>,
    collections: Mutex<Vec<Collection>>,
    reported_total: Mutex<Option<usize>>,
    failing_offsets: Mutex<HashSet<usize>>,
    delay: Mutex<Duration>,
    calls: Mutex<Vec<FetchCall>>,
    in_flight: Arc<InFlight>,
}

impl FakeSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve `members`, all last changed at [`seeded_at`]
    pub fn with_members(members: Vec<Member>) -> Self {
        let source = Self::new();
        source.add_members(seeded_at(), members);
        source
    }

    pub fn add_members(&self, changed_at: DateTime<Utc>, members: Vec<Member>) {
        self.members
            .lock()
            .unwrap()
            .extend(members.into_iter().map(|m| (changed_at, m)));
    }

    pub fn with_collections(self, ids: &[&str]) -> Self {
        *self.collections.lock().unwrap() = ids
            .iter()
            .map(|id| Collection {
                id: list_id(id),
                name: format!("List {id}"),
                stats: CollectionStats::default(),
            })
            .collect();
        self
    }

    /// Announce a different `total_items` than the members served
    pub fn reporting_total(self, total: usize) -> Self {
        *self.reported_total.lock().unwrap() = Some(total);
        self
    }

    pub fn failing_at_offset(self, offset: usize) -> Self {
        self.failing_offsets.lock().unwrap().insert(offset);
        self
    }

    pub fn with_delay(self, delay: Duration) -> Self {
        *self.delay.lock().unwrap() = delay;
        self
    }

    /// Stop failing any offset
    pub fn recover(&self) {
        self.failing_offsets.lock().unwrap().clear();
    }

    pub fn calls(&self) -> Vec<FetchCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    /// Highest number of fetches and pushes running at once
    pub fn max_in_flight(&self) -> usize {
        self.in_flight.max()
    }

    pub fn in_flight(&self) -> Arc<InFlight> {
        self.in_flight.clone()
    }

    /// Wait until at least `count` fetches were made
    pub async fn wait_for_calls(&self, count: usize) {
        for _ in 0..200 {
            if self.call_count() >= count {
                return;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
    }

    fn matching(&self, since: Option<&str>) -> Vec<Member> {
        let since = since.map(|s| {
            DateTime::parse_from_rfc3339(s)
                .expect("engine sends RFC 3339 filters")
                .with_timezone(&Utc)
        });

        self.members
            .lock()
            .unwrap()
            .iter()
            .filter(|(changed_at, _)| since.map_or(true, |since| *changed_at >= since))
            .map(|(_, m)| m.clone())
            .collect()
    }
}

#[async_trait]
impl SourceClient for FakeSource {
    async fn fetch_page(
        &self,
        collection_id: &CollectionId,
        offset: usize,
        count: usize,
        since: Option<&str>,
    ) -> Result<MembersPage> {
        self.calls.lock().unwrap().push(FetchCall {
            list_id: collection_id.to_string(),
            offset,
            count,
            since: since.map(str::to_string),
        });

        self.in_flight.enter();

        let delay = *self.delay.lock().unwrap();
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }

        self.in_flight.exit();

        if self.failing_offsets.lock().unwrap().contains(&offset) {
            return Err(SourceError::ServerError {
                status: 503,
                message: format!("offset {offset} unavailable"),
            }
            .into());
        }

        let matching = self.matching(since);
        let total_items = self.reported_total.lock().unwrap().unwrap_or(matching.len());
        let members = matching.into_iter().skip(offset).take(count).collect();

        Ok(MembersPage {
            total_items,
            members,
        })
    }

    async fn list_collections(&self) -> Result<Vec<Collection>> {
        Ok(self.collections.lock().unwrap().clone())
    }
}

/// Destination fake recording every accepted batch
#[derive(Default)]
pub struct FakeDestination {
    batches: Mutex<Vec<Vec<Contact>>>,
    reject_member: Mutex<Option<String>>,
    delay: Mutex<Duration>,
    in_flight: Mutex<Arc<InFlight>>,
}

impl FakeDestination {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reject any batch containing the member with this id
    pub fn rejecting(self, member_id: &str) -> Self {
        *self.reject_member.lock().unwrap() = Some(member_id.to_string());
        self
    }

    pub fn with_delay(self, delay: Duration) -> Self {
        *self.delay.lock().unwrap() = delay;
        self
    }

    /// Count pushes in the same tracker as `tracker`'s other requests
    pub fn sharing_in_flight(self, tracker: Arc<InFlight>) -> Self {
        *self.in_flight.lock().unwrap() = tracker;
        self
    }

    pub fn batch_count(&self) -> usize {
        self.batches.lock().unwrap().len()
    }

    pub fn batches(&self) -> Vec<Vec<Contact>> {
        self.batches.lock().unwrap().clone()
    }

    pub fn pushed_contacts(&self) -> Vec<Contact> {
        self.batches().into_iter().flatten().collect()
    }
}

#[async_trait]
impl DestinationClient for FakeDestination {
    async fn push_batch(&self, contacts: &[Contact]) -> Result<()> {
        let in_flight = self.in_flight.lock().unwrap().clone();
        in_flight.enter();

        let delay = *self.delay.lock().unwrap();
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }

        in_flight.exit();

        if let Some(reject) = self.reject_member.lock().unwrap().as_deref() {
            if contacts.iter().any(|c| c.id == reject) {
                return Err(DestinationError::Rejected {
                    status: 400,
                    message: format!("invalid contact {reject}"),
                }
                .into());
            }
        }

        self.batches.lock().unwrap().push(contacts.to_vec());
        Ok(())
    }
}

/// Store wrapper that can be told to fail reads or writes
#[derive(Default)]
pub struct FlakyStore {
    inner: MemoryWatermarkStore,
    fail_get: AtomicBool,
    fail_set: AtomicBool,
    sets: AtomicUsize,
}

impl FlakyStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_reads(&self, fail: bool) {
        self.fail_get.store(fail, Ordering::SeqCst);
    }

    pub fn fail_writes(&self, fail: bool) {
        self.fail_set.store(fail, Ordering::SeqCst);
    }

    pub fn set_count(&self) -> usize {
        self.sets.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl WatermarkStore for FlakyStore {
    async fn ping(&self) -> Result<()> {
        Ok(())
    }

    async fn get(&self, key: &str) -> Result<Option<String>> {
        if self.fail_get.load(Ordering::SeqCst) {
            return Err(SyncError::State("connection refused".to_string()));
        }
        self.inner.get(key).await
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        if self.fail_set.load(Ordering::SeqCst) {
            return Err(SyncError::State("connection refused".to_string()));
        }
        self.sets.fetch_add(1, Ordering::SeqCst);
        self.inner.set(key, value).await
    }

    fn backend_name(&self) -> &'static str {
        "flaky"
    }
}

/// An engine wired to the given fakes
pub struct Harness {
    pub source: Arc<FakeSource>,
    pub destination: Arc<FakeDestination>,
    pub store: Arc<FlakyStore>,
    pub state: Arc<StateManager>,
    pub engine: SyncEngine,
}

impl Harness {
    pub fn new(source: FakeSource, destination: FakeDestination, options: SyncOptions) -> Self {
        let destination = Arc::new(destination.sharing_in_flight(source.in_flight()));
        let source = Arc::new(source);
        let store = Arc::new(FlakyStore::new());
        let state = Arc::new(StateManager::new(store.clone(), None));
        let engine = SyncEngine::new(source.clone(), destination.clone(), state.clone(), options);

        Self {
            source,
            destination,
            store,
            state,
            engine,
        }
    }

    pub fn with_page_size(source: FakeSource, page_size: usize) -> Self {
        Self::new(
            source,
            FakeDestination::new(),
            SyncOptions {
                page_size,
                ..SyncOptions::default()
            },
        )
    }

    /// Stored watermark value for a list, if any
    pub async fn stored(&self, id: &str) -> Option<String> {
        self.store.inner.get(id).await.unwrap()
    }

    /// Seed a watermark directly in the store
    pub async fn seed_watermark(&self, id: &str, at: DateTime<Utc>) {
        self.store
            .inner
            .set(id, &at.to_rfc3339_opts(chrono::SecondsFormat::Secs, true))
            .await
            .unwrap();
    }
}

/// One second after `at`, for members changed after a given watermark
pub fn just_after(at: DateTime<Utc>) -> DateTime<Utc> {
    at + ChronoDuration::seconds(1)
}
