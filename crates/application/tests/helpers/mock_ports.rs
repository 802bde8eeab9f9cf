use async_trait::async_trait;
use ferrous_resolver_application::ports::{
    CacheMetricsSnapshot, RecursiveResolver, ResponseCachePort,
};
use ferrous_resolver_domain::wire::{FLAG_AA, FLAG_QR};
use ferrous_resolver_domain::{
    DnsQuery, DomainError, Header, Packet, Question, Record, RecordType,
};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::RwLock;

/// Resolver answering from canned answer sets, echoing the query id.
#[derive(Clone)]
pub struct MockRecursiveResolver {
    answers: Arc<RwLock<HashMap<String, Vec<Record>>>>,
    error_responses: Arc<std::sync::RwLock<HashMap<String, DomainError>>>,
    delay: Arc<std::sync::RwLock<Option<Duration>>>,
    calls: Arc<AtomicUsize>,
    seen_ids: Arc<Mutex<Vec<Option<u16>>>>,
}

impl MockRecursiveResolver {
    pub fn new() -> Self {
        Self {
            answers: Arc::new(RwLock::new(HashMap::new())),
            error_responses: Arc::new(std::sync::RwLock::new(HashMap::new())),
            delay: Arc::new(std::sync::RwLock::new(None)),
            calls: Arc::new(AtomicUsize::new(0)),
            seen_ids: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub async fn set_answers(&self, domain: &str, answers: Vec<Record>) {
        self.answers
            .write()
            .await
            .insert(domain.to_string(), answers);
    }

    pub fn set_response_error(&self, domain: &str, error: DomainError) {
        self.error_responses
            .write()
            .unwrap()
            .insert(domain.to_string(), error);
    }

    pub fn set_delay(&self, delay: Duration) {
        *self.delay.write().unwrap() = Some(delay);
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn seen_ids(&self) -> Vec<Option<u16>> {
        self.seen_ids.lock().unwrap().clone()
    }
}

impl Default for MockRecursiveResolver {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RecursiveResolver for MockRecursiveResolver {
    async fn resolve(&self, query: &DnsQuery) -> Result<Arc<[u8]>, DomainError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.seen_ids.lock().unwrap().push(query.id);

        let delay = *self.delay.read().unwrap();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        if let Some(err) = self
            .error_responses
            .read()
            .unwrap()
            .get(query.domain.as_ref())
            .cloned()
        {
            return Err(err);
        }

        let answers = self
            .answers
            .read()
            .await
            .get(query.domain.as_ref())
            .cloned()
            .ok_or_else(|| DomainError::NoUsableReferral {
                server: format!("mock ({})", query.domain),
            })?;

        let packet = Packet {
            header: Header {
                id: query.id.unwrap_or(0),
                flags: FLAG_QR | FLAG_AA,
                ..Header::default()
            },
            questions: vec![Question::new(&*query.domain, query.record_type)],
            answers,
            ..Packet::default()
        };
        Ok(Arc::from(packet.encode()?))
    }
}

/// In-memory cache port that ignores TTLs and records every store.
#[derive(Clone, Default)]
pub struct MockResponseCache {
    entries: Arc<Mutex<HashMap<(String, RecordType), Arc<[u8]>>>>,
    stores: Arc<Mutex<Vec<(String, usize)>>>,
    lookups: Arc<AtomicUsize>,
}

impl MockResponseCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn preload(&self, name: &str, record_type: RecordType, response: Vec<u8>) {
        self.entries.lock().unwrap().insert(
            (name.to_ascii_lowercase(), record_type),
            Arc::from(response),
        );
    }

    /// `(name, answer count)` for every store call, in order.
    pub fn stores(&self) -> Vec<(String, usize)> {
        self.stores.lock().unwrap().clone()
    }

    pub fn lookup_count(&self) -> usize {
        self.lookups.load(Ordering::SeqCst)
    }
}

impl ResponseCachePort for MockResponseCache {
    fn lookup(&self, question: &Question) -> Option<Arc<[u8]>> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        self.entries
            .lock()
            .unwrap()
            .get(&(question.name.to_ascii_lowercase(), question.qtype))
            .cloned()
    }

    fn store(&self, question: &Question, response: Arc<[u8]>, answers: &[Record]) {
        self.stores
            .lock()
            .unwrap()
            .push((question.name.clone(), answers.len()));
        if answers.is_empty() {
            return;
        }
        self.entries
            .lock()
            .unwrap()
            .insert((question.name.to_ascii_lowercase(), question.qtype), response);
    }

    fn len(&self) -> usize {
        self.entries.lock().unwrap().len()
    }

    fn metrics_snapshot(&self) -> CacheMetricsSnapshot {
        CacheMetricsSnapshot {
            total_entries: self.len(),
            ..CacheMetricsSnapshot::default()
        }
    }
}
