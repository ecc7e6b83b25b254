//! Result cache: one LRU per result kind, each with its own size cap,
//! write TTL and access TTL.

use std::collections::HashMap;
use std::future::Future;
use std::num::NonZeroUsize;
use std::sync::{Arc, PoisonError};
use std::time::Duration;

use lru::LruCache;
use serde_json::json;
use sha2::{Digest, Sha256};
use tokio::sync::Mutex;
use tokio::time::Instant;
use tracing::debug;
use uuid::Uuid;

use crate::models::interview::QuestionSet;
use crate::models::learning::LearningPath;
use crate::models::profile::Profile;

#[derive(Debug, Clone, Copy)]
pub struct CachePolicy {
    pub max_entries: usize,
    /// Entry expires this long after it was written.
    pub write_ttl: Duration,
    /// Entry expires this long after it was last read.
    pub access_ttl: Duration,
}

pub const QUESTIONS_POLICY: CachePolicy = CachePolicy {
    max_entries: 500,
    write_ttl: Duration::from_secs(60 * 60),
    access_ttl: Duration::from_secs(30 * 60),
};

pub const PATHS_POLICY: CachePolicy = CachePolicy {
    max_entries: 200,
    write_ttl: Duration::from_secs(2 * 60 * 60),
    access_ttl: Duration::from_secs(60 * 60),
};

pub const RESPONSES_POLICY: CachePolicy = CachePolicy {
    max_entries: 300,
    write_ttl: Duration::from_secs(45 * 60),
    access_ttl: Duration::from_secs(20 * 60),
};

struct Entry<V> {
    value: V,
    written_at: Instant,
    accessed_at: Instant,
}

impl<V> Entry<V> {
    fn is_expired(&self, now: Instant, policy: &CachePolicy) -> bool {
        now.duration_since(self.written_at) >= policy.write_ttl
            || now.duration_since(self.accessed_at) >= policy.access_ttl
    }
}

type Gates = std::sync::Mutex<HashMap<String, Arc<Mutex<()>>>>;

/// Holds one reference to a key's population gate. Dropping it, on return or
/// when the caller's future is cancelled, removes the gate once nobody else
/// holds it.
struct GateRef<'a> {
    gates: &'a Gates,
    key: &'a str,
    gate: Arc<Mutex<()>>,
}

impl<'a> GateRef<'a> {
    fn acquire(gates: &'a Gates, key: &'a str) -> Self {
        let gate = gates
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .entry(key.to_string())
            .or_default()
            .clone();
        Self { gates, key, gate }
    }
}

impl Drop for GateRef<'_> {
    fn drop(&mut self) {
        // Gates are only cloned under this lock. A count of two is the map
        // plus this reference, so nobody else is waiting.
        let mut gates = self.gates.lock().unwrap_or_else(PoisonError::into_inner);
        if Arc::strong_count(&self.gate) == 2 {
            gates.remove(self.key);
        }
    }
}

/// LRU cache with write/access expiry and single-flight population.
pub struct TtlCache<V> {
    name: &'static str,
    policy: CachePolicy,
    entries: Mutex<LruCache<String, Entry<V>>>,
    /// One gate per key currently being populated.
    in_flight: Gates,
}

impl<V: Clone + Send> TtlCache<V> {
    pub fn new(name: &'static str, policy: CachePolicy) -> Self {
        let capacity = NonZeroUsize::new(policy.max_entries).unwrap_or(NonZeroUsize::MIN);
        Self {
            name,
            policy,
            entries: Mutex::new(LruCache::new(capacity)),
            in_flight: std::sync::Mutex::new(HashMap::new()),
        }
    }

    /// Returns a live entry and refreshes its access time. Expired entries
    /// are dropped on sight.
    pub async fn get(&self, key: &str) -> Option<V> {
        let mut entries = self.entries.lock().await;
        let now = Instant::now();

        let expired = match entries.get_mut(key) {
            None => return None,
            Some(entry) if entry.is_expired(now, &self.policy) => true,
            Some(entry) => {
                entry.accessed_at = now;
                return Some(entry.value.clone());
            }
        };
        if expired {
            entries.pop(key);
            debug!("{} cache: expired {key}", self.name);
        }
        None
    }

    pub async fn insert(&self, key: String, value: V) {
        let now = Instant::now();
        self.entries.lock().await.put(
            key,
            Entry {
                value,
                written_at: now,
                accessed_at: now,
            },
        );
    }

    /// Read-through: on a miss, runs `populate` and stores its `Ok` value.
    ///
    /// Concurrent misses on the same key wait for the first population and
    /// then read its result; at most one `populate` per key runs at a time.
    /// Errors are returned as-is and never cached.
    pub async fn get_or_try_insert_with<F, Fut, E>(&self, key: &str, populate: F) -> Result<V, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<V, E>>,
    {
        if let Some(v) = self.get(key).await {
            return Ok(v);
        }

        let gate = GateRef::acquire(&self.in_flight, key);
        let _populating = gate.gate.lock().await;

        if let Some(v) = self.get(key).await {
            return Ok(v);
        }
        let v = populate().await?;
        self.insert(key.to_string(), v.clone()).await;
        Ok(v)
    }

    pub async fn remove(&self, key: &str) -> Option<V> {
        self.entries.lock().await.pop(key).map(|e| e.value)
    }

    /// Removes every entry whose key matches. Returns how many were removed.
    pub async fn remove_where(&self, matches: impl Fn(&str) -> bool) -> usize {
        let mut entries = self.entries.lock().await;
        let doomed: Vec<String> = entries
            .iter()
            .filter(|(k, _)| matches(k))
            .map(|(k, _)| k.clone())
            .collect();
        for key in &doomed {
            entries.pop(key);
        }
        doomed.len()
    }

    #[cfg(test)]
    pub async fn len(&self) -> usize {
        self.entries.lock().await.len()
    }
}

/// Which result a fingerprint addresses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheKind {
    Questions,
    LearningPath,
    ChainedLearningPath,
    SkillAnalysis,
}

impl CacheKind {
    fn tag(&self) -> &'static str {
        match self {
            CacheKind::Questions => "questions",
            CacheKind::LearningPath => "path",
            CacheKind::ChainedLearningPath => "chained-path",
            CacheKind::SkillAnalysis => "analysis",
        }
    }
}

/// The three result caches shared by the orchestrator.
pub struct ResultCache {
    pub questions: TtlCache<QuestionSet>,
    pub paths: TtlCache<LearningPath>,
    pub responses: TtlCache<String>,
}

impl Default for ResultCache {
    fn default() -> Self {
        Self {
            questions: TtlCache::new("interview-questions", QUESTIONS_POLICY),
            paths: TtlCache::new("learning-paths", PATHS_POLICY),
            responses: TtlCache::new("ai-responses", RESPONSES_POLICY),
        }
    }
}

impl ResultCache {
    /// `{kind}:{profile id}:{sha256 of profile content}`.
    ///
    /// The hash covers the content fields only; the id prefix exists so a
    /// profile's entries can be invalidated without knowing its old content.
    pub fn fingerprint(profile: &Profile, kind: CacheKind) -> String {
        let canonical = json!({
            "role": profile.role.code(),
            "experience_years": profile.experience_years,
            "summary": profile.summary,
            "project_text": profile.project_text,
            "skills": profile.skills,
        });
        let mut hasher = Sha256::new();
        hasher.update(kind.tag().as_bytes());
        hasher.update(b"\n");
        hasher.update(canonical.to_string().as_bytes());
        format!("{}:{}:{:x}", kind.tag(), profile.id, hasher.finalize())
    }

    /// Drops every cached result derived from this profile.
    pub async fn invalidate_profile(&self, profile_id: Uuid) -> usize {
        let needle = format!(":{profile_id}:");
        let removed = self.questions.remove_where(|k| k.contains(&needle)).await
            + self.paths.remove_where(|k| k.contains(&needle)).await
            + self.responses.remove_where(|k| k.contains(&needle)).await;
        if removed > 0 {
            debug!("Invalidated {removed} cached results for profile {profile_id}");
        }
        removed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::profile::JobRole;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn policy() -> CachePolicy {
        CachePolicy {
            max_entries: 2,
            write_ttl: Duration::from_secs(60),
            access_ttl: Duration::from_secs(20),
        }
    }

    fn profile() -> Profile {
        Profile {
            id: Uuid::new_v4(),
            role: JobRole::FrontendDeveloper,
            experience_years: 2,
            summary: "React 기반 대시보드 개발".to_string(),
            project_text: None,
            skills: vec!["React".to_string(), "TypeScript".to_string()],
        }
    }

    #[tokio::test]
    async fn test_get_after_insert() {
        let cache = TtlCache::new("t", policy());
        cache.insert("a".to_string(), 1).await;
        assert_eq!(cache.get("a").await, Some(1));
        assert_eq!(cache.get("b").await, None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_access_ttl_expires_idle_entries() {
        let cache = TtlCache::new("t", policy());
        cache.insert("a".to_string(), 1).await;

        tokio::time::advance(Duration::from_secs(15)).await;
        assert_eq!(cache.get("a").await, Some(1));

        tokio::time::advance(Duration::from_secs(15)).await;
        assert_eq!(cache.get("a").await, Some(1), "read refreshed access time");

        tokio::time::advance(Duration::from_secs(21)).await;
        assert_eq!(cache.get("a").await, None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_write_ttl_expires_even_busy_entries() {
        let cache = TtlCache::new("t", policy());
        cache.insert("a".to_string(), 1).await;
        for _ in 0..5 {
            tokio::time::advance(Duration::from_secs(11)).await;
            assert_eq!(cache.get("a").await, Some(1));
        }
        tokio::time::advance(Duration::from_secs(6)).await;
        assert_eq!(cache.get("a").await, None);
        assert_eq!(cache.len().await, 0);
    }

    #[tokio::test]
    async fn test_size_cap_evicts_least_recently_used() {
        let cache = TtlCache::new("t", policy());
        cache.insert("a".to_string(), 1).await;
        cache.insert("b".to_string(), 2).await;
        cache.get("a").await;
        cache.insert("c".to_string(), 3).await;
        assert_eq!(cache.get("b").await, None);
        assert_eq!(cache.get("a").await, Some(1));
    }

    #[tokio::test]
    async fn test_read_through_populates_once() {
        let cache = TtlCache::new("t", policy());
        let calls = AtomicUsize::new(0);
        for _ in 0..3 {
            let v: Result<u32, ()> = cache
                .get_or_try_insert_with("k", || async {
                    calls.fetch_add(1, Ordering::SeqCst);
                    Ok(7)
                })
                .await;
            assert_eq!(v, Ok(7));
        }
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_concurrent_misses_share_one_population() {
        let cache = Arc::new(TtlCache::new("t", policy()));
        let calls = Arc::new(AtomicUsize::new(0));

        let mut handles = Vec::new();
        for _ in 0..8 {
            let cache = cache.clone();
            let calls = calls.clone();
            handles.push(tokio::spawn(async move {
                cache
                    .get_or_try_insert_with("k", || async {
                        calls.fetch_add(1, Ordering::SeqCst);
                        tokio::time::sleep(Duration::from_millis(20)).await;
                        Ok::<_, ()>("value".to_string())
                    })
                    .await
            }));
        }
        for h in handles {
            assert_eq!(h.await.unwrap().unwrap(), "value");
        }
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(cache.in_flight.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_cancelled_population_releases_its_gate() {
        let cache = Arc::new(TtlCache::<u32>::new("t", policy()));
        let task = {
            let cache = cache.clone();
            tokio::spawn(async move {
                cache
                    .get_or_try_insert_with("k", || async {
                        tokio::time::sleep(Duration::from_secs(60)).await;
                        Ok::<_, ()>(1)
                    })
                    .await
            })
        };
        tokio::time::sleep(Duration::from_millis(20)).await;
        assert_eq!(cache.in_flight.lock().unwrap().len(), 1);

        task.abort();
        assert!(task.await.unwrap_err().is_cancelled());
        assert!(cache.in_flight.lock().unwrap().is_empty());

        // The key can be populated again afterwards.
        let v: Result<u32, ()> = cache.get_or_try_insert_with("k", || async { Ok(2) }).await;
        assert_eq!(v, Ok(2));
    }

    #[tokio::test]
    async fn test_errors_are_not_cached() {
        let cache: TtlCache<u32> = TtlCache::new("t", policy());
        let first: Result<u32, &str> = cache.get_or_try_insert_with("k", || async { Err("boom") }).await;
        assert_eq!(first, Err("boom"));
        let second: Result<u32, &str> = cache.get_or_try_insert_with("k", || async { Ok(1) }).await;
        assert_eq!(second, Ok(1));
    }

    #[test]
    fn test_fingerprint_ignores_id_in_hash_and_tracks_content() {
        let a = profile();
        let mut b = a.clone();
        b.id = Uuid::new_v4();
        let hash = |p: &Profile| {
            ResultCache::fingerprint(p, CacheKind::Questions)
                .rsplit(':')
                .next()
                .map(str::to_string)
        };
        assert_eq!(hash(&a), hash(&b));

        b.skills.push("Vue".to_string());
        assert_ne!(hash(&a), hash(&b));
    }

    #[test]
    fn test_fingerprint_differs_per_kind() {
        let p = profile();
        assert_ne!(
            ResultCache::fingerprint(&p, CacheKind::LearningPath),
            ResultCache::fingerprint(&p, CacheKind::ChainedLearningPath)
        );
    }

    #[tokio::test]
    async fn test_invalidate_profile_only_touches_that_profile() {
        let cache = ResultCache::default();
        let p = profile();
        let other = profile();
        cache
            .responses
            .insert(ResultCache::fingerprint(&p, CacheKind::SkillAnalysis), "a".into())
            .await;
        cache
            .responses
            .insert(ResultCache::fingerprint(&other, CacheKind::SkillAnalysis), "b".into())
            .await;

        assert_eq!(cache.invalidate_profile(p.id).await, 1);
        assert_eq!(cache.responses.len().await, 1);
    }
}
