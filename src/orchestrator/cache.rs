//! 带有效期的结果缓存
//!
//! 测验按 (主题, 题目数) 缓存、趣闻按商品缓存，减少 LLM 调用次数。
//! 有效期内拿到旧结果是可以接受的；条目数超过容量时淘汰最久未使用的。

use lru::LruCache;
use std::hash::Hash;
use std::num::NonZeroUsize;
use std::time::{Duration, Instant};

#[derive(Debug)]
pub struct TtlCache<K: Eq + Hash, V> {
    ttl: Duration,
    entries: LruCache<K, (Instant, V)>,
}

impl<K: Eq + Hash, V: Clone> TtlCache<K, V> {
    /// `capacity` 为 0 时按 1 处理
    pub fn new(capacity: usize, ttl: Duration) -> Self {
        let capacity = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            ttl,
            entries: LruCache::new(capacity),
        }
    }

    /// 未过期时返回缓存值；过期的条目会被删除
    pub fn get(&mut self, key: &K) -> Option<V> {
        let now = Instant::now();
        if let Some((inserted_at, value)) = self.entries.get(key) {
            if now.duration_since(*inserted_at) < self.ttl {
                return Some(value.clone());
            }
            self.entries.pop(key);
        }
        None
    }

    /// 插入前先清理所有过期条目
    pub fn insert(&mut self, key: K, value: V) {
        self.prune_expired();
        self.entries.put(key, (Instant::now(), value));
    }

    pub fn prune_expired(&mut self) {
        let now = Instant::now();
        loop {
            let expired = self
                .entries
                .peek_lru()
                .is_some_and(|(_, (inserted_at, _))| now.duration_since(*inserted_at) >= self.ttl);
            if !expired {
                break;
            }
            self.entries.pop_lru();
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
