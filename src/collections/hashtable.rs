/// Polynomial rolling hash (`h = 31 * h + b`), truncated to 31 bits
#[inline]
pub fn simple_hash(key: &[u8]) -> u32 {
    key.iter().fold(0u32, |h, &b| h.wrapping_mul(31).wrapping_add(b as u32)) & 0x7FFF_FFFF
}

use crate::error::Result;

/// One key/value pair in a bucket chain
#[derive(Debug)]
struct Entry<V> {
    key: Box<[u8]>,
    value: V,
    next: Link<V>,
}

type Link<V> = Option<Box<Entry<V>>>;

/// Separate-chaining hash table keyed by byte strings
///
/// The bucket count is fixed at construction. Lookups compare keys by exact
/// byte equality.
#[derive(Debug)]
pub struct HashTable<V> {
    buckets: Vec<Link<V>>,
    /// Number of distinct keys present
    used: usize,
}

impl<V> HashTable<V> {
    /// Create a table with `size` buckets (at least one)
    pub fn new(size: usize) -> Result<Self> {
        let size = size.max(1);
        let mut buckets = Vec::new();
        buckets.try_reserve_exact(size)?;
        buckets.resize_with(size, || None);
        Ok(Self { buckets, used: 0 })
    }

    #[inline]
    fn bucket_index(&self, key: &[u8]) -> usize {
        simple_hash(key) as usize % self.buckets.len()
    }

    /// Insert or overwrite
    ///
    /// Returns the previous value when the key was already present.
    pub fn set(&mut self, key: &[u8], value: V) -> Option<V> {
        let idx = self.bucket_index(key);
        let mut link = self.buckets[idx].as_deref_mut();
        while let Some(entry) = link {
            if *entry.key == *key {
                return Some(std::mem::replace(&mut entry.value, value));
            }
            link = entry.next.as_deref_mut();
        }

        let head = self.buckets[idx].take();
        self.buckets[idx] = Some(Box::new(Entry { key: key.into(), value, next: head }));
        self.used += 1;
        None
    }

    /// First exact match in the key's chain
    pub fn get(&self, key: &[u8]) -> Option<&V> {
        let mut link = self.buckets[self.bucket_index(key)].as_deref();
        while let Some(entry) = link {
            if *entry.key == *key {
                return Some(&entry.value);
            }
            link = entry.next.as_deref();
        }
        None
    }

    /// Unlink the key's entry from its chain and return its value
    pub fn remove(&mut self, key: &[u8]) -> Option<V> {
        let idx = self.bucket_index(key);
        let mut link = &mut self.buckets[idx];
        while link.as_ref().is_some_and(|entry| *entry.key != *key) {
            link = &mut link.as_mut()?.next;
        }

        let mut removed = link.take()?;
        *link = removed.next.take();
        self.used -= 1;
        Some(removed.value)
    }

    /// Number of distinct keys currently set
    pub fn len(&self) -> usize {
        self.used
    }

    pub fn is_empty(&self) -> bool {
        self.used == 0
    }

    /// Number of buckets
    pub fn bucket_count(&self) -> usize {
        self.buckets.len()
    }

    /// Drop every entry, keeping the bucket array
    pub fn clear(&mut self) {
        for bucket in &mut self.buckets {
            // Unlink iteratively so long chains don't recurse in Drop
            let mut link = bucket.take();
            while let Some(mut entry) = link {
                link = entry.next.take();
            }
        }
        self.used = 0;
    }
}

impl<V> Drop for HashTable<V> {
    fn drop(&mut self) {
        self.clear();
    }
}
