//! Working structures owned by a single codec call.

pub mod hashtable;
pub mod heap;

pub use hashtable::{simple_hash, HashTable};
pub use heap::PriorityQueue;
