mod lock;

pub use lock::{GameGuard, KeyedLocks};
