use fnv::FnvHashMap;
use once_cell::sync::Lazy;
use parking_lot::RwLock;
use std::sync::Arc;
use std::thread::ThreadId;

static THREAD_NAME_MAP: Lazy<RwLock<FnvHashMap<ThreadId, Arc<String>>>> =
    Lazy::new(RwLock::default);

/// Record a display name for the calling thread, picked up by log sinks.
pub fn set_current_thread_name(name: impl Into<String>) {
    THREAD_NAME_MAP
        .write()
        .insert(std::thread::current().id(), Arc::new(name.into()));
}

pub fn thread_name(id: ThreadId) -> Option<Arc<String>> {
    THREAD_NAME_MAP.read().get(&id).cloned()
}
