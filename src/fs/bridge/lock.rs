use std::sync::{Arc, OnceLock};

use tokio::sync::Mutex;

/// The lock serializing a stream's cursor-dependent operations, created on first async use.
#[derive(Debug, Default)]
pub(crate) struct StreamLock(OnceLock<Arc<Mutex<()>>>);

impl StreamLock {
    pub fn get_or_init(&self) -> Arc<Mutex<()>> {
        Arc::clone(self.0.get_or_init(Arc::default))
    }

    /// The lock, if the stream has ever been used asynchronously.
    pub fn get(&self) -> Option<Arc<Mutex<()>>> {
        self.0.get().cloned()
    }
}
