use std::fmt;
use std::hash::{Hash, Hasher};
use std::ops::Deref;
use std::sync::Arc;

use crate::transport::TransportSession;

/// Cheap-clone shared handle to a connection, usable as a map key.
///
/// Identity is the allocation, not the address string: two handles compare
/// equal iff they point at the same live session object, so a reconnect from
/// the same `ip:port` is a distinct key. Neither the routing index nor the
/// pools own the connection; they react to `is_closed()` by evicting.
#[derive(Clone)]
pub struct SessionHandle {
    inner: Arc<dyn TransportSession>,
}

impl SessionHandle {
    pub fn new(inner: Arc<dyn TransportSession>) -> SessionHandle {
        SessionHandle { inner }
    }

    /// Stable key for this connection, derived from the allocation address.
    pub fn key(&self) -> usize {
        Arc::as_ptr(&self.inner) as *const () as usize
    }
}

impl Deref for SessionHandle {
    type Target = dyn TransportSession;

    fn deref(&self) -> &Self::Target {
        &*self.inner
    }
}

impl PartialEq for SessionHandle {
    fn eq(&self, other: &SessionHandle) -> bool {
        self.key() == other.key()
    }
}

impl Eq for SessionHandle {}

impl Hash for SessionHandle {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key().hash(state);
    }
}

impl fmt::Debug for SessionHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionHandle")
            .field("remote_addr", &self.inner.remote_addr())
            .field("closed", &self.inner.is_closed())
            .finish()
    }
}
