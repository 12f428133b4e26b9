mod session_pool;

pub use session_pool::{ClientSessionPool, CHECK_ALIVE_INTERVAL, MAX_CHECK_ALIVE_RETRY};
