pub mod codec;
pub mod constants;
pub mod handler;
pub mod protocol;
pub mod transport;
pub mod utils;
