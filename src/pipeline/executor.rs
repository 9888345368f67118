//! Asynchronous execution module
//!
//! Wraps the synchronous converter in a bounded worker pool so callers can
//! submit conversions without blocking.

mod pool;

pub use pool::{AsyncRawConverter, ConversionHandle};
