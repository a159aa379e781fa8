//! Review service plumbing: the HTTP client and the background worker that
//! feeds its outcomes back onto the event bus.

pub mod client;
pub mod worker;
