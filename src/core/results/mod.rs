// Results module - remote responses and client-side queue filtering
pub mod filter;
pub mod response;

pub use filter::{filter, FilterCriteria};
pub use response::{RemoteResponse, ResultEntry, QUEUE_FIELD};
