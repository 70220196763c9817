pub mod client;
pub mod queries;
pub mod transport;
pub mod types;
