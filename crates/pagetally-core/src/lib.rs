pub mod config;
pub mod event;
pub mod identity;
pub mod pipeline;
pub mod store;
