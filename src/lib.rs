pub mod auth;
pub mod category;
pub mod config;
pub mod domain;
pub mod error;
pub mod logging;
pub mod moderation;
pub mod search;
pub mod server;
pub mod session;
pub mod storage;
pub mod tracker;
