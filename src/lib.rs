pub mod app;
pub mod directory;
pub mod error_log;
pub mod input;
pub mod invite;
pub mod provision;
pub mod reconcile;
pub mod run;
pub mod shared;
pub mod slack;
