//! Markshelf: a bookmark organization engine.
//!
//! Folder tree management, a filter/sort pipeline, facet counts and a
//! mutation synchronizer that keeps local state consistent with a backend.
//! The library exposes every module for the RPC binary and integration tests.

pub mod app;
pub mod database;
pub mod managers;
pub mod platform;
pub mod rpc_handler;
pub mod services;
pub mod types;
