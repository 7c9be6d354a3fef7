//! Functional core for the catalog server.
//!
//! Pure types and functions: domain records, the item codec that maps them to
//! and from wide-column store items, the storage abstractions the server is
//! written against, and password hashing. Nothing in here performs I/O.

pub mod auth;
pub mod catalog;
pub mod item;
pub mod storage;
