//! Shared test doubles.

#![allow(dead_code)]

pub mod memory_store;
