//! Common test utilities for gavel
//!
//! This module provides shared test infrastructure including:
//! - Manifest and dependency builders for creating test fixtures
//! - Mock implementations for testing without side effects
//! - A recording listener for asserting on resolution events

#![allow(dead_code)]
#![allow(unused_imports)]

pub mod builders;
pub mod mocks;

pub use builders::*;
pub use mocks::*;
