//! Common test utilities for acam-components
//!
//! - Installation fixtures: temporary source/workspace trees with fake
//!   component files
//! - Mock loaders for exercising the registry without real binaries

#![allow(dead_code)]
#![allow(unused_imports)]

pub mod fixtures;
pub mod mocks;

pub use fixtures::*;
pub use mocks::*;
