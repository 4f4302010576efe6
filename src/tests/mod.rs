//! Internal test modules - whitebox tests with crate access
//!
//! Harness-based acceptance tests drive a full `PageController` through the
//! same calls a browser host makes.

mod property_tests;
