//! Unit tests for the review module.
//!
//! Domain tests cover payload validation and message rendering; service
//! tests drive the poll loop against in-memory and mocked ports.
