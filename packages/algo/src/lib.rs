//! # prepa-algo - adaptive practice core algorithms
//!
//! Pure Rust implementations of the learning algorithms behind the
//! practice recommendation engine:
//!
//! - **EWMA topic mastery** - rolling accuracy estimate with weak/strong
//!   classification and a cold-start guard
//! - **Spaced repetition** - Leitner-style grow/reset scheduling with an
//!   overdue-ratio priority
//! - **TF-IDF similarity** - sparse vectors and cosine similarity for
//!   near-duplicate question detection
//! - **Trend analysis** - least-squares slope of rolling accuracy
//!
//! ## Design
//!
//! Every function here is state-in/state-out: no clocks, no I/O, no
//! ambient state. Callers supply timestamps and state snapshots, which
//! keeps the algorithms unit-testable without any storage backend.
//!
//! ## Modules
//!
//! - [`mastery`] - per-topic accuracy estimate and classification
//! - [`schedule`] - review intervals and due-item priority
//! - [`tfidf`] - tokenization, sparse vectors, cosine similarity
//! - [`trend`] - rolling accuracy slope
//! - [`types`] - shared types, params, and constants

pub mod mastery;
pub mod schedule;
pub mod tfidf;
pub mod trend;
pub mod types;

pub use types::*;
