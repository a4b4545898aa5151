//! # backoffice-data: Mock Data Services for Backoffice
//!
//! This crate plays the part of the remote API. Calls answer from static
//! seed data after a configurable delay, so the stores above it see the
//! same async shape a real HTTP client would give them.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Backoffice Data Flow                             │
//! │                                                                         │
//! │  UsersStore::load()                                                     │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                 backoffice-data (THIS CRATE)                    │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌───────────────┐    ┌──────────────┐  │   │
//! │  │   │ RecordService │    │  Repositories │    │    Seed      │  │   │
//! │  │   │ (service.rs)  │◄───│ MockUser...   │───►│  u1..u5      │  │   │
//! │  │   │ async trait   │    │ MockProduct.. │    │  p1..p5      │  │   │
//! │  │   └───────────────┘    └───────┬───────┘    └──────────────┘  │   │
//! │  │                                │                               │   │
//! │  │                         ┌──────▼──────┐                        │   │
//! │  │                         │  Latency    │ tokio::time::sleep     │   │
//! │  │                         └─────────────┘                        │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`service`] - The `RecordService` trait
//! - [`repository`] - Mock user and product services
//! - [`latency`] - Simulated network delay
//! - [`seed`] - Demo records
//! - [`error`] - Service error types
//!
//! ## Usage
//!
//! ```rust,ignore
//! use backoffice_data::{Latency, MockUserService, RecordService};
//!
//! let users = MockUserService::new(Latency::default());
//! let all = users.get_all().await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod latency;
pub mod repository;
pub mod seed;
pub mod service;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{DataError, DataResult};
pub use latency::Latency;
pub use service::RecordService;

pub use repository::{MockProductService, MockService, MockUserService};
