//! # LeaveDesk Core
//!
//! Domain types, traits, and error definitions for the LeaveDesk HR
//! assistant. This crate has **zero framework dependencies** — it defines
//! the domain model that all other crates implement against.
//!
//! ## Design Philosophy
//!
//! Every external collaborator (LLM provider, retrieval engine) is a trait
//! here. Implementations live in their respective crates. This enables:
//! - Swapping implementations via configuration
//! - Easy testing with scripted stub implementations
//! - Clean dependency graph (all crates depend inward on core)

pub mod employee;
pub mod error;
pub mod leave;
pub mod message;
pub mod provider;
pub mod retrieval;

// Re-export key types at crate root for ergonomics
pub use employee::{EmployeeRecord, EmployeeStore};
pub use error::{Error, Result};
pub use leave::{BalanceStrategy, LeavePolicyTable, LeaveType, SenioritySchedule};
pub use message::{ChatHistory, Role, SessionId, Turn};
pub use provider::{ChatMessage, ChatRole, Provider, ProviderRequest, ProviderResponse};
pub use retrieval::QueryEngine;
