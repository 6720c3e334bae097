//! Service layer for inner-map
//!
//! Drives the adaptive interview, turns finished transcripts into journal
//! records and sequences the screens around them.

#![allow(missing_docs, reason = "Internal crate with self-explanatory API")]
#![allow(clippy::missing_errors_doc, reason = "Errors are self-explanatory from Result types")]
#![allow(missing_debug_implementations, reason = "Internal types")]
#![allow(clippy::implicit_return, reason = "Implicit return is idiomatic Rust")]
#![allow(clippy::question_mark_used, reason = "? operator is idiomatic Rust")]
#![allow(clippy::min_ident_chars, reason = "Short error vars are idiomatic")]

mod error;
mod journal_service;
mod journey;
mod question_flow;
mod synthesis;
mod view;

#[cfg(test)]
mod journey_tests;
#[cfg(test)]
mod testing;

pub use error::{FlowError, ServiceError};
pub use journal_service::{JournalService, evolution_timeline};
pub use journey::{Journey, JourneySnapshot};
pub use question_flow::{FetchKind, FetchTicket, FlowPhase, FlowSnapshot, QuestionFlow};
pub use synthesis::{InsightSynthesizer, format_answers};
pub use view::{DashboardTab, InvalidTransition, View, ViewEvent};
