//! The LeaveDesk HR assistant.
//!
//! Answers three kinds of questions about company leave:
//!
//! - **Signing**: who approves what, answered from the approval-flow document
//! - **Policy**: how a leave type works, answered from the leave-policy document
//! - **Balance**: how many days an employee has left, computed from the
//!   employee record and the leave type's balance strategy
//!
//! Anything else gets a fixed guidance message. [`Session`] drives the
//! question/answer loop and keeps the conversation history.

pub mod balance;
pub mod composer;
pub mod intent;
pub mod resolve;
pub mod session;

pub use balance::{
    entitled_days, parse_join_date, remaining_fixed, seniority_months, seniority_years,
    BalanceError,
};
pub use composer::{AnswerComposer, ComposedAnswer, GUIDANCE_MESSAGE};
pub use intent::{classify, is_policy_question, is_signing_question, Intent, IntentKind};
pub use resolve::{resolve, resolve_employee, resolve_leave_type, ResolvedQuery};
pub use session::{on_submit, render_turn, Renderer, Session};

#[cfg(test)]
pub(crate) mod test_helpers;
