//! Confirmation flow for create, update, delete, restore and rent actions

pub mod action;
pub mod classify;
pub mod flow;

pub use action::{Entity, MutationKind, MutationRequest, Notice, NoticeLevel, Prompt};
pub use classify::{classify, FailureKind};
pub use flow::{Confirmer, FlowOutcome, FlowState, MutationFlow, Notifier, Rejection};
