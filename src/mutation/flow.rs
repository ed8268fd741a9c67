//! Confirm, commit, notify, refresh

use std::collections::HashSet;
use std::future::Future;

use super::action::{MutationRequest, Notice, Prompt, RecordKey};
use super::classify::{classify, FailureKind};
use crate::error::{AppError, AppResult};
use crate::list::Refresh;

/// Asks the user to confirm a mutation
#[cfg_attr(test, mockall::automock)]
pub trait Confirmer {
    fn confirm(&self, prompt: &Prompt) -> bool;
}

/// Displays the notice a settled mutation produces
#[cfg_attr(test, mockall::automock)]
pub trait Notifier {
    fn notify(&self, notice: &Notice);
}

/// Observable state of the flow
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FlowState {
    Idle,
    Confirming(MutationRequest),
    Committing,
}

/// Why a request was refused before reaching the API
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Rejection {
    #[error("another confirmation is already open")]
    PromptOpen,
    #[error("a request for this record is already in flight")]
    AlreadyCommitting,
}

/// Handed out when a confirmed request starts committing
#[derive(Debug)]
pub struct CommitTicket {
    request: MutationRequest,
}

impl CommitTicket {
    pub fn request(&self) -> &MutationRequest {
        &self.request
    }
}

#[derive(Debug)]
pub enum FlowOutcome {
    Rejected(Rejection),
    Cancelled,
    Succeeded(Notice),
    Failed {
        notice: Notice,
        kind: FailureKind,
        error: AppError,
    },
}

impl FlowOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, FlowOutcome::Succeeded(_))
    }

    pub fn notice(&self) -> Option<&Notice> {
        match self {
            FlowOutcome::Succeeded(notice) | FlowOutcome::Failed { notice, .. } => Some(notice),
            _ => None,
        }
    }
}

/// Confirmation state machine for one page.
///
/// At most one prompt is open at a time. A record that is committing cannot
/// be submitted again until its request settles.
#[derive(Debug, Default)]
pub struct MutationFlow {
    prompt: Option<MutationRequest>,
    committing: HashSet<RecordKey>,
}

impl MutationFlow {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> FlowState {
        match &self.prompt {
            Some(request) => FlowState::Confirming(request.clone()),
            None if !self.committing.is_empty() => FlowState::Committing,
            None => FlowState::Idle,
        }
    }

    /// True when the control for this request must be disabled
    pub fn is_committing(&self, request: &MutationRequest) -> bool {
        self.committing.contains(&request.key())
    }

    /// Idle -> Confirming
    pub fn request(&mut self, request: MutationRequest) -> Result<Prompt, Rejection> {
        if self.prompt.is_some() {
            return Err(Rejection::PromptOpen);
        }
        if self.is_committing(&request) {
            return Err(Rejection::AlreadyCommitting);
        }
        let prompt = request.prompt();
        self.prompt = Some(request);
        Ok(prompt)
    }

    /// Confirming -> Cancelled -> Idle
    pub fn cancel(&mut self) -> Option<MutationRequest> {
        self.prompt.take()
    }

    /// Confirming -> Committing
    pub fn confirm(&mut self) -> Option<CommitTicket> {
        let request = self.prompt.take()?;
        self.committing.insert(request.key());
        Some(CommitTicket { request })
    }

    /// Committing -> Success | Failed -> Idle
    pub fn finish(&mut self, ticket: CommitTicket, result: AppResult<String>) -> FlowOutcome {
        let request = ticket.request;
        self.committing.remove(&request.key());

        match result {
            Ok(message) => {
                tracing::info!(entity = ?request.entity, kind = ?request.kind, id = ?request.id, "Mutation committed");
                FlowOutcome::Succeeded(request.success_notice(&message))
            }
            Err(error) => {
                let kind = classify(&error);
                tracing::warn!(entity = ?request.entity, kind = ?request.kind, failure = ?kind, "Mutation failed: {}", error);
                let notice = kind
                    .message(request.entity)
                    .map(Notice::error)
                    .unwrap_or_else(|| request.generic_failure_notice());
                FlowOutcome::Failed { notice, kind, error }
            }
        }
    }

    /// Drive one action end to end.
    ///
    /// A successful commit always triggers a full refresh of `target`.
    pub async fn run<F, Fut, R>(
        &mut self,
        request: MutationRequest,
        confirmer: &dyn Confirmer,
        notifier: &dyn Notifier,
        commit: F,
        target: &mut R,
    ) -> FlowOutcome
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = AppResult<String>>,
        R: Refresh + ?Sized,
    {
        let prompt = match self.request(request) {
            Ok(prompt) => prompt,
            Err(rejection) => return FlowOutcome::Rejected(rejection),
        };

        if !confirmer.confirm(&prompt) {
            self.cancel();
            return FlowOutcome::Cancelled;
        }

        let Some(ticket) = self.confirm() else {
            return FlowOutcome::Cancelled;
        };
        let outcome = self.finish(ticket, commit().await);

        if let Some(notice) = outcome.notice() {
            notifier.notify(notice);
        }
        if outcome.is_success() {
            target.refresh().await;
        }
        outcome
    }
}
