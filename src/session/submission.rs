/// Whether a request is currently outstanding.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SubmissionPhase {
    #[default]
    Idle,
    Submitting,
}

/// How the most recent request ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SubmissionOutcome {
    Succeeded,
    Failed,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
#[error("A submission is already in progress")]
pub struct SubmissionBusy;

/// Guard allowing at most one request in flight.
///
/// `Idle -> Submitting -> {Succeeded, Failed} -> Idle`; both outcomes return
/// to `Idle` immediately so the trigger is enabled again.
#[derive(Clone, Debug, Default)]
pub struct Submission {
    phase: SubmissionPhase,
    last_outcome: Option<SubmissionOutcome>,
}

impl Submission {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> SubmissionPhase {
        self.phase
    }

    pub fn is_submitting(&self) -> bool {
        self.phase == SubmissionPhase::Submitting
    }

    pub fn last_outcome(&self) -> Option<SubmissionOutcome> {
        self.last_outcome
    }

    /// Enter `Submitting`; rejected while another request is outstanding.
    pub fn begin(&mut self) -> Result<(), SubmissionBusy> {
        if self.is_submitting() {
            return Err(SubmissionBusy);
        }
        self.phase = SubmissionPhase::Submitting;
        Ok(())
    }

    /// Record a successful completion. Returns false if nothing was in flight.
    pub fn succeed(&mut self) -> bool {
        self.finish(SubmissionOutcome::Succeeded)
    }

    /// Record a failed completion. Returns false if nothing was in flight.
    pub fn fail(&mut self) -> bool {
        self.finish(SubmissionOutcome::Failed)
    }

    fn finish(&mut self, outcome: SubmissionOutcome) -> bool {
        if !self.is_submitting() {
            tracing::warn!(?outcome, "Completion received with no submission in flight");
            return false;
        }
        self.phase = SubmissionPhase::Idle;
        self.last_outcome = Some(outcome);
        true
    }
}
