use std::time::Duration;

use catalog_logging::{catalog_debug, catalog_info, catalog_warn};

use crate::RequestFailure;

/// Delay between two poll steps of the same job.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(500);

/// Progress value at which an import job is finished.
pub const COMPLETE_PERCENT: u32 = 100;

/// The job a poll loop is bound to.
///
/// `generation` names the loop instance: every upload gets a fresh one, so a
/// report that arrives for an older upload can be told apart from the live
/// loop even if the backend were to reuse a `task_id`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct JobHandle {
    pub generation: u64,
    pub task_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ImportPhase {
    #[default]
    Idle,
    Uploading {
        generation: u64,
    },
    InProgress {
        job: JobHandle,
        progress: u32,
        failed_polls: u32,
    },
    Complete {
        job: JobHandle,
    },
    Failed {
        generation: u64,
    },
}

/// Result of applying one progress report.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollStep {
    Continue { progress: u32 },
    Complete,
}

/// Pure poll transition: anything short of 100% keeps polling.
pub fn poll_transition(progress: u32) -> PollStep {
    if progress >= COMPLETE_PERCENT {
        PollStep::Complete
    } else {
        PollStep::Continue { progress }
    }
}

/// What the caller should do after an upload response was applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum UploadOutcome {
    Ignored,
    StartPolling(JobHandle),
    Failed,
}

/// What the caller should do after a progress report was applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum PollOutcome {
    Ignored,
    PollAgain(JobHandle),
    Completed,
    GaveUp,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ImportState {
    phase: ImportPhase,
    status: Option<String>,
    indicator: Option<u32>,
    last_generation: u64,
}

impl ImportState {
    pub fn phase(&self) -> &ImportPhase {
        &self.phase
    }

    /// Status line shown next to the upload control.
    pub fn status(&self) -> Option<&str> {
        self.status.as_deref()
    }

    /// An upload or a poll loop is still waiting on the backend.
    pub fn is_active(&self) -> bool {
        matches!(
            self.phase,
            ImportPhase::Uploading { .. } | ImportPhase::InProgress { .. }
        )
    }

    /// Last progress percentage drawn by the progress indicator.
    pub fn indicator(&self) -> Option<u32> {
        self.indicator
    }

    /// Starts a new loop instance, abandoning whatever job was tracked before.
    pub(crate) fn begin_upload(&mut self) -> u64 {
        self.last_generation += 1;
        let generation = self.last_generation;
        if let ImportPhase::InProgress { job, .. } = &self.phase {
            catalog_info!(
                "Abandoning import task {} (generation {}) for a new upload",
                job.task_id,
                job.generation
            );
        }
        self.phase = ImportPhase::Uploading { generation };
        self.status = Some("Uploading CSV...".to_string());
        self.indicator = None;
        generation
    }

    pub(crate) fn upload_finished(
        &mut self,
        generation: u64,
        result: Result<String, RequestFailure>,
    ) -> UploadOutcome {
        if self.phase != (ImportPhase::Uploading { generation }) {
            catalog_debug!("Ignoring upload response for stale generation {}", generation);
            return UploadOutcome::Ignored;
        }

        match result {
            Ok(task_id) => {
                let job = JobHandle {
                    generation,
                    task_id,
                };
                self.phase = ImportPhase::InProgress {
                    job: job.clone(),
                    progress: 0,
                    failed_polls: 0,
                };
                self.status = Some("Processing CSV...".to_string());
                UploadOutcome::StartPolling(job)
            }
            Err(failure) => {
                catalog_warn!("CSV upload failed: {}", failure);
                self.phase = ImportPhase::Failed { generation };
                self.status = Some("Upload failed".to_string());
                UploadOutcome::Failed
            }
        }
    }

    pub(crate) fn progress_reported(
        &mut self,
        reported: &JobHandle,
        result: Result<u32, RequestFailure>,
        max_poll_failures: u32,
    ) -> PollOutcome {
        let ImportPhase::InProgress {
            job, failed_polls, ..
        } = &self.phase
        else {
            catalog_debug!(
                "Ignoring progress for task {} while not polling",
                reported.task_id
            );
            return PollOutcome::Ignored;
        };
        if job != reported {
            catalog_debug!(
                "Ignoring progress for task {} (generation {}); tracking generation {}",
                reported.task_id,
                reported.generation,
                job.generation
            );
            return PollOutcome::Ignored;
        }
        let job = job.clone();
        let failed_polls = *failed_polls;

        match result {
            Ok(progress) => {
                self.indicator = Some(progress.min(COMPLETE_PERCENT));
                match poll_transition(progress) {
                    PollStep::Continue { progress } => {
                        self.phase = ImportPhase::InProgress {
                            job: job.clone(),
                            progress,
                            failed_polls: 0,
                        };
                        PollOutcome::PollAgain(job)
                    }
                    PollStep::Complete => {
                        catalog_info!("Import task {} complete", job.task_id);
                        self.phase = ImportPhase::Complete { job };
                        self.status = Some("Import Complete!".to_string());
                        PollOutcome::Completed
                    }
                }
            }
            Err(failure) => {
                let failed_polls = failed_polls + 1;
                catalog_warn!(
                    "Progress poll {} of {} failed for task {}: {}",
                    failed_polls,
                    max_poll_failures,
                    job.task_id,
                    failure
                );
                if failed_polls >= max_poll_failures {
                    self.phase = ImportPhase::Failed {
                        generation: job.generation,
                    };
                    self.status = Some("Import progress unavailable".to_string());
                    PollOutcome::GaveUp
                } else {
                    let progress = match &self.phase {
                        ImportPhase::InProgress { progress, .. } => *progress,
                        _ => 0,
                    };
                    self.phase = ImportPhase::InProgress {
                        job: job.clone(),
                        progress,
                        failed_polls,
                    };
                    PollOutcome::PollAgain(job)
                }
            }
        }
    }
}
