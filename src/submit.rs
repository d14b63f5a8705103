use std::fmt;
use std::sync::Mutex;

use anyhow::{Result, anyhow};
use tracing::{error, info};

use crate::draft::{DraftIssue, PredictionDraft};
use crate::match_list::StoredPredictionRecord;
use crate::payload::{SubmissionPayload, to_payload};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatedPrediction {
    pub id: String,
}

/// Storage collaborator. `Ok(None)` means the store declined without an error.
pub trait PredictionStore {
    fn create_prediction(&self, payload: &SubmissionPayload) -> Result<Option<CreatedPrediction>>;
}

#[derive(Debug)]
pub enum SubmitError {
    Incomplete(DraftIssue),
    Rejected,
    Store(anyhow::Error),
}

impl fmt::Display for SubmitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SubmitError::Incomplete(issue) => write!(f, "prediction incomplete: {issue}"),
            SubmitError::Rejected => f.write_str("submission failed: store returned no record"),
            SubmitError::Store(err) => write!(f, "submission failed: {err:#}"),
        }
    }
}

impl std::error::Error for SubmitError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SubmitError::Incomplete(issue) => Some(issue),
            SubmitError::Rejected => None,
            SubmitError::Store(err) => Some(&**err),
        }
    }
}

impl From<DraftIssue> for SubmitError {
    fn from(issue: DraftIssue) -> Self {
        SubmitError::Incomplete(issue)
    }
}

/// Validates, maps and issues exactly one creation request. No retry.
/// The draft is reset only when the store accepted the prediction.
pub fn submit_draft(
    draft: &mut PredictionDraft,
    store: &dyn PredictionStore,
) -> Result<CreatedPrediction, SubmitError> {
    let payload = to_payload(draft)?;

    match store.create_prediction(&payload) {
        Ok(Some(created)) => {
            info!(
                id = %created.id,
                kind = payload.bet_kind.label(),
                odds = payload.odds,
                "prediction created"
            );
            draft.reset();
            Ok(created)
        }
        Ok(None) => {
            error!(kind = payload.bet_kind.label(), "store returned no prediction");
            Err(SubmitError::Rejected)
        }
        Err(err) => {
            error!(kind = payload.bet_kind.label(), "prediction submission failed: {err:#}");
            Err(SubmitError::Store(err))
        }
    }
}

/// Keeps submitted predictions in their read-side shape.
#[derive(Debug, Default)]
pub struct MemoryStore {
    records: Mutex<Vec<StoredPredictionRecord>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn records(&self) -> Vec<StoredPredictionRecord> {
        self.records
            .lock()
            .map(|records| records.clone())
            .unwrap_or_default()
    }
}

impl PredictionStore for MemoryStore {
    fn create_prediction(&self, payload: &SubmissionPayload) -> Result<Option<CreatedPrediction>> {
        let mut records = self
            .records
            .lock()
            .map_err(|_| anyhow!("memory store lock poisoned"))?;
        let id = format!("prono-{}", records.len() + 1);
        let mut record = payload.to_stored_record();
        record.id = Some(id.clone());
        records.push(record);
        Ok(Some(CreatedPrediction { id }))
    }
}
