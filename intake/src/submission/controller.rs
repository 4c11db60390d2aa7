use super::SubmittableCertificate;
use crate::error::Result;
use crate::images::ImageBinding;
use crate::sheet::CandidateRecord;
use crate::store::RecordStore;
use common::jobs::BatchStatus;
use common::model::certificate::Certificate;
use log::{error, info};
use tokio::sync::mpsc;

/// Replaces every stored certificate with the given batch.
///
/// The clear request is issued first, then one create request per row,
/// strictly in row order. The first row that fails validation or is rejected
/// halts the batch; rows created before it stay in the store. Progress is
/// pushed to `progress` when a sender is supplied.
pub async fn submit_batch<S: RecordStore>(
    store: &S,
    candidates: &[CandidateRecord],
    binding: &ImageBinding,
    progress: Option<&mpsc::Sender<BatchStatus>>,
) -> Result<Vec<Certificate>> {
    report(progress, BatchStatus::Pending).await;

    match run_batch(store, candidates, binding, progress).await {
        Ok(created) => {
            info!("Bulk upload complete: created {} certificates", created.len());
            report(progress, BatchStatus::Completed(created.len() as u32)).await;
            Ok(created)
        }
        Err(e) => {
            error!("Bulk upload failed: {}", e);
            report(progress, BatchStatus::Failed(e.to_string())).await;
            Err(e)
        }
    }
}

async fn run_batch<S: RecordStore>(
    store: &S,
    candidates: &[CandidateRecord],
    binding: &ImageBinding,
    progress: Option<&mpsc::Sender<BatchStatus>>,
) -> Result<Vec<Certificate>> {
    store.clear_all().await?;
    info!("Cleared existing certificates");
    report(progress, BatchStatus::Cleared).await;

    let mut created = Vec::with_capacity(candidates.len());
    for (index, candidate) in candidates.iter().enumerate() {
        let certificate = SubmittableCertificate::prepare(index + 1, candidate, binding)?;
        created.push(store.create(&certificate).await?);
        report(progress, BatchStatus::InProgress(created.len() as u32)).await;
    }
    Ok(created)
}

async fn report(progress: Option<&mpsc::Sender<BatchStatus>>, status: BatchStatus) {
    if let Some(tx) = progress {
        let _ = tx.send(status).await;
    }
}
