// SPDX-FileCopyrightText: 2026 Despacho Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Journey finalization and summary computation.

use chrono::Utc;
use tracing::info;

use despacho_core::{Delivery, DeliveryStatus, DespachoError, JourneySummary};

use crate::lifecycle::DispatchEngine;

/// Compute the terminal summary over a journey's deliveries.
///
/// Deliveries in any non-terminal status count toward `total` but neither
/// bucket. The success rate is a fixed-point string with exactly one
/// fractional digit; `"0.0"` for an empty journey.
pub fn summarize(deliveries: &[Delivery]) -> JourneySummary {
    let total = deliveries.len() as u32;
    let completed = deliveries
        .iter()
        .filter(|d| d.status == DeliveryStatus::Completed)
        .count() as u32;
    let failed = deliveries
        .iter()
        .filter(|d| d.status == DeliveryStatus::Failed)
        .count() as u32;
    let success_rate = if total == 0 {
        "0.0".to_string()
    } else {
        format!("{:.1}", f64::from(completed) / f64::from(total) * 100.0)
    };
    JourneySummary {
        total,
        completed,
        failed,
        success_rate,
    }
}

impl DispatchEngine {
    /// Finalize a journey: compute its summary over all member deliveries
    /// and freeze it with status "finalizada".
    ///
    /// Not idempotent across concurrent callers; last write wins on the
    /// summary. Manager-invoked and rare.
    pub async fn finalize_journey(
        &self,
        journey_id: &str,
    ) -> Result<JourneySummary, DespachoError> {
        self.journeys
            .get_journey(journey_id)
            .await?
            .ok_or_else(|| DespachoError::NotFound {
                entity: "journey",
                id: journey_id.to_string(),
            })?;

        let deliveries = self.deliveries.list_for_journey(journey_id).await?;
        let summary = summarize(&deliveries);
        self.journeys
            .finalize_journey(journey_id, Utc::now(), &summary)
            .await?;

        info!(
            journey_id,
            total = summary.total,
            completed = summary.completed,
            failed = summary.failed,
            success_rate = %summary.success_rate,
            "journey finalized"
        );
        Ok(summary)
    }
}
