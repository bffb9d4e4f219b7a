use crate::pacing::{Pace, Pacer};
use crate::session::Session;
use steam::{ConfirmationAnswer, TradeApi};

/// Offer ids per outcome, in the order they were attempted.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct ApprovalReport {
    pub approved: Vec<u64>,
    pub failed: Vec<u64>,
}

pub struct Approver<'a, P> {
    pacer: &'a P,
}

impl<'a, P: Pacer> Approver<'a, P> {
    pub fn new(pacer: &'a P) -> Self {
        Self { pacer }
    }

    /// Allows every pending confirmation of the session. A failed answer does
    /// not stop the remaining ones from being attempted.
    pub async fn approve_all<S: TradeApi>(&self, session: &Session<S>) -> ApprovalReport {
        let mut report = ApprovalReport::default();

        let confirmations = match session
            .api
            .confirmations(&session.identity_secret, session.offset.now())
            .await
        {
            Ok(confirmations) => confirmations,
            Err(e) => {
                log::error!("{}: failed to list confirmations: {e}", session.username);
                return report;
            }
        };
        if confirmations.is_empty() {
            log::debug!("{}: nothing to confirm", session.username);
            return report;
        }

        self.pacer.pace(Pace::ConfirmationList).await;

        for (i, confirmation) in confirmations.iter().enumerate() {
            if i > 0 {
                self.pacer.pace(Pace::Confirmation).await;
            }

            let result = session
                .api
                .answer_confirmation(
                    confirmation,
                    &session.identity_secret,
                    ConfirmationAnswer::Allow,
                    session.offset.now(),
                )
                .await;

            match result {
                Ok(()) => {
                    log::info!(
                        "{}: confirmed trade {} ({})",
                        session.username,
                        confirmation.offer_id,
                        confirmation.headline
                    );
                    report.approved.push(confirmation.offer_id);
                }
                Err(e) => {
                    log::error!(
                        "{}: failed to confirm trade {}: {e}",
                        session.username,
                        confirmation.offer_id
                    );
                    report.failed.push(confirmation.offer_id);
                }
            }
        }

        report
    }
}
