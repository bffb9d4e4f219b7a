use crate::config::MonitoringAccount;
use crate::error::Error;
use crate::pacing::{Pace, Pacer};
use crate::session::{fetch_api_key, login};
use crate::Result;
use steam::{Authenticator, ConfirmationMethod, ReceivedOffer, TradeApi, TradeOfferState};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Verdict {
    /// Not active, or waiting on the mobile authenticator.
    Skip,
    /// Asks nothing in return.
    Accept,
    /// Needs a human to look at it.
    Flag,
}

pub fn classify(offer: &ReceivedOffer) -> Verdict {
    if offer.state != TradeOfferState::Active
        || offer.confirmation_method == ConfirmationMethod::MobileApp
    {
        Verdict::Skip
    } else if offer.send_items.is_empty() {
        Verdict::Accept
    } else {
        Verdict::Flag
    }
}

/// Offer ids per outcome.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct TriageReport {
    pub accepted: Vec<u64>,
    pub flagged: Vec<u64>,
    pub skipped: Vec<u64>,
    /// Gifts whose acceptance failed.
    pub failed: Vec<u64>,
}

pub struct Triage<'a, A, P> {
    auth: &'a A,
    account: &'a MonitoringAccount,
    pacer: &'a P,
}

impl<'a, A: Authenticator, P: Pacer> Triage<'a, A, P> {
    pub fn new(auth: &'a A, account: &'a MonitoringAccount, pacer: &'a P) -> Self {
        Self {
            auth,
            account,
            pacer,
        }
    }

    /// Logs the monitoring account in and triages what it has received. A
    /// login failure is returned, everything after that is only logged.
    pub async fn run(&self) -> Result<TriageReport> {
        let username = &self.account.username;
        let (api, offset) = login(self.auth, &self.account.into())
            .await
            .map_err(|source| Error::Login {
                username: username.clone(),
                source,
            })?;
        log::info!("{username} logged in as {}", api.steam_id());

        let api_key = fetch_api_key(username, &api).await;
        Ok(self.triage(&api, api_key.as_deref(), offset.now()).await)
    }

    pub async fn triage<S: TradeApi>(
        &self,
        api: &S,
        api_key: Option<&str>,
        now: i64,
    ) -> TriageReport {
        let mut report = TriageReport::default();

        let offers = match api.received_offers(api_key, now).await {
            Ok(offers) => offers,
            Err(e) => {
                log::error!("{}: failed to get received offers: {e}", self.account.username);
                return report;
            }
        };
        if offers.is_empty() {
            return report;
        }

        self.pacer.pace(Pace::ReceivedOffers).await;

        for offer in &offers {
            match classify(offer) {
                Verdict::Skip => report.skipped.push(offer.id),
                Verdict::Accept => {
                    log::info!(
                        "Offer {} from {}: gift of {} items {:?}",
                        offer.id,
                        offer.partner,
                        offer.receive_items.len(),
                        offer.message
                    );
                    match api.accept_offer(offer).await {
                        Ok(()) => report.accepted.push(offer.id),
                        Err(e) => {
                            log::warn!("Offer {}: failed to accept: {e}", offer.id);
                            report.failed.push(offer.id);
                        }
                    }
                }
                Verdict::Flag => {
                    log::warn!(
                        "Offer {} from {} asks for {} items for {}, needs manual review",
                        offer.id,
                        offer.partner,
                        offer.send_items.len(),
                        offer.receive_items.len()
                    );
                    report.flagged.push(offer.id);
                }
            }
        }

        report
    }
}
