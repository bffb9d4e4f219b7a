use crate::confirmer::{ApprovalReport, Approver};
use crate::pacing::Pacer;
use crate::session::Session;
use steam::{SendItem, SteamId, TradeApi, TradeOffer};

/// Outcome of emptying one account.
#[derive(Debug, PartialEq, Eq)]
pub enum Liquidation {
    /// Nothing to send, no offer was made.
    Empty,
    /// Inventory could not be listed or the offer was refused.
    Failed,
    /// Offer submitted but no id came back, so there is nothing to confirm.
    Unassigned,
    Sent {
        offer_id: u64,
        approvals: ApprovalReport,
    },
}

pub struct Liquidator<'a, P> {
    partner: SteamId,
    token: &'a str,
    approver: Approver<'a, P>,
}

impl<'a, P: Pacer> Liquidator<'a, P> {
    pub fn new(partner: SteamId, token: &'a str, pacer: &'a P) -> Self {
        Self {
            partner,
            token,
            approver: Approver::new(pacer),
        }
    }

    /// Sends every tradable item of the account to the partner in a single
    /// offer and confirms it.
    pub async fn liquidate<S: TradeApi>(&self, session: &Session<S>) -> Liquidation {
        let items = match self.collect_items(session).await {
            Ok(items) => items,
            Err(e) => {
                log::error!("{}: failed to list inventory: {e}", session.username);
                return Liquidation::Failed;
            }
        };
        if items.is_empty() {
            log::info!("{}: inventory is empty", session.username);
            return Liquidation::Empty;
        }

        let offer = TradeOffer::new(items);
        let offer_id = match session
            .api
            .send_offer(&offer, self.partner, self.token)
            .await
        {
            Ok(offer_id) => offer_id,
            Err(e) => {
                log::error!("{}: failed to send offer: {e}", session.username);
                return Liquidation::Failed;
            }
        };
        if offer_id == 0 {
            log::warn!("{}: offer submitted without an id", session.username);
            return Liquidation::Unassigned;
        }

        log::info!(
            "{}: offer {offer_id} sent with {} items",
            session.username,
            offer.send_items.len()
        );
        let approvals = self.approver.approve_all(session).await;
        Liquidation::Sent {
            offer_id,
            approvals,
        }
    }

    /// Items of every (app, context) pair. A context that fails to load is
    /// logged and left out.
    async fn collect_items<S: TradeApi>(
        &self,
        session: &Session<S>,
    ) -> steam::Result<Vec<SendItem>> {
        let mut items = Vec::new();

        for context in session.api.inventory_contexts().await? {
            log::debug!(
                "{}: {} holds {} items",
                session.username,
                context.name,
                context.asset_count
            );
            let inventory = match session
                .api
                .inventory(context.app_id, context.context_id, true)
                .await
            {
                Ok(inventory) => inventory,
                Err(e) => {
                    log::error!(
                        "{}: failed to load inventory {}/{}: {e}",
                        session.username,
                        context.app_id,
                        context.context_id
                    );
                    continue;
                }
            };

            for item in &inventory {
                log::debug!("Item: {} = {}", item.market_hash_name, item.asset_id);
                items.push(SendItem::from(item));
            }
        }

        Ok(items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{
        capture_logs, confirmation, item, logged, session, FakeApi, RecordingPacer,
    };

    const TOKEN: &str = "partner-token";

    fn partner() -> SteamId {
        SteamId::from_account_id(22202)
    }

    #[tokio::test]
    async fn empty_inventory_sends_nothing() {
        let api = FakeApi::new(1)
            .with_inventory(730, 2, vec![])
            .with_inventory(753, 6, vec![])
            .with_confirmations(vec![confirmation(1)]);
        let calls = api.calls();
        let pacer = RecordingPacer::default();
        capture_logs();

        let outcome = Liquidator::new(partner(), TOKEN, &pacer)
            .liquidate(&session("alice", api))
            .await;

        assert_eq!(outcome, Liquidation::Empty);
        let calls = calls.lock().unwrap();
        assert_eq!(calls.inventories, [(730, 2), (753, 6)]);
        assert!(calls.sent_offers.is_empty());
        assert!(calls.confirmation_lists.is_empty());
        let logged = logged();
        assert!(logged.contains(&"INFO alice: inventory is empty".to_string()));
        assert!(!logged.iter().any(|line| line.contains("sent")));
    }

    #[tokio::test]
    async fn sends_all_items_to_the_partner_and_confirms() {
        let api = FakeApi::new(2)
            .with_inventory(
                730,
                2,
                vec![item(730, 2, 1, 1), item(730, 2, 2, 1), item(730, 2, 3, 1)],
            )
            .sending(Some(12345))
            .with_confirmations(vec![confirmation(12345)]);
        let calls = api.calls();
        let pacer = RecordingPacer::default();
        capture_logs();

        let outcome = Liquidator::new(partner(), TOKEN, &pacer)
            .liquidate(&session("bob", api))
            .await;

        assert_eq!(
            outcome,
            Liquidation::Sent {
                offer_id: 12345,
                approvals: ApprovalReport {
                    approved: vec![12345],
                    failed: vec![],
                },
            }
        );
        let calls = calls.lock().unwrap();
        let (offer, to, token) = &calls.sent_offers[0];
        assert_eq!(calls.sent_offers.len(), 1);
        assert_eq!(offer.send_items.len(), 3);
        assert_eq!(*to, partner());
        assert_eq!(token, TOKEN);
        assert_eq!(calls.confirmation_lists.len(), 1);
        assert!(logged().contains(&"INFO bob: offer 12345 sent with 3 items".to_string()));
    }

    #[tokio::test]
    async fn aggregates_contexts_and_wraps_quantities() {
        let api = FakeApi::new(3)
            .with_inventory(730, 2, vec![item(730, 2, 10, 1)])
            .with_inventory(753, 6, vec![item(753, 6, 20, 65_536), item(753, 6, 21, 70_000)])
            .sending(Some(7));
        let calls = api.calls();
        let pacer = RecordingPacer::default();

        Liquidator::new(partner(), TOKEN, &pacer)
            .liquidate(&session("carol", api))
            .await;

        let calls = calls.lock().unwrap();
        let offer = &calls.sent_offers[0].0;
        assert_eq!(
            offer.send_items,
            [
                SendItem { app_id: 730, context_id: 2, amount: 1, asset_id: 10 },
                SendItem { app_id: 753, context_id: 6, amount: 0, asset_id: 20 },
                SendItem { app_id: 753, context_id: 6, amount: 4_464, asset_id: 21 },
            ]
        );
    }

    #[tokio::test]
    async fn broken_context_is_skipped() {
        let api = FakeApi::new(4)
            .with_broken_inventory(440, 2)
            .with_inventory(730, 2, vec![item(730, 2, 1, 1)])
            .sending(Some(9));
        let calls = api.calls();
        let pacer = RecordingPacer::default();

        let outcome = Liquidator::new(partner(), TOKEN, &pacer)
            .liquidate(&session("dave", api))
            .await;

        assert!(matches!(outcome, Liquidation::Sent { offer_id: 9, .. }));
        assert_eq!(calls.lock().unwrap().sent_offers[0].0.send_items.len(), 1);
    }

    #[tokio::test]
    async fn failed_context_listing_ends_the_session() {
        let api = FakeApi::new(5).with_broken_contexts();
        let calls = api.calls();
        let pacer = RecordingPacer::default();

        let outcome = Liquidator::new(partner(), TOKEN, &pacer)
            .liquidate(&session("erin", api))
            .await;

        assert_eq!(outcome, Liquidation::Failed);
        assert!(calls.lock().unwrap().sent_offers.is_empty());
    }

    #[tokio::test]
    async fn failed_or_unassigned_offer_is_not_confirmed() {
        let pacer = RecordingPacer::default();
        let liquidator = Liquidator::new(partner(), TOKEN, &pacer);

        let refused = FakeApi::new(6)
            .with_inventory(730, 2, vec![item(730, 2, 1, 1)])
            .sending(None)
            .with_confirmations(vec![confirmation(1)]);
        let refused_calls = refused.calls();
        let unassigned = FakeApi::new(7)
            .with_inventory(730, 2, vec![item(730, 2, 1, 1)])
            .sending(Some(0))
            .with_confirmations(vec![confirmation(1)]);
        let unassigned_calls = unassigned.calls();

        assert_eq!(
            liquidator.liquidate(&session("frank", refused)).await,
            Liquidation::Failed
        );
        assert_eq!(
            liquidator.liquidate(&session("grace", unassigned)).await,
            Liquidation::Unassigned
        );
        assert!(refused_calls.lock().unwrap().confirmation_lists.is_empty());
        assert!(unassigned_calls.lock().unwrap().confirmation_lists.is_empty());
    }
}
