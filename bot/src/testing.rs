//! In-memory platform used by the unit tests.
use crate::config::Account;
use crate::pacing::{Pace, Pacer};
use crate::session::Session;
use async_trait::async_trait;
use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};
use steam::{
    Asset, Authenticator, ClockOffset, Confirmation, ConfirmationAnswer, ConfirmationMethod,
    Credentials, Error, InventoryContext, InventoryItem, ReceivedOffer, SteamId, TradeApi,
    TradeOffer, TradeOfferState,
};

pub(crate) fn account(username: &str) -> Account {
    Account {
        username: username.to_string(),
        password: "pw".to_string(),
        shared_secret: "c2hhcmVk".to_string(),
        identity_secret: format!("identity-{username}"),
    }
}

pub(crate) fn session(username: &str, api: FakeApi) -> Session<FakeApi> {
    Session {
        username: username.to_string(),
        api,
        offset: ClockOffset::new(130, 100),
        api_key: Some("KEY".to_string()),
        identity_secret: format!("identity-{username}"),
    }
}

pub(crate) fn item(app_id: u32, context_id: u64, asset_id: u64, amount: u64) -> InventoryItem {
    InventoryItem {
        asset_id,
        app_id,
        context_id,
        amount,
        market_hash_name: format!("item {asset_id}"),
        tradable: true,
    }
}

pub(crate) fn confirmation(offer_id: u64) -> Confirmation {
    Confirmation {
        id: offer_id + 1_000,
        key: offer_id + 2_000,
        offer_id,
        headline: format!("offer {offer_id}"),
    }
}

pub(crate) fn received(id: u64, state: TradeOfferState, send_items: usize) -> ReceivedOffer {
    ReceivedOffer {
        id,
        partner: 42,
        state,
        confirmation_method: ConfirmationMethod::None,
        send_items: (0..send_items as u64)
            .map(|asset_id| Asset {
                app_id: 730,
                context_id: 2,
                asset_id,
                class_id: String::new(),
                instance_id: String::new(),
                amount: 1,
            })
            .collect(),
        receive_items: Vec::new(),
        message: String::new(),
    }
}

/// Everything the fake was asked to do.
#[derive(Default, Debug)]
pub(crate) struct Calls {
    pub inventories: Vec<(u32, u64)>,
    pub sent_offers: Vec<(TradeOffer, SteamId, String)>,
    pub confirmation_lists: Vec<(String, i64)>,
    pub answered: Vec<(u64, ConfirmationAnswer, i64)>,
    pub received_offer_queries: Vec<Option<String>>,
    pub accepted: Vec<u64>,
}

pub(crate) struct FakeApi {
    steam_id: SteamId,
    api_key: Option<String>,
    contexts: Option<Vec<InventoryContext>>,
    inventories: HashMap<(u32, u64), Option<Vec<InventoryItem>>>,
    send_result: Option<u64>,
    confirmations: Option<Vec<Confirmation>>,
    failing_confirmations: HashSet<u64>,
    received: Option<Vec<ReceivedOffer>>,
    failing_accepts: HashSet<u64>,
    calls: Arc<Mutex<Calls>>,
}

impl FakeApi {
    pub(crate) fn new(steam_id: u64) -> Self {
        Self {
            steam_id: SteamId::from(steam_id),
            api_key: Some(format!("KEY{steam_id}")),
            contexts: Some(Vec::new()),
            inventories: HashMap::new(),
            send_result: Some(0),
            confirmations: Some(Vec::new()),
            failing_confirmations: HashSet::new(),
            received: Some(Vec::new()),
            failing_accepts: HashSet::new(),
            calls: Arc::default(),
        }
    }

    pub(crate) fn without_api_key(mut self) -> Self {
        self.api_key = None;
        self
    }

    pub(crate) fn with_inventory(
        mut self,
        app_id: u32,
        context_id: u64,
        items: Vec<InventoryItem>,
    ) -> Self {
        self.add_context(app_id, context_id);
        self.inventories.insert((app_id, context_id), Some(items));
        self
    }

    pub(crate) fn with_broken_inventory(mut self, app_id: u32, context_id: u64) -> Self {
        self.add_context(app_id, context_id);
        self.inventories.insert((app_id, context_id), None);
        self
    }

    pub(crate) fn with_broken_contexts(mut self) -> Self {
        self.contexts = None;
        self
    }

    pub(crate) fn sending(mut self, result: Option<u64>) -> Self {
        self.send_result = result;
        self
    }

    pub(crate) fn with_confirmations(mut self, confirmations: Vec<Confirmation>) -> Self {
        self.confirmations = Some(confirmations);
        self
    }

    pub(crate) fn with_broken_confirmations(mut self) -> Self {
        self.confirmations = None;
        self
    }

    pub(crate) fn failing_confirmation(mut self, offer_id: u64) -> Self {
        self.failing_confirmations.insert(offer_id);
        self
    }

    pub(crate) fn with_received(mut self, offers: Vec<ReceivedOffer>) -> Self {
        self.received = Some(offers);
        self
    }

    pub(crate) fn with_broken_received(mut self) -> Self {
        self.received = None;
        self
    }

    pub(crate) fn failing_accept(mut self, offer_id: u64) -> Self {
        self.failing_accepts.insert(offer_id);
        self
    }

    pub(crate) fn calls(&self) -> Arc<Mutex<Calls>> {
        self.calls.clone()
    }

    fn add_context(&mut self, app_id: u32, context_id: u64) {
        if let Some(contexts) = self.contexts.as_mut() {
            contexts.push(InventoryContext {
                app_id,
                context_id,
                name: format!("{app_id}/{context_id}"),
                asset_count: 0,
            });
        }
    }

    fn record<R>(&self, f: impl FnOnce(&mut Calls) -> R) -> R {
        f(&mut self.calls.lock().unwrap())
    }
}

fn failure(what: &str) -> Error {
    Error::TradeOffer(format!("{what} failed"))
}

#[async_trait]
impl TradeApi for FakeApi {
    fn steam_id(&self) -> SteamId {
        self.steam_id
    }

    async fn api_key(&self) -> steam::Result<String> {
        self.api_key.clone().ok_or(Error::ApiKeyMissing)
    }

    async fn inventory_contexts(&self) -> steam::Result<Vec<InventoryContext>> {
        self.contexts.clone().ok_or_else(|| failure("contexts"))
    }

    async fn inventory(
        &self,
        app_id: u32,
        context_id: u64,
        _tradable_only: bool,
    ) -> steam::Result<Vec<InventoryItem>> {
        self.record(|calls| calls.inventories.push((app_id, context_id)));
        self.inventories
            .get(&(app_id, context_id))
            .cloned()
            .flatten()
            .ok_or_else(|| failure("inventory"))
    }

    async fn send_offer(
        &self,
        offer: &TradeOffer,
        partner: SteamId,
        token: &str,
    ) -> steam::Result<u64> {
        self.record(|calls| {
            calls
                .sent_offers
                .push((offer.clone(), partner, token.to_string()))
        });
        self.send_result.ok_or_else(|| failure("send"))
    }

    async fn confirmations(
        &self,
        identity_secret: &str,
        time: i64,
    ) -> steam::Result<Vec<Confirmation>> {
        self.record(|calls| {
            calls
                .confirmation_lists
                .push((identity_secret.to_string(), time))
        });
        self.confirmations
            .clone()
            .ok_or_else(|| failure("confirmation list"))
    }

    async fn answer_confirmation(
        &self,
        confirmation: &Confirmation,
        _identity_secret: &str,
        answer: ConfirmationAnswer,
        time: i64,
    ) -> steam::Result<()> {
        self.record(|calls| calls.answered.push((confirmation.offer_id, answer, time)));
        if self.failing_confirmations.contains(&confirmation.offer_id) {
            Err(Error::Confirmation(confirmation.id))
        } else {
            Ok(())
        }
    }

    async fn received_offers(
        &self,
        api_key: Option<&str>,
        _cutoff: i64,
    ) -> steam::Result<Vec<ReceivedOffer>> {
        self.record(|calls| {
            calls
                .received_offer_queries
                .push(api_key.map(str::to_string))
        });
        self.received.clone().ok_or_else(|| failure("received offers"))
    }

    async fn accept_offer(&self, offer: &ReceivedOffer) -> steam::Result<()> {
        self.record(|calls| calls.accepted.push(offer.id));
        if self.failing_accepts.contains(&offer.id) {
            Err(failure("accept"))
        } else {
            Ok(())
        }
    }
}

/// Hands out the prepared [`FakeApi`] for known usernames, fails the rest.
pub(crate) struct FakeAuth {
    server_time: i64,
    accounts: Mutex<HashMap<String, FakeApi>>,
    logins: Mutex<Vec<String>>,
    offsets: Mutex<Vec<ClockOffset>>,
}

impl FakeAuth {
    pub(crate) fn new(server_time: i64) -> Self {
        Self {
            server_time,
            accounts: Mutex::default(),
            logins: Mutex::default(),
            offsets: Mutex::default(),
        }
    }

    pub(crate) fn with_account(self, username: &str, api: FakeApi) -> Self {
        self.accounts
            .lock()
            .unwrap()
            .insert(username.to_string(), api);
        self
    }

    pub(crate) fn logins(&self) -> Vec<String> {
        self.logins.lock().unwrap().clone()
    }

    pub(crate) fn offsets(&self) -> Vec<ClockOffset> {
        self.offsets.lock().unwrap().clone()
    }
}

#[async_trait]
impl Authenticator for FakeAuth {
    type Session = FakeApi;

    async fn server_time(&self) -> steam::Result<i64> {
        Ok(self.server_time)
    }

    async fn login(
        &self,
        credentials: &Credentials,
        offset: ClockOffset,
    ) -> steam::Result<FakeApi> {
        let api = self
            .accounts
            .lock()
            .unwrap()
            .remove(&credentials.username)
            .ok_or_else(|| Error::Login("invalid password".to_string()))?;
        self.logins
            .lock()
            .unwrap()
            .push(credentials.username.clone());
        self.offsets.lock().unwrap().push(offset);
        Ok(api)
    }
}

#[derive(Default)]
pub(crate) struct RecordingPacer {
    calls: Mutex<Vec<Pace>>,
}

impl RecordingPacer {
    pub(crate) fn calls(&self) -> Vec<Pace> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl Pacer for RecordingPacer {
    async fn pace(&self, pace: Pace) {
        self.calls.lock().unwrap().push(pace);
    }
}

thread_local! {
    static LOGGED: RefCell<Vec<String>> = const { RefCell::new(Vec::new()) };
}

/// Keeps log lines per thread, so tests running side by side don't mix.
struct ThreadLogger;

impl log::Log for ThreadLogger {
    fn enabled(&self, _: &log::Metadata) -> bool {
        true
    }

    fn log(&self, record: &log::Record) {
        LOGGED.with(|logged| {
            logged
                .borrow_mut()
                .push(format!("{} {}", record.level(), record.args()))
        });
    }

    fn flush(&self) {}
}

static LOGGER: ThreadLogger = ThreadLogger;

/// Starts collecting what the current thread logs from here on.
pub(crate) fn capture_logs() {
    let _ = log::set_logger(&LOGGER);
    log::set_max_level(log::LevelFilter::Trace);
    LOGGED.with(|logged| logged.borrow_mut().clear());
}

pub(crate) fn logged() -> Vec<String> {
    LOGGED.with(|logged| logged.borrow().clone())
}
