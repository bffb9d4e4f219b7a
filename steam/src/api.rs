use crate::{
    ClockOffset, Confirmation, ConfirmationAnswer, InventoryContext, InventoryItem, ReceivedOffer,
    Result, SteamId, TradeOffer,
};
use async_trait::async_trait;

/// What is needed to log an account in.
#[derive(Clone, Debug)]
pub struct Credentials {
    pub username: String,
    pub password: String,
    pub shared_secret: String,
}

/// Entry point to the platform: clock and login.
#[async_trait]
pub trait Authenticator: Send + Sync {
    type Session: TradeApi;

    /// Platform time in unix seconds.
    async fn server_time(&self) -> Result<i64>;

    /// Logs in, generating the login code at `offset.now()`.
    async fn login(&self, credentials: &Credentials, offset: ClockOffset)
        -> Result<Self::Session>;
}

/// Operations available on one logged in account.
#[async_trait]
pub trait TradeApi: Send + Sync {
    fn steam_id(&self) -> SteamId;

    async fn api_key(&self) -> Result<String>;

    async fn inventory_contexts(&self) -> Result<Vec<InventoryContext>>;

    async fn inventory(
        &self,
        app_id: u32,
        context_id: u64,
        tradable_only: bool,
    ) -> Result<Vec<InventoryItem>>;

    /// Returns the id the platform assigned to the offer.
    async fn send_offer(&self, offer: &TradeOffer, partner: SteamId, token: &str) -> Result<u64>;

    async fn confirmations(&self, identity_secret: &str, time: i64) -> Result<Vec<Confirmation>>;

    async fn answer_confirmation(
        &self,
        confirmation: &Confirmation,
        identity_secret: &str,
        answer: ConfirmationAnswer,
        time: i64,
    ) -> Result<()>;

    /// Active offers received by this account. Falls back to the session
    /// access token when no api key is available.
    async fn received_offers(&self, api_key: Option<&str>, cutoff: i64)
        -> Result<Vec<ReceivedOffer>>;

    async fn accept_offer(&self, offer: &ReceivedOffer) -> Result<()>;
}
