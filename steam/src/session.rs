use crate::api::{Authenticator, Credentials, TradeApi};
use crate::clock::{self, ClockOffset};
use crate::endpoint::{Endpoint, COMMUNITY_URL};
use crate::error::Error;
use crate::http::HttpClient;
use crate::schema::{
    AcceptResponse, ApiResponse, AppContextData, AuthSession, AuthSessionStatus, ConfirmationList,
    ConfirmationOp, Empty, InventoryResponse, RsaKey, SendOfferResponse, TradeOffersResponse,
};
use crate::sign;
use crate::{
    Confirmation, ConfirmationAnswer, InventoryContext, InventoryItem, ReceivedOffer, Result,
    SteamId, TradeOffer,
};
use async_trait::async_trait;
use regex::Regex;
use serde_json::json;
use std::sync::LazyLock;
use std::time::Duration;
use tokio::time::sleep;

const INVENTORY_PAGE_SIZE: u32 = 2000;
const MAX_POLLS: usize = 10;
const GUARD_CODE_DEVICE: &str = "3";
const PLATFORM_WEB_BROWSER: &str = "2";

static API_KEY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"Key: ([0-9A-F]{32})").expect("valid regex"));
static APP_CONTEXT_DATA: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)g_rgAppContextData\s*=\s*(.+?);\s*$").expect("valid regex")
});

/// Unauthenticated client, hands out one [`Session`] per login.
#[derive(Clone, Default)]
pub struct Client;

impl Client {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Authenticator for Client {
    type Session = Session;

    async fn server_time(&self) -> Result<i64> {
        clock::server_time().await
    }

    async fn login(&self, credentials: &Credentials, offset: ClockOffset) -> Result<Session> {
        Session::login(credentials, offset).await
    }
}

/// A logged in community session with its own cookie jar.
pub struct Session {
    http: HttpClient,
    steam_id: SteamId,
    session_id: String,
    access_token: String,
}

impl Session {
    pub async fn login(credentials: &Credentials, offset: ClockOffset) -> Result<Self> {
        let http = HttpClient::new()?;

        let key = http
            .get::<ApiResponse<RsaKey>, _>(
                Endpoint::PasswordRsaPublicKey.url(),
                &[("account_name", credentials.username.as_str())],
            )
            .await?
            .response;
        let encrypted_password =
            sign::encrypt_password(&key.publickey_mod, &key.publickey_exp, &credentials.password)?;

        let auth = http
            .post_form::<ApiResponse<AuthSession>, _>(
                Endpoint::BeginAuthSession.url(),
                &[
                    ("account_name", credentials.username.as_str()),
                    ("encrypted_password", encrypted_password.as_str()),
                    ("encryption_timestamp", key.timestamp.as_str()),
                    ("remember_login", "true"),
                    ("platform_type", PLATFORM_WEB_BROWSER),
                    ("persistence", "1"),
                    ("website_id", "Community"),
                ],
                None,
            )
            .await?
            .response;
        let steam_id = SteamId::from(auth.steamid);

        let code = sign::two_factor_code(&credentials.shared_secret, offset.now())?;
        http.post_form::<ApiResponse<Empty>, _>(
            Endpoint::SubmitGuardCode.url(),
            &[
                ("client_id", auth.client_id.as_str()),
                ("steamid", steam_id.to_string().as_str()),
                ("code", code.as_str()),
                ("code_type", GUARD_CODE_DEVICE),
            ],
            None,
        )
        .await?;

        let access_token = poll_access_token(&http, &auth).await?;

        let session_id = hex::encode(rand::random::<[u8; 12]>());
        http.set_community_cookie("sessionid", &session_id)?;
        http.set_community_cookie(
            "steamLoginSecure",
            &format!("{steam_id}%7C%7C{access_token}"),
        )?;

        log::debug!("{} logged in as {steam_id}", credentials.username);

        Ok(Self {
            http,
            steam_id,
            session_id,
            access_token,
        })
    }

    fn confirmation_query(
        &self,
        identity_secret: &str,
        time: i64,
        tag: &str,
    ) -> Result<Vec<(&'static str, String)>> {
        Ok(vec![
            ("p", sign::device_id(self.steam_id)),
            ("a", self.steam_id.to_string()),
            ("k", sign::confirmation_key(identity_secret, time, tag)?),
            ("t", time.to_string()),
            ("m", "react".to_string()),
            ("tag", tag.to_string()),
        ])
    }
}

async fn poll_access_token(http: &HttpClient, auth: &AuthSession) -> Result<String> {
    let interval = Duration::from_secs_f64(auth.interval.max(1.0));

    for _ in 0..MAX_POLLS {
        let status = http
            .post_form::<ApiResponse<AuthSessionStatus>, _>(
                Endpoint::PollAuthSession.url(),
                &[
                    ("client_id", auth.client_id.as_str()),
                    ("request_id", auth.request_id.as_str()),
                ],
                None,
            )
            .await?
            .response;

        if let (Some(_), Some(access_token)) = (status.refresh_token, status.access_token) {
            return Ok(access_token);
        }
        sleep(interval).await;
    }

    Err(Error::Login(
        "auth session was not approved in time".to_string(),
    ))
}

#[async_trait]
impl TradeApi for Session {
    fn steam_id(&self) -> SteamId {
        self.steam_id
    }

    async fn api_key(&self) -> Result<String> {
        let page = self.http.get_text(Endpoint::ApiKey.url()).await?;
        API_KEY
            .captures(&page)
            .map(|captures| captures[1].to_string())
            .ok_or(Error::ApiKeyMissing)
    }

    async fn inventory_contexts(&self) -> Result<Vec<InventoryContext>> {
        let page = self
            .http
            .get_text(format!("{COMMUNITY_URL}/profiles/{}/inventory/", self.steam_id))
            .await?;
        let data = APP_CONTEXT_DATA
            .captures(&page)
            .ok_or(Error::MissingPageData("g_rgAppContextData"))?;
        let data: AppContextData = serde_json::from_str(&data[1])?;
        Ok(data.into_contexts())
    }

    async fn inventory(
        &self,
        app_id: u32,
        context_id: u64,
        tradable_only: bool,
    ) -> Result<Vec<InventoryItem>> {
        let url = format!(
            "{COMMUNITY_URL}/inventory/{}/{app_id}/{context_id}",
            self.steam_id
        );
        let mut items = Vec::new();
        let mut start_assetid: Option<String> = None;

        loop {
            let mut query = vec![
                ("l", "english".to_string()),
                ("count", INVENTORY_PAGE_SIZE.to_string()),
            ];
            if let Some(start) = start_assetid.take() {
                query.push(("start_assetid", start));
            }

            let page: InventoryResponse = self.http.get(&url, &query).await?;
            let more_items = page.more_items;
            let last_assetid = page.last_assetid.clone();
            items.extend(page.into_items());

            match (more_items, last_assetid) {
                (true, Some(last)) => start_assetid = Some(last),
                _ => break,
            }
        }

        if tradable_only {
            items.retain(|item| item.tradable);
        }
        Ok(items)
    }

    async fn send_offer(&self, offer: &TradeOffer, partner: SteamId, token: &str) -> Result<u64> {
        let referer = format!(
            "{COMMUNITY_URL}/tradeoffer/new/?partner={}&token={token}",
            partner.account_id()
        );
        let create_params = json!({ "trade_offer_access_token": token }).to_string();

        let response: SendOfferResponse = self
            .http
            .post_form(
                Endpoint::SendOffer.url(),
                &[
                    ("sessionid", self.session_id.as_str()),
                    ("serverid", "1"),
                    ("partner", partner.to_string().as_str()),
                    ("tradeoffermessage", offer.message.as_str()),
                    ("json_tradeoffer", offer.payload()?.as_str()),
                    ("captcha", ""),
                    ("trade_offer_create_params", create_params.as_str()),
                ],
                Some(&referer),
            )
            .await?;

        match response.error {
            Some(error) => Err(Error::TradeOffer(error)),
            None => Ok(response.tradeofferid),
        }
    }

    async fn confirmations(&self, identity_secret: &str, time: i64) -> Result<Vec<Confirmation>> {
        let query = self.confirmation_query(identity_secret, time, "list")?;
        let list: ConfirmationList = self
            .http
            .get(Endpoint::ConfirmationList.url(), &query)
            .await?;

        if list.needauth || !list.success {
            return Err(Error::ConfirmationList(
                list.message
                    .unwrap_or_else(|| "session is not authorised".to_string()),
            ));
        }
        Ok(list.conf)
    }

    async fn answer_confirmation(
        &self,
        confirmation: &Confirmation,
        identity_secret: &str,
        answer: ConfirmationAnswer,
        time: i64,
    ) -> Result<()> {
        let answer = answer.to_string();
        let mut query = self.confirmation_query(identity_secret, time, &answer)?;
        query.push(("op", answer));
        query.push(("cid", confirmation.id.to_string()));
        query.push(("ck", confirmation.key.to_string()));

        let response: ConfirmationOp = self
            .http
            .get(Endpoint::ConfirmationOp.url(), &query)
            .await?;

        if response.success {
            Ok(())
        } else {
            Err(Error::Confirmation(confirmation.id))
        }
    }

    async fn received_offers(
        &self,
        api_key: Option<&str>,
        cutoff: i64,
    ) -> Result<Vec<ReceivedOffer>> {
        let mut query = vec![
            ("get_received_offers", "1".to_string()),
            ("active_only", "1".to_string()),
            ("time_historical_cutoff", cutoff.to_string()),
        ];
        match api_key {
            Some(key) => query.push(("key", key.to_string())),
            None => query.push(("access_token", self.access_token.clone())),
        }

        let response: TradeOffersResponse =
            self.http.get(Endpoint::TradeOffers.url(), &query).await?;
        Ok(response.response.trade_offers_received)
    }

    async fn accept_offer(&self, offer: &ReceivedOffer) -> Result<()> {
        let url = format!("{COMMUNITY_URL}/tradeoffer/{}/accept", offer.id);
        let referer = format!("{COMMUNITY_URL}/tradeoffer/{}/", offer.id);
        let partner = SteamId::from_account_id(offer.partner);

        let response: AcceptResponse = self
            .http
            .post_form(
                url,
                &[
                    ("sessionid", self.session_id.as_str()),
                    ("serverid", "1"),
                    ("tradeofferid", offer.id.to_string().as_str()),
                    ("partner", partner.to_string().as_str()),
                    ("captcha", ""),
                ],
                Some(&referer),
            )
            .await?;

        match response.error {
            Some(error) => Err(Error::TradeOffer(error)),
            None => Ok(()),
        }
    }
}
