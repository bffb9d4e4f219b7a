use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize, Serializer};
use std::collections::HashMap;
use std::fmt::Display;
use std::str::FromStr;
use strum_macros::Display as StrumDisplay;

/// Steam sends 64-bit ids as strings and small counters as numbers, and is
/// not consistent about which is which.
pub(crate) fn string_number<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr + Deserialize<'de>,
    T::Err: Display,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw<N> {
        Str(String),
        Num(N),
    }

    match Raw::<T>::deserialize(deserializer)? {
        Raw::Str(s) => s.parse().map_err(de::Error::custom),
        Raw::Num(n) => Ok(n),
    }
}

fn as_string<S: Serializer, T: Display>(value: &T, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_str(value)
}

fn truthy<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Bool(bool),
        Num(u8),
    }

    Ok(match Raw::deserialize(deserializer)? {
        Raw::Bool(b) => b,
        Raw::Num(n) => n != 0,
    })
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct Asset {
    #[serde(rename = "appid")]
    pub app_id: u32,
    #[serde(rename = "contextid", deserialize_with = "string_number")]
    pub context_id: u64,
    #[serde(rename = "assetid", deserialize_with = "string_number")]
    pub asset_id: u64,
    #[serde(rename = "classid", default)]
    pub class_id: String,
    #[serde(rename = "instanceid", default)]
    pub instance_id: String,
    #[serde(deserialize_with = "string_number")]
    pub amount: u64,
}

/// One (application, context) pair that holds items.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InventoryContext {
    pub app_id: u32,
    pub context_id: u64,
    pub name: String,
    pub asset_count: u32,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InventoryItem {
    pub asset_id: u64,
    pub app_id: u32,
    pub context_id: u64,
    pub amount: u64,
    /// Only used for logging.
    pub market_hash_name: String,
    pub tradable: bool,
}

#[derive(Deserialize, Debug)]
pub(crate) struct InventoryResponse {
    #[serde(default)]
    pub assets: Vec<Asset>,
    #[serde(default)]
    pub descriptions: Vec<Description>,
    #[serde(default, deserialize_with = "truthy")]
    pub more_items: bool,
    pub last_assetid: Option<String>,
}

#[derive(Deserialize, Debug)]
pub(crate) struct Description {
    #[serde(rename = "classid")]
    pub class_id: String,
    #[serde(rename = "instanceid", default)]
    pub instance_id: String,
    #[serde(default)]
    pub market_hash_name: String,
    #[serde(default, deserialize_with = "truthy")]
    pub tradable: bool,
}

impl InventoryResponse {
    /// Joins every asset with its description.
    pub(crate) fn into_items(self) -> Vec<InventoryItem> {
        let descriptions: HashMap<(&str, &str), &Description> = self
            .descriptions
            .iter()
            .map(|d| ((d.class_id.as_str(), d.instance_id.as_str()), d))
            .collect();

        self.assets
            .iter()
            .map(|asset| {
                let description =
                    descriptions.get(&(asset.class_id.as_str(), asset.instance_id.as_str()));
                InventoryItem {
                    asset_id: asset.asset_id,
                    app_id: asset.app_id,
                    context_id: asset.context_id,
                    amount: asset.amount,
                    market_hash_name: description
                        .map(|d| d.market_hash_name.clone())
                        .unwrap_or_default(),
                    tradable: description.is_some_and(|d| d.tradable),
                }
            })
            .collect()
    }
}

/// `g_rgAppContextData` from the inventory page. Steam renders empty maps as
/// `[]`.
#[derive(Deserialize, Debug)]
#[serde(untagged)]
pub(crate) enum AppContextData {
    Apps(HashMap<String, AppContexts>),
    Empty(Vec<serde_json::Value>),
}

#[derive(Deserialize, Debug)]
pub(crate) struct AppContexts {
    pub appid: u32,
    #[serde(rename = "rgContexts")]
    pub contexts: ContextMap,
}

#[derive(Deserialize, Debug)]
#[serde(untagged)]
pub(crate) enum ContextMap {
    Contexts(HashMap<String, ContextStats>),
    Empty(Vec<serde_json::Value>),
}

#[derive(Deserialize, Debug)]
pub(crate) struct ContextStats {
    #[serde(deserialize_with = "string_number")]
    pub id: u64,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub asset_count: u32,
}

impl AppContextData {
    /// Flattens the page data into (app, context) pairs, ordered by app then
    /// context id so enumeration is deterministic.
    pub(crate) fn into_contexts(self) -> Vec<InventoryContext> {
        let AppContextData::Apps(apps) = self else {
            return Vec::new();
        };

        let mut contexts: Vec<_> = apps
            .into_values()
            .flat_map(|app| {
                let app_id = app.appid;
                let stats = match app.contexts {
                    ContextMap::Contexts(map) => map.into_values().collect(),
                    ContextMap::Empty(_) => Vec::new(),
                };
                stats.into_iter().map(move |c| InventoryContext {
                    app_id,
                    context_id: c.id,
                    name: c.name,
                    asset_count: c.asset_count,
                })
            })
            .collect();

        contexts.sort_by_key(|c| (c.app_id, c.context_id));
        contexts
    }
}

/// Item as it is put into an outgoing offer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct SendItem {
    #[serde(rename = "appid")]
    pub app_id: u32,
    #[serde(rename = "contextid", serialize_with = "as_string")]
    pub context_id: u64,
    pub amount: u16,
    #[serde(rename = "assetid", serialize_with = "as_string")]
    pub asset_id: u64,
}

impl From<&InventoryItem> for SendItem {
    /// Quantities wrap to 16 bits, the width the offer payload carries.
    fn from(item: &InventoryItem) -> Self {
        Self {
            app_id: item.app_id,
            context_id: item.context_id,
            amount: item.amount as u16,
            asset_id: item.asset_id,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TradeOffer {
    pub send_items: Vec<SendItem>,
    pub message: String,
}

#[derive(Serialize)]
struct OfferPayload<'a> {
    newversion: bool,
    version: u32,
    me: OfferSide<'a>,
    them: OfferSide<'a>,
}

#[derive(Serialize)]
struct OfferSide<'a> {
    assets: &'a [SendItem],
    currency: [(); 0],
    ready: bool,
}

impl TradeOffer {
    pub fn new(send_items: Vec<SendItem>) -> Self {
        Self {
            send_items,
            message: String::new(),
        }
    }

    pub(crate) fn payload(&self) -> serde_json::Result<String> {
        serde_json::to_string(&OfferPayload {
            newversion: true,
            version: self.send_items.len() as u32 + 1,
            me: OfferSide {
                assets: &self.send_items,
                currency: [],
                ready: false,
            },
            them: OfferSide {
                assets: &[],
                currency: [],
                ready: false,
            },
        })
    }
}

#[derive(Deserialize, Debug)]
pub(crate) struct SendOfferResponse {
    #[serde(default, deserialize_with = "string_number")]
    pub tradeofferid: u64,
    #[serde(rename = "strError")]
    pub error: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct Confirmation {
    #[serde(deserialize_with = "string_number")]
    pub id: u64,
    #[serde(rename = "nonce", deserialize_with = "string_number")]
    pub key: u64,
    /// For trade confirmations this is the offer id.
    #[serde(rename = "creator_id", deserialize_with = "string_number")]
    pub offer_id: u64,
    #[serde(default)]
    pub headline: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, StrumDisplay)]
#[strum(serialize_all = "lowercase")]
pub enum ConfirmationAnswer {
    Allow,
}

#[derive(Deserialize, Debug)]
pub(crate) struct ConfirmationList {
    pub success: bool,
    #[serde(default)]
    pub needauth: bool,
    pub message: Option<String>,
    #[serde(default)]
    pub conf: Vec<Confirmation>,
}

#[derive(Deserialize, Debug)]
pub(crate) struct ConfirmationOp {
    pub success: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(from = "u32")]
pub enum TradeOfferState {
    Invalid,
    Active,
    Accepted,
    Countered,
    Expired,
    Canceled,
    Declined,
    InvalidItems,
    CreatedNeedsConfirmation,
    CanceledBySecondFactor,
    InEscrow,
    Other(u32),
}

impl From<u32> for TradeOfferState {
    fn from(value: u32) -> Self {
        match value {
            1 => Self::Invalid,
            2 => Self::Active,
            3 => Self::Accepted,
            4 => Self::Countered,
            5 => Self::Expired,
            6 => Self::Canceled,
            7 => Self::Declined,
            8 => Self::InvalidItems,
            9 => Self::CreatedNeedsConfirmation,
            10 => Self::CanceledBySecondFactor,
            11 => Self::InEscrow,
            other => Self::Other(other),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(from = "u32")]
pub enum ConfirmationMethod {
    #[default]
    None,
    Email,
    MobileApp,
    Unknown(u32),
}

impl From<u32> for ConfirmationMethod {
    fn from(value: u32) -> Self {
        match value {
            0 => Self::None,
            1 => Self::Email,
            2 => Self::MobileApp,
            other => Self::Unknown(other),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
pub struct ReceivedOffer {
    #[serde(rename = "tradeofferid", deserialize_with = "string_number")]
    pub id: u64,
    /// Account id of the sender.
    #[serde(rename = "accountid_other")]
    pub partner: u32,
    #[serde(rename = "trade_offer_state")]
    pub state: TradeOfferState,
    #[serde(default)]
    pub confirmation_method: ConfirmationMethod,
    /// What we would give up by accepting.
    #[serde(rename = "items_to_give", default)]
    pub send_items: Vec<Asset>,
    #[serde(rename = "items_to_receive", default)]
    pub receive_items: Vec<Asset>,
    #[serde(default)]
    pub message: String,
}

#[derive(Deserialize, Debug)]
pub(crate) struct TradeOffersResponse {
    pub response: TradeOffers,
}

#[derive(Deserialize, Debug)]
pub(crate) struct TradeOffers {
    #[serde(default)]
    pub trade_offers_received: Vec<ReceivedOffer>,
}

#[derive(Deserialize, Debug)]
pub(crate) struct AcceptResponse {
    #[serde(rename = "strError")]
    pub error: Option<String>,
}

#[derive(Deserialize, Debug)]
pub(crate) struct ApiResponse<T> {
    pub response: T,
}

#[derive(Deserialize, Debug)]
pub(crate) struct RsaKey {
    pub publickey_mod: String,
    pub publickey_exp: String,
    pub timestamp: String,
}

#[derive(Deserialize, Debug)]
pub(crate) struct AuthSession {
    pub client_id: String,
    pub request_id: String,
    #[serde(deserialize_with = "string_number")]
    pub steamid: u64,
    #[serde(default)]
    pub interval: f64,
}

#[derive(Deserialize, Debug, Default)]
pub(crate) struct AuthSessionStatus {
    pub refresh_token: Option<String>,
    pub access_token: Option<String>,
}

#[derive(Deserialize, Debug)]
pub(crate) struct Empty {}
