use strum_macros::{Display, EnumString};

pub(crate) const API_URL: &str = "https://api.steampowered.com";
pub(crate) const COMMUNITY_URL: &str = "https://steamcommunity.com";

/// Fixed paths, relative to either `API_URL` or `COMMUNITY_URL`.
#[derive(EnumString, Display, Copy, Clone, Debug)]
pub(crate) enum Endpoint {
    #[strum(serialize = "/ITwoFactorService/QueryTime/v1/")]
    QueryTime,
    #[strum(serialize = "/IAuthenticationService/GetPasswordRSAPublicKey/v1/")]
    PasswordRsaPublicKey,
    #[strum(serialize = "/IAuthenticationService/BeginAuthSessionViaCredentials/v1/")]
    BeginAuthSession,
    #[strum(serialize = "/IAuthenticationService/UpdateAuthSessionWithSteamGuardCode/v1/")]
    SubmitGuardCode,
    #[strum(serialize = "/IAuthenticationService/PollAuthSessionStatus/v1/")]
    PollAuthSession,
    #[strum(serialize = "/IEconService/GetTradeOffers/v1/")]
    TradeOffers,
    #[strum(serialize = "/dev/apikey")]
    ApiKey,
    #[strum(serialize = "/tradeoffer/new/send")]
    SendOffer,
    #[strum(serialize = "/mobileconf/getlist")]
    ConfirmationList,
    #[strum(serialize = "/mobileconf/ajaxop")]
    ConfirmationOp,
}

impl Endpoint {
    pub(crate) fn url(self) -> String {
        match self {
            Endpoint::QueryTime
            | Endpoint::PasswordRsaPublicKey
            | Endpoint::BeginAuthSession
            | Endpoint::SubmitGuardCode
            | Endpoint::PollAuthSession
            | Endpoint::TradeOffers => format!("{API_URL}{self}"),
            _ => format!("{COMMUNITY_URL}{self}"),
        }
    }
}
