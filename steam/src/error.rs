use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Request error: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Response error:\nStatusCode: {0}\nText: {1}")]
    Response(reqwest::StatusCode, String),

    #[error("Steam returned EResult {0}")]
    EResult(i32),

    #[error("Failed to parse JSON: {0}")]
    JsonParsing(#[from] serde_json::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] url::ParseError),

    #[error("Failed to decode hex: {0}")]
    HexDecode(#[from] hex::FromHexError),

    #[error("Invalid secret: {0}")]
    InvalidSecret(String),

    #[error("RSA error: {0}")]
    Rsa(#[from] rsa::Error),

    #[error("Login failed: {0}")]
    Login(String),

    #[error("Web API key is not registered for this account")]
    ApiKeyMissing,

    #[error("Page is missing {0}")]
    MissingPageData(&'static str),

    #[error("Could not list confirmations: {0}")]
    ConfirmationList(String),

    #[error("Confirmation {0} was rejected")]
    Confirmation(u64),

    #[error("Trade offer error: {0}")]
    TradeOffer(String),
}
