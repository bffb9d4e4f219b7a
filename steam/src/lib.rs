//! Client for the Steam community and Web API endpoints needed to move items
//! between accounts: login with a mobile authenticator secret, inventories,
//! trade offers and mobile confirmations.
mod api;
mod clock;
mod endpoint;
mod error;
mod http;
mod schema;
mod session;
pub mod sign;
mod steam_id;

pub use api::{Authenticator, Credentials, TradeApi};
pub use clock::{server_time, ClockOffset};
pub use error::Error;
pub use schema::{
    Asset, Confirmation, ConfirmationAnswer, ConfirmationMethod, InventoryContext, InventoryItem,
    ReceivedOffer, SendItem, TradeOffer, TradeOfferState,
};
pub use session::{Client, Session};
pub use steam_id::SteamId;

pub type Result<T> = std::result::Result<T, Error>;
