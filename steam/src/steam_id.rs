use derive_more::{Deref, Display, From, Into};
use serde::{Deserialize, Serialize};

/// Offset between a 32-bit account id and the 64-bit id of an individual
/// public-universe account.
const INDIVIDUAL_BASE: u64 = 76_561_197_960_265_728;

#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    Hash,
    Deref,
    Display,
    From,
    Into,
    Serialize,
    Deserialize,
)]
pub struct SteamId(u64);

impl SteamId {
    pub fn from_account_id(account_id: u32) -> Self {
        Self(INDIVIDUAL_BASE + u64::from(account_id))
    }

    pub fn account_id(self) -> u32 {
        (self.0 & 0xFFFF_FFFF) as u32
    }
}
