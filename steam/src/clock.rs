use crate::endpoint::Endpoint;
use crate::http::HttpClient;
use crate::Result;
use serde::Deserialize;
use time::OffsetDateTime;

#[derive(Deserialize)]
struct QueryTimeResponse {
    response: ServerTime,
}

#[derive(Deserialize)]
struct ServerTime {
    #[serde(deserialize_with = "crate::schema::string_number")]
    server_time: i64,
}

/// Difference between the platform clock and the local clock, in seconds.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ClockOffset(i64);

impl ClockOffset {
    pub fn new(remote: i64, local: i64) -> Self {
        Self(remote - local)
    }

    pub fn from_remote(remote: i64) -> Self {
        Self::new(remote, local_time())
    }

    pub fn seconds(self) -> i64 {
        self.0
    }

    /// Local time shifted onto the platform clock.
    pub fn now(self) -> i64 {
        self.at(local_time())
    }

    pub fn at(self, local: i64) -> i64 {
        local + self.0
    }
}

pub(crate) fn local_time() -> i64 {
    OffsetDateTime::now_utc().unix_timestamp()
}

/// Current platform time in unix seconds.
pub async fn server_time() -> Result<i64> {
    let http = HttpClient::new()?;
    query_time(&http).await
}

pub(crate) async fn query_time(http: &HttpClient) -> Result<i64> {
    let response: QueryTimeResponse = http
        .post_form(Endpoint::QueryTime.url(), &[("steamid", "0")], None)
        .await?;
    Ok(response.response.server_time)
}
