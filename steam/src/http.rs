use crate::endpoint::COMMUNITY_URL;
use crate::error::Error;
use crate::Result;
use reqwest::cookie::Jar;
use reqwest::header::REFERER;
use reqwest::{RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;
use url::Url;

const USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/124.0 Safari/537.36";
const ERESULT_HEADER: &str = "x-eresult";
const ERESULT_OK: i32 = 1;

/// One cookie jar per client, so every logged in account gets its own.
#[derive(Clone)]
pub(crate) struct HttpClient {
    client: reqwest::Client,
    jar: Arc<Jar>,
}

impl HttpClient {
    pub(crate) fn new() -> Result<Self> {
        let jar = Arc::new(Jar::default());
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .cookie_provider(jar.clone())
            .build()?;
        Ok(Self { client, jar })
    }

    pub(crate) fn set_community_cookie(&self, name: &str, value: &str) -> Result<()> {
        let url = Url::parse(COMMUNITY_URL)?;
        self.jar
            .add_cookie_str(&format!("{name}={value}; Path=/; Secure"), &url);
        Ok(())
    }

    pub(crate) async fn get<T, Q>(&self, url: impl AsRef<str>, query: &Q) -> Result<T>
    where
        T: DeserializeOwned,
        Q: Serialize + ?Sized,
    {
        let builder = self.client.get(url.as_ref()).query(query);
        self.request(builder).await
    }

    pub(crate) async fn get_text(&self, url: impl AsRef<str>) -> Result<String> {
        let response = self.send(self.client.get(url.as_ref())).await?;
        Ok(response.text().await?)
    }

    pub(crate) async fn post_form<T, F>(
        &self,
        url: impl AsRef<str>,
        form: &F,
        referer: Option<&str>,
    ) -> Result<T>
    where
        T: DeserializeOwned,
        F: Serialize + ?Sized,
    {
        let mut builder = self.client.post(url.as_ref()).form(form);
        if let Some(referer) = referer {
            builder = builder.header(REFERER, referer);
        }
        self.request(builder).await
    }

    async fn request<T: DeserializeOwned>(&self, builder: RequestBuilder) -> Result<T> {
        let text = self.send(builder).await?.text().await?;
        Ok(serde_json::from_str(&text)?)
    }

    async fn send(&self, builder: RequestBuilder) -> Result<Response> {
        let response = builder.send().await?;
        let status = response.status();

        if !status.is_success() {
            return Err(Error::Response(status, response.text().await?));
        }

        let eresult = response
            .headers()
            .get(ERESULT_HEADER)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.parse::<i32>().ok());

        match eresult {
            Some(code) if code != ERESULT_OK => Err(Error::EResult(code)),
            _ => Ok(response),
        }
    }
}
