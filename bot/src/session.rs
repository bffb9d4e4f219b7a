use crate::config::{Account, LoginFailurePolicy};
use crate::error::Error;
use crate::pacing::{Pace, Pacer};
use crate::registry::SessionRegistry;
use crate::Result;
use steam::{Authenticator, ClockOffset, Credentials, TradeApi};
use tokio_util::sync::CancellationToken;

/// A logged in account plus what it needs for time-sensitive calls.
pub struct Session<S> {
    pub username: String,
    pub api: S,
    pub offset: ClockOffset,
    /// `None` when the key could not be fetched; calls that need it degrade.
    pub api_key: Option<String>,
    pub identity_secret: String,
}

/// Syncs the clock with the platform, then logs in with a code generated on
/// the platform clock.
pub async fn login<A: Authenticator>(
    auth: &A,
    credentials: &Credentials,
) -> steam::Result<(A::Session, ClockOffset)> {
    let offset = ClockOffset::from_remote(auth.server_time().await?);
    let api = auth.login(credentials, offset).await?;
    Ok((api, offset))
}

pub(crate) async fn fetch_api_key<S: TradeApi>(username: &str, api: &S) -> Option<String> {
    match api.api_key().await {
        Ok(key) => Some(key),
        Err(e) => {
            log::error!("{username}: failed to get web api key: {e}");
            None
        }
    }
}

pub struct SessionManager<'a, A, P> {
    auth: &'a A,
    pacer: &'a P,
    policy: LoginFailurePolicy,
}

impl<'a, A: Authenticator, P: Pacer> SessionManager<'a, A, P> {
    pub fn new(auth: &'a A, pacer: &'a P, policy: LoginFailurePolicy) -> Self {
        Self {
            auth,
            pacer,
            policy,
        }
    }

    pub async fn acquire(&self, account: &Account) -> Result<Session<A::Session>> {
        let (api, offset) = login(self.auth, &account.into())
            .await
            .map_err(|source| Error::Login {
                username: account.username.clone(),
                source,
            })?;

        log::info!(
            "{} logged in as {}, clock offset {}s",
            account.username,
            api.steam_id(),
            offset.seconds()
        );

        let api_key = fetch_api_key(&account.username, &api).await;

        Ok(Session {
            username: account.username.clone(),
            api,
            offset,
            api_key,
            identity_secret: account.identity_secret.clone(),
        })
    }

    /// Logs every account in, one at a time and in order.
    pub async fn acquire_all(
        &self,
        accounts: &[Account],
        shutdown: &CancellationToken,
    ) -> Result<SessionRegistry<A::Session>> {
        let mut registry = SessionRegistry::new();

        for (i, account) in accounts.iter().enumerate() {
            if i > 0 {
                self.pacer.pace(Pace::Account).await;
            }
            if shutdown.is_cancelled() {
                log::warn!(
                    "Shutdown requested, stopping after {i} of {} accounts",
                    accounts.len()
                );
                break;
            }

            match self.acquire(account).await {
                Ok(session) => registry.insert(session)?,
                Err(e) => match self.policy {
                    LoginFailurePolicy::Abort => return Err(e),
                    LoginFailurePolicy::Skip => log::error!("{e}, skipping account"),
                },
            }
        }

        Ok(registry)
    }
}
