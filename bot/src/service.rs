use crate::config::Config;
use crate::error::Error;
use crate::liquidator::{Liquidation, Liquidator};
use crate::pacing::{Pace, Pacer};
use crate::registry::SessionRegistry;
use crate::session::SessionManager;
use crate::triage::{Triage, TriageReport};
use crate::Result;
use steam::Authenticator;
use tokio_util::sync::CancellationToken;

/// What a run did. `fatal` is set when the run was cut short.
#[derive(Debug, Default)]
pub struct RunReport {
    pub sessions: usize,
    pub liquidations: Vec<(String, Liquidation)>,
    pub triage: Option<TriageReport>,
    pub fatal: Option<Error>,
}

impl RunReport {
    /// Process exit status: 1 after a fatal error unless `always_zero`.
    pub fn exit_status(&self, always_zero: bool) -> u8 {
        if self.fatal.is_some() && !always_zero {
            1
        } else {
            0
        }
    }
}

/// Logs every account in, empties them into the partner, then triages the
/// monitoring account.
pub struct Workflow<A, P> {
    config: Config,
    auth: A,
    pacer: P,
}

impl<A: Authenticator, P: Pacer> Workflow<A, P> {
    pub fn new(config: Config, auth: A, pacer: P) -> Self {
        Self {
            config,
            auth,
            pacer,
        }
    }

    pub async fn acquire_sessions(
        &self,
        shutdown: &CancellationToken,
    ) -> Result<SessionRegistry<A::Session>> {
        SessionManager::new(&self.auth, &self.pacer, self.config.run.on_login_failure)
            .acquire_all(&self.config.accounts, shutdown)
            .await
    }

    pub async fn liquidate_all(
        &self,
        registry: SessionRegistry<A::Session>,
        shutdown: &CancellationToken,
    ) -> Vec<(String, Liquidation)> {
        let partner = self.config.main.steam_id();
        let liquidator = Liquidator::new(partner, &self.config.main.token, &self.pacer);
        let mut outcomes = Vec::new();

        for session in registry.into_sessions() {
            if shutdown.is_cancelled() {
                log::warn!("Shutdown requested, skipping remaining sessions");
                break;
            }

            let outcome = liquidator.liquidate(&session).await;
            outcomes.push((session.username, outcome));
            self.pacer.pace(Pace::Session).await;
        }

        outcomes
    }

    pub async fn triage(&self) -> Result<TriageReport> {
        Triage::new(&self.auth, &self.config.main_account, &self.pacer)
            .run()
            .await
    }

    pub async fn run(&self, shutdown: &CancellationToken) -> RunReport {
        let mut report = RunReport::default();

        let registry = match self.acquire_sessions(shutdown).await {
            Ok(registry) => registry,
            Err(e) => {
                log::error!("{e}, aborting run");
                report.fatal = Some(e);
                return report;
            }
        };
        report.sessions = registry.len();
        log::info!("{} sessions ready", report.sessions);

        report.liquidations = self.liquidate_all(registry, shutdown).await;

        if shutdown.is_cancelled() {
            log::info!("shutdown");
            return report;
        }

        match self.triage().await {
            Ok(triage) => report.triage = Some(triage),
            Err(e) => {
                log::error!("{e}, aborting run");
                report.fatal = Some(e);
                return report;
            }
        }

        log::info!("shutdown");
        report
    }
}
