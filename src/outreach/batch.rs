//! The outreach batch: dedupe, cap, generate, in one sequential pass.
//!
//! Each row is isolated: a failed generation becomes that row's
//! [`MessageOutcome::Failed`] and the pass moves on. Nothing is retried.

use std::{collections::HashSet, thread, time::Duration};

use rand::Rng;
use tracing::{debug, info, warn};

use crate::config::{Configuration, LlmSettings};
use crate::leads::{Lead, LeadField, LeadTable};
use crate::llm::{Complete, LlmProvider, providers};

use super::{GenerationError, MessageOutcome, OutreachResult, OutreachTable, mock, remote};

/// Rows kept by the batch: first occurrence per email (when the email column
/// exists), then the first `max_rows`, in input order.
///
/// With an email column present, rows lacking an email share one empty key,
/// so only the first of them survives.
pub fn select_rows(table: &LeadTable, max_rows: usize) -> Vec<&Lead> {
    let dedupe = table.has_column(LeadField::Email);
    let mut seen: HashSet<&str> = HashSet::new();
    table
        .rows
        .iter()
        .filter(|lead| !dedupe || seen.insert(lead.email()))
        .take(max_rows)
        .collect()
}

/// Holds the generators for one run: an RNG for the mock path and an
/// optional remote backend with its pacing delay.
pub struct BatchRunner<R, P> {
    rng: R,
    remote: Option<P>,
    unavailable: Option<String>,
    pacing: Duration,
}

impl<R: Rng, P: Complete> BatchRunner<R, P> {
    /// Runner with only the mock generator.
    pub fn new(rng: R) -> Self {
        Self { rng, remote: None, unavailable: None, pacing: Duration::ZERO }
    }

    /// Attach a remote backend; `pacing` is slept after each successful call.
    pub fn with_remote(mut self, provider: P, pacing: Duration) -> Self {
        self.remote = Some(provider);
        self.unavailable = None;
        self.pacing = pacing;
        self
    }

    /// Record why no remote backend could be built. API-mode rows then fail
    /// with this reason instead of aborting the batch.
    pub fn with_unavailable(mut self, reason: impl Into<String>) -> Self {
        self.remote = None;
        self.unavailable = Some(reason.into());
        self
    }

    /// Process `table` under `config`.
    pub fn run(&mut self, table: &LeadTable, config: &Configuration) -> OutreachTable {
        let selected = select_rows(table, config.max_rows);
        let use_mock = config.uses_mock();

        info!(
            input_rows = table.len(),
            rows = selected.len(),
            mode = config.mode_label(),
            model = %config.model_name,
            word_limit = config.word_limit,
            "outreach batch started"
        );

        let mut rows = Vec::with_capacity(selected.len());
        for (idx, lead) in selected.into_iter().enumerate() {
            let message = if use_mock {
                MessageOutcome::Generated(mock::synthesize_mock_message(
                    &mut self.rng,
                    lead.name(),
                    lead.company(),
                    lead.role(),
                    config.word_limit,
                ))
            } else {
                self.generate_remote(lead, config.word_limit)
            };

            if let MessageOutcome::Failed(err) = &message {
                warn!(row = idx, email = lead.email(), error = %err, "outreach generation failed");
            } else {
                debug!(row = idx, "outreach generated");
            }

            rows.push(OutreachResult { lead: lead.clone(), message });
        }

        let out = OutreachTable { columns: table.columns.clone(), rows };
        info!(rows = out.len(), failed = out.failed_count(), "outreach batch finished");
        out
    }

    fn generate_remote(&self, lead: &Lead, word_limit: usize) -> MessageOutcome {
        let Some(provider) = &self.remote else {
            let reason = self
                .unavailable
                .clone()
                .unwrap_or_else(|| "no remote provider configured".to_string());
            return MessageOutcome::Failed(GenerationError::Unavailable(reason));
        };

        match remote::synthesize_remote_message(provider, lead.name(), lead.company(), lead.role(), word_limit) {
            Ok(text) => {
                if !self.pacing.is_zero() {
                    thread::sleep(self.pacing);
                }
                MessageOutcome::Generated(text)
            }
            Err(e) => MessageOutcome::Failed(e.into()),
        }
    }
}

/// Run a batch with the default `[llm]` settings and a thread-local RNG.
pub fn run_outreach(table: &LeadTable, config: &Configuration) -> OutreachTable {
    run_outreach_with(table, config, &LlmSettings::default())
}

/// Run a batch, building the remote provider from `settings` when the
/// configuration selects the API path.
pub fn run_outreach_with(table: &LeadTable, config: &Configuration, settings: &LlmSettings) -> OutreachTable {
    build_runner(rand::thread_rng(), config, settings).run(table, config)
}

/// Runner for `config`: mock-only, or with the provider `settings` describe.
/// A provider that cannot be built leaves the runner marked unavailable.
pub fn build_runner<R: Rng>(rng: R, config: &Configuration, settings: &LlmSettings) -> BatchRunner<R, LlmProvider> {
    let runner = BatchRunner::new(rng);
    if config.uses_mock() {
        return runner;
    }
    match providers::build(settings, &config.model_name, &config.api_key) {
        Ok(provider) => {
            info!(
                model = provider.model(),
                endpoint = %settings.api_base_url,
                pacing_ms = settings.pacing.as_millis() as u64,
                "remote provider ready"
            );
            runner.with_remote(provider, settings.pacing)
        }
        Err(e) => {
            warn!(error = %e, "remote provider could not be built");
            runner.with_unavailable(e.to_string())
        }
    }
}
