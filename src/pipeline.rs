use tracing::{error, info, warn};

use crate::adapters::infoblox::NodeSource;
use crate::adapters::mailer::ReportMailer;
use crate::core::normalize::normalize_all;
use crate::core::report::render_report;
use crate::error::RunError;

#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    /// Render and print the report instead of mailing it.
    pub dry_run: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    Sent { nodes: usize },
    /// The appliance returned no members; nothing was mailed.
    SkippedEmpty,
    DryRun { html: String },
}

/// fetch -> normalize -> render -> send, stopping at the first fatal error.
pub async fn run<S, M>(source: &S, mailer: &M, options: &RunOptions) -> Result<RunOutcome, RunError>
where
    S: NodeSource,
    M: ReportMailer,
{
    let raw = source.fetch_nodes().await?;
    let records = normalize_all(&raw);

    if records.is_empty() {
        warn!(event = "NO_NODES", "Appliance returned no members, report not sent");
        return Ok(RunOutcome::SkippedEmpty);
    }

    let html = render_report(&records);
    info!(event = "REPORT_RENDERED", nodes = records.len(), bytes = html.len(), "Report rendered");

    if options.dry_run {
        return Ok(RunOutcome::DryRun { html });
    }

    mailer.send_report(&html).await?;
    Ok(RunOutcome::Sent { nodes: records.len() })
}

/// Runs the report and swallows any fatal error after logging it.
pub async fn execute<S, M>(source: &S, mailer: &M, options: &RunOptions) -> Option<RunOutcome>
where
    S: NodeSource,
    M: ReportMailer,
{
    match run(source, mailer, options).await {
        Ok(outcome) => Some(outcome),
        Err(e) => {
            report_failure(&e);
            None
        }
    }
}

pub fn report_failure(err: &RunError) {
    error!(event = "RUN_FAILED", stage = err.stage(), "{}", err);
}
