use tracing::{info, warn};

use infoblox_node_report::adapters::infoblox::InfobloxClient;
use infoblox_node_report::adapters::mailer::SmtpMailer;
use infoblox_node_report::config::{self, AppConfig, LogSettings};
use infoblox_node_report::error::RunError;
use infoblox_node_report::pipeline::{self, RunOptions, RunOutcome};
use infoblox_node_report::telemetry;

// Every failure is logged and the process still exits 0; the scheduler
// only sees a missing email.
#[tokio::main(flavor = "current_thread")]
async fn main() {
    let dotenv = config::load_dotenv();

    let log_settings = LogSettings::from_env();
    let (_session, _fallback) = match telemetry::init(&log_settings) {
        Ok(session) => (Some(session), None),
        Err(e) => {
            let guard = telemetry::init_stderr(&log_settings.filter);
            warn!(event = "LOG_FILE_UNAVAILABLE", error = %e, "Logging to stderr only");
            (None, Some(guard))
        }
    };

    info!(
        event = "RUN_START",
        service.version = env!("CARGO_PKG_VERSION"),
        dotenv = dotenv.is_some(),
        "Infoblox node report starting"
    );

    let cfg = match AppConfig::load() {
        Ok(cfg) => cfg,
        Err(e) => return pipeline::report_failure(&RunError::from(e)),
    };

    let source = match InfobloxClient::new(&cfg.infoblox) {
        Ok(client) => client,
        Err(e) => return pipeline::report_failure(&RunError::from(e)),
    };
    let mailer = match SmtpMailer::new(cfg.mail.clone()) {
        Ok(mailer) => mailer,
        Err(e) => return pipeline::report_failure(&RunError::from(e)),
    };
    let options = RunOptions { dry_run: cfg.dry_run };

    match pipeline::execute(&source, &mailer, &options).await {
        Some(RunOutcome::Sent { nodes }) => info!(event = "RUN_DONE", nodes, "Report sent"),
        Some(RunOutcome::DryRun { html }) => {
            println!("{html}");
            info!(event = "RUN_DONE", "Dry run, report printed to stdout");
        }
        Some(RunOutcome::SkippedEmpty) | None => {}
    }
}
