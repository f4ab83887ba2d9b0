//! SMTP delivery of the rendered report.
//!
//! [`SmtpMailer`] opens one STARTTLS session per send (EHLO, STARTTLS,
//! EHLO, AUTH, MAIL/RCPT/DATA, QUIT) and closes it afterwards.

use lettre::message::{Mailbox, MultiPart, SinglePart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use tracing::info;

use crate::config::MailConfig;

#[derive(Debug, thiserror::Error)]
pub enum MailError {
    #[error("bad email address {address:?}: {source}")]
    Address {
        address: String,
        #[source]
        source: lettre::address::AddressError,
    },
    #[error("could not assemble message: {0}")]
    Build(String),
    #[error("SMTP authentication rejected: {0}")]
    Auth(String),
    #[error("SMTP transport error: {0}")]
    Transport(#[from] lettre::transport::smtp::Error),
}

#[allow(async_fn_in_trait)]
pub trait ReportMailer {
    async fn send_report(&self, html: &str) -> Result<(), MailError>;
}

pub struct SmtpMailer {
    config: MailConfig,
    transport: AsyncSmtpTransport<Tokio1Executor>,
}

impl SmtpMailer {
    /// STARTTLS relay on `smtp_host:smtp_port`, authenticated with the SMTP credentials.
    pub fn new(config: MailConfig) -> Result<Self, MailError> {
        let transport = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.smtp_host)?
            .port(config.smtp_port)
            .credentials(Credentials::new(config.smtp_user.clone(), config.smtp_pass.clone()))
            .build();
        Ok(Self::with_transport(config, transport))
    }

    pub fn with_transport(config: MailConfig, transport: AsyncSmtpTransport<Tokio1Executor>) -> Self {
        Self { config, transport }
    }

    /// multipart/alternative with a single UTF-8 HTML part.
    pub fn build_message(&self, html: &str) -> Result<Message, MailError> {
        let mut builder = Message::builder()
            .from(parse_mailbox(&self.config.from)?)
            .subject(self.config.subject.clone());
        for to in &self.config.to {
            builder = builder.to(parse_mailbox(to)?);
        }

        builder
            .multipart(MultiPart::alternative().singlepart(SinglePart::html(html.to_string())))
            .map_err(|e| MailError::Build(e.to_string()))
    }
}

impl ReportMailer for SmtpMailer {
    async fn send_report(&self, html: &str) -> Result<(), MailError> {
        let message = self.build_message(html)?;
        self.transport.send(message).await.map_err(classify)?;

        info!(
            event = "REPORT_SENT",
            smtp.host = %self.config.smtp_host,
            recipients = self.config.to.len(),
            "Report email delivered"
        );
        Ok(())
    }
}

fn parse_mailbox(address: &str) -> Result<Mailbox, MailError> {
    address.parse().map_err(|source| MailError::Address {
        address: address.to_string(),
        source,
    })
}

fn classify(err: lettre::transport::smtp::Error) -> MailError {
    match err.status() {
        Some(code) if code.to_string() == "535" => MailError::Auth(err.to_string()),
        _ => MailError::Transport(err),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> MailConfig {
        MailConfig {
            subject: "Infoblox node status".into(),
            from: "noc@example.net".into(),
            to: vec!["ops@example.net".into(), "Dns Team <dns@example.net>".into()],
            smtp_host: "smtp.example.net".into(),
            smtp_port: 587,
            smtp_user: "mailer".into(),
            smtp_pass: "secret".into(),
        }
    }

    #[test]
    fn message_has_every_recipient_and_html_part() {
        let mailer = SmtpMailer::new(config()).unwrap();
        let msg = mailer.build_message("<p>ok</p>").unwrap();

        let rcpts: Vec<String> = msg.envelope().to().iter().map(|a| a.to_string()).collect();
        assert_eq!(rcpts, vec!["ops@example.net", "dns@example.net"]);

        let raw = String::from_utf8(msg.formatted()).unwrap();
        assert!(raw.contains("Subject: Infoblox node status"));
        assert!(raw.contains("multipart/alternative"));
        assert!(raw.contains("Content-Type: text/html; charset=utf-8"));
    }

    #[test]
    fn invalid_recipient_is_an_address_error() {
        let mut cfg = config();
        cfg.to.push("not-an-email".into());
        let err = SmtpMailer::new(cfg).unwrap().build_message("x").unwrap_err();
        assert!(matches!(err, MailError::Address { ref address, .. } if address == "not-an-email"));
        assert!(err.to_string().contains("bad email address"));
    }

    #[test]
    fn auth_error_display() {
        let err = MailError::Auth("535 5.7.8 credentials invalid".into());
        assert_eq!(err.to_string(), "SMTP authentication rejected: 535 5.7.8 credentials invalid");
    }
}
