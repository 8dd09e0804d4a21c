//! Share dispatcher: builds the share email and hands it to a mail
//! transport. One outbound call per request, awaited, no retry; a transport
//! failure surfaces as [`CoreError::Transport`] with the transport's detail.

use crate::error::CoreError;
use lettre::message::header::ContentType;
use lettre::message::{Mailbox, Mailboxes};
use lettre::transport::smtp::authentication::Credentials;
use lettre::transport::smtp::client::{Tls, TlsParameters};
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};

pub const DEFAULT_SUBJECT: &str = "Meeting Summary Shared";
pub const DEFAULT_SENDER_NAME: &str = "Meeting Summarizer";

const ENV_SMTP_HOST: &str = "RECAP_SMTP_HOST";
const ENV_SMTP_PORT: &str = "RECAP_SMTP_PORT";
const ENV_SMTP_USER: &str = "RECAP_SMTP_USER";
const ENV_SMTP_PASS: &str = "RECAP_SMTP_PASS";
const ENV_SMTP_FROM: &str = "RECAP_SMTP_FROM";

/// A share email ready for transmission. The From address is the
/// transport's concern, not the request's.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundEmail {
    pub to: Vec<String>,
    pub subject: String,
    pub html_body: String,
}

impl OutboundEmail {
    /// All recipients joined by comma-space, as they appear in the To header.
    pub fn to_line(&self) -> String {
        self.to.join(", ")
    }
}

/// Builds the share email from a summary and recipient list.
///
/// Validation errors when the summary is blank or no recipients are given.
/// Subject and sender name fall back to [`DEFAULT_SUBJECT`] and
/// [`DEFAULT_SENDER_NAME`]. The summary is embedded verbatim inside a
/// `white-space: pre-wrap` block so its line structure survives HTML.
pub fn build_share_email(
    summary: &str,
    recipients: &[String],
    subject: Option<&str>,
    sender_name: Option<&str>,
) -> Result<OutboundEmail, CoreError> {
    if summary.trim().is_empty() || recipients.is_empty() {
        return Err(CoreError::Validation(
            "Summary and recipients are required".to_string(),
        ));
    }

    let subject = subject
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .unwrap_or(DEFAULT_SUBJECT);
    let sender = sender_name
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .unwrap_or(DEFAULT_SENDER_NAME);

    let html_body = format!(
        "<h2>Meeting Summary</h2>\n\
         <p><strong>From:</strong> {sender}</p>\n\
         <hr>\n\
         <div style=\"white-space: pre-wrap;\">{summary}</div>\n\
         <hr>\n\
         <p><em>This summary was generated with Recap, the meeting notes summarizer.</em></p>"
    );

    Ok(OutboundEmail {
        to: recipients.to_vec(),
        subject: subject.to_string(),
        html_body,
    })
}

/// Seam for the outbound mail collaborator so the gateway (and its tests)
/// never depend on a live SMTP server.
#[async_trait::async_trait]
pub trait MailTransport: Send + Sync {
    /// Sends one email. No retry; errors carry the transport detail.
    async fn send(&self, email: &OutboundEmail) -> Result<(), CoreError>;
}

/// SMTP connection settings, loaded once at startup from the environment.
#[derive(Debug, Clone)]
pub struct MailerConfig {
    pub host: String,
    pub port: u16,
    pub username: Option<String>,
    pub password: Option<String>,
    /// From address; falls back to the SMTP username.
    pub from_address: String,
}

impl MailerConfig {
    /// Reads RECAP_SMTP_* from the environment. Unset values get local-dev
    /// defaults so a relay on localhost works without any configuration.
    pub fn from_env() -> Self {
        let username = env_opt_string(ENV_SMTP_USER);
        let from_address = env_opt_string(ENV_SMTP_FROM)
            .or_else(|| username.clone())
            .unwrap_or_else(|| "recap@localhost".to_string());
        Self {
            host: env_opt_string(ENV_SMTP_HOST).unwrap_or_else(|| "localhost".to_string()),
            port: env_u16(ENV_SMTP_PORT, 587),
            username,
            password: env_opt_string(ENV_SMTP_PASS),
            from_address,
        }
    }
}

fn env_opt_string(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

fn env_u16(name: &str, default: u16) -> u16 {
    match std::env::var(name) {
        Ok(v) => v.trim().parse().unwrap_or(default),
        Err(_) => default,
    }
}

/// Lettre-backed SMTP transport. Built once at startup; connections use
/// STARTTLS when the server offers it (plain submission otherwise), which
/// matches the usual port-587 relay setup.
pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from_address: String,
}

impl SmtpMailer {
    pub fn new(config: &MailerConfig) -> Result<Self, CoreError> {
        let tls = TlsParameters::new(config.host.clone())
            .map_err(|e| CoreError::Transport(format!("TLS setup failed: {e}")))?;
        let mut builder = AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(&config.host)
            .port(config.port)
            .tls(Tls::Opportunistic(tls));
        if let (Some(user), Some(pass)) = (&config.username, &config.password) {
            builder = builder.credentials(Credentials::new(user.clone(), pass.clone()));
        }
        Ok(Self {
            transport: builder.build(),
            from_address: config.from_address.clone(),
        })
    }
}

#[async_trait::async_trait]
impl MailTransport for SmtpMailer {
    async fn send(&self, email: &OutboundEmail) -> Result<(), CoreError> {
        let from: Mailbox = self
            .from_address
            .parse()
            .map_err(|e| CoreError::Transport(format!("invalid from address: {e}")))?;
        let mailboxes: Mailboxes = email
            .to_line()
            .parse()
            .map_err(|e| CoreError::Transport(format!("invalid recipient address: {e}")))?;

        let mut builder = Message::builder()
            .from(from)
            .subject(email.subject.as_str())
            .header(ContentType::TEXT_HTML);
        for mailbox in mailboxes {
            builder = builder.to(mailbox);
        }
        let message = builder
            .body(email.html_body.clone())
            .map_err(|e| CoreError::Transport(format!("message build failed: {e}")))?;

        tracing::info!(to = %email.to_line(), subject = %email.subject, "sending share email");
        self.transport
            .send(message)
            .await
            .map(|_| ())
            .map_err(|e| CoreError::Transport(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn recipients(addrs: &[&str]) -> Vec<String> {
        addrs.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn blank_summary_is_rejected() {
        let err =
            build_share_email("   \n ", &recipients(&["a@example.com"]), None, None).unwrap_err();
        assert!(err.is_validation());
        assert_eq!(err.to_string(), "Summary and recipients are required");
    }

    #[test]
    fn empty_recipient_list_is_rejected() {
        let err = build_share_email("A real summary.", &[], None, None).unwrap_err();
        assert!(err.is_validation());
    }

    #[test]
    fn defaults_apply_when_subject_and_sender_are_absent() {
        let email = build_share_email(
            "The plan.",
            &recipients(&["a@example.com", "b@example.com"]),
            None,
            None,
        )
        .unwrap();
        assert_eq!(email.subject, DEFAULT_SUBJECT);
        assert!(email
            .html_body
            .contains("<strong>From:</strong> Meeting Summarizer"));
        assert_eq!(email.to_line(), "a@example.com, b@example.com");
    }

    #[test]
    fn blank_subject_and_sender_fall_back_to_defaults() {
        let email = build_share_email(
            "The plan.",
            &recipients(&["a@example.com"]),
            Some("   "),
            Some(""),
        )
        .unwrap();
        assert_eq!(email.subject, DEFAULT_SUBJECT);
        assert!(email.html_body.contains(DEFAULT_SENDER_NAME));
    }

    #[test]
    fn summary_is_embedded_verbatim_with_pre_wrap() {
        let summary = "Point one.\n\nPoint two.\n\nPoint three.";
        let email = build_share_email(
            summary,
            &recipients(&["team@example.com"]),
            Some("Friday sync"),
            Some("Carol"),
        )
        .unwrap();
        assert_eq!(email.subject, "Friday sync");
        assert!(email
            .html_body
            .contains("<div style=\"white-space: pre-wrap;\">Point one.\n\nPoint two.\n\nPoint three.</div>"));
        assert!(email.html_body.contains("<strong>From:</strong> Carol"));
        assert!(email.html_body.contains("<em>"));
    }
}
