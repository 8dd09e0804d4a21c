//! Recap core: heuristic meeting-transcript summarization, upload decoding,
//! and email sharing primitives used by the gateway.
//!
//! Nothing here persists state; every operation is scoped to one request.

pub mod config;
pub mod env_sync;
pub mod error;
pub mod mailer;
pub mod remote_model;
pub mod summarize;
pub mod upload;

pub use config::AppConfig;
pub use env_sync::sync_env_template;
pub use error::CoreError;
pub use mailer::{
    build_share_email, MailTransport, MailerConfig, OutboundEmail, SmtpMailer,
    DEFAULT_SENDER_NAME, DEFAULT_SUBJECT,
};
pub use remote_model::RemoteModelSummarizer;
pub use summarize::{summarize, HeuristicSummarizer, Summarizer, SummarizerMode, SummaryFormat};
pub use upload::{decode_upload, UploadedText, MAX_UPLOAD_BYTES};
