use std::io::{BufRead, Write};
use std::path::Path;

use chrono::NaiveDate;
use lettre::message::header::ContentType;
use lettre::message::{Attachment, Mailbox, MultiPart, SinglePart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use tracing::{info, instrument};

use crate::config::Config;

#[derive(Debug, thiserror::Error)]
pub enum NotifyError {
    #[error("Invalid email address: {0}")]
    Address(#[from] lettre::address::AddressError),

    #[error("Failed to build email: {0}")]
    Build(#[from] lettre::error::Error),

    #[error("SMTP delivery failed: {0}")]
    Smtp(#[from] lettre::transport::smtp::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Attachment has no file name: {0}")]
    AttachmentName(String),
}

/// Who sends the report and where it goes
#[derive(Clone)]
pub struct SenderCredentials {
    pub from: String,
    pub password: String,
    pub to: String,
}

impl SenderCredentials {
    /// Take preset values from `config`, prompting on `input` for the rest
    pub fn resolve<R: BufRead, W: Write>(
        config: &Config,
        input: &mut R,
        output: &mut W,
    ) -> Result<Self, NotifyError> {
        let from = match &config.sender {
            Some(from) => from.clone(),
            None => prompt(input, output, "Type sender's address:")?,
        };
        let password = match &config.password {
            Some(password) => password.clone(),
            None => prompt(input, output, "Type password:")?,
        };
        let to = match &config.recipient {
            Some(to) => to.clone(),
            None => prompt(input, output, "Type receiver's address:")?,
        };
        Ok(Self { from, password, to })
    }
}

fn prompt<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
    label: &str,
) -> Result<String, NotifyError> {
    write!(output, "{label}")?;
    output.flush()?;
    let mut line = String::new();
    input.read_line(&mut line)?;
    Ok(line.trim().to_string())
}

pub fn report_subject(date: NaiveDate) -> String {
    format!("Отчет за {}", date.format("%Y-%m-%d"))
}

/// Build the report email: plain-text summary plus the workbook as an attachment
pub fn build_report_message(
    credentials: &SenderCredentials,
    subject: &str,
    body: &str,
    file_name: &str,
    file_bytes: Vec<u8>,
) -> Result<Message, NotifyError> {
    let from: Mailbox = credentials.from.parse()?;
    let to: Mailbox = credentials.to.parse()?;
    let content_type = ContentType::parse("application/octet-stream")
        .unwrap_or(ContentType::TEXT_PLAIN);

    let message = Message::builder()
        .from(from)
        .to(to)
        .subject(subject)
        .multipart(
            MultiPart::mixed()
                .singlepart(SinglePart::plain(body.to_string()))
                .singlepart(Attachment::new(file_name.to_string()).body(file_bytes, content_type)),
        )?;
    Ok(message)
}

/// Delivers reports over implicit-TLS SMTP submission
pub struct EmailNotifier {
    host: String,
    port: u16,
}

impl EmailNotifier {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
        }
    }

    #[instrument(skip(self, credentials, body), fields(host = %self.host, port = self.port))]
    pub async fn send_report(
        &self,
        credentials: &SenderCredentials,
        report_path: &Path,
        body: &str,
        date: NaiveDate,
    ) -> Result<(), NotifyError> {
        let file_name = report_path
            .file_name()
            .and_then(|name| name.to_str())
            .ok_or_else(|| NotifyError::AttachmentName(report_path.display().to_string()))?;
        let file_bytes = tokio::fs::read(report_path).await?;
        info!("Attaching {} ({} bytes)", file_name, file_bytes.len());

        let message = build_report_message(
            credentials,
            &report_subject(date),
            body,
            file_name,
            file_bytes,
        )?;

        let mailer = AsyncSmtpTransport::<Tokio1Executor>::relay(&self.host)?
            .port(self.port)
            .credentials(Credentials::new(
                credentials.from.clone(),
                credentials.password.clone(),
            ))
            .build();

        mailer.send(message).await?;
        info!("Report sent to {}", credentials.to);
        Ok(())
    }
}
