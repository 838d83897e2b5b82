use crate::config::WatchConfig;
use crate::domain::model::{AlertEmail, Credentials};
use crate::domain::ports::Notifier;
use crate::utils::error::Result;
use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::transport::smtp::authentication::Credentials as SmtpCredentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};

/// 以 SMTPS (隱式 TLS) 寄出單一收件者的 HTML 通知
pub struct SmtpNotifier {
    host: String,
    port: u16,
    credentials: Credentials,
}

impl SmtpNotifier {
    pub fn new(host: impl Into<String>, port: u16, credentials: Credentials) -> Self {
        Self {
            host: host.into(),
            port,
            credentials,
        }
    }

    pub fn from_config(config: &WatchConfig, credentials: Credentials) -> Self {
        Self::new(config.smtp_host(), config.smtp_port(), credentials)
    }

    pub fn build_message(&self, email: &AlertEmail) -> Result<Message> {
        let message = Message::builder()
            .from(self.credentials.sender.parse()?)
            .to(self.credentials.recipient.parse()?)
            .subject(email.subject.clone())
            .header(ContentType::TEXT_HTML)
            .body(email.html_body.clone())?;
        Ok(message)
    }
}

#[async_trait]
impl Notifier for SmtpNotifier {
    async fn notify(&self, email: &AlertEmail) -> Result<()> {
        let message = self.build_message(email)?;

        let transport = AsyncSmtpTransport::<Tokio1Executor>::relay(&self.host)?
            .port(self.port)
            .credentials(SmtpCredentials::new(
                self.credentials.sender.clone(),
                self.credentials.secret.clone(),
            ))
            .build();

        tracing::debug!("Sending alert via {}:{}", self.host, self.port);
        transport.send(message).await?;
        tracing::info!("✉️ Alert delivered to {}", self.credentials.recipient);
        Ok(())
    }
}
