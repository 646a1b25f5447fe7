//! Outbound email.

use std::sync::Mutex;

use async_trait::async_trait;
use reqwest::Url;
use serde::Serialize;
use thiserror::Error;

const RESEND_ENDPOINT: &str = "https://api.resend.com/emails";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Email {
    pub to: String,
    pub subject: String,
    pub html: String,
}

#[derive(Debug, Error)]
pub enum MailError {
    #[error("mail transport failed: {0}")]
    Transport(String),

    #[error("mail provider rejected message ({status}): {body}")]
    Rejected { status: u16, body: String },
}

#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, email: Email) -> Result<(), MailError>;
}

/// Send an email, logging (not returning) failures.
pub async fn deliver<M>(mailer: &M, email: Email)
where
    M: Mailer + ?Sized,
{
    let to = email.to.clone();
    let subject = email.subject.clone();
    match mailer.send(email).await {
        Ok(()) => tracing::info!(%to, %subject, "email sent"),
        Err(err) => tracing::error!(%to, %subject, error = %err, "failed to send email"),
    }
}

/// Writes messages to the log instead of sending them.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogMailer;

#[async_trait]
impl Mailer for LogMailer {
    async fn send(&self, email: Email) -> Result<(), MailError> {
        tracing::info!(to = %email.to, subject = %email.subject, "mail delivery disabled; message logged");
        Ok(())
    }
}

/// Keeps every message in memory. Used by tests and local runs.
#[derive(Debug, Default)]
pub struct OutboxMailer {
    sent: Mutex<Vec<Email>>,
}

impl OutboxMailer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sent(&self) -> Vec<Email> {
        match self.sent.lock() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    /// Most recent message addressed to `to`.
    pub fn last_to(&self, to: &str) -> Option<Email> {
        self.sent().into_iter().rev().find(|e| e.to == to)
    }
}

#[async_trait]
impl Mailer for OutboxMailer {
    async fn send(&self, email: Email) -> Result<(), MailError> {
        match self.sent.lock() {
            Ok(mut guard) => guard.push(email),
            Err(poisoned) => poisoned.into_inner().push(email),
        }
        Ok(())
    }
}

/// Resend HTTP API client.
#[derive(Debug, Clone)]
pub struct ResendMailer {
    client: reqwest::Client,
    api_key: String,
    from: String,
}

#[derive(Serialize)]
struct ResendRequest<'a> {
    from: &'a str,
    to: [&'a str; 1],
    subject: &'a str,
    html: &'a str,
}

impl ResendMailer {
    pub fn new(api_key: impl Into<String>, from: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key: api_key.into(),
            from: from.into(),
        }
    }
}

#[async_trait]
impl Mailer for ResendMailer {
    async fn send(&self, email: Email) -> Result<(), MailError> {
        let body = ResendRequest {
            from: &self.from,
            to: [&email.to],
            subject: &email.subject,
            html: &email.html,
        };
        let res = self
            .client
            .post(RESEND_ENDPOINT)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| MailError::Transport(e.to_string()))?;

        let status = res.status();
        if !status.is_success() {
            let body = res.text().await.unwrap_or_default();
            return Err(MailError::Rejected {
                status: status.as_u16(),
                body,
            });
        }
        Ok(())
    }
}

/// `<base>/verify-email?email=..&token=..`
pub fn verification_link(base_url: &Url, email: &str, token: &str) -> Url {
    let mut url = base_url.clone();
    let path = format!("{}/verify-email", base_url.path().trim_end_matches('/'));
    url.set_path(&path);
    url.query_pairs_mut()
        .clear()
        .append_pair("email", email)
        .append_pair("token", token);
    url
}

fn greeting(name: Option<&str>) -> String {
    match name.map(str::trim).filter(|n| !n.is_empty()) {
        Some(n) => format!("Welcome {n}!"),
        None => "Welcome!".to_string(),
    }
}

pub fn verification_email(to: &str, name: Option<&str>, link: &Url) -> Email {
    let html = format!(
        r#"<h2>{greeting}</h2>
<p>Please verify your email address to activate your account.</p>
<p><a href="{link}" style="background-color: #0066cc; color: white; padding: 10px 20px; text-decoration: none; border-radius: 5px; display: inline-block;">Verify Email</a></p>
<p>Or copy and paste this link: {link}</p>
<p>This link expires in 24 hours.</p>"#,
        greeting = greeting(name),
    );
    Email {
        to: to.to_string(),
        subject: "Verify your email address".to_string(),
        html,
    }
}

pub fn welcome_email(to: &str, name: Option<&str>) -> Email {
    let html = format!(
        "<h2>{}</h2>\n<p>Your email has been verified and your account is now active.</p>\n<p>You can now log in at any time.</p>",
        greeting(name)
    );
    Email {
        to: to.to_string(),
        subject: "Welcome to The Parts App".to_string(),
        html,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn link_encodes_email_and_keeps_base_path() {
        let base = Url::parse("https://shop.example.com/app/").unwrap();
        let link = verification_link(&base, "rita+paint@shop.test", "abc123");
        assert_eq!(
            link.as_str(),
            "https://shop.example.com/app/verify-email?email=rita%2Bpaint%40shop.test&token=abc123"
        );
    }

    #[test]
    fn templates_carry_name_and_link() {
        let base = Url::parse("http://localhost:8080").unwrap();
        let link = verification_link(&base, "a@b.test", "tok");
        let email = verification_email("a@b.test", Some("Rita"), &link);
        assert!(email.html.contains("Welcome Rita!"));
        assert!(email.html.contains(link.as_str()));

        let welcome = welcome_email("a@b.test", None);
        assert!(welcome.html.starts_with("<h2>Welcome!</h2>"));
    }

    #[tokio::test]
    async fn outbox_records_messages() {
        let outbox = OutboxMailer::new();
        deliver(&outbox, welcome_email("a@b.test", None)).await;
        deliver(&outbox, welcome_email("c@d.test", None)).await;
        assert_eq!(outbox.sent().len(), 2);
        assert_eq!(outbox.last_to("c@d.test").unwrap().to, "c@d.test");
    }
}
