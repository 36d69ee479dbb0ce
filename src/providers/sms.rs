//! SMS alert delivery
//!
//! `MockSmsProvider` never sends anything. It validates the number, logs the
//! message and keeps the most recent messages in an outbox so callers (and
//! tests) can inspect them.

use std::collections::VecDeque;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use uuid::Uuid;

use super::ProviderError;

/// Longest body accepted (concatenated SMS, 10 segments)
pub const MAX_SMS_BODY_CHARS: usize = 1600;

/// Messages kept by the mock outbox; older ones are dropped first
pub const DEFAULT_OUTBOX_CAPACITY: usize = 500;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SmsReceipt {
    pub message_id: String,
    pub to: String,
    pub body: String,
    /// Always "simulated" for the mock provider
    pub status: String,
    pub sent_at: DateTime<Utc>,
}

#[axum::async_trait]
pub trait SmsProvider: Send + Sync {
    async fn send(&self, to: &str, body: &str) -> Result<SmsReceipt, ProviderError>;
}

/// Accepts an optional leading `+` followed by 7-15 digits. Spaces, dashes
/// and parentheses are ignored.
pub fn normalize_phone(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    let (plus, rest) = match trimmed.strip_prefix('+') {
        Some(rest) => ("+", rest),
        None => ("", trimmed),
    };

    let mut digits = String::with_capacity(rest.len());
    for c in rest.chars() {
        match c {
            '0'..='9' => digits.push(c),
            ' ' | '-' | '(' | ')' => {}
            _ => return None,
        }
    }

    if (7..=15).contains(&digits.len()) {
        Some(format!("{}{}", plus, digits))
    } else {
        None
    }
}

#[derive(Debug)]
pub struct MockSmsProvider {
    outbox: Mutex<VecDeque<SmsReceipt>>,
    capacity: usize,
}

impl Default for MockSmsProvider {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_OUTBOX_CAPACITY)
    }
}

impl MockSmsProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            outbox: Mutex::new(VecDeque::with_capacity(capacity.min(DEFAULT_OUTBOX_CAPACITY))),
            capacity,
        }
    }

    /// Outbox contents, oldest first
    pub async fn sent(&self) -> Vec<SmsReceipt> {
        self.outbox.lock().await.iter().cloned().collect()
    }
}

#[axum::async_trait]
impl SmsProvider for MockSmsProvider {
    async fn send(&self, to: &str, body: &str) -> Result<SmsReceipt, ProviderError> {
        let to = normalize_phone(to)
            .ok_or_else(|| ProviderError::InvalidRequest(format!("invalid phone number: {}", to)))?;

        let body = body.trim();
        if body.is_empty() {
            return Err(ProviderError::InvalidRequest("message body is empty".to_string()));
        }
        if body.chars().count() > MAX_SMS_BODY_CHARS {
            return Err(ProviderError::InvalidRequest(format!(
                "message body exceeds {} characters",
                MAX_SMS_BODY_CHARS
            )));
        }

        let receipt = SmsReceipt {
            message_id: Uuid::new_v4().to_string(),
            to,
            body: body.to_string(),
            status: "simulated".to_string(),
            sent_at: Utc::now(),
        };

        tracing::info!("Simulated SMS {} to {}: {}", receipt.message_id, receipt.to, receipt.body);
        let mut outbox = self.outbox.lock().await;
        if outbox.len() == self.capacity {
            outbox.pop_front();
        }
        outbox.push_back(receipt.clone());
        Ok(receipt)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_phone() {
        assert_eq!(normalize_phone("+1 (555) 000-1111").as_deref(), Some("+15550001111"));
        assert_eq!(normalize_phone("9876543210").as_deref(), Some("9876543210"));
        assert_eq!(normalize_phone("12345"), None);
        assert_eq!(normalize_phone("+44 20 ABC"), None);
        assert_eq!(normalize_phone(""), None);
    }

    #[tokio::test]
    async fn test_outbox_records_messages() {
        let sms = MockSmsProvider::new();
        let receipt = sms.send("+91 98765 43210", "Heavy rain tomorrow").await.unwrap();

        assert_eq!(receipt.to, "+919876543210");
        assert_eq!(receipt.status, "simulated");

        let sent = sms.sent().await;
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0], receipt);
    }

    #[tokio::test]
    async fn test_outbox_keeps_latest_messages() {
        let sms = MockSmsProvider::with_capacity(2);
        for body in ["first", "second", "third"] {
            sms.send("+15550001111", body).await.unwrap();
        }

        let bodies: Vec<String> = sms.sent().await.into_iter().map(|r| r.body).collect();
        assert_eq!(bodies, vec!["second".to_string(), "third".to_string()]);
    }

    #[tokio::test]
    async fn test_rejects_bad_input() {
        let sms = MockSmsProvider::new();
        assert!(sms.send("not-a-phone", "hi").await.is_err());
        assert!(sms.send("+15550001111", "   ").await.is_err());
        assert!(sms.sent().await.is_empty());
    }
}
