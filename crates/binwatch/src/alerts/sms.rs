use anyhow::Context;

/// What the provider told us about an accepted message.
#[derive(Debug, Clone)]
pub struct SmsReceipt {
    /// Provider-assigned message identifier, when one was issued.
    pub message_id: Option<String>,
}

pub trait SmsSender: std::fmt::Debug + Send + Sync + 'static {
    fn send<'s>(
        &'s self,
        body: &'s str,
        to: &'s str,
    ) -> impl std::future::Future<Output = anyhow::Result<SmsReceipt>> + Send + 's;
}

/// Sends text messages through the Twilio Messages API.
#[derive(Debug)]
pub struct TwilioSender {
    account_sid: String,
    auth_token: String,
    from_number: String,
    http_client: reqwest::Client,
}

impl TwilioSender {
    async fn send(&self, body: &str, to: &str) -> anyhow::Result<SmsReceipt> {
        #[derive(serde::Deserialize)]
        struct MessageResponse {
            sid: String,
        }

        let url = format!(
            "https://api.twilio.com/2010-04-01/Accounts/{}/Messages.json",
            self.account_sid
        );

        let response = self
            .http_client
            .post(&url)
            .basic_auth(&self.account_sid, Some(&self.auth_token))
            .form(&[
                ("To", to),
                ("From", self.from_number.as_str()),
                ("Body", body),
            ])
            .send()
            .await
            .context("calling Twilio API")?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            anyhow::bail!("Twilio API responded {status}: {detail}");
        }

        let MessageResponse { sid } = response
            .json()
            .await
            .context("decoding Twilio response")?;

        tracing::debug!(%to, message_sid = %sid, "successfully sent SMS");

        Ok(SmsReceipt {
            message_id: Some(sid),
        })
    }
}

#[derive(Debug)]
pub enum Sender {
    Disabled,
    Twilio(TwilioSender),
}

impl Sender {
    pub fn twilio(
        account_sid: &str,
        auth_token: &str,
        from_number: &str,
        http_client: reqwest::Client,
    ) -> Sender {
        Sender::Twilio(TwilioSender {
            account_sid: account_sid.to_string(),
            auth_token: auth_token.to_string(),
            from_number: from_number.to_string(),
            http_client,
        })
    }
}

impl SmsSender for Sender {
    async fn send<'s>(&'s self, body: &'s str, to: &'s str) -> anyhow::Result<SmsReceipt> {
        match self {
            Sender::Disabled => {
                tracing::warn!(
                    %to,
                    body_chars = body.chars().count(),
                    "skipping SMS send (disabled)"
                );
                Ok(SmsReceipt { message_id: None })
            }
            Sender::Twilio(twilio) => twilio.send(body, to).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn disabled_sender_issues_no_message_id() {
        let receipt = Sender::Disabled.send("hello", "+15550100").await.unwrap();
        assert!(receipt.message_id.is_none());
    }
}
