//! Slack incoming webhook delivery. One POST per call, no retries.

const TEXT_LABEL: &str = "MESSAGE: ";

#[derive(Debug, thiserror::Error)]
pub(crate) enum SendError {
    #[error(transparent)]
    Transport(#[from] reqwest::Error),

    #[error("non-200 response: {0}")]
    Response(reqwest::StatusCode),
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub(crate) struct NotificationRequest {
    pub(crate) text: String,
    pub(crate) channel: String,
}

impl NotificationRequest {
    pub(crate) fn new(message: &str, channel: &str) -> Self {
        Self {
            text: format!("{TEXT_LABEL}{message}"),
            channel: channel.to_string(),
        }
    }
}

pub(crate) async fn send_message(
    client: &reqwest::Client,
    webhook_url: &str,
    channel: &str,
    message: &str,
) -> Result<(), SendError> {
    send(client, webhook_url, &NotificationRequest::new(message, channel)).await
}

pub(crate) async fn send(
    client: &reqwest::Client,
    webhook_url: &str,
    request: &NotificationRequest,
) -> Result<(), SendError> {
    let res = client.post(webhook_url).json(request).send().await?;

    let status = res.status();

    // Drain so the connection is released, the outcome only depends on the status.
    if let Err(e) = res.bytes().await {
        tracing::warn!(error =? e, "Failed to read webhook response body");
    }

    if status != reqwest::StatusCode::OK {
        return Err(SendError::Response(status));
    }

    tracing::info!(channel = %request.channel, status = %status, "Delivered message to Slack");

    Ok(())
}
