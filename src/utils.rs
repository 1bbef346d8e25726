use anyhow::Result;
use futures_util::StreamExt;
use teloxide::{
    net::Download,
    prelude::*,
    types::{ChatId, MessageId},
    RequestError,
};

/// Attempt to edit a message and log a warning on failure.
pub async fn try_edit_message(
    bot: &Bot,
    chat_id: ChatId,
    message_id: MessageId,
    text: impl Into<String>,
) {
    if let Err(err) = bot.edit_message_text(chat_id, message_id, text).await {
        tracing::warn!(
            error = %err,
            chat_id = chat_id.0,
            message_id = message_id.0,
            "Failed to edit message",
        );
    }
}

/// Download a file from Telegram and return the raw bytes.
pub async fn download_file(bot: &Bot, path: &str) -> Result<Vec<u8>, RequestError> {
    let mut data = Vec::new();
    let mut stream = bot.download_file_stream(path);
    while let Some(chunk) = stream.next().await {
        data.extend_from_slice(&chunk?);
    }
    tracing::trace!(size = data.len(), "downloaded file bytes");
    Ok(data)
}

/// Fetch a Telegram file by its id and return the raw bytes.
pub async fn download_telegram_file(bot: &Bot, file_id: &str) -> Result<Vec<u8>> {
    let file = bot.get_file(file_id).await?;
    tracing::debug!(path = %file.path, "Downloading Telegram file");
    let bytes = download_file(bot, &file.path).await?;
    tracing::debug!(path = %file.path, size = bytes.len(), "Finished download");
    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Result;
    use reqwest::Client;
    use wiremock::{
        matchers::{method, path},
        Mock, MockServer, ResponseTemplate,
    };

    #[tokio::test]
    async fn try_edit_message_sends_request() -> Result<(), RequestError> {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/botTEST/EditMessageText"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_raw(r#"{"ok":true,"result":true}"#, "application/json"),
            )
            .expect(1)
            .mount(&server)
            .await;

        let client = Client::builder().no_proxy().build().unwrap();
        let bot = Bot::with_client("TEST", client)
            .set_api_url(reqwest::Url::parse(&server.uri()).unwrap());
        try_edit_message(&bot, ChatId(1), MessageId(2), "hi").await;
        server.verify().await;
        Ok(())
    }

    #[tokio::test]
    async fn download_telegram_file_gets_bytes() -> Result<()> {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/botTEST/GetFile"))
            .respond_with(ResponseTemplate::new(200).set_body_raw(
                r#"{"ok":true,"result":{"file_id":"f","file_unique_id":"u","file_path":"path"}}"#,
                "application/json",
            ))
            .expect(1)
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(path("/file/botTEST/path"))
            .respond_with(
                ResponseTemplate::new(200).set_body_raw("img", "application/octet-stream"),
            )
            .expect(1)
            .mount(&server)
            .await;

        let url = reqwest::Url::parse(&server.uri()).unwrap();
        let client = Client::builder().no_proxy().build().unwrap();
        let bot = Bot::with_client("TEST", client).set_api_url(url);
        let bytes = download_telegram_file(&bot, "f").await?;
        assert_eq!(bytes, b"img");
        server.verify().await;
        Ok(())
    }
}
