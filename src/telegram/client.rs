use std::time::Duration;

use serde::Serialize;
use serde::de::DeserializeOwned;

use super::types::{
    AnswerCallbackQuery, ApiResponse, EditMessageText, GetUpdates, SendMessage, Update, User,
    keyboard_markup,
};
use crate::bot::Screen;

/// Updates the bot subscribes to
const ALLOWED_UPDATES: &[&str] = &["message", "callback_query"];

/// Error type for Bot API calls
#[derive(Debug, thiserror::Error)]
pub enum TelegramError {
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("telegram api error {code}: {description}")]
    Api { code: i32, description: String },
    #[error("telegram api returned ok without a result")]
    MissingResult,
}

impl TelegramError {
    /// An edit that would leave the message exactly as it is
    pub fn is_not_modified(&self) -> bool {
        matches!(self, TelegramError::Api { description, .. }
            if description.contains("message is not modified"))
    }
}

/// Minimal Bot API client over HTTPS
pub struct TelegramClient {
    http: reqwest::Client,
    /// `<api_url>/bot<token>`
    base: String,
    poll_timeout_secs: u64,
}

impl TelegramClient {
    pub fn new(api_url: &str, token: &str, poll_timeout_secs: u64) -> Result<Self, TelegramError> {
        // The request timeout must outlast the long poll
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(poll_timeout_secs + 10))
            .build()?;
        Ok(TelegramClient {
            http,
            base: format!("{}/bot{}", api_url.trim_end_matches('/'), token),
            poll_timeout_secs,
        })
    }

    async fn call<P, R>(&self, method: &str, params: &P) -> Result<R, TelegramError>
    where
        P: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        let response: ApiResponse<R> = self
            .http
            .post(format!("{}/{}", self.base, method))
            .json(params)
            .send()
            .await?
            .json()
            .await?;
        if response.ok {
            response.result.ok_or(TelegramError::MissingResult)
        } else {
            Err(TelegramError::Api {
                code: response.error_code.unwrap_or(0),
                description: response.description.unwrap_or_default(),
            })
        }
    }

    /// The bot's own account; doubles as a token check at startup
    pub async fn get_me(&self) -> Result<User, TelegramError> {
        self.call("getMe", &serde_json::json!({})).await
    }

    /// Long-poll for updates after `offset`
    pub async fn get_updates(&self, offset: Option<i64>) -> Result<Vec<Update>, TelegramError> {
        let params = GetUpdates {
            offset,
            timeout: self.poll_timeout_secs,
            allowed_updates: ALLOWED_UPDATES,
        };
        self.call("getUpdates", &params).await
    }

    /// Confirm every update before `offset` without waiting for new ones
    pub async fn acknowledge(&self, offset: i64) -> Result<(), TelegramError> {
        let params = GetUpdates {
            offset: Some(offset),
            timeout: 0,
            allowed_updates: ALLOWED_UPDATES,
        };
        self.call::<_, serde_json::Value>("getUpdates", &params)
            .await
            .map(|_| ())
    }

    pub async fn send_message(&self, chat_id: i64, screen: &Screen) -> Result<(), TelegramError> {
        let params = SendMessage {
            chat_id,
            text: &screen.caption,
            reply_markup: keyboard_markup(screen),
        };
        self.call::<_, serde_json::Value>("sendMessage", &params)
            .await
            .map(|_| ())
    }

    pub async fn edit_message_text(
        &self,
        chat_id: i64,
        message_id: i64,
        screen: &Screen,
    ) -> Result<(), TelegramError> {
        let params = EditMessageText {
            chat_id,
            message_id,
            text: &screen.caption,
            reply_markup: keyboard_markup(screen),
        };
        self.call::<_, serde_json::Value>("editMessageText", &params)
            .await
            .map(|_| ())
    }

    pub async fn answer_callback_query(&self, callback_query_id: &str) -> Result<(), TelegramError> {
        let params = AnswerCallbackQuery { callback_query_id };
        self.call::<_, serde_json::Value>("answerCallbackQuery", &params)
            .await
            .map(|_| ())
    }
}
