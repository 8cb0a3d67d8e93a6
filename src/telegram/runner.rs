use std::time::Duration;

use crate::bot::{App, Delivery, Outbound, Screen};

use super::client::{TelegramClient, TelegramError};
use super::types::Update;

/// Pause after a failed poll so an outage does not spin the loop
const POLL_RETRY_DELAY: Duration = Duration::from_secs(1);

/// Outbound side of the chat platform
#[allow(async_fn_in_trait)]
pub trait Transport {
    async fn send_screen(&self, chat_id: i64, screen: &Screen) -> Result<(), TelegramError>;
    async fn edit_screen(
        &self,
        chat_id: i64,
        message_id: i64,
        screen: &Screen,
    ) -> Result<(), TelegramError>;
    async fn answer_callback(&self, callback_id: &str) -> Result<(), TelegramError>;
}

impl Transport for TelegramClient {
    async fn send_screen(&self, chat_id: i64, screen: &Screen) -> Result<(), TelegramError> {
        self.send_message(chat_id, screen).await
    }

    async fn edit_screen(
        &self,
        chat_id: i64,
        message_id: i64,
        screen: &Screen,
    ) -> Result<(), TelegramError> {
        self.edit_message_text(chat_id, message_id, screen).await
    }

    async fn answer_callback(&self, callback_id: &str) -> Result<(), TelegramError> {
        self.answer_callback_query(callback_id).await
    }
}

/// What became of one outbound screen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeliveryOutcome {
    Delivered,
    /// The edit would not have changed anything
    Unchanged,
    /// Logged and dropped
    Failed,
}

/// Present a screen, best-effort. "Not modified" is silent; any other
/// failure is logged and never retried.
pub async fn deliver<T: Transport>(transport: &T, outbound: &Outbound) -> DeliveryOutcome {
    let result = match outbound.delivery {
        Delivery::Send => transport.send_screen(outbound.chat_id, &outbound.screen).await,
        Delivery::Edit { message_id } => {
            transport
                .edit_screen(outbound.chat_id, message_id, &outbound.screen)
                .await
        }
    };
    match result {
        Ok(()) => DeliveryOutcome::Delivered,
        Err(e) if e.is_not_modified() => DeliveryOutcome::Unchanged,
        Err(e) => {
            log::error!("chat {}: could not present screen: {}", outbound.chat_id, e);
            DeliveryOutcome::Failed
        }
    }
}

/// Handle one update end to end
pub async fn process_update<T: Transport>(app: &mut App, transport: &T, update: Update) {
    let Some(inbound) = update.into_inbound() else {
        return;
    };
    if let Some(id) = &inbound.callback_id {
        // Stops the client's loading spinner; failure is harmless
        let _ = transport.answer_callback(id).await;
    }
    if let Some(outbound) = app.handle(inbound.event) {
        log::debug!("chat {}: {:?}\n{}", outbound.chat_id, outbound.delivery, outbound.screen);
        deliver(transport, &outbound).await;
    }
}

/// Poll for updates and handle them in arrival order until SIGINT/SIGTERM.
pub async fn run(app: &mut App, client: &TelegramClient) {
    let mut offset: Option<i64> = None;
    let shutdown = shutdown_signal();
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            _ = &mut shutdown => {
                log::info!("shutdown signal received, stopping");
                break;
            }
            result = client.get_updates(offset) => match result {
                Ok(updates) => {
                    for update in updates {
                        offset = Some(update.update_id + 1);
                        process_update(app, client, update).await;
                    }
                }
                Err(e) => {
                    log::error!("getUpdates failed: {}", e);
                    tokio::time::sleep(POLL_RETRY_DELAY).await;
                }
            }
        }
    }

    // Confirm handled updates so a restart does not replay them
    if let Some(offset) = offset
        && let Err(e) = client.acknowledge(offset).await
    {
        log::warn!("could not acknowledge updates before exit: {}", e);
    }
}

/// Resolves on Ctrl-C, or SIGTERM on Unix
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            log::error!("could not listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{SignalKind, signal};
        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                log::error!("could not listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bot::Session;
    use crate::model::config::UiConfig;
    use crate::model::config::StorageConfig;
    use crate::model::store::Store;
    use std::cell::RefCell;
    use tempfile::TempDir;

    /// Records every call; edits fail with the configured description
    #[derive(Default)]
    struct FakeTransport {
        calls: RefCell<Vec<String>>,
        edit_error: Option<String>,
    }

    impl Transport for FakeTransport {
        async fn send_screen(&self, chat_id: i64, screen: &Screen) -> Result<(), TelegramError> {
            self.calls
                .borrow_mut()
                .push(format!("send {} {}", chat_id, screen.caption));
            Ok(())
        }

        async fn edit_screen(
            &self,
            chat_id: i64,
            message_id: i64,
            screen: &Screen,
        ) -> Result<(), TelegramError> {
            self.calls
                .borrow_mut()
                .push(format!("edit {} {} {}", chat_id, message_id, screen.caption));
            match &self.edit_error {
                Some(description) => Err(TelegramError::Api {
                    code: 400,
                    description: description.clone(),
                }),
                None => Ok(()),
            }
        }

        async fn answer_callback(&self, callback_id: &str) -> Result<(), TelegramError> {
            self.calls.borrow_mut().push(format!("answer {}", callback_id));
            Err(TelegramError::MissingResult)
        }
    }

    fn app(dir: &TempDir) -> App {
        let store = Store::new(&StorageConfig::in_dir(dir.path()));
        App::new(store, &UiConfig::default())
    }

    fn callback(update_id: i64, data: &str) -> Update {
        serde_json::from_value(serde_json::json!({
            "update_id": update_id,
            "callback_query": {
                "id": format!("cb{}", update_id),
                "from": {"id": 7, "first_name": "Sam"},
                "message": {"message_id": 50, "chat": {"id": 42}},
                "data": data
            }
        }))
        .unwrap()
    }

    fn text(update_id: i64, text: &str) -> Update {
        serde_json::from_value(serde_json::json!({
            "update_id": update_id,
            "message": {
                "message_id": 60 + update_id,
                "chat": {"id": 42},
                "from": {"id": 7, "first_name": "Sam", "username": "sam"},
                "text": text
            }
        }))
        .unwrap()
    }

    #[tokio::test]
    async fn test_callback_is_answered_then_edited() {
        let tmp = TempDir::new().unwrap();
        let mut app = app(&tmp);
        let transport = FakeTransport::default();

        process_update(&mut app, &transport, callback(1, "WISHLIST_MENU")).await;

        assert_eq!(
            *transport.calls.borrow(),
            vec!["answer cb1", "edit 42 50 🎁 Общее меню вишлиста:"]
        );
    }

    #[tokio::test]
    async fn test_not_modified_is_swallowed() {
        let transport = FakeTransport {
            edit_error: Some("Bad Request: message is not modified".into()),
            ..Default::default()
        };
        let outbound = Outbound::replace(42, Some(50), Screen::text("same"));
        assert_eq!(
            deliver(&transport, &outbound).await,
            DeliveryOutcome::Unchanged
        );
    }

    #[tokio::test]
    async fn test_other_edit_errors_do_not_stop_processing() {
        let tmp = TempDir::new().unwrap();
        let mut app = app(&tmp);
        let transport = FakeTransport {
            edit_error: Some("Bad Request: message to edit not found".into()),
            ..Default::default()
        };

        let outbound = Outbound::replace(42, Some(50), Screen::text("x"));
        assert_eq!(deliver(&transport, &outbound).await, DeliveryOutcome::Failed);

        // The failed edit of ADD_WISH still moved the session on
        process_update(&mut app, &transport, callback(2, "ADD_WISH")).await;
        assert_eq!(*app.sessions.peek(42), Session::AwaitingWishText);
        process_update(&mut app, &transport, text(3, "Socks")).await;
        assert_eq!(
            *app.sessions.peek(42),
            Session::AwaitingPriority {
                draft: "Socks".into()
            }
        );
        assert_eq!(
            transport.calls.borrow().last().map(String::as_str),
            Some("send 42 Выбери приоритет:")
        );
    }

    #[tokio::test]
    async fn test_idle_text_gets_no_reply() {
        let tmp = TempDir::new().unwrap();
        let mut app = app(&tmp);
        let transport = FakeTransport::default();

        process_update(&mut app, &transport, text(4, "hello?")).await;
        assert!(transport.calls.borrow().is_empty());
        assert!(!app.store.wishlist_path.exists());
    }

    #[tokio::test]
    async fn test_start_sends_greeting() {
        let tmp = TempDir::new().unwrap();
        let mut app = app(&tmp);
        let transport = FakeTransport::default();

        process_update(&mut app, &transport, text(5, "/start")).await;
        assert_eq!(
            *transport.calls.borrow(),
            vec!["send 42 Привет, Sam! Это ваш общий вишлист 💑"]
        );
    }
}
