use async_trait::async_trait;
use tokio::io::AsyncWriteExt;
use tracing::info;

use crate::error::TransportError;
use crate::messaging::traits::Messenger;

/// Prints relayed messages to stdout, for local runs without a real transport
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleMessenger;

impl ConsoleMessenger {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Messenger for ConsoleMessenger {
    async fn send_message(&self, to: &str, text: &str) -> Result<(), TransportError> {
        info!(%to, "📤 Relaying message");

        let rendered = format!("\n📨 [to {}]\n{}\n", to, text);
        let mut stdout = tokio::io::stdout();
        stdout
            .write_all(rendered.as_bytes())
            .await
            .map_err(|e| TransportError::Delivery {
                to: to.to_string(),
                reason: e.to_string(),
            })?;
        stdout.flush().await.map_err(|e| TransportError::Delivery {
            to: to.to_string(),
            reason: e.to_string(),
        })
    }

    fn name(&self) -> &'static str {
        "console"
    }
}
