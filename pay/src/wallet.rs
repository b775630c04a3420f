use crate::types::{PayError, WalletAddress, WalletConfig, WalletConnection};
use chrono::Utc;
use log::info;
use tokio::sync::RwLock;

/// Wallet state as reported by the browser extension.
///
/// The extension does the actual connecting; this only tracks the account
/// and enforces the expected network.
#[derive(Debug)]
pub struct WalletSession {
    config: WalletConfig,
    connection: RwLock<Option<WalletConnection>>,
}

impl WalletSession {
    pub fn new(config: WalletConfig) -> Self {
        Self {
            config,
            connection: RwLock::new(None),
        }
    }

    pub async fn connect(&self, address: &str, chain_id: u64) -> Result<WalletConnection, PayError> {
        let address = WalletAddress::parse(address)?;

        if chain_id != self.config.required_chain_id {
            return Err(PayError::WrongNetwork {
                expected: self.config.required_chain_id,
                actual: chain_id,
            });
        }

        let connection = WalletConnection {
            address,
            chain_id,
            connected_at: Utc::now(),
        };

        info!("Wallet {} connected on {}", connection.address, self.config.network_name);
        *self.connection.write().await = Some(connection.clone());
        Ok(connection)
    }

    pub async fn disconnect(&self) -> Option<WalletConnection> {
        let previous = self.connection.write().await.take();
        if let Some(ref connection) = previous {
            info!("Wallet {} disconnected", connection.address);
        }
        previous
    }

    pub async fn current(&self) -> Option<WalletConnection> {
        self.connection.read().await.clone()
    }

    pub fn required_chain_id(&self) -> u64 {
        self.config.required_chain_id
    }
}
