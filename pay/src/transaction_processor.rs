use crate::{
    session::CommandSession,
    types::{
        PayError, ProcessingConfig, ReceiptState, ServiceMetrics, TransactionHash,
        TransactionReceipt, TransactionResult, TransactionStatus,
    },
    wallet::WalletSession,
};
use chrono::Utc;
use log::{error, info};
use rand::Rng;
use std::{sync::Arc, time::Duration};
use tokio::{sync::RwLock, time::sleep};
use voxchain_intent::{SuggestedProtocol, TransactionIntent};

/// Simulated transaction submission for a confirmed voice intent
pub struct TransactionProcessor {
    config: ProcessingConfig,
    session: Arc<CommandSession>,
    wallet: Arc<WalletSession>,
    metrics: Arc<RwLock<ServiceMetrics>>,
}

impl TransactionProcessor {
    pub fn new(
        config: ProcessingConfig,
        session: Arc<CommandSession>,
        wallet: Arc<WalletSession>,
        metrics: Arc<RwLock<ServiceMetrics>>,
    ) -> Self {
        Self {
            config,
            session,
            wallet,
            metrics,
        }
    }

    /// Confirm the current intent. Precondition failures are errors; a failed
    /// simulated transaction is an `Ok` result with `Error` status.
    pub async fn confirm(&self) -> Result<TransactionResult, PayError> {
        if self.wallet.current().await.is_none() {
            return Err(PayError::NotConfirmable("connect a wallet first".to_string()));
        }

        let (ticket, intent) = self.session.start_transaction().await?;
        info!("Submitting transaction for command {}: {}", ticket.id, intent.summary());

        // ThreadRng is not Send; draw everything before awaiting
        let (delay_ms, succeeded, tx_hash, block_number) = {
            let mut rng = rand::rng();
            (
                rng.random_range(self.config.min_delay_ms..=self.config.max_delay_ms),
                rng.random_bool(self.config.success_rate),
                format!("0x{}", hex::encode(rng.random::<[u8; 20]>())),
                rng.random_range(40_000_000..50_000_000u64),
            )
        };

        sleep(Duration::from_millis(delay_ms)).await;

        let mut result = if succeeded {
            let receipt = build_receipt(
                &intent,
                &self.config.source_network,
                TransactionHash(tx_hash),
                block_number,
            );
            info!("✅ Transaction {} {:?}", receipt.tx_hash, receipt.state);
            TransactionResult::success(ticket.id, intent.intent, success_message(&intent), receipt)
        } else {
            let message = failure_message(&intent);
            error!("❌ {}", message);
            TransactionResult::failure(ticket.id, intent.intent, message)
        };

        let stored = self.session.finish_transaction(&ticket, &result).await;
        result.superseded = !stored;

        let mut metrics = self.metrics.write().await;
        match (result.status, stored) {
            (_, false) => metrics.superseded_transactions += 1,
            (TransactionStatus::Success, true) => metrics.transactions_succeeded += 1,
            (_, true) => metrics.transactions_failed += 1,
        }

        Ok(result)
    }
}

pub fn success_message(intent: &TransactionIntent) -> String {
    format!(
        "Transaction successful! Action: {}, Amount: {}, To: {}",
        intent.intent,
        intent
            .amount
            .map(|a| a.to_string())
            .unwrap_or_else(|| "N/A".to_string()),
        intent.recipient_address.as_deref().unwrap_or("N/A"),
    )
}

pub fn failure_message(intent: &TransactionIntent) -> String {
    format!(
        "Transaction failed. Could not complete {} action. Please try again.",
        intent.intent
    )
}

/// Receipt text depends on the suggested protocol: same-chain transfers
/// complete, bridged ones are only initiated.
pub fn build_receipt(
    intent: &TransactionIntent,
    source_network: &str,
    tx_hash: TransactionHash,
    block_number: u64,
) -> TransactionReceipt {
    let recipient = intent.recipient_address.as_deref().unwrap_or("recipient");
    let value = match (intent.amount, intent.token.as_deref()) {
        (Some(amount), Some(token)) => format!("{} {}", amount, token),
        (Some(amount), None) => amount.to_string(),
        (None, Some(token)) => format!("amount {}", token),
        (None, None) => "amount".to_string(),
    };

    let (title, message, footer) = match intent.suggested_protocol {
        SuggestedProtocol::Ccip => (
            "Cross-Chain Tx Initiated (CCIP)",
            format!(
                "Your CCIP transaction to {} on {} for {} has been initiated via Chainlink CCIP.",
                recipient,
                intent.destination_chain.as_deref().unwrap_or("destination"),
                value
            ),
            Some("Powered by Chainlink CCIP"),
        ),
        SuggestedProtocol::AvalancheTeleporter => (
            "Subnet Tx Initiated (Teleporter)",
            format!(
                "Your transaction to {} on {} for {} has been initiated via Avalanche Teleporter.",
                recipient,
                intent
                    .destination_chain
                    .as_deref()
                    .unwrap_or("destination subnet"),
                value
            ),
            Some("Powered by Avalanche Teleporter (AWM/ICM)"),
        ),
        SuggestedProtocol::SameChain => (
            "Transaction Successful",
            format!("Your transaction to {} for {} is complete.", recipient, value),
            None,
        ),
    };

    TransactionReceipt {
        tx_hash,
        block_number,
        confirmations: "12/12".to_string(),
        source_network: source_network.to_string(),
        protocol: intent.suggested_protocol,
        protocol_display_name: intent.suggested_protocol.display_name().to_string(),
        destination_chain: if intent.is_cross_chain() {
            intent.destination_chain.clone()
        } else {
            None
        },
        state: if intent.is_cross_chain() {
            ReceiptState::Initiated
        } else {
            ReceiptState::Completed
        },
        title: title.to_string(),
        message,
        footer: footer.map(str::to_string),
        created_at: Utc::now(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{CommandOutcome, WalletConfig};
    use voxchain_intent::{normalize, PartialTransactionIntent};

    const ADDRESS: &str = "0x71c7656ec7ab88b098defb751b7401b5f6d8976f";

    fn raw(intent: &str, chain: Option<&str>) -> PartialTransactionIntent {
        PartialTransactionIntent {
            intent: Some(intent.to_string()),
            amount: Some(1.5),
            recipient_address: Some("bob.avax".to_string()),
            token: Some("AVAX".to_string()),
            destination_chain: chain.map(str::to_string),
            ..Default::default()
        }
    }

    fn processor(success_rate: f64) -> (TransactionProcessor, Arc<CommandSession>, Arc<WalletSession>) {
        let session = Arc::new(CommandSession::new());
        let wallet = Arc::new(WalletSession::new(WalletConfig {
            required_chain_id: 43113,
            network_name: "Avalanche Fuji Testnet".to_string(),
        }));
        let processor = TransactionProcessor::new(
            ProcessingConfig {
                min_delay_ms: 0,
                max_delay_ms: 0,
                success_rate,
                source_network: "Avalanche C-Chain".to_string(),
            },
            Arc::clone(&session),
            Arc::clone(&wallet),
            Arc::new(RwLock::new(ServiceMetrics::default())),
        );
        (processor, session, wallet)
    }

    #[test]
    fn test_messages() {
        let intent = normalize(raw("send", None));
        assert_eq!(
            success_message(&intent),
            "Transaction successful! Action: send, Amount: 1.5, To: bob.avax"
        );
        assert_eq!(
            failure_message(&intent),
            "Transaction failed. Could not complete send action. Please try again."
        );

        let bare = normalize(PartialTransactionIntent {
            intent: Some("stake".to_string()),
            ..Default::default()
        });
        assert_eq!(
            success_message(&bare),
            "Transaction successful! Action: stake, Amount: N/A, To: N/A"
        );
    }

    #[test]
    fn test_receipt_per_protocol() {
        let hash = TransactionHash("0xabc".to_string());

        let same = build_receipt(&normalize(raw("send", None)), "Avalanche C-Chain", hash.clone(), 40_000_001);
        assert_eq!(same.state, ReceiptState::Completed);
        assert_eq!(same.title, "Transaction Successful");
        assert_eq!(same.message, "Your transaction to bob.avax for 1.5 AVAX is complete.");
        assert_eq!(same.footer, None);
        assert_eq!(same.confirmations, "12/12");

        let ccip = build_receipt(&normalize(raw("send", Some("Ethereum"))), "Avalanche C-Chain", hash.clone(), 1);
        assert_eq!(ccip.state, ReceiptState::Initiated);
        assert_eq!(ccip.protocol_display_name, "Chainlink CCIP");
        assert_eq!(
            ccip.message,
            "Your CCIP transaction to bob.avax on Ethereum for 1.5 AVAX has been initiated via Chainlink CCIP."
        );
        assert_eq!(ccip.destination_chain.as_deref(), Some("Ethereum"));

        let teleporter = build_receipt(&normalize(raw("send", Some("Beam Subnet"))), "Avalanche C-Chain", hash, 1);
        assert_eq!(teleporter.title, "Subnet Tx Initiated (Teleporter)");
        assert_eq!(teleporter.footer.as_deref(), Some("Powered by Avalanche Teleporter (AWM/ICM)"));
    }

    #[tokio::test]
    async fn test_confirm_requires_wallet() {
        let (processor, session, _wallet) = processor(1.0);
        let ticket = session.begin("send 1.5 AVAX to bob.avax").await;
        session
            .complete(&ticket, CommandOutcome::Parsed(normalize(raw("send", None))))
            .await;

        assert!(matches!(processor.confirm().await, Err(PayError::NotConfirmable(_))));
    }

    #[tokio::test]
    async fn test_confirm_success() {
        let (processor, session, wallet) = processor(1.0);
        wallet.connect(ADDRESS, 43113).await.unwrap();
        let ticket = session.begin("send 1.5 AVAX to bob.avax on Ethereum").await;
        session
            .complete(&ticket, CommandOutcome::Parsed(normalize(raw("send", Some("Ethereum")))))
            .await;

        let result = processor.confirm().await.unwrap();
        assert_eq!(result.status, TransactionStatus::Success);
        assert_eq!(result.command_id, ticket.id);
        assert!(!result.superseded);

        let receipt = result.receipt.unwrap();
        assert_eq!(receipt.tx_hash.0.len(), 42);
        assert!((40_000_000..50_000_000).contains(&receipt.block_number));

        let snapshot = session.snapshot().await;
        assert_eq!(snapshot.transaction_status, TransactionStatus::Success);
        assert_eq!(snapshot.transaction_message, Some(result.message));
    }

    #[tokio::test]
    async fn test_confirm_failure() {
        let (processor, session, wallet) = processor(0.0);
        wallet.connect(ADDRESS, 43113).await.unwrap();
        let ticket = session.begin("stake 3 AVAX").await;
        session
            .complete(&ticket, CommandOutcome::Parsed(normalize(raw("stake", None))))
            .await;

        let result = processor.confirm().await.unwrap();
        assert_eq!(result.status, TransactionStatus::Error);
        assert!(result.receipt.is_none());
        assert_eq!(session.snapshot().await.transaction_status, TransactionStatus::Error);
        assert_eq!(processor.metrics.read().await.transactions_failed, 1);
    }

    #[tokio::test]
    async fn test_confirm_superseded_by_new_command() {
        let (mut processor, session, wallet) = processor(1.0);
        processor.config.min_delay_ms = 100;
        processor.config.max_delay_ms = 100;
        let processor = Arc::new(processor);

        wallet.connect(ADDRESS, 43113).await.unwrap();
        let ticket = session.begin("send 1.5 AVAX to bob.avax").await;
        session
            .complete(&ticket, CommandOutcome::Parsed(normalize(raw("send", None))))
            .await;

        let pending = {
            let processor = Arc::clone(&processor);
            tokio::spawn(async move { processor.confirm().await })
        };
        tokio::time::sleep(Duration::from_millis(20)).await;

        let next = session.begin("stake 3 AVAX").await;
        session
            .complete(&next, CommandOutcome::Parsed(normalize(raw("stake", None))))
            .await;
        assert!(matches!(processor.confirm().await, Err(PayError::NotConfirmable(_))));

        let result = pending.await.unwrap().unwrap();
        assert_eq!(result.status, TransactionStatus::Success);
        assert!(result.superseded);

        let metrics = processor.metrics.read().await.clone();
        assert_eq!(metrics.superseded_transactions, 1);
        assert_eq!(metrics.transactions_succeeded, 0);

        let snapshot = session.snapshot().await;
        assert_eq!(snapshot.transaction_status, TransactionStatus::Idle);
        assert!(!snapshot.transaction_in_flight);
    }
}
