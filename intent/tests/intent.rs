use serde_json::{json, Value};
use voxchain_intent::{
    normalize, parse_extraction, Intent, PartialTransactionIntent, RecipientType,
    SuggestedProtocol, TransactionIntent,
};

fn normalize_json(input: Value) -> Value {
    let raw: PartialTransactionIntent = serde_json::from_value(input).unwrap();
    serde_json::to_value(normalize(raw)).unwrap()
}

#[test]
fn test_ethereum_destination() {
    let out = normalize_json(json!({ "destinationChain": "Ethereum" }));
    assert_eq!(out["suggestedProtocol"], "CCIP");
    assert_eq!(out["recipientType"], "Unknown");
    assert_eq!(out["intent"], "unknown");
    assert_eq!(out["destinationChain"], "Ethereum");
}

#[test]
fn test_dfk_subnet_destination() {
    let out = normalize_json(json!({ "destinationChain": "Avalanche DFK Subnet" }));
    assert_eq!(out["suggestedProtocol"], "AvalancheTeleporter");
}

#[test]
fn test_empty_record() {
    let out = normalize_json(json!({}));
    assert_eq!(
        out,
        json!({
            "intent": "unknown",
            "recipientType": "Unknown",
            "suggestedProtocol": "SameChain"
        })
    );
}

#[test]
fn test_explicit_protocol_not_recomputed() {
    let out = normalize_json(json!({
        "destinationChain": "Polygon",
        "suggestedProtocol": "SameChain"
    }));
    assert_eq!(out["suggestedProtocol"], "SameChain");
    assert_eq!(out["destinationChain"], "Polygon");
}

#[test]
fn test_invalid_intent_becomes_unknown() {
    let out = normalize_json(json!({ "intent": "banana" }));
    assert_eq!(out["intent"], "unknown");
}

#[test]
fn test_intent_matched_case_insensitively() {
    assert_eq!(normalize_json(json!({ "intent": "Send" }))["intent"], "send");
    assert_eq!(normalize_json(json!({ "intent": " STAKE " }))["intent"], "stake");
    assert_eq!(normalize_json(json!({ "intent": "sends" }))["intent"], "unknown");
    assert_eq!(normalize_json(json!({ "intent": 7 }))["intent"], "unknown");
}

#[test]
fn test_full_record_passes_through() {
    let raw = parse_extraction(
        r#"{
            "intent": "send",
            "amount": 10,
            "recipientAddress": "coffee-shop.avax",
            "recipientType": "EOA",
            "token": "AVAX",
            "destinationChain": "Arbitrum One"
        }"#,
    )
    .unwrap();

    let intent = normalize(raw);
    assert_eq!(
        intent,
        TransactionIntent {
            intent: Intent::Send,
            amount: Some(10.0),
            recipient_address: Some("coffee-shop.avax".to_string()),
            recipient_type: RecipientType::Eoa,
            token: Some("AVAX".to_string()),
            destination_chain: Some("Arbitrum One".to_string()),
            suggested_protocol: SuggestedProtocol::Ccip,
            suzaku_action: None,
        }
    );
    assert!(intent.is_cross_chain());
    assert_eq!(
        intent.summary(),
        "send 10 AVAX to coffee-shop.avax on Arbitrum One via CCIP"
    );
}

#[test]
fn test_normalize_is_idempotent() {
    let inputs = [
        json!({}),
        json!({ "intent": "banana", "destinationChain": "Beam" }),
        json!({ "intent": "stake", "amount": 25.5, "token": "AVAX", "suzakuAction": "stake" }),
        json!({ "destinationChain": "Solana", "recipientType": "SmartContract" }),
        json!({ "destinationChain": "", "suggestedProtocol": "SameChain" }),
    ];

    for input in inputs {
        let raw: PartialTransactionIntent = serde_json::from_value(input.clone()).unwrap();
        let once = normalize(raw);
        let twice = normalize(once.clone().into());
        assert_eq!(once, twice, "not idempotent for {}", input);
    }
}

#[test]
fn test_finalized_invariants_hold() {
    let chains = [
        None,
        Some("Ethereum"),
        Some("BSC"),
        Some("Beam Subnet"),
        Some("Avalanche"),
        Some(""),
    ];

    for chain in chains {
        let intent = normalize(PartialTransactionIntent {
            destination_chain: chain.map(str::to_string),
            ..Default::default()
        });

        if intent.destination_chain.is_none() {
            assert_eq!(intent.suggested_protocol, SuggestedProtocol::SameChain);
        }
        if intent.is_cross_chain() {
            assert!(intent
                .destination_chain
                .as_deref()
                .is_some_and(|c| !c.is_empty()));
        }
    }
}
