use super::commands::{InstallDataAction, OutputFormat};
use super::utils::{parse_address, parse_hex, parse_u256};
use anyhow::Context;
use semaphore_msa_crypto::{
    approve_message, selector, tx_hash, InstallData, ACCOUNT_EXECUTE_SIGNATURE,
    EXECUTE_TX_SIGNATURE, INITIATE_TX_SIGNATURE, SIGN_TX_SIGNATURE,
};
use semaphore_msa_types::{hash_to_scope, Commitment, SNARK_SCALAR_FIELD};
use serde_json::{json, Value};

const SIGNATURES: [(&str, &str); 4] = [
    ("initiateTx", INITIATE_TX_SIGNATURE),
    ("signTx", SIGN_TX_SIGNATURE),
    ("executeTx", EXECUTE_TX_SIGNATURE),
    ("execute", ACCOUNT_EXECUTE_SIGNATURE),
];

fn print_json(value: &Value) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

pub fn tx_hash_report(seq: u64, target: &str, value: &str, data: &str) -> anyhow::Result<Value> {
    let target = parse_address(target)?;
    let value = parse_u256(value)?;
    let data = parse_hex(data)?;

    let hash = tx_hash(seq, target, value, &data);
    Ok(json!({
        "seq": seq,
        "target": format!("{:?}", target),
        "value": value.to_string(),
        "call_data": format!("0x{}", hex::encode(&data)),
        "tx_hash": format!("{:?}", hash),
        "scope": hash_to_scope(hash).to_string(),
        "message": approve_message().to_string(),
    }))
}

pub fn handle_tx_hash(
    seq: u64,
    target: &str,
    value: &str,
    data: &str,
    format: OutputFormat,
) -> anyhow::Result<()> {
    let report = tx_hash_report(seq, target, value, data)?;
    match format {
        OutputFormat::Json => print_json(&report)?,
        OutputFormat::Text => {
            println!("tx hash:  {}", report["tx_hash"].as_str().unwrap_or_default());
            println!("scope:    {}", report["scope"].as_str().unwrap_or_default());
            println!("message:  {}", report["message"].as_str().unwrap_or_default());
        }
    }
    Ok(())
}

pub fn selectors_report() -> Value {
    let entries: Vec<Value> = SIGNATURES
        .iter()
        .map(|(name, signature)| {
            json!({
                "name": name,
                "signature": signature,
                "selector": format!("0x{}", hex::encode(selector(signature))),
            })
        })
        .collect();
    Value::Array(entries)
}

pub fn show_selectors(format: OutputFormat) -> anyhow::Result<()> {
    match format {
        OutputFormat::Json => print_json(&selectors_report())?,
        OutputFormat::Text => {
            for (name, signature) in SIGNATURES {
                println!("0x{}  {:<11} {}", hex::encode(selector(signature)), name, signature);
            }
        }
    }
    Ok(())
}

pub fn encode_install_data(threshold: u8, commitments: &[String]) -> anyhow::Result<String> {
    let commitments = commitments
        .iter()
        .map(|c| Commitment::parse(c).with_context(|| format!("commitment {}", c)))
        .collect::<anyhow::Result<Vec<_>>>()?;

    if let Some(bad) = commitments.iter().find(|c| !c.in_field()) {
        anyhow::bail!("commitment {} is not below the snark scalar field {}", bad, SNARK_SCALAR_FIELD);
    }

    Ok(format!("0x{}", hex::encode(InstallData::new(threshold, commitments).encode())))
}

pub fn decode_install_data(payload: &str) -> anyhow::Result<InstallData> {
    let bytes = parse_hex(payload)?;
    Ok(InstallData::decode(&bytes)?)
}

pub fn handle_install_data(action: InstallDataAction, format: OutputFormat) -> anyhow::Result<()> {
    match action {
        InstallDataAction::Encode { threshold, commitments } => {
            let encoded = encode_install_data(threshold, &commitments)?;
            match format {
                OutputFormat::Json => print_json(&json!({ "install_data": encoded }))?,
                OutputFormat::Text => println!("{}", encoded),
            }
        }
        InstallDataAction::Decode { payload } => {
            let decoded = decode_install_data(&payload)?;
            match format {
                OutputFormat::Json => print_json(&json!({
                    "threshold": decoded.threshold,
                    "commitments": decoded.commitments,
                }))?,
                OutputFormat::Text => {
                    println!("threshold:   {}", decoded.threshold);
                    println!("commitments: {}", decoded.commitments.len());
                    for commitment in &decoded.commitments {
                        println!("  {}", commitment.to_hex());
                    }
                }
            }
        }
    }
    Ok(())
}
