//! Remote classifier status command

use anyhow::{Context, Result};
use tally_core::{AIClient, Config, RemoteBackend, RemoteClassifier};

pub async fn cmd_remote(config: &Config, offline: bool) -> Result<()> {
    println!("🔍 Remote classifier");
    println!("   Backend: {}", config.remote.backend);
    println!("   Timeout: {}s", config.remote.timeout.as_secs());

    if offline {
        println!("   ⚠️  --offline set: utterances use the keyword rules only");
        return Ok(());
    }

    let client = AIClient::from_config(&config.remote).context("Failed to build remote client")?;
    let Some(client) = client else {
        if config.remote.backend == RemoteBackend::None {
            println!("   Utterances use the keyword rules only.");
            println!("   💡 Tip: Set TALLY_REMOTE_BACKEND=ollama (or openai, groq) to enable");
        } else {
            println!("   ⚠️  No API key set; utterances use the keyword rules only");
            println!("   💡 Tip: Set TALLY_REMOTE_API_KEY");
        }
        return Ok(());
    };

    println!("   Host: {}", client.host());
    println!("   Model: {}", client.model());

    print!("   Checking availability... ");
    if client.health_check().await {
        println!("✅ Connected");
    } else {
        println!("❌ Unreachable");
        println!("   Utterances will fall back to the keyword rules.");
    }

    Ok(())
}
