//! Signal Client - send a message through the relay server
//!
//! Exits 0 after help, after any server answer, and after a request that got
//! no answer. Exits 1 only when the request could not be set up.

use anyhow::Result;

use signal_client::{help_text, parse_args, sender, wants_help};

#[tokio::main]
async fn main() -> Result<()> {
    let raw: Vec<String> = std::env::args().skip(1).collect();

    if wants_help(&raw) {
        println!("{}", help_text());
        return Ok(());
    }

    signal_common::init_tracing("signal_client")?;
    tracing::debug!("Arguments: {:?}", raw);

    let args = parse_args(&raw);

    println!("\nConfiguration:");
    println!("  Recipient: {}", args.recipient);
    println!("  Message: {}", args.message);
    println!("  Server: {}:{}", args.server_ip, args.port);
    println!("  URL: {}", sender::endpoint(&args));

    println!("\nSending request...");
    let outcome = sender::send_message(&args).await?;
    sender::report(&outcome);

    Ok(())
}
