//! Move one number between subaccounts.
//! Run with: cargo run -p number-transfer --example transfer_number -- SOURCE_AC PN_SID TARGET_AC

use number_transfer::{TransferConfig, TransferRequest, TransferWorkflow};
use std::sync::Arc;
use std::time::Duration;
use twilio_client::TwilioClient;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().with_env_filter("info").init();

    dotenvy::dotenv().ok();

    let mut args = std::env::args().skip(1);
    let (Some(source), Some(number), Some(target)) = (args.next(), args.next(), args.next()) else {
        anyhow::bail!("usage: transfer_number SOURCE_ACCOUNT_SID PHONE_NUMBER_SID TARGET_ACCOUNT_SID");
    };

    let client = TwilioClient::new(
        std::env::var("TWILIO__ACCOUNT_SID")?,
        std::env::var("TWILIO__AUTH_TOKEN")?,
        Duration::from_secs(30),
    )?;

    let workflow = TransferWorkflow::new(Arc::new(client), TransferConfig::default());
    let outcome = workflow
        .transfer(&TransferRequest::new(source, number, target))
        .await?;

    println!("{}", serde_json::to_string_pretty(&outcome)?);
    Ok(())
}
