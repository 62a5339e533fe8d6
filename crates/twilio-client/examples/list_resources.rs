//! Print subaccounts, numbers and bundles visible to the root account.
//! Run with: cargo run -p twilio-client --example list_resources [PN_SID]

use twilio_client::{BundleType, TwilioClient, DEFAULT_ISO_COUNTRY};
use std::time::Duration;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt().with_env_filter("info").init();

    dotenvy::dotenv().ok();

    let account_sid = std::env::var("TWILIO__ACCOUNT_SID")?;
    let auth_token = std::env::var("TWILIO__AUTH_TOKEN")?;

    let client = TwilioClient::new(account_sid.clone(), auth_token, Duration::from_secs(30))?;

    println!("=== Subaccounts ===");
    for account in client.list_subaccounts(None).await? {
        println!(
            "{} {}",
            account.sid,
            account.friendly_name.as_deref().unwrap_or("-")
        );
    }

    println!("\n=== Own numbers ===");
    for number in client.get_account_numbers(None).await? {
        println!(
            "{} {} ({})",
            number.sid,
            number.phone_number,
            number.number_type.map(|t| t.as_str()).unwrap_or("?")
        );
    }

    println!("\n=== Own bundles ===");
    for bundle in client
        .list_regulatory_bundles(None, None, DEFAULT_ISO_COUNTRY)
        .await?
    {
        println!(
            "{} {} ({})",
            bundle.sid,
            bundle.friendly_name.as_deref().unwrap_or("-"),
            bundle.number_type.map(|t| t.as_str()).unwrap_or("?")
        );
    }

    if let Some(number_sid) = std::env::args().nth(1) {
        println!("\n=== Bundles matching {} ===", number_sid);
        match client
            .get_number_type_from_sid(&number_sid, Some(&account_sid))
            .await?
        {
            Some(number_type) => {
                let bundles = client
                    .list_regulatory_bundles(
                        Some(&account_sid),
                        Some(BundleType::from(number_type)),
                        DEFAULT_ISO_COUNTRY,
                    )
                    .await?;
                println!("{} is {}, {} bundles", number_sid, number_type, bundles.len());
            }
            None => println!("{} not found in {}", number_sid, account_sid),
        }
    }

    Ok(())
}
