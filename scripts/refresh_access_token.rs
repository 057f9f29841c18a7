//! Twitter Bot Token Refresh Utility
//!
//! Refreshes the quote bot's OAuth 2.0 User Context access token by hand, for
//! deployments that do not configure automatic refresh.

use std::io::{self, Write};
use wikiquote_tweet::oauth::refresh_access_token;

fn prompt(label: &str) -> io::Result<String> {
    print!("{}", label);
    io::stdout().flush()?;
    let mut value = String::new();
    io::stdin().read_line(&mut value)?;
    Ok(value.trim().to_string())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    println!("🔄 Quote Bot Token Refresh Utility");
    println!("==================================");

    let client_id = prompt("Enter your Twitter App Client ID: ")?;
    let client_secret = prompt("Enter your Twitter App Client Secret: ")?;
    let refresh_token = prompt("Enter your refresh token: ")?;

    println!("\n🔄 Refreshing access token...");
    let (access_token, new_refresh_token) =
        refresh_access_token(&client_id, &client_secret, &refresh_token).await?;

    println!("\n✅ Success! Update the service environment:");
    println!("export xapi_access_token=\"{}\"", access_token);

    if let Some(new_refresh_token) = new_refresh_token {
        println!("export xapi_refresh_token=\"{}\"", new_refresh_token);
        println!("\n⚠️  IMPORTANT: Your old refresh token is now invalid!");
    }

    Ok(())
}
