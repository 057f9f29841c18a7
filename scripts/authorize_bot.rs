//! Twitter Bot Authorization Script
//!
//! Obtains the OAuth 2.0 User Context tokens the quote bot tweets with. Run it
//! once per bot account, then export the printed variables for the service.

use std::collections::HashMap;
use std::io::{self, Write};
use url::Url;
use wikiquote_tweet::oauth::TOKEN_URL;

/// Scopes needed to upload images and post tweets, plus a refresh token.
const SCOPES: &str = "tweet.read tweet.write users.read media.write offline.access";

/// Generates a cryptographically secure random string for PKCE
fn generate_code_verifier() -> String {
    use rand::Rng;
    const CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789-._~";
    let mut rng = rand::thread_rng();
    (0..128)
        .map(|_| CHARSET[rng.gen_range(0..CHARSET.len())] as char)
        .collect()
}

/// Generates code challenge from code verifier using SHA256
fn generate_code_challenge(code_verifier: &str) -> String {
    use base64::Engine;
    use sha2::{Digest, Sha256};

    let hash = Sha256::digest(code_verifier.as_bytes());
    base64::engine::general_purpose::URL_SAFE_NO_PAD.encode(hash)
}

/// Builds the authorization URL for Twitter OAuth 2.0
fn build_authorization_url(
    client_id: &str,
    redirect_uri: &str,
    code_challenge: &str,
    state: &str,
) -> Result<String, url::ParseError> {
    let mut url = Url::parse("https://twitter.com/i/oauth2/authorize")?;
    url.query_pairs_mut()
        .append_pair("response_type", "code")
        .append_pair("client_id", client_id)
        .append_pair("redirect_uri", redirect_uri)
        .append_pair("scope", SCOPES)
        .append_pair("state", state)
        .append_pair("code_challenge", code_challenge)
        .append_pair("code_challenge_method", "S256");
    Ok(url.to_string())
}

/// Exchanges the authorization code for an access token and, with
/// `offline.access`, a refresh token.
async fn exchange_code_for_tokens(
    client_id: &str,
    client_secret: &str,
    redirect_uri: &str,
    code: &str,
    code_verifier: &str,
) -> Result<(String, Option<String>), Box<dyn std::error::Error + Send + Sync>> {
    let client = reqwest::Client::new();

    let mut params = HashMap::new();
    params.insert("grant_type", "authorization_code");
    params.insert("client_id", client_id);
    params.insert("redirect_uri", redirect_uri);
    params.insert("code", code);
    params.insert("code_verifier", code_verifier);

    let response = client
        .post(TOKEN_URL)
        .basic_auth(client_id, Some(client_secret))
        .form(&params)
        .send()
        .await?;

    let status = response.status();
    let response_text = response.text().await?;
    if !status.is_success() {
        return Err(format!("Token exchange failed ({}): {}", status, response_text).into());
    }

    let json: serde_json::Value = serde_json::from_str(&response_text)?;
    let access_token = json
        .get("access_token")
        .and_then(|v| v.as_str())
        .ok_or("No access_token in response")?;
    let refresh_token = json
        .get("refresh_token")
        .and_then(|v| v.as_str())
        .map(str::to_string);

    Ok((access_token.to_string(), refresh_token))
}

fn prompt(label: &str) -> io::Result<String> {
    print!("{}", label);
    io::stdout().flush()?;
    let mut value = String::new();
    io::stdin().read_line(&mut value)?;
    Ok(value.trim().to_string())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    println!("🤖 Quote Bot Authorization Helper");
    println!("=================================");

    let client_id = prompt("Enter your Twitter App Client ID: ")?;
    let client_secret = prompt("Enter your Twitter App Client Secret: ")?;
    let redirect_uri =
        prompt("Enter your Redirect URI (e.g., http://localhost:8080/callback): ")?;

    // Generate PKCE parameters
    let code_verifier = generate_code_verifier();
    let code_challenge = generate_code_challenge(&code_verifier);
    let state = generate_code_verifier();

    let auth_url =
        build_authorization_url(&client_id, &redirect_uri, &code_challenge, &state[..32])?;

    println!("\n🔗 Authorization Steps:");
    println!("1. Open this URL in your browser while logged in as the bot account:");
    println!("   {}", auth_url);
    println!("\n2. Authorize the application");
    println!("3. Copy the 'code' parameter from the callback URL");

    let auth_code = prompt("\nEnter the authorization code: ")?;

    println!("\n🔄 Exchanging code for tokens...");
    let (access_token, refresh_token) = exchange_code_for_tokens(
        &client_id,
        &client_secret,
        &redirect_uri,
        &auth_code,
        &code_verifier,
    )
    .await?;

    println!("\n✅ Success! Add these to the service environment:");
    println!("export xapi_access_token=\"{}\"", access_token);
    match refresh_token {
        Some(refresh_token) => {
            println!("export xapi_refresh_token=\"{}\"", refresh_token);
            println!("export xapi_client_id=\"{}\"", client_id);
            println!("export xapi_client_secret=\"your_client_secret\"");
            println!("\n🔄 With all four set, expired access tokens are refreshed automatically.");
        }
        None => {
            println!("\n⚠️  No refresh token received; the access token must be renewed by hand.");
        }
    }

    Ok(())
}
