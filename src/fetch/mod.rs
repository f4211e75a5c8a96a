mod basic;
mod client;

pub use basic::BasicClient;
pub use client::HttpClient;

use anyhow::Result;

async fn fetch<C: HttpClient + ?Sized>(client: &C, url: &str) -> Result<reqwest::Response> {
    let req = reqwest::Request::new(reqwest::Method::GET, url.parse()?);

    let resp = client.execute(req).await?;
    if !resp.status().is_success() {
        return Err(anyhow::anyhow!("GET {} returned status {}", url, resp.status()));
    }
    Ok(resp)
}

/// GETs `url` and decodes the body as text using the response charset.
/// Non-success statuses are errors.
pub async fn fetch_text<C: HttpClient + ?Sized>(client: &C, url: &str) -> Result<String> {
    let resp = fetch(client, url).await?;
    Ok(resp.text().await?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_invalid_url_is_error() {
        let client = BasicClient::new();
        assert!(fetch_text(&client, "not a url").await.is_err());
    }
}
