use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use reqwest::{Client, Response};
use shared::{
    domain::AccountId,
    error::RemoteErrorBody,
    protocol::{AccountRecord, NewAccount},
};
use tracing::debug;
use url::Url;

/// CRUD contract of the remote account service.
#[async_trait]
pub trait AccountService: Send + Sync {
    async fn list_accounts(&self) -> Result<Vec<AccountRecord>>;
    async fn create_account(&self, account: &NewAccount) -> Result<AccountRecord>;
    async fn update_account(&self, account: &AccountRecord) -> Result<AccountRecord>;
    async fn delete_account(&self, id: &AccountId) -> Result<()>;
}

/// JSON-over-HTTP client for the accounts collection resource.
pub struct HttpAccountService {
    http: Client,
    accounts_url: Url,
}

impl HttpAccountService {
    pub fn new(accounts_url: Url) -> Self {
        Self::with_client(Client::new(), accounts_url)
    }

    pub fn with_timeout(accounts_url: Url, timeout: Duration) -> Result<Self> {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .context("failed to build account service HTTP client")?;
        Ok(Self::with_client(http, accounts_url))
    }

    pub fn with_client(http: Client, accounts_url: Url) -> Self {
        Self { http, accounts_url }
    }

    fn record_url(&self, id: &AccountId) -> Result<Url> {
        let mut url = self.accounts_url.clone();
        url.path_segments_mut()
            .map_err(|_| anyhow!("accounts url {} cannot carry an id", self.accounts_url))?
            .pop_if_empty()
            .push(id.as_str());
        Ok(url)
    }
}

#[async_trait]
impl AccountService for HttpAccountService {
    async fn list_accounts(&self) -> Result<Vec<AccountRecord>> {
        let url = self.accounts_url.clone();
        debug!(%url, "GET accounts");
        let response = self
            .http
            .get(url.clone())
            .send()
            .await
            .with_context(|| format!("GET {url} failed"))?;
        ensure_success(response, "GET", &url)
            .await?
            .json()
            .await
            .context("failed to decode account list")
    }

    async fn create_account(&self, account: &NewAccount) -> Result<AccountRecord> {
        let url = self.accounts_url.clone();
        debug!(%url, "POST account");
        let response = self
            .http
            .post(url.clone())
            .json(account)
            .send()
            .await
            .with_context(|| format!("POST {url} failed"))?;
        ensure_success(response, "POST", &url)
            .await?
            .json()
            .await
            .context("failed to decode created account")
    }

    async fn update_account(&self, account: &AccountRecord) -> Result<AccountRecord> {
        let url = self.record_url(&account.id)?;
        debug!(%url, "PUT account");
        let response = self
            .http
            .put(url.clone())
            .json(account)
            .send()
            .await
            .with_context(|| format!("PUT {url} failed"))?;
        ensure_success(response, "PUT", &url)
            .await?
            .json()
            .await
            .context("failed to decode updated account")
    }

    async fn delete_account(&self, id: &AccountId) -> Result<()> {
        let url = self.record_url(id)?;
        debug!(%url, "DELETE account");
        let response = self
            .http
            .delete(url.clone())
            .send()
            .await
            .with_context(|| format!("DELETE {url} failed"))?;
        ensure_success(response, "DELETE", &url).await?;
        Ok(())
    }
}

async fn ensure_success(response: Response, method: &str, url: &Url) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    match serde_json::from_str::<RemoteErrorBody>(&body)
        .ok()
        .and_then(|body| body.summary())
    {
        Some(detail) => Err(anyhow!("{method} {url} returned {status}: {detail}")),
        None => Err(anyhow!("{method} {url} returned {status}")),
    }
}

#[cfg(test)]
#[path = "tests/service_tests.rs"]
mod tests;
