use async_trait::async_trait;
use contracts::usecases::u503_import_menu::RemoteMenuItem;
use std::time::Duration;

/// Result of one fetch. A reachable source with nothing on it is `Empty`, not `Failed`.
#[derive(Debug, Clone, PartialEq)]
pub enum FetchOutcome {
    Loaded(Vec<RemoteMenuItem>),
    Empty,
    Failed(String),
}

impl FetchOutcome {
    pub fn from_items(items: Vec<RemoteMenuItem>) -> Self {
        if items.is_empty() {
            FetchOutcome::Empty
        } else {
            FetchOutcome::Loaded(items)
        }
    }
}

/// Somewhere a menu can be pulled from
#[async_trait]
pub trait MenuSource: Send + Sync {
    async fn fetch_menu(&self) -> FetchOutcome;
}

/// REST endpoint returning a JSON array of menu items
pub struct HttpMenuSource {
    client: reqwest::Client,
    url: String,
}

impl HttpMenuSource {
    pub fn new(url: impl Into<String>, timeout: Duration) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            url: url.into(),
        })
    }

    async fn get(&self) -> anyhow::Result<Vec<RemoteMenuItem>> {
        tracing::info!("Fetching menu from {}", self.url);
        let response = self.client.get(&self.url).send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("menu source answered {}: {}", status, body.trim());
        }
        let items: Vec<RemoteMenuItem> = response.json().await?;
        Ok(items)
    }
}

#[async_trait]
impl MenuSource for HttpMenuSource {
    async fn fetch_menu(&self) -> FetchOutcome {
        match self.get().await {
            Ok(items) => FetchOutcome::from_items(items),
            Err(e) => {
                tracing::warn!("Menu fetch from {} failed: {}", self.url, e);
                FetchOutcome::Failed(e.to_string())
            }
        }
    }
}
