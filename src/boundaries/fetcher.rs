use crate::boundaries::document::BoundaryDocument;
use crate::boundaries::error::BoundaryError;
use crate::download::download;
use log::info;
use reqwest::Client;
use tokio::task;

/// Province outlines of Castilla y León from the opendatasoft `provincias-espanolas` dataset.
pub const BOUNDARIES_URL: &str = "https://public.opendatasoft.com/api/explore/v2.1/catalog/datasets/provincias-espanolas/exports/geojson?lang=en&refine=ccaa%3A%22Castilla%20y%20Le%C3%B3n%22&timezone=Europe%2FBerlin";

pub struct BoundaryFetcher {
    url: String,
    client: Client,
}

impl BoundaryFetcher {
    pub fn new(client: Client, url: &str) -> BoundaryFetcher {
        BoundaryFetcher {
            url: url.to_string(),
            client,
        }
    }

    /// Downloads and parses the boundary document. Fetched fresh on every call.
    pub async fn fetch(&self) -> Result<BoundaryDocument, BoundaryError> {
        let bytes = download(&self.client, self.url.as_str()).await?;
        let document = task::spawn_blocking(move || {
            serde_json::from_slice::<BoundaryDocument>(&bytes).map_err(BoundaryError::from)
        })
        .await??;
        info!(
            "Parsed {} boundary features from {}",
            document.features.len(),
            self.url
        );
        Ok(document)
    }
}
