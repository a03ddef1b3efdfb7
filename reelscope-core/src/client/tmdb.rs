use std::time::Duration;

use async_trait::async_trait;
use reelscope_config::{AccessToken, CatalogConfig};
use reelscope_model::{
    GenreInfo, ListName, MediaDetail, MediaKind, PaginationPayload,
};
use reqwest::header::RETRY_AFTER;
use reqwest::{Response, StatusCode};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use super::CatalogApi;
use super::wire::{DetailWire, GenreListWire, ItemWire, PageWire};
use crate::error::{FetchError, FetchResult};
use crate::locale::LocaleContext;

const DETAIL_APPEND: &str = "videos,credits,similar,recommendations";
const PERSON_APPEND: &str = "movie_credits,tv_credits";
const MAX_ERROR_BODY: usize = 200;

/// HTTP client for the TMDB v3 API.
#[derive(Debug, Clone)]
pub struct TmdbClient {
    http: reqwest::Client,
    base_url: String,
    access_token: AccessToken,
    locale: LocaleContext,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    status_message: Option<String>,
}

impl TmdbClient {
    pub fn new(
        config: &CatalogConfig,
        locale: LocaleContext,
    ) -> Result<Self, reqwest::Error> {
        let http = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .user_agent(concat!("reelscope/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self::with_http_client(
            http,
            &config.api_base_url,
            config.access_token.clone(),
            locale,
        ))
    }

    pub fn with_http_client(
        http: reqwest::Client,
        base_url: &str,
        access_token: AccessToken,
        locale: LocaleContext,
    ) -> Self {
        Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            access_token,
            locale,
        }
    }

    async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, String)],
        cancel: Option<&CancellationToken>,
    ) -> FetchResult<T> {
        let language = self.locale.current();
        let url = format!("{}{}", self.base_url, path);
        debug!(%path, %language, "catalog request");

        let request = self
            .http
            .get(&url)
            .bearer_auth(self.access_token.expose())
            .header(reqwest::header::ACCEPT, "application/json")
            .query(&[("language", language.as_str())])
            .query(params);

        let exchange = async {
            let response = request.send().await.map_err(FetchError::from)?;
            handle_response(path, response).await
        };

        match cancel {
            Some(token) => tokio::select! {
                biased;
                _ = token.cancelled() => Err(FetchError::Cancelled),
                result = exchange => result,
            },
            None => exchange.await,
        }
    }
}

async fn handle_response<T: DeserializeOwned>(
    path: &str,
    response: Response,
) -> FetchResult<T> {
    let status = response.status();

    if status == StatusCode::NOT_FOUND {
        return Err(FetchError::NotFound(path.to_string()));
    }

    if status == StatusCode::TOO_MANY_REQUESTS {
        let retry_after = response
            .headers()
            .get(RETRY_AFTER)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.trim().parse::<u64>().ok())
            .map(Duration::from_secs);
        warn!(%path, ?retry_after, "catalog rate limit hit");
        return Err(FetchError::RateLimited { retry_after });
    }

    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ApiErrorBody>(&body)
            .ok()
            .and_then(|body| body.status_message)
            .unwrap_or_else(|| body.chars().take(MAX_ERROR_BODY).collect());
        warn!(%path, status = status.as_u16(), %message, "catalog request failed");
        return Err(FetchError::Http {
            status: status.as_u16(),
            message,
        });
    }

    let body = response.text().await?;
    let mut deserializer = serde_json::Deserializer::from_str(&body);
    serde_path_to_error::deserialize(&mut deserializer).map_err(|err| {
        let path = err.path().to_string();
        warn!(%path, error = %err.inner(), "failed to decode catalog response");
        FetchError::Decode {
            path,
            message: err.into_inner().to_string(),
        }
    })
}

#[async_trait]
impl CatalogApi for TmdbClient {
    async fn fetch_list(
        &self,
        list: ListName,
        page: u32,
        cancel: Option<&CancellationToken>,
    ) -> FetchResult<PaginationPayload> {
        let mut params = vec![("page", page.max(1).to_string())];
        params.extend(list.extra_params());
        let wire: PageWire<ItemWire> =
            self.get(&list.path(), &params, cancel).await?;
        Ok(wire.into_payload(list.media_kind()))
    }

    async fn fetch_detail(
        &self,
        kind: MediaKind,
        id: u64,
        cancel: Option<&CancellationToken>,
    ) -> FetchResult<MediaDetail> {
        let append = match kind {
            MediaKind::Person => PERSON_APPEND,
            _ => DETAIL_APPEND,
        };
        let path = format!("/{}/{}", kind.path_segment(), id);
        let wire: DetailWire = self
            .get(&path, &[("append_to_response", append.to_string())], cancel)
            .await?;
        Ok(wire.into_detail(kind))
    }

    async fn search(
        &self,
        query: &str,
        page: u32,
        cancel: Option<&CancellationToken>,
    ) -> FetchResult<PaginationPayload> {
        let params = [
            ("query", query.trim().to_string()),
            ("page", page.max(1).to_string()),
            ("include_adult", "false".to_string()),
        ];
        let wire: PageWire<ItemWire> =
            self.get("/search/multi", &params, cancel).await?;
        Ok(wire.into_payload(MediaKind::Movie))
    }

    async fn fetch_genres(
        &self,
        kind: MediaKind,
        cancel: Option<&CancellationToken>,
    ) -> FetchResult<Vec<GenreInfo>> {
        let path = format!("/genre/{}/list", kind.path_segment());
        let wire: GenreListWire = self.get(&path, &[], cancel).await?;
        Ok(wire.genres.into_iter().map(GenreInfo::from).collect())
    }
}
