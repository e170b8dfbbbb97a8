use scrapfly_core::{
    AccountData, AccountRequest, ApiOperation, ApiRequest, ExtractionConfig, ExtractionResult,
    ScrapeConfig, ScrapeResult, ScrapflyError, ScreenshotConfig, ScreenshotResult,
    TransportFailure, classify,
};

use crate::cancel::CancelToken;
use crate::settings::ClientConfig;
use crate::transport::{HttpRequest, ReqwestTransport, Transport};

/// Client for the Scrapfly API.
///
/// Each call performs exactly one HTTP exchange; nothing is retried. Failures
/// are classified into a [`ScrapflyError`] whose
/// [`kind`](ScrapflyError::kind) can be matched directly.
pub struct ScrapflyClient<T: Transport = ReqwestTransport> {
    config: ClientConfig,
    transport: T,
}

impl ScrapflyClient<ReqwestTransport> {
    /// Create a client backed by `reqwest`.
    pub fn new(config: ClientConfig) -> Result<Self, ScrapflyError> {
        let transport =
            ReqwestTransport::new(&config).map_err(|e| classify::classify_transport(&e))?;
        Ok(Self::with_transport(config, transport))
    }
}

impl<T: Transport> ScrapflyClient<T> {
    pub fn with_transport(config: ClientConfig, transport: T) -> Self {
        Self { config, transport }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Validate, send and decode a single operation.
    pub async fn execute<C: ApiOperation>(&self, op: &C) -> Result<C::Output, ScrapflyError> {
        self.execute_with_cancel(op, &CancelToken::new()).await
    }

    /// [`execute`](Self::execute), aborting when `cancel` fires.
    ///
    /// A token that is already cancelled fails the call before validation or
    /// any I/O.
    pub async fn execute_with_cancel<C: ApiOperation>(
        &self,
        op: &C,
        cancel: &CancelToken,
    ) -> Result<C::Output, ScrapflyError> {
        if cancel.is_cancelled() {
            return Err(self.transport_error(op, TransportFailure::Cancelled));
        }

        op.validate()?;
        if self.config.api_key.trim().is_empty() {
            return Err(ScrapflyError::bad_api_key(
                "no API key configured; set SCRAPFLY_KEY or run `scrapfly config set-key`",
            ));
        }
        let request = self.resolve::<C>(op.to_request()?)?;

        log::debug!("{} {} {}", C::KIND, request.method, op.label());

        let timeout = self.config.timeout;
        let sent = tokio::select! {
            biased;
            _ = cancel.cancelled() => Err(TransportFailure::Cancelled),
            sent = tokio::time::timeout(timeout, self.transport.send(request)) => {
                sent.unwrap_or(Err(TransportFailure::Timeout(timeout)))
            }
        };

        let response = match sent {
            Ok(response) => response,
            Err(failure) => return Err(self.transport_error(op, failure)),
        };

        if !response.is_success() {
            let err = classify::classify(response.status, &response.body, None);
            log::warn!("{} {} failed: {}", C::KIND, op.label(), err);
            return Err(err);
        }

        op.decode(&response).inspect_err(|err| {
            log::warn!("{} {} failed: {}", C::KIND, op.label(), err);
        })
    }

    pub async fn scrape(&self, config: &ScrapeConfig) -> Result<ScrapeResult, ScrapflyError> {
        self.execute(config).await
    }

    pub async fn screenshot(
        &self,
        config: &ScreenshotConfig,
    ) -> Result<ScreenshotResult, ScrapflyError> {
        self.execute(config).await
    }

    pub async fn extract(
        &self,
        config: &ExtractionConfig,
    ) -> Result<ExtractionResult, ScrapflyError> {
        self.execute(config).await
    }

    /// Fetch account, project and subscription details.
    pub async fn account(&self) -> Result<AccountData, ScrapflyError> {
        self.execute(&AccountRequest).await
    }

    /// Resolve an endpoint-relative request against the host, adding the key.
    fn resolve<C: ApiOperation>(&self, request: ApiRequest) -> Result<HttpRequest, ScrapflyError> {
        let base = format!(
            "{}{}",
            self.config.host.trim_end_matches('/'),
            request.kind.path()
        );
        let query = std::iter::once(("key", self.config.api_key.as_str()))
            .chain(request.query.iter().map(|(k, v)| (k.as_str(), v.as_str())));
        let url = reqwest::Url::parse_with_params(&base, query).map_err(|e| {
            ScrapflyError::with_message(
                C::KIND.config_error_kind(),
                format!("invalid API URL '{base}': {e}"),
            )
        })?;
        Ok(HttpRequest {
            method: request.method,
            url: url.into(),
            headers: request.headers,
            body: request.body,
        })
    }

    fn transport_error<C: ApiOperation>(&self, op: &C, failure: TransportFailure) -> ScrapflyError {
        let err = classify::classify(0, &[], Some(&failure));
        if failure.is_cancelled() {
            log::debug!("{} {} cancelled", C::KIND, op.label());
        } else {
            log::warn!("{} {} failed: {}", C::KIND, op.label(), err);
        }
        err
    }
}

#[cfg(test)]
#[path = "tests/client_tests.rs"]
mod tests;
