//! Client layer: owns credentials and trust, runs transport calls and maps transport ↔ domain.

use std::error::Error as StdError;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;

use reqwest::header::CONTENT_TYPE;
use tokio::task::JoinHandle;

use crate::domain::{Credentials, GatewayResponse, Message, MessageText, ValidationError};
use crate::transport::{FORM_CONTENT_TYPE, decode_send_sms_response, encode_form_body};
use crate::trust::{TrustConfig, TrustError};

const DEFAULT_ENDPOINT: &str = "https://helix.stormhub.org/smsservice/sendsms.php";

type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

#[derive(Debug, Clone)]
struct HttpResponse {
    status: u16,
    body: String,
}

trait HttpTransport: Send + Sync {
    fn post_form<'a>(
        &'a self,
        url: &'a str,
        params: Vec<(String, String)>,
    ) -> BoxFuture<'a, Result<HttpResponse, Box<dyn StdError + Send + Sync>>>;
}

#[derive(Debug, Clone)]
struct ReqwestTransport {
    client: reqwest::Client,
}

impl HttpTransport for ReqwestTransport {
    fn post_form<'a>(
        &'a self,
        url: &'a str,
        params: Vec<(String, String)>,
    ) -> BoxFuture<'a, Result<HttpResponse, Box<dyn StdError + Send + Sync>>> {
        Box::pin(async move {
            let response = self
                .client
                .post(url)
                .header(CONTENT_TYPE, FORM_CONTENT_TYPE)
                .body(encode_form_body(&params))
                .send()
                .await?;
            let status = response.status().as_u16();
            let body = response.text().await?;
            Ok(HttpResponse { status, body })
        })
    }
}

#[derive(Debug, thiserror::Error)]
/// Errors returned by [`SmsClient`].
///
/// A gateway that is reachable but refuses the message is not an error: it yields a
/// [`GatewayResponse`] whose outcome is [`GatewayOutcome::NotSent`](crate::GatewayOutcome::NotSent).
pub enum SmsError {
    /// HTTP client / transport failure (DNS, TLS handshake, connection reset, etc).
    #[error("transport error: {0}")]
    Transport(#[source] Box<dyn StdError + Send + Sync>),

    /// Non-successful HTTP status code returned by the server.
    #[error("unexpected HTTP status: {status}")]
    HttpStatus { status: u16, body: Option<String> },

    /// The CA certificate could not be installed; no request can be trusted.
    #[error("TLS trust setup failed: {0}")]
    TrustSetup(#[from] TrustError),

    /// The configured endpoint is not a valid URL.
    #[error("invalid endpoint {endpoint:?}: {source}")]
    InvalidEndpoint {
        endpoint: String,
        #[source]
        source: url::ParseError,
    },

    /// One of the domain constructors rejected an invalid value.
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),
}

#[derive(Debug, Clone)]
enum TrustSource {
    Bundled,
    Config(TrustConfig),
    Pem(Vec<u8>),
}

impl TrustSource {
    fn resolve(self) -> Result<TrustConfig, TrustError> {
        match self {
            Self::Bundled => TrustConfig::bundled(),
            Self::Config(trust) => Ok(trust),
            Self::Pem(pem) => TrustConfig::from_pem(&pem),
        }
    }
}

#[derive(Debug, Clone)]
/// Builder for [`SmsClient`].
///
/// Use this when you need to customize the endpoint, timeout, user-agent, or trusted CA.
pub struct SmsClientBuilder {
    credentials: Credentials,
    endpoint: String,
    timeout: Option<Duration>,
    user_agent: Option<String>,
    trust: TrustSource,
}

impl SmsClientBuilder {
    /// Create a builder with the default endpoint, the bundled CA and no timeout.
    pub fn new(credentials: Credentials) -> Self {
        Self {
            credentials,
            endpoint: DEFAULT_ENDPOINT.to_owned(),
            timeout: None,
            user_agent: None,
            trust: TrustSource::Bundled,
        }
    }

    /// Override the gateway URL.
    pub fn endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Set an HTTP client timeout applied to the entire request.
    ///
    /// Without one a stalled gateway keeps the send pending indefinitely.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Override the HTTP `User-Agent` header.
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Trust `trust` instead of the bundled CA.
    pub fn trust(mut self, trust: TrustConfig) -> Self {
        self.trust = TrustSource::Config(trust);
        self
    }

    /// Trust the single CA certificate in `pem` instead of the bundled CA.
    ///
    /// The PEM is parsed by [`SmsClientBuilder::build`].
    pub fn trust_pem(mut self, pem: impl Into<Vec<u8>>) -> Self {
        self.trust = TrustSource::Pem(pem.into());
        self
    }

    /// Build a [`SmsClient`].
    ///
    /// Errors:
    /// - [`SmsError::InvalidEndpoint`] when the endpoint does not parse as a URL,
    /// - [`SmsError::TrustSetup`] when the configured CA cannot be installed.
    pub fn build(self) -> Result<SmsClient, SmsError> {
        let endpoint =
            url::Url::parse(&self.endpoint).map_err(|source| SmsError::InvalidEndpoint {
                endpoint: self.endpoint.clone(),
                source,
            })?;

        let trust = self.trust.resolve()?;

        let mut builder = reqwest::Client::builder().use_preconfigured_tls(trust.client_config());
        if let Some(timeout) = self.timeout {
            builder = builder.timeout(timeout);
        }
        if let Some(user_agent) = self.user_agent {
            builder = builder.user_agent(user_agent);
        }

        let client = builder
            .build()
            .map_err(|err| SmsError::Transport(Box::new(err)))?;

        Ok(SmsClient {
            credentials: self.credentials,
            endpoint: endpoint.into(),
            http: Arc::new(ReqwestTransport { client }),
        })
    }
}

#[derive(Clone)]
/// High-level client for the Helix SMS gateway.
///
/// Holds the API key pair and a TLS configuration that trusts only the gateway's CA.
/// Messages are built separately as [`Message`] values and consumed by the send methods.
///
/// Cloning is cheap; clones share the underlying HTTP client.
pub struct SmsClient {
    credentials: Credentials,
    endpoint: String,
    http: Arc<dyn HttpTransport>,
}

impl SmsClient {
    /// Create a client for `key_name` / `key_value` using the default endpoint and bundled CA.
    ///
    /// For more customization, use [`SmsClient::builder`].
    pub fn create(
        key_name: impl Into<String>,
        key_value: impl Into<String>,
    ) -> Result<Self, SmsError> {
        SmsClientBuilder::new(Credentials::new(key_name, key_value)).build()
    }

    /// Start building a client with custom settings.
    pub fn builder(credentials: Credentials) -> SmsClientBuilder {
        SmsClientBuilder::new(credentials)
    }

    /// The gateway URL requests are posted to.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Send `message` and wait for the gateway's reply.
    ///
    /// Errors:
    /// - [`SmsError::Transport`] when the request could not be completed,
    /// - [`SmsError::HttpStatus`] for non-2xx HTTP responses.
    pub async fn send(&self, message: Message) -> Result<GatewayResponse, SmsError> {
        if message.text().exceeds_recommended_length() {
            tracing::warn!(
                chars = message.text().char_count(),
                max = MessageText::RECOMMENDED_MAX_CHARS,
                "message text is longer than the gateway accepts"
            );
        }
        tracing::debug!(
            recipients = message.recipients().len(),
            flash = message.is_flash(),
            postponed = message.postpone_at().is_some(),
            "sending message"
        );

        let params = crate::transport::encode_send_sms_form(&self.credentials, &message);

        let response = self
            .http
            .post_form(&self.endpoint, params)
            .await
            .map_err(|err| {
                tracing::warn!(error = %err, "gateway request failed");
                SmsError::Transport(err)
            })?;

        tracing::debug!(status = response.status, "gateway responded");

        if !(200..=299).contains(&response.status) {
            let body = if response.body.trim().is_empty() {
                None
            } else {
                Some(response.body)
            };
            return Err(SmsError::HttpStatus {
                status: response.status,
                body,
            });
        }

        Ok(decode_send_sms_response(response.status, response.body))
    }

    /// Send `message` as a flash message.
    pub async fn send_as_flash(&self, mut message: Message) -> Result<GatewayResponse, SmsError> {
        message.set_flash(true);
        self.send(message).await
    }

    /// Send `message` on a separate Tokio task.
    ///
    /// The returned handle can be awaited, aborted, or wrapped in a timeout. Must be called
    /// from within a Tokio runtime.
    pub fn spawn_send(&self, message: Message) -> JoinHandle<Result<GatewayResponse, SmsError>> {
        let client = self.clone();
        tokio::spawn(async move { client.send(message).await })
    }

    /// Send `message` on a separate Tokio task and hand the result to `callback`.
    ///
    /// Returns immediately. `callback` runs exactly once, on the spawned task, after the
    /// gateway replied or the request failed. Must be called from within a Tokio runtime.
    pub fn send_async<F>(&self, message: Message, callback: F) -> JoinHandle<()>
    where
        F: FnOnce(Result<GatewayResponse, SmsError>) + Send + 'static,
    {
        let client = self.clone();
        tokio::spawn(async move {
            let result = client.send(message).await;
            callback(result);
        })
    }

    /// Like [`SmsClient::send_async`], delivering `message` as a flash message.
    pub fn send_as_flash_async<F>(&self, mut message: Message, callback: F) -> JoinHandle<()>
    where
        F: FnOnce(Result<GatewayResponse, SmsError>) + Send + 'static,
    {
        message.set_flash(true);
        self.send_async(message, callback)
    }
}
