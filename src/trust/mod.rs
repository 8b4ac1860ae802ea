//! TLS trust: the gateway chains up to a CA missing from common root stores, so every
//! connection trusts exactly one packaged CA certificate instead.

use std::io;
use std::sync::Arc;

use once_cell::sync::OnceCell;
use rustls::RootCertStore;
use rustls::crypto::aws_lc_rs;

/// PEM of the CA certificate packaged with the crate (`certs/ca-bundle.crt`).
pub const BUNDLED_CA_PEM: &[u8] = include_bytes!("../../certs/ca-bundle.crt");

static BUNDLED: OnceCell<TrustConfig> = OnceCell::new();

#[derive(Debug, thiserror::Error)]
/// Errors raised while building a [`TrustConfig`].
pub enum TrustError {
    /// The PEM data could not be read.
    #[error("unreadable PEM data: {0}")]
    Pem(#[source] io::Error),

    /// The PEM data did not contain exactly one certificate.
    #[error("expected exactly one CA certificate, found {found}")]
    CertificateCount { found: usize },

    /// The certificate could not be used as a trust anchor.
    #[error("CA certificate rejected: {0}")]
    Certificate(#[source] rustls::Error),

    /// The crypto provider could not produce a client configuration.
    #[error("TLS provider error: {0}")]
    Provider(#[source] rustls::Error),
}

#[derive(Debug, Clone)]
/// Immutable TLS client configuration whose root store holds a single CA certificate.
///
/// Cheap to clone; all clones share the same configuration.
pub struct TrustConfig {
    tls: Arc<rustls::ClientConfig>,
    anchors: usize,
}

impl TrustConfig {
    /// Build a configuration trusting only the certificate in `pem`.
    pub fn from_pem(pem: &[u8]) -> Result<Self, TrustError> {
        let mut reader = pem;
        let certs = rustls_pemfile::certs(&mut reader)
            .collect::<Result<Vec<_>, _>>()
            .map_err(TrustError::Pem)?;

        let [ca] = <[_; 1]>::try_from(certs).map_err(|certs: Vec<_>| {
            TrustError::CertificateCount { found: certs.len() }
        })?;

        let mut roots = RootCertStore::empty();
        roots.add(ca).map_err(TrustError::Certificate)?;
        let anchors = roots.len();

        let tls = rustls::ClientConfig::builder_with_provider(Arc::new(
            aws_lc_rs::default_provider(),
        ))
        .with_safe_default_protocol_versions()
        .map_err(TrustError::Provider)?
        .with_root_certificates(roots)
        .with_no_client_auth();

        Ok(Self {
            tls: Arc::new(tls),
            anchors,
        })
    }

    /// The configuration for the packaged CA, built once per process.
    ///
    /// Concurrent first callers wait for a single initialization. A failed initialization
    /// is returned to the caller and retried by the next one.
    pub fn bundled() -> Result<Self, TrustError> {
        BUNDLED
            .get_or_try_init(|| {
                let trust = Self::from_pem(BUNDLED_CA_PEM).inspect_err(|err| {
                    tracing::error!(error = %err, "bundled CA setup failed");
                })?;
                tracing::debug!("installed bundled CA as sole trust anchor");
                Ok::<_, TrustError>(trust)
            })
            .cloned()
    }

    /// Number of trust anchors in the root store.
    pub fn anchor_count(&self) -> usize {
        self.anchors
    }

    pub(crate) fn client_config(&self) -> rustls::ClientConfig {
        rustls::ClientConfig::clone(&self.tls)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const NOT_A_CERTIFICATE: &str =
        "-----BEGIN CERTIFICATE-----\nbm90IGEgY2VydGlmaWNhdGU=\n-----END CERTIFICATE-----\n";

    #[test]
    fn bundled_certificate_is_the_only_anchor() {
        let trust = TrustConfig::bundled().unwrap();
        assert_eq!(trust.anchor_count(), 1);
    }

    #[test]
    fn bundled_is_built_once_and_shared() {
        let first = TrustConfig::bundled().unwrap();
        let second = TrustConfig::bundled().unwrap();
        assert!(Arc::ptr_eq(&first.tls, &second.tls));
    }

    #[test]
    fn bundled_survives_concurrent_first_use() {
        let handles = (0..8)
            .map(|_| std::thread::spawn(TrustConfig::bundled))
            .collect::<Vec<_>>();
        let configs = handles
            .into_iter()
            .map(|handle| handle.join().unwrap().unwrap())
            .collect::<Vec<_>>();

        for config in &configs[1..] {
            assert!(Arc::ptr_eq(&configs[0].tls, &config.tls));
        }
    }

    #[test]
    fn empty_pem_is_rejected() {
        let err = TrustConfig::from_pem(b"").unwrap_err();
        assert!(matches!(err, TrustError::CertificateCount { found: 0 }));
    }

    #[test]
    fn multiple_certificates_are_rejected() {
        let mut pem = BUNDLED_CA_PEM.to_vec();
        pem.extend_from_slice(BUNDLED_CA_PEM);

        let err = TrustConfig::from_pem(&pem).unwrap_err();
        assert!(matches!(err, TrustError::CertificateCount { found: 2 }));
    }

    #[test]
    fn corrupt_certificate_is_rejected() {
        let err = TrustConfig::from_pem(NOT_A_CERTIFICATE.as_bytes()).unwrap_err();
        assert!(matches!(err, TrustError::Certificate(_)));
    }
}
