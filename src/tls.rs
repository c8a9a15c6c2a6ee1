//! TLS configuration and handshake support
//!
//! Built on rustls with the ring crypto provider. Root certificates come
//! from a custom CA file when configured, then the system store, with the
//! Mozilla CA bundle as a fallback so TLS works even on bare containers.

use std::sync::Arc;

use rustls::client::danger::{HandshakeSignatureValid, ServerCertVerified, ServerCertVerifier};
use rustls::pki_types::{CertificateDer, ServerName, UnixTime};
use rustls::{
    ClientConfig, DigitallySignedStruct, Error as RustlsError, RootCertStore, SignatureScheme,
};
use tokio::net::TcpStream;
use tokio_rustls::{TlsConnector, client::TlsStream};
use tracing::{debug, warn};

use crate::error::SessionError;

/// TLS settings for a connection
#[derive(Debug, Clone)]
pub struct TlsConfig {
    /// Enable TLS for this connection
    pub use_tls: bool,
    /// Verify server certificates (recommended: true)
    pub tls_verify_cert: bool,
    /// Path to custom CA certificate file (optional)
    pub tls_cert_path: Option<String>,
}

impl Default for TlsConfig {
    fn default() -> Self {
        Self {
            use_tls: false,
            tls_verify_cert: true,
            tls_cert_path: None,
        }
    }
}

/// Certificate verifier that accepts all certificates (INSECURE!)
///
/// Used when `tls_verify_cert = false` for servers without valid
/// certificates. This disables all certificate validation and should only
/// be used for testing or trusted private networks.
#[derive(Debug)]
struct NoVerifier;

impl ServerCertVerifier for NoVerifier {
    fn verify_server_cert(
        &self,
        _end_entity: &CertificateDer<'_>,
        _intermediates: &[CertificateDer<'_>],
        _server_name: &ServerName<'_>,
        _ocsp_response: &[u8],
        _now: UnixTime,
    ) -> Result<ServerCertVerified, RustlsError> {
        Ok(ServerCertVerified::assertion())
    }

    fn verify_tls12_signature(
        &self,
        _message: &[u8],
        _cert: &CertificateDer<'_>,
        _dss: &DigitallySignedStruct,
    ) -> Result<HandshakeSignatureValid, RustlsError> {
        Ok(HandshakeSignatureValid::assertion())
    }

    fn verify_tls13_signature(
        &self,
        _message: &[u8],
        _cert: &CertificateDer<'_>,
        _dss: &DigitallySignedStruct,
    ) -> Result<HandshakeSignatureValid, RustlsError> {
        Ok(HandshakeSignatureValid::assertion())
    }

    fn supported_verify_schemes(&self) -> Vec<SignatureScheme> {
        vec![
            SignatureScheme::RSA_PKCS1_SHA1,
            SignatureScheme::ECDSA_SHA1_Legacy,
            SignatureScheme::RSA_PKCS1_SHA256,
            SignatureScheme::ECDSA_NISTP256_SHA256,
            SignatureScheme::RSA_PKCS1_SHA384,
            SignatureScheme::ECDSA_NISTP384_SHA384,
            SignatureScheme::RSA_PKCS1_SHA512,
            SignatureScheme::ECDSA_NISTP521_SHA512,
            SignatureScheme::RSA_PSS_SHA256,
            SignatureScheme::RSA_PSS_SHA384,
            SignatureScheme::RSA_PSS_SHA512,
            SignatureScheme::ED25519,
            SignatureScheme::ED448,
        ]
    }
}

/// TLS connector with the certificate store loaded once at construction
///
/// Certificate parsing is expensive, so the connector is built up front
/// and reused for the handshake.
pub struct TlsManager {
    config: TlsConfig,
    connector: Arc<TlsConnector>,
}

impl std::fmt::Debug for TlsManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TlsManager")
            .field("config", &self.config)
            .field("connector", &"<TlsConnector>")
            .finish()
    }
}

impl Clone for TlsManager {
    fn clone(&self) -> Self {
        Self {
            config: self.config.clone(),
            connector: Arc::clone(&self.connector),
        }
    }
}

impl TlsManager {
    /// Build a connector for the given settings
    pub fn new(config: TlsConfig) -> Result<Self, SessionError> {
        let client_config = if config.tls_verify_cert {
            let root_store = build_root_store(&config)?;
            debug!("TLS: Certificate verification enabled");
            base_builder()?
                .with_root_certificates(root_store)
                .with_no_client_auth()
        } else {
            warn!("TLS: Certificate verification DISABLED; use only for testing");
            base_builder()?
                .dangerous()
                .with_custom_certificate_verifier(Arc::new(NoVerifier))
                .with_no_client_auth()
        };

        let connector = Arc::new(TlsConnector::from(Arc::new(client_config)));
        Ok(Self { config, connector })
    }

    /// Wrap an established TCP stream in TLS
    pub async fn handshake(
        &self,
        stream: TcpStream,
        hostname: &str,
    ) -> Result<TlsStream<TcpStream>, SessionError> {
        let domain = rustls_pki_types::ServerName::try_from(hostname)
            .map_err(|e| SessionError::Tls {
                host: hostname.to_string(),
                source: Box::new(e),
            })?
            .to_owned();

        debug!("TLS: Starting handshake with {}", hostname);

        self.connector
            .connect(domain, stream)
            .await
            .map_err(|e| SessionError::Tls {
                host: hostname.to_string(),
                source: Box::new(e),
            })
    }
}

fn base_builder() -> Result<rustls::ConfigBuilder<ClientConfig, rustls::WantsVerifier>, SessionError>
{
    ClientConfig::builder_with_provider(Arc::new(rustls::crypto::ring::default_provider()))
        .with_safe_default_protocol_versions()
        .map_err(|e| SessionError::Certificate {
            detail: format!("failed to select protocol versions: {}", e),
        })
}

/// Assemble the root store from the configured sources
///
/// Order matters: custom CA file first, then the system store, then the
/// bundled Mozilla roots if nothing else produced a certificate.
fn build_root_store(config: &TlsConfig) -> Result<RootCertStore, SessionError> {
    let mut root_store = RootCertStore::empty();

    if let Some(cert_path) = &config.tls_cert_path {
        let added = add_pem_file(&mut root_store, cert_path)?;
        debug!("TLS: Loaded {} certificates from {}", added, cert_path);
    }

    let system_count = add_native_certs(&mut root_store);
    if system_count > 0 {
        debug!("TLS: Loaded {} certificates from system store", system_count);
    }

    if root_store.is_empty() {
        debug!("TLS: No system certificates available, using Mozilla CA bundle");
        root_store.extend(webpki_roots::TLS_SERVER_ROOTS.iter().cloned());
    }

    Ok(root_store)
}

fn add_pem_file(root_store: &mut RootCertStore, cert_path: &str) -> Result<usize, SessionError> {
    let cert_data = std::fs::read(cert_path).map_err(|e| SessionError::Certificate {
        detail: format!("failed to read {}: {}", cert_path, e),
    })?;

    let certs = rustls_pemfile::certs(&mut cert_data.as_slice())
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| SessionError::Certificate {
            detail: format!("failed to parse {}: {}", cert_path, e),
        })?;

    if certs.is_empty() {
        return Err(SessionError::Certificate {
            detail: format!("no certificates found in {}", cert_path),
        });
    }

    let mut added = 0;
    for cert in certs {
        root_store.add(cert).map_err(|e| SessionError::Certificate {
            detail: format!("rejected certificate from {}: {}", cert_path, e),
        })?;
        added += 1;
    }
    Ok(added)
}

fn add_native_certs(root_store: &mut RootCertStore) -> usize {
    let cert_result = rustls_native_certs::load_native_certs();
    let mut added = 0;

    for cert in cert_result.certs {
        if root_store.add(cert).is_ok() {
            added += 1;
        }
    }
    for error in cert_result.errors {
        warn!("TLS: Certificate loading error: {}", error);
    }

    added
}
