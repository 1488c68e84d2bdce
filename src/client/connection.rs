//! Connection management for NNTP client
//!
//! This module handles TCP/TLS connection establishment and server
//! greeting validation.

use crate::config::ServerConfig;
use crate::error::{NntpError, Result};
use crate::response::codes;
use std::sync::Arc;
use std::sync::atomic::AtomicBool;
use std::time::Duration;
use tokio::io::BufReader;
use tokio::net::TcpStream;
use tokio::sync::Mutex;
use tokio::time::timeout;
use tokio_rustls::TlsConnector;
use tokio_rustls::rustls::client::danger::{
    HandshakeSignatureValid, ServerCertVerified, ServerCertVerifier,
};
use tokio_rustls::rustls::pki_types::{CertificateDer, ServerName, UnixTime};
use tokio_rustls::rustls::{ClientConfig, DigitallySignedStruct, RootCertStore, SignatureScheme};
use tracing::{debug, warn};

use super::state::ConnectionState;
use super::{AsyncStream, NntpClient, Session};

/// TCP connection timeout in seconds
const TCP_CONNECT_TIMEOUT_SECS: u64 = 120;

/// TLS handshake timeout in seconds
const TLS_HANDSHAKE_TIMEOUT_SECS: u64 = 60;

/// BufReader capacity; overview responses are many short lines
const BUFREADER_CAPACITY: usize = 64 * 1024;

/// Certificate verifier that accepts every certificate
///
/// **Security Warning:** only used when `allow_insecure_tls` is set.
#[derive(Debug)]
struct DangerousAcceptAnyCertificate;

impl ServerCertVerifier for DangerousAcceptAnyCertificate {
    fn verify_server_cert(
        &self,
        _end_entity: &CertificateDer<'_>,
        _intermediates: &[CertificateDer<'_>],
        _server_name: &ServerName<'_>,
        _ocsp_response: &[u8],
        _now: UnixTime,
    ) -> std::result::Result<ServerCertVerified, tokio_rustls::rustls::Error> {
        Ok(ServerCertVerified::assertion())
    }

    fn verify_tls12_signature(
        &self,
        _message: &[u8],
        _cert: &CertificateDer<'_>,
        _dss: &DigitallySignedStruct,
    ) -> std::result::Result<HandshakeSignatureValid, tokio_rustls::rustls::Error> {
        Ok(HandshakeSignatureValid::assertion())
    }

    fn verify_tls13_signature(
        &self,
        _message: &[u8],
        _cert: &CertificateDer<'_>,
        _dss: &DigitallySignedStruct,
    ) -> std::result::Result<HandshakeSignatureValid, tokio_rustls::rustls::Error> {
        Ok(HandshakeSignatureValid::assertion())
    }

    fn supported_verify_schemes(&self) -> Vec<SignatureScheme> {
        vec![
            SignatureScheme::RSA_PKCS1_SHA256,
            SignatureScheme::RSA_PKCS1_SHA384,
            SignatureScheme::RSA_PKCS1_SHA512,
            SignatureScheme::ECDSA_NISTP256_SHA256,
            SignatureScheme::ECDSA_NISTP384_SHA384,
            SignatureScheme::ECDSA_NISTP521_SHA512,
            SignatureScheme::RSA_PSS_SHA256,
            SignatureScheme::RSA_PSS_SHA384,
            SignatureScheme::RSA_PSS_SHA512,
            SignatureScheme::ED25519,
            SignatureScheme::ED448,
        ]
    }
}

fn tls_client_config(allow_insecure: bool) -> ClientConfig {
    use tokio_rustls::rustls::crypto::{CryptoProvider, ring};
    // Already installed by another client is fine
    let _ = CryptoProvider::install_default(ring::default_provider());

    if allow_insecure {
        warn!("TLS certificate validation disabled - connection vulnerable to MITM attacks");
        ClientConfig::builder()
            .dangerous()
            .with_custom_certificate_verifier(Arc::new(DangerousAcceptAnyCertificate))
            .with_no_client_auth()
    } else {
        let mut root_store = RootCertStore::empty();
        root_store.extend(webpki_roots::TLS_SERVER_ROOTS.iter().cloned());
        ClientConfig::builder()
            .with_root_certificates(root_store)
            .with_no_client_auth()
    }
}

impl NntpClient {
    /// Connect to an NNTP server over TCP, with TLS if `config.tls` is set
    ///
    /// Does not authenticate - call [`authenticate`](Self::authenticate) after connecting.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - [`NntpError::Io`] - TCP connection fails (DNS resolution, network unreachable, etc.)
    /// - [`NntpError::Tls`] - TLS handshake fails (invalid certificate, protocol error)
    /// - [`NntpError::Timeout`] - Connection or handshake times out
    /// - [`NntpError::Protocol`] - Server greeting is not 200 or 201
    ///
    /// # Timeouts
    /// - TCP connection: 120 seconds
    /// - TLS handshake: 60 seconds
    pub async fn connect(config: Arc<ServerConfig>) -> Result<Self> {
        debug!("Connecting to NNTP server {}:{}", config.host, config.port);

        let addr = format!("{}:{}", config.host, config.port);
        let tcp_stream = timeout(
            Duration::from_secs(TCP_CONNECT_TIMEOUT_SECS),
            TcpStream::connect(addr),
        )
        .await
        .map_err(|_| NntpError::Timeout)??;

        // Request/response traffic; don't wait to coalesce small writes
        tcp_stream.set_nodelay(true)?;

        let stream: Box<dyn AsyncStream> = if config.tls {
            let connector = TlsConnector::from(Arc::new(tls_client_config(
                config.allow_insecure_tls,
            )));
            let server_name = ServerName::try_from(config.host.clone())
                .map_err(|e| NntpError::Tls(format!("Invalid domain: {}", e)))?;

            let tls_stream = timeout(
                Duration::from_secs(TLS_HANDSHAKE_TIMEOUT_SECS),
                connector.connect(server_name, tcp_stream),
            )
            .await
            .map_err(|_| NntpError::Timeout)?
            .map_err(|e| NntpError::Tls(format!("TLS handshake failed: {}", e)))?;
            Box::new(tls_stream)
        } else {
            Box::new(tcp_stream)
        };

        let read_timeout = config.read_timeout;
        let mut client = Self::handshake(stream, read_timeout).await?;
        client.config = Some(config);
        Ok(client)
    }

    /// Start a session over an already established stream
    ///
    /// Reads and checks the server greeting. Useful for proxies, custom
    /// transports and tests.
    ///
    /// # Example
    ///
    /// ```
    /// use nntp_overview::NntpClient;
    /// use tokio::io::AsyncWriteExt;
    ///
    /// # #[tokio::main(flavor = "current_thread")]
    /// # async fn main() -> nntp_overview::Result<()> {
    /// let (client_end, mut server_end) = tokio::io::duplex(1024);
    /// server_end.write_all(b"201 news.example.com ready\r\n").await?;
    ///
    /// let client = NntpClient::from_stream(client_end).await?;
    /// assert!(!client.posting_allowed());
    /// # Ok(())
    /// # }
    /// ```
    pub async fn from_stream<S: AsyncStream + 'static>(stream: S) -> Result<Self> {
        Self::handshake(Box::new(stream), None).await
    }

    /// Like [`from_stream`](Self::from_stream) with a deadline on every read
    pub async fn from_stream_with_timeout<S: AsyncStream + 'static>(
        stream: S,
        read_timeout: Duration,
    ) -> Result<Self> {
        Self::handshake(Box::new(stream), Some(read_timeout)).await
    }

    async fn handshake(
        stream: Box<dyn AsyncStream>,
        read_timeout: Option<Duration>,
    ) -> Result<Self> {
        let broken = Arc::new(AtomicBool::new(false));
        let mut session = Session {
            stream: BufReader::with_capacity(BUFREADER_CAPACITY, stream),
            read_timeout,
            format: None,
            state: ConnectionState::Ready,
            broken: broken.clone(),
        };

        let greeting = session
            .expect_response(&[codes::READY_POSTING_ALLOWED, codes::READY_NO_POSTING])
            .await?;
        debug!("Server greeting: {} {}", greeting.code, greeting.message);

        Ok(Self {
            session: Arc::new(Mutex::new(session)),
            config: None,
            posting_allowed: greeting.code == codes::READY_POSTING_ALLOWED,
            broken,
        })
    }
}
