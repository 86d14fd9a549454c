//! TLS probing for scheme classification.
//!
//! Decides whether a port speaks TLS by attempting a handshake. Certificates are
//! never validated: self-signed, expired and mismatched certificates still mean
//! "this port speaks HTTPS".

use std::sync::Arc;
use std::time::Duration;

use log::trace;
use rustls::client::danger::{HandshakeSignatureValid, ServerCertVerified, ServerCertVerifier};
use rustls::crypto::{ring::default_provider, CryptoProvider};
use rustls::pki_types::{CertificateDer, ServerName, UnixTime};
use rustls::{ClientConfig, DigitallySignedStruct, SignatureScheme};
use tokio::net::TcpStream;
use tokio_rustls::TlsConnector;

/// Accepts every server certificate while still checking handshake signatures
/// with the provider's algorithms.
#[derive(Debug)]
struct AcceptAnyCertificate(Arc<CryptoProvider>);

impl ServerCertVerifier for AcceptAnyCertificate {
    fn verify_server_cert(
        &self,
        _end_entity: &CertificateDer<'_>,
        _intermediates: &[CertificateDer<'_>],
        _server_name: &ServerName<'_>,
        _ocsp_response: &[u8],
        _now: UnixTime,
    ) -> Result<ServerCertVerified, rustls::Error> {
        Ok(ServerCertVerified::assertion())
    }

    fn verify_tls12_signature(
        &self,
        message: &[u8],
        cert: &CertificateDer<'_>,
        dss: &DigitallySignedStruct,
    ) -> Result<HandshakeSignatureValid, rustls::Error> {
        rustls::crypto::verify_tls12_signature(
            message,
            cert,
            dss,
            &self.0.signature_verification_algorithms,
        )
    }

    fn verify_tls13_signature(
        &self,
        message: &[u8],
        cert: &CertificateDer<'_>,
        dss: &DigitallySignedStruct,
    ) -> Result<HandshakeSignatureValid, rustls::Error> {
        rustls::crypto::verify_tls13_signature(
            message,
            cert,
            dss,
            &self.0.signature_verification_algorithms,
        )
    }

    fn supported_verify_schemes(&self) -> Vec<SignatureScheme> {
        self.0.signature_verification_algorithms.supported_schemes()
    }
}

/// Reusable TLS handshake prober.
#[derive(Clone)]
pub struct TlsProber {
    connector: TlsConnector,
    timeout: Duration,
}

impl TlsProber {
    /// Builds a prober whose connect plus handshake is bounded by `timeout`.
    ///
    /// # Errors
    ///
    /// Returns a `rustls::Error` if the default protocol versions are unsupported
    /// by the crypto provider.
    pub fn new(timeout: Duration) -> Result<Self, rustls::Error> {
        let provider = Arc::new(default_provider());
        let config = ClientConfig::builder_with_provider(Arc::clone(&provider))
            .with_safe_default_protocol_versions()?
            .dangerous()
            .with_custom_certificate_verifier(Arc::new(AcceptAnyCertificate(provider)))
            .with_no_client_auth();
        Ok(TlsProber {
            connector: TlsConnector::from(Arc::new(config)),
            timeout,
        })
    }

    /// True if `host:port` completes a TLS handshake within the timeout.
    pub async fn speaks_tls(&self, host: &str, port: u16) -> bool {
        let Ok(server_name) = ServerName::try_from(host.to_string()) else {
            trace!("Invalid TLS server name {host}");
            return false;
        };

        let handshake = async {
            let sock = TcpStream::connect((host, port)).await?;
            self.connector.connect(server_name, sock).await
        };

        match tokio::time::timeout(self.timeout, handshake).await {
            Ok(Ok(_stream)) => true,
            Ok(Err(e)) => {
                trace!("TLS handshake with {host}:{port} failed: {e}");
                false
            }
            Err(_) => {
                trace!("TLS handshake with {host}:{port} timed out");
                false
            }
        }
    }
}
