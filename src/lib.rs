pub mod analytics;
pub mod config;
pub mod experiments;
pub mod insights;
pub mod output;
pub mod scoring;
pub mod snapshot;

/// Install the ring crypto provider for rustls. Safe to call more than once;
/// later calls are no-ops.
pub fn install_crypto_provider() {
    let _ = rustls::crypto::ring::default_provider().install_default();
}
