use std::{path::Path, sync::Arc};

use ::tracing::{info, warn};
use anyhow::{anyhow, Result};
use axum_server::tls_rustls::RustlsConfig;
use rustls::ServerConfig;
use rustls_pki_types::{pem::SliceIter, CertificateDer, PrivateKeyDer};

// This is required by certificate hot reload when using inotify, which is available only on linux
#[cfg(target_os = "linux")]
use tokio_stream::StreamExt;

use crate::config::TlsConfig;

/// There's no watching of the certificate files on non-linux platforms
/// since we rely on inotify to watch for changes
#[cfg(not(target_os = "linux"))]
pub(crate) async fn create_tls_config_and_watch_certificate_changes(
    tls_config: TlsConfig,
) -> Result<RustlsConfig> {
    let (cert, key) = load_server_cert_and_key(&tls_config.cert_file, &tls_config.key_file).await?;
    Ok(RustlsConfig::from_config(Arc::new(
        build_tls_server_config(cert, key)?,
    )))
}

/// Return the RustlsConfig and watch for changes in the certificate files
/// using inotify.
/// When both the certificate and its key are changed, the RustlsConfig is reloaded,
/// causing the https server to use the new certificate.
///
/// Relying on inotify is only available on linux
#[cfg(target_os = "linux")]
pub(crate) async fn create_tls_config_and_watch_certificate_changes(
    tls_config: TlsConfig,
) -> Result<RustlsConfig> {
    use ::tracing::error;

    let (cert, key) = load_server_cert_and_key(&tls_config.cert_file, &tls_config.key_file).await?;
    let rust_config = RustlsConfig::from_config(Arc::new(build_tls_server_config(cert, key)?));
    let reloadable_rust_config = rust_config.clone();

    let inotify =
        inotify::Inotify::init().map_err(|e| anyhow!("Cannot initialize inotify: {e}"))?;
    let cert_watch = inotify
        .watches()
        .add(
            tls_config.cert_file.clone(),
            inotify::WatchMask::CLOSE_WRITE,
        )
        .map_err(|e| anyhow!("Cannot watch certificate file: {e}"))?;
    let key_watch = inotify
        .watches()
        .add(tls_config.key_file.clone(), inotify::WatchMask::CLOSE_WRITE)
        .map_err(|e| anyhow!("Cannot watch key file: {e}"))?;

    let buffer = [0; 1024];
    let stream = inotify
        .into_event_stream(buffer)
        .map_err(|e| anyhow!("Cannot create inotify event stream: {e}"))?;

    tokio::spawn(async move {
        tokio::pin!(stream);
        let mut cert_changed = false;
        let mut key_changed = false;

        while let Some(event) = stream.next().await {
            let event = match event {
                Ok(event) => event,
                Err(e) => {
                    warn!("Cannot read inotify event: {e}");
                    continue;
                }
            };

            if event.wd == cert_watch {
                info!("TLS certificate file has been modified");
                cert_changed = true;
            }
            if event.wd == key_watch {
                info!("TLS key file has been modified");
                key_changed = true;
            }

            // reload only once both files were rewritten
            if !(key_changed && cert_changed) {
                continue;
            }
            info!("Reloading TLS certificates");
            cert_changed = false;
            key_changed = false;

            let server_config =
                match load_server_cert_and_key(&tls_config.cert_file, &tls_config.key_file)
                    .await
                    .and_then(|(cert, key)| build_tls_server_config(cert, key))
                {
                    Ok(server_config) => server_config,
                    Err(e) => {
                        error!("Failed to reload TLS certificates: {e}");
                        continue;
                    }
                };
            reloadable_rust_config.reload_from_config(Arc::new(server_config));
        }
    });

    Ok(rust_config)
}

fn build_tls_server_config(
    cert: Vec<CertificateDer<'static>>,
    key: PrivateKeyDer<'static>,
) -> Result<ServerConfig> {
    Ok(ServerConfig::builder()
        .with_no_client_auth()
        .with_single_cert(cert, key)?)
}

// Load the server certificate and key
async fn load_server_cert_and_key(
    cert_file: &Path,
    key_file: &Path,
) -> Result<(Vec<CertificateDer<'static>>, PrivateKeyDer<'static>)> {
    let cert_contents = tokio::fs::read(cert_file)
        .await
        .map_err(|e| anyhow!("Cannot read certificate file {:?}: {e}", cert_file))?;
    let key_contents = tokio::fs::read(key_file)
        .await
        .map_err(|e| anyhow!("Cannot read key file {:?}: {e}", key_file))?;

    let cert_iterator: SliceIter<CertificateDer> = SliceIter::new(&cert_contents[..]);
    let certs: Vec<CertificateDer<'static>> = cert_iterator
        .filter_map(|it| {
            if let Err(ref e) = it {
                warn!("Cannot parse certificate: {e}");
            }
            it.ok()
        })
        .collect();

    if certs.is_empty() {
        return Err(anyhow!("No certificate found in {:?}", cert_file));
    }

    let key_iterator: SliceIter<PrivateKeyDer> = SliceIter::new(&key_contents[..]);
    let mut keys: Vec<PrivateKeyDer<'static>> = key_iterator
        .filter_map(|it| {
            if let Err(ref e) = it {
                warn!("Cannot parse private key: {e}");
            }
            it.ok()
        })
        .collect();

    if keys.len() != 1 {
        return Err(anyhow!(
            "Expected exactly one key in key file, found {}",
            keys.len()
        ));
    }

    Ok((certs, keys.remove(0)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rcgen::{generate_simple_self_signed, CertifiedKey};
    use tempfile::tempdir;

    fn write_cert_and_key(dir: &Path, cert: &str, key: &str) -> TlsConfig {
        let cert_file = dir.join("cert");
        let key_file = dir.join("key");
        std::fs::write(&cert_file, cert).unwrap();
        std::fs::write(&key_file, key).unwrap();
        TlsConfig {
            cert_file,
            key_file,
        }
    }

    fn self_signed() -> (String, String) {
        let CertifiedKey { cert, key_pair } =
            generate_simple_self_signed(vec!["label-injector.default.svc".to_owned()]).unwrap();
        (cert.pem(), key_pair.serialize_pem())
    }

    #[tokio::test]
    async fn loads_pem_certificate_and_key() {
        let dir = tempdir().unwrap();
        let (cert, key) = self_signed();
        let tls_config = write_cert_and_key(dir.path(), &cert, &key);

        let (certs, _key) = load_server_cert_and_key(&tls_config.cert_file, &tls_config.key_file)
            .await
            .unwrap();
        assert_eq!(certs.len(), 1);
    }

    #[tokio::test]
    async fn rejects_file_without_certificate() {
        let dir = tempdir().unwrap();
        let (_, key) = self_signed();
        let tls_config = write_cert_and_key(dir.path(), "not a certificate", &key);

        assert!(
            load_server_cert_and_key(&tls_config.cert_file, &tls_config.key_file)
                .await
                .is_err()
        );
    }

    #[tokio::test]
    async fn rejects_missing_key_file() {
        let dir = tempdir().unwrap();
        let (cert, _) = self_signed();
        let tls_config = write_cert_and_key(dir.path(), &cert, "");
        std::fs::remove_file(&tls_config.key_file).unwrap();

        assert!(
            load_server_cert_and_key(&tls_config.cert_file, &tls_config.key_file)
                .await
                .is_err()
        );
    }
}
