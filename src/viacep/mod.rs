use std::future::Future;
use color_eyre::eyre::WrapErr;
use log::debug;
use reqwest::Client;
use tracing::instrument;
use crate::config::LookupConfig;
use crate::utils::retry_transient;
use crate::viacep::model::AddressRecord;

pub mod model;

/// Something that can resolve a committed postal code into an address record.
///
/// A not-found answer is still `Ok`, with the record's marker set; `Err` is reserved
/// for transport and decoding failures.
pub trait AddressLookup: Send + Sync + 'static {
    fn lookup(&self, code: &str) -> impl Future<Output = color_eyre::Result<AddressRecord>> + Send;
}

/// HTTP client for the ViaCEP service
pub struct ViaCepClient {
    client: Client,
    base_url: String,
    retry_times: usize,
}

impl ViaCepClient {
    pub fn new(config: &LookupConfig) -> color_eyre::Result<Self> {
        Ok(
            Self {
                client: Client::builder()
                    .timeout(config.timeout())
                    .build()?,
                base_url: config.base_url.trim_end_matches('/').to_string(),
                retry_times: config.retries,
            }
        )
    }

    /// i.e. https://viacep.com.br/ws/01310100/json/
    pub fn url_for(&self, code: &str) -> String {
        format!("{}/{}/json/", self.base_url, code)
    }

    #[instrument(skip(self))]
    async fn fetch_record(&self, code: &str) -> color_eyre::Result<AddressRecord> {
        let url = self.url_for(code);
        debug!("requesting [{}]", url);
        let url = url.as_str();
        let record = retry_transient(self.retry_times, || async move {
            self.client
                .get(url)
                .send()
                .await?
                .error_for_status()?
                .json::<AddressRecord>()
                .await
        })
            .await
            .wrap_err_with(|| format!("cannot look up postal code [{}]", code))?;
        debug!("[{}] resolved, not found: {}", code, record.is_not_found());
        Ok(record)
    }
}

impl AddressLookup for ViaCepClient {
    async fn lookup(&self, code: &str) -> color_eyre::Result<AddressRecord> {
        self.fetch_record(code).await
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;
    use super::*;

    /// Serve every request with the same canned response, recording request lines.
    async fn serve(status: &'static str, body: &'static str) -> (String, Arc<Mutex<Vec<String>>>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let requests = Arc::new(Mutex::new(Vec::new()));
        let seen = Arc::clone(&requests);
        tokio::spawn(async move {
            while let Ok((mut socket, _)) = listener.accept().await {
                let seen = Arc::clone(&seen);
                tokio::spawn(async move {
                    let mut head = Vec::new();
                    let mut buf = [0u8; 1024];
                    while !head.windows(4).any(|w| w == b"\r\n\r\n") {
                        let n = socket.read(&mut buf).await.unwrap();
                        if n == 0 {
                            return;
                        }
                        head.extend_from_slice(&buf[..n]);
                    }
                    let request_line = String::from_utf8_lossy(&head).lines().next().unwrap_or_default().to_string();
                    seen.lock().unwrap().push(request_line);
                    let response = format!(
                        "HTTP/1.1 {}\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{}",
                        status,
                        body.len(),
                        body
                    );
                    socket.write_all(response.as_bytes()).await.unwrap();
                    socket.shutdown().await.unwrap();
                });
            }
        });
        (format!("http://{}/ws", addr), requests)
    }

    fn client_for(base_url: String, retries: usize) -> ViaCepClient {
        let config = LookupConfig {
            base_url,
            retries,
            ..Default::default()
        };
        ViaCepClient::new(&config).unwrap()
    }

    #[tokio::test]
    async fn found_record_off_the_wire() {
        let (base, requests) = serve("200 OK", r#"{"cep": "01310-100", "logradouro": "Avenida Paulista", "uf": "SP"}"#).await;

        let record = client_for(base, 0).lookup("01310100").await.unwrap();

        assert_eq!(record.street.as_deref(), Some("Avenida Paulista"));
        assert!(!record.is_not_found());
        assert_eq!(*requests.lock().unwrap(), vec!["GET /ws/01310100/json/ HTTP/1.1".to_string()]);
    }

    #[tokio::test]
    async fn text_marker_off_the_wire_is_not_found() {
        let (base, _requests) = serve("200 OK", r#"{"erro": "true"}"#).await;

        let record = client_for(base, 0).lookup("00000000").await.unwrap();

        assert!(record.is_not_found());
    }

    #[tokio::test]
    async fn server_error_without_retries_fails_once() {
        let (base, requests) = serve("500 Internal Server Error", "{}").await;

        let err = client_for(base, 0).lookup("01310100").await.unwrap_err();

        assert!(format!("{:#}", err).contains("cannot look up postal code [01310100]"));
        assert_eq!(requests.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn server_error_is_retried_when_enabled() {
        let (base, requests) = serve("503 Service Unavailable", "{}").await;

        assert!(client_for(base, 2).lookup("01310100").await.is_err());
        assert_eq!(requests.lock().unwrap().len(), 3);
    }

    #[tokio::test]
    async fn client_error_is_never_retried() {
        let (base, requests) = serve("400 Bad Request", "{}").await;

        assert!(client_for(base, 2).lookup("0131010a").await.is_err());
        assert_eq!(requests.lock().unwrap().len(), 1);
    }

    #[test]
    fn builds_lookup_url_from_base() {
        let config = LookupConfig {
            base_url: "http://localhost:8080/ws/".to_string(),
            ..Default::default()
        };
        let client = ViaCepClient::new(&config).unwrap();

        assert_eq!(client.url_for("01310100"), "http://localhost:8080/ws/01310100/json/");
    }

    #[test]
    fn default_base_is_viacep() {
        let client = ViaCepClient::new(&LookupConfig::default()).unwrap();

        assert_eq!(client.url_for("01310100"), "https://viacep.com.br/ws/01310100/json/");
    }
}
