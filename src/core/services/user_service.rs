//! Client for the users collection resource.
//!
//! Each operation is exactly one request/response round trip. There is no
//! retry, no backoff, and no pagination. Responses are decoded into
//! [`Record`]s without any schema check beyond "is a JSON object".

use std::time::Duration;

use reqwest::blocking::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use crate::domain::{Record, RecordId};
use crate::errors::NetworkError;

use super::ServiceResult;

/// The four operations the page needs from the backend.
pub trait UserApi: Send + Sync {
    fn list(&self) -> ServiceResult<Vec<Record>>;
    fn create(&self, record: &Record) -> ServiceResult<Record>;
    fn update(&self, id: &RecordId, patch: &Record) -> ServiceResult<Record>;
    fn delete(&self, id: &RecordId) -> ServiceResult<()>;
}

/// [`UserApi`] backed by a REST collection endpoint such as `<base>/users`.
#[derive(Debug, Clone)]
pub struct HttpUserService {
    client: Client,
    collection_url: Url,
}

impl HttpUserService {
    pub fn new(base_url: &str, collection: &str) -> ServiceResult<Self> {
        let collection_url = collection_url(base_url, collection)?;
        let client = Client::builder()
            .timeout(None::<Duration>)
            .build()
            .map_err(|err| NetworkError::Client(err.to_string()))?;
        Ok(Self {
            client,
            collection_url,
        })
    }

    pub fn collection_url(&self) -> &Url {
        &self.collection_url
    }

    /// URL addressing a single record, with the id percent-encoded as one segment.
    pub fn item_url(&self, id: &RecordId) -> ServiceResult<Url> {
        let mut url = self.collection_url.clone();
        url.path_segments_mut()
            .map_err(|_| {
                NetworkError::Client(format!("{} cannot take a path", self.collection_url))
            })?
            .pop_if_empty()
            .push(&id.as_path_segment());
        Ok(url)
    }

    fn send(
        &self,
        method: &'static str,
        url: &Url,
        request: RequestBuilder,
    ) -> ServiceResult<Response> {
        debug!(method, url = %url, "sending request");
        let response = request.send().map_err(|source| NetworkError::Transport {
            url: url.to_string(),
            source,
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(NetworkError::Status {
                method,
                url: url.to_string(),
                status: status.as_u16(),
            });
        }
        Ok(response)
    }
}

impl UserApi for HttpUserService {
    fn list(&self) -> ServiceResult<Vec<Record>> {
        let url = &self.collection_url;
        let response = self.send("GET", url, self.client.get(url.clone()))?;
        decode(url, response)
    }

    fn create(&self, record: &Record) -> ServiceResult<Record> {
        let url = &self.collection_url;
        let body = Record {
            id: None,
            fields: record.fields.clone(),
        };
        let response = self.send("POST", url, self.client.post(url.clone()).json(&body))?;
        decode(url, response)
    }

    fn update(&self, id: &RecordId, patch: &Record) -> ServiceResult<Record> {
        let url = self.item_url(id)?;
        let body = Record {
            id: None,
            fields: patch.fields.clone(),
        };
        let response = self.send("PATCH", &url, self.client.patch(url.clone()).json(&body))?;
        decode(&url, response)
    }

    fn delete(&self, id: &RecordId) -> ServiceResult<()> {
        let url = self.item_url(id)?;
        self.send("DELETE", &url, self.client.delete(url.clone()))?;
        Ok(())
    }
}

/// Joins `collection` onto `base_url`, keeping any path prefix on the base.
pub fn collection_url(base_url: &str, collection: &str) -> ServiceResult<Url> {
    let mut base = Url::parse(base_url.trim())?;
    if !matches!(base.scheme(), "http" | "https") {
        return Err(NetworkError::UnsupportedScheme(base.scheme().to_string()));
    }
    if !base.path().ends_with('/') {
        let path = format!("{}/", base.path());
        base.set_path(&path);
    }
    Ok(base.join(collection.trim_matches('/'))?)
}

fn decode<T: DeserializeOwned>(url: &Url, response: Response) -> ServiceResult<T> {
    let body = response.text().map_err(|source| NetworkError::Transport {
        url: url.to_string(),
        source,
    })?;
    serde_json::from_str(&body).map_err(|source| NetworkError::Decode {
        url: url.to_string(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collection_url_appends_segment() {
        let url = collection_url("http://localhost:3000", "users").unwrap();
        assert_eq!(url.as_str(), "http://localhost:3000/users");

        let url = collection_url("https://api.example.com/v1/", "/users/").unwrap();
        assert_eq!(url.as_str(), "https://api.example.com/v1/users");

        let url = collection_url("https://api.example.com/v1", "users").unwrap();
        assert_eq!(url.as_str(), "https://api.example.com/v1/users");
    }

    #[test]
    fn collection_url_rejects_non_http_schemes() {
        assert!(matches!(
            collection_url("ftp://example.com", "users"),
            Err(NetworkError::UnsupportedScheme(scheme)) if scheme == "ftp"
        ));
        assert!(matches!(
            collection_url("not a url", "users"),
            Err(NetworkError::InvalidUrl(_))
        ));
    }

    #[test]
    fn item_url_encodes_ids() {
        let service = HttpUserService::new("http://localhost:3000", "users").unwrap();
        assert_eq!(
            service.item_url(&RecordId::Number(5)).unwrap().as_str(),
            "http://localhost:3000/users/5"
        );
        assert_eq!(
            service.item_url(&RecordId::from("a b/c")).unwrap().as_str(),
            "http://localhost:3000/users/a%20b%2Fc"
        );
    }

    #[test]
    fn unreachable_host_is_a_transport_error() {
        // Port 9 (discard) on loopback is closed on test machines.
        let service = HttpUserService::new("http://127.0.0.1:9", "users").unwrap();
        let err = service.list().unwrap_err();
        assert!(matches!(err, NetworkError::Transport { .. }), "{err}");
        assert_eq!(err.status(), None);
    }
}
