use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};
use timetrack_core::{Passport, UserInfo, UserInfoProvider};

use crate::{Error, Result};

const INFO_ENDPOINT: &str = "info";

/// Passport lookup over HTTP: `GET {base}/info?passportSerie=..&passportNumber=..`.
#[derive(Clone)]
pub struct HttpUserInfoClient {
    client: Client,
    base_url: Url,
}

impl HttpUserInfoClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let mut base_url =
            Url::parse(base_url).map_err(|e| Error::InvalidUrl(format!("{}: {}", base_url, e)))?;
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self { client, base_url })
    }

    fn endpoint(&self, passport: &Passport) -> Result<Url> {
        let mut url = self
            .base_url
            .join(INFO_ENDPOINT)
            .map_err(|e| Error::InvalidUrl(e.to_string()))?;

        url.query_pairs_mut()
            .append_pair("passportSerie", &passport.serie.to_string())
            .append_pair("passportNumber", &passport.number.to_string());

        Ok(url)
    }

    pub async fn fetch(&self, passport: &Passport) -> Result<UserInfo> {
        let url = self.endpoint(passport)?;
        tracing::debug!(%url, "Requesting user info");

        let response = self.client.get(url).send().await?;

        if response.status() != StatusCode::OK {
            return Err(Error::Status(response.status().as_u16()));
        }

        let body = response.bytes().await?;
        serde_json::from_slice(&body).map_err(|e| Error::Decode(e.to_string()))
    }
}

#[async_trait]
impl UserInfoProvider for HttpUserInfoClient {
    async fn user_info(&self, passport: &Passport) -> timetrack_core::Result<UserInfo> {
        self.fetch(passport).await.map_err(|e| {
            tracing::error!(passport = %passport, error = %e, "User info lookup failed");
            e.into()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Matcher;

    fn passport() -> Passport {
        Passport::new(1234, 567890)
    }

    #[test]
    fn test_client_creation() {
        let result = HttpUserInfoClient::new("http://localhost:8081", Duration::from_secs(5));
        assert!(result.is_ok());
    }

    #[test]
    fn test_invalid_base_url() {
        let result = HttpUserInfoClient::new("not a url", Duration::from_secs(5));
        assert!(matches!(result, Err(Error::InvalidUrl(_))));
    }

    #[test]
    fn test_endpoint_keeps_base_path() {
        let client =
            HttpUserInfoClient::new("http://people.local/api", Duration::from_secs(5)).unwrap();
        let url = client.endpoint(&passport()).unwrap();

        assert_eq!(
            url.as_str(),
            "http://people.local/api/info?passportSerie=1234&passportNumber=567890"
        );
    }

    #[tokio::test]
    async fn test_fetch_decodes_info() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/info")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("passportSerie".into(), "1234".into()),
                Matcher::UrlEncoded("passportNumber".into(), "567890".into()),
            ]))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{"surname":"Ivanov","name":"Ivan","patronymic":"Ivanovich","address":"Moscow"}"#,
            )
            .create_async()
            .await;

        let client = HttpUserInfoClient::new(&server.url(), Duration::from_secs(5)).unwrap();
        let info = client.user_info(&passport()).await.unwrap();

        assert_eq!(info.surname, "Ivanov");
        assert_eq!(info.name, "Ivan");
        assert_eq!(info.patronymic, "Ivanovich");
        assert_eq!(info.address, "Moscow");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_non_200_is_lookup_failure() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/info")
            .match_query(Matcher::Any)
            .with_status(400)
            .create_async()
            .await;

        let client = HttpUserInfoClient::new(&server.url(), Duration::from_secs(5)).unwrap();

        let err = client.fetch(&passport()).await.unwrap_err();
        assert!(matches!(err, Error::Status(400)));

        let err = client.user_info(&passport()).await.unwrap_err();
        assert!(matches!(err, timetrack_core::Error::InfoLookup(_)));
    }

    #[tokio::test]
    async fn test_malformed_body_is_decode_error() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/info")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body("not json")
            .create_async()
            .await;

        let client = HttpUserInfoClient::new(&server.url(), Duration::from_secs(5)).unwrap();

        let err = client.fetch(&passport()).await.unwrap_err();
        assert!(matches!(err, Error::Decode(_)));
    }
}
