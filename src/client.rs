//! HTTP client for the banking REST API.
//!
//! Provides both async and blocking client variants behind feature flags.
//! Both implement the matching [`crate::source`] trait, so the rest of the
//! crate never talks to reqwest directly.

use crate::error::Result;
use crate::models::TransactionRecord;

/// Transaction history endpoint path.
const TRANSACTIONS_PATH: &str = "/account/transactions";

/// Account details endpoint path.
const ACCOUNT_DETAILS_PATH: &str = "/dashboard/account";

/// Decodes a transaction list body one record at a time.
///
/// The body must be a JSON array; a record that does not decode is logged
/// and skipped instead of failing the whole history.
fn decode_records(body: &str) -> Result<Vec<TransactionRecord>> {
    let raw: Vec<serde_json::Value> = serde_json::from_str(body)?;
    let total = raw.len();
    let records: Vec<TransactionRecord> = raw
        .into_iter()
        .enumerate()
        .filter_map(|(index, value)| match serde_json::from_value(value) {
            Ok(record) => Some(record),
            Err(err) => {
                tracing::warn!(index, error = %err, "skipping undecodable transaction");
                None
            }
        })
        .collect();
    tracing::debug!(total, decoded = records.len(), "decoded transaction list");
    Ok(records)
}

/// Generates a bank API client (async or blocking) with builder, methods, and tests.
macro_rules! define_client {
    (
        client_name: $client:ident,
        builder_name: $builder:ident,
        http_type: $http_type:ty,
        response_type: $resp_type:ty,
        client_doc: $client_doc:expr,
        builder_doc: $builder_doc:expr,
        $(async_kw: $async_kw:tt,)?
        $(await_kw: $await_ext:tt,)?
    ) => {
        #[doc = $builder_doc]
        #[derive(Debug)]
        pub struct $builder {
            /// Bearer token for API authentication.
            token: Option<SecretString>,
            /// API base URL.
            base_url: Option<String>,
        }

        impl $builder {
            /// Sets the bearer token for API authentication.
            #[inline]
            #[must_use]
            pub fn token<T: Into<String>>(mut self, token: T) -> Self {
                self.token = Some(SecretString::from(token.into()));
                self
            }

            /// Sets the API base URL (e.g. `https://bank.example.com/api`).
            #[inline]
            #[must_use]
            pub fn base_url<T: Into<String>>(mut self, url: T) -> Self {
                self.base_url = Some(url.into());
                self
            }

            /// Builds the client.
            ///
            /// # Errors
            ///
            /// Returns [`BankViewError::MissingToken`] if no token was provided.
            /// Returns [`BankViewError::MissingBaseUrl`] if no base URL was provided.
            /// Returns [`BankViewError::Http`] if the HTTP client fails to build.
            #[inline]
            #[tracing::instrument(skip_all)]
            pub fn build(self) -> Result<$client> {
                let token = self.token.ok_or(BankViewError::MissingToken)?;
                let base_url = self
                    .base_url
                    .map(|url| url.trim_end_matches('/').to_owned())
                    .filter(|url| !url.is_empty())
                    .ok_or(BankViewError::MissingBaseUrl)?;
                tracing::debug!(base_url = %base_url, "building client");
                let http = <$http_type>::builder().build()?;

                Ok($client {
                    http,
                    token,
                    base_url,
                })
            }
        }

        #[doc = $client_doc]
        #[derive(Debug)]
        pub struct $client {
            /// Underlying HTTP client.
            http: $http_type,
            /// Bearer access token.
            token: SecretString,
            /// API base URL, without a trailing slash.
            base_url: String,
        }

        impl $client {
            /// Creates a new builder for configuring the client.
            #[inline]
            #[must_use]
            pub const fn builder() -> $builder {
                $builder {
                    token: None,
                    base_url: None,
                }
            }

            /// Fetches the viewer's transaction history from
            /// `/account/transactions`.
            ///
            /// Records that fail to decode are skipped with a warning.
            ///
            /// # Errors
            ///
            /// Returns an error if the HTTP request fails, the server returns a
            /// non-success status, or the body is not a JSON array.
            #[inline]
            #[tracing::instrument(skip_all)]
            pub $($async_kw)? fn transactions(&self) -> Result<Vec<TransactionRecord>> {
                tracing::debug!("calling transactions endpoint");
                let body = self.get_text(TRANSACTIONS_PATH) $( .$await_ext )? ?;
                decode_records(&body)
            }

            /// Fetches the viewer's account summary from `/dashboard/account`.
            ///
            /// # Errors
            ///
            /// Returns an error if the HTTP request fails, the server returns a
            /// non-success status, or the response cannot be deserialized.
            #[inline]
            #[tracing::instrument(skip_all)]
            pub $($async_kw)? fn account_details(&self) -> Result<AccountDetails> {
                tracing::debug!("calling account details endpoint");
                let body = self.get_text(ACCOUNT_DETAILS_PATH) $( .$await_ext )? ?;
                serde_json::from_str(&body).map_err(BankViewError::from)
            }

            /// Returns the viewer's account number, or `None` if the API has no
            /// account for this token (404).
            ///
            /// # Errors
            ///
            /// Returns any other error from [`Self::account_details`].
            #[inline]
            #[tracing::instrument(skip_all)]
            pub $($async_kw)? fn viewer_account(&self) -> Result<Option<AccountNumber>> {
                match self.account_details() $( .$await_ext )? {
                    Ok(details) => Ok(Some(details.account_number)),
                    Err(BankViewError::Api { status: 404, .. }) => {
                        tracing::warn!("no account found for viewer");
                        Ok(None)
                    }
                    Err(err) => Err(err),
                }
            }

            /// Sends an authenticated GET request and returns the response body.
            #[tracing::instrument(skip_all, fields(path = %path))]
            $($async_kw)? fn get_text(&self, path: &str) -> Result<String> {
                let url = format!("{}{path}", self.base_url);
                tracing::trace!(url = %url, "sending GET request");
                let response: $resp_type = self
                    .http
                    .get(&url)
                    .header(AUTHORIZATION, format!("Bearer {}", self.token.expose_secret()))
                    .header(ACCEPT, "application/json")
                    .send()
                    $( .$await_ext )?
                    ?;

                let status = response.status();
                tracing::debug!(status = %status, "received response");
                if status.is_success() {
                    let body = response.text() $( .$await_ext )? ?;
                    tracing::trace!(body_len = body.len(), "read response body");
                    Ok(body)
                } else {
                    let message = response
                        .text()
                        $( .$await_ext )?
                        .unwrap_or_else(|_| "unknown error".to_owned());
                    tracing::warn!(status = status.as_u16(), message = %message, "API error");
                    Err(BankViewError::Api {
                        status: status.as_u16(),
                        message,
                    })
                }
            }
        }

        #[cfg(test)]
        mod builder_tests {
            use super::*;

            #[test]
            fn builder_requires_token() {
                let result = $client::builder().base_url("http://localhost:8080").build();
                assert!(matches!(result, Err(BankViewError::MissingToken)));
            }

            #[test]
            fn builder_requires_base_url() {
                let result = $client::builder().token("test-token").build();
                assert!(matches!(result, Err(BankViewError::MissingBaseUrl)));
            }

            #[test]
            fn builder_trims_trailing_slash() {
                let client = $client::builder()
                    .token("test-token")
                    .base_url("http://localhost:8080/api/")
                    .build()
                    .unwrap();
                assert_eq!(client.base_url, "http://localhost:8080/api");
            }

            #[test]
            fn debug_output_hides_token() {
                let client = $client::builder()
                    .token("super-secret-token")
                    .base_url("http://localhost:8080")
                    .build()
                    .unwrap();
                assert!(!format!("{client:?}").contains("super-secret-token"));
            }
        }
    };
}

#[cfg(feature = "async")]
mod async_client {
    //! Async HTTP client for the banking API.

    use core::future::Future;

    use reqwest::header::{ACCEPT, AUTHORIZATION};
    use secrecy::{ExposeSecret as _, SecretString};

    use super::{ACCOUNT_DETAILS_PATH, TRANSACTIONS_PATH, decode_records};
    use crate::error::{BankViewError, Result};
    use crate::models::{AccountDetails, AccountNumber, TransactionRecord};
    use crate::source::TransactionSource;

    define_client! {
        client_name: BankClient,
        builder_name: BankClientBuilder,
        http_type: reqwest::Client,
        response_type: reqwest::Response,
        client_doc: "Async client for the banking API.\n\nUse [`BankClient::builder()`] to construct an instance.",
        builder_doc: "Builder for constructing a [`BankClient`].",
        async_kw: async,
        await_kw: await,
    }

    impl TransactionSource for BankClient {
        #[inline]
        fn fetch_transactions(&self) -> impl Future<Output = Result<Vec<TransactionRecord>>> + Send {
            self.transactions()
        }

        #[inline]
        fn resolve_viewer_account(&self) -> impl Future<Output = Result<Option<AccountNumber>>> + Send {
            self.viewer_account()
        }
    }
}

#[cfg(feature = "blocking")]
mod blocking_client {
    //! Blocking (synchronous) HTTP client for the banking API.

    use reqwest::header::{ACCEPT, AUTHORIZATION};
    use secrecy::{ExposeSecret as _, SecretString};

    use super::{ACCOUNT_DETAILS_PATH, TRANSACTIONS_PATH, decode_records};
    use crate::error::{BankViewError, Result};
    use crate::models::{AccountDetails, AccountNumber, TransactionRecord};
    use crate::source::BlockingTransactionSource;

    define_client! {
        client_name: BankBlockingClient,
        builder_name: BankBlockingClientBuilder,
        http_type: reqwest::blocking::Client,
        response_type: reqwest::blocking::Response,
        client_doc: "Blocking (synchronous) client for the banking API.\n\nUse [`BankBlockingClient::builder()`] to construct an instance.",
        builder_doc: "Builder for constructing a [`BankBlockingClient`].",
    }

    impl BlockingTransactionSource for BankBlockingClient {
        #[inline]
        fn fetch_transactions(&self) -> Result<Vec<TransactionRecord>> {
            self.transactions()
        }

        #[inline]
        fn resolve_viewer_account(&self) -> Result<Option<AccountNumber>> {
            self.viewer_account()
        }
    }
}

#[cfg(feature = "async")]
pub use async_client::{BankClient, BankClientBuilder};
#[cfg(feature = "blocking")]
pub use blocking_client::{BankBlockingClient, BankBlockingClientBuilder};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_skips_bad_records() {
        let body = r#"[
            {"id": 1, "amount": 100.0, "transactionDate": "2025-03-01T10:00:00",
             "transactionType": "CASH_DEPOSIT", "sourceAccountNumber": "100001"},
            {"id": 2, "amount": "lots", "transactionDate": "2025-03-01",
             "transactionType": "CASH_DEPOSIT", "sourceAccountNumber": "100001"},
            {"id": 3, "amount": 25.0, "transactionDate": "yesterday",
             "transactionType": "CASH_WITHDRAWAL", "sourceAccountNumber": "100001"},
            {"id": 4, "amount": 50.0, "transactionDate": "2025-03-02",
             "transactionType": "CASH_TRANSFER", "sourceAccountNumber": "200002",
             "targetAccountNumber": "100001"}
        ]"#;
        let records = decode_records(body).unwrap();
        let ids: Vec<&str> = records.iter().map(|record| record.id.as_inner()).collect();
        assert_eq!(ids, ["1", "4"]);
    }

    #[test]
    fn decode_empty_list() {
        assert!(decode_records("[]").unwrap().is_empty());
    }

    #[test]
    fn decode_rejects_non_array_body() {
        let err = decode_records(r#"{"error": "nope"}"#).unwrap_err();
        assert!(err.is_fetch_failure());
    }

    /// Transaction list served by the mock API.
    const TRANSACTIONS_BODY: &str = r#"[
        {"id": "tx-1", "amount": 100.0, "transactionDate": "2025-03-01T09:00:00",
         "transactionType": "CASH_DEPOSIT", "sourceAccountNumber": "100001",
         "targetAccountNumber": null},
        {"id": "tx-2", "amount": 50.0, "transactionDate": "2025-03-01T12:00:00",
         "transactionType": "CASH_TRANSFER", "sourceAccountNumber": "200002",
         "targetAccountNumber": "100001"}
    ]"#;

    /// Account details served by the mock API.
    const ACCOUNT_BODY: &str = r#"{
        "accountNumber": "100001",
        "accountType": "Savings",
        "balance": 1520.75,
        "branch": "Downtown"
    }"#;

    #[cfg(feature = "async")]
    mod async_tests {
        use wiremock::matchers::{header, method, path};
        use wiremock::{Mock, MockServer, ResponseTemplate};

        use super::*;
        use crate::error::BankViewError;
        use crate::models::AccountNumber;
        use crate::source::TransactionSource;

        fn client_for(server: &MockServer) -> BankClient {
            BankClient::builder()
                .token("test-token")
                .base_url(server.uri())
                .build()
                .unwrap()
        }

        #[tokio::test]
        async fn fetches_transactions_with_bearer_token() {
            let server = MockServer::start().await;
            Mock::given(method("GET"))
                .and(path("/account/transactions"))
                .and(header("authorization", "Bearer test-token"))
                .respond_with(ResponseTemplate::new(200).set_body_string(TRANSACTIONS_BODY))
                .expect(1)
                .mount(&server)
                .await;

            let client = client_for(&server);
            let records = client.fetch_transactions().await.unwrap();
            assert_eq!(records.len(), 2);
            assert_eq!(
                records.get(1).and_then(|r| r.target_account_number.clone()),
                Some(AccountNumber::from("100001"))
            );
        }

        #[tokio::test]
        async fn resolves_viewer_account() {
            let server = MockServer::start().await;
            Mock::given(method("GET"))
                .and(path("/dashboard/account"))
                .respond_with(ResponseTemplate::new(200).set_body_string(ACCOUNT_BODY))
                .mount(&server)
                .await;

            let client = client_for(&server);
            let viewer = client.resolve_viewer_account().await.unwrap();
            assert_eq!(viewer, Some(AccountNumber::from("100001")));
        }

        #[tokio::test]
        async fn missing_account_means_unknown_viewer() {
            let server = MockServer::start().await;
            Mock::given(method("GET"))
                .and(path("/dashboard/account"))
                .respond_with(ResponseTemplate::new(404).set_body_string("not found"))
                .mount(&server)
                .await;

            let client = client_for(&server);
            assert_eq!(client.resolve_viewer_account().await.unwrap(), None);
        }

        #[tokio::test]
        async fn unauthorized_maps_to_api_error() {
            let server = MockServer::start().await;
            Mock::given(method("GET"))
                .and(path("/account/transactions"))
                .respond_with(ResponseTemplate::new(401).set_body_string("token expired"))
                .mount(&server)
                .await;

            let client = client_for(&server);
            let err = client.fetch_transactions().await.unwrap_err();
            assert!(matches!(err, BankViewError::Api { status: 401, .. }));
            assert!(err.to_string().contains("token expired"));
            assert!(err.is_fetch_failure());
        }

        #[tokio::test]
        async fn empty_history_is_ok() {
            let server = MockServer::start().await;
            Mock::given(method("GET"))
                .and(path("/account/transactions"))
                .respond_with(ResponseTemplate::new(200).set_body_string("[]"))
                .mount(&server)
                .await;

            let client = client_for(&server);
            assert!(client.fetch_transactions().await.unwrap().is_empty());
        }
    }

    #[cfg(feature = "blocking")]
    mod blocking_tests {
        use wiremock::matchers::{method, path};
        use wiremock::{Mock, MockServer, ResponseTemplate};

        use super::*;
        use crate::models::AccountNumber;
        use crate::source::BlockingTransactionSource;

        #[tokio::test(flavor = "multi_thread")]
        async fn blocking_client_fetches_history_and_viewer() {
            let server = MockServer::start().await;
            Mock::given(method("GET"))
                .and(path("/account/transactions"))
                .respond_with(ResponseTemplate::new(200).set_body_string(TRANSACTIONS_BODY))
                .mount(&server)
                .await;
            Mock::given(method("GET"))
                .and(path("/dashboard/account"))
                .respond_with(ResponseTemplate::new(200).set_body_string(ACCOUNT_BODY))
                .mount(&server)
                .await;

            let uri = server.uri();
            let (records, viewer) = tokio::task::spawn_blocking(move || {
                let client = BankBlockingClient::builder()
                    .token("test-token")
                    .base_url(uri)
                    .build()
                    .unwrap();
                (
                    client.fetch_transactions().unwrap(),
                    client.resolve_viewer_account().unwrap(),
                )
            })
            .await
            .unwrap();

            assert_eq!(records.len(), 2);
            assert_eq!(viewer, Some(AccountNumber::from("100001")));
        }

        #[tokio::test(flavor = "multi_thread")]
        async fn blocking_client_reports_server_error() {
            let server = MockServer::start().await;
            Mock::given(method("GET"))
                .and(path("/account/transactions"))
                .respond_with(ResponseTemplate::new(500))
                .mount(&server)
                .await;

            let uri = server.uri();
            let result = tokio::task::spawn_blocking(move || {
                BankBlockingClient::builder()
                    .token("test-token")
                    .base_url(uri)
                    .build()
                    .unwrap()
                    .fetch_transactions()
            })
            .await
            .unwrap();

            assert!(result.unwrap_err().is_fetch_failure());
        }
    }
}
