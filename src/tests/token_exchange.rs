#[cfg(test)]
mod tests {
    use httpmock::Method::POST;
    use httpmock::MockServer;

    use crate::error::ExchangeError;
    use crate::exchange::ExchangeClient;
    use crate::tests::common::json;

    fn client() -> ExchangeClient {
        ExchangeClient::new(ExchangeClient::build_http_client().unwrap())
    }

    #[tokio::test]
    async fn exchange_returns_issued_token() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/oidc/v1/token")
                    .header("content-type", "application/x-www-form-urlencoded")
                    .form_urlencoded_tuple(
                        "grant_type",
                        "urn:ietf:params:oauth:grant-type:token-exchange",
                    )
                    .form_urlencoded_tuple("subject_token", "jwt-abc")
                    .form_urlencoded_tuple(
                        "subject_token_type",
                        "urn:ietf:params:oauth:token-type:jwt",
                    )
                    .form_urlencoded_tuple("scope", "all-apis");
                then.status(200)
                    .header("Content-Type", "application/json")
                    .json_body(json!({
                        "access_token": "db-token-123",
                        "expires_in": 3600,
                        "token_type": "Bearer"
                    }));
            })
            .await;

        let token = client()
            .exchange(&server.url("/oidc/v1/token"), "jwt-abc")
            .await
            .unwrap();

        mock.assert_async().await;
        assert_eq!(token.access_token, "db-token-123");
        assert_eq!(token.expires_in, 3600);
        assert_eq!(token.token_type, "Bearer");
    }

    #[tokio::test]
    async fn token_type_defaults_to_bearer() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/oidc/v1/token");
                then.status(200)
                    .json_body(json!({"access_token": "tok", "expires_in": 60}));
            })
            .await;

        let token = client()
            .exchange(&server.url("/oidc/v1/token"), "jwt")
            .await
            .unwrap();
        assert_eq!(token.token_type, "Bearer");
    }

    #[tokio::test]
    async fn non_200_surfaces_status_and_body() {
        for status in [400u16, 401, 403, 500] {
            let server = MockServer::start_async().await;
            server
                .mock_async(|when, then| {
                    when.method(POST).path("/oidc/v1/token");
                    then.status(status).body("error body");
                })
                .await;

            let err = client()
                .exchange(&server.url("/oidc/v1/token"), "jwt")
                .await
                .unwrap_err();

            assert!(matches!(err, ExchangeError::Rejected { .. }));
            let message = err.to_string();
            assert!(message.contains(&format!("HTTP {status}")), "{message}");
            assert!(message.contains("error body"), "{message}");
        }
    }

    #[tokio::test]
    async fn missing_required_fields_is_invalid_response() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/oidc/v1/token");
                then.status(200).json_body(json!({"token_type": "Bearer"}));
            })
            .await;

        let err = client()
            .exchange(&server.url("/oidc/v1/token"), "jwt")
            .await
            .unwrap_err();
        assert!(matches!(err, ExchangeError::InvalidResponse(_)));
    }

    #[tokio::test]
    async fn unreachable_endpoint_is_transport_error() {
        let err = client()
            .exchange("http://127.0.0.1:1/oidc/v1/token", "jwt")
            .await
            .unwrap_err();
        assert!(matches!(err, ExchangeError::Transport(_)));
    }
}
