#[cfg(test)]
mod tests {
    use crate::ai::{AIError, ChatClient, CommandTranslator, TranslationContext};
    use crate::config::AIConfig;
    use mockito::{Matcher, Server, ServerGuard};
    use serde_json::json;
    use std::path::PathBuf;

    const PATH: &str = "/api/v1/chat/completions";

    async fn setup_test_server() -> (ServerGuard, AIConfig) {
        let server = Server::new_async().await;

        let config = AIConfig {
            model: "test-model".to_string(),
            api_url: format!("{}{}", server.url(), PATH),
            api_key: Some("test_key".to_string()),
            timeout_secs: 5,
            referer: Some("https://example.com".to_string()),
            title: Some("aicmd".to_string()),
        };

        (server, config)
    }

    fn context() -> TranslationContext {
        TranslationContext {
            shell_name: "Bash".to_string(),
            os: "Linux".to_string(),
            cwd: PathBuf::from("/tmp"),
        }
    }

    fn reply(content: &str) -> String {
        json!({
            "id": "gen-1",
            "choices": [{
                "index": 0,
                "message": { "role": "assistant", "content": content }
            }]
        })
        .to_string()
    }

    #[tokio::test]
    async fn test_successful_translation() {
        let (mut server, config) = setup_test_server().await;

        let mock = server
            .mock("POST", PATH)
            .match_header("authorization", "Bearer test_key")
            .match_header("x-title", "aicmd")
            .match_header("http-referer", "https://example.com")
            .match_body(Matcher::PartialJson(json!({ "model": "test-model" })))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(reply("ls -la"))
            .create_async()
            .await;

        let client = ChatClient::new(&config).unwrap();
        let command = client.translate("list files", &context()).await;

        assert_eq!(command, Ok("ls -la".to_string()));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_user_input_is_sent() {
        let (mut server, config) = setup_test_server().await;

        let mock = server
            .mock("POST", PATH)
            .match_body(Matcher::Regex("show disk usage".to_string()))
            .with_status(200)
            .with_body(reply("df -h"))
            .create_async()
            .await;

        let client = ChatClient::new(&config).unwrap();
        let command = client.translate("show disk usage", &context()).await.unwrap();

        assert_eq!(command, "df -h");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_fenced_reply_is_cleaned() {
        let (mut server, config) = setup_test_server().await;

        let _mock = server
            .mock("POST", PATH)
            .with_status(200)
            .with_body(reply("```bash\n# find big files\nfind . -size +100M\n```"))
            .create_async()
            .await;

        let client = ChatClient::new(&config).unwrap();
        let command = client.translate("find big files", &context()).await;
        assert_eq!(command, Ok("find . -size +100M".to_string()));
    }

    #[tokio::test]
    async fn test_invalid_api_key() {
        let (mut server, config) = setup_test_server().await;

        let _mock = server
            .mock("POST", PATH)
            .with_status(401)
            .with_body(json!({ "error": { "message": "No auth credentials found" } }).to_string())
            .create_async()
            .await;

        let client = ChatClient::new(&config).unwrap();
        let result = client.translate("list files", &context()).await;

        assert_eq!(
            result,
            Err(AIError::AuthenticationError("No auth credentials found".to_string()))
        );
    }

    #[tokio::test]
    async fn test_rate_limited() {
        let (mut server, config) = setup_test_server().await;

        let _mock = server
            .mock("POST", PATH)
            .with_status(429)
            .create_async()
            .await;

        let client = ChatClient::new(&config).unwrap();
        let result = client.translate("list files", &context()).await;
        assert!(matches!(result, Err(AIError::RateLimitError(_))));
    }

    #[tokio::test]
    async fn test_server_error_is_not_retried() {
        let (mut server, config) = setup_test_server().await;

        let mock = server
            .mock("POST", PATH)
            .with_status(500)
            .with_body(json!({ "error": { "message": "upstream exploded" } }).to_string())
            .expect(1)
            .create_async()
            .await;

        let client = ChatClient::new(&config).unwrap();
        let result = client.translate("list files", &context()).await;

        match result {
            Err(AIError::APIError(msg)) => {
                assert!(msg.contains("500"));
                assert!(msg.contains("upstream exploded"));
            }
            other => panic!("Expected API error, got {:?}", other),
        }
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_empty_response() {
        let (mut server, config) = setup_test_server().await;

        let _mock = server
            .mock("POST", PATH)
            .with_status(200)
            .with_body(json!({ "choices": [] }).to_string())
            .create_async()
            .await;

        let client = ChatClient::new(&config).unwrap();
        let result = client.translate("list files", &context()).await;
        assert_eq!(result, Err(AIError::EmptyResponse));
    }

    #[tokio::test]
    async fn test_malformed_body() {
        let (mut server, config) = setup_test_server().await;

        let _mock = server
            .mock("POST", PATH)
            .with_status(200)
            .with_body("not json at all")
            .create_async()
            .await;

        let client = ChatClient::new(&config).unwrap();
        let result = client.translate("list files", &context()).await;
        assert!(matches!(result, Err(AIError::ParseError(_))));
    }

    #[tokio::test]
    async fn test_unreachable_endpoint() {
        let config = AIConfig {
            api_url: "http://127.0.0.1:9/chat".to_string(),
            api_key: Some("test_key".to_string()),
            timeout_secs: 2,
            ..AIConfig::default()
        };

        let client = ChatClient::new(&config).unwrap();
        let result = client.translate("list files", &context()).await;
        assert!(matches!(result, Err(AIError::NetworkError(_))));
    }

    #[test]
    fn test_missing_api_key() {
        let config = AIConfig {
            api_key: None,
            ..AIConfig::default()
        };

        assert!(matches!(
            ChatClient::new(&config),
            Err(AIError::ConfigurationError(_))
        ));
    }
}
