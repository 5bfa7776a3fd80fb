use dial_client::{
    Attachment, Content, ContentedMessage, CustomFields, DialError, ImageOptions, ImageQuality,
    ImageSize, ImageStyle, ImgUrl, Message, ModelClient, ModelConfig, Role,
};
use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(server: &MockServer, deployment: &str) -> ModelClient {
    let config = ModelConfig::new(
        format!("{}/openai/deployments/{{model}}/chat/completions", server.uri()),
        deployment,
    )
    .with_api_key("test-key");
    ModelClient::new(config).expect("client")
}

#[tokio::test]
async fn text_message_returns_assistant_reply() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/openai/deployments/gpt-4o/chat/completions"))
        .and(header("api-key", "test-key"))
        .and(body_partial_json(json!({
            "messages": [{"role": "user", "content": "hi"}]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "choices": [{"index": 0, "message": {"role": "assistant", "content": "hello"}}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server, "gpt-4o");
    let response = client.complete([Message::user("hi")]).await.expect("response");

    assert_eq!(response.role, Role::Assistant);
    assert_eq!(response.content.as_deref(), Some("hello"));
    assert_eq!(response.custom_content, None);
}

#[tokio::test]
async fn contented_message_sends_ordered_parts() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/openai/deployments/gpt-4o/chat/completions"))
        .and(body_partial_json(json!({
            "messages": [{
                "role": "user",
                "content": [
                    {"type": "text", "text": "What's in this image?"},
                    {"type": "image_url", "image_url": {"url": "data:image/png;base64,AAAA"}}
                ]
            }]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "choices": [{"message": {"role": "assistant", "content": "A banner."}}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let message = ContentedMessage::user(vec![
        Content::text("What's in this image?"),
        Content::image(ImgUrl::new("data:image/png;base64,AAAA")),
    ])
    .expect("non-empty parts");

    let client = client_for(&server, "gpt-4o");
    let response = client.complete([message]).await.expect("response");
    assert_eq!(response.content.as_deref(), Some("A banner."));
}

#[tokio::test]
async fn attachment_message_and_image_options_are_sent() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/openai/deployments/dall-e-3/chat/completions"))
        .and(body_partial_json(json!({
            "messages": [{
                "role": "user",
                "content": "Sunny day on Bali",
                "custom_content": {"attachments": [
                    {"title": "ref.png", "url": "files/abc/ref.png", "type": "image/png"}
                ]}
            }],
            "size": "1024x1024",
            "quality": "hd",
            "style": "vivid"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "choices": [{"message": {
                "role": "assistant",
                "content": "",
                "custom_content": {"attachments": [
                    {"title": "Image", "type": "image/png", "url": "files/abc/generated.png"}
                ]}
            }}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let message = Message::user("Sunny day on Bali").with_attachments(vec![
        Attachment::new("ref.png", "image/png").with_url("files/abc/ref.png"),
    ]);
    let options = ImageOptions::new()
        .with_size(ImageSize::Square)
        .with_quality(ImageQuality::Hd)
        .with_style(ImageStyle::Vivid);

    let client = client_for(&server, "dall-e-3");
    let response = client
        .get_completion([message], options.into_custom_fields())
        .await
        .expect("response");

    let attachments = response.attachments();
    assert_eq!(attachments.len(), 1);
    assert_eq!(attachments[0].url.as_deref(), Some("files/abc/generated.png"));
    assert_eq!(attachments[0].mime_type, "image/png");
}

#[tokio::test]
async fn empty_messages_fail_without_request() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let client = client_for(&server, "gpt-4o");
    let err = client
        .get_completion(Vec::<Message>::new(), CustomFields::new())
        .await
        .unwrap_err();

    assert!(matches!(err, DialError::InvalidRequest(_)));
}

#[tokio::test]
async fn http_error_surfaces_as_request_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(401).set_body_string("unauthorized"))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server, "gpt-4o");
    let err = client.complete([Message::user("hi")]).await.unwrap_err();

    assert!(err.is_request_error());
    assert_eq!(err.status(), Some(401));
    match err {
        DialError::Status { body, .. } => assert_eq!(body, "unauthorized"),
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn malformed_body_surfaces_as_decode_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"result": "nope"})))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server, "gpt-4o");
    let err = client.complete([Message::user("hi")]).await.unwrap_err();

    assert!(err.is_decode_error());
}

#[tokio::test]
async fn base_url_endpoint_resolves_deployment_path() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/openai/deployments/imagegeneration@005/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "choices": [{"message": {"role": "assistant", "content": "ok"}}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let config = ModelConfig::new(server.uri(), "imagegeneration@005").with_api_key("test-key");
    let client = ModelClient::new(config).expect("client");
    let response = client.complete([Message::user("hi")]).await.expect("response");
    assert_eq!(response.content.as_deref(), Some("ok"));
}
