use gproxy_protocol::openai::embeddings::request::{CreateEmbeddingRequestBody, EmbeddingInput};
use gproxy_protocol::openai::embeddings::{CreateEmbeddingRequest, EmbeddingEncodingFormat};
use gproxy_protocol::openai::images::request::CreateImageRequestBody;
use gproxy_protocol::openai::images::CreateImageRequest;

use super::embedding;
use super::image;

#[test]
fn embedding_round_trip_request() {
    let native = CreateEmbeddingRequest {
        body: CreateEmbeddingRequestBody {
            input: EmbeddingInput::Texts(vec!["hello".into(), "world".into()]),
            model: "openai/text-embedding-3-small".into(),
            encoding_format: Some(EmbeddingEncodingFormat::Float),
            dimensions: Some(256),
            user: Some("u-1".into()),
        },
    };

    let canonical = embedding::openai_to_canonical(&native).expect("converts");
    assert_eq!(canonical.model, "text-embedding-3-small");
    assert_eq!(canonical.texts, vec!["hello", "world"]);
    assert_eq!(canonical.dimensions, Some(256));

    let back = embedding::canonical_to_openai(&canonical).expect("converts back");
    assert_eq!(back.model, "text-embedding-3-small");
    assert_eq!(back.dimensions, Some(256));
    match back.input {
        EmbeddingInput::Texts(v) => assert_eq!(v, vec!["hello".to_string(), "world".to_string()]),
        other => panic!("unexpected input shape: {other:?}"),
    }
}

#[test]
fn embedding_rejects_token_input() {
    let native = CreateEmbeddingRequest {
        body: CreateEmbeddingRequestBody {
            input: EmbeddingInput::Tokens(vec![1, 2, 3]),
            model: "text-embedding-3-small".into(),
            encoding_format: None,
            dimensions: None,
            user: None,
        },
    };
    assert!(embedding::openai_to_canonical(&native).is_err());
}

#[test]
fn image_generation_round_trip_request() {
    let native = CreateImageRequest {
        body: CreateImageRequestBody {
            prompt: "a red panda".into(),
            model: Some("openai/gpt-image-1".into()),
            n: Some(2),
            quality: None,
            response_format: None,
            background: None,
            moderation: None,
            output_compression: None,
            output_format: None,
            size: Some("1024x1024".into()),
            style: None,
            stream: None,
            user: None,
        },
    };

    let canonical = image::openai_to_canonical(&native).expect("converts");
    assert_eq!(canonical.model.as_deref(), Some("gpt-image-1"));
    assert_eq!(canonical.n, Some(2));

    let back = image::canonical_to_openai(&canonical);
    assert_eq!(back.prompt, "a red panda");
    assert_eq!(back.size.as_deref(), Some("1024x1024"));
}
