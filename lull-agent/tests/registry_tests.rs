// ABOUTME: Tests for the InvokerRegistry and InvokerFactory pattern.
// ABOUTME: Validates runtime provider selection and creation.

use lull_agent::registry::InvokerRegistry;
use serde_json::json;

#[test]
fn test_registry_creates_mock_provider() {
    let registry = InvokerRegistry::default();
    let invoker = registry.create("mock", &json!({})).unwrap();
    assert_eq!(invoker.name(), "mock");
}

#[test]
fn test_registry_creates_openrouter_provider() {
    let registry = InvokerRegistry::default();
    let config = json!({
        "api_key": "sk-test",
        "base_url": "https://openrouter.example/api/v1"
    });
    let invoker = registry.create("openrouter", &config).unwrap();
    assert_eq!(invoker.name(), "openrouter");
}

#[test]
fn test_registry_creates_openai_provider() {
    let registry = InvokerRegistry::default();
    let invoker = registry.create("openai", &json!({"api_key": "sk-test"})).unwrap();
    assert_eq!(invoker.name(), "openai");
}

#[test]
fn test_registry_lists_available_providers() {
    let registry = InvokerRegistry::default();
    let available = registry.available();
    assert!(available.contains(&"mock"));
    assert!(available.contains(&"openai"));
    assert!(available.contains(&"openrouter"));
}

#[test]
fn test_registry_unknown_provider_errors() {
    let registry = InvokerRegistry::default();
    let result = registry.create("nonexistent", &json!({}));
    assert!(result.is_err());
    match result {
        Err(err) => assert!(err.to_string().contains("Unknown provider: nonexistent")),
        Ok(_) => panic!("Expected error for unknown provider"),
    }
}

#[test]
fn test_registry_custom_factory() {
    use lull_agent::providers::mock::MockInvoker;
    use std::sync::Arc;

    let registry = InvokerRegistry::new().register("custom", |_config| {
        Ok(Arc::new(MockInvoker::new()) as Arc<dyn lull_agent::AgentInvoker>)
    });

    let invoker = registry.create("custom", &json!({})).unwrap();
    assert_eq!(invoker.name(), "mock");
}
