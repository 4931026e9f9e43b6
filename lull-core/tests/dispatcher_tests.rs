// ABOUTME: Tests for the batch dispatcher - partitioning, failure isolation, fallbacks.
// ABOUTME: Uses the mock invoker plus recording fakes for directory, knowledge, and webhook.

use async_trait::async_trait;
use lull_agent::providers::mock::MockInvoker;
use lull_agent::{AgentDefinition, AgentReply};
use lull_core::dispatcher::{partition_by_agent, BatchDispatcher, FALLBACK_REPLY};
use lull_core::message::{BatchKey, InboundMessage};
use lull_core::traits::{AgentDirectory, BatchSink, KnowledgeSync, WebhookSender};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

struct StaticDirectory {
    agents: HashMap<String, AgentDefinition>,
}

impl StaticDirectory {
    fn with_agent(agent: AgentDefinition) -> Self {
        let mut agents = HashMap::new();
        agents.insert(agent.id.clone(), agent);
        Self { agents }
    }

    fn empty() -> Self {
        Self {
            agents: HashMap::new(),
        }
    }
}

impl AgentDirectory for StaticDirectory {
    fn lookup(&self, agent_id: &str) -> Option<AgentDefinition> {
        self.agents.get(agent_id).cloned()
    }
}

#[derive(Default)]
struct RecordingKnowledge {
    turns: Mutex<Vec<(String, String, String, String, String)>>,
    fail: bool,
}

#[async_trait]
impl KnowledgeSync for RecordingKnowledge {
    async fn record_turn(
        &self,
        tenant_id: &str,
        user_id: &str,
        session_id: &str,
        user_message: &str,
        bot_reply: &str,
    ) -> anyhow::Result<()> {
        if self.fail {
            anyhow::bail!("knowledge store unavailable");
        }
        self.turns.lock().unwrap_or_else(|e| e.into_inner()).push((
            tenant_id.to_string(),
            user_id.to_string(),
            session_id.to_string(),
            user_message.to_string(),
            bot_reply.to_string(),
        ));
        Ok(())
    }
}

#[derive(Default)]
struct RecordingWebhook {
    deliveries: Mutex<Vec<(String, AgentReply)>>,
    fail: bool,
}

impl RecordingWebhook {
    fn deliveries(&self) -> Vec<(String, AgentReply)> {
        self.deliveries
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }
}

#[async_trait]
impl WebhookSender for RecordingWebhook {
    async fn deliver(&self, url: &str, reply: &AgentReply) -> anyhow::Result<()> {
        if self.fail {
            anyhow::bail!("webhook endpoint unreachable");
        }
        self.deliveries
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push((url.to_string(), reply.clone()));
        Ok(())
    }
}

fn agent(id: &str, webhook_url: &str) -> AgentDefinition {
    AgentDefinition {
        id: id.to_string(),
        name: "Support".to_string(),
        description: String::new(),
        instructions: "Be helpful.".to_string(),
        model: "openai/gpt-4o-mini".to_string(),
        temperature: 0.7,
        max_tokens: 1000,
        skills: Vec::new(),
        webhook_url: webhook_url.to_string(),
    }
}

fn message(agent_id: &str, session: Option<&str>, body: &str) -> InboundMessage {
    InboundMessage {
        message: body.to_string(),
        agent_id: agent_id.to_string(),
        user_id: "u1".to_string(),
        account_id: "acct-7".to_string(),
        debounce_ms: 1000,
        session_id: session.map(String::from),
        message_id: None,
        client_id: None,
    }
}

fn key() -> BatchKey {
    BatchKey::resolve("a1", "u1", Some("s1"))
}

fn dispatcher(
    directory: StaticDirectory,
    invoker: MockInvoker,
    knowledge: Arc<RecordingKnowledge>,
    webhook: Arc<RecordingWebhook>,
) -> BatchDispatcher {
    BatchDispatcher::new(Arc::new(directory), Arc::new(invoker), knowledge, webhook)
}

// =============================================================================
// Partitioning
// =============================================================================

#[test]
fn test_partition_preserves_order_within_and_across_agents() {
    let messages = vec![
        message("a1", None, "one"),
        message("a2", None, "two"),
        message("a1", None, "three"),
    ];

    let partitioned = partition_by_agent(messages);
    assert_eq!(partitioned.len(), 2);
    assert_eq!(partitioned[0].0, "a1");
    let bodies: Vec<_> = partitioned[0].1.iter().map(|m| m.message.as_str()).collect();
    assert_eq!(bodies, vec!["one", "three"]);
    assert_eq!(partitioned[1].0, "a2");
}

#[test]
fn test_partition_empty_input() {
    assert!(partition_by_agent(Vec::new()).is_empty());
}

// =============================================================================
// Dispatch behavior
// =============================================================================

#[tokio::test]
async fn test_dispatch_delivers_replies_in_order() {
    let invoker = MockInvoker::new()
        .on_message("first")
        .reply_text("reply-1")
        .on_message("second")
        .reply_text("reply-2");
    let knowledge = Arc::new(RecordingKnowledge::default());
    let webhook = Arc::new(RecordingWebhook::default());
    let dispatcher = dispatcher(
        StaticDirectory::with_agent(agent("a1", "https://example.com/hook")),
        invoker,
        knowledge.clone(),
        webhook.clone(),
    );

    dispatcher
        .flush(
            key(),
            vec![
                message("a1", Some("s1"), "first"),
                message("a1", Some("s1"), "second"),
            ],
        )
        .await;

    let deliveries = webhook.deliveries();
    assert_eq!(deliveries.len(), 2);
    assert_eq!(deliveries[0].1.messages, vec!["reply-1".to_string()]);
    assert_eq!(deliveries[1].1.messages, vec!["reply-2".to_string()]);
    assert_eq!(deliveries[0].0, "https://example.com/hook");
}

#[tokio::test]
async fn test_failure_on_one_message_isolated_from_siblings() {
    let invoker = MockInvoker::new()
        .on_message("m1")
        .reply_text("r1")
        .on_message("m2")
        .reply_error("provider exploded")
        .on_message("m3")
        .reply_text("r3");
    let knowledge = Arc::new(RecordingKnowledge::default());
    let webhook = Arc::new(RecordingWebhook::default());
    let dispatcher = dispatcher(
        StaticDirectory::with_agent(agent("a1", "https://example.com/hook")),
        invoker,
        knowledge.clone(),
        webhook.clone(),
    );

    dispatcher
        .flush(
            key(),
            vec![
                message("a1", Some("s1"), "m1"),
                message("a1", Some("s1"), "m2"),
                message("a1", Some("s1"), "m3"),
            ],
        )
        .await;

    let deliveries = webhook.deliveries();
    assert_eq!(deliveries.len(), 3, "siblings of a failed message still dispatch");
    assert_eq!(deliveries[0].1.messages, vec!["r1".to_string()]);
    assert_eq!(deliveries[1].1.messages, vec![FALLBACK_REPLY.to_string()]);
    assert_eq!(deliveries[2].1.messages, vec!["r3".to_string()]);
}

#[tokio::test]
async fn test_missing_agent_skips_without_crash() {
    let knowledge = Arc::new(RecordingKnowledge::default());
    let webhook = Arc::new(RecordingWebhook::default());
    let dispatcher = dispatcher(
        StaticDirectory::empty(),
        MockInvoker::new(),
        knowledge.clone(),
        webhook.clone(),
    );

    dispatcher
        .flush(key(), vec![message("a1", Some("s1"), "hello")])
        .await;

    assert!(webhook.deliveries().is_empty());
    assert!(knowledge.turns.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_knowledge_failure_does_not_block_delivery() {
    let invoker = MockInvoker::new().on_message("hello").reply_text("hi");
    let knowledge = Arc::new(RecordingKnowledge {
        fail: true,
        ..Default::default()
    });
    let webhook = Arc::new(RecordingWebhook::default());
    let dispatcher = dispatcher(
        StaticDirectory::with_agent(agent("a1", "https://example.com/hook")),
        invoker,
        knowledge,
        webhook.clone(),
    );

    dispatcher
        .flush(key(), vec![message("a1", Some("s1"), "hello")])
        .await;

    assert_eq!(webhook.deliveries().len(), 1);
}

#[tokio::test]
async fn test_webhook_failure_swallowed() {
    let invoker = MockInvoker::new().on_message("hello").reply_text("hi");
    let knowledge = Arc::new(RecordingKnowledge::default());
    let webhook = Arc::new(RecordingWebhook {
        fail: true,
        ..Default::default()
    });
    let dispatcher = dispatcher(
        StaticDirectory::with_agent(agent("a1", "https://example.com/hook")),
        invoker,
        knowledge.clone(),
        webhook,
    );

    // Must not panic; the turn is still recorded.
    dispatcher
        .flush(key(), vec![message("a1", Some("s1"), "hello")])
        .await;

    assert_eq!(knowledge.turns.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn test_agent_without_webhook_url_skips_delivery() {
    let invoker = MockInvoker::new().on_message("hello").reply_text("hi");
    let knowledge = Arc::new(RecordingKnowledge::default());
    let webhook = Arc::new(RecordingWebhook::default());
    let dispatcher = dispatcher(
        StaticDirectory::with_agent(agent("a1", "")),
        invoker,
        knowledge.clone(),
        webhook.clone(),
    );

    dispatcher
        .flush(key(), vec![message("a1", Some("s1"), "hello")])
        .await;

    assert!(webhook.deliveries().is_empty());
    assert_eq!(knowledge.turns.lock().unwrap().len(), 1, "turn is still recorded");
}

#[tokio::test]
async fn test_session_id_minted_when_absent() {
    let invoker = MockInvoker::new().on_message("hello").reply_text("hi");
    let knowledge = Arc::new(RecordingKnowledge::default());
    let webhook = Arc::new(RecordingWebhook::default());
    let dispatcher = dispatcher(
        StaticDirectory::with_agent(agent("a1", "https://example.com/hook")),
        invoker,
        knowledge.clone(),
        webhook.clone(),
    );

    dispatcher
        .flush(
            BatchKey::resolve("a1", "u1", None),
            vec![message("a1", None, "hello")],
        )
        .await;

    let deliveries = webhook.deliveries();
    assert_eq!(deliveries.len(), 1);
    assert!(!deliveries[0].1.session_id.is_empty());
    assert_ne!(deliveries[0].1.session_id, "no_session");
}

#[tokio::test]
async fn test_turn_recorded_with_tenant_namespace() {
    let invoker = MockInvoker::new().on_message("hello").reply_text("hi");
    let knowledge = Arc::new(RecordingKnowledge::default());
    let webhook = Arc::new(RecordingWebhook::default());
    let dispatcher = dispatcher(
        StaticDirectory::with_agent(agent("a1", "")),
        invoker,
        knowledge.clone(),
        webhook,
    );

    dispatcher
        .flush(key(), vec![message("a1", Some("s1"), "hello")])
        .await;

    let turns = knowledge.turns.lock().unwrap();
    assert_eq!(turns.len(), 1);
    let (tenant, user, session, user_msg, reply) = &turns[0];
    assert_eq!(tenant, "tenant_acct-7");
    assert_eq!(user, "u1");
    assert_eq!(session, "s1");
    assert_eq!(user_msg, "hello");
    assert_eq!(reply, "hi");
}

#[tokio::test]
async fn test_empty_batch_is_noop() {
    let knowledge = Arc::new(RecordingKnowledge::default());
    let webhook = Arc::new(RecordingWebhook::default());
    let dispatcher = dispatcher(
        StaticDirectory::with_agent(agent("a1", "https://example.com/hook")),
        MockInvoker::new(),
        knowledge,
        webhook.clone(),
    );

    dispatcher.flush(key(), Vec::new()).await;
    assert!(webhook.deliveries().is_empty());
}
