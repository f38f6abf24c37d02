//! Conversation session: transcript plus the per-turn state machine
//!
//! One turn walks Idle → Translating → Executing → Responding → Idle.
//! Taking `&mut self` for [`ChatSession::ask`] makes a second in-flight
//! turn unrepresentable, which is the whole concurrency story: callers
//! submit questions strictly one after another and answers append in the
//! same order.

use crate::db::{ConnectionManager, ConnectionParameters, DatabaseDriver, QueryExecutor};
use crate::error::ConnectionError;
use crate::respond::ResponseGenerator;
use crate::schema::{SchemaDescription, SchemaDescriptor};
use crate::translate::QueryTranslator;
use llm::CompletionModel;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

#[derive(Copy, Clone, Debug, Deserialize, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

/// One message in the transcript. Immutable once created.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
pub struct Turn {
    pub role: Role,
    pub content: String,
}

impl Turn {
    pub fn user(content: impl Into<String>) -> Self {
        Turn {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Turn {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

/// Orchestrates the translate → execute → respond pipeline for one
/// conversation and owns its append-only transcript.
///
/// The transcript grows by exactly one user turn and one assistant turn
/// per question, so its length is even whenever a call returns; failed
/// turns append an error-surfacing assistant turn instead of an answer.
pub struct ChatSession {
    schema: SchemaDescriptor,
    connection: Arc<ConnectionManager>,
    executor: QueryExecutor,
    translator: QueryTranslator,
    responder: ResponseGenerator,
    transcript: Vec<Turn>,
}

impl ChatSession {
    pub fn new(model: Arc<dyn CompletionModel>, driver: Arc<dyn DatabaseDriver>) -> Self {
        let connection = Arc::new(ConnectionManager::new(driver));
        let executor = QueryExecutor::new(Arc::clone(&connection));
        ChatSession {
            schema: SchemaDescriptor::fixed(),
            connection,
            executor,
            translator: QueryTranslator::new(Arc::clone(&model)),
            responder: ResponseGenerator::new(model),
            transcript: Vec::new(),
        }
    }

    /// Open (or replace) the database connection, then refresh the schema
    /// description from the live database where possible.
    pub async fn connect(&mut self, params: &ConnectionParameters) -> Result<(), ConnectionError> {
        self.connection.connect(params).await?;
        self.schema = SchemaDescriptor::introspect(&self.executor).await;
        Ok(())
    }

    pub async fn disconnect(&mut self) {
        self.connection.disconnect().await;
    }

    pub async fn is_connected(&self) -> bool {
        self.connection.is_connected().await
    }

    pub fn schema(&self) -> &SchemaDescription {
        self.schema.describe()
    }

    pub fn transcript(&self) -> &[Turn] {
        &self.transcript
    }

    pub fn clear(&mut self) {
        self.transcript.clear();
    }

    /// Run one full turn and return the assistant turn that was appended.
    pub async fn ask(&mut self, question: &str) -> Turn {
        self.transcript.push(Turn::user(question));

        // Without a connection the turn short-circuits before any
        // completion call is made.
        if !self.connection.is_connected().await {
            return self.finish_turn("Please connect to the database first.");
        }

        tracing::debug!(state = "translating", question);
        let query = match self.translator.translate(question, self.schema.describe()).await {
            Ok(query) => query,
            Err(e) => return self.finish_turn(e.to_string()),
        };

        // A failed execution is not a failed turn: the error becomes input
        // to the response step.
        tracing::debug!(state = "executing");
        let outcome = self.executor.execute(&query).await;

        tracing::debug!(state = "responding");
        let answer = match self
            .responder
            .respond(question, &query, &outcome, self.schema.describe())
            .await
        {
            Ok(answer) => answer,
            Err(e) => e.to_string(),
        };
        self.finish_turn(answer)
    }

    fn finish_turn(&mut self, content: impl Into<String>) -> Turn {
        let turn = Turn::assistant(content);
        self.transcript.push(turn.clone());
        turn
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{Database, Rows, Value};
    use crate::error::ExecutionError;
    use async_trait::async_trait;
    use llm::{Completion, CompletionRequest};
    use std::collections::VecDeque;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Completion double that replays scripted responses and counts calls.
    struct ScriptedModel {
        responses: Mutex<VecDeque<String>>,
        calls: AtomicUsize,
    }

    impl ScriptedModel {
        fn new(responses: &[&str]) -> Arc<Self> {
            Arc::new(ScriptedModel {
                responses: Mutex::new(responses.iter().map(|s| s.to_string()).collect()),
                calls: AtomicUsize::new(0),
            })
        }

        fn call_count(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl CompletionModel for ScriptedModel {
        fn name(&self) -> &str {
            "scripted"
        }

        async fn complete(&self, _request: &CompletionRequest) -> anyhow::Result<Completion> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let next = self.responses.lock().unwrap().pop_front();
            match next {
                Some(text) => Ok(Completion::new(text)),
                None => anyhow::bail!("no scripted response left"),
            }
        }
    }

    struct StubDatabase {
        outcome: Result<Rows, String>,
    }

    #[async_trait]
    impl Database for StubDatabase {
        async fn run(&self, _query: &str) -> anyhow::Result<Rows> {
            match &self.outcome {
                Ok(rows) => Ok(rows.clone()),
                Err(message) => anyhow::bail!("{}", message),
            }
        }
    }

    struct StubDriver {
        outcome: Result<Rows, String>,
    }

    impl StubDriver {
        fn rows(rows: Rows) -> Arc<Self> {
            Arc::new(StubDriver { outcome: Ok(rows) })
        }

        fn raising(message: &str) -> Arc<Self> {
            Arc::new(StubDriver {
                outcome: Err(message.to_string()),
            })
        }
    }

    #[async_trait]
    impl DatabaseDriver for StubDriver {
        async fn open(&self, _params: &ConnectionParameters) -> anyhow::Result<Arc<dyn Database>> {
            Ok(Arc::new(StubDatabase {
                outcome: self.outcome.clone(),
            }))
        }
    }

    fn params() -> ConnectionParameters {
        ConnectionParameters {
            host: "localhost".to_string(),
            port: 3306,
            username: "ledger".to_string(),
            password: "secret".to_string(),
            database: "inventory".to_string(),
        }
    }

    fn count_rows(count: i64) -> Rows {
        Rows::new(vec!["COUNT(*)".to_string()], vec![vec![Value::Int(count)]])
    }

    #[tokio::test]
    async fn test_question_while_disconnected_skips_the_model() {
        let model = ScriptedModel::new(&[]);
        let mut session = ChatSession::new(
            Arc::clone(&model) as Arc<dyn CompletionModel>,
            StubDriver::rows(Rows::default()),
        );

        let answer = session.ask("How many transactions are there?").await;

        assert_eq!(model.call_count(), 0);
        assert_eq!(answer.content, "Please connect to the database first.");
        assert_eq!(session.transcript().len(), 2);
        assert_eq!(session.transcript()[0].role, Role::User);
        assert_eq!(session.transcript()[1].role, Role::Assistant);
    }

    #[tokio::test]
    async fn test_full_turn_for_part_count_scenario() {
        let model = ScriptedModel::new(&[
            "SELECT COUNT(*) FROM inventory_transactions WHERE PartNo = '0124110001';",
            "There are 3 transactions for PartNo '0124110001'.",
        ]);
        let mut session = ChatSession::new(
            Arc::clone(&model) as Arc<dyn CompletionModel>,
            StubDriver::rows(count_rows(3)),
        );
        session.connect(&params()).await.unwrap();

        let answer = session
            .ask("How many transactions are there for PartNo '0124110001'?")
            .await;

        assert_eq!(model.call_count(), 2);
        assert!(answer.content.contains('3'));
        let last = session.transcript().last().unwrap();
        assert_eq!(last.role, Role::Assistant);
        assert!(last.content.contains('3'));
    }

    #[tokio::test]
    async fn test_transcript_orders_and_alternates() {
        let model = ScriptedModel::new(&[
            "SELECT 1;",
            "Answer one.",
            "SELECT 2;",
            "Answer two.",
            "SELECT 3;",
            "Answer three.",
        ]);
        let mut session = ChatSession::new(
            Arc::clone(&model) as Arc<dyn CompletionModel>,
            StubDriver::rows(count_rows(1)),
        );
        session.connect(&params()).await.unwrap();

        session.ask("first").await;
        session.ask("second").await;
        session.ask("third").await;

        let transcript = session.transcript();
        assert_eq!(transcript.len(), 6);
        for (i, turn) in transcript.iter().enumerate() {
            let expected = if i % 2 == 0 { Role::User } else { Role::Assistant };
            assert_eq!(turn.role, expected);
        }
        assert_eq!(transcript[0].content, "first");
        assert_eq!(transcript[2].content, "second");
        assert_eq!(transcript[4].content, "third");
    }

    #[tokio::test]
    async fn test_raising_driver_still_yields_an_answer() {
        let model = ScriptedModel::new(&[
            "SELEC oops",
            "That query failed because of a syntax error.",
        ]);
        let mut session = ChatSession::new(
            Arc::clone(&model) as Arc<dyn CompletionModel>,
            StubDriver::raising("You have an error in your SQL syntax"),
        );
        session.connect(&params()).await.unwrap();

        let answer = session.ask("how many rows?").await;

        // Both completion calls ran: execution failure reached Responding.
        assert_eq!(model.call_count(), 2);
        assert_eq!(answer.content, "That query failed because of a syntax error.");
        assert_eq!(session.transcript().len(), 2);
    }

    #[tokio::test]
    async fn test_translation_failure_aborts_before_execution() {
        // Empty script: the first completion call errors.
        let model = ScriptedModel::new(&[]);
        let mut session = ChatSession::new(
            Arc::clone(&model) as Arc<dyn CompletionModel>,
            StubDriver::rows(count_rows(1)),
        );
        session.connect(&params()).await.unwrap();

        let answer = session.ask("how many rows?").await;

        // Exactly one call: translation failed, respond was never tried.
        assert_eq!(model.call_count(), 1);
        assert!(answer.content.contains("language model request failed"));
        assert_eq!(session.transcript().len(), 2);
        assert_eq!(session.transcript()[1].role, Role::Assistant);
    }

    #[tokio::test]
    async fn test_not_connected_execution_still_reaches_responding() {
        // Execute without any prior connect, then feed the failure straight
        // into the response step: the turn pipeline keeps going instead of
        // aborting.
        let manager = Arc::new(ConnectionManager::new(
            StubDriver::rows(count_rows(1)) as Arc<dyn DatabaseDriver>
        ));
        let executor = QueryExecutor::new(manager);
        let outcome = executor.execute("SELECT 1").await;
        assert_eq!(outcome, Err(ExecutionError::NotConnected));

        let model = ScriptedModel::new(&[
            "No database is connected, so I could not run the query.",
        ]);
        let responder = ResponseGenerator::new(Arc::clone(&model) as Arc<dyn CompletionModel>);
        let answer = responder
            .respond(
                "how many rows?",
                "SELECT 1",
                &outcome,
                SchemaDescriptor::fixed().describe(),
            )
            .await
            .unwrap();
        assert!(!answer.is_empty());
    }

    #[tokio::test]
    async fn test_clear_empties_transcript() {
        let model = ScriptedModel::new(&["SELECT 1;", "One."]);
        let mut session = ChatSession::new(
            Arc::clone(&model) as Arc<dyn CompletionModel>,
            StubDriver::rows(count_rows(1)),
        );
        session.connect(&params()).await.unwrap();
        session.ask("first").await;

        session.clear();
        assert!(session.transcript().is_empty());
    }

    #[tokio::test]
    async fn test_reconnect_replaces_handle_used_by_execute() {
        let model = ScriptedModel::new(&[
            "SELECT COUNT(*) FROM inventory_transactions;",
            "There are 7 transactions.",
        ]);
        let mut session = ChatSession::new(
            Arc::clone(&model) as Arc<dyn CompletionModel>,
            StubDriver::rows(count_rows(7)),
        );

        // Connect twice; the turn must run against the latest handle.
        session.connect(&params()).await.unwrap();
        session.connect(&params()).await.unwrap();

        let answer = session.ask("how many transactions?").await;
        assert!(answer.content.contains('7'));
    }
}
