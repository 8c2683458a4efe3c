#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use agency_api::auth::{AuthError, Credential, IdentityService, LoginError, LoginGrant, Principal};
use agency_api::chat::{ChatCompletion, ChatError, ChatMessage};
use agency_api::config::AppConfig;
use agency_api::mail::{MailError, Mailer, OutgoingEmail};
use agency_api::middleware::RateLimiter;
use agency_api::payments::{
    DepositRequest, KycStatus, PaymentsApi, PaymentsError, Transaction, TransactionPage, TransactionStatus,
    TransactionType, Wallet, WithdrawRequest,
};
use agency_api::zerodb::{KnowledgeStore, MemoryEntry, SearchHit, TableStore, VectorRecord, ZeroDbError};
use agency_api::{router, AppState};
use async_trait::async_trait;
use axum::body::Body;
use axum::http::{HeaderMap, Request, StatusCode};
use rust_decimal::Decimal;
use serde_json::{json, Map, Value};
use tower::ServiceExt;

pub const JWT: &str = "eyJhbGciOiJIUzI1NiJ9.eyJzdWIiOiJhZG1pbiJ9.sig";

/// Ordered record of every call the fakes receive, for call-order assertions
#[derive(Clone, Default)]
pub struct CallLog(Arc<Mutex<Vec<String>>>);

impl CallLog {
    pub fn push(&self, event: impl Into<String>) {
        self.0.lock().unwrap().push(event.into());
    }

    pub fn events(&self) -> Vec<String> {
        self.0.lock().unwrap().clone()
    }

    pub fn count(&self, prefix: &str) -> usize {
        self.events().iter().filter(|e| e.starts_with(prefix)).count()
    }
}

pub struct FakeLimiter {
    pub allow: AtomicBool,
    log: CallLog,
}

impl RateLimiter for FakeLimiter {
    fn check(&self, key: &str) -> bool {
        self.log.push(format!("limiter:{key}"));
        self.allow.load(Ordering::SeqCst)
    }
}

#[derive(Clone, Debug)]
pub enum IdentityMode {
    Allow,
    Deny,
    Forbid,
    Down,
}

pub struct FakeIdentity {
    pub mode: Mutex<IdentityMode>,
    pub login_result: Mutex<Result<LoginGrant, LoginError>>,
    pub seen: Mutex<Vec<String>>,
    log: CallLog,
}

#[async_trait]
impl IdentityService for FakeIdentity {
    async fn verify(&self, credential: &Credential) -> Result<Principal, AuthError> {
        self.log.push("identity.verify");
        self.seen.lock().unwrap().push(credential.as_str().to_string());
        match self.mode.lock().unwrap().clone() {
            IdentityMode::Allow => Ok(Principal {
                id: "admin-1".to_string(),
                email: "admin@ainative.studio".to_string(),
                role: Some("admin".to_string()),
            }),
            IdentityMode::Deny => Err(AuthError::Unauthenticated("Invalid or expired token".to_string())),
            IdentityMode::Forbid => Err(AuthError::Forbidden("Insufficient permissions".to_string())),
            IdentityMode::Down => Err(AuthError::Service("Authentication verification timed out".to_string())),
        }
    }

    async fn login(&self, username: &str, _password: &str) -> Result<LoginGrant, LoginError> {
        self.log.push(format!("identity.login:{username}"));
        self.login_result.lock().unwrap().clone()
    }
}

/// In-memory table store that behaves like ZeroDB's equality filter
pub struct FakeTables {
    pub rows: Mutex<HashMap<String, Vec<Value>>>,
    pub inserts: Mutex<Vec<(String, Value)>>,
    pub queries: Mutex<Vec<(String, Map<String, Value>)>>,
    pub fail: AtomicBool,
    pub omit_id: AtomicBool,
    next_id: AtomicUsize,
    log: CallLog,
}

impl FakeTables {
    pub fn seed(&self, table: &str, rows: Vec<Value>) {
        self.rows.lock().unwrap().insert(table.to_string(), rows);
    }

    pub fn inserted(&self) -> Vec<(String, Value)> {
        self.inserts.lock().unwrap().clone()
    }

    pub fn last_query(&self) -> Option<(String, Map<String, Value>)> {
        self.queries.lock().unwrap().last().cloned()
    }
}

#[async_trait]
impl TableStore for FakeTables {
    async fn insert_row(&self, table: &str, record: Value) -> Result<Value, ZeroDbError> {
        self.log.push(format!("tables.insert:{table}"));
        self.inserts.lock().unwrap().push((table.to_string(), record.clone()));
        if self.fail.load(Ordering::SeqCst) {
            return Err(ZeroDbError::Status {
                status: 500,
                body: "boom".to_string(),
            });
        }
        if self.omit_id.load(Ordering::SeqCst) {
            return Ok(Value::Null);
        }

        let id = format!("row-{}", self.next_id.fetch_add(1, Ordering::SeqCst) + 1);
        let mut stored = record;
        stored["id"] = Value::String(id);
        self.rows
            .lock()
            .unwrap()
            .entry(table.to_string())
            .or_default()
            .push(stored.clone());
        Ok(stored)
    }

    async fn query_rows(&self, table: &str, filter: Map<String, Value>) -> Result<Vec<Value>, ZeroDbError> {
        self.log.push(format!("tables.query:{table}"));
        self.queries.lock().unwrap().push((table.to_string(), filter.clone()));
        if self.fail.load(Ordering::SeqCst) {
            return Err(ZeroDbError::Status {
                status: 503,
                body: "unavailable".to_string(),
            });
        }
        let rows = self.rows.lock().unwrap().get(table).cloned().unwrap_or_default();
        Ok(rows
            .into_iter()
            .filter(|row| filter.iter().all(|(k, v)| row.get(k) == Some(v)))
            .collect())
    }
}

pub struct FakeKnowledge {
    pub hits: Mutex<Vec<SearchHit>>,
    pub fail_search: AtomicBool,
    pub fail_memory: AtomicBool,
    pub memories: Mutex<Vec<MemoryEntry>>,
    pub memory_searches: Mutex<Vec<(String, String, usize)>>,
    log: CallLog,
}

#[async_trait]
impl KnowledgeStore for FakeKnowledge {
    async fn upsert_vectors(&self, _collection: &str, vectors: Vec<VectorRecord>) -> Result<Value, ZeroDbError> {
        self.log.push("knowledge.upsert");
        Ok(json!({ "upserted": vectors.len() }))
    }

    async fn search_similar_text(
        &self,
        collection: &str,
        _query: &str,
        top_k: usize,
    ) -> Result<Vec<SearchHit>, ZeroDbError> {
        self.log.push(format!("knowledge.search:{collection}:{top_k}"));
        if self.fail_search.load(Ordering::SeqCst) {
            return Err(ZeroDbError::Status {
                status: 500,
                body: "search down".to_string(),
            });
        }
        Ok(self.hits.lock().unwrap().clone())
    }

    async fn store_memory(&self, entry: &MemoryEntry) -> Result<Value, ZeroDbError> {
        self.log.push("knowledge.store_memory");
        self.memories.lock().unwrap().push(entry.clone());
        if self.fail_memory.load(Ordering::SeqCst) {
            return Err(ZeroDbError::Status {
                status: 500,
                body: "memory down".to_string(),
            });
        }
        Ok(json!({ "stored": true }))
    }

    async fn search_memory(&self, session_id: &str, query: &str, limit: usize) -> Result<Value, ZeroDbError> {
        self.log.push("knowledge.search_memory");
        self.memory_searches
            .lock()
            .unwrap()
            .push((session_id.to_string(), query.to_string(), limit));
        Ok(json!({ "memories": [{ "content": "hi", "session_id": session_id }] }))
    }
}

pub struct FakeMailer {
    pub fail: AtomicBool,
    pub sent: Mutex<Vec<OutgoingEmail>>,
    log: CallLog,
}

#[async_trait]
impl Mailer for FakeMailer {
    async fn send(&self, email: &OutgoingEmail) -> Result<(), MailError> {
        self.log.push("mailer.send");
        self.sent.lock().unwrap().push(email.clone());
        if self.fail.load(Ordering::SeqCst) {
            return Err(MailError::Rejected {
                status: 422,
                body: "invalid from address".to_string(),
            });
        }
        Ok(())
    }
}

pub struct FakeCompletion {
    pub reply: Mutex<Option<String>>,
    pub prompts: Mutex<Vec<Vec<ChatMessage>>>,
    log: CallLog,
}

#[async_trait]
impl ChatCompletion for FakeCompletion {
    async fn complete(&self, messages: &[ChatMessage]) -> Result<String, ChatError> {
        self.log.push("completion.complete");
        self.prompts.lock().unwrap().push(messages.to_vec());
        self.reply.lock().unwrap().clone().ok_or(ChatError::Empty)
    }
}

#[derive(Clone, Debug)]
pub enum PaymentsMode {
    Healthy,
    Unauthorized,
    Failing,
}

pub struct FakePayments {
    pub mode: Mutex<PaymentsMode>,
    pub credentials: Mutex<Vec<String>>,
    pub withdrawals: Mutex<Vec<WithdrawRequest>>,
    pub pages: Mutex<Vec<(u32, u32)>>,
    log: CallLog,
}

impl FakePayments {
    fn check(&self, op: &str, credential: &Credential) -> Result<(), PaymentsError> {
        self.log.push(format!("payments.{op}"));
        self.credentials.lock().unwrap().push(credential.as_str().to_string());
        match self.mode.lock().unwrap().clone() {
            PaymentsMode::Healthy => Ok(()),
            PaymentsMode::Unauthorized => Err(PaymentsError::Unauthorized),
            PaymentsMode::Failing => Err(PaymentsError::Failed {
                operation: match op {
                    "wallet" => agency_api::payments::Operation::FetchWallet,
                    "create_wallet" => agency_api::payments::Operation::CreateWallet,
                    "transactions" => agency_api::payments::Operation::FetchTransactions,
                    "withdraw" => agency_api::payments::Operation::Withdraw,
                    _ => agency_api::payments::Operation::Deposit,
                },
                reason: "HTTP 500".to_string(),
            }),
        }
    }
}

pub fn sample_wallet() -> Wallet {
    Wallet {
        id: "wallet-1".to_string(),
        user_id: "user-1".to_string(),
        balance_usd: Decimal::new(125050, 2),
        kyc_status: KycStatus::Approved,
        created_at: "2026-01-01T00:00:00Z".to_string(),
        updated_at: "2026-01-02T00:00:00Z".to_string(),
    }
}

pub fn sample_transaction(kind: TransactionType, amount: Decimal) -> Transaction {
    Transaction {
        id: "tx-1".to_string(),
        wallet_id: "wallet-1".to_string(),
        transaction_type: kind,
        amount_usd: amount,
        status: TransactionStatus::Pending,
        created_at: "2026-01-03T00:00:00Z".to_string(),
        updated_at: "2026-01-03T00:00:00Z".to_string(),
        description: None,
        metadata: None,
    }
}

#[async_trait]
impl PaymentsApi for FakePayments {
    async fn wallet(&self, credential: &Credential) -> Result<Wallet, PaymentsError> {
        self.check("wallet", credential)?;
        Ok(sample_wallet())
    }

    async fn create_wallet(&self, credential: &Credential) -> Result<Wallet, PaymentsError> {
        self.check("create_wallet", credential)?;
        Ok(sample_wallet())
    }

    async fn transactions(
        &self,
        credential: &Credential,
        page: u32,
        page_size: u32,
    ) -> Result<TransactionPage, PaymentsError> {
        self.check("transactions", credential)?;
        self.pages.lock().unwrap().push((page, page_size));
        Ok(TransactionPage {
            transactions: vec![sample_transaction(TransactionType::Issue, Decimal::new(5000, 2))],
            total: 1,
        })
    }

    async fn withdraw(&self, credential: &Credential, request: &WithdrawRequest) -> Result<Transaction, PaymentsError> {
        self.check("withdraw", credential)?;
        self.withdrawals.lock().unwrap().push(request.clone());
        Ok(sample_transaction(TransactionType::Redeem, request.amount_usd))
    }

    async fn deposit(&self, credential: &Credential, request: &DepositRequest) -> Result<Transaction, PaymentsError> {
        self.check("deposit", credential)?;
        Ok(sample_transaction(TransactionType::Issue, request.amount_usd))
    }
}

/// The real router wired to recording fakes
pub struct TestApp {
    pub config: AppConfig,
    pub log: CallLog,
    pub limiter: Arc<FakeLimiter>,
    pub identity: Arc<FakeIdentity>,
    pub tables: Arc<FakeTables>,
    pub knowledge: Arc<FakeKnowledge>,
    pub mailer: Arc<FakeMailer>,
    pub completion: Arc<FakeCompletion>,
    pub payments: Arc<FakePayments>,
}

impl TestApp {
    pub fn new() -> Self {
        let log = CallLog::default();
        Self {
            config: AppConfig::development(),
            limiter: Arc::new(FakeLimiter {
                allow: AtomicBool::new(true),
                log: log.clone(),
            }),
            identity: Arc::new(FakeIdentity {
                mode: Mutex::new(IdentityMode::Allow),
                login_result: Mutex::new(Ok(LoginGrant {
                    access_token: "eyJsession".to_string(),
                    expires_in: Some(3600),
                })),
                seen: Mutex::new(Vec::new()),
                log: log.clone(),
            }),
            tables: Arc::new(FakeTables {
                rows: Mutex::new(HashMap::new()),
                inserts: Mutex::new(Vec::new()),
                queries: Mutex::new(Vec::new()),
                fail: AtomicBool::new(false),
                omit_id: AtomicBool::new(false),
                next_id: AtomicUsize::new(0),
                log: log.clone(),
            }),
            knowledge: Arc::new(FakeKnowledge {
                hits: Mutex::new(Vec::new()),
                fail_search: AtomicBool::new(false),
                fail_memory: AtomicBool::new(false),
                memories: Mutex::new(Vec::new()),
                memory_searches: Mutex::new(Vec::new()),
                log: log.clone(),
            }),
            mailer: Arc::new(FakeMailer {
                fail: AtomicBool::new(false),
                sent: Mutex::new(Vec::new()),
                log: log.clone(),
            }),
            completion: Arc::new(FakeCompletion {
                reply: Mutex::new(Some("We build RAG systems.".to_string())),
                prompts: Mutex::new(Vec::new()),
                log: log.clone(),
            }),
            payments: Arc::new(FakePayments {
                mode: Mutex::new(PaymentsMode::Healthy),
                credentials: Mutex::new(Vec::new()),
                withdrawals: Mutex::new(Vec::new()),
                pages: Mutex::new(Vec::new()),
                log: log.clone(),
            }),
            log,
        }
    }

    pub fn state(&self) -> AppState {
        AppState {
            config: Arc::new(self.config.clone()),
            limiter: self.limiter.clone(),
            identity: self.identity.clone(),
            tables: self.tables.clone(),
            knowledge: self.knowledge.clone(),
            mailer: self.mailer.clone(),
            completion: self.completion.clone(),
            payments: self.payments.clone(),
        }
    }

    pub fn set_identity(&self, mode: IdentityMode) {
        *self.identity.mode.lock().unwrap() = mode;
    }

    pub fn block_rate_limit(&self) {
        self.limiter.allow.store(false, Ordering::SeqCst);
    }

    pub async fn call(&self, request: Request<Body>) -> (StatusCode, HeaderMap, Value) {
        let response = router(self.state()).oneshot(request).await.unwrap();
        let status = response.status();
        let headers = response.headers().clone();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()))
        };
        (status, headers, body)
    }

    pub async fn send(&self, request: Request<Body>) -> (StatusCode, Value) {
        let (status, _, body) = self.call(request).await;
        (status, body)
    }
}

pub fn get(uri: &str) -> Request<Body> {
    Request::builder().method("GET").uri(uri).body(Body::empty()).unwrap()
}

pub fn authed_get(uri: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .header("authorization", format!("Bearer {JWT}"))
        .body(Body::empty())
        .unwrap()
}

pub fn post_json(uri: &str, body: &Value) -> Request<Body> {
    post_raw(uri, body.to_string())
}

pub fn post_raw(uri: &str, body: impl Into<String>) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.into()))
        .unwrap()
}

pub fn authed_post(uri: &str, body: &Value) -> Request<Body> {
    authed_post_raw(uri, body.to_string())
}

pub fn authed_post_raw(uri: &str, body: impl Into<String>) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .header("authorization", format!("Bearer {JWT}"))
        .body(Body::from(body.into()))
        .unwrap()
}
