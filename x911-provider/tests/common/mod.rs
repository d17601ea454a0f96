//! 共享测试工具和辅助函数

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;
use x911_provider::{
    AccountExecutor, Action, Address911, Arguments, ResponseKind, ResponsePayload, X911Client,
    X911Error,
};

/// 断言 `Option` 为 `Some`，并解包返回内部值（失败则直接让测试失败）。
#[macro_export]
macro_rules! require_some {
    ($expr:expr $(,)?) => {{
        let opt = $expr;
        assert!(opt.is_some(), "expected Some(..), got None");
        let Some(val) = opt else {
            return;
        };
        val
    }};
    ($expr:expr, $($msg:tt)+) => {{
        let opt = $expr;
        assert!(opt.is_some(), "{}", format_args!($($msg)+));
        let Some(val) = opt else {
            return;
        };
        val
    }};
}

/// 断言 `Result` 为 `Ok`，并解包返回内部值（失败则直接让测试失败）。
#[macro_export]
macro_rules! require_ok {
    ($expr:expr $(,)?) => {{
        let res = $expr;
        assert!(res.is_ok(), "expected Ok(..), got {res:?}");
        let Ok(val) = res else {
            return;
        };
        val
    }};
    ($expr:expr, $($msg:tt)+) => {{
        let res = $expr;
        assert!(
            res.is_ok(),
            "{}: {res:?}",
            format_args!($($msg)+)
        );
        let Ok(val) = res else {
            return;
        };
        val
    }};
}

/// 一次 executor 调用的记录
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedCall {
    pub action: Action,
    pub response_kind: ResponseKind,
    pub arguments: Arguments,
}

/// 记录所有调用并按顺序回放预设响应的 executor
///
/// 预设响应耗尽后返回空 payload。
#[derive(Default)]
pub struct RecordingExecutor {
    calls: Mutex<Vec<RecordedCall>>,
    replies: Mutex<VecDeque<Result<ResponsePayload, X911Error>>>,
}

impl RecordingExecutor {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// 追加一个成功响应（必须是 JSON 对象）
    pub async fn reply(&self, payload: serde_json::Value) {
        let map = payload.as_object().cloned().unwrap_or_default();
        self.replies.lock().await.push_back(Ok(map));
    }

    /// 追加一个失败响应
    pub async fn fail(&self, err: X911Error) {
        self.replies.lock().await.push_back(Err(err));
    }

    pub async fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().await.clone()
    }

    pub async fn call_count(&self) -> usize {
        self.calls.lock().await.len()
    }
}

#[async_trait]
impl AccountExecutor for RecordingExecutor {
    async fn execute(
        &self,
        action: Action,
        response_kind: ResponseKind,
        arguments: &Arguments,
    ) -> Result<ResponsePayload, X911Error> {
        self.calls.lock().await.push(RecordedCall {
            action,
            response_kind,
            arguments: arguments.clone(),
        });
        self.replies
            .lock()
            .await
            .pop_front()
            .unwrap_or_else(|| Ok(ResponsePayload::new()))
    }
}

/// 测试用生产环境客户端
pub fn production_client() -> (X911Client<Arc<RecordingExecutor>>, Arc<RecordingExecutor>) {
    let executor = RecordingExecutor::new();
    (X911Client::new(Arc::clone(&executor)), executor)
}

pub const TEST_DID: &str = "2065551234";

pub fn test_address() -> Address911 {
    Address911 {
        address1: "400 Broad St".to_string(),
        address2: "Suite 100".to_string(),
        city: "Seattle".to_string(),
        state: "WA".to_string(),
        zip: "98109".to_string(),
        plus_four: "4607".to_string(),
        caller_name: "Space Needle".to_string(),
    }
}

/// 参数 key 排序后返回，便于比较
pub fn sorted_keys(arguments: &Arguments) -> Vec<&str> {
    arguments.keys().map(String::as_str).collect()
}

/// 期望的 key 集合（排序）
pub fn expected_keys(keys: &[&'static str]) -> Vec<&'static str> {
    let mut keys = keys.to_vec();
    keys.sort_unstable();
    keys
}
