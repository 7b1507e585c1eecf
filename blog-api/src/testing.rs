use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::Value;

use crate::error::ApiResult;
use crate::request::RequestDescriptor;
use crate::transport::Transport;

/// Транспорт для тестов: запоминает запросы и отдаёт заранее заданные ответы.
#[derive(Default)]
pub(crate) struct FakeTransport {
    responses: Mutex<VecDeque<ApiResult<Value>>>,
    requests: Mutex<Vec<RequestDescriptor>>,
}

impl FakeTransport {
    pub(crate) fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub(crate) fn respond(&self, result: ApiResult<Value>) {
        self.responses
            .lock()
            .expect("responses lock poisoned")
            .push_back(result);
    }

    pub(crate) fn requests(&self) -> Vec<RequestDescriptor> {
        self.requests
            .lock()
            .expect("requests lock poisoned")
            .clone()
    }

    pub(crate) fn last_request(&self) -> RequestDescriptor {
        self.requests()
            .pop()
            .expect("at least one request must be sent")
    }
}

#[async_trait]
impl Transport for FakeTransport {
    async fn send(&self, request: RequestDescriptor) -> ApiResult<Value> {
        self.requests
            .lock()
            .expect("requests lock poisoned")
            .push(request);
        self.responses
            .lock()
            .expect("responses lock poisoned")
            .pop_front()
            .unwrap_or(Ok(Value::Null))
    }
}
