//! 测试用的内存批处理服务
#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;
use futures::stream;
use serde_json::json;
use tokio::time::Instant;

use context_batch::clients::jsonl::jsonl_records;
use context_batch::clients::{BatchApi, BetaFeature, ResultStream};
use context_batch::models::{BatchJob, Message, MessageParams, ProcessingStatus, SubRequest};
use context_batch::ApiError;

pub const BATCH_ID: &str = "msgbatch_01HkcTjaV5uDC8jWR4ZsDV8d";

/// 调用记录
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    CreateMessage {
        params: MessageParams,
        features: Vec<BetaFeature>,
    },
    CreateBatch {
        count: usize,
        features: Vec<BetaFeature>,
    },
    Retrieve {
        batch_id: String,
        at: Instant,
    },
    StreamResults {
        batch_id: String,
    },
}

/// 一次 retrieve 的返回
#[derive(Debug, Clone, Copy)]
pub enum Step {
    Status(ProcessingStatus),
    /// ended 但没有结果地址
    EndedWithoutResults,
    Error,
}

type Answer = Box<dyn Fn(&SubRequest) -> String + Send + Sync>;

pub struct MockBatchApi {
    calls: Mutex<Vec<Call>>,
    submitted: Mutex<Vec<SubRequest>>,
    steps: Mutex<VecDeque<Step>>,
    created_status: ProcessingStatus,
    warm_fails: bool,
    submit_fails: bool,
    stream_open_fails: bool,
    stream_breaks: bool,
    result_lines: Vec<String>,
    answer: Option<Answer>,
}

impl MockBatchApi {
    pub fn new() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            submitted: Mutex::new(Vec::new()),
            steps: Mutex::new(VecDeque::new()),
            created_status: ProcessingStatus::Created,
            warm_fails: false,
            submit_fails: false,
            stream_open_fails: false,
            stream_breaks: false,
            result_lines: Vec::new(),
            answer: None,
        }
    }

    /// 依次返回的 retrieve 结果，用完后一直返回 in_progress
    pub fn with_steps(self, steps: &[Step]) -> Self {
        *self.steps.lock().unwrap() = steps.iter().copied().collect();
        self
    }

    pub fn with_created_status(mut self, status: ProcessingStatus) -> Self {
        self.created_status = status;
        self
    }

    pub fn failing_warm(mut self) -> Self {
        self.warm_fails = true;
        self
    }

    pub fn failing_submit(mut self) -> Self {
        self.submit_fails = true;
        self
    }

    /// 打开结果流时失败
    pub fn failing_stream_open(mut self) -> Self {
        self.stream_open_fails = true;
        self
    }

    /// 结果行发送完后连接中断
    pub fn breaking_stream(mut self) -> Self {
        self.stream_breaks = true;
        self
    }

    /// 结果流原样返回这些行
    pub fn with_result_lines(mut self, lines: Vec<String>) -> Self {
        self.result_lines = lines;
        self
    }

    /// 根据提交的子请求生成结果，逆序返回
    pub fn answering(mut self, answer: impl Fn(&SubRequest) -> String + Send + Sync + 'static) -> Self {
        self.answer = Some(Box::new(answer));
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn submitted(&self) -> Vec<SubRequest> {
        self.submitted.lock().unwrap().clone()
    }

    pub fn retrieve_times(&self) -> Vec<Instant> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                Call::Retrieve { at, .. } => Some(at),
                _ => None,
            })
            .collect()
    }

    pub fn count(&self, pred: impl Fn(&Call) -> bool) -> usize {
        self.calls().iter().filter(|c| pred(c)).count()
    }

    fn record(&self, call: Call) {
        self.calls.lock().unwrap().push(call);
    }

    fn unavailable(endpoint: &str) -> ApiError {
        ApiError::Status {
            endpoint: endpoint.to_string(),
            status: 529,
            body: r#"{"type":"error","error":{"type":"overloaded_error"}}"#.to_string(),
        }
    }
}

pub fn job(status: ProcessingStatus, with_results: bool) -> BatchJob {
    let results_url = with_results.then(|| format!("https://api.anthropic.com/v1/messages/batches/{}/results", BATCH_ID));
    serde_json::from_value(json!({
        "id": BATCH_ID,
        "type": "message_batch",
        "processing_status": status,
        "results_url": results_url,
    }))
    .unwrap()
}

/// 一条成功结果的 JSONL 行
pub fn result_line(custom_id: &str, answer: &str) -> String {
    json!({
        "custom_id": custom_id,
        "result": {
            "type": "succeeded",
            "message": {
                "id": format!("msg_{}", custom_id),
                "type": "message",
                "role": "assistant",
                "content": [{ "type": "text", "text": answer }],
                "stop_reason": "end_turn",
                "usage": { "input_tokens": 12, "output_tokens": 8, "cache_read_input_tokens": 2048 }
            }
        }
    })
    .to_string()
}

#[async_trait]
impl BatchApi for MockBatchApi {
    async fn create_message(
        &self,
        params: &MessageParams,
        features: &[BetaFeature],
    ) -> Result<Message, ApiError> {
        self.record(Call::CreateMessage {
            params: params.clone(),
            features: features.to_vec(),
        });
        if self.warm_fails {
            return Err(Self::unavailable("/v1/messages"));
        }
        Ok(serde_json::from_value(json!({
            "id": "msg_warm",
            "type": "message",
            "model": params.model,
            "content": [{ "type": "text", "text": "A" }],
            "usage": { "input_tokens": 3, "output_tokens": 1, "cache_creation_input_tokens": 2048 }
        }))
        .unwrap())
    }

    async fn create_batch(
        &self,
        requests: &[SubRequest],
        features: &[BetaFeature],
    ) -> Result<BatchJob, ApiError> {
        self.record(Call::CreateBatch {
            count: requests.len(),
            features: features.to_vec(),
        });
        if self.submit_fails {
            return Err(ApiError::Status {
                endpoint: "/v1/messages/batches".to_string(),
                status: 401,
                body: "invalid x-api-key".to_string(),
            });
        }
        *self.submitted.lock().unwrap() = requests.to_vec();
        let status = self.created_status;
        Ok(job(status, status == ProcessingStatus::Ended))
    }

    async fn retrieve_batch(&self, batch_id: &str) -> Result<BatchJob, ApiError> {
        self.record(Call::Retrieve {
            batch_id: batch_id.to_string(),
            at: Instant::now(),
        });
        let step = self
            .steps
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Step::Status(ProcessingStatus::InProgress));
        match step {
            Step::Status(status) => Ok(job(status, status == ProcessingStatus::Ended)),
            Step::EndedWithoutResults => Ok(job(ProcessingStatus::Ended, false)),
            Step::Error => Err(Self::unavailable(batch_id)),
        }
    }

    async fn stream_batch_results(&self, batch_id: &str) -> Result<ResultStream, ApiError> {
        self.record(Call::StreamResults {
            batch_id: batch_id.to_string(),
        });
        if self.stream_open_fails {
            return Err(Self::unavailable(batch_id));
        }

        let lines: Vec<String> = match &self.answer {
            Some(answer) => self
                .submitted()
                .iter()
                .rev()
                .map(|request| result_line(&request.custom_id, &answer(request)))
                .collect(),
            None => self.result_lines.clone(),
        };

        let mut chunks: Vec<Result<String, ApiError>> =
            lines.into_iter().map(|line| Ok(line + "\n")).collect();
        if self.stream_breaks {
            chunks.push(Err(ApiError::Status {
                endpoint: batch_id.to_string(),
                status: 502,
                body: "connection reset by peer".to_string(),
            }));
        }
        Ok(jsonl_records(stream::iter(chunks), batch_id, |e| e))
    }
}
