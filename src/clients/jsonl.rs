//! JSONL 结果流解析
//!
//! 字节块按到达顺序拼接，每凑满一行就产出一条记录；下游不拉取时不会继续读取。

use futures::stream::{self, BoxStream, StreamExt};

use crate::clients::batch_api::ResultStream;
use crate::error::ApiError;
use crate::models::ResultRecord;

struct LineState<B, E, F> {
    inner: BoxStream<'static, Result<B, E>>,
    buffer: Vec<u8>,
    finished: bool,
    endpoint: String,
    map_err: F,
}

/// 把字节流转换为逐行解析的结果流
///
/// - 空行被跳过
/// - 无法解析的行产出 `ApiError::Decode`，之后的行继续解析
/// - 底层读取错误产出一次后结束
pub fn jsonl_records<S, B, E, F>(inner: S, endpoint: impl Into<String>, map_err: F) -> ResultStream
where
    S: futures::Stream<Item = Result<B, E>> + Send + 'static,
    B: AsRef<[u8]> + Send + 'static,
    E: Send + 'static,
    F: Fn(E) -> ApiError + Send + Sync + 'static,
{
    let state = LineState {
        inner: inner.boxed(),
        buffer: Vec::new(),
        finished: false,
        endpoint: endpoint.into(),
        map_err,
    };

    stream::unfold(state, |mut state| async move {
        loop {
            if let Some(pos) = state.buffer.iter().position(|b| *b == b'\n') {
                let line: Vec<u8> = state.buffer.drain(..=pos).collect();
                match parse_line(&line, &state.endpoint) {
                    Some(item) => return Some((item, state)),
                    None => continue,
                }
            }

            if state.finished {
                let rest = std::mem::take(&mut state.buffer);
                return parse_line(&rest, &state.endpoint).map(|item| (item, state));
            }

            match state.inner.next().await {
                Some(Ok(chunk)) => state.buffer.extend_from_slice(chunk.as_ref()),
                Some(Err(e)) => {
                    state.finished = true;
                    state.buffer.clear();
                    let err = (state.map_err)(e);
                    return Some((Err(err), state));
                }
                None => state.finished = true,
            }
        }
    })
    .boxed()
}

fn parse_line(line: &[u8], endpoint: &str) -> Option<Result<ResultRecord, ApiError>> {
    let trimmed = line.trim_ascii();
    if trimmed.is_empty() {
        return None;
    }
    Some(
        serde_json::from_slice(trimmed).map_err(|source| ApiError::Decode {
            what: format!("{} 返回的结果行", endpoint),
            source,
        }),
    )
}
