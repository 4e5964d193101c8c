// Copyright 2025 Kirky.X
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use std::convert::Infallible;
use std::sync::Arc;

use axum::extract::{Extension, Path};
use axum::response::sse::{Event, KeepAlive, Sse};
use futures::{Stream, StreamExt};

use crate::infrastructure::events::{EventChannel, EventStream};
use crate::presentation::errors::AppError;

/// 会话事件流端点
///
/// 以SSE转发指定会话的事件。终止事件（complete或error）
/// 发出后流立即结束，订阅随之释放
pub async fn stream_session(
    Extension(events): Extension<Arc<dyn EventChannel>>,
    Path(session_id): Path<String>,
) -> Result<Sse<impl Stream<Item = Result<Event, Infallible>>>, AppError> {
    let stream = events.subscribe(&session_id).await?;
    Ok(Sse::new(forward_until_terminal(stream)).keep_alive(KeepAlive::default()))
}

/// 将会话事件流转换为SSE帧流，终止事件后结束
fn forward_until_terminal(
    stream: EventStream,
) -> impl Stream<Item = Result<Event, Infallible>> {
    futures::stream::unfold((stream, false), |(mut stream, done)| async move {
        if done {
            return None;
        }
        loop {
            let event = stream.next().await?;
            let terminal = event.is_terminal();
            // 无法序列化的事件跳过，不中断流
            let Ok(data) = serde_json::to_string(&event) else {
                continue;
            };
            return Some((Ok(Event::default().data(data)), (stream, terminal)));
        }
    })
}
