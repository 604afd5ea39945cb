//! Task executor

use std::sync::Arc;

use pubsub_tui_client::{HandleId, PubSubClient};
use tokio::sync::mpsc::UnboundedSender;
use tokio::task::{JoinError, JoinHandle};
use tokio_util::sync::CancellationToken;
use tracing::Instrument;

use super::Task;
use crate::backend::{list_json_files, read_template};
use crate::message::{
    AppMessage, StreamEvent, SubscriptionResult, TaskKind, TaskResult, TemplateResult,
    TopicResult,
};

/// Runs tasks on the tokio runtime and reports each result to the inbox.
pub struct TaskExecutor {
    client: Arc<dyn PubSubClient>,
    inbox: UnboundedSender<AppMessage>,
    root: CancellationToken,
}

impl TaskExecutor {
    pub fn new(client: Arc<dyn PubSubClient>, inbox: UnboundedSender<AppMessage>) -> Self {
        Self {
            client,
            inbox,
            root: CancellationToken::new(),
        }
    }

    /// Parent token; cancelled by [`Self::shutdown`].
    pub fn root(&self) -> &CancellationToken {
        &self.root
    }

    pub fn spawn(&self, task: Task) -> JoinHandle<()> {
        let kind = task.kind();
        let stream = task.stream_handle();
        let observes = task.observes_cancellation();
        let client = self.client.clone();
        let inbox = self.inbox.clone();
        let token = self.root.child_token();

        log::debug!("Spawning task {kind:?}");

        tokio::spawn(async move {
            // Nested so a panic surfaces as a JoinError instead of a lost result.
            let mut work = tokio::spawn(execute(task, client));

            let result = if observes {
                joined(kind, stream, (&mut work).await)
            } else {
                tokio::select! {
                    biased;
                    () = token.cancelled() => {
                        work.abort();
                        TaskResult::Cancelled(kind)
                    }
                    outcome = &mut work => joined(kind, stream, outcome),
                }
            };

            if inbox.send(result.into()).is_err() {
                log::debug!("Inbox closed; dropping result of {kind:?}");
            }
        }
        .instrument(tracing::debug_span!("task", kind = %kind)))
    }

    pub fn shutdown(&self) {
        log::info!("Cancelling outstanding tasks");
        self.root.cancel();
    }
}

fn joined(
    kind: TaskKind,
    stream: Option<HandleId>,
    outcome: Result<TaskResult, JoinError>,
) -> TaskResult {
    match outcome {
        Ok(result) => result,
        Err(e) => {
            let detail = if e.is_panic() {
                "task panicked".to_string()
            } else {
                "task aborted".to_string()
            };
            log::error!("{kind} failed: {detail}");
            match stream {
                Some(handle) => TaskResult::Stream {
                    handle,
                    event: StreamEvent::Failed(detail),
                },
                None => TaskResult::Failed { task: kind, detail },
            }
        }
    }
}

async fn execute(task: Task, client: Arc<dyn PubSubClient>) -> TaskResult {
    match task {
        Task::LoadTopics => TaskResult::Topics(TopicResult::Listed(client.list_topics().await)),
        Task::CreateTopic(name) => {
            let result = client.create_topic(&name).await;
            TaskResult::Topics(TopicResult::Created { name, result })
        }
        Task::DeleteTopic(name) => {
            let result = client.delete_topic(&name).await;
            TaskResult::Topics(TopicResult::Deleted { name, result })
        }
        Task::LoadSubscriptions => TaskResult::Subscriptions(SubscriptionResult::Listed(
            client.list_subscriptions().await,
        )),
        Task::CreateSubscription { name, topic } => {
            let result = client.create_subscription(&name, &topic).await;
            TaskResult::Subscriptions(SubscriptionResult::Created { name, result })
        }
        Task::DeleteSubscription(name) => {
            let result = client.delete_subscription(&name).await;
            TaskResult::Subscriptions(SubscriptionResult::Deleted { name, result })
        }
        Task::Publish {
            topic,
            payload,
            attributes,
        } => TaskResult::Published(client.publish(&topic, payload, attributes).await),
        Task::LoadTemplates(dir) => TaskResult::Templates(TemplateResult::Listed(
            list_json_files(&dir).await.map_err(|e| format!("{}: {e}", dir.display())),
        )),
        Task::ReadTemplate(path) => {
            let result = read_template(&path).await.map_err(|e| e.to_string());
            TaskResult::Templates(TemplateResult::Loaded { path, result })
        }
        Task::RunStream(worker) => {
            let handle = worker.handle_id();
            let exit = worker.run(client).await;
            TaskResult::Stream {
                handle,
                event: StreamEvent::WorkerExited(exit),
            }
        }
        Task::PollStream(poller) => {
            let handle = poller.handle_id();
            let event = poller.next().await.into();
            TaskResult::Stream { handle, event }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;
    use std::time::Duration;

    use pubsub_tui_client::{
        InMemoryPubSub, ReceiveSettings, StreamExit, SubscriptionHandle,
    };
    use tokio::sync::mpsc;

    use super::*;

    async fn next_result(rx: &mut mpsc::UnboundedReceiver<AppMessage>) -> TaskResult {
        match tokio::time::timeout(Duration::from_secs(5), rx.recv()).await {
            Ok(Some(AppMessage::Result(result))) => result,
            other => panic!("expected a task result, got {other:?}"),
        }
    }

    fn executor() -> (TaskExecutor, Arc<InMemoryPubSub>, mpsc::UnboundedReceiver<AppMessage>) {
        let broker = Arc::new(InMemoryPubSub::new("test"));
        let (tx, rx) = mpsc::unbounded_channel();
        (TaskExecutor::new(broker.clone(), tx), broker, rx)
    }

    #[tokio::test]
    async fn each_task_yields_exactly_one_result() {
        let (executor, broker, mut rx) = executor();
        broker.create_topic("orders").await.unwrap();

        executor.spawn(Task::LoadTopics).await.unwrap();

        match next_result(&mut rx).await {
            TaskResult::Topics(TopicResult::Listed(Ok(topics))) => {
                assert_eq!(topics.len(), 1);
                assert_eq!(topics[0].name, "orders");
            }
            other => panic!("unexpected {other:?}"),
        }
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn errors_travel_inside_the_result() {
        let (executor, _broker, mut rx) = executor();
        executor.spawn(Task::DeleteTopic("missing".into()));

        match next_result(&mut rx).await {
            TaskResult::Topics(TopicResult::Deleted { name, result }) => {
                assert_eq!(name, "missing");
                assert!(result.is_err());
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[tokio::test]
    async fn shutdown_cancels_plain_tasks() {
        let (executor, _broker, mut rx) = executor();
        executor.shutdown();
        executor.spawn(Task::LoadSubscriptions);

        assert!(matches!(
            next_result(&mut rx).await,
            TaskResult::Cancelled(TaskKind::LoadSubscriptions)
        ));
    }

    #[tokio::test]
    async fn stream_tasks_deliver_and_stop() {
        let (executor, broker, mut rx) = executor();
        broker.create_topic("orders").await.unwrap();
        broker.create_subscription("orders-sub", "orders").await.unwrap();

        let scope = executor.root().child_token();
        let mut handle = SubscriptionHandle::new("orders-sub", ReceiveSettings::default());
        let worker = handle.start(&scope).unwrap();
        let poller = handle.poller().unwrap();
        let id = handle.id();

        executor.spawn(Task::RunStream(worker));
        executor.spawn(Task::PollStream(poller));
        broker
            .publish("orders", b"{}".to_vec(), BTreeMap::new())
            .await
            .unwrap();

        match next_result(&mut rx).await {
            TaskResult::Stream {
                handle: got,
                event: StreamEvent::Delivery(msg),
            } => {
                assert_eq!(got, id);
                assert!(msg.acknowledge());
            }
            other => panic!("unexpected {other:?}"),
        }

        assert!(handle.stop());
        match next_result(&mut rx).await {
            TaskResult::Stream {
                event: StreamEvent::WorkerExited(exit),
                ..
            } => assert_eq!(exit, StreamExit::Cancelled),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[tokio::test]
    async fn panicking_stream_task_reports_its_handle() {
        let handle = SubscriptionHandle::new("orders-sub", ReceiveSettings::default());
        let panicked = tokio::spawn(async { panic!("relay blew up") })
            .await
            .unwrap_err();

        match joined(TaskKind::PollStream, Some(handle.id()), Err(panicked)) {
            TaskResult::Stream {
                handle: got,
                event: StreamEvent::Failed(detail),
            } => {
                assert_eq!(got, handle.id());
                assert_eq!(detail, "task panicked");
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[tokio::test]
    async fn panicking_plain_task_reports_its_kind() {
        let panicked = tokio::spawn(async { panic!("listing blew up") })
            .await
            .unwrap_err();

        assert!(matches!(
            joined(TaskKind::LoadTopics, None, Err(panicked)),
            TaskResult::Failed {
                task: TaskKind::LoadTopics,
                ..
            }
        ));
    }
}
