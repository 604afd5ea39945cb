//! The single subscription stream

use pubsub_tui_client::{HandleId, SubscriptionHandle};

use crate::message::StreamEvent;
use crate::model::App;
use crate::task::Task;

/// Starts streaming `name`, stopping whatever was streaming before.
///
/// Re-selecting the subscription already being streamed does nothing.
pub fn start_subscription(app: &mut App, name: String, topic: String) -> Vec<Task> {
    if app.active_subscription() == Some(name.as_str()) {
        return Vec::new();
    }

    if let Some(mut previous) = app.stream.take() {
        if previous.stop() {
            app.activity.info(format!(
                "Stopped previous subscription: {}",
                previous.subscription()
            ));
        }
    }

    let mut handle = SubscriptionHandle::new(name.clone(), app.receive_settings)
        .with_tracker(app.ack_flushers.clone());
    let (Some(worker), Some(poller)) = (handle.start(&app.stream_scope), handle.poller()) else {
        handle.stop();
        app.activity
            .error(format!("Could not start subscription: {name}"));
        return Vec::new();
    };

    app.stream = Some(handle);
    app.subscriptions.set_active(Some(name.clone()));
    app.subscriber.attach(&name, &topic);
    app.activity.network(format!("Started subscription: {name}"));

    vec![Task::RunStream(worker), Task::PollStream(poller)]
}

/// Stops the stream on request and clears both subscription panels.
pub fn stop_subscription(app: &mut App) -> Vec<Task> {
    let Some(mut handle) = app.stream.take() else {
        return Vec::new();
    };
    handle.stop();
    app.subscriptions.set_active(None);
    app.subscriber.detach();
    app.activity
        .info(format!("Stopped subscription: {}", handle.subscription()));
    Vec::new()
}

/// Stops the stream for shutdown. Nothing is logged to the activity panel.
pub fn shutdown(app: &mut App) {
    if let Some(mut handle) = app.stream.take() {
        handle.stop();
    }
}

pub fn on_event(app: &mut App, id: HandleId, event: StreamEvent) -> Vec<Task> {
    if app.stream.as_ref().map(SubscriptionHandle::id) != Some(id) {
        log::debug!("Discarding event from stale stream {id}: {event:?}");
        return Vec::new();
    }

    match event {
        StreamEvent::Delivery(msg) => {
            app.subscriber.push(msg);
            rearm(app)
        }
        StreamEvent::Error(err) => {
            app.subscriber.set_error(err.to_string());
            app.activity.error(format!("Subscription error: {err}"));
            rearm(app)
        }
        StreamEvent::Closed => {
            end_stream(app);
            Vec::new()
        }
        StreamEvent::Cancelled => {
            log::debug!("Poll for stream {id} cancelled");
            Vec::new()
        }
        StreamEvent::WorkerExited(exit) => {
            log::debug!("Stream {id} worker exited: {exit:?}");
            Vec::new()
        }
        StreamEvent::Failed(detail) => {
            app.activity.error(format!("Subscription stream failed: {detail}"));
            end_stream(app);
            Vec::new()
        }
    }
}

fn rearm(app: &App) -> Vec<Task> {
    app.stream
        .as_ref()
        .and_then(SubscriptionHandle::poller)
        .map(Task::PollStream)
        .into_iter()
        .collect()
}

/// The stream ended by itself. Received messages stay on screen; the
/// user restarts by selecting the subscription again.
fn end_stream(app: &mut App) {
    let Some(mut handle) = app.stream.take() else {
        return;
    };
    handle.stop();
    app.subscriptions.set_active(None);
    app.subscriber.disconnect();
    app.activity.warning(format!(
        "Stream ended for {}; select the subscription to restart",
        handle.subscription()
    ));
}
