use std::sync::Arc;
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use tracing::{debug, warn};

use crate::{Notification, NotificationBus, NotificationHandler, Subscription};

/// Handle to control and join a background worker.
#[derive(Debug)]
pub struct WorkerHandle {
    shutdown: mpsc::Sender<()>,
    join: Option<thread::JoinHandle<()>>,
}

impl WorkerHandle {
    /// Request graceful shutdown and wait for the delivery thread to stop.
    ///
    /// Tasks already spawned on the runtime keep running to completion.
    pub fn shutdown(mut self) {
        let _ = self.shutdown.send(());
        if let Some(j) = self.join.take() {
            let _ = j.join();
        }
    }
}

/// Bridges a notification bus onto an async handler.
///
/// - Filters on the delivery thread (cheap, synchronous)
/// - Spawns one runtime task per accepted notification so remote IO never
///   blocks delivery of the next one
/// - Supports graceful shutdown
#[derive(Debug)]
pub struct NotificationWorker;

impl NotificationWorker {
    pub fn spawn<B, H>(
        name: &'static str,
        bus: B,
        handler: Arc<H>,
        runtime: tokio::runtime::Handle,
    ) -> std::io::Result<WorkerHandle>
    where
        B: NotificationBus,
        H: NotificationHandler + 'static,
    {
        let (shutdown_tx, shutdown_rx) = mpsc::channel::<()>();
        let sub = bus.subscribe();

        let join = thread::Builder::new()
            .name(name.to_string())
            .spawn(move || worker_loop(name, sub, shutdown_rx, handler, runtime))?;

        Ok(WorkerHandle {
            shutdown: shutdown_tx,
            join: Some(join),
        })
    }
}

fn worker_loop<H>(
    name: &'static str,
    sub: Subscription,
    shutdown_rx: mpsc::Receiver<()>,
    handler: Arc<H>,
    runtime: tokio::runtime::Handle,
) where
    H: NotificationHandler + 'static,
{
    let tick = Duration::from_millis(250);

    loop {
        if shutdown_rx.try_recv().is_ok() {
            break;
        }

        match sub.recv_timeout(tick) {
            Ok(notification) => dispatch(name, &handler, &runtime, notification),
            Err(mpsc::RecvTimeoutError::Timeout) => continue,
            Err(mpsc::RecvTimeoutError::Disconnected) => {
                warn!(worker = name, "notification bus disconnected; worker stopping");
                break;
            }
        }
    }
}

fn dispatch<H>(
    name: &'static str,
    handler: &Arc<H>,
    runtime: &tokio::runtime::Handle,
    notification: Notification,
) where
    H: NotificationHandler + 'static,
{
    if !handler.wants_notification(notification.kind()) {
        return;
    }

    debug!(
        worker = name,
        event = notification.kind(),
        notification_id = %notification.notification_id(),
        "dispatching notification"
    );

    let handler = Arc::clone(handler);
    runtime.spawn(async move {
        handler.handle(&notification).await;
    });
}
