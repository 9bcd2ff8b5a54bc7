use std::sync::mpsc;
use std::time::Duration;

pub(super) const WORKER_RESULT_POLL_INTERVAL: Duration = Duration::from_millis(24);

/// Runs blocking file work off the GTK thread and hands the result back on the main loop.
pub(super) fn spawn_blocking_io<T, W, H>(task: &'static str, work: W, mut on_result: H)
where
    T: Send + 'static,
    W: FnOnce() -> T + Send + 'static,
    H: FnMut(T) + 'static,
{
    let (tx, rx) = mpsc::channel::<T>();
    tracing::debug!(task, "dispatching blocking io");
    std::thread::spawn(move || {
        let result = work();
        let _ = tx.send(result);
    });

    gtk4::glib::timeout_add_local(WORKER_RESULT_POLL_INTERVAL, move || match rx.try_recv() {
        Ok(result) => {
            on_result(result);
            gtk4::glib::ControlFlow::Break
        }
        Err(mpsc::TryRecvError::Empty) => gtk4::glib::ControlFlow::Continue,
        Err(mpsc::TryRecvError::Disconnected) => {
            tracing::warn!(task, "blocking io worker exited without a result");
            gtk4::glib::ControlFlow::Break
        }
    });
}
