//! Unit tests for the recurring refresh jobs.

#[cfg(test)]
mod poller_tests {
    use crate::poller::Poller;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use std::time::Duration;

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_poller_fires_and_cancels() {
        let poller = Poller::start().await.unwrap();
        let ticks = Arc::new(AtomicUsize::new(0));

        let counter = ticks.clone();
        let handle = poller
            .every("test", Duration::from_secs(1), move || {
                let counter = counter.clone();
                async move {
                    counter.fetch_add(1, Ordering::SeqCst);
                }
            })
            .await
            .unwrap();

        tokio::time::sleep(Duration::from_millis(3500)).await;
        let fired = ticks.load(Ordering::SeqCst);
        assert!(fired >= 1, "expected at least one tick, got {}", fired);

        handle.cancel().await.unwrap();
        let at_cancel = ticks.load(Ordering::SeqCst);
        tokio::time::sleep(Duration::from_millis(2500)).await;
        // A tick already dispatched at cancel time may still land
        assert!(ticks.load(Ordering::SeqCst) <= at_cancel + 1);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_poller_handles_are_distinct() {
        let poller = Poller::start().await.unwrap();
        let a = poller.every("a", Duration::from_secs(300), || async {}).await.unwrap();
        let b = poller.every("b", Duration::from_secs(300), || async {}).await.unwrap();

        assert_ne!(a.id(), b.id());
        a.cancel().await.unwrap();
        b.cancel().await.unwrap();
    }
}
