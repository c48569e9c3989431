use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use searchd::server::pool::{PoolError, WorkerPool};
use searchd::server::shutdown::Shutdown;
use tokio::sync::{Notify, oneshot};

#[tokio::test]
async fn test_pool_runs_every_task() {
    let pool = WorkerPool::new(4, 16);
    let counter = Arc::new(AtomicUsize::new(0));
    let (done_tx, mut done_rx) = tokio::sync::mpsc::channel(32);

    for _ in 0..20 {
        let counter = Arc::clone(&counter);
        let done_tx = done_tx.clone();
        pool.dispatch(async move {
            counter.fetch_add(1, Ordering::SeqCst);
            let _ = done_tx.send(()).await;
        })
        .await
        .unwrap();
    }

    for _ in 0..20 {
        done_rx.recv().await.unwrap();
    }
    assert_eq!(counter.load(Ordering::SeqCst), 20);
    assert_eq!(pool.size(), 4);

    pool.shutdown().await;
    pool.join().await;
}

#[tokio::test]
async fn test_pool_queue_is_bounded() {
    let pool = WorkerPool::new(1, 1);
    let gate = Arc::new(Notify::new());
    let (started_tx, started_rx) = oneshot::channel();

    let g = Arc::clone(&gate);
    pool.dispatch(async move {
        let _ = started_tx.send(());
        g.notified().await;
    })
    .await
    .unwrap();
    started_rx.await.unwrap();

    // The only worker is busy: one task fits in the queue, the next does not.
    pool.try_dispatch(async {}).unwrap();
    assert_eq!(pool.try_dispatch(async {}), Err(PoolError::Full));

    gate.notify_one();
    pool.shutdown().await;
    pool.join().await;
}

#[tokio::test]
async fn test_pool_refuses_tasks_after_shutdown() {
    let pool = WorkerPool::new(2, 4);

    pool.shutdown().await;

    assert_eq!(pool.dispatch(async {}).await, Err(PoolError::Closed));
    assert_eq!(pool.try_dispatch(async {}), Err(PoolError::Closed));

    tokio::time::timeout(Duration::from_secs(5), pool.join())
        .await
        .expect("workers should exit after shutdown");
}

#[tokio::test]
async fn test_shutdown_drops_in_flight_task() {
    let pool = WorkerPool::new(1, 1);
    let (started_tx, started_rx) = oneshot::channel();
    let (held_tx, held_rx) = oneshot::channel::<()>();

    // Never completes on its own, like a keep-alive client that stays silent.
    pool.dispatch(async move {
        let _held = held_tx;
        let _ = started_tx.send(());
        std::future::pending::<()>().await;
    })
    .await
    .unwrap();
    started_rx.await.unwrap();

    pool.shutdown().await;

    tokio::time::timeout(Duration::from_secs(5), pool.join())
        .await
        .expect("workers should not wait for in-flight tasks");
    assert!(held_rx.await.is_err(), "in-flight task should have been dropped");
}

#[test]
#[should_panic]
fn test_pool_rejects_zero_workers() {
    let rt = tokio::runtime::Runtime::new().unwrap();
    rt.block_on(async {
        let _ = WorkerPool::new(0, 1);
    });
}

#[tokio::test]
async fn test_shutdown_broadcast() {
    let shutdown = Shutdown::new();
    let mut a = shutdown.subscribe();
    let mut b = shutdown.subscribe();
    assert_eq!(shutdown.receiver_count(), 2);

    shutdown.trigger();

    assert!(a.recv().await.is_ok());
    assert!(b.recv().await.is_ok());
}
