use std::future::Future;
use std::sync::{Arc, Mutex, OnceLock};

type Subscriber = Arc<dyn Fn(bool) + Send + Sync>;

struct Inner {
    count: usize,
    next_id: u64,
    subscribers: Vec<(u64, Subscriber)>,
}

/// Shared busy/idle broadcaster.
///
/// Counts started-but-unsettled tracked operations and notifies subscribers
/// on edge transitions only (idle -> busy, busy -> idle), never per
/// individual increment while already busy. The counter is mutated only
/// through `track`; wasm is single-threaded, the mutex exists so the same
/// code runs under native unit tests.
#[derive(Clone)]
pub(crate) struct LoadingBus {
    inner: Arc<Mutex<Inner>>,
}

/// Handle returned by `subscribe`. `unsubscribe` removes exactly that
/// callback and is safe to call more than once.
pub(crate) struct Subscription {
    bus: LoadingBus,
    id: u64,
}

impl Subscription {
    pub fn unsubscribe(&self) {
        let mut inner = self.bus.inner.lock().unwrap_or_else(|e| e.into_inner());
        inner.subscribers.retain(|(id, _)| *id != self.id);
    }
}

/// Settles the tracked operation exactly once, whether the wrapped future
/// completes (with any output) or is dropped mid-flight.
struct SettleGuard {
    bus: LoadingBus,
}

impl Drop for SettleGuard {
    fn drop(&mut self) {
        self.bus.settle();
    }
}

impl LoadingBus {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(Inner {
                count: 0,
                next_id: 0,
                subscribers: Vec::new(),
            })),
        }
    }

    pub fn get_loading(&self) -> bool {
        let inner = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        inner.count > 0
    }

    pub fn subscribe(&self, f: impl Fn(bool) + Send + Sync + 'static) -> Subscription {
        let id = {
            let mut inner = self.inner.lock().unwrap_or_else(|e| e.into_inner());
            let id = inner.next_id;
            inner.next_id += 1;
            inner.subscribers.push((id, Arc::new(f)));
            id
        };
        Subscription {
            bus: self.clone(),
            id,
        }
    }

    /// Wrap an async operation. The counter is incremented synchronously
    /// before this returns; the wrapped future's output (including `Err`
    /// payloads) passes through untouched to the awaiter.
    pub fn track<F: Future>(&self, fut: F) -> impl Future<Output = F::Output> {
        self.begin();
        let guard = SettleGuard { bus: self.clone() };
        async move {
            let _guard = guard;
            fut.await
        }
    }

    fn begin(&self) {
        let edge = {
            let mut inner = self.inner.lock().unwrap_or_else(|e| e.into_inner());
            inner.count += 1;
            (inner.count == 1).then(|| Self::snapshot(&inner))
        };
        if let Some(subs) = edge {
            for sub in subs {
                sub(true);
            }
        }
    }

    fn settle(&self) {
        let edge = {
            let mut inner = self.inner.lock().unwrap_or_else(|e| e.into_inner());
            if inner.count == 0 {
                // Already settled; the counter never goes negative.
                return;
            }
            inner.count -= 1;
            (inner.count == 0).then(|| Self::snapshot(&inner))
        };
        if let Some(subs) = edge {
            for sub in subs {
                sub(false);
            }
        }
    }

    // Snapshot outside the lock so callbacks may re-enter the bus.
    fn snapshot(inner: &Inner) -> Vec<Subscriber> {
        inner.subscribers.iter().map(|(_, f)| f.clone()).collect()
    }
}

/// Process-wide instance shared by anything that wants a busy indicator
/// without coupling to a specific caller.
pub(crate) fn global() -> &'static LoadingBus {
    static GLOBAL: OnceLock<LoadingBus> = OnceLock::new();
    GLOBAL.get_or_init(LoadingBus::new)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::pin::pin;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::task::{Context, Poll, RawWaker, RawWakerVTable, Waker};

    fn noop_waker() -> Waker {
        const VTABLE: RawWakerVTable = RawWakerVTable::new(clone, noop, noop, noop);
        fn clone(_: *const ()) -> RawWaker {
            RawWaker::new(std::ptr::null(), &VTABLE)
        }
        fn noop(_: *const ()) {}
        unsafe { Waker::from_raw(RawWaker::new(std::ptr::null(), &VTABLE)) }
    }

    fn poll_once<F: Future>(fut: std::pin::Pin<&mut F>) -> Poll<F::Output> {
        let waker = noop_waker();
        let mut cx = Context::from_waker(&waker);
        fut.poll(&mut cx)
    }

    /// Future that stays pending until its flag is set.
    struct Gate(Arc<AtomicBool>);

    impl Future for Gate {
        type Output = ();

        fn poll(self: std::pin::Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<()> {
            if self.0.load(Ordering::SeqCst) {
                Poll::Ready(())
            } else {
                Poll::Pending
            }
        }
    }

    #[test]
    fn test_loading_reflects_unsettled_count() {
        let bus = LoadingBus::new();
        assert!(!bus.get_loading());

        let open_a = Arc::new(AtomicBool::new(false));
        let open_b = Arc::new(AtomicBool::new(false));
        let mut a = pin!(bus.track(Gate(open_a.clone())));
        let mut b = pin!(bus.track(Gate(open_b.clone())));
        assert!(bus.get_loading());

        assert!(poll_once(a.as_mut()).is_pending());
        assert!(poll_once(b.as_mut()).is_pending());
        assert!(bus.get_loading());

        open_a.store(true, Ordering::SeqCst);
        assert!(poll_once(a.as_mut()).is_ready());
        assert!(bus.get_loading());

        open_b.store(true, Ordering::SeqCst);
        assert!(poll_once(b.as_mut()).is_ready());
        assert!(!bus.get_loading());
    }

    #[test]
    fn test_notifications_fire_on_edges_only() {
        let bus = LoadingBus::new();
        let seen: Arc<Mutex<Vec<bool>>> = Arc::new(Mutex::new(vec![]));
        let seen2 = seen.clone();
        let _sub = bus.subscribe(move |busy| seen2.lock().unwrap().push(busy));

        let open_a = Arc::new(AtomicBool::new(false));
        let open_b = Arc::new(AtomicBool::new(false));
        let mut a = pin!(bus.track(Gate(open_a.clone())));
        let mut b = pin!(bus.track(Gate(open_b.clone())));
        // Second overlapping start must not re-notify.
        assert_eq!(*seen.lock().unwrap(), vec![true]);

        open_a.store(true, Ordering::SeqCst);
        let _ = poll_once(a.as_mut());
        assert_eq!(*seen.lock().unwrap(), vec![true]);

        open_b.store(true, Ordering::SeqCst);
        let _ = poll_once(b.as_mut());
        assert_eq!(*seen.lock().unwrap(), vec![true, false]);
    }

    #[test]
    fn test_subscribers_notified_in_registration_order() {
        let bus = LoadingBus::new();
        let order: Arc<Mutex<Vec<&'static str>>> = Arc::new(Mutex::new(vec![]));
        let o1 = order.clone();
        let o2 = order.clone();
        let _s1 = bus.subscribe(move |_| o1.lock().unwrap().push("first"));
        let _s2 = bus.subscribe(move |_| o2.lock().unwrap().push("second"));

        let mut fut = pin!(bus.track(async {}));
        let _ = poll_once(fut.as_mut());
        assert_eq!(
            *order.lock().unwrap(),
            vec!["first", "second", "first", "second"]
        );
    }

    #[test]
    fn test_error_output_passes_through_and_still_settles() {
        let bus = LoadingBus::new();
        let mut fut = pin!(bus.track(async { Err::<(), &str>("boom") }));
        assert!(bus.get_loading());
        assert_eq!(poll_once(fut.as_mut()), Poll::Ready(Err("boom")));
        assert!(!bus.get_loading());
    }

    #[test]
    fn test_dropped_future_settles_once() {
        let bus = LoadingBus::new();
        let open = Arc::new(AtomicBool::new(false));
        {
            let mut fut = pin!(bus.track(Gate(open.clone())));
            assert!(poll_once(fut.as_mut()).is_pending());
            assert!(bus.get_loading());
        }
        assert!(!bus.get_loading());
    }

    #[test]
    fn test_unsubscribe_is_idempotent() {
        let bus = LoadingBus::new();
        let seen: Arc<Mutex<Vec<bool>>> = Arc::new(Mutex::new(vec![]));
        let seen2 = seen.clone();
        let sub = bus.subscribe(move |busy| seen2.lock().unwrap().push(busy));

        sub.unsubscribe();
        sub.unsubscribe();

        let mut fut = pin!(bus.track(async {}));
        let _ = poll_once(fut.as_mut());
        assert!(seen.lock().unwrap().is_empty());
    }
}
