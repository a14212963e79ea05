//! Observable values shared between the UI thread and worker threads.

use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

type Listener<T> = Arc<dyn Fn(&T) + Send + Sync>;

struct Inner<T> {
    value: Mutex<T>,
    changed: Condvar,
    listeners: Mutex<Vec<Listener<T>>>,
}

/// A value that notifies subscribers when it changes.
///
/// Clones share the same value. Listeners run on the thread that performed
/// the write, after the value lock has been released.
pub struct Property<T> {
    inner: Arc<Inner<T>>,
}

impl<T> Clone for Property<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

fn relock<G>(result: Result<G, PoisonError<G>>) -> G {
    result.unwrap_or_else(PoisonError::into_inner)
}

impl<T: Clone + PartialEq + Send + 'static> Property<T> {
    pub fn new(value: T) -> Self {
        Self {
            inner: Arc::new(Inner {
                value: Mutex::new(value),
                changed: Condvar::new(),
                listeners: Mutex::new(Vec::new()),
            }),
        }
    }

    fn value(&self) -> MutexGuard<'_, T> {
        relock(self.inner.value.lock())
    }

    pub fn get(&self) -> T {
        self.value().clone()
    }

    /// Store a new value. Returns `true` and notifies listeners only if the
    /// value actually changed.
    pub fn set(&self, value: T) -> bool {
        {
            let mut current = self.value();
            if *current == value {
                return false;
            }
            *current = value.clone();
        }
        self.inner.changed.notify_all();

        let listeners: Vec<Listener<T>> = relock(self.inner.listeners.lock()).clone();
        for listener in listeners {
            listener(&value);
        }
        true
    }

    pub fn subscribe(&self, listener: impl Fn(&T) + Send + Sync + 'static) {
        relock(self.inner.listeners.lock()).push(Arc::new(listener));
    }

    /// Block until `predicate` holds or `timeout` elapses. Returns whether
    /// the predicate held. Must not be called on the thread that performs
    /// the write being waited for.
    pub fn wait_until(&self, predicate: impl Fn(&T) -> bool, timeout: Duration) -> bool {
        let deadline = Instant::now() + timeout;
        let mut current = self.value();
        while !predicate(&current) {
            let now = Instant::now();
            if now >= deadline {
                return false;
            }
            let (guard, _) = relock(self.inner.changed.wait_timeout(current, deadline - now));
            current = guard;
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_set_notifies_only_on_change() {
        let prop = Property::new(false);
        let hits = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&hits);
        prop.subscribe(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        assert!(prop.set(true));
        assert!(!prop.set(true));
        assert!(prop.set(false));
        assert_eq!(hits.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_clones_share_value() {
        let prop = Property::new(String::new());
        let other = prop.clone();
        other.set("hello".to_string());
        assert_eq!(prop.get(), "hello");
    }

    #[test]
    fn test_listener_may_read_property() {
        let prop = Property::new(1);
        let seen = Arc::new(AtomicUsize::new(0));
        let (p, s) = (prop.clone(), Arc::clone(&seen));
        prop.subscribe(move |_| {
            s.store(p.get(), Ordering::SeqCst);
        });
        prop.set(7);
        assert_eq!(seen.load(Ordering::SeqCst), 7);
    }

    #[test]
    fn test_wait_until_sees_write_from_other_thread() {
        let prop = Property::new(false);
        let writer = prop.clone();
        let handle = std::thread::spawn(move || {
            std::thread::sleep(Duration::from_millis(20));
            writer.set(true);
        });
        assert!(prop.wait_until(|v| *v, Duration::from_secs(5)));
        handle.join().unwrap();
    }

    #[test]
    fn test_wait_until_times_out() {
        let prop = Property::new(false);
        assert!(!prop.wait_until(|v| *v, Duration::from_millis(10)));
    }
}
