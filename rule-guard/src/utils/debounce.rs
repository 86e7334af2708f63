use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::trace;

type Callback<A> = Box<dyn Fn(A) + Send + Sync>;

struct DebounceState {
    generation: u64,
    timer: Option<JoinHandle<()>>,
}

struct Inner<A> {
    func: Callback<A>,
    wait: Duration,
    immediate: bool,
    state: Mutex<DebounceState>,
}

impl<A> Inner<A> {
    fn state(&self) -> MutexGuard<'_, DebounceState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Collapses bursts of calls into a single invocation.
///
/// Every [`call`](Debounce::call) cancels the pending timer and starts a new
/// one of `wait`. In trailing mode the wrapped function runs once the timer
/// elapses, with the arguments of the most recent call. In immediate mode the
/// first call of a quiet window runs synchronously and the rest of the window
/// is suppressed.
///
/// Timers run on the tokio runtime, so `call` must be made from within one.
///
/// ```rust
/// use rule_guard::utils::debounce;
/// use std::sync::atomic::{AtomicUsize, Ordering};
/// use std::sync::Arc;
/// use std::time::Duration;
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let hits = Arc::new(AtomicUsize::new(0));
/// let counter = Arc::clone(&hits);
/// let validate = debounce(
///     move |_: String| {
///         counter.fetch_add(1, Ordering::SeqCst);
///     },
///     Duration::from_millis(20),
///     false,
/// );
///
/// validate.call("a".to_string());
/// validate.call("ab".to_string());
/// tokio::time::sleep(Duration::from_millis(60)).await;
/// assert_eq!(hits.load(Ordering::SeqCst), 1);
/// # }
/// ```
pub struct Debounce<A> {
    inner: Arc<Inner<A>>,
}

impl<A> Clone for Debounce<A> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<A> Debounce<A> {
    /// Cancels the pending trailing call, if any.
    pub fn cancel(&self) {
        let mut state = self.inner.state();
        state.generation = state.generation.wrapping_add(1);
        if let Some(timer) = state.timer.take() {
            timer.abort();
        }
    }

    /// Returns true while a wait window is open.
    pub fn is_pending(&self) -> bool {
        self.inner.state().timer.is_some()
    }
}

impl<A> std::fmt::Debug for Debounce<A> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Debounce")
            .field("wait", &self.inner.wait)
            .field("immediate", &self.inner.immediate)
            .field("pending", &self.is_pending())
            .finish()
    }
}

impl<A: Send + 'static> Debounce<A> {
    /// Wraps `func` with the given wait window.
    pub fn new<F>(func: F, wait: Duration, immediate: bool) -> Self
    where
        F: Fn(A) + Send + Sync + 'static,
    {
        Self {
            inner: Arc::new(Inner {
                func: Box::new(func),
                wait,
                immediate,
                state: Mutex::new(DebounceState {
                    generation: 0,
                    timer: None,
                }),
            }),
        }
    }

    /// Records an invocation, rescheduling the trailing call.
    pub fn call(&self, args: A) {
        let immediate = self.inner.immediate;
        let mut state = self.inner.state();
        let call_now = immediate && state.timer.is_none();

        if let Some(timer) = state.timer.take() {
            timer.abort();
        }
        state.generation = state.generation.wrapping_add(1);
        let generation = state.generation;

        let (now_args, trailing_args) = match (immediate, call_now) {
            (false, _) => (None, Some(args)),
            (true, true) => (Some(args), None),
            (true, false) => (None, None),
        };

        let inner = Arc::clone(&self.inner);
        state.timer = Some(tokio::spawn(async move {
            tokio::time::sleep(inner.wait).await;
            {
                let mut state = inner.state();
                if state.generation != generation {
                    return;
                }
                state.timer = None;
            }
            if let Some(args) = trailing_args {
                trace!("Debounce window elapsed, invoking trailing call");
                (inner.func)(args);
            }
        }));
        drop(state);

        if let Some(args) = now_args {
            (self.inner.func)(args);
        }
    }
}

/// Creates a [`Debounce`] wrapper around `func`.
pub fn debounce<A, F>(func: F, wait: Duration, immediate: bool) -> Debounce<A>
where
    A: Send + 'static,
    F: Fn(A) + Send + Sync + 'static,
{
    Debounce::new(func, wait, immediate)
}
