//! Lifecycle tracking for a single asynchronous operation.
//!
//! An [`AsyncResource`] runs a caller-supplied operation and records its
//! loading, data and error state. It is single-threaded: state lives behind
//! `Rc`/`RefCell` and every write happens on the task that drives the
//! invocation future.
//!
//! Overlapping invocations are gated by sequence number. Each call to
//! [`AsyncResource::execute`] takes the next number, and only the most
//! recently issued invocation may write `data`/`error` or release
//! `loading`. A superseded invocation still hands its own result back to
//! whoever awaits it.

mod message;

pub use message::{FALLBACK_MESSAGE, FailureMessage, display_message};

use futures::FutureExt;
use futures::future::LocalBoxFuture;
use std::cell::{Cell, RefCell};
use std::future::Future;
use std::rc::Rc;

type Operation<T, E> = Rc<dyn Fn() -> LocalBoxFuture<'static, Result<T, E>>>;

/// Where a resource is in its request lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    /// No invocation has started yet.
    #[default]
    Idle,
    Pending,
    Success,
    Error,
}

/// A point-in-time copy of the observable fields.
#[derive(Debug, Clone, PartialEq)]
pub struct ResourceState<T> {
    pub data: Option<T>,
    pub loading: bool,
    pub error: Option<String>,
    pub phase: Phase,
}

impl<T> Default for ResourceState<T> {
    fn default() -> Self {
        Self {
            data: None,
            loading: false,
            error: None,
            phase: Phase::Idle,
        }
    }
}

/// Runs an operation and tracks its in-flight, success and failure state.
///
/// `D` is the dependency set. With `auto_run` enabled, the first call to
/// [`sync_dependencies`](Self::sync_dependencies) and every later call with
/// a different value (compared with `PartialEq`, entry by entry for tuples
/// and vectors) starts a new invocation.
///
/// Cloning is cheap and yields a handle to the same resource.
pub struct AsyncResource<T, E, D = ()> {
    inner: Rc<Inner<T, E, D>>,
}

impl<T, E, D> Clone for AsyncResource<T, E, D> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

struct Inner<T, E, D> {
    state: RefCell<ResourceState<T>>,
    operation: RefCell<Operation<T, E>>,
    deps: RefCell<Option<D>>,
    auto_run: bool,
    issued: Cell<u64>,
    disposed: Cell<bool>,
    listener: RefCell<Option<Rc<dyn Fn()>>>,
}

impl<T, E, D> Inner<T, E, D> {
    fn is_current(&self, seq: u64) -> bool {
        !self.disposed.get() && self.issued.get() == seq
    }

    /// Apply a state change and notify the listener outside of the borrow.
    fn update(&self, f: impl FnOnce(&mut ResourceState<T>)) {
        if self.disposed.get() {
            return;
        }
        f(&mut self.state.borrow_mut());
        let listener = self.listener.borrow().clone();
        if let Some(listener) = listener {
            listener();
        }
    }
}

impl<T, E, D> AsyncResource<T, E, D>
where
    T: 'static,
    E: 'static,
    D: 'static,
{
    pub fn new<F, Fut>(operation: F, auto_run: bool) -> Self
    where
        F: Fn() -> Fut + 'static,
        Fut: Future<Output = Result<T, E>> + 'static,
    {
        Self {
            inner: Rc::new(Inner {
                state: RefCell::new(ResourceState::default()),
                operation: RefCell::new(boxed(operation)),
                deps: RefCell::new(None),
                auto_run,
                issued: Cell::new(0),
                disposed: Cell::new(false),
                listener: RefCell::new(None),
            }),
        }
    }

    /// Swap the operation without starting an invocation.
    pub fn replace_operation<F, Fut>(&self, operation: F)
    where
        F: Fn() -> Fut + 'static,
        Fut: Future<Output = Result<T, E>> + 'static,
    {
        *self.inner.operation.borrow_mut() = boxed(operation);
    }

    /// Register the single change listener, replacing any previous one.
    pub fn set_listener(&self, listener: impl Fn() + 'static) {
        *self.inner.listener.borrow_mut() = Some(Rc::new(listener));
    }

    /// Stop all further state writes and notifications.
    ///
    /// In-flight invocations keep running and still resolve for their
    /// callers, but their outcome is dropped.
    pub fn dispose(&self) {
        self.inner.disposed.set(true);
        self.inner.listener.borrow_mut().take();
    }

    pub fn is_disposed(&self) -> bool {
        self.inner.disposed.get()
    }

    pub fn loading(&self) -> bool {
        self.inner.state.borrow().loading
    }

    pub fn error(&self) -> Option<String> {
        self.inner.state.borrow().error.clone()
    }

    pub fn phase(&self) -> Phase {
        self.inner.state.borrow().phase
    }

    /// Number of invocations started so far.
    pub fn invocations(&self) -> u64 {
        self.inner.issued.get()
    }
}

impl<T: Clone, E, D> AsyncResource<T, E, D> {
    pub fn data(&self) -> Option<T> {
        self.inner.state.borrow().data.clone()
    }

    pub fn snapshot(&self) -> ResourceState<T> {
        self.inner.state.borrow().clone()
    }
}

impl<T, E, D> AsyncResource<T, E, D>
where
    T: Clone + 'static,
    E: FailureMessage + 'static,
    D: 'static,
{
    /// Start an invocation.
    ///
    /// The invocation begins immediately: `loading` is set and `error`
    /// cleared before this returns. The returned future runs the operation
    /// and yields its result unchanged, so a failure is both recorded for
    /// display and handed back to the caller.
    pub fn execute(&self) -> LocalBoxFuture<'static, Result<T, E>> {
        let seq = self.inner.issued.get() + 1;
        self.inner.issued.set(seq);
        tracing::debug!(seq, "starting invocation");

        let guard = LoadingGuard::acquire(Rc::clone(&self.inner), seq);
        let operation = Rc::clone(&self.inner.operation.borrow());
        let invocation = operation();

        async move {
            let result = invocation.await;
            guard.settle(&result);
            result
        }
        .boxed_local()
    }

    /// Manual re-run, identical to [`execute`](Self::execute).
    pub fn refetch(&self) -> LocalBoxFuture<'static, Result<T, E>> {
        self.execute()
    }
}

impl<T, E, D> AsyncResource<T, E, D>
where
    T: Clone + 'static,
    E: FailureMessage + 'static,
    D: PartialEq + 'static,
{
    /// Record the current dependency values.
    ///
    /// Returns an invocation when the resource auto-runs and this is either
    /// the first activation or a change from the stored values.
    pub fn sync_dependencies(
        &self,
        deps: D,
    ) -> Option<LocalBoxFuture<'static, Result<T, E>>> {
        let changed = {
            let mut current = self.inner.deps.borrow_mut();
            let changed = current.as_ref() != Some(&deps);
            if changed {
                *current = Some(deps);
            }
            changed
        };

        if changed && self.inner.auto_run && !self.inner.disposed.get() {
            Some(self.execute())
        } else {
            None
        }
    }
}

fn boxed<T, E, F, Fut>(operation: F) -> Operation<T, E>
where
    F: Fn() -> Fut + 'static,
    Fut: Future<Output = Result<T, E>> + 'static,
{
    Rc::new(move || operation().boxed_local())
}

/// Holds the in-flight flag for one invocation.
///
/// Dropping the guard without settling (the invocation future was dropped)
/// still clears `loading` if this invocation is the current one.
struct LoadingGuard<T, E, D> {
    inner: Rc<Inner<T, E, D>>,
    seq: u64,
    settled: Cell<bool>,
}

impl<T, E, D> LoadingGuard<T, E, D> {
    fn acquire(inner: Rc<Inner<T, E, D>>, seq: u64) -> Self {
        inner.update(|state| {
            state.loading = true;
            state.error = None;
            state.phase = Phase::Pending;
        });
        Self {
            inner,
            seq,
            settled: Cell::new(false),
        }
    }
}

impl<T: Clone, E: FailureMessage, D> LoadingGuard<T, E, D> {
    fn settle(&self, result: &Result<T, E>) {
        self.settled.set(true);
        if !self.inner.is_current(self.seq) {
            tracing::warn!(
                seq = self.seq,
                latest = self.inner.issued.get(),
                "discarding result of superseded invocation"
            );
            return;
        }

        match result {
            Ok(value) => {
                tracing::debug!(seq = self.seq, "invocation succeeded");
                self.inner.update(|state| {
                    state.data = Some(value.clone());
                    state.error = None;
                    state.loading = false;
                    state.phase = Phase::Success;
                });
            }
            Err(e) => {
                let message = display_message(e);
                tracing::debug!(seq = self.seq, %message, "invocation failed");
                self.inner.update(|state| {
                    state.error = Some(message);
                    state.loading = false;
                    state.phase = Phase::Error;
                });
            }
        }
    }
}

impl<T, E, D> Drop for LoadingGuard<T, E, D> {
    fn drop(&mut self) {
        if self.settled.get() || !self.inner.is_current(self.seq) {
            return;
        }
        tracing::debug!(seq = self.seq, "invocation dropped before settling");
        self.inner.update(|state| {
            state.loading = false;
            state.phase = if state.data.is_some() {
                Phase::Success
            } else {
                Phase::Idle
            };
        });
    }
}
