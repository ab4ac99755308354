//! User callbacks invoked on rollover

use std::fmt;
use std::sync::Arc;

/// Zero-argument callback run from the rollover interrupt
///
/// Runs in interrupt context: it must return quickly and must not
/// reconfigure the timer that invoked it.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use std::sync::atomic::{AtomicU32, Ordering};
/// use hardware_timer::TimerCallback;
///
/// struct Blinker {
///     toggles: AtomicU32,
/// }
///
/// impl Blinker {
///     fn toggle(&self) {
///         self.toggles.fetch_add(1, Ordering::Relaxed);
///     }
/// }
///
/// let blinker = Arc::new(Blinker { toggles: AtomicU32::new(0) });
/// let callback = TimerCallback::bound(blinker.clone(), Blinker::toggle);
/// callback.invoke();
/// assert_eq!(blinker.toggles.load(Ordering::Relaxed), 1);
/// ```
#[derive(Clone)]
pub struct TimerCallback {
    func: Arc<dyn Fn() + Send + Sync>,
}

impl TimerCallback {
    /// Wraps a closure or function
    pub fn new<F>(func: F) -> Self
    where
        F: Fn() + Send + Sync + 'static,
    {
        Self {
            func: Arc::new(func),
        }
    }

    /// Binds a method to an object kept alive by the callback
    pub fn bound<T>(target: Arc<T>, method: fn(&T)) -> Self
    where
        T: Send + Sync + 'static,
    {
        Self::new(move || method(&target))
    }

    /// Runs the callback
    #[inline]
    pub fn invoke(&self) {
        (self.func)()
    }
}

impl fmt::Debug for TimerCallback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TimerCallback").finish_non_exhaustive()
    }
}
