use std::fmt;
use std::sync::Arc;

use crate::interaction::PointerEvent;

/// Pure function extracting one value from a record and its index.
///
/// Any `Fn(&T) -> V` converts into an accessor; use [`Accessor::indexed`]
/// when the index matters.
pub struct Accessor<T, V> {
    inner: Arc<dyn Fn(&T, usize) -> V + Send + Sync>,
}

impl<T, V> Accessor<T, V> {
    pub fn new(f: impl Fn(&T) -> V + Send + Sync + 'static) -> Self {
        Self {
            inner: Arc::new(move |datum, _| f(datum)),
        }
    }

    pub fn indexed(f: impl Fn(&T, usize) -> V + Send + Sync + 'static) -> Self {
        Self { inner: Arc::new(f) }
    }

    #[must_use]
    pub fn get(&self, datum: &T, index: usize) -> V {
        (self.inner)(datum, index)
    }
}

impl<T, V: Clone + Send + Sync + 'static> Accessor<T, V> {
    pub fn constant(value: V) -> Self {
        Self {
            inner: Arc::new(move |_, _| value.clone()),
        }
    }
}

impl<T, V> Clone for Accessor<T, V> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T, V> fmt::Debug for Accessor<T, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Accessor(..)")
    }
}

impl<T, V, F> From<F> for Accessor<T, V>
where
    F: Fn(&T) -> V + Send + Sync + 'static,
{
    fn from(f: F) -> Self {
        Self::new(f)
    }
}

/// Shape fill: one constant for every shape, or computed per record.
///
/// `None` leaves the fill to the stylesheet.
pub enum Fill<T> {
    Constant(Option<String>),
    Computed(Accessor<T, Option<String>>),
}

impl<T> Fill<T> {
    pub fn from_fn(f: impl Fn(&T) -> Option<String> + Send + Sync + 'static) -> Self {
        Self::Computed(Accessor::new(f))
    }

    /// Constants are wrapped into a constant accessor.
    #[must_use]
    pub fn into_accessor(self) -> Accessor<T, Option<String>> {
        match self {
            Self::Constant(value) => Accessor::constant(value),
            Self::Computed(accessor) => accessor,
        }
    }
}

impl<T> Default for Fill<T> {
    fn default() -> Self {
        Self::Constant(None)
    }
}

impl<T> From<&str> for Fill<T> {
    fn from(value: &str) -> Self {
        Self::Constant(Some(value.to_owned()))
    }
}

impl<T> From<String> for Fill<T> {
    fn from(value: String) -> Self {
        Self::Constant(Some(value))
    }
}

impl<T> From<Option<String>> for Fill<T> {
    fn from(value: Option<String>) -> Self {
        Self::Constant(value)
    }
}

impl<T> From<Accessor<T, Option<String>>> for Fill<T> {
    fn from(accessor: Accessor<T, Option<String>>) -> Self {
        Self::Computed(accessor)
    }
}

/// Pointer callback receiving the triggering event and the bound record.
pub type PointerHandler<T> = Arc<dyn Fn(&PointerEvent, &T) + Send + Sync>;

/// Hover-enter, hover-exit and click callbacks of one chart.
pub struct PointerCallbacks<T> {
    pub over: Option<PointerHandler<T>>,
    pub out: Option<PointerHandler<T>>,
    pub click: Option<PointerHandler<T>>,
}

impl<T> Default for PointerCallbacks<T> {
    fn default() -> Self {
        Self {
            over: None,
            out: None,
            click: None,
        }
    }
}

impl<T> Clone for PointerCallbacks<T> {
    fn clone(&self) -> Self {
        Self {
            over: self.over.clone(),
            out: self.out.clone(),
            click: self.click.clone(),
        }
    }
}
