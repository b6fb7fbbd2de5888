use std::fmt;
use std::time::Duration;

/// Label of a timed task.
///
/// A computed label is asked for the start trace with `None` and for the end
/// trace with the task's result.
pub enum Label<T> {
    Text(String),
    Computed(Box<dyn Fn(Option<&T>) -> String + Send + Sync>),
}

impl<T> Label<T> {
    pub fn computed<F>(producer: F) -> Self
    where
        F: Fn(Option<&T>) -> String + Send + Sync + 'static,
    {
        Self::Computed(Box::new(producer))
    }

    pub(crate) fn resolve(&self, result: Option<&T>) -> String {
        match self {
            Self::Text(text) => text.clone(),
            Self::Computed(producer) => producer(result),
        }
    }
}

impl<T> From<&str> for Label<T> {
    fn from(text: &str) -> Self {
        Self::Text(text.to_string())
    }
}

impl<T> From<String> for Label<T> {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

impl<T> fmt::Debug for Label<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(text) => f.debug_tuple("Text").field(text).finish(),
            Self::Computed(_) => f.write_str("Computed(..)"),
        }
    }
}

/// Formats an elapsed time: whole milliseconds below one second, seconds
/// with two decimals from there on.
pub fn format_elapsed(elapsed: Duration) -> String {
    let millis = elapsed.as_millis();
    if millis < 1000 {
        format!("{millis}ms")
    } else {
        format!("{:.2}s", elapsed.as_secs_f64())
    }
}
