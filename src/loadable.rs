//! Explicit state for data that a page depends on.

use std::fmt::Display;

/// A piece of data that is still loading, failed to load, or is ready.
///
/// Pages load each of their data sources (transactions, accounts,
/// categories) into a `Loadable` and render each state on its own, so one
/// failed source does not blank the whole page.
#[derive(Debug, Clone, PartialEq)]
pub enum Loadable<T> {
    /// The data has been requested but has not arrived yet.
    Loading,
    /// The data could not be loaded. Holds a message safe to show users.
    Failed(String),
    /// The data is available.
    Ready(T),
}

impl<T> Loadable<T> {
    /// Wrap the result of loading `source`, e.g. "transactions".
    ///
    /// Errors are logged and replaced with a generic message naming `source`.
    pub fn from_result<E: Display>(result: Result<T, E>, source: &str) -> Self {
        match result {
            Ok(value) => Self::Ready(value),
            Err(error) => {
                tracing::error!("could not load {source}: {error}");
                Self::Failed(format!("Could not load {source}."))
            }
        }
    }

    /// Borrow the data inside.
    pub fn as_ref(&self) -> Loadable<&T> {
        match self {
            Self::Loading => Loadable::Loading,
            Self::Failed(message) => Loadable::Failed(message.clone()),
            Self::Ready(value) => Loadable::Ready(value),
        }
    }

    /// Transform the data if it is ready.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Loadable<U> {
        match self {
            Self::Loading => Loadable::Loading,
            Self::Failed(message) => Loadable::Failed(message),
            Self::Ready(value) => Loadable::Ready(f(value)),
        }
    }

    /// Combine two sources that are needed together.
    ///
    /// The result is ready only when both are. A failure takes precedence
    /// over loading, and the first failure is kept.
    pub fn zip<U>(self, other: Loadable<U>) -> Loadable<(T, U)> {
        match (self, other) {
            (Self::Ready(a), Loadable::Ready(b)) => Loadable::Ready((a, b)),
            (Self::Failed(message), _) | (_, Loadable::Failed(message)) => {
                Loadable::Failed(message)
            }
            _ => Loadable::Loading,
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::Error;

    use super::Loadable;

    #[test]
    fn from_result_hides_error_details() {
        let loadable: Loadable<u32> =
            Loadable::from_result(Err(Error::DatabaseLockError), "accounts");

        assert_eq!(loadable, Loadable::Failed("Could not load accounts.".to_owned()));
    }

    #[test]
    fn from_result_keeps_value() {
        let loadable = Loadable::from_result(Ok::<_, Error>(3), "accounts");

        assert_eq!(loadable, Loadable::Ready(3));
    }

    #[test]
    fn map_only_touches_ready_values() {
        assert_eq!(Loadable::Ready(2).map(|n| n * 2), Loadable::Ready(4));
        assert_eq!(
            Loadable::<u32>::Failed("x".to_owned()).map(|n| n * 2),
            Loadable::Failed("x".to_owned())
        );
    }

    #[test]
    fn zip_needs_both_ready() {
        assert_eq!(
            Loadable::Ready(1).zip(Loadable::Ready("a")),
            Loadable::Ready((1, "a"))
        );
        assert_eq!(
            Loadable::Ready(1).zip(Loadable::<&str>::Loading),
            Loadable::Loading
        );
    }

    #[test]
    fn zip_prefers_first_failure() {
        let got = Loadable::<u32>::Loading.zip(Loadable::<u32>::Failed("second".to_owned()));
        assert_eq!(got, Loadable::Failed("second".to_owned()));

        let got = Loadable::<u32>::Failed("first".to_owned())
            .zip(Loadable::<u32>::Failed("second".to_owned()));
        assert_eq!(got, Loadable::Failed("first".to_owned()));
    }
}
