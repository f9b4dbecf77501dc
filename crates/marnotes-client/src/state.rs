//! Per-operation fetch state.
//!
//! Every logical fetch (listing documents, loading one document) owns a
//! [`FetchState`] slot. A slot starts [`Idle`](FetchState::Idle), moves to
//! [`Loading`](FetchState::Loading) when a request starts, and to
//! [`Success`](FetchState::Success) or [`Error`](FetchState::Error) when it
//! settles. Starting a new request from any state supersedes the old one.
//!
//! Requests are not fenced: whichever result is settled last is what the
//! slot holds, regardless of the order the requests were issued in.

use std::fmt::Display;

/// State of one logical fetch operation.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum FetchState<T> {
    #[default]
    Idle,
    Loading,
    Success(T),
    /// User-visible failure message.
    Error(String),
}

impl<T> FetchState<T> {
    /// Mark a request as started, discarding any previous result.
    pub fn begin(&mut self) {
        *self = Self::Loading;
    }

    /// Drop back to idle.
    pub fn reset(&mut self) {
        *self = Self::Idle;
    }

    /// Settle the slot with a request outcome. Errors are flattened into a
    /// message prefixed with `context`.
    pub fn settle<E: Display>(&mut self, context: &str, result: Result<T, E>) {
        *self = match result {
            Ok(value) => Self::Success(value),
            Err(e) => Self::Error(format!("{context}: {e}")),
        };
    }

    pub fn is_idle(&self) -> bool {
        matches!(self, Self::Idle)
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }

    pub fn value(&self) -> Option<&T> {
        match self {
            Self::Success(v) => Some(v),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Error(msg) => Some(msg),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_idle() {
        let state: FetchState<u8> = FetchState::default();
        assert!(state.is_idle());
        assert!(state.value().is_none());
        assert!(state.error().is_none());
    }

    #[test]
    fn begin_then_success() {
        let mut state = FetchState::default();
        state.begin();
        assert!(state.is_loading());
        state.settle::<String>("ctx", Ok(7));
        assert_eq!(state, FetchState::Success(7));
        assert_eq!(state.value(), Some(&7));
    }

    #[test]
    fn error_message_carries_context() {
        let mut state: FetchState<u8> = FetchState::default();
        state.begin();
        state.settle("failed to fetch documents", Err("HTTP error, status: 500"));
        assert_eq!(
            state.error(),
            Some("failed to fetch documents: HTTP error, status: 500")
        );
    }

    #[test]
    fn reentrant_from_every_state() {
        let mut state: FetchState<u8> = FetchState::Success(1);
        state.begin();
        assert!(state.is_loading());

        state.settle("ctx", Err("boom"));
        state.begin();
        assert!(state.is_loading());

        state.begin();
        assert!(state.is_loading());
    }

    #[test]
    fn last_settle_wins() {
        let mut state = FetchState::default();
        state.begin();
        state.begin();
        state.settle::<&str>("ctx", Ok("second"));
        state.settle::<&str>("ctx", Ok("first"));
        assert_eq!(state.value(), Some(&"first"));
    }
}
