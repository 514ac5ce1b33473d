//! Snapshot cells backing every console store.
//!
//! State lives inside a `tokio::sync::watch` channel: readers borrow or clone
//! a snapshot, views subscribe to a receiver and re-read on change. A
//! mutation runs to completion under the channel's write lock before any
//! receiver is woken.

use tokio::sync::watch;

#[derive(Debug)]
pub struct Observable<S> {
    tx: watch::Sender<S>,
}

impl<S: Clone> Observable<S> {
    pub fn new(initial: S) -> Self {
        let (tx, _rx) = watch::channel(initial);
        Self { tx }
    }

    /// Owned copy of the current state.
    pub fn snapshot(&self) -> S {
        self.tx.borrow().clone()
    }

    /// Read through a borrow without cloning the whole state.
    pub fn read<R>(&self, f: impl FnOnce(&S) -> R) -> R {
        f(&self.tx.borrow())
    }

    pub fn subscribe(&self) -> watch::Receiver<S> {
        self.tx.subscribe()
    }

    /// Apply `f` and notify subscribers.
    pub fn mutate<R>(&self, f: impl FnOnce(&mut S) -> R) -> R {
        let mut output = None;
        self.tx.send_modify(|state| output = Some(f(state)));
        match output {
            Some(value) => value,
            None => unreachable!("watch::Sender::send_modify runs its closure exactly once"),
        }
    }

    /// Apply `f`; subscribers are notified only when it returns `true`.
    pub fn mutate_if(&self, f: impl FnOnce(&mut S) -> bool) -> bool {
        self.tx.send_if_modified(f)
    }

    /// Run `f` against a draft copy and publish the draft only on success.
    /// A failing closure leaves the state untouched and notifies nobody.
    pub fn try_mutate<R, E>(&self, f: impl FnOnce(&mut S) -> Result<R, E>) -> Result<R, E> {
        let mut output = None;
        self.tx.send_if_modified(|state| {
            let mut draft = state.clone();
            let result = f(&mut draft);
            let commit = result.is_ok();
            if commit {
                *state = draft;
            }
            output = Some(result);
            commit
        });
        match output {
            Some(result) => result,
            None => unreachable!("watch::Sender::send_if_modified runs its closure exactly once"),
        }
    }

    /// Replace the state wholesale and notify subscribers.
    pub fn replace(&self, state: S) -> S {
        self.tx.send_replace(state)
    }
}

impl<S: Clone + Default> Default for Observable<S> {
    fn default() -> Self {
        Self::new(S::default())
    }
}
