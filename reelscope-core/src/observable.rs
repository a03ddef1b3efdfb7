use tokio::sync::watch;

/// Receiving end handed to views. `changed().await` wakes on every publish.
pub type Subscription<T> = watch::Receiver<T>;

/// Latest-value state cell that components publish into.
///
/// Only the owning component mutates it; everyone else subscribes or takes a
/// snapshot.
#[derive(Debug)]
pub struct Observable<T> {
    sender: watch::Sender<T>,
}

impl<T: Clone> Observable<T> {
    pub fn new(initial: T) -> Self {
        let (sender, _) = watch::channel(initial);
        Self { sender }
    }

    pub fn subscribe(&self) -> Subscription<T> {
        self.sender.subscribe()
    }

    pub fn snapshot(&self) -> T {
        self.sender.borrow().clone()
    }

    pub fn read<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&self.sender.borrow())
    }

    pub(crate) fn set(&self, value: T) {
        self.sender.send_replace(value);
    }

    pub(crate) fn update(&self, f: impl FnOnce(&mut T)) {
        self.sender.send_modify(f);
    }

    /// Subscribers are only notified when `f` returns `true`.
    pub(crate) fn update_if(&self, f: impl FnOnce(&mut T) -> bool) -> bool {
        self.sender.send_if_modified(f)
    }
}

impl<T: Clone + Default> Default for Observable<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn subscribers_see_updates() {
        let cell = Observable::new(0u32);
        let mut rx = cell.subscribe();
        cell.update(|v| *v += 2);
        rx.changed().await.unwrap();
        assert_eq!(*rx.borrow(), 2);
    }

    #[test]
    fn rejected_update_does_not_notify() {
        let cell = Observable::new(String::from("a"));
        let rx = cell.subscribe();
        assert!(!cell.update_if(|_| false));
        assert!(!rx.has_changed().unwrap());
        assert_eq!(cell.snapshot(), "a");
    }
}
