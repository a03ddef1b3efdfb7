use std::sync::Arc;

use parking_lot::RwLock;

/// Language every catalog request is issued in.
///
/// Passed explicitly to the client and shared by clone; replacing the code
/// affects every request issued afterwards.
#[derive(Debug, Clone)]
pub struct LocaleContext {
    code: Arc<RwLock<String>>,
}

impl LocaleContext {
    pub fn new(code: impl Into<String>) -> Self {
        Self {
            code: Arc::new(RwLock::new(code.into())),
        }
    }

    pub fn current(&self) -> String {
        self.code.read().clone()
    }

    /// Returns `false` when `code` was already active.
    pub fn replace(&self, code: impl Into<String>) -> bool {
        let code = code.into();
        let mut guard = self.code.write();
        if *guard == code {
            return false;
        }
        *guard = code;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clones_share_the_active_code() {
        let locale = LocaleContext::new("tr-TR");
        let handle = locale.clone();
        assert!(locale.replace("en-US"));
        assert_eq!(handle.current(), "en-US");
        assert!(!handle.replace("en-US"));
    }
}
