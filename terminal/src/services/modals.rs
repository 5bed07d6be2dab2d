//! Modal coordinator: the ordered list of open modals.
//!
//! Opening never deduplicates; closing removes every occurrence.

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Modal {
    ConnectWallet,
    Settings,
    SwapSettings,
    TokenSelect,
    MarketSelect,
    Geobanned,
}

#[derive(Debug, Clone, Default)]
pub struct ModalCoordinator {
    open: Vec<Modal>,
}

impl ModalCoordinator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn open(&mut self, modal: Modal) {
        self.open.push(modal);
    }

    pub fn close(&mut self, modal: Modal) {
        self.open.retain(|m| *m != modal);
    }

    pub fn is_open(&self, modal: Modal) -> bool {
        self.open.contains(&modal)
    }

    /// Open modals in the order they were opened.
    pub fn open_modals(&self) -> &[Modal] {
        &self.open
    }

    pub fn top(&self) -> Option<Modal> {
        self.open.last().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_appends_duplicates() {
        let mut modals = ModalCoordinator::new();
        modals.open(Modal::Settings);
        modals.open(Modal::TokenSelect);
        modals.open(Modal::Settings);
        assert_eq!(
            modals.open_modals(),
            &[Modal::Settings, Modal::TokenSelect, Modal::Settings]
        );
        assert_eq!(modals.top(), Some(Modal::Settings));
    }

    #[test]
    fn test_close_removes_all_occurrences() {
        let mut modals = ModalCoordinator::new();
        modals.open(Modal::Settings);
        modals.open(Modal::Geobanned);
        modals.open(Modal::Settings);

        modals.close(Modal::Settings);
        assert!(!modals.is_open(Modal::Settings));
        assert_eq!(modals.open_modals(), &[Modal::Geobanned]);

        // Closing an absent modal is a no-op
        modals.close(Modal::MarketSelect);
        assert_eq!(modals.open_modals(), &[Modal::Geobanned]);
    }
}
