//! Side effects rendered to the terminal.

use std::sync::atomic::{AtomicBool, Ordering};

use forkful_client::{Effects, Notification, NotificationKind, View};

/// Prints notifications and navigation; defers reloads to the command.
///
/// A terminal has no view to throw away, so `reload` only records the
/// request and the running command re-fetches once it has its result.
#[derive(Debug, Default)]
pub struct TerminalEffects {
    reload_requested: AtomicBool,
}

impl TerminalEffects {
    /// Consume a pending reload request.
    pub fn take_reload(&self) -> bool {
        self.reload_requested.swap(false, Ordering::AcqRel)
    }
}

impl Effects for TerminalEffects {
    #[allow(clippy::print_stdout, clippy::print_stderr)]
    fn notify(&self, notification: Notification) {
        match notification.kind {
            NotificationKind::Success => println!("{notification}"),
            NotificationKind::Error => eprintln!("{notification}"),
        }
    }

    fn reload(&self) {
        self.reload_requested.store(true, Ordering::Release);
    }

    #[allow(clippy::print_stdout)]
    fn navigate(&self, view: View) {
        println!("-> {}", view.path());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reload_is_consumed_once() {
        let effects = TerminalEffects::default();
        assert!(!effects.take_reload());

        effects.reload();
        assert!(effects.take_reload());
        assert!(!effects.take_reload());
    }
}
