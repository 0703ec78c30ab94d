//! Stop requests from the operating system

use std::fmt;

use tokio::sync::broadcast;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShutdownReason {
    Interrupt,
    Terminate,
}

impl fmt::Display for ShutdownReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShutdownReason::Interrupt => write!(f, "SIGINT"),
            ShutdownReason::Terminate => write!(f, "SIGTERM"),
        }
    }
}

/// Fans one stop request out to every subscriber.
#[derive(Clone)]
pub struct ShutdownSignal {
    sender: broadcast::Sender<ShutdownReason>,
}

impl ShutdownSignal {
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(1);
        Self { sender }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<ShutdownReason> {
        self.sender.subscribe()
    }

    /// Returns `false` when nobody is subscribed.
    pub fn trigger(&self, reason: ShutdownReason) -> bool {
        self.sender.send(reason).is_ok()
    }
}

impl Default for ShutdownSignal {
    fn default() -> Self {
        Self::new()
    }
}

async fn interrupt() -> ShutdownReason {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Cannot listen for Ctrl+C");
        std::future::pending::<()>().await;
    }
    ShutdownReason::Interrupt
}

#[cfg(unix)]
async fn next_os_signal() -> ShutdownReason {
    use tokio::signal::unix::{SignalKind, signal};

    match signal(SignalKind::terminate()) {
        Ok(mut term) => tokio::select! {
            reason = interrupt() => reason,
            _ = term.recv() => ShutdownReason::Terminate,
        },
        Err(e) => {
            tracing::warn!(error = %e, "Cannot listen for SIGTERM, Ctrl+C only");
            interrupt().await
        }
    }
}

#[cfg(not(unix))]
async fn next_os_signal() -> ShutdownReason {
    interrupt().await
}

/// Start listening for Ctrl+C and SIGTERM in the background.
pub fn listen_for_os_signals() -> ShutdownSignal {
    let signal = ShutdownSignal::new();
    let trigger = signal.clone();

    tokio::spawn(async move {
        let reason = next_os_signal().await;
        tracing::info!(%reason, "Shutdown requested");
        trigger.trigger(reason);
    });

    signal
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_trigger_without_subscribers() {
        let signal = ShutdownSignal::new();
        assert!(!signal.trigger(ShutdownReason::Terminate));
    }

    #[tokio::test]
    async fn test_every_subscriber_sees_reason() {
        let signal = ShutdownSignal::new();
        let mut first = signal.subscribe();
        let mut second = signal.clone().subscribe();

        let trigger = signal.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(10)).await;
            trigger.trigger(ShutdownReason::Terminate);
        });

        let reason = tokio::time::timeout(Duration::from_millis(500), first.recv())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(reason, ShutdownReason::Terminate);
        assert_eq!(second.recv().await.unwrap(), ShutdownReason::Terminate);
        assert_eq!(reason.to_string(), "SIGTERM");
    }
}
