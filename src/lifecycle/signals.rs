//! OS signal handling.
//!
//! Until the first log follow the default SIGINT handler terminates the
//! process. Following installs tokio's handler, which can never be removed,
//! so a background listener takes over from then on: Ctrl-C during a follow
//! stops the follow, Ctrl-C anywhere else exits with status 130.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::OnceLock;

use tokio::sync::Notify;

/// Exit status after Ctrl-C outside a follow (128 + SIGINT).
pub const INTERRUPTED_EXIT_CODE: i32 = 130;

static FOLLOWING: AtomicBool = AtomicBool::new(false);
static LISTENING: AtomicBool = AtomicBool::new(false);
static FOLLOW_INTERRUPTED: OnceLock<Notify> = OnceLock::new();

fn follow_interrupted() -> &'static Notify {
    FOLLOW_INTERRUPTED.get_or_init(Notify::new)
}

/// Resolves on the next Ctrl-C. The process counts as following while this
/// future is alive.
///
/// If the handler cannot be installed this never resolves, so the caller
/// simply waits on its other branch.
pub async fn interrupted() {
    let notified = follow_interrupted().notified();
    let _following = FollowScope::enter();
    ensure_listener();
    notified.await;
}

/// Whether an [`interrupted`] future is currently waiting.
pub fn is_following() -> bool {
    FOLLOWING.load(Ordering::SeqCst)
}

struct FollowScope;

impl FollowScope {
    fn enter() -> Self {
        FOLLOWING.store(true, Ordering::SeqCst);
        FollowScope
    }
}

impl Drop for FollowScope {
    fn drop(&mut self) {
        FOLLOWING.store(false, Ordering::SeqCst);
    }
}

/// Cleared when the listener task is dropped with its runtime.
struct ListenerAlive;

impl Drop for ListenerAlive {
    fn drop(&mut self) {
        LISTENING.store(false, Ordering::SeqCst);
    }
}

fn ensure_listener() {
    if LISTENING
        .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
        .is_ok()
    {
        tokio::spawn(listen(ListenerAlive));
    }
}

async fn listen(_alive: ListenerAlive) {
    loop {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::warn!(error = %e, "Cannot listen for Ctrl-C");
            return;
        }
        if is_following() {
            follow_interrupted().notify_waiters();
        } else {
            tracing::info!("Interrupted; exiting");
            std::process::exit(INTERRUPTED_EXIT_CODE);
        }
    }
}

