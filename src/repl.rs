//! REPL loop - multiplexes terminal input and gesture deadlines

use std::future::Future;
use std::io::BufRead;
use std::thread;

use tokio::time::{Instant, sleep_until};
use tracing::debug;

use crate::session::Session;

/// Why the loop stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitReason {
    /// Quit control was double-tapped
    Quit,
    /// Input closed (EOF)
    InputClosed,
    /// Shutdown future resolved (Ctrl+C)
    Interrupted,
}

/// Read stdin lines on a dedicated thread
pub fn spawn_stdin_reader() -> flume::Receiver<String> {
    let (tx, rx) = flume::unbounded::<String>();
    thread::spawn(move || {
        let stdin = std::io::stdin();
        for line in stdin.lock().lines() {
            let Ok(line) = line else { break };
            if tx.send(line).is_err() {
                break;
            }
        }
        debug!("stdin reader finished");
    });
    rx
}

/// Drive `session` until quit, end of input, or `shutdown`
pub async fn run(
    session: &mut Session,
    input: flume::Receiver<String>,
    shutdown: impl Future<Output = ()>,
) -> ExitReason {
    tokio::pin!(shutdown);

    loop {
        let deadline = session.next_deadline();
        let timeout_fut = async {
            match deadline {
                Some(deadline) => sleep_until(deadline).await,
                None => std::future::pending::<()>().await,
            }
        };

        tokio::select! {
            biased;

            _ = &mut shutdown => return ExitReason::Interrupted,

            line = input.recv_async() => match line {
                Ok(line) => session.handle_line(&line, Instant::now()),
                Err(_) => return ExitReason::InputClosed,
            },

            _ = timeout_fut, if deadline.is_some() => {
                session.expire_due(Instant::now());
            }
        }

        if session.should_exit() {
            return ExitReason::Quit;
        }
    }
}
