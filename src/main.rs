//! Application entry point: runs a simulated workout with the coach attached.
//!
//! # Startup sequence
//!
//! 1. Initialise logging.
//! 2. Load [`AppConfig`] from disk (returns default on first run).
//! 3. Create the [`tokio`] runtime.
//! 4. Build the offline and AI line providers from config.
//! 5. Build the voice sink and the [`CoachOrchestrator`].
//! 6. Spawn the [`CoachRunner`] on the runtime.
//! 7. Spawn the stdin reader: an empty line asks for a manual line, any
//!    other text is sent as a chat message.
//! 8. Drive one tick per simulated second from the [`WorkoutPlan`] until
//!    the plan ends or Ctrl-C is pressed.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::{mpsc, oneshot};
use tokio::time::MissedTickBehavior;
use workout_coach::{
    coach::{lock_status, new_shared_status, CoachCommand, CoachOrchestrator, CoachRunner},
    config::AppConfig,
    llm::{ApiLineProvider, FallbackLineProvider, LineProvider, OfflineLineProvider},
    session::{SessionState, UserContext, WorkoutPlan},
    voice,
};

fn main() -> anyhow::Result<()> {
    // 1. Logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Workout coach starting up");

    // 2. Configuration
    let config = AppConfig::load().unwrap_or_else(|e| {
        log::warn!("Failed to load config ({e}); using defaults");
        AppConfig::default()
    });

    // 3. Tokio runtime
    let rt = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(2)
        .enable_all()
        .build()
        .context("failed to create tokio runtime")?;

    rt.block_on(run(config))
}

async fn run(config: AppConfig) -> anyhow::Result<()> {
    // 4. Line providers
    let offline = Arc::new(OfflineLineProvider::new());
    let ai: Arc<dyn LineProvider> = Arc::new(
        FallbackLineProvider::new(ApiLineProvider::from_config(&config.llm), Arc::clone(&offline))
            .with_timeout(Duration::from_secs(config.llm.timeout_secs)),
    );

    // 5. Voice sink and orchestrator
    let sink = voice::from_kind(config.coach.voice_provider);
    let coach = CoachOrchestrator::new(config.coach.clone(), ai, offline, sink);

    // 6. Runner
    let status = new_shared_status();
    let (command_tx, command_rx) = mpsc::channel::<CoachCommand>(32);
    let runner = tokio::spawn(CoachRunner::new(coach, status.clone()).run(command_rx));

    let user = UserContext::from(&config.profile);

    // 7. Interactive input
    let input = tokio::spawn(read_stdin(command_tx.clone(), user.clone()));

    // 8. Session clock
    let plan = WorkoutPlan::from_config(&config.session);
    log::info!(
        "session: {} with {} segments, {}s total",
        config.session.session_type.label(),
        plan.segments().len(),
        plan.total_secs()
    );

    command_tx
        .send(CoachCommand::ResetSession)
        .await
        .context("coach runner stopped before the session began")?;

    let period = Duration::from_millis(config.session.tick_millis.max(1));
    let shutdown = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            log::warn!("Ctrl-C handler unavailable ({e}); session runs to the end");
            std::future::pending::<()>().await;
        }
    };
    drive_session(plan.states(), period, &user, &command_tx, shutdown).await;

    input.abort();
    // A closed channel here means the runner already exited, which the
    // join below reports.
    let _ = command_tx.send(CoachCommand::Stop).await;
    drop(command_tx);

    let coach = runner.await.context("coach runner panicked")?;

    let st = lock_status(&status).clone();
    log::info!(
        "session finished: {} ticks, {} lines spoken, {} AI calls",
        st.ticks,
        st.lines_spoken,
        coach.ai_lines_generated()
    );
    println!(
        "Session complete. {} lines spoken over {} seconds.",
        st.lines_spoken, st.ticks
    );
    Ok(())
}

/// Send one tick per `period` until the states run out, the runner goes
/// away or `shutdown` completes.  Returns the number of ticks delivered.
///
/// `shutdown` is polled for the whole session, including while a send is
/// waiting on a busy runner.
async fn drive_session<I, F>(
    states: I,
    period: Duration,
    user: &UserContext,
    command_tx: &mpsc::Sender<CoachCommand>,
    shutdown: F,
) -> u64
where
    I: Iterator<Item = SessionState>,
    F: Future<Output = ()>,
{
    tokio::pin!(shutdown);
    let mut ticker = tokio::time::interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let mut states = states;
    let mut sent = 0;

    loop {
        let command = tokio::select! {
            _ = ticker.tick() => match states.next() {
                Some(state) => CoachCommand::Tick {
                    state,
                    user: user.clone(),
                    performance: None,
                },
                None => break,
            },
            _ = &mut shutdown => {
                log::info!("interrupted, ending session");
                break;
            }
        };

        tokio::select! {
            result = command_tx.send(command) => {
                if result.is_err() {
                    log::warn!("coach runner stopped early");
                    break;
                }
                sent += 1;
            }
            _ = &mut shutdown => {
                log::info!("interrupted, ending session");
                break;
            }
        }
    }

    sent
}

/// Forward stdin lines to the coach until stdin closes.
async fn read_stdin(command_tx: mpsc::Sender<CoachCommand>, user: UserContext) {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        let line = match lines.next_line().await {
            Ok(Some(line)) => line,
            Ok(None) => break,
            Err(e) => {
                log::warn!("stdin read failed: {e}");
                break;
            }
        };

        let text = line.trim();
        if text.is_empty() {
            let command = CoachCommand::ManualLine { user: user.clone() };
            if command_tx.send(command).await.is_err() {
                break;
            }
            continue;
        }

        let (reply_tx, reply_rx) = oneshot::channel();
        let command = CoachCommand::Chat {
            text: text.to_string(),
            user: user.clone(),
            reply: Some(reply_tx),
        };
        if command_tx.send(command).await.is_err() {
            break;
        }
        if let Ok(reply) = reply_rx.await {
            println!("coach> {reply}");
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
