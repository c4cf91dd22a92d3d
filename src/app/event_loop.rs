use std::io::stdout;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use crossterm::event;
use crossterm::event::{DisableMouseCapture, EnableMouseCapture};
use crossterm::execute;
use ratatui::DefaultTerminal;

use crate::app::{App, Message, Model, update};
use crate::document::SessionId;

/// Delay between a submit and the scroll to its first match, so the answer
/// area has been laid out and drawn first.
pub(super) const SCROLL_PROBE_DELAY_MS: u64 = 100;
const ANIMATION_FRAME_MS: u64 = 16;

pub(super) struct ResizeDebouncer {
    delay_ms: u64,
    pending: Option<(u16, u16, u64)>,
}

impl ResizeDebouncer {
    pub(super) const fn new(delay_ms: u64) -> Self {
        Self {
            delay_ms,
            pending: None,
        }
    }

    pub(super) const fn queue(&mut self, width: u16, height: u16, now_ms: u64) {
        self.pending = Some((width, height, now_ms));
    }

    pub(super) fn take_ready(&mut self, now_ms: u64) -> Option<(u16, u16)> {
        let (width, height, queued_at) = self.pending?;
        if now_ms.saturating_sub(queued_at) >= self.delay_ms {
            self.pending = None;
            Some((width, height))
        } else {
            None
        }
    }

    pub(super) const fn is_pending(&self) -> bool {
        self.pending.is_some()
    }
}

/// Fires a scroll-to-first-match once its delay has passed.
///
/// A newer probe replaces a pending one.
pub(super) struct ScrollProbeTimer {
    delay_ms: u64,
    pending: Option<(SessionId, u64)>,
}

impl ScrollProbeTimer {
    pub(super) const fn new(delay_ms: u64) -> Self {
        Self {
            delay_ms,
            pending: None,
        }
    }

    pub(super) const fn queue(&mut self, session: SessionId, now_ms: u64) {
        self.pending = Some((session, now_ms));
    }

    pub(super) fn take_ready(&mut self, now_ms: u64) -> Option<SessionId> {
        let (session, queued_at) = self.pending?;
        if now_ms.saturating_sub(queued_at) >= self.delay_ms {
            self.pending = None;
            Some(session)
        } else {
            None
        }
    }

    pub(super) const fn is_pending(&self) -> bool {
        self.pending.is_some()
    }
}

/// Paces smooth-scroll steps.
pub(super) struct AnimationClock {
    interval_ms: u64,
    last_ms: u64,
}

impl AnimationClock {
    pub(super) const fn new(interval_ms: u64) -> Self {
        Self {
            interval_ms,
            last_ms: 0,
        }
    }

    pub(super) const fn due(&mut self, now_ms: u64) -> bool {
        if now_ms.saturating_sub(self.last_ms) >= self.interval_ms {
            self.last_ms = now_ms;
            true
        } else {
            false
        }
    }
}

impl App {
    /// Run the main event loop.
    ///
    /// # Errors
    ///
    /// Returns an error if terminal initialization or the event loop
    /// encounters an I/O failure.
    pub fn run(&mut self) -> Result<()> {
        let _run_scope = crate::perf::scope("app.run.total");

        let init_scope = crate::perf::scope("app.ratatui_init");
        let mut terminal = ratatui::try_init()
            .context("Failed to initialize terminal - pagewise requires an interactive terminal")?;
        let size = terminal.size()?;
        drop(init_scope);
        crate::perf::log_event(
            "init.layout",
            format!("terminal={}x{}", size.width, size.height),
        );

        let mut model = Model::new(self.settings.clone(), (size.width, size.height));
        model
            .config_global_path
            .clone_from(&self.config_global_path);
        model.config_local_path.clone_from(&self.config_local_path);

        if let Some(handle) = self.initial_document.clone() {
            self.dispatch(&mut model, Message::OpenDocument(handle));
        }

        let result = execute!(stdout(), EnableMouseCapture)
            .context("Failed to enable mouse capture")
            .and_then(|()| self.event_loop(&mut terminal, &mut model));

        let _ = execute!(stdout(), DisableMouseCapture);
        ratatui::restore();

        result
    }

    /// Apply a message and then its side effects.
    pub(super) fn dispatch(&self, model: &mut Model, msg: Message) {
        let side_msg = msg.clone();
        *model = update(std::mem::take(model), msg);
        self.handle_message_side_effects(model, &side_msg);
    }

    /// Apply every completion posted by background tasks so far.
    pub(super) fn drain_completions(&self, model: &mut Model) -> usize {
        let mut drained = 0;
        while let Some(msg) = self.tasks.try_recv() {
            self.dispatch(model, msg);
            drained += 1;
        }
        drained
    }

    fn event_loop(&self, terminal: &mut DefaultTerminal, model: &mut Model) -> Result<()> {
        let start = Instant::now();
        let mut resize_debouncer = ResizeDebouncer::new(100);
        let mut scroll_probe = ScrollProbeTimer::new(SCROLL_PROBE_DELAY_MS);
        let mut animation = AnimationClock::new(ANIMATION_FRAME_MS);
        let mut frame_idx: u64 = 0;
        let mut needs_render = true;

        loop {
            if model.expire_toast(Instant::now()) {
                needs_render = true;
            }

            let now_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX);

            if let Some((width, height)) = resize_debouncer.take_ready(now_ms) {
                crate::perf::log_event(
                    "event.resize.apply",
                    format!("frame={frame_idx} width={width} height={height}"),
                );
                self.dispatch(model, Message::Resize(width, height));
                needs_render = true;
            }

            let completions = self.drain_completions(model);
            if completions > 0 {
                crate::perf::log_event(
                    "task.completions",
                    format!("frame={frame_idx} count={completions}"),
                );
                needs_render = true;
            }

            if let Some(session) = model.take_scroll_probe() {
                scroll_probe.queue(session, now_ms);
            }
            if let Some(session) = scroll_probe.take_ready(now_ms) {
                self.dispatch(model, Message::ScrollToFirstMatch(session));
                needs_render = true;
            }

            let animating = model.session.answer_view.is_animating();
            if animating && animation.due(now_ms) {
                self.dispatch(model, Message::AnimationTick);
                needs_render = true;
            }

            // Handle events
            let poll_ms = if needs_render {
                0
            } else if resize_debouncer.is_pending() || scroll_probe.is_pending() || animating {
                10
            } else {
                50
            };
            if event::poll(Duration::from_millis(poll_ms))? {
                // Refresh timestamp after poll wait so debouncers use accurate times.
                let event_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX);
                let msg =
                    Self::handle_event(&event::read()?, model, event_ms, &mut resize_debouncer);
                if let Some(msg) = msg {
                    crate::perf::log_event(
                        "event.message",
                        format!("frame={frame_idx} msg={msg:?}"),
                    );
                    self.dispatch(model, msg);
                    needs_render = true;
                }

                // Coalesce key repeat bursts into a single render.
                let mut drained = 0_u32;
                while event::poll(Duration::from_millis(0))? {
                    let drain_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX);
                    let msg =
                        Self::handle_event(&event::read()?, model, drain_ms, &mut resize_debouncer);
                    if let Some(msg) = msg {
                        drained += 1;
                        self.dispatch(model, msg);
                        needs_render = true;
                    }
                }
                if drained > 0 {
                    crate::perf::log_event(
                        "event.drain",
                        format!("frame={frame_idx} drained={drained}"),
                    );
                }
            }

            if needs_render {
                frame_idx += 1;
                let draw_start = Instant::now();
                terminal.draw(|frame| crate::ui::render(model, frame))?;
                crate::perf::log_event(
                    "frame.draw",
                    format!(
                        "frame={} draw_ms={:.3} page={} offset={}",
                        frame_idx,
                        draw_start.elapsed().as_secs_f64() * 1000.0,
                        model.session.current_page(),
                        model.session.viewport.offset(),
                    ),
                );
                needs_render = false;
            }

            if model.should_quit {
                break;
            }
        }
        Ok(())
    }
}
