//! Event loop for one dice screen.
//!
//! Events are applied one at a time, each to completion, in arrival order.

use anyhow::{Context, Result};
use rand::Rng;
use rand::rngs::SmallRng;
use shake_core::{RollEngine, SensorStatus};

use crate::render;
use crate::script::Event;
use crate::sensor::Subscription;
use crate::settings::UiSettings;

#[derive(Clone, Copy, Debug, Default)]
pub struct SessionOptions {
    /// Print only a final JSON snapshot.
    pub json: bool,
    /// Show throwaway faces on every reading while shaking.
    pub animate: bool,
}

pub struct Session<R> {
    engine: RollEngine<R>,
    ui: UiSettings,
    options: SessionOptions,
    display_rng: SmallRng,
    tick: u64,
}

impl<R: Rng> Session<R> {
    pub fn new(
        engine: RollEngine<R>,
        ui: UiSettings,
        options: SessionOptions,
        display_rng: SmallRng,
    ) -> Self {
        Self {
            engine,
            ui,
            options,
            display_rng,
            tick: 0,
        }
    }

    pub fn engine(&self) -> &RollEngine<R> {
        &self.engine
    }

    pub fn set_sensor_status(&mut self, status: SensorStatus) {
        self.engine.set_sensor_status(status);
    }

    /// Apply one event and return the lines it produced.
    pub fn apply(&mut self, event: Event) -> Vec<String> {
        let mut lines = Vec::new();
        match event {
            Event::Sample(sample) => {
                self.tick += 1;
                let outcome = self.engine.on_sample(sample);
                if let Some(transition) = outcome.transition {
                    lines.push(render::status_line(
                        self.tick,
                        transition.to,
                        outcome.intensity,
                    ));
                }
                if let Some(record) = outcome.roll {
                    lines.push(render::roll_line(&record, self.engine.committed_faces()));
                }
                if self.options.animate && self.engine.state().is_shaking() {
                    let shown = self.engine.peek_display_values(&mut self.display_rng);
                    lines.push(format!("  {}", render::faces(&shown)));
                }
            }
            Event::SetSides { set_sides } => {
                self.engine.set_sides(self.ui.clamp_sides(set_sides));
                lines.push(format!("sides -> {}", self.engine.dice_config().sides));
            }
            Event::SetDiceCount { set_dice_count } => {
                self.engine
                    .set_dice_count(self.ui.clamp_dice_count(set_dice_count));
                lines.push(format!(
                    "dice -> {}",
                    self.engine.dice_config().dice_count
                ));
            }
        }
        lines
    }

    /// Drain the subscription (or stop on Ctrl-C), then release it.
    pub async fn run(&mut self, mut subscription: Subscription) -> Result<()> {
        let shutdown = tokio::signal::ctrl_c();
        tokio::pin!(shutdown);

        loop {
            tokio::select! {
                event = subscription.next() => {
                    let Some(event) = event else { break };
                    for line in self.apply(event) {
                        self.emit(&line);
                    }
                }
                _ = &mut shutdown => {
                    tracing::info!("interrupted, ending session");
                    break;
                }
            }
        }

        subscription.unsubscribe().await;
        Ok(())
    }

    pub fn emit(&self, line: &str) {
        if !self.options.json {
            println!("{line}");
        }
    }

    /// Final view: history panel, or the whole snapshot as JSON.
    pub fn finish(&self) -> Result<()> {
        if self.options.json {
            let json = serde_json::to_string_pretty(&self.engine.snapshot())
                .context("failed to serialize snapshot")?;
            println!("{json}");
        } else {
            println!("{}", render::history_panel(self.engine.history()));
        }
        Ok(())
    }
}
