//! Per-request accounting for a batch of texture loads.

use crate::error::{AssetError, AssetResult};
use crate::loader::LoadedTexture;

/// Where a single request in a load batch stands.
#[derive(Debug, Default)]
pub enum SlotState {
    #[default]
    Pending,
    Loaded(LoadedTexture),
    Failed(AssetError),
}

impl SlotState {
    pub fn is_pending(&self) -> bool {
        matches!(self, SlotState::Pending)
    }
}

/// Outcome of a settled load batch, in request order.
#[derive(Debug, Default)]
pub struct LoadReport {
    /// `Some` for every request that produced a texture.
    pub textures: Vec<Option<LoadedTexture>>,
    /// Failed requests with their index and cause.
    pub failures: Vec<(usize, AssetError)>,
}

impl LoadReport {
    pub fn all_loaded(&self) -> bool {
        self.failures.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&LoadedTexture> {
        self.textures.get(index).and_then(Option::as_ref)
    }

    pub fn loaded(&self) -> impl Iterator<Item = &LoadedTexture> {
        self.textures.iter().flatten()
    }
}

/// Tracks a batch of texture requests and fires `on_ready` once.
///
/// The callback runs only after every request has been completed, either
/// with a texture or with an error; a failed request never leaves the batch
/// waiting forever, and a pending one never lets it fire early.
pub struct LoadTracker<F>
where
    F: FnOnce(LoadReport),
{
    labels: Vec<String>,
    slots: Vec<SlotState>,
    on_ready: Option<F>,
}

impl<F> LoadTracker<F>
where
    F: FnOnce(LoadReport),
{
    /// Start tracking one request per label. An empty batch fires immediately.
    pub fn new(labels: Vec<String>, on_ready: F) -> Self {
        let slots = labels.iter().map(|_| SlotState::Pending).collect();
        let mut tracker = Self {
            labels,
            slots,
            on_ready: Some(on_ready),
        };
        tracker.fire_if_settled();
        tracker
    }

    /// Record the outcome of request `index`.
    pub fn complete(&mut self, index: usize, result: AssetResult<LoadedTexture>) {
        let Some(slot) = self.slots.get_mut(index) else {
            tracing::warn!("Ignoring completion for unknown load request {}", index);
            return;
        };
        if !slot.is_pending() {
            tracing::warn!(
                "Ignoring duplicate completion for '{}'",
                self.labels[index]
            );
            return;
        }

        *slot = match result {
            Ok(texture) => {
                tracing::debug!(
                    "Loaded '{}' as {} ({}x{})",
                    self.labels[index],
                    texture.id(),
                    texture.width(),
                    texture.height()
                );
                SlotState::Loaded(texture)
            }
            Err(error) => {
                tracing::warn!("Unable to load image '{}': {}", self.labels[index], error);
                SlotState::Failed(error)
            }
        };

        self.fire_if_settled();
    }

    /// Number of requests still waiting for an outcome.
    pub fn pending(&self) -> usize {
        self.slots.iter().filter(|slot| slot.is_pending()).count()
    }

    /// Whether the completion callback has already run.
    pub fn is_finished(&self) -> bool {
        self.on_ready.is_none()
    }

    fn fire_if_settled(&mut self) {
        if self.pending() > 0 {
            return;
        }
        let Some(on_ready) = self.on_ready.take() else {
            return;
        };

        let mut report = LoadReport::default();
        for (index, slot) in std::mem::take(&mut self.slots).into_iter().enumerate() {
            match slot {
                SlotState::Loaded(texture) => report.textures.push(Some(texture)),
                SlotState::Failed(error) => {
                    report.textures.push(None);
                    report.failures.push((index, error));
                }
                SlotState::Pending => report.textures.push(None),
            }
        }

        if report.failures.is_empty() {
            tracing::info!("All {} textures loaded", report.textures.len());
        } else {
            tracing::warn!(
                "{} of {} textures failed to load",
                report.failures.len(),
                report.textures.len()
            );
        }

        on_ready(report);
    }
}
