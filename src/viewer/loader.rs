//! Asynchronous model loading
//!
//! Decoding lives outside this crate behind [`ModelLoader`]. A load is a
//! plain future that can run on any executor; its result comes back to the
//! tick thread through a `flume` channel tagged with `(slot, generation)`,
//! so a result that lost a race against a newer load of the same slot is
//! recognised and dropped on arrival.

use std::sync::Arc;

use futures::FutureExt;
use futures::future::BoxFuture;
use rustc_hash::FxHashMap;

use crate::animation::AnimationClip;
use crate::errors::{Error, Result};
use crate::scene::SceneGraph;

/// A decoded asset: its scene graph and every clip it ships.
#[derive(Debug, Clone, Default)]
pub struct LoadedModel {
    pub scene: SceneGraph,
    pub clips: Vec<AnimationClip>,
}

impl LoadedModel {
    #[must_use]
    pub fn new(scene: SceneGraph, clips: Vec<AnimationClip>) -> Self {
        Self { scene, clips }
    }
}

pub trait ModelLoader: Send + Sync {
    /// Fetches and decodes `url`. Fails with [`Error::Load`] on transport or
    /// parse errors.
    fn load(&self, url: &str) -> BoxFuture<'static, Result<LoadedModel>>;
}

/// Serves pre-built models by url. Useful for hosts that decode up front.
#[derive(Debug, Default, Clone)]
pub struct InMemoryLoader {
    models: FxHashMap<String, LoadedModel>,
}

impl InMemoryLoader {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, url: impl Into<String>, model: LoadedModel) {
        self.models.insert(url.into(), model);
    }

    #[must_use]
    pub fn with(mut self, url: impl Into<String>, model: LoadedModel) -> Self {
        self.insert(url, model);
        self
    }
}

impl ModelLoader for InMemoryLoader {
    fn load(&self, url: &str) -> BoxFuture<'static, Result<LoadedModel>> {
        let result = self
            .models
            .get(url)
            .cloned()
            .ok_or_else(|| Error::load(url, "no such model"));
        futures::future::ready(result).boxed()
    }
}

/// A finished load on its way back to the tick thread.
#[derive(Debug)]
pub(crate) struct LoadCompletion {
    pub slot: usize,
    pub generation: u64,
    pub url: String,
    pub result: Result<LoadedModel>,
}

/// Per-slot generation counters plus the completion channel.
#[derive(Debug)]
pub(crate) struct LoadQueue {
    generations: Vec<u64>,
    tx: flume::Sender<LoadCompletion>,
    rx: flume::Receiver<LoadCompletion>,
}

impl LoadQueue {
    pub fn new() -> Self {
        let (tx, rx) = flume::unbounded();
        Self {
            generations: Vec::new(),
            tx,
            rx,
        }
    }

    /// Starts a load for `slot`, superseding any pending one.
    pub fn request(
        &mut self,
        slot: usize,
        url: &str,
        loader: &Arc<dyn ModelLoader>,
    ) -> BoxFuture<'static, ()> {
        if self.generations.len() <= slot {
            self.generations.resize(slot + 1, 0);
        }
        self.generations[slot] += 1;
        let generation = self.generations[slot];

        log::info!("Loading slot {slot} (generation {generation}) from {url}");

        let tx = self.tx.clone();
        let url = url.to_string();
        let future = loader.load(&url);
        async move {
            let result = future.await;
            // The receiver lives as long as the viewer; a send error only
            // means the viewer was dropped first.
            let _ = tx.send(LoadCompletion {
                slot,
                generation,
                url,
                result,
            });
        }
        .boxed()
    }

    #[must_use]
    pub fn is_current(&self, slot: usize, generation: u64) -> bool {
        self.generations.get(slot).copied() == Some(generation)
    }

    /// Completed loads, in arrival order. Never blocks.
    pub fn drain(&self) -> Vec<LoadCompletion> {
        self.rx.try_iter().collect()
    }
}
