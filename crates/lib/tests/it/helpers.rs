use std::{cell::RefCell, rc::Rc};

use serde_json::json;
use showstate::{
    StateManager, StoreConfig,
    value::{Handle, Map, Value},
};

/// Stand-in for a host audio context: opaque, owned by the host, never cloned.
#[derive(Debug)]
pub struct AudioContext {
    pub sample_rate: u32,
}

/// A small show document covering project data, UI state, playback, an
/// empty selection and a host handle.
pub fn show_tree() -> Value {
    show_tree_with(Handle::new(AudioContext { sample_rate: 48_000 }))
}

/// [`show_tree`] using a caller-provided audio handle.
pub fn show_tree_with(ctx: Handle) -> Value {
    let tree = Value::from(json!({
        "project": {
            "name": "Untitled Show",
            "settings": {
                "brightness": 80,
                "profiles": [{ "name": "default", "universe": 1 }]
            },
            "tracks": [
                { "id": "t1", "name": "Lights", "clips": [] },
                { "id": "t2", "name": "Audio", "clips": [] }
            ]
        },
        "ui": { "zoom": 100, "snapEnabled": true, "gridSize": 0.25 },
        "playback": { "currentTime": 0.0, "isPlaying": false },
        "selection": []
    }));

    let Value::Map(mut root) = tree else {
        panic!("fixture root must be a map");
    };
    root.insert("audio", Map::new().with("ctx", ctx).with("masterVolume", 1.0));
    Value::Map(root)
}

pub fn show_store() -> StateManager {
    StateManager::new(show_tree())
}

pub fn show_store_with_history(max_history: usize) -> StateManager {
    StateManager::with_config(
        show_tree(),
        StoreConfig {
            max_history,
            ..Default::default()
        },
    )
}

pub fn counter_store() -> StateManager {
    StateManager::new(Map::new().with("count", 0))
}

/// Collects whatever a callback was called with, for later assertions.
#[derive(Debug)]
pub struct Recorder<T> {
    calls: Rc<RefCell<Vec<T>>>,
}

impl<T> Clone for Recorder<T> {
    fn clone(&self) -> Self {
        Self {
            calls: Rc::clone(&self.calls),
        }
    }
}

impl<T: Clone> Recorder<T> {
    pub fn new() -> Self {
        Self {
            calls: Rc::new(RefCell::new(Vec::new())),
        }
    }

    pub fn record(&self, call: T) {
        self.calls.borrow_mut().push(call);
    }

    pub fn count(&self) -> usize {
        self.calls.borrow().len()
    }

    pub fn calls(&self) -> Vec<T> {
        self.calls.borrow().clone()
    }
}

/// Records `(next, prev)` pairs from a scoped subscription.
pub type ChangeRecorder = Recorder<(Option<Value>, Option<Value>)>;

pub fn record_change(recorder: &ChangeRecorder) -> impl Fn(Option<&Value>, Option<&Value>) + 'static {
    let recorder = recorder.clone();
    move |next, prev| recorder.record((next.cloned(), prev.cloned()))
}
