#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use refindex::memory::MemoryConfiguration;
use refindex::observe::{Severity, ShortcutEvent, ShortcutObserver};
use serde_json::{Value, json};

pub fn device_tree() -> Value {
    json!({
        "dicomConfigurationRoot": {
            "dicomDevicesRoot": {
                "dev1": {
                    "_.uuid": "d-1",
                    "dicomDeviceName": "dev1",
                    "dicomNetworkAE": {
                        "STORESCP": { "_.uuid": "ae-1", "dicomAETitle": "STORESCP" },
                        "QRSCP": { "_.uuid": "ae-2", "dicomAETitle": "QRSCP" }
                    }
                },
                "dev2": {
                    "_.uuid": "d-2",
                    "dicomDeviceName": "dev2",
                    "dicomNetworkAE": {
                        "ARCHIVE": { "_.uuid": "ae-3", "dicomAETitle": "ARCHIVE" }
                    },
                    "dicomConnection": [
                        { "_.uuid": "c-1", "dicomHostname": "localhost", "dicomPort": 104 }
                    ]
                },
                "dev 3": {
                    "_.uuid": "d-3",
                    "dicomDeviceName": "dev 3"
                }
            },
            "globalConfiguration": { "_.uuid": "g-1" },
            "hl7Root": {
                "hl7Applications": { "_.uuid": "h-1" }
            }
        }
    })
}

pub fn store() -> Arc<MemoryConfiguration> {
    Arc::new(MemoryConfiguration::indexed(device_tree()).expect("index builds"))
}

/// Keeps every record and event for later inspection.
#[derive(Default)]
pub struct RecordingObserver {
    pub records: Mutex<Vec<(Severity, String)>>,
    pub events: Mutex<Vec<ShortcutEvent>>,
}

impl RecordingObserver {
    pub fn records(&self) -> Vec<(Severity, String)> {
        self.records.lock().unwrap().clone()
    }
    pub fn events(&self) -> Vec<ShortcutEvent> {
        self.events.lock().unwrap().clone()
    }
    pub fn errors(&self) -> usize {
        self.records().iter().filter(|(s, _)| *s == Severity::Error).count()
    }
}

impl ShortcutObserver for RecordingObserver {
    fn record(&self, severity: Severity, message: &str) {
        self.records.lock().unwrap().push((severity, message.to_string()));
    }
    fn count(&self, event: ShortcutEvent) {
        self.events.lock().unwrap().push(event);
    }
}
