//! The catalogue of index-backed query shapes.
//!
//! Each [`Shortcut`] names a query that asks for a device (or one of its
//! attributes) by some UUID. The catalogue is a static table: the template,
//! the parameter holding the UUID, and the attribute to read once the device
//! has been located. Adding a shortcut means adding a row.

use std::fmt;

use lazy_static::lazy_static;

use crate::error::Result;
use crate::litepath::{self, LitePath};
use crate::pattern::{Bindings, PathPattern};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Shortcut {
    DeviceUuidByAnyUuid,
    DeviceNameByUuid,
    DeviceNameByAeUuid,
}

// (shortcut, template, uuid parameter, suffix), in matching priority order
const CATALOGUE: [(Shortcut, &str, &str, &str); 3] = [
    (
        Shortcut::DeviceUuidByAnyUuid,
        "/dicomConfigurationRoot/dicomDevicesRoot/*[.//_.uuid='{UUID}']/_.uuid",
        "UUID",
        "_.uuid",
    ),
    (
        Shortcut::DeviceNameByUuid,
        "/dicomConfigurationRoot/dicomDevicesRoot/*[_.uuid='{deviceUUID}']/dicomDeviceName",
        "deviceUUID",
        "dicomDeviceName",
    ),
    (
        Shortcut::DeviceNameByAeUuid,
        "/dicomConfigurationRoot/dicomDevicesRoot/*[dicomNetworkAE/*[_.uuid='{aeUUID}']]/dicomDeviceName",
        "aeUUID",
        "dicomDeviceName",
    ),
];

#[derive(Debug)]
pub struct ShortcutTemplate {
    shortcut: Shortcut,
    pattern: PathPattern,
    param: &'static str,
    suffix: &'static str,
}

impl ShortcutTemplate {
    pub fn new(shortcut: Shortcut, pattern: PathPattern, param: &'static str, suffix: &'static str) -> Self {
        Self { shortcut, pattern, param, suffix }
    }
    pub fn shortcut(&self) -> Shortcut {
        self.shortcut
    }
    pub fn pattern(&self) -> &PathPattern {
        &self.pattern
    }
    /// Name of the parameter carrying the UUID to look up.
    pub fn param(&self) -> &'static str {
        self.param
    }
    /// Key appended to the anchor path before materializing.
    pub fn suffix(&self) -> &'static str {
        self.suffix
    }
}

lazy_static! {
    static ref TEMPLATES: Vec<ShortcutTemplate> = CATALOGUE
        .iter()
        .map(|&(shortcut, template, param, suffix)| {
            ShortcutTemplate::new(shortcut, PathPattern::compile(template).expect("built-in shortcut template"), param, suffix)
        })
        .collect();
}

/// All templates, in the order they are tried.
pub fn templates() -> &'static [ShortcutTemplate] {
    &TEMPLATES
}

/// First template matching the query, with its bound parameters.
pub fn match_query(query: &LitePath) -> Option<(&'static ShortcutTemplate, Bindings)> {
    TEMPLATES
        .iter()
        .find_map(|template| template.pattern.matches(query).map(|bindings| (template, bindings)))
}

/// Like [`match_query`], but parses first; malformed queries are `IllegalQuery`.
pub fn match_str(query: &str) -> Result<Option<(&'static ShortcutTemplate, Bindings)>> {
    Ok(match_query(&litepath::parse(query)?))
}

impl Shortcut {
    pub fn template(self) -> &'static ShortcutTemplate {
        // the catalogue holds exactly one row per variant
        &TEMPLATES[self as usize]
    }
    pub fn name(self) -> &'static str {
        match self {
            Shortcut::DeviceUuidByAnyUuid => "DeviceUUIDByAnyUUID",
            Shortcut::DeviceNameByUuid => "DeviceNameByUUID",
            Shortcut::DeviceNameByAeUuid => "DeviceNameByAEUUID",
        }
    }
    /// The concrete query this shortcut answers for `uuid`.
    pub fn query(self, uuid: &str) -> Result<String> {
        let template = self.template();
        template.pattern.fill(&[(template.param, uuid)])
    }
}

impl fmt::Display for Shortcut {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
