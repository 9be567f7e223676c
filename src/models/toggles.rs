//! Extension and per-site enablement flags.

use crate::storage::StoreRecord;

/// Process-wide enablement flags read on every input event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ToggleState {
    /// Global on/off switch (`extensionEnabled`).
    pub global_enabled: bool,
    /// Whether the current hostname is in `disabledSites`.
    pub site_disabled: bool,
}

impl Default for ToggleState {
    fn default() -> Self {
        Self {
            global_enabled: true,
            site_disabled: false,
        }
    }
}

impl ToggleState {
    /// Returns true when input events should be observed at all.
    #[must_use]
    pub const fn is_active(self) -> bool {
        self.global_enabled && !self.site_disabled
    }

    /// Applies the toggle keys present in a store record.
    ///
    /// Keys absent from the record leave the current value untouched.
    pub fn apply_record(&mut self, record: &StoreRecord, hostname: &str) {
        if let Some(enabled) = record.extension_enabled {
            self.global_enabled = enabled;
        }
        if let Some(sites) = &record.disabled_sites {
            self.site_disabled = sites.iter().any(|site| site.eq_ignore_ascii_case(hostname));
        }
    }
}
