use std::cell::Cell;
use std::rc::Rc;
use std::time::Duration;

use gtk4::prelude::*;
use gtk4::Label;

/// Transient status badge; a newer message cancels the pending hide of an older one.
#[derive(Clone)]
pub(crate) struct ToastRuntime {
    label: Label,
    sequence: Rc<Cell<u64>>,
}

impl ToastRuntime {
    pub(crate) fn new(label: &Label) -> Self {
        Self {
            label: label.clone(),
            sequence: Rc::new(Cell::new(0)),
        }
    }

    pub(crate) fn show(&self, message: impl Into<String>, duration_ms: u32) {
        let message = message.into();
        self.label.set_text(&message);
        self.label.set_visible(true);

        let sequence = self.sequence.get().saturating_add(1);
        self.sequence.set(sequence);

        let label = self.label.clone();
        let latest_sequence = self.sequence.clone();
        gtk4::glib::timeout_add_local_once(
            Duration::from_millis(u64::from(duration_ms)),
            move || {
                if latest_sequence.get() == sequence {
                    label.set_visible(false);
                }
            },
        );
    }
}
