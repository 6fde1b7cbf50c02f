//! File picker abstraction.
//!
//! The controller and components never look up the hidden input element
//! themselves; opening the native picker goes through this trait so the
//! rest of the form stays testable without a real DOM.

use wasm_bindgen::JsCast;
use web_sys::HtmlInputElement;

/// Capability to open the native file selection dialog.
pub trait FilePicker {
    fn open(&self);
}

/// Picker backed by the hidden `<input type="file">` in the document.
pub struct DomPicker {
    input_id: &'static str,
}

impl DomPicker {
    pub fn new(input_id: &'static str) -> Self {
        Self { input_id }
    }
}

impl FilePicker for DomPicker {
    fn open(&self) {
        let document = match web_sys::window().and_then(|w| w.document()) {
            Some(document) => document,
            None => return,
        };
        if let Some(element) = document.get_element_by_id(self.input_id) {
            if let Some(input) = element.dyn_ref::<HtmlInputElement>() {
                input.click();
            }
        }
    }
}
