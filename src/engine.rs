//! Minimal text engine behind the demo shell.
//!
//! [`EchoEngine`] plays the render widget host: it keeps a one-line
//! document, applies compositions and key text to it, and acknowledges
//! every keyboard event on the ack channel right away. It is enough to
//! watch the ordering of composition and key events end to end.

use std::cell::{Cell, RefCell};

use tracing::{debug, trace};

use crate::events::{
    CompositionUnderline, GestureEvent, KeyboardEvent, Modifiers, MouseEvent, TouchEvent,
};
use crate::render::{AckSender, InputEventAck, RenderWidgetHost};

pub struct EchoEngine {
    acks: AckSender,
    document: RefCell<String>,
    composition: RefCell<String>,
    ime_active: Cell<bool>,
}

impl EchoEngine {
    pub fn new(acks: AckSender) -> Self {
        Self {
            acks,
            document: RefCell::new(String::new()),
            composition: RefCell::new(String::new()),
            ime_active: Cell::new(false),
        }
    }

    /// Document text followed by the live composition, if any.
    pub fn display_text(&self) -> String {
        let document = self.document.borrow();
        let composition = self.composition.borrow();
        if composition.is_empty() {
            document.clone()
        } else {
            format!("{document}[{composition}]")
        }
    }

    pub fn is_ime_active(&self) -> bool {
        self.ime_active.get()
    }

    /// Applies the default action of a key-down. Returns whether it was consumed.
    fn apply_key_down(&self, event: &KeyboardEvent) -> bool {
        if event.is_system_key {
            return false;
        }
        if event.key == "BackSpace" {
            self.document.borrow_mut().pop();
            return true;
        }
        if event
            .modifiers
            .intersects(Modifiers::CONTROL | Modifiers::META)
        {
            return false;
        }
        if event.text.is_empty() || event.text.chars().any(char::is_control) {
            return false;
        }
        self.document.borrow_mut().push_str(&event.text);
        true
    }
}

impl RenderWidgetHost for EchoEngine {
    fn forward_keyboard_event(&self, event: &KeyboardEvent) {
        let consumed = event.is_key_down() && self.apply_key_down(event);
        trace!(key = %event.key, kind = ?event.kind, consumed, "Keyboard event");
        self.acks.send(InputEventAck {
            event: event.clone(),
            consumed,
        });
    }

    fn ime_set_composition(
        &self,
        text: &str,
        _underlines: &[CompositionUnderline],
        _selection_start: u32,
        _selection_end: u32,
    ) {
        debug!(text, "Set composition");
        *self.composition.borrow_mut() = text.to_string();
    }

    fn ime_confirm_composition(&self, text: &str) {
        debug!(text, "Confirm composition");
        self.composition.borrow_mut().clear();
        self.document.borrow_mut().push_str(text);
    }

    fn forward_gesture_event(&self, event: &GestureEvent) {
        trace!(kind = ?event.kind, "Gesture event");
    }

    fn forward_touch_event(&self, event: &TouchEvent) {
        trace!(points = event.points.len(), "Touch event");
    }

    fn forward_mouse_event(&self, event: &MouseEvent) {
        trace!(kind = ?event.kind, button = ?event.button, "Mouse event");
    }

    fn set_input_method_active(&self, active: bool) {
        self.ime_active.set(active);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::ack_channel;

    fn engine() -> (EchoEngine, crate::render::AckReceiver) {
        let (sender, receiver) = ack_channel(None);
        (EchoEngine::new(sender), receiver)
    }

    #[test]
    fn test_plain_key_inserts_and_is_consumed() {
        let (engine, acks) = engine();
        engine.forward_keyboard_event(&KeyboardEvent::key_down("a", 0x41).with_text("a"));
        assert_eq!(engine.display_text(), "a");
        assert!(acks.try_recv().unwrap().consumed);
    }

    #[test]
    fn test_system_key_is_not_consumed() {
        let (engine, acks) = engine();
        engine.forward_keyboard_event(&KeyboardEvent::synthetic_key_down("b"));
        assert_eq!(engine.display_text(), "");
        assert!(!acks.try_recv().unwrap().consumed);
    }

    #[test]
    fn test_key_up_is_acked() {
        let (engine, acks) = engine();
        engine.forward_keyboard_event(&KeyboardEvent::synthetic_key_up(0x41));
        let ack = acks.try_recv().unwrap();
        assert!(!ack.event.is_key_down());
        assert!(!ack.consumed);
    }

    #[test]
    fn test_backspace() {
        let (engine, _acks) = engine();
        engine.ime_confirm_composition("ab");
        engine.forward_keyboard_event(&KeyboardEvent::key_down("BackSpace", 0x08));
        assert_eq!(engine.display_text(), "a");
    }

    #[test]
    fn test_control_shortcut_not_inserted() {
        let (engine, acks) = engine();
        let event = KeyboardEvent::key_down("c", 0x43)
            .with_text("c")
            .with_modifiers(Modifiers::CONTROL);
        engine.forward_keyboard_event(&event);
        assert_eq!(engine.display_text(), "");
        assert!(!acks.try_recv().unwrap().consumed);
    }

    #[test]
    fn test_composition_then_confirm() {
        let (engine, _acks) = engine();
        engine.ime_set_composition("ka", &[], 2, 2);
        assert_eq!(engine.display_text(), "[ka]");
        engine.ime_confirm_composition("か");
        assert_eq!(engine.display_text(), "か");
    }

    #[test]
    fn test_input_method_activity_is_tracked() {
        let (engine, _acks) = engine();
        assert!(!engine.is_ime_active());
        engine.set_input_method_active(true);
        assert!(engine.is_ime_active());
        engine.set_input_method_active(false);
        assert!(!engine.is_ime_active());
    }
}
