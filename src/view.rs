//! Per-widget controller.
//!
//! A [`RenderWidgetView`] receives toolkit events for one widget and routes
//! them through its [`InputMethodSession`] and [`KeyEventSequencer`] towards
//! the engine. Without an input method (no default IMF on the platform) it
//! forwards keys straight to the engine.

use std::mem;
use std::rc::Rc;

use euclid::default::Rect;
use tracing::{debug, trace};

use crate::config::Config;
use crate::events::{GestureEvent, GestureKind, KeyboardEvent, MouseEvent, TouchEvent};
use crate::ime_session::{InputMethodSession, SessionEffect};
use crate::imf::{ImfEvent, InputMethodFramework};
use crate::panel::{InputType, TextInputMode};
use crate::render::{AckReceiver, InputEventAck, RenderWidgetHost};
use crate::sequencer::KeyEventSequencer;
use crate::signals::ViewSignal;

/// Text input state reported by the engine for the focused element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextInputState {
    pub input_type: InputType,
    pub input_mode: TextInputMode,
    pub can_compose_inline: bool,
    pub show_ime_if_needed: bool,
    pub is_user_action: bool,
}

impl TextInputState {
    pub fn user_focus(input_type: InputType) -> Self {
        Self {
            input_type,
            input_mode: TextInputMode::Default,
            can_compose_inline: true,
            show_ime_if_needed: true,
            is_user_action: true,
        }
    }
}

pub struct RenderWidgetView {
    host: Rc<dyn RenderWidgetHost>,
    acks: AckReceiver,
    session: Option<InputMethodSession>,
    sequencer: KeyEventSequencer,
    signals: Vec<ViewSignal>,
    use_keypad_without_user_action: bool,
    pinch_zoom_enabled: bool,
    fullscreen: bool,
    device_scale_factor: f32,
}

impl RenderWidgetView {
    pub fn new(
        host: Rc<dyn RenderWidgetHost>,
        acks: AckReceiver,
        framework: Rc<dyn InputMethodFramework>,
        config: &Config,
    ) -> Self {
        let session = InputMethodSession::initialize(framework, host.clone(), &config.ime);
        let sequencer = KeyEventSequencer::new(host.clone(), config.ime.max_pending_events);

        Self {
            host,
            acks,
            session,
            sequencer,
            signals: Vec::new(),
            use_keypad_without_user_action: config.ime.use_keypad_without_user_action,
            pinch_zoom_enabled: config.view.pinch_zoom_enabled,
            fullscreen: false,
            device_scale_factor: 1.0,
        }
    }

    // ─────────────────────────────────────────────────────────────────────
    // Keyboard
    // ─────────────────────────────────────────────────────────────────────

    pub fn handle_key_down(&mut self, event: KeyboardEvent) {
        let Some(session) = self.session.as_mut() else {
            self.host.forward_keyboard_event(&event);
            return;
        };

        let filtered = session.handle_key_down(&event);
        let preedit_pending = session.has_pending_preedit();
        self.apply_session_effects();
        self.sequencer.key_down(event, filtered, preedit_pending);
    }

    /// With an input method the engine only ever sees synthesized key-ups.
    pub fn handle_key_up(&mut self, event: KeyboardEvent) {
        match self.session.as_mut() {
            Some(session) => {
                session.handle_key_up(&event);
                self.apply_session_effects();
            }
            None => self.host.forward_keyboard_event(&event),
        }
    }

    /// Feeds every acknowledgement the engine sent since the last call.
    pub fn pump_acks(&mut self) -> usize {
        let mut handled = 0;
        while let Some(ack) = self.acks.try_recv() {
            self.on_input_event_handled(&ack);
            handled += 1;
        }
        handled
    }

    pub fn on_input_event_handled(&mut self, ack: &InputEventAck) {
        let Some(session) = self.session.as_mut() else {
            return;
        };
        trace!(key = %ack.event.key, consumed = ack.consumed, "Input event handled");
        self.sequencer.on_input_event_handled(ack, session);
        self.apply_session_effects();
    }

    // ─────────────────────────────────────────────────────────────────────
    // Input method
    // ─────────────────────────────────────────────────────────────────────

    /// Callback pushed by the platform outside of a key filter call.
    pub fn handle_imf_event(&mut self, event: ImfEvent) {
        if let Some(session) = self.session.as_mut() {
            session.handle_imf_event(event);
            self.apply_session_effects();
        }
    }

    pub fn text_input_state_changed(&mut self, state: TextInputState) {
        if !state.show_ime_if_needed && !self.use_keypad_without_user_action {
            return;
        }
        if let Some(session) = self.session.as_mut() {
            session.update_input_method_state(
                state.input_type,
                state.can_compose_inline,
                state.input_mode,
                state.is_user_action,
            );
            self.apply_session_effects();
        }
    }

    pub fn ime_cancel_composition(&mut self) {
        if let Some(session) = self.session.as_mut() {
            session.cancel_composition();
            self.apply_session_effects();
        }
    }

    pub fn text_input_in_form_state_changed(&mut self, is_in_form_tag: bool) {
        if let Some(session) = self.session.as_mut() {
            session.set_is_in_form_tag(is_in_form_tag);
        }
    }

    /// Selection bounds in CSS pixels; the caret rectangle is their union in
    /// device pixels.
    pub fn selection_bounds_changed(&mut self, anchor: Rect<i32>, focus: Rect<i32>) {
        let scale = self.device_scale_factor;
        let to_pixels = |rect: Rect<i32>| rect.to_f32().scale(scale, scale).round_out().to_i32();
        let caret = to_pixels(anchor).union(&to_pixels(focus));
        if let Some(session) = self.session.as_mut() {
            session.update_caret_bounds(caret);
        }
    }

    pub fn surrounding_text_changed(&mut self, text: &str, cursor: usize) {
        if let Some(session) = self.session.as_mut() {
            session.update_surrounding_text(text, cursor);
        }
    }

    pub fn retrieve_surrounding(&self) -> Option<(&str, usize)> {
        self.session.as_ref()?.retrieve_surrounding()
    }

    // ─────────────────────────────────────────────────────────────────────
    // Focus and pointer
    // ─────────────────────────────────────────────────────────────────────

    pub fn handle_focus_in(&mut self) {
        if let Some(session) = self.session.as_mut() {
            session.on_focus_in();
            self.apply_session_effects();
        }
    }

    pub fn handle_focus_out(&mut self) {
        if let Some(session) = self.session.as_mut() {
            session.on_focus_out();
            self.apply_session_effects();
        }
    }

    pub fn handle_mouse_down(&mut self, event: MouseEvent) {
        self.host.forward_mouse_event(&event);
    }

    /// Releasing the pointer may move the caret: any composition is dropped.
    pub fn handle_mouse_up(&mut self, event: MouseEvent) {
        if let Some(session) = self.session.as_mut() {
            session.reset();
            self.apply_session_effects();
        }
        self.host.forward_mouse_event(&event);
    }

    pub fn handle_mouse_move(&mut self, event: MouseEvent) {
        self.host.forward_mouse_event(&event);
    }

    pub fn handle_gesture(&mut self, event: GestureEvent) {
        if event.kind.is_pinch() && (!self.pinch_zoom_enabled || self.fullscreen) {
            debug!(kind = ?event.kind, fullscreen = self.fullscreen, "Pinch gesture dropped");
            return;
        }

        if event.kind == GestureKind::PinchEnd {
            self.signals.push(ViewSignal::ZoomFinished);
        }

        // The engine does not stop a running fling on tap-down by itself.
        if event.kind == GestureKind::TapDown {
            let fling_cancel = GestureEvent {
                kind: GestureKind::FlingCancel,
                ..event.clone()
            };
            self.host.forward_gesture_event(&fling_cancel);
        }

        self.host.forward_gesture_event(&event);
    }

    pub fn handle_touch(&mut self, event: TouchEvent) {
        if event.points.is_empty() {
            return;
        }
        self.host.forward_touch_event(&event);
    }

    // ─────────────────────────────────────────────────────────────────────
    // Session effects and state
    // ─────────────────────────────────────────────────────────────────────

    fn apply_session_effects(&mut self) {
        let effects = match self.session.as_mut() {
            Some(session) => session.take_effects(),
            None => return,
        };
        for effect in effects {
            match effect {
                SessionEffect::SyntheticKeyDown(event) => {
                    self.sequencer.forward_synthetic_key_down(event);
                }
                SessionEffect::QueuesCleared => self.sequencer.clear_queues(),
                SessionEffect::Signal(signal) => {
                    debug!(signal = signal.name(), "View signal");
                    self.signals.push(signal);
                }
            }
        }
    }

    /// Signals raised since the last call, oldest first.
    pub fn take_signals(&mut self) -> Vec<ViewSignal> {
        mem::take(&mut self.signals)
    }

    pub fn set_fullscreen(&mut self, fullscreen: bool) {
        self.fullscreen = fullscreen;
    }

    pub fn set_device_scale_factor(&mut self, scale: f32) {
        self.device_scale_factor = scale;
    }

    pub fn is_ime_shown(&self) -> bool {
        self.session
            .as_ref()
            .is_some_and(InputMethodSession::is_panel_shown)
    }

    pub fn has_input_method(&self) -> bool {
        self.session.is_some()
    }

    pub fn session(&self) -> Option<&InputMethodSession> {
        self.session.as_ref()
    }

    pub fn sequencer(&self) -> &KeyEventSequencer {
        &self.sequencer
    }
}
