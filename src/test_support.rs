//! Fakes shared by the unit tests: a recording engine host and a scriptable
//! input-method framework.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use euclid::default::Rect;

use crate::events::{CompositionUnderline, GestureEvent, KeyboardEvent, MouseEvent, TouchEvent};
use crate::imf::{FilterResult, InputMethodContext, InputMethodFramework, InputPanelState};
use crate::panel::{AutocapitalType, ImfInputMode, PanelLayout, ReturnKeyType};
use crate::render::{AckReceiver, AckSender, InputEventAck, RenderWidgetHost, ack_channel};

// ─────────────────────────────────────────────────────────────────────────────
// Engine side
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub enum HostCall {
    KeyboardEvent(KeyboardEvent),
    SetComposition {
        text: String,
        underlines: Vec<CompositionUnderline>,
        selection_start: u32,
        selection_end: u32,
    },
    ConfirmComposition(String),
    Gesture(GestureEvent),
    Touch(TouchEvent),
    Mouse(MouseEvent),
    InputMethodActive(bool),
}

/// Records every call; keyboard events wait in `pending` until acked.
#[derive(Default)]
pub struct RecordingHost {
    calls: RefCell<Vec<HostCall>>,
    pending: RefCell<VecDeque<KeyboardEvent>>,
    acks: Option<AckSender>,
}

impl RecordingHost {
    pub fn with_ack_channel() -> (Rc<Self>, AckReceiver) {
        let (sender, receiver) = ack_channel(None);
        let host = Self {
            acks: Some(sender),
            ..Self::default()
        };
        (Rc::new(host), receiver)
    }

    pub fn calls(&self) -> Vec<HostCall> {
        self.calls.borrow().clone()
    }

    pub fn take_calls(&self) -> Vec<HostCall> {
        std::mem::take(&mut *self.calls.borrow_mut())
    }

    pub fn forwarded_keys(&self) -> Vec<KeyboardEvent> {
        self.calls
            .borrow()
            .iter()
            .filter_map(|call| match call {
                HostCall::KeyboardEvent(event) => Some(event.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn confirms(&self) -> Vec<String> {
        self.calls
            .borrow()
            .iter()
            .filter_map(|call| match call {
                HostCall::ConfirmComposition(text) => Some(text.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn compositions(&self) -> Vec<String> {
        self.calls
            .borrow()
            .iter()
            .filter_map(|call| match call {
                HostCall::SetComposition { text, .. } => Some(text.clone()),
                _ => None,
            })
            .collect()
    }

    /// Acknowledges the oldest unacknowledged keyboard event.
    pub fn ack_next(&self, consumed: bool) -> bool {
        let Some(event) = self.pending.borrow_mut().pop_front() else {
            return false;
        };
        if let Some(sender) = &self.acks {
            sender.send(InputEventAck { event, consumed });
        }
        true
    }

    /// Acknowledges every keyboard event forwarded so far.
    pub fn ack_all(&self, consumed: bool) -> usize {
        let mut count = 0;
        while self.ack_next(consumed) {
            count += 1;
        }
        count
    }
}

impl RenderWidgetHost for RecordingHost {
    fn forward_keyboard_event(&self, event: &KeyboardEvent) {
        self.pending.borrow_mut().push_back(event.clone());
        self.calls
            .borrow_mut()
            .push(HostCall::KeyboardEvent(event.clone()));
    }

    fn ime_set_composition(
        &self,
        text: &str,
        underlines: &[CompositionUnderline],
        selection_start: u32,
        selection_end: u32,
    ) {
        self.calls.borrow_mut().push(HostCall::SetComposition {
            text: text.to_string(),
            underlines: underlines.to_vec(),
            selection_start,
            selection_end,
        });
    }

    fn ime_confirm_composition(&self, text: &str) {
        self.calls
            .borrow_mut()
            .push(HostCall::ConfirmComposition(text.to_string()));
    }

    fn forward_gesture_event(&self, event: &GestureEvent) {
        self.calls.borrow_mut().push(HostCall::Gesture(event.clone()));
    }

    fn forward_touch_event(&self, event: &TouchEvent) {
        self.calls.borrow_mut().push(HostCall::Touch(event.clone()));
    }

    fn forward_mouse_event(&self, event: &MouseEvent) {
        self.calls.borrow_mut().push(HostCall::Mouse(event.clone()));
    }

    fn set_input_method_active(&self, active: bool) {
        self.calls
            .borrow_mut()
            .push(HostCall::InputMethodActive(active));
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Input method side
// ─────────────────────────────────────────────────────────────────────────────

/// State shared by a fake framework and every context it created.
#[derive(Debug, Default)]
pub struct FakeImfState {
    pub available: bool,
    pub contexts_created: usize,
    /// Filter results handed out in order; passthrough once exhausted.
    pub scripted_key_downs: VecDeque<FilterResult>,
    pub scripted_key_ups: VecDeque<FilterResult>,
    pub focused: bool,
    pub resets: usize,
    pub panel_state: InputPanelState,
    pub panel_enabled: Option<bool>,
    pub use_preedit: Option<bool>,
    pub layout: Option<PanelLayout>,
    pub input_mode: Option<ImfInputMode>,
    pub return_key: ReturnKeyType,
    pub autocapital: Option<AutocapitalType>,
    pub prediction_allowed: Option<bool>,
    pub cursor_location: Option<Rect<i32>>,
}

pub struct FakeFramework {
    pub state: Rc<RefCell<FakeImfState>>,
}

impl FakeFramework {
    pub fn available() -> Self {
        let state = FakeImfState {
            available: true,
            ..FakeImfState::default()
        };
        Self {
            state: Rc::new(RefCell::new(state)),
        }
    }

    pub fn unavailable() -> Self {
        Self {
            state: Rc::new(RefCell::new(FakeImfState::default())),
        }
    }
}

impl InputMethodFramework for FakeFramework {
    fn create_context(&self) -> Option<Box<dyn InputMethodContext>> {
        let mut state = self.state.borrow_mut();
        if !state.available {
            return None;
        }
        state.contexts_created += 1;
        Some(Box::new(FakeContext {
            state: self.state.clone(),
        }))
    }
}

pub struct FakeContext {
    state: Rc<RefCell<FakeImfState>>,
}

impl InputMethodContext for FakeContext {
    fn filter_key_down(&mut self, _event: &KeyboardEvent) -> FilterResult {
        self.state
            .borrow_mut()
            .scripted_key_downs
            .pop_front()
            .unwrap_or_default()
    }

    fn filter_key_up(&mut self, _event: &KeyboardEvent) -> FilterResult {
        self.state
            .borrow_mut()
            .scripted_key_ups
            .pop_front()
            .unwrap_or_default()
    }

    fn reset(&mut self) {
        self.state.borrow_mut().resets += 1;
    }

    fn focus_in(&mut self) {
        self.state.borrow_mut().focused = true;
    }

    fn focus_out(&mut self) {
        self.state.borrow_mut().focused = false;
    }

    fn show_input_panel(&mut self) {
        self.state.borrow_mut().panel_state = InputPanelState::Shown;
    }

    fn hide_input_panel(&mut self) {
        self.state.borrow_mut().panel_state = InputPanelState::Hidden;
    }

    fn input_panel_state(&self) -> InputPanelState {
        self.state.borrow().panel_state
    }

    fn set_input_panel_enabled(&mut self, enabled: bool) {
        self.state.borrow_mut().panel_enabled = Some(enabled);
    }

    fn set_use_preedit(&mut self, use_preedit: bool) {
        self.state.borrow_mut().use_preedit = Some(use_preedit);
    }

    fn set_input_panel_layout(&mut self, layout: PanelLayout) {
        self.state.borrow_mut().layout = Some(layout);
    }

    fn set_input_mode(&mut self, mode: ImfInputMode) {
        self.state.borrow_mut().input_mode = Some(mode);
    }

    fn set_return_key_type(&mut self, return_key: ReturnKeyType) {
        self.state.borrow_mut().return_key = return_key;
    }

    fn return_key_type(&self) -> ReturnKeyType {
        self.state.borrow().return_key
    }

    fn set_autocapital_type(&mut self, autocapital: AutocapitalType) {
        self.state.borrow_mut().autocapital = Some(autocapital);
    }

    fn set_prediction_allowed(&mut self, allowed: bool) {
        self.state.borrow_mut().prediction_allowed = Some(allowed);
    }

    fn set_cursor_location(&mut self, rect: Rect<i32>) {
        self.state.borrow_mut().cursor_location = Some(rect);
    }
}
