//! Bridge between one native input-method context and one render widget.
//!
//! The session owns the live composition and the two FIFO queues of
//! commits and preedit snapshots. Those queues are only drained by the
//! [`crate::sequencer::KeyEventSequencer`] once the engine acknowledged the
//! key-down that produced them.
//!
//! Work the view has to carry out on the session's behalf (forward a
//! synthetic key, clear the sequencer queues, emit a widget signal) is
//! recorded as [`SessionEffect`]s and collected with
//! [`InputMethodSession::take_effects`].

use std::mem;
use std::rc::Rc;

use euclid::default::Rect;
use tracing::{debug, info, warn};

use crate::config::ImeConfig;
use crate::events::{CompositionText, KeyboardEvent};
use crate::imf::{
    CandidatePanelState, ImfEvent, InputMethodContext, InputMethodFramework, InputPanelState,
};
use crate::panel::{self, InputType, ReturnKeyType, TextInputMode};
use crate::queue::BoundedQueue;
use crate::render::RenderWidgetHost;
use crate::signals::ViewSignal;

#[derive(Debug, Clone, PartialEq)]
pub enum SessionEffect {
    /// Forward this key-down now and remember its key-up.
    SyntheticKeyDown(KeyboardEvent),
    /// Commit and preedit queues were dropped; the key queues must follow.
    QueuesCleared,
    Signal(ViewSignal),
}

pub struct InputMethodSession {
    framework: Rc<dyn InputMethodFramework>,
    host: Rc<dyn RenderWidgetHost>,
    /// `None` only after a failed context recreation.
    context: Option<Box<dyn InputMethodContext>>,
    focused: bool,
    enabled: bool,
    panel_was_ever_shown: bool,
    is_in_form_tag: bool,
    /// Set while a hardware key-down is inside the framework filter.
    is_handling_keydown: bool,
    input_type: InputType,
    use_keypad_without_user_action: bool,
    composition: CompositionText,
    commit_queue: BoundedQueue<String>,
    preedit_queue: BoundedQueue<CompositionText>,
    surrounding: Option<(String, usize)>,
    ime_rect: Rect<i32>,
    effects: Vec<SessionEffect>,
}

fn create_context(framework: &dyn InputMethodFramework) -> Option<Box<dyn InputMethodContext>> {
    let mut context = framework.create_context()?;
    context.set_input_panel_enabled(false);
    context.set_use_preedit(false);
    Some(context)
}

impl InputMethodSession {
    /// Binds a new native context to `host`.
    ///
    /// Returns `None` when the platform has no default input method; the
    /// caller then runs in hardware-keyboard-only mode.
    pub fn initialize(
        framework: Rc<dyn InputMethodFramework>,
        host: Rc<dyn RenderWidgetHost>,
        config: &ImeConfig,
    ) -> Option<Self> {
        let Some(context) = create_context(framework.as_ref()) else {
            info!("No default input method context, hardware keyboard only");
            return None;
        };

        Some(Self {
            framework,
            host,
            context: Some(context),
            focused: false,
            enabled: false,
            panel_was_ever_shown: false,
            is_in_form_tag: false,
            is_handling_keydown: false,
            input_type: InputType::None,
            use_keypad_without_user_action: config.use_keypad_without_user_action,
            composition: CompositionText::default(),
            commit_queue: BoundedQueue::new("commit", config.max_pending_events),
            preedit_queue: BoundedQueue::new("preedit", config.max_pending_events),
            surrounding: None,
            ime_rect: Rect::zero(),
            effects: Vec::new(),
        })
    }

    /// Destroys the native context and creates a fresh one.
    fn reset_imf_context(&mut self) {
        if let Some(mut old) = self.context.take() {
            old.focus_out();
            old.hide_input_panel();
        }
        self.context = create_context(self.framework.as_ref());
        if self.context.is_none() {
            warn!("Input method context could not be recreated, IME disabled");
        }
    }

    // ─────────────────────────────────────────────────────────────────────
    // Engine-driven state
    // ─────────────────────────────────────────────────────────────────────

    /// Called when the focused element's expected input changes.
    ///
    /// Must only be called while focused: IME messages from the engine are
    /// switched off on focus-out.
    pub fn update_input_method_state(
        &mut self,
        input_type: InputType,
        can_compose_inline: bool,
        input_mode: TextInputMode,
        is_user_action: bool,
    ) {
        debug!(?input_type, can_compose_inline, is_user_action, "Input method state update");

        self.input_type = input_type;
        self.enabled = input_type != InputType::None;
        self.clear_queues();
        self.composition.clear();
        if let Some(context) = self.context.as_mut() {
            context.reset();
        }

        debug_assert!(self.focused, "input method state changed without focus");
        if !self.focused {
            warn!(?input_type, "Input method state changed without focus");
        }

        if self.enabled {
            self.show_panel(input_type, input_mode, is_user_action);
        } else {
            self.hide_panel();
        }

        if self.enabled
            && let Some(context) = self.context.as_mut()
        {
            context.set_use_preedit(can_compose_inline);
        }
    }

    fn show_panel(&mut self, input_type: InputType, input_mode: TextInputMode, is_user_action: bool) {
        if !is_user_action && !self.use_keypad_without_user_action {
            return;
        }
        let Some(config) = panel::panel_config(input_type, input_mode, self.is_in_form_tag) else {
            return;
        };

        if self.panel_was_ever_shown {
            self.reset_imf_context();
        }
        self.panel_was_ever_shown = true;

        let Some(context) = self.context.as_mut() else {
            return;
        };
        context.set_input_panel_layout(config.layout);
        context.set_input_mode(config.input_mode);
        context.set_return_key_type(config.return_key);
        context.set_autocapital_type(config.autocapital);
        context.set_prediction_allowed(config.prediction_allowed);
        context.focus_in();
        context.show_input_panel();
        debug!(layout = ?config.layout, return_key = ?config.return_key, "Input panel shown");
    }

    fn hide_panel(&mut self) {
        if let Some(context) = self.context.as_mut() {
            context.focus_out();
            context.hide_input_panel();
        }
    }

    /// Adjusts the return key when the focused field enters or leaves a form.
    pub fn set_is_in_form_tag(&mut self, is_in_form_tag: bool) {
        self.is_in_form_tag = is_in_form_tag;
        let Some(context) = self.context.as_mut() else {
            return;
        };
        if context.input_panel_state() == InputPanelState::Hidden {
            return;
        }
        if context.return_key_type() == ReturnKeyType::Search {
            return;
        }
        context.set_return_key_type(panel::return_key_for_form_state(
            self.input_type,
            is_in_form_tag,
        ));
    }

    pub fn update_caret_bounds(&mut self, caret: Rect<i32>) {
        if !self.enabled {
            return;
        }
        if let Some(context) = self.context.as_mut() {
            context.set_cursor_location(caret);
        }
    }

    /// Text around the caret, as last reported by the engine.
    pub fn update_surrounding_text(&mut self, text: impl Into<String>, cursor: usize) {
        self.surrounding = Some((text.into(), cursor));
    }

    /// Answers the framework's surrounding-text query.
    pub fn retrieve_surrounding(&self) -> Option<(&str, usize)> {
        self.surrounding
            .as_ref()
            .map(|(text, cursor)| (text.as_str(), *cursor))
    }

    // ─────────────────────────────────────────────────────────────────────
    // Keys and focus
    // ─────────────────────────────────────────────────────────────────────

    /// Gives the framework first pick of a key-down. Returns whether it was filtered.
    pub fn handle_key_down(&mut self, event: &KeyboardEvent) -> bool {
        let result = match self.context.as_mut() {
            Some(context) => context.filter_key_down(event),
            None => return false,
        };
        self.is_handling_keydown = true;
        for imf_event in result.events {
            self.handle_imf_event(imf_event);
        }
        self.is_handling_keydown = false;
        result.filtered
    }

    pub fn handle_key_up(&mut self, event: &KeyboardEvent) -> bool {
        let result = match self.context.as_mut() {
            Some(context) => context.filter_key_up(event),
            None => return false,
        };
        for imf_event in result.events {
            self.handle_imf_event(imf_event);
        }
        result.filtered
    }

    pub fn on_focus_in(&mut self) {
        self.cancel_composition();

        if self.focused {
            return;
        }
        debug!("IME focus in");
        self.focused = true;

        if self.enabled
            && let Some(context) = self.context.as_mut()
        {
            context.focus_in();
            context.show_input_panel();
        }

        self.host.set_input_method_active(true);
    }

    pub fn on_focus_out(&mut self) {
        if !self.focused {
            return;
        }
        debug!("IME focus out");
        self.focused = false;

        self.clear_queues();
        self.composition.clear();
        if let Some(context) = self.context.as_mut() {
            context.reset();
            context.focus_out();
            context.hide_input_panel();
        }

        self.host.set_input_method_active(false);
    }

    pub fn reset(&mut self) {
        self.clear_queues();
        self.composition.clear();
        if let Some(context) = self.context.as_mut() {
            context.reset();
        }
    }

    pub fn cancel_composition(&mut self) {
        debug!("Cancel composition");
        self.reset();
    }

    fn clear_queues(&mut self) {
        self.commit_queue.clear();
        self.preedit_queue.clear();
        self.effects.push(SessionEffect::QueuesCleared);
    }

    // ─────────────────────────────────────────────────────────────────────
    // Framework callbacks
    // ─────────────────────────────────────────────────────────────────────

    pub fn handle_imf_event(&mut self, event: ImfEvent) {
        match event {
            ImfEvent::Commit(text) => self.on_commit(text),
            ImfEvent::PreeditChanged(text) => self.on_preedit_changed(&text),
            ImfEvent::DeleteSurrounding { offset, count } => {
                debug!(offset, count, "Delete surrounding ignored");
            }
            ImfEvent::InputPanelState(state) => {
                let signal = match state {
                    InputPanelState::Shown => ViewSignal::ImeInputPanelShown,
                    InputPanelState::Hidden => ViewSignal::ImeInputPanelHidden,
                };
                self.effects.push(SessionEffect::Signal(signal));
            }
            ImfEvent::InputPanelGeometry(rect) => {
                self.ime_rect = rect;
                self.effects
                    .push(SessionEffect::Signal(ViewSignal::ImeInputMethodChanged(rect)));
            }
            ImfEvent::CandidatePanelState(state) => {
                let signal = match state {
                    CandidatePanelState::Shown => ViewSignal::ImeCandidatePanelShown,
                    CandidatePanelState::Hidden => ViewSignal::ImeCandidatePanelHidden,
                };
                self.effects.push(SessionEffect::Signal(signal));
            }
            ImfEvent::CandidatePanelGeometry(rect) => {
                debug!(?rect, "Candidate panel geometry ignored");
            }
            ImfEvent::LanguageChanged => self.on_language_changed(),
        }
    }

    fn on_commit(&mut self, text: String) {
        debug!(text = %text, "IME commit");
        self.composition.clear();
        self.queue_synthetic_key_down(&text);
        // Held until the key-down ack says whether the engine already applied it.
        self.commit_queue.push(text);
    }

    fn on_preedit_changed(&mut self, text: &str) {
        debug!(text, "IME preedit");
        self.queue_synthetic_key_down(text);
        self.composition = CompositionText::from_preedit(text);
        self.preedit_queue.push(self.composition.clone());
    }

    fn on_language_changed(&mut self) {
        if self.composition.is_empty() {
            return;
        }
        let text = self.composition.text.clone();
        self.reset();
        self.host.ime_confirm_composition(&text);
        self.composition.clear();
    }

    /// Lets the engine's key path see some activity for text the framework
    /// produced on its own. The text itself still goes through the queues.
    fn queue_synthetic_key_down(&mut self, text: &str) {
        if self.is_handling_keydown {
            return;
        }
        let Some(last) = text.chars().last() else {
            return;
        };
        let symbol = if last.is_whitespace() {
            "space".to_string()
        } else {
            last.to_string()
        };
        self.effects.push(SessionEffect::SyntheticKeyDown(
            KeyboardEvent::synthetic_key_down(&symbol),
        ));
    }

    // ─────────────────────────────────────────────────────────────────────
    // Accessors
    // ─────────────────────────────────────────────────────────────────────

    pub fn take_effects(&mut self) -> Vec<SessionEffect> {
        mem::take(&mut self.effects)
    }

    pub fn commit_queue_front(&self) -> Option<&str> {
        self.commit_queue.front().map(String::as_str)
    }

    pub fn pop_commit(&mut self) -> Option<String> {
        self.commit_queue.pop()
    }

    pub fn preedit_queue_front(&self) -> Option<&CompositionText> {
        self.preedit_queue.front()
    }

    pub fn pop_preedit(&mut self) -> Option<CompositionText> {
        self.preedit_queue.pop()
    }

    pub fn has_pending_preedit(&self) -> bool {
        !self.preedit_queue.is_empty()
    }

    pub fn pending_commits(&self) -> usize {
        self.commit_queue.len()
    }

    pub fn pending_preedits(&self) -> usize {
        self.preedit_queue.len()
    }

    /// The live composition; empty when nothing is being composed.
    pub fn composition(&self) -> &CompositionText {
        &self.composition
    }

    pub fn is_focused(&self) -> bool {
        self.focused
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn input_type(&self) -> InputType {
        self.input_type
    }

    pub fn has_context(&self) -> bool {
        self.context.is_some()
    }

    /// Last on-screen keyboard geometry reported by the framework.
    pub fn ime_rect(&self) -> Rect<i32> {
        self.ime_rect
    }

    pub fn is_panel_shown(&self) -> bool {
        self.focused
            && self
                .context
                .as_ref()
                .is_some_and(|context| context.input_panel_state() != InputPanelState::Hidden)
    }
}
