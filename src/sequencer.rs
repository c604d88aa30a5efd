//! Ordering of keyboard and composition events towards the engine.
//!
//! Every key-down that reaches the engine gets a synthetic key-up recorded
//! here; the key-up is only sent after the engine acknowledged a key-down.
//! Commits and preedits produced by the input method wait in the session
//! queues for the same acknowledgement, so the engine always sees
//! `key-down → composition → key-up` in the order the user typed.

use std::rc::Rc;

use tracing::{debug, trace, warn};

use crate::events::{KeyEventKind, KeyboardEvent};
use crate::ime_session::InputMethodSession;
use crate::queue::BoundedQueue;
use crate::render::{InputEventAck, RenderWidgetHost};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SequencerState {
    /// Every forwarded key-down was acknowledged.
    Idle,
    AwaitingAck,
    /// Inside [`KeyEventSequencer::on_input_event_handled`].
    Draining,
}

pub struct KeyEventSequencer {
    host: Rc<dyn RenderWidgetHost>,
    /// Windows key codes of key-ups still to synthesize.
    keyup_queue: BoundedQueue<u16>,
    keydown_queue: BoundedQueue<KeyboardEvent>,
    /// A modifier-carrying key-down was acknowledged and its drain deferred.
    is_modifier_key: bool,
    awaiting_key_downs: usize,
    draining: bool,
}

impl KeyEventSequencer {
    pub fn new(host: Rc<dyn RenderWidgetHost>, max_pending_events: usize) -> Self {
        Self {
            host,
            keyup_queue: BoundedQueue::new("keyup", max_pending_events),
            keydown_queue: BoundedQueue::new("keydown", max_pending_events),
            is_modifier_key: false,
            awaiting_key_downs: 0,
            draining: false,
        }
    }

    fn forward(&mut self, event: &KeyboardEvent) {
        if event.is_key_down() {
            self.awaiting_key_downs += 1;
        }
        self.host.forward_keyboard_event(event);
    }

    /// Hardware key-down after the input method had a look at it.
    ///
    /// The event is held back while the engine still has to see the key-up
    /// of an earlier key and a preedit is waiting behind it.
    pub fn key_down(&mut self, mut event: KeyboardEvent, filtered: bool, preedit_pending: bool) {
        if filtered {
            event.is_system_key = true;
        }
        let windows_key_code = event.windows_key_code;

        if preedit_pending && !self.keyup_queue.is_empty() {
            debug!(key = %event.key, "Key-down queued behind pending preedit");
            self.keydown_queue.push(event);
        } else {
            self.forward(&event);
        }

        self.keyup_queue.push(windows_key_code);
    }

    /// Key-down synthesized for text the input method produced on its own.
    pub fn forward_synthetic_key_down(&mut self, event: KeyboardEvent) {
        trace!(key = %event.key, "Synthetic key-down");
        self.keyup_queue.push(event.windows_key_code);
        self.forward(&event);
    }

    /// Engine acknowledgement for a forwarded keyboard event.
    pub fn on_input_event_handled(&mut self, ack: &InputEventAck, session: &mut InputMethodSession) {
        if ack.event.kind != KeyEventKind::KeyDown {
            return;
        }

        if self.awaiting_key_downs == 0 {
            warn!(key = %ack.event.key, "Key-down ack with nothing outstanding");
        } else {
            self.awaiting_key_downs -= 1;
        }

        if !ack.event.modifiers.is_empty() && !self.is_modifier_key {
            self.is_modifier_key = true;
            return;
        }

        self.draining = true;
        if self.is_modifier_key {
            self.drain_once(ack.consumed, session);
            self.is_modifier_key = false;
        }
        self.drain_once(ack.consumed, session);
        self.draining = false;
    }

    /// Pops at most one entry from each queue: commit, preedit, key-up, key-down.
    fn drain_once(&mut self, consumed: bool, session: &mut InputMethodSession) {
        if let Some(text) = session.pop_commit()
            && !consumed
        {
            self.host.ime_confirm_composition(&text);
        }

        if let Some(composition) = session.pop_preedit()
            && !consumed
        {
            self.host.ime_set_composition(
                &composition.text,
                &composition.underlines,
                composition.selection.start,
                composition.selection.end,
            );
        }

        if let Some(windows_key_code) = self.keyup_queue.pop() {
            self.forward(&KeyboardEvent::synthetic_key_up(windows_key_code));
        }

        if let Some(event) = self.keydown_queue.pop() {
            self.forward(&event);
        }
    }

    pub fn clear_queues(&mut self) {
        self.keyup_queue.clear();
        self.keydown_queue.clear();
    }

    pub fn state(&self) -> SequencerState {
        if self.draining {
            SequencerState::Draining
        } else if self.awaiting_key_downs > 0 {
            SequencerState::AwaitingAck
        } else {
            SequencerState::Idle
        }
    }

    pub fn pending_key_ups(&self) -> usize {
        self.keyup_queue.len()
    }

    pub fn pending_key_downs(&self) -> usize {
        self.keydown_queue.len()
    }

    pub fn is_modifier_pending(&self) -> bool {
        self.is_modifier_key
    }
}
