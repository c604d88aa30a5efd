//! Boundary towards the render widget host of the engine.
//!
//! Sends are fire-and-forget. For keyboard events only, the engine later
//! answers with an [`InputEventAck`] on the channel built by
//! [`ack_channel`]. Acks must arrive in the order the events were
//! forwarded; the sequencer relies on it.

use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, Sender, TryRecvError};

use tracing::warn;

use crate::events::{CompositionUnderline, GestureEvent, KeyboardEvent, MouseEvent, TouchEvent};

/// The engine side of a view.
pub trait RenderWidgetHost {
    fn forward_keyboard_event(&self, event: &KeyboardEvent);

    fn ime_set_composition(
        &self,
        text: &str,
        underlines: &[CompositionUnderline],
        selection_start: u32,
        selection_end: u32,
    );

    fn ime_confirm_composition(&self, text: &str);

    fn forward_gesture_event(&self, event: &GestureEvent);

    fn forward_touch_event(&self, event: &TouchEvent);

    fn forward_mouse_event(&self, event: &MouseEvent);

    /// Turns the engine's input-method state notifications on or off.
    fn set_input_method_active(&self, active: bool);
}

/// "Input event handled" notification for a forwarded keyboard event.
#[derive(Debug, Clone, PartialEq)]
pub struct InputEventAck {
    pub event: KeyboardEvent,
    /// The engine handled the event itself (e.g. default action not prevented
    /// and text inserted through the key path).
    pub consumed: bool,
}

/// Wakes the UI loop after an ack was sent from another thread.
pub trait AckWaker: Send + Sync {
    fn wake(&self);
}

#[derive(Clone)]
pub struct AckSender {
    sender: Sender<InputEventAck>,
    waker: Option<Arc<dyn AckWaker>>,
}

impl AckSender {
    pub fn send(&self, ack: InputEventAck) {
        if self.sender.send(ack).is_err() {
            warn!("Ack receiver dropped, acknowledgement lost");
            return;
        }
        if let Some(waker) = &self.waker {
            waker.wake();
        }
    }
}

pub struct AckReceiver {
    receiver: Receiver<InputEventAck>,
}

impl AckReceiver {
    /// Next pending ack, without blocking.
    pub fn try_recv(&self) -> Option<InputEventAck> {
        match self.receiver.try_recv() {
            Ok(ack) => Some(ack),
            Err(TryRecvError::Empty | TryRecvError::Disconnected) => None,
        }
    }
}

/// Single-consumer, in-order channel carrying engine acknowledgements.
pub fn ack_channel(waker: Option<Arc<dyn AckWaker>>) -> (AckSender, AckReceiver) {
    let (sender, receiver) = mpsc::channel();
    (AckSender { sender, waker }, AckReceiver { receiver })
}
