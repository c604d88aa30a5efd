//! Boucle d'événements Winit du shell de démonstration.
//!
//! ## Pattern "Two-Phase App"
//!
//! Winit 0.30 impose que les fenêtres soient créées à l'intérieur du callback
//! `resumed()`, et non dans `main()`. La vue a besoin de la fenêtre (contexte
//! IME, facteur d'échelle), d'où un enum à deux états :
//!
//! ```text
//! App::Initial { waker, config }  →  [resumed() appelé]  →  App::Running(ShellState)
//! ```
//!
//! ## Flux des acquittements
//!
//! ```text
//! EchoEngine::forward_keyboard_event
//!         │ AckSender::send + wake()
//!         ▼
//!   EventLoopProxy::send_event(WakerEvent)
//!         │
//!         ▼
//!   user_event() → RenderWidgetView::pump_acks()
//!           └─ KeyEventSequencer vide les files (commit, preedit, key-up, key-down)
//! ```

use std::rc::Rc;
use std::sync::Arc;
use std::time::Instant;

use euclid::default::Point2D;
use tracing::{error, info, warn};
use winit::application::ApplicationHandler;
use winit::event::{
    ElementState, MouseButton as WinitMouseButton, TouchPhase as WinitTouchPhase, WindowEvent,
};
use winit::event_loop::{ActiveEventLoop, EventLoop, EventLoopProxy};
use winit::keyboard::ModifiersState;
use winit::window::{Window, WindowId};

use crate::config::Config;
use crate::engine::EchoEngine;
use crate::events::{
    GestureEvent, GestureKind, KeyEventKind, MouseButton, MouseEvent, MouseEventKind, TouchEvent,
    TouchPhase, TouchPoint,
};
use crate::imf::{InputMethodFramework, NoInputMethod};
use crate::keyutils;
use crate::panel::InputType;
use crate::registry::ViewRegistry;
use crate::render::{AckWaker, ack_channel};
use crate::view::{RenderWidgetView, TextInputState};
use crate::winit_ime::WinitInputMethod;

// ─────────────────────────────────────────────────────────────────────────────
// Waker : pont moteur → Winit
// ─────────────────────────────────────────────────────────────────────────────

/// Événement marqueur envoyé à travers le `EventLoopProxy` de Winit quand un
/// acquittement attend d'être traité.
#[derive(Debug)]
pub struct WakerEvent;

/// `Clone + Send + Sync` car `EventLoopProxy` l'est : le moteur peut
/// acquitter depuis n'importe quel thread.
#[derive(Clone)]
pub struct Waker(EventLoopProxy<WakerEvent>);

impl Waker {
    pub fn new(event_loop: &EventLoop<WakerEvent>) -> Self {
        Self(event_loop.create_proxy())
    }
}

impl AckWaker for Waker {
    fn wake(&self) {
        if let Err(error) = self.0.send_event(WakerEvent) {
            warn!(?error, "Échec du réveil de la boucle d'événements Winit");
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// ShellState
// ─────────────────────────────────────────────────────────────────────────────

/// État de l'application, créé lors de `resumed()`.
pub struct ShellState {
    pub window: Rc<Window>,
    pub engine: Rc<EchoEngine>,
    /// Contrôleurs de vue indexés par fenêtre.
    pub views: ViewRegistry<WindowId, RenderWidgetView>,
    /// Position courante du curseur en device pixels.
    pub cursor_position: Point2D<f32>,
    pub modifiers: ModifiersState,
    pub started: Instant,
    pub title: String,
}

impl ShellState {
    fn timestamp(&self) -> f64 {
        self.started.elapsed().as_secs_f64()
    }

    fn dispatch(&mut self, window_id: WindowId, event: WindowEvent) {
        let timestamp = self.timestamp();
        let modifiers = self.modifiers;
        let cursor = self.cursor_position;

        match event {
            WindowEvent::ModifiersChanged(new_modifiers) => {
                self.modifiers = new_modifiers.state();
            }
            WindowEvent::CursorMoved { position, .. } => {
                self.cursor_position = Point2D::new(position.x as f32, position.y as f32);
                if let Some(view) = self.views.get_mut(&window_id) {
                    view.handle_mouse_move(MouseEvent {
                        kind: MouseEventKind::Move,
                        button: MouseButton::None,
                        position: self.cursor_position,
                        modifiers: keyutils::modifiers_from_winit(modifiers),
                    });
                }
            }
            event => {
                let Some(view) = self.views.get_mut(&window_id) else {
                    return;
                };
                dispatch_to_view(view, event, modifiers, cursor, timestamp);
            }
        }

        self.flush(window_id);
    }

    /// Traite les acquittements en attente puis publie signaux et texte.
    fn flush(&mut self, window_id: WindowId) {
        let Some(view) = self.views.get_mut(&window_id) else {
            return;
        };
        view.pump_acks();
        for signal in view.take_signals() {
            info!(signal = signal.name(), "Widget signal");
        }
        self.refresh_title();
    }

    fn refresh_title(&self) {
        let text = self.engine.display_text();
        let marker = if self.engine.is_ime_active() { " [IME]" } else { "" };
        if text.is_empty() {
            self.window.set_title(&format!("{}{marker}", self.title));
        } else {
            self.window.set_title(&format!("{}{marker} | {text}", self.title));
        }
    }
}

fn dispatch_to_view(
    view: &mut RenderWidgetView,
    event: WindowEvent,
    modifiers: ModifiersState,
    cursor: Point2D<f32>,
    timestamp: f64,
) {
    match event {
        // ── Focus de la fenêtre ───────────────────────────────────
        WindowEvent::Focused(true) => view.handle_focus_in(),
        WindowEvent::Focused(false) => view.handle_focus_out(),

        // ── Saisie clavier ────────────────────────────────────────
        WindowEvent::KeyboardInput { event, .. } => {
            let keyboard_event = keyutils::keyboard_event_from_winit(&event, modifiers, timestamp);
            match keyboard_event.kind {
                KeyEventKind::KeyDown => view.handle_key_down(keyboard_event),
                KeyEventKind::KeyUp => view.handle_key_up(keyboard_event),
            }
        }

        // ── Méthode de saisie ─────────────────────────────────────
        WindowEvent::Ime(ime) => view.handle_imf_event(keyutils::ime_event_from_winit(&ime)),

        // ── Clics souris ──────────────────────────────────────────
        WindowEvent::MouseInput { state, button, .. } => {
            let mouse_event = MouseEvent {
                kind: match state {
                    ElementState::Pressed => MouseEventKind::Down,
                    ElementState::Released => MouseEventKind::Up,
                },
                button: mouse_button_from_winit(button),
                position: cursor,
                modifiers: keyutils::modifiers_from_winit(modifiers),
            };
            match state {
                ElementState::Pressed => view.handle_mouse_down(mouse_event),
                ElementState::Released => view.handle_mouse_up(mouse_event),
            }
        }

        // ── Tactile ───────────────────────────────────────────────
        WindowEvent::Touch(touch) => view.handle_touch(TouchEvent {
            points: vec![TouchPoint {
                id: touch.id,
                phase: touch_phase_from_winit(touch.phase),
                position: Point2D::new(touch.location.x as f32, touch.location.y as f32),
            }],
            timestamp,
        }),

        // ── Pincement (trackpad) ──────────────────────────────────
        WindowEvent::PinchGesture { delta, phase, .. } => view.handle_gesture(GestureEvent {
            kind: pinch_kind_from_winit(phase),
            position: cursor,
            scale: 1.0 + delta as f32,
            timestamp,
        }),

        _ => (),
    }
}

fn mouse_button_from_winit(button: WinitMouseButton) -> MouseButton {
    match button {
        WinitMouseButton::Left => MouseButton::Left,
        WinitMouseButton::Middle => MouseButton::Middle,
        WinitMouseButton::Right => MouseButton::Right,
        _ => MouseButton::None,
    }
}

fn touch_phase_from_winit(phase: WinitTouchPhase) -> TouchPhase {
    match phase {
        WinitTouchPhase::Started => TouchPhase::Pressed,
        WinitTouchPhase::Moved => TouchPhase::Moved,
        WinitTouchPhase::Ended => TouchPhase::Released,
        WinitTouchPhase::Cancelled => TouchPhase::Cancelled,
    }
}

fn pinch_kind_from_winit(phase: WinitTouchPhase) -> GestureKind {
    match phase {
        WinitTouchPhase::Started => GestureKind::PinchBegin,
        WinitTouchPhase::Moved => GestureKind::PinchUpdate,
        WinitTouchPhase::Ended | WinitTouchPhase::Cancelled => GestureKind::PinchEnd,
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// App : enum deux phases
// ─────────────────────────────────────────────────────────────────────────────

/// Application à deux phases de vie.
pub enum App {
    /// Phase pré-initialisation : on attend que Winit appelle `resumed()`.
    Initial {
        waker: Waker,
        config: Config,
        ime_enabled: bool,
    },

    /// Phase opérationnelle : la fenêtre et sa vue sont actives.
    Running(ShellState),
}

impl App {
    pub fn new(event_loop: &EventLoop<WakerEvent>, config: Config, ime_enabled: bool) -> Self {
        Self::Initial {
            waker: Waker::new(event_loop),
            config,
            ime_enabled,
        }
    }
}

impl ApplicationHandler<WakerEvent> for App {
    /// Appelé une fois par Winit quand l'application est prête à créer des fenêtres.
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        let (waker, config, ime_enabled) = match self {
            Self::Initial {
                waker,
                config,
                ime_enabled,
            } => (waker.clone(), config.clone(), *ime_enabled),
            Self::Running(_) => return,
        };

        // ── 1. Créer la fenêtre Winit ──────────────────────────────────
        let window_attributes = Window::default_attributes()
            .with_title(config.general.window_title.as_str())
            .with_inner_size(winit::dpi::LogicalSize::new(
                f64::from(config.window.width),
                f64::from(config.window.height),
            ));

        let window = match event_loop.create_window(window_attributes) {
            Ok(window) => Rc::new(window),
            Err(e) => {
                error!(error = %e, "Impossible de créer la fenêtre Winit");
                event_loop.exit();
                return;
            }
        };

        // Lu une seule fois à la création de la fenêtre.
        let scale_factor = window.scale_factor() as f32;

        // ── 2. Moteur et canal d'acquittement ───────────────────────────
        let (ack_sender, ack_receiver) = ack_channel(Some(Arc::new(waker)));
        let engine = Rc::new(EchoEngine::new(ack_sender));

        // ── 3. Méthode de saisie ────────────────────────────────────────
        let framework: Rc<dyn InputMethodFramework> = if ime_enabled {
            Rc::new(WinitInputMethod::new(window.clone()))
        } else {
            Rc::new(NoInputMethod)
        };

        // ── 4. Vue et champ focalisé initial ────────────────────────────
        let mut view = RenderWidgetView::new(engine.clone(), ack_receiver, framework, &config);
        view.set_device_scale_factor(scale_factor);
        view.handle_focus_in();
        view.text_input_state_changed(TextInputState::user_focus(InputType::from_attribute(
            &config.general.focused_input_type,
        )));

        info!(
            scale_factor,
            ime = view.has_input_method(),
            input_type = %config.general.focused_input_type,
            "View ready"
        );

        let mut views = ViewRegistry::new();
        views.register(window.id(), view);

        // ── 5. Transition Initial → Running ─────────────────────────────
        *self = Self::Running(ShellState {
            window,
            engine,
            views,
            cursor_position: Point2D::zero(),
            modifiers: ModifiersState::default(),
            started: Instant::now(),
            title: config.general.window_title,
        });
    }

    /// Appelé quand le moteur a envoyé des acquittements.
    fn user_event(&mut self, _event_loop: &ActiveEventLoop, _event: WakerEvent) {
        if let Self::Running(state) = self {
            let window_id = state.window.id();
            state.flush(window_id);
        }
    }

    /// Dispatch des événements fenêtre Winit vers la vue.
    fn window_event(&mut self, event_loop: &ActiveEventLoop, window_id: WindowId, event: WindowEvent) {
        let Self::Running(state) = self else {
            return;
        };

        if let WindowEvent::CloseRequested = event {
            state.views.remove(&window_id);
            if state.views.is_empty() {
                event_loop.exit();
            }
            return;
        }

        state.dispatch(window_id, event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mouse_buttons() {
        assert_eq!(mouse_button_from_winit(WinitMouseButton::Left), MouseButton::Left);
        assert_eq!(mouse_button_from_winit(WinitMouseButton::Right), MouseButton::Right);
        assert_eq!(mouse_button_from_winit(WinitMouseButton::Back), MouseButton::None);
    }

    #[test]
    fn test_touch_phases() {
        assert_eq!(touch_phase_from_winit(WinitTouchPhase::Started), TouchPhase::Pressed);
        assert_eq!(touch_phase_from_winit(WinitTouchPhase::Ended), TouchPhase::Released);
        assert_eq!(touch_phase_from_winit(WinitTouchPhase::Cancelled), TouchPhase::Cancelled);
    }

    #[test]
    fn test_pinch_phases() {
        assert_eq!(pinch_kind_from_winit(WinitTouchPhase::Started), GestureKind::PinchBegin);
        assert_eq!(pinch_kind_from_winit(WinitTouchPhase::Moved), GestureKind::PinchUpdate);
        assert_eq!(pinch_kind_from_winit(WinitTouchPhase::Cancelled), GestureKind::PinchEnd);
    }
}
