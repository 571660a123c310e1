//! Browser host: binds a [`GridView`] to an `HtmlCanvasElement`.
//!
//! Listeners are registered per instance and removed on `destroy()` or drop,
//! so one table's drag never leaks into another's event stream. Move and
//! release listen on the window so a drag continues past the canvas edge. Frames are
//! coalesced through `requestAnimationFrame`; scroll notifications are
//! dispatched as bubbling `scroll-changed` CustomEvents after the state
//! borrow is released.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use wasm_bindgen::closure::Closure;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{
    CustomEvent, CustomEventInit, Event, EventTarget, HtmlCanvasElement, MouseEvent, WheelEvent,
};

use super::{GridView, ScrollChanged};
use crate::render::{CanvasSurface, DirtyFlags, FrameOutcome};
use crate::types::{Dataset, GridConfig};

/// Name of the DOM event carrying [`ScrollChanged`]
pub const SCROLL_CHANGED_EVENT: &str = "scroll-changed";

struct HostState {
    view: GridView,
    surface: CanvasSurface,
    frame_handle: Option<i32>,
    frame_closure: Option<Closure<dyn FnMut(f64)>>,
}

struct Listener {
    target: EventTarget,
    kind: &'static str,
    callback: Closure<dyn FnMut(Event)>,
}

/// Canvas-backed data table exported to JavaScript
#[wasm_bindgen]
pub struct DataTable {
    state: Rc<RefCell<HostState>>,
    canvas: HtmlCanvasElement,
    listeners: Vec<Listener>,
}

fn to_js(err: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&err.to_string())
}

/// Pointer position relative to the canvas, in CSS pixels
fn local_position(canvas: &HtmlCanvasElement, event: &MouseEvent) -> (f64, f64) {
    let rect = canvas.get_bounding_client_rect();
    (
        f64::from(event.client_x()) - rect.left(),
        f64::from(event.client_y()) - rect.top(),
    )
}

#[wasm_bindgen]
impl DataTable {
    /// Bind a table to `canvas` with a viewport of `width` x `height` CSS
    /// pixels at pixel ratio `dpr`. `config` is the camelCase configuration
    /// object.
    #[wasm_bindgen(constructor)]
    pub fn new(
        canvas: HtmlCanvasElement,
        width: f64,
        height: f64,
        dpr: f64,
        config: JsValue,
    ) -> Result<DataTable, JsValue> {
        console_error_panic_hook::set_once();

        let config: GridConfig = serde_wasm_bindgen::from_value(config)?;
        let mut view = GridView::new(config)?;
        view.resize(width, height, dpr);
        let surface = CanvasSurface::new(canvas.clone())?;

        let state = Rc::new(RefCell::new(HostState {
            view,
            surface,
            frame_handle: None,
            frame_closure: None,
        }));

        let mut table = DataTable {
            state,
            canvas,
            listeners: Vec::new(),
        };
        table.register_listeners();
        Self::schedule_frame(&table.state);
        Ok(table)
    }

    /// Replace the dataset (`{headers, rows}`)
    #[wasm_bindgen(js_name = "setData")]
    pub fn set_data(&self, data: JsValue) -> Result<(), JsValue> {
        let dataset: Dataset = serde_wasm_bindgen::from_value(data)?;
        self.state.borrow_mut().view.set_dataset(dataset);
        Self::schedule_frame(&self.state);
        Ok(())
    }

    /// Replace the configuration
    pub fn reconfigure(&self, config: JsValue) -> Result<(), JsValue> {
        let config: GridConfig = serde_wasm_bindgen::from_value(config)?;
        self.state.borrow_mut().view.reconfigure(config)?;
        Self::schedule_frame(&self.state);
        Ok(())
    }

    /// Viewport size or pixel ratio changed
    pub fn resize(&self, width: f64, height: f64, dpr: f64) {
        self.state.borrow_mut().view.resize(width, height, dpr);
        Self::schedule_frame(&self.state);
    }

    /// Request a repaint on the next display frame
    pub fn render(&self) {
        self.state
            .borrow_mut()
            .view
            .request_render(DirtyFlags::PAINT);
        Self::schedule_frame(&self.state);
    }

    /// Scroll by a delta in content units; returns whether the offset changed
    #[wasm_bindgen(js_name = "scrollBy")]
    pub fn scroll_by(&self, dx: f64, dy: f64) -> bool {
        let changed = self.state.borrow_mut().view.scroll_by(dx, dy);
        Self::schedule_frame(&self.state);
        changed
    }

    /// Scroll to an absolute offset; returns whether the offset changed
    #[wasm_bindgen(js_name = "setScroll")]
    pub fn set_scroll(&self, x: f64, y: f64) -> bool {
        let changed = self.state.borrow_mut().view.set_scroll(x, y);
        Self::schedule_frame(&self.state);
        changed
    }

    #[wasm_bindgen(getter, js_name = "scrollX")]
    pub fn scroll_x(&self) -> f64 {
        self.state.borrow().view.scroll_offset().0
    }

    #[wasm_bindgen(getter, js_name = "scrollY")]
    pub fn scroll_y(&self) -> f64 {
        self.state.borrow().view.scroll_offset().1
    }

    /// Header or data cell under a canvas-relative position, or `undefined`
    #[wasm_bindgen(js_name = "cellAt")]
    pub fn cell_at(&self, x: f64, y: f64) -> Result<JsValue, JsValue> {
        let hit = self.state.borrow_mut().view.cell_at(x, y);
        match hit {
            Some(hit) => serde_wasm_bindgen::to_value(&hit).map_err(to_js),
            None => Ok(JsValue::UNDEFINED),
        }
    }

    /// Remove listeners and cancel the pending frame. Idempotent.
    pub fn destroy(&mut self) {
        for listener in self.listeners.drain(..) {
            let _ = listener.target.remove_event_listener_with_callback(
                listener.kind,
                listener.callback.as_ref().unchecked_ref(),
            );
        }
        let mut s = self.state.borrow_mut();
        if let (Some(handle), Some(window)) = (s.frame_handle.take(), web_sys::window()) {
            let _ = window.cancel_animation_frame(handle);
        }
        s.frame_closure = None;
        drop(s);
        let _ = self.canvas.style().set_property("cursor", "default");
    }
}

impl DataTable {
    fn register_listeners(&mut self) {
        let canvas_target: EventTarget = self.canvas.clone().into();

        // Mouse down
        {
            let state = Rc::clone(&self.state);
            let canvas = self.canvas.clone();
            self.listen(&canvas_target, "mousedown", move |event: Event| {
                let Some(event) = event.dyn_ref::<MouseEvent>() else {
                    return;
                };
                let (x, y) = local_position(&canvas, event);
                let started = state.borrow_mut().view.pointer_down(x, y);
                if started {
                    event.prevent_default();
                }
                Self::sync_cursor(&state, &canvas);
                Self::schedule_frame(&state);
            });
        }

        // Window-level move and release, so a drag keeps tracking (and ends)
        // outside the canvas. Moves are handled on the next frame.
        if let Some(window) = web_sys::window() {
            let window_target: EventTarget = window.into();
            {
                let state = Rc::clone(&self.state);
                let canvas = self.canvas.clone();
                self.listen(&window_target, "mousemove", move |event: Event| {
                    let Some(event) = event.dyn_ref::<MouseEvent>() else {
                        return;
                    };
                    let (x, y) = local_position(&canvas, event);
                    state.borrow_mut().view.queue_pointer_move(x, y);
                    Self::schedule_frame(&state);
                });
            }
            {
                let state = Rc::clone(&self.state);
                let canvas = self.canvas.clone();
                self.listen(&window_target, "mouseup", move |_event: Event| {
                    let ended = state.borrow_mut().view.pointer_up();
                    if ended {
                        Self::sync_cursor(&state, &canvas);
                    }
                    Self::schedule_frame(&state);
                });
            }
        }

        // Wheel
        {
            let state = Rc::clone(&self.state);
            self.listen(&canvas_target, "wheel", move |event: Event| {
                let Some(event) = event.dyn_ref::<WheelEvent>() else {
                    return;
                };
                let consumed = state.borrow_mut().view.wheel(
                    event.delta_x(),
                    event.delta_y(),
                    event.shift_key(),
                );
                if consumed {
                    event.prevent_default();
                }
                Self::schedule_frame(&state);
            });
        }
    }

    fn listen(
        &mut self,
        target: &EventTarget,
        kind: &'static str,
        handler: impl FnMut(Event) + 'static,
    ) {
        let callback = Closure::wrap(Box::new(handler) as Box<dyn FnMut(Event)>);
        if target
            .add_event_listener_with_callback(kind, callback.as_ref().unchecked_ref())
            .is_ok()
        {
            self.listeners.push(Listener {
                target: target.clone(),
                kind,
                callback,
            });
        } else {
            tracing::warn!(kind, "failed to register listener");
        }
    }

    fn sync_cursor(state: &Rc<RefCell<HostState>>, canvas: &HtmlCanvasElement) {
        let cursor = state.borrow().view.cursor();
        let _ = canvas.style().set_property("cursor", cursor.as_css());
    }

    /// Ask for one animation frame if the engine has work and none is pending
    fn schedule_frame(state: &Rc<RefCell<HostState>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let mut s = state.borrow_mut();
        if s.frame_handle.is_some() || !s.view.frame_pending() {
            return;
        }
        if s.frame_closure.is_none() {
            let weak_state: Weak<RefCell<HostState>> = Rc::downgrade(state);
            s.frame_closure = Some(Closure::wrap(Box::new(move |_timestamp: f64| {
                if let Some(state) = weak_state.upgrade() {
                    DataTable::handle_frame(&state);
                }
            }) as Box<dyn FnMut(f64)>));
        }
        let Some(callback) = s.frame_closure.as_ref() else {
            return;
        };
        match window.request_animation_frame(callback.as_ref().unchecked_ref()) {
            Ok(handle) => s.frame_handle = Some(handle),
            Err(err) => tracing::warn!(?err, "requestAnimationFrame failed"),
        }
    }

    fn handle_frame(state: &Rc<RefCell<HostState>>) {
        let (events, canvas) = {
            let mut s = state.borrow_mut();
            s.frame_handle = None;
            let HostState { view, surface, .. } = &mut *s;
            match view.run_frame(surface) {
                Ok(FrameOutcome::Painted(stats)) => {
                    tracing::debug!(drawn = stats.cells_drawn, "frame");
                }
                Ok(FrameOutcome::Skipped | FrameOutcome::Idle) => {}
                Err(err) => web_sys::console::error_1(&to_js(err)),
            }
            let events = view.take_scroll_events();
            (events, surface.canvas().clone())
        };

        Self::sync_cursor(state, &canvas);
        for event in &events {
            dispatch_scroll_changed(&canvas, event);
        }
        // handlers of the events above may have requested more work
        Self::schedule_frame(state);
    }
}

fn dispatch_scroll_changed(canvas: &HtmlCanvasElement, event: &ScrollChanged) {
    let Ok(detail) = serde_wasm_bindgen::to_value(event) else {
        return;
    };
    let init = CustomEventInit::new();
    init.set_bubbles(true);
    init.set_detail(&detail);
    match CustomEvent::new_with_event_init_dict(SCROLL_CHANGED_EVENT, &init) {
        Ok(custom) => {
            let _ = canvas.dispatch_event(&custom);
        }
        Err(err) => tracing::warn!(?err, "failed to create scroll-changed event"),
    }
}

impl Drop for DataTable {
    fn drop(&mut self) {
        self.destroy();
    }
}
