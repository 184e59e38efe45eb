use std::cell::RefCell;
use std::rc::Rc;

use wasm_bindgen::JsCast;
use wasm_bindgen::JsValue;
use wasm_bindgen::closure::Closure;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, TouchEvent};
use yew::prelude::*;

mod config;
mod gesture;
mod map;
mod model;
mod physics;
mod pointer;
mod render;
mod session;
mod util;

use config::LeashConfig;
use map::MapPort;
use model::Viewport;
use pointer::PointerState;
use session::LeashSession;
use util::clog;

// Optional JSON override placed on the window by the host page.
fn startup_config() -> LeashConfig {
    web_sys::window()
        .and_then(|w| js_sys::Reflect::get(&w, &JsValue::from_str("__LEASH_CONFIG")).ok())
        .and_then(|v| v.as_string())
        .and_then(|raw| serde_json::from_str(&raw).ok())
        .unwrap_or_else(LeashConfig::classic)
}

#[function_component(LeashView)]
fn leash_view() -> Html {
    let canvas_ref = use_node_ref();
    let session = use_mut_ref(|| None::<LeashSession>);
    let pointer = use_mut_ref(PointerState::default);

    {
        let canvas_ref = canvas_ref.clone();
        let session = session.clone();
        let pointer = pointer.clone();
        use_effect_with((), move |_| {
            let window = web_sys::window().expect("no global `window` exists");
            let canvas: HtmlCanvasElement = canvas_ref
                .cast::<HtmlCanvasElement>()
                .expect("canvas_ref not attached to a canvas element");

            let apply_canvas_size = {
                let canvas = canvas.clone();
                let window = window.clone();
                move || -> Viewport {
                    let width = window
                        .inner_width()
                        .ok()
                        .and_then(|v| v.as_f64())
                        .unwrap_or(800.0);
                    let height = window
                        .inner_height()
                        .ok()
                        .and_then(|v| v.as_f64())
                        .unwrap_or(600.0);
                    canvas.set_width(width.max(0.0) as u32);
                    canvas.set_height(height.max(0.0) as u32);
                    Viewport { width, height }
                }
            };

            let viewport = apply_canvas_size();
            let cfg = startup_config();
            let step_ms = cfg.step_ms as i32;
            let flush_ms = cfg.pan_flush_ms as i32;
            *session.borrow_mut() = Some(LeashSession::new(cfg, viewport));
            clog("leash session ready");

            // Pointer: mouse, in canvas-local coordinates
            let mousemove_cb = {
                let canvas = canvas.clone();
                let pointer = pointer.clone();
                Closure::wrap(Box::new(move |e: web_sys::MouseEvent| {
                    let rect = canvas.get_bounding_client_rect();
                    pointer
                        .borrow_mut()
                        .set(e.client_x() as f64 - rect.left(), e.client_y() as f64 - rect.top());
                }) as Box<dyn FnMut(_)>)
            };
            canvas
                .add_event_listener_with_callback("mousemove", mousemove_cb.as_ref().unchecked_ref())
                .unwrap();

            // Pointer: first touch
            let touchmove_cb = {
                let canvas = canvas.clone();
                let pointer = pointer.clone();
                Closure::wrap(Box::new(move |e: TouchEvent| {
                    if let Some(t0) = e.touches().item(0) {
                        let rect = canvas.get_bounding_client_rect();
                        pointer.borrow_mut().set(
                            t0.client_x() as f64 - rect.left(),
                            t0.client_y() as f64 - rect.top(),
                        );
                    }
                    e.prevent_default();
                }) as Box<dyn FnMut(_)>)
            };
            canvas
                .add_event_listener_with_callback("touchmove", touchmove_cb.as_ref().unchecked_ref())
                .ok();

            // Fixed interval instead of a RAF loop, so simulation speed does
            // not follow the monitor refresh rate
            let tick_cb = {
                let session = session.clone();
                let pointer = pointer.clone();
                Closure::wrap(Box::new(move || {
                    let sample = pointer.borrow().sample();
                    let mut widget = map::current();
                    if let Some(s) = session.borrow_mut().as_mut() {
                        s.tick(sample, widget.as_mut().map(|m| m as &mut dyn MapPort));
                    }
                }) as Box<dyn FnMut()>)
            };
            let tick_id = window
                .set_interval_with_callback_and_timeout_and_arguments_0(
                    tick_cb.as_ref().unchecked_ref(),
                    step_ms,
                )
                .unwrap();

            // Stagger panning: the widget stacks rapid panBy calls instead of
            // coalescing them
            let flush_cb = {
                let session = session.clone();
                Closure::wrap(Box::new(move || {
                    let mut widget = map::current();
                    if let Some(s) = session.borrow_mut().as_mut() {
                        s.flush_pan(widget.as_mut().map(|m| m as &mut dyn MapPort));
                    }
                }) as Box<dyn FnMut()>)
            };
            let flush_id = window
                .set_interval_with_callback_and_timeout_and_arguments_0(
                    flush_cb.as_ref().unchecked_ref(),
                    flush_ms,
                )
                .unwrap();

            // Resize: canvas tracks the window, walls track the canvas
            let resize_cb = {
                let apply_canvas_size = apply_canvas_size.clone();
                let session = session.clone();
                Closure::wrap(Box::new(move |_e: web_sys::Event| {
                    let viewport = apply_canvas_size();
                    if let Some(s) = session.borrow_mut().as_mut() {
                        s.resize(viewport);
                    }
                }) as Box<dyn FnMut(_)>)
            };
            window
                .add_event_listener_with_callback("resize", resize_cb.as_ref().unchecked_ref())
                .unwrap();

            // RAF loop for drawing only
            let raf_id = Rc::new(RefCell::new(None));
            let draw_cell: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
            {
                let raf_id_loop = raf_id.clone();
                let cell = draw_cell.clone();
                let window_loop = window.clone();
                let canvas = canvas.clone();
                let session = session.clone();
                *draw_cell.borrow_mut() = Some(Closure::wrap(Box::new(move || {
                    if let Some(s) = session.borrow().as_ref() {
                        if let Some(ctx) = canvas
                            .get_context("2d")
                            .ok()
                            .flatten()
                            .and_then(|c| c.dyn_into::<CanvasRenderingContext2d>().ok())
                        {
                            render::draw_scene(
                                &ctx,
                                &s.scene(),
                                canvas.width() as f64,
                                canvas.height() as f64,
                            );
                        }
                    }
                    if let Ok(id) = window_loop.request_animation_frame(
                        cell.borrow().as_ref().unwrap().as_ref().unchecked_ref(),
                    ) {
                        *raf_id_loop.borrow_mut() = Some(id);
                    }
                }) as Box<dyn FnMut()>));
                if let Ok(id) = window.request_animation_frame(
                    draw_cell.borrow().as_ref().unwrap().as_ref().unchecked_ref(),
                ) {
                    *raf_id.borrow_mut() = Some(id);
                }
            }

            // Cleanup: listeners, intervals and the RAF chain
            let window_cleanup = window.clone();
            move || {
                let _ = canvas.remove_event_listener_with_callback(
                    "mousemove",
                    mousemove_cb.as_ref().unchecked_ref(),
                );
                let _ = canvas.remove_event_listener_with_callback(
                    "touchmove",
                    touchmove_cb.as_ref().unchecked_ref(),
                );
                let _ = window_cleanup.remove_event_listener_with_callback(
                    "resize",
                    resize_cb.as_ref().unchecked_ref(),
                );
                window_cleanup.clear_interval_with_handle(tick_id);
                window_cleanup.clear_interval_with_handle(flush_id);
                if let Some(id) = *raf_id.borrow() {
                    let _ = window_cleanup.cancel_animation_frame(id);
                }
                // keep closures alive until here so the browser never calls a freed one
                let _keep_alive =
                    (&tick_cb, &flush_cb, &mousemove_cb, &touchmove_cb, &resize_cb, &draw_cell);
            }
        });
    }

    html! {
        <canvas ref={canvas_ref} id="leash-canvas" style="display:block; width:100vw; height:100vh;"></canvas>
    }
}

#[function_component(App)]
fn app() -> Html {
    html! {
        <div id="root">
            <LeashView />
        </div>
    }
}

fn main() {
    yew::Renderer::<App>::new().render();
}
