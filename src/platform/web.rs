//! A-Frame view layer
//!
//! Binds the scene elements, turns DOM/controller events into
//! [`InputEvent`]s, pumps the game clock and applies the resulting
//! [`Effect`]s to the scene.

use std::cell::RefCell;
use std::rc::Rc;

use glam::{Vec2, Vec3};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{CustomEvent, Document, Element, Event, KeyboardEvent};

use super::scene;
use crate::error::{GameError, GameResult};
use crate::settings::Settings;
use crate::sim::{
    Control, Effect, Game, Hand, InputEvent, KeyCommand, TargetGeometry, TargetId, TargetShape,
};

// Raycaster hits are only reachable through the A-Frame component object
#[wasm_bindgen(inline_js = "
    export function first_intersected(hand) {
        const raycaster = hand.components && hand.components.raycaster;
        if (!raycaster || raycaster.intersectedEls.length === 0) {
            return null;
        }
        return raycaster.intersectedEls[0];
    }
")]
extern "C" {
    fn first_intersected(hand: &Element) -> Option<Element>;
}

/// Clock pump period (ms)
const PUMP_INTERVAL_MS: i32 = 16;

const TARGET_ID_ATTR: &str = "data-target-id";

fn js_err(err: JsValue) -> GameError {
    GameError::Platform(format!("{:?}", err))
}

fn require(document: &Document, selector: &'static str) -> GameResult<Element> {
    document
        .query_selector(selector)
        .map_err(js_err)?
        .ok_or(GameError::MissingElement { selector })
}

fn vec3_attr(v: Vec3) -> String {
    format!("{} {} {}", v.x, v.y, v.z)
}

/// Every scene element the game writes to or listens on
pub struct SceneBindings {
    document: Document,
    scene: Element,
    player_rig: Element,
    /// Controllers are optional: desktop play uses mouse and keyboard
    left_hand: Option<Element>,
    right_hand: Option<Element>,
    score_display: Element,
    timer_display: Element,
    final_score: Element,
    game_over_screen: Element,
    size_button: Element,
    speed_button: Element,
    shape_button: Element,
}

impl SceneBindings {
    /// Look up all elements; fails on the first one missing
    pub fn bind(document: &Document) -> GameResult<Self> {
        scene::check(|selector| matches!(document.query_selector(selector), Ok(Some(_))))?;

        Ok(Self {
            document: document.clone(),
            scene: require(document, scene::SCENE)?,
            player_rig: require(document, scene::PLAYER_RIG)?,
            left_hand: document.query_selector(scene::LEFT_HAND).map_err(js_err)?,
            right_hand: document.query_selector(scene::RIGHT_HAND).map_err(js_err)?,
            score_display: require(document, scene::SCORE_DISPLAY)?,
            timer_display: require(document, scene::TIMER_DISPLAY)?,
            final_score: require(document, scene::FINAL_SCORE)?,
            game_over_screen: require(document, scene::GAME_OVER_SCREEN)?,
            size_button: require(document, scene::SIZE_BUTTON)?,
            speed_button: require(document, scene::SPEED_BUTTON)?,
            shape_button: require(document, scene::SHAPE_BUTTON)?,
        })
    }

    fn target_element(&self, id: TargetId) -> Option<Element> {
        self.document.get_element_by_id(&format!("target-{}", id))
    }

    fn control_button(&self, control: Control) -> &Element {
        match control {
            Control::Size => &self.size_button,
            Control::Speed => &self.speed_button,
            Control::Shape => &self.shape_button,
        }
    }

    /// Apply one effect to the scene
    pub fn apply(&self, effect: &Effect) -> GameResult<()> {
        match effect {
            Effect::SpawnVisual {
                target,
                shape,
                color,
                geometry,
                position,
            } => {
                let tag = match shape {
                    TargetShape::Cylinder => "a-cylinder",
                    TargetShape::Box => "a-box",
                    TargetShape::Sphere => "a-sphere",
                    TargetShape::Cone => "a-cone",
                };
                let el = self.document.create_element(tag).map_err(js_err)?;
                el.set_id(&format!("target-{}", target));
                el.set_attribute(TARGET_ID_ATTR, &target.to_string()).map_err(js_err)?;
                el.set_attribute("class", "target clickable").map_err(js_err)?;
                el.set_attribute("position", &vec3_attr(*position)).map_err(js_err)?;
                el.set_attribute("color", &color.hex()).map_err(js_err)?;
                for (name, value) in geometry_attrs(geometry) {
                    el.set_attribute(name, &value.to_string()).map_err(js_err)?;
                }
                self.scene.append_child(&el).map_err(js_err)?;
            }
            Effect::AnimateRise {
                target,
                to,
                duration_ms,
                easing,
            } => {
                if let Some(el) = self.target_element(*target) {
                    let anim = format!(
                        "property: position; to: {}; dur: {}; easing: {}",
                        vec3_attr(*to),
                        duration_ms,
                        easing.as_str()
                    );
                    el.set_attribute("animation__up", &anim).map_err(js_err)?;
                }
            }
            Effect::AnimateFall {
                target,
                to,
                duration_ms,
                easing,
            } => {
                if let Some(el) = self.target_element(*target) {
                    let anim = format!(
                        "property: position; to: {}; dur: {}; easing: {}",
                        vec3_attr(*to),
                        duration_ms,
                        easing.as_str()
                    );
                    el.set_attribute("animation__down", &anim).map_err(js_err)?;
                }
            }
            Effect::AnimateDestroy {
                target,
                duration_ms,
            } => {
                if let Some(el) = self.target_element(*target) {
                    let anim = format!(
                        "property: scale; to: 0 0 0; dur: {}; easing: easeInQuad",
                        duration_ms
                    );
                    el.set_attribute("animation__destroy", &anim).map_err(js_err)?;
                }
            }
            Effect::RemoveVisual { target } => {
                if let Some(el) = self.target_element(*target) {
                    el.remove();
                }
            }
            Effect::ScoreUpdate { score } => {
                self.score_display
                    .set_attribute("value", &format!("Score: {}", score))
                    .map_err(js_err)?;
            }
            Effect::TimerUpdate { seconds_left, band } => {
                self.timer_display
                    .set_attribute("value", &format!("Time: {}", seconds_left))
                    .map_err(js_err)?;
                self.timer_display
                    .set_attribute("color", band.as_str())
                    .map_err(js_err)?;
            }
            Effect::ShowEndScreen { final_score } => {
                self.final_score
                    .set_attribute("value", &format!("Final Score: {}", final_score))
                    .map_err(js_err)?;
                self.game_over_screen
                    .set_attribute("visible", "true")
                    .map_err(js_err)?;
            }
            Effect::HideEndScreen => {
                self.game_over_screen
                    .set_attribute("visible", "false")
                    .map_err(js_err)?;
            }
            Effect::ControlUpdate(feedback) => {
                let button = self.control_button(feedback.control);
                button
                    .set_attribute("color", &feedback.color.hex())
                    .map_err(js_err)?;
                if let Some(label) = feedback.label {
                    if let Some(text) = button.query_selector("a-text").map_err(js_err)? {
                        text.set_attribute("value", label).map_err(js_err)?;
                    }
                }
            }
            Effect::RigTransform { position, yaw_deg } => {
                self.player_rig
                    .set_attribute("position", &vec3_attr(*position))
                    .map_err(js_err)?;
                self.player_rig
                    .set_attribute("rotation", &format!("0 {} 0", yaw_deg))
                    .map_err(js_err)?;
            }
        }
        Ok(())
    }
}

fn geometry_attrs(geometry: &TargetGeometry) -> Vec<(&'static str, f32)> {
    match *geometry {
        TargetGeometry::Cylinder { radius, height } => vec![("radius", radius), ("height", height)],
        TargetGeometry::Box {
            width,
            height,
            depth,
        } => vec![("width", width), ("height", height), ("depth", depth)],
        TargetGeometry::Sphere { radius } => vec![("radius", radius)],
        TargetGeometry::Cone {
            radius_bottom,
            radius_top,
            height,
        } => vec![
            ("radius-bottom", radius_bottom),
            ("radius-top", radius_top),
            ("height", height),
        ],
    }
}

/// Game plus the scene it draws into
struct App {
    game: Game,
    scene: SceneBindings,
    last_pump_ms: f64,
}

impl App {
    fn flush(&mut self) {
        for effect in self.game.drain_effects() {
            if let Err(e) = self.scene.apply(&effect) {
                log::warn!("Failed to apply {:?}: {}", effect, e);
            }
        }
    }

    fn input(&mut self, event: InputEvent) {
        self.game.handle_input(event);
        self.flush();
    }

    fn pump(&mut self, now_ms: f64) {
        let elapsed = (now_ms - self.last_pump_ms).max(0.0);
        self.last_pump_ms = now_ms;
        self.game.advance(elapsed as u64);
        self.flush();
    }
}

fn target_id_of(el: &Element) -> Option<TargetId> {
    if !el.class_list().contains("target") {
        return None;
    }
    el.get_attribute(TARGET_ID_ATTR)?.parse().ok().map(TargetId)
}

/// Bind the scene, wire every listener and start the first round
pub fn run(document: &Document) -> GameResult<()> {
    let window = web_sys::window().ok_or(GameError::Platform("no window".into()))?;
    let scene = SceneBindings::bind(document)?;

    let mut settings = Settings::load();
    settings.seed = js_sys::Date::now() as u64;
    let game = Game::new(settings)?;

    let app = Rc::new(RefCell::new(App {
        game,
        scene,
        last_pump_ms: js_sys::Date::now(),
    }));

    setup_controllers(&app)?;
    setup_clicks(&app)?;
    setup_keyboard(document, &app)?;

    // Clock pump
    {
        let app = app.clone();
        let closure = Closure::<dyn FnMut()>::new(move || {
            app.borrow_mut().pump(js_sys::Date::now());
        });
        window
            .set_interval_with_callback_and_timeout_and_arguments_0(
                closure.as_ref().unchecked_ref(),
                PUMP_INTERVAL_MS,
            )
            .map_err(js_err)?;
        closure.forget();
    }

    {
        let mut app = app.borrow_mut();
        app.game.start_round();
        app.flush();
    }
    log::info!("Target range running");
    Ok(())
}

fn setup_controllers(app: &Rc<RefCell<App>>) -> GameResult<()> {
    let hands = {
        let a = app.borrow();
        [
            (Hand::Left, a.scene.left_hand.clone()),
            (Hand::Right, a.scene.right_hand.clone()),
        ]
    };

    for (hand, element) in hands {
        let Some(element) = element else {
            log::info!("No {:?} controller in scene", hand);
            continue;
        };

        // Trigger and grip both shoot
        for event_name in ["triggerdown", "gripdown"] {
            let app = app.clone();
            let hand_el = element.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: Event| {
                if !app.borrow().game.is_active() {
                    return;
                }
                let Some(hit) = first_intersected(&hand_el) else {
                    return;
                };
                if let Some(id) = target_id_of(&hit) {
                    app.borrow_mut().input(InputEvent::DestroyRequested(id));
                } else if hit.class_list().contains("control") {
                    // Forward to the control's own click listener
                    if let Ok(click) = Event::new("click") {
                        let _ = hit.dispatch_event(&click);
                    }
                }
            });
            element
                .add_event_listener_with_callback(event_name, closure.as_ref().unchecked_ref())
                .map_err(js_err)?;
            closure.forget();
        }

        {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: CustomEvent| {
                let detail = event.detail();
                let axis = |name: &str| {
                    js_sys::Reflect::get(&detail, &JsValue::from_str(name))
                        .ok()
                        .and_then(|v| v.as_f64())
                        .unwrap_or(0.0) as f32
                };
                let axes = Vec2::new(axis("x"), axis("y"));
                app.borrow_mut().input(InputEvent::Thumbstick { hand, axes });
            });
            element
                .add_event_listener_with_callback("thumbstickmoved", closure.as_ref().unchecked_ref())
                .map_err(js_err)?;
            closure.forget();
        }
    }
    Ok(())
}

fn setup_clicks(app: &Rc<RefCell<App>>) -> GameResult<()> {
    let (scene, buttons) = {
        let a = app.borrow();
        (
            a.scene.scene.clone(),
            [
                (a.scene.size_button.clone(), InputEvent::CycleSize),
                (a.scene.speed_button.clone(), InputEvent::CycleSpeed),
                (a.scene.shape_button.clone(), InputEvent::CycleShape),
                (a.scene.game_over_screen.clone(), InputEvent::RestartRequested),
            ],
        )
    };

    for (button, input) in buttons {
        let app = app.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: Event| {
            // The hidden end screen still catches raycasts mid-round
            if input == InputEvent::RestartRequested && app.borrow().game.is_active() {
                return;
            }
            app.borrow_mut().input(input);
        });
        button
            .add_event_listener_with_callback("click", closure.as_ref().unchecked_ref())
            .map_err(js_err)?;
        closure.forget();
    }

    // Cursor clicks on targets bubble up to the scene
    {
        let app = app.clone();
        let closure = Closure::<dyn FnMut(_)>::new(move |event: Event| {
            let Some(el) = event.target().and_then(|t| t.dyn_into::<Element>().ok()) else {
                return;
            };
            if let Some(id) = target_id_of(&el) {
                app.borrow_mut().input(InputEvent::DestroyRequested(id));
            }
        });
        scene
            .add_event_listener_with_callback("click", closure.as_ref().unchecked_ref())
            .map_err(js_err)?;
        closure.forget();
    }
    Ok(())
}

fn setup_keyboard(document: &Document, app: &Rc<RefCell<App>>) -> GameResult<()> {
    let app = app.clone();
    let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
        if let Some(key) = KeyCommand::from_code(&event.code()) {
            app.borrow_mut().input(InputEvent::Key(key));
        }
    });
    document
        .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref())
        .map_err(js_err)?;
    closure.forget();
    Ok(())
}
