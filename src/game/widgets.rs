//! Interactive widgets: buttons, the pause menu, and volume sliders
//!
//! Widgets live under a canvas, so their hit rectangles are offset by the
//! camera center the same way the UI pass draws them. The pause menu button
//! keeps updating while the engine is paused; it owns the un-pause control.

use glam::Vec2;
use hecs::Entity;
use winit::event::MouseButton;

use crate::audio::VolumeKind;
use crate::core::{EventQueue, GameEvent};
use crate::ecs::{Scene, Transform};
use crate::input::Input;
use crate::math::Rect;

/// What a button does when clicked
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ButtonAction {
    /// Swap to the scene at this path
    StartScene(String),
    /// Leave the pause state
    Resume,
    /// Quit the game
    Quit,
    /// Toggle pause
    TogglePause,
}

/// Clickable rectangle
#[derive(Debug, Clone)]
pub struct Button {
    /// Hit rectangle half extents around the widget center
    pub half_extents: Vec2,
    pub action: ButtonAction,
    pub hovered: bool,
    pub active: bool,
}

impl Button {
    #[must_use]
    pub fn new(half_extents: Vec2, action: ButtonAction) -> Self {
        Self {
            half_extents,
            action,
            hovered: false,
            active: true,
        }
    }
}

/// Button that stays responsive while the engine is paused
#[derive(Debug, Clone)]
pub struct PauseMenuButton {
    pub button: Button,
}

impl PauseMenuButton {
    #[must_use]
    pub fn new(half_extents: Vec2, action: ButtonAction) -> Self {
        Self {
            button: Button::new(half_extents, action),
        }
    }
}

/// Volume slider: a knob dragged along a horizontal track
#[derive(Debug, Clone)]
pub struct Slider {
    /// Track length in world units
    pub max_offset: f32,
    /// Current value in [0, 1]
    pub value: f32,
    /// Which mixer bus this slider drives
    pub volume: VolumeKind,
    pub active: bool,
    grabbed: bool,
}

impl Slider {
    #[must_use]
    pub fn new(max_offset: f32, value: f32, volume: VolumeKind) -> Self {
        Self {
            max_offset,
            value: value.clamp(0.0, 1.0),
            volume,
            active: true,
            grabbed: false,
        }
    }
}

fn fire_action(action: &ButtonAction, events: &mut EventQueue) {
    match action {
        ButtonAction::StartScene(path) => events.push(GameEvent::SceneSwapRequested {
            path: path.clone(),
        }),
        ButtonAction::Resume | ButtonAction::TogglePause => events.push(GameEvent::PauseToggled),
        ButtonAction::Quit => events.push(GameEvent::QuitRequested),
    }
}

fn widget_rect(scene: &Scene, entity: Entity, half_extents: Vec2, ui_shift: Vec2) -> Rect {
    let center = scene
        .world
        .get::<&Transform>(entity)
        .map(|t| t.world_position())
        .unwrap_or_default()
        + ui_shift;
    Rect::from_center_half_extents(center, half_extents)
}

/// Update normal buttons; runs only while playing
pub fn update_buttons(
    scene: &mut Scene,
    input: &Input,
    events: &mut EventQueue,
    cursor_world: Vec2,
    ui_shift: Vec2,
) {
    let buttons: Vec<Entity> = scene
        .all()
        .filter(|e| scene.world.get::<&Button>(*e).is_ok())
        .collect();

    for entity in buttons {
        let Ok((half_extents, active)) = scene
            .world
            .get::<&Button>(entity)
            .map(|b| (b.half_extents, b.active))
        else {
            continue;
        };
        if !active {
            continue;
        }
        let rect = widget_rect(scene, entity, half_extents, ui_shift);
        let hovered = rect.contains(cursor_world);
        let clicked = hovered && input.is_mouse_just_pressed(MouseButton::Left);

        let Ok(action) = scene.world.get::<&mut Button>(entity).map(|mut button| {
            button.hovered = hovered;
            clicked.then(|| button.action.clone())
        }) else {
            continue;
        };
        if let Some(action) = action {
            fire_action(&action, events);
        }
    }
}

/// Update pause menu buttons; runs in both the playing and paused states
pub fn update_pause_buttons(
    scene: &mut Scene,
    input: &Input,
    events: &mut EventQueue,
    cursor_world: Vec2,
    ui_shift: Vec2,
) {
    let buttons: Vec<Entity> = scene
        .all()
        .filter(|e| scene.world.get::<&PauseMenuButton>(*e).is_ok())
        .collect();

    for entity in buttons {
        let Ok((half_extents, active)) = scene
            .world
            .get::<&PauseMenuButton>(entity)
            .map(|p| (p.button.half_extents, p.button.active))
        else {
            continue;
        };
        if !active {
            continue;
        }
        let rect = widget_rect(scene, entity, half_extents, ui_shift);
        let hovered = rect.contains(cursor_world);
        let clicked = hovered && input.is_mouse_just_pressed(MouseButton::Left);

        let Ok(action) = scene
            .world
            .get::<&mut PauseMenuButton>(entity)
            .map(|mut pause| {
                pause.button.hovered = hovered;
                clicked.then(|| pause.button.action.clone())
            })
        else {
            continue;
        };
        if let Some(action) = action {
            fire_action(&action, events);
        }
    }
}

/// Update volume sliders: grab on press over the knob, drag to set value
pub fn update_sliders(
    scene: &mut Scene,
    input: &Input,
    events: &mut EventQueue,
    cursor_world: Vec2,
    ui_shift: Vec2,
) {
    let sliders: Vec<Entity> = scene
        .all()
        .filter(|e| scene.world.get::<&Slider>(*e).is_ok())
        .collect();

    for entity in sliders {
        let Ok((max_offset, value, active, grabbed, volume)) = scene
            .world
            .get::<&Slider>(entity)
            .map(|s| (s.max_offset, s.value, s.active, s.grabbed, s.volume))
        else {
            continue;
        };
        if !active {
            continue;
        }

        // The widget center is the track's left end; the knob sits at
        // value * max_offset along it
        let track_origin = scene
            .world
            .get::<&Transform>(entity)
            .map(|t| t.world_position())
            .unwrap_or_default()
            + ui_shift;
        let knob = track_origin + Vec2::new(value * max_offset, 0.0);
        let knob_rect = Rect::from_center_half_extents(knob, Vec2::splat(12.0));

        let grabbed = if input.is_mouse_down(MouseButton::Left) {
            grabbed || (knob_rect.contains(cursor_world) && input.is_mouse_just_pressed(MouseButton::Left))
        } else {
            false
        };

        let mut new_value = value;
        if grabbed && max_offset > 0.0 {
            new_value = ((cursor_world.x - track_origin.x) / max_offset).clamp(0.0, 1.0);
        }

        if let Ok(mut slider) = scene.world.get::<&mut Slider>(entity) {
            slider.grabbed = grabbed;
            slider.value = new_value;
        }
        if (new_value - value).abs() > f32::EPSILON {
            events.push(GameEvent::VolumeChanged {
                bus: volume,
                volume: new_value,
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use winit::event::ElementState;

    fn click(input: &mut Input) {
        input.handle_mouse_button(MouseButton::Left, ElementState::Pressed);
    }

    #[test]
    fn test_button_click_fires_action() {
        let mut scene = Scene::new();
        let mut events = EventQueue::new();
        let mut input = Input::new();

        let e = scene.create("start_button");
        scene
            .world
            .insert_one(
                e,
                Button::new(
                    Vec2::new(50.0, 20.0),
                    ButtonAction::StartScene("scenes/level_1.scene".to_string()),
                ),
            )
            .unwrap();

        // Cursor off the button: nothing fires
        click(&mut input);
        update_buttons(&mut scene, &input, &mut events, Vec2::new(500.0, 0.0), Vec2::ZERO);
        assert!(events.is_empty());

        input.clear_frame();
        click(&mut input);
        update_buttons(&mut scene, &input, &mut events, Vec2::new(10.0, 5.0), Vec2::ZERO);
        assert!(scene.world.get::<&Button>(e).unwrap().hovered);
        assert!(matches!(
            events.take().as_slice(),
            [GameEvent::SceneSwapRequested { path }] if path == "scenes/level_1.scene"
        ));
    }

    #[test]
    fn test_slider_drag_emits_volume() {
        let mut scene = Scene::new();
        let mut events = EventQueue::new();
        let mut input = Input::new();

        let e = scene.create("bgm_slider");
        scene
            .world
            .insert_one(e, Slider::new(100.0, 0.0, VolumeKind::Bgm))
            .unwrap();

        // Grab the knob at the track origin, drag to 60%
        input.handle_cursor(Vec2::new(0.0, 0.0));
        click(&mut input);
        update_sliders(&mut scene, &input, &mut events, Vec2::new(0.0, 0.0), Vec2::ZERO);
        input.clear_frame();
        update_sliders(&mut scene, &input, &mut events, Vec2::new(60.0, 0.0), Vec2::ZERO);

        let slider = scene.world.get::<&Slider>(e).unwrap();
        assert!((slider.value - 0.6).abs() < 1e-3);
        assert!(events
            .take()
            .iter()
            .any(|ev| matches!(ev, GameEvent::VolumeChanged { bus: VolumeKind::Bgm, volume } if (*volume - 0.6).abs() < 1e-3)));
    }
}
