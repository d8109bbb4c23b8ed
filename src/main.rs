//! Demo game: a small top-down arena exercising the engine

use vantage::prelude::*;

/// Arena demo with a player, wandering enemies, and a HUD
struct ArenaDemo;

impl Game for ArenaDemo {
    fn init(&mut self, ctx: &mut EngineContext) {
        log::info!("Initializing arena demo");

        // Resume from the persisted state when one exists
        if std::path::Path::new("state.table").exists() && ctx.load_state("state.table").is_ok() {
            return;
        }

        build_arena(ctx);
        ctx.state = GameState::Playing;
        log::info!("Arena ready");
    }

    fn update(&mut self, ctx: &mut EngineContext) {
        if ctx.input.is_key_just_pressed(KeyCode::F5) {
            match ctx.save_state("state.table") {
                Ok(()) => log::info!("state saved"),
                Err(e) => log::warn!("state save failed: {e}"),
            }
        }
        if ctx.input.is_key_just_pressed(KeyCode::F3) {
            ctx.debug_draw = !ctx.debug_draw;
        }
    }
}

fn wall(ctx: &mut EngineContext, name: &str, tag: &str, pos: Vec2, half: Vec2) {
    let e = ctx.scene.create(name);
    ctx.scene.set_tag(e, tag);
    if let Ok(mut t) = ctx.scene.world.get::<&mut Transform>(e) {
        t.set_local_position(pos);
    }
    let _ = ctx.scene.world.insert_one(e, RectCollider::single(half));
}

fn build_arena(ctx: &mut EngineContext) {
    // World borders double as camera clamps and solid walls
    wall(ctx, "top", "TopBorder", Vec2::new(0.0, 900.0), Vec2::new(1000.0, 50.0));
    wall(ctx, "bottom", "LowerBorder", Vec2::new(0.0, -900.0), Vec2::new(1000.0, 50.0));
    wall(ctx, "left", "LeftBorder", Vec2::new(-1000.0, 0.0), Vec2::new(50.0, 900.0));
    wall(ctx, "right", "RightBorder", Vec2::new(1000.0, 0.0), Vec2::new(50.0, 900.0));

    // Player
    let player = ctx.scene.create("Player");
    ctx.scene.set_tag(player, "Player");
    let mut body = RigidBody::new(1.0);
    body.drag = 6.0;
    let _ = ctx.scene.world.insert_one(player, body);
    let _ = ctx
        .scene
        .world
        .insert_one(player, RectCollider::single(Vec2::splat(25.0)));
    let _ = ctx.scene.world.insert_one(player, Player::default());
    let _ = ctx.scene.world.insert_one(player, Health::new(100.0));
    let _ = ctx
        .scene
        .world
        .insert_one(player, Sprite::new(SpriteAnimation::single(String::new())));

    // A few wandering enemies of increasing bulk
    for (i, mass) in [2.0, 3.0, 4.0].into_iter().enumerate() {
        let enemy = ctx.scene.create(format!("Slime_{i}"));
        ctx.scene.set_tag(enemy, "Enemy");
        if let Ok(mut t) = ctx.scene.world.get::<&mut Transform>(enemy) {
            t.set_local_position(Vec2::new(300.0 + 150.0 * i as f32, 200.0 - 180.0 * i as f32));
        }
        let mut body = RigidBody::new(mass);
        body.drag = 3.0;
        let _ = ctx.scene.world.insert_one(enemy, body);
        let _ = ctx
            .scene
            .world
            .insert_one(enemy, RectCollider::single(Vec2::splat(25.0)));
        let _ = ctx.scene.world.insert_one(enemy, AiState::default());
        let _ = ctx.scene.world.insert_one(enemy, Health::new(10.0 * mass));
        let _ = ctx
            .scene
            .world
            .insert_one(enemy, Sprite::new(SpriteAnimation::single(String::new())));
    }

    // HUD canvas: pause button in the corner
    let hud = ctx.scene.create("HUD");
    let _ = ctx.scene.world.insert_one(hud, UiRoot);
    let pause = ctx.scene.create("PauseButton");
    if let Ok(mut t) = ctx.scene.world.get::<&mut Transform>(pause) {
        t.set_local_position(Vec2::new(580.0, 320.0));
    }
    let _ = ctx.scene.world.insert_one(
        pause,
        PauseMenuButton::new(Vec2::new(40.0, 20.0), ButtonAction::TogglePause),
    );
    let _ = hierarchy::set_parent_keep_local(&mut ctx.scene, pause, hud);

    hierarchy::propagate(&mut ctx.scene);
}

fn main() {
    let config = EngineConfig::load("config.table");
    let engine = Engine::new(config, ArenaDemo);
    if let Err(e) = engine.run() {
        eprintln!("engine error: {e}");
        std::process::exit(1);
    }
}
