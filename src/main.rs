//! Starfall Story entry point
//!
//! Browser shell: wires DOM input to the scene state machines, runs the
//! frame loop, and turns scene events into haptics, audio and particles.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_app {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{
        Document, Element, HtmlElement, HtmlInputElement, KeyboardEvent, PointerEvent, TouchEvent,
    };

    use starfall_story::audio::{AudioManager, SoundCue};
    use starfall_story::consts::*;
    use starfall_story::flags::{SavedFlags, VehicleSkin};
    use starfall_story::haptics::{self, HapticPattern};
    use starfall_story::scenes::lore::LorePhase;
    use starfall_story::scenes::slide::SlideOutcome;
    use starfall_story::scenes::{
        ConstellationScene, FeedScene, LoreScene, RevealScene, SlideScene, TapScene,
        constellation::StarTap,
    };
    use starfall_story::secrets::{
        BoundaryBreaker, GlitchTitle, LongPressEvent, LongPressReveal, TERMINAL_HELP,
        TerminalCommand, TitleClick, parse_terminal_command,
    };
    use starfall_story::sequencer::{SceneStep, Sequencer};
    use starfall_story::sim::{
        EffectKind, EffectRequest, Feedback, GamePhase, ItemKind, MinigameState, frame_update,
    };

    /// Live state for whichever scene the sequencer has selected
    enum ActiveScene {
        Minigame,
        Lore(LoreScene),
        Reveal(RevealScene),
        Tap(TapScene),
        Slide(SlideScene),
        Constellation(ConstellationScene),
        Feed(FeedScene),
        Final,
    }

    /// Application instance holding all state
    struct App {
        sequencer: Sequencer,
        scene: ActiveScene,
        minigame: MinigameState,
        /// Pending auto-advance after a minigame win
        win_timer_ms: Option<f32>,
        boundary: BoundaryBreaker,
        glitch: GlitchTitle,
        long_press: LongPressReveal,
        flags: SavedFlags,
        audio: AudioManager,
        last_time: f64,
    }

    impl App {
        fn new(seed: u64) -> Self {
            let flags = SavedFlags::load();
            Self {
                sequencer: Sequencer::new(),
                scene: ActiveScene::Minigame,
                minigame: MinigameState::new(seed),
                win_timer_ms: None,
                boundary: BoundaryBreaker::new(flags.boundary_breaker_unlocked),
                glitch: GlitchTitle::new(),
                long_press: LongPressReveal::new(),
                flags,
                audio: AudioManager::new(),
                last_time: 0.0,
            }
        }

        /// Rebuild scene state for the sequencer's current step. Dropping
        /// the previous scene cancels all of its pending timers.
        fn enter_step(&mut self, doc: &Document) {
            let step = self.sequencer.current();
            log::info!("entering scene {step:?} (step {})", self.sequencer.step());
            self.win_timer_ms = None;
            self.scene = match step {
                SceneStep::Intro => {
                    self.minigame.restart();
                    ActiveScene::Minigame
                }
                SceneStep::Lore(key) => ActiveScene::Lore(LoreScene::new(key)),
                SceneStep::Reveal => ActiveScene::Reveal(RevealScene::new()),
                SceneStep::Tap => ActiveScene::Tap(TapScene::new()),
                SceneStep::Slide => ActiveScene::Slide(SlideScene::new()),
                SceneStep::Constellation => ActiveScene::Constellation(ConstellationScene::new()),
                SceneStep::Feed => ActiveScene::Feed(FeedScene::new()),
                SceneStep::Final => {
                    self.long_press = LongPressReveal::new();
                    ActiveScene::Final
                }
            };
            show_scene(doc, step);
            if let ActiveScene::Lore(scene) = &self.scene {
                render_lore(doc, scene);
            }
        }

        fn advance(&mut self, now: f64, doc: &Document) {
            if self.sequencer.advance(now) {
                self.enter_step(doc);
            }
        }

        /// Per-frame update; `time` is the rAF timestamp
        fn frame(&mut self, time: f64, doc: &Document) {
            let dt = if self.last_time > 0.0 {
                ((time - self.last_time) as f32).min(100.0)
            } else {
                16.0
            };
            self.last_time = time;

            let mut advance_now = false;
            match &mut self.scene {
                ActiveScene::Minigame => {
                    let events = frame_update(&mut self.minigame, dt);
                    match events.feedback() {
                        Some(Feedback::BombHit) => {
                            haptics::vibrate(HapticPattern::Explosion);
                            self.audio.play(SoundCue::Explosion);
                        }
                        Some(Feedback::HeartCatch) => {
                            haptics::vibrate(HapticPattern::Light);
                            self.audio.play(SoundCue::HeartCatch);
                        }
                        None => {}
                    }
                    for effect in &events.effects {
                        spawn_effect(doc, effect);
                    }
                    if events.won {
                        haptics::vibrate(HapticPattern::Success);
                        self.audio.play(SoundCue::SuccessArpeggio);
                        self.win_timer_ms = Some(WIN_ADVANCE_DELAY_MS as f32);
                    }
                    render_minigame(doc, &self.minigame, &self.flags);
                }
                ActiveScene::Lore(scene) => {
                    let before = scene.phase();
                    scene.update(dt);
                    if scene.phase() != before {
                        render_lore(doc, scene);
                    }
                }
                ActiveScene::Reveal(scene) => {
                    if scene.update(dt) {
                        haptics::vibrate(HapticPattern::Medium);
                    }
                    render_reveal(doc, scene);
                }
                ActiveScene::Tap(scene) => {
                    if scene.update(dt) {
                        haptics::vibrate(HapticPattern::Success);
                        advance_now = true;
                    } else {
                        render_tap(doc, scene);
                    }
                }
                ActiveScene::Slide(scene) => {
                    if scene.update(dt) {
                        advance_now = true;
                    } else {
                        render_slide(doc, scene);
                    }
                }
                ActiveScene::Constellation(scene) => {
                    if scene.update(dt) {
                        advance_now = true;
                    } else {
                        render_constellation(doc, scene);
                    }
                }
                ActiveScene::Feed(scene) => {
                    if scene.update(dt) {
                        haptics::vibrate(HapticPattern::Success);
                        advance_now = true;
                    } else {
                        render_feed(doc, scene);
                    }
                }
                ActiveScene::Final => {
                    for event in self.long_press.update(dt) {
                        match event {
                            LongPressEvent::Armed => haptics::vibrate(HapticPattern::PressArmed),
                            LongPressEvent::Pulse { strong } => haptics::vibrate(if strong {
                                HapticPattern::HeartbeatStrong
                            } else {
                                HapticPattern::HeartbeatSoft
                            }),
                            LongPressEvent::Reveal => {
                                flash_screen(doc);
                                set_hidden(doc, "secret-polaroid", false);
                            }
                        }
                    }
                }
            }

            if let Some(remaining) = self.win_timer_ms {
                let remaining = remaining - dt;
                if remaining <= 0.0 {
                    self.win_timer_ms = None;
                    advance_now = true;
                } else {
                    self.win_timer_ms = Some(remaining);
                }
            }

            if advance_now {
                self.advance(time, doc);
            }
        }
    }

    // === DOM helpers ===

    fn document() -> Document {
        web_sys::window().unwrap().document().unwrap()
    }

    fn now_ms() -> f64 {
        web_sys::window()
            .and_then(|w| w.performance())
            .map(|p| p.now())
            .unwrap_or(0.0)
    }

    fn set_hidden(doc: &Document, id: &str, hidden: bool) {
        if let Some(el) = doc.get_element_by_id(id) {
            let _ = el.class_list().toggle_with_force("hidden", hidden);
        }
    }

    fn set_text(doc: &Document, selector: &str, text: &str) {
        if let Some(el) = doc.query_selector(selector).ok().flatten() {
            el.set_text_content(Some(text));
        }
    }

    const SCENE_IDS: [&str; 8] = [
        "scene-intro",
        "scene-lore",
        "scene-reveal",
        "scene-tap",
        "scene-slide",
        "scene-constellation",
        "scene-feed",
        "scene-final",
    ];

    fn scene_id(step: SceneStep) -> &'static str {
        match step {
            SceneStep::Intro => "scene-intro",
            SceneStep::Lore(_) => "scene-lore",
            SceneStep::Reveal => "scene-reveal",
            SceneStep::Tap => "scene-tap",
            SceneStep::Slide => "scene-slide",
            SceneStep::Constellation => "scene-constellation",
            SceneStep::Feed => "scene-feed",
            SceneStep::Final => "scene-final",
        }
    }

    fn show_scene(doc: &Document, step: SceneStep) {
        let live = scene_id(step);
        for id in SCENE_IDS {
            set_hidden(doc, id, id != live);
        }
    }

    // === Scene rendering ===

    fn render_minigame(doc: &Document, state: &MinigameState, flags: &SavedFlags) {
        set_text(doc, "#hud-score .hud-value", &state.score.to_string());
        if let Some(el) = doc.get_element_by_id("hud-progress-fill")
            && let Ok(el) = el.dyn_into::<HtmlElement>()
        {
            let pct = state.progress() * 100.0;
            let _ = el.style().set_property("width", &format!("{pct:.1}%"));
        }

        if let Some(player) = doc.get_element_by_id("player")
            && let Ok(player) = player.dyn_into::<HtmlElement>()
        {
            let _ = player
                .style()
                .set_property("left", &format!("{:.2}%", state.player_x));
            let out_of_bounds = state.player_x < 0.0 || state.player_x > FIELD_MAX;
            let _ = player
                .class_list()
                .toggle_with_force("out-of-bounds", out_of_bounds);
            let _ = player
                .class_list()
                .toggle_with_force("skin-plane", flags.skin == VehicleSkin::Plane);
        }

        if let Some(field) = doc.get_element_by_id("game-field") {
            sync_items(doc, &field, state);
        }

        set_hidden(doc, "start-overlay", state.phase != GamePhase::Idle);
        set_hidden(doc, "win-overlay", state.phase != GamePhase::Won);
    }

    /// Reconcile falling-item elements against the sim's item list, keyed
    /// by item id so elements persist across frames.
    fn sync_items(doc: &Document, field: &Element, state: &MinigameState) {
        let live_ids: Vec<String> = state.items.iter().map(|i| format!("item-{}", i.id)).collect();

        // Drop elements whose item is gone
        if let Ok(existing) = field.query_selector_all(".falling-item") {
            for i in 0..existing.length() {
                if let Some(node) = existing.item(i)
                    && let Ok(el) = node.dyn_into::<Element>()
                    && !live_ids.contains(&el.id())
                {
                    el.remove();
                }
            }
        }

        for item in &state.items {
            let id = format!("item-{}", item.id);
            let el = match doc.get_element_by_id(&id) {
                Some(el) => el,
                None => {
                    let Ok(el) = doc.create_element("div") else {
                        continue;
                    };
                    el.set_id(&id);
                    let class = match item.kind {
                        ItemKind::Heart => "falling-item item-heart",
                        ItemKind::Bomb => "falling-item item-bomb",
                    };
                    el.set_class_name(class);
                    let _ = field.append_child(&el);
                    el
                }
            };
            if let Ok(el) = el.dyn_into::<HtmlElement>() {
                let _ = el.style().set_property("left", &format!("{:.2}%", item.pos.x));
                let _ = el.style().set_property("top", &format!("{:.2}%", item.pos.y));
            }
        }
    }

    fn render_lore(doc: &Document, scene: &LoreScene) {
        let entry = scene.entry();
        set_text(doc, "#lore-chapter", entry.chapter);
        set_text(doc, "#lore-title", entry.title);
        set_text(doc, "#lore-date", entry.date);
        if let Some(img) = doc.get_element_by_id("lore-image") {
            let _ = img.set_attribute("src", entry.image);
        }
        match scene.phase() {
            LorePhase::Decrypting => {
                set_hidden(doc, "lore-loading", false);
                set_hidden(doc, "lore-body", true);
                set_hidden(doc, "lore-next", true);
            }
            LorePhase::Visualizing => {
                set_hidden(doc, "lore-loading", true);
                set_hidden(doc, "lore-body", false);
                set_text(doc, "#lore-text", "");
            }
            LorePhase::Reading => {
                set_text(doc, "#lore-text", entry.text);
                set_hidden(doc, "lore-next", false);
            }
        }
    }

    fn render_reveal(doc: &Document, scene: &RevealScene) {
        set_hidden(doc, "reveal-loading", scene.revealed());
        set_hidden(doc, "reveal-next", !scene.can_continue());
    }

    fn render_tap(doc: &Document, scene: &TapScene) {
        set_text(doc, "#tap-score", &scene.score().to_string());
        if let Ok(pips) = doc.query_selector_all("#tap-pips .pip") {
            for i in 0..pips.length() {
                if let Some(node) = pips.item(i)
                    && let Ok(el) = node.dyn_into::<Element>()
                {
                    let _ = el
                        .class_list()
                        .toggle_with_force("lit", i < scene.score());
                }
            }
        }
        set_hidden(doc, "tap-victory", !scene.complete());
    }

    fn render_slide(doc: &Document, scene: &SlideScene) {
        let pct = scene.position() * 100.0;
        if let Some(el) = doc.get_element_by_id("slide-handle")
            && let Ok(el) = el.dyn_into::<HtmlElement>()
        {
            let _ = el.style().set_property("left", &format!("{pct:.1}%"));
            let _ = el
                .class_list()
                .toggle_with_force("flight", scene.flight_mode());
        }
        if let Some(el) = doc.get_element_by_id("slide-fill")
            && let Ok(el) = el.dyn_into::<HtmlElement>()
        {
            let _ = el.style().set_property("width", &format!("{pct:.1}%"));
        }
        set_hidden(doc, "slide-done", !scene.completed());
    }

    fn render_constellation(doc: &Document, scene: &ConstellationScene) {
        for (i, lit) in scene.lit().iter().enumerate() {
            if let Some(el) = doc.get_element_by_id(&format!("star-{i}")) {
                let _ = el.class_list().toggle_with_force("lit", *lit);
            }
        }
        set_hidden(doc, "constellation-heart", !scene.complete());
        if let Some(el) = doc.get_element_by_id("secret-constellation")
            && let Ok(el) = el.dyn_into::<HtmlElement>()
        {
            let _ = el
                .style()
                .set_property("opacity", &format!("{:.2}", scene.tilt_progress()));
        }
        set_hidden(doc, "secret-caption", !scene.secret_visible());
    }

    fn render_feed(doc: &Document, scene: &FeedScene) {
        if let Some(el) = doc.get_element_by_id("feed-fill")
            && let Ok(el) = el.dyn_into::<HtmlElement>()
        {
            let _ = el
                .style()
                .set_property("width", &format!("{}%", scene.meter()));
        }
        set_hidden(doc, "feed-done", !scene.complete());
    }

    // === Effects ===

    /// Drop a particle element onto the effects layer; CSS animates it and
    /// a timeout removes it. Origin is in percent of the layer.
    fn spawn_effect(doc: &Document, effect: &EffectRequest) {
        let Some(layer) = doc.get_element_by_id("fx-layer") else {
            return;
        };
        let Ok(el) = doc.create_element("div") else {
            return;
        };
        let class = match effect.kind {
            EffectKind::HeartBurst => "fx fx-heart-burst",
            EffectKind::Explosion => "fx fx-explosion",
            EffectKind::FireworkBurst => "fx fx-firework",
        };
        el.set_class_name(class);
        if let Ok(styled) = el.clone().dyn_into::<HtmlElement>() {
            let _ = styled
                .style()
                .set_property("left", &format!("{:.2}%", effect.origin.x));
            let _ = styled
                .style()
                .set_property("top", &format!("{:.2}%", effect.origin.y));
        }
        let _ = layer.append_child(&el);
        remove_after(&el, 1500);
    }

    fn flash_screen(doc: &Document) {
        if let Some(el) = doc.get_element_by_id("flash-overlay") {
            let _ = el.class_list().remove_1("hidden");
            add_class_after(&el, "hidden", 160);
        }
    }

    fn remove_after(el: &Element, delay_ms: i32) {
        let el = el.clone();
        let closure = Closure::once(move || {
            el.remove();
        });
        let _ = web_sys::window()
            .unwrap()
            .set_timeout_with_callback_and_timeout_and_arguments_0(
                closure.as_ref().unchecked_ref(),
                delay_ms,
            );
        closure.forget();
    }

    fn add_class_after(el: &Element, class: &str, delay_ms: i32) {
        let el = el.clone();
        let class = class.to_string();
        let closure = Closure::once(move || {
            let _ = el.class_list().add_1(&class);
        });
        let _ = web_sys::window()
            .unwrap()
            .set_timeout_with_callback_and_timeout_and_arguments_0(
                closure.as_ref().unchecked_ref(),
                delay_ms,
            );
        closure.forget();
    }

    fn remove_class_after(el: &Element, class: &str, delay_ms: i32) {
        let el = el.clone();
        let class = class.to_string();
        let closure = Closure::once(move || {
            let _ = el.class_list().remove_1(&class);
        });
        let _ = web_sys::window()
            .unwrap()
            .set_timeout_with_callback_and_timeout_and_arguments_0(
                closure.as_ref().unchecked_ref(),
                delay_ms,
            );
        closure.forget();
    }

    // === Bootstrap ===

    pub fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Starfall Story starting...");

        let doc = document();

        if let Some(loading) = doc.get_element_by_id("loading") {
            let _ = loading.set_attribute("class", "hidden");
        }

        let seed = js_sys::Date::now() as u64;
        let app = Rc::new(RefCell::new(App::new(seed)));
        log::info!("Initialized with seed: {seed}");

        {
            let mut a = app.borrow_mut();
            if a.flags.intro_protocol_seen {
                set_hidden(&doc, "intro-protocol", true);
            }
            if a.flags.boundary_breaker_unlocked {
                set_hidden(&doc, "skin-btn", false);
            }
            a.enter_step(&doc);
        }

        setup_minigame_handlers(app.clone());
        setup_scene_handlers(app.clone());
        setup_final_handlers(app.clone());
        setup_sound_toggle(app.clone());

        request_animation_frame(app);

        log::info!("Starfall Story running!");
    }

    fn request_animation_frame(app: Rc<RefCell<App>>) {
        let window = web_sys::window().unwrap();
        let closure = Closure::once(move |time: f64| {
            frame_loop(app, time);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn frame_loop(app: Rc<RefCell<App>>, time: f64) {
        {
            let doc = document();
            app.borrow_mut().frame(time, &doc);
        }
        request_animation_frame(app);
    }

    /// Shared pointer-move handling for the minigame field
    fn field_move(app: &Rc<RefCell<App>>, client_x: f32) {
        let doc = document();
        let Some(field) = doc.get_element_by_id("game-field") else {
            return;
        };
        let rect = field.get_bounding_client_rect();
        if rect.width() <= 0.0 {
            return;
        }
        let x = (client_x - rect.left() as f32) / rect.width() as f32 * FIELD_MAX;

        let mut a = app.borrow_mut();
        if !matches!(a.scene, ActiveScene::Minigame) {
            return;
        }
        if a.boundary.observe(x, now_ms()) {
            a.flags.boundary_breaker_unlocked = true;
            a.flags.save();
            haptics::vibrate(HapticPattern::Success);
            set_hidden(&doc, "boundary-modal", false);
            set_hidden(&doc, "skin-btn", false);
        }
        let unlocked = a.boundary.unlocked();
        a.minigame.set_player_x(x, unlocked);
    }

    fn setup_minigame_handlers(app: Rc<RefCell<App>>) {
        let doc = document();

        if let Some(field) = doc.get_element_by_id("game-field") {
            {
                let app = app.clone();
                let closure = Closure::<dyn FnMut(_)>::new(move |event: PointerEvent| {
                    field_move(&app, event.client_x() as f32);
                });
                let _ = field.add_event_listener_with_callback(
                    "pointermove",
                    closure.as_ref().unchecked_ref(),
                );
                closure.forget();
            }
            {
                let app = app.clone();
                let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                    event.prevent_default();
                    if let Some(touch) = event.touches().get(0) {
                        field_move(&app, touch.client_x() as f32);
                    }
                });
                let _ = field.add_event_listener_with_callback(
                    "touchmove",
                    closure.as_ref().unchecked_ref(),
                );
                closure.forget();
            }
        }

        // Start button
        if let Some(btn) = doc.get_element_by_id("start-btn") {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
                let mut a = app.borrow_mut();
                a.audio.resume();
                a.minigame.start();
                a.flags.intro_protocol_seen = true;
                a.flags.save();
                a.audio.play(SoundCue::GameStart);
                haptics::vibrate(HapticPattern::Medium);
                set_hidden(&document(), "intro-protocol", true);
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Boundary modal dismiss
        if let Some(btn) = doc.get_element_by_id("boundary-modal-close") {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
                set_hidden(&document(), "boundary-modal", true);
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Skin swap (shown once the boundary breaker is unlocked)
        if let Some(btn) = doc.get_element_by_id("skin-btn") {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
                let mut a = app.borrow_mut();
                a.flags.skin = match a.flags.skin {
                    VehicleSkin::Rocket => VehicleSkin::Plane,
                    VehicleSkin::Plane => VehicleSkin::Rocket,
                };
                a.flags.save();
                haptics::vibrate(HapticPattern::Click);
                log::info!("skin set to {}", a.flags.skin.as_str());
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn setup_scene_handlers(app: Rc<RefCell<App>>) {
        let doc = document();

        // Lore continue
        if let Some(btn) = doc.get_element_by_id("lore-next") {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
                let doc = document();
                let mut a = app.borrow_mut();
                if let ActiveScene::Lore(scene) = &a.scene
                    && scene.can_continue()
                {
                    haptics::vibrate(HapticPattern::Heavy);
                    a.audio.play(SoundCue::Click);
                    a.advance(now_ms(), &doc);
                }
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Reveal continue
        if let Some(btn) = doc.get_element_by_id("reveal-next") {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
                let doc = document();
                let mut a = app.borrow_mut();
                if let ActiveScene::Reveal(scene) = &a.scene
                    && scene.can_continue()
                {
                    a.audio.play(SoundCue::Click);
                    a.advance(now_ms(), &doc);
                }
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Tap scene: whole screen is the button
        if let Some(area) = doc.get_element_by_id("scene-tap") {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::MouseEvent| {
                let doc = document();
                let mut a = app.borrow_mut();
                if let ActiveScene::Tap(scene) = &mut a.scene {
                    let at = viewport_percent(event.client_x() as f32, event.client_y() as f32);
                    if let Some(effect) = scene.tap(at) {
                        haptics::vibrate(HapticPattern::Heartbeat);
                        spawn_effect(&doc, &effect);
                        a.audio.play(SoundCue::Click);
                    }
                }
            });
            let _ =
                area.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        setup_slide_handlers(app.clone());
        setup_constellation_handlers(app.clone());

        // Feed: tap anywhere on the scene
        if let Some(area) = doc.get_element_by_id("scene-feed") {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
                let mut a = app.borrow_mut();
                if let ActiveScene::Feed(scene) = &mut a.scene {
                    scene.tap();
                    haptics::vibrate(HapticPattern::Light);
                }
            });
            let _ =
                area.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    /// Client pixels to viewport percent for effect origins
    fn viewport_percent(x: f32, y: f32) -> glam::Vec2 {
        let window = web_sys::window().unwrap();
        let vw = window
            .inner_width()
            .ok()
            .and_then(|v| v.as_f64())
            .unwrap_or(1.0)
            .max(1.0) as f32;
        let vh = window
            .inner_height()
            .ok()
            .and_then(|v| v.as_f64())
            .unwrap_or(1.0)
            .max(1.0) as f32;
        glam::Vec2::new(x / vw * 100.0, y / vh * 100.0)
    }

    fn setup_slide_handlers(app: Rc<RefCell<App>>) {
        let doc = document();

        if let Some(track) = doc.get_element_by_id("slide-track") {
            {
                let app = app.clone();
                let closure = Closure::<dyn FnMut(_)>::new(move |event: PointerEvent| {
                    // buttons == 0 means no active drag
                    if event.buttons() == 0 {
                        return;
                    }
                    let mut a = app.borrow_mut();
                    if let ActiveScene::Slide(scene) = &mut a.scene
                        && let Some(fraction) = track_fraction(event.client_x() as f32)
                    {
                        scene.drag_to(fraction);
                    }
                });
                let _ = track.add_event_listener_with_callback(
                    "pointermove",
                    closure.as_ref().unchecked_ref(),
                );
                closure.forget();
            }
            {
                let app = app.clone();
                let closure = Closure::<dyn FnMut(_)>::new(move |_event: PointerEvent| {
                    let mut a = app.borrow_mut();
                    if let ActiveScene::Slide(scene) = &mut a.scene {
                        match scene.release() {
                            SlideOutcome::Completed => {
                                haptics::vibrate(HapticPattern::Success);
                            }
                            SlideOutcome::SnappedBack => {
                                haptics::vibrate(HapticPattern::Light);
                            }
                        }
                    }
                });
                let _ = track.add_event_listener_with_callback(
                    "pointerup",
                    closure.as_ref().unchecked_ref(),
                );
                closure.forget();
            }
        }

        // Map pin easter egg
        if let Some(pin) = doc.get_element_by_id("slide-pin") {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
                let mut a = app.borrow_mut();
                if let ActiveScene::Slide(scene) = &mut a.scene {
                    if scene.pin_tap(now_ms()) {
                        haptics::vibrate(HapticPattern::Success);
                        a.audio.play(SoundCue::Magic);
                    } else {
                        haptics::vibrate(HapticPattern::Light);
                    }
                }
            });
            let _ = pin.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    /// Pointer x to a 0..1 fraction of the slide track
    fn track_fraction(client_x: f32) -> Option<f32> {
        let track = document().get_element_by_id("slide-track")?;
        let rect = track.get_bounding_client_rect();
        if rect.width() <= 0.0 {
            return None;
        }
        Some((client_x - rect.left() as f32) / rect.width() as f32)
    }

    fn setup_constellation_handlers(app: Rc<RefCell<App>>) {
        let doc = document();

        for i in 0..starfall_story::scenes::constellation::STAR_COUNT {
            let Some(star) = doc.get_element_by_id(&format!("star-{i}")) else {
                continue;
            };
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
                let mut a = app.borrow_mut();
                if let ActiveScene::Constellation(scene) = &mut a.scene {
                    match scene.tap_star(i) {
                        StarTap::Lit(index) => {
                            haptics::vibrate(HapticPattern::Light);
                            a.audio.play(SoundCue::StarChime { index });
                        }
                        StarTap::Completed => {
                            haptics::vibrate(HapticPattern::Celebration);
                            a.audio.play(SoundCue::SuccessArpeggio);
                        }
                        StarTap::Rejected => {}
                    }
                }
            });
            let _ =
                star.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Device tilt for the hidden constellation
        {
            let window = web_sys::window().unwrap();
            let closure =
                Closure::<dyn FnMut(_)>::new(move |event: web_sys::DeviceOrientationEvent| {
                    let mut a = app.borrow_mut();
                    if let ActiveScene::Constellation(scene) = &mut a.scene {
                        let beta = event.beta().unwrap_or(0.0) as f32;
                        let gamma = event.gamma().unwrap_or(0.0) as f32;
                        scene.set_tilt(beta, gamma);
                    }
                });
            let _ = window.add_event_listener_with_callback(
                "deviceorientation",
                closure.as_ref().unchecked_ref(),
            );
            closure.forget();
        }
    }

    fn setup_final_handlers(app: Rc<RefCell<App>>) {
        let doc = document();

        // Restart from the finale
        if let Some(btn) = doc.get_element_by_id("restart-btn") {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
                let doc = document();
                let mut a = app.borrow_mut();
                if a.sequencer.restart(now_ms()) {
                    a.enter_step(&doc);
                    log::info!("Restarted from the finale");
                }
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Clicking the title: five clicks corrupt it, then it opens the terminal
        if let Some(title) = doc.get_element_by_id("final-title") {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
                let doc = document();
                let mut a = app.borrow_mut();
                if !matches!(a.scene, ActiveScene::Final) {
                    return;
                }
                match a.glitch.click() {
                    TitleClick::Counted => haptics::vibrate(HapticPattern::Light),
                    TitleClick::GlitchActivated => {
                        haptics::vibrate(HapticPattern::GlitchActivate);
                        a.audio.play(SoundCue::Glitch);
                        if let Some(el) = doc.get_element_by_id("final-title") {
                            let _ = el.class_list().add_1("glitched");
                        }
                    }
                    TitleClick::OpenTerminal => {
                        haptics::vibrate(HapticPattern::Medium);
                        set_hidden(&doc, "terminal", false);
                        if let Some(input) = doc.get_element_by_id("terminal-input")
                            && let Ok(input) = input.dyn_into::<HtmlElement>()
                        {
                            let _ = input.focus();
                        }
                    }
                }
            });
            let _ =
                title.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Terminal input
        if let Some(input) = doc.get_element_by_id("terminal-input") {
            let app = app.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                if event.key() != "Enter" {
                    return;
                }
                let doc = document();
                let Some(input) = doc
                    .get_element_by_id("terminal-input")
                    .and_then(|el| el.dyn_into::<HtmlInputElement>().ok())
                else {
                    return;
                };
                let mut a = app.borrow_mut();
                match parse_terminal_command(&input.value()) {
                    TerminalCommand::Surprise => {
                        input.set_value("");
                        set_hidden(&doc, "terminal", true);
                        set_hidden(&doc, "qr-overlay", false);
                    }
                    TerminalCommand::Jump { step } => {
                        input.set_value("");
                        set_hidden(&doc, "terminal", true);
                        haptics::vibrate(HapticPattern::Notification);
                        if a.sequencer.jump_to(step, now_ms()) {
                            a.enter_step(&doc);
                        }
                    }
                    TerminalCommand::Help => {
                        input.set_value(TERMINAL_HELP);
                    }
                    TerminalCommand::Unknown => {
                        haptics::vibrate(HapticPattern::Error);
                        a.audio.play(SoundCue::TerminalError);
                        if let Some(el) = doc.get_element_by_id("terminal") {
                            let _ = el.class_list().add_1("shake");
                            remove_class_after(&el, "shake", 500);
                        }
                    }
                }
            });
            let _ =
                input.add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Terminal close
        if let Some(btn) = doc.get_element_by_id("terminal-close") {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
                set_hidden(&document(), "terminal", true);
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // QR overlay close
        if let Some(btn) = doc.get_element_by_id("qr-close") {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
                set_hidden(&document(), "qr-overlay", true);
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Long press on the hero photo
        if let Some(photo) = doc.get_element_by_id("secret-photo") {
            {
                let app = app.clone();
                let closure = Closure::<dyn FnMut(_)>::new(move |_event: PointerEvent| {
                    let mut a = app.borrow_mut();
                    if matches!(a.scene, ActiveScene::Final) {
                        a.long_press.press_start();
                        haptics::vibrate(HapticPattern::LongPress);
                    }
                });
                let _ = photo.add_event_listener_with_callback(
                    "pointerdown",
                    closure.as_ref().unchecked_ref(),
                );
                closure.forget();
            }
            for event_name in ["pointerup", "pointercancel", "pointerleave"] {
                let app = app.clone();
                let closure = Closure::<dyn FnMut(_)>::new(move |_event: PointerEvent| {
                    app.borrow_mut().long_press.release();
                });
                let _ = photo.add_event_listener_with_callback(
                    event_name,
                    closure.as_ref().unchecked_ref(),
                );
                closure.forget();
            }
        }
    }

    fn setup_sound_toggle(app: Rc<RefCell<App>>) {
        let doc = document();
        if let Some(btn) = doc.get_element_by_id("sound-btn") {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::MouseEvent| {
                let mut a = app.borrow_mut();
                let enabled = !a.audio.enabled();
                a.audio.set_enabled(enabled);
                if enabled {
                    a.audio.resume();
                }
                if let Some(el) = document().get_element_by_id("sound-btn") {
                    let _ = el.class_list().toggle_with_force("muted", !enabled);
                }
                log::info!("sound {}", if enabled { "on" } else { "off" });
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    wasm_app::run();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Starfall Story (native) starting...");
    log::info!("The interactive experience needs a browser - run with `trunk serve`");

    println!("\nRunning headless minigame demo...");
    demo_minigame();
}

/// Drives the sim with a chasing player until the win threshold, as a
/// quick native sanity check.
#[cfg(not(target_arch = "wasm32"))]
fn demo_minigame() {
    use starfall_story::consts::POINTS_TO_WIN;
    use starfall_story::sim::{GamePhase, ItemKind, MinigameState, frame_update};

    let mut state = MinigameState::new(7);
    state.start();

    let mut frames = 0u32;
    while state.phase == GamePhase::Running && frames < 60 * 300 {
        // chase the lowest heart
        if let Some(target) = state
            .items
            .iter()
            .filter(|i| i.kind == ItemKind::Heart)
            .max_by(|a, b| a.pos.y.total_cmp(&b.pos.y))
        {
            let x = target.pos.x;
            state.set_player_x(x, false);
        }
        frame_update(&mut state, 1000.0 / 60.0);
        frames += 1;
    }

    assert_eq!(state.phase, GamePhase::Won);
    assert_eq!(state.score, POINTS_TO_WIN);
    println!(
        "✓ Won with {} points in {:.1}s of simulated play",
        state.score,
        frames as f32 / 60.0
    );
}
