//! QuizQuest entry point
//!
//! Handles platform-specific initialization: the wasm build wires the browser
//! UI (top bar, toasts, data panel), the native build runs a logging demo.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_app {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::JsCast;
    use wasm_bindgen::prelude::*;
    use web_sys::{Document, FileReader, HtmlInputElement};

    use quiz_quest::consts::BUNDLE_FILE_NAME;
    use quiz_quest::notify::{CelebrationEffect, NotificationSink};
    use quiz_quest::persistence::LocalStorage;
    use quiz_quest::progression::LevelUpEvent;

    type Session = quiz_quest::GameSession<LocalStorage>;

    /// Toast duration, matching the CSS animation.
    const TOAST_MS: i32 = 1600;

    /// Shows notifications in the `#toast` element.
    struct ToastSink;

    impl NotificationSink for ToastSink {
        fn notify(&mut self, message: &str) {
            log::info!("toast: {message}");
            let Some(window) = web_sys::window() else { return };
            let Some(document) = window.document() else { return };
            let Some(el) = document.get_element_by_id("toast") else { return };

            el.set_text_content(Some(message));
            let _ = el.set_attribute("class", "toast");

            let hide = Closure::once_into_js(move || {
                if let Some(el) = web_sys::window()
                    .and_then(|w| w.document())
                    .and_then(|d| d.get_element_by_id("toast"))
                {
                    let _ = el.set_attribute("class", "toast hidden");
                }
            });
            let _ = window.set_timeout_with_callback_and_timeout_and_arguments_0(
                hide.unchecked_ref(),
                TOAST_MS,
            );
        }
    }

    /// Fires the page's optional `confetti` global on level-up.
    ///
    /// The page may not load the confetti library at all; the session
    /// discards the error in that case.
    struct ConfettiEffect;

    impl CelebrationEffect for ConfettiEffect {
        fn fire(&mut self, _event: &LevelUpEvent) -> Result<(), String> {
            let window = web_sys::window().ok_or("no window")?;
            let confetti = js_sys::Reflect::get(window.as_ref(), &JsValue::from_str("confetti"))
                .map_err(|_| "no confetti global")?;
            let confetti: js_sys::Function =
                confetti.dyn_into().map_err(|_| "confetti is not callable")?;

            let options = js_sys::Object::new();
            let _ = js_sys::Reflect::set(
                &options,
                &JsValue::from_str("particleCount"),
                &JsValue::from_f64(140.0),
            );
            let _ = js_sys::Reflect::set(
                &options,
                &JsValue::from_str("spread"),
                &JsValue::from_f64(70.0),
            );
            let origin = js_sys::Object::new();
            let _ = js_sys::Reflect::set(&origin, &JsValue::from_str("y"), &JsValue::from_f64(0.6));
            let _ = js_sys::Reflect::set(&options, &JsValue::from_str("origin"), &origin);

            confetti
                .call1(&JsValue::NULL, &options)
                .map_err(|e| format!("{e:?}"))?;
            Ok(())
        }
    }

    pub fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("QuizQuest starting...");

        let window = web_sys::window().expect("no window");
        let document = window.document().expect("no document");

        let session = Rc::new(RefCell::new(Session::new(
            LocalStorage::new(),
            Box::new(ToastSink),
            Box::new(ConfettiEffect),
        )));

        update_topbar(&document, &session.borrow());
        setup_export_button(&document, session.clone());
        setup_import_input(&document, session.clone());

        log::info!("QuizQuest running!");
    }

    fn set_text(document: &Document, id: &str, text: &str) {
        if let Some(el) = document.get_element_by_id(id) {
            el.set_text_content(Some(text));
        }
    }

    /// Render coins, level, the xp bar, and the equipped avatar emoji.
    fn update_topbar(document: &Document, session: &Session) {
        let player = session.player();
        set_text(document, "coins", &player.coins.to_string());
        set_text(document, "level-label", &format!("Lv {}", player.level));
        set_text(document, "xp", &player.xp.to_string());
        set_text(document, "xpNext", &player.xp_to_next.to_string());

        if let Some(bar) = document.get_element_by_id("xpbar-fill") {
            let pct = (player.xp as f64 / player.xp_to_next as f64 * 100.0).min(100.0);
            let _ = bar.set_attribute("style", &format!("width: {pct:.1}%"));
        }

        let emoji = session
            .equipped_avatar()
            .map(|a| a.emoji.clone())
            .unwrap_or_else(|| "🙂".to_string());
        set_text(document, "avatar-current", &emoji);
    }

    fn setup_export_button(document: &Document, session: Rc<RefCell<Session>>) {
        if let Some(btn) = document.get_element_by_id("btn-export") {
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                match session.borrow().export_json() {
                    Ok(json) => download_json(&json),
                    Err(e) => log::error!("Export failed: {e}"),
                }
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    /// Hand the export to the browser as a file download.
    fn download_json(json: &str) {
        let Some(document) = web_sys::window().and_then(|w| w.document()) else {
            return;
        };

        let parts: JsValue = js_sys::Array::of1(&JsValue::from_str(json)).into();
        let options = web_sys::BlobPropertyBag::new();
        options.set_type("application/json");
        let Ok(blob) = web_sys::Blob::new_with_str_sequence_and_options(&parts, &options) else {
            log::error!("Export failed: could not build blob");
            return;
        };
        let Ok(url) = web_sys::Url::create_object_url_with_blob(&blob) else {
            return;
        };

        if let Ok(el) = document.create_element("a") {
            if let Ok(anchor) = el.dyn_into::<web_sys::HtmlAnchorElement>() {
                anchor.set_href(&url);
                anchor.set_download(BUNDLE_FILE_NAME);
                anchor.click();
            }
        }
        let _ = web_sys::Url::revoke_object_url(&url);
    }

    fn setup_import_input(document: &Document, session: Rc<RefCell<Session>>) {
        let Some(input) = document.get_element_by_id("file-import") else {
            return;
        };

        let closure = Closure::<dyn FnMut(_)>::new(move |event: web_sys::Event| {
            let Some(input) = event
                .target()
                .and_then(|t| t.dyn_into::<HtmlInputElement>().ok())
            else {
                return;
            };
            let Some(file) = input.files().and_then(|files| files.get(0)) else {
                return;
            };
            let Ok(reader) = FileReader::new() else {
                return;
            };

            // The file read is the one async boundary: parsing and merging
            // run synchronously once the content arrives.
            let session = session.clone();
            let reader_handle = reader.clone();
            let onload = Closure::once_into_js(move |_event: web_sys::Event| {
                let Some(text) = reader_handle.result().ok().and_then(|v| v.as_string()) else {
                    return;
                };
                let mut session = session.borrow_mut();
                // Errors already became toasts inside the session.
                let _ = session.import_bundle(&text);
                if let Some(document) = web_sys::window().and_then(|w| w.document()) {
                    update_topbar(&document, &session);
                }
            });
            reader.set_onload(Some(onload.unchecked_ref()));
            let _ = reader.read_as_text(&file);
        });
        let _ = input.add_event_listener_with_callback("change", closure.as_ref().unchecked_ref());
        closure.forget();
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    wasm_app::run();
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("QuizQuest core (native) starting...");
    log::info!("Native mode has no UI - run with `trunk serve` for the web version");

    println!("\nRunning progression smoke test...");
    smoke_test();
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
fn smoke_test() {
    use quiz_quest::consts::XP_PER_CORRECT;
    use quiz_quest::notify::{LogSink, NoCelebration};
    use quiz_quest::persistence::MemoryStore;
    use quiz_quest::req_xp;

    let mut session =
        quiz_quest::GameSession::new(MemoryStore::new(), Box::new(LogSink), Box::new(NoCelebration));

    let amount = (req_xp(1) + req_xp(2) + 5) as i64;
    let events = session
        .award_experience(amount)
        .expect("award should succeed");
    assert_eq!(events.len(), 2, "expected two level-ups");
    assert_eq!(session.player().level, 3);
    assert_eq!(session.player().xp, 5);

    session
        .answer_question(true, XP_PER_CORRECT)
        .expect("answer should be recorded");
    assert_eq!(session.player().stats.total_correct, 1);

    let bundle = session.export_json().expect("export should succeed");
    let report = session
        .import_bundle(&bundle)
        .expect("re-import should succeed");
    assert!(report.is_noop(), "re-importing our own export must add nothing");

    println!("✓ Progression smoke test passed!");
}
