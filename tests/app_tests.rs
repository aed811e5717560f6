//! AppController driven with in-memory input and output.

use fetchline::config::Profile;
use fetchline::testing::{Scripted, ScriptedSource};
use fetchline::{AppController, FetchError};
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;

const PHOTOS_PATH: &str = "/photos";
const GEOCODING_PATH: &str = "/geo/1.0/direct";

fn profile() -> Profile {
    Profile {
        api_key: Some("secret-key".to_string()),
        ..Profile::default()
    }
}

fn app(source: Arc<ScriptedSource>, verbose: bool) -> AppController<Vec<u8>> {
    AppController::with_output(&profile(), source, verbose, Vec::new())
}

fn output(app: &AppController<Vec<u8>>) -> String {
    String::from_utf8_lossy(app.output()).to_string()
}

fn paris() -> serde_json::Value {
    json!([{"name": "Paris", "state": "Ile-de-France", "country": "FR", "lat": 48.8588897, "lon": 2.3200410}])
}

#[tokio::test(start_paused = true)]
async fn geocode_once_should_print_city_and_succeed() {
    let source = Arc::new(ScriptedSource::new([Scripted::ok(paris()).on_path(GEOCODING_PATH)]));
    let mut app = app(source.clone(), false);

    let succeeded = app.geocode_once("Paris").await.unwrap();

    assert!(succeeded);
    let text = output(&app);
    assert!(text.contains("[Search] Loading..."));
    assert!(text.contains("Paris, Ile-de-France, FR\nLatitude: 48.8588897\nLongitude: 2.320041"));
    assert_eq!(app.geocoding().query(), "");
    assert!(source.requested_urls()[0]
        .as_str()
        .ends_with("?q=Paris&limit=5&appid=secret-key"));
}

#[tokio::test(start_paused = true)]
async fn fetch_photos_once_should_report_failure() {
    let source = Arc::new(ScriptedSource::new([Scripted::err(FetchError::Decode(
        "expected a sequence".to_string(),
    ))
    .on_path(PHOTOS_PATH)]));
    let mut app = app(source, false);

    let succeeded = app.fetch_photos_once().await.unwrap();

    assert!(!succeeded);
    assert!(output(&app).contains("Error: decode failure: expected a sequence"));
}

#[tokio::test(start_paused = true)]
async fn verbose_output_should_redact_api_key() {
    let source = Arc::new(ScriptedSource::new([Scripted::ok_after(
        paris(),
        Duration::from_millis(120),
    )
    .on_path(GEOCODING_PATH)]));
    let mut app = app(source, true);

    app.geocode_once("Paris").await.unwrap();

    let text = output(&app);
    assert!(text.contains(
        "GET http://api.openweathermap.org/geo/1.0/direct?q=Paris&limit=5&appid=*** (120ms)"
    ));
    assert!(!text.contains("secret-key"));
}

#[tokio::test(start_paused = true)]
async fn interactive_loop_should_print_results_for_piped_input() {
    let source = Arc::new(ScriptedSource::new([
        Scripted::ok_after(
            json!([{"thumbnailUrl": "https://t/1"}, {"thumbnailUrl": "https://t/2"}]),
            Duration::from_millis(100),
        )
        .on_path(PHOTOS_PATH),
        Scripted::ok_after(paris(), Duration::from_millis(50)).on_path(GEOCODING_PATH),
    ]));
    let mut app = app(source, false);

    app.run_interactive(":photos\nParis\n:q\n".as_bytes(), false)
        .await
        .unwrap();

    let text = output(&app);
    assert!(text.contains("[Fetch Data] Loading..."));
    assert!(text.contains("[Search] Loading..."));
    assert!(text.contains(concat!(
        r#"<img src="https://t/1" alt="thumbnail" class="w-16 h-16 rounded-full">"#,
        r#"<img src="https://t/2" alt="thumbnail" class="w-16 h-16 rounded-full">"#
    )));
    assert!(text.contains("Paris, Ile-de-France, FR"));
    assert!(!app.photos().state().is_pending());
    assert!(!app.geocoding().state().is_pending());
}

#[tokio::test(start_paused = true)]
async fn interactive_loop_should_only_print_latest_geocoding_result() {
    let source = Arc::new(ScriptedSource::new([
        Scripted::ok_after(
            json!([{"name": "Lyon", "country": "FR", "lat": 45.75, "lon": 4.85}]),
            Duration::from_millis(3000),
        )
        .on_query("q", "Lyon"),
        Scripted::ok_after(paris(), Duration::from_millis(1000)).on_query("q", "Paris"),
    ]));
    let mut app = app(source, false);

    // Lines arrive together, so the Lyon lookup is superseded by Paris
    app.run_interactive("Lyon\nParis\n".as_bytes(), false)
        .await
        .unwrap();

    let text = output(&app);
    assert!(text.contains("Paris, Ile-de-France, FR"));
    assert!(!text.contains("Lyon, FR"));
}
