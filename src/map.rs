//! HTTP surface of the map view.

use actix_web::{get, post, web, HttpResponse};
use geojson::Feature;
use maud::{html, Markup, PreEscaped, DOCTYPE};
use serde::Serialize;
use serde_json::json;
use tokio::sync::Mutex;

use crate::{
    controller::{PathState, ViewController},
    model::{path_length, MAP_CONTAINER},
    scene::{MapSurface, SceneProvider},
};

pub type View = Mutex<ViewController<SceneProvider>>;

const LEAFLET_CSS: &str = "https://unpkg.com/leaflet@1.9.4/dist/leaflet.css";
const LEAFLET_JS: &str = "https://unpkg.com/leaflet@1.9.4/dist/leaflet.js";

// draws /v1/scene with leaflet, redrawing the path after each trim
const SCRIPT: &str = r#"
let map = null;
let line = null;

async function draw() {
  const response = await fetch('/v1/scene');
  if (!response.ok) {
    console.log('map is not loaded');
    return;
  }
  const scene = await response.json();
  if (map === null) {
    map = L.map(scene.map.container).setView([scene.map.center.lat, scene.map.center.lon], scene.map.zoom);
    L.tileLayer(scene.map.tile_url, { attribution: scene.map.attribution }).addTo(map);
  }
  if (line !== null) {
    line.remove();
    line = null;
  }
  if (scene.path !== null) {
    const p = scene.path.properties;
    line = L.geoJSON(scene.path, {
      style: { color: p.strokeColor, opacity: p.strokeOpacity, weight: p.strokeWeight },
    }).addTo(map);
  }
  return scene;
}

async function trim() {
  await fetch('/v1/trim', { method: 'POST' });
  await draw();
}

async function load() {
  const scene = await draw();
  if (scene && scene.state === 'loading') {
    setTimeout(load, 500);
  }
}

load();
"#;

#[derive(Serialize)]
struct Scene<'a> {
    state: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<&'a str>,
    map: &'a MapSurface,
    path: Option<Feature>,
    points: usize,
    length_m: f64,
}

#[get("/")]
pub async fn page() -> Markup {
    html! {
        (DOCTYPE)
        html {
            head {
                meta charset="utf-8";
                title { "racemap" }
                link rel="stylesheet" href=(LEAFLET_CSS);
                script src=(LEAFLET_JS) {}
            }
            body {
                div {
                    div id=(MAP_CONTAINER) style="height: 600px; width: 100%" {}
                    button onclick="trim()" { "Remove First 10 Elements" }
                }
                script { (PreEscaped(SCRIPT)) }
            }
        }
    }
}

#[get("/v1/scene")]
pub async fn scene(view: web::Data<View>) -> actix_web::Result<HttpResponse> {
    let view = view.lock().await;
    let (Some(provider), Some(map)) = (view.provider(), view.map()) else {
        return Ok(HttpResponse::NotFound().json(json!({ "error": "map is not loaded" })));
    };
    let Some(surface) = provider.map(*map) else {
        return Ok(HttpResponse::NotFound().json(json!({ "error": "map is not loaded" })));
    };

    let (state, error, path) = match view.state() {
        PathState::NoFeature => ("none", None, None),
        PathState::Loading => ("loading", None, None),
        PathState::LoadFailed(e) => ("failed", Some(e.as_str()), None),
        PathState::FeatureAttached(line) => ("attached", None, provider.line_feature(*line)),
    };
    let points = view.path().unwrap_or_default();

    Ok(HttpResponse::Ok().json(Scene {
        state,
        error,
        map: surface,
        path,
        points: points.len(),
        length_m: path_length(&points),
    }))
}

#[post("/v1/trim")]
pub async fn trim(view: web::Data<View>) -> HttpResponse {
    let remaining = view.lock().await.trim_leading_10();
    HttpResponse::Ok().json(json!({ "remaining": remaining }))
}

#[cfg(test)]
mod tests {
    use actix_web::{http::StatusCode, test, App};
    use serde_json::Value;

    use super::*;
    use crate::{config::MapConfig, provider::Provider};

    fn view(provider: Provider<SceneProvider>) -> web::Data<View> {
        web::Data::new(Mutex::new(ViewController::new(provider, "sample_race.csv")))
    }

    fn ready() -> Provider<SceneProvider> {
        SceneProvider::probe(Some(&MapConfig {
            tile_url: "https://tiles.test/{z}/{x}/{y}.png".to_string(),
            attribution: String::new(),
        }))
    }

    fn rows(n: usize) -> String {
        let mut data = "id,time,lat,lon\n".to_string();
        for i in 0..n {
            data.push_str(&format!("{i},t,40.{i},-98.{i}\n"));
        }
        data
    }

    #[actix_web::test]
    async fn page_has_map_and_button() {
        let app = test::init_service(App::new().service(page)).await;
        let req = test::TestRequest::get().uri("/").to_request();
        let body = test::call_and_read_body(&app, req).await;
        let body = String::from_utf8(body.to_vec()).unwrap();

        assert!(body.contains(r#"id="map" style="height: 600px; width: 100%""#));
        assert!(body.contains("Remove First 10 Elements"));
    }

    #[actix_web::test]
    async fn scene_before_mount() {
        let view = view(Provider::Unavailable);
        view.lock().await.begin_initialize();

        let app = test::init_service(App::new().app_data(view).service(scene)).await;
        let req = test::TestRequest::get().uri("/v1/scene").to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
    }

    #[actix_web::test]
    async fn scene_and_trim() {
        let view = view(ready());
        {
            let mut v = view.lock().await;
            assert!(v.begin_initialize());
            v.complete_initialize(Ok(rows(15)));
        }

        let app = test::init_service(
            App::new()
                .app_data(view.clone())
                .service(scene)
                .service(trim),
        )
        .await;

        let req = test::TestRequest::get().uri("/v1/scene").to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["state"], "attached");
        assert_eq!(body["points"], 15);
        assert_eq!(body["map"]["zoom"], 12);
        assert_eq!(body["map"]["map_type"], "roadmap");
        assert_eq!(body["path"]["geometry"]["type"], "LineString");
        assert_eq!(body["path"]["properties"]["strokeWeight"], 5);

        for expected in [json!(5), json!(0), json!(0)] {
            let req = test::TestRequest::post().uri("/v1/trim").to_request();
            let body: Value = test::call_and_read_body_json(&app, req).await;
            assert_eq!(body["remaining"], expected);
        }

        let req = test::TestRequest::get().uri("/v1/scene").to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["points"], 0);
        assert_eq!(body["length_m"], 0.0);
    }

    #[actix_web::test]
    async fn trim_while_loading() {
        let view = view(ready());
        view.lock().await.begin_initialize();

        let app = test::init_service(
            App::new()
                .app_data(view.clone())
                .service(scene)
                .service(trim),
        )
        .await;

        let req = test::TestRequest::post().uri("/v1/trim").to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["remaining"], Value::Null);

        let req = test::TestRequest::get().uri("/v1/scene").to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["state"], "loading");
        assert_eq!(body["path"], Value::Null);
    }

    #[actix_web::test]
    async fn scene_reports_load_failure() {
        let view = view(ready());
        {
            let mut v = view.lock().await;
            v.begin_initialize();
            v.complete_initialize(Err(crate::source::FetchError::NotFound(
                "sample_race.csv".to_string(),
            )));
        }

        let app = test::init_service(App::new().app_data(view).service(scene)).await;
        let req = test::TestRequest::get().uri("/v1/scene").to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["state"], "failed");
        assert_eq!(body["error"], "sample_race.csv not found");
        assert_eq!(body["map"]["center"]["lon"], -98.37406855532743);
    }
}
