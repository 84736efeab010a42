#[macro_use]
extern crate rocket;

use log::{error, info};
use rocket::http::Status;
use rocket::response::status;
use rocket::serde::json::Json;
use rocket::State;
use std::sync::Arc;

use character_selector::local::pick_local;
use character_selector::models::config::{default_path, load_or_default, Config};
use character_selector::picker::{clamp_pages, lookup, rng_for_seed, Seed, DEFAULT_PAGES, NO_SEED};
use character_selector::{
    CharacterPicker, CharacterPool, ConsolidatedResult, GenderFilter, LocalSelection, Selection,
};

use cors::Cors;

mod cors;

struct AppState {
    cfg: Arc<Config>,
    pool: Arc<CharacterPool>,
}

#[get("/select?<gender_filter>&<pages_to_search>&<seed>")]
async fn select(
    state: &State<AppState>,
    gender_filter: Option<GenderFilter>,
    pages_to_search: Option<usize>,
    seed: Option<i128>,
) -> Json<Selection> {
    let gender_filter = gender_filter.unwrap_or_default();
    let pages = clamp_pages(pages_to_search.unwrap_or(DEFAULT_PAGES));
    let seed = Seed::from_raw(seed.unwrap_or(NO_SEED));
    info!("select: gender={gender_filter} pages={pages} seed={seed:?}");

    let picker = CharacterPicker::new(state.cfg.clone(), state.pool.clone());
    Json(picker.pick(gender_filter, pages, seed).await)
}

#[get("/select/local?<gender_filter>&<quantity_limit>&<seed>")]
fn select_local(
    state: &State<AppState>,
    gender_filter: Option<GenderFilter>,
    quantity_limit: Option<usize>,
    seed: Option<i128>,
) -> Json<LocalSelection> {
    let mut rng = rng_for_seed(Seed::from_raw(seed.unwrap_or(NO_SEED)));
    Json(pick_local(
        state.pool.entries(),
        gender_filter.unwrap_or_default(),
        quantity_limit.unwrap_or(0),
        &mut rng,
    ))
}

#[get("/tags/<character>?<pages>")]
async fn character_tags(
    state: &State<AppState>,
    character: &str,
    pages: Option<usize>,
) -> Result<Json<ConsolidatedResult>, status::Custom<String>> {
    let pages = clamp_pages(pages.unwrap_or(DEFAULT_PAGES));
    match lookup(state.cfg.clone(), character, pages).await {
        Ok(result) => Ok(Json(result)),
        Err(e) => {
            let error_msg = format!("Failed to look up '{character}': {e:#}");
            error!("{error_msg}");
            Err(status::Custom(Status::BadGateway, error_msg))
        }
    }
}

#[launch]
async fn rocket() -> _ {
    let path = default_path();
    let cfg = load_or_default(&path).unwrap_or_else(|e| {
        error!("Failed to load {}: {e:#}; using defaults", path.display());
        Config::default()
    });
    let pool = CharacterPool::load(cfg.character_file.clone()).await;

    rocket::build()
        .manage(AppState {
            cfg: Arc::new(cfg),
            pool: Arc::new(pool),
        })
        .mount("/", routes![select, select_local, character_tags])
        .attach(Cors)
}
