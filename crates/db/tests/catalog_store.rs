//! Integration tests for the catalog repositories.
//!
//! Exercises the `Resource` implementations against a real PostgreSQL with
//! PostGIS:
//! - filtered counts and pages
//! - movie relation rows on insert and replace
//! - scalar-only saves
//! - geography round trips and nearby search
//! - cascade deletes

use assert_matches::assert_matches;
use chrono::NaiveDate;
use cinecat_core::pagination::PageRequest;
use cinecat_core::sorting::{Ordering, SortDirection};
use cinecat_db::mapping::EntityMapping;
use cinecat_db::models::actor::CreateActor;
use cinecat_db::models::cinema_room::{CinemaRoomFilter, CreateCinemaRoom, NearbyQuery};
use cinecat_db::models::genre::{CreateGenre, GenreFilter, GenreSort};
use cinecat_db::models::movie::{
    ActorRoleInput, CreateMovie, Movie, MovieActor, MovieFilter, MovieGenre, MovieSort,
};
use cinecat_db::repositories::{ActorRepo, CinemaRoomRepo, GenreRepo, MovieRepo};
use cinecat_db::resource::{self, Resource};
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn genres_of(pool: &PgPool, movie_id: i64) -> Vec<MovieGenre> {
    sqlx::query_as("SELECT genre_id FROM movie_genres WHERE movie_id = $1 ORDER BY genre_id")
        .bind(movie_id)
        .fetch_all(pool)
        .await
        .unwrap()
}

async fn cast_of(pool: &PgPool, movie_id: i64) -> Vec<MovieActor> {
    sqlx::query_as(
        "SELECT actor_id, role, display_order FROM movie_actors
         WHERE movie_id = $1
         ORDER BY display_order",
    )
    .bind(movie_id)
    .fetch_all(pool)
    .await
    .unwrap()
}

async fn seed_genre(pool: &PgPool, name: &str) -> i64 {
    let draft = cinecat_db::models::genre::Genre::to_draft(&CreateGenre {
        name: name.to_string(),
    });
    GenreRepo::insert(pool, draft).await.unwrap().id
}

async fn seed_actor(pool: &PgPool, name: &str) -> i64 {
    let draft = cinecat_db::models::actor::Actor::to_draft(&CreateActor {
        name: name.to_string(),
        birth_date: NaiveDate::from_ymd_opt(1964, 9, 2).unwrap(),
    });
    ActorRepo::insert(pool, draft).await.unwrap().id
}

fn movie_input(title: &str, release_date: NaiveDate) -> CreateMovie {
    CreateMovie {
        title: title.to_string(),
        in_theaters: false,
        release_date,
        genre_ids: Vec::new(),
        actors: Vec::new(),
    }
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

// ---------------------------------------------------------------------------
// Listing
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
#[ignore = "requires PostgreSQL with PostGIS"]
async fn test_title_filter_counts_before_paging(pool: PgPool) {
    for title in ["The Matrix", "The Matrix Reloaded", "Heat"] {
        MovieRepo::insert(&pool, Movie::to_draft(&movie_input(title, date(1999, 3, 31))))
            .await
            .unwrap();
    }

    let filter = MovieFilter {
        title: Some("matrix".into()),
        ..Default::default()
    };
    let total = resource::count::<MovieRepo>(&pool, &filter).await.unwrap();
    let page = resource::fetch_page::<MovieRepo>(
        &pool,
        &filter,
        &Ordering::default(),
        &PageRequest::new(Some(1), Some(1)),
    )
    .await
    .unwrap();

    assert_eq!(total, 2);
    assert_eq!(page.len(), 1);
    assert_eq!(page[0].title, "The Matrix");
}

#[sqlx::test(migrations = "../../db/migrations")]
#[ignore = "requires PostgreSQL with PostGIS"]
async fn test_genre_membership_filter(pool: PgPool) {
    let action = seed_genre(&pool, "Action").await;
    let drama = seed_genre(&pool, "Drama").await;

    let mut input = movie_input("Heat", date(1995, 12, 15));
    input.genre_ids = vec![action, drama];
    MovieRepo::insert(&pool, Movie::to_draft(&input)).await.unwrap();
    MovieRepo::insert(&pool, Movie::to_draft(&movie_input("Up", date(2009, 5, 29))))
        .await
        .unwrap();

    let filter = MovieFilter {
        genre_ids: vec![drama],
        ..Default::default()
    };
    assert_eq!(resource::count::<MovieRepo>(&pool, &filter).await.unwrap(), 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
#[ignore = "requires PostgreSQL with PostGIS"]
async fn test_ties_are_broken_by_id(pool: PgPool) {
    let first = seed_genre(&pool, "Drama").await;
    let second = seed_genre(&pool, "Drama").await;

    let ordering = Ordering {
        key: GenreSort::Name,
        direction: SortDirection::Desc,
    };
    let page = resource::fetch_page::<GenreRepo>(
        &pool,
        &GenreFilter::default(),
        &ordering,
        &PageRequest::default(),
    )
    .await
    .unwrap();

    let ids: Vec<i64> = page.iter().map(|g| g.id).collect();
    assert_eq!(ids, vec![first, second]);
}

#[sqlx::test(migrations = "../../db/migrations")]
#[ignore = "requires PostgreSQL with PostGIS"]
async fn test_page_past_the_end_is_empty(pool: PgPool) {
    seed_genre(&pool, "Drama").await;
    let page = resource::fetch_page::<GenreRepo>(
        &pool,
        &GenreFilter::default(),
        &Ordering::default(),
        &PageRequest::new(Some(9), Some(10)),
    )
    .await
    .unwrap();
    assert!(page.is_empty());
}

// ---------------------------------------------------------------------------
// Movie relations
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
#[ignore = "requires PostgreSQL with PostGIS"]
async fn test_movie_detail_inlines_relations_in_display_order(pool: PgPool) {
    let genre = seed_genre(&pool, "Action").await;
    let keanu = seed_actor(&pool, "Keanu Reeves").await;
    let carrie = seed_actor(&pool, "Carrie-Anne Moss").await;

    let mut input = movie_input("The Matrix", date(1999, 3, 31));
    input.genre_ids = vec![genre];
    input.actors = vec![
        ActorRoleInput {
            actor_id: carrie,
            character: "Trinity".into(),
        },
        ActorRoleInput {
            actor_id: keanu,
            character: "Neo".into(),
        },
    ];
    let movie = MovieRepo::insert(&pool, Movie::to_draft(&input)).await.unwrap();

    let detail = MovieRepo::find_detail(&pool, movie.id).await.unwrap().unwrap();
    assert_eq!(detail.genres.len(), 1);
    assert_eq!(detail.genres[0].name, "Action");
    let cast: Vec<(&str, &str)> = detail
        .actors
        .iter()
        .map(|a| (a.actor_name.as_str(), a.character.as_str()))
        .collect();
    assert_eq!(cast, vec![("Carrie-Anne Moss", "Trinity"), ("Keanu Reeves", "Neo")]);
}

#[sqlx::test(migrations = "../../db/migrations")]
#[ignore = "requires PostgreSQL with PostGIS"]
async fn test_replace_swaps_relation_rows(pool: PgPool) {
    let action = seed_genre(&pool, "Action").await;
    let drama = seed_genre(&pool, "Drama").await;

    let mut input = movie_input("Heat", date(1995, 12, 15));
    input.genre_ids = vec![action];
    let mut movie = MovieRepo::insert(&pool, Movie::to_draft(&input)).await.unwrap();

    input.genre_ids = vec![drama];
    movie.apply_update(&input);
    MovieRepo::replace(&pool, &movie).await.unwrap();

    let genres = genres_of(&pool, movie.id).await;
    assert_eq!(genres.len(), 1);
    assert_eq!(genres[0].genre_id, drama);
}

#[sqlx::test(migrations = "../../db/migrations")]
#[ignore = "requires PostgreSQL with PostGIS"]
async fn test_save_leaves_relations_alone(pool: PgPool) {
    let action = seed_genre(&pool, "Action").await;
    let keanu = seed_actor(&pool, "Keanu Reeves").await;

    let mut input = movie_input("John Wick", date(2014, 10, 24));
    input.genre_ids = vec![action];
    input.actors = vec![ActorRoleInput {
        actor_id: keanu,
        character: "John Wick".into(),
    }];
    let movie = MovieRepo::insert(&pool, Movie::to_draft(&input)).await.unwrap();

    let mut loaded = resource::find_by_id::<MovieRepo>(&pool, movie.id)
        .await
        .unwrap()
        .unwrap();
    let mut patch = loaded.to_patch();
    patch.in_theaters = true;
    loaded.merge_patch(patch);
    MovieRepo::save(&pool, &loaded).await.unwrap();

    assert_eq!(genres_of(&pool, movie.id).await.len(), 1);
    let cast = cast_of(&pool, movie.id).await;
    assert_eq!(cast.len(), 1);
    assert_eq!(cast[0].display_order, 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
#[ignore = "requires PostgreSQL with PostGIS"]
async fn test_delete_cascades_to_relations(pool: PgPool) {
    let action = seed_genre(&pool, "Action").await;
    let mut input = movie_input("Heat", date(1995, 12, 15));
    input.genre_ids = vec![action];
    let movie = MovieRepo::insert(&pool, Movie::to_draft(&input)).await.unwrap();

    assert!(resource::delete::<MovieRepo>(&pool, movie.id).await.unwrap());
    assert!(!resource::exists::<MovieRepo>(&pool, movie.id).await.unwrap());
    assert!(genres_of(&pool, movie.id).await.is_empty());
    assert!(!resource::delete::<MovieRepo>(&pool, movie.id).await.unwrap());
}

#[sqlx::test(migrations = "../../db/migrations")]
#[ignore = "requires PostgreSQL with PostGIS"]
async fn test_unknown_genre_is_a_foreign_key_violation(pool: PgPool) {
    let mut input = movie_input("Heat", date(1995, 12, 15));
    input.genre_ids = vec![999_999];
    let err = MovieRepo::insert(&pool, Movie::to_draft(&input))
        .await
        .unwrap_err();
    assert_matches!(err, sqlx::Error::Database(_));
    let code = err.as_database_error().and_then(|e| e.code());
    assert_eq!(code.as_deref(), Some("23503"));
    assert_eq!(
        resource::count::<MovieRepo>(&pool, &MovieFilter::default())
            .await
            .unwrap(),
        0
    );
}

#[sqlx::test(migrations = "../../db/migrations")]
#[ignore = "requires PostgreSQL with PostGIS"]
async fn test_index_lists(pool: PgPool) {
    let mut showing = movie_input("Showing", date(2000, 1, 1));
    showing.in_theaters = true;
    MovieRepo::insert(&pool, Movie::to_draft(&showing)).await.unwrap();
    MovieRepo::insert(&pool, Movie::to_draft(&movie_input("Later", date(2999, 6, 1))))
        .await
        .unwrap();
    MovieRepo::insert(&pool, Movie::to_draft(&movie_input("Sooner", date(2999, 1, 1))))
        .await
        .unwrap();

    let upcoming = MovieRepo::upcoming(&pool, 5).await.unwrap();
    let titles: Vec<&str> = upcoming.iter().map(|m| m.title.as_str()).collect();
    assert_eq!(titles, vec!["Sooner", "Later"]);

    let in_theaters = MovieRepo::in_theaters(&pool, 5).await.unwrap();
    assert_eq!(in_theaters.len(), 1);
    assert_eq!(in_theaters[0].title, "Showing");

    let sorted = resource::fetch_page::<MovieRepo>(
        &pool,
        &MovieFilter::default(),
        &Ordering {
            key: MovieSort::ReleaseDate,
            direction: SortDirection::Desc,
        },
        &PageRequest::default(),
    )
    .await
    .unwrap();
    assert_eq!(sorted[0].title, "Later");
}

// ---------------------------------------------------------------------------
// Cinema rooms
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
#[ignore = "requires PostgreSQL with PostGIS"]
async fn test_location_round_trips(pool: PgPool) {
    let input = CreateCinemaRoom {
        name: "Centro".into(),
        latitude: 19.4,
        longitude: -99.1,
    };
    let room = CinemaRoomRepo::insert(
        &pool,
        cinecat_db::models::cinema_room::CinemaRoom::to_draft(&input),
    )
    .await
    .unwrap();

    let dto = CinemaRoomRepo::find_detail(&pool, room.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(dto.latitude, 19.4);
    assert_eq!(dto.longitude, -99.1);
    assert_eq!(
        resource::count::<CinemaRoomRepo>(&pool, &CinemaRoomFilter::default())
            .await
            .unwrap(),
        1
    );
}

#[sqlx::test(migrations = "../../db/migrations")]
#[ignore = "requires PostgreSQL with PostGIS"]
async fn test_nearby_orders_by_distance_within_radius(pool: PgPool) {
    let rooms = [
        ("Far", 19.9, -99.1),
        ("Near", 19.401, -99.1),
        ("Nearer", 19.4001, -99.1),
    ];
    for (name, latitude, longitude) in rooms {
        let input = CreateCinemaRoom {
            name: name.into(),
            latitude,
            longitude,
        };
        CinemaRoomRepo::insert(
            &pool,
            cinecat_db::models::cinema_room::CinemaRoom::to_draft(&input),
        )
        .await
        .unwrap();
    }

    let query = NearbyQuery {
        latitude: 19.4,
        longitude: -99.1,
        distance_km: Some(5.0),
    };
    let found = CinemaRoomRepo::nearby(&pool, &query).await.unwrap();
    let names: Vec<&str> = found.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(names, vec!["Nearer", "Near"]);
    assert!(found[0].distance_meters < found[1].distance_meters);
}
